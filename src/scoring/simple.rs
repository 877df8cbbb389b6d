use crate::scoring::{Scorer, Weight};

/// Scores edges by the combination of consumed elements.
///
/// A weight of `None` marks a combination the scorer is not meant to see. For example, a
/// scorer created with [`SimpleScorer::substitution`] only handles edges that consume an
/// element from both sequences. Scoring such a combination anyway trips a debug assertion and
/// yields zero in release builds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SimpleScorer<W> {
    pub match_weight: Option<W>,
    pub mismatch_weight: Option<W>,

    /// Edges that only consume an element of the right sequence
    pub down_missing_weight: Option<W>,

    /// Edges that only consume an element of the down sequence
    pub right_missing_weight: Option<W>,

    /// Edges that don't consume anything
    pub both_missing_weight: Option<W>,
}

impl<W: Weight> SimpleScorer<W> {
    pub fn new(match_weight: W, mismatch_weight: W, down_missing_weight: W, right_missing_weight: W, both_missing_weight: W) -> Self {
        Self {
            match_weight: Some(match_weight),
            mismatch_weight: Some(mismatch_weight),
            down_missing_weight: Some(down_missing_weight),
            right_missing_weight: Some(right_missing_weight),
            both_missing_weight: Some(both_missing_weight),
        }
    }

    pub fn substitution(match_weight: W, mismatch_weight: W) -> Self {
        Self {
            match_weight: Some(match_weight),
            mismatch_weight: Some(mismatch_weight),
            down_missing_weight: None,
            right_missing_weight: None,
            both_missing_weight: None,
        }
    }

    pub fn gap(gap_weight: W) -> Self {
        Self::gap_asymmetric(gap_weight, gap_weight)
    }

    /// `down_gap_weight` scores a gap in the down sequence (a move right),
    /// `right_gap_weight` a gap in the right sequence (a move down).
    pub fn gap_asymmetric(down_gap_weight: W, right_gap_weight: W) -> Self {
        Self {
            match_weight: None,
            mismatch_weight: None,
            down_missing_weight: Some(down_gap_weight),
            right_missing_weight: Some(right_gap_weight),
            both_missing_weight: None,
        }
    }

    pub fn freeride(freeride_weight: W) -> Self {
        Self {
            match_weight: None,
            mismatch_weight: None,
            down_missing_weight: None,
            right_missing_weight: None,
            both_missing_weight: Some(freeride_weight),
        }
    }
}

impl<E, D, R, W> Scorer<E, D, R, W> for SimpleScorer<W>
where
    D: PartialEq<R>,
    W: Weight,
{
    fn score(&self, _: &E, down: Option<&D>, right: Option<&R>) -> W {
        let weight = match (down, right) {
            (Some(d), Some(r)) if d == r => self.match_weight,
            (Some(_), Some(_)) => self.mismatch_weight,
            (None, Some(_)) => self.down_missing_weight,
            (Some(_), None) => self.right_missing_weight,
            (None, None) => self.both_missing_weight,
        };

        debug_assert!(weight.is_some(), "Scorer not configured for this element combination");
        weight.unwrap_or_else(W::zero)
    }
}

/// Same weight for every edge.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConstantScorer<W>(pub W);

impl<E, D, R, W: Weight> Scorer<E, D, R, W> for ConstantScorer<W> {
    #[inline]
    fn score(&self, _: &E, _: Option<&D>, _: Option<&R>) -> W {
        self.0
    }
}

/// Negated edit distance: matches and freerides are free, everything else costs one.
///
/// Maximizing the path weight then minimizes the number of edits.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LevenshteinScorer;

impl<E, D, R, W> Scorer<E, D, R, W> for LevenshteinScorer
where
    D: PartialEq<R>,
    W: Weight + std::ops::Neg<Output=W> + num::One,
{
    fn score(&self, _: &E, down: Option<&D>, right: Option<&R>) -> W {
        match (down, right) {
            (Some(d), Some(r)) if d == r => W::zero(),
            (None, None) => W::zero(),
            _ => -W::one(),
        }
    }
}

//! Scorers wrapping other scorers.

use std::cmp::Ordering;
use std::marker::PhantomData;
use std::ops::Add;

use num::Zero;

use crate::scoring::{Scorer, Weight};

/// Converts the weights of a scorer into a wider type, e.g. `i32` weights into `f64` or `i64`.
///
/// Only lossless conversions (`From`) are accepted.
#[derive(Copy, Clone, Debug)]
pub struct WideningScorer<S, N> {
    scorer: S,
    narrow: PhantomData<fn() -> N>,
}

impl<S, N> WideningScorer<S, N> {
    pub fn new(scorer: S) -> Self {
        Self { scorer, narrow: PhantomData }
    }

    pub fn inner(&self) -> &S {
        &self.scorer
    }
}

impl<E, D, R, N, W, S> Scorer<E, D, R, W> for WideningScorer<S, N>
where
    S: Scorer<E, D, R, N>,
    W: From<N>,
{
    #[inline]
    fn score(&self, edge: &E, down: Option<&D>, right: Option<&R>) -> W {
        W::from(self.scorer.score(edge, down, right))
    }
}

/// Most elements a path may consume from each sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ConsumptionLimits {
    pub down_max: usize,
    pub right_max: usize,
}

impl ConsumptionLimits {
    pub fn new(down_max: usize, right_max: usize) -> Self {
        Self { down_max, right_max }
    }
}

/// Path weight that also counts the sequence elements consumed along the path.
///
/// A weight whose counts went over its limits is smaller than any weight within them, so the
/// backtracker avoids such paths whenever there is an alternative. Two weights over their
/// limits can't be compared. Within the limits, only the real weight decides.
#[derive(Copy, Clone, Debug)]
pub struct ConsumptionGatingWeight<W> {
    pub real_weight: W,
    pub down_consumed: usize,
    pub right_consumed: usize,

    /// `None` for weights not produced by a gating scorer, like the zero weight of the root
    pub limits: Option<ConsumptionLimits>,
}

impl<W> ConsumptionGatingWeight<W> {
    pub fn new(real_weight: W, down_consumed: usize, right_consumed: usize, limits: ConsumptionLimits) -> Self {
        Self { real_weight, down_consumed, right_consumed, limits: Some(limits) }
    }

    pub fn exceeds_limits(&self) -> bool {
        self.limits.is_some_and(|l| self.down_consumed > l.down_max || self.right_consumed > l.right_max)
    }
}

impl<W: Add<Output=W>> Add for ConsumptionGatingWeight<W> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            real_weight: self.real_weight + rhs.real_weight,
            down_consumed: self.down_consumed + rhs.down_consumed,
            right_consumed: self.right_consumed + rhs.right_consumed,
            limits: self.limits.or(rhs.limits),
        }
    }
}

impl<W: Zero> Zero for ConsumptionGatingWeight<W> {
    fn zero() -> Self {
        Self {
            real_weight: W::zero(),
            down_consumed: 0,
            right_consumed: 0,
            limits: None,
        }
    }

    fn is_zero(&self) -> bool {
        self.real_weight.is_zero() && self.down_consumed == 0 && self.right_consumed == 0
    }
}

impl<W: PartialOrd> PartialOrd for ConsumptionGatingWeight<W> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.exceeds_limits(), other.exceeds_limits()) {
            (true, true) => None,
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            (false, false) => self.real_weight.partial_cmp(&other.real_weight),
        }
    }
}

impl<W: PartialOrd> PartialEq for ConsumptionGatingWeight<W> {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl<W: Weight> Weight for ConsumptionGatingWeight<W> {
    fn is_finite(&self) -> bool {
        self.real_weight.is_finite()
    }
}

/// Counts the elements consumed by each edge next to the weight of the wrapped scorer, steering
/// the backtracker away from paths consuming more than `limits` allows.
#[derive(Copy, Clone, Debug)]
pub struct ConsumptionGatingScorer<S> {
    pub limits: ConsumptionLimits,
    pub scorer: S,
}

impl<S> ConsumptionGatingScorer<S> {
    pub fn new(limits: ConsumptionLimits, scorer: S) -> Self {
        Self { limits, scorer }
    }
}

impl<E, D, R, W, S> Scorer<E, D, R, ConsumptionGatingWeight<W>> for ConsumptionGatingScorer<S>
where
    S: Scorer<E, D, R, W>,
    W: Weight,
{
    fn score(&self, edge: &E, down: Option<&D>, right: Option<&R>) -> ConsumptionGatingWeight<W> {
        ConsumptionGatingWeight::new(
            self.scorer.score(edge, down, right),
            usize::from(down.is_some()),
            usize::from(right.is_some()),
            self.limits,
        )
    }
}

#[cfg(test)]
mod tests {
    use num::Zero;

    use super::{ConsumptionGatingScorer, ConsumptionGatingWeight, ConsumptionLimits, WideningScorer};
    use crate::backtrack::{Backtracker, HeapStrategy};
    use crate::graphs::{EdgeType, GlobalAlignmentGraph, LocalAlignmentGraph};
    use crate::scoring::{Scorer, SimpleScorer, Weight};

    #[test]
    fn test_widening() {
        let narrow = SimpleScorer::substitution(2i32, -3);
        let scorer = WideningScorer::new(narrow);

        let wide: f64 = scorer.score(&(), Some(&b'a'), Some(&b'a'));
        assert_eq!(wide, 2.0);

        let wide: i64 = scorer.score(&(), Some(&b'a'), Some(&b'c'));
        assert_eq!(wide, -3);
    }

    #[test]
    fn test_widening_alignment() {
        let g: GlobalAlignmentGraph<u8, u8, f64, _, _> = GlobalAlignmentGraph::new(
            b"acgt".as_slice(),
            b"agt".as_slice(),
            WideningScorer::new(SimpleScorer::substitution(1i32, -1)),
            WideningScorer::new(SimpleScorer::gap(-1i32)),
        );

        let result = Backtracker::<HeapStrategy>::default().find_max_path_on_grid(&g).unwrap();
        assert_eq!(result.weight, 2.0);
    }

    #[test]
    fn test_gating_order() {
        let limits = ConsumptionLimits::new(10, 9);
        let weight = ConsumptionGatingWeight::new(4, 10, 9, limits);
        assert!(!weight.exceeds_limits());

        let over_down = weight + ConsumptionGatingWeight::new(-1, 1, 0, limits);
        assert!(over_down.exceeds_limits());
        assert!(over_down < weight);

        let over_right = weight + ConsumptionGatingWeight::new(-1, 0, 1, limits);
        assert!(over_right < weight);
        assert!(over_right.partial_cmp(&over_down).is_none());

        // A lower weight within the limits beats a higher one over them
        let within = ConsumptionGatingWeight::new(-100, 0, 0, limits);
        let over = ConsumptionGatingWeight::new(100, 11, 0, limits);
        assert!(within > over);

        // Within the limits only the real weight counts
        assert_eq!(ConsumptionGatingWeight::new(4, 1, 1, limits), ConsumptionGatingWeight::new(4, 2, 0, limits));
    }

    #[test]
    fn test_gating_zero() {
        let zero = ConsumptionGatingWeight::<f64>::zero();
        assert!(zero.is_zero());
        assert!(zero.limits.is_none());

        let limits = ConsumptionLimits::new(1, 1);
        let sum = zero + ConsumptionGatingWeight::new(2.0, 1, 0, limits);
        assert_eq!(sum.limits, Some(limits));
        assert!(!sum.is_zero());
        assert!(sum.is_finite());
        assert!(!ConsumptionGatingWeight::new(f64::NAN, 0, 0, limits).is_finite());
    }

    #[test]
    fn test_gating_scorer_counts() {
        let scorer = ConsumptionGatingScorer::new(ConsumptionLimits::new(1, 1), SimpleScorer::new(1.0, -1.0, -2.0, -3.0, 0.0));
        let edge = ();

        let weight: ConsumptionGatingWeight<f64> = scorer.score(&edge, Some(&b'a'), Some(&b'a'));
        assert_eq!((weight.real_weight, weight.down_consumed, weight.right_consumed), (1.0, 1, 1));

        let weight: ConsumptionGatingWeight<f64> = scorer.score(&edge, None::<&u8>, Some(&b'a'));
        assert_eq!((weight.real_weight, weight.down_consumed, weight.right_consumed), (-2.0, 0, 1));

        let weight: ConsumptionGatingWeight<f64> = scorer.score(&edge, None::<&u8>, None::<&u8>);
        assert_eq!((weight.real_weight, weight.down_consumed, weight.right_consumed), (0.0, 0, 0));
    }

    type Gated = ConsumptionGatingWeight<f64>;
    type GatedScorer = ConsumptionGatingScorer<SimpleScorer<f64>>;
    type GatedLocal<'a> = LocalAlignmentGraph<'a, u8, u8, Gated, GatedScorer, GatedScorer, GatedScorer>;

    #[test]
    fn test_gating_local_alignment() {
        let down = b"xxabcyy";
        let right = b"zabcz";
        let backtracker = Backtracker::<HeapStrategy>::default();

        // At most two down elements: only two of the three matching elements fit
        let limits = ConsumptionLimits::new(2, right.len());
        let g: GatedLocal = LocalAlignmentGraph::new(
            down.as_slice(),
            right.as_slice(),
            ConsumptionGatingScorer::new(limits, SimpleScorer::substitution(1.0, -1.0)),
            ConsumptionGatingScorer::new(limits, SimpleScorer::gap(-1.0)),
            ConsumptionGatingScorer::new(limits, SimpleScorer::freeride(0.0)),
        );

        let result = backtracker.find_max_path_on_grid(&g).unwrap();
        assert_eq!(result.weight.real_weight, 2.0);
        assert!(!result.weight.exceeds_limits());

        let consumed = result.path.iter()
            .filter(|e| e.edge.to.down > e.edge.from.down && e.edge_type == EdgeType::Normal)
            .count();
        assert_eq!(consumed, result.weight.down_consumed);

        let unlimited = ConsumptionLimits::new(down.len(), right.len());
        let g: GatedLocal = LocalAlignmentGraph::new(
            down.as_slice(),
            right.as_slice(),
            ConsumptionGatingScorer::new(unlimited, SimpleScorer::substitution(1.0, -1.0)),
            ConsumptionGatingScorer::new(unlimited, SimpleScorer::gap(-1.0)),
            ConsumptionGatingScorer::new(unlimited, SimpleScorer::freeride(0.0)),
        );

        let result = backtracker.find_max_path_on_grid(&g).unwrap();
        assert_eq!(result.weight.real_weight, 3.0);
        assert_eq!(result.weight.down_consumed, 3);
    }
}

use serde::Serialize;

use crate::graph::ElementOffsets;

/// Result of a pairwise alignment.
///
/// Every entry in `pairs` corresponds to one edge of the max weight path. Aligned elements are
/// `Some((Some(down), Some(right)))`, gaps leave one of the offsets empty, and freerides are
/// `None`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Alignment<W> {
    pub score: W,
    pub pairs: Vec<Option<ElementOffsets>>,
}

impl<W> Alignment<W> {
    pub fn new(score: W, pairs: Vec<Option<ElementOffsets>>) -> Self {
        Self { score, pairs }
    }

    /// Offsets of elements aligned to each other (matches and mismatches).
    pub fn aligned_pairs(&self) -> impl Iterator<Item=(usize, usize)> + '_ {
        self.pairs.iter()
            .filter_map(|pair| match pair {
                Some((Some(down), Some(right))) => Some((*down, *right)),
                _ => None,
            })
    }

    pub fn indel_count(&self) -> usize {
        self.pairs.iter()
            .filter(|pair| matches!(pair, Some((Some(_), None)) | Some((None, Some(_)))))
            .count()
    }

    pub fn freeride_count(&self) -> usize {
        self.pairs.iter()
            .filter(|pair| pair.is_none())
            .count()
    }
}

pub mod traits;
pub mod directed;
pub mod digraph;

#[cfg(test)]
pub(crate) mod mock;

pub use traits::{ElementOffsets, Graph, GraphId, PairwiseAlignmentGraph};
pub use directed::DirectedGraph;

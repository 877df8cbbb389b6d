use std::iter::StepBy;
use std::ops::Range;

use crate::graphs::freeride::{FreeRideAlignmentGraph, FreeRidePolicy};
use crate::graphs::{GridLayout, GridNode};

/// Local alignment: the alignment may start and end at any node.
///
/// The root has a freeride edge to every other node, and every node has a freeride edge to the
/// leaf. The root to leaf freeride exists only once.
pub struct Local;

impl FreeRidePolicy for Local {
    fn from_root_cells(layout: &GridLayout) -> StepBy<Range<usize>> {
        // Skip the root itself and the leaf, the latter is covered by the into-leaf set
        (1..layout.cell_count().saturating_sub(1)).step_by(1)
    }

    fn to_leaf_cells(layout: &GridLayout) -> StepBy<Range<usize>> {
        (0..layout.cell_count() - 1).step_by(1)
    }

    fn has_freeride_from_root(layout: &GridLayout, node: GridNode) -> bool {
        node != layout.root() && node != layout.leaf()
    }

    fn has_freeride_to_leaf(layout: &GridLayout, node: GridNode) -> bool {
        node != layout.leaf()
    }
}

pub type LocalAlignmentGraph<'s, D, R, W, S, G, F> = FreeRideAlignmentGraph<'s, D, R, W, S, G, F, Local>;

#[cfg(test)]
mod tests {
    use super::LocalAlignmentGraph;
    use crate::graph::{Graph, PairwiseAlignmentGraph};
    use crate::graphs::freeride::assert_consistent;
    use crate::graphs::{EdgeType, GridNode, TypedEdge};
    use crate::scoring::SimpleScorer;

    type TestGraph<'a> = LocalAlignmentGraph<'a, u8, u8, f64, SimpleScorer<f64>, SimpleScorer<f64>, SimpleScorer<f64>>;

    fn graph<'a>(down: &'a [u8], right: &'a [u8]) -> TestGraph<'a> {
        LocalAlignmentGraph::new(
            down,
            right,
            SimpleScorer::substitution(1.0, -1.0),
            SimpleScorer::gap(-1.0),
            SimpleScorer::freeride(0.0),
        )
    }

    #[test]
    fn test_freerides() {
        let g = graph(b"ab", b"abc");
        let root = GridNode::new(0, 0);
        let leaf = GridNode::new(2, 3);

        // 12 nodes: 10 from the root (excluding root and leaf), 11 into the leaf
        assert_eq!(g.edge_count(), 23 + 10 + 11);
        assert_eq!(g.out_degree(root), 3 + 1 + 10);
        assert_eq!(g.in_degree(leaf), 3 + 11);
        assert_eq!(g.in_degree(GridNode::new(1, 1)), 3 + 1);
        assert_eq!(g.out_degree(GridNode::new(1, 1)), 3 + 1);

        let root_to_leaf = TypedEdge::free_ride(root, leaf);
        assert!(g.has_edge(root_to_leaf));
        assert_eq!(g.outputs(root).filter(|e| e.edge.to == leaf).count(), 1);
        assert!(!g.has_edge(TypedEdge::free_ride(GridNode::new(1, 1), GridNode::new(1, 2))));
        assert!(!g.has_edge(TypedEdge::free_ride(root, root)));

        assert_eq!(g.edge_data(root_to_leaf), 0.0);
        assert_eq!(g.edge_to_element_offsets(root_to_leaf), None);
    }

    #[test]
    fn test_enumeration_order() {
        let g = graph(b"a", b"a");
        let root = GridNode::new(0, 0);

        let types: Vec<_> = g.outputs(root).map(|e| e.edge_type).collect();
        assert_eq!(types, vec![
            EdgeType::Normal, EdgeType::Normal, EdgeType::Normal,
            EdgeType::FreeRide, EdgeType::FreeRide, EdgeType::FreeRide
        ]);
    }

    #[test]
    fn test_consistency() {
        assert_consistent(&graph(b"acgt", b"ag"));
        assert_consistent(&graph(b"", b"ag"));
        assert_consistent(&graph(b"", b""));
    }
}

use std::iter::StepBy;
use std::ops::Range;

use crate::graphs::freeride::{FreeRideAlignmentGraph, FreeRidePolicy};
use crate::graphs::{GridLayout, GridNode};

/// Overlap alignment: a suffix of the down sequence against a prefix of the right sequence.
///
/// Freerides go from the root to every node of the left column, and from every node of the
/// bottom row to the leaf.
pub struct Overlap;

impl FreeRidePolicy for Overlap {
    fn from_root_cells(layout: &GridLayout) -> StepBy<Range<usize>> {
        (layout.right_count..layout.cell_count()).step_by(layout.right_count)
    }

    fn to_leaf_cells(layout: &GridLayout) -> StepBy<Range<usize>> {
        let bottom_row = (layout.down_count - 1) * layout.right_count;
        (bottom_row..layout.cell_count() - 1).step_by(1)
    }

    fn has_freeride_from_root(_: &GridLayout, node: GridNode) -> bool {
        node.down > 0 && node.right == 0
    }

    fn has_freeride_to_leaf(layout: &GridLayout, node: GridNode) -> bool {
        node.down == layout.down_count - 1 && node.right + 1 < layout.right_count
    }
}

pub type OverlapAlignmentGraph<'s, D, R, W, S, G, F> = FreeRideAlignmentGraph<'s, D, R, W, S, G, F, Overlap>;

#[cfg(test)]
mod tests {
    use super::OverlapAlignmentGraph;
    use crate::graph::Graph;
    use crate::graphs::freeride::assert_consistent;
    use crate::graphs::{GridNode, TypedEdge};
    use crate::scoring::SimpleScorer;

    type TestGraph<'a> = OverlapAlignmentGraph<'a, u8, u8, i32, SimpleScorer<i32>, SimpleScorer<i32>, SimpleScorer<i32>>;

    fn graph<'a>(down: &'a [u8], right: &'a [u8]) -> TestGraph<'a> {
        OverlapAlignmentGraph::new(
            down,
            right,
            SimpleScorer::substitution(1, -1),
            SimpleScorer::gap(-1),
            SimpleScorer::freeride(0),
        )
    }

    #[test]
    fn test_freerides() {
        let g = graph(b"ttacg", b"acgcc");
        let root = GridNode::new(0, 0);
        let leaf = GridNode::new(5, 5);

        assert!(g.has_edge(TypedEdge::free_ride(root, GridNode::new(2, 0))));
        assert!(g.has_edge(TypedEdge::free_ride(GridNode::new(5, 3), leaf)));
        assert!(g.has_edge(TypedEdge::free_ride(GridNode::new(5, 0), leaf)));
        assert!(!g.has_edge(TypedEdge::free_ride(GridNode::new(4, 5), leaf)));
        assert!(!g.has_edge(TypedEdge::free_ride(root, GridNode::new(0, 3))));

        assert_eq!(g.edge_count(), g.edges().count());
        assert_eq!(g.in_degree(leaf), 3 + 5);
    }

    #[test]
    fn test_consistency() {
        assert_consistent(&graph(b"ttacg", b"acgcc"));
        assert_consistent(&graph(b"", b"acg"));
        assert_consistent(&graph(b"acg", b""));
        assert_consistent(&graph(b"", b""));
    }
}

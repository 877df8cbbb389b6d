use std::iter::StepBy;
use std::ops::Range;

use crate::graphs::freeride::{FreeRideAlignmentGraph, FreeRidePolicy};
use crate::graphs::{GridLayout, GridNode};

/// Fitting alignment: the right sequence is aligned in full against any substring of the
/// down sequence.
///
/// Freerides go from the root to every node of the left column, and from every node of the
/// right column to the leaf.
pub struct Fitting;

impl FreeRidePolicy for Fitting {
    fn from_root_cells(layout: &GridLayout) -> StepBy<Range<usize>> {
        // (d, 0) for d >= 1
        (layout.right_count..layout.cell_count()).step_by(layout.right_count)
    }

    fn to_leaf_cells(layout: &GridLayout) -> StepBy<Range<usize>> {
        // (d, right_count - 1) for d < down_count - 1. With an empty right sequence that
        // column is the left column, and the root to leaf freeride is already in the set above.
        let first = if layout.right_count == 1 { 1 } else { layout.right_count - 1 };
        (first..layout.cell_count() - 1).step_by(layout.right_count)
    }

    fn has_freeride_from_root(_: &GridLayout, node: GridNode) -> bool {
        node.down > 0 && node.right == 0
    }

    fn has_freeride_to_leaf(layout: &GridLayout, node: GridNode) -> bool {
        node.right == layout.right_count - 1
            && node.down + 1 < layout.down_count
            && node != layout.root()
    }
}

pub type FittingAlignmentGraph<'s, D, R, W, S, G, F> = FreeRideAlignmentGraph<'s, D, R, W, S, G, F, Fitting>;

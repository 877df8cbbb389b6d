//! Alignment graph generators
//!
//! Each generator turns two sequences and a set of scorers into an implicit DAG. Nothing is
//! materialized: node and edge existence is checked with arithmetic on grid coordinates, and
//! edge weights are computed on request.

pub mod global;
pub mod freeride;
pub mod local;
pub mod fitting;
pub mod overlap;
pub mod extended_gap;
pub mod views;

use std::iter::StepBy;
use std::ops::Range;

use serde::Serialize;
use smallvec::SmallVec;

use crate::graph::ElementOffsets;
use crate::scoring::Scorer;

pub use global::GlobalAlignmentGraph;
pub use local::LocalAlignmentGraph;
pub use fitting::FittingAlignmentGraph;
pub use overlap::OverlapAlignmentGraph;
pub use extended_gap::{ExtendedGapAlignmentGraph, Layer, LayerEdge, LayerNode};
pub use views::{suffix, PrefixGraph, ReversedGraph, SuffixGraph};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct GridNode {
    pub down: usize,
    pub right: usize,
}

impl GridNode {
    #[inline]
    pub const fn new(down: usize, right: usize) -> Self {
        Self { down, right }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct GridEdge {
    pub from: GridNode,
    pub to: GridNode,
}

impl GridEdge {
    #[inline]
    pub const fn new(from: GridNode, to: GridNode) -> Self {
        Self { from, to }
    }
}

/// Distinguishes freeride edges from regular grid edges. A freeride edge can share both
/// endpoints with a regular edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum EdgeType {
    FreeRide,
    Normal,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TypedEdge {
    pub edge_type: EdgeType,
    pub edge: GridEdge,
}

impl TypedEdge {
    #[inline]
    pub const fn normal(edge: GridEdge) -> Self {
        Self { edge_type: EdgeType::Normal, edge }
    }

    #[inline]
    pub const fn free_ride(from: GridNode, to: GridNode) -> Self {
        Self { edge_type: EdgeType::FreeRide, edge: GridEdge::new(from, to) }
    }
}

pub(crate) type GridEdgeVec = SmallVec<[GridEdge; 3]>;

/// Dimensions of a plain 2D alignment grid, where each node connects to its right, lower and
/// lower-right neighbour.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridLayout {
    pub down_count: usize,
    pub right_count: usize,
}

impl GridLayout {
    pub fn new(down_len: usize, right_len: usize) -> Self {
        Self {
            down_count: down_len + 1,
            right_count: right_len + 1,
        }
    }

    #[inline]
    pub fn root(&self) -> GridNode {
        GridNode::new(0, 0)
    }

    #[inline]
    pub fn leaf(&self) -> GridNode {
        GridNode::new(self.down_count - 1, self.right_count - 1)
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.down_count * self.right_count
    }

    #[inline]
    pub fn node_at(&self, cell_index: usize) -> GridNode {
        GridNode::new(cell_index / self.right_count, cell_index % self.right_count)
    }

    #[inline]
    pub fn has_node(&self, node: GridNode) -> bool {
        node.down < self.down_count && node.right < self.right_count
    }

    pub fn has_edge(&self, edge: &GridEdge) -> bool {
        if !self.has_node(edge.from) || !self.has_node(edge.to) {
            return false;
        }

        matches!(
            (edge.to.down.checked_sub(edge.from.down), edge.to.right.checked_sub(edge.from.right)),
            (Some(0), Some(1)) | (Some(1), Some(0)) | (Some(1), Some(1))
        )
    }

    pub fn nodes(&self) -> GridNodes {
        GridNodes {
            next: 0,
            end: self.cell_count(),
            right_count: self.right_count,
        }
    }

    pub fn edges(&self) -> GridEdges {
        GridEdges {
            layout: *self,
            nodes: self.nodes(),
            current: GridEdgeVec::new().into_iter(),
        }
    }

    pub fn edge_count(&self) -> usize {
        let (d, r) = (self.down_count, self.right_count);
        (d - 1) * r + d * (r - 1) + (d - 1) * (r - 1)
    }

    /// Outgoing edges, in the order right, down, diagonal.
    pub fn outputs(&self, node: GridNode) -> GridEdgeVec {
        let mut edges = GridEdgeVec::new();
        let can_right = node.right + 1 < self.right_count;
        let can_down = node.down + 1 < self.down_count;

        if can_right {
            edges.push(GridEdge::new(node, GridNode::new(node.down, node.right + 1)));
        }

        if can_down {
            edges.push(GridEdge::new(node, GridNode::new(node.down + 1, node.right)));
        }

        if can_right && can_down {
            edges.push(GridEdge::new(node, GridNode::new(node.down + 1, node.right + 1)));
        }

        edges
    }

    /// Incoming edges, in the order from left, from above, from the diagonal.
    pub fn inputs(&self, node: GridNode) -> GridEdgeVec {
        let mut edges = GridEdgeVec::new();

        if node.right > 0 {
            edges.push(GridEdge::new(GridNode::new(node.down, node.right - 1), node));
        }

        if node.down > 0 {
            edges.push(GridEdge::new(GridNode::new(node.down - 1, node.right), node));
        }

        if node.down > 0 && node.right > 0 {
            edges.push(GridEdge::new(GridNode::new(node.down - 1, node.right - 1), node));
        }

        edges
    }

    pub fn in_degree(&self, node: GridNode) -> usize {
        usize::from(node.right > 0) + usize::from(node.down > 0) + usize::from(node.down > 0 && node.right > 0)
    }

    pub fn out_degree(&self, node: GridNode) -> usize {
        let can_right = node.right + 1 < self.right_count;
        let can_down = node.down + 1 < self.down_count;

        usize::from(can_right) + usize::from(can_down) + usize::from(can_right && can_down)
    }

    /// Longest root to leaf path, in edges
    pub fn path_edge_capacity(&self) -> usize {
        (self.down_count - 1) + (self.right_count - 1)
    }
}

/// Sequence offsets consumed by a grid edge. The edge into `(d, r)` consumes down element
/// `d - 1` if it moves down, and right element `r - 1` if it moves right.
#[inline]
pub fn grid_edge_offsets(edge: &GridEdge) -> ElementOffsets {
    let down = (edge.to.down > edge.from.down).then_some(edge.from.down);
    let right = (edge.to.right > edge.from.right).then_some(edge.from.right);

    (down, right)
}

/// Score an edge that consumes the elements at `offsets`. Edges consuming both elements go to
/// the substitution scorer, the others to the gap scorer.
#[inline]
pub(crate) fn score_elements<E, D, R, W, S, G>(
    edge: &E,
    offsets: ElementOffsets,
    down_seq: &[D],
    right_seq: &[R],
    substitution_scorer: &S,
    gap_scorer: &G,
) -> W
where
    S: Scorer<E, D, R, W>,
    G: Scorer<E, D, R, W>,
{
    let down = offsets.0.and_then(|i| down_seq.get(i));
    let right = offsets.1.and_then(|i| right_seq.get(i));

    match (down, right) {
        (Some(_), Some(_)) => substitution_scorer.score(edge, down, right),
        _ => gap_scorer.score(edge, down, right),
    }
}

/// Row-major enumeration of all grid nodes.
#[derive(Clone, Debug)]
pub struct GridNodes {
    next: usize,
    end: usize,
    right_count: usize,
}

impl Iterator for GridNodes {
    type Item = GridNode;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }

        let ix = self.next;
        self.next += 1;

        Some(GridNode::new(ix / self.right_count, ix % self.right_count))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GridNodes { }

/// All grid edges, grouped by source node.
#[derive(Clone, Debug)]
pub struct GridEdges {
    layout: GridLayout,
    nodes: GridNodes,
    current: smallvec::IntoIter<[GridEdge; 3]>,
}

impl Iterator for GridEdges {
    type Item = GridEdge;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(edge) = self.current.next() {
                return Some(edge);
            }

            let node = self.nodes.next()?;
            self.current = self.layout.outputs(node).into_iter();
        }
    }
}

/// Freeride edges between one fixed node (the root or the leaf) and a strided range of cells.
#[derive(Clone, Debug)]
pub struct FreeRides {
    cells: StepBy<Range<usize>>,
    layout: GridLayout,
    anchor: GridNode,
    into_anchor: bool,
}

impl FreeRides {
    /// Edges from `anchor` to each cell in `cells`
    pub fn from_anchor(layout: GridLayout, anchor: GridNode, cells: StepBy<Range<usize>>) -> Self {
        Self { cells, layout, anchor, into_anchor: false }
    }

    /// Edges from each cell in `cells` to `anchor`
    pub fn into_anchor(layout: GridLayout, anchor: GridNode, cells: StepBy<Range<usize>>) -> Self {
        Self { cells, layout, anchor, into_anchor: true }
    }

    pub fn empty(layout: GridLayout) -> Self {
        Self::from_anchor(layout, layout.root(), (0..0).step_by(1))
    }
}

impl Iterator for FreeRides {
    type Item = TypedEdge;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.layout.node_at(self.cells.next()?);

        Some(if self.into_anchor {
            TypedEdge::free_ride(node, self.anchor)
        } else {
            TypedEdge::free_ride(self.anchor, node)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.cells.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::{grid_edge_offsets, GridEdge, GridLayout, GridNode};

    #[test]
    fn test_layout_counts() {
        let layout = GridLayout::new(2, 3);

        assert_eq!(layout.down_count, 3);
        assert_eq!(layout.right_count, 4);
        assert_eq!(layout.nodes().count(), 12);
        assert_eq!(layout.edges().count(), layout.edge_count());
        assert_eq!(layout.edge_count(), 3 * 4 * 3 - 3 - 2 * 2 - 3 * 2);

        for node in layout.nodes() {
            assert_eq!(layout.in_degree(node), layout.inputs(node).len());
            assert_eq!(layout.out_degree(node), layout.outputs(node).len());
        }
    }

    #[test]
    fn test_layout_edges() {
        let layout = GridLayout::new(1, 1);
        let root = GridNode::new(0, 0);

        let outputs: Vec<_> = layout.outputs(root).into_iter().map(|e| e.to).collect();
        assert_eq!(outputs, vec![GridNode::new(0, 1), GridNode::new(1, 0), GridNode::new(1, 1)]);

        let inputs: Vec<_> = layout.inputs(layout.leaf()).into_iter().map(|e| e.from).collect();
        assert_eq!(inputs, vec![GridNode::new(1, 0), GridNode::new(0, 1), GridNode::new(0, 0)]);

        assert!(layout.has_edge(&GridEdge::new(root, GridNode::new(1, 1))));
        assert!(!layout.has_edge(&GridEdge::new(GridNode::new(1, 1), root)));
        assert!(!layout.has_edge(&GridEdge::new(root, GridNode::new(2, 1))));
        assert!(!layout.has_edge(&GridEdge::new(root, root)));
    }

    #[test]
    fn test_grid_edge_offsets() {
        let diag = GridEdge::new(GridNode::new(2, 3), GridNode::new(3, 4));
        let down = GridEdge::new(GridNode::new(2, 3), GridNode::new(3, 3));
        let right = GridEdge::new(GridNode::new(2, 3), GridNode::new(2, 4));

        assert_eq!(grid_edge_offsets(&diag), (Some(2), Some(3)));
        assert_eq!(grid_edge_offsets(&down), (Some(2), None));
        assert_eq!(grid_edge_offsets(&right), (None, Some(3)));
    }
}

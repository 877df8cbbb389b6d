use std::iter::StepBy;
use std::marker::PhantomData;
use std::ops::Range;

use crate::graph::{ElementOffsets, Graph, PairwiseAlignmentGraph};
use crate::graphs::{
    grid_edge_offsets, score_elements, EdgeType, FreeRides, GridEdge, GridEdges, GridLayout,
    GridNode, GridNodes, TypedEdge,
};
use crate::scoring::{Scorer, Weight};

/// Decides which freeride edges a grid gets on top of the regular grid edges.
///
/// Freerides always start at the root or end at the leaf. Cell sets are given as strided ranges
/// of row-major cell indices.
pub trait FreeRidePolicy {
    /// Cells receiving a freeride edge from the root
    fn from_root_cells(layout: &GridLayout) -> StepBy<Range<usize>>;

    /// Cells with a freeride edge into the leaf
    fn to_leaf_cells(layout: &GridLayout) -> StepBy<Range<usize>>;

    fn has_freeride_from_root(layout: &GridLayout, node: GridNode) -> bool;
    fn has_freeride_to_leaf(layout: &GridLayout, node: GridNode) -> bool;
}

/// A global alignment grid extended with freeride edges, allowing the alignment to start or end
/// away from the grid corners.
pub struct FreeRideAlignmentGraph<'s, D, R, W, S, G, F, P> {
    down: &'s [D],
    right: &'s [R],
    substitution_scorer: S,
    gap_scorer: G,
    freeride_scorer: F,
    layout: GridLayout,
    dummy: PhantomData<(W, P)>,
}

impl<'s, D, R, W, S, G, F, P> FreeRideAlignmentGraph<'s, D, R, W, S, G, F, P>
where
    W: Weight,
    S: Scorer<TypedEdge, D, R, W>,
    G: Scorer<TypedEdge, D, R, W>,
    F: Scorer<TypedEdge, D, R, W>,
    P: FreeRidePolicy,
{
    pub fn new(down: &'s [D], right: &'s [R], substitution_scorer: S, gap_scorer: G, freeride_scorer: F) -> Self {
        Self {
            down,
            right,
            substitution_scorer,
            gap_scorer,
            freeride_scorer,
            layout: GridLayout::new(down.len(), right.len()),
            dummy: PhantomData,
        }
    }

    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    fn from_root_rides(&self) -> FreeRides {
        FreeRides::from_anchor(self.layout, self.layout.root(), P::from_root_cells(&self.layout))
    }

    fn to_leaf_rides(&self) -> FreeRides {
        FreeRides::into_anchor(self.layout, self.layout.leaf(), P::to_leaf_cells(&self.layout))
    }

    fn is_freeride(&self, edge: &TypedEdge) -> bool {
        let (from, to) = (edge.edge.from, edge.edge.to);
        if !self.layout.has_node(from) || !self.layout.has_node(to) {
            return false;
        }

        (from == self.layout.root() && P::has_freeride_from_root(&self.layout, to))
            || (to == self.layout.leaf() && P::has_freeride_to_leaf(&self.layout, from))
    }
}

impl<D, R, W, S, G, F, P> Graph for FreeRideAlignmentGraph<'_, D, R, W, S, G, F, P>
where
    W: Weight,
    S: Scorer<TypedEdge, D, R, W>,
    G: Scorer<TypedEdge, D, R, W>,
    F: Scorer<TypedEdge, D, R, W>,
    P: FreeRidePolicy,
{
    type Node = GridNode;
    type Edge = TypedEdge;
    type EdgeData = W;

    type NodeIter<'a> = GridNodes
        where Self: 'a;
    type EdgeIter<'a> = TypedEdges
        where Self: 'a;
    type Inputs<'a> = TypedEdges
        where Self: 'a;
    type Outputs<'a> = TypedEdges
        where Self: 'a;

    fn nodes(&self) -> Self::NodeIter<'_> {
        self.layout.nodes()
    }

    fn edges(&self) -> Self::EdgeIter<'_> {
        TypedEdges {
            normal: NormalEdges::All(self.layout.edges()),
            single: None,
            rides: self.from_root_rides(),
            extra_rides: Some(self.to_leaf_rides()),
        }
    }

    fn node_count(&self) -> usize {
        self.layout.cell_count()
    }

    fn edge_count(&self) -> usize {
        self.layout.edge_count()
            + self.from_root_rides().size_hint().0
            + self.to_leaf_rides().size_hint().0
    }

    fn root_node(&self) -> Option<GridNode> {
        Some(self.layout.root())
    }

    fn leaf_node(&self) -> Option<GridNode> {
        Some(self.layout.leaf())
    }

    /// Regular edges first, then a freeride from the root, then (for the leaf) all freerides
    /// into the leaf.
    fn inputs(&self, node: GridNode) -> Self::Inputs<'_> {
        debug_assert!(self.has_node(node), "Node doesn't exist: {node:?}");
        let from_root = (node != self.layout.root() && P::has_freeride_from_root(&self.layout, node))
            .then(|| TypedEdge::free_ride(self.layout.root(), node));
        let rides = if node == self.layout.leaf() {
            self.to_leaf_rides()
        } else {
            FreeRides::empty(self.layout)
        };

        TypedEdges {
            normal: NormalEdges::Cell(self.layout.inputs(node).into_iter()),
            single: from_root,
            rides,
            extra_rides: None,
        }
    }

    /// Regular edges first, then a freeride to the leaf, then (for the root) all freerides
    /// leaving the root.
    fn outputs(&self, node: GridNode) -> Self::Outputs<'_> {
        debug_assert!(self.has_node(node), "Node doesn't exist: {node:?}");
        let to_leaf = (node != self.layout.leaf() && P::has_freeride_to_leaf(&self.layout, node))
            .then(|| TypedEdge::free_ride(node, self.layout.leaf()));
        let rides = if node == self.layout.root() {
            self.from_root_rides()
        } else {
            FreeRides::empty(self.layout)
        };

        TypedEdges {
            normal: NormalEdges::Cell(self.layout.outputs(node).into_iter()),
            single: to_leaf,
            rides,
            extra_rides: None,
        }
    }

    fn edge_from(&self, edge: TypedEdge) -> GridNode {
        debug_assert!(self.has_edge(edge), "Edge doesn't exist: {edge:?}");
        edge.edge.from
    }

    fn edge_to(&self, edge: TypedEdge) -> GridNode {
        debug_assert!(self.has_edge(edge), "Edge doesn't exist: {edge:?}");
        edge.edge.to
    }

    fn edge_data(&self, edge: TypedEdge) -> W {
        debug_assert!(self.has_edge(edge), "Edge doesn't exist: {edge:?}");
        match edge.edge_type {
            EdgeType::FreeRide => self.freeride_scorer.score(&edge, None, None),
            EdgeType::Normal => score_elements(&edge, grid_edge_offsets(&edge.edge), self.down, self.right,
                                               &self.substitution_scorer, &self.gap_scorer),
        }
    }

    fn has_node(&self, node: GridNode) -> bool {
        self.layout.has_node(node)
    }

    fn has_edge(&self, edge: TypedEdge) -> bool {
        match edge.edge_type {
            EdgeType::Normal => self.layout.has_edge(&edge.edge),
            EdgeType::FreeRide => self.is_freeride(&edge),
        }
    }
}

impl<D, R, W, S, G, F, P> PairwiseAlignmentGraph for FreeRideAlignmentGraph<'_, D, R, W, S, G, F, P>
where
    W: Weight,
    S: Scorer<TypedEdge, D, R, W>,
    G: Scorer<TypedEdge, D, R, W>,
    F: Scorer<TypedEdge, D, R, W>,
    P: FreeRidePolicy,
{
    const DEPTH_COUNT: usize = 1;

    type CellNodes = std::option::IntoIter<GridNode>;

    fn down_count(&self) -> usize {
        self.layout.down_count
    }

    fn right_count(&self) -> usize {
        self.layout.right_count
    }

    /// Regular path plus a freeride at either end
    fn path_edge_capacity(&self) -> usize {
        self.layout.path_edge_capacity() + 2
    }

    fn node_incoming_edge_capacity(&self) -> usize {
        3 + self.to_leaf_rides().size_hint().0.max(1)
    }

    fn node_outgoing_edge_capacity(&self) -> usize {
        3 + self.from_root_rides().size_hint().0 + 1
    }

    fn node_to_grid_offset(&self, node: GridNode) -> (usize, usize, usize) {
        (node.down, node.right, 0)
    }

    fn grid_offset_to_nodes(&self, down: usize, right: usize) -> Self::CellNodes {
        let node = GridNode::new(down, right);
        self.layout.has_node(node).then_some(node).into_iter()
    }

    fn edge_to_element_offsets(&self, edge: TypedEdge) -> Option<ElementOffsets> {
        debug_assert!(self.has_edge(edge), "Edge doesn't exist: {edge:?}");
        match edge.edge_type {
            EdgeType::FreeRide => None,
            EdgeType::Normal => Some(grid_edge_offsets(&edge.edge)),
        }
    }
}

#[derive(Clone, Debug)]
enum NormalEdges {
    Cell(smallvec::IntoIter<[GridEdge; 3]>),
    All(GridEdges),
}

impl Iterator for NormalEdges {
    type Item = TypedEdge;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Cell(edges) => edges.next(),
            Self::All(edges) => edges.next(),
        }.map(TypedEdge::normal)
    }
}

/// Regular grid edges followed by freeride edges.
#[derive(Clone, Debug)]
pub struct TypedEdges {
    normal: NormalEdges,
    single: Option<TypedEdge>,
    rides: FreeRides,
    extra_rides: Option<FreeRides>,
}

impl Iterator for TypedEdges {
    type Item = TypedEdge;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(edge) = self.normal.next() {
            return Some(edge);
        }

        if let Some(edge) = self.single.take() {
            return Some(edge);
        }

        if let Some(edge) = self.rides.next() {
            return Some(edge);
        }

        self.extra_rides.as_mut()?.next()
    }
}

/// Test helper shared by the freeride variants: checks that enumerations agree with the
/// membership tests.
#[cfg(test)]
pub(crate) fn assert_consistent<G>(g: &G)
    where G: Graph<Node=GridNode, Edge=TypedEdge>
{
    use std::collections::BTreeSet;

    let edges: BTreeSet<_> = g.edges().collect();
    assert_eq!(edges.len(), g.edge_count(), "duplicate or miscounted edges");

    for edge in &edges {
        assert!(g.has_edge(*edge), "{edge:?} enumerated but not a member");
        assert_eq!(g.outputs(edge.edge.from).filter(|e| e == edge).count(), 1);
        assert_eq!(g.inputs(edge.edge.to).filter(|e| e == edge).count(), 1);
    }

    let total_out: usize = g.nodes().map(|n| g.out_degree(n)).sum();
    let total_in: usize = g.nodes().map(|n| g.in_degree(n)).sum();
    assert_eq!(total_out, edges.len());
    assert_eq!(total_in, edges.len());
}

use std::marker::PhantomData;

use serde::Serialize;
use smallvec::SmallVec;

use crate::graph::{ElementOffsets, Graph, PairwiseAlignmentGraph};
use crate::graphs::{score_elements, GridLayout, GridNodes};
use crate::scoring::{Scorer, Weight};

/// Gap state of a node. The discriminant order is the topological order of the nodes sharing
/// a grid cell: the gap layers close into the diagonal layer of the same cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Layer {
    /// Inside a gap in the right sequence (moving down)
    Down,

    /// Inside a gap in the down sequence (moving right)
    Right,

    /// Both sequences consumed up to this cell
    Diagonal,
}

impl Layer {
    #[inline]
    pub fn depth(&self) -> usize {
        match self {
            Self::Down => 0,
            Self::Right => 1,
            Self::Diagonal => 2,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LayerNode {
    pub down: usize,
    pub right: usize,
    pub layer: Layer,
}

impl LayerNode {
    #[inline]
    pub const fn new(layer: Layer, down: usize, right: usize) -> Self {
        Self { down, right, layer }
    }

    #[inline]
    pub const fn diagonal(down: usize, right: usize) -> Self {
        Self::new(Layer::Diagonal, down, right)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LayerEdge {
    pub from: LayerNode,
    pub to: LayerNode,
}

impl LayerEdge {
    #[inline]
    pub const fn new(from: LayerNode, to: LayerNode) -> Self {
        Self { from, to }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum EdgeKind {
    Substitution,
    InitialGap,
    ExtendedGap,
    FreeRide,
}

type LayerNodeVec = SmallVec<[LayerNode; 3]>;
type LayerEdgeVec = SmallVec<[LayerEdge; 3]>;

/// Structure of the three-layer grid, independent of sequences and scoring.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct LayerGrid {
    layout: GridLayout,
}

impl LayerGrid {
    fn has_node(&self, node: LayerNode) -> bool {
        if node.down >= self.layout.down_count || node.right >= self.layout.right_count {
            return false;
        }

        match node.layer {
            Layer::Diagonal => true,
            Layer::Down => node.down > 0,
            Layer::Right => node.right > 0,
        }
    }

    fn edge_kind(&self, edge: &LayerEdge) -> Option<EdgeKind> {
        let (from, to) = (edge.from, edge.to);
        if !self.has_node(from) || !self.has_node(to) {
            return None;
        }

        let step_down = to.down == from.down + 1 && to.right == from.right;
        let step_right = to.down == from.down && to.right == from.right + 1;
        let same_cell = to.down == from.down && to.right == from.right;

        match (from.layer, to.layer) {
            (Layer::Diagonal, Layer::Diagonal) if to.down == from.down + 1 && to.right == from.right + 1 =>
                Some(EdgeKind::Substitution),
            (Layer::Diagonal, Layer::Down) if step_down => Some(EdgeKind::InitialGap),
            (Layer::Diagonal, Layer::Right) if step_right => Some(EdgeKind::InitialGap),
            (Layer::Down, Layer::Down) if step_down => Some(EdgeKind::ExtendedGap),
            (Layer::Right, Layer::Right) if step_right => Some(EdgeKind::ExtendedGap),
            (Layer::Down, Layer::Diagonal) | (Layer::Right, Layer::Diagonal) if same_cell =>
                Some(EdgeKind::FreeRide),
            _ => None
        }
    }

    /// Nodes of a cell in topological order
    fn cell_nodes(&self, down: usize, right: usize) -> LayerNodeVec {
        [Layer::Down, Layer::Right, Layer::Diagonal].into_iter()
            .map(|layer| LayerNode::new(layer, down, right))
            .filter(|n| self.has_node(*n))
            .collect()
    }

    fn outputs(&self, node: LayerNode) -> LayerEdgeVec {
        let mut edges = LayerEdgeVec::new();
        if !self.has_node(node) {
            return edges;
        }

        let (d, r) = (node.down, node.right);
        let can_down = d + 1 < self.layout.down_count;
        let can_right = r + 1 < self.layout.right_count;

        match node.layer {
            Layer::Diagonal => {
                if can_down && can_right {
                    edges.push(LayerEdge::new(node, LayerNode::diagonal(d + 1, r + 1)));
                }

                if can_down {
                    edges.push(LayerEdge::new(node, LayerNode::new(Layer::Down, d + 1, r)));
                }

                if can_right {
                    edges.push(LayerEdge::new(node, LayerNode::new(Layer::Right, d, r + 1)));
                }
            },
            Layer::Down => {
                if can_down {
                    edges.push(LayerEdge::new(node, LayerNode::new(Layer::Down, d + 1, r)));
                }

                edges.push(LayerEdge::new(node, LayerNode::diagonal(d, r)));
            },
            Layer::Right => {
                if can_right {
                    edges.push(LayerEdge::new(node, LayerNode::new(Layer::Right, d, r + 1)));
                }

                edges.push(LayerEdge::new(node, LayerNode::diagonal(d, r)));
            },
        }

        edges
    }

    fn inputs(&self, node: LayerNode) -> LayerEdgeVec {
        let mut edges = LayerEdgeVec::new();
        if !self.has_node(node) {
            return edges;
        }

        let (d, r) = (node.down, node.right);

        match node.layer {
            Layer::Diagonal => {
                if d > 0 && r > 0 {
                    edges.push(LayerEdge::new(LayerNode::diagonal(d - 1, r - 1), node));
                }

                if d > 0 {
                    edges.push(LayerEdge::new(LayerNode::new(Layer::Down, d, r), node));
                }

                if r > 0 {
                    edges.push(LayerEdge::new(LayerNode::new(Layer::Right, d, r), node));
                }
            },
            Layer::Down => {
                edges.push(LayerEdge::new(LayerNode::diagonal(d - 1, r), node));

                if d > 1 {
                    edges.push(LayerEdge::new(LayerNode::new(Layer::Down, d - 1, r), node));
                }
            },
            Layer::Right => {
                edges.push(LayerEdge::new(LayerNode::diagonal(d, r - 1), node));

                if r > 1 {
                    edges.push(LayerEdge::new(LayerNode::new(Layer::Right, d, r - 1), node));
                }
            },
        }

        edges
    }

    fn node_count(&self) -> usize {
        let (d, r) = (self.layout.down_count, self.layout.right_count);
        d * r + (d - 1) * r + d * (r - 1)
    }

    fn edge_count(&self) -> usize {
        let (d, r) = (self.layout.down_count, self.layout.right_count);

        let substitutions = (d - 1) * (r - 1);
        let gap_opens = (d - 1) * r + d * (r - 1);
        let gap_extends = d.saturating_sub(2) * r + d * r.saturating_sub(2);
        let gap_closes = (d - 1) * r + d * (r - 1);

        substitutions + gap_opens + gap_extends + gap_closes
    }
}

/// Alignment graph with separate gap-open and gap-extend weights (affine gaps).
///
/// Every grid cell has a DIAGONAL node. Cells below the first row also have a DOWN node, and
/// cells right of the first column a RIGHT node. A gap is opened by moving from the DIAGONAL
/// layer into a gap layer, extended by moving within the gap layer, and closed by a freeride
/// back into the DIAGONAL node of the same cell.
pub struct ExtendedGapAlignmentGraph<'s, D, R, W, S, G, X, F> {
    down: &'s [D],
    right: &'s [R],
    substitution_scorer: S,
    initial_gap_scorer: G,
    extended_gap_scorer: X,
    freeride_scorer: F,
    grid: LayerGrid,
    dummy: PhantomData<W>,
}

impl<'s, D, R, W, S, G, X, F> ExtendedGapAlignmentGraph<'s, D, R, W, S, G, X, F>
where
    W: Weight,
    S: Scorer<LayerEdge, D, R, W>,
    G: Scorer<LayerEdge, D, R, W>,
    X: Scorer<LayerEdge, D, R, W>,
    F: Scorer<LayerEdge, D, R, W>,
{
    pub fn new(
        down: &'s [D],
        right: &'s [R],
        substitution_scorer: S,
        initial_gap_scorer: G,
        extended_gap_scorer: X,
        freeride_scorer: F,
    ) -> Self {
        Self {
            down,
            right,
            substitution_scorer,
            initial_gap_scorer,
            extended_gap_scorer,
            freeride_scorer,
            grid: LayerGrid { layout: GridLayout::new(down.len(), right.len()) },
            dummy: PhantomData,
        }
    }

    pub fn layout(&self) -> GridLayout {
        self.grid.layout
    }

    fn offsets(edge: &LayerEdge, kind: EdgeKind) -> Option<ElementOffsets> {
        let (from, to) = (edge.from, edge.to);

        match kind {
            EdgeKind::FreeRide => None,
            _ => Some((
                (to.down > from.down).then_some(from.down),
                (to.right > from.right).then_some(from.right),
            )),
        }
    }
}

impl<D, R, W, S, G, X, F> Graph for ExtendedGapAlignmentGraph<'_, D, R, W, S, G, X, F>
where
    W: Weight,
    S: Scorer<LayerEdge, D, R, W>,
    G: Scorer<LayerEdge, D, R, W>,
    X: Scorer<LayerEdge, D, R, W>,
    F: Scorer<LayerEdge, D, R, W>,
{
    type Node = LayerNode;
    type Edge = LayerEdge;
    type EdgeData = W;

    type NodeIter<'a> = LayerNodes
        where Self: 'a;
    type EdgeIter<'a> = LayerEdges
        where Self: 'a;
    type Inputs<'a> = smallvec::IntoIter<[LayerEdge; 3]>
        where Self: 'a;
    type Outputs<'a> = smallvec::IntoIter<[LayerEdge; 3]>
        where Self: 'a;

    fn nodes(&self) -> Self::NodeIter<'_> {
        LayerNodes {
            grid: self.grid,
            cells: self.grid.layout.nodes(),
            current: LayerNodeVec::new().into_iter(),
        }
    }

    fn edges(&self) -> Self::EdgeIter<'_> {
        LayerEdges {
            grid: self.grid,
            nodes: self.nodes(),
            current: LayerEdgeVec::new().into_iter(),
        }
    }

    fn node_count(&self) -> usize {
        self.grid.node_count()
    }

    fn edge_count(&self) -> usize {
        self.grid.edge_count()
    }

    fn root_node(&self) -> Option<LayerNode> {
        Some(LayerNode::diagonal(0, 0))
    }

    fn leaf_node(&self) -> Option<LayerNode> {
        let leaf = self.grid.layout.leaf();
        Some(LayerNode::diagonal(leaf.down, leaf.right))
    }

    fn inputs(&self, node: LayerNode) -> Self::Inputs<'_> {
        debug_assert!(self.has_node(node), "Node doesn't exist: {node:?}");
        self.grid.inputs(node).into_iter()
    }

    fn outputs(&self, node: LayerNode) -> Self::Outputs<'_> {
        debug_assert!(self.has_node(node), "Node doesn't exist: {node:?}");
        self.grid.outputs(node).into_iter()
    }

    fn in_degree(&self, node: LayerNode) -> usize {
        self.grid.inputs(node).len()
    }

    fn out_degree(&self, node: LayerNode) -> usize {
        self.grid.outputs(node).len()
    }

    fn edge_from(&self, edge: LayerEdge) -> LayerNode {
        debug_assert!(self.has_edge(edge), "Edge doesn't exist: {edge:?}");
        edge.from
    }

    fn edge_to(&self, edge: LayerEdge) -> LayerNode {
        debug_assert!(self.has_edge(edge), "Edge doesn't exist: {edge:?}");
        edge.to
    }

    fn edge_data(&self, edge: LayerEdge) -> W {
        let Some(kind) = self.grid.edge_kind(&edge) else {
            debug_assert!(false, "Edge doesn't exist: {edge:?}");
            return W::zero();
        };

        let offsets = Self::offsets(&edge, kind).unwrap_or((None, None));
        match kind {
            EdgeKind::Substitution | EdgeKind::InitialGap =>
                score_elements(&edge, offsets, self.down, self.right,
                               &self.substitution_scorer, &self.initial_gap_scorer),
            EdgeKind::ExtendedGap =>
                score_elements(&edge, offsets, self.down, self.right,
                               &self.substitution_scorer, &self.extended_gap_scorer),
            EdgeKind::FreeRide => self.freeride_scorer.score(&edge, None, None),
        }
    }

    fn has_node(&self, node: LayerNode) -> bool {
        self.grid.has_node(node)
    }

    fn has_edge(&self, edge: LayerEdge) -> bool {
        self.grid.edge_kind(&edge).is_some()
    }
}

impl<D, R, W, S, G, X, F> PairwiseAlignmentGraph for ExtendedGapAlignmentGraph<'_, D, R, W, S, G, X, F>
where
    W: Weight,
    S: Scorer<LayerEdge, D, R, W>,
    G: Scorer<LayerEdge, D, R, W>,
    X: Scorer<LayerEdge, D, R, W>,
    F: Scorer<LayerEdge, D, R, W>,
{
    const DEPTH_COUNT: usize = 3;

    type CellNodes = smallvec::IntoIter<[LayerNode; 3]>;

    fn down_count(&self) -> usize {
        self.grid.layout.down_count
    }

    fn right_count(&self) -> usize {
        self.grid.layout.right_count
    }

    /// Each gap element takes two edges: into the gap layer and back out.
    fn path_edge_capacity(&self) -> usize {
        2 * (self.grid.layout.down_count - 1) + 2 * (self.grid.layout.right_count - 1)
    }

    fn node_incoming_edge_capacity(&self) -> usize {
        3
    }

    fn node_outgoing_edge_capacity(&self) -> usize {
        3
    }

    fn node_to_grid_offset(&self, node: LayerNode) -> (usize, usize, usize) {
        (node.down, node.right, node.layer.depth())
    }

    fn grid_offset_to_nodes(&self, down: usize, right: usize) -> Self::CellNodes {
        self.grid.cell_nodes(down, right).into_iter()
    }

    fn edge_to_element_offsets(&self, edge: LayerEdge) -> Option<ElementOffsets> {
        let kind = self.grid.edge_kind(&edge);
        debug_assert!(kind.is_some(), "Edge doesn't exist: {edge:?}");

        Self::offsets(&edge, kind?)
    }
}

/// All nodes, cell by cell in row-major order.
#[derive(Clone, Debug)]
pub struct LayerNodes {
    grid: LayerGrid,
    cells: GridNodes,
    current: smallvec::IntoIter<[LayerNode; 3]>,
}

impl Iterator for LayerNodes {
    type Item = LayerNode;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(node) = self.current.next() {
                return Some(node);
            }

            let cell = self.cells.next()?;
            self.current = self.grid.cell_nodes(cell.down, cell.right).into_iter();
        }
    }
}

#[derive(Clone, Debug)]
pub struct LayerEdges {
    grid: LayerGrid,
    nodes: LayerNodes,
    current: smallvec::IntoIter<[LayerEdge; 3]>,
}

impl Iterator for LayerEdges {
    type Item = LayerEdge;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(edge) = self.current.next() {
                return Some(edge);
            }

            let node = self.nodes.next()?;
            self.current = self.grid.outputs(node).into_iter();
        }
    }
}

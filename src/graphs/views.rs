//! Views over existing pairwise alignment graphs.
//!
//! [`ReversedGraph`] flips every edge, [`PrefixGraph`] keeps the top left corner of the grid and
//! [`SuffixGraph`] the bottom right corner. Views own the graph they wrap; pass a reference to
//! keep using the wrapped graph afterwards. Element offsets reported by a view always refer to
//! the sequences of the wrapped graph.

use std::iter::{Flatten, Rev};

use crate::errors::AlignerError;
use crate::graph::{ElementOffsets, Graph, PairwiseAlignmentGraph};

fn single<N: Copy>(nodes: Vec<N>) -> Option<N> {
    match nodes.as_slice() {
        [node] => Some(*node),
        _ => None,
    }
}

/// The wrapped graph with all edges flipped: its leaf becomes the root and vice versa.
///
/// Grid offsets are mirrored, such that the root still sits at `(0, 0)` and nodes sharing a
/// cell are listed in the reverse order, which keeps them topologically sorted.
#[derive(Clone, Debug)]
pub struct ReversedGraph<G> {
    graph: G,
}

impl<G: PairwiseAlignmentGraph> ReversedGraph<G> {
    pub fn new(graph: G) -> Self {
        Self { graph }
    }

    pub fn inner(&self) -> &G {
        &self.graph
    }

    pub fn into_inner(self) -> G {
        self.graph
    }
}

impl<G: PairwiseAlignmentGraph> Graph for ReversedGraph<G> {
    type Node = G::Node;
    type Edge = G::Edge;
    type EdgeData = G::EdgeData;

    type NodeIter<'a> = G::NodeIter<'a>
        where Self: 'a;
    type EdgeIter<'a> = G::EdgeIter<'a>
        where Self: 'a;
    type Inputs<'a> = G::Outputs<'a>
        where Self: 'a;
    type Outputs<'a> = G::Inputs<'a>
        where Self: 'a;

    fn nodes(&self) -> Self::NodeIter<'_> {
        self.graph.nodes()
    }

    fn edges(&self) -> Self::EdgeIter<'_> {
        self.graph.edges()
    }

    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn root_node(&self) -> Option<Self::Node> {
        self.graph.leaf_node()
    }

    fn leaf_node(&self) -> Option<Self::Node> {
        self.graph.root_node()
    }

    fn root_nodes(&self) -> Vec<Self::Node> {
        self.graph.leaf_nodes()
    }

    fn leaf_nodes(&self) -> Vec<Self::Node> {
        self.graph.root_nodes()
    }

    fn inputs(&self, node: Self::Node) -> Self::Inputs<'_> {
        self.graph.outputs(node)
    }

    fn outputs(&self, node: Self::Node) -> Self::Outputs<'_> {
        self.graph.inputs(node)
    }

    fn in_degree(&self, node: Self::Node) -> usize {
        self.graph.out_degree(node)
    }

    fn out_degree(&self, node: Self::Node) -> usize {
        self.graph.in_degree(node)
    }

    fn has_inputs(&self, node: Self::Node) -> bool {
        self.graph.has_outputs(node)
    }

    fn has_outputs(&self, node: Self::Node) -> bool {
        self.graph.has_inputs(node)
    }

    fn edge_from(&self, edge: Self::Edge) -> Self::Node {
        self.graph.edge_to(edge)
    }

    fn edge_to(&self, edge: Self::Edge) -> Self::Node {
        self.graph.edge_from(edge)
    }

    fn edge_data(&self, edge: Self::Edge) -> Self::EdgeData {
        self.graph.edge_data(edge)
    }

    fn has_node(&self, node: Self::Node) -> bool {
        self.graph.has_node(node)
    }

    fn has_edge(&self, edge: Self::Edge) -> bool {
        self.graph.has_edge(edge)
    }
}

impl<G> PairwiseAlignmentGraph for ReversedGraph<G>
where
    G: PairwiseAlignmentGraph,
    G::CellNodes: DoubleEndedIterator,
{
    const DEPTH_COUNT: usize = G::DEPTH_COUNT;

    type CellNodes = Flatten<std::option::IntoIter<Rev<G::CellNodes>>>;

    fn down_count(&self) -> usize {
        self.graph.down_count()
    }

    fn right_count(&self) -> usize {
        self.graph.right_count()
    }

    fn path_edge_capacity(&self) -> usize {
        self.graph.path_edge_capacity()
    }

    fn node_incoming_edge_capacity(&self) -> usize {
        self.graph.node_outgoing_edge_capacity()
    }

    fn node_outgoing_edge_capacity(&self) -> usize {
        self.graph.node_incoming_edge_capacity()
    }

    fn node_to_grid_offset(&self, node: Self::Node) -> (usize, usize, usize) {
        let (down, right, depth) = self.graph.node_to_grid_offset(node);

        (
            self.down_count() - 1 - down,
            self.right_count() - 1 - right,
            G::DEPTH_COUNT - 1 - depth,
        )
    }

    fn grid_offset_to_nodes(&self, down: usize, right: usize) -> Self::CellNodes {
        let mirrored = self.down_count().checked_sub(down + 1)
            .zip(self.right_count().checked_sub(right + 1));

        mirrored
            .map(|(d, r)| self.graph.grid_offset_to_nodes(d, r).rev())
            .into_iter()
            .flatten()
    }

    fn edge_to_element_offsets(&self, edge: Self::Edge) -> Option<ElementOffsets> {
        self.graph.edge_to_element_offsets(edge)
    }
}

/// Grid rows and columns kept by a [`PrefixGraph`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Clip {
    down_count: usize,
    right_count: usize,
}

impl Clip {
    #[inline]
    fn contains<G: PairwiseAlignmentGraph>(&self, graph: &G, node: G::Node) -> bool {
        let (down, right, _) = graph.node_to_grid_offset(node);
        down < self.down_count && right < self.right_count
    }

    #[inline]
    fn contains_edge<G: PairwiseAlignmentGraph>(&self, graph: &G, edge: G::Edge) -> bool {
        self.contains(graph, graph.edge_from(edge)) && self.contains(graph, graph.edge_to(edge))
    }
}

pub struct ClippedNodes<'a, G, I> {
    graph: &'a G,
    clip: Clip,
    nodes: I,
}

impl<G, I> Iterator for ClippedNodes<'_, G, I>
where
    G: PairwiseAlignmentGraph,
    I: Iterator<Item=G::Node>,
{
    type Item = G::Node;

    fn next(&mut self) -> Option<Self::Item> {
        let (graph, clip) = (self.graph, self.clip);
        self.nodes.find(|node| clip.contains(graph, *node))
    }
}

/// Edges of the wrapped graph with both endpoints inside the view.
pub struct ClippedEdges<'a, G, I> {
    graph: &'a G,
    clip: Clip,
    edges: I,
}

impl<G, I> Iterator for ClippedEdges<'_, G, I>
where
    G: PairwiseAlignmentGraph,
    I: Iterator<Item=G::Edge>,
{
    type Item = G::Edge;

    fn next(&mut self) -> Option<Self::Item> {
        let (graph, clip) = (self.graph, self.clip);
        self.edges.find(|edge| clip.contains_edge(graph, *edge))
    }
}

/// The top left `down_count` x `right_count` cells of the wrapped graph.
///
/// Edges leaving the kept cells are dropped. The root stays the same, the leaf is the last
/// node of the bottom right kept cell. Root and leaf are only reported when they are unique,
/// which may not hold for graphs with edges jumping across the grid (freerides).
#[derive(Clone, Debug)]
pub struct PrefixGraph<G> {
    graph: G,
    clip: Clip,
}

impl<G: PairwiseAlignmentGraph> PrefixGraph<G> {
    pub fn new(graph: G, down_count: usize, right_count: usize) -> Result<Self, AlignerError> {
        if down_count == 0 || right_count == 0
            || down_count > graph.down_count() || right_count > graph.right_count()
        {
            return Err(AlignerError::GridOutOfBounds { down_count, right_count });
        }

        Ok(Self { graph, clip: Clip { down_count, right_count } })
    }

    pub fn inner(&self) -> &G {
        &self.graph
    }

    pub fn into_inner(self) -> G {
        self.graph
    }
}

impl<G: PairwiseAlignmentGraph> Graph for PrefixGraph<G> {
    type Node = G::Node;
    type Edge = G::Edge;
    type EdgeData = G::EdgeData;

    type NodeIter<'a> = ClippedNodes<'a, G, G::NodeIter<'a>>
        where Self: 'a;
    type EdgeIter<'a> = ClippedEdges<'a, G, G::EdgeIter<'a>>
        where Self: 'a;
    type Inputs<'a> = ClippedEdges<'a, G, G::Inputs<'a>>
        where Self: 'a;
    type Outputs<'a> = ClippedEdges<'a, G, G::Outputs<'a>>
        where Self: 'a;

    fn nodes(&self) -> Self::NodeIter<'_> {
        ClippedNodes { graph: &self.graph, clip: self.clip, nodes: self.graph.nodes() }
    }

    fn edges(&self) -> Self::EdgeIter<'_> {
        ClippedEdges { graph: &self.graph, clip: self.clip, edges: self.graph.edges() }
    }

    fn root_node(&self) -> Option<Self::Node> {
        single(self.root_nodes())
    }

    fn leaf_node(&self) -> Option<Self::Node> {
        single(self.leaf_nodes())
    }

    fn inputs(&self, node: Self::Node) -> Self::Inputs<'_> {
        debug_assert!(self.has_node(node), "Node doesn't exist: {node:?}");
        ClippedEdges { graph: &self.graph, clip: self.clip, edges: self.graph.inputs(node) }
    }

    fn outputs(&self, node: Self::Node) -> Self::Outputs<'_> {
        debug_assert!(self.has_node(node), "Node doesn't exist: {node:?}");
        ClippedEdges { graph: &self.graph, clip: self.clip, edges: self.graph.outputs(node) }
    }

    fn edge_from(&self, edge: Self::Edge) -> Self::Node {
        debug_assert!(self.has_edge(edge), "Edge doesn't exist: {edge:?}");
        self.graph.edge_from(edge)
    }

    fn edge_to(&self, edge: Self::Edge) -> Self::Node {
        debug_assert!(self.has_edge(edge), "Edge doesn't exist: {edge:?}");
        self.graph.edge_to(edge)
    }

    fn edge_data(&self, edge: Self::Edge) -> Self::EdgeData {
        debug_assert!(self.has_edge(edge), "Edge doesn't exist: {edge:?}");
        self.graph.edge_data(edge)
    }

    fn has_node(&self, node: Self::Node) -> bool {
        self.graph.has_node(node) && self.clip.contains(&self.graph, node)
    }

    fn has_edge(&self, edge: Self::Edge) -> bool {
        self.graph.has_edge(edge) && self.clip.contains_edge(&self.graph, edge)
    }
}

impl<G: PairwiseAlignmentGraph> PairwiseAlignmentGraph for PrefixGraph<G> {
    const DEPTH_COUNT: usize = G::DEPTH_COUNT;

    type CellNodes = Flatten<std::option::IntoIter<G::CellNodes>>;

    fn down_count(&self) -> usize {
        self.clip.down_count
    }

    fn right_count(&self) -> usize {
        self.clip.right_count
    }

    /// Upper bound: any path of the view is a path of the wrapped graph.
    fn path_edge_capacity(&self) -> usize {
        self.graph.path_edge_capacity()
    }

    fn node_incoming_edge_capacity(&self) -> usize {
        self.graph.node_incoming_edge_capacity()
    }

    fn node_outgoing_edge_capacity(&self) -> usize {
        self.graph.node_outgoing_edge_capacity()
    }

    fn node_to_grid_offset(&self, node: Self::Node) -> (usize, usize, usize) {
        self.graph.node_to_grid_offset(node)
    }

    fn grid_offset_to_nodes(&self, down: usize, right: usize) -> Self::CellNodes {
        (down < self.clip.down_count && right < self.clip.right_count)
            .then(|| self.graph.grid_offset_to_nodes(down, right))
            .into_iter()
            .flatten()
    }

    fn edge_to_element_offsets(&self, edge: Self::Edge) -> Option<ElementOffsets> {
        self.graph.edge_to_element_offsets(edge)
    }
}

/// The bottom right `down_count` x `right_count` cells of a graph, with grid offsets relative
/// to the first kept cell.
///
/// Built as the reverse of a prefix of the reversed graph. For layered graphs every gap layer
/// node along the first kept row and column loses its inputs, so these views only have a
/// unique root when the wrapped graph has a single node per cell.
pub type SuffixGraph<G> = ReversedGraph<PrefixGraph<ReversedGraph<G>>>;

pub fn suffix<G>(graph: G, down_count: usize, right_count: usize) -> Result<SuffixGraph<G>, AlignerError>
where
    G: PairwiseAlignmentGraph,
    G::CellNodes: DoubleEndedIterator,
{
    let clipped = PrefixGraph::new(ReversedGraph::new(graph), down_count, right_count)?;
    Ok(ReversedGraph::new(clipped))
}

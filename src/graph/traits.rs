use std::fmt;
use std::hash::Hash;

/// Identity of a node or an edge. Ordering is used by the generic slot container, which keeps
/// its slots sorted to find them again with a binary search.
pub trait GraphId: fmt::Debug + Clone + Copy + PartialEq + Eq + PartialOrd + Ord + Hash {}

impl<T> GraphId for T
    where T: fmt::Debug + Clone + Copy + PartialEq + Eq + PartialOrd + Ord + Hash
{ }

/// Read-only directed graph.
///
/// All enumerations are lazy and borrow the graph. Implementations with an implicit structure
/// (the alignment grids) answer every query with arithmetic on the node coordinates.
pub trait Graph {
    type Node: GraphId;
    type Edge: GraphId;
    type EdgeData;

    type NodeIter<'a>: Iterator<Item=Self::Node> + 'a
        where Self: 'a;
    type EdgeIter<'a>: Iterator<Item=Self::Edge> + 'a
        where Self: 'a;
    type Inputs<'a>: Iterator<Item=Self::Edge> + 'a
        where Self: 'a;
    type Outputs<'a>: Iterator<Item=Self::Edge> + 'a
        where Self: 'a;

    fn nodes(&self) -> Self::NodeIter<'_>;
    fn edges(&self) -> Self::EdgeIter<'_>;

    fn node_count(&self) -> usize {
        self.nodes().count()
    }

    fn edge_count(&self) -> usize {
        self.edges().count()
    }

    /// The single node without inputs. `None` if the graph does not have exactly one.
    fn root_node(&self) -> Option<Self::Node>;

    /// The single node without outputs. `None` if the graph does not have exactly one.
    fn leaf_node(&self) -> Option<Self::Node>;

    fn root_nodes(&self) -> Vec<Self::Node> {
        self.nodes()
            .filter(|n| !self.has_inputs(*n))
            .collect()
    }

    fn leaf_nodes(&self) -> Vec<Self::Node> {
        self.nodes()
            .filter(|n| !self.has_outputs(*n))
            .collect()
    }

    fn inputs(&self, node: Self::Node) -> Self::Inputs<'_>;
    fn outputs(&self, node: Self::Node) -> Self::Outputs<'_>;

    fn in_degree(&self, node: Self::Node) -> usize {
        self.inputs(node).count()
    }

    fn out_degree(&self, node: Self::Node) -> usize {
        self.outputs(node).count()
    }

    fn has_inputs(&self, node: Self::Node) -> bool {
        self.inputs(node).next().is_some()
    }

    fn has_outputs(&self, node: Self::Node) -> bool {
        self.outputs(node).next().is_some()
    }

    fn edge_from(&self, edge: Self::Edge) -> Self::Node;
    fn edge_to(&self, edge: Self::Edge) -> Self::Node;
    fn edge_data(&self, edge: Self::Edge) -> Self::EdgeData;

    fn get_edge(&self, edge: Self::Edge) -> (Self::Node, Self::Node, Self::EdgeData) {
        (self.edge_from(edge), self.edge_to(edge), self.edge_data(edge))
    }

    fn has_node(&self, node: Self::Node) -> bool;
    fn has_edge(&self, edge: Self::Edge) -> bool;
}

/// Offsets into the two sequences consumed by an edge: `(down, right)`.
pub type ElementOffsets = (Option<usize>, Option<usize>);

/// A graph laid out on a `down_count` x `right_count` grid, where each grid cell holds up to
/// `DEPTH_COUNT` nodes.
///
/// Moving down consumes an element of the down sequence, moving right consumes an element of
/// the right sequence. Any number of layers (the depth) may share the same cell.
pub trait PairwiseAlignmentGraph: Graph {
    const DEPTH_COUNT: usize;

    type CellNodes: Iterator<Item=Self::Node>;

    fn down_count(&self) -> usize;
    fn right_count(&self) -> usize;

    /// Maximum number of edges on any root to leaf path.
    fn path_edge_capacity(&self) -> usize;

    fn node_incoming_edge_capacity(&self) -> usize;
    fn node_outgoing_edge_capacity(&self) -> usize;

    fn node_to_grid_offset(&self, node: Self::Node) -> (usize, usize, usize);

    /// Nodes at the given cell, in topological order among themselves.
    fn grid_offset_to_nodes(&self, down: usize, right: usize) -> Self::CellNodes;

    /// Sequence elements consumed by an edge, or `None` if the edge is a freeride.
    fn edge_to_element_offsets(&self, edge: Self::Edge) -> Option<ElementOffsets>;
}

impl<G: Graph + ?Sized> Graph for &G {
    type Node = G::Node;
    type Edge = G::Edge;
    type EdgeData = G::EdgeData;

    type NodeIter<'a> = G::NodeIter<'a>
        where Self: 'a;
    type EdgeIter<'a> = G::EdgeIter<'a>
        where Self: 'a;
    type Inputs<'a> = G::Inputs<'a>
        where Self: 'a;
    type Outputs<'a> = G::Outputs<'a>
        where Self: 'a;

    fn nodes(&self) -> Self::NodeIter<'_> {
        (**self).nodes()
    }

    fn edges(&self) -> Self::EdgeIter<'_> {
        (**self).edges()
    }

    fn node_count(&self) -> usize {
        (**self).node_count()
    }

    fn edge_count(&self) -> usize {
        (**self).edge_count()
    }

    fn root_node(&self) -> Option<Self::Node> {
        (**self).root_node()
    }

    fn leaf_node(&self) -> Option<Self::Node> {
        (**self).leaf_node()
    }

    fn root_nodes(&self) -> Vec<Self::Node> {
        (**self).root_nodes()
    }

    fn leaf_nodes(&self) -> Vec<Self::Node> {
        (**self).leaf_nodes()
    }

    fn inputs(&self, node: Self::Node) -> Self::Inputs<'_> {
        (**self).inputs(node)
    }

    fn outputs(&self, node: Self::Node) -> Self::Outputs<'_> {
        (**self).outputs(node)
    }

    fn in_degree(&self, node: Self::Node) -> usize {
        (**self).in_degree(node)
    }

    fn out_degree(&self, node: Self::Node) -> usize {
        (**self).out_degree(node)
    }

    fn has_inputs(&self, node: Self::Node) -> bool {
        (**self).has_inputs(node)
    }

    fn has_outputs(&self, node: Self::Node) -> bool {
        (**self).has_outputs(node)
    }

    fn edge_from(&self, edge: Self::Edge) -> Self::Node {
        (**self).edge_from(edge)
    }

    fn edge_to(&self, edge: Self::Edge) -> Self::Node {
        (**self).edge_to(edge)
    }

    fn edge_data(&self, edge: Self::Edge) -> Self::EdgeData {
        (**self).edge_data(edge)
    }

    fn has_node(&self, node: Self::Node) -> bool {
        (**self).has_node(node)
    }

    fn has_edge(&self, edge: Self::Edge) -> bool {
        (**self).has_edge(edge)
    }
}

impl<G: PairwiseAlignmentGraph + ?Sized> PairwiseAlignmentGraph for &G {
    const DEPTH_COUNT: usize = G::DEPTH_COUNT;

    type CellNodes = G::CellNodes;

    fn down_count(&self) -> usize {
        (**self).down_count()
    }

    fn right_count(&self) -> usize {
        (**self).right_count()
    }

    fn path_edge_capacity(&self) -> usize {
        (**self).path_edge_capacity()
    }

    fn node_incoming_edge_capacity(&self) -> usize {
        (**self).node_incoming_edge_capacity()
    }

    fn node_outgoing_edge_capacity(&self) -> usize {
        (**self).node_outgoing_edge_capacity()
    }

    fn node_to_grid_offset(&self, node: Self::Node) -> (usize, usize, usize) {
        (**self).node_to_grid_offset(node)
    }

    fn grid_offset_to_nodes(&self, down: usize, right: usize) -> Self::CellNodes {
        (**self).grid_offset_to_nodes(down, right)
    }

    fn edge_to_element_offsets(&self, edge: Self::Edge) -> Option<ElementOffsets> {
        (**self).edge_to_element_offsets(edge)
    }
}

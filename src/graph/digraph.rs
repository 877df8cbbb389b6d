use petgraph::graph::{DiGraph, EdgeIndex, EdgeIndices, Edges, IndexType, NodeIndex, NodeIndices};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};

use crate::graph::traits::Graph;

/// Iterator over the ids of a node's incoming or outgoing edges.
pub struct EdgeIds<'a, E, Ix: IndexType> {
    inner: Edges<'a, E, Directed, Ix>,
}

impl<E, Ix: IndexType> Iterator for EdgeIds<'_, E, Ix> {
    type Item = EdgeIndex<Ix>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|e| e.id())
    }
}

/// Any petgraph DAG can be walked by the backtracker, the edge weights are used as edge data.
impl<N, E, Ix> Graph for DiGraph<N, E, Ix>
where
    E: Clone,
    Ix: IndexType,
{
    type Node = NodeIndex<Ix>;
    type Edge = EdgeIndex<Ix>;
    type EdgeData = E;

    type NodeIter<'a> = NodeIndices<Ix>
        where Self: 'a;
    type EdgeIter<'a> = EdgeIndices<Ix>
        where Self: 'a;
    type Inputs<'a> = EdgeIds<'a, E, Ix>
        where Self: 'a;
    type Outputs<'a> = EdgeIds<'a, E, Ix>
        where Self: 'a;

    fn nodes(&self) -> Self::NodeIter<'_> {
        self.node_indices()
    }

    fn edges(&self) -> Self::EdgeIter<'_> {
        self.edge_indices()
    }

    fn node_count(&self) -> usize {
        DiGraph::node_count(self)
    }

    fn edge_count(&self) -> usize {
        DiGraph::edge_count(self)
    }

    fn root_node(&self) -> Option<Self::Node> {
        let mut roots = self.externals(Direction::Incoming);
        match (roots.next(), roots.next()) {
            (Some(root), None) => Some(root),
            _ => None,
        }
    }

    fn leaf_node(&self) -> Option<Self::Node> {
        let mut leaves = self.externals(Direction::Outgoing);
        match (leaves.next(), leaves.next()) {
            (Some(leaf), None) => Some(leaf),
            _ => None,
        }
    }

    fn inputs(&self, node: Self::Node) -> Self::Inputs<'_> {
        EdgeIds { inner: self.edges_directed(node, Direction::Incoming) }
    }

    fn outputs(&self, node: Self::Node) -> Self::Outputs<'_> {
        EdgeIds { inner: self.edges_directed(node, Direction::Outgoing) }
    }

    /// Panics if the edge does not exist.
    fn edge_from(&self, edge: Self::Edge) -> Self::Node {
        self.raw_edges()[edge.index()].source()
    }

    /// Panics if the edge does not exist.
    fn edge_to(&self, edge: Self::Edge) -> Self::Node {
        self.raw_edges()[edge.index()].target()
    }

    /// Panics if the edge does not exist.
    fn edge_data(&self, edge: Self::Edge) -> Self::EdgeData {
        self[edge].clone()
    }

    fn has_node(&self, node: Self::Node) -> bool {
        node.index() < DiGraph::node_count(self)
    }

    fn has_edge(&self, edge: Self::Edge) -> bool {
        edge.index() < DiGraph::edge_count(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::mock::create_diamond_digraph;
    use crate::graph::traits::Graph;

    #[test]
    fn test_petgraph_adapter() {
        let (g, nodes) = create_diamond_digraph();
        let [a, b, _, _, e] = nodes;

        assert_eq!(g.root_node(), Some(a));
        assert_eq!(g.leaf_node(), Some(e));
        assert_eq!(Graph::node_count(&g), 5);
        assert_eq!(Graph::edge_count(&g), 6);
        assert_eq!(g.out_degree(b), 3);
        assert_eq!(g.in_degree(e), 3);

        for edge in g.outputs(b) {
            assert_eq!(g.edge_from(edge), b);
        }

        for edge in g.inputs(e) {
            assert_eq!(g.edge_to(edge), e);
        }
    }
}

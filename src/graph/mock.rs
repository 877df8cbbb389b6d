use petgraph::graph::{DiGraph, NodeIndex};

use crate::graph::directed::DirectedGraph;
use crate::graph::traits::Graph;

pub(crate) type MockGraph = DirectedGraph<char, (), &'static str, f64>;

/// Diamond shaped DAG
///
/// ```text
///          1     2
///   A --> B --> C --> E
///          \         ^ ^
///           \  2    /2 |
///            +-> D +   |
///             \____4___/
/// ```
///
/// The maximum weight to E is 5, either through A-B-D-E or A-B-E.
pub(crate) fn create_diamond_graph() -> MockGraph {
    let mut g = DirectedGraph::new();
    for n in ['A', 'B', 'C', 'D', 'E'] {
        g.insert_node(n, ()).unwrap();
    }

    g.insert_edge("AB", 'A', 'B', 1.0).unwrap();
    g.insert_edge("BC", 'B', 'C', 1.0).unwrap();
    g.insert_edge("CE", 'C', 'E', 2.0).unwrap();
    g.insert_edge("BD", 'B', 'D', 2.0).unwrap();
    g.insert_edge("DE", 'D', 'E', 2.0).unwrap();
    g.insert_edge("BE", 'B', 'E', 4.0).unwrap();

    g
}

/// Same graph as [`create_diamond_graph`], built with petgraph.
pub(crate) fn create_diamond_digraph() -> (DiGraph<char, f64>, [NodeIndex; 5]) {
    let mut g = DiGraph::new();
    let a = g.add_node('A');
    let b = g.add_node('B');
    let c = g.add_node('C');
    let d = g.add_node('D');
    let e = g.add_node('E');

    g.add_edge(a, b, 1.0);
    g.add_edge(b, c, 1.0);
    g.add_edge(c, e, 2.0);
    g.add_edge(b, d, 2.0);
    g.add_edge(d, e, 2.0);
    g.add_edge(b, e, 4.0);

    (g, [a, b, c, d, e])
}

/// A -> B -> C -> A, plus a proper root R and leaf L hanging off it.
pub(crate) fn create_cyclic_graph() -> MockGraph {
    let mut g = DirectedGraph::new();
    for n in ['R', 'A', 'B', 'C', 'L'] {
        g.insert_node(n, ()).unwrap();
    }

    g.insert_edge("RA", 'R', 'A', 1.0).unwrap();
    g.insert_edge("AB", 'A', 'B', 1.0).unwrap();
    g.insert_edge("BC", 'B', 'C', 1.0).unwrap();
    g.insert_edge("CA", 'C', 'A', 1.0).unwrap();
    g.insert_edge("CL", 'C', 'L', 1.0).unwrap();

    g
}

/// Wraps a graph and reports one input less for a single node, as a graph with inconsistent
/// degree bookkeeping would.
pub(crate) struct UndercountedInputs<G: Graph> {
    pub graph: G,
    pub node: G::Node,
}

impl<G: Graph> Graph for UndercountedInputs<G> {
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
        self.graph.nodes()
    }

    fn edges(&self) -> Self::EdgeIter<'_> {
        self.graph.edges()
    }

    fn root_node(&self) -> Option<Self::Node> {
        self.graph.root_node()
    }

    fn leaf_node(&self) -> Option<Self::Node> {
        self.graph.leaf_node()
    }

    fn inputs(&self, node: Self::Node) -> Self::Inputs<'_> {
        self.graph.inputs(node)
    }

    fn outputs(&self, node: Self::Node) -> Self::Outputs<'_> {
        self.graph.outputs(node)
    }

    fn in_degree(&self, node: Self::Node) -> usize {
        let degree = self.graph.in_degree(node);

        if node == self.node {
            degree.saturating_sub(1)
        } else {
            degree
        }
    }

    fn edge_from(&self, edge: Self::Edge) -> Self::Node {
        self.graph.edge_from(edge)
    }

    fn edge_to(&self, edge: Self::Edge) -> Self::Node {
        self.graph.edge_to(edge)
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

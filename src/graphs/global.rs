use std::marker::PhantomData;

use crate::graph::{ElementOffsets, Graph, PairwiseAlignmentGraph};
use crate::graphs::{grid_edge_offsets, score_elements, GridEdge, GridEdges, GridLayout, GridNode, GridNodes};
use crate::scoring::{Scorer, Weight};

/// Global alignment graph: a plain 2D grid from `(0, 0)` to `(len(down), len(right))`.
///
/// Diagonal edges are scored by the substitution scorer, horizontal and vertical edges by the
/// gap scorer.
pub struct GlobalAlignmentGraph<'s, D, R, W, S, G> {
    down: &'s [D],
    right: &'s [R],
    substitution_scorer: S,
    gap_scorer: G,
    layout: GridLayout,
    dummy: PhantomData<W>,
}

impl<'s, D, R, W, S, G> GlobalAlignmentGraph<'s, D, R, W, S, G>
where
    W: Weight,
    S: Scorer<GridEdge, D, R, W>,
    G: Scorer<GridEdge, D, R, W>,
{
    pub fn new(down: &'s [D], right: &'s [R], substitution_scorer: S, gap_scorer: G) -> Self {
        Self {
            down,
            right,
            substitution_scorer,
            gap_scorer,
            layout: GridLayout::new(down.len(), right.len()),
            dummy: PhantomData,
        }
    }

    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    pub fn down_sequence(&self) -> &'s [D] {
        self.down
    }

    pub fn right_sequence(&self) -> &'s [R] {
        self.right
    }
}

impl<D, R, W, S, G> Graph for GlobalAlignmentGraph<'_, D, R, W, S, G>
where
    W: Weight,
    S: Scorer<GridEdge, D, R, W>,
    G: Scorer<GridEdge, D, R, W>,
{
    type Node = GridNode;
    type Edge = GridEdge;
    type EdgeData = W;

    type NodeIter<'a> = GridNodes
        where Self: 'a;
    type EdgeIter<'a> = GridEdges
        where Self: 'a;
    type Inputs<'a> = smallvec::IntoIter<[GridEdge; 3]>
        where Self: 'a;
    type Outputs<'a> = smallvec::IntoIter<[GridEdge; 3]>
        where Self: 'a;

    fn nodes(&self) -> Self::NodeIter<'_> {
        self.layout.nodes()
    }

    fn edges(&self) -> Self::EdgeIter<'_> {
        self.layout.edges()
    }

    fn node_count(&self) -> usize {
        self.layout.cell_count()
    }

    fn edge_count(&self) -> usize {
        self.layout.edge_count()
    }

    fn root_node(&self) -> Option<GridNode> {
        Some(self.layout.root())
    }

    fn leaf_node(&self) -> Option<GridNode> {
        Some(self.layout.leaf())
    }

    fn inputs(&self, node: GridNode) -> Self::Inputs<'_> {
        debug_assert!(self.has_node(node), "Node doesn't exist: {node:?}");
        self.layout.inputs(node).into_iter()
    }

    fn outputs(&self, node: GridNode) -> Self::Outputs<'_> {
        debug_assert!(self.has_node(node), "Node doesn't exist: {node:?}");
        self.layout.outputs(node).into_iter()
    }

    fn in_degree(&self, node: GridNode) -> usize {
        self.layout.in_degree(node)
    }

    fn out_degree(&self, node: GridNode) -> usize {
        self.layout.out_degree(node)
    }

    fn edge_from(&self, edge: GridEdge) -> GridNode {
        debug_assert!(self.has_edge(edge), "Edge doesn't exist: {edge:?}");
        edge.from
    }

    fn edge_to(&self, edge: GridEdge) -> GridNode {
        debug_assert!(self.has_edge(edge), "Edge doesn't exist: {edge:?}");
        edge.to
    }

    fn edge_data(&self, edge: GridEdge) -> W {
        debug_assert!(self.has_edge(edge), "Edge doesn't exist: {edge:?}");
        score_elements(&edge, grid_edge_offsets(&edge), self.down, self.right,
                       &self.substitution_scorer, &self.gap_scorer)
    }

    fn has_node(&self, node: GridNode) -> bool {
        self.layout.has_node(node)
    }

    fn has_edge(&self, edge: GridEdge) -> bool {
        self.layout.has_edge(&edge)
    }
}

impl<D, R, W, S, G> PairwiseAlignmentGraph for GlobalAlignmentGraph<'_, D, R, W, S, G>
where
    W: Weight,
    S: Scorer<GridEdge, D, R, W>,
    G: Scorer<GridEdge, D, R, W>,
{
    const DEPTH_COUNT: usize = 1;

    type CellNodes = std::option::IntoIter<GridNode>;

    fn down_count(&self) -> usize {
        self.layout.down_count
    }

    fn right_count(&self) -> usize {
        self.layout.right_count
    }

    fn path_edge_capacity(&self) -> usize {
        self.layout.path_edge_capacity()
    }

    fn node_incoming_edge_capacity(&self) -> usize {
        3
    }

    fn node_outgoing_edge_capacity(&self) -> usize {
        3
    }

    fn node_to_grid_offset(&self, node: GridNode) -> (usize, usize, usize) {
        (node.down, node.right, 0)
    }

    fn grid_offset_to_nodes(&self, down: usize, right: usize) -> Self::CellNodes {
        let node = GridNode::new(down, right);
        self.layout.has_node(node).then_some(node).into_iter()
    }

    fn edge_to_element_offsets(&self, edge: GridEdge) -> Option<ElementOffsets> {
        debug_assert!(self.has_edge(edge), "Edge doesn't exist: {edge:?}");
        Some(grid_edge_offsets(&edge))
    }
}

#[cfg(test)]
mod tests {
    use super::GlobalAlignmentGraph;
    use crate::graph::{Graph, PairwiseAlignmentGraph};
    use crate::graphs::{GridEdge, GridNode};
    use crate::scoring::SimpleScorer;

    fn graph<'a>(down: &'a [u8], right: &'a [u8]) -> GlobalAlignmentGraph<'a, u8, u8, f64, SimpleScorer<f64>, SimpleScorer<f64>> {
        GlobalAlignmentGraph::new(down, right, SimpleScorer::substitution(1.0, -1.0), SimpleScorer::gap(-2.0))
    }

    #[test]
    fn test_structure() {
        let g = graph(b"ab", b"acd");

        assert_eq!(g.down_count(), 3);
        assert_eq!(g.right_count(), 4);
        assert_eq!(g.node_count(), 12);
        assert_eq!(g.nodes().count(), 12);
        assert_eq!(g.edges().count(), g.edge_count());
        assert_eq!(g.root_node(), Some(GridNode::new(0, 0)));
        assert_eq!(g.leaf_node(), Some(GridNode::new(2, 3)));
        assert_eq!(g.root_nodes(), vec![GridNode::new(0, 0)]);
        assert_eq!(g.leaf_nodes(), vec![GridNode::new(2, 3)]);
        assert_eq!(g.path_edge_capacity(), 5);

        for edge in g.edges() {
            assert!(g.has_edge(edge));
            assert!(g.outputs(g.edge_from(edge)).any(|e| e == edge));
            assert!(g.inputs(g.edge_to(edge)).any(|e| e == edge));
        }
    }

    #[test]
    fn test_weights() {
        let g = graph(b"ab", b"acd");
        let origin = GridNode::new(0, 0);

        assert_eq!(g.edge_data(GridEdge::new(origin, GridNode::new(1, 1))), 1.0);
        assert_eq!(g.edge_data(GridEdge::new(GridNode::new(1, 1), GridNode::new(2, 2))), -1.0);
        assert_eq!(g.edge_data(GridEdge::new(origin, GridNode::new(0, 1))), -2.0);
        assert_eq!(g.edge_data(GridEdge::new(origin, GridNode::new(1, 0))), -2.0);

        let (from, to, weight) = g.get_edge(GridEdge::new(GridNode::new(1, 2), GridNode::new(2, 3)));
        assert_eq!((from, to, weight), (GridNode::new(1, 2), GridNode::new(2, 3), -1.0));
    }

    #[test]
    fn test_grid_offsets() {
        let g = graph(b"ab", b"acd");

        for node in g.nodes() {
            let (down, right, depth) = g.node_to_grid_offset(node);
            assert_eq!(depth, 0);
            assert_eq!(g.grid_offset_to_nodes(down, right).collect::<Vec<_>>(), vec![node]);
        }

        assert_eq!(g.grid_offset_to_nodes(3, 0).count(), 0);
        assert_eq!(
            g.edge_to_element_offsets(GridEdge::new(GridNode::new(1, 2), GridNode::new(2, 2))),
            Some((Some(1), None))
        );
    }

    #[test]
    fn test_empty_sequences() {
        let g = graph(b"", b"");

        assert_eq!(g.node_count(), 1);
        assert_eq!(g.edge_count(), 0);
        assert_eq!(g.root_node(), g.leaf_node());
    }
}

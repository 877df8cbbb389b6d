use std::collections::{btree_map, BTreeMap, BTreeSet};
use std::iter::{Copied, Flatten};

use crate::errors::AlignerError;
use crate::graph::traits::{Graph, GraphId};

type EdgeSetIter<'a, E> = Copied<Flatten<std::option::IntoIter<&'a BTreeSet<E>>>>;

/// Mutable directed graph with explicit adjacency.
///
/// Meant for small, hand-built graphs. Nodes and edges are kept in ordered maps, such that
/// enumeration order only depends on the ids and not on insertion order.
#[derive(Clone, Debug)]
pub struct DirectedGraph<N, ND, E, ED> {
    node_data: BTreeMap<N, ND>,
    edges: BTreeMap<E, (N, N, ED)>,
    outbound: BTreeMap<N, BTreeSet<E>>,
    inbound: BTreeMap<N, BTreeSet<E>>,
}

impl<N, ND, E, ED> Default for DirectedGraph<N, ND, E, ED> {
    fn default() -> Self {
        Self {
            node_data: BTreeMap::new(),
            edges: BTreeMap::new(),
            outbound: BTreeMap::new(),
            inbound: BTreeMap::new(),
        }
    }
}

impl<N, ND, E, ED> DirectedGraph<N, ND, E, ED>
where
    N: GraphId,
    E: GraphId,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_node(&mut self, node: N, data: ND) -> Result<(), AlignerError> {
        let btree_map::Entry::Vacant(entry) = self.node_data.entry(node) else {
            return Err(AlignerError::NodeExists);
        };

        entry.insert(data);
        self.outbound.insert(node, BTreeSet::new());
        self.inbound.insert(node, BTreeSet::new());

        Ok(())
    }

    /// Remove a node together with all edges going in or out of it.
    pub fn delete_node(&mut self, node: N) -> Result<ND, AlignerError> {
        let data = self.node_data.remove(&node)
            .ok_or(AlignerError::NodeMissing)?;

        let incident: Vec<E> = self.outbound.remove(&node).into_iter().flatten()
            .chain(self.inbound.remove(&node).into_iter().flatten())
            .collect();

        for edge in incident {
            let Some((from, to, _)) = self.edges.remove(&edge) else {
                continue;
            };

            if let Some(out) = self.outbound.get_mut(&from) {
                out.remove(&edge);
            }

            if let Some(inb) = self.inbound.get_mut(&to) {
                inb.remove(&edge);
            }
        }

        Ok(data)
    }

    pub fn update_node_data(&mut self, node: N, data: ND) -> Result<(), AlignerError> {
        let slot = self.node_data.get_mut(&node)
            .ok_or(AlignerError::NodeMissing)?;
        *slot = data;

        Ok(())
    }

    pub fn node_data(&self, node: N) -> Result<&ND, AlignerError> {
        self.node_data.get(&node)
            .ok_or(AlignerError::NodeMissing)
    }

    pub fn insert_edge(&mut self, edge: E, from: N, to: N, data: ED) -> Result<(), AlignerError> {
        if !self.node_data.contains_key(&from) || !self.node_data.contains_key(&to) {
            return Err(AlignerError::NodeMissing);
        }

        let btree_map::Entry::Vacant(entry) = self.edges.entry(edge) else {
            return Err(AlignerError::EdgeExists);
        };

        entry.insert((from, to, data));
        self.outbound.entry(from).or_default().insert(edge);
        self.inbound.entry(to).or_default().insert(edge);

        Ok(())
    }

    /// Remove an edge. Endpoints left without any edges are removed as well if requested.
    pub fn delete_edge(
        &mut self,
        edge: E,
        remove_from_if_isolated: bool,
        remove_to_if_isolated: bool
    ) -> Result<ED, AlignerError> {
        let (from, to, data) = self.edges.remove(&edge)
            .ok_or(AlignerError::EdgeMissing)?;

        if let Some(out) = self.outbound.get_mut(&from) {
            out.remove(&edge);
        }

        if let Some(inb) = self.inbound.get_mut(&to) {
            inb.remove(&edge);
        }

        if remove_from_if_isolated && self.is_isolated(from) {
            self.delete_node(from)?;
        }

        if remove_to_if_isolated && from != to && self.is_isolated(to) {
            self.delete_node(to)?;
        }

        Ok(data)
    }

    pub fn update_edge_data(&mut self, edge: E, data: ED) -> Result<(), AlignerError> {
        let (_, _, slot) = self.edges.get_mut(&edge)
            .ok_or(AlignerError::EdgeMissing)?;
        *slot = data;

        Ok(())
    }

    pub fn edge_data_ref(&self, edge: E) -> Result<&ED, AlignerError> {
        self.edges.get(&edge)
            .map(|(_, _, data)| data)
            .ok_or(AlignerError::EdgeMissing)
    }

    /// Split `existing_edge` (`from -> to`) into `from -> new_node -> to`.
    #[allow(clippy::too_many_arguments)]
    pub fn insert_node_between_edge(
        &mut self,
        new_node: N,
        new_node_data: ND,
        existing_edge: E,
        from_edge: E,
        from_edge_data: ED,
        to_edge: E,
        to_edge_data: ED,
    ) -> Result<(), AlignerError> {
        if self.node_data.contains_key(&new_node) {
            return Err(AlignerError::NodeExists);
        }

        let Some(&(from, to, _)) = self.edges.get(&existing_edge) else {
            return Err(AlignerError::EdgeMissing);
        };

        let reused = |e: &E| *e == existing_edge;
        if (self.edges.contains_key(&from_edge) && !reused(&from_edge))
            || (self.edges.contains_key(&to_edge) && !reused(&to_edge))
            || from_edge == to_edge
        {
            return Err(AlignerError::EdgeExists);
        }

        self.delete_edge(existing_edge, false, false)?;
        self.insert_node(new_node, new_node_data)?;
        self.insert_edge(from_edge, from, new_node, from_edge_data)?;
        self.insert_edge(to_edge, new_node, to, to_edge_data)?;

        Ok(())
    }

    fn is_isolated(&self, node: N) -> bool {
        self.outbound.get(&node).map_or(true, BTreeSet::is_empty)
            && self.inbound.get(&node).map_or(true, BTreeSet::is_empty)
    }

    fn edge_set(set: Option<&BTreeSet<E>>) -> EdgeSetIter<'_, E> {
        set.into_iter().flatten().copied()
    }
}

impl<N, ND, E, ED> Graph for DirectedGraph<N, ND, E, ED>
where
    N: GraphId,
    E: GraphId,
    ED: Clone,
{
    type Node = N;
    type Edge = E;
    type EdgeData = ED;

    type NodeIter<'a> = Copied<btree_map::Keys<'a, N, ND>>
        where Self: 'a;
    type EdgeIter<'a> = Copied<btree_map::Keys<'a, E, (N, N, ED)>>
        where Self: 'a;
    type Inputs<'a> = EdgeSetIter<'a, E>
        where Self: 'a;
    type Outputs<'a> = EdgeSetIter<'a, E>
        where Self: 'a;

    fn nodes(&self) -> Self::NodeIter<'_> {
        self.node_data.keys().copied()
    }

    fn edges(&self) -> Self::EdgeIter<'_> {
        self.edges.keys().copied()
    }

    fn node_count(&self) -> usize {
        self.node_data.len()
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn root_node(&self) -> Option<N> {
        match self.root_nodes().as_slice() {
            [root] => Some(*root),
            _ => None
        }
    }

    fn leaf_node(&self) -> Option<N> {
        match self.leaf_nodes().as_slice() {
            [leaf] => Some(*leaf),
            _ => None
        }
    }

    fn inputs(&self, node: N) -> Self::Inputs<'_> {
        debug_assert!(self.has_node(node), "Node doesn't exist: {node:?}");
        Self::edge_set(self.inbound.get(&node))
    }

    fn outputs(&self, node: N) -> Self::Outputs<'_> {
        debug_assert!(self.has_node(node), "Node doesn't exist: {node:?}");
        Self::edge_set(self.outbound.get(&node))
    }

    fn in_degree(&self, node: N) -> usize {
        self.inbound.get(&node).map_or(0, BTreeSet::len)
    }

    fn out_degree(&self, node: N) -> usize {
        self.outbound.get(&node).map_or(0, BTreeSet::len)
    }

    /// Panics if the edge does not exist.
    fn edge_from(&self, edge: E) -> N {
        self.edges[&edge].0
    }

    /// Panics if the edge does not exist.
    fn edge_to(&self, edge: E) -> N {
        self.edges[&edge].1
    }

    /// Panics if the edge does not exist.
    fn edge_data(&self, edge: E) -> ED {
        self.edges[&edge].2.clone()
    }

    fn has_node(&self, node: N) -> bool {
        self.node_data.contains_key(&node)
    }

    fn has_edge(&self, edge: E) -> bool {
        self.edges.contains_key(&edge)
    }
}

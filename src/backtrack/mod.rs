//! Maximum weight root to leaf path search over directed acyclic graphs.
//!
//! The backtracker walks the graph in topological order: every node keeps a count of its
//! parents not walked yet, and a node becomes ready once that count drops to zero. Walking a
//! node picks its best incoming edge, after which the path is recovered by following the best
//! incoming edges back from the leaf.

pub mod slot;
pub mod slot_container;
pub mod ready_queue;
pub mod storage;

use std::cell::Cell;

use tracing::{debug, span, trace, Level};

use crate::errors::AlignerError;
use crate::graph::{Graph, PairwiseAlignmentGraph};
use crate::scoring::Weight;

pub use slot::Slot;
pub use slot_container::{GridSlotContainer, SlotContainer, SortedSlotContainer};
pub use ready_queue::ReadyQueue;
pub use storage::{AllocatorStrategy, BoundedStrategy, Buffer, HeapStrategy};

type SlotOf<G, W> = Slot<<G as Graph>::Node, <G as Graph>::Edge, W>;

/// Slot container used for arbitrary graphs.
pub type SortedSlots<A, G, W> = SortedSlotContainer<
    <G as Graph>::Node,
    <G as Graph>::Edge,
    W,
    <A as AllocatorStrategy>::SlotBuffer<SlotOf<G, W>>
>;

/// Slot container used for pairwise alignment graphs.
pub type GridSlots<'g, A, G, W> = GridSlotContainer<'g, G, W, <A as AllocatorStrategy>::SlotBuffer<Option<SlotOf<G, W>>>>;

/// Edges of a path, root first.
pub type PathOf<A, G> = <A as AllocatorStrategy>::PathBuffer<<G as Graph>::Edge>;

/// Slots after a topological walk, holding the best incoming edge and weight of each walked
/// node.
pub struct Walk<C> {
    pub slots: C,

    /// Number of nodes walked. Equal to the node count unless the graph is malformed.
    pub walked: usize,
}

#[derive(Debug, Clone)]
pub struct BacktrackResult<P, W> {
    pub path: P,
    pub weight: W,
    pub walked: usize,
}

#[derive(Copy, Clone, Debug, Default)]
pub struct Backtracker<A = HeapStrategy> {
    strategy: A,
}

impl<A> Backtracker<A>
    where A: AllocatorStrategy
{
    pub fn new(strategy: A) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> &A {
        &self.strategy
    }

    /// Maximum weight path from root to leaf, using the graph's edge data as weights.
    pub fn find_max_path<G>(&self, graph: &G) -> Result<BacktrackResult<PathOf<A, G>, G::EdgeData>, AlignerError>
    where
        G: Graph,
        G::EdgeData: Weight,
    {
        self.find_max_path_with(graph, |edge| graph.edge_data(edge))
    }

    pub fn find_max_path_with<G, W, F>(&self, graph: &G, edge_weight: F) -> Result<BacktrackResult<PathOf<A, G>, W>, AlignerError>
    where
        G: Graph,
        W: Weight,
        F: Fn(G::Edge) -> W,
    {
        let span = span!(Level::DEBUG, "find_max_path");
        let _enter = span.enter();

        let leaf = graph.leaf_node()
            .ok_or_else(|| AlignerError::LeafCount(graph.leaf_nodes().len()))?;

        let walk = self.populate_weights(graph, edge_weight)?;
        self.finish(graph, walk, leaf, graph.node_count().saturating_sub(1))
    }

    /// Like [`Self::find_max_path`], with constant time slot lookups based on the grid offsets
    /// of the nodes.
    pub fn find_max_path_on_grid<G>(&self, graph: &G) -> Result<BacktrackResult<PathOf<A, G>, G::EdgeData>, AlignerError>
    where
        G: PairwiseAlignmentGraph,
        G::EdgeData: Weight,
    {
        self.find_max_path_on_grid_with(graph, |edge| graph.edge_data(edge))
    }

    pub fn find_max_path_on_grid_with<G, W, F>(&self, graph: &G, edge_weight: F) -> Result<BacktrackResult<PathOf<A, G>, W>, AlignerError>
    where
        G: PairwiseAlignmentGraph,
        W: Weight,
        F: Fn(G::Edge) -> W,
    {
        let span = span!(Level::DEBUG, "find_max_path_on_grid",
            down_count = graph.down_count(), right_count = graph.right_count(), depth = G::DEPTH_COUNT);
        let _enter = span.enter();

        let leaf = graph.leaf_node()
            .ok_or_else(|| AlignerError::LeafCount(graph.leaf_nodes().len()))?;

        let walk = self.populate_grid_weights(graph, edge_weight)?;
        self.finish(graph, walk, leaf, graph.path_edge_capacity())
    }

    /// Validating variant of [`Self::find_max_path`].
    ///
    /// Rejects empty graphs, graphs without exactly one root and one leaf, non-finite edge
    /// weights and graphs where not every node could be walked (cycles). On valid input the
    /// result is identical to the unchecked call.
    pub fn find_max_path_checked<G>(&self, graph: &G) -> Result<BacktrackResult<PathOf<A, G>, G::EdgeData>, AlignerError>
    where
        G: Graph,
        G::EdgeData: Weight,
    {
        self.find_max_path_checked_with(graph, |edge| graph.edge_data(edge))
    }

    pub fn find_max_path_checked_with<G, W, F>(&self, graph: &G, edge_weight: F) -> Result<BacktrackResult<PathOf<A, G>, W>, AlignerError>
    where
        G: Graph,
        W: Weight,
        F: Fn(G::Edge) -> W,
    {
        let span = span!(Level::DEBUG, "find_max_path_checked");
        let _enter = span.enter();

        let total = graph.node_count();
        if total == 0 {
            return Err(AlignerError::EmptyGraph);
        }

        let roots = graph.root_nodes().len();
        if roots != 1 {
            return Err(AlignerError::RootCount(roots));
        }

        let leaves = graph.leaf_nodes();
        let &[leaf] = leaves.as_slice() else {
            return Err(AlignerError::LeafCount(leaves.len()));
        };

        let non_finite = Cell::new(false);
        let walk = self.populate_weights(graph, |edge| {
            let weight = edge_weight(edge);
            if !weight.is_finite() {
                non_finite.set(true);
            }

            weight
        })?;

        if non_finite.get() {
            return Err(AlignerError::NonFiniteWeight);
        }

        if walk.walked != total {
            return Err(AlignerError::Cycle { walked: walk.walked, total });
        }

        self.finish(graph, walk, leaf, total - 1)
    }

    /// Walk all nodes reachable from the root in topological order, recording for each node
    /// its best incoming edge and the weight of the best path from the root.
    pub fn populate_weights<G, W, F>(&self, graph: &G, edge_weight: F) -> Result<Walk<SortedSlots<A, G, W>>, AlignerError>
    where
        G: Graph,
        W: Weight,
        F: Fn(G::Edge) -> W,
    {
        let node_count = graph.node_count();
        self.strategy.check_capacity(node_count, 0)?;

        let slots = SortedSlotContainer::new(graph, self.strategy.slot_buffer(node_count));
        self.walk(graph, edge_weight, slots, node_count)
    }

    pub fn populate_grid_weights<'g, G, W, F>(&self, graph: &'g G, edge_weight: F) -> Result<Walk<GridSlots<'g, A, G, W>>, AlignerError>
    where
        G: PairwiseAlignmentGraph,
        W: Weight,
        F: Fn(G::Edge) -> W,
    {
        let slot_count = G::DEPTH_COUNT * graph.down_count() * graph.right_count();
        self.strategy.check_capacity(slot_count, 0)?;

        let slots = GridSlotContainer::new(graph, self.strategy.slot_buffer(slot_count));
        let queue_capacity = G::DEPTH_COUNT * (graph.down_count() + graph.right_count());

        self.walk(graph, edge_weight, slots, queue_capacity)
    }

    /// Follow the best incoming edges from `end` back to a node without inputs. The returned
    /// path starts at that node.
    ///
    /// Fails with [`AlignerError::CapacityExceeded`] if the path has more edges than the
    /// strategy's path buffer holds. `end` must be a node of `graph`.
    pub fn backtrack<G, W, C>(&self, graph: &G, slots: &C, end: G::Node) -> Result<PathOf<A, G>, AlignerError>
    where
        G: Graph,
        C: SlotContainer<G::Node, G::Edge, W>,
    {
        self.backtrack_with_capacity(graph, slots, end, graph.node_count().saturating_sub(1))
    }

    fn backtrack_with_capacity<G, W, C>(
        &self,
        graph: &G,
        slots: &C,
        end: G::Node,
        capacity: usize,
    ) -> Result<PathOf<A, G>, AlignerError>
    where
        G: Graph,
        C: SlotContainer<G::Node, G::Edge, W>,
    {
        debug_assert!(graph.has_node(end), "Backtrack end node {end:?} not in the graph");

        let limit = self.strategy.path_limit();
        let mut path = self.strategy.path_buffer(capacity);
        let mut overflow = 0;

        let mut node = end;
        while graph.has_inputs(node) {
            let slot = slots.find(node).ok_or(AlignerError::NodeMissing)?;

            // Not reachable from the root
            let Some(edge) = slot.backtracking_edge else {
                break;
            };

            // Keep counting past the limit to report the full path length
            if limit.is_some_and(|l| path.len() >= l) {
                overflow += 1;
            } else {
                path.push(edge);
            }

            node = graph.edge_from(edge);
        }

        if overflow > 0 {
            return Err(AlignerError::CapacityExceeded { required: path.len() + overflow, capacity: path.len() });
        }

        path.reverse();
        Ok(path)
    }

    fn finish<G, W, C>(
        &self,
        graph: &G,
        walk: Walk<C>,
        leaf: G::Node,
        path_capacity: usize,
    ) -> Result<BacktrackResult<PathOf<A, G>, W>, AlignerError>
    where
        G: Graph,
        W: Weight,
        C: SlotContainer<G::Node, G::Edge, W>,
    {
        let weight = walk.slots.find(leaf)
            .ok_or(AlignerError::NodeMissing)?
            .backtracking_weight;

        let path = self.backtrack_with_capacity(graph, &walk.slots, leaf, path_capacity)?;
        debug!(walked = walk.walked, path_length = path.len(), ?weight, "Found max weight path");

        Ok(BacktrackResult { path, weight, walked: walk.walked })
    }

    fn walk<G, W, F, C>(&self, graph: &G, edge_weight: F, mut slots: C, queue_capacity: usize) -> Result<Walk<C>, AlignerError>
    where
        G: Graph,
        W: Weight,
        F: Fn(G::Edge) -> W,
        C: SlotContainer<G::Node, G::Edge, W>,
    {
        let root = graph.root_node()
            .ok_or_else(|| AlignerError::RootCount(graph.root_nodes().len()))?;
        let root_index = slots.find_idx(root).ok_or(AlignerError::NodeMissing)?;

        let mut queue = ReadyQueue::new(self.strategy.queue_buffer(queue_capacity));
        queue.push(root_index);

        let mut walked = 0;
        while !queue.is_empty() {
            let Some(index) = queue.pop() else {
                break;
            };

            let node = slots.at_index(index).ok_or(AlignerError::NodeMissing)?.node;

            // Ties keep the first edge in input order
            let mut best: Option<(G::Edge, W)> = None;
            for edge in graph.inputs(node) {
                let parent = slots.find(graph.edge_from(edge)).ok_or(AlignerError::NodeMissing)?;
                debug_assert!(parent.is_ready(), "Parent of {node:?} not walked yet");

                let candidate = parent.backtracking_weight + edge_weight(edge);
                if best.map_or(true, |(_, best_weight)| candidate > best_weight) {
                    best = Some((edge, candidate));
                }
            }

            if let (Some((edge, weight)), Some(slot)) = (best, slots.at_index_mut(index)) {
                slot.backtracking_edge = Some(edge);
                slot.backtracking_weight = weight;
            }

            walked += 1;
            trace!(?node, queued = queue.len(), "Walked node");

            for edge in graph.outputs(node) {
                let child = graph.edge_to(edge);
                let child_index = slots.find_idx(child).ok_or(AlignerError::NodeMissing)?;
                let Some(child_slot) = slots.at_index_mut(child_index) else {
                    continue;
                };

                let Some(remaining) = child_slot.unwalked_parent_count.checked_sub(1) else {
                    debug_assert!(false, "More parents walked than {child:?} has inputs");
                    continue;
                };

                child_slot.unwalked_parent_count = remaining;
                if remaining == 0 {
                    queue.push(child_index);
                }
            }
        }

        debug!(walked, "Walk finished");
        Ok(Walk { slots, walked })
    }
}

use std::marker::PhantomData;

use crate::backtrack::slot::Slot;
use crate::backtrack::storage::Buffer;
use crate::graph::{Graph, PairwiseAlignmentGraph};
use crate::scoring::Weight;

/// Storage of the backtracker slots, addressed by a stable index.
///
/// Indices are resolved once per node through `find_idx` and can then be kept in the ready
/// queue, avoiding repeated lookups.
pub trait SlotContainer<N, E, W> {
    fn find_idx(&self, node: N) -> Option<usize>;

    fn at_index(&self, index: usize) -> Option<&Slot<N, E, W>>;

    fn at_index_mut(&mut self, index: usize) -> Option<&mut Slot<N, E, W>>;

    /// Upper bound (exclusive) of the slot indices.
    fn index_bound(&self) -> usize;

    fn find(&self, node: N) -> Option<&Slot<N, E, W>> {
        self.at_index(self.find_idx(node)?)
    }

    fn find_mut(&mut self, node: N) -> Option<&mut Slot<N, E, W>> {
        let index = self.find_idx(node)?;
        self.at_index_mut(index)
    }

    fn slot_count(&self) -> usize {
        (0..self.index_bound())
            .filter(|i| self.at_index(*i).is_some())
            .count()
    }
}

/// Slots for arbitrary graphs, kept sorted by node so a node's slot is found by binary search.
pub struct SortedSlotContainer<N, E, W, B> {
    slots: B,
    dummy: PhantomData<(N, E, W)>,
}

impl<N, E, W, B> SortedSlotContainer<N, E, W, B>
where
    N: Ord + Copy,
    W: Weight,
    B: Buffer<Slot<N, E, W>>,
{
    pub fn new<G>(graph: &G, mut buffer: B) -> Self
        where G: Graph<Node=N, Edge=E>
    {
        buffer.clear();
        for node in graph.nodes() {
            buffer.push(Slot::new(node, graph.in_degree(node)));
        }

        buffer.sort_unstable_by_key(|slot| slot.node);

        Self { slots: buffer, dummy: PhantomData }
    }
}

impl<N, E, W, B> SlotContainer<N, E, W> for SortedSlotContainer<N, E, W, B>
where
    N: Ord + Copy,
    B: Buffer<Slot<N, E, W>>,
{
    #[inline]
    fn find_idx(&self, node: N) -> Option<usize> {
        self.slots.binary_search_by_key(&node, |slot| slot.node).ok()
    }

    #[inline]
    fn at_index(&self, index: usize) -> Option<&Slot<N, E, W>> {
        self.slots.get(index)
    }

    #[inline]
    fn at_index_mut(&mut self, index: usize) -> Option<&mut Slot<N, E, W>> {
        self.slots.get_mut(index)
    }

    fn index_bound(&self) -> usize {
        self.slots.len()
    }

    fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

/// Slots for pairwise alignment graphs, stored densely by grid offset.
///
/// The slot of the node at `(down, right, depth)` lives at index
/// `DEPTH_COUNT * (down * right_count + right) + depth`. Offsets not occupied by a node hold
/// `None`.
pub struct GridSlotContainer<'g, G, W, B> {
    graph: &'g G,
    slots: B,
    dummy: PhantomData<W>,
}

impl<'g, G, W, B> GridSlotContainer<'g, G, W, B>
where
    G: PairwiseAlignmentGraph,
    W: Weight,
    B: Buffer<Option<Slot<G::Node, G::Edge, W>>>,
{
    pub fn new(graph: &'g G, mut buffer: B) -> Self {
        buffer.clear();
        for _ in 0..Self::required_capacity(graph) {
            buffer.push(None);
        }

        for node in graph.nodes() {
            let index = grid_index(graph, node);
            debug_assert!(index < buffer.len(), "Grid offset of {node:?} out of bounds");

            if let Some(cell) = buffer.get_mut(index) {
                *cell = Some(Slot::new(node, graph.in_degree(node)));
            }
        }

        Self { graph, slots: buffer, dummy: PhantomData }
    }

    pub fn required_capacity(graph: &G) -> usize {
        G::DEPTH_COUNT * graph.down_count() * graph.right_count()
    }
}

#[inline]
fn grid_index<G: PairwiseAlignmentGraph>(graph: &G, node: G::Node) -> usize {
    let (down, right, depth) = graph.node_to_grid_offset(node);
    G::DEPTH_COUNT * (down * graph.right_count() + right) + depth
}

impl<G, W, B> SlotContainer<G::Node, G::Edge, W> for GridSlotContainer<'_, G, W, B>
where
    G: PairwiseAlignmentGraph,
    B: Buffer<Option<Slot<G::Node, G::Edge, W>>>,
{
    #[inline]
    fn find_idx(&self, node: G::Node) -> Option<usize> {
        let index = grid_index(self.graph, node);

        match self.slots.get(index)? {
            Some(slot) if slot.node == node => Some(index),
            _ => None,
        }
    }

    #[inline]
    fn at_index(&self, index: usize) -> Option<&Slot<G::Node, G::Edge, W>> {
        self.slots.get(index)?.as_ref()
    }

    #[inline]
    fn at_index_mut(&mut self, index: usize) -> Option<&mut Slot<G::Node, G::Edge, W>> {
        self.slots.get_mut(index)?.as_mut()
    }

    fn index_bound(&self) -> usize {
        self.slots.len()
    }
}

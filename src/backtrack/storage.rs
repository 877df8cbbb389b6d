use std::ops::{Deref, DerefMut};

use smallvec::SmallVec;

use crate::errors::AlignerError;
use crate::graph::PairwiseAlignmentGraph;

/// Growable sequence storage used by the backtracker for its slots, ready queue and result
/// path.
pub trait Buffer<T>: Deref<Target=[T]> + DerefMut {
    fn push(&mut self, item: T);

    fn pop(&mut self) -> Option<T>;

    fn clear(&mut self);

    fn capacity(&self) -> usize;
}

impl<T> Buffer<T> for Vec<T> {
    #[inline]
    fn push(&mut self, item: T) {
        Vec::push(self, item)
    }

    #[inline]
    fn pop(&mut self) -> Option<T> {
        Vec::pop(self)
    }

    fn clear(&mut self) {
        Vec::clear(self)
    }

    fn capacity(&self) -> usize {
        Vec::capacity(self)
    }
}

/// Fixed capacity buffer living inline (on the stack when the owner is). Going over capacity
/// is a bug in the caller; debug builds panic, release builds spill to the heap.
impl<T, const N: usize> Buffer<T> for SmallVec<[T; N]> {
    #[inline]
    fn push(&mut self, item: T) {
        debug_assert!(self.len() < N, "Bounded buffer capacity ({N}) exceeded");
        SmallVec::push(self, item)
    }

    #[inline]
    fn pop(&mut self) -> Option<T> {
        SmallVec::pop(self)
    }

    fn clear(&mut self) {
        SmallVec::clear(self)
    }

    fn capacity(&self) -> usize {
        N
    }
}

/// Factory for the backtracker's buffers.
///
/// Capacities passed to the factory methods are the sizes the backtracker expects to need,
/// derived from the graph dimensions.
pub trait AllocatorStrategy {
    type SlotBuffer<T>: Buffer<T>;
    type QueueBuffer: Buffer<usize>;
    type PathBuffer<T>: Buffer<T>;

    fn slot_buffer<T>(&self, capacity: usize) -> Self::SlotBuffer<T>;
    fn queue_buffer(&self, capacity: usize) -> Self::QueueBuffer;
    fn path_buffer<T>(&self, capacity: usize) -> Self::PathBuffer<T>;

    /// Check that slot and path buffers of the given sizes can be created.
    fn check_capacity(&self, _slots: usize, _path: usize) -> Result<(), AlignerError> {
        Ok(())
    }

    /// Most edges a path buffer can hold, `None` if it grows without bound.
    fn path_limit(&self) -> Option<usize> {
        None
    }
}

/// Heap allocated, growable buffers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HeapStrategy {
    /// Reserve the expected capacity up front, avoiding reallocations while running
    pub reserve: bool,
}

impl Default for HeapStrategy {
    fn default() -> Self {
        Self { reserve: true }
    }
}

impl HeapStrategy {
    #[inline]
    fn initial_capacity(&self, capacity: usize) -> usize {
        if self.reserve { capacity } else { 0 }
    }
}

impl AllocatorStrategy for HeapStrategy {
    type SlotBuffer<T> = Vec<T>;
    type QueueBuffer = Vec<usize>;
    type PathBuffer<T> = Vec<T>;

    fn slot_buffer<T>(&self, capacity: usize) -> Self::SlotBuffer<T> {
        Vec::with_capacity(self.initial_capacity(capacity))
    }

    fn queue_buffer(&self, capacity: usize) -> Self::QueueBuffer {
        Vec::with_capacity(self.initial_capacity(capacity))
    }

    fn path_buffer<T>(&self, capacity: usize) -> Self::PathBuffer<T> {
        Vec::with_capacity(self.initial_capacity(capacity))
    }
}

/// Inline buffers with capacities fixed at compile time, no heap allocation while running.
///
/// `SLOTS` bounds the number of slots (for grid graphs `down * right * depth`), `QUEUE` the
/// number of simultaneously ready nodes and `PATH` the number of edges in the result.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BoundedStrategy<const SLOTS: usize, const QUEUE: usize, const PATH: usize>;

impl<const SLOTS: usize, const QUEUE: usize, const PATH: usize> BoundedStrategy<SLOTS, QUEUE, PATH> {
    /// Check whether the grid slots and the longest possible path of a pairwise alignment graph
    /// fit. Conservative: the backtracker itself only fails when the path it finds is too long.
    pub fn check_fits<G: PairwiseAlignmentGraph>(&self, graph: &G) -> Result<(), AlignerError> {
        let slots = G::DEPTH_COUNT * graph.down_count() * graph.right_count();
        self.check_capacity(slots, graph.path_edge_capacity())
    }
}

impl<const SLOTS: usize, const QUEUE: usize, const PATH: usize> AllocatorStrategy for BoundedStrategy<SLOTS, QUEUE, PATH> {
    type SlotBuffer<T> = SmallVec<[T; SLOTS]>;
    type QueueBuffer = SmallVec<[usize; QUEUE]>;
    type PathBuffer<T> = SmallVec<[T; PATH]>;

    fn slot_buffer<T>(&self, _: usize) -> Self::SlotBuffer<T> {
        SmallVec::new()
    }

    fn queue_buffer(&self, _: usize) -> Self::QueueBuffer {
        SmallVec::new()
    }

    fn path_buffer<T>(&self, _: usize) -> Self::PathBuffer<T> {
        SmallVec::new()
    }

    fn check_capacity(&self, slots: usize, path: usize) -> Result<(), AlignerError> {
        if slots > SLOTS {
            return Err(AlignerError::CapacityExceeded { required: slots, capacity: SLOTS });
        }

        if path > PATH {
            return Err(AlignerError::CapacityExceeded { required: path, capacity: PATH });
        }

        Ok(())
    }

    fn path_limit(&self) -> Option<usize> {
        Some(PATH)
    }
}

#[cfg(test)]
mod tests {
    use smallvec::SmallVec;

    use super::{AllocatorStrategy, BoundedStrategy, Buffer, HeapStrategy};
    use crate::errors::AlignerError;
    use crate::graphs::GlobalAlignmentGraph;
    use crate::scoring::SimpleScorer;

    fn fill<B: Buffer<usize>>(buffer: &mut B) {
        for i in 0..4 {
            buffer.push(i);
        }
    }

    #[test]
    fn test_buffers_behave_alike() {
        let mut heap: Vec<usize> = HeapStrategy::default().queue_buffer(4);
        let mut bounded: SmallVec<[usize; 4]> = BoundedStrategy::<4, 4, 4>.queue_buffer(4);

        fill(&mut heap);
        fill(&mut bounded);

        assert_eq!(&heap[..], &bounded[..]);
        assert_eq!(Buffer::pop(&mut heap), Some(3));
        assert_eq!(Buffer::pop(&mut bounded), Some(3));

        heap.reverse();
        bounded.reverse();
        assert_eq!(&heap[..], &[2, 1, 0]);
        assert_eq!(&bounded[..], &[2, 1, 0]);

        Buffer::clear(&mut bounded);
        assert!(bounded.is_empty());
        assert_eq!(Buffer::capacity(&bounded), 4);
    }

    #[test]
    fn test_heap_reserve() {
        let reserved: Vec<u8> = HeapStrategy { reserve: true }.slot_buffer(100);
        let lazy: Vec<u8> = HeapStrategy { reserve: false }.slot_buffer(100);

        assert!(reserved.capacity() >= 100);
        assert_eq!(lazy.capacity(), 0);
    }

    #[test]
    fn test_bounded_check_capacity() {
        let strategy = BoundedStrategy::<16, 8, 4>;

        assert!(strategy.check_capacity(16, 4).is_ok());
        assert!(matches!(
            strategy.check_capacity(17, 4),
            Err(AlignerError::CapacityExceeded { required: 17, capacity: 16 })
        ));
        assert!(matches!(
            strategy.check_capacity(2, 5),
            Err(AlignerError::CapacityExceeded { required: 5, capacity: 4 })
        ));
        assert!(HeapStrategy::default().check_capacity(usize::MAX, usize::MAX).is_ok());

        assert_eq!(strategy.path_limit(), Some(4));
        assert_eq!(HeapStrategy::default().path_limit(), None);
    }

    #[test]
    fn test_bounded_check_fits() {
        // 3 x 4 grid, longest path 2 + 3 edges
        let g = GlobalAlignmentGraph::new(
            b"ab".as_slice(),
            b"abc".as_slice(),
            SimpleScorer::substitution(1, -1),
            SimpleScorer::gap(-1),
        );

        assert!(BoundedStrategy::<12, 4, 5>.check_fits(&g).is_ok());
        assert!(BoundedStrategy::<11, 4, 5>.check_fits(&g).is_err());
        assert!(BoundedStrategy::<12, 4, 4>.check_fits(&g).is_err());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn test_bounded_overflow_panics() {
        let mut buffer: SmallVec<[usize; 2]> = BoundedStrategy::<2, 2, 2>.queue_buffer(2);
        for i in 0..3 {
            Buffer::push(&mut buffer, i);
        }
    }
}

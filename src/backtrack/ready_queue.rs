use crate::backtrack::storage::Buffer;

/// Slot indices of nodes whose parents have all been walked.
///
/// Last in, first out. Any order yields the same maximum weight, LIFO keeps the queue small on
/// grids because it follows one branch to completion before starting the next.
pub struct ReadyQueue<B> {
    buffer: B,
}

impl<B> ReadyQueue<B>
    where B: Buffer<usize>
{
    pub fn new(mut buffer: B) -> Self {
        buffer.clear();
        Self { buffer }
    }

    #[inline]
    pub fn push(&mut self, slot_index: usize) {
        self.buffer.push(slot_index)
    }

    #[inline]
    pub fn pop(&mut self) -> Option<usize> {
        debug_assert!(!self.buffer.is_empty(), "Popped from an empty ready queue");
        self.buffer.pop()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use smallvec::SmallVec;

    use super::ReadyQueue;

    #[test]
    fn test_lifo() {
        let mut queue = ReadyQueue::new(Vec::new());
        queue.push(1);
        queue.push(2);
        queue.push(3);

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop(), Some(3));
        assert_eq!(queue.pop(), Some(2));
        queue.push(4);
        assert_eq!(queue.pop(), Some(4));
        assert_eq!(queue.pop(), Some(1));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_bounded() {
        let mut queue: ReadyQueue<SmallVec<[usize; 2]>> = ReadyQueue::new(SmallVec::from_buf([7, 8]));
        assert!(queue.is_empty());

        queue.push(5);
        assert_eq!(queue.pop(), Some(5));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn test_pop_empty() {
        let mut queue = ReadyQueue::new(Vec::new());
        queue.pop();
    }
}

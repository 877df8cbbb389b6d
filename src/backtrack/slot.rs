use num::Zero;

/// Per-node state of the backtracker.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Slot<N, E, W> {
    pub node: N,

    /// Number of parents not yet walked. The node is ready once this reaches zero.
    pub unwalked_parent_count: usize,

    /// Incoming edge on the best path found so far, `None` for the root
    pub backtracking_edge: Option<E>,

    /// Weight of the best path from the root to this node
    pub backtracking_weight: W,
}

impl<N, E, W: Zero> Slot<N, E, W> {
    pub fn new(node: N, in_degree: usize) -> Self {
        Self {
            node,
            unwalked_parent_count: in_degree,
            backtracking_edge: None,
            backtracking_weight: W::zero(),
        }
    }
}

impl<N, E, W> Slot<N, E, W> {
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.unwalked_parent_count == 0
    }
}

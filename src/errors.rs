use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;

#[derive(Debug)]
pub enum AlignerError {
    /// Tried to insert a node that is already part of the graph
    NodeExists,

    /// Referenced a node that is not part of the graph
    NodeMissing,

    /// Tried to insert an edge with an id that is already in use
    EdgeExists,

    /// Referenced an edge that is not part of the graph
    EdgeMissing,

    /// The graph has no nodes
    EmptyGraph,

    /// The graph does not have exactly one root node (nodes without inputs)
    RootCount(usize),

    /// The graph does not have exactly one leaf node (nodes without outputs)
    LeafCount(usize),

    /// Not every node could be walked, which only happens if the graph contains a cycle
    Cycle { walked: usize, total: usize },

    /// An edge weight was NaN or infinite
    NonFiniteWeight,

    /// The graph does not fit in the fixed capacity of a bounded storage strategy
    CapacityExceeded { required: usize, capacity: usize },

    /// A prefix or suffix view asked for more grid rows or columns than the wrapped graph has
    GridOutOfBounds { down_count: usize, right_count: usize },

    /// Input file did not contain the two sequences to align
    SequenceCount(usize),

    /// Other IO errors
    IOError(io::Error),
}

impl Error for AlignerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            Self::IOError(ref source) => Some(source),
            _ => None
        }
    }
}

impl From<io::Error> for AlignerError {
    fn from(value: io::Error) -> Self {
        Self::IOError(value)
    }
}

impl Display for AlignerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::NodeExists =>
                write!(f, "Node already exists!"),
            Self::NodeMissing =>
                write!(f, "Node doesn't exist!"),
            Self::EdgeExists =>
                write!(f, "Edge already exists!"),
            Self::EdgeMissing =>
                write!(f, "Edge doesn't exist!"),
            Self::EmptyGraph =>
                write!(f, "The graph does not contain any nodes."),
            Self::RootCount(count) =>
                write!(f, "Exactly 1 root node required, found {count}."),
            Self::LeafCount(count) =>
                write!(f, "Exactly 1 leaf node required, found {count}."),
            Self::Cycle { walked, total } =>
                write!(f, "Only {walked} of {total} nodes could be walked, the graph contains a cycle."),
            Self::NonFiniteWeight =>
                write!(f, "Encountered an edge weight that is not finite."),
            Self::CapacityExceeded { required, capacity } =>
                write!(f, "Bounded storage too small: {required} elements required, capacity is {capacity}."),
            Self::GridOutOfBounds { down_count, right_count } =>
                write!(f, "A {down_count} x {right_count} grid does not fit in the wrapped alignment graph."),
            Self::SequenceCount(count) =>
                write!(f, "Expected 2 sequences to align, found {count}."),
            Self::IOError(ref err) =>
                err.fmt(f),
        }
    }
}

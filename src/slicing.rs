//! Anti-diagonal partitioning of pairwise alignment graphs.
//!
//! All cells on one anti-diagonal are independent of each other, so an anti-diagonal can be
//! split into segments that are processed in parallel. This is used to evaluate edge weights on
//! multiple threads ahead of the (sequential) backtracker run.

use std::thread;

use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::{debug, span, Level};

use crate::graph::{GraphId, PairwiseAlignmentGraph};
use crate::scoring::Weight;

/// Addresses an anti-diagonal by where it starts (its bottom-left cell).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Axis {
    /// Anti-diagonal starting at `(position, 0)` on the left column
    DownFromTopLeft,

    /// Anti-diagonal starting at `(down_count - 1, position)` on the bottom row
    RightFromBottomLeft,
}

/// Contiguous run of cells on an anti-diagonal, from bottom-left towards top-right.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiagonalSegment {
    pub first_down: usize,
    pub first_right: usize,
    pub len: usize,
}

impl DiagonalSegment {
    pub fn cells(&self) -> impl Iterator<Item=(usize, usize)> {
        let (down, right) = (self.first_down, self.first_right);
        (0..self.len).map(move |step| (down - step, right + step))
    }
}

/// Number of cells on an anti-diagonal, zero if the position is out of range.
pub fn diagonal_len(down_count: usize, right_count: usize, axis: Axis, position: usize) -> usize {
    match axis {
        Axis::DownFromTopLeft if position < down_count =>
            (position + 1).min(right_count),
        Axis::RightFromBottomLeft if position < right_count =>
            down_count.min(right_count - position),
        _ => 0,
    }
}

/// All anti-diagonals of a grid in topological order. Together they cover every cell exactly
/// once.
pub fn anti_diagonals(down_count: usize, right_count: usize) -> impl Iterator<Item=(Axis, usize)> {
    let from_left = (0..down_count).map(|p| (Axis::DownFromTopLeft, p));
    let from_bottom = (1..right_count).map(|p| (Axis::RightFromBottomLeft, p));

    from_left.chain(from_bottom)
}

/// Split an anti-diagonal into at most `max_segments` segments of near equal size.
///
/// The segment size is rounded up when the cells don't divide evenly, which may leave fewer
/// segments than requested. The last segment takes the remainder.
pub fn diagonal_segments(
    down_count: usize,
    right_count: usize,
    axis: Axis,
    position: usize,
    max_segments: usize,
) -> Vec<DiagonalSegment> {
    let len = diagonal_len(down_count, right_count, axis, position);
    if len == 0 {
        return Vec::new();
    }

    let (start_down, start_right) = match axis {
        Axis::DownFromTopLeft => (position, 0),
        Axis::RightFromBottomLeft => (down_count - 1, position),
    };

    let mut segments = max_segments.clamp(1, len);
    let mut per_segment = len / segments;
    if len % segments != 0 {
        per_segment += 1;
        segments = segments.min(len.div_ceil(per_segment));
    }

    (0..segments)
        .map(|segment| {
            let offset = segment * per_segment;
            let segment_len = if segment + 1 == segments { len - offset } else { per_segment };

            DiagonalSegment {
                first_down: start_down - offset,
                first_right: start_right + offset,
                len: segment_len,
            }
        })
        .collect()
}

/// Nodes of an anti-diagonal, split into segments. Within a segment, cells run from
/// bottom-left to top-right, and the nodes of a cell are in topological order.
pub fn segmented_diagonal_nodes<G>(graph: &G, axis: Axis, position: usize, max_segments: usize) -> Vec<Vec<G::Node>>
    where G: PairwiseAlignmentGraph
{
    diagonal_segments(graph.down_count(), graph.right_count(), axis, position, max_segments)
        .into_iter()
        .map(|segment| segment.cells()
            .flat_map(|(down, right)| graph.grid_offset_to_nodes(down, right))
            .collect())
        .collect()
}

/// Edge weights evaluated ahead of time.
#[derive(Debug, Clone)]
pub struct PrecomputedWeights<E, W> {
    weights: FxHashMap<E, W>,
}

impl<E, W> PrecomputedWeights<E, W>
where
    E: GraphId,
    W: Weight,
{
    pub fn get(&self, edge: E) -> Option<W> {
        self.weights.get(&edge).copied()
    }

    /// Weight accessor for the backtracker.
    pub fn weight(&self, edge: E) -> W {
        debug_assert!(self.weights.contains_key(&edge), "No weight for edge {edge:?}");
        self.get(edge).unwrap_or_else(W::zero)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Evaluate every edge weight of a graph on `threads` worker threads.
///
/// Anti-diagonal segments are sent to the workers, which evaluate the incoming edges of each
/// node in the segment. Every edge has exactly one target node, so every edge is evaluated
/// exactly once.
pub fn precompute_edge_weights<G, W, F>(graph: &G, edge_weight: F, threads: usize) -> PrecomputedWeights<G::Edge, W>
where
    G: PairwiseAlignmentGraph + Sync,
    G::Node: Send,
    G::Edge: Send,
    W: Weight + Send,
    F: Fn(G::Edge) -> W + Sync,
{
    let threads = threads.max(1);
    let span = span!(Level::DEBUG, "precompute_edge_weights", threads);
    let _enter = span.enter();

    let (tx, rx) = crossbeam_channel::unbounded::<Vec<G::Node>>();
    let (tx_out, rx_out) = crossbeam_channel::unbounded::<Vec<(G::Edge, W)>>();
    let mut weights = FxHashMap::default();

    thread::scope(|scope| {
        for _ in 0..threads {
            let thread_rx = rx.clone();
            let thread_tx = tx_out.clone();
            let edge_weight = &edge_weight;

            scope.spawn(move || {
                while let Ok(segment) = thread_rx.recv() {
                    let computed: Vec<_> = segment.into_iter()
                        .flat_map(|node| graph.inputs(node))
                        .map(|edge| (edge, edge_weight(edge)))
                        .collect();

                    if thread_tx.send(computed).is_err() {
                        break;
                    }
                }
            });
        }

        drop(rx);
        drop(tx_out);

        let mut segment_count = 0usize;
        for (axis, position) in anti_diagonals(graph.down_count(), graph.right_count()) {
            for segment in segmented_diagonal_nodes(graph, axis, position, threads) {
                segment_count += 1;
                if tx.send(segment).is_err() {
                    break;
                }
            }
        }

        drop(tx);

        while let Ok(computed) = rx_out.recv() {
            weights.extend(computed);
        }

        debug!(segments = segment_count, edges = weights.len(), "Precomputed edge weights");
    });

    PrecomputedWeights { weights }
}

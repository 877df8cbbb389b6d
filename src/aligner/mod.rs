pub mod alignment;
pub mod utils;

use serde::Serialize;
use tracing::{debug, info};

use crate::backtrack::{AllocatorStrategy, Backtracker, HeapStrategy};
use crate::errors::AlignerError;
use crate::graph::PairwiseAlignmentGraph;
use crate::graphs::{
    ExtendedGapAlignmentGraph, FittingAlignmentGraph, GlobalAlignmentGraph, LocalAlignmentGraph,
    OverlapAlignmentGraph,
};
use crate::scoring::{SimpleScorer, Weight};
use crate::slicing::precompute_edge_weights;

pub use alignment::Alignment;
pub use utils::alignment_to_stacked_string;

/// Which parts of the two sequences take part in the alignment.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum AlignmentMode {
    /// Both sequences end to end, linear gap weights
    Global,

    /// Best scoring pair of substrings
    Local,

    /// The whole right sequence against a substring of the down sequence
    Fitting,

    /// A suffix of the down sequence against a prefix of the right sequence
    Overlap,

    /// Both sequences end to end, with separate weights for opening and extending a gap
    ExtendedGap,
}

/// Edge weights used to build the alignment graphs.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Scores<W> {
    pub match_weight: W,
    pub mismatch_weight: W,

    /// Weight of each gap element in the linear gap modes
    pub gap_weight: W,

    /// Weight of the first element of a gap in extended gap mode
    pub gap_open_weight: W,

    /// Weight of every further element of a gap in extended gap mode
    pub gap_extend_weight: W,

    /// Weight of freeride edges (local, fitting and overlap alignment)
    pub freeride_weight: W,
}

impl<W: Weight> Scores<W> {
    /// Linear gap weights. Extended gap mode uses the gap weight for opening and extending.
    pub fn linear(match_weight: W, mismatch_weight: W, gap_weight: W) -> Self {
        Self {
            match_weight,
            mismatch_weight,
            gap_weight,
            gap_open_weight: gap_weight,
            gap_extend_weight: gap_weight,
            freeride_weight: W::zero(),
        }
    }

    pub fn with_extended_gaps(self, gap_open_weight: W, gap_extend_weight: W) -> Self {
        Self { gap_open_weight, gap_extend_weight, ..self }
    }

    fn substitution(&self) -> SimpleScorer<W> {
        SimpleScorer::substitution(self.match_weight, self.mismatch_weight)
    }
}

/// Aligns two sequences by building the alignment graph of the chosen mode and finding its max
/// weight path.
pub struct PairwiseAligner<W, A = HeapStrategy> {
    mode: AlignmentMode,
    scores: Scores<W>,
    backtracker: Backtracker<A>,
    threads: usize,
}

impl<W> PairwiseAligner<W, HeapStrategy>
    where W: Weight + Send + Sync
{
    pub fn new(mode: AlignmentMode, scores: Scores<W>) -> Self {
        Self::with_strategy(mode, scores, HeapStrategy::default())
    }
}

impl<W, A> PairwiseAligner<W, A>
where
    W: Weight + Send + Sync,
    A: AllocatorStrategy,
{
    pub fn with_strategy(mode: AlignmentMode, scores: Scores<W>, strategy: A) -> Self {
        Self {
            mode,
            scores,
            backtracker: Backtracker::new(strategy),
            threads: 1,
        }
    }

    /// Evaluate edge weights on multiple threads before running the backtracker.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    pub fn mode(&self) -> AlignmentMode {
        self.mode
    }

    pub fn scores(&self) -> &Scores<W> {
        &self.scores
    }

    pub fn align<D, R>(&self, down: &[D], right: &[R]) -> Result<Alignment<W>, AlignerError>
    where
        D: PartialEq<R> + Sync,
        R: Sync,
    {
        info!(mode = ?self.mode, down_len = down.len(), right_len = right.len(), "Aligning");

        let scores = &self.scores;
        match self.mode {
            AlignmentMode::Global => self.run(&GlobalAlignmentGraph::new(
                down,
                right,
                scores.substitution(),
                SimpleScorer::gap(scores.gap_weight),
            )),
            AlignmentMode::Local => self.run(&LocalAlignmentGraph::new(
                down,
                right,
                scores.substitution(),
                SimpleScorer::gap(scores.gap_weight),
                SimpleScorer::freeride(scores.freeride_weight),
            )),
            AlignmentMode::Fitting => self.run(&FittingAlignmentGraph::new(
                down,
                right,
                scores.substitution(),
                SimpleScorer::gap(scores.gap_weight),
                SimpleScorer::freeride(scores.freeride_weight),
            )),
            AlignmentMode::Overlap => self.run(&OverlapAlignmentGraph::new(
                down,
                right,
                scores.substitution(),
                SimpleScorer::gap(scores.gap_weight),
                SimpleScorer::freeride(scores.freeride_weight),
            )),
            // Closing a gap does not consume anything and is free
            AlignmentMode::ExtendedGap => self.run(&ExtendedGapAlignmentGraph::new(
                down,
                right,
                scores.substitution(),
                SimpleScorer::gap(scores.gap_open_weight),
                SimpleScorer::gap(scores.gap_extend_weight),
                SimpleScorer::freeride(W::zero()),
            )),
        }
    }

    fn run<G>(&self, graph: &G) -> Result<Alignment<W>, AlignerError>
    where
        G: PairwiseAlignmentGraph<EdgeData=W> + Sync,
        G::Node: Send,
        G::Edge: Send,
    {
        let result = if self.threads > 1 {
            let weights = precompute_edge_weights(graph, |edge| graph.edge_data(edge), self.threads);
            self.backtracker.find_max_path_on_grid_with(graph, |edge| weights.weight(edge))?
        } else {
            self.backtracker.find_max_path_on_grid(graph)?
        };

        let pairs: Vec<_> = result.path.iter()
            .map(|edge| graph.edge_to_element_offsets(*edge))
            .collect();

        debug!(score = ?result.weight, edges = pairs.len(), "Alignment done");
        Ok(Alignment::new(result.weight, pairs))
    }
}

#[cfg(test)]
mod tests {
    use super::{alignment_to_stacked_string, AlignmentMode, PairwiseAligner, Scores};
    use crate::backtrack::BoundedStrategy;

    fn scores() -> Scores<f64> {
        Scores::linear(1.0, -1.0, -1.0)
    }

    #[test]
    fn test_global() {
        let aligner = PairwiseAligner::new(AlignmentMode::Global, scores());
        let aln = aligner.align(b"acgt", b"agt").unwrap();

        assert_eq!(aln.score, 2.0);
        assert_eq!(aln.aligned_pairs().collect::<Vec<_>>(), vec![(0, 0), (2, 1), (3, 2)]);
        assert_eq!(aln.indel_count(), 1);
        assert_eq!(aln.freeride_count(), 0);

        // Bytes render as numbers, padded to the widest one
        let stacked = alignment_to_stacked_string(b"acgt", b"agt", &aln.pairs, "", "-", "-", ' ');
        assert_eq!(stacked, "97 99 103116\n97 -  103116");
    }

    #[test]
    fn test_global_chars() {
        let down: Vec<char> = "hello".chars().collect();
        let right: Vec<char> = "mellow".chars().collect();

        let aligner = PairwiseAligner::new(AlignmentMode::Global, Scores::linear(1.0, -3.0, -1.0));
        let aln = aligner.align(&down, &right).unwrap();

        // Two gaps for h and m beat a mismatch
        assert_eq!(aln.score, 1.0);
        assert_eq!(aln.aligned_pairs().count(), 4);
        assert_eq!(
            alignment_to_stacked_string(&down, &right, &aln.pairs, "", "-", "-", ' ').lines().count(),
            2
        );
    }

    #[test]
    fn test_local() {
        let aligner = PairwiseAligner::new(AlignmentMode::Local, scores());
        let aln = aligner.align(b"xxabcyy", b"zabcz").unwrap();

        assert_eq!(aln.score, 3.0);
        assert_eq!(aln.aligned_pairs().collect::<Vec<_>>(), vec![(2, 1), (3, 2), (4, 3)]);
        assert_eq!(aln.freeride_count(), 2);
        assert_eq!(aln.indel_count(), 0);
    }

    #[test]
    fn test_fitting() {
        let aligner = PairwiseAligner::new(AlignmentMode::Fitting, scores());
        let aln = aligner.align(b"ttacgtt", b"acg").unwrap();

        assert_eq!(aln.score, 3.0);
        assert_eq!(aln.aligned_pairs().collect::<Vec<_>>(), vec![(2, 0), (3, 1), (4, 2)]);
    }

    #[test]
    fn test_overlap() {
        let aligner = PairwiseAligner::new(AlignmentMode::Overlap, scores());
        let aln = aligner.align(b"ttacg", b"acgcc").unwrap();

        assert_eq!(aln.score, 3.0);
        assert_eq!(aln.aligned_pairs().collect::<Vec<_>>(), vec![(2, 0), (3, 1), (4, 2)]);
    }

    #[test]
    fn test_extended_gap() {
        let scores = Scores::linear(1.0, -1.0, -2.0).with_extended_gaps(-2.0, -1.0);

        let extended = PairwiseAligner::new(AlignmentMode::ExtendedGap, scores);
        let aln = extended.align(b"aaaa", b"aa").unwrap();
        assert_eq!(aln.score, -1.0);
        assert_eq!(aln.aligned_pairs().count(), 2);
        assert_eq!(aln.indel_count(), 2);

        let linear = PairwiseAligner::new(AlignmentMode::Global, scores);
        assert_eq!(linear.align(b"aaaa", b"aa").unwrap().score, -2.0);
    }

    #[test]
    fn test_threads_and_storage_agree() {
        let down = b"gattacagattaca";
        let right = b"gcatgcagtaca";

        for mode in [AlignmentMode::Global, AlignmentMode::Local, AlignmentMode::ExtendedGap] {
            let scores = Scores::linear(2.0, -1.0, -1.0).with_extended_gaps(-3.0, -1.0);

            let single = PairwiseAligner::new(mode, scores).align(down, right).unwrap();
            let threaded = PairwiseAligner::new(mode, scores).with_threads(4).align(down, right).unwrap();
            let bounded = PairwiseAligner::with_strategy(mode, scores, BoundedStrategy::<{ 3 * 15 * 13 }, 128, 64>)
                .align(down, right)
                .unwrap();

            assert_eq!(single, threaded);
            assert_eq!(single, bounded);
        }
    }

    #[test]
    fn test_empty_sequences() {
        let aligner = PairwiseAligner::new(AlignmentMode::Global, scores());

        let aln = aligner.align(b"", b"acg").unwrap();
        assert_eq!(aln.score, -3.0);
        assert_eq!(aln.indel_count(), 3);

        let aln = aligner.align::<u8, u8>(b"", b"").unwrap();
        assert_eq!(aln.score, 0.0);
        assert!(aln.pairs.is_empty());
    }
}

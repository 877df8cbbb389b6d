use std::fs::{self, File};
use std::io::{self, stdout, BufRead, BufReader, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use flate2::read::MultiGzDecoder;
use itertools::Itertools;
use noodles::fasta;
use serde::Serialize;
use tracing::{info, span, Level};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry};

use gridalign::aligner::{alignment_to_stacked_string, Alignment, AlignmentMode, PairwiseAligner, Scores};
use gridalign::backtrack::BoundedStrategy;
use gridalign::errors::AlignerError;
use gridalign::slicing::{anti_diagonals, diagonal_segments};

trait Output: Write + IsTerminal { }
impl<T> Output for T where T: Write + IsTerminal { }

/// Longest sequence supported by the bounded storage strategy
const BOUNDED_MAX_LEN: usize = 32;

type CliBoundedStrategy = BoundedStrategy<
    { 3 * (BOUNDED_MAX_LEN + 1) * (BOUNDED_MAX_LEN + 1) },
    256,
    { 4 * BOUNDED_MAX_LEN + 2 }
>;

/// Output formats of the align subcommand
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputType {
    /// Both sequences stacked on top of each other
    Stacked,

    /// Score and aligned element offsets as JSON
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
/// What kind of alignment to perform
enum Mode {
    /// Align both sequences end to end
    Global,

    /// Find the best aligning substrings
    Local,

    /// Align the second sequence in full to a substring of the first
    Fitting,

    /// Align a suffix of the first sequence to a prefix of the second
    Overlap,

    /// Global alignment with separate gap open and extend weights
    ExtendedGap,
}

impl From<Mode> for AlignmentMode {
    fn from(value: Mode) -> Self {
        match value {
            Mode::Global => AlignmentMode::Global,
            Mode::Local => AlignmentMode::Local,
            Mode::Fitting => AlignmentMode::Fitting,
            Mode::Overlap => AlignmentMode::Overlap,
            Mode::ExtendedGap => AlignmentMode::ExtendedGap,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Storage {
    /// Growable heap buffers
    Heap,

    /// Fixed size buffers without heap allocations while aligning. Sequences can be at most 32
    /// elements long.
    Bounded,
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct CliArgs {
    /// Set verbosity level. Use multiple times to increase the verbosity level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<CliSubcommand>,
}

#[derive(Subcommand, Debug)]
enum CliSubcommand {
    /// Align the first two sequences of a FASTA file
    Align(AlignArgs),

    /// Print how the anti-diagonals of an alignment grid are split into segments
    Slices(SlicesArgs),
}

#[derive(Args, Debug)]
struct AlignArgs {
    /// Sequences to align in FASTA format, optionally gzipped. The first record is the down
    /// sequence, the second the right sequence.
    #[clap(help_heading = "Inputs")]
    sequences: PathBuf,

    /// Output filename. If not given, defaults to stdout
    #[arg(short, long)]
    #[clap(help_heading = "Outputs")]
    output: Option<PathBuf>,

    /// Output file type.
    #[arg(value_enum, short = 'O', long)]
    #[clap(help_heading = "Outputs")]
    output_type: Option<OutputType>,

    /// Alignment mode
    #[arg(value_enum, short = 'm', long, default_value = "global")]
    #[clap(help_heading = "Alignment configuration")]
    mode: Mode,

    /// Weight of two matching elements
    #[arg(long = "match", default_value_t = 1.0, allow_negative_numbers = true)]
    #[clap(help_heading = "Alignment configuration")]
    match_weight: f64,

    /// Weight of two mismatching elements
    #[arg(long, default_value_t = -1.0, allow_negative_numbers = true)]
    #[clap(help_heading = "Alignment configuration")]
    mismatch: f64,

    /// Weight of each gap element (all modes except extended-gap)
    #[arg(long, default_value_t = -1.0, allow_negative_numbers = true)]
    #[clap(help_heading = "Alignment configuration")]
    gap: f64,

    /// Weight of the first element of a gap (extended-gap mode)
    #[arg(long, default_value_t = -2.0, allow_negative_numbers = true)]
    #[clap(help_heading = "Alignment configuration")]
    gap_open: f64,

    /// Weight of every further element of a gap (extended-gap mode)
    #[arg(long, default_value_t = -1.0, allow_negative_numbers = true)]
    #[clap(help_heading = "Alignment configuration")]
    gap_extend: f64,

    /// Weight of freerides skipping the unaligned ends (local, fitting and overlap modes)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    #[clap(help_heading = "Alignment configuration")]
    freeride: f64,

    /// Storage strategy of the backtracker
    #[arg(value_enum, long, default_value = "heap")]
    #[clap(help_heading = "Performance")]
    storage: Storage,

    /// Number of threads used to compute edge weights
    #[arg(short = 't', long, default_value_t = 1)]
    #[clap(help_heading = "Performance")]
    threads: usize,
}

#[derive(Args, Debug)]
struct SlicesArgs {
    /// Length of the down sequence
    down_len: usize,

    /// Length of the right sequence
    right_len: usize,

    /// Maximum number of segments per anti-diagonal
    #[arg(short = 's', long, default_value_t = 4)]
    max_segments: usize,
}

#[derive(Serialize)]
struct AlignmentOutput<'a> {
    down_name: &'a str,
    right_name: &'a str,
    mode: AlignmentMode,

    #[serde(flatten)]
    alignment: &'a Alignment<f64>,
}

struct SequenceRecord(String, Vec<u8>);

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter_layer = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let stderr_log = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_filter(filter_layer);

    Registry::default().with(stderr_log).init();
}

fn read_sequences(sequences_fname: &Path) -> Result<(SequenceRecord, SequenceRecord)> {
    let is_gzipped = sequences_fname.file_name()
        .map(|v| v.to_string_lossy().ends_with(".gz"))
        .unwrap_or(false);

    let file = File::open(sequences_fname)
        .map_err(AlignerError::from)
        .with_context(|| format!("Could not open sequence file {}", sequences_fname.display()))?;

    let reader_inner: Box<dyn BufRead> = if is_gzipped {
        Box::new(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    let mut reader = fasta::io::Reader::new(reader_inner);

    let mut records = Vec::with_capacity(2);
    for result in reader.records().take(2) {
        let record = result?;
        let seq_name = std::str::from_utf8(record.name())?;

        records.push(SequenceRecord(seq_name.to_string(), record.sequence().as_ref().to_vec()));
    }

    let count = records.len();
    match <[SequenceRecord; 2]>::try_from(records) {
        Ok([down, right]) => Ok((down, right)),
        Err(_) => Err(AlignerError::SequenceCount(count))
            .with_context(|| format!("Could not read sequences from {}", sequences_fname.display())),
    }
}

fn align_subcommand(align_args: &AlignArgs) -> Result<()> {
    let span = span!(Level::INFO, "align_subcommand");
    let _enter = span.enter();

    let (SequenceRecord(down_name, down), SequenceRecord(right_name, right)) = read_sequences(&align_args.sequences)?;
    info!(down = %down_name, right = %right_name, "Read sequences");

    let mode = AlignmentMode::from(align_args.mode);
    let scores = Scores::linear(align_args.match_weight, align_args.mismatch, align_args.gap)
        .with_extended_gaps(align_args.gap_open, align_args.gap_extend);
    let scores = Scores { freeride_weight: align_args.freeride, ..scores };

    let alignment = match align_args.storage {
        Storage::Heap => PairwiseAligner::new(mode, scores)
            .with_threads(align_args.threads)
            .align(&down, &right),
        Storage::Bounded => PairwiseAligner::with_strategy(mode, scores, CliBoundedStrategy::default())
            .with_threads(align_args.threads)
            .align(&down, &right),
    }.with_context(|| format!("Could not align {down_name} to {right_name}"))?;

    info!(score = alignment.score, "Alignment done");

    // Determine where to write the alignment to
    let mut writer: Box<dyn Output> = if let Some(path) = &align_args.output {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?
        }

        let file = File::create(path)
            .with_context(|| format!("Could not create output file {}", path.display()))?;
        Box::new(file) as Box<dyn Output>
    } else {
        Box::new(stdout()) as Box<dyn Output>
    };

    match align_args.output_type.unwrap_or(OutputType::Stacked) {
        OutputType::Stacked => {
            let down_chars: Vec<char> = down.iter().map(|b| char::from(*b)).collect();
            let right_chars: Vec<char> = right.iter().map(|b| char::from(*b)).collect();

            writeln!(writer, "# {down_name} vs {right_name} ({mode:?}), score: {}", alignment.score)?;
            writeln!(writer, "{}", alignment_to_stacked_string(
                &down_chars, &right_chars, &alignment.pairs, "", "-", "-", ' '))?;
        },
        OutputType::Json => {
            let output = AlignmentOutput {
                down_name: &down_name,
                right_name: &right_name,
                mode,
                alignment: &alignment,
            };

            serde_json::to_writer_pretty(&mut writer, &output)?;
            writeln!(writer)?;
        }
    }

    Ok(())
}

fn slices_subcommand(slices_args: &SlicesArgs) -> Result<()> {
    let down_count = slices_args.down_len + 1;
    let right_count = slices_args.right_len + 1;

    let mut writer = stdout().lock();
    for (axis, position) in anti_diagonals(down_count, right_count) {
        let segments = diagonal_segments(down_count, right_count, axis, position, slices_args.max_segments);

        writeln!(
            writer,
            "{axis:?}\t{position}\t{}",
            segments.iter()
                .map(|s| format!("({}, {})x{}", s.first_down, s.first_right, s.len))
                .join(" ")
        )?;
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.verbose);

    match &args.command {
        Some(CliSubcommand::Align(v)) => {
            align_subcommand(v)?
        },
        Some(CliSubcommand::Slices(v)) => {
            slices_subcommand(v)?
        },
        None => {
            bail!("No subcommand given.")
        }
    };

    Ok(())
}

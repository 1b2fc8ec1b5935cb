use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use fluree_graph_split::{FormatKind, RecordKind};

#[derive(Parser)]
#[command(
    name = "fluree-split",
    about = "Split Turtle and TriG files into independently parseable fragments",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output (also respects NO_COLOR env var)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to a TOML split configuration
    #[arg(long, global = true, env = "FLUREE_SPLIT_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Options shared by every command that reads a data file.
#[derive(Debug, Clone, clap::Args)]
pub struct InputArgs {
    /// Data file (.ttl or .trig)
    pub file: PathBuf,

    /// Data format; detected from the file extension if omitted
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Bytes scanned for leading prefix declarations (overrides config)
    #[arg(long)]
    pub prefix_scan_bytes: Option<u64>,

    /// Collect prefix declarations from the whole file
    #[arg(long)]
    pub full_file_prefixes: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the prefix table every fragment of a file carries
    Prefixes {
        #[command(flatten)]
        input: InputArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = TableOutput::Table)]
        output: TableOutput,
    },

    /// Show requested and adjusted ranges of an N-way split
    Plan {
        #[command(flatten)]
        input: InputArgs,

        /// Number of fragments
        #[arg(short = 'n', long, default_value_t = 4)]
        fragments: usize,

        /// Output format
        #[arg(long, value_enum, default_value_t = TableOutput::Table)]
        output: TableOutput,
    },

    /// Read the records of one byte range
    Read {
        #[command(flatten)]
        input: InputArgs,

        /// Start of the requested range (inclusive)
        #[arg(long, default_value_t = 0)]
        start: u64,

        /// End of the requested range (exclusive); defaults to end of file
        #[arg(long)]
        end: Option<u64>,

        /// Record kind; triple for Turtle and quad for TriG if omitted
        #[arg(long, value_enum)]
        record: Option<RecordArg>,

        /// Output format
        #[arg(long, value_enum, default_value_t = RecordOutput::Nquads)]
        output: RecordOutput,
    },

    /// Split a file and read every fragment on worker threads
    Run {
        #[command(flatten)]
        input: InputArgs,

        /// Number of fragments
        #[arg(short = 'n', long, default_value_t = 4)]
        fragments: usize,

        /// Worker threads; defaults to available parallelism
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Record kind; triple for Turtle and quad for TriG if omitted
        #[arg(long, value_enum)]
        record: Option<RecordArg>,

        /// Output format
        #[arg(long, value_enum, default_value_t = RunOutput::Summary)]
        output: RunOutput,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Turtle (.ttl)
    Turtle,
    /// TriG (.trig)
    Trig,
}

impl From<FormatArg> for FormatKind {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Turtle => FormatKind::Turtle,
            FormatArg::Trig => FormatKind::Trig,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RecordArg {
    /// One triple per record (Turtle)
    Triple,
    /// One quad per record (TriG)
    Quad,
    /// All quads of one top-level statement per record (TriG)
    Dataset,
}

impl From<RecordArg> for RecordKind {
    fn from(arg: RecordArg) -> Self {
        match arg {
            RecordArg::Triple => RecordKind::Triple,
            RecordArg::Quad => RecordKind::Quad,
            RecordArg::Dataset => RecordKind::Dataset,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TableOutput {
    /// Human-readable table
    Table,
    /// JSON
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RecordOutput {
    /// One N-Quads line per statement
    Nquads,
    /// One JSON object per record
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunOutput {
    /// Per-fragment counts
    Summary,
    /// Every statement as N-Quads, in fragment order
    Nquads,
}

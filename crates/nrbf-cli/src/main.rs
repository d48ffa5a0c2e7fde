//! NRBF command-line tool for .NET Remoting Binary Format streams (the
//! `BinaryFormatter` wire format).
//!
//! # Command overview
//!
//! ```text
//! nrbf <COMMAND> [OPTIONS] [FILE]
//!
//! Commands:
//!   decode     Render a stream as JSON (records, root, backfill, crunch)
//!   inspect    Print one line per top-level record
//!   validate   Check that every stream decodes and backfills
//!   stats      Record-type histogram and object counts
//!   help       Print help information
//!
//! Global options:
//!   -v, --verbose    Log every decoded record to stderr
//!   -h, --help       Print help
//!   -V, --version    Print version
//!
//! Input options (every command):
//!   --base64         Input is base64 text rather than raw bytes
//!   --no-limit       Lift the 64 MiB ceiling on wire lengths
//! ```
//!
//! `FILE` may be omitted or given as `-` to read stdin.
//!
//! # Exit codes
//!
//! | Code | Meaning                                     |
//! |------|---------------------------------------------|
//! | 0    | Success                                     |
//! | 1    | Error (I/O failure, malformed stream, etc.) |
//!
//! All error details are written to stderr so stdout can be piped cleanly.
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use nrbf_driver::DEFAULT_MAX_NODES;

mod cmd_decode;
mod cmd_inspect;
mod cmd_stats;
mod cmd_validate;
mod input;

// ── CLI root ──────────────────────────────────────────────────────────

/// Decode .NET Remoting Binary Format streams.
#[derive(Parser)]
#[command(name = "nrbf", version, about = "NRBF stream decoder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log decoding progress to stderr (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,
}

// ── Sub-commands ──────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Render each stream as JSON.
    Decode(DecodeArgs),
    /// Print one line per top-level record.
    Inspect(InspectArgs),
    /// Check that every stream decodes, backfills and has a root.
    Validate(InputArgs),
    /// Print record and object statistics.
    Stats(StatsArgs),
}

// ── Argument structs ──────────────────────────────────────────────────

/// Where the bytes come from. Shared by every command.
#[derive(clap::Args)]
pub struct InputArgs {
    /// Input file. Reads stdin when omitted or `-`.
    pub file: Option<PathBuf>,

    /// Treat the input as base64 text.
    #[arg(long)]
    pub base64: bool,

    /// Accept strings and counts of any length from the wire.
    #[arg(long)]
    pub no_limit: bool,
}

/// Arguments for `nrbf decode`.
///
/// ```text
/// ┌──────────────────┬─────────────────────────────────────────────────┐
/// │ Flag             │ Output per stream                               │
/// ├──────────────────┼─────────────────────────────────────────────────┤
/// │ (none)           │ every top-level record, literal                 │
/// │ -r / --root      │ the root record only                            │
/// │ -b / --backfill  │ the root with references replaced by targets    │
/// │ -c / --crunch    │ the backfilled root as plain values             │
/// │ -e / --expand    │ copy reused class metadata into ClassWithId     │
/// │ --max-nodes      │ fail once the output passes this many nodes     │
/// │ --pretty         │ indent the JSON                                 │
/// │ -o / --output    │ write to a file instead of stdout               │
/// └──────────────────┴─────────────────────────────────────────────────┘
/// ```
///
/// When more than one flag is given the strongest wins: crunch implies
/// backfill, backfill implies root.
#[derive(clap::Args)]
pub struct DecodeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output only the root object.
    #[arg(short, long)]
    pub root: bool,

    /// Resolve references, then output the root object.
    #[arg(short, long)]
    pub backfill: bool,

    /// Resolve references and reduce the root to plain values.
    #[arg(short, long)]
    pub crunch: bool,

    /// Copy the reused class metadata into every ClassWithId record.
    #[arg(short, long)]
    pub expand: bool,

    /// Stop with an error once the output passes this many JSON nodes.
    #[arg(long, default_value_t = DEFAULT_MAX_NODES)]
    pub max_nodes: usize,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,

    /// Write output to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `nrbf inspect`.
#[derive(clap::Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Also list records nested inside members and elements.
    #[arg(long)]
    pub nested: bool,
}

/// Arguments for `nrbf stats`.
#[derive(clap::Args)]
pub struct StatsArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Emit the report as JSON.
    #[arg(long)]
    pub json: bool,
}

// ── Entry point ───────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn"),
    );
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let result = match cli.command {
        Commands::Decode(args) => cmd_decode::run(&args),
        Commands::Inspect(args) => cmd_inspect::run(&args),
        Commands::Validate(args) => cmd_validate::run(&args),
        Commands::Stats(args) => cmd_stats::run(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

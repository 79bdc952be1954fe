//! CLI argument parsing for querystat

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// How to interpret the input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputKind {
    /// Detect from extension or content (default)
    Auto,
    /// JSON query session with a `queries` list of predicate filters
    Session,
    /// Text file listing one query log path per line
    LogIndex,
}

#[derive(Parser, Debug)]
#[command(name = "querystat")]
#[command(version)]
#[command(about = "Attribute and predicate frequency statistics for query sessions and logs", long_about = None)]
pub struct Cli {
    /// Query session (JSON) or log index (one log path per line)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Input kind
    #[arg(short = 'k', long = "kind", value_enum, default_value = "auto")]
    pub kind: InputKind,

    /// Token that starts a query line in log files (default: LOAD)
    #[arg(short = 'm', long = "marker", value_name = "TOKEN")]
    pub marker: Option<String>,

    /// Hide attributes seen fewer than N times (default: 4 for logs, 0 for sessions)
    #[arg(long = "min-count", value_name = "N")]
    pub min_count: Option<u64>,

    /// Ranks after which a cumulative Top-K line is printed (default: 5,10,20)
    #[arg(long = "top", value_name = "K,...", value_delimiter = ',')]
    pub top: Option<Vec<usize>>,

    /// Report configuration file (TOML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug tracing to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

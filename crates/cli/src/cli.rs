//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Stationlink - incremental weather station record streaming
#[derive(Parser, Debug)]
#[command(
    name = "stationlink",
    author,
    version,
    about = "Incremental weather station record streaming",
    long_about = "Streams weather station rows from a readings log into merged \n\
                  loop packets: live tailing with carry-forward state, startup \n\
                  catch-up with duplicate suppression, and bounded archive replay.\n\
                  Also decodes raw bridge report lines into readings."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "STATIONLINK_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "STATIONLINK_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stream merged packets from a readings log (catch-up, optionally live)
    Stream(StreamArgs),

    /// Replay a bounded archive window and exit
    Replay(ReplayArgs),

    /// Decode raw bridge report lines into readings
    Parse(ParseArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `stream` command
#[derive(Parser, Debug, Clone)]
pub struct StreamArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "station.toml",
        env = "STATIONLINK_CONFIG"
    )]
    pub config: PathBuf,

    /// Path to the readings log (JSON lines, one reading per line)
    #[arg(short, long, env = "STATIONLINK_READINGS")]
    pub readings: PathBuf,

    /// Resume point: suppress packets at or before this epoch timestamp
    #[arg(long)]
    pub resume_from: Option<i64>,

    /// Keep tailing after the backlog is drained (stop with Ctrl+C)
    #[arg(long)]
    pub follow: bool,

    /// Maximum number of packets to emit (0 = unlimited)
    #[arg(long, default_value = "0", env = "STATIONLINK_MAX_PACKETS")]
    pub max_packets: u64,

    /// Channel buffer size for the packet stream
    #[arg(long, default_value = "100", env = "STATIONLINK_BUFFER_SIZE")]
    pub buffer_size: usize,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "STATIONLINK_METRICS_PORT")]
    pub metrics_port: u16,

    /// Validate configuration and readings, then exit without streaming
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `replay` command
#[derive(Parser, Debug, Clone)]
pub struct ReplayArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "station.toml",
        env = "STATIONLINK_CONFIG"
    )]
    pub config: PathBuf,

    /// Path to the readings log (JSON lines, one reading per line)
    #[arg(short, long, env = "STATIONLINK_READINGS")]
    pub readings: PathBuf,

    /// Emit only packets strictly after this epoch timestamp
    #[arg(long)]
    pub since: Option<i64>,

    /// Channel buffer size for the packet stream
    #[arg(long, default_value = "100", env = "STATIONLINK_BUFFER_SIZE")]
    pub buffer_size: usize,
}

/// Arguments for the `parse` command
#[derive(Parser, Debug, Clone)]
pub struct ParseArgs {
    /// Raw report file (one query-string report per line; stdin when omitted)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Row id assigned to the first decoded reading
    #[arg(long, default_value = "1")]
    pub start_id: u64,

    /// Fixed epoch timestamp for decoded readings (wall clock when omitted)
    #[arg(long)]
    pub at: Option<i64>,

    /// Stop at the first undecodable line instead of skipping it
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "station.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "station.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

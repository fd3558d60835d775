//! CLI 인자 정의
//!
//! clap derive 매크로만 사용하며 부수 효과나 I/O가 없습니다.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// eventgate -- 런타임 보안 이벤트 필터 / 필드 마스크 도구.
///
/// Use `eventgate <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "eventgate", version, about, long_about = None)]
pub struct Cli {
    /// Path to the eventgate.toml configuration file.
    ///
    /// Built-in defaults (plus EVENTGATE_* environment overrides) are used when omitted.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Output format for reports.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stream NDJSON events through the configured filters and field masks.
    Run(RunArgs),

    /// Compile filters and field masks and report the result without processing events.
    Check,
}

// ---- run ----

/// Stream events from a file or stdin to stdout.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// NDJSON input file (default: stdin).
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Node name stamped on events that do not carry one.
    #[arg(long)]
    pub node_name: Option<String>,
}

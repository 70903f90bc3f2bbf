//! CLI module
//!
//! Command-line interface for the wide event demo server.
//!
//! # Example
//!
//! ```bash
//! # Pretty output on 127.0.0.1:3000
//! wide-event serve
//!
//! # JSON output with startup fields
//! wide-event serve --json --start env=staging --start version=1.0.0
//! ```

pub mod serve;

use clap::{Args, Parser, Subcommand};

/// wide-event - one canonical log line per request
#[derive(Parser, Debug)]
#[command(
    name = "wide-event",
    version,
    about = "Demo server emitting one wide event per request"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the demo server
    Serve(ServeArgs),
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Override server port
    #[arg(short, long, env = "WIDE_EVENT_PORT")]
    pub port: Option<u16>,

    /// Override server host
    #[arg(short = 'H', long, env = "WIDE_EVENT_HOST")]
    pub host: Option<String>,

    /// Set diagnostic log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "WIDE_EVENT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Emit wide events as JSON lines regardless of APP_ENV
    #[arg(long)]
    pub json: bool,

    /// Disable colors in pretty output
    #[arg(long)]
    pub no_ansi: bool,

    /// Header carrying an incoming request ID
    #[arg(long)]
    pub request_id_header: Option<String>,

    /// Extra startup record field as key=value (repeatable)
    #[arg(long = "start", value_name = "KEY=VALUE")]
    pub start: Vec<String>,
}

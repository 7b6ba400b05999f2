//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Keystone Groups - drive group operations through the producer
#[derive(Parser, Debug)]
#[command(
    name = "keystone-groups",
    author,
    version,
    about = "Keystone group producer",
    long_about = "Feeds JSON-line messages through a Keystone group producer.\n\n\
                  Each input line is one message (headers + body); each output line \n\
                  is the same message after the producer has processed it."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "KEYSTONE_GROUPS_VERBOSE")]
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
        env = "KEYSTONE_GROUPS_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log level used when RUST_LOG is not set
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Prometheus port, only meaningful for `run`
    pub fn metrics_port(&self) -> Option<u16> {
        match &self.command {
            Commands::Run(args) => args.metrics_port.filter(|port| *port != 0),
            _ => None,
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process a file of JSON-line messages
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "keystone.toml",
        env = "KEYSTONE_GROUPS_CONFIG"
    )]
    pub config: PathBuf,

    /// JSON-lines message file ("-" reads stdin)
    #[arg(short, long, default_value = "-")]
    pub input: PathBuf,

    /// Override the endpoint's default operation
    #[arg(long)]
    pub operation: Option<String>,

    /// Override the route queue capacity
    #[arg(long)]
    pub queue_capacity: Option<usize>,

    /// Prometheus metrics port (omit or 0 = disabled)
    #[arg(long, env = "KEYSTONE_GROUPS_METRICS_PORT")]
    pub metrics_port: Option<u16>,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "keystone.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "keystone.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_args() {
        let cli = Cli::parse_from([
            "keystone-groups",
            "-v",
            "run",
            "--config",
            "k.toml",
            "--input",
            "msgs.jsonl",
            "--metrics-port",
            "9100",
        ]);
        assert_eq!(cli.log_level(), "debug");
        assert_eq!(cli.metrics_port(), Some(9100));
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.config, PathBuf::from("k.toml"));
                assert_eq!(args.input, PathBuf::from("msgs.jsonl"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_metrics_port_zero_disables() {
        let cli = Cli::parse_from(["keystone-groups", "run", "--metrics-port", "0"]);
        assert_eq!(cli.metrics_port(), None);

        let cli = Cli::parse_from(["keystone-groups", "-q", "info"]);
        assert_eq!(cli.metrics_port(), None);
        assert_eq!(cli.log_level(), "error");
    }
}

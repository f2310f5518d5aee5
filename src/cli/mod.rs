//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use signal_core::types::StrategyKind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "signal-agent")]
#[command(author, version, about = "Trading signal aggregator for leveraged ETFs and small caps")]
pub struct Cli {
    /// Configuration file path (defaults apply when omitted)
    #[arg(short, long, env = "SIGNALS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level, overrides the configured one
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute signals for a strategy
    Scan(ScanArgs),
    /// List available strategies
    Strategies,
    /// Validate configuration
    ValidateConfig,
}

#[derive(Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(clap::Args)]
pub struct ScanArgs {
    /// Strategy to run (leveraged_etf, momentum_smallcap)
    #[arg(short, long)]
    pub strategy: StrategyKind,

    /// Symbols to score (comma-separated)
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Skip writing the CSV snapshots
    #[arg(long)]
    pub no_persist: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scan() {
        let cli = Cli::try_parse_from([
            "signal-agent",
            "--json-logs",
            "scan",
            "--strategy",
            "momentum-smallcap",
            "-S",
            "VRTX,CRSP",
            "--no-persist",
        ])
        .unwrap();

        assert!(cli.json_logs);
        let Commands::Scan(args) = cli.command else {
            panic!("expected scan");
        };
        assert_eq!(args.strategy, StrategyKind::MomentumSmallcap);
        assert_eq!(args.symbols, vec!["VRTX", "CRSP"]);
        assert!(args.no_persist);
        assert!(matches!(args.output, OutputFormat::Text));
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let result = Cli::try_parse_from(["signal-agent", "scan", "--strategy", "rsi"]);
        assert!(result.is_err());
    }
}

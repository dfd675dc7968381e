//! # keybatch
//!
//! Command-line driver for the keybatch scheduler.
//!
//! ## Usage
//!
//! ```bash
//! # One run with the defaults (100 stations, 10 keys/txn, 1000 batches)
//! keybatch run
//!
//! # Smaller run, JSON output, every batch size listed
//! keybatch --json run --stations 10 --batches 200 --show-batches
//!
//! # Compare station counts under the same workload
//! keybatch sweep --station-counts 1,10,100 --policy largest-key-set
//!
//! # Replay a trace and verify disjointness
//! keybatch run --trace txns.txt --txn-size 4 --audit
//!
//! # Show the effective configuration
//! keybatch --config keybatch.toml config
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

pub use config::Config;
pub use error::CliError;
pub use output::Output;

/// keybatch CLI
#[derive(Parser, Debug)]
#[command(name = "keybatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Config file (TOML); defaults to ~/.keybatch/config.toml when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// CLI commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the scheduler once
    Run(commands::run::RunCommand),
    /// Compare mean batch size across station counts
    Sweep(commands::sweep::SweepCommand),
    /// Show the effective configuration
    Config,
}

fn main() {
    let cli = Cli::parse();

    // logs go to stderr so JSON on stdout stays parseable
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Err(e) = execute(cli.command, cli.config.as_deref(), cli.json) {
        if cli.json {
            println!(
                "{}",
                serde_json::json!({
                    "error": format!("{e:#}"),
                    "success": false
                })
            );
        } else {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(1);
    }
}

fn execute(command: Commands, config_path: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let config = Config::load(config_path).context("loading configuration")?;

    match command {
        Commands::Run(cmd) => cmd.execute(config, json)?,
        Commands::Sweep(cmd) => cmd.execute(config, json)?,
        Commands::Config => show_config(&config, json)?,
    }
    Ok(())
}

fn show_config(config: &Config, json: bool) -> Result<(), CliError> {
    Output::new(json)
        .field_value("config", serde_json::to_value(config)?)
        .message(config.to_toml()?.trim_end())
        .print();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use keybatch_scheduler::PolicyKind;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["keybatch", "run"]);
        assert!(!cli.json);
        assert!(cli.config.is_none());
        assert_eq!(cli.log_level, "info");
        match cli.command {
            Commands::Run(cmd) => {
                assert!(cmd.schedule.stations.is_none());
                assert!(cmd.schedule.policy.is_none());
                assert!(!cmd.schedule.audit);
                assert!(!cmd.show_batches);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_run_custom_values() {
        let cli = Cli::parse_from([
            "keybatch",
            "--json",
            "--log-level", "debug",
            "run",
            "--stations", "8",
            "--txn-size", "4",
            "--batches", "50",
            "--max-attempts", "1000",
            "--policy", "largest-key-set",
            "--seed", "42",
            "--audit",
            "--drain",
            "--hot-probability", "0.5",
        ]);
        assert!(cli.json);
        assert_eq!(cli.log_level, "debug");
        match cli.command {
            Commands::Run(cmd) => {
                let s = cmd.schedule;
                assert_eq!(s.stations, Some(8));
                assert_eq!(s.txn_size, Some(4));
                assert_eq!(s.batches, Some(50));
                assert_eq!(s.max_attempts, Some(1000));
                assert_eq!(s.policy, Some(PolicyKind::LargestKeySet));
                assert_eq!(s.seed, Some(42));
                assert!(s.audit);
                assert!(s.drain);
                assert_eq!(s.hot_probability, Some(0.5));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_sweep_station_counts() {
        let cli = Cli::parse_from(["keybatch", "sweep", "--station-counts", "2,4,8"]);
        match cli.command {
            Commands::Sweep(cmd) => assert_eq!(cmd.station_counts, vec![2, 4, 8]),
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::parse_from(["keybatch", "sweep"]);
        match cli.command {
            Commands::Sweep(cmd) => assert_eq!(cmd.station_counts, vec![1, 10, 100]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_policy() {
        assert!(Cli::try_parse_from(["keybatch", "run", "--policy", "fifo"]).is_err());
    }

    #[test]
    fn test_cli_trace_conflicts_with_hot_flags() {
        let result =
            Cli::try_parse_from(["keybatch", "run", "--trace", "t.txt", "--hot-keys", "5"]);
        assert!(result.is_err());
    }
}

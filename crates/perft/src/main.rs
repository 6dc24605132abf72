//! Perft - Counts move-tree leaves to validate the move generator.
//!
//! Runs a single position (optionally split by root move), a suite of
//! positions with known counts, or writes the slider attack tables to a
//! file that later runs can load with `--tables`.

mod config;
mod report;

use anyhow::Context;
use chess_core::{parse_setup, FenParser};
use chess_movegen::{init_attack_tables, store_attack_tables, Board, TableSource};
use clap::{Parser, Subcommand};
use config::SuiteConfig;
use report::{PerftReport, SuiteReport};
use serde::Serialize;
use std::fmt::Display;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Perft - Move generator validation.
#[derive(Parser)]
#[command(name = "perft")]
#[command(about = "Counts legal move-tree leaves for chess positions")]
struct Cli {
    /// Load slider attack tables from this file instead of generating them
    #[arg(long, global = true)]
    tables: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Count the leaves below one position
    Run {
        /// Position in FEN
        #[arg(long, default_value = FenParser::STARTPOS)]
        fen: String,

        /// Search depth in plies
        #[arg(short, long, default_value = "4")]
        depth: u32,

        /// Print the count below each root move
        #[arg(long)]
        divide: bool,
    },
    /// Check a suite of positions against their expected counts
    Suite {
        /// Suite file (defaults to perft.toml, then the built-in positions)
        path: Option<PathBuf>,
    },
    /// Write the slider attack tables to a file
    ExportTables {
        /// Destination file
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    if let Some(path) = &cli.tables {
        init_attack_tables(TableSource::File(path.clone()))
            .with_context(|| format!("loading attack tables from {}", path.display()))?;
    }

    match cli.command {
        Command::Run { fen, depth, divide } => {
            let setup = parse_setup(&fen).with_context(|| format!("invalid FEN {fen:?}"))?;
            let mut board = Board::from_setup(&setup);
            tracing::info!(depth, "running perft");
            let report = PerftReport::measure(&mut board, &fen, depth, divide);
            emit(&report, cli.json)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Suite { path } => {
            let suite = SuiteConfig::load(path.as_deref()).context("loading perft suite")?;
            tracing::info!("running {} suite positions", suite.positions.len());
            let report = SuiteReport::run(&suite)?;
            emit(&report, cli.json)?;
            Ok(if report.passed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::ExportTables { path } => {
            store_attack_tables(&path)
                .with_context(|| format!("writing attack tables to {}", path.display()))?;
            tracing::info!("attack tables written to {:?}", path);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn emit<T: Serialize + Display>(report: &T, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}

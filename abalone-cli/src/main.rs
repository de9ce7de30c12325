//! Abalone CLI - Command-line interface
//!
//! Commands:
//! - match: Play two player configurations against each other
//! - analyse: Summarize a directory of game records
//! - distances: Export the cell-to-cell distance table
//! - best-move: Run one timed search and report the decision

mod analyse_cmd;
mod best_move_cmd;
mod distances_cmd;
mod match_cmd;
mod players;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "abalone")]
#[command(about = "Abalone alpha-beta engine and match runner")]
struct Cli {
    /// Log filter used when RUST_LOG is unset (e.g. "debug", "abalone_core=debug")
    #[arg(long, global = true, default_value = "info")]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a match between two players
    Match(match_cmd::MatchArgs),
    /// Summarize saved game records for one player
    Analyse(analyse_cmd::AnalyseArgs),
    /// Write the precomputed distance table as JSON
    Distances(distances_cmd::DistancesArgs),
    /// Pick a move for one position under a time budget
    BestMove(best_move_cmd::BestMoveArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON reports on stdout stay parseable
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Match(args) => match_cmd::run(args),
        Commands::Analyse(args) => analyse_cmd::run(args),
        Commands::Distances(args) => distances_cmd::run(args),
        Commands::BestMove(args) => best_move_cmd::run(args),
    }
}

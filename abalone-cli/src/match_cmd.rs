//! Match command - play games between two player configurations
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_players(), play_match(), report_results()
//! - Level 3: save_records()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use abalone_core::game::DEFAULT_MAX_PLIES;
use abalone_tournament::{play_match, save_records, AiConfig, MatchConfig, MatchResult};

use crate::players::{resolve_player, SearchArgs};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// First player: alpha-beta, greedy, random, or a config JSON file
    #[arg(long, default_value = "alpha-beta")]
    pub first: String,

    /// Second player: alpha-beta, greedy, random, or a config JSON file
    #[arg(long, default_value = "random")]
    pub second: String,

    /// Number of games to play (will alternate colors)
    #[arg(long, default_value = "10")]
    pub games: usize,

    #[command(flatten)]
    pub search: SearchArgs,

    /// Ply limit per game
    #[arg(long, default_value_t = DEFAULT_MAX_PLIES)]
    pub max_plies: u16,

    /// Random plies played before the players take over
    #[arg(long, default_value = "2")]
    pub opening_plies: usize,

    /// Base random seed
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Play games one at a time instead of in parallel
    #[arg(long)]
    pub sequential: bool,

    /// Directory to write one JSON record per game
    #[arg(long, value_name = "DIR")]
    pub records: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Resolve both players
/// 2. Play the match (multiple games)
/// 3. Save records if asked
/// 4. Report results
pub fn run(args: MatchArgs) -> Result<()> {
    let (first, second) = load_players(&args)?;
    let config = match_config(&args);

    tracing::info!(
        "Starting match: {} vs {} ({} games, max {} plies)",
        first.name,
        second.name,
        config.games,
        config.max_plies
    );

    let results = play_match(&first, &second, &config);

    if let Some(dir) = &args.records {
        let written = save_records(dir, &results.records)?;
        tracing::info!("Wrote {} records to {}", written.len(), dir.display());
    }

    report_results(&results, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Resolve both players
fn load_players(args: &MatchArgs) -> Result<(AiConfig, AiConfig)> {
    let first = resolve_player(&args.first, &args.search)?;
    let second = resolve_player(&args.second, &args.search)?;
    Ok((first, second))
}

fn match_config(args: &MatchArgs) -> MatchConfig {
    let config = MatchConfig::new(args.games)
        .with_max_plies(args.max_plies)
        .with_opening_plies(args.opening_plies)
        .with_seed(args.seed);
    if args.sequential {
        config.sequential()
    } else {
        config
    }
}

/// Report match results
fn report_results(results: &MatchResult, args: &MatchArgs) -> Result<()> {
    if args.json {
        print_json_results(results)
    } else {
        print_text_results(results);
        Ok(())
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Print results as JSON
fn print_json_results(results: &MatchResult) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonGame<'a> {
        game: usize,
        black: &'a str,
        white: &'a str,
        result: String,
        plies: u32,
        black_captures: u8,
        white_captures: u8,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        first: &'a str,
        second: &'a str,
        total_games: u32,
        first_wins: u32,
        second_wins: u32,
        draws: u32,
        avg_plies: f32,
        avg_first_centrality: f32,
        first_win_rate: f32,
        first_score: f32,
        games: Vec<JsonGame<'a>>,
    }

    let output = JsonOutput {
        first: &results.first,
        second: &results.second,
        total_games: results.games_played,
        first_wins: results.first_wins,
        second_wins: results.second_wins,
        draws: results.draws,
        avg_plies: results.avg_plies,
        avg_first_centrality: results.avg_first_centrality,
        first_win_rate: results.first_win_rate(),
        first_score: results.score_for_first(),
        games: results
            .records
            .iter()
            .map(|r| JsonGame {
                game: r.game,
                black: &r.black,
                white: &r.white,
                result: format!("{:?}", r.result),
                plies: r.plies,
                black_captures: r.black_captures,
                white_captures: r.white_captures,
            })
            .collect(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print results as text
fn print_text_results(results: &MatchResult) {
    println!("\n=== Match Results ===");
    println!("{} vs {}", results.first, results.second);
    println!("Total games: {}", results.games_played);
    println!(
        "{:<12} {} ({:.1}%)",
        format!("{} wins:", results.first),
        results.first_wins,
        results.first_win_rate() * 100.0
    );
    println!(
        "{:<12} {} ({:.1}%)",
        format!("{} wins:", results.second),
        results.second_wins,
        results.second_win_rate() * 100.0
    );
    println!(
        "{:<12} {} ({:.1}%)",
        "Draws:",
        results.draws,
        results.draw_rate() * 100.0
    );
    println!(
        "Score:       {:.1} / {} for {}",
        results.score_for_first(),
        results.games_played,
        results.first
    );
    println!("Avg plies:   {:.1}", results.avg_plies);
    println!(
        "Avg final distance to center ({}): {:.2}",
        results.first, results.avg_first_centrality
    );

    println!("\n--- Games ---");
    for r in &results.records {
        println!(
            "Game {:>3}: {} (B) vs {} (W) -> {:?} in {} plies, captures {}-{}",
            r.game, r.black, r.white, r.result, r.plies, r.black_captures, r.white_captures
        );
    }
}

//! Best-move command - one timed decision with search statistics

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use abalone_core::{Abalone, AlphaBetaAI, DistanceOracle, Evaluator, Player, Position, SearchConfig};
use abalone_tournament::GameRecord;

use crate::players::SearchArgs;

#[derive(Args)]
pub struct BestMoveArgs {
    /// Search from the final position of this game record instead of the opening
    #[arg(long, value_name = "FILE")]
    pub record: Option<PathBuf>,

    #[command(flatten)]
    pub search: SearchArgs,

    /// Output the decision as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: BestMoveArgs) -> Result<()> {
    let position = load_position(&args)?;
    let evaluator = Evaluator::new(DistanceOracle::global(), args.search.load_weights()?);
    let config = SearchConfig::default()
        .with_depth(args.search.depth)
        .with_time_limit(Duration::from_millis(args.search.time_ms));
    let budget = config.time_limit();
    let mut ai = AlphaBetaAI::new(Abalone, evaluator, config);

    let Some(result) = ai.choose_move(&position, budget) else {
        println!("No legal move: game result {:?}", position.result());
        return Ok(());
    };
    let stats = ai.stats();

    if args.json {
        let output = serde_json::json!({
            "to_move": position.current_player(),
            "move": result.best_move,
            "display": result.best_move.to_string(),
            "score": result.score,
            "depth": result.depth,
            "nodes": result.nodes,
            "cutoffs": stats.cutoffs,
            "cache_hits": stats.cache_hits,
            "cache_misses": stats.cache_misses,
            "elapsed_ms": result.elapsed.as_millis() as u64,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let side = match position.current_player() {
            Player::Black => "Black",
            Player::White => "White",
        };
        println!("{} to move (ply {})", side, position.ply);
        println!("Best move: {}", result.best_move);
        println!("Score:     {:.3}", result.score);
        println!("Depth:     {}", result.depth);
        println!(
            "Nodes:     {} ({} cutoffs, {}/{} cache hits/misses)",
            result.nodes, stats.cutoffs, stats.cache_hits, stats.cache_misses
        );
        println!("Elapsed:   {} ms", result.elapsed.as_millis());
    }
    Ok(())
}

fn load_position(args: &BestMoveArgs) -> Result<Position> {
    let Some(path) = &args.record else {
        return Ok(Position::initial());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read record: {}", path.display()))?;
    let record: GameRecord = serde_json::from_str(&content)
        .with_context(|| format!("Invalid record: {}", path.display()))?;
    Ok(record.final_position())
}

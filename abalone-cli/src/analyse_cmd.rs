//! Analyse command - win/loss summary over saved game records

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use abalone_tournament::{load_records, summarize, RecordSummary};

#[derive(Args)]
pub struct AnalyseArgs {
    /// Directory of game record JSON files
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Player name to summarize (as recorded in the files)
    #[arg(long)]
    pub player: String,

    /// Output the summary as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: AnalyseArgs) -> Result<()> {
    let records = load_records(&args.dir)?;
    tracing::info!("Loaded {} records from {}", records.len(), args.dir.display());

    let summary = summarize(&records, &args.player);
    if summary.games == 0 {
        bail!(
            "No games for player '{}' in {}",
            args.player,
            args.dir.display()
        );
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &RecordSummary) {
    println!("\n=== {} ===", summary.player);
    println!("Games:  {}", summary.games);
    println!("Won:    {} ({:.1}%)", summary.won, summary.win_rate() * 100.0);
    println!("Lost:   {}", summary.lost);
    println!(
        "Draws:  {} (closer to center in {})",
        summary.draws, summary.closer_on_draws
    );
    println!("Avg final distance to center: {:.2}", summary.avg_final_centrality);
}

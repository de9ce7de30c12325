//! Distances command - export or verify the cell distance table

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use abalone_core::DistanceOracle;

#[derive(Args)]
pub struct DistancesArgs {
    /// Output JSON file
    #[arg(long, value_name = "FILE", default_value = "abalone_distances.json")]
    pub output: PathBuf,

    /// Load an existing table instead and check it against a fresh build
    #[arg(long)]
    pub verify: bool,
}

pub fn run(args: DistancesArgs) -> Result<()> {
    if args.verify {
        return verify(&args);
    }

    let oracle = DistanceOracle::build()?;
    oracle
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    tracing::info!(
        "Wrote {} distance entries to {}",
        oracle.to_entries().len(),
        args.output.display()
    );
    Ok(())
}

fn verify(args: &DistancesArgs) -> Result<()> {
    let loaded = DistanceOracle::load(&args.output)
        .with_context(|| format!("Failed to load {}", args.output.display()))?;
    let fresh = DistanceOracle::build()?;

    let mismatches = fresh
        .to_entries()
        .iter()
        .zip(loaded.to_entries().iter())
        .filter(|(a, b)| a.distance != b.distance)
        .count();
    if mismatches > 0 {
        anyhow::bail!("{} distances differ from a fresh build", mismatches);
    }
    println!("{}: ok", args.output.display());
    Ok(())
}

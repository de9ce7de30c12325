//! Player selection shared by commands
//!
//! A player argument is either a built-in name (`alpha-beta`, `greedy`,
//! `random`) or a path to an `AiConfig` JSON file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Args;

use abalone_core::Weights;
use abalone_tournament::AiConfig;

/// Search options applied to built-in players
#[derive(Args, Clone, Debug)]
pub struct SearchArgs {
    /// Maximum iterative-deepening depth
    #[arg(long, default_value = "4")]
    pub depth: u32,

    /// Time budget per move in milliseconds
    #[arg(long, default_value = "1000")]
    pub time_ms: u64,

    /// Evaluation weights JSON file
    #[arg(long, value_name = "FILE")]
    pub weights: Option<PathBuf>,
}

impl SearchArgs {
    pub fn load_weights(&self) -> Result<Weights> {
        match &self.weights {
            Some(path) => Weights::load(path),
            None => Ok(Weights::default()),
        }
    }
}

/// Resolve a player argument into a config
pub fn resolve_player(name: &str, search: &SearchArgs) -> Result<AiConfig> {
    let base = match name {
        "alpha-beta" | "ab" => AiConfig::alpha_beta(search.depth),
        "greedy" => AiConfig::greedy(),
        "random" => AiConfig::random(),
        path if Path::new(path).exists() => return AiConfig::load(Path::new(path)),
        other => bail!(
            "Unknown player '{}': expected alpha-beta, greedy, random or a config file",
            other
        ),
    };

    Ok(base
        .with_weights(search.load_weights()?)
        .with_time_limit(Duration::from_millis(search.time_ms)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use abalone_tournament::PlayerType;

    fn search() -> SearchArgs {
        SearchArgs {
            depth: 3,
            time_ms: 200,
            weights: None,
        }
    }

    #[test]
    fn test_builtin_players() {
        let ab = resolve_player("alpha-beta", &search()).unwrap();
        assert_eq!(ab.player_type, PlayerType::AlphaBeta);
        assert_eq!(ab.search.max_depth, 3);
        assert_eq!(ab.search.time_limit_ms, 200);

        let greedy = resolve_player("greedy", &search()).unwrap();
        assert_eq!(greedy.player_type, PlayerType::Greedy);
    }

    #[test]
    fn test_unknown_player() {
        assert!(resolve_player("no-such-player", &search()).is_err());
    }
}

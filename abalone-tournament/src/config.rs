//! Configuration types for match play
//!
//! Level 4 - Utilities and configuration

use std::path::Path;
use std::time::Duration;

use abalone_core::game::DEFAULT_MAX_PLIES;
use abalone_core::{SearchConfig, Weights};
use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Player type for games
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerType {
    /// Alpha-beta search with iterative deepening
    #[default]
    AlphaBeta,
    /// Best one-ply successor by evaluation
    Greedy,
    /// Uniformly random legal move
    Random,
}

/// AI configuration for game playing
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Label used in records and reports
    pub name: String,
    /// Player type
    pub player_type: PlayerType,
    /// Search limits for alpha-beta
    pub search: SearchConfig,
    /// Evaluation weights (alpha-beta and greedy)
    pub weights: Weights,
    /// Random seed for reproducibility (None = derived from the match seed)
    pub seed: Option<u64>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            name: "alpha-beta".to_string(),
            player_type: PlayerType::AlphaBeta,
            search: SearchConfig::default(),
            weights: Weights::default(),
            seed: None,
        }
    }
}

impl AiConfig {
    /// Create config for alpha-beta at given maximum depth
    pub fn alpha_beta(depth: u32) -> Self {
        Self {
            name: format!("alpha-beta-d{}", depth),
            search: SearchConfig::default().with_depth(depth),
            ..Default::default()
        }
    }

    pub fn greedy() -> Self {
        Self {
            name: "greedy".to_string(),
            player_type: PlayerType::Greedy,
            ..Default::default()
        }
    }

    pub fn random() -> Self {
        Self {
            name: "random".to_string(),
            player_type: PlayerType::Random,
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set custom evaluation weights
    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.search = self.search.with_time_limit(time_limit);
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read player config: {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid player config: {}", path.display()))?;
        Ok(config)
    }
}

/// Match configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Number of games (should be even for color alternation)
    pub games: usize,
    /// Ply limit per game
    pub max_plies: u16,
    /// Random plies played before the AIs take over, for variety
    pub opening_plies: usize,
    /// Whether to run games in parallel
    pub parallel: bool,
    /// Base seed; game `i` uses `seed + i`
    pub seed: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            games: 10,
            max_plies: DEFAULT_MAX_PLIES,
            opening_plies: 2,
            parallel: true,
            seed: 42,
        }
    }
}

impl MatchConfig {
    pub fn new(games: usize) -> Self {
        Self {
            games,
            ..Default::default()
        }
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn with_max_plies(mut self, max_plies: u16) -> Self {
        self.max_plies = max_plies;
        self
    }

    pub fn with_opening_plies(mut self, opening_plies: usize) -> Self {
        self.opening_plies = opening_plies;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

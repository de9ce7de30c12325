//! Abalone Tournament - Batch game playing and record analysis
//!
//! This crate provides match infrastructure on top of `abalone-core`:
//! - Configurable players (alpha-beta, greedy, random)
//! - Match play between two configurations, optionally in parallel
//! - JSON game records and win/loss summaries
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 2: play_match (phases)
//! - Level 3: play_game (steps)
//! - Level 4: records, configuration

mod config;
mod game_runner;
mod match_play;
mod records;

pub use config::{AiConfig, MatchConfig, PlayerType};
pub use game_runner::{play_game, AiPlayer, GameOutcome};
pub use match_play::{play_match, MatchResult};
pub use records::{load_records, save_records, summarize, GameRecord, RecordSummary};

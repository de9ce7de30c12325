//! Alpha-beta search with iterative deepening

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::eval::{Evaluate, Score, SCORE_MAX, SCORE_MIN};
use crate::ordering::MoveOrderer;
use crate::rules::GameRules;
use crate::tt::{TranspositionCache, TranspositionKey};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Nodes between deadline polls inside the tree
const POLL_INTERVAL: u64 = 1024;

/// Bounds on the projected growth from one depth to the next
const MIN_BRANCH_RATIO: f64 = 1.5;
const MAX_BRANCH_RATIO: f64 = 5.0;

/// Projected growth when only one depth has been timed
const DEFAULT_BRANCH_RATIO: f64 = 3.0;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Search limits for one decision
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Deepest iteration to attempt
    pub max_depth: u32,
    /// Default wall-clock budget per decision in milliseconds
    pub time_limit_ms: u64,
    /// Optional bound on cached entries
    pub cache_capacity: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 4,
            time_limit_ms: 1000,
            cache_capacity: None,
        }
    }
}

impl SearchConfig {
    pub fn with_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit_ms = time_limit.as_millis() as u64;
        self
    }

    pub fn time_limit(&self) -> Duration {
        Duration::from_millis(self.time_limit_ms)
    }
}

/// Wall-clock deadline for one decision
#[derive(Clone, Copy, Debug)]
pub struct SearchBudget {
    start: Instant,
    deadline: Instant,
}

impl SearchBudget {
    pub fn new(limit: Duration) -> Self {
        let start = Instant::now();
        Self {
            start,
            deadline: start + limit,
        }
    }

    pub fn until(deadline: Instant) -> Self {
        Self {
            start: Instant::now(),
            deadline,
        }
    }

    pub fn expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}

/// Counters for one search
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub cutoffs: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_stores: u64,
}

impl SearchStats {
    fn merge(&mut self, other: SearchStats) {
        self.nodes += other.nodes;
        self.cutoffs += other.cutoffs;
        self.cache_hits += other.cache_hits;
        self.cache_misses += other.cache_misses;
        self.cache_stores += other.cache_stores;
    }
}

/// Outcome of one timed decision
#[derive(Clone, Debug)]
pub struct SearchResult<M> {
    pub best_move: M,
    pub score: Score,
    /// Deepest fully completed iteration (0 if none completed)
    pub depth: u32,
    pub nodes: u64,
    pub elapsed: Duration,
}

// ============================================================================
// ALPHA-BETA AI
// ============================================================================

/// Alpha-beta player over any [`GameRules`] implementation
pub struct AlphaBetaAI<R: GameRules, E> {
    rules: R,
    evaluator: E,
    orderer: MoveOrderer,
    pub config: SearchConfig,
    cache: TranspositionCache<R::Position>,
    /// Player whose scores the cache currently holds
    cache_viewer: Option<R::Player>,
    stats: SearchStats,
}

impl<R: GameRules, E: Evaluate<R>> AlphaBetaAI<R, E> {
    pub fn new(rules: R, evaluator: E, config: SearchConfig) -> Self {
        let cache = match config.cache_capacity {
            Some(capacity) => TranspositionCache::with_capacity(capacity),
            None => TranspositionCache::new(),
        };
        Self {
            rules,
            evaluator,
            orderer: MoveOrderer,
            config,
            cache,
            cache_viewer: None,
            stats: SearchStats::default(),
        }
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    pub fn cache(&self) -> &TranspositionCache<R::Position> {
        &self.cache
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
        self.cache_viewer = None;
    }

    /// Counters accumulated over the last decision
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Best move within the configured time budget
    pub fn best_move(&mut self, position: &R::Position) -> Option<R::Move> {
        let limit = self.config.time_limit();
        self.choose_move(position, limit).map(|r| r.best_move)
    }

    /// Pick a move within `time_budget`, or `None` when the side to move has
    /// no legal move.
    pub fn choose_move(
        &mut self,
        position: &R::Position,
        time_budget: Duration,
    ) -> Option<SearchResult<R::Move>> {
        let max_depth = self.config.max_depth;
        self.choose_move_with(position, max_depth, SearchBudget::new(time_budget))
    }

    /// Iterative deepening from depth 1 up to `max_depth` under `budget`.
    ///
    /// Only fully completed iterations are trusted. If depth 1 itself is cut
    /// short, the best root move scored so far is used, and failing that
    /// the first move in ordering.
    pub fn choose_move_with(
        &mut self,
        position: &R::Position,
        max_depth: u32,
        budget: SearchBudget,
    ) -> Option<SearchResult<R::Move>> {
        let moves = self.rules.legal_moves(position);
        if moves.is_empty() {
            return None;
        }

        self.stats = SearchStats::default();

        let viewer = self.rules.to_move(position);
        self.cache.clear();
        self.cache_viewer = Some(viewer);
        let opponent = self.rules.opponent(viewer);
        let mut completed: Option<SearchResult<R::Move>> = None;
        let mut partial: Option<(R::Move, Score)> = None;
        let mut prev_depth_time = Duration::ZERO;

        for depth in 1..=max_depth.max(1) {
            let depth_start = Instant::now();

            let mut searcher = Searcher {
                rules: &self.rules,
                evaluator: &self.evaluator,
                orderer: self.orderer,
                cache: &mut self.cache,
                viewer,
                opponent,
                budget: Some(&budget),
                stats: SearchStats::default(),
                aborted: false,
            };
            let (mv, score) = searcher.search(position, depth, SCORE_MIN, SCORE_MAX, true, true);
            let aborted = searcher.aborted;
            self.stats.merge(searcher.stats);

            if aborted {
                tracing::debug!(depth, nodes = self.stats.nodes, "iteration aborted at deadline");
                if completed.is_none() {
                    partial = mv.map(|m| (m, score));
                }
                break;
            }

            let Some(mv) = mv else {
                break;
            };
            let depth_time = depth_start.elapsed();
            completed = Some(SearchResult {
                best_move: mv,
                score,
                depth,
                nodes: self.stats.nodes,
                elapsed: budget.elapsed(),
            });
            tracing::debug!(
                depth,
                score,
                nodes = self.stats.nodes,
                elapsed_ms = depth_time.as_millis() as u64,
                "iteration complete"
            );

            let remaining = budget.remaining();
            let estimated_next = project_next_depth(prev_depth_time, depth_time);
            prev_depth_time = depth_time;
            if remaining.is_zero() || estimated_next > remaining {
                break;
            }
        }

        if let Some(mut result) = completed {
            result.nodes = self.stats.nodes;
            result.elapsed = budget.elapsed();
            return Some(result);
        }

        let (best_move, score) = match partial {
            Some(found) => found,
            None => {
                let ordered = self.orderer.order(&self.rules, moves, position, viewer);
                let mv = *ordered.first()?;
                let child = self.rules.apply(position, mv);
                (mv, self.evaluator.evaluate(&child, viewer, opponent))
            }
        };
        tracing::debug!("no iteration completed, using partial depth-1 result");
        Some(SearchResult {
            best_move,
            score,
            depth: 0,
            nodes: self.stats.nodes,
            elapsed: budget.elapsed(),
        })
    }

    /// One fixed-depth alpha-beta search without a deadline.
    ///
    /// The viewer is the side to move when `maximizing`, its opponent
    /// otherwise. Cached scores belong to one viewer: calls for the same
    /// viewer share entries, and a call for the other viewer starts from an
    /// empty cache.
    pub fn search(
        &mut self,
        position: &R::Position,
        depth: u32,
        alpha: Score,
        beta: Score,
        maximizing: bool,
    ) -> (Option<R::Move>, Score) {
        let to_move = self.rules.to_move(position);
        let viewer = if maximizing {
            to_move
        } else {
            self.rules.opponent(to_move)
        };
        if self.cache_viewer != Some(viewer) {
            self.cache.clear();
            self.cache_viewer = Some(viewer);
        }
        let mut searcher = Searcher {
            rules: &self.rules,
            evaluator: &self.evaluator,
            orderer: self.orderer,
            cache: &mut self.cache,
            viewer,
            opponent: self.rules.opponent(viewer),
            budget: None,
            stats: SearchStats::default(),
            aborted: false,
        };
        let result = searcher.search(position, depth, alpha, beta, maximizing, true);
        self.stats.merge(searcher.stats);
        result
    }

    /// Play against itself until the game ends or `max_plies` moves are made
    pub fn play_game(
        &mut self,
        initial: R::Position,
        max_plies: usize,
    ) -> (R::Position, Vec<R::Move>) {
        let mut position = initial;
        let mut history = Vec::new();

        while history.len() < max_plies && !self.rules.is_terminal(&position) {
            match self.best_move(&position) {
                Some(mv) => {
                    position = self.rules.apply(&position, mv);
                    history.push(mv);
                }
                None => break,
            }
        }

        (position, history)
    }
}

/// Estimated duration of the next iteration from the last two
fn project_next_depth(prev: Duration, last: Duration) -> Duration {
    let ratio = if prev > Duration::ZERO && last > Duration::ZERO {
        (last.as_secs_f64() / prev.as_secs_f64()).clamp(MIN_BRANCH_RATIO, MAX_BRANCH_RATIO)
    } else {
        DEFAULT_BRANCH_RATIO
    };
    last.mul_f64(ratio)
}

// ============================================================================
// MINIMAX WITH ALPHA-BETA
// ============================================================================

/// Per-decision search state
struct Searcher<'a, R: GameRules, E> {
    rules: &'a R,
    evaluator: &'a E,
    orderer: MoveOrderer,
    cache: &'a mut TranspositionCache<R::Position>,
    viewer: R::Player,
    opponent: R::Player,
    budget: Option<&'a SearchBudget>,
    stats: SearchStats,
    aborted: bool,
}

impl<'a, R: GameRules, E: Evaluate<R>> Searcher<'a, R, E> {
    fn evaluate(&self, position: &R::Position) -> Score {
        self.evaluator.evaluate(position, self.viewer, self.opponent)
    }

    fn deadline_passed(&self) -> bool {
        self.budget.is_some_and(|b| b.expired())
    }

    fn search(
        &mut self,
        position: &R::Position,
        depth: u32,
        mut alpha: Score,
        mut beta: Score,
        maximizing: bool,
        root: bool,
    ) -> (Option<R::Move>, Score) {
        self.stats.nodes += 1;
        if !root && self.stats.nodes % POLL_INTERVAL == 0 && self.deadline_passed() {
            self.aborted = true;
        }
        if self.aborted {
            return (None, 0.0);
        }

        if depth == 0 || self.rules.is_terminal(position) {
            return (None, self.evaluate(position));
        }

        let key = TranspositionKey::new(position.clone(), depth);
        if !root {
            if let Some(score) = self.cache.lookup(&key) {
                self.stats.cache_hits += 1;
                return (None, score);
            }
            self.stats.cache_misses += 1;
        }

        let moves = self.rules.legal_moves(position);
        if moves.is_empty() {
            tracing::warn!(?position, "non-terminal position without legal moves");
            return (None, self.evaluate(position));
        }

        let chooser = if maximizing { self.viewer } else { self.opponent };
        let ordered = self.orderer.order(self.rules, moves, position, chooser);

        let (alpha_orig, beta_orig) = (alpha, beta);
        let mut best_move = None;
        let mut best = if maximizing { SCORE_MIN } else { SCORE_MAX };

        for mv in ordered {
            if root && self.deadline_passed() {
                self.aborted = true;
                break;
            }

            let child = self.rules.apply(position, mv);
            let (_, score) = self.search(&child, depth - 1, alpha, beta, !maximizing, false);
            if self.aborted {
                break;
            }

            if maximizing {
                if score > best || best_move.is_none() {
                    best = score;
                    best_move = Some(mv);
                }
                alpha = alpha.max(best);
            } else {
                if score < best || best_move.is_none() {
                    best = score;
                    best_move = Some(mv);
                }
                beta = beta.min(best);
            }

            if beta <= alpha {
                self.stats.cutoffs += 1;
                break;
            }
        }

        // Only values strictly inside the window are exact
        if !self.aborted && best_move.is_some() && best > alpha_orig && best < beta_orig {
            self.cache.store(key, best);
            self.stats.cache_stores += 1;
        }

        (best_move, best)
    }
}

/// Exhaustive minimax without pruning, ordering or caching.
///
/// Reference for checking the pruning search and for counting how many
/// nodes pruning saves.
pub fn minimax<R: GameRules, E: Evaluate<R>>(
    rules: &R,
    evaluator: &E,
    position: &R::Position,
    depth: u32,
    maximizing: bool,
    viewer: R::Player,
) -> (Option<R::Move>, Score) {
    let opponent = rules.opponent(viewer);
    if depth == 0 || rules.is_terminal(position) {
        return (None, evaluator.evaluate(position, viewer, opponent));
    }

    let moves = rules.legal_moves(position);
    if moves.is_empty() {
        return (None, evaluator.evaluate(position, viewer, opponent));
    }

    let mut best_move = None;
    let mut best = if maximizing { SCORE_MIN } else { SCORE_MAX };
    for mv in moves {
        let child = rules.apply(position, mv);
        let (_, score) = minimax(rules, evaluator, &child, depth - 1, !maximizing, viewer);
        let better = if maximizing { score > best } else { score < best };
        if better || best_move.is_none() {
            best = score;
            best_move = Some(mv);
        }
    }
    (best_move, best)
}

// ============================================================================
// TESTS
// ============================================================================

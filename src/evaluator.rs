// Position evaluation and reward shaping
//
// The base signal is mobility: how many cells a player could legally take
// next. Evaluators are strategies over a read-only `GameState`; they never
// touch the live game, and shaping compares two states captured before and
// after a single move.

use crate::board::Board;
use crate::config::{EvaluationConfig, ShapingConfig};
use crate::error::GameError;
use crate::game::{GameState, Outcome};
use crate::rules;
use crate::types::PlayerId;

/// Default weight on the opponent's mobility
pub const DEFAULT_OPPONENT_WEIGHT: f64 = 1.5;

/// Scores a position from one player's point of view
pub trait Evaluator: Send + Sync {
    /// Raw score; does not check that `player` is still in the game
    fn score(&self, state: &GameState, player: PlayerId) -> f64;

    /// Score for an active player; eliminated players are a caller error
    fn evaluate(&self, state: &GameState, player: PlayerId) -> Result<f64, GameError> {
        state.ensure_active(player)?;
        Ok(self.score(state, player))
    }
}

/// Evaluates with the default mobility potential
pub fn evaluate(state: &GameState, player: PlayerId) -> Result<f64, GameError> {
    MobilityEvaluator::default().evaluate(state, player)
}

/// `mobility(player) - k * mobility(opponent)`
///
/// The opponent is the next active seat after `player`; a lone survivor is
/// scored on its own mobility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MobilityEvaluator {
    pub opponent_weight: f64,
}

impl MobilityEvaluator {
    pub fn new(opponent_weight: f64) -> Self {
        MobilityEvaluator { opponent_weight }
    }

    pub fn from_config(config: &EvaluationConfig) -> Self {
        Self::new(config.opponent_weight)
    }
}

impl Default for MobilityEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_OPPONENT_WEIGHT)
    }
}

impl Evaluator for MobilityEvaluator {
    fn score(&self, state: &GameState, player: PlayerId) -> f64 {
        let board = state.board();
        let own = rules::mobility(board, player) as f64;
        let opponent = state
            .opponent_of(player)
            .map_or(0, |opp| rules::mobility(board, opp)) as f64;
        own - self.opponent_weight * opponent
    }
}

/// Centre-weighted cell values, row-major
///
/// Cells nearer the centre are worth more; values are shifted so the table
/// tops out around 20 and clamped at zero.
pub fn board_values(size: usize) -> Vec<i32> {
    let center = (size as f64 - 1.0) / 2.0;
    let raw: Vec<i32> = (0..size * size)
        .map(|i| {
            let r = (i / size) as f64;
            let c = (i % size) as f64;
            let dist = ((r - center).powi(2) + (c - center).powi(2)).sqrt();
            // Round half up
            (10.0 * (center - dist) + 0.5).floor() as i32
        })
        .collect();
    let max_value = raw.iter().copied().max().unwrap_or(0).max(0);
    let shift = (max_value - 20).abs();
    raw.into_iter().map(|v| (v + shift).max(0)).collect()
}

/// Weighted blend of where the player's last mark sits and both sides' mobility
#[derive(Debug, Clone, PartialEq)]
pub struct PositionalEvaluator {
    pub positional_weight: i32,
    pub own_mobility_weight: i32,
    pub opponent_mobility_weight: i32,
}

impl PositionalEvaluator {
    pub fn new(positional_weight: i32, own_mobility_weight: i32, opponent_mobility_weight: i32) -> Self {
        PositionalEvaluator {
            positional_weight,
            own_mobility_weight,
            opponent_mobility_weight,
        }
    }

    /// Scores `board` directly, with `opponent` resolved by the caller
    pub fn score_board(&self, board: &Board, player: PlayerId, opponent: Option<PlayerId>) -> f64 {
        let positional = board.last_move(player).map_or(0, |last| {
            board_values(board.size())[last.row as usize * board.size() + last.col as usize]
        });
        let own = rules::mobility(board, player) as i32;
        let opponent = opponent.map_or(0, |opp| rules::mobility(board, opp)) as i32;

        (self.positional_weight * positional - self.opponent_mobility_weight * opponent
            + self.own_mobility_weight * own) as f64
    }
}

impl Evaluator for PositionalEvaluator {
    fn score(&self, state: &GameState, player: PlayerId) -> f64 {
        self.score_board(state.board(), player, state.opponent_of(player))
    }
}

/// Turns a single transition into a scalar reward for a learning agent
///
/// Combines the terminal result, potential-based shaping
/// `gamma * phi(after) - phi(before)`, a per-step cost and the corner,
/// proximity and elimination adjustments.
#[derive(Debug, Clone)]
pub struct RewardShaper<E: Evaluator = MobilityEvaluator> {
    evaluator: E,
    config: ShapingConfig,
}

impl<E: Evaluator> RewardShaper<E> {
    pub fn new(evaluator: E, config: ShapingConfig) -> Self {
        RewardShaper { evaluator, config }
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    pub fn config(&self) -> &ShapingConfig {
        &self.config
    }

    pub fn potential(&self, state: &GameState, player: PlayerId) -> f64 {
        self.evaluator.score(state, player)
    }

    /// `gamma * phi(after) - phi(before)` from the mover's point of view
    pub fn shaping(&self, before: &GameState, after: &GameState, player: PlayerId) -> f64 {
        self.config.discount_factor * self.potential(after, player) - self.potential(before, player)
    }

    /// Reward for the move described by `outcome`, taken from `before` to `after`
    pub fn step_reward(&self, before: &GameState, after: &GameState, outcome: &Outcome) -> f64 {
        let player = outcome.player;
        let coord = outcome.coord;
        let cfg = &self.config;
        let mut reward = 0.0;

        // Terminal result
        if outcome.winner == Some(player) {
            reward += cfg.win_reward;
        } else if !rules::has_legal_move(after.board(), player) {
            reward += cfg.loss_reward;
        } else {
            reward += cfg.elimination_bonus * outcome.eliminated.len() as f64;
        }

        reward += cfg.shaping_factor * self.shaping(before, after, player);
        reward -= cfg.step_penalty;

        if after.board().is_corner(coord) {
            reward -= cfg.corner_penalty;
        }

        let opponent_last = before
            .opponent_of(player)
            .and_then(|opp| after.board().last_move(opp));
        if let Some(target) = opponent_last {
            let dist = cfg.proximity_metric.distance(&coord, &target);
            if dist >= cfg.far_distance {
                reward -= cfg.far_penalty;
            } else if dist <= cfg.near_distance {
                reward += cfg.near_bonus;
            }
        }

        reward
    }
}

impl RewardShaper<MobilityEvaluator> {
    /// Mobility-shaped rewards from the loaded configuration
    pub fn from_config(evaluation: &EvaluationConfig, shaping: &ShapingConfig) -> Self {
        Self::new(MobilityEvaluator::from_config(evaluation), shaping.clone())
    }
}

// Two-seat self-play environment for reinforcement learning
//
// The seat to move acts on each step; rewards come from a `RewardShaper`
// and observations are encoded for the player who moves next.

use log::debug;

use crate::config::Config;
use crate::error::GameError;
use crate::evaluator::{Evaluator, MobilityEvaluator, RewardShaper};
use crate::game::GameState;
use crate::encoding;
use crate::rules;
use crate::types::{Coord, PlayerId};

/// Result of one environment step
#[derive(Debug, Clone)]
pub struct StepResult {
    pub observation: Vec<f32>,
    pub reward: f64,
    pub done: bool,
    /// Decided winner, or the certain winner when the mover boxed itself in
    pub winner: Option<PlayerId>,
}

pub struct FlipTacEnv<E: Evaluator = MobilityEvaluator> {
    board_size: usize,
    state: GameState,
    shaper: RewardShaper<E>,
    done: bool,
}

impl FlipTacEnv<MobilityEvaluator> {
    /// Mobility-shaped environment on the configured board size
    pub fn from_config(config: &Config) -> Result<Self, GameError> {
        Self::new(
            config.game.board_size,
            RewardShaper::from_config(&config.evaluation, &config.shaping),
        )
    }
}

impl<E: Evaluator> FlipTacEnv<E> {
    pub fn new(board_size: usize, shaper: RewardShaper<E>) -> Result<Self, GameError> {
        Ok(FlipTacEnv {
            board_size,
            state: GameState::new(2, board_size)?,
            shaper,
            done: false,
        })
    }

    /// Starts a new episode and returns the first observation
    pub fn reset(&mut self) -> Result<Vec<f32>, GameError> {
        self.state = GameState::new(2, self.board_size)?;
        self.done = false;
        Ok(encoding::observation(&self.state, self.state.current_player()))
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn current_player(&self) -> PlayerId {
        self.state.current_player()
    }

    pub fn valid_moves(&self) -> Vec<Coord> {
        rules::legal_moves(self.state.board(), self.state.current_player())
    }

    /// Plays `action` for the seat to move
    ///
    /// An illegal action ends the episode with a penalty and leaves the board
    /// untouched.
    pub fn step(&mut self, action: Coord) -> Result<StepResult, GameError> {
        if self.done || self.state.is_over() {
            return Err(GameError::GameOver);
        }
        let player = self.state.current_player();

        if !self.state.is_valid_move(player, action) {
            debug!("{} tried illegal action {}", player, action);
            self.done = true;
            return Ok(StepResult {
                observation: encoding::observation(&self.state, player),
                reward: -self.shaper.config().invalid_move_penalty,
                done: true,
                winner: None,
            });
        }

        let before = self.state.clone();
        let outcome = self.state.apply_move(player, action)?;
        let reward = self.shaper.step_reward(&before, &self.state, &outcome);

        // Marks are never removed, so a mover with no legal cell stays stuck
        let winner = match outcome.winner {
            Some(winner) => Some(winner),
            None if !rules::has_legal_move(self.state.board(), player) => {
                self.state.opponent_of(player)
            }
            None => None,
        };
        self.done = winner.is_some();

        Ok(StepResult {
            observation: encoding::observation(&self.state, self.state.current_player()),
            reward,
            done: self.done,
            winner,
        })
    }
}

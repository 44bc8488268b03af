// Computer-controlled player
//
// Wraps the opponent selector for interactive front-ends: the selection runs
// on tokio's blocking pool while a minimum thinking delay elapses alongside
// it, so the computer never answers faster than a human can follow.

use log::{error, info};
use tokio::task::JoinError;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::error::GameError;
use crate::game::{GameState, Outcome};
use crate::opponent::OpponentSelector;
use crate::types::{Coord, PlayerId};

/// Computer opponent with a configured thinking delay
pub struct CpuPlayer {
    config: Config,
    selector: Arc<Mutex<OpponentSelector>>,
}

impl CpuPlayer {
    /// Creates a new CPU player with the given configuration
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the player's lifetime
    pub fn new(config: Config) -> Self {
        let selector = OpponentSelector::new(config.opponent.clone());
        CpuPlayer {
            config,
            selector: Arc::new(Mutex::new(selector)),
        }
    }

    /// Creates a CPU player whose random opening is reproducible
    pub fn with_seed(config: Config, seed: u64) -> Self {
        let selector = OpponentSelector::with_seed(config.opponent.clone(), seed);
        CpuPlayer {
            config,
            selector: Arc::new(Mutex::new(selector)),
        }
    }

    pub fn thinking_delay(&self) -> Duration {
        Duration::from_millis(self.config.timing.thinking_delay_ms)
    }

    /// Chooses a move for `player` without any delay
    pub fn choose_move_blocking(
        &self,
        state: &GameState,
        player: PlayerId,
    ) -> Result<Coord, GameError> {
        self.selector.lock().select(state, player)
    }

    /// Chooses a move for `player`, taking at least the thinking delay
    ///
    /// # Arguments
    /// * `state` - Current game state; only a copy is handed to the selector
    /// * `player` - Seat to move for
    ///
    /// # Returns
    /// * `Result<Coord, GameError>` - The chosen cell, always legal for `player`
    pub async fn choose_move(
        &self,
        state: &GameState,
        player: PlayerId,
    ) -> Result<Coord, GameError> {
        let start_time = Instant::now();
        let turn = state.turn() + 1;

        let selector = self.selector.clone();
        let snapshot = state.clone();
        let search = tokio::task::spawn_blocking(move || selector.lock().select(&snapshot, player));
        let delay = tokio::time::sleep(self.thinking_delay());

        let (result, ()) = tokio::join!(search, delay);
        let chosen = search_result(result, player)?;

        info!(
            "Turn {}: {} chose {} (time: {}ms)",
            turn,
            player,
            chosen,
            start_time.elapsed().as_millis()
        );
        Ok(chosen)
    }

    /// Chooses and applies a move for whoever is to move
    pub async fn play_turn(&self, state: &mut GameState) -> Result<Outcome, GameError> {
        if state.is_over() {
            return Err(GameError::GameOver);
        }
        let player = state.current_player();
        let chosen = self.choose_move(state, player).await?;
        state.apply_move(player, chosen)
    }
}

/// Unwraps the blocking search: selector panics propagate, cancellation
/// becomes `GameError::SearchCancelled`
fn search_result(
    result: Result<Result<Coord, GameError>, JoinError>,
    player: PlayerId,
) -> Result<Coord, GameError> {
    match result {
        Ok(selection) => selection,
        Err(e) => match e.try_into_panic() {
            Ok(payload) => std::panic::resume_unwind(payload),
            Err(e) => {
                error!("Move search for {} did not finish: {}", player, e);
                Err(GameError::SearchCancelled(player))
            }
        },
    }
}

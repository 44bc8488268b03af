// Built-in computer opponent
//
// The first few placements are random so games do not all open the same way.
// After that every legal cell is probed on a private copy of the board and
// the one leaving the opponent the fewest options is taken, closing in on
// the opponent's last mark when several cells restrict equally.

use log::debug;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::config::{Config, OpponentConfig};
use crate::error::GameError;
use crate::evaluator::PositionalEvaluator;
use crate::game::GameState;
use crate::rules;
use crate::types::{Coord, PlayerId};

/// How the selector ranks candidates once the random opening is over
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SelectorStrategy {
    /// Minimise the opponent's mobility, then distance to its last mark
    Restrict,
    /// Maximise a blend of cell value and both sides' mobility
    Positional,
}

/// One-shot selection with the default configuration and an OS-seeded RNG
pub fn select_opponent_move(state: &GameState, player: PlayerId) -> Result<Coord, GameError> {
    OpponentSelector::new(Config::default_hardcoded().opponent).select(state, player)
}

/// Picks moves for computer-controlled seats
pub struct OpponentSelector {
    config: OpponentConfig,
    rng: StdRng,
}

impl OpponentSelector {
    /// Creates a selector seeded from `config.seed`, or from the OS when unset
    pub fn new(config: OpponentConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        OpponentSelector { config, rng }
    }

    pub fn with_seed(config: OpponentConfig, seed: u64) -> Self {
        OpponentSelector {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &OpponentConfig {
        &self.config
    }

    /// Chooses a legal cell for `player`
    ///
    /// The live state is only read; every candidate is probed on its own copy.
    pub fn select(&mut self, state: &GameState, player: PlayerId) -> Result<Coord, GameError> {
        let moves = state.legal_moves(player)?;
        if moves.is_empty() {
            return Err(GameError::NoLegalMoves(player));
        }

        if state.placements(player) < self.config.opening_random_moves {
            let chosen = *moves
                .choose(&mut self.rng)
                .ok_or(GameError::NoLegalMoves(player))?;
            debug!("{} opening move {} (random of {})", player, chosen, moves.len());
            return Ok(chosen);
        }

        let chosen = match self.config.strategy {
            SelectorStrategy::Restrict => self.most_restrictive(state, player, &moves),
            SelectorStrategy::Positional => self.best_positional(state, player, &moves),
        };
        debug!("{} selected {} from {} candidates", player, chosen, moves.len());
        Ok(chosen)
    }

    /// Scores every candidate placement in order, in parallel when there are
    /// enough of them
    ///
    /// Each candidate is placed on a scratch board that is rolled back to the
    /// snapshot afterwards; parallel workers each own their scratch copy.
    fn probe_all<T, F>(&self, board: &Board, player: PlayerId, moves: &[Coord], score: F) -> Vec<T>
    where
        T: Send,
        F: Fn(&Board) -> T + Sync + Send,
    {
        let snapshot = board.snapshot();
        let probe = |scratch: &mut Board, c: Coord| {
            scratch.place(player, c);
            let value = score(&*scratch);
            scratch.restore(&snapshot);
            value
        };

        if self.config.parallel_probe && moves.len() >= self.config.min_candidates_for_parallel {
            moves
                .par_iter()
                .map_init(|| board.clone(), |scratch, &c| probe(scratch, c))
                .collect()
        } else {
            let mut scratch = board.clone();
            moves.iter().map(|&c| probe(&mut scratch, c)).collect()
        }
    }

    fn most_restrictive(&self, state: &GameState, player: PlayerId, moves: &[Coord]) -> Coord {
        let opponent = match state.opponent_of(player) {
            Some(opponent) => opponent,
            None => return moves[0],
        };

        let board = state.board();
        let counts = self.probe_all(board, player, moves, |probe| rules::mobility(probe, opponent));

        let min_count = counts.iter().copied().min().unwrap_or(0);
        let best: Vec<Coord> = moves
            .iter()
            .zip(&counts)
            .filter(|(_, count)| **count == min_count)
            .map(|(&c, _)| c)
            .collect();

        match board.last_move(opponent) {
            Some(target) => {
                let metric = self.config.tie_break_metric;
                // min_by_key keeps the first of equal minima, so row-major order breaks ties
                best.iter()
                    .copied()
                    .min_by_key(|c| metric.distance(c, &target))
                    .unwrap_or(best[0])
            }
            None => best[0],
        }
    }

    fn best_positional(&self, state: &GameState, player: PlayerId, moves: &[Coord]) -> Coord {
        let evaluator = PositionalEvaluator::new(
            self.config.positional_weight,
            self.config.own_mobility_weight,
            self.config.opponent_mobility_weight,
        );
        let opponent = state.opponent_of(player);
        let scores = self.probe_all(state.board(), player, moves, |probe| {
            evaluator.score_board(probe, player, opponent)
        });

        let mut best = moves[0];
        let mut best_score = f64::NEG_INFINITY;
        for (&c, &score) in moves.iter().zip(&scores) {
            if score > best_score {
                best_score = score;
                best = c;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn selector(strategy: SelectorStrategy, opening: u32) -> OpponentSelector {
        let mut config = Config::default_hardcoded().opponent;
        config.strategy = strategy;
        config.opening_random_moves = opening;
        OpponentSelector::with_seed(config, 7)
    }

    #[test]
    fn test_opening_moves_are_on_border() {
        let game = GameState::new(2, 5).unwrap();
        let mut sel = selector(SelectorStrategy::Restrict, 3);
        for _ in 0..20 {
            let c = sel.select(&game, PlayerId::X).unwrap();
            assert!(game.board().is_border(c));
        }
    }

    #[test]
    fn test_same_seed_same_opening() {
        let game = GameState::new(2, 7).unwrap();
        let mut a = selector(SelectorStrategy::Restrict, 3);
        let mut b = selector(SelectorStrategy::Restrict, 3);
        for _ in 0..5 {
            assert_eq!(a.select(&game, PlayerId::X), b.select(&game, PlayerId::X));
        }
    }

    #[test]
    fn test_eliminated_player_is_rejected() {
        let game = GameState::new(2, 5).unwrap();
        let mut sel = selector(SelectorStrategy::Restrict, 0);
        assert_eq!(
            sel.select(&game, PlayerId::Hash),
            Err(GameError::InvalidPlayer(PlayerId::Hash))
        );
    }

    #[test]
    fn test_one_shot_selection_is_legal() {
        let mut game = GameState::new(3, 5).unwrap();
        while !game.is_over() && game.turn() < 9 {
            let player = game.current_player();
            let c = select_opponent_move(&game, player).unwrap();
            assert!(game.is_valid_move(player, c));
            game.apply_move(player, c).unwrap();
        }
    }

    #[test]
    fn test_positional_picks_a_legal_move() {
        let mut game = GameState::new(2, 7).unwrap();
        game.apply_move(PlayerId::X, Coord::new(0, 3)).unwrap();
        game.apply_move(PlayerId::O, Coord::new(6, 3)).unwrap();
        let mut sel = selector(SelectorStrategy::Positional, 0);
        let c = sel.select(&game, PlayerId::X).unwrap();
        assert!(game.is_valid_move(PlayerId::X, c));
    }
}

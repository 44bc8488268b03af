// Library exports for the FlipTac engine
// The binaries, the learning environment and the tests all share this core

pub mod board;
pub mod config;
pub mod cpu;
pub mod encoding;
pub mod env;
pub mod error;
pub mod evaluator;
pub mod game;
pub mod opponent;
pub mod replay;
pub mod rules;
pub mod transcript;
pub mod types;

pub use board::{Board, BoardSnapshot};
pub use error::GameError;
pub use evaluator::{evaluate, Evaluator, MobilityEvaluator, PositionalEvaluator, RewardShaper};
pub use game::{apply_move, new_game, GameResult, GameState, Outcome};
pub use opponent::{select_opponent_move, OpponentSelector, SelectorStrategy};
pub use rules::is_valid_move;
pub use types::{Coord, DistanceMetric, PlayerId};

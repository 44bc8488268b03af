// Error types for the FlipTac engine

use thiserror::Error;

use crate::types::{Coord, PlayerId};

/// Errors raised by game state transitions and queries
///
/// Every failing call leaves the game state untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("illegal move by {player} at {coord}")]
    IllegalMove { player: PlayerId, coord: Coord },

    #[error("player {0} is not in the game")]
    InvalidPlayer(PlayerId),

    #[error("it is {expected}'s turn, not {actual}'s")]
    OutOfTurn { expected: PlayerId, actual: PlayerId },

    #[error("the game is already decided")]
    GameOver,

    #[error("player {0} has no legal moves")]
    NoLegalMoves(PlayerId),

    #[error("move search for {0} was cancelled before finishing")]
    SearchCancelled(PlayerId),

    /// Elimination resolution left nobody standing; unreachable by construction
    #[error("elimination left no surviving player")]
    NoSurvivor,

    #[error("invalid game settings: {0}")]
    InvalidSettings(String),
}

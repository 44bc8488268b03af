// Core FlipTac value types: coordinates, player seats and distance metrics

use serde::{Deserialize, Serialize};
use std::fmt;

/// 2D grid coordinate, row-major
///
/// Signed so that probes stepping off the board can be represented and
/// rejected by `Board::contains`.
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    pub fn new(row: i32, col: i32) -> Self {
        Coord { row, col }
    }

    /// Chebyshev (king-move) distance
    pub fn chebyshev(&self, other: &Coord) -> i32 {
        (self.row - other.row).abs().max((self.col - other.col).abs())
    }

    /// Manhattan distance
    pub fn manhattan(&self, other: &Coord) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }

    /// Squared Euclidean distance
    pub fn squared_euclidean(&self, other: &Coord) -> i32 {
        let dr = self.row - other.row;
        let dc = self.col - other.col;
        dr * dr + dc * dc
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the four seats, in fixed rotation order
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum PlayerId {
    X,
    O,
    Triangle,
    Hash,
}

impl PlayerId {
    pub const MAX_PLAYERS: usize = 4;

    pub const ALL: [PlayerId; 4] = [PlayerId::X, PlayerId::O, PlayerId::Triangle, PlayerId::Hash];

    /// Returns all seats in rotation order
    pub fn all() -> [PlayerId; 4] {
        Self::ALL
    }

    /// Seat position in the rotation (0-based)
    pub fn index(&self) -> usize {
        match self {
            PlayerId::X => 0,
            PlayerId::O => 1,
            PlayerId::Triangle => 2,
            PlayerId::Hash => 3,
        }
    }

    pub fn from_index(idx: usize) -> Option<PlayerId> {
        Self::all().get(idx).copied()
    }

    /// Mark drawn on the board for this seat
    pub fn mark(&self) -> &'static str {
        match self {
            PlayerId::X => "X",
            PlayerId::O => "O",
            PlayerId::Triangle => "Δ",
            PlayerId::Hash => "#",
        }
    }

    /// Parses a mark as written by `mark()`; also accepts ASCII aliases
    pub fn from_mark(s: &str) -> Option<PlayerId> {
        match s.trim() {
            "X" | "x" => Some(PlayerId::X),
            "O" | "o" => Some(PlayerId::O),
            "Δ" | "^" | "triangle" => Some(PlayerId::Triangle),
            "#" | "hash" => Some(PlayerId::Hash),
            _ => None,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mark())
    }
}

/// Distance metric used by proximity heuristics and tie-breaks
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    SquaredEuclidean,
    Manhattan,
    Chebyshev,
}

impl DistanceMetric {
    pub fn distance(&self, a: &Coord, b: &Coord) -> i32 {
        match self {
            DistanceMetric::SquaredEuclidean => a.squared_euclidean(b),
            DistanceMetric::Manhattan => a.manhattan(b),
            DistanceMetric::Chebyshev => a.chebyshev(b),
        }
    }
}

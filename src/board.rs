// Board state: cell owners plus each player's last placement

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Coord, PlayerId};

/// Smallest supported board side length
pub const MIN_BOARD_SIZE: usize = 3;

/// n×n grid of cell owners with per-player last-move memory
///
/// `place` performs no legality check; callers validate through
/// `rules::is_valid_move` first. Deserialized boards go through the same
/// checks as `Board::new` plus last-move ownership.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(try_from = "RawBoard")]
pub struct Board {
    size: usize,
    cells: Vec<Option<PlayerId>>,
    last_moves: [Option<Coord>; PlayerId::MAX_PLAYERS],
}

/// Unchecked wire form of a `Board`
#[derive(Deserialize)]
struct RawBoard {
    size: usize,
    cells: Vec<Option<PlayerId>>,
    last_moves: [Option<Coord>; PlayerId::MAX_PLAYERS],
}

impl TryFrom<RawBoard> for Board {
    type Error = String;

    fn try_from(raw: RawBoard) -> Result<Self, Self::Error> {
        if raw.size < MIN_BOARD_SIZE {
            return Err(format!(
                "board size must be at least {}, got {}",
                MIN_BOARD_SIZE, raw.size
            ));
        }
        if raw.cells.len() != raw.size * raw.size {
            return Err(format!(
                "expected {} cells for a {}x{} board, got {}",
                raw.size * raw.size,
                raw.size,
                raw.size,
                raw.cells.len()
            ));
        }

        let board = Board {
            size: raw.size,
            cells: raw.cells,
            last_moves: raw.last_moves,
        };
        for player in PlayerId::all() {
            if let Some(last) = board.last_move(player) {
                if board.owner(last) != Some(player) {
                    return Err(format!("last move of {} at {} is not its own mark", player, last));
                }
            }
        }
        Ok(board)
    }
}

/// Owned copy of a board taken for look-ahead
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot(Board);

impl BoardSnapshot {
    /// Read access to the captured board
    pub fn board(&self) -> &Board {
        &self.0
    }
}

impl Board {
    /// Creates an empty board; `size` must be at least `MIN_BOARD_SIZE`
    pub fn new(size: usize) -> Self {
        debug_assert!(size >= MIN_BOARD_SIZE);
        Board {
            size,
            cells: vec![None; size * size],
            last_moves: [None; PlayerId::MAX_PLAYERS],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Checks if a coordinate lies on the board
    pub fn contains(&self, coord: Coord) -> bool {
        let n = self.size as i32;
        coord.row >= 0 && coord.row < n && coord.col >= 0 && coord.col < n
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        if self.contains(coord) {
            Some(coord.row as usize * self.size + coord.col as usize)
        } else {
            None
        }
    }

    /// Owner of a cell; `None` for empty or off-board cells
    pub fn owner(&self, coord: Coord) -> Option<PlayerId> {
        self.index(coord).and_then(|i| self.cells[i])
    }

    /// True only for on-board cells without a mark
    pub fn is_empty(&self, coord: Coord) -> bool {
        self.index(coord).map_or(false, |i| self.cells[i].is_none())
    }

    pub fn last_move(&self, player: PlayerId) -> Option<Coord> {
        self.last_moves[player.index()]
    }

    /// Places a mark and records it as the player's last move
    pub fn place(&mut self, player: PlayerId, coord: Coord) {
        debug_assert!(self.is_empty(coord), "place on non-empty cell {}", coord);
        if let Some(i) = self.index(coord) {
            self.cells[i] = Some(player);
            self.last_moves[player.index()] = Some(coord);
        }
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot(self.clone())
    }

    /// Rolls the board back to `snapshot`, reusing the cell buffer
    pub fn restore(&mut self, snapshot: &BoardSnapshot) {
        let saved = &snapshot.0;
        self.size = saved.size;
        self.cells.clone_from(&saved.cells);
        self.last_moves = saved.last_moves;
    }

    pub fn is_border(&self, coord: Coord) -> bool {
        let last = self.size as i32 - 1;
        self.contains(coord)
            && (coord.row == 0 || coord.row == last || coord.col == 0 || coord.col == last)
    }

    pub fn is_corner(&self, coord: Coord) -> bool {
        let last = self.size as i32 - 1;
        self.contains(coord)
            && (coord.row == 0 || coord.row == last)
            && (coord.col == 0 || coord.col == last)
    }

    /// All coordinates in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        let n = self.size as i32;
        (0..n).flat_map(move |row| (0..n).map(move |col| Coord { row, col }))
    }

    pub fn empty_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.cells().filter(move |c| self.is_empty(*c))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size as i32 {
            let line: Vec<&str> = (0..self.size as i32)
                .map(|col| self.owner(Coord { row, col }).map_or(".", |p| p.mark()))
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

// Legality oracle for FlipTac placements
//
// A player's legal cells always orbit their own most recent mark: any empty
// cell touching it (diagonals included), or an empty cell exactly two steps
// away along a row or column when the cell in between holds another
// player's mark. A player's first mark must go on the border.

use crate::board::Board;
use crate::types::{Coord, PlayerId};

/// Decides whether `player` may place at `cell` on `board`
pub fn is_valid_move(board: &Board, player: PlayerId, cell: Coord) -> bool {
    if !board.is_empty(cell) {
        return false;
    }

    let last = match board.last_move(player) {
        Some(last) => last,
        None => return board.is_border(cell),
    };

    // Adjacent placement
    if last.chebyshev(&cell) <= 1 {
        return true;
    }

    // Jump placement: axis-aligned, distance exactly 2, over another player's mark
    let is_row_jump = last.row == cell.row && (last.col - cell.col).abs() == 2;
    let is_col_jump = last.col == cell.col && (last.row - cell.row).abs() == 2;
    if !is_row_jump && !is_col_jump {
        return false;
    }

    let midpoint = Coord {
        row: (last.row + cell.row) / 2,
        col: (last.col + cell.col) / 2,
    };
    matches!(board.owner(midpoint), Some(owner) if owner != player)
}

/// All legal cells for a player, in row-major order
pub fn legal_moves(board: &Board, player: PlayerId) -> Vec<Coord> {
    board
        .cells()
        .filter(|&c| is_valid_move(board, player, c))
        .collect()
}

/// Number of legal cells for a player
pub fn mobility(board: &Board, player: PlayerId) -> usize {
    board
        .cells()
        .filter(|&c| is_valid_move(board, player, c))
        .count()
}

/// True as soon as one legal cell is found
pub fn has_legal_move(board: &Board, player: PlayerId) -> bool {
    board.cells().any(|c| is_valid_move(board, player, c))
}

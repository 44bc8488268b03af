//! Tensor encoding of a game state for learning agents.
//!
//! Three `n×n` planes, row-major, concatenated:
//! 0. cells owned by the observing player
//! 1. cells owned by any other player
//! 2. constant `1.0` when the observer sits in seat X, `-1.0` otherwise
//!
//! Actions are flat cell indices `row * n + col`.

use crate::game::GameState;
use crate::rules;
use crate::types::{Coord, PlayerId};

pub const NUM_PLANES: usize = 3;

pub fn observation(state: &GameState, player: PlayerId) -> Vec<f32> {
    let board = state.board();
    let area = board.size() * board.size();
    let mut planes = vec![0.0f32; NUM_PLANES * area];

    for (i, coord) in board.cells().enumerate() {
        match board.owner(coord) {
            Some(owner) if owner == player => planes[i] = 1.0,
            Some(_) => planes[area + i] = 1.0,
            None => {}
        }
    }

    let turn_plane = if player == PlayerId::X { 1.0 } else { -1.0 };
    planes[2 * area..].iter_mut().for_each(|v| *v = turn_plane);
    planes
}

pub fn action_index(coord: Coord, board_size: usize) -> usize {
    coord.row as usize * board_size + coord.col as usize
}

pub fn action_coord(index: usize, board_size: usize) -> Coord {
    Coord::new((index / board_size) as i32, (index % board_size) as i32)
}

/// Legal-action mask, one entry per cell
pub fn action_mask(state: &GameState, player: PlayerId) -> Vec<bool> {
    let board = state.board();
    board
        .cells()
        .map(|c| rules::is_valid_move(board, player, c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observation_planes() {
        let mut game = GameState::new(2, 3).unwrap();
        game.apply_move(PlayerId::X, Coord::new(0, 0)).unwrap();
        game.apply_move(PlayerId::O, Coord::new(2, 2)).unwrap();

        let obs = observation(&game, PlayerId::O);
        assert_eq!(obs.len(), 27);
        assert_eq!(obs[8], 1.0);
        assert_eq!(obs[9], 1.0);
        assert_eq!(obs.iter().take(18).sum::<f32>(), 2.0);
        assert!(obs[18..].iter().all(|&v| v == -1.0));
    }

    #[test]
    fn test_action_index_round_trip() {
        assert_eq!(action_index(Coord::new(2, 3), 7), 17);
        assert_eq!(action_coord(17, 7), Coord::new(2, 3));
    }

    #[test]
    fn test_action_mask_matches_legal_moves() {
        let game = GameState::new(2, 4).unwrap();
        let mask = action_mask(&game, PlayerId::X);
        assert_eq!(mask.iter().filter(|&&m| m).count(), 12);
        assert!(!mask[action_index(Coord::new(1, 1), 4)]);
    }
}

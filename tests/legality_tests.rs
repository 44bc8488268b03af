//! Legality oracle tests
//!
//! Covers the border-only first move, adjacency, the jump rule and the
//! oracle's lack of directional bias under rotation and reflection.

use fliptac::board::Board;
use fliptac::rules::{is_valid_move, legal_moves};
use fliptac::types::{Coord, PlayerId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn c(row: i32, col: i32) -> Coord {
    Coord::new(row, col)
}

#[test]
fn test_first_move_valid_only_on_border() {
    let board = Board::new(5);
    for player in PlayerId::all() {
        assert!(!is_valid_move(&board, player, c(2, 2)), "{} may not open in the centre", player);
        assert!(is_valid_move(&board, player, c(0, 0)), "{} may open in a corner", player);
        for coord in board.cells() {
            assert_eq!(is_valid_move(&board, player, coord), board.is_border(coord));
        }
    }
}

#[test]
fn test_occupied_cell_is_never_valid() {
    let mut board = Board::new(5);
    board.place(PlayerId::O, c(0, 1));
    board.place(PlayerId::X, c(0, 0));
    assert!(!is_valid_move(&board, PlayerId::X, c(0, 1)));
    assert!(!is_valid_move(&board, PlayerId::O, c(0, 0)));
    assert!(!is_valid_move(&board, PlayerId::Triangle, c(0, 0)));
}

#[test]
fn test_jump_requires_opposing_midpoint() {
    // Last move at (2,2), target (2,4) across (2,3)
    let mut empty_mid = Board::new(5);
    empty_mid.place(PlayerId::X, c(2, 2));
    assert!(!is_valid_move(&empty_mid, PlayerId::X, c(2, 4)));

    let mut own_mid = Board::new(5);
    own_mid.place(PlayerId::X, c(2, 3));
    own_mid.place(PlayerId::X, c(2, 2));
    assert!(!is_valid_move(&own_mid, PlayerId::X, c(2, 4)));

    for other in [PlayerId::O, PlayerId::Triangle, PlayerId::Hash] {
        let mut opposing_mid = Board::new(5);
        opposing_mid.place(other, c(2, 3));
        opposing_mid.place(PlayerId::X, c(2, 2));
        assert!(
            is_valid_move(&opposing_mid, PlayerId::X, c(2, 4)),
            "jump over {} should be legal",
            other
        );
    }
}

#[test]
fn test_jump_along_column_and_backwards() {
    let mut board = Board::new(5);
    board.place(PlayerId::O, c(1, 2));
    board.place(PlayerId::O, c(2, 1));
    board.place(PlayerId::X, c(2, 2));
    assert!(is_valid_move(&board, PlayerId::X, c(0, 2)));
    assert!(is_valid_move(&board, PlayerId::X, c(2, 0)));
    // Nothing to jump towards the bottom or the right
    assert!(!is_valid_move(&board, PlayerId::X, c(4, 2)));
    assert!(!is_valid_move(&board, PlayerId::X, c(2, 4)));
}

#[test]
fn test_jump_target_must_be_empty() {
    let mut board = Board::new(5);
    board.place(PlayerId::O, c(2, 3));
    board.place(PlayerId::O, c(2, 4));
    board.place(PlayerId::X, c(2, 2));
    assert!(!is_valid_move(&board, PlayerId::X, c(2, 4)));
}

#[test]
fn test_no_diagonal_or_long_jumps() {
    let mut board = Board::new(7);
    board.place(PlayerId::O, c(2, 2));
    board.place(PlayerId::O, c(3, 4));
    board.place(PlayerId::O, c(3, 5));
    board.place(PlayerId::X, c(3, 3));
    // Diagonal over (2,2)
    assert!(!is_valid_move(&board, PlayerId::X, c(1, 1)));
    // Distance 3 over two opposing marks
    assert!(!is_valid_move(&board, PlayerId::X, c(3, 6)));
    // Knight-like offset
    assert!(!is_valid_move(&board, PlayerId::X, c(1, 4)));
}

#[test]
fn test_moves_orbit_last_mark_only() {
    let mut board = Board::new(5);
    board.place(PlayerId::X, c(0, 0));
    board.place(PlayerId::X, c(4, 4));
    let moves = legal_moves(&board, PlayerId::X);
    assert_eq!(moves, vec![c(3, 3), c(3, 4), c(4, 3)]);
}

type Transform = fn(Coord, i32) -> Coord;

fn rotate90(coord: Coord, n: i32) -> Coord {
    Coord::new(coord.col, n - 1 - coord.row)
}

fn mirror(coord: Coord, n: i32) -> Coord {
    Coord::new(coord.row, n - 1 - coord.col)
}

fn transpose(coord: Coord, _n: i32) -> Coord {
    Coord::new(coord.col, coord.row)
}

fn random_history(rng: &mut StdRng, n: usize) -> Vec<(PlayerId, Coord)> {
    let mut board = Board::new(n);
    let count = rng.random_range(0..n * n);
    let mut history = Vec::with_capacity(count);
    for _ in 0..count {
        let empty: Vec<Coord> = board.empty_cells().collect();
        let coord = empty[rng.random_range(0..empty.len())];
        let player = PlayerId::all()[rng.random_range(0..4)];
        board.place(player, coord);
        history.push((player, coord));
    }
    history
}

fn build(n: usize, history: &[(PlayerId, Coord)], transform: Option<Transform>) -> Board {
    let mut board = Board::new(n);
    for &(player, coord) in history {
        let coord = match transform {
            Some(t) => t(coord, n as i32),
            None => coord,
        };
        board.place(player, coord);
    }
    board
}

#[test]
fn test_oracle_is_symmetric_under_rotation_and_reflection() {
    let mut rng = StdRng::seed_from_u64(2024);
    let transforms: [Transform; 3] = [rotate90, mirror, transpose];

    for _ in 0..60 {
        let n = rng.random_range(3..8);
        let history = random_history(&mut rng, n);
        let original = build(n, &history, None);

        for transform in transforms {
            let moved = build(n, &history, Some(transform));
            for player in PlayerId::all() {
                for coord in original.cells() {
                    assert_eq!(
                        is_valid_move(&original, player, coord),
                        is_valid_move(&moved, player, transform(coord, n as i32)),
                        "asymmetry for {} at {} on\n{}",
                        player,
                        coord,
                        original
                    );
                }
            }
        }
    }
}

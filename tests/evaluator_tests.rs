//! Evaluation and reward shaping tests
//!
//! Tests cover:
//! - Mobility potential values on known positions
//! - Evaluation never touching the state it scores
//! - Potential-based shaping arithmetic
//! - Terminal, corner, proximity and elimination reward terms

use fliptac::board::Board;
use fliptac::config::{Config, ShapingConfig};
use fliptac::evaluator::{evaluate, Evaluator, MobilityEvaluator, RewardShaper};
use fliptac::game::GameState;
use fliptac::types::{Coord, PlayerId};

const EPS: f64 = 1e-9;

fn c(row: i32, col: i32) -> Coord {
    Coord::new(row, col)
}

fn approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {}, got {}",
        expected,
        actual
    );
}

/// Shaping config with every term switched off
fn silent_shaping() -> ShapingConfig {
    let mut shaping = Config::default_hardcoded().shaping;
    shaping.shaping_factor = 0.0;
    shaping.win_reward = 0.0;
    shaping.loss_reward = 0.0;
    shaping.step_penalty = 0.0;
    shaping.corner_penalty = 0.0;
    shaping.elimination_bonus = 0.0;
    shaping.near_bonus = 0.0;
    shaping.far_penalty = 0.0;
    shaping
}

fn reward_for(shaping: ShapingConfig, game: &mut GameState, player: PlayerId, coord: Coord) -> f64 {
    let shaper = RewardShaper::new(MobilityEvaluator::default(), shaping);
    let before = game.clone();
    let outcome = game.apply_move(player, coord).unwrap();
    shaper.step_reward(&before, game, &outcome)
}

#[test]
fn test_default_evaluation_on_fresh_board() {
    let game = GameState::new(2, 5).unwrap();
    // 16 border cells each, weighted 1.5 against
    approx(evaluate(&game, PlayerId::X).unwrap(), 16.0 - 1.5 * 16.0);
}

#[test]
fn test_evaluation_is_pure_and_deterministic() {
    let mut game = GameState::new(3, 6).unwrap();
    for coord in [c(0, 0), c(0, 5), c(5, 5), c(1, 1), c(1, 4)] {
        let player = game.current_player();
        game.apply_move(player, coord).unwrap();
    }
    let snapshot = game.clone();
    let evaluator = MobilityEvaluator::new(1.5);

    for player in PlayerId::all().into_iter().take(3) {
        let first = evaluator.evaluate(&game, player).unwrap();
        let second = evaluator.evaluate(&game, player).unwrap();
        assert_eq!(first, second);
    }
    assert_eq!(game, snapshot, "evaluation must not alter the game");
}

#[test]
fn test_lone_survivor_scored_on_own_mobility() {
    let mut board = Board::new(5);
    for coord in [c(0, 1), c(1, 0), c(0, 2), c(2, 0)] {
        board.place(PlayerId::X, coord);
    }
    board.place(PlayerId::O, c(0, 0));
    board.place(PlayerId::X, c(2, 2));
    let mut game = GameState::from_position(2, board, PlayerId::X).unwrap();
    game.apply_move(PlayerId::X, c(1, 1)).unwrap();

    assert_eq!(game.winner(), Some(PlayerId::X));
    let own = game.mobility(PlayerId::X).unwrap() as f64;
    approx(MobilityEvaluator::new(1.5).score(&game, PlayerId::X), own);
}

#[test]
fn test_shaping_is_discounted_potential_difference() {
    let before = GameState::new(2, 5).unwrap();
    let mut after = before.clone();
    after.apply_move(PlayerId::X, c(0, 2)).unwrap();

    let shaper = RewardShaper::from_config(
        &Config::default_hardcoded().evaluation,
        &Config::default_hardcoded().shaping,
    );
    // before: 16 - 1.5 * 16 = -8
    // after: X has 5 neighbours of (0,2), O keeps 15 border cells
    approx(shaper.potential(&before, PlayerId::X), -8.0);
    approx(shaper.potential(&after, PlayerId::X), 5.0 - 1.5 * 15.0);
    approx(shaper.shaping(&before, &after, PlayerId::X), 0.99 * -17.5 + 8.0);
}

#[test]
fn test_step_reward_with_default_config() {
    let mut game = GameState::new(2, 5).unwrap();
    let reward = reward_for(Config::default_hardcoded().shaping, &mut game, PlayerId::X, c(0, 2));
    // shaping 0.1 * -9.325, step -0.01, no corner, no opponent mark yet
    approx(reward, 0.1 * (0.99 * -17.5 + 8.0) - 0.01);
}

#[test]
fn test_corner_and_proximity_terms() {
    let mut game = GameState::new(2, 5).unwrap();
    game.apply_move(PlayerId::X, c(0, 2)).unwrap();

    let mut shaping = silent_shaping();
    shaping.corner_penalty = 0.2;
    shaping.near_bonus = 0.05;
    shaping.far_penalty = 0.1;

    // Corner two cells from X's mark: within the near distance
    let reward = reward_for(shaping.clone(), &mut game.clone(), PlayerId::O, c(0, 4));
    approx(reward, -0.2 + 0.05);

    // Far corner, Chebyshev distance 4: neither near nor far
    let reward = reward_for(shaping.clone(), &mut game.clone(), PlayerId::O, c(4, 0));
    approx(reward, -0.2);

    // Border cell three rows away: near
    let reward = reward_for(shaping, &mut game.clone(), PlayerId::O, c(3, 0));
    approx(reward, 0.05);
}

#[test]
fn test_far_penalty_on_large_board() {
    let mut game = GameState::new(2, 7).unwrap();
    game.apply_move(PlayerId::X, c(0, 0)).unwrap();

    let mut shaping = silent_shaping();
    shaping.far_penalty = 0.1;
    let reward = reward_for(shaping, &mut game, PlayerId::O, c(6, 3));
    approx(reward, -0.1);
}

#[test]
fn test_win_reward() {
    // X O X / O X O / O X .
    let mut board = Board::new(3);
    board.place(PlayerId::X, c(0, 0));
    board.place(PlayerId::O, c(0, 1));
    board.place(PlayerId::X, c(0, 2));
    board.place(PlayerId::O, c(1, 0));
    board.place(PlayerId::X, c(1, 1));
    board.place(PlayerId::O, c(1, 2));
    board.place(PlayerId::O, c(2, 0));
    board.place(PlayerId::X, c(2, 1));
    let mut game = GameState::from_position(2, board, PlayerId::X).unwrap();

    let mut shaping = silent_shaping();
    shaping.win_reward = 5.0;
    shaping.loss_reward = -2.0;
    approx(reward_for(shaping, &mut game, PlayerId::X, c(2, 2)), 5.0);
}

#[test]
fn test_loss_reward_when_mover_boxes_itself_in() {
    // X jumps from (0,2) over O into the corner and has nowhere to go next
    let mut board = Board::new(3);
    board.place(PlayerId::O, c(0, 1));
    board.place(PlayerId::O, c(1, 0));
    board.place(PlayerId::O, c(2, 0));
    board.place(PlayerId::O, c(1, 1));
    board.place(PlayerId::X, c(0, 2));
    let mut game = GameState::from_position(2, board, PlayerId::X).unwrap();

    let mut shaping = silent_shaping();
    shaping.win_reward = 5.0;
    shaping.loss_reward = -2.0;
    approx(reward_for(shaping, &mut game, PlayerId::X, c(0, 0)), -2.0);
    assert!(!game.is_over());
    assert_eq!(game.current_player(), PlayerId::O);
}

#[test]
fn test_elimination_bonus_per_player() {
    let mut board = Board::new(5);
    for coord in [c(0, 1), c(1, 0), c(1, 1), c(0, 0)] {
        board.place(PlayerId::O, coord);
    }
    for coord in [c(3, 4), c(4, 3), c(4, 4)] {
        board.place(PlayerId::Triangle, coord);
    }
    board.place(PlayerId::Hash, c(4, 0));
    board.place(PlayerId::X, c(2, 2));
    let mut game = GameState::from_position(4, board, PlayerId::X).unwrap();

    let mut shaping = silent_shaping();
    shaping.elimination_bonus = 1.0;
    approx(reward_for(shaping, &mut game, PlayerId::X, c(3, 3)), 2.0);
}

// Turn rotation and elimination state machine
//
// After every placement the turn passes to the next seat still in the
// rotation. A player who has no legal cell when their turn arrives is
// eliminated on the spot, and the check repeats for whoever is next, until
// either a player with a legal move is found or one player is left.

use log::{debug, info};

use crate::board::{Board, MIN_BOARD_SIZE};
use crate::error::GameError;
use crate::rules;
use crate::types::{Coord, PlayerId};

/// Terminal value of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    InProgress,
    Winner(PlayerId),
}

/// What a successful `apply_move` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub player: PlayerId,
    pub coord: Coord,
    /// Players removed while resolving this move, in elimination order
    pub eliminated: Vec<PlayerId>,
    pub winner: Option<PlayerId>,
    /// Player to move next; `None` once the game is decided
    pub next_player: Option<PlayerId>,
}

/// Complete state of one running game
///
/// Owned by the caller; cloning it is the snapshot used for look-ahead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    player_count: usize,
    board: Board,
    active: Vec<PlayerId>,
    current: PlayerId,
    result: GameResult,
    placements: [u32; PlayerId::MAX_PLAYERS],
    turn: u32,
}

/// Starts a new game; see `GameState::new`
pub fn new_game(player_count: usize, board_size: usize) -> Result<GameState, GameError> {
    GameState::new(player_count, board_size)
}

/// Applies a move to `state`; see `GameState::apply_move`
pub fn apply_move(state: &mut GameState, player: PlayerId, coord: Coord) -> Result<Outcome, GameError> {
    state.apply_move(player, coord)
}

/// Number of seats used for a configured participant count
///
/// A single participant plays against the computer, which takes seat X.
pub fn seat_count(player_count: usize) -> usize {
    player_count.max(2)
}

fn validate_settings(player_count: usize, board_size: usize) -> Result<(), GameError> {
    if !(1..=PlayerId::MAX_PLAYERS).contains(&player_count) {
        return Err(GameError::InvalidSettings(format!(
            "player count must be between 1 and {}, got {}",
            PlayerId::MAX_PLAYERS,
            player_count
        )));
    }
    if board_size < MIN_BOARD_SIZE {
        return Err(GameError::InvalidSettings(format!(
            "board size must be at least {}, got {}",
            MIN_BOARD_SIZE, board_size
        )));
    }
    Ok(())
}

impl GameState {
    /// Creates a game with an empty board; seat X moves first
    pub fn new(player_count: usize, board_size: usize) -> Result<Self, GameError> {
        validate_settings(player_count, board_size)?;

        let active: Vec<PlayerId> = PlayerId::all()[..seat_count(player_count)].to_vec();
        info!(
            "New game: {} seats on {}x{} board",
            active.len(),
            board_size,
            board_size
        );

        Ok(GameState {
            player_count,
            board: Board::new(board_size),
            active,
            current: PlayerId::X,
            result: GameResult::InProgress,
            placements: [0; PlayerId::MAX_PLAYERS],
            turn: 0,
        })
    }

    /// Builds a mid-game state from an arbitrary board with every seat active
    ///
    /// Each recorded last move must be owned by its player. No elimination
    /// check runs here; the first `apply_move` resolves the rotation.
    pub fn from_position(
        player_count: usize,
        board: Board,
        to_move: PlayerId,
    ) -> Result<Self, GameError> {
        validate_settings(player_count, board.size())?;

        let active: Vec<PlayerId> = PlayerId::all()[..seat_count(player_count)].to_vec();
        if !active.contains(&to_move) {
            return Err(GameError::InvalidPlayer(to_move));
        }

        let mut placements = [0; PlayerId::MAX_PLAYERS];
        for coord in board.cells() {
            if let Some(owner) = board.owner(coord) {
                if !active.contains(&owner) {
                    return Err(GameError::InvalidSettings(format!(
                        "mark of unused seat {} at {}",
                        owner, coord
                    )));
                }
                placements[owner.index()] += 1;
            }
        }
        for player in PlayerId::all() {
            if let Some(last) = board.last_move(player) {
                if board.owner(last) != Some(player) {
                    return Err(GameError::InvalidSettings(format!(
                        "last move of {} at {} is not its own mark",
                        player, last
                    )));
                }
            }
        }

        let turn = board.occupied_count() as u32;
        Ok(GameState {
            player_count,
            board,
            active,
            current: to_move,
            result: GameResult::InProgress,
            placements,
            turn,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_size(&self) -> usize {
        self.board.size()
    }

    /// Configured participant count (1..=4)
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    /// Seats taking part in this game, in rotation order
    pub fn seats(&self) -> &[PlayerId] {
        let all: &'static [PlayerId; 4] = &PlayerId::ALL;
        &all[..seat_count(self.player_count)]
    }

    /// Seats still in the rotation
    pub fn active_players(&self) -> &[PlayerId] {
        &self.active
    }

    pub fn is_active(&self, player: PlayerId) -> bool {
        self.active.contains(&player)
    }

    pub fn current_player(&self) -> PlayerId {
        self.current
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    pub fn winner(&self) -> Option<PlayerId> {
        match self.result {
            GameResult::Winner(p) => Some(p),
            GameResult::InProgress => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.result != GameResult::InProgress
    }

    /// Total placements made so far
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Placements made by one player
    pub fn placements(&self, player: PlayerId) -> u32 {
        self.placements[player.index()]
    }

    /// True for seats driven by the built-in opponent
    pub fn is_computer(&self, player: PlayerId) -> bool {
        self.player_count == 1 && player == PlayerId::X
    }

    /// Legal cells for an active player, row-major
    pub fn legal_moves(&self, player: PlayerId) -> Result<Vec<Coord>, GameError> {
        self.ensure_active(player)?;
        Ok(rules::legal_moves(&self.board, player))
    }

    pub fn mobility(&self, player: PlayerId) -> Result<usize, GameError> {
        self.ensure_active(player)?;
        Ok(rules::mobility(&self.board, player))
    }

    pub fn is_valid_move(&self, player: PlayerId, coord: Coord) -> bool {
        rules::is_valid_move(&self.board, player, coord)
    }

    /// The player whose freedom `player` competes against: the next active
    /// seat after `player`. `None` when `player` is the only one left.
    pub fn opponent_of(&self, player: PlayerId) -> Option<PlayerId> {
        let next = self.next_active_after(player)?;
        if next == player {
            None
        } else {
            Some(next)
        }
    }

    pub(crate) fn ensure_active(&self, player: PlayerId) -> Result<(), GameError> {
        if self.is_active(player) {
            Ok(())
        } else {
            Err(GameError::InvalidPlayer(player))
        }
    }

    /// Next seat after `cursor` (wrapping) that is still active
    ///
    /// `cursor` itself may already be eliminated.
    fn next_active_after(&self, cursor: PlayerId) -> Option<PlayerId> {
        let seats = seat_count(self.player_count);
        (1..=seats)
            .map(|step| (cursor.index() + step) % seats)
            .filter_map(PlayerId::from_index)
            .find(|p| self.active.contains(p))
    }

    /// Places a mark for `player` and resolves turn order and eliminations
    ///
    /// Atomic: on error nothing changes.
    pub fn apply_move(&mut self, player: PlayerId, coord: Coord) -> Result<Outcome, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        self.ensure_active(player)?;
        if player != self.current {
            return Err(GameError::OutOfTurn {
                expected: self.current,
                actual: player,
            });
        }
        if !rules::is_valid_move(&self.board, player, coord) {
            return Err(GameError::IllegalMove { player, coord });
        }

        let mut next = self.clone();
        next.board.place(player, coord);
        next.placements[player.index()] += 1;
        next.turn += 1;
        debug!("Turn {}: {} placed at {}", next.turn, player, coord);

        let eliminated = next.resolve_rotation(player)?;
        *self = next;

        Ok(Outcome {
            player,
            coord,
            eliminated,
            winner: self.winner(),
            next_player: if self.is_over() { None } else { Some(self.current) },
        })
    }

    /// Advances from `mover`, eliminating stuck players one at a time
    fn resolve_rotation(&mut self, mover: PlayerId) -> Result<Vec<PlayerId>, GameError> {
        let mut eliminated = Vec::new();
        let mut cursor = mover;

        loop {
            if self.active.len() == 1 {
                let winner = self.active[0];
                self.current = winner;
                self.result = GameResult::Winner(winner);
                info!("Turn {}: {} wins", self.turn, winner);
                return Ok(eliminated);
            }

            let candidate = self.next_active_after(cursor).ok_or(GameError::NoSurvivor)?;
            self.current = candidate;
            if rules::has_legal_move(&self.board, candidate) {
                return Ok(eliminated);
            }

            info!("Turn {}: {} has no legal moves and is eliminated", self.turn, candidate);
            self.active.retain(|p| *p != candidate);
            eliminated.push(candidate);
            if self.active.is_empty() {
                return Err(GameError::NoSurvivor);
            }
            cursor = candidate;
        }
    }
}

// Replay module for verifying recorded games
//
// This module provides functionality to:
// 1. Parse JSONL transcripts written by `TranscriptLogger`
// 2. Re-apply every recorded move to a fresh game
// 3. Compare recorded eliminations and winner against the engine's
// 4. Ask the opponent selector what it would have played at each turn

use log::{info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::config::Config;
use crate::game::GameState;
use crate::opponent::OpponentSelector;
use crate::transcript::TranscriptEntry;
use crate::types::{Coord, PlayerId};

/// Result of replaying a single turn
#[derive(Debug, Clone)]
pub struct TurnCheck {
    pub turn: u32,
    pub player: PlayerId,
    pub coord: Coord,
    pub recorded_eliminated: Vec<PlayerId>,
    pub replayed_eliminated: Vec<PlayerId>,
    pub matches: bool,
    /// What the selector would play here; `None` during the random opening
    pub selector_move: Option<Coord>,
}

/// Result of replaying one complete game
#[derive(Debug, Clone)]
pub struct GameReplay {
    pub turns: Vec<TurnCheck>,
    pub recorded_winner: Option<PlayerId>,
    pub replayed_winner: Option<PlayerId>,
}

impl GameReplay {
    pub fn matches(&self) -> bool {
        self.recorded_winner == self.replayed_winner && self.turns.iter().all(|t| t.matches)
    }
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_turns: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub selector_checked: usize,
    pub selector_agreed: usize,
    pub agreement_rate: f64,
}

/// Replay engine for transcripts
pub struct ReplayEngine {
    config: Config,
    verbose: bool,
}

impl ReplayEngine {
    /// Creates a new replay engine with the given configuration
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine { config, verbose }
    }

    /// Loads all entries from a JSONL transcript
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<TranscriptEntry>, String> {
        let file = File::open(log_path.as_ref())
            .map_err(|e| format!("Failed to open transcript: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: TranscriptEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} transcript entries", entries.len());
        Ok(entries)
    }

    /// Splits a transcript into games; a new game starts at every turn 1
    pub fn split_games(entries: &[TranscriptEntry]) -> Vec<&[TranscriptEntry]> {
        let mut games = Vec::new();
        let mut start = 0;
        for (i, entry) in entries.iter().enumerate() {
            if entry.turn == 1 && i > start {
                games.push(&entries[start..i]);
                start = i;
            }
        }
        if start < entries.len() {
            games.push(&entries[start..]);
        }
        games
    }

    /// Re-applies one game's moves to a fresh state
    pub fn replay_game(&self, entries: &[TranscriptEntry]) -> Result<GameReplay, String> {
        let first = entries.first().ok_or("Empty game in transcript")?;
        let mut state = GameState::new(first.player_count, first.board_size)
            .map_err(|e| format!("Invalid game settings in transcript: {}", e))?;
        let mut selector = OpponentSelector::with_seed(self.config.opponent.clone(), 0);

        let mut turns = Vec::with_capacity(entries.len());
        for entry in entries {
            let selector_move = if state.placements(entry.player)
                >= self.config.opponent.opening_random_moves
            {
                selector.select(&state, entry.player).ok()
            } else {
                None
            };

            let outcome = state
                .apply_move(entry.player, entry.coord)
                .map_err(|e| format!("Turn {}: {}", entry.turn, e))?;

            let matches = outcome.eliminated == entry.eliminated && outcome.winner == entry.winner;
            if self.verbose {
                if matches {
                    info!("Turn {}: ✓ {} at {}", entry.turn, entry.player, entry.coord);
                } else {
                    warn!(
                        "Turn {}: ✗ {} at {} - recorded eliminated {:?}, replayed {:?}",
                        entry.turn, entry.player, entry.coord, entry.eliminated, outcome.eliminated
                    );
                }
            }

            turns.push(TurnCheck {
                turn: entry.turn,
                player: entry.player,
                coord: entry.coord,
                recorded_eliminated: entry.eliminated.clone(),
                replayed_eliminated: outcome.eliminated,
                matches,
                selector_move,
            });
        }

        Ok(GameReplay {
            turns,
            recorded_winner: entries.last().and_then(|e| e.winner),
            replayed_winner: state.winner(),
        })
    }

    /// Replays every game in a transcript
    pub fn replay_all(&self, entries: &[TranscriptEntry]) -> Vec<GameReplay> {
        let mut results = Vec::new();

        for (idx, game) in Self::split_games(entries).into_iter().enumerate() {
            match self.replay_game(game) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Failed to replay game {}: {}", idx + 1, e);
                }
            }
        }

        results
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, games: &[GameReplay]) -> ReplayStats {
        let turns: Vec<&TurnCheck> = games.iter().flat_map(|g| g.turns.iter()).collect();
        let total_turns = turns.len();
        let matches = turns.iter().filter(|t| t.matches).count();
        let checked: Vec<&&TurnCheck> = turns.iter().filter(|t| t.selector_move.is_some()).collect();
        let selector_agreed = checked
            .iter()
            .filter(|t| t.selector_move == Some(t.coord))
            .count();
        let agreement_rate = if checked.is_empty() {
            0.0
        } else {
            (selector_agreed as f64 / checked.len() as f64) * 100.0
        };

        ReplayStats {
            total_turns,
            matches,
            mismatches: total_turns - matches,
            selector_checked: checked.len(),
            selector_agreed,
            agreement_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, games: &[GameReplay]) {
        let stats = self.generate_stats(games);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Games:            {}", games.len());
        println!("Total Turns:      {}", stats.total_turns);
        println!("Matching Turns:   {}", stats.matches);
        println!("Mismatches:       {}", stats.mismatches);
        println!(
            "Selector Agrees:  {}/{} ({:.1}%)",
            stats.selector_agreed, stats.selector_checked, stats.agreement_rate
        );
        println!("═══════════════════════════════════════════════════════════\n");

        for (idx, game) in games.iter().enumerate() {
            let status = if game.matches() { "✓" } else { "✗" };
            println!(
                "Game {}: {} recorded winner {}, replayed winner {}",
                idx + 1,
                status,
                Self::winner_label(game.recorded_winner),
                Self::winner_label(game.replayed_winner)
            );
            for turn in game.turns.iter().filter(|t| !t.matches) {
                println!(
                    "  Turn {}: {} at {} eliminated {:?}, recorded {:?}",
                    turn.turn, turn.player, turn.coord, turn.replayed_eliminated, turn.recorded_eliminated
                );
            }
        }
        println!();
    }

    fn winner_label(winner: Option<PlayerId>) -> String {
        winner.map_or_else(|| "none".to_string(), |p| p.to_string())
    }
}

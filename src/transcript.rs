// Transcript logging for finished and in-progress games
//
// Each placement is written as one JSON line. Writes go through a channel to
// a single background task, so callers never block on disk I/O and lines
// land in the order the moves were made.

use log::error;
use serde::{Deserialize, Serialize};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::game::{GameState, Outcome};
use crate::types::{Coord, PlayerId};

/// One placement as recorded in the transcript
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TranscriptEntry {
    /// 1-based placement number within the game
    pub turn: u32,
    pub player_count: usize,
    pub board_size: usize,
    pub player: PlayerId,
    pub coord: Coord,
    #[serde(default)]
    pub eliminated: Vec<PlayerId>,
    pub winner: Option<PlayerId>,
    pub timestamp: String,
}

impl TranscriptEntry {
    /// Builds the entry for a move that produced `outcome`, leaving `after`
    pub fn from_outcome(after: &GameState, outcome: &Outcome) -> Self {
        TranscriptEntry {
            turn: after.turn(),
            player_count: after.player_count(),
            board_size: after.board_size(),
            player: outcome.player,
            coord: outcome.coord,
            eliminated: outcome.eliminated.clone(),
            winner: outcome.winner,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Appends transcript entries to a JSONL file in the background
pub struct TranscriptLogger {
    sender: Option<UnboundedSender<TranscriptEntry>>,
    writer: Option<JoinHandle<()>>,
}

impl TranscriptLogger {
    /// Creates a new transcript logger
    /// If enabled is true, initializes the log file (truncating if it exists)
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return Self::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
            .await
        {
            Ok(file) => {
                log::info!("Transcript logging enabled: {}", log_file_path);
                let (sender, receiver) = mpsc::unbounded_channel();
                let writer = tokio::spawn(Self::write_loop(file, receiver));
                TranscriptLogger {
                    sender: Some(sender),
                    writer: Some(writer),
                }
            }
            Err(e) => {
                error!("Failed to create transcript file '{}': {}", log_file_path, e);
                Self::disabled()
            }
        }
    }

    /// Creates a disabled logger (no-op)
    pub fn disabled() -> Self {
        TranscriptLogger {
            sender: None,
            writer: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }

    /// Queues one move for writing (fire-and-forget)
    pub fn log_move(&self, after: &GameState, outcome: &Outcome) {
        if let Some(sender) = &self.sender {
            if sender.send(TranscriptEntry::from_outcome(after, outcome)).is_err() {
                error!("Transcript writer has stopped; dropping turn {}", after.turn());
            }
        }
    }

    /// Flushes every queued entry and stops the writer
    pub async fn close(mut self) {
        // Dropping the sender ends the write loop once the queue drains
        self.sender.take();
        if let Some(writer) = self.writer.take() {
            if let Err(e) = writer.await {
                error!("Transcript writer failed: {}", e);
            }
        }
    }

    async fn write_loop(mut file: File, mut receiver: UnboundedReceiver<TranscriptEntry>) {
        while let Some(entry) = receiver.recv().await {
            match serde_json::to_string(&entry) {
                Ok(json_line) => {
                    let line_with_newline = format!("{}\n", json_line);
                    if let Err(e) = file.write_all(line_with_newline.as_bytes()).await {
                        error!("Failed to write transcript entry: {}", e);
                    }
                }
                Err(e) => {
                    error!("Failed to serialize transcript entry: {}", e);
                }
            }
        }

        if let Err(e) = file.flush().await {
            error!("Failed to flush transcript: {}", e);
        }
    }
}

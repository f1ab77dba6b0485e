// Per-turn decision log
//
// Writes are fire-and-forget tokio tasks so the /move response never waits on
// disk. Each line is one JSON object; the replay tool reads the file back.

use log::{error, info};
use serde::Serialize;
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::types::{Board, Direction};

/// One logged move decision
#[derive(Debug, Serialize)]
struct DebugLogEntry {
    turn: i32,
    you_id: String,
    chosen_move: String,
    score: i64,
    depth: u8,
    board: Board,
    timestamp: String,
}

/// Cloneable handle to the JSONL log
#[derive(Clone)]
pub struct DebugLogger {
    file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl DebugLogger {
    /// Opens (and truncates) the log file when `enabled`.
    /// A file that cannot be created degrades to a disabled logger.
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return Self::disabled();
        }

        let opened = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
            .await;

        match opened {
            Ok(file) => {
                info!("Debug logging enabled: {}", log_file_path);
                DebugLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to create debug log file '{}': {}", log_file_path, e);
                Self::disabled()
            }
        }
    }

    /// Creates a disabled debug logger (no-op)
    pub fn disabled() -> Self {
        DebugLogger {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Queues one decision for writing. Must be called inside a tokio runtime
    /// when logging is enabled.
    pub fn log_move(
        &self,
        turn: i32,
        board: Board,
        you_id: String,
        chosen_move: Direction,
        score: i64,
        depth: u8,
    ) {
        if !self.enabled {
            return;
        }

        let entry = DebugLogEntry {
            turn,
            you_id,
            chosen_move: chosen_move.as_str().to_string(),
            score,
            depth,
            board,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        let file_handle = self.file.clone();

        tokio::spawn(async move {
            Self::write_entry(file_handle, entry).await;
        });
    }

    async fn write_entry(file_handle: Arc<Mutex<Option<File>>>, entry: DebugLogEntry) {
        let mut guard = file_handle.lock().await;
        let file = match guard.as_mut() {
            Some(file) => file,
            None => return,
        };

        let mut line = match serde_json::to_string(&entry) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize debug log entry: {}", e);
                return;
            }
        };
        line.push('\n');

        if let Err(e) = file.write_all(line.as_bytes()).await {
            error!("Failed to write debug log entry: {}", e);
        } else if let Err(e) = file.flush().await {
            error!("Failed to flush debug log: {}", e);
        }
    }
}

// Replay module for analyzing logged games
//
// This module provides functionality to:
// 1. Parse JSONL debug logs
// 2. Re-run the search on each logged board
// 3. Compare logged vs replayed moves
// 4. Render play-by-play boards

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::bot::Bot;
use crate::config::Config;
use crate::payload;
use crate::types::{Battlesnake, Board, Direction};

/// Represents a single log entry from the debug JSONL file
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogEntry {
    pub turn: i32,
    /// Empty in logs that predate this field; the first snake is ours then
    #[serde(default)]
    pub you_id: String,
    pub chosen_move: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub depth: u8,
    pub board: Board,
    #[serde(default)]
    pub timestamp: String,
}

impl LogEntry {
    /// Our snake on the logged board
    pub fn our_snake(&self) -> Result<&Battlesnake, String> {
        if self.you_id.is_empty() {
            return self
                .board
                .snakes
                .first()
                .ok_or_else(|| "No snakes found in board state".to_string());
        }
        self.board
            .snakes
            .iter()
            .find(|s| s.id == self.you_id)
            .ok_or_else(|| format!("Snake with id '{}' not found in board state", self.you_id))
    }
}

/// Result of replaying a single turn
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub turn: i32,
    pub original_move: Direction,
    /// `None` when the search found no legal move
    pub replayed_move: Option<Direction>,
    pub matches: bool,
    pub original_score: i64,
    pub replayed_score: i64,
    pub search_depth: u8,
    pub computation_time_ms: u128,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_turns: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing debug logs
pub struct ReplayEngine {
    config: Config,
    verbose: bool,
}

fn move_label(dir: Option<Direction>) -> &'static str {
    dir.map_or("none", |d| d.as_str())
}

impl ReplayEngine {
    /// Creates a new replay engine with the given configuration
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine { config, verbose }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<LogEntry>, String> {
        let file =
            File::open(log_path.as_ref()).map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: LogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Re-runs the full-depth search on a board.
    /// Returns the chosen move, its score and the computation time.
    pub fn replay_turn(
        &self,
        board: &Board,
        you: &Battlesnake,
    ) -> Result<(Option<Direction>, i64, u8, u128), String> {
        let turn = payload::translate(board, you)?;
        let start_time = Instant::now();

        let decision = Bot::decide(
            &turn,
            &self.config,
            self.config.search.max_depth,
            self.config.search.parallel_root,
        );

        Ok((
            decision.direction,
            decision.score,
            decision.depth,
            start_time.elapsed().as_millis(),
        ))
    }

    /// Replays a single log entry and compares the result
    pub fn replay_entry(&self, entry: &LogEntry) -> Result<ReplayResult, String> {
        if self.verbose {
            info!("Replaying turn {}...", entry.turn);
        }

        let you = entry.our_snake()?;
        let original_move = Direction::parse(&entry.chosen_move)?;

        let (replayed_move, replayed_score, search_depth, computation_time) =
            self.replay_turn(&entry.board, you)?;

        let matches = replayed_move == Some(original_move);

        if self.verbose {
            if matches {
                info!(
                    "Turn {}: MATCH - {} (score: {}, depth: {}, time: {}ms)",
                    entry.turn,
                    original_move.as_str(),
                    replayed_score,
                    search_depth,
                    computation_time
                );
            } else {
                warn!(
                    "Turn {}: MISMATCH - Original: {}, Replayed: {} (score: {}, depth: {}, time: {}ms)",
                    entry.turn,
                    original_move.as_str(),
                    move_label(replayed_move),
                    replayed_score,
                    search_depth,
                    computation_time
                );
            }
        }

        Ok(ReplayResult {
            turn: entry.turn,
            original_move,
            replayed_move,
            matches,
            original_score: entry.score,
            replayed_score,
            search_depth,
            computation_time_ms: computation_time,
        })
    }

    /// Replays all entries in a log file
    pub fn replay_all(&self, entries: &[LogEntry]) -> Vec<ReplayResult> {
        entries
            .iter()
            .filter_map(|entry| match self.replay_entry(entry) {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!("Failed to replay turn {}: {}", entry.turn, e);
                    None
                }
            })
            .collect()
    }

    /// Replays specific turns from a log file
    pub fn replay_turns(
        &self,
        entries: &[LogEntry],
        turn_numbers: &[i32],
    ) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for turn_num in turn_numbers {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn_num)
                .ok_or_else(|| format!("Turn {} not found in log file", turn_num))?;

            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => warn!("Failed to replay turn {}: {}", turn_num, e),
            }
        }

        Ok(results)
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_turns = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let match_rate = if total_turns > 0 {
            (matches as f64 / total_turns as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_turns,
            matches,
            mismatches: total_turns - matches,
            match_rate,
        }
    }

    /// Prints a summary followed by every mismatch
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n===========================================================");
        println!("                    REPLAY REPORT");
        println!("===========================================================");
        println!("Total Turns:    {}", stats.total_turns);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("===========================================================\n");

        if !results.is_empty() {
            let avg_time: f64 = results
                .iter()
                .map(|r| r.computation_time_ms as f64)
                .sum::<f64>()
                / results.len() as f64;
            println!("Average Computation Time:   {:.1}ms\n", avg_time);
        }

        for result in results.iter().filter(|r| !r.matches) {
            println!(
                "Turn {}: {} -> {} (logged score: {}, replayed score: {}, depth: {})",
                result.turn,
                result.original_move.as_str(),
                move_label(result.replayed_move),
                result.original_score,
                result.replayed_score,
                result.search_depth
            );
        }
    }

    /// Validates that specific expected moves were made
    pub fn validate_expected_moves(
        &self,
        entries: &[LogEntry],
        expected_moves: &[(i32, Vec<Direction>)], // (turn, acceptable_moves)
    ) -> Result<(), String> {
        for (turn, acceptable) in expected_moves {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn)
                .ok_or_else(|| format!("Turn {} not found in log", turn))?;

            let actual_move = Direction::parse(&entry.chosen_move)?;

            if !acceptable.contains(&actual_move) {
                return Err(format!(
                    "Turn {}: Expected one of {:?}, but got {}",
                    turn,
                    acceptable.iter().map(|d| d.as_str()).collect::<Vec<_>>(),
                    actual_move.as_str()
                ));
            }
        }

        Ok(())
    }
}

const EMPTY_GLYPH: char = '\u{25E6}';
const FOOD_GLYPH: char = '\u{2022}';

#[derive(Clone, Copy, PartialEq, Eq)]
enum Part {
    Head,
    Body,
    Tail,
}

fn glyph(part: Part, ours: bool) -> char {
    match (part, ours) {
        (Part::Head, true) => '@',
        (Part::Head, false) => '\u{2731}',
        (Part::Body, true) => '\u{25A0}',
        (Part::Body, false) => '\u{25A1}',
        (Part::Tail, true) => '\u{25D8}',
        (Part::Tail, false) => '\u{2317}',
    }
}

/// Renders a wire board top row first, one space between cells, followed by
/// one health line per snake
pub fn render_board(board: &Board, you_id: &str) -> String {
    let width = board.width.max(0) as usize;
    let height = board.height.max(0) as usize;
    let mut cells = vec![vec![(EMPTY_GLYPH, None); width]; height];

    // Wire y grows upward, so row 0 of the printout is y = height - 1
    let mut put = |x: i32, y: i32, glyph: char, part: Option<Part>| {
        if x < 0 || y < 0 || x >= board.width || y >= board.height {
            return;
        }
        let cell = &mut cells[(board.height - 1 - y) as usize][x as usize];
        if cell.1 != Some(Part::Head) {
            *cell = (glyph, part);
        }
    };

    for food in &board.food {
        put(food.x, food.y, FOOD_GLYPH, None);
    }

    for snake in &board.snakes {
        let ours = snake.id == you_id;
        let last = snake.body.len().saturating_sub(1);
        // Draw tail first so earlier segments win shared squares
        for (i, segment) in snake.body.iter().enumerate().rev() {
            let part = if i == 0 {
                Part::Head
            } else if i == last {
                Part::Tail
            } else {
                Part::Body
            };
            put(segment.x, segment.y, glyph(part, ours), Some(part));
        }
    }

    let mut out = String::new();
    for row in &cells {
        let line: Vec<String> = row.iter().map(|(g, _)| g.to_string()).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    for snake in &board.snakes {
        out.push_str(&format!("Snake: {}\tHealth: {}\n", snake.id, snake.health));
    }
    out
}

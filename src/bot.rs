// Move decision orchestration
//
// The search itself has no notion of time. The bot runs it on a blocking
// thread with iterative deepening and returns the deepest finished result
// once the response budget runs out.

use log::{info, warn};
use parking_lot::Mutex;
use rand::seq::IndexedRandom;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::debug_logger::DebugLogger;
use crate::grid::{neighbors, NeighborMode};
use crate::payload::{self, Turn};
use crate::search;
use crate::types::{Battlesnake, Board, Coord, Direction, Game};

/// Result of one completed deepening iteration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    /// `None` when no legal move exists
    pub direction: Option<Direction>,
    pub score: i64,
    pub depth: u8,
}

/// State shared between the async poller and the search thread
#[derive(Debug, Default)]
pub struct SharedSearchState {
    best: Mutex<Option<Decision>>,
    search_complete: AtomicBool,
    cancelled: AtomicBool,
    current_depth: AtomicU8,
}

impl SharedSearchState {
    pub fn new() -> Self {
        Self::default()
    }

    fn publish(&self, decision: Decision) {
        *self.best.lock() = Some(decision);
    }

    /// Deepest decision published so far
    pub fn get_best(&self) -> Option<Decision> {
        *self.best.lock()
    }

    pub fn is_complete(&self) -> bool {
        self.search_complete.load(Ordering::Acquire)
    }

    pub fn current_depth(&self) -> u8 {
        self.current_depth.load(Ordering::Acquire)
    }

    /// Asks the search thread to stop before its next deepening iteration.
    /// An iteration already running finishes and its result is dropped.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Battlesnake bot exposing one method per API endpoint
pub struct Bot {
    config: Config,
    logger: DebugLogger,
}

impl Bot {
    /// Creates a new Bot instance with debug logging disabled
    pub fn new(config: Config) -> Self {
        Bot {
            config,
            logger: DebugLogger::disabled(),
        }
    }

    /// Creates a Bot that records every move decision to `logger`
    pub fn with_logger(config: Config, logger: DebugLogger) -> Self {
        Bot { config, logger }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns bot metadata and appearance
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        json!({
            "apiversion": "1",
            "author": "robosnake",
            "color": "#B22222",
            "head": "default",
            "tail": "default",
        })
    }

    /// Called when a game starts
    /// Corresponds to POST /start endpoint
    pub fn start(&self, game: &Game, _turn: &i32, _board: &Board, _you: &Battlesnake) {
        info!("GAME START {}", game.id);
    }

    /// Called when a game ends
    /// Corresponds to POST /end endpoint
    pub fn end(&self, game: &Game, turn: &i32, _board: &Board, _you: &Battlesnake) {
        info!("GAME OVER {} after {} turns", game.id, turn);
    }

    /// Computes and returns the next move
    /// Corresponds to POST /move endpoint
    ///
    /// The search runs on tokio's blocking pool while this task polls the
    /// shared state until the search finishes or the time budget is spent.
    pub async fn get_move(
        &self,
        _game: &Game,
        turn: &i32,
        board: &Board,
        you: &Battlesnake,
    ) -> Value {
        let start_time = Instant::now();

        info!("Turn {}: Computing move", turn);

        let decision = match payload::translate(board, you) {
            Ok(turn_state) => self.search_with_deadline(turn_state, start_time).await,
            Err(e) => {
                warn!("Turn {}: cannot search this board: {}", turn, e);
                None
            }
        };

        let (chosen_move, score, depth) = match decision {
            Some(Decision {
                direction: Some(direction),
                score,
                depth,
            }) => (direction, score, depth),
            other => {
                let fallback = Self::fallback_move(board, you);
                warn!(
                    "Turn {}: no safe move found, falling back to {}",
                    turn,
                    fallback.as_str()
                );
                let (score, depth) = other.map_or((0, 0), |d| (d.score, d.depth));
                (fallback, score, depth)
            }
        };

        info!(
            "Turn {}: Chose {} (score: {}, depth: {}, time: {}ms)",
            turn,
            chosen_move.as_str(),
            score,
            depth,
            start_time.elapsed().as_millis()
        );

        self.logger
            .log_move(*turn, board.clone(), you.id.clone(), chosen_move, score, depth);

        json!({ "move": chosen_move.as_str() })
    }

    async fn search_with_deadline(&self, turn: Turn, start_time: Instant) -> Option<Decision> {
        let shared = Arc::new(SharedSearchState::new());
        let shared_clone = shared.clone();
        let config = self.config.clone();

        tokio::task::spawn_blocking(move || {
            Bot::compute_best_move_internal(&turn, shared_clone, start_time, &config)
        });

        let effective_budget = self.config.timing.effective_budget_ms();
        let polling_interval = Duration::from_millis(self.config.timing.polling_interval_ms);

        loop {
            if shared.is_complete() {
                break;
            }
            let elapsed = start_time.elapsed().as_millis() as u64;
            if elapsed >= effective_budget {
                break;
            }

            let remaining = Duration::from_millis(effective_budget - elapsed);
            tokio::time::sleep(polling_interval.min(remaining)).await;
        }

        // The blocking search cannot be interrupted mid-iteration; stop it from
        // starting another one now that the answer is taken
        shared.cancel();
        shared.get_best()
    }

    /// Iterative deepening over full turns, publishing each finished depth
    pub fn compute_best_move_internal(
        turn: &Turn,
        shared: Arc<SharedSearchState>,
        start_time: Instant,
        config: &Config,
    ) {
        let parallel = config.search.parallel_root
            && rayon::current_num_threads() >= config.search.min_cpus_for_parallel;
        let effective_budget = config.timing.effective_budget_ms();
        let step = config.search.depth_step.max(1);
        let mut depth = config.search.initial_depth.min(config.search.max_depth);

        loop {
            if shared.is_cancelled() {
                info!("Stopping search: deadline passed at depth {}", shared.current_depth());
                break;
            }

            let elapsed = start_time.elapsed().as_millis() as u64;
            let remaining = effective_budget.saturating_sub(elapsed);

            if remaining < config.timing.min_time_remaining_ms {
                info!("Stopping search: insufficient time remaining ({}ms)", remaining);
                break;
            }

            let estimated = config.time_estimation.estimate_ms(depth);
            if shared.get_best().is_some() && estimated > remaining {
                info!(
                    "Stopping search: depth {} would exceed budget (estimated {}ms, remaining {}ms)",
                    depth, estimated, remaining
                );
                break;
            }

            shared.current_depth.store(depth, Ordering::Release);
            let decision = Self::decide(turn, config, depth, parallel);
            shared.publish(decision);

            if decision.direction.is_none() || depth >= config.search.max_depth {
                break;
            }
            depth = depth.saturating_add(step).min(config.search.max_depth);
        }

        shared.search_complete.store(true, Ordering::Release);
    }

    /// Runs one fixed-depth search and maps the best root position to a direction
    pub fn decide(turn: &Turn, config: &Config, depth: u8, parallel: bool) -> Decision {
        let outcome = search::search(&turn.grid, &turn.state, config, depth, parallel);
        let head = turn.state.me.head();
        Decision {
            direction: outcome.best.and_then(|dest| head.direction_to(&dest)),
            score: outcome.score,
            depth,
        }
    }

    /// Any in-bounds move, picked at random; "up" if even that is impossible
    fn fallback_move(board: &Board, you: &Battlesnake) -> Direction {
        let head = you.body.first().copied().unwrap_or(you.head);
        let in_bounds: Vec<Direction> = match payload::translate(board, you) {
            Ok(turn) => neighbors(turn.state.me.head(), &turn.grid, NeighborMode::InBounds)
                .iter()
                .filter_map(|dest| turn.state.me.head().direction_to(dest))
                .collect(),
            Err(_) => Direction::all()
                .iter()
                .copied()
                .filter(|dir| Self::in_bounds(&dir.apply(&head), board))
                .collect(),
        };

        in_bounds
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(Direction::Up)
    }

    fn in_bounds(coord: &Coord, board: &Board) -> bool {
        coord.x >= 0 && coord.x < board.width && coord.y >= 0 && coord.y < board.height
    }
}

// Fixed-depth alpha-beta search over simulated turns
//
// Simultaneous moves are serialized: even depths are my ply (maximizing), odd
// depths the enemy's (minimizing). The enemy ply sees the grid and legal moves
// as they were before my move of the same turn.

use log::debug;
use rayon::prelude::*;

use crate::config::Config;
use crate::grid::{neighbors, Grid, NeighborMode, Position};
use crate::heuristic::{collision_occurred, evaluate};
use crate::state::{apply_move, apply_move_with_food_layout, GameState, Player};
use crate::types::Direction;

/// Node counters for one search
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub evaluations: u64,
    pub cutoffs: u64,
    /// Deepest ply at which a node was visited
    pub max_depth_reached: u8,
}

impl SearchStats {
    fn merge(mut self, other: SearchStats) -> SearchStats {
        self.nodes += other.nodes;
        self.evaluations += other.evaluations;
        self.cutoffs += other.cutoffs;
        self.max_depth_reached = self.max_depth_reached.max(other.max_depth_reached);
        self
    }
}

/// Best root move with its minimax score
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub score: i64,
    /// `None` when I have no legal move at the root
    pub best: Option<Position>,
    pub stats: SearchStats,
}

/// Whose ply a node is. The enemy ply carries the pre-move snapshot.
#[derive(Clone, Copy)]
enum Ply<'a> {
    Mine,
    Enemy {
        snapshot: &'a Grid,
        moves: &'a [Position],
    },
}

/// Alpha-beta searcher bound to one configuration and depth limit
pub struct AlphaBeta<'c> {
    config: &'c Config,
    max_depth: u8,
    mode: NeighborMode,
    stats: SearchStats,
}

impl<'c> AlphaBeta<'c> {
    pub fn new(config: &'c Config, max_depth: u8) -> Self {
        AlphaBeta {
            config,
            max_depth,
            mode: NeighborMode::for_rules(config.game_rules.head_on_neck),
            stats: SearchStats::default(),
        }
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Searches from the root with an open window
    pub fn run(&mut self, grid: &Grid, state: &GameState) -> (i64, Option<Position>) {
        self.alphabeta(grid, state, 0, i64::MIN, i64::MAX, Ply::Mine)
    }

    fn alphabeta(
        &mut self,
        grid: &Grid,
        state: &GameState,
        depth: u8,
        mut alpha: i64,
        mut beta: i64,
        ply: Ply,
    ) -> (i64, Option<Position>) {
        self.stats.nodes += 1;
        self.stats.max_depth_reached = self.stats.max_depth_reached.max(depth);

        let my_moves = neighbors(state.me.head(), grid, self.mode);
        let enemy_moves = match ply {
            Ply::Mine => neighbors(state.enemy.head(), grid, self.mode),
            Ply::Enemy { moves, .. } => moves.to_vec(),
        };
        let moves = match ply {
            Ply::Mine => &my_moves,
            Ply::Enemy { .. } => &enemy_moves,
        };

        if depth >= self.max_depth
            || moves.is_empty()
            || state.me.is_starved()
            || state.enemy.is_starved()
            || (depth % 2 == 0 && collision_occurred(state, self.config))
        {
            self.stats.evaluations += 1;
            let score = evaluate(grid, state, &my_moves, &enemy_moves, self.config);
            return (score, None);
        }

        let rules = &self.config.game_rules;
        let mut best = None;

        match ply {
            Ply::Mine => {
                for mv in my_moves.iter() {
                    let child = apply_move(grid, state, *mv, Player::Me, rules);
                    let next = Ply::Enemy {
                        snapshot: grid,
                        moves: &enemy_moves,
                    };
                    let (value, _) =
                        self.alphabeta(&child.grid, &child.state, depth + 1, alpha, beta, next);
                    if value > alpha {
                        alpha = value;
                        best = Some(*mv);
                    }
                    if beta <= alpha {
                        self.stats.cutoffs += 1;
                        break;
                    }
                }
                (alpha, best)
            }
            Ply::Enemy { snapshot, .. } => {
                for mv in enemy_moves.iter() {
                    let child = apply_move_with_food_layout(
                        grid,
                        snapshot,
                        state,
                        *mv,
                        Player::Enemy,
                        rules,
                    );
                    let (value, _) = self.alphabeta(
                        &child.grid,
                        &child.state,
                        depth + 1,
                        alpha,
                        beta,
                        Ply::Mine,
                    );
                    if value < beta {
                        beta = value;
                        best = Some(*mv);
                    }
                    if beta <= alpha {
                        self.stats.cutoffs += 1;
                        break;
                    }
                }
                (beta, best)
            }
        }
    }
}

/// Runs a search to `max_depth` plies.
///
/// With `parallel` set each root move is searched on its own rayon worker with
/// a full window. Each root value is then exact, so taking the first strictly
/// greater score yields the same move and score as the sequential search.
pub fn search(
    grid: &Grid,
    state: &GameState,
    config: &Config,
    max_depth: u8,
    parallel: bool,
) -> SearchOutcome {
    let mode = NeighborMode::for_rules(config.game_rules.head_on_neck);
    let root_moves = neighbors(state.me.head(), grid, mode);

    let root_is_terminal = max_depth == 0
        || state.me.is_starved()
        || state.enemy.is_starved()
        || collision_occurred(state, config);

    let outcome = if !parallel || root_moves.len() < 2 || root_is_terminal {
        let mut searcher = AlphaBeta::new(config, max_depth);
        let (score, best) = searcher.run(grid, state);
        SearchOutcome {
            score,
            best,
            stats: searcher.stats(),
        }
    } else {
        let branches = score_root_moves(grid, state, config, max_depth);

        let mut score = i64::MIN;
        let mut best = None;
        let mut stats = SearchStats {
            nodes: 1,
            ..SearchStats::default()
        };
        for (mv, value, branch_stats) in branches {
            if value > score {
                score = value;
                best = Some(mv);
            }
            stats = stats.merge(branch_stats);
        }
        SearchOutcome { score, best, stats }
    };

    debug!(
        "Search depth {}: score {}, nodes {}, evaluations {}, cutoffs {}",
        max_depth,
        outcome.score,
        outcome.stats.nodes,
        outcome.stats.evaluations,
        outcome.stats.cutoffs
    );
    outcome
}

/// Exact minimax value of each of my root moves, in move generation order.
/// Root moves are searched concurrently on the rayon pool. The root itself
/// is assumed not to be terminal.
pub fn score_root_moves(
    grid: &Grid,
    state: &GameState,
    config: &Config,
    max_depth: u8,
) -> Vec<(Position, i64, SearchStats)> {
    let mode = NeighborMode::for_rules(config.game_rules.head_on_neck);
    let root_moves = neighbors(state.me.head(), grid, mode);
    let enemy_moves = neighbors(state.enemy.head(), grid, mode);

    root_moves
        .par_iter()
        .map(|mv| {
            let mut searcher = AlphaBeta::new(config, max_depth);
            let child = apply_move(grid, state, *mv, Player::Me, &config.game_rules);
            let next = Ply::Enemy {
                snapshot: grid,
                moves: &enemy_moves,
            };
            let (value, _) =
                searcher.alphabeta(&child.grid, &child.state, 1, i64::MIN, i64::MAX, next);
            (*mv, value, searcher.stats())
        })
        .collect()
}

/// Chooses my move for this turn, or `None` if I have no safe move
pub fn choose_move(grid: &Grid, state: &GameState, config: &Config) -> Option<Direction> {
    let parallel = config.search.parallel_root
        && rayon::current_num_threads() >= config.search.min_cpus_for_parallel;
    let outcome = search(grid, state, config, config.search.max_depth, parallel);
    outcome
        .best
        .and_then(|dest| state.me.head().direction_to(&dest))
}

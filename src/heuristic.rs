// Board evaluation from my point of view
//
// Decisive outcomes use the sentinels below. Every other score is clamped into
// [SCORE_FLOOR, SCORE_CEILING] so a heuristic total can never be mistaken for
// a win, a loss or a draw.

use log::trace;

use crate::config::Config;
use crate::flood_fill::{flood_fill, reach_budget};
use crate::grid::{neighbors, Grid, NeighborMode, Position, Tile};
use crate::state::{GameState, SnakeState};

pub const WIN: i64 = i32::MAX as i64;
pub const LOSS: i64 = i32::MIN as i64;
/// One unit better than a loss, worse than anything else
pub const DRAW: i64 = LOSS + 1;

pub const SCORE_CEILING: i64 = WIN - 1;
pub const SCORE_FLOOR: i64 = DRAW + 1;

/// Outcome of the collision geometry checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Collision {
    /// I survive the collision; the enemy dies
    Won,
    Lost,
    Draw,
}

fn by_length(me: &SnakeState, enemy: &SnakeState) -> Collision {
    if me.len() > enemy.len() {
        Collision::Won
    } else if me.len() < enemy.len() {
        Collision::Lost
    } else {
        Collision::Draw
    }
}

/// Both heads moved onto the square the other head just left
fn head_on_neck(state: &GameState) -> Option<Collision> {
    match (state.me.neck(), state.enemy.neck()) {
        (Some(my_neck), Some(enemy_neck))
            if state.me.head() == enemy_neck && state.enemy.head() == my_neck =>
        {
            Some(by_length(&state.me, &state.enemy))
        }
        _ => None,
    }
}

fn head_on_head(state: &GameState) -> Option<Collision> {
    if state.me.head() == state.enemy.head() {
        Some(by_length(&state.me, &state.enemy))
    } else {
        None
    }
}

/// True when `pos` lies on one of `snake`'s segments behind the head.
/// Segments stacked under the head (turn 0, or a single segment that just
/// ate) are part of the head square and never count.
fn on_body(pos: Position, snake: &SnakeState) -> bool {
    let head = snake.head();
    snake
        .body()
        .iter()
        .skip(1)
        .skip_while(|segment| **segment == head)
        .any(|segment| *segment == pos)
}

fn hits_body(head: Position, own: &SnakeState, other: &SnakeState) -> bool {
    on_body(head, own) || on_body(head, other)
}

/// Heads landing on any non-head segment, for when move generation allows
/// stepping onto enemy heads
fn body_collision(state: &GameState) -> Option<Collision> {
    let mine = hits_body(state.me.head(), &state.me, &state.enemy);
    let theirs = hits_body(state.enemy.head(), &state.enemy, &state.me);
    match (mine, theirs) {
        (true, true) => Some(Collision::Draw),
        (true, false) => Some(Collision::Lost),
        (false, true) => Some(Collision::Won),
        (false, false) => None,
    }
}

/// True if any collision geometry enabled by the rules has occurred
pub fn collision_occurred(state: &GameState, config: &Config) -> bool {
    if head_on_head(state).is_some() {
        return true;
    }
    config.game_rules.head_on_neck
        && (head_on_neck(state).is_some() || body_collision(state).is_some())
}

/// Reachable tile count from `snake`'s head on a scratch grid with the head cleared
fn accessible_area(grid: &Grid, snake: &SnakeState, food_count: usize) -> usize {
    let mut scratch = grid.clone();
    scratch.set(snake.head(), Tile::Empty);
    flood_fill(
        snake.head(),
        &mut scratch,
        reach_budget(snake.len(), food_count),
    )
}

fn clamp(score: i64) -> i64 {
    score.clamp(SCORE_FLOOR, SCORE_CEILING)
}

/// Scores `grid`/`state` for me.
///
/// `my_moves` and `enemy_moves` are the legal moves available to each snake
/// from this position.
pub fn evaluate(
    grid: &Grid,
    state: &GameState,
    my_moves: &[Position],
    enemy_moves: &[Position],
    config: &Config,
) -> i64 {
    let weights = &config.heuristic;
    let head_on_neck_rule = config.game_rules.head_on_neck;
    let me = &state.me;
    let enemy = &state.enemy;
    let mut score: i64 = 0;

    if head_on_neck_rule {
        match head_on_neck(state) {
            Some(Collision::Won) => return WIN,
            Some(Collision::Lost) => return LOSS,
            Some(Collision::Draw) => return DRAW,
            None => {}
        }
    }

    match head_on_head(state) {
        Some(Collision::Won) if head_on_neck_rule => return WIN,
        Some(Collision::Won) => score += weights.decisive_bonus,
        Some(Collision::Lost) => return LOSS,
        Some(Collision::Draw) => return DRAW,
        None => {}
    }

    if head_on_neck_rule {
        match body_collision(state) {
            Some(Collision::Draw) => return DRAW,
            Some(Collision::Lost) => return LOSS,
            Some(Collision::Won) => score += weights.decisive_bonus,
            None => {}
        }
    }

    if my_moves.is_empty() || me.is_starved() {
        return LOSS;
    }

    let food = grid.food();
    let total_tiles = grid.tile_count() as f64;

    let my_area = accessible_area(grid, me, food.len());
    let percent_accessible = my_area.max(1) as f64 / total_tiles;
    if my_area <= me.len() {
        trace!("Trapped: {} reachable tiles for length {}", my_area, me.len());
        return clamp(-((weights.trapped_penalty as f64 / percent_accessible) as i64));
    }

    if enemy_moves.is_empty() || enemy.is_starved() {
        score += weights.decisive_bonus;
    }

    let enemy_area = accessible_area(grid, enemy, food.len());
    if enemy_area <= enemy.len() {
        score += weights.enemy_trapped_bonus;
    }

    let food_scarce = food.len() <= weights.low_food_threshold;
    let health = me.health as i64;

    let food_weight = if food_scarce {
        weights.scarce_food_base - weights.scarce_food_health_multiplier * health
    } else if me.health <= weights.hunger_threshold || me.len() < weights.growth_length {
        weights.hungry_food_base - health
    } else {
        0
    };
    if food_weight > 0 {
        for (i, item) in food.iter().enumerate() {
            // The index breaks ties between equidistant food in scan order
            score -= me.head().manhattan(item) * food_weight + i as i64;
        }
    }

    // Pull toward where the enemy head is likely to be next turn; it tends to keep going straight
    let enemy_heading = enemy
        .neck()
        .and_then(|neck| neck.direction_to(&enemy.head()));
    let base_aggression = if food_scarce {
        health
    } else {
        weights.aggression_weight
    };
    let mode = NeighborMode::for_rules(head_on_neck_rule);
    for candidate in neighbors(enemy.head(), grid, mode) {
        let mut weight = base_aggression;
        if enemy_heading.is_some() && enemy.head().direction_to(&candidate) == enemy_heading {
            weight *= weights.straight_line_multiplier;
        }
        score -= me.head().manhattan(&candidate) * weight;
    }

    if grid.on_edge(me.head()) {
        score -= weights.edge_penalty;
    }

    let scaled = if score < 0 {
        (score as f64 * (1.0 / percent_accessible)) as i64
    } else if score > 0 {
        (score as f64 * percent_accessible) as i64
    } else {
        0
    };

    clamp(scaled)
}

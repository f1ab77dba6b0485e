// Snake state and the single-move state transition used by the search

use crate::config::GameRulesConfig;
use crate::grid::{Grid, Position, Tile};

/// One snake: head-first body segments plus health
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnakeState {
    body: Vec<Position>,
    pub health: i32,
}

impl SnakeState {
    pub fn new(body: Vec<Position>, health: i32) -> Result<Self, String> {
        if body.is_empty() {
            return Err("Snake body must contain at least one segment".to_string());
        }
        Ok(SnakeState { body, health })
    }

    pub fn body(&self) -> &[Position] {
        &self.body
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// The segment right behind the head, if any
    pub fn neck(&self) -> Option<Position> {
        self.body.get(1).copied()
    }

    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// True when the tail sits on the segment before it and will not move next turn
    pub fn tail_is_stacked(&self) -> bool {
        let n = self.body.len();
        n > 1 && self.body[n - 1] == self.body[n - 2]
    }

    pub fn is_starved(&self) -> bool {
        self.health <= 0
    }
}

/// The acting player and their single opponent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub me: SnakeState,
    pub enemy: SnakeState,
}

impl GameState {
    pub fn new(me: SnakeState, enemy: SnakeState) -> Self {
        GameState { me, enemy }
    }

    pub fn snake(&self, player: Player) -> &SnakeState {
        match player {
            Player::Me => &self.me,
            Player::Enemy => &self.enemy,
        }
    }

    fn snake_mut(&mut self, player: Player) -> &mut SnakeState {
        match player {
            Player::Me => &mut self.me,
            Player::Enemy => &mut self.enemy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Player {
    Me,
    Enemy,
}

impl Player {
    pub fn opponent(&self) -> Player {
        match self {
            Player::Me => Player::Enemy,
            Player::Enemy => Player::Me,
        }
    }
}

/// Result of applying one move to private copies of grid and state
#[derive(Debug, Clone)]
pub struct Transition {
    pub grid: Grid,
    pub state: GameState,
    pub ate_food: bool,
}

/// Moves `player`'s head onto `dest`, deciding whether it eats from `grid` itself
pub fn apply_move(
    grid: &Grid,
    state: &GameState,
    dest: Position,
    player: Player,
    rules: &GameRulesConfig,
) -> Transition {
    apply_move_with_food_layout(grid, grid, state, dest, player, rules)
}

/// Moves `player`'s head onto `dest`, deciding whether it eats from `food_layout`.
///
/// The enemy ply passes the grid as it was before my move of the same turn, so
/// a food both heads reach is eaten by both.
pub fn apply_move_with_food_layout(
    grid: &Grid,
    food_layout: &Grid,
    state: &GameState,
    dest: Position,
    player: Player,
    rules: &GameRulesConfig,
) -> Transition {
    let mut new_grid = grid.clone();
    let mut new_state = state.clone();
    let other_head = state.snake(player.opponent()).head();
    let snake = new_state.snake_mut(player);

    let ate_food = food_layout.get(dest) == Some(Tile::Food);
    if ate_food {
        snake.health = rules.health_on_food;
    } else {
        snake.health = snake.health.saturating_sub(rules.health_loss_per_turn);
    }

    let old_head = snake.head();
    let old_len = snake.len();

    // A stacked tail stays on the board; a moving one frees its tile unless
    // another head has already claimed it this turn
    let old_tail = snake.tail();
    if old_len == 1 {
        if new_grid.get(old_head) == Some(Tile::SnakeHead) && other_head != old_head {
            new_grid.set(old_head, Tile::Empty);
        }
    } else if !snake.tail_is_stacked() {
        if let Some(Tile::SnakeTail { .. }) = new_grid.get(old_tail) {
            new_grid.set(old_tail, Tile::Empty);
        }
    }
    snake.body.pop();

    if old_len > 1 {
        new_grid.set(old_head, Tile::SnakeBody);
    }
    snake.body.insert(0, dest);

    if ate_food {
        let grown = snake.tail();
        snake.body.push(grown);
    }

    if snake.body.len() > 1 {
        let tail = snake.tail();
        if tail != snake.head() {
            new_grid.set(
                tail,
                Tile::SnakeTail {
                    vacating: !snake.tail_is_stacked(),
                },
            );
        }
    }
    new_grid.set(dest, Tile::SnakeHead);

    Transition {
        grid: new_grid,
        state: new_state,
        ate_food,
    }
}

// Translation from the wire board into the engine's grid and state
//
// Wire coordinates are 0-based with y growing upward; engine positions are
// 1-based with y growing downward.

use crate::grid::{Grid, Position};
use crate::state::{GameState, SnakeState};
use crate::types::{Battlesnake, Board, Coord};

/// Engine view of one turn
#[derive(Debug, Clone)]
pub struct Turn {
    pub grid: Grid,
    pub state: GameState,
}

pub fn to_position(coord: &Coord, board_height: i32) -> Position {
    Position::new(coord.x + 1, board_height - coord.y)
}

fn snake_state(snake: &Battlesnake, board_height: i32) -> Result<SnakeState, String> {
    let body = snake
        .body
        .iter()
        .map(|c| to_position(c, board_height))
        .collect();
    SnakeState::new(body, snake.health)
        .map_err(|e| format!("Snake '{}' is malformed: {}", snake.id, e))
}

/// Builds the grid and two-snake state for `you` against its single live opponent
pub fn translate(board: &Board, you: &Battlesnake) -> Result<Turn, String> {
    let opponents: Vec<&Battlesnake> = board
        .snakes
        .iter()
        .filter(|s| s.id != you.id && s.health > 0)
        .collect();

    let enemy = match opponents.as_slice() {
        [enemy] => *enemy,
        [] => return Err("No live opponent on the board".to_string()),
        more => {
            return Err(format!(
                "Expected one opponent, found {} live snakes besides ours",
                more.len()
            ))
        }
    };

    let me = snake_state(you, board.height)?;
    let enemy = snake_state(enemy, board.height)?;

    let food: Vec<Position> = board
        .food
        .iter()
        .map(|c| to_position(c, board.height))
        .collect();
    let grid = Grid::build(
        board.width,
        board.height,
        &food,
        &[me.body(), enemy.body()],
    )?;

    Ok(Turn {
        grid,
        state: GameState::new(me, enemy),
    })
}

//! State transition tests
//!
//! Each test applies one simulated move and checks body, health and the tiles
//! the move touched.

use robosnake::config::{Config, GameRulesConfig};
use robosnake::grid::{neighbors, Grid, NeighborMode, Position, Tile};
use robosnake::state::{apply_move, apply_move_with_food_layout, GameState, Player, SnakeState};

fn p(x: i32, y: i32) -> Position {
    Position::new(x, y)
}

fn rules() -> GameRulesConfig {
    Config::default_hardcoded().game_rules
}

/// Builds a grid and state for two snakes on a `width`x`height` board
fn setup(
    width: i32,
    height: i32,
    food: &[Position],
    me: (&[Position], i32),
    enemy: (&[Position], i32),
) -> (Grid, GameState) {
    let me = SnakeState::new(me.0.to_vec(), me.1).unwrap();
    let enemy = SnakeState::new(enemy.0.to_vec(), enemy.1).unwrap();
    let grid = Grid::build(width, height, food, &[me.body(), enemy.body()]).unwrap();
    (grid, GameState::new(me, enemy))
}

#[test]
fn test_inputs_are_not_modified() {
    let (grid, state) = setup(
        5,
        5,
        &[p(3, 2)],
        (&[p(3, 3), p(3, 4), p(3, 5)], 50),
        (&[p(1, 1), p(2, 1)], 50),
    );
    let grid_before = grid.clone();
    let state_before = state.clone();

    let _ = apply_move(&grid, &state, p(3, 2), Player::Me, &rules());
    let _ = apply_move(&grid, &state, p(1, 2), Player::Enemy, &rules());

    assert_eq!(grid, grid_before);
    assert_eq!(state, state_before);
}

#[test]
fn test_plain_move_shifts_the_body() {
    let (grid, state) = setup(
        5,
        5,
        &[],
        (&[p(3, 3), p(3, 4), p(3, 5)], 50),
        (&[p(1, 1), p(2, 1)], 50),
    );

    let next = apply_move(&grid, &state, p(3, 2), Player::Me, &rules());

    assert!(!next.ate_food);
    assert_eq!(next.state.me.body(), &[p(3, 2), p(3, 3), p(3, 4)]);
    assert_eq!(next.state.me.health, 49);
    assert_eq!(next.state.enemy, state.enemy);
    assert_eq!(next.grid.get(p(3, 2)), Some(Tile::SnakeHead));
    assert_eq!(next.grid.get(p(3, 3)), Some(Tile::SnakeBody));
    assert_eq!(next.grid.get(p(3, 4)), Some(Tile::SnakeTail { vacating: true }));
    assert_eq!(next.grid.get(p(3, 5)), Some(Tile::Empty));
}

#[test]
fn test_eating_grows_and_restores_health() {
    let (grid, state) = setup(
        5,
        5,
        &[p(3, 2)],
        (&[p(3, 3), p(3, 4), p(3, 5)], 50),
        (&[p(1, 1), p(2, 1)], 50),
    );

    let next = apply_move(&grid, &state, p(3, 2), Player::Me, &rules());

    assert!(next.ate_food);
    assert_eq!(next.state.me.len(), 4);
    assert_eq!(next.state.me.health, 100);
    assert!(next.state.me.tail_is_stacked());
    assert_eq!(next.grid.get(p(3, 4)), Some(Tile::SnakeTail { vacating: false }));
    assert_eq!(next.grid.get(p(3, 5)), Some(Tile::Empty));
    assert!(next.grid.food().is_empty());
}

#[test]
fn test_stacked_tail_stays_for_one_move() {
    let (grid, state) = setup(
        5,
        5,
        &[],
        (&[p(3, 3), p(3, 4), p(3, 4)], 100),
        (&[p(1, 1), p(2, 1)], 50),
    );

    let next = apply_move(&grid, &state, p(3, 2), Player::Me, &rules());

    assert_eq!(next.state.me.body(), &[p(3, 2), p(3, 3), p(3, 4)]);
    assert_eq!(next.grid.get(p(3, 4)), Some(Tile::SnakeTail { vacating: true }));
}

#[test]
fn test_single_segment_snake_leaves_its_tile() {
    let (grid, state) = setup(5, 5, &[], (&[p(3, 3)], 10), (&[p(1, 1), p(2, 1)], 50));

    let next = apply_move(&grid, &state, p(3, 2), Player::Me, &rules());

    assert_eq!(next.state.me.body(), &[p(3, 2)]);
    assert_eq!(next.state.me.health, 9);
    assert_eq!(next.grid.get(p(3, 3)), Some(Tile::Empty));
    assert_eq!(next.grid.get(p(3, 2)), Some(Tile::SnakeHead));
}

#[test]
fn test_single_segment_snake_eats() {
    let (grid, state) = setup(5, 5, &[p(3, 2)], (&[p(3, 3)], 10), (&[p(1, 1), p(2, 1)], 50));

    let next = apply_move(&grid, &state, p(3, 2), Player::Me, &rules());

    assert!(next.ate_food);
    assert_eq!(next.state.me.body(), &[p(3, 2), p(3, 2)]);
    assert_eq!(next.grid.get(p(3, 2)), Some(Tile::SnakeHead));
    assert_eq!(next.grid.get(p(3, 3)), Some(Tile::Empty));
}

#[test]
fn test_enemy_eats_food_i_already_took() {
    let (grid, state) = setup(
        5,
        5,
        &[p(3, 2)],
        (&[p(3, 3), p(3, 4)], 50),
        (&[p(3, 1), p(2, 1)], 50),
    );

    let after_me = apply_move(&grid, &state, p(3, 2), Player::Me, &rules());
    assert!(after_me.ate_food);

    // Against the pre-move layout, the contested food is still there
    let after_enemy = apply_move_with_food_layout(
        &after_me.grid,
        &grid,
        &after_me.state,
        p(3, 2),
        Player::Enemy,
        &rules(),
    );
    assert!(after_enemy.ate_food);
    assert_eq!(after_enemy.state.enemy.len(), 3);
    assert_eq!(after_enemy.state.enemy.health, 100);
    assert_eq!(after_enemy.state.me.len(), 3);
    assert_eq!(after_enemy.grid.get(p(2, 1)), Some(Tile::Empty));

    // Against the grid after my move, it is not
    let without_snapshot = apply_move(&after_me.grid, &after_me.state, p(3, 2), Player::Enemy, &rules());
    assert!(!without_snapshot.ate_food);
    assert_eq!(without_snapshot.state.enemy.len(), 2);
}

#[test]
fn test_chasing_own_tail() {
    let (grid, state) = setup(
        3,
        3,
        &[],
        (&[p(1, 1), p(2, 1), p(2, 2), p(1, 2)], 80),
        (&[p(3, 3), p(3, 2)], 80),
    );

    let moves = neighbors(state.me.head(), &grid, NeighborMode::Safe);
    assert_eq!(moves, vec![p(1, 2)], "only the moving tail is free");

    let next = apply_move(&grid, &state, p(1, 2), Player::Me, &rules());
    assert_eq!(next.state.me.body(), &[p(1, 2), p(1, 1), p(2, 1), p(2, 2)]);
    assert_eq!(next.grid.get(p(1, 2)), Some(Tile::SnakeHead));
    assert_eq!(next.grid.get(p(1, 1)), Some(Tile::SnakeBody));
    assert_eq!(next.grid.get(p(2, 2)), Some(Tile::SnakeTail { vacating: true }));
}

#[test]
fn test_health_loss_follows_rules() {
    let (grid, state) = setup(5, 5, &[], (&[p(3, 3), p(3, 4)], 1), (&[p(1, 1), p(2, 1)], 50));

    let mut harsh = rules();
    harsh.health_loss_per_turn = 15;
    let next = apply_move(&grid, &state, p(3, 2), Player::Me, &harsh);
    assert_eq!(next.state.me.health, -14);
    assert!(next.state.me.is_starved());
}

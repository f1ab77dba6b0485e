//! Bot tests
//!
//! Full /move decisions on wire boards, including the fallbacks used when the
//! search has nothing to offer.

use robosnake::bot::{Bot, SharedSearchState};
use robosnake::config::Config;
use robosnake::payload;
use robosnake::types::{Battlesnake, Board, Coord, Direction, Game};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn snake(id: &str, health: i32, body: &[(i32, i32)]) -> Battlesnake {
    let body: Vec<Coord> = body.iter().map(|&(x, y)| Coord { x, y }).collect();
    Battlesnake {
        id: id.to_string(),
        name: id.to_string(),
        health,
        head: body[0],
        length: body.len() as i32,
        body,
        latency: "0".to_string(),
        shout: None,
    }
}

fn board(snakes: Vec<Battlesnake>, food: &[(i32, i32)]) -> Board {
    Board {
        height: 11,
        width: 11,
        food: food.iter().map(|&(x, y)| Coord { x, y }).collect(),
        snakes,
        hazards: vec![],
    }
}

fn game() -> Game {
    Game {
        id: "test-game".to_string(),
        ruleset: HashMap::new(),
        timeout: 500,
        source: String::new(),
    }
}

fn chosen(response: &Value) -> Direction {
    let mv = response["move"].as_str().expect("response carries a move");
    Direction::parse(mv).expect("move is a valid direction")
}

#[test]
fn test_info_reports_api_version() {
    let bot = Bot::new(Config::default_hardcoded());
    let info = bot.info();
    assert_eq!(info["apiversion"], "1");
    assert!(info["color"].as_str().unwrap().starts_with('#'));
}

#[tokio::test]
async fn test_only_safe_move_along_top_wall() {
    // Up is the wall, down is my neck, right is the enemy head; my tail moves away
    let me = snake("me", 90, &[(5, 10), (5, 9), (4, 9), (4, 10)]);
    let enemy = snake("enemy", 90, &[(6, 10), (6, 9), (6, 8)]);
    let board = board(vec![me.clone(), enemy], &[(0, 0)]);

    let bot = Bot::new(Config::default_hardcoded());
    let response = bot.get_move(&game(), &12, &board, &me).await;
    assert_eq!(chosen(&response), Direction::Left);
}

#[tokio::test]
async fn test_trapped_snake_still_moves_in_bounds() {
    // Neck below, stacked tail to the right, walls elsewhere
    let me = snake("me", 90, &[(0, 10), (0, 9), (1, 9), (1, 10), (1, 10)]);
    let enemy = snake("enemy", 90, &[(8, 2), (8, 1), (8, 0)]);
    let board = board(vec![me.clone(), enemy], &[]);

    let bot = Bot::new(Config::default_hardcoded());
    let response = bot.get_move(&game(), &30, &board, &me).await;
    let direction = chosen(&response);
    assert!(
        direction == Direction::Down || direction == Direction::Right,
        "got {:?}",
        direction
    );
}

#[tokio::test]
async fn test_solo_board_falls_back_to_an_in_bounds_move() {
    let me = snake("me", 90, &[(0, 0), (0, 1), (0, 2)]);
    let board = board(vec![me.clone()], &[(5, 5)]);

    let bot = Bot::new(Config::default_hardcoded());
    let response = bot.get_move(&game(), &3, &board, &me).await;
    let direction = chosen(&response);
    assert!(
        direction == Direction::Up || direction == Direction::Right,
        "got {:?}",
        direction
    );
}

#[test]
fn test_iterative_deepening_publishes_a_decision() {
    let me = snake("me", 60, &[(3, 3), (3, 2), (3, 1)]);
    let enemy = snake("enemy", 60, &[(7, 7), (7, 8), (7, 9)]);
    let board = board(vec![me.clone(), enemy], &[(5, 5)]);
    let turn = payload::translate(&board, &me).unwrap();
    let config = Config::default_hardcoded();

    let shared = Arc::new(SharedSearchState::new());
    Bot::compute_best_move_internal(&turn, shared.clone(), Instant::now(), &config);

    assert!(shared.is_complete());
    let decision = shared.get_best().expect("at least one depth finishes");
    assert!(decision.direction.is_some());
    assert!(decision.depth >= config.search.initial_depth);
    assert_eq!(decision.depth % 2, 0);
    assert_eq!(shared.current_depth(), decision.depth);
}

#[test]
fn test_decide_maps_best_position_to_direction() {
    let me = snake("me", 90, &[(5, 10), (5, 9), (4, 9), (4, 10)]);
    let enemy = snake("enemy", 90, &[(6, 10), (6, 9), (6, 8)]);
    let board = board(vec![me.clone(), enemy], &[]);
    let turn = payload::translate(&board, &me).unwrap();

    let decision = Bot::decide(&turn, &Config::default_hardcoded(), 2, false);
    assert_eq!(decision.direction, Some(Direction::Left));
    assert_eq!(decision.depth, 2);
}

#[test]
fn test_cancelled_search_publishes_nothing() {
    let me = snake("me", 60, &[(3, 3), (3, 2), (3, 1)]);
    let enemy = snake("enemy", 60, &[(7, 7), (7, 8), (7, 9)]);
    let board = board(vec![me.clone(), enemy], &[(5, 5)]);
    let turn = payload::translate(&board, &me).unwrap();

    let shared = Arc::new(SharedSearchState::new());
    assert!(!shared.is_cancelled());
    shared.cancel();
    Bot::compute_best_move_internal(
        &turn,
        shared.clone(),
        Instant::now(),
        &Config::default_hardcoded(),
    );

    assert!(shared.is_cancelled());
    assert!(shared.is_complete());
    assert!(shared.get_best().is_none());
}

#[tokio::test]
async fn test_long_polling_interval_does_not_delay_the_answer() {
    let me = snake("me", 90, &[(5, 10), (5, 9), (4, 9), (4, 10)]);
    let enemy = snake("enemy", 90, &[(6, 10), (6, 9), (6, 8)]);
    let board = board(vec![me.clone(), enemy], &[(0, 0)]);

    let mut config = Config::default_hardcoded();
    config.timing.polling_interval_ms = 10_000;
    let bot = Bot::new(config);

    let started = Instant::now();
    let response = bot.get_move(&game(), &12, &board, &me).await;
    assert_eq!(chosen(&response), Direction::Left);
    assert!(
        started.elapsed() < Duration::from_secs(2),
        "took {:?}",
        started.elapsed()
    );
}

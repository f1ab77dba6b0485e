// Tests for the replay module
//
// Loads the logged fixture game, re-runs the search on its boards and checks
// the validation and rendering helpers.

use robosnake::config::Config;
use robosnake::replay::{render_board, ReplayEngine};
use robosnake::types::Direction;
use std::path::PathBuf;

/// Helper function to get the path to test fixtures
fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(filename)
}

fn engine() -> ReplayEngine {
    ReplayEngine::new(Config::default_hardcoded(), false)
}

#[test]
fn test_load_log_file() {
    let entries = engine()
        .load_log_file(fixture_path("two_snake_game.jsonl"))
        .expect("Failed to load two_snake_game.jsonl");

    assert_eq!(entries.len(), 2, "Expected 2 log entries");
    assert_eq!(entries[0].turn, 12);
    assert_eq!(entries[0].chosen_move, "left");
    assert_eq!(entries[0].depth, 6);
    assert_eq!(entries[1].turn, 13);
    assert_eq!(entries[1].our_snake().unwrap().health, 89);
}

#[test]
fn test_load_missing_file_fails() {
    assert!(engine()
        .load_log_file(fixture_path("does_not_exist.jsonl"))
        .is_err());
}

#[test]
fn test_replay_forced_move_matches_log() {
    let engine = engine();
    let entries = engine
        .load_log_file(fixture_path("two_snake_game.jsonl"))
        .unwrap();

    let result = engine.replay_entry(&entries[0]).expect("turn 12 replays");
    assert_eq!(result.turn, 12);
    assert_eq!(result.original_move, Direction::Left);
    assert_eq!(result.replayed_move, Some(Direction::Left));
    assert!(result.matches);
    assert_eq!(result.search_depth, 6);
}

#[test]
fn test_replay_all_and_stats() {
    let engine = engine();
    let entries = engine
        .load_log_file(fixture_path("two_snake_game.jsonl"))
        .unwrap();

    let results = engine.replay_all(&entries);
    assert_eq!(results.len(), 2);

    let stats = engine.generate_stats(&results);
    assert_eq!(stats.total_turns, 2);
    assert_eq!(stats.matches + stats.mismatches, 2);
    assert!(stats.matches >= 1, "the forced move always matches");
    assert!(stats.match_rate >= 50.0);
}

#[test]
fn test_replay_unknown_turn_is_an_error() {
    let engine = engine();
    let entries = engine
        .load_log_file(fixture_path("two_snake_game.jsonl"))
        .unwrap();

    let results = engine.replay_turns(&entries, &[12]).unwrap();
    assert_eq!(results.len(), 1);
    assert!(engine.replay_turns(&entries, &[99]).is_err());
}

#[test]
fn test_validate_expected_moves() {
    let engine = engine();
    let entries = engine
        .load_log_file(fixture_path("two_snake_game.jsonl"))
        .unwrap();

    let expected = vec![
        (12, vec![Direction::Left]),
        (13, vec![Direction::Left, Direction::Down]),
    ];
    assert!(engine.validate_expected_moves(&entries, &expected).is_ok());

    let wrong = vec![(12, vec![Direction::Up, Direction::Right])];
    let err = engine
        .validate_expected_moves(&entries, &wrong)
        .unwrap_err();
    assert!(err.contains("Turn 12"), "unexpected message: {}", err);

    let missing = vec![(40, vec![Direction::Up])];
    assert!(engine.validate_expected_moves(&entries, &missing).is_err());
}

#[test]
fn test_render_logged_board() {
    let entries = engine()
        .load_log_file(fixture_path("two_snake_game.jsonl"))
        .unwrap();

    let rendered = render_board(&entries[0].board, &entries[0].you_id);
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), 11 + 2);

    // Top row: my tail at x=4, my head at x=5, enemy head at x=6
    let top: Vec<&str> = lines[0].split(' ').collect();
    assert_eq!(top.len(), 11);
    assert_eq!(top[4], "\u{25D8}");
    assert_eq!(top[5], "@");
    assert_eq!(top[6], "\u{2731}");

    // Food sits in the bottom-left corner
    assert!(lines[10].starts_with('\u{2022}'));
    assert_eq!(lines[11], "Snake: me\tHealth: 90");
    assert_eq!(lines[12], "Snake: enemy\tHealth: 90");
}

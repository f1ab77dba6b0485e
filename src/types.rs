// Battlesnake API Types
// See https://docs.battlesnake.com/api

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Game metadata including ID, ruleset, and timeout
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Game {
    pub id: String,
    #[serde(default)]
    pub ruleset: HashMap<String, Value>,
    #[serde(default)]
    pub timeout: u32,
    #[serde(default)]
    pub source: String,
}

/// Board state including dimensions, food, snakes, and hazards
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Board {
    pub height: i32,
    pub width: i32,
    pub food: Vec<Coord>,
    pub snakes: Vec<Battlesnake>,
    #[serde(default)]
    pub hazards: Vec<Coord>,
}

/// Snake representation with all state information
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Battlesnake {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub health: i32,
    pub body: Vec<Coord>,
    pub head: Coord,
    pub length: i32,
    #[serde(default)]
    pub latency: String,
    #[serde(default)]
    pub shout: Option<String>,
}

/// 2D coordinate on the board, 0-based with y growing upward
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

/// Represents the four possible movement directions for a Battlesnake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns all possible directions
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }

    /// Converts direction to string representation for API response
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Parses the API string form, case-insensitively
    pub fn parse(s: &str) -> Result<Direction, String> {
        match s.to_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(format!("Invalid direction: {}", s)),
        }
    }

    /// Calculates the next wire coordinate when moving in this direction
    pub fn apply(&self, coord: &Coord) -> Coord {
        match self {
            Direction::Up => Coord { x: coord.x, y: coord.y + 1 },
            Direction::Down => Coord { x: coord.x, y: coord.y - 1 },
            Direction::Left => Coord { x: coord.x - 1, y: coord.y },
            Direction::Right => Coord { x: coord.x + 1, y: coord.y },
        }
    }
}

/// Request body received on /start, /move and /end
#[derive(Deserialize, Serialize, Debug)]
pub struct MoveRequest {
    pub game: Game,
    pub turn: i32,
    pub board: Board,
    pub you: Battlesnake,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_direction() {
        assert_eq!(Direction::parse("up").unwrap(), Direction::Up);
        assert_eq!(Direction::parse("Down").unwrap(), Direction::Down);
        assert_eq!(Direction::parse("LEFT").unwrap(), Direction::Left);
        assert_eq!(Direction::parse("right").unwrap(), Direction::Right);
        assert!(Direction::parse("sideways").is_err());
    }

    #[test]
    fn test_move_request_deserializes_minimal_payload() {
        let raw = r#"{
            "game": {"id": "g1", "ruleset": {"name": "standard"}, "timeout": 500},
            "turn": 3,
            "board": {
                "height": 7, "width": 7,
                "food": [{"x": 3, "y": 6}],
                "snakes": [{
                    "id": "me", "name": "robo", "health": 97,
                    "body": [{"x": 3, "y": 3}], "head": {"x": 3, "y": 3},
                    "length": 1
                }],
                "hazards": []
            },
            "you": {
                "id": "me", "name": "robo", "health": 97,
                "body": [{"x": 3, "y": 3}], "head": {"x": 3, "y": 3},
                "length": 1
            }
        }"#;

        let request: MoveRequest = serde_json::from_str(raw).expect("payload should parse");
        assert_eq!(request.turn, 3);
        assert_eq!(request.board.food, vec![Coord { x: 3, y: 6 }]);
        assert_eq!(request.you.shout, None);
        assert!(request.game.source.is_empty());
    }
}

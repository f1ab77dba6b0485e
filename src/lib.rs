// Library exports for robosnake
// The server binary, the replay tool and the integration tests all go through these modules

pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod flood_fill;
pub mod grid;
pub mod heuristic;
pub mod payload;
pub mod replay;
pub mod search;
pub mod state;
pub mod types;

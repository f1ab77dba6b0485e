// Configuration module for reading Snake.toml
// Every tunable constant of the engine lives here and is passed explicitly into the search

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub timing: TimingConfig,
    pub time_estimation: TimeEstimationConfig,
    pub search: SearchConfig,
    pub game_rules: GameRulesConfig,
    pub heuristic: HeuristicConfig,
    pub debug: DebugConfig,
}

/// Timing and response budget constants
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    pub response_time_budget_ms: u64,
    pub network_overhead_ms: u64,
    pub polling_interval_ms: u64,
    pub min_time_remaining_ms: u64,
}

impl TimingConfig {
    /// Computes the effective computation budget
    pub fn effective_budget_ms(&self) -> u64 {
        self.response_time_budget_ms.saturating_sub(self.network_overhead_ms)
    }
}

/// Cost model used to skip deepening iterations that would overrun the budget
#[derive(Debug, Deserialize, Clone)]
pub struct TimeEstimationConfig {
    pub base_iteration_time_ms: f64,
    pub branching_factor: f64,
}

impl TimeEstimationConfig {
    /// Estimated wall time of a search to `depth` plies: base * branching_factor^depth
    pub fn estimate_ms(&self, depth: u8) -> u64 {
        let estimate = self.base_iteration_time_ms * self.branching_factor.powi(depth as i32);
        estimate.ceil() as u64
    }
}

/// Alpha-beta search constants
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// Plies searched by the final deepening iteration (two plies per game turn)
    pub max_depth: u8,
    pub initial_depth: u8,
    pub depth_step: u8,
    pub parallel_root: bool,
    pub min_cpus_for_parallel: usize,
}

/// Game rules constants
#[derive(Debug, Deserialize, Clone)]
pub struct GameRulesConfig {
    pub health_on_food: i32,
    pub health_loss_per_turn: i32,
    /// Enables head-on-neck (position swap) and body collision detection,
    /// and lets move generation step onto the enemy head
    pub head_on_neck: bool,
}

/// Heuristic evaluator weights
#[derive(Debug, Deserialize, Clone)]
pub struct HeuristicConfig {
    pub hunger_threshold: i32,
    pub low_food_threshold: usize,

    // Food pull while food is scarce: base - multiplier * health
    pub scarce_food_base: i64,
    pub scarce_food_health_multiplier: i64,

    // Food pull while hungry or short: base - health
    pub hungry_food_base: i64,
    pub growth_length: usize,

    pub trapped_penalty: i64,
    pub enemy_trapped_bonus: i64,
    pub decisive_bonus: i64,

    pub aggression_weight: i64,
    pub straight_line_multiplier: i64,

    pub edge_penalty: i64,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Snake.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Snake.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Snake.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            timing: TimingConfig {
                response_time_budget_ms: 400,
                network_overhead_ms: 50,
                polling_interval_ms: 10,
                min_time_remaining_ms: 20,
            },
            time_estimation: TimeEstimationConfig {
                base_iteration_time_ms: 0.01,
                branching_factor: 2.5,
            },
            search: SearchConfig {
                max_depth: 6,
                initial_depth: 2,
                depth_step: 2,
                parallel_root: true,
                min_cpus_for_parallel: 2,
            },
            game_rules: GameRulesConfig {
                health_on_food: 100,
                health_loss_per_turn: 1,
                head_on_neck: false,
            },
            heuristic: HeuristicConfig {
                hunger_threshold: 40,
                low_food_threshold: 8,
                scarce_food_base: 200,
                scarce_food_health_multiplier: 2,
                hungry_food_base: 100,
                growth_length: 4,
                trapped_penalty: 9_999_999,
                enemy_trapped_bonus: 9_999_999,
                decisive_bonus: 2_147_483_647,
                aggression_weight: 100,
                straight_line_multiplier: 2,
                edge_penalty: 25_000,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "robosnake_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!("Could not load Snake.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}

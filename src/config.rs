// Configuration module for reading FlipTac.toml
// Every tunable constant of the engine lives here: evaluator weights, reward
// shaping, opponent behavior and presentation timing.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::opponent::SelectorStrategy;
use crate::types::DistanceMetric;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub game: GameConfig,
    pub evaluation: EvaluationConfig,
    pub shaping: ShapingConfig,
    pub opponent: OpponentConfig,
    pub timing: TimingConfig,
    pub debug: DebugConfig,
}

/// Default game setup used by the binaries
#[derive(Debug, Deserialize, Clone)]
pub struct GameConfig {
    pub player_count: usize,
    pub board_size: usize,
}

/// Mobility potential constants
#[derive(Debug, Deserialize, Clone)]
pub struct EvaluationConfig {
    /// Weight `k` on the opponent's mobility in `own - k * opponent`
    pub opponent_weight: f64,
}

/// Step reward and potential-based shaping constants
#[derive(Debug, Deserialize, Clone)]
pub struct ShapingConfig {
    pub discount_factor: f64,
    pub shaping_factor: f64,

    // Terminal rewards
    pub win_reward: f64,
    pub loss_reward: f64,
    pub invalid_move_penalty: f64,

    // Per-step adjustments
    pub step_penalty: f64,
    pub corner_penalty: f64,
    pub elimination_bonus: f64,

    // Proximity to the opponent's last mark
    pub proximity_metric: DistanceMetric,
    pub near_distance: i32,
    pub near_bonus: f64,
    pub far_distance: i32,
    pub far_penalty: f64,
}

/// Built-in opponent constants
#[derive(Debug, Deserialize, Clone)]
pub struct OpponentConfig {
    pub strategy: SelectorStrategy,
    pub opening_random_moves: u32,
    pub tie_break_metric: DistanceMetric,

    // Positional strategy weights
    pub positional_weight: i32,
    pub own_mobility_weight: i32,
    pub opponent_mobility_weight: i32,

    // Probe parallelism
    pub parallel_probe: bool,
    pub min_candidates_for_parallel: usize,

    /// Fixed RNG seed; entropy-seeded when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Presentation timing
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    /// Minimum time the computer appears to think before answering
    pub thinking_delay_ms: u64,
}

/// Transcript logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the FlipTac.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from FlipTac.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("FlipTac.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in FlipTac.toml
    pub fn default_hardcoded() -> Self {
        Config {
            game: GameConfig {
                player_count: 2,
                board_size: 7,
            },
            evaluation: EvaluationConfig {
                opponent_weight: 1.5,
            },
            shaping: ShapingConfig {
                discount_factor: 0.99,
                shaping_factor: 0.10,
                win_reward: 5.0,
                loss_reward: -2.0,
                invalid_move_penalty: 20.0,
                step_penalty: 0.01,
                corner_penalty: 0.20,
                elimination_bonus: 1.0,
                proximity_metric: DistanceMetric::Chebyshev,
                near_distance: 3,
                near_bonus: 0.05,
                far_distance: 5,
                far_penalty: 0.10,
            },
            opponent: OpponentConfig {
                strategy: SelectorStrategy::Restrict,
                opening_random_moves: 3,
                tie_break_metric: DistanceMetric::SquaredEuclidean,
                positional_weight: 3,
                own_mobility_weight: 5,
                opponent_mobility_weight: 7,
                parallel_probe: true,
                min_candidates_for_parallel: 12,
                seed: None,
            },
            timing: TimingConfig {
                thinking_delay_ms: 100,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "fliptac_transcript.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!("Could not load FlipTac.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}

use serde::{Deserialize, Serialize};

/// How many times in a row a player may be re-asked after an invalid move.
pub const DEFAULT_MAX_INVALID_MOVES: u32 = 3;
/// Placeholder value stored for every enumerated state.
pub const DEFAULT_INITIAL_VALUE: f32 = 0.0;

/// Settings handed to a `Game` and its players at construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Log the rendered board after every move.
    pub debug: bool,
    pub max_invalid_moves: u32,
    pub initial_value: f32,
    /// Seed for randomised players; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            debug: false,
            max_invalid_moves: DEFAULT_MAX_INVALID_MOVES,
            initial_value: DEFAULT_INITIAL_VALUE,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"debug": true}"#).unwrap();
        assert!(config.debug);
        assert_eq!(config.max_invalid_moves, DEFAULT_MAX_INVALID_MOVES);
        assert_eq!(config.seed, None);
    }
}

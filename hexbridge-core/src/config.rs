//! Engine configuration: board size and move-ranking weights

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::coord::MAX_BOARD_SIZE;
use crate::error::HexError;
use crate::search::Link;

/// Board size used when none is given
pub const DEFAULT_BOARD_SIZE: u8 = 10;

/// Weights used to rank candidate cells taken from the connection paths.
///
/// Any values passing [`Weights::validate`] keep the ordering the ranking
/// depends on: a cell on our own path always outranks a cell that only lies
/// on the opponent's path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    /// Empty cell entered from a direct neighbour
    pub empty_step: f32,
    /// Empty cell entered across a two-bridge
    pub bridge_destination: f32,
    /// Multiplier applied to weights taken from the opponent's path
    pub defense_scale: f32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            empty_step: 3.0,
            bridge_destination: 5.0,
            defense_scale: 0.5,
        }
    }
}

impl Weights {
    /// Weight of an empty cell reached through `link`
    pub fn for_link(&self, link: Link) -> f32 {
        match link {
            Link::Start => 0.0,
            Link::Neighbour => self.empty_step,
            Link::Bridge => self.bridge_destination,
        }
    }

    pub fn validate(&self) -> Result<(), HexError> {
        let own = [self.empty_step, self.bridge_destination];
        if own.iter().any(|w| !w.is_finite() || *w <= 0.0) {
            return Err(HexError::InvalidWeights(
                "path weights must be positive".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.defense_scale) {
            return Err(HexError::InvalidWeights(format!(
                "defense_scale must be in [0, 1), got {}",
                self.defense_scale
            )));
        }
        let strongest = self.empty_step.max(self.bridge_destination);
        let weakest = self.empty_step.min(self.bridge_destination);
        if self.defense_scale * strongest >= weakest {
            return Err(HexError::InvalidWeights(format!(
                "defense_scale {} lets opponent-only cells outrank our own path",
                self.defense_scale
            )));
        }
        Ok(())
    }
}

/// Engine configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub board_size: u8,
    pub weights: Weights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            weights: Weights::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_board_size(mut self, board_size: u8) -> Self {
        self.board_size = board_size;
        self
    }

    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.weights = weights;
        self
    }

    pub fn validate(&self) -> Result<(), HexError> {
        if self.board_size == 0 || self.board_size > MAX_BOARD_SIZE {
            return Err(HexError::InvalidBoardSize {
                size: self.board_size,
                max: MAX_BOARD_SIZE,
            });
        }
        self.weights.validate()
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: EngineConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_valid() {
        let w = Weights::default();
        assert!(w.validate().is_ok());
        assert!(w.bridge_destination > w.empty_step);
        assert!(w.defense_scale * w.bridge_destination < w.empty_step);
    }

    #[test]
    fn test_rejects_defense_outranking_offense() {
        let w = Weights {
            defense_scale: 0.9,
            ..Weights::default()
        };
        assert!(matches!(w.validate(), Err(HexError::InvalidWeights(_))));

        let w = Weights {
            empty_step: 0.0,
            ..Weights::default()
        };
        assert!(w.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"weights": {"defense_scale": 0.25}}"#).unwrap();
        assert_eq!(config.board_size, DEFAULT_BOARD_SIZE);
        assert_eq!(config.weights.defense_scale, 0.25);
        assert_eq!(config.weights.empty_step, 3.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("hexbridge-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"board_size": 7}"#).unwrap();
        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.board_size, 7);
        std::fs::remove_file(&path).unwrap();

        assert!(EngineConfig::load(&path).is_err());
    }

    #[test]
    fn test_load_rejects_bad_size() {
        let path = std::env::temp_dir().join(format!("hexbridge-bad-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"board_size": 40}"#).unwrap();
        assert!(EngineConfig::load(&path).is_err());
        std::fs::remove_file(&path).unwrap();
    }
}

//! Game configuration, loaded from TOML.
//!
//! ```toml
//! data_dir = "data"
//! seed = 42
//! encounter_chance = 0.3
//! level_tolerance = 1
//! max_party_size = 3
//! ```
//!
//! Every key is optional.

use crate::encounter::{DEFAULT_ENCOUNTER_CHANCE, DEFAULT_LEVEL_TOLERANCE};
use crate::party::MAX_PARTY_SIZE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from reading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("encounter_chance must be between 0 and 1, got {0}")]
    InvalidChance(f64),

    #[error("max_party_size must be between 1 and 3, got {0}")]
    InvalidPartySize(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Directory holding the data files.
    pub data_dir: PathBuf,

    /// RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Chance that exploring starts a battle.
    pub encounter_chance: f64,

    /// How far from the party level an encounter's monsters may be.
    pub level_tolerance: u32,

    /// Most heroes a player may recruit.
    pub max_party_size: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            seed: None,
            encounter_chance: DEFAULT_ENCOUNTER_CHANCE,
            level_tolerance: DEFAULT_LEVEL_TOLERANCE,
            max_party_size: MAX_PARTY_SIZE,
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.encounter_chance) {
            return Err(ConfigError::InvalidChance(self.encounter_chance));
        }
        if !(1..=MAX_PARTY_SIZE).contains(&self.max_party_size) {
            return Err(ConfigError::InvalidPartySize(self.max_party_size));
        }
        Ok(())
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_encounter_chance(mut self, chance: f64) -> Self {
        self.encounter_chance = chance;
        self
    }

    pub fn with_level_tolerance(mut self, tolerance: u32) -> Self {
        self.level_tolerance = tolerance;
        self
    }
}

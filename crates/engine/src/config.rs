//! Engine configuration
//!
//! Defaults match the shipped game. Hosts may override them from the
//! environment (`BOX_PUZZLE_*`) or from a JSON file.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::{GenerateError, GeneratorConfig, LevelGenerator, SeededRng, ShapeCatalog};
use crate::store::StorageKeys;
use crate::types::PLACEMENT_ATTEMPTS;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Random placements tried per piece during generation
    pub placement_attempts: u32,
    /// Prefix for every storage key
    pub storage_prefix: String,
    /// Appended to daily share text when set
    pub share_url: Option<String>,
    /// Seed progressive levels deterministically instead of from entropy
    pub fixed_seed: Option<u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            placement_attempts: PLACEMENT_ATTEMPTS,
            storage_prefix: "boxgame".to_string(),
            share_url: None,
            fixed_seed: None,
        }
    }
}

impl EngineConfig {
    /// Create from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let placement_attempts = env::var("BOX_PUZZLE_PLACEMENT_ATTEMPTS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|&n: &u32| n > 0)
            .unwrap_or(defaults.placement_attempts);

        let storage_prefix = env::var("BOX_PUZZLE_STORAGE_PREFIX")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.storage_prefix);

        let share_url = env::var("BOX_PUZZLE_SHARE_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) });

        let fixed_seed = env::var("BOX_PUZZLE_SEED")
            .ok()
            .and_then(|s| s.trim().parse().ok());

        Self {
            placement_attempts,
            storage_prefix,
            share_url,
            fixed_seed,
        }
    }

    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// Read a JSON config file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            placement_attempts: self.placement_attempts.max(1),
        }
    }

    /// Generator over the built-in catalog with this config's tuning
    pub fn generator(&self) -> Result<LevelGenerator, GenerateError> {
        Ok(LevelGenerator::new(
            ShapeCatalog::standard()?,
            self.generator_config(),
        ))
    }

    /// RNG for a progressive level
    pub fn level_rng(&self) -> SeededRng {
        match self.fixed_seed {
            Some(seed) => SeededRng::new(seed),
            None => SeededRng::from_entropy(),
        }
    }

    pub fn storage_keys(&self) -> StorageKeys {
        StorageKeys::new(self.storage_prefix.clone())
    }
}

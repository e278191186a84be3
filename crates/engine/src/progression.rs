//! Progression module - numbered levels for progressive play
//!
//! The current level number is the only thing persisted. Each level is generated
//! fresh from the RNG handed in, so replaying a level gives a new puzzle unless
//! the caller seeds deterministically.

use log::{info, warn};

use crate::core::{GenerateError, LevelGenerator, RandomSource};
use crate::events::{EventSink, GameEvent};
use crate::session::GameSession;
use crate::store::{load_json, save_json, ProgressStore, StorageKeys, StoreError};
use crate::types::GameMode;

/// Progressive-mode level counter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progression {
    level: u32,
    keys: StorageKeys,
}

impl Progression {
    /// Start at `level` (clamped to at least 1)
    pub fn new(level: u32, keys: StorageKeys) -> Self {
        Self {
            level: level.max(1),
            keys,
        }
    }

    /// Resume from storage; level 1 if nothing usable is stored
    pub fn load(store: &dyn ProgressStore, keys: StorageKeys) -> Self {
        let level = match load_json::<u32>(store, &keys.level()) {
            Ok(Some(level)) if level > 0 => level,
            Ok(_) => 1,
            Err(err) => {
                warn!("ignoring stored level: {}", err);
                1
            }
        };
        Self::new(level, keys)
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Generate the current level and open a session on it
    pub fn start_level<S: EventSink>(
        &self,
        generator: &LevelGenerator,
        rng: &mut impl RandomSource,
        mut sink: S,
    ) -> Result<GameSession<S>, GenerateError> {
        let instance = generator.generate(self.level, rng)?;
        info!(
            "starting level {} ({}x{}, {} pieces)",
            self.level,
            instance.grid_size(),
            instance.grid_size(),
            instance.pieces.len()
        );
        sink.record(GameEvent::LevelStart { level: self.level });
        Ok(GameSession::new(
            self.level,
            instance,
            GameMode::Progressive,
            sink,
        ))
    }

    /// Move to the next level and persist it
    pub fn advance(&mut self, store: &mut dyn ProgressStore) -> Result<u32, StoreError> {
        self.level += 1;
        save_json(store, &self.keys.level(), &self.level)?;
        Ok(self.level)
    }
}

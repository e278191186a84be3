//! Session engine - playing, persisting and reporting levels
//!
//! This crate drives the pure core through a game: it holds the player's grid and
//! hand, counts mistakes, detects the win, and keeps progressive and daily
//! progress in a host-supplied key-value store. Everything the host must provide
//! (storage, analytics, the clock) is passed in, so the engine runs unchanged in
//! tests, a browser host or a terminal.
//!
//! # Module Structure
//!
//! - [`session`]: one level being played; pickup/drop routing and win detection
//! - [`progression`]: numbered levels and the persisted level counter
//! - [`daily`]: the date-seeded daily challenge and its share text
//! - [`snapshot`]: serializable placement and progress records
//! - [`store`]: the [`ProgressStore`] boundary and key layout
//! - [`events`]: analytics events and the [`EventSink`] trait
//! - [`presentation`]: display tokens, emoji and time formatting
//! - [`config`]: [`EngineConfig`] from defaults, env or JSON
//!
//! # Example
//!
//! ```
//! use box_puzzle_engine::events::RecordingSink;
//! use box_puzzle_engine::progression::Progression;
//! use box_puzzle_engine::session::DropTarget;
//! use box_puzzle_engine::store::{MemoryStore, StorageKeys};
//! use box_puzzle_engine::core::{LevelGenerator, SeededRng};
//!
//! let generator = LevelGenerator::standard().unwrap();
//! let mut store = MemoryStore::new();
//! let mut progression = Progression::load(&store, StorageKeys::default());
//!
//! let mut session = progression
//!     .start_level(&generator, &mut SeededRng::new(42), RecordingSink::new())
//!     .unwrap();
//! let moves: Vec<_> = session.pieces().iter().map(|p| (p.id, p.target)).collect();
//! for (id, target) in moves {
//!     session.pickup(id).unwrap();
//!     session.drop_piece(DropTarget::Grid(target)).unwrap();
//! }
//! assert!(session.is_won());
//! assert_eq!(progression.advance(&mut store).unwrap(), 2);
//! ```

pub mod config;
pub mod daily;
pub mod events;
pub mod presentation;
pub mod progression;
pub mod session;
pub mod snapshot;
pub mod store;

pub use box_puzzle_core as core;
pub use box_puzzle_types as types;

pub use config::EngineConfig;
pub use daily::{DailyChallenge, DailyError, DailySummary, DateKey};
pub use events::{EventSink, GameEvent, LogSink, NullSink, RecordingSink};
pub use progression::Progression;
pub use session::{DropOutcome, DropTarget, GameSession, SessionError};
pub use snapshot::{DailyProgress, PlacementRecord};
pub use store::{MemoryStore, ProgressStore, StorageKeys, StoreError};

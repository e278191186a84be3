//! Core puzzle logic - pure, deterministic, and testable
//!
//! This crate contains the puzzle engine: level synthesis, the stacking grid and
//! the win check. It has **no dependencies** on rendering, input, storage or
//! clocks, making it:
//!
//! - **Deterministic**: the same seed produces the same level, piece for piece
//! - **Testable**: every rule is exercised without a rendering environment
//! - **Portable**: runs headless, in a browser host, or in a terminal
//!
//! # Module Structure
//!
//! - [`rng`]: seeded linear congruential generator behind the [`RandomSource`] trait
//! - [`shapes`]: polyomino matrices, the built-in catalog and 90° rotation
//! - [`piece`]: a colored shape with its target anchor and placement state
//! - [`pattern`]: rows x cols color matrices (target and visible patterns)
//! - [`generator`]: difficulty tiers and target synthesis by simulated placement
//! - [`grid`]: per-cell piece stacks, covering checks and screen geometry
//! - [`win`]: visible-pattern derivation and target comparison
//!
//! # Example
//!
//! ```
//! use box_puzzle_core::{is_solved, LevelGenerator, SeededRng, StackGrid};
//!
//! let generator = LevelGenerator::standard().unwrap();
//! let level = generator.generate(1, &mut SeededRng::new(42)).unwrap();
//!
//! let size = level.grid_size();
//! let mut grid = StackGrid::new(size, size);
//! for piece in &level.pieces {
//!     grid.place_piece(piece, piece.target).unwrap();
//! }
//! assert!(is_solved(&grid, &level.pieces, &level.target));
//! ```

pub mod generator;
pub mod grid;
pub mod pattern;
pub mod piece;
pub mod rng;
pub mod shapes;
pub mod win;

pub use box_puzzle_types as types;

// Re-export commonly used types for convenience
pub use generator::{
    level_params, select_tier, GenerateError, GeneratorConfig, LevelGenerator, LevelInstance,
    LevelParams, Tier, TIERS,
};
pub use grid::{PlacementError, StackGrid};
pub use pattern::ColorPattern;
pub use piece::Piece;
pub use rng::{RandomSource, SeededRng};
pub use shapes::{rotate, Shape, ShapeCatalog, ShapeError, ShapeKind};
pub use win::{current_pattern, is_solved, matches};

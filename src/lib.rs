//! Box puzzle (workspace facade crate).
//!
//! This package exposes `box_puzzle::{types, core, engine}` while the
//! implementation lives in dedicated crates under `crates/`.

pub use box_puzzle_core as core;
pub use box_puzzle_engine as engine;
pub use box_puzzle_types as types;

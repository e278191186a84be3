//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental vocabulary used throughout the puzzle.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (generator, stacking grid, session engine, renderer).
//!
//! # Coordinates
//!
//! Grid cells are addressed as `(row, col)`, row 0 at the top and col 0 at the
//! left. A piece anchor is the top-left corner of the piece's bounding box.
//!
//! # Generation Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `PLACEMENT_ATTEMPTS` | 100 | Random placements tried per piece before it is dropped |
//! | `DAILY_LEVEL` | 100 | Level whose difficulty the daily challenge uses |
//! | `EXTRA_PIECE_INTERVAL` | 20 | Levels per bonus piece |
//! | `MAX_EXTRA_PIECES` | 3 | Cap on bonus pieces |
//! | `MAX_SHAPE_SIDE` | 4 | Largest bounding-box side a shape may have |
//!
//! # Examples
//!
//! ```
//! use box_puzzle_types::{CellPos, ColorId, LevelPhase};
//!
//! let color = ColorId::from_str("Blue").unwrap();
//! assert_eq!(color, ColorId::Blue);
//! assert_eq!(color.index(), 3);
//!
//! let pos = CellPos::new(1, 2);
//! assert_eq!(pos.offset(1, 1), CellPos::new(2, 3));
//!
//! assert!(!LevelPhase::Setup.is_won());
//! ```

/// Random placements tried per piece before the generator gives up on it.
pub const PLACEMENT_ATTEMPTS: u32 = 100;

/// Level whose parameters the daily challenge reuses (a consistent 4x4 board).
pub const DAILY_LEVEL: u32 = 100;

/// One bonus piece is added every `EXTRA_PIECE_INTERVAL` levels...
pub const EXTRA_PIECE_INTERVAL: u32 = 20;

/// ...up to this many.
pub const MAX_EXTRA_PIECES: u32 = 3;

/// Largest bounding-box side length a shape may have.
pub const MAX_SHAPE_SIDE: usize = 4;

/// Identity of a piece, unique within one level instance.
pub type PieceId = u32;

/// The fixed piece palette
///
/// Colors are identity tokens only. How they look on screen is decided by the
/// presentation layer; the engine never compares display strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColorId {
    Red,
    Yellow,
    Green,
    Blue,
    Purple,
}

impl ColorId {
    /// Every palette entry, in index order.
    pub const ALL: [ColorId; 5] = [
        ColorId::Red,
        ColorId::Yellow,
        ColorId::Green,
        ColorId::Blue,
        ColorId::Purple,
    ];

    /// Zero-based position in the palette
    pub fn index(&self) -> usize {
        match self {
            ColorId::Red => 0,
            ColorId::Yellow => 1,
            ColorId::Green => 2,
            ColorId::Blue => 3,
            ColorId::Purple => 4,
        }
    }

    /// Inverse of [`ColorId::index`]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Parse color from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use box_puzzle_types::ColorId;
    ///
    /// assert_eq!(ColorId::from_str("red"), Some(ColorId::Red));
    /// assert_eq!(ColorId::from_str("PURPLE"), Some(ColorId::Purple));
    /// assert_eq!(ColorId::from_str("teal"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" => Some(ColorId::Red),
            "yellow" => Some(ColorId::Yellow),
            "green" => Some(ColorId::Green),
            "blue" => Some(ColorId::Blue),
            "purple" => Some(ColorId::Purple),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorId::Red => "red",
            ColorId::Yellow => "yellow",
            ColorId::Green => "green",
            ColorId::Blue => "blue",
            ColorId::Purple => "purple",
        }
    }
}

/// A grid cell address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Cell at a local `(row, col)` offset from this one
    pub fn offset(&self, row: usize, col: usize) -> Self {
        Self {
            row: self.row + row,
            col: self.col + col,
        }
    }
}

/// Screen-space rectangle of a grid cell (or of the whole grid)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CellRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CellRect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Edges are inclusive on all four sides.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }
}

/// Lifecycle of one level instance
///
/// - **Setup**: grid empty, every piece in the tray
/// - **InProgress**: at least one piece has been placed or lifted
/// - **Won**: the visible pattern matched the target; terminal for the instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LevelPhase {
    #[default]
    Setup,
    InProgress,
    Won,
}

impl LevelPhase {
    pub fn is_won(&self) -> bool {
        matches!(self, LevelPhase::Won)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LevelPhase::Setup => "setup",
            LevelPhase::InProgress => "in_progress",
            LevelPhase::Won => "won",
        }
    }
}

/// Which flavour of play a session belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameMode {
    /// Numbered levels with fresh randomness every time.
    #[default]
    Progressive,
    /// One seeded puzzle per local calendar date.
    Daily,
}

//! Generator module - difficulty tiers and target synthesis
//!
//! A level is built by literally simulating placement: random (already rotated)
//! shapes are stamped onto an empty pattern, and the stamped pieces become the
//! player's tray. The target is therefore always reachable with the returned
//! pieces, though not necessarily in only one way.
//!
//! # Difficulty schedule
//!
//! | Levels | Tier |
//! |--------|------|
//! | 1-3 | 1 (3x3, no overlap) |
//! | 4-13 | ramp 1 -> 2 |
//! | 14-23 | 2 (3x3, overlap) |
//! | 24-53 | ramp 2 -> 4 |
//! | 54-113 | 4 (4x4, overlap) |
//! | 114+ | ramp 4 -> 5 |
//!
//! Inside a ramp the next tier is picked with probability
//! `clamp((level - start) / width, 0, 1)`. Ramps always consume one draw, even
//! where the probability clamps to zero, so seeded sequences stay aligned.
//! Tier 3 (4x4, no overlap) is defined but not on the schedule.

use log::debug;
use thiserror::Error;

use crate::grid::StackGrid;
use crate::pattern::ColorPattern;
use crate::piece::Piece;
use crate::rng::{RandomSource, SeededRng};
use crate::shapes::{ShapeCatalog, ShapeError};
use crate::types::{
    CellPos, ColorId, PieceId, DAILY_LEVEL, EXTRA_PIECE_INTERVAL, MAX_EXTRA_PIECES,
    PLACEMENT_ATTEMPTS,
};
use crate::win::current_pattern;

/// Generation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("levels start at 1")]
    InvalidLevel,
    #[error("invalid shape catalog: {0}")]
    Shape(#[from] ShapeError),
}

/// Fixed parameters of one difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tier {
    pub id: u8,
    /// Side length of the square grid
    pub size: usize,
    /// Whether target pieces may stack on each other
    pub allow_overlap: bool,
    pub base_pieces: u32,
}

/// All tiers, indexed by `id - 1`
pub const TIERS: [Tier; 5] = [
    Tier {
        id: 1,
        size: 3,
        allow_overlap: false,
        base_pieces: 3,
    },
    Tier {
        id: 2,
        size: 3,
        allow_overlap: true,
        base_pieces: 4,
    },
    Tier {
        id: 3,
        size: 4,
        allow_overlap: false,
        base_pieces: 4,
    },
    Tier {
        id: 4,
        size: 4,
        allow_overlap: true,
        base_pieces: 5,
    },
    Tier {
        id: 5,
        size: 5,
        allow_overlap: true,
        base_pieces: 6,
    },
];

/// Look up a tier by id
pub fn tier(id: u8) -> Option<&'static Tier> {
    TIERS.iter().find(|t| t.id == id)
}

/// How a band of levels picks its tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandKind {
    Fixed(u8),
    /// Probabilistic transition from `from` to `to`.
    Ramp {
        from: u8,
        to: u8,
        start: u32,
        width: u32,
    },
}

/// A contiguous band of levels, ending at `last_level` inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierBand {
    pub last_level: u32,
    pub kind: BandKind,
}

/// Progressive difficulty schedule
pub const TIER_SCHEDULE: [TierBand; 6] = [
    TierBand {
        last_level: 3,
        kind: BandKind::Fixed(1),
    },
    TierBand {
        last_level: 13,
        kind: BandKind::Ramp {
            from: 1,
            to: 2,
            start: 3,
            width: 20,
        },
    },
    TierBand {
        last_level: 23,
        kind: BandKind::Fixed(2),
    },
    TierBand {
        last_level: 53,
        kind: BandKind::Ramp {
            from: 2,
            to: 4,
            start: 33,
            width: 30,
        },
    },
    TierBand {
        last_level: 113,
        kind: BandKind::Fixed(4),
    },
    TierBand {
        last_level: u32::MAX,
        kind: BandKind::Ramp {
            from: 4,
            to: 5,
            start: 113,
            width: 50,
        },
    },
];

/// Probability of picking the upper tier of a ramp at `level`
pub fn ramp_progress(level: u32, start: u32, width: u32) -> f64 {
    if width == 0 {
        return 1.0;
    }
    let delta = level as f64 - start as f64;
    (delta / width as f64).clamp(0.0, 1.0)
}

/// Tier id for `level`, drawing from `rng` inside ramps
pub fn select_tier(level: u32, rng: &mut impl RandomSource) -> u8 {
    let band = TIER_SCHEDULE
        .iter()
        .find(|band| level <= band.last_level)
        .unwrap_or(&TIER_SCHEDULE[TIER_SCHEDULE.len() - 1]);

    match band.kind {
        BandKind::Fixed(id) => id,
        BandKind::Ramp {
            from,
            to,
            start,
            width,
        } => {
            if rng.chance(ramp_progress(level, start, width)) {
                to
            } else {
                from
            }
        }
    }
}

/// Bonus pieces earned by `level`
pub fn extra_pieces(level: u32) -> u32 {
    (level / EXTRA_PIECE_INTERVAL).min(MAX_EXTRA_PIECES)
}

/// Resolved parameters for one generation call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LevelParams {
    pub tier: u8,
    pub size: usize,
    pub allow_overlap: bool,
    pub num_pieces: u32,
}

impl LevelParams {
    /// Parameters of `tier` at `level` (piece count grows with level)
    pub fn for_tier(tier: &Tier, level: u32) -> Self {
        Self {
            tier: tier.id,
            size: tier.size,
            allow_overlap: tier.allow_overlap,
            num_pieces: tier.base_pieces + extra_pieces(level),
        }
    }

    /// The daily challenge's standard parameters: tier 4 as played at level 100
    pub fn daily() -> Self {
        Self::for_tier(&TIERS[3], DAILY_LEVEL)
    }
}

/// Parameters for progressive `level`
pub fn level_params(level: u32, rng: &mut impl RandomSource) -> Result<LevelParams, GenerateError> {
    if level == 0 {
        return Err(GenerateError::InvalidLevel);
    }
    let id = select_tier(level, rng);
    let tier = tier(id).unwrap_or(&TIERS[0]);
    Ok(LevelParams::for_tier(tier, level))
}

/// Generator tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Random placements tried per piece before it is dropped
    pub placement_attempts: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            placement_attempts: PLACEMENT_ATTEMPTS,
        }
    }
}

/// Output of one generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelInstance {
    pub params: LevelParams,
    /// Required top color per cell; never mutated after generation.
    pub target: ColorPattern,
    /// Tray pieces in generation order, all unplaced.
    pub pieces: Vec<Piece>,
}

impl LevelInstance {
    pub fn grid_size(&self) -> usize {
        self.params.size
    }

    /// Pieces the parameters asked for
    pub fn requested_pieces(&self) -> u32 {
        self.params.num_pieces
    }

    /// Pieces that found no valid placement and were left out
    pub fn dropped_pieces(&self) -> u32 {
        self.params
            .num_pieces
            .saturating_sub(self.pieces.len() as u32)
    }

    /// True if any piece was dropped during generation
    pub fn is_partial(&self) -> bool {
        self.dropped_pieces() > 0
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id == id)
    }

    /// Visible pattern after placing every piece at its target, in order
    pub fn solution_pattern(&self) -> ColorPattern {
        let size = self.grid_size();
        let mut grid = StackGrid::new(size, size);
        for piece in &self.pieces {
            // generated anchors always fit their own grid
            if grid.place_piece(piece, piece.target).is_err() {
                debug!("piece {} does not fit its own target", piece.id);
            }
        }
        current_pattern(&grid, &self.pieces)
    }
}

/// Builds level instances from a shape catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelGenerator {
    catalog: ShapeCatalog,
    config: GeneratorConfig,
}

impl LevelGenerator {
    pub fn new(catalog: ShapeCatalog, config: GeneratorConfig) -> Self {
        Self { catalog, config }
    }

    /// Built-in catalog, default tuning
    pub fn standard() -> Result<Self, GenerateError> {
        Ok(Self::new(ShapeCatalog::standard()?, GeneratorConfig::default()))
    }

    pub fn catalog(&self) -> &ShapeCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate progressive `level`
    pub fn generate(
        &self,
        level: u32,
        rng: &mut impl RandomSource,
    ) -> Result<LevelInstance, GenerateError> {
        let params = level_params(level, rng)?;
        debug!(
            "level {}: tier {} ({}x{}, overlap={}, pieces={})",
            level, params.tier, params.size, params.size, params.allow_overlap, params.num_pieces
        );
        Ok(self.generate_with_params(params, rng))
    }

    /// Generate the daily challenge for a date seed
    pub fn generate_daily(&self, seed: u32) -> LevelInstance {
        let mut rng = SeededRng::new(seed);
        self.generate_with_params(LevelParams::daily(), &mut rng)
    }

    /// Stamp `params.num_pieces` random pieces onto an empty pattern
    ///
    /// Draw order per piece: shape, rotation count, color (plus one redraw if it
    /// repeats the previous piece's color), then a row and a column draw per
    /// placement attempt.
    pub fn generate_with_params(
        &self,
        params: LevelParams,
        rng: &mut impl RandomSource,
    ) -> LevelInstance {
        let size = params.size;
        let mut target = ColorPattern::new(size, size);
        let mut occupied = vec![false; size * size];
        let mut pieces: Vec<Piece> = Vec::with_capacity(params.num_pieces as usize);

        for i in 0..params.num_pieces {
            let base = match self.catalog.get(rng.next_index(self.catalog.len())) {
                Some(shape) => *shape,
                None => continue,
            };
            let turns = rng.next_range(0, 4);
            let shape = base.rotated(turns);

            let mut color = random_color(rng);
            if pieces.last().map(|p| p.color) == Some(color) {
                color = random_color(rng);
            }

            if shape.rows() > size || shape.cols() > size {
                debug!("piece {} ({}x{}) larger than grid, dropped", i, shape.rows(), shape.cols());
                continue;
            }
            let offsets = shape.occupied_offsets();
            let row_span = (size - shape.rows() + 1) as u32;
            let col_span = (size - shape.cols() + 1) as u32;

            let mut anchor = None;
            for _ in 0..self.config.placement_attempts {
                let row = rng.next_range(0, row_span) as usize;
                let col = rng.next_range(0, col_span) as usize;

                let blocked = !params.allow_overlap
                    && offsets
                        .iter()
                        .any(|&(dr, dc)| occupied[(row + dr) * size + col + dc]);
                if !blocked {
                    anchor = Some(CellPos::new(row, col));
                    break;
                }
            }

            let Some(anchor) = anchor else {
                debug!(
                    "piece {} dropped after {} placement attempts",
                    i, self.config.placement_attempts
                );
                continue;
            };

            for &(dr, dc) in &offsets {
                let (row, col) = (anchor.row + dr, anchor.col + dc);
                target.set(row, col, Some(color));
                occupied[row * size + col] = true;
            }
            pieces.push(Piece::new(i, shape, color, anchor));
        }

        let instance = LevelInstance {
            params,
            target,
            pieces,
        };
        if instance.is_partial() {
            debug!(
                "generated {} of {} pieces",
                instance.pieces.len(),
                instance.requested_pieces()
            );
        }
        instance
    }
}

fn random_color(rng: &mut impl RandomSource) -> ColorId {
    ColorId::ALL[rng.next_index(ColorId::ALL.len())]
}

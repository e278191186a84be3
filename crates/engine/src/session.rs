//! Session module - one level being played
//!
//! A [`GameSession`] owns a generated level, the player's grid and the piece in
//! hand. Input from the host arrives as pickups and drops; the session applies
//! them to the grid, counts mistakes and detects the win.
//!
//! # Phases
//!
//! ```text
//! Setup ──pickup/place──▶ InProgress ──pattern matches──▶ Won
//! ```
//!
//! `Won` is terminal for the instance. The grid stays editable afterwards, but
//! further win checks do nothing.
//!
//! # Mistakes
//!
//! Lifting a piece off the grid and then putting it anywhere other than the cell
//! it came from (another cell, the tray, or off the grid) is one mistake.

use log::{debug, warn};
use thiserror::Error;

use crate::core::{current_pattern, matches, ColorPattern, LevelInstance, LevelParams};
use crate::core::{Piece, PlacementError, StackGrid};
use crate::events::{EventSink, GameEvent, NullSink};
use crate::snapshot::PlacementRecord;
use crate::types::{CellPos, CellRect, GameMode, LevelPhase, PieceId};

/// Rejected session input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no piece with id {0}")]
    UnknownPiece(PieceId),
    #[error("piece {0} is covered by another piece")]
    PieceLocked(PieceId),
    #[error("already holding piece {0}")]
    AlreadyHolding(PieceId),
    #[error("no piece is being held")]
    NothingHeld,
    #[error(transparent)]
    Placement(#[from] PlacementError),
}

/// Where the held piece was released
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// Over the grid, with the piece's top-left cell at this position
    Grid(CellPos),
    /// Back in the tray
    Tray,
    /// Anywhere else on screen
    Elsewhere,
}

/// What a drop did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Placed on the grid; `won` is true if this placement completed the level
    Placed { won: bool },
    ReturnedToTray,
    /// Left off the grid wherever it was released
    LeftOff,
}

impl DropOutcome {
    pub fn is_placed(&self) -> bool {
        matches!(self, DropOutcome::Placed { .. })
    }

    pub fn won(&self) -> bool {
        matches!(self, DropOutcome::Placed { won: true })
    }
}

/// Piece currently in the player's hand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Held {
    id: PieceId,
    /// Grid anchor it was lifted from, `None` if it came from the tray
    origin: Option<CellPos>,
}

/// State of one level being played
#[derive(Debug)]
pub struct GameSession<S: EventSink = NullSink> {
    level: u32,
    mode: GameMode,
    params: LevelParams,
    target: ColorPattern,
    pieces: Vec<Piece>,
    grid: StackGrid,
    phase: LevelPhase,
    mistakes: u32,
    track_mistakes: bool,
    /// Last timer reading reported by the host
    elapsed_ms: u64,
    held: Option<Held>,
    /// Ids of pieces on the grid, oldest placement first
    placement_order: Vec<PieceId>,
    sink: S,
}

impl<S: EventSink> GameSession<S> {
    /// Start playing `instance` as `level`
    pub fn new(level: u32, instance: LevelInstance, mode: GameMode, sink: S) -> Self {
        let size = instance.grid_size();
        Self {
            level,
            mode,
            params: instance.params,
            target: instance.target,
            pieces: instance.pieces,
            grid: StackGrid::new(size, size),
            phase: LevelPhase::Setup,
            mistakes: 0,
            track_mistakes: true,
            elapsed_ms: 0,
            held: None,
            placement_order: Vec::new(),
            sink,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn params(&self) -> &LevelParams {
        &self.params
    }

    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    pub fn is_won(&self) -> bool {
        self.phase.is_won()
    }

    pub fn target(&self) -> &ColorPattern {
        &self.target
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id == id)
    }

    pub fn grid(&self) -> &StackGrid {
        &self.grid
    }

    /// Record where the host drew the grid, enabling [`drop_at_point`](Self::drop_at_point)
    pub fn set_grid_bounds(&mut self, bounds: CellRect) {
        self.grid.set_bounds(bounds);
    }

    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    /// Time spent on the level as last reported by the host
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Report the host's timer reading; sent with `LevelComplete`
    pub fn set_elapsed(&mut self, elapsed_ms: u64) {
        self.elapsed_ms = elapsed_ms;
    }

    /// Id of the piece in hand
    pub fn held(&self) -> Option<PieceId> {
        self.held.map(|h| h.id)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// True if the piece is on the grid with another piece on top of it
    pub fn is_locked(&self, id: PieceId) -> bool {
        match self.piece(id) {
            Some(piece) => match piece.placement {
                Some(anchor) => self.grid.is_covered(piece, anchor),
                None => false,
            },
            None => false,
        }
    }

    /// Visible pattern of the grid right now
    pub fn current_pattern(&self) -> ColorPattern {
        current_pattern(&self.grid, &self.pieces)
    }

    fn index_of(&self, id: PieceId) -> Result<usize, SessionError> {
        self.pieces
            .iter()
            .position(|p| p.id == id)
            .ok_or(SessionError::UnknownPiece(id))
    }

    /// Take piece `idx` off the grid if it is there, returning where it was
    fn lift(&mut self, idx: usize) -> Result<Option<CellPos>, SessionError> {
        let piece = &self.pieces[idx];
        let Some(anchor) = piece.placement else {
            return Ok(None);
        };
        if self.grid.is_covered(piece, anchor) {
            return Err(SessionError::PieceLocked(piece.id));
        }
        self.grid.remove_piece(piece, anchor)?;
        let id = piece.id;
        self.pieces[idx].placement = None;
        self.placement_order.retain(|&p| p != id);
        Ok(Some(anchor))
    }

    fn put(&mut self, idx: usize, anchor: CellPos) -> Result<(), SessionError> {
        self.grid.place_piece(&self.pieces[idx], anchor)?;
        self.pieces[idx].placement = Some(anchor);
        self.placement_order.push(self.pieces[idx].id);
        Ok(())
    }

    fn fits(&self, idx: usize, anchor: CellPos) -> bool {
        self.grid.can_place(
            &self.pieces[idx].shape,
            anchor.row as i64,
            anchor.col as i64,
        )
    }

    fn touch(&mut self) {
        if self.phase == LevelPhase::Setup {
            self.phase = LevelPhase::InProgress;
        }
    }

    /// Pick a piece up from the tray or the grid
    ///
    /// Covered pieces cannot be lifted. Only one piece can be held at a time.
    pub fn pickup(&mut self, id: PieceId) -> Result<(), SessionError> {
        if let Some(held) = self.held {
            return Err(SessionError::AlreadyHolding(held.id));
        }
        let idx = self.index_of(id)?;
        let origin = self.lift(idx)?;
        self.held = Some(Held { id, origin });
        self.touch();
        Ok(())
    }

    /// Release the held piece
    ///
    /// A grid drop that doesn't fit is treated as [`DropTarget::Elsewhere`].
    pub fn drop_piece(&mut self, target: DropTarget) -> Result<DropOutcome, SessionError> {
        let held = self.held.ok_or(SessionError::NothingHeld)?;
        let idx = self.index_of(held.id)?;
        self.held = None;

        let target = match target {
            DropTarget::Grid(anchor) if !self.fits(idx, anchor) => {
                debug!(
                    "piece {} does not fit at ({}, {}), left off grid",
                    held.id, anchor.row, anchor.col
                );
                DropTarget::Elsewhere
            }
            other => other,
        };

        match target {
            DropTarget::Grid(anchor) => {
                self.put(idx, anchor)?;
                if matches!(held.origin, Some(origin) if origin != anchor) {
                    self.record_mistake(held.id);
                }
                let won = self.check_win();
                Ok(DropOutcome::Placed { won })
            }
            DropTarget::Tray => {
                if held.origin.is_some() {
                    self.record_mistake(held.id);
                }
                Ok(DropOutcome::ReturnedToTray)
            }
            DropTarget::Elsewhere => {
                if held.origin.is_some() {
                    self.record_mistake(held.id);
                }
                Ok(DropOutcome::LeftOff)
            }
        }
    }

    /// Release the held piece with its top-left cell over screen point `(x, y)`
    ///
    /// Points outside the grid, or any point before bounds are known, count as
    /// [`DropTarget::Elsewhere`].
    pub fn drop_at_point(&mut self, x: f32, y: f32) -> Result<DropOutcome, SessionError> {
        let target = match self.grid.cell_at(x, y) {
            Some(cell) => DropTarget::Grid(cell),
            None => DropTarget::Elsewhere,
        };
        self.drop_piece(target)
    }

    /// Move a piece straight to `anchor` without going through the hand
    ///
    /// No mistakes are counted. Returns true if this placement completed the level.
    pub fn place(&mut self, id: PieceId, anchor: CellPos) -> Result<bool, SessionError> {
        if let Some(held) = self.held {
            return Err(SessionError::AlreadyHolding(held.id));
        }
        let idx = self.index_of(id)?;
        if !self.fits(idx, anchor) {
            return Err(PlacementError::OutOfBounds {
                id,
                row: anchor.row,
                col: anchor.col,
            }
            .into());
        }
        self.lift(idx)?;
        self.put(idx, anchor)?;
        self.touch();
        Ok(self.check_win())
    }

    /// Return every piece to the tray
    ///
    /// Not a mistake. A won level stays won.
    pub fn reset(&mut self) {
        self.grid.clear();
        for piece in &mut self.pieces {
            piece.placement = None;
        }
        self.held = None;
        self.placement_order.clear();
        if self.phase != LevelPhase::Won {
            self.phase = LevelPhase::Setup;
        }
    }

    /// Pieces on the grid, oldest placement first
    pub fn placements(&self) -> Vec<PlacementRecord> {
        self.placement_order
            .iter()
            .filter_map(|&id| self.piece(id))
            .filter_map(|p| p.placement.map(|anchor| PlacementRecord::new(p.id, anchor)))
            .collect()
    }

    /// Replace the grid contents with saved placements, in order
    ///
    /// Records for unknown, duplicate or out-of-range pieces are skipped. A
    /// restored solution marks the level won without emitting events. Returns the
    /// number of pieces placed.
    pub fn restore(&mut self, records: &[PlacementRecord]) -> usize {
        self.reset();
        let mut restored = 0;
        for record in records {
            let anchor = record.anchor();
            let idx = match self.index_of(record.piece_id) {
                Ok(idx) => idx,
                Err(_) => {
                    warn!("skipping saved placement of unknown piece {}", record.piece_id);
                    continue;
                }
            };
            if self.pieces[idx].is_placed() {
                warn!("skipping duplicate saved placement of piece {}", record.piece_id);
                continue;
            }
            if !self.fits(idx, anchor) {
                warn!(
                    "skipping saved placement of piece {} at ({}, {})",
                    record.piece_id, anchor.row, anchor.col
                );
                continue;
            }
            if self.put(idx, anchor).is_ok() {
                restored += 1;
            }
        }
        if restored > 0 {
            self.touch();
            if self.phase != LevelPhase::Won && self.pattern_matches() {
                self.phase = LevelPhase::Won;
            }
        }
        restored
    }

    fn pattern_matches(&self) -> bool {
        matches(&self.current_pattern(), &self.target)
    }

    /// Evaluate the win condition; true only on the transition into `Won`
    fn check_win(&mut self) -> bool {
        if self.phase.is_won() || !self.pattern_matches() {
            return false;
        }
        self.phase = LevelPhase::Won;
        debug!("level {} solved with {} mistakes", self.level, self.mistakes);
        if self.mode == GameMode::Progressive {
            self.sink.record(GameEvent::LevelComplete {
                level: self.level,
                elapsed_ms: self.elapsed_ms,
                mistakes: self.mistakes,
            });
        }
        true
    }

    fn record_mistake(&mut self, piece: PieceId) {
        if !self.track_mistakes {
            return;
        }
        self.mistakes += 1;
        self.sink.record(GameEvent::Mistake {
            level: self.level,
            piece,
        });
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.sink.record(event);
    }

    pub(crate) fn set_mistakes(&mut self, mistakes: u32) {
        self.mistakes = mistakes;
    }

    /// Freeze the session as finished: won, no further mistakes counted
    pub(crate) fn mark_completed(&mut self) {
        self.phase = LevelPhase::Won;
        self.track_mistakes = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Shape;
    use crate::events::RecordingSink;
    use crate::types::ColorId;

    fn piece(id: PieceId, rows: &[&[u8]], color: ColorId, target: CellPos) -> Piece {
        Piece::new(id, Shape::from_rows(rows).unwrap(), color, target)
    }

    /// 2x2 grid: a red square covered by a blue dot at (0, 0)
    fn covering_instance() -> LevelInstance {
        let square = piece(0, &[&[1, 1], &[1, 1]], ColorId::Red, CellPos::new(0, 0));
        let dot = piece(1, &[&[1]], ColorId::Blue, CellPos::new(0, 0));
        let mut target = ColorPattern::new(2, 2);
        target.set(0, 0, Some(ColorId::Blue));
        target.set(0, 1, Some(ColorId::Red));
        target.set(1, 0, Some(ColorId::Red));
        target.set(1, 1, Some(ColorId::Red));
        LevelInstance {
            params: LevelParams {
                tier: 1,
                size: 2,
                allow_overlap: true,
                num_pieces: 2,
            },
            target,
            pieces: vec![square, dot],
        }
    }

    fn session() -> GameSession<RecordingSink> {
        GameSession::new(
            7,
            covering_instance(),
            GameMode::Progressive,
            RecordingSink::new(),
        )
    }

    #[test]
    fn test_new_session_is_setup() {
        let s = session();
        assert_eq!(s.phase(), LevelPhase::Setup);
        assert!(s.grid().is_empty());
        assert_eq!(s.held(), None);
        assert!(s.pieces().iter().all(|p| !p.is_placed()));
    }

    #[test]
    fn test_solve_by_drag_and_drop() {
        let mut s = session();
        s.pickup(0).unwrap();
        assert_eq!(s.phase(), LevelPhase::InProgress);
        assert_eq!(
            s.drop_piece(DropTarget::Grid(CellPos::new(0, 0))).unwrap(),
            DropOutcome::Placed { won: false }
        );

        s.pickup(1).unwrap();
        let outcome = s.drop_piece(DropTarget::Grid(CellPos::new(0, 0))).unwrap();
        assert!(outcome.won());
        assert!(s.is_won());
        assert_eq!(s.mistakes(), 0);
        assert_eq!(s.sink().count("level_complete"), 1);
        assert_eq!(s.grid().stack(0, 0), &[0, 1]);
    }

    #[test]
    fn test_level_complete_carries_elapsed_time() {
        let mut s = session();
        s.place(0, CellPos::new(0, 0)).unwrap();
        s.set_elapsed(12_500);
        assert!(s.place(1, CellPos::new(0, 0)).unwrap());
        assert_eq!(s.elapsed_ms(), 12_500);
        assert_eq!(
            s.sink().events().last(),
            Some(&GameEvent::LevelComplete {
                level: 7,
                elapsed_ms: 12_500,
                mistakes: 0,
            })
        );
    }

    #[test]
    fn test_covered_piece_is_locked() {
        let mut s = session();
        s.place(0, CellPos::new(0, 0)).unwrap();
        s.place(1, CellPos::new(0, 0)).unwrap();
        assert!(s.is_locked(0));
        assert!(!s.is_locked(1));
        assert_eq!(s.pickup(0), Err(SessionError::PieceLocked(0)));
        assert_eq!(s.held(), None);
    }

    #[test]
    fn test_moving_placed_piece_counts_mistake() {
        let mut s = session();
        s.place(1, CellPos::new(0, 0)).unwrap();

        s.pickup(1).unwrap();
        s.drop_piece(DropTarget::Grid(CellPos::new(1, 1))).unwrap();
        assert_eq!(s.mistakes(), 1);

        s.pickup(1).unwrap();
        s.drop_piece(DropTarget::Tray).unwrap();
        assert_eq!(s.mistakes(), 2);

        // from the tray: not a mistake
        s.pickup(1).unwrap();
        s.drop_piece(DropTarget::Elsewhere).unwrap();
        assert_eq!(s.mistakes(), 2);
        assert_eq!(s.sink().count("mistake_made"), 2);
    }

    #[test]
    fn test_dropping_back_on_origin_is_free() {
        let mut s = session();
        s.place(1, CellPos::new(1, 0)).unwrap();
        s.pickup(1).unwrap();
        assert!(s.grid().is_empty());
        s.drop_piece(DropTarget::Grid(CellPos::new(1, 0))).unwrap();
        assert_eq!(s.mistakes(), 0);
    }

    #[test]
    fn test_out_of_bounds_grid_drop_falls_back_to_elsewhere() {
        let mut s = session();
        s.place(0, CellPos::new(0, 0)).unwrap();
        s.pickup(0).unwrap();
        let outcome = s.drop_piece(DropTarget::Grid(CellPos::new(1, 1))).unwrap();
        assert_eq!(outcome, DropOutcome::LeftOff);
        assert_eq!(s.mistakes(), 1);
        assert!(!s.piece(0).unwrap().is_placed());
        assert!(s.grid().is_empty());
    }

    #[test]
    fn test_hand_rules() {
        let mut s = session();
        assert_eq!(s.drop_piece(DropTarget::Tray), Err(SessionError::NothingHeld));
        assert_eq!(s.pickup(9), Err(SessionError::UnknownPiece(9)));
        s.pickup(0).unwrap();
        assert_eq!(s.pickup(1), Err(SessionError::AlreadyHolding(0)));
        assert_eq!(
            s.place(1, CellPos::new(0, 0)),
            Err(SessionError::AlreadyHolding(0))
        );
    }

    #[test]
    fn test_drop_at_point() {
        let mut s = session();
        s.pickup(1).unwrap();
        // no bounds yet
        assert_eq!(s.drop_at_point(10.0, 10.0).unwrap(), DropOutcome::LeftOff);

        s.set_grid_bounds(CellRect::new(0.0, 0.0, 100.0, 100.0));
        s.pickup(1).unwrap();
        assert!(s.drop_at_point(75.0, 25.0).unwrap().is_placed());
        assert_eq!(s.piece(1).unwrap().anchor(), Some(CellPos::new(0, 1)));
    }

    #[test]
    fn test_win_checks_after_won_are_noops() {
        let mut s = session();
        s.place(0, CellPos::new(0, 0)).unwrap();
        assert!(s.place(1, CellPos::new(0, 0)).unwrap());

        s.pickup(1).unwrap();
        s.drop_piece(DropTarget::Grid(CellPos::new(0, 0))).unwrap();
        assert!(s.is_won());
        assert_eq!(s.sink().count("level_complete"), 1);
    }

    #[test]
    fn test_reset_keeps_mistakes_and_returns_to_setup() {
        let mut s = session();
        s.place(1, CellPos::new(0, 0)).unwrap();
        s.pickup(1).unwrap();
        s.drop_piece(DropTarget::Tray).unwrap();
        s.place(0, CellPos::new(0, 0)).unwrap();

        s.reset();
        assert_eq!(s.phase(), LevelPhase::Setup);
        assert!(s.grid().is_empty());
        assert!(s.placements().is_empty());
        assert_eq!(s.mistakes(), 1);
    }

    #[test]
    fn test_placements_restore_roundtrip() {
        let mut s = session();
        s.place(0, CellPos::new(0, 0)).unwrap();
        s.place(1, CellPos::new(0, 0)).unwrap();
        let saved = s.placements();
        assert_eq!(
            saved,
            vec![
                PlacementRecord::new(0, CellPos::new(0, 0)),
                PlacementRecord::new(1, CellPos::new(0, 0)),
            ]
        );

        let mut fresh = session();
        assert_eq!(fresh.restore(&saved), 2);
        assert_eq!(fresh.grid(), s.grid());
        assert!(fresh.is_won());
        assert!(fresh.sink().events().is_empty());
    }

    #[test]
    fn test_restore_skips_bad_records() {
        let mut s = session();
        let records = [
            PlacementRecord::new(5, CellPos::new(0, 0)),
            PlacementRecord::new(0, CellPos::new(1, 1)),
            PlacementRecord::new(1, CellPos::new(1, 1)),
            PlacementRecord::new(1, CellPos::new(0, 0)),
        ];
        assert_eq!(s.restore(&records), 1);
        assert_eq!(s.piece(1).unwrap().anchor(), Some(CellPos::new(1, 1)));
        assert_eq!(s.phase(), LevelPhase::InProgress);
    }

    #[test]
    fn test_completed_session_ignores_mistakes() {
        let mut s = session();
        s.place(1, CellPos::new(0, 0)).unwrap();
        s.mark_completed();
        s.pickup(1).unwrap();
        s.drop_piece(DropTarget::Tray).unwrap();
        assert_eq!(s.mistakes(), 0);
        assert!(s.is_won());
    }

    #[test]
    fn test_daily_mode_does_not_emit_level_complete() {
        let mut s = GameSession::new(
            100,
            covering_instance(),
            GameMode::Daily,
            RecordingSink::new(),
        );
        s.place(0, CellPos::new(0, 0)).unwrap();
        assert!(s.place(1, CellPos::new(0, 0)).unwrap());
        assert_eq!(s.sink().count("level_complete"), 0);
    }
}

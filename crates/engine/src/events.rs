//! Events module - analytics hooks
//!
//! Sessions report what happened through an injected [`EventSink`] instead of a
//! global analytics object. Hosts forward events to whatever backend they use;
//! tests record them.

use log::info;

use crate::types::PieceId;

/// Something worth reporting to analytics
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    LevelStart {
        level: u32,
    },
    LevelComplete {
        level: u32,
        /// Host timer reading when the level was solved
        elapsed_ms: u64,
        mistakes: u32,
    },
    /// A placed piece was moved somewhere other than where it was.
    Mistake {
        level: u32,
        piece: PieceId,
    },
    DailyStart {
        /// `YYYY-MM-DD`
        date: String,
    },
    DailyComplete {
        date: String,
        elapsed_ms: u64,
        mistakes: u32,
    },
    Share,
}

impl GameEvent {
    /// Analytics event name
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::LevelStart { .. } => "level_start",
            GameEvent::LevelComplete { .. } => "level_complete",
            GameEvent::Mistake { .. } => "mistake_made",
            GameEvent::DailyStart { .. } => "daily_challenge_start",
            GameEvent::DailyComplete { .. } => "daily_challenge_complete",
            GameEvent::Share => "share_result",
        }
    }
}

/// Receiver of game events
pub trait EventSink {
    fn record(&mut self, event: GameEvent);
}

impl<T: EventSink + ?Sized> EventSink for &mut T {
    fn record(&mut self, event: GameEvent) {
        (**self).record(event);
    }
}

impl<T: EventSink + ?Sized> EventSink for Box<T> {
    fn record(&mut self, event: GameEvent) {
        (**self).record(event);
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&mut self, _event: GameEvent) {}
}

/// Forwards events to the `log` facade at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn record(&mut self, event: GameEvent) {
        info!("[event] {}: {:?}", event.name(), event);
    }
}

/// Keeps every event in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Vec<GameEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Number of recorded events with analytics name `name`
    pub fn count(&self, name: &str) -> usize {
        self.events.iter().filter(|e| e.name() == name).count()
    }

    /// Drain everything recorded so far
    pub fn take(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EventSink for RecordingSink {
    fn record(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

//! Daily module - one seeded puzzle per local calendar date
//!
//! Every player gets the same puzzle on the same date: the level is generated
//! from the date's numeric seed (`YYYYMMDD`) with the daily parameters. Progress
//! (placements, mistakes, elapsed time, completion) is stored per date so the
//! challenge can be left and resumed.
//!
//! Elapsed time is measured by the host. The engine only stores what it is told.

use chrono::{Datelike, Local, NaiveDate};
use log::{info, warn};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::core::{ColorPattern, LevelGenerator};
use crate::events::{EventSink, GameEvent, NullSink};
use crate::presentation::{emoji_grid, format_elapsed};
use crate::session::{DropOutcome, DropTarget, GameSession, SessionError};
use crate::snapshot::{DailyProgress, PlacementRecord};
use crate::store::{load_json, save_json, ProgressStore, StorageKeys, StoreError};
use crate::types::{GameMode, PieceId, DAILY_LEVEL};

/// Daily challenge failures
#[derive(Debug, Error)]
pub enum DailyError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A calendar date as used for daily keys and seeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Today in the local time zone
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Parse a `YYYYMMDD` key
    pub fn parse(key: &str) -> Option<Self> {
        NaiveDate::parse_from_str(key, "%Y%m%d").ok().map(Self)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// `YYYYMMDD`
    pub fn key(&self) -> String {
        self.0.format("%Y%m%d").to_string()
    }

    /// The key read as a decimal number
    ///
    /// ```
    /// use box_puzzle_engine::daily::DateKey;
    ///
    /// let date = DateKey::from_ymd(2025, 3, 7).unwrap();
    /// assert_eq!(date.key(), "20250307");
    /// assert_eq!(date.seed(), 20250307);
    /// ```
    pub fn seed(&self) -> u32 {
        let year = self.0.year().max(0) as u32;
        year * 10_000 + self.0.month() * 100 + self.0.day()
    }

    /// `YYYY-MM-DD`
    pub fn formatted(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }
}

/// Final result of a completed daily challenge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySummary {
    /// `YYYY-MM-DD`
    pub date: String,
    pub elapsed_ms: u64,
    pub mistakes: u32,
    pub share_text: String,
}

/// The daily challenge for one date
#[derive(Debug)]
pub struct DailyChallenge<S: EventSink = NullSink> {
    date: DateKey,
    session: GameSession<S>,
    keys: StorageKeys,
    progress: DailyProgress,
    share_url: Option<String>,
}

fn load_or_default<T: DeserializeOwned + Default>(store: &dyn ProgressStore, key: &str) -> T {
    match load_json(store, key) {
        Ok(value) => value.unwrap_or_default(),
        Err(err) => {
            warn!("ignoring stored daily value: {}", err);
            T::default()
        }
    }
}

impl<S: EventSink> DailyChallenge<S> {
    /// Generate the puzzle for `date` and resume any stored progress
    pub fn start(
        date: DateKey,
        generator: &LevelGenerator,
        store: &mut dyn ProgressStore,
        keys: StorageKeys,
        sink: S,
    ) -> Result<Self, DailyError> {
        let key = date.key();
        let instance = generator.generate_daily(date.seed());
        let mut session = GameSession::new(DAILY_LEVEL, instance, GameMode::Daily, sink);

        let progress = DailyProgress {
            mistakes: load_or_default(store, &keys.daily_mistakes(&key)),
            elapsed_ms: load_or_default(store, &keys.daily_time(&key)),
            completed: load_or_default(store, &keys.daily_completed(&key)),
        };
        let placements: Vec<PlacementRecord> = load_or_default(store, &keys.daily_pieces(&key));

        session.set_mistakes(progress.mistakes);
        let restored = session.restore(&placements);
        if progress.completed {
            session.mark_completed();
        } else if !session.is_won() {
            save_json(store, &keys.daily_completed(&key), &false)?;
        }
        info!(
            "daily {}: restored {} pieces, {} mistakes, completed={}",
            key, restored, progress.mistakes, progress.completed
        );

        session.emit(GameEvent::DailyStart {
            date: date.formatted(),
        });

        let mut daily = Self {
            date,
            session,
            keys,
            progress,
            share_url: None,
        };
        // saved layout already solves the puzzle but completion was never recorded
        if !daily.progress.completed && daily.session.is_won() {
            daily.complete(store, progress.elapsed_ms)?;
        }
        Ok(daily)
    }

    /// Line appended to share text
    pub fn with_share_url(mut self, url: impl Into<String>) -> Self {
        self.share_url = Some(url.into());
        self
    }

    pub fn date(&self) -> DateKey {
        self.date
    }

    pub fn session(&self) -> &GameSession<S> {
        &self.session
    }

    pub fn progress(&self) -> DailyProgress {
        DailyProgress {
            mistakes: self.session.mistakes(),
            ..self.progress
        }
    }

    pub fn is_completed(&self) -> bool {
        self.progress.completed
    }

    pub fn target(&self) -> &ColorPattern {
        self.session.target()
    }

    pub fn pickup(&mut self, id: PieceId) -> Result<(), DailyError> {
        Ok(self.session.pickup(id)?)
    }

    /// Release the held piece and persist the result
    ///
    /// `elapsed_ms` is the host's timer reading. The placement that solves the
    /// puzzle completes the challenge.
    pub fn drop_piece(
        &mut self,
        target: DropTarget,
        store: &mut dyn ProgressStore,
        elapsed_ms: u64,
    ) -> Result<DropOutcome, DailyError> {
        if !self.progress.completed {
            self.session.set_elapsed(elapsed_ms);
        }
        let outcome = self.session.drop_piece(target)?;
        if outcome.won() && !self.progress.completed {
            self.complete(store, elapsed_ms)?;
        } else {
            self.save_progress(store, elapsed_ms)?;
        }
        Ok(outcome)
    }

    /// Write placements, time and mistakes; nothing once completed
    pub fn save_progress(
        &mut self,
        store: &mut dyn ProgressStore,
        elapsed_ms: u64,
    ) -> Result<(), DailyError> {
        if self.progress.completed {
            return Ok(());
        }
        self.progress.elapsed_ms = elapsed_ms;
        self.progress.mistakes = self.session.mistakes();
        self.write(store)
    }

    fn write(&self, store: &mut dyn ProgressStore) -> Result<(), DailyError> {
        let key = self.date.key();
        save_json(store, &self.keys.daily_time(&key), &self.progress.elapsed_ms)?;
        save_json(store, &self.keys.daily_mistakes(&key), &self.progress.mistakes)?;
        save_json(
            store,
            &self.keys.daily_pieces(&key),
            &self.session.placements(),
        )?;
        if self.progress.completed {
            save_json(store, &self.keys.daily_completed(&key), &true)?;
        }
        Ok(())
    }

    /// Store the final time and mark the date completed
    ///
    /// Calling it again returns the stored result unchanged.
    pub fn complete(
        &mut self,
        store: &mut dyn ProgressStore,
        elapsed_ms: u64,
    ) -> Result<DailySummary, DailyError> {
        if self.progress.completed {
            return Ok(self.summary());
        }
        self.progress.elapsed_ms = elapsed_ms;
        self.progress.mistakes = self.session.mistakes();
        self.progress.completed = true;
        self.write(store)?;
        self.session.mark_completed();

        info!(
            "daily {} completed in {} with {} mistakes",
            self.date.key(),
            format_elapsed(elapsed_ms),
            self.progress.mistakes
        );
        self.session.emit(GameEvent::DailyComplete {
            date: self.date.formatted(),
            elapsed_ms,
            mistakes: self.progress.mistakes,
        });
        Ok(self.summary())
    }

    pub fn summary(&self) -> DailySummary {
        let progress = self.progress();
        DailySummary {
            date: self.date.formatted(),
            elapsed_ms: progress.elapsed_ms,
            mistakes: progress.mistakes,
            share_text: self.share_text(),
        }
    }

    /// Result text for sharing, with the target drawn in emoji
    pub fn share_text(&self) -> String {
        let progress = self.progress();
        let mut text = format!(
            "Box Game Daily {}\n{}\nTime: {} | Mistakes: {}",
            self.date.formatted(),
            emoji_grid(self.session.target()),
            format_elapsed(progress.elapsed_ms),
            progress.mistakes
        );
        if let Some(url) = &self.share_url {
            text.push('\n');
            text.push_str(url);
        }
        text
    }

    /// Share text, recording the share
    pub fn share(&mut self) -> String {
        self.session.emit(GameEvent::Share);
        self.share_text()
    }

    pub fn into_session(self) -> GameSession<S> {
        self.session
    }
}

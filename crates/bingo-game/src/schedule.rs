//! When the next game starts.

use chrono::{Days, NaiveDateTime, NaiveTime};

/// Room name used when none is configured.
pub const DEFAULT_ROOM_NAME: &str = "Sala Principal";

/// The next game on the calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledGame {
    /// Local start time.
    pub at: NaiveDateTime,
    /// Display name of the room hosting it.
    pub room_name: String,
}

impl ScheduledGame {
    /// Whole seconds from `now` until the start. Negative once started.
    pub fn seconds_from(&self, now: NaiveDateTime) -> i64 {
        (self.at - now).num_seconds()
    }
}

/// Source of the next scheduled game.
///
/// The waiting-room countdown asks this on every poll. A calendar
/// backed by storage would implement it; [`StaticGameSchedule`] covers
/// the single daily game.
pub trait GameSchedule: Send + Sync + 'static {
    /// The next game at or after `now`.
    fn next_game(&self, now: NaiveDateTime) -> ScheduledGame;
}

impl<S: GameSchedule + ?Sized> GameSchedule for Box<S> {
    fn next_game(&self, now: NaiveDateTime) -> ScheduledGame {
        (**self).next_game(now)
    }
}

/// One game a day at a fixed local time.
#[derive(Debug, Clone)]
pub struct StaticGameSchedule {
    time: NaiveTime,
    room_name: String,
}

impl StaticGameSchedule {
    /// A daily game at `hour:minute`.
    ///
    /// Out-of-range values fall back to midnight.
    pub fn new(hour: u32, minute: u32) -> Self {
        let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_else(|| {
            tracing::warn!(hour, minute, "invalid game time, using 00:00");
            NaiveTime::MIN
        });
        Self {
            time,
            room_name: DEFAULT_ROOM_NAME.to_string(),
        }
    }

    /// Sets the room name reported with each game.
    pub fn with_room_name(mut self, room_name: impl Into<String>) -> Self {
        self.room_name = room_name.into();
        self
    }
}

impl Default for StaticGameSchedule {
    fn default() -> Self {
        Self::new(9, 0)
    }
}

impl GameSchedule for StaticGameSchedule {
    fn next_game(&self, now: NaiveDateTime) -> ScheduledGame {
        let today = now.date().and_time(self.time);
        // Exactly at the start time still counts as today.
        let at = if today < now {
            today.checked_add_days(Days::new(1)).unwrap_or(today)
        } else {
            today
        };
        ScheduledGame {
            at,
            room_name: self.room_name.clone(),
        }
    }
}

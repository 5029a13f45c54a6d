//! Calendar helpers and the time source seam.
//!
//! The engine never reads the system clock from inside a rule. Callers pass
//! "now" explicitly, usually obtained from a [`Clock`]. A [`Timestamp`] keeps
//! the user's UTC offset, so calendar rules see local wall-clock time while
//! stored activity stamps are true epoch milliseconds.

use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDate, Timelike, Weekday};

/// Format used for the day markers stored in the game-state document.
pub const DAY_FORMAT: &str = "%a %b %d %Y";
const ISO_DAY_FORMAT: &str = "%Y-%m-%d";
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// An instant together with the offset of the user's wall clock.
pub type Timestamp = DateTime<FixedOffset>;

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Reads the host clock in its local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Local::now().fixed_offset()
    }
}

/// Always reports the same instant (tests, replays).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

/// The user's calendar day at `now`.
#[must_use]
pub fn local_day(now: Timestamp) -> NaiveDate {
    now.date_naive()
}

/// Render a calendar day as a document marker, e.g. `Mon Oct 19 2026`.
#[must_use]
pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// Parse a day marker. Accepts the document format and ISO `YYYY-MM-DD`.
#[must_use]
pub fn parse_day(marker: &str) -> Option<NaiveDate> {
    let marker = marker.trim();
    NaiveDate::parse_from_str(marker, DAY_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(marker, ISO_DAY_FORMAT))
        .ok()
}

/// Whole calendar days from `marker` to `today`; `None` when the marker is unreadable.
#[must_use]
pub fn days_since(marker: &str, today: NaiveDate) -> Option<i64> {
    parse_day(marker).map(|day| (today - day).num_days())
}

/// True when `marker` names the same calendar day as `today`.
#[must_use]
pub fn is_same_day(marker: &str, today: NaiveDate) -> bool {
    parse_day(marker) == Some(today)
}

/// Milliseconds since the Unix epoch of the instant, whatever its offset.
#[must_use]
pub fn epoch_millis(now: Timestamp) -> i64 {
    now.timestamp_millis()
}

/// Fractional days elapsed between two epoch-millisecond stamps.
#[must_use]
pub fn elapsed_days(since_millis: i64, now_millis: i64) -> f64 {
    crate::numbers::i64_to_f64(now_millis.saturating_sub(since_millis)) / MILLIS_PER_DAY
}

/// Local hour, 0 to 23.
#[must_use]
pub fn hour_of_day(now: Timestamp) -> u32 {
    now.hour()
}

#[must_use]
pub fn is_weekend(now: Timestamp) -> bool {
    matches!(now.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Day of month, the advisory `currentDay` field of the player.
#[must_use]
pub fn day_of_month(now: Timestamp) -> u32 {
    now.day()
}

//! # Time Evaluator
//!
//! Pure decision function mapping a UTC instant and one schedule record to a
//! match decision. No clock reads, no I/O; the sweep injects `now`.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//! - **Toggleable**: false

use crate::features::schedule::{ScheduleRecord, MINUTES_PER_DAY};
use chrono::{DateTime, Timelike, Utc};

/// Outcome of evaluating one record at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchDecision {
    /// The user's daily exact moment is within tolerance of now.
    pub exact_hit: bool,
    /// Now falls inside the user's recurring window.
    pub window_hit: bool,
}

impl MatchDecision {
    pub fn any(&self) -> bool {
        self.exact_hit || self.window_hit
    }
}

/// The user's wall-clock minute-of-day at `now_utc`, given their calibrated
/// offset. Always in `0..1440`.
pub fn local_minute_of_day(now_utc: DateTime<Utc>, utc_offset_minutes: i32) -> u32 {
    let utc_minute = (now_utc.hour() * 60 + now_utc.minute()) as i64;
    (utc_minute + utc_offset_minutes as i64).rem_euclid(MINUTES_PER_DAY as i64) as u32
}

/// Evaluate one schedule record at one UTC instant.
///
/// `tolerance_minutes` is the sweep interval rounded up to whole minutes; an
/// exact moment hits while the circular minute distance to it is below the
/// tolerance. A sub-minute sweep therefore requires minute equality, while a
/// five-minute sweep accepts the surrounding ±4 minutes, and every moment is
/// observed at least once despite discrete polling. The circular metric
/// keeps a `00:00` target matchable just before midnight.
pub fn evaluate(
    now_utc: DateTime<Utc>,
    record: &ScheduleRecord,
    tolerance_minutes: u32,
) -> MatchDecision {
    let local = local_minute_of_day(now_utc, record.utc_offset_minutes);

    let exact_hit = record
        .exact_moment
        .map(|moment| circular_distance(local, moment.minute_of_day()) < tolerance_minutes)
        .unwrap_or(false);

    let window_hit = record
        .window
        .map(|window| window.contains(local))
        .unwrap_or(false);

    MatchDecision {
        exact_hit,
        window_hit,
    }
}

/// Shortest distance between two minutes-of-day on the 24h circle.
fn circular_distance(a: u32, b: u32) -> u32 {
    let direct = a.abs_diff(b);
    direct.min(MINUTES_PER_DAY - direct)
}

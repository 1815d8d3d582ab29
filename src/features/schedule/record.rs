//! # Schedule Record Types
//!
//! Per-user schedule data: a daily exact disconnect moment, a recurring
//! disconnect window, and a calibrated UTC offset. One tagged record shape
//! with optional fields; the settings file keeps the human-readable `"HH:MM"`
//! and `"HH:MM-HH:MM"` forms.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Unified record shape, window and moment independently toggleable
//! - 1.0.0: Initial creation

use crate::core::ScheduleError;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minutes in one day
pub const MINUTES_PER_DAY: u32 = 1440;

/// Largest accepted UTC offset magnitude in minutes (±12h)
pub const MAX_OFFSET_MINUTES: i64 = 720;

/// A wall-clock time of day, minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Result<Self, ScheduleError> {
        if hour > 23 || minute > 59 {
            return Err(ScheduleError::InvalidTimeFormat {
                input: format!("{hour:02}:{minute:02}"),
            });
        }
        Ok(TimeOfDay {
            hour: hour as u8,
            minute: minute as u8,
        })
    }

    pub fn hour(&self) -> u32 {
        self.hour as u32
    }

    pub fn minute(&self) -> u32 {
        self.minute as u32
    }

    /// Minutes since local midnight, in `0..1440`.
    pub fn minute_of_day(&self) -> u32 {
        self.hour as u32 * 60 + self.minute as u32
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = ScheduleError;

    /// Parse `"HH:MM"`. Single-digit hours are accepted (`"7:30"`), matching
    /// what users actually type.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScheduleError::InvalidTimeFormat {
            input: s.to_string(),
        };

        let (hour_part, minute_part) = s.trim().split_once(':').ok_or_else(invalid)?;
        if hour_part.is_empty() || hour_part.len() > 2 || minute_part.len() != 2 {
            return Err(invalid());
        }

        let hour: u32 = hour_part.parse().map_err(|_| invalid())?;
        let minute: u32 = minute_part.parse().map_err(|_| invalid())?;
        TimeOfDay::new(hour, minute).map_err(|_| invalid())
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// A recurring local-time interval during which a connected user is subject
/// to disconnection. `start > end` denotes a window wrapping past midnight.
/// Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: TimeOfDay,
    end: TimeOfDay,
}

impl TimeWindow {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        TimeWindow { start, end }
    }

    pub fn start(&self) -> TimeOfDay {
        self.start
    }

    pub fn end(&self) -> TimeOfDay {
        self.end
    }

    pub fn wraps_midnight(&self) -> bool {
        self.start.minute_of_day() > self.end.minute_of_day()
    }

    /// Whether a local minute-of-day falls inside the window.
    pub fn contains(&self, local_minute_of_day: u32) -> bool {
        let start = self.start.minute_of_day();
        let end = self.end.minute_of_day();
        if start <= end {
            start <= local_minute_of_day && local_minute_of_day <= end
        } else {
            local_minute_of_day >= start || local_minute_of_day <= end
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl FromStr for TimeWindow {
    type Err = ScheduleError;

    /// Parse `"HH:MM-HH:MM"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start_part, end_part) =
            s.trim()
                .split_once('-')
                .ok_or_else(|| ScheduleError::InvalidTimeFormat {
                    input: s.to_string(),
                })?;
        Ok(TimeWindow {
            start: start_part.parse()?,
            end: end_part.parse()?,
        })
    }
}

impl Serialize for TimeWindow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TimeWindow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// One user's schedule. Fields are independently toggleable; a user may have
/// an exact moment, a window, both, or neither.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    /// Reported clock offset from UTC in minutes, within ±720. Zero means
    /// never calibrated.
    #[serde(default, rename = "offset", deserialize_with = "deserialize_offset")]
    pub utc_offset_minutes: i32,

    /// Local time-of-day of the once-daily disconnect.
    #[serde(default, rename = "time", skip_serializing_if = "Option::is_none")]
    pub exact_moment: Option<TimeOfDay>,

    /// Recurring local-time disconnect window.
    #[serde(default, rename = "range", skip_serializing_if = "Option::is_none")]
    pub window: Option<TimeWindow>,
}

impl ScheduleRecord {
    /// True when the record carries no calibration and no triggers, making it
    /// eligible for pruning.
    pub fn is_empty(&self) -> bool {
        self.utc_offset_minutes == 0 && self.exact_moment.is_none() && self.window.is_none()
    }
}

fn deserialize_offset<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    let minutes = i32::deserialize(deserializer)?;
    if (minutes as i64).abs() > MAX_OFFSET_MINUTES {
        return Err(de::Error::custom(format!(
            "offset {minutes} is outside the supported ±{MAX_OFFSET_MINUTES} range"
        )));
    }
    Ok(minutes)
}

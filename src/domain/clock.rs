use chrono::{DateTime, Local, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Minutes in a day; valid minute-of-day values are `0..MINUTES_PER_DAY`
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Last representable minute of the day (23:59)
pub const LAST_MINUTE: u32 = MINUTES_PER_DAY - 1;

/// Raised when a wall-clock string is not a valid "HH:MM"
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid time \"{input}\": expected HH:MM (00:00-23:59)")]
pub struct FormatError {
    pub input: String,
}

impl FormatError {
    fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }
}

/// Parse "HH:MM" into minutes since midnight
pub fn to_minutes(hhmm: &str) -> Result<u32, FormatError> {
    let trimmed = hhmm.trim();
    let (hours, minutes) = trimmed
        .split_once(':')
        .ok_or_else(|| FormatError::new(hhmm))?;

    let digits_only = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if !digits_only(hours) || hours.len() > 2 || !digits_only(minutes) || minutes.len() != 2 {
        return Err(FormatError::new(hhmm));
    }

    let hours: u32 = hours.parse().map_err(|_| FormatError::new(hhmm))?;
    let minutes: u32 = minutes.parse().map_err(|_| FormatError::new(hhmm))?;
    if hours >= 24 || minutes >= 60 {
        return Err(FormatError::new(hhmm));
    }

    Ok(hours * 60 + minutes)
}

/// Format minutes since midnight as zero-padded "HH:MM"
pub fn from_minutes(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Wall-clock minute of the day for a local timestamp
pub fn minute_of_day(now: &DateTime<Local>) -> u32 {
    now.hour() * 60 + now.minute()
}

/// Minutes left until `end`, never negative
pub fn remaining_minutes(now: u32, end: u32) -> u32 {
    end.saturating_sub(now)
}

/// Format remaining minutes as "Xh Ym" or "Ym"
pub fn format_remaining(minutes: u32) -> String {
    if minutes == 0 {
        return "0m".to_string();
    }
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

/// Remaining-minutes value at which the pre-expiry warning fires.
///
/// Long tasks warn proportionally earlier; anything under half an hour warns
/// at 10% of its length, but never later than one minute before the end.
pub fn warning_threshold(duration: i64) -> u32 {
    if duration >= 360 {
        30
    } else if duration >= 60 {
        10
    } else if duration >= 30 {
        5
    } else {
        // floor(duration * 0.1) for non-negative durations
        let tenth = duration.max(0) / 10;
        tenth.max(1) as u32
    }
}

/// A validated minute of the day, stored as "HH:MM" on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u32);

impl ClockTime {
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self(minutes))
    }

    /// Like `from_minutes`, but pins anything past midnight to 23:59
    pub fn clamped(minutes: u32) -> Self {
        Self(minutes.min(LAST_MINUTE))
    }

    pub fn of(now: &DateTime<Local>) -> Self {
        Self(minute_of_day(now))
    }

    pub fn minutes(self) -> u32 {
        self.0
    }
}

impl FromStr for ClockTime {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        to_minutes(s).map(Self)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = FormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&from_minutes(self.0))
    }
}

/// Length of a window in minutes; negative when `end` precedes `start`
pub fn window_minutes(start: ClockTime, end: ClockTime) -> i64 {
    end.minutes() as i64 - start.minutes() as i64
}

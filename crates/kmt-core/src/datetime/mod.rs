//! Duration parsing and clock formatting.

use chrono::{Local, NaiveTime, Timelike};
use std::time::Duration;

mod duration;

pub use duration::{ParseDurationError, parse_duration};

/// Formats a time of day as `HH:MM`.
#[inline]
pub fn format_clock(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Returns the local wall-clock time shifted by the duration.
#[inline]
pub fn local_time_after(offset: Duration) -> NaiveTime {
    let now = Local::now().time();
    let offset = chrono::Duration::from_std(offset).unwrap_or_else(|_| chrono::Duration::zero());
    now.overflowing_add_signed(offset).0
}

/// Adds a number of minutes to an `HH:MM` departure time, wrapping around midnight.
///
/// Returns `None` if the departure time is not formatted as `HH:MM`.
pub fn arrival_after(departure: &str, minutes: u32) -> Option<String> {
    let (hours, mins) = departure.split_once(':')?;
    let hours = hours.trim().parse::<u32>().ok()?;
    let mins = mins.trim().parse::<u32>().ok()?;
    let total = mins + minutes;
    let new_hours = (hours + total / 60) % 24;
    let new_minutes = total % 60;
    Some(format!("{new_hours:02}:{new_minutes:02}"))
}

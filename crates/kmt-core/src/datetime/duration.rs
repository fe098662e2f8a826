use self::ParseDurationError::*;
use std::{error, fmt, time::Duration};

/// An error resulting from parsing a duration from a string.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseDurationError {
    /// Invalid number.
    InvalidNumber(String),
    /// Invalid unit.
    InvalidUnit(String),
    /// Empty input.
    Empty,
}

impl fmt::Display for ParseDurationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InvalidNumber(err) => write!(f, "invalid number: {err}"),
            InvalidUnit(err) => write!(f, "invalid unit: {err}"),
            Empty => write!(f, "empty duration"),
        }
    }
}

impl error::Error for ParseDurationError {}

/// Parses a duration from a string such as `800ms`, `2s` or `1h30m`.
///
/// Supported units are `ms`, `s`, `m`, `h`, `d` and `w`. Units must appear
/// from the longest to the shortest, each at most once.
pub fn parse_duration(input: &str) -> Result<Duration, ParseDurationError> {
    const UNITS: [(&str, u64); 6] = [
        ("w", 604_800_000),
        ("d", 86_400_000),
        ("h", 3_600_000),
        ("m", 60_000),
        ("s", 1_000),
        ("ms", 1),
    ];

    let mut input = input.trim();
    if input.is_empty() {
        return Err(Empty);
    }

    let mut last_unit_order = None;
    let mut milliseconds = 0;
    while !input.is_empty() {
        let Some(index) = input.find(|ch: char| ch.is_alphabetic()) else {
            return Err(InvalidUnit(format!("missing unit after `{input}`")));
        };
        let (number, remainder) = input.split_at(index);
        let number = number
            .parse::<u64>()
            .map_err(|err| InvalidNumber(format!("`{number}`: {err}")))?;
        let unit_end = remainder
            .find(|ch: char| ch.is_ascii_digit())
            .unwrap_or(remainder.len());
        let (unit, rest) = remainder.split_at(unit_end);
        let Some(unit_order) = UNITS.iter().position(|&(name, _)| name == unit) else {
            return Err(InvalidUnit(format!("unit `{unit}` is not supported")));
        };
        if last_unit_order.is_some_and(|order| unit_order <= order) {
            return Err(InvalidUnit(format!("unit `{unit}` is out of order")));
        }
        milliseconds += number * UNITS[unit_order].1;
        last_unit_order = Some(unit_order);
        input = rest;
    }
    Ok(Duration::from_millis(milliseconds))
}

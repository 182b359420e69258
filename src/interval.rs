// src/interval.rs

//! Time-interval strings: `"250"`, `"250ms"`, `"7s"`, `"10m"`, `"4h"`, `"2d"`, `"1w"`, `"3y"`.

// dependencies
use crate::errors::{RateLimiterError, Result};

pub const SECOND: u64 = 1_000;
pub const MINUTE: u64 = 60 * SECOND;
pub const HOUR: u64 = 60 * MINUTE;
pub const DAY: u64 = 24 * HOUR;
pub const WEEK: u64 = 7 * DAY;
pub const YEAR: u64 = 365 * DAY;

// suffix -> multiplier; "ms" must be tried before "m"
const SUFFIXES: [(&str, u64); 7] = [
    ("ms", 1),
    ("s", SECOND),
    ("m", MINUTE),
    ("h", HOUR),
    ("d", DAY),
    ("w", WEEK),
    ("y", YEAR),
];

// unit, size, smallest value printed in this unit
const FORMAT_UNITS: [(&str, u64, u64); 5] = [
    ("w", WEEK, 3 * WEEK),
    ("d", DAY, DAY),
    ("h", HOUR, HOUR),
    ("m", MINUTE, MINUTE),
    ("s", SECOND, SECOND),
];

/// Parse a time interval into milliseconds. A bare number is milliseconds.
pub fn parse_time_interval(s: &str) -> Result<u64> {
    let s = s.trim();
    let invalid = || RateLimiterError::InvalidRate(s.to_string());

    let (digits, multiplier) = SUFFIXES
        .iter()
        .find_map(|(suffix, mult)| s.strip_suffix(suffix).map(|d| (d, *mult)))
        .unwrap_or((s, 1));

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    digits
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(multiplier))
        .ok_or_else(invalid)
}

/// Render milliseconds the short way: `"9000ms"`, `"10s"`, `"1m0s"`, `"2d3h0m"`, `"3w0d0h"`.
///
/// Values under ten seconds are printed in milliseconds. Longer values print
/// three components starting from the largest unit that applies (weeks only
/// from three weeks up), truncating whatever is left below the last one.
pub fn format_time_interval(millis: i64) -> String {
    let mut out = String::new();
    if millis < 0 {
        out.push('-');
    }
    let mut rem = millis.unsigned_abs();
    if rem < 10 * SECOND {
        out.push_str(&format!("{rem}ms"));
        return out;
    }
    let first = FORMAT_UNITS
        .iter()
        .position(|(_, _, min)| rem >= *min)
        .unwrap_or(FORMAT_UNITS.len() - 1);
    for (abbr, size, _) in FORMAT_UNITS.iter().skip(first).take(3) {
        let count = rem / size;
        rem -= count * size;
        out.push_str(&format!("{count}{abbr}"));
    }
    out
}

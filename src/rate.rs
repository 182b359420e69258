// src/rate.rs

//! Rates and the rate-string grammar.
//!
//! ```text
//! rate     := "unlimited" | count "/" interval
//! count    := positive-integer
//! interval := positive-integer unit?        (no unit means milliseconds)
//! unit     := "ms" | "s" | "m" | "h" | "d" | "w" | "y"
//! ```

// dependencies
use crate::errors::{RateLimiterError, Result};
use crate::interval::{format_time_interval, parse_time_interval};
use std::fmt;
use std::str::FromStr;

const UNLIMITED: &str = "unlimited";

/// A parsed rate: either no limit at all, or `limit` events per `interval` milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rate {
    Unlimited,
    Limited { limit: u32, interval: u64 },
}

impl Rate {
    /// Build a limited rate, rejecting zero components.
    pub fn limited(limit: u32, interval: u64) -> Result<Self> {
        if limit == 0 {
            return Err(RateLimiterError::InvalidLimit);
        }
        if interval == 0 {
            return Err(RateLimiterError::InvalidInterval);
        }
        Ok(Rate::Limited { limit, interval })
    }

    /// Like [`Rate::limited`], for callers holding signed values.
    pub fn from_parts(limit: i64, interval: i64) -> Result<Self> {
        let limit = u32::try_from(limit).map_err(|_| RateLimiterError::InvalidLimit)?;
        let interval = u64::try_from(interval).map_err(|_| RateLimiterError::InvalidInterval)?;
        Self::limited(limit, interval)
    }

    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(UNLIMITED) {
            return Ok(Rate::Unlimited);
        }
        let invalid = || RateLimiterError::InvalidRate(s.to_string());
        let (count, interval) = s.split_once('/').ok_or_else(invalid)?;
        if count.is_empty() || !count.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let limit = count.parse::<u32>().map_err(|_| invalid())?;
        let interval = parse_time_interval(interval).map_err(|_| invalid())?;
        Self::limited(limit, interval)
    }

    /// Max events per window; 0 when unlimited.
    pub fn limit(&self) -> u32 {
        match self {
            Rate::Unlimited => 0,
            Rate::Limited { limit, .. } => *limit,
        }
    }

    /// Window length in milliseconds; 0 when unlimited.
    pub fn interval(&self) -> u64 {
        match self {
            Rate::Unlimited => 0,
            Rate::Limited { interval, .. } => *interval,
        }
    }

    pub fn is_unlimited(&self) -> bool {
        matches!(self, Rate::Unlimited)
    }
}

impl FromStr for Rate {
    type Err = RateLimiterError;

    fn from_str(s: &str) -> Result<Self> {
        Rate::parse(s)
    }
}

// canonical form, e.g. "7/3000ms", "22/33s", "unlimited"
impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Rate::Unlimited => f.write_str(UNLIMITED),
            Rate::Limited { limit, interval } => {
                let interval = i64::try_from(*interval).unwrap_or(i64::MAX);
                write!(f, "{}/{}", limit, format_time_interval(interval))
            }
        }
    }
}

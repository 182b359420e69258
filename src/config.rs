// src/config.rs

//! Configuration parameters and limiters built from them.
//!
//! Rates that come from configuration are operator input: a malformed value
//! is logged and replaced by the caller's default instead of failing.

// dependencies
use crate::clock::Clock;
use crate::errors::{RateLimiterError, Result};
use crate::interval::parse_time_interval;
use crate::rate::Rate;
use crate::window_limiter::RateLimiter;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

/// A flat set of string parameters, e.g. `rate1 = "7/10m"`.
///
/// Deserializes from a map of scalars: numbers and booleans are kept in
/// their textual form and null values are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    params: BTreeMap<String, String>,
}

// a scalar parameter value as written in the source document
#[derive(Deserialize)]
#[serde(untagged)]
enum ParamValue {
    Bool(bool),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
}

impl From<ParamValue> for String {
    fn from(value: ParamValue) -> Self {
        match value {
            ParamValue::Bool(b) => b.to_string(),
            ParamValue::Unsigned(n) => n.to_string(),
            ParamValue::Signed(n) => n.to_string(),
            ParamValue::Float(n) => n.to_string(),
            ParamValue::Text(s) => s,
        }
    }
}

impl<'de> Deserialize<'de> for Configuration {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Option<ParamValue>>::deserialize(deserializer)?;
        let params = raw
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, String::from(v))))
            .collect();
        Ok(Self { params })
    }
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            params: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Load a configuration from a YAML mapping of scalars.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| RateLimiterError::Config(e.to_string()))
    }

    /// Builder-style: set a parameter
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Return a limiter at the rate configured under `key`.
///
/// An absent or malformed value falls back to `default_rate` (a malformed
/// `default_rate` is an error). A modifiable `existing` limiter is reused:
/// returned as is when already at the rate, otherwise switched to it.
pub fn configured_rate_limiter<C>(
    config: &Configuration,
    existing: Option<Arc<RateLimiter<C>>>,
    key: &str,
    default_rate: &str,
    clock: &C,
) -> Result<Arc<RateLimiter<C>>>
where
    C: Clock + Clone,
{
    let configured = config.get(key).unwrap_or(default_rate).trim();
    let (rate, rate_str) = match Rate::parse(configured) {
        Ok(rate) => (rate, configured),
        Err(error) => {
            warn!(key, value = configured, %error, "Malformed rate, using default");
            (Rate::parse(default_rate)?, default_rate.trim())
        }
    };

    match existing {
        Some(limiter) if limiter.is_modifiable() => {
            if !limiter.is_rate_str(rate_str) {
                limiter.set_parsed_rate(rate, rate_str.to_string())?;
            }
            Ok(limiter)
        }
        _ => Ok(Arc::new(RateLimiter::from_parsed(
            rate,
            rate_str.to_string(),
            clock.clone(),
        ))),
    }
}

/// Two-parameter form of [`configured_rate_limiter`]: the event count is read
/// from `events_key` and the interval (e.g. `"10m"`) from `interval_key`,
/// each falling back to its own default when absent or malformed.
pub fn configured_rate_limiter_parts<C>(
    config: &Configuration,
    existing: Option<Arc<RateLimiter<C>>>,
    events_key: &str,
    events_default: u32,
    interval_key: &str,
    interval_default: u64,
    clock: &C,
) -> Result<Arc<RateLimiter<C>>>
where
    C: Clock + Clone,
{
    let limit = configured_param(config, events_key, events_default, |s| {
        s.trim()
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or(RateLimiterError::InvalidLimit)
    });
    let interval = configured_param(config, interval_key, interval_default, |s| {
        parse_time_interval(s).and_then(|n| {
            if n > 0 {
                Ok(n)
            } else {
                Err(RateLimiterError::InvalidInterval)
            }
        })
    });

    match existing {
        Some(limiter) if limiter.is_modifiable() => {
            if !limiter.is_rate(limit, interval) {
                limiter.set_rate(limit, interval)?;
            }
            Ok(limiter)
        }
        _ => Ok(Arc::new(RateLimiter::new(limit, interval, clock.clone())?)),
    }
}

// read `key` with `parse`, logging and substituting `default` if it fails
fn configured_param<T, F>(config: &Configuration, key: &str, default: T, parse: F) -> T
where
    F: FnOnce(&str) -> Result<T>,
{
    match config.get(key) {
        None => default,
        Some(value) => parse(value).unwrap_or_else(|error| {
            warn!(key, value, %error, "Malformed parameter, using default");
            default
        }),
    }
}

// src/pool.rs

//! Shared limiters: a registry of named limiters, and a map of per-key
//! limiters that all follow one configured rate.

// dependencies
use crate::clock::{Clock, SystemClock};
use crate::config::Configuration;
use crate::errors::Result;
use crate::rate::Rate;
use crate::window_limiter::RateLimiter;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::RwLock;
use std::hash::Hash;
use std::sync::Arc;
use tracing::{debug, warn};

/// A registry handing out one shared limiter per name, so that every caller
/// limiting the same resource counts against the same window.
#[derive(Debug)]
pub struct RateLimiterPool<C = SystemClock>
where
    C: Clock + Clone,
{
    limiters: DashMap<String, Arc<RateLimiter<C>>>,
    clock: C,
}

impl<C> RateLimiterPool<C>
where
    C: Clock + Clone,
{
    /// Create an empty pool whose limiters all read `clock`.
    pub fn new(clock: C) -> Self {
        Self {
            limiters: DashMap::new(),
            clock,
        }
    }

    /// Return the limiter registered under `name`, creating it at `rate` if
    /// absent. An existing limiter whose rate string differs is switched to `rate`.
    pub fn find_named_rate_limiter(&self, name: &str, rate: &str) -> Result<Arc<RateLimiter<C>>> {
        let limiter = match self.limiters.entry(name.to_string()) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => {
                let limiter = Arc::new(RateLimiter::from_rate_str(rate, self.clock.clone())?);
                debug!(name, rate, "Creating named rate limiter");
                entry.insert(limiter.clone());
                return Ok(limiter);
            }
        };
        if !limiter.is_rate_str(rate) {
            limiter.set_rate_str(rate)?;
        }
        Ok(limiter)
    }

    /// Numeric form of [`RateLimiterPool::find_named_rate_limiter`].
    pub fn find_named_rate_limiter_with(
        &self,
        name: &str,
        limit: u32,
        interval: u64,
    ) -> Result<Arc<RateLimiter<C>>> {
        let limiter = match self.limiters.entry(name.to_string()) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => {
                let limiter = Arc::new(RateLimiter::new(limit, interval, self.clock.clone())?);
                debug!(name, limit, interval, "Creating named rate limiter");
                entry.insert(limiter.clone());
                return Ok(limiter);
            }
        };
        if !limiter.is_rate(limit, interval) {
            limiter.set_rate(limit, interval)?;
        }
        Ok(limiter)
    }

    pub fn get(&self, name: &str) -> Option<Arc<RateLimiter<C>>> {
        self.limiters.get(name).map(|entry| entry.value().clone())
    }

    pub fn remove(&self, name: &str) -> Option<Arc<RateLimiter<C>>> {
        self.limiters.remove(name).map(|(_, limiter)| limiter)
    }

    pub fn len(&self) -> usize {
        self.limiters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limiters.is_empty()
    }
}

impl Default for RateLimiterPool<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock::new())
    }
}

/// Lazily created limiters, one per key, all at the rate configured under a
/// single parameter.
#[derive(Debug)]
pub struct LimiterMap<K, C = SystemClock>
where
    K: Hash + Eq + Clone,
    C: Clock + Clone,
{
    param: String,
    default_rate: String,
    current: RwLock<(Rate, String)>,
    limiters: DashMap<K, Arc<RateLimiter<C>>>,
    clock: C,
}

impl<K, C> LimiterMap<K, C>
where
    K: Hash + Eq + Clone,
    C: Clock + Clone,
{
    /// `param` names the configuration parameter holding the rate; `default_rate`
    /// is used until a configuration supplies a valid one. Fails if
    /// `default_rate` itself is malformed.
    pub fn new(param: &str, default_rate: &str, clock: C) -> Result<Self> {
        let rate = Rate::parse(default_rate)?;
        Ok(Self {
            param: param.to_string(),
            default_rate: default_rate.trim().to_string(),
            current: RwLock::new((rate, default_rate.trim().to_string())),
            limiters: DashMap::new(),
            clock,
        })
    }

    /// The shared limiter for `key`, created at the current rate on first use.
    pub fn get_rate_limiter(&self, key: &K) -> Arc<RateLimiter<C>> {
        if let Some(limiter) = self.limiters.get(key) {
            return limiter.value().clone();
        }
        // lock order: current, then the map shard (same as reset_rate_limiters)
        let current = self.current.read();
        self.limiters
            .entry(key.clone())
            .or_insert_with(|| {
                let (rate, rate_str) = (*current).clone();
                Arc::new(RateLimiter::from_parsed(rate, rate_str, self.clock.clone()))
            })
            .value()
            .clone()
    }

    /// Re-read the rate from `config` (falling back to the default when the
    /// parameter is absent or malformed) and apply it to every limiter.
    pub fn reset_rate_limiters(&self, config: &Configuration) -> Result<()> {
        let configured = config
            .get(&self.param)
            .unwrap_or(self.default_rate.as_str())
            .trim();
        let (rate, rate_str) = match Rate::parse(configured) {
            Ok(rate) => (rate, configured.to_string()),
            Err(error) => {
                warn!(param = %self.param, value = configured, %error, "Malformed rate, using default");
                (Rate::parse(&self.default_rate)?, self.default_rate.clone())
            }
        };

        let mut current = self.current.write();
        for entry in self.limiters.iter() {
            let limiter = entry.value();
            if !limiter.is_rate_str(&rate_str) {
                limiter.set_parsed_rate(rate, rate_str.clone())?;
            }
        }
        *current = (rate, rate_str);
        Ok(())
    }

    /// The rate string new and existing limiters currently follow.
    pub fn rate(&self) -> String {
        self.current.read().1.clone()
    }

    pub fn len(&self) -> usize {
        self.limiters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limiters.is_empty()
    }
}

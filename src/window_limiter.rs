// src/window_limiter.rs

// window-limiter: at most `limit` events in any trailing `interval` milliseconds.

// dependencies
use crate::clock::{Clock, Interrupt, SystemClock};
use crate::errors::{RateLimiterError, Result};
use crate::event_ring::EventRing;
use crate::rate::Rate;
use parking_lot::Mutex;
use std::fmt;
use std::sync::LazyLock;
use tracing::{debug, trace};

/// A shared unlimited limiter whose rate can never be changed.
pub static UNLIMITED: LazyLock<RateLimiter> =
    LazyLock::new(|| RateLimiter::constant(Rate::Unlimited, SystemClock::new()));

/// The main RateLimiter model.
/// Keeps the timestamps of the last `limit` events and permits a new event
/// once the oldest of them is at least `interval` milliseconds old.
/// C is the clock type, defaulting to SystemClock.
/// All methods take `&self`; share a limiter between threads with `Arc`.
#[derive(Debug)]
pub struct RateLimiter<C = SystemClock>
where
    C: Clock,
{
    state: Mutex<LimiterState>,
    modifiable: bool,
    clock: C,
}

#[derive(Debug)]
struct LimiterState {
    rate: Rate,
    // the string the rate was configured from, returned by `rate()`
    rate_str: String,
    // None while unlimited
    events: Option<EventRing>,
}

impl LimiterState {
    fn new(rate: Rate, rate_str: String) -> Self {
        let events = match rate {
            Rate::Unlimited => None,
            Rate::Limited { limit, .. } => Some(EventRing::new(limit as usize)),
        };
        Self {
            rate,
            rate_str,
            events,
        }
    }

    fn time_until_event_ok(&self, now: u64) -> u64 {
        let Some(events) = &self.events else {
            return 0;
        };
        if !events.is_full() {
            return 0;
        }
        match events.oldest() {
            Some(oldest) => self.rate.interval().saturating_sub(now.saturating_sub(oldest)),
            None => 0,
        }
    }

    fn apply(&mut self, rate: Rate, rate_str: String) {
        self.events = match (rate, self.events.take()) {
            (Rate::Unlimited, _) => None,
            (Rate::Limited { limit, .. }, None) => Some(EventRing::new(limit as usize)),
            (Rate::Limited { limit, .. }, Some(mut events)) => {
                events.resize(limit as usize);
                Some(events)
            }
        };
        self.rate = rate;
        self.rate_str = rate_str;
    }
}

// methods for the RateLimiter type
impl<C> RateLimiter<C>
where
    C: Clock,
{
    /// Create a limiter allowing `limit` events per `interval` milliseconds.
    pub fn new(limit: u32, interval: u64, clock: C) -> Result<Self> {
        let rate = Rate::limited(limit, interval)?;
        Ok(Self::from_parsed(rate, rate.to_string(), clock))
    }

    /// Create a limiter from a rate string such as `"10/100ms"`, `"7/3s"` or `"unlimited"`.
    pub fn from_rate_str(rate: &str, clock: C) -> Result<Self> {
        let parsed = Rate::parse(rate)?;
        Ok(Self::from_parsed(parsed, rate.trim().to_string(), clock))
    }

    /// Create a modifiable limiter that starts out unlimited.
    pub fn unlimited(clock: C) -> Self {
        Self::from_parsed(Rate::Unlimited, Rate::Unlimited.to_string(), clock)
    }

    // a limiter whose rate can never change
    pub(crate) fn constant(rate: Rate, clock: C) -> Self {
        Self {
            state: Mutex::new(LimiterState::new(rate, rate.to_string())),
            modifiable: false,
            clock,
        }
    }

    pub(crate) fn from_parsed(rate: Rate, rate_str: String, clock: C) -> Self {
        Self {
            state: Mutex::new(LimiterState::new(rate, rate_str)),
            modifiable: true,
            clock,
        }
    }

    // accessor method to return the limit (0 when unlimited)
    pub fn limit(&self) -> u32 {
        self.state.lock().rate.limit()
    }

    // accessor method to return the interval in milliseconds (0 when unlimited)
    pub fn interval(&self) -> u64 {
        self.state.lock().rate.interval()
    }

    pub fn current_rate(&self) -> Rate {
        self.state.lock().rate
    }

    /// The rate as it was configured: the original string if one was given,
    /// otherwise the canonical form.
    pub fn rate(&self) -> String {
        self.state.lock().rate_str.clone()
    }

    /// The canonical form of the rate, e.g. `"7/3000ms"` or `"22/33s"`.
    pub fn rate_string(&self) -> String {
        self.state.lock().rate.to_string()
    }

    pub fn is_rate(&self, limit: u32, interval: u64) -> bool {
        self.state.lock().rate == Rate::Limited { limit, interval }
    }

    /// True if `rate` is exactly the string this limiter was configured with.
    pub fn is_rate_str(&self, rate: &str) -> bool {
        self.state.lock().rate_str == rate.trim()
    }

    pub fn is_unlimited(&self) -> bool {
        self.state.lock().rate.is_unlimited()
    }

    pub fn is_modifiable(&self) -> bool {
        self.modifiable
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// True if recording an event now would stay within the rate.
    pub fn is_event_ok(&self) -> Result<bool> {
        Ok(self.time_until_event_ok()? == 0)
    }

    /// Milliseconds until an event would be permitted; 0 if it is permitted now.
    pub fn time_until_event_ok(&self) -> Result<u64> {
        if self.is_unlimited() {
            return Ok(0);
        }
        let now = self.clock.now()?;
        Ok(self.state.lock().time_until_event_ok(now))
    }

    /// Block until an event is permitted, sleeping on the limiter's clock.
    /// Returns `Ok(true)` once permitted, or `Err(Interrupted)` if `interrupt` fires first.
    /// The interrupt is cleared when it aborts a wait, so the same token can
    /// be passed to later waits.
    pub fn wait_until_event_ok(&self, interrupt: &Interrupt) -> Result<bool> {
        loop {
            let wait = self.time_until_event_ok()?;
            if wait == 0 {
                return Ok(true);
            }
            trace!(wait_ms = wait, rate = %self.rate_string(), "Waiting for rate limiter");
            self.clock.sleep(wait, interrupt)?;
        }
    }

    /// Record an event at the current time, evicting the oldest if the window is full.
    pub fn event(&self) -> Result<()> {
        if self.is_unlimited() {
            return Ok(());
        }
        let now = self.clock.now()?;
        if let Some(events) = self.state.lock().events.as_mut() {
            events.push(now);
        }
        Ok(())
    }

    /// Retract the most recently recorded event.
    pub fn unevent(&self) {
        if let Some(events) = self.state.lock().events.as_mut() {
            events.pop_newest();
        }
    }

    /// Change to `limit` events per `interval` milliseconds.
    pub fn set_rate(&self, limit: u32, interval: u64) -> Result<()> {
        let rate = Rate::limited(limit, interval)?;
        self.set_parsed_rate(rate, rate.to_string())
    }

    /// Change the rate from a rate string, including `"unlimited"`.
    /// The limiter is unchanged if the string does not parse.
    pub fn set_rate_str(&self, rate: &str) -> Result<()> {
        let parsed = Rate::parse(rate)?;
        self.set_parsed_rate(parsed, rate.trim().to_string())
    }

    pub(crate) fn set_parsed_rate(&self, rate: Rate, rate_str: String) -> Result<()> {
        if !self.modifiable {
            return Err(RateLimiterError::Unmodifiable);
        }
        let mut state = self.state.lock();
        if state.rate != rate {
            debug!(from = %state.rate, to = %rate, "Rate limiter rate changed");
        }
        state.apply(rate, rate_str);
        Ok(())
    }

    /// Number of events currently remembered.
    pub fn recorded_events(&self) -> usize {
        self.state
            .lock()
            .events
            .as_ref()
            .map_or(0, |events| events.len())
    }
}

impl<C> fmt::Display for RateLimiter<C>
where
    C: Clock,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[RL: {}]", self.rate())
    }
}

// src/lib.rs

//! # Window Limiter
//!
//! A sliding-window event rate limiter: at most `limit` events in any
//! trailing `interval` milliseconds, with rates written as strings like
//! `"10/100ms"`, `"7/3s"` or `"unlimited"`.
//!
//! ## Quick Example
//!
//! ```rust
//! use window_limiter::{Interrupt, RateLimiter, SystemClock};
//!
//! let limiter = RateLimiter::from_rate_str("2/1s", SystemClock::new()).unwrap();
//!
//! if limiter.is_event_ok().unwrap() {
//!     limiter.event().unwrap();
//!     println!("Event allowed");
//! } else {
//!     println!("Rate limited - retry after {}ms",
//!              limiter.time_until_event_ok().unwrap());
//! }
//!
//! // or block until the window has room
//! limiter.wait_until_event_ok(&Interrupt::new()).unwrap();
//! limiter.event().unwrap();
//! ```
//!
//! Limiters that guard the same resource from several call sites can be
//! shared through a [`RateLimiterPool`]; per-key limiters following one
//! configured rate live in a [`LimiterMap`].

// private modules
mod clock;
mod config;
mod errors;
mod event_ring;
mod interval;
mod pool;
mod rate;
mod window_limiter;

// public API exports
pub use clock::{Clock, Interrupt, SimulatedClock, SystemClock};
pub use config::{Configuration, configured_rate_limiter, configured_rate_limiter_parts};
pub use errors::{ClockError, RateLimiterError, Result};
pub use interval::{
    DAY, HOUR, MINUTE, SECOND, WEEK, YEAR, format_time_interval, parse_time_interval,
};
pub use pool::{LimiterMap, RateLimiterPool};
pub use rate::Rate;
pub use window_limiter::{RateLimiter, UNLIMITED};

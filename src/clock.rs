// src/clock.rs

// clock module definition and implementations

// dependencies
use crate::errors::{ClockError, RateLimiterError};
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How often a simulated sleeper re-checks its interrupt while no one steps the clock.
const SIMULATED_INTERRUPT_POLL: Duration = Duration::from_millis(10);

/// Clock trait to abstract time retrieval and sleeping.
/// Implementors must be thread-safe (Send + Sync).
/// `now` returns milliseconds since an arbitrary, fixed origin and must never go backwards.
/// `sleep` blocks until the clock has advanced by `millis`, or until `interrupt` fires;
/// a sleep that returns `Interrupted` clears the interrupt.
pub trait Clock: Send + Sync {
    fn now(&self) -> Result<u64, ClockError>;

    fn sleep(&self, millis: u64, interrupt: &Interrupt) -> Result<(), RateLimiterError>;
}

/// SystemClock implementation using the monotonic system clock.
/// Time is measured from the moment the clock was created; clones share that origin.
/// This is the default clock used by the RateLimiter.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Result<u64, ClockError> {
        Ok(self.origin.elapsed().as_millis() as u64)
    }

    fn sleep(&self, millis: u64, interrupt: &Interrupt) -> Result<(), RateLimiterError> {
        if interrupt.wait_for(Duration::from_millis(millis)) {
            Err(RateLimiterError::Interrupted)
        } else {
            Ok(())
        }
    }
}

/// A steppable clock for deterministic tests and simulations.
///
/// Time only moves when [`SimulatedClock::set`] or [`SimulatedClock::step`] is
/// called. Sleepers are woken whenever time moves, so a thread blocked in
/// `sleep` returns as soon as another thread steps the clock far enough.
#[derive(Debug, Clone)]
pub struct SimulatedClock {
    inner: Arc<SimulatedInner>,
}

#[derive(Debug)]
struct SimulatedInner {
    time: Mutex<u64>,
    moved: Condvar,
}

impl SimulatedClock {
    pub fn new(start_millis: u64) -> Self {
        Self {
            inner: Arc::new(SimulatedInner {
                time: Mutex::new(start_millis),
                moved: Condvar::new(),
            }),
        }
    }

    /// Current simulated time in milliseconds.
    pub fn millis(&self) -> u64 {
        *self.inner.time.lock()
    }

    pub fn set(&self, millis: u64) {
        *self.inner.time.lock() = millis;
        self.inner.moved.notify_all();
    }

    pub fn step(&self, millis: u64) {
        *self.inner.time.lock() += millis;
        self.inner.moved.notify_all();
    }
}

impl Clock for SimulatedClock {
    fn now(&self) -> Result<u64, ClockError> {
        Ok(self.millis())
    }

    fn sleep(&self, millis: u64, interrupt: &Interrupt) -> Result<(), RateLimiterError> {
        let mut time = self.inner.time.lock();
        let target = time.saturating_add(millis);
        loop {
            if *time >= target {
                return Ok(());
            }
            if interrupt.take() {
                return Err(RateLimiterError::Interrupted);
            }
            self.inner
                .moved
                .wait_for(&mut time, SIMULATED_INTERRUPT_POLL);
        }
    }
}

/// A cancellation signal for blocking waits.
///
/// Clones share state. Calling [`Interrupt::interrupt`] on any clone aborts the
/// next wait that observes it, whether that wait is already blocked or starts
/// later. The aborted wait clears the interrupt, so the token can be reused.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    inner: Arc<InterruptInner>,
}

#[derive(Debug, Default)]
struct InterruptInner {
    raised: Mutex<bool>,
    signal: Condvar,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interrupt(&self) {
        *self.inner.raised.lock() = true;
        self.inner.signal.notify_all();
    }

    pub fn is_interrupted(&self) -> bool {
        *self.inner.raised.lock()
    }

    /// Clear an interrupt that no wait has consumed yet.
    pub fn reset(&self) {
        *self.inner.raised.lock() = false;
    }

    // clear the interrupt, returning whether it was raised
    pub(crate) fn take(&self) -> bool {
        std::mem::take(&mut *self.inner.raised.lock())
    }

    /// Block for up to `timeout` real time. Returns true (and clears the
    /// interrupt) if interrupted.
    pub(crate) fn wait_for(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut raised = self.inner.raised.lock();
        while !*raised {
            if self
                .inner
                .signal
                .wait_until(&mut raised, deadline)
                .timed_out()
            {
                break;
            }
        }
        std::mem::take(&mut *raised)
    }
}

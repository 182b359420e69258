// tests/ratelimiter/window_tests.rs

#[cfg(test)]
mod tests {
    use window_limiter::{Interrupt, RateLimiter, SimulatedClock};

    #[test]
    fn fresh_limiter_allows_a_full_window() {
        let clock = SimulatedClock::new(1000);
        let limiter = RateLimiter::new(5, 100, clock.clone()).unwrap();

        for _ in 0..5 {
            assert!(limiter.is_event_ok().unwrap());
            limiter.event().unwrap();
        }
        assert!(!limiter.is_event_ok().unwrap());
    }

    #[test]
    fn window_reopens_exactly_at_interval() {
        let clock = SimulatedClock::new(1000);
        let limiter = RateLimiter::new(3, 50, clock.clone()).unwrap();
        for _ in 0..3 {
            limiter.event().unwrap();
        }

        clock.step(49);
        assert!(!limiter.is_event_ok().unwrap());
        assert_eq!(limiter.time_until_event_ok().unwrap(), 1);

        clock.step(1);
        assert!(limiter.is_event_ok().unwrap());
        assert_eq!(limiter.time_until_event_ok().unwrap(), 0);
    }

    #[test]
    fn two_events_per_window() {
        let clock = SimulatedClock::new(1000);
        let limiter = RateLimiter::new(2, 10, clock.clone()).unwrap();
        assert!(limiter.is_event_ok().unwrap());
        assert_eq!(limiter.time_until_event_ok().unwrap(), 0);
        limiter.event().unwrap();
        assert!(limiter.is_event_ok().unwrap());

        clock.step(5);
        assert!(limiter.is_event_ok().unwrap());
        limiter.event().unwrap();
        assert!(!limiter.is_event_ok().unwrap());
        assert_eq!(limiter.time_until_event_ok().unwrap(), 5);

        clock.step(4);
        assert!(!limiter.is_event_ok().unwrap());
        assert_eq!(limiter.time_until_event_ok().unwrap(), 1);

        clock.step(1);
        assert!(limiter.is_event_ok().unwrap());
        limiter.event().unwrap();
        assert!(!limiter.is_event_ok().unwrap());
        assert_eq!(limiter.time_until_event_ok().unwrap(), 5);

        limiter.unevent();
        assert!(limiter.is_event_ok().unwrap());
        assert_eq!(limiter.time_until_event_ok().unwrap(), 0);
        limiter.event().unwrap();
        assert!(!limiter.is_event_ok().unwrap());
        assert_eq!(limiter.time_until_event_ok().unwrap(), 5);
    }

    #[test]
    fn time_until_event_ok_counts_down() {
        let clock = SimulatedClock::new(0);
        let limiter = RateLimiter::new(1, 30, clock.clone()).unwrap();
        limiter.event().unwrap();

        let mut previous = limiter.time_until_event_ok().unwrap();
        assert_eq!(previous, 30);
        for _ in 0..40 {
            clock.step(1);
            let next = limiter.time_until_event_ok().unwrap();
            assert!(next <= previous);
            previous = next;
        }
        assert_eq!(previous, 0);
    }

    #[test]
    fn only_the_last_limit_events_are_remembered() {
        let clock = SimulatedClock::new(0);
        let limiter = RateLimiter::new(2, 100, clock.clone()).unwrap();
        for _ in 0..10 {
            limiter.event().unwrap();
            clock.step(10);
        }
        assert_eq!(limiter.recorded_events(), 2);
        // newest two at t=80 and t=90, now t=100
        assert_eq!(limiter.time_until_event_ok().unwrap(), 80);
    }

    #[test]
    fn unlimited_never_limits() {
        let clock = SimulatedClock::new(0);
        let limiter = RateLimiter::from_rate_str("Unlimited", clock).unwrap();
        assert!(limiter.is_unlimited());
        assert!(limiter.is_modifiable());
        assert_eq!(limiter.limit(), 0);
        assert_eq!(limiter.interval(), 0);

        assert!(limiter.is_event_ok().unwrap());
        assert_eq!(limiter.time_until_event_ok().unwrap(), 0);
        assert!(limiter.wait_until_event_ok(&Interrupt::new()).unwrap());
        for _ in 0..1000 {
            limiter.event().unwrap();
        }
        assert!(limiter.is_event_ok().unwrap());
        assert_eq!(limiter.time_until_event_ok().unwrap(), 0);
        limiter.unevent();
        assert!(limiter.is_event_ok().unwrap());
        assert_eq!(limiter.recorded_events(), 0);
    }

    #[test]
    fn shared_between_threads() {
        use std::sync::Arc;
        use std::thread;

        let clock = SimulatedClock::new(0);
        let limiter = Arc::new(RateLimiter::new(100, 1000, clock).unwrap());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                thread::spawn(move || {
                    for _ in 0..25 {
                        limiter.event().unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(limiter.recorded_events(), 100);
        assert!(!limiter.is_event_ok().unwrap());
    }

    #[test]
    fn huge_limits_do_not_preallocate() {
        let clock = SimulatedClock::new(1000);
        let limiter = RateLimiter::new(u32::MAX, 1000, clock.clone()).unwrap();
        for _ in 0..3 {
            limiter.event().unwrap();
            clock.step(1);
        }
        assert_eq!(limiter.recorded_events(), 3);
        assert!(limiter.is_event_ok().unwrap());

        limiter.set_rate(u32::MAX - 1, 2000).unwrap();
        assert_eq!(limiter.recorded_events(), 3);
        assert!(limiter.is_event_ok().unwrap());
        limiter.event().unwrap();
        assert_eq!(limiter.recorded_events(), 4);

        limiter.set_rate_str("4000000000/1s").unwrap();
        assert_eq!(limiter.limit(), 4_000_000_000);
        assert_eq!(limiter.recorded_events(), 4);
    }
}

// tests/ratelimiter/rate_string_tests.rs

#[cfg(test)]
mod tests {
    use window_limiter::{RateLimiter, SimulatedClock, UNLIMITED};

    #[test]
    fn numeric_construction_reports_canonical_rate() {
        let limiter = RateLimiter::new(10, 100, SimulatedClock::new(0)).unwrap();
        assert_eq!(limiter.limit(), 10);
        assert_eq!(limiter.interval(), 100);
        assert_eq!(limiter.rate(), "10/100ms");
        assert!(limiter.is_rate(10, 100));
        assert!(!limiter.is_rate(1, 100));
        assert!(!limiter.is_rate(10, 1000));
        assert!(limiter.is_rate_str("10/100ms"));
        assert!(!limiter.is_rate_str("10/100"));
        assert!(!limiter.is_unlimited());
        assert!(limiter.is_modifiable());
    }

    #[test]
    fn string_construction_keeps_the_string() {
        let limiter = RateLimiter::from_rate_str("10/100", SimulatedClock::new(0)).unwrap();
        assert_eq!(limiter.limit(), 10);
        assert_eq!(limiter.interval(), 100);
        assert_eq!(limiter.rate(), "10/100");
        assert!(limiter.is_rate(10, 100));
        assert!(limiter.is_rate_str("10/100"));
        assert!(!limiter.is_rate_str("10/100ms"));
    }

    #[test]
    fn units_scale_the_interval() {
        let limiter = RateLimiter::from_rate_str("7/3s", SimulatedClock::new(0)).unwrap();
        assert_eq!(limiter.limit(), 7);
        assert_eq!(limiter.interval(), 3000);
        assert_eq!(limiter.rate(), "7/3s");
        assert_eq!(limiter.rate_string(), "7/3000ms");

        let limiter = RateLimiter::from_rate_str("22/33000", SimulatedClock::new(0)).unwrap();
        assert_eq!(limiter.rate_string(), "22/33s");
        assert_eq!(limiter.rate(), "22/33000");
    }

    #[test]
    fn unlimited_string_round_trips() {
        let limiter = RateLimiter::from_rate_str("unlimited", SimulatedClock::new(0)).unwrap();
        assert_eq!(limiter.rate(), "unlimited");
        assert_eq!(limiter.rate_string(), "unlimited");
        assert_eq!(UNLIMITED.rate(), "unlimited");
    }

    #[test]
    fn rate_follows_set_rate() {
        let clock = SimulatedClock::new(0);
        let limiter = RateLimiter::new(4, 10, clock.clone()).unwrap();
        assert_eq!(limiter.rate(), "4/10ms");
        limiter.set_rate_str("4/10").unwrap();
        assert_eq!(limiter.rate(), "4/10");
        limiter.set_rate(10, 50_000).unwrap();
        assert_eq!(limiter.rate(), "10/50s");

        let limiter = RateLimiter::from_rate_str("4/10", clock).unwrap();
        assert_eq!(limiter.rate(), "4/10");
        limiter.set_rate(70, 10_000).unwrap();
        assert_eq!(limiter.rate(), "70/10s");
    }

    #[test]
    fn display_wraps_the_rate() {
        let limiter = RateLimiter::from_rate_str("7/3s", SimulatedClock::new(0)).unwrap();
        assert_eq!(limiter.to_string(), "[RL: 7/3s]");
        let limiter = RateLimiter::new(2, 123, SimulatedClock::new(0)).unwrap();
        assert_eq!(format!("{limiter}"), "[RL: 2/123ms]");
    }
}

//! Per-severity rate limiting
//!
//! Counts emissions inside a fixed window per severity and drops
//! everything past the configured maximum. Usable both as the logger's
//! built-in gate and as a reusable [`Middleware`] stage.

use super::error::{LoggerError, Result};
use super::level::Severity;
use super::middleware::Middleware;
use super::record::Record;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct RateWindow {
    count: u64,
    max_count: u64,
    interval: Duration,
    window_start: Instant,
}

/// Windowed per-severity rate limiter.
///
/// Each severity gets its own lock so contention on a chatty level does
/// not slow the others.
#[derive(Debug, Default)]
pub struct RateLimiter {
    limits: RwLock<HashMap<Severity, Mutex<RateWindow>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure `level` to admit at most `max_count` records per
    /// `interval`. Replaces any previous window for that level.
    pub fn set(&self, level: Severity, max_count: u64, interval: Duration) -> &Self {
        self.limits.write().insert(
            level,
            Mutex::new(RateWindow {
                count: 0,
                max_count,
                interval,
                window_start: Instant::now(),
            }),
        );
        self
    }

    /// Admission check for one emission at `level`.
    ///
    /// Increments the window counter before comparing, so a maximum of
    /// zero drops every record.
    pub fn allow(&self, level: Severity) -> bool {
        let limits = self.limits.read();
        let Some(window) = limits.get(&level) else {
            return true;
        };

        let mut window = window.lock();
        let now = Instant::now();
        if now.duration_since(window.window_start) >= window.interval {
            window.window_start = now;
            window.count = 0;
        }
        window.count += 1;
        window.count <= window.max_count
    }

    /// Whether any window is configured at all; lets callers skip the
    /// gate entirely on the hot path.
    pub fn is_configured(&self) -> bool {
        !self.limits.read().is_empty()
    }
}

impl Middleware for RateLimiter {
    fn handle(&self, record: &mut Record) -> Result<()> {
        if self.allow(record.level) {
            Ok(())
        } else {
            Err(LoggerError::RateLimited {
                level: record.level,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_unconfigured_level_passes() {
        let limiter = RateLimiter::new();
        for _ in 0..100 {
            assert!(limiter.allow(Severity::Info));
        }
    }

    #[test]
    fn test_window_admits_up_to_max() {
        let limiter = RateLimiter::new();
        limiter.set(Severity::Info, 2, Duration::from_secs(60));

        assert!(limiter.allow(Severity::Info));
        assert!(limiter.allow(Severity::Info));
        assert!(!limiter.allow(Severity::Info));
        assert!(!limiter.allow(Severity::Info));
        // Other severities are untouched
        assert!(limiter.allow(Severity::Warn));
    }

    #[test]
    fn test_window_resets_after_interval() {
        let limiter = RateLimiter::new();
        limiter.set(Severity::Info, 1, Duration::from_millis(20));

        assert!(limiter.allow(Severity::Info));
        assert!(!limiter.allow(Severity::Info));

        thread::sleep(Duration::from_millis(30));
        assert!(limiter.allow(Severity::Info));
    }

    #[test]
    fn test_zero_max_drops_everything() {
        let limiter = RateLimiter::new();
        limiter.set(Severity::Error, 0, Duration::from_secs(1));
        for _ in 0..10 {
            assert!(!limiter.allow(Severity::Error));
        }
    }

    #[test]
    fn test_middleware_signals_drop() {
        let limiter = RateLimiter::new();
        limiter.set(Severity::Info, 1, Duration::from_secs(60));

        let mut record = Record::new(Severity::Info, "first");
        assert!(limiter.handle(&mut record).is_ok());
        let mut record = Record::new(Severity::Info, "second");
        assert!(matches!(
            limiter.handle(&mut record),
            Err(LoggerError::RateLimited { .. })
        ));
    }

    #[test]
    fn test_concurrent_allow_counts_exactly() {
        use std::sync::atomic::{AtomicU64, Ordering};
        use std::sync::Arc;

        let limiter = Arc::new(RateLimiter::new());
        limiter.set(Severity::Info, 50, Duration::from_secs(60));
        let admitted = Arc::new(AtomicU64::new(0));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let limiter = Arc::clone(&limiter);
            let admitted = Arc::clone(&admitted);
            handles.push(thread::spawn(move || {
                for _ in 0..50 {
                    if limiter.allow(Severity::Info) {
                        admitted.fetch_add(1, Ordering::Relaxed);
                    }
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(admitted.load(Ordering::Relaxed), 50);
    }
}

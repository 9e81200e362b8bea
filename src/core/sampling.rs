//! Per-severity probabilistic sampling
//!
//! Each severity can carry an admit probability in `[0.0, 1.0]`; a
//! uniform draw in `[0, 1)` below the probability admits the record.
//! Rate 0.0 therefore drops everything and 1.0 admits everything.

use super::error::{LoggerError, Result};
use super::level::Severity;
use super::middleware::Middleware;
use super::record::Record;
use parking_lot::RwLock;
use rand::Rng;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Per-severity sampler, usable as the logger's built-in gate or as a
/// reusable [`Middleware`] stage.
#[derive(Debug, Default)]
pub struct Sampler {
    rates: RwLock<HashMap<Severity, f64>>,
    dropped: AtomicU64,
}

impl Sampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the admit probability for `level`, clamped to `[0.0, 1.0]`.
    pub fn set(&self, level: Severity, rate: f64) -> &Self {
        self.rates.write().insert(level, rate.clamp(0.0, 1.0));
        self
    }

    /// Admission check for one emission at `level`.
    pub fn allow(&self, level: Severity) -> bool {
        let rate = match self.rates.read().get(&level) {
            Some(&rate) => rate,
            None => return true,
        };

        // Avoid the RNG on the trivial rates
        if rate >= 1.0 {
            return true;
        }
        if rate <= 0.0 {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        if rand::thread_rng().gen::<f64>() < rate {
            true
        } else {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            false
        }
    }

    /// Number of records rejected so far.
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn is_configured(&self) -> bool {
        !self.rates.read().is_empty()
    }
}

impl Middleware for Sampler {
    fn handle(&self, record: &mut Record) -> Result<()> {
        if self.allow(record.level) {
            Ok(())
        } else {
            Err(LoggerError::SamplingRejected {
                level: record.level,
            })
        }
    }
}

//! Deduplicating handler
//!
//! Suppresses records whose content fingerprint was already forwarded
//! within the TTL. The fingerprint covers severity, namespace, message
//! and the ordered field list; timestamps are deliberately excluded so
//! repeats of the same event collapse.

use crate::core::{Handler, Record, Result};
use parking_lot::Mutex;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::Hasher;
use std::sync::Arc;
use std::time::{Duration, Instant};

const SHARD_COUNT: usize = 16;

/// Shard eviction threshold: once a shard grows past this, expired
/// entries are swept during the insert that noticed it.
const EVICT_WATERMARK: usize = 128;

/// TTL-based duplicate suppressor in front of a downstream handler.
pub struct Dedup {
    inner: Arc<dyn Handler>,
    ttl: Duration,
    shards: Vec<Mutex<HashMap<u64, Instant>>>,
}

impl Dedup {
    pub fn new(handler: impl Handler + 'static, ttl: Duration) -> Self {
        Self::from_shared(Arc::new(handler), ttl)
    }

    pub fn from_shared(handler: Arc<dyn Handler>, ttl: Duration) -> Self {
        Self {
            inner: handler,
            ttl,
            shards: (0..SHARD_COUNT).map(|_| Mutex::new(HashMap::new())).collect(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Deterministic content hash; identical record content yields the
    /// same fingerprint on any thread.
    fn fingerprint(record: &Record) -> u64 {
        // DefaultHasher::new() uses fixed keys, unlike HashMap's
        // per-instance RandomState.
        let mut hasher = DefaultHasher::new();
        hasher.write_u8(record.level as u8);
        hasher.write(record.namespace.as_bytes());
        hasher.write_u8(0xff);
        hasher.write(record.message.as_bytes());
        hasher.write_u8(0xff);
        for field in record.fields.iter() {
            hasher.write(field.key.as_bytes());
            hasher.write_u8(0xfe);
            field.value.hash_into(&mut hasher);
        }
        hasher.finish()
    }
}

impl Handler for Dedup {
    fn handle(&self, record: &Record) -> Result<()> {
        let fingerprint = Self::fingerprint(record);
        let shard = &self.shards[fingerprint as usize % SHARD_COUNT];
        let now = Instant::now();

        {
            let mut seen = shard.lock();
            if let Some(expiry) = seen.get(&fingerprint) {
                if *expiry > now {
                    return Ok(());
                }
            }
            seen.insert(fingerprint, now + self.ttl);
            if seen.len() > EVICT_WATERMARK {
                seen.retain(|_, expiry| *expiry > now);
            }
        }

        self.inner.handle(record)
    }
}

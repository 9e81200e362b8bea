//! Hierarchical namespace enable/disable store
//!
//! Paths are slash-joined UTF-8 segments; the empty path is the root.
//! The store keeps explicit per-path decisions plus a cache of computed
//! effective states so the hot emission path usually costs one read.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

pub(crate) const SEPARATOR: &str = "/";

/// Process-wide store shared by every logger created through the root
/// factory or the global logger.
static DEFAULT_STORE: Lazy<Arc<NamespaceStore>> = Lazy::new(|| Arc::new(NamespaceStore::new()));

/// Thread-safe store of explicit namespace states with a derived-state
/// cache.
///
/// A path with no explicit entry inherits from the nearest ancestor
/// that has one; the deepest explicit ancestor wins, so a child can
/// re-enable underneath a disabled subtree. With no explicit ancestor
/// at all, the default is enabled.
#[derive(Debug, Default)]
pub struct NamespaceStore {
    explicit: RwLock<HashMap<String, bool>>,
    cache: RwLock<HashMap<String, bool>>,
}

impl NamespaceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared default store.
    pub fn shared() -> Arc<NamespaceStore> {
        Arc::clone(&DEFAULT_STORE)
    }

    /// Record an explicit enable/disable decision for `path`.
    ///
    /// Invalidates the cached state of `path` and of every cached
    /// descendant so later [`is_enabled`](Self::is_enabled) calls on any
    /// thread observe the new decision.
    pub fn set_explicit(&self, path: &str, enabled: bool) {
        self.explicit.write().insert(path.to_string(), enabled);

        let prefix = format!("{}{}", path, SEPARATOR);
        let mut cache = self.cache.write();
        cache.remove(path);
        cache.retain(|key, _| !key.starts_with(&prefix));
    }

    /// Effective enabled state of `path`.
    pub fn is_enabled(&self, path: &str) -> bool {
        if path.is_empty() {
            return true;
        }

        if let Some(&enabled) = self.cache.read().get(path) {
            return enabled;
        }

        let enabled = self.evaluate(path);
        self.cache.write().insert(path.to_string(), enabled);
        enabled
    }

    /// Walk prefixes from root to leaf; the last explicit value seen is
    /// the effective state, defaulting to enabled.
    fn evaluate(&self, path: &str) -> bool {
        let explicit = self.explicit.read();
        let mut enabled = true;
        let mut end = 0;
        let parts = path.split(SEPARATOR);
        for part in parts {
            end += part.len();
            if let Some(&value) = explicit.get(&path[..end]) {
                enabled = value;
            }
            end += SEPARATOR.len();
        }
        enabled
    }

    /// Explicit state of `path` if one was recorded (no hierarchy walk).
    pub fn explicit_state(&self, path: &str) -> Option<bool> {
        self.explicit.read().get(path).copied()
    }
}

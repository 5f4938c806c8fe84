use std::collections::HashMap;

use parking_lot::Mutex;
use serde_json::Value;

/// Per-evaluation memoization of resolved variable values, keyed by name.
///
/// A `Cache` lives for exactly one logical evaluation pass: construct a fresh
/// one per request and discard it afterwards. Sharing an instance across
/// distinct evaluations would leak memoized values between them. Concurrent
/// get/put from within the same evaluation is safe.
#[derive(Debug)]
pub struct Cache {
    enabled: bool,
    values: Mutex<HashMap<String, Value>>,
}

impl Cache {
    /// An enabled cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            enabled: true,
            values: Mutex::new(HashMap::new()),
        }
    }

    /// A cache that stores nothing; every variable resolves fresh.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            values: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Look up a memoized value, cloning it out.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        if !self.enabled {
            return None;
        }
        self.values.lock().get(name).cloned()
    }

    /// Memoize a value. Silently dropped when the cache is disabled.
    pub fn put(&self, name: &str, value: Value) {
        if self.enabled {
            self.values.lock().insert(name.to_owned(), value);
        }
    }

    /// Number of memoized entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

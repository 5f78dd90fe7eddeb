use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};

/// Sliding-window limiter for contact submissions, keyed by e.g. `"contact:<ip_hash>"`.
pub struct RateLimiter {
    hits: Mutex<HashMap<String, Vec<Instant>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        RateLimiter {
            hits: Mutex::new(HashMap::new()),
        }
    }

    /// Record an attempt; false once `max_attempts` already fell inside `window`.
    pub fn check_and_record(&self, key: &str, max_attempts: u64, window: Duration) -> bool {
        let mut map = match self.hits.lock() {
            Ok(m) => m,
            Err(poisoned) => poisoned.into_inner(),
        };
        let now = Instant::now();
        let hits = map.entry(key.to_string()).or_default();
        hits.retain(|t| now.duration_since(*t) < window);

        if (hits.len() as u64) < max_attempts {
            hits.push(now);
            true
        } else {
            false
        }
    }

    /// Drop keys with no hits younger than `max_age`.
    pub fn cleanup(&self, max_age: Duration) {
        let mut map = match self.hits.lock() {
            Ok(m) => m,
            Err(poisoned) => poisoned.into_inner(),
        };
        let now = Instant::now();
        map.retain(|_, hits| {
            hits.retain(|t| now.duration_since(*t) < max_age);
            !hits.is_empty()
        });
    }

    pub fn tracked_keys(&self) -> usize {
        self.hits.lock().map(|m| m.len()).unwrap_or(0)
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

pub fn hash_ip(ip: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(ip.as_bytes());
    hex::encode(hasher.finalize())
}

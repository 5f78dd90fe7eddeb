use std::collections::HashMap;
use std::sync::Mutex;

use rocket::http::{Cookie, CookieJar, SameSite};

/// Durable per-origin key-value storage for visitor preferences.
/// Implementations: `CookieStore` (per-request cookie jar) and `MemoryStore`.
pub trait PrefStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), String>;
}

impl<T: PrefStore + ?Sized> PrefStore for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        (**self).set(key, value)
    }
}

// ── Cookies ───────────────────────────────────────────

/// Preferences kept in permanent, site-wide cookies so they survive across visits.
pub struct CookieStore<'a, 'r> {
    jar: &'a CookieJar<'r>,
}

impl<'a, 'r> CookieStore<'a, 'r> {
    pub fn new(jar: &'a CookieJar<'r>) -> Self {
        CookieStore { jar }
    }
}

impl PrefStore for CookieStore<'_, '_> {
    fn get(&self, key: &str) -> Option<String> {
        self.jar.get(key).map(|c| c.value().to_string())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        let cookie = Cookie::build((key.to_string(), value.to_string()))
            .path("/")
            .same_site(SameSite::Lax)
            .permanent();
        self.jar.add(cookie);
        Ok(())
    }
}

// ── Memory ────────────────────────────────────────────

/// In-process storage. `unavailable()` builds one that refuses every write,
/// the way a browser with storage disabled does.
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    writable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            entries: Mutex::new(HashMap::new()),
            writable: true,
        }
    }

    pub fn unavailable() -> Self {
        MemoryStore {
            entries: Mutex::new(HashMap::new()),
            writable: false,
        }
    }

    /// Seed a raw value, bypassing the writable check.
    pub fn insert(&self, key: &str, value: &str) {
        if let Ok(mut map) = self.entries.lock() {
            map.insert(key.to_string(), value.to_string());
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        if !self.writable {
            return Err("storage unavailable".into());
        }
        let mut map = self.entries.lock().map_err(|e| e.to_string())?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

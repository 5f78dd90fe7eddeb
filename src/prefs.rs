use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ThemeConfig;
use crate::store::PrefStore;

/// Light/dark presentation mode, independent of the theme palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    Light,
    Dark,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Light => "light",
            Scheme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Scheme {
        match self {
            Scheme::Light => Scheme::Dark,
            Scheme::Dark => Scheme::Light,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = String;

    /// Exact match only: `"Dark"` or `" dark"` are not schemes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Scheme::Light),
            "dark" => Ok(Scheme::Dark),
            other => Err(format!("Unknown scheme '{}'", other)),
        }
    }
}

/// Visitor's theme and scheme choice, validated on the way in and out.
/// Reads fall back to defaults without writing them back; writes never fail loudly.
pub struct PreferenceStore<'a, S: PrefStore> {
    store: S,
    themes: &'a ThemeConfig,
}

impl<'a, S: PrefStore> PreferenceStore<'a, S> {
    pub fn new(store: S, themes: &'a ThemeConfig) -> Self {
        PreferenceStore { store, themes }
    }

    pub fn get_theme(&self) -> String {
        match self.store.get(&self.themes.storage_key) {
            Some(saved) if self.themes.is_valid(&saved) => saved,
            _ => self.themes.default.clone(),
        }
    }

    pub fn get_scheme(&self) -> Scheme {
        self.store
            .get(&self.themes.scheme_key)
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }

    /// Returns false for an unrecognised id. Storage failures are only logged.
    pub fn set_theme(&self, id: &str) -> bool {
        if !self.themes.is_valid(id) {
            return false;
        }
        if let Err(e) = self.store.set(&self.themes.storage_key, id) {
            log::warn!("Could not persist theme '{}': {}", id, e);
        }
        true
    }

    pub fn set_scheme(&self, scheme: Scheme) {
        if let Err(e) = self.store.set(&self.themes.scheme_key, scheme.as_str()) {
            log::warn!("Could not persist scheme '{}': {}", scheme, e);
        }
    }
}

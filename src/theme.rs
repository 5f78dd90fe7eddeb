use std::collections::BTreeMap;

use crate::config::{Theme, ThemeConfig};
use crate::events::{EventBus, SiteEvent};
use crate::prefs::{PreferenceStore, Scheme};
use crate::render::html_escape;
use crate::store::PrefStore;

pub const THEME_ATTR: &str = "data-theme";
pub const SCHEME_ATTR: &str = "data-scheme";

/// Presentation-selector attributes on the document root (`<html>`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RootAttributes {
    attrs: BTreeMap<String, String>,
}

impl RootAttributes {
    pub fn set(&mut self, name: &str, value: &str) {
        self.attrs.insert(name.to_string(), value.to_string());
    }

    pub fn remove(&mut self, name: &str) {
        self.attrs.remove(name);
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(|v| v.as_str())
    }

    /// Rendered for splicing into a start tag: ` data-scheme="dark" data-theme="x"`.
    pub fn render(&self) -> String {
        self.attrs
            .iter()
            .map(|(k, v)| format!(" {}=\"{}\"", k, html_escape(v)))
            .collect()
    }
}

/// Single authority for the page's visual identity. Applies theme and scheme
/// to the root attributes, persists them, and announces every change on the bus.
pub struct ThemeController<'a, S: PrefStore> {
    themes: &'a ThemeConfig,
    prefs: PreferenceStore<'a, S>,
    bus: &'a EventBus,
    root: RootAttributes,
    theme: String,
    scheme: Scheme,
}

impl<'a, S: PrefStore> ThemeController<'a, S> {
    pub fn new(themes: &'a ThemeConfig, store: S, bus: &'a EventBus) -> Self {
        let prefs = PreferenceStore::new(store, themes);
        let theme = prefs.get_theme();
        let scheme = prefs.get_scheme();
        let mut controller = ThemeController {
            themes,
            prefs,
            bus,
            root: RootAttributes::default(),
            theme: theme.clone(),
            scheme,
        };
        controller.apply_theme(&theme);
        controller.apply_scheme(scheme);
        controller
    }

    /// Unknown ids are ignored: nothing is set, persisted or emitted.
    pub fn apply_theme(&mut self, id: &str) -> bool {
        if !self.themes.is_valid(id) {
            log::warn!("Ignoring unknown theme '{}'", id);
            return false;
        }
        self.root.set(THEME_ATTR, id);
        self.prefs.set_theme(id);
        self.theme = id.to_string();
        self.bus.emit(&SiteEvent::ThemeChanged {
            theme: id.to_string(),
        });
        true
    }

    pub fn apply_scheme(&mut self, scheme: Scheme) {
        match scheme {
            Scheme::Dark => self.root.set(SCHEME_ATTR, scheme.as_str()),
            Scheme::Light => self.root.remove(SCHEME_ATTR),
        }
        self.prefs.set_scheme(scheme);
        self.scheme = scheme;
        self.bus.emit(&SiteEvent::SchemeChanged { scheme });
    }

    pub fn toggle_scheme(&mut self) -> Scheme {
        let next = self.scheme.toggled();
        self.apply_scheme(next);
        next
    }

    pub fn theme_id(&self) -> &str {
        &self.theme
    }

    pub fn theme(&self) -> Option<&Theme> {
        self.themes.find(&self.theme)
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn root(&self) -> &RootAttributes {
        &self.root
    }
}

/// CSS custom properties for every palette, scoped by the theme attribute.
pub fn palette_css(themes: &ThemeConfig) -> String {
    let mut css = String::new();
    for theme in &themes.themes {
        css.push_str(&format!(
            "[{}=\"{}\"] {{\n",
            THEME_ATTR,
            theme.id.replace('"', "")
        ));
        for (name, value) in theme.colors.entries() {
            css.push_str(&format!("  --color-{}: {};\n", name, value));
        }
        css.push_str("}\n");
    }
    css
}

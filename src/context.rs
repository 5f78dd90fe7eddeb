use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::config::SiteConfig;
use crate::events::{EventBus, EventKind, SiteEvent};
use crate::layout::{AssetScripts, DirFragments, FragmentSource, LayoutComposer, ScriptLoader};
use crate::rate_limit::RateLimiter;
use crate::relay::{MailRelay, WebAppRelay};
use crate::store::PrefStore;
use crate::theme::ThemeController;

/// Everything a request needs, built once at startup and shared through
/// Rocket managed state.
pub struct AppContext {
    pub config: SiteConfig,
    pub bus: EventBus,
    pub limiter: RateLimiter,
    pub fragments: Box<dyn FragmentSource>,
    pub scripts: Box<dyn ScriptLoader>,
    pub relay: Arc<dyn MailRelay>,
}

impl AppContext {
    /// Wire the on-disk fragment source, asset scripts and web relay.
    pub fn new(config: SiteConfig) -> Self {
        let fragments = Box::new(DirFragments::new(config.components_dir()));
        let scripts = Box::new(AssetScripts::new(&config.site.root));
        let relay = Arc::new(WebAppRelay::new(&config.contact.endpoint));
        Self::with_parts(config, fragments, scripts, relay)
    }

    pub fn with_parts(
        config: SiteConfig,
        fragments: Box<dyn FragmentSource>,
        scripts: Box<dyn ScriptLoader>,
        relay: Arc<dyn MailRelay>,
    ) -> Self {
        let bus = EventBus::new();
        bus.on(EventKind::ThemeChanged, |e| {
            if let SiteEvent::ThemeChanged { theme } = e {
                log::debug!("themeChanged: {}", theme);
            }
        });
        bus.on(EventKind::SchemeChanged, |e| {
            if let SiteEvent::SchemeChanged { scheme } = e {
                log::debug!("schemeChanged: {}", scheme);
            }
        });
        AppContext {
            config,
            bus,
            limiter: RateLimiter::new(),
            fragments,
            scripts,
            relay,
        }
    }

    pub fn composer(&self) -> LayoutComposer<'_> {
        LayoutComposer::new(
            &self.config.layout,
            self.fragments.as_ref(),
            self.scripts.as_ref(),
        )
    }

    pub fn theme_controller<S: PrefStore>(&self, store: S) -> ThemeController<'_, S> {
        ThemeController::new(&self.config.themes, store, &self.bus)
    }

    /// Raw markup of a page under `pages/`. Only plain `*.html` names are served.
    pub fn read_page(&self, name: &str) -> Option<String> {
        if !name.ends_with(".html") || name.starts_with('.') || name.contains(['/', '\\']) {
            return None;
        }
        let path = Path::new(&self.config.pages_dir()).join(name);
        fs::read_to_string(path).ok()
    }
}

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::prefs::Scheme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    ThemeChanged,
    SchemeChanged,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::ThemeChanged => "themeChanged",
            EventKind::SchemeChanged => "schemeChanged",
        }
    }
}

/// Page-wide notification. Serializes to the bare payload,
/// e.g. `{"theme":"cyberpunk"}` or `{"scheme":"dark"}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SiteEvent {
    ThemeChanged { theme: String },
    SchemeChanged { scheme: Scheme },
}

impl SiteEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            SiteEvent::ThemeChanged { .. } => EventKind::ThemeChanged,
            SiteEvent::SchemeChanged { .. } => EventKind::SchemeChanged,
        }
    }
}

pub type Handler = Arc<dyn Fn(&SiteEvent) + Send + Sync>;

/// Synchronous publish/subscribe bus. Handlers run to completion on the
/// emitting thread, in registration order.
#[derive(Default)]
pub struct EventBus {
    handlers: Mutex<Vec<(EventKind, Handler)>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(&self, kind: EventKind, handler: F)
    where
        F: Fn(&SiteEvent) + Send + Sync + 'static,
    {
        match self.handlers.lock() {
            Ok(mut list) => list.push((kind, Arc::new(handler))),
            Err(e) => log::error!("Event bus poisoned, dropping {} handler: {}", kind.as_str(), e),
        }
    }

    /// Returns the number of handlers that ran.
    pub fn emit(&self, event: &SiteEvent) -> usize {
        let kind = event.kind();
        // Snapshot so a handler can register more handlers without deadlocking.
        let matching: Vec<Handler> = match self.handlers.lock() {
            Ok(list) => list
                .iter()
                .filter(|(k, _)| *k == kind)
                .map(|(_, h)| Arc::clone(h))
                .collect(),
            Err(_) => return 0,
        };
        for handler in &matching {
            handler(event);
        }
        matching.len()
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.lock().map(|l| l.len()).unwrap_or(0)
    }
}

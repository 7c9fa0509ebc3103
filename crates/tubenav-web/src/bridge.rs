#![forbid(unsafe_code)]

//! DOM-independent pieces of the browser glue.
//!
//! Everything here takes plain Rust values so it runs in native tests; the
//! wasm modules only extract those values from `web-sys` objects.

use serde::{Deserialize, Serialize};
use tracing::{Level, warn};
use tubenav_agent::NavConfig;
use tubenav_core::event::{KeyEvent, KeyEventKind, Modifiers, normalize_dom_key};
use tubenav_core::relay::{CommandRelay, DEFAULT_ALLOWED_PREFIXES, DEFAULT_OPEN_TAB_PREFIXES};

/// `id` of the toast element the page host creates.
pub const TOAST_ELEMENT_ID: &str = "tubenav-toast";

/// Inline style of the toast element.
pub const TOAST_STYLE: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("left", "50%"),
    ("bottom", "48px"),
    ("transform", "translateX(-50%)"),
    ("z-index", "2147483647"),
    ("padding", "8px 16px"),
    ("border-radius", "8px"),
    ("background", "rgba(0, 0, 0, 0.8)"),
    ("color", "#fff"),
    ("font", "500 14px Roboto, Arial, sans-serif"),
    ("pointer-events", "none"),
];

/// Fields of a DOM `KeyboardEvent` the agent needs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyInput<'a> {
    pub key: &'a str,
    pub code: &'a str,
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub repeat: bool,
}

impl KeyInput<'_> {
    /// Normalize into a [`KeyEvent`]. Unknown keys yield `None`.
    #[must_use]
    pub fn to_key_event(&self) -> Option<KeyEvent> {
        let mods = Modifiers::from_dom(self.shift, self.alt, self.ctrl, self.meta);
        let code = normalize_dom_key(self.key, self.code, mods)?;
        let kind = if self.repeat {
            KeyEventKind::Repeat
        } else {
            KeyEventKind::Press
        };
        Some(KeyEvent::new(code).with_modifiers(mods).with_kind(kind))
    }
}

/// The focused element accepts text.
#[must_use]
pub fn is_editable(tag_name: &str, content_editable: bool) -> bool {
    content_editable
        || tag_name.eq_ignore_ascii_case("input")
        || tag_name.eq_ignore_ascii_case("textarea")
}

/// Page agent configuration from an optional JSON string.
///
/// A malformed string is logged and the defaults are used.
#[must_use]
pub fn load_nav_config(json: Option<&str>) -> NavConfig {
    let Some(json) = json.filter(|s| !s.trim().is_empty()) else {
        return NavConfig::default();
    };
    NavConfig::from_json(json).unwrap_or_else(|err| {
        warn!(error = %err, "invalid navigation config; using defaults");
        NavConfig::default()
    })
}

/// Background relay settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Tabs that receive playback commands.
    pub allowed_prefixes: Vec<String>,
    /// URLs pages may open in background tabs.
    pub open_tab_prefixes: Vec<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            allowed_prefixes: owned(DEFAULT_ALLOWED_PREFIXES),
            open_tab_prefixes: owned(DEFAULT_OPEN_TAB_PREFIXES),
        }
    }
}

impl RelayConfig {
    /// Parse an optional JSON string, falling back to defaults with a warning.
    #[must_use]
    pub fn load(json: Option<&str>) -> Self {
        let Some(json) = json.filter(|s| !s.trim().is_empty()) else {
            return Self::default();
        };
        serde_json::from_str(json).unwrap_or_else(|err| {
            warn!(error = %err, "invalid relay config; using defaults");
            Self::default()
        })
    }

    #[must_use]
    pub fn into_relay(self) -> CommandRelay {
        CommandRelay::new(self.allowed_prefixes).with_open_tab_prefixes(self.open_tab_prefixes)
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// `console` method for a log level.
#[must_use]
pub fn console_method(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "error",
        Level::WARN => "warn",
        Level::INFO => "info",
        Level::DEBUG | Level::TRACE => "debug",
    }
}

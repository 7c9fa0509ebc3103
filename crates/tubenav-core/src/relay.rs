#![forbid(unsafe_code)]

//! Background command relay.
//!
//! Shortcut activations arrive in the background process with a command
//! identifier. The relay checks the active tab against a URL allow-list and
//! forwards a [`CommandMessage`] to that tab's page agent.
//!
//! # Invariants
//!
//! - A missing tab, tab id, or URL, or a URL outside the allow-list, drops the
//!   command silently (logged at `debug`).
//! - Delivery is fire-and-forget: a failure is logged with `warn!` and never
//!   retried or queued. The usual cause is a page loaded before the extension,
//!   which needs a reload.

use tracing::{debug, warn};

use crate::command::{CommandMessage, OpenTabRequest};
use crate::error::Result;

/// Default allow-list.
pub const DEFAULT_ALLOWED_PREFIXES: &[&str] = &["https://www.youtube.com/"];

/// URLs a page may ask the relay to open in a background tab.
pub const DEFAULT_OPEN_TAB_PREFIXES: &[&str] =
    &["https://www.youtube.com/", "https://studio.youtube.com/"];

/// What the relay knows about the active tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabInfo {
    pub id: Option<i32>,
    pub url: Option<String>,
}

impl TabInfo {
    /// Tab with both id and URL.
    #[must_use]
    pub fn new(id: i32, url: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            url: Some(url.into()),
        }
    }
}

/// A routed message, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub tab_id: i32,
    pub message: CommandMessage,
}

/// Why a command was not forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayDrop {
    NoTab,
    NoTabId,
    NoUrl,
    UrlNotAllowed,
}

/// Result of [`CommandRelay::relay`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    Sent { tab_id: i32 },
    Dropped(RelayDrop),
    DeliveryFailed { tab_id: i32 },
}

/// Transport to a tab's page agent.
pub trait MessageSink {
    /// Send `message` to `tab_id`.
    fn send(&self, tab_id: i32, message: &CommandMessage) -> Result<()>;
}

/// Routes shortcut commands to the active tab.
#[derive(Debug, Clone)]
pub struct CommandRelay {
    allowed_prefixes: Vec<String>,
    open_tab_prefixes: Vec<String>,
}

impl Default for CommandRelay {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_PREFIXES.iter().map(|p| (*p).to_string()))
    }
}

impl CommandRelay {
    /// Relay accepting tabs whose URL starts with one of `prefixes`.
    #[must_use]
    pub fn new(prefixes: impl IntoIterator<Item = String>) -> Self {
        Self {
            allowed_prefixes: prefixes.into_iter().collect(),
            open_tab_prefixes: DEFAULT_OPEN_TAB_PREFIXES
                .iter()
                .map(|p| (*p).to_string())
                .collect(),
        }
    }

    /// Replace the background-tab allow-list.
    #[must_use]
    pub fn with_open_tab_prefixes(mut self, prefixes: impl IntoIterator<Item = String>) -> Self {
        self.open_tab_prefixes = prefixes.into_iter().collect();
        self
    }

    /// Configured allow-list.
    #[must_use]
    pub fn allowed_prefixes(&self) -> &[String] {
        &self.allowed_prefixes
    }

    /// Check a URL against the allow-list.
    #[must_use]
    pub fn is_allowed(&self, url: &str) -> bool {
        self.allowed_prefixes
            .iter()
            .any(|prefix| url.starts_with(prefix.as_str()))
    }

    /// URL to open for a page's background-tab request, if permitted.
    #[must_use]
    pub fn open_tab_url<'a>(&self, request: &'a OpenTabRequest) -> Option<&'a str> {
        let url = request.url.as_str();
        let permitted = self
            .open_tab_prefixes
            .iter()
            .any(|prefix| url.starts_with(prefix.as_str()));
        if !permitted {
            debug!(url, "relay refused background tab");
            return None;
        }
        Some(url)
    }

    /// Decide where `command` goes.
    pub fn route(
        &self,
        command: &str,
        tab: Option<&TabInfo>,
    ) -> std::result::Result<Dispatch, RelayDrop> {
        let tab = tab.ok_or(RelayDrop::NoTab)?;
        let tab_id = tab.id.ok_or(RelayDrop::NoTabId)?;
        let url = tab.url.as_deref().ok_or(RelayDrop::NoUrl)?;
        if !self.is_allowed(url) {
            return Err(RelayDrop::UrlNotAllowed);
        }
        Ok(Dispatch {
            tab_id,
            message: CommandMessage::new(command),
        })
    }

    /// Route and send `command` through `sink`.
    pub fn relay<S: MessageSink + ?Sized>(
        &self,
        sink: &S,
        command: &str,
        tab: Option<&TabInfo>,
    ) -> RelayOutcome {
        let dispatch = match self.route(command, tab) {
            Ok(dispatch) => dispatch,
            Err(reason) => {
                debug!(command, ?reason, "relay dropped command");
                return RelayOutcome::Dropped(reason);
            }
        };

        let tab_id = dispatch.tab_id;
        match sink.send(tab_id, &dispatch.message) {
            Ok(()) => {
                debug!(command, tab_id, "relay sent command");
                RelayOutcome::Sent { tab_id }
            }
            Err(err) => {
                warn!(
                    command,
                    tab_id,
                    error = %err,
                    "page agent unreachable; reload the tab to enable shortcuts"
                );
                RelayOutcome::DeliveryFailed { tab_id }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::cell::RefCell;
    use std::sync::{Arc, Mutex};
    use tracing::{Level, Subscriber};
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::{Context, SubscriberExt};

    /// Records `(level, message)` of every event.
    #[derive(Clone, Default)]
    struct EventCapture {
        events: Arc<Mutex<Vec<(Level, String)>>>,
    }

    impl<S: Subscriber> Layer<S> for EventCapture {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            struct MessageVisitor(String);
            impl tracing::field::Visit for MessageVisitor {
                fn record_debug(
                    &mut self,
                    field: &tracing::field::Field,
                    value: &dyn std::fmt::Debug,
                ) {
                    if field.name() == "message" {
                        self.0 = format!("{value:?}");
                    }
                }
            }
            let mut visitor = MessageVisitor(String::new());
            event.record(&mut visitor);
            self.events
                .lock()
                .expect("event capture lock")
                .push((*event.metadata().level(), visitor.0));
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        sent: RefCell<Vec<(i32, CommandMessage)>>,
        fail: bool,
    }

    impl MessageSink for RecordingSink {
        fn send(&self, tab_id: i32, message: &CommandMessage) -> Result<()> {
            if self.fail {
                return Err(Error::Delivery {
                    tab_id,
                    reason: "Could not establish connection.".into(),
                });
            }
            self.sent.borrow_mut().push((tab_id, message.clone()));
            Ok(())
        }
    }

    #[test]
    fn routes_allowed_tab() {
        let relay = CommandRelay::default();
        let tab = TabInfo::new(3, "https://www.youtube.com/watch?v=abc");
        let dispatch = relay.route("yt-seek-forward", Some(&tab)).unwrap();
        assert_eq!(dispatch.tab_id, 3);
        assert_eq!(dispatch.message, CommandMessage::new("yt-seek-forward"));
    }

    #[test]
    fn drops_missing_or_foreign_tabs() {
        let relay = CommandRelay::default();
        assert_eq!(relay.route("x", None), Err(RelayDrop::NoTab));

        let no_id = TabInfo {
            id: None,
            url: Some("https://www.youtube.com/".into()),
        };
        assert_eq!(relay.route("x", Some(&no_id)), Err(RelayDrop::NoTabId));

        let no_url = TabInfo {
            id: Some(1),
            url: None,
        };
        assert_eq!(relay.route("x", Some(&no_url)), Err(RelayDrop::NoUrl));

        let foreign = TabInfo::new(1, "https://example.com/");
        assert_eq!(
            relay.route("x", Some(&foreign)),
            Err(RelayDrop::UrlNotAllowed)
        );
        let lookalike = TabInfo::new(1, "https://www.youtube.com.evil.test/");
        assert_eq!(
            relay.route("x", Some(&lookalike)),
            Err(RelayDrop::UrlNotAllowed)
        );
    }

    #[test]
    fn relay_sends_through_sink() {
        let relay = CommandRelay::default();
        let sink = RecordingSink::default();
        let tab = TabInfo::new(9, "https://www.youtube.com/");
        let outcome = relay.relay(&sink, "yt-toggle-play", Some(&tab));
        assert_eq!(outcome, RelayOutcome::Sent { tab_id: 9 });
        assert_eq!(sink.sent.borrow().len(), 1);
    }

    #[test]
    fn delivery_failure_is_reported_not_retried() {
        let relay = CommandRelay::default();
        let sink = RecordingSink {
            fail: true,
            ..Default::default()
        };
        let tab = TabInfo::new(9, "https://www.youtube.com/");
        let outcome = relay.relay(&sink, "yt-toggle-play", Some(&tab));
        assert_eq!(outcome, RelayOutcome::DeliveryFailed { tab_id: 9 });
        assert!(sink.sent.borrow().is_empty());
    }

    #[test]
    fn dropped_commands_never_reach_sink() {
        let relay = CommandRelay::new(["https://m.youtube.com/".to_string()]);
        let sink = RecordingSink::default();
        let tab = TabInfo::new(1, "https://www.youtube.com/");
        let outcome = relay.relay(&sink, "yt-toggle-play", Some(&tab));
        assert_eq!(outcome, RelayOutcome::Dropped(RelayDrop::UrlNotAllowed));
        assert!(sink.sent.borrow().is_empty());
    }

    #[test]
    fn open_tab_requests_are_allow_listed() {
        let relay = CommandRelay::default();
        let watch = OpenTabRequest::new("https://www.youtube.com/watch?v=1");
        assert_eq!(relay.open_tab_url(&watch), Some("https://www.youtube.com/watch?v=1"));
        let studio = OpenTabRequest::new("https://studio.youtube.com/channel/UC1");
        assert!(relay.open_tab_url(&studio).is_some());
        let foreign = OpenTabRequest::new("https://evil.example/");
        assert_eq!(relay.open_tab_url(&foreign), None);

        let strict = relay.with_open_tab_prefixes(Vec::new());
        assert_eq!(strict.open_tab_url(&watch), None);
    }

    #[test]
    fn delivery_failure_logs_a_warning() {
        let capture = EventCapture::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());
        let _guard = tracing::subscriber::set_default(subscriber);
        tracing::callsite::rebuild_interest_cache();

        let sink = RecordingSink {
            fail: true,
            ..Default::default()
        };
        let tab = TabInfo::new(4, "https://www.youtube.com/");
        CommandRelay::default().relay(&sink, "yt-seek-back", Some(&tab));

        let events = capture.events.lock().expect("event capture lock");
        assert!(
            events
                .iter()
                .any(|(level, msg)| *level == Level::WARN && msg.contains("reload the tab")),
            "expected a warning, got {events:?}"
        );
    }
}

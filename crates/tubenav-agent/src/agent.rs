#![forbid(unsafe_code)]

//! The page agent: one instance per page, owning all navigation state.
//!
//! # Key handling
//!
//! | Action | Editable focus | Otherwise |
//! |--------|----------------|-----------|
//! | Escape | blur, handled | clear selection if any |
//! | Home / Back | ignored for text keys, else blur then navigate | navigate |
//! | Move | ignored | collect, move, highlight |
//! | Activate | ignored | ensure selection, open or click |
//! | ToggleMode | flip mode, toast | flip mode, toast |
//!
//! While navigation mode is off only `ToggleMode` is handled. The spatial
//! style starts with the mode on; the linear style starts with it off.
//!
//! Every candidate list is collected fresh. If the selected element is not in
//! the fresh list, a move selects the first candidate instead of searching.

use std::time::Duration;

use tracing::debug;
use tubenav_core::command::{Command, CommandMessage};
use tubenav_core::event::KeyEvent;
use tubenav_core::geometry::NavDirection;
use tubenav_core::keybinding::{Action, ActionMapper};
use tubenav_core::media;

use crate::candidate::{ActivationTarget, Candidate, nav_items};
use crate::collector::collect;
use crate::config::{NavConfig, NavStyle};
use crate::host::PageHost;
use crate::linear;
use crate::recognizer::CardRecognizer;
use crate::selection::Selection;
use crate::spatial;
use crate::toast::{Toast, ToastTicket};

/// Whether the agent consumed a key.
///
/// `Handled` means the caller must prevent the default action and stop
/// propagation so the page's own shortcuts do not also fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    Ignored,
}

impl KeyOutcome {
    #[must_use]
    pub const fn is_handled(self) -> bool {
        matches!(self, Self::Handled)
    }
}

/// Navigation state for one page.
pub struct PageAgent<H: PageHost> {
    config: NavConfig,
    recognizer: CardRecognizer,
    mapper: ActionMapper,
    selection: Selection<H::Element>,
    mode_active: bool,
    toast: Toast,
    pending_toast: Option<ToastTicket>,
}

impl<H: PageHost> Default for PageAgent<H> {
    fn default() -> Self {
        Self::new(NavConfig::default())
    }
}

impl<H: PageHost> PageAgent<H> {
    /// Create an agent. The configuration is validated first.
    #[must_use]
    pub fn new(config: NavConfig) -> Self {
        let config = config.validated();
        let recognizer = CardRecognizer::youtube().with_site_origin(config.site_origin.clone());
        Self::with_recognizer(config, recognizer)
    }

    /// Create an agent with a custom pattern table.
    #[must_use]
    pub fn with_recognizer(config: NavConfig, recognizer: CardRecognizer) -> Self {
        let config = config.validated();
        Self {
            mapper: ActionMapper::new(config.bindings.clone()),
            mode_active: config.style == NavStyle::Spatial,
            selection: Selection::new(),
            toast: Toast::new(),
            pending_toast: None,
            recognizer,
            config,
        }
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn recognizer(&self) -> &CardRecognizer {
        &self.recognizer
    }

    pub fn selection(&self) -> &Selection<H::Element> {
        &self.selection
    }

    /// Whether navigation keys are currently live.
    pub fn mode_active(&self) -> bool {
        self.mode_active
    }

    /// Route one key event.
    pub fn handle_key(&mut self, host: &H, event: &KeyEvent) -> KeyOutcome {
        let Some(action) = self.mapper.map(event) else {
            return KeyOutcome::Ignored;
        };
        if !self.mode_active && action != Action::ToggleMode {
            return KeyOutcome::Ignored;
        }

        match action {
            Action::Escape => self.escape(host),
            Action::Home | Action::Back if event.produces_text() && host.focus_is_editable() => {
                KeyOutcome::Ignored
            }
            Action::Home => {
                let url = self.config.home_url();
                blur_editable(host);
                debug!(%url, "navigating home");
                host.navigate_to(&url);
                KeyOutcome::Handled
            }
            Action::Back => {
                blur_editable(host);
                debug!("history back");
                host.history_back();
                KeyOutcome::Handled
            }
            Action::Move(dir) => self.move_selection(host, dir),
            Action::Activate { background } => self.activate(host, background),
            Action::ToggleMode => self.toggle_mode(host),
        }
    }

    /// Run a relayed command message. Returns whether the media was changed.
    pub fn handle_message(&mut self, host: &H, message: &CommandMessage) -> bool {
        if !message.is_command() {
            return false;
        }
        match message.command() {
            Some(command) => self.handle_command(host, command),
            None => {
                debug!(command = %message.command, "unknown media command");
                false
            }
        }
    }

    /// Apply a media command to the page's video.
    ///
    /// Ignored while the user is typing, and when the page has no video.
    pub fn handle_command(&mut self, host: &H, command: Command) -> bool {
        if host.focus_is_editable() {
            debug!(command = command.id(), "media command ignored while typing");
            return false;
        }
        let Some(video) = host.media() else {
            return false;
        };
        let step = self.config.seek_step_secs;
        match command {
            Command::TogglePlay => {
                let change = media::toggle_play(&video);
                debug!(?change, "toggled playback");
                true
            }
            Command::SeekBack => media::seek(&video, -step).is_some(),
            Command::SeekForward => media::seek(&video, step).is_some(),
        }
    }

    /// Timer callback for a toast shown earlier.
    pub fn expire_toast(&mut self, host: &H, ticket: ToastTicket) -> bool {
        self.toast.expire(host, ticket)
    }

    /// The expiry the host should schedule, if a toast was just shown.
    pub fn take_toast_timer(&mut self) -> Option<(ToastTicket, Duration)> {
        self.pending_toast
            .take()
            .map(|ticket| (ticket, self.config.toast_duration()))
    }

    fn escape(&mut self, host: &H) -> KeyOutcome {
        if host.focus_is_editable() {
            host.blur_active();
            return KeyOutcome::Handled;
        }
        if self.selection.is_active() {
            self.selection.clear(host);
            return KeyOutcome::Handled;
        }
        KeyOutcome::Ignored
    }

    fn move_selection(&mut self, host: &H, dir: NavDirection) -> KeyOutcome {
        if host.focus_is_editable() {
            return KeyOutcome::Ignored;
        }
        let candidates = collect(host, &self.recognizer);
        if candidates.is_empty() {
            return KeyOutcome::Ignored;
        }

        let target = match self.selection.index_in(&candidates) {
            None => Some(0),
            Some(current) => match self.config.style {
                NavStyle::Spatial => spatial::next(
                    &nav_items(&candidates),
                    current,
                    dir,
                    &self.config.spatial,
                ),
                NavStyle::Linear => linear::step(candidates.len(), Some(current), dir),
            },
        };

        match target {
            Some(index) => {
                debug!(index, direction = dir.as_str(), "selection moved");
                self.select(host, &candidates[index]);
            }
            None => debug!(direction = dir.as_str(), "no candidate in direction"),
        }
        KeyOutcome::Handled
    }

    fn activate(&mut self, host: &H, background: bool) -> KeyOutcome {
        if host.focus_is_editable() {
            return KeyOutcome::Ignored;
        }
        let candidates = collect(host, &self.recognizer);
        let Some(index) = self.selection.ensure(
            host,
            &candidates,
            &self.config.emphasis,
            self.config.scroll_margin,
        ) else {
            return KeyOutcome::Ignored;
        };

        match &candidates[index].target {
            ActivationTarget::Link { href, kind, .. } if background => {
                let url = self.recognizer.absolute_url(href);
                debug!(%url, ?kind, "opening in background tab");
                host.open_background_tab(&url);
            }
            target => {
                debug!(index, "activating selection");
                host.click(target.element());
            }
        }
        KeyOutcome::Handled
    }

    fn toggle_mode(&mut self, host: &H) -> KeyOutcome {
        self.mode_active = !self.mode_active;
        if self.mode_active {
            let candidates = collect(host, &self.recognizer);
            self.selection.ensure(
                host,
                &candidates,
                &self.config.emphasis,
                self.config.scroll_margin,
            );
        } else {
            self.selection.clear(host);
        }
        debug!(active = self.mode_active, "navigation mode toggled");
        let ticket = self.toast.show(host, linear::mode_message(self.mode_active));
        self.pending_toast = Some(ticket);
        KeyOutcome::Handled
    }

    fn select(&mut self, host: &H, candidate: &Candidate<H::Element>) {
        self.selection.select(
            host,
            candidate,
            &self.config.emphasis,
            self.config.scroll_margin,
        );
    }
}

fn blur_editable<H: PageHost>(host: &H) {
    if host.focus_is_editable() {
        host.blur_active();
    }
}

#![forbid(unsafe_code)]

//! Key chords, binding tables, and action mapping.
//!
//! # Key Concepts
//!
//! - **KeyChord**: one key plus the modifiers that must be held, written as
//!   `"Alt+n"`, `"Ctrl+Shift+ArrowDown"`, `"Escape"`.
//!
//! - **KeyBindings**: the table from chords to the page agent's operations.
//!   Deserializes from JSON so the extension can override individual keys.
//!
//! - **ActionMapper**: resolves a [`KeyEvent`] against the bindings and
//!   yields an [`Action`]. Typing-context checks happen later, in the agent,
//!   because they need the live page.
//!
//! # Matching rules
//!
//! - Only key-down events (press or repeat) map.
//! - Ctrl, Alt and Super must be exactly the chord's.
//! - Shift is ignored for character chords (the host already folded it into
//!   the character); for named keys it must match too.
//! - The activate chord also matches with Ctrl or Super added, which requests
//!   a background tab.
//!
//! # Example
//!
//! ```
//! use tubenav_core::event::{KeyCode, KeyEvent, Modifiers};
//! use tubenav_core::geometry::NavDirection;
//! use tubenav_core::keybinding::{Action, ActionMapper, KeyBindings};
//!
//! let mapper = ActionMapper::new(KeyBindings::default());
//!
//! let s = KeyEvent::new(KeyCode::Char('s'));
//! assert_eq!(mapper.map(&s), Some(Action::Move(NavDirection::Down)));
//!
//! let ctrl_enter = KeyEvent::new(KeyCode::Enter).with_modifiers(Modifiers::CTRL);
//! assert_eq!(mapper.map(&ctrl_enter), Some(Action::Activate { background: true }));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::event::{KeyCode, KeyEvent, Modifiers};
use crate::geometry::NavDirection;

/// Modifiers that must match exactly; Shift is handled per key kind.
const STRICT_MODS: Modifiers = Modifiers::ALT.union(Modifiers::CTRL).union(Modifiers::SUPER);

/// Modifiers that turn an activation into "open in background tab".
const BACKGROUND_MODS: Modifiers = Modifiers::CTRL.union(Modifiers::SUPER);

// ---------------------------------------------------------------------------
// KeyChord
// ---------------------------------------------------------------------------

/// A key plus required modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyChord {
    pub code: KeyCode,
    pub mods: Modifiers,
}

impl KeyChord {
    /// Chord without modifiers.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            mods: Modifiers::NONE,
        }
    }

    /// Chord with modifiers.
    #[must_use]
    pub const fn with(code: KeyCode, mods: Modifiers) -> Self {
        Self { code, mods }
    }

    /// Check whether `event` triggers this chord.
    #[must_use]
    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.matches_allowing(event, Modifiers::NONE)
    }

    /// Like [`matches`](Self::matches), but `extra` modifiers may also be held.
    #[must_use]
    pub fn matches_allowing(&self, event: &KeyEvent, extra: Modifiers) -> bool {
        if !self.code.same_key(&event.code) {
            return false;
        }
        let held = event.modifiers.difference(extra);
        let wanted = self.mods.difference(extra);
        if held.intersection(STRICT_MODS) != wanted.intersection(STRICT_MODS) {
            return false;
        }
        match self.code {
            KeyCode::Char(_) => true,
            _ => held.contains(Modifiers::SHIFT) == wanted.contains(Modifiers::SHIFT),
        }
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, label) in [
            (Modifiers::CTRL, "Ctrl"),
            (Modifiers::ALT, "Alt"),
            (Modifiers::SHIFT, "Shift"),
            (Modifiers::SUPER, "Super"),
        ] {
            if self.mods.contains(flag) {
                write!(f, "{label}+")?;
            }
        }
        f.write_str(&self.code.name())
    }
}

impl FromStr for KeyChord {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| Error::InvalidKeyChord {
            chord: s.to_string(),
            reason,
        };

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(invalid("empty chord"));
        }
        // A lone "+" is the plus key; otherwise the key is the last segment.
        let (prefix, key) = match trimmed.rsplit_once('+') {
            Some((prefix, "")) if prefix.ends_with('+') || prefix.is_empty() => {
                (prefix.trim_end_matches('+'), "+")
            }
            Some((_, "")) => return Err(invalid("missing key")),
            Some((prefix, key)) => (prefix, key),
            None => ("", trimmed),
        };

        let mut mods = Modifiers::NONE;
        for part in prefix.split('+').filter(|p| !p.is_empty()) {
            let flag = match part.trim().to_ascii_lowercase().as_str() {
                "ctrl" | "control" => Modifiers::CTRL,
                "alt" | "option" | "opt" => Modifiers::ALT,
                "shift" => Modifiers::SHIFT,
                "super" | "meta" | "cmd" | "command" => Modifiers::SUPER,
                _ => return Err(invalid("unknown modifier")),
            };
            mods |= flag;
        }

        let code = KeyCode::from_name(key.trim()).ok_or_else(|| invalid("unknown key"))?;
        Ok(Self { code, mods })
    }
}

impl TryFrom<String> for KeyChord {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<KeyChord> for String {
    fn from(chord: KeyChord) -> Self {
        chord.to_string()
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// High-level operation requested by a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Blur an editable control, or clear the selection.
    Escape,
    /// Navigate to the site root.
    Home,
    /// History back.
    Back,
    /// Move the selection.
    Move(NavDirection),
    /// Activate the selected card; `background` opens it in a new tab.
    Activate { background: bool },
    /// Toggle the linear navigation mode.
    ToggleMode,
}

// ---------------------------------------------------------------------------
// Bindings
// ---------------------------------------------------------------------------

/// Chord table for every action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub escape: KeyChord,
    pub home: KeyChord,
    pub back: KeyChord,
    pub up: KeyChord,
    pub down: KeyChord,
    pub left: KeyChord,
    pub right: KeyChord,
    pub activate: KeyChord,
    pub toggle_mode: KeyChord,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            escape: KeyChord::plain(KeyCode::Escape),
            home: KeyChord::plain(KeyCode::Char('g')),
            back: KeyChord::plain(KeyCode::Char('b')),
            up: KeyChord::plain(KeyCode::Char('w')),
            down: KeyChord::plain(KeyCode::Char('s')),
            left: KeyChord::plain(KeyCode::Char('a')),
            right: KeyChord::plain(KeyCode::Char('d')),
            activate: KeyChord::plain(KeyCode::Enter),
            toggle_mode: KeyChord::with(KeyCode::Char('n'), Modifiers::ALT),
        }
    }
}

impl KeyBindings {
    /// Bindings with movement on the arrow keys.
    #[must_use]
    pub fn arrows() -> Self {
        Self {
            up: KeyChord::plain(KeyCode::Up),
            down: KeyChord::plain(KeyCode::Down),
            left: KeyChord::plain(KeyCode::Left),
            right: KeyChord::plain(KeyCode::Right),
            ..Self::default()
        }
    }

    /// Movement chord for `dir`.
    #[must_use]
    pub const fn movement(&self, dir: NavDirection) -> KeyChord {
        match dir {
            NavDirection::Up => self.up,
            NavDirection::Down => self.down,
            NavDirection::Left => self.left,
            NavDirection::Right => self.right,
        }
    }
}

/// Maps key events to actions using a [`KeyBindings`] table.
#[derive(Debug, Clone, Default)]
pub struct ActionMapper {
    bindings: KeyBindings,
}

impl ActionMapper {
    /// Create a mapper for the given table.
    #[must_use]
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    /// Current bindings.
    #[must_use]
    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Replace the bindings.
    pub fn set_bindings(&mut self, bindings: KeyBindings) {
        self.bindings = bindings;
    }

    /// Resolve `event` to an action.
    ///
    /// Earlier entries win when two chords collide: escape, toggle, home,
    /// back, activate, then movement.
    #[must_use]
    pub fn map(&self, event: &KeyEvent) -> Option<Action> {
        if !event.is_down() {
            return None;
        }
        let b = &self.bindings;

        if b.escape.matches(event) {
            return Some(Action::Escape);
        }
        if b.toggle_mode.matches(event) {
            return Some(Action::ToggleMode);
        }
        if b.home.matches(event) {
            return Some(Action::Home);
        }
        if b.back.matches(event) {
            return Some(Action::Back);
        }
        if b.activate.matches_allowing(event, BACKGROUND_MODS) {
            let background = event.modifiers.intersects(BACKGROUND_MODS)
                && !b.activate.mods.intersects(BACKGROUND_MODS);
            return Some(Action::Activate { background });
        }
        NavDirection::ALL
            .into_iter()
            .find(|&dir| b.movement(dir).matches(event))
            .map(Action::Move)
    }
}

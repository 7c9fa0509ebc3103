#![forbid(unsafe_code)]

//! Canonical key event types.
//!
//! The page agent only cares about keyboard input. Events are normalized from
//! DOM `KeyboardEvent` fields by [`normalize_dom_key`] so the key router never
//! has to look at browser-specific strings.
//!
//! # Design Notes
//!
//! - `KeyEventKind` defaults to `Press`; only presses and repeats drive actions.
//! - `Modifiers` use bitflags for easy combination.
//! - Character keys keep the case the host reported; matching folds case.

use bitflags::bitflags;

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,

    /// The type of key event (press, repeat, or release).
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a new key event with default modifiers and Press kind.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Create a key event with a specific kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Check if Ctrl modifier is held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// Check if Super/Meta/Cmd modifier is held.
    #[must_use]
    pub const fn super_key(&self) -> bool {
        self.modifiers.contains(Modifiers::SUPER)
    }

    /// A character key without Ctrl, Alt or Super: inserts text in a field.
    #[must_use]
    pub const fn produces_text(&self) -> bool {
        matches!(self.code, KeyCode::Char(_))
            && !self
                .modifiers
                .intersects(Modifiers::CTRL.union(Modifiers::ALT).union(Modifiers::SUPER))
    }

    /// True for presses and auto-repeats.
    #[must_use]
    pub const fn is_down(&self) -> bool {
        matches!(self.kind, KeyEventKind::Press | KeyEventKind::Repeat)
    }
}

/// Key codes for keyboard events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key.
    Char(char),
    Enter,
    Escape,
    Backspace,
    Tab,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    /// Function key (F1-F24).
    F(u8),
}

impl KeyCode {
    /// Canonical name, as accepted by [`KeyCode::from_name`].
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Char(' ') => "Space".to_string(),
            Self::Char(c) => c.to_string(),
            Self::Enter => "Enter".to_string(),
            Self::Escape => "Escape".to_string(),
            Self::Backspace => "Backspace".to_string(),
            Self::Tab => "Tab".to_string(),
            Self::Delete => "Delete".to_string(),
            Self::Home => "Home".to_string(),
            Self::End => "End".to_string(),
            Self::PageUp => "PageUp".to_string(),
            Self::PageDown => "PageDown".to_string(),
            Self::Up => "ArrowUp".to_string(),
            Self::Down => "ArrowDown".to_string(),
            Self::Left => "ArrowLeft".to_string(),
            Self::Right => "ArrowRight".to_string(),
            Self::F(n) => format!("F{n}"),
        }
    }

    /// Parse a key name (`"Enter"`, `"ArrowDown"`, `"g"`, `"F5"`, ...).
    ///
    /// Names are case-insensitive except for single characters, which are kept
    /// as given.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        if let Some(first) = chars.next()
            && chars.next().is_none()
        {
            return Some(Self::Char(first));
        }

        let code = match name.to_ascii_lowercase().as_str() {
            "enter" | "return" => Self::Enter,
            "escape" | "esc" => Self::Escape,
            "backspace" => Self::Backspace,
            "tab" => Self::Tab,
            "delete" | "del" => Self::Delete,
            "home" => Self::Home,
            "end" => Self::End,
            "pageup" => Self::PageUp,
            "pagedown" => Self::PageDown,
            "arrowup" | "up" => Self::Up,
            "arrowdown" | "down" => Self::Down,
            "arrowleft" | "left" => Self::Left,
            "arrowright" | "right" => Self::Right,
            "space" | "spacebar" => Self::Char(' '),
            other => return parse_function_key(other).map(Self::F),
        };
        Some(code)
    }

    /// Compare two codes, folding ASCII case for characters.
    #[must_use]
    pub fn same_key(&self, other: &KeyCode) -> bool {
        match (self, other) {
            (Self::Char(a), Self::Char(b)) => a.to_lowercase().eq(b.to_lowercase()),
            _ => self == other,
        }
    }
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key was pressed (default when not distinguishable).
    #[default]
    Press,

    /// Key is being held (repeat event).
    Repeat,

    /// Key was released.
    Release,
}

bitflags! {
    /// Modifier keys held during an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Cmd key.
        const SUPER = 0b1000;
    }
}

impl Modifiers {
    /// Build from the four DOM `KeyboardEvent` booleans.
    #[must_use]
    pub fn from_dom(shift: bool, alt: bool, ctrl: bool, meta: bool) -> Self {
        let mut mods = Self::NONE;
        mods.set(Self::SHIFT, shift);
        mods.set(Self::ALT, alt);
        mods.set(Self::CTRL, ctrl);
        mods.set(Self::SUPER, meta);
        mods
    }
}

/// Convert DOM `KeyboardEvent.key` / `KeyboardEvent.code` into a [`KeyCode`].
///
/// Returns `None` for keys the router never binds (bare modifiers, IME
/// composition, media keys, ...).
#[must_use]
pub fn normalize_dom_key(dom_key: &str, dom_code: &str, mods: Modifiers) -> Option<KeyCode> {
    // Alt on macOS rewrites `key` into a symbol (Alt+n -> "˜"); the physical
    // `code` still names the letter.
    if mods.contains(Modifiers::ALT)
        && let Some(code) = key_code_from_dom_code(dom_code)
    {
        return Some(code);
    }

    // Prefer the logical `key` for printable characters (already includes shift).
    let mut chars = dom_key.chars();
    if let Some(first) = chars.next()
        && chars.next().is_none()
    {
        return Some(KeyCode::Char(first));
    }

    let code = match dom_key {
        "Enter" => KeyCode::Enter,
        "Escape" | "Esc" => KeyCode::Escape,
        "Backspace" => KeyCode::Backspace,
        "Tab" => KeyCode::Tab,
        "Delete" => KeyCode::Delete,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        "PageUp" => KeyCode::PageUp,
        "PageDown" => KeyCode::PageDown,
        "ArrowUp" | "Up" => KeyCode::Up,
        "ArrowDown" | "Down" => KeyCode::Down,
        "ArrowLeft" | "Left" => KeyCode::Left,
        "ArrowRight" | "Right" => KeyCode::Right,
        "Spacebar" => KeyCode::Char(' '),
        _ => {
            if let Some(n) = parse_function_key(dom_key) {
                return Some(KeyCode::F(n));
            }
            return key_code_from_dom_code(dom_code);
        }
    };
    Some(code)
}

fn parse_function_key(s: &str) -> Option<u8> {
    let rest = s.strip_prefix('F').or_else(|| s.strip_prefix('f'))?;
    rest.parse::<u8>().ok().filter(|n| (1..=24).contains(n))
}

fn key_code_from_dom_code(dom_code: &str) -> Option<KeyCode> {
    if let Some(letter) = dom_code.strip_prefix("Key")
        && letter.len() == 1
    {
        return letter.chars().next().map(|c| KeyCode::Char(c.to_ascii_lowercase()));
    }
    if let Some(digit) = dom_code.strip_prefix("Digit")
        && digit.len() == 1
    {
        return digit.chars().next().map(KeyCode::Char);
    }
    Some(match dom_code {
        "Enter" | "NumpadEnter" => KeyCode::Enter,
        "Escape" => KeyCode::Escape,
        "Space" => KeyCode::Char(' '),
        "ArrowUp" => KeyCode::Up,
        "ArrowDown" => KeyCode::Down,
        "ArrowLeft" => KeyCode::Left,
        "ArrowRight" => KeyCode::Right,
        _ => return None,
    })
}

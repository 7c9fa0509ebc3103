#![forbid(unsafe_code)]

//! Linear navigation: a toggled mode that steps through cards in collection
//! order, clamped at both ends.

use tubenav_core::geometry::NavDirection;

/// Toast text for a mode change.
#[must_use]
pub const fn mode_message(active: bool) -> &'static str {
    if active {
        "Navigation mode ON"
    } else {
        "Navigation mode OFF"
    }
}

/// Next index in a list of `len` cards.
///
/// Down and Right step forward, Up and Left step back. Without a current
/// index the first card is chosen. No wraparound.
#[must_use]
pub fn step(len: usize, current: Option<usize>, dir: NavDirection) -> Option<usize> {
    let last = len.checked_sub(1)?;
    let Some(current) = current else {
        return Some(0);
    };
    let current = current.min(last);
    let next = match dir {
        NavDirection::Down | NavDirection::Right => (current + 1).min(last),
        NavDirection::Up | NavDirection::Left => current.saturating_sub(1),
    };
    Some(next)
}

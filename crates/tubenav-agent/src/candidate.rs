#![forbid(unsafe_code)]

//! Selectable cards as seen by the navigator.
//!
//! Candidates are snapshots: geometry, region, and activation target are read
//! once per collection and never cached across key presses. Identity is the
//! host element's reference equality.

use tubenav_core::geometry::Rect;

use crate::recognizer::LinkKind;
use crate::spatial::NavItem;

/// Which part of the page a card belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Region {
    /// The guide / navigation drawer.
    Sidebar,
    /// Everything else.
    #[default]
    Main,
}

/// What activating a card triggers.
#[derive(Debug, Clone, PartialEq)]
pub enum ActivationTarget<E> {
    /// An anchor with a recognized `href`.
    Link {
        element: E,
        href: String,
        kind: LinkKind,
    },
    /// A clickable element without a usable `href` (sidebar entries only).
    Endpoint(E),
}

impl<E> ActivationTarget<E> {
    /// Element to click for a direct activation.
    pub fn element(&self) -> &E {
        match self {
            Self::Link { element, .. } | Self::Endpoint(element) => element,
        }
    }

    /// The link `href`, if this target has one.
    pub fn href(&self) -> Option<&str> {
        match self {
            Self::Link { href, .. } => Some(href),
            Self::Endpoint(_) => None,
        }
    }
}

/// A recognized, visible, activatable card.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<E> {
    pub element: E,
    pub rect: Rect,
    pub region: Region,
    pub target: ActivationTarget<E>,
}

impl<E> Candidate<E> {
    /// Geometry and region, which is all the navigator needs.
    pub fn nav_item(&self) -> NavItem {
        NavItem {
            rect: self.rect,
            region: self.region,
        }
    }
}

/// Project a candidate list onto navigator items, preserving order.
pub fn nav_items<E>(candidates: &[Candidate<E>]) -> Vec<NavItem> {
    candidates.iter().map(Candidate::nav_item).collect()
}

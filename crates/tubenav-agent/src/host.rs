#![forbid(unsafe_code)]

//! The page seen through the agent's eyes.
//!
//! [`PageHost`] is the one seam between navigation logic and the live
//! document. The browser build implements it over `web-sys`; tests use an
//! in-memory page. Every method takes `&self`: DOM handles are shared
//! references and mutation happens on the document side.
//!
//! Handlers driven through this trait run before the page's own key handlers
//! (capture phase) and report whether the default action must be suppressed,
//! see [`KeyOutcome`](crate::agent::KeyOutcome).

use std::fmt::Debug;

use tubenav_core::geometry::Rect;
use tubenav_core::media::MediaElement;

use crate::config::Emphasis;

/// Access to the live page.
pub trait PageHost {
    /// A document element. Equality is reference identity.
    type Element: Clone + PartialEq + Debug;

    /// The page's media element type.
    type Media: MediaElement;

    /// All elements matching a CSS selector list, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self::Element>;

    /// Viewport-relative bounding box.
    fn bounding_rect(&self, element: &Self::Element) -> Rect;

    /// `element.closest(selector)` is non-null.
    fn has_ancestor(&self, element: &Self::Element, selector: &str) -> bool;

    /// The element itself if it is an anchor, then descendant anchors, each
    /// with its raw `href` attribute. Anchors without `href` are skipped.
    fn anchors(&self, element: &Self::Element) -> Vec<(Self::Element, String)>;

    /// First descendant matching `selector`.
    fn find_within(&self, element: &Self::Element, selector: &str) -> Option<Self::Element>;

    /// Apply (`Some`) or reset (`None`) the highlight style.
    fn set_emphasis(&self, element: &Self::Element, emphasis: Option<&Emphasis>);

    /// Viewport height in pixels.
    fn viewport_height(&self) -> f64;

    /// Scroll so `element` is comfortably visible.
    fn scroll_into_view(&self, element: &Self::Element);

    /// Focus is in an `input`, `textarea`, or content-editable element.
    fn focus_is_editable(&self) -> bool;

    /// Drop focus from the active element.
    fn blur_active(&self);

    /// Same-tab navigation.
    fn navigate_to(&self, url: &str);

    /// `history.back()`.
    fn history_back(&self);

    /// Open `url` in a new background tab.
    fn open_background_tab(&self, url: &str);

    /// Simulate a click.
    fn click(&self, element: &Self::Element);

    /// The page's primary media element, if one exists.
    fn media(&self) -> Option<Self::Media>;

    /// Show (or replace) the transient toast.
    fn show_toast(&self, message: &str);

    /// Hide the toast.
    fn hide_toast(&self);
}

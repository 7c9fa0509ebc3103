#![forbid(unsafe_code)]

//! Card recognition: which elements are cards, which region they live in,
//! and what activating them does.
//!
//! A [`CardRecognizer`] is an ordered table of [`CardPattern`]s. Supporting a
//! new layout means adding a row; the navigator never sees selectors.
//!
//! # Link priority
//!
//! When a card holds several anchors the best one wins, by [`LinkKind`]
//! order: watch page, short, user handle, feed, channel, playlist, any other
//! internal path, and finally the external studio site. Ties keep document
//! order.

use std::borrow::Cow;

use crate::candidate::{ActivationTarget, Region};
use crate::host::PageHost;

const STUDIO_ORIGIN: &str = "https://studio.youtube.com";

/// Hosts whose absolute URLs are treated as internal paths.
const SITE_HOSTS: &[&str] = &[
    "https://www.youtube.com",
    "https://youtube.com",
    "https://m.youtube.com",
    "//www.youtube.com",
];

/// Kind of link, ordered by activation preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LinkKind {
    Watch,
    Shorts,
    User,
    Feed,
    Channel,
    Playlist,
    Internal,
    Studio,
}

impl LinkKind {
    /// Classify a raw `href` attribute.
    #[must_use]
    pub fn classify(href: &str) -> Option<Self> {
        let href = href.trim();
        if href.starts_with(STUDIO_ORIGIN) {
            return Some(Self::Studio);
        }
        let path = site_path(href)?;
        let kind = if path.starts_with("/watch") {
            Self::Watch
        } else if path.starts_with("/shorts/") {
            Self::Shorts
        } else if path.starts_with("/@") || path.starts_with("/user/") {
            Self::User
        } else if path.starts_with("/feed/") {
            Self::Feed
        } else if path.starts_with("/channel/") || path.starts_with("/c/") {
            Self::Channel
        } else if path.starts_with("/playlist") {
            Self::Playlist
        } else {
            Self::Internal
        };
        Some(kind)
    }

    /// Accepted on an ordinary (non-sidebar) card.
    #[must_use]
    pub const fn is_standard(self) -> bool {
        !matches!(self, Self::Studio)
    }
}

/// Root-relative path of an on-site `href`.
fn site_path(href: &str) -> Option<&str> {
    let rest = SITE_HOSTS
        .iter()
        .find_map(|host| href.strip_prefix(host))
        .unwrap_or(href);
    // "//host/..." is protocol-relative, not a path.
    (rest.starts_with('/') && !rest.starts_with("//")).then_some(rest)
}

/// How a pattern assigns its region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionRule {
    /// Always this region.
    Fixed(Region),
    /// `Sidebar` inside the recognizer's sidebar container, else `Main`.
    ByAncestor,
}

/// Which activation targets a pattern accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkRule {
    /// A link of a standard [`LinkKind`].
    Standard,
    /// Any link, else a clickable endpoint.
    Lenient,
}

/// One recognized card type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardPattern {
    pub selector: Cow<'static, str>,
    pub region: RegionRule,
    pub links: LinkRule,
}

impl CardPattern {
    /// Main-grid card classified by ancestry.
    #[must_use]
    pub const fn card(selector: &'static str) -> Self {
        Self {
            selector: Cow::Borrowed(selector),
            region: RegionRule::ByAncestor,
            links: LinkRule::Standard,
        }
    }

    /// Sidebar navigation entry.
    #[must_use]
    pub const fn sidebar_entry(selector: &'static str) -> Self {
        Self {
            selector: Cow::Borrowed(selector),
            region: RegionRule::Fixed(Region::Sidebar),
            links: LinkRule::Lenient,
        }
    }
}

/// Ordered card patterns plus the selectors they share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRecognizer {
    pub patterns: Vec<CardPattern>,
    pub sidebar_container: Cow<'static, str>,
    pub endpoint_selector: Cow<'static, str>,
    pub site_origin: Cow<'static, str>,
}

impl Default for CardRecognizer {
    fn default() -> Self {
        Self::youtube()
    }
}

impl CardRecognizer {
    /// Pattern table for the desktop site.
    #[must_use]
    pub fn youtube() -> Self {
        Self {
            patterns: vec![
                CardPattern::card("ytd-rich-item-renderer"),
                CardPattern::card("ytd-video-renderer"),
                CardPattern::card("ytd-grid-video-renderer"),
                CardPattern::card("ytd-compact-video-renderer"),
                CardPattern::card("ytd-playlist-video-renderer"),
                CardPattern::card("ytd-playlist-renderer"),
                CardPattern::card("ytd-compact-playlist-renderer"),
                CardPattern::card("ytd-channel-renderer"),
                CardPattern::card("ytd-reel-item-renderer"),
                CardPattern::card("ytm-shorts-lockup-view-model"),
                CardPattern::card("yt-lockup-view-model"),
                CardPattern::sidebar_entry("ytd-guide-entry-renderer"),
                CardPattern::sidebar_entry("ytd-mini-guide-entry-renderer"),
            ],
            sidebar_container: Cow::Borrowed(
                "ytd-guide-renderer, ytd-mini-guide-renderer, tp-yt-app-drawer#guide",
            ),
            endpoint_selector: Cow::Borrowed(
                "a#endpoint, tp-yt-paper-item, [role=\"link\"], [role=\"listitem\"]",
            ),
            site_origin: Cow::Borrowed("https://www.youtube.com"),
        }
    }

    /// Replace the site origin used by [`absolute_url`](Self::absolute_url).
    #[must_use]
    pub fn with_site_origin(mut self, origin: impl Into<String>) -> Self {
        self.site_origin = Cow::Owned(origin.into());
        self
    }

    /// Append a pattern (lowest priority).
    #[must_use]
    pub fn with_pattern(mut self, pattern: CardPattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    /// Region of `element` under `pattern`.
    pub fn region_of<H: PageHost>(
        &self,
        host: &H,
        element: &H::Element,
        pattern: &CardPattern,
    ) -> Region {
        match &pattern.region {
            RegionRule::Fixed(region) => *region,
            RegionRule::ByAncestor => {
                if host.has_ancestor(element, &self.sidebar_container) {
                    Region::Sidebar
                } else {
                    Region::Main
                }
            }
        }
    }

    /// Best activation target of `element`, or `None` if it has none usable.
    ///
    /// Sidebar cards are always lenient.
    pub fn activation_target<H: PageHost>(
        &self,
        host: &H,
        element: &H::Element,
        rule: LinkRule,
        region: Region,
    ) -> Option<ActivationTarget<H::Element>> {
        let lenient = rule == LinkRule::Lenient || region == Region::Sidebar;

        let mut best: Option<(LinkKind, H::Element, String)> = None;
        for (anchor, href) in host.anchors(element) {
            let Some(kind) = LinkKind::classify(&href) else {
                continue;
            };
            if !lenient && !kind.is_standard() {
                continue;
            }
            if best.as_ref().is_none_or(|(best_kind, _, _)| kind < *best_kind) {
                best = Some((kind, anchor, href));
            }
        }

        if let Some((kind, element, href)) = best {
            return Some(ActivationTarget::Link {
                element,
                href,
                kind,
            });
        }
        if lenient {
            return host
                .find_within(element, &self.endpoint_selector)
                .map(ActivationTarget::Endpoint);
        }
        None
    }

    /// Absolute URL for an on-site path; other hrefs pass through.
    #[must_use]
    pub fn absolute_url(&self, href: &str) -> String {
        if href.starts_with('/') && !href.starts_with("//") {
            format!("{}{href}", self.site_origin.trim_end_matches('/'))
        } else {
            href.to_string()
        }
    }
}

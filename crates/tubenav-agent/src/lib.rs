#![forbid(unsafe_code)]

//! Page agent: keyboard-driven card navigation for a video site.
//!
//! # Role in tubenav
//! `tubenav-agent` runs inside the page. It owns every rule about what a
//! "card" is, where the highlight goes next, and what a key press does.
//! The live document is reached only through [`PageHost`], so the whole
//! state machine runs natively in tests against an in-memory page.
//!
//! # Pipeline
//! ```text
//! key press ─▶ ActionMapper ─▶ typing guard ─▶ collect() ─▶ spatial::next() ─▶ Selection
//!                                               (fresh)      (pure geometry)    (emphasis + scroll)
//! ```
//!
//! # Primary types
//! - [`PageAgent`]: per-page state (selection, mode, toast) and key routing.
//! - [`CardRecognizer`]: ordered card patterns, region and link rules.
//! - [`spatial`]: the directional navigator.
//! - [`Selection`]: highlight bookkeeping.

pub mod agent;
pub mod candidate;
pub mod collector;
pub mod config;
pub mod host;
pub mod linear;
pub mod recognizer;
pub mod selection;
pub mod spatial;
pub mod toast;

#[cfg(test)]
pub(crate) mod testing;

pub use agent::{KeyOutcome, PageAgent};
pub use candidate::{ActivationTarget, Candidate, Region};
pub use config::{Emphasis, NavConfig, NavStyle};
pub use host::PageHost;
pub use recognizer::{CardPattern, CardRecognizer, LinkKind, LinkRule, RegionRule};
pub use selection::Selection;

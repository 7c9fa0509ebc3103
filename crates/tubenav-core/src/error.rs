#![forbid(unsafe_code)]

//! Error type shared by the tubenav crates.
//!
//! Navigation itself never fails: a missing card, media element, or target is
//! a silent no-op. Errors only come out of parsing (key chords, configuration,
//! inbound messages) and out of message delivery from the background relay.

use thiserror::Error;

/// Errors produced while parsing configuration or relaying messages.
#[derive(Debug, Error)]
pub enum Error {
    /// A key chord string could not be parsed.
    #[error("invalid key chord {chord:?}: {reason}")]
    InvalidKeyChord {
        /// The offending input.
        chord: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Configuration JSON was malformed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// An inbound message was not a `YT_COMMAND`.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// The page agent could not be reached.
    #[error("message delivery to tab {tab_id} failed: {reason}")]
    Delivery {
        /// Destination tab.
        tab_id: i32,
        /// Host-reported failure.
        reason: String,
    },
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, Error>;

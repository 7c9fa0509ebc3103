#![forbid(unsafe_code)]

//! Core: input events, key bindings, and the background command relay.
//!
//! # Role in tubenav
//! `tubenav-core` is the platform-independent input layer. It owns the
//! normalized key event types, the chord/binding tables that turn key presses
//! into navigation [`Action`](keybinding::Action)s, the `YT_COMMAND` message
//! exchanged between the background relay and the page agent, and the small
//! media helpers the agent runs when a command arrives.
//!
//! # How it fits in the system
//! `tubenav-agent` consumes these types and owns everything that touches the
//! page. `tubenav-web` binds both to the browser through `wasm-bindgen`.

pub mod command;
pub mod error;
pub mod event;
pub mod geometry;
pub mod keybinding;
pub mod media;
pub mod relay;

pub use error::{Error, Result};

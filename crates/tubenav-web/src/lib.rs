#![forbid(unsafe_code)]

//! Browser extension glue for tubenav.
//!
//! Two `wasm-bindgen` entry points, one per extension context:
//!
//! - `startContentAgent(configJson?)` runs in every page. It installs a
//!   capture-phase `keydown` listener that feeds a [`tubenav_agent::PageAgent`]
//!   over the live document, and a `chrome.runtime` listener for relayed
//!   playback commands.
//! - `startCommandRelay(configJson?)` configures the background worker.
//!   The worker script registers its `chrome.*` listeners synchronously and
//!   forwards events to `relayCommand(command)`, which sends shortcuts to the
//!   active tab, and `handleRuntimeMessage(message)`, which opens background
//!   tabs that pages request.
//!
//! DOM-free helpers live in [`bridge`] and are tested natively; everything
//! else only compiles for `wasm32`.

pub mod bridge;

#[cfg(target_arch = "wasm32")]
mod background;
#[cfg(target_arch = "wasm32")]
mod console;
#[cfg(target_arch = "wasm32")]
mod content;
#[cfg(target_arch = "wasm32")]
mod dom;

#[cfg(target_arch = "wasm32")]
pub use background::{handle_runtime_message, relay_command, start_command_relay};
#[cfg(target_arch = "wasm32")]
pub use content::start_content_agent;
#[cfg(target_arch = "wasm32")]
pub use dom::{WebMedia, WebPage};

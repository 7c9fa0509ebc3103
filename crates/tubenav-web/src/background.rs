#![forbid(unsafe_code)]

//! Background handlers: forward shortcut commands to the active tab and open
//! background tabs on behalf of pages.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, JSON, Promise};
use tracing::{Level, debug, info, warn};
use tubenav_core::command::{CommandMessage, OpenTabRequest};
use tubenav_core::error::{Error, Result};
use tubenav_core::relay::{CommandRelay, MessageSink, TabInfo};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};

use crate::bridge::RelayConfig;
use crate::console::{init_logging, install_panic_hook, js_error_text};
use crate::dom::js_object;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["chrome", "tabs"], js_name = query, catch)]
    fn tabs_query(query: &JsValue) -> std::result::Result<Promise, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "tabs"], js_name = sendMessage, catch)]
    fn tabs_send_message(tab_id: i32, message: &JsValue) -> std::result::Result<Promise, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "tabs"], js_name = create, catch)]
    fn tabs_create(properties: &JsValue) -> std::result::Result<Promise, JsValue>;
}

thread_local! {
    static RELAY: RefCell<Option<Rc<CommandRelay>>> = const { RefCell::new(None) };
}

/// `chrome.tabs.sendMessage`. The promise settles later; a rejection means
/// the tab has no page agent and is logged, never retried.
struct TabsSink;

impl MessageSink for TabsSink {
    fn send(&self, tab_id: i32, message: &CommandMessage) -> Result<()> {
        let delivery = |err: JsValue| Error::Delivery {
            tab_id,
            reason: js_error_text(&err),
        };
        let payload = JSON::parse(&message.to_json()?).map_err(delivery)?;
        let promise = tabs_send_message(tab_id, &payload).map_err(delivery)?;

        let command = message.command.clone();
        spawn_local(async move {
            if let Err(err) = JsFuture::from(promise).await {
                warn!(
                    command = %command,
                    tab_id,
                    error = %js_error_text(&err),
                    "page agent unreachable; reload the tab to enable shortcuts"
                );
            }
        });
        Ok(())
    }
}

/// Configure the command relay.
///
/// `config_json` may override the allow-lists (see [`RelayConfig`]). The
/// worker script owns the `chrome.commands` and `chrome.runtime` listeners,
/// which must exist before any await, and forwards events to
/// [`relay_command`] and [`handle_runtime_message`].
#[wasm_bindgen(js_name = startCommandRelay)]
pub fn start_command_relay(config_json: Option<String>) {
    install_panic_hook();
    init_logging(Level::INFO);

    let relay = Rc::new(RelayConfig::load(config_json.as_deref()).into_relay());
    RELAY.with(|slot| *slot.borrow_mut() = Some(relay));
    info!("tubenav command relay started");
}

/// Forward one `chrome.commands` shortcut to the active tab.
#[wasm_bindgen(js_name = relayCommand)]
pub fn relay_command(command: String) {
    let relay = current_relay();
    spawn_local(async move {
        let tab = active_tab().await;
        relay.relay(&TabsSink, &command, tab.as_ref());
    });
}

/// Handle a `chrome.runtime` message sent by a page agent.
#[wasm_bindgen(js_name = handleRuntimeMessage)]
pub fn handle_runtime_message(message: JsValue) {
    open_tab_for(&current_relay(), &message);
}

fn current_relay() -> Rc<CommandRelay> {
    RELAY.with(|slot| {
        Rc::clone(
            slot.borrow_mut()
                .get_or_insert_with(|| Rc::new(CommandRelay::default())),
        )
    })
}

/// The focused window's active tab.
async fn active_tab() -> Option<TabInfo> {
    let query = js_object(&[
        ("active", JsValue::TRUE),
        ("currentWindow", JsValue::TRUE),
    ]);
    let promise = match tabs_query(&query) {
        Ok(promise) => promise,
        Err(err) => {
            warn!(error = %js_error_text(&err), "tabs.query threw");
            return None;
        }
    };
    let tabs = match JsFuture::from(promise).await {
        Ok(tabs) => tabs,
        Err(err) => {
            warn!(error = %js_error_text(&err), "tabs.query failed");
            return None;
        }
    };
    let tab = Array::from(&tabs).get(0);
    if tab.is_undefined() || tab.is_null() {
        return None;
    }
    Some(tab_info(&tab))
}

fn tab_info(tab: &JsValue) -> TabInfo {
    let field = |name: &str| js_sys::Reflect::get(tab, &JsValue::from_str(name)).ok();
    TabInfo {
        id: field("id")
            .and_then(|v| v.as_f64())
            .filter(|id| id.fract() == 0.0 && *id > 0.0 && *id <= f64::from(i32::MAX))
            .map(|id| id as i32),
        url: field("url").and_then(|v| v.as_string()),
    }
}

fn open_tab_for(relay: &CommandRelay, message: &JsValue) {
    let Some(json) = JSON::stringify(message).ok().and_then(|s| s.as_string()) else {
        return;
    };
    let Ok(request) = OpenTabRequest::parse(&json) else {
        return;
    };
    let Some(url) = relay.open_tab_url(&request) else {
        return;
    };
    debug!(url, "opening background tab");
    let properties = js_object(&[
        ("url", JsValue::from_str(url)),
        ("active", JsValue::FALSE),
    ]);
    match tabs_create(&properties) {
        Ok(promise) => spawn_local(async move {
            if let Err(err) = JsFuture::from(promise).await {
                warn!(error = %js_error_text(&err), "tabs.create failed");
            }
        }),
        Err(err) => warn!(error = %js_error_text(&err), "tabs.create threw"),
    }
}

#![forbid(unsafe_code)]

//! Content-script entry point: wires the page agent to the document.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::JSON;
use tracing::{Level, debug, info, warn};
use tubenav_agent::toast::ToastTicket;
use tubenav_agent::{KeyOutcome, PageAgent};
use tubenav_core::command::CommandMessage;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, KeyboardEvent};

use crate::bridge::{KeyInput, load_nav_config};
use crate::console::{init_logging, install_panic_hook, js_error_text};
use crate::dom::WebPage;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["chrome", "runtime", "onMessage"], js_name = addListener)]
    fn add_runtime_message_listener(callback: &Closure<dyn FnMut(JsValue)>);
}

struct ContentState {
    page: WebPage,
    agent: PageAgent<WebPage>,
}

type Shared = Rc<RefCell<ContentState>>;

/// Start the page agent.
///
/// `config_json` is an optional serialized navigation config; a malformed
/// value is logged and the defaults apply.
#[wasm_bindgen(js_name = startContentAgent)]
pub fn start_content_agent(config_json: Option<String>) -> Result<(), JsValue> {
    install_panic_hook();
    init_logging(Level::INFO);

    let page = WebPage::current().ok_or_else(|| JsValue::from_str("no document"))?;
    let config = load_nav_config(config_json.as_deref());
    let style = config.style;
    let state: Shared = Rc::new(RefCell::new(ContentState {
        page,
        agent: PageAgent::new(config),
    }));

    install_key_listener(&state)?;
    install_message_listener(&state);
    info!(?style, "tubenav page agent started");
    Ok(())
}

fn install_key_listener(state: &Shared) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let handler_state = Rc::clone(state);
    let on_key = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
        on_keydown(&handler_state, &event);
    });

    let options = AddEventListenerOptions::new();
    options.set_capture(true);
    window.add_event_listener_with_callback_and_add_event_listener_options(
        "keydown",
        on_key.as_ref().unchecked_ref(),
        &options,
    )?;
    // Lives as long as the page.
    on_key.forget();
    Ok(())
}

fn on_keydown(state: &Shared, event: &KeyboardEvent) {
    let key = event.key();
    let code = event.code();
    let input = KeyInput {
        key: &key,
        code: &code,
        shift: event.shift_key(),
        alt: event.alt_key(),
        ctrl: event.ctrl_key(),
        meta: event.meta_key(),
        repeat: event.repeat(),
    };
    let Some(key_event) = input.to_key_event() else {
        return;
    };

    let timer = {
        let mut guard = state.borrow_mut();
        let ContentState { page, agent } = &mut *guard;
        if agent.handle_key(page, &key_event) == KeyOutcome::Ignored {
            return;
        }
        agent.take_toast_timer()
    };

    event.prevent_default();
    event.stop_propagation();

    if let Some((ticket, delay)) = timer {
        schedule_toast_expiry(state, ticket, delay.as_millis());
    }
}

fn schedule_toast_expiry(state: &Shared, ticket: ToastTicket, delay_ms: u128) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let timer_state = Rc::clone(state);
    let expire = Closure::once_into_js(move || {
        let mut guard = timer_state.borrow_mut();
        let ContentState { page, agent } = &mut *guard;
        agent.expire_toast(page, ticket);
    });
    let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
    if let Err(err) = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(expire.unchecked_ref(), delay)
    {
        warn!(error = %js_error_text(&err), "could not schedule toast expiry");
    }
}

fn install_message_listener(state: &Shared) {
    let handler_state = Rc::clone(state);
    let on_message = Closure::<dyn FnMut(JsValue)>::new(move |message: JsValue| {
        let Some(json) = JSON::stringify(&message).ok().and_then(|s| s.as_string()) else {
            return;
        };
        let message = match CommandMessage::parse(&json) {
            Ok(message) => message,
            Err(err) => {
                debug!(error = %err, "ignoring runtime message");
                return;
            }
        };
        let mut guard = handler_state.borrow_mut();
        let ContentState { page, agent } = &mut *guard;
        agent.handle_message(page, &message);
    });
    add_runtime_message_listener(&on_message);
    on_message.forget();
}

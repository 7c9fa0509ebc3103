#![forbid(unsafe_code)]

//! [`PageHost`] over the live document.

use js_sys::{JSON, Object, Reflect};
use tracing::{debug, warn};
use tubenav_agent::{Emphasis, PageHost};
use tubenav_core::command::OpenTabRequest;
use tubenav_core::geometry::Rect;
use tubenav_core::media::MediaElement;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    Document, Element, HtmlElement, HtmlMediaElement, NodeList, ScrollBehavior,
    ScrollIntoViewOptions, ScrollLogicalPosition, Window,
};

use crate::bridge::{TOAST_ELEMENT_ID, TOAST_STYLE, is_editable};
use crate::console::js_error_text;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["chrome", "runtime"], js_name = sendMessage, catch)]
    fn runtime_send_message(message: &JsValue) -> Result<js_sys::Promise, JsValue>;
}

/// The page's `<video>`.
#[derive(Debug, Clone)]
pub struct WebMedia(HtmlMediaElement);

impl MediaElement for WebMedia {
    fn paused(&self) -> bool {
        self.0.paused()
    }

    fn play(&self) {
        if let Err(err) = self.0.play() {
            debug!(error = %js_error_text(&err), "play() threw");
        }
    }

    fn pause(&self) {
        if let Err(err) = self.0.pause() {
            debug!(error = %js_error_text(&err), "pause() threw");
        }
    }

    fn current_time(&self) -> f64 {
        self.0.current_time()
    }

    fn set_current_time(&self, seconds: f64) {
        self.0.set_current_time(seconds);
    }

    fn duration(&self) -> f64 {
        self.0.duration()
    }
}

/// The current document, seen by the page agent.
#[derive(Debug, Clone)]
pub struct WebPage {
    window: Window,
    document: Document,
}

impl WebPage {
    pub fn new(window: Window, document: Document) -> Self {
        Self { window, document }
    }

    /// The global window's page, if running in a document context.
    pub fn current() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self::new(window, document))
    }

    fn toast_element(&self) -> Option<HtmlElement> {
        if let Some(existing) = self.document.get_element_by_id(TOAST_ELEMENT_ID) {
            return existing.dyn_into::<HtmlElement>().ok();
        }
        let el = self
            .document
            .create_element("div")
            .ok()?
            .dyn_into::<HtmlElement>()
            .ok()?;
        el.set_id(TOAST_ELEMENT_ID);
        let style = el.style();
        for (name, value) in TOAST_STYLE {
            let _ = style.set_property(name, value);
        }
        self.document.body()?.append_child(&el).ok()?;
        Some(el)
    }
}

fn elements(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

impl PageHost for WebPage {
    type Element = Element;
    type Media = WebMedia;

    fn query_all(&self, selector: &str) -> Vec<Element> {
        match self.document.query_selector_all(selector) {
            Ok(list) => elements(&list),
            Err(err) => {
                warn!(selector, error = %js_error_text(&err), "selector rejected");
                Vec::new()
            }
        }
    }

    fn bounding_rect(&self, element: &Element) -> Rect {
        let r = element.get_bounding_client_rect();
        Rect::new(r.x(), r.y(), r.width(), r.height())
    }

    fn has_ancestor(&self, element: &Element, selector: &str) -> bool {
        matches!(element.closest(selector), Ok(Some(_)))
    }

    fn anchors(&self, element: &Element) -> Vec<(Element, String)> {
        let mut out = Vec::new();
        if element.tag_name().eq_ignore_ascii_case("a")
            && let Some(href) = element.get_attribute("href")
        {
            out.push((element.clone(), href));
        }
        if let Ok(list) = element.query_selector_all("a[href]") {
            out.extend(
                elements(&list)
                    .into_iter()
                    .filter_map(|a| a.get_attribute("href").map(|href| (a, href))),
            );
        }
        out
    }

    fn find_within(&self, element: &Element, selector: &str) -> Option<Element> {
        element.query_selector(selector).ok().flatten()
    }

    fn set_emphasis(&self, element: &Element, emphasis: Option<&Emphasis>) {
        let Some(el) = element.dyn_ref::<HtmlElement>() else {
            return;
        };
        let style = el.style();
        match emphasis {
            Some(emphasis) => {
                for (name, value) in emphasis.properties() {
                    let _ = style.set_property(name, value);
                }
            }
            None => {
                for name in Emphasis::PROPERTY_NAMES {
                    let _ = style.remove_property(name);
                }
            }
        }
    }

    fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0)
    }

    fn scroll_into_view(&self, element: &Element) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Center);
        element.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn focus_is_editable(&self) -> bool {
        let Some(active) = self.document.active_element() else {
            return false;
        };
        let content_editable = active
            .dyn_ref::<HtmlElement>()
            .is_some_and(HtmlElement::is_content_editable);
        is_editable(&active.tag_name(), content_editable)
    }

    fn blur_active(&self) {
        if let Some(active) = self.document.active_element()
            && let Some(el) = active.dyn_ref::<HtmlElement>()
        {
            let _ = el.blur();
        }
    }

    fn navigate_to(&self, url: &str) {
        if let Err(err) = self.window.location().set_href(url) {
            warn!(url, error = %js_error_text(&err), "navigation failed");
        }
    }

    fn history_back(&self) {
        if let Ok(history) = self.window.history() {
            let _ = history.back();
        }
    }

    fn open_background_tab(&self, url: &str) {
        let request = match OpenTabRequest::new(url).to_json() {
            Ok(json) => json,
            Err(err) => {
                warn!(url, error = %err, "could not encode tab request");
                return;
            }
        };
        let sent = JSON::parse(&request).and_then(|msg| runtime_send_message(&msg));
        match sent {
            Ok(promise) => spawn_local(async move {
                if let Err(err) = JsFuture::from(promise).await {
                    warn!(error = %js_error_text(&err), "background tab request failed");
                }
            }),
            Err(err) => warn!(error = %js_error_text(&err), "background tab request failed"),
        }
    }

    fn click(&self, element: &Element) {
        match element.dyn_ref::<HtmlElement>() {
            Some(el) => el.click(),
            None => debug!("activation target is not an HTMLElement"),
        }
    }

    fn media(&self) -> Option<WebMedia> {
        self.document
            .query_selector("video")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlMediaElement>().ok())
            .map(WebMedia)
    }

    fn show_toast(&self, message: &str) {
        let Some(el) = self.toast_element() else {
            return;
        };
        el.set_text_content(Some(message));
        let _ = el.style().set_property("display", "block");
    }

    fn hide_toast(&self) {
        if let Some(el) = self.document.get_element_by_id(TOAST_ELEMENT_ID)
            && let Some(el) = el.dyn_ref::<HtmlElement>()
        {
            let _ = el.style().set_property("display", "none");
        }
    }
}

/// Build a plain JS object from `(key, value)` pairs.
pub(crate) fn js_object(entries: &[(&str, JsValue)]) -> Object {
    let obj = Object::new();
    for (key, value) in entries {
        let _ = Reflect::set(&obj, &JsValue::from_str(key), value);
    }
    obj
}

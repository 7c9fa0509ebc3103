#![forbid(unsafe_code)]

//! In-memory page used by unit tests.
//!
//! Selectors are matched by exact tag name against each comma-separated part,
//! which is all the recognizer needs.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use tubenav_core::geometry::Rect;
use tubenav_core::media::MediaElement;

use crate::config::Emphasis;
use crate::host::PageHost;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FakeEl {
    Node(usize),
    Anchor(usize, usize),
    Endpoint(usize),
}

#[derive(Debug, Clone)]
pub struct FakeNode {
    pub tag: &'static str,
    pub rect: Rect,
    pub ancestors: Vec<&'static str>,
    pub anchors: Vec<String>,
    pub endpoint: bool,
}

impl FakeNode {
    pub fn card(tag: &'static str, rect: Rect) -> Self {
        Self {
            tag,
            rect,
            ancestors: Vec::new(),
            anchors: Vec::new(),
            endpoint: false,
        }
    }

    /// Main-grid video card at the given edges.
    pub fn video(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::card(
            "ytd-rich-item-renderer",
            Rect::from_edges(left, top, right, bottom),
        )
        .with_anchor("/watch?v=fake")
    }

    /// Sidebar guide entry at the given edges.
    pub fn guide(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::card(
            "ytd-guide-entry-renderer",
            Rect::from_edges(left, top, right, bottom),
        )
        .in_sidebar()
        .with_anchor("/feed/subscriptions")
    }

    pub fn with_anchor(mut self, href: &str) -> Self {
        self.anchors.push(href.to_string());
        self
    }

    pub fn with_endpoint(mut self) -> Self {
        self.endpoint = true;
        self
    }

    pub fn in_sidebar(mut self) -> Self {
        self.ancestors.push("ytd-guide-renderer");
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Scroll(FakeEl),
    Blur,
    Navigate(String),
    Back,
    OpenTab(String),
    Click(FakeEl),
    ShowToast(String),
    HideToast,
}

#[derive(Debug)]
struct MediaState {
    paused: Cell<bool>,
    time: Cell<f64>,
    duration: f64,
}

#[derive(Debug, Clone)]
pub struct FakeMedia(Rc<MediaState>);

impl FakeMedia {
    pub fn new(time: f64, duration: f64) -> Self {
        Self(Rc::new(MediaState {
            paused: Cell::new(true),
            time: Cell::new(time),
            duration,
        }))
    }
}

impl MediaElement for FakeMedia {
    fn paused(&self) -> bool {
        self.0.paused.get()
    }
    fn play(&self) {
        self.0.paused.set(false);
    }
    fn pause(&self) {
        self.0.paused.set(true);
    }
    fn current_time(&self) -> f64 {
        self.0.time.get()
    }
    fn set_current_time(&self, seconds: f64) {
        self.0.time.set(seconds);
    }
    fn duration(&self) -> f64 {
        self.0.duration
    }
}

#[derive(Debug)]
pub struct FakePage {
    nodes: RefCell<Vec<FakeNode>>,
    viewport_height: f64,
    editable_focus: Cell<bool>,
    styles: RefCell<HashMap<FakeEl, Emphasis>>,
    calls: RefCell<Vec<HostCall>>,
    media: Option<FakeMedia>,
}

impl FakePage {
    pub fn new(nodes: Vec<FakeNode>) -> Self {
        Self {
            nodes: RefCell::new(nodes),
            viewport_height: 800.0,
            editable_focus: Cell::new(false),
            styles: RefCell::new(HashMap::new()),
            calls: RefCell::new(Vec::new()),
            media: None,
        }
    }

    pub fn with_viewport_height(mut self, height: f64) -> Self {
        self.viewport_height = height;
        self
    }

    pub fn with_media(mut self, media: FakeMedia) -> Self {
        self.media = Some(media);
        self
    }

    pub fn set_editable_focus(&self, focused: bool) {
        self.editable_focus.set(focused);
    }

    pub fn set_rect(&self, index: usize, rect: Rect) {
        self.nodes.borrow_mut()[index].rect = rect;
    }

    pub fn push_node(&self, node: FakeNode) {
        self.nodes.borrow_mut().push(node);
    }

    pub fn remove_node(&self, index: usize) {
        // Keep indices stable: a removed node becomes detached (zero-size).
        self.nodes.borrow_mut()[index].rect = Rect::default();
    }

    pub fn emphasized(&self) -> Vec<FakeEl> {
        let mut els: Vec<FakeEl> = self.styles.borrow().keys().copied().collect();
        els.sort_by_key(|el| format!("{el:?}"));
        els
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: HostCall) {
        self.calls.borrow_mut().push(call);
    }

    fn node_index(el: &FakeEl) -> usize {
        match *el {
            FakeEl::Node(i) | FakeEl::Anchor(i, _) | FakeEl::Endpoint(i) => i,
        }
    }
}

fn selector_parts(selector: &str) -> impl Iterator<Item = &str> {
    selector.split(',').map(str::trim)
}

impl PageHost for FakePage {
    type Element = FakeEl;
    type Media = FakeMedia;

    fn query_all(&self, selector: &str) -> Vec<FakeEl> {
        let nodes = self.nodes.borrow();
        (0..nodes.len())
            .filter(|&i| selector_parts(selector).any(|part| part == nodes[i].tag))
            .map(FakeEl::Node)
            .collect()
    }

    fn bounding_rect(&self, element: &FakeEl) -> Rect {
        match element {
            FakeEl::Node(i) => self.nodes.borrow()[*i].rect,
            _ => Rect::default(),
        }
    }

    fn has_ancestor(&self, element: &FakeEl, selector: &str) -> bool {
        let nodes = self.nodes.borrow();
        let node = &nodes[Self::node_index(element)];
        selector_parts(selector).any(|part| node.ancestors.iter().any(|a| *a == part))
    }

    fn anchors(&self, element: &FakeEl) -> Vec<(FakeEl, String)> {
        let FakeEl::Node(i) = *element else {
            return Vec::new();
        };
        self.nodes.borrow()[i]
            .anchors
            .iter()
            .enumerate()
            .map(|(k, href)| (FakeEl::Anchor(i, k), href.clone()))
            .collect()
    }

    fn find_within(&self, element: &FakeEl, _selector: &str) -> Option<FakeEl> {
        let FakeEl::Node(i) = *element else {
            return None;
        };
        self.nodes.borrow()[i].endpoint.then_some(FakeEl::Endpoint(i))
    }

    fn set_emphasis(&self, element: &FakeEl, emphasis: Option<&Emphasis>) {
        let mut styles = self.styles.borrow_mut();
        match emphasis {
            Some(style) => {
                styles.insert(*element, style.clone());
            }
            None => {
                styles.remove(element);
            }
        }
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn scroll_into_view(&self, element: &FakeEl) {
        self.record(HostCall::Scroll(*element));
    }

    fn focus_is_editable(&self) -> bool {
        self.editable_focus.get()
    }

    fn blur_active(&self) {
        self.editable_focus.set(false);
        self.record(HostCall::Blur);
    }

    fn navigate_to(&self, url: &str) {
        self.record(HostCall::Navigate(url.to_string()));
    }

    fn history_back(&self) {
        self.record(HostCall::Back);
    }

    fn open_background_tab(&self, url: &str) {
        self.record(HostCall::OpenTab(url.to_string()));
    }

    fn click(&self, element: &FakeEl) {
        self.record(HostCall::Click(*element));
    }

    fn media(&self) -> Option<FakeMedia> {
        self.media.clone()
    }

    fn show_toast(&self, message: &str) {
        self.record(HostCall::ShowToast(message.to_string()));
    }

    fn hide_toast(&self) {
        self.record(HostCall::HideToast);
    }
}

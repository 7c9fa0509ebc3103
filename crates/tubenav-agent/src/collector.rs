#![forbid(unsafe_code)]

//! Candidate collection.
//!
//! Every call re-scans the live page: results reflect the current render
//! state, including cards inserted by infinite scroll since the last key.

use tracing::trace;

use crate::candidate::Candidate;
use crate::host::PageHost;
use crate::recognizer::CardRecognizer;

/// Recognized, visible, activatable cards.
///
/// Ordered by pattern, then document order within a pattern. An element
/// matched by several patterns is kept once, under the first.
pub fn collect<H: PageHost>(host: &H, recognizer: &CardRecognizer) -> Vec<Candidate<H::Element>> {
    let mut out: Vec<Candidate<H::Element>> = Vec::new();
    // Matches of earlier patterns. A selector never repeats an element, so
    // only cross-pattern duplicates need checking.
    let mut seen: Vec<H::Element> = Vec::new();
    let mut hidden = 0usize;
    let mut inert = 0usize;

    for pattern in &recognizer.patterns {
        let matched = host.query_all(&pattern.selector);
        for element in matched.iter().filter(|el| !seen.contains(*el)).cloned() {
            let rect = host.bounding_rect(&element);
            if rect.is_empty() {
                hidden += 1;
                continue;
            }
            let region = recognizer.region_of(host, &element, pattern);
            let Some(target) = recognizer.activation_target(host, &element, pattern.links, region)
            else {
                inert += 1;
                continue;
            };
            out.push(Candidate {
                element,
                rect,
                region,
                target,
            });
        }
        seen.extend(matched);
    }

    trace!(
        candidates = out.len(),
        hidden,
        inert,
        "collected navigation candidates"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::{ActivationTarget, Region};
    use crate::recognizer::CardPattern;
    use crate::testing::{FakeEl, FakeNode, FakePage};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tracing::Subscriber;
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tubenav_core::geometry::Rect;

    fn elements(candidates: &[Candidate<FakeEl>]) -> Vec<FakeEl> {
        candidates.iter().map(|c| c.element).collect()
    }

    #[test]
    fn collects_cards_in_pattern_then_document_order() {
        let page = FakePage::new(vec![
            FakeNode::guide(0.0, 0.0, 200.0, 40.0),
            FakeNode::video(250.0, 0.0, 450.0, 150.0),
            FakeNode::card("ytd-video-renderer", Rect::new(250.0, 200.0, 400.0, 90.0))
                .with_anchor("/watch?v=2"),
            FakeNode::video(470.0, 0.0, 670.0, 150.0),
        ]);
        let found = collect(&page, &CardRecognizer::youtube());
        // rich items first (pattern 0), then video renderers, then guide entries.
        assert_eq!(
            elements(&found),
            vec![
                FakeEl::Node(1),
                FakeEl::Node(3),
                FakeEl::Node(2),
                FakeEl::Node(0)
            ]
        );
        assert_eq!(found[3].region, Region::Sidebar);
        assert_eq!(found[0].region, Region::Main);
    }

    #[test]
    fn drops_zero_size_and_targetless_cards() {
        let page = FakePage::new(vec![
            FakeNode::video(0.0, 0.0, 200.0, 150.0),
            FakeNode::card("ytd-rich-item-renderer", Rect::new(0.0, 200.0, 0.0, 150.0))
                .with_anchor("/watch?v=hidden"),
            FakeNode::card("ytd-rich-item-renderer", Rect::new(0.0, 400.0, 200.0, 150.0))
                .with_anchor("https://example.com/ad"),
            FakeNode::card("ytd-rich-item-renderer", Rect::new(0.0, 600.0, 200.0, 150.0)),
        ]);
        let found = collect(&page, &CardRecognizer::youtube());
        assert_eq!(elements(&found), vec![FakeEl::Node(0)]);
    }

    #[test]
    fn element_matched_twice_appears_once() {
        let page = FakePage::new(vec![FakeNode::video(0.0, 0.0, 200.0, 150.0)]);
        let recognizer = CardRecognizer::youtube()
            .with_pattern(CardPattern::sidebar_entry("ytd-rich-item-renderer"));
        let found = collect(&page, &recognizer);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].region, Region::Main);
    }

    #[test]
    fn sidebar_entry_without_href_uses_endpoint() {
        let page = FakePage::new(vec![
            FakeNode::card(
                "ytd-mini-guide-entry-renderer",
                Rect::new(0.0, 0.0, 72.0, 72.0),
            )
            .with_endpoint(),
        ]);
        let found = collect(&page, &CardRecognizer::youtube());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].target, ActivationTarget::Endpoint(FakeEl::Endpoint(0)));
    }

    #[test]
    fn rescans_on_every_call() {
        let page = FakePage::new(vec![FakeNode::video(0.0, 0.0, 200.0, 150.0)]);
        let recognizer = CardRecognizer::youtube();
        assert_eq!(collect(&page, &recognizer).len(), 1);
        page.push_node(FakeNode::video(0.0, 170.0, 200.0, 320.0));
        assert_eq!(collect(&page, &recognizer).len(), 2);
        page.remove_node(0);
        assert_eq!(elements(&collect(&page, &recognizer)), vec![FakeEl::Node(1)]);
    }

    #[test]
    fn empty_page_yields_nothing() {
        let page = FakePage::new(Vec::new());
        assert!(collect(&page, &CardRecognizer::youtube()).is_empty());
    }

    /// Captures the numeric fields of the collection summary event.
    #[derive(Clone, Default)]
    struct SummaryCapture {
        fields: Arc<Mutex<HashMap<&'static str, u64>>>,
    }

    impl<S: Subscriber> Layer<S> for SummaryCapture {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            struct CountVisitor(HashMap<&'static str, u64>);
            impl tracing::field::Visit for CountVisitor {
                fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
                    self.0.insert(field.name(), value);
                }
                fn record_debug(&mut self, _: &tracing::field::Field, _: &dyn std::fmt::Debug) {}
            }
            let mut visitor = CountVisitor(HashMap::new());
            event.record(&mut visitor);
            if visitor.0.contains_key("candidates") {
                *self.fields.lock().expect("summary lock") = visitor.0;
            }
        }
    }

    #[test]
    fn summary_event_counts_skipped_cards() {
        let capture = SummaryCapture::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());
        let _guard = tracing::subscriber::set_default(subscriber);
        tracing::callsite::rebuild_interest_cache();

        let page = FakePage::new(vec![
            FakeNode::video(0.0, 0.0, 200.0, 150.0),
            FakeNode::card("ytd-rich-item-renderer", Rect::new(0.0, 200.0, 0.0, 0.0))
                .with_anchor("/watch?v=hidden"),
            FakeNode::card("ytd-rich-item-renderer", Rect::new(0.0, 400.0, 200.0, 150.0)),
        ]);
        collect(&page, &CardRecognizer::youtube());

        let fields = capture.fields.lock().expect("summary lock");
        assert_eq!(fields.get("candidates"), Some(&1));
        assert_eq!(fields.get("hidden"), Some(&1));
        assert_eq!(fields.get("inert"), Some(&1));
    }

    thread_local! {
        static COMPARISONS: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
    }

    /// Element whose equality checks are counted.
    #[derive(Debug, Clone, Copy)]
    struct Counted(FakeEl);

    impl PartialEq for Counted {
        fn eq(&self, other: &Self) -> bool {
            COMPARISONS.with(|c| c.set(c.get() + 1));
            self.0 == other.0
        }
    }

    struct CountingPage(FakePage);

    impl PageHost for CountingPage {
        type Element = Counted;
        type Media = crate::testing::FakeMedia;

        fn query_all(&self, selector: &str) -> Vec<Counted> {
            self.0.query_all(selector).into_iter().map(Counted).collect()
        }
        fn bounding_rect(&self, element: &Counted) -> Rect {
            self.0.bounding_rect(&element.0)
        }
        fn has_ancestor(&self, element: &Counted, selector: &str) -> bool {
            self.0.has_ancestor(&element.0, selector)
        }
        fn anchors(&self, element: &Counted) -> Vec<(Counted, String)> {
            self.0
                .anchors(&element.0)
                .into_iter()
                .map(|(el, href)| (Counted(el), href))
                .collect()
        }
        fn find_within(&self, element: &Counted, selector: &str) -> Option<Counted> {
            self.0.find_within(&element.0, selector).map(Counted)
        }
        fn set_emphasis(&self, element: &Counted, emphasis: Option<&crate::config::Emphasis>) {
            self.0.set_emphasis(&element.0, emphasis);
        }
        fn viewport_height(&self) -> f64 {
            self.0.viewport_height()
        }
        fn scroll_into_view(&self, element: &Counted) {
            self.0.scroll_into_view(&element.0);
        }
        fn focus_is_editable(&self) -> bool {
            self.0.focus_is_editable()
        }
        fn blur_active(&self) {
            self.0.blur_active();
        }
        fn navigate_to(&self, url: &str) {
            self.0.navigate_to(url);
        }
        fn history_back(&self) {
            self.0.history_back();
        }
        fn open_background_tab(&self, url: &str) {
            self.0.open_background_tab(url);
        }
        fn click(&self, element: &Counted) {
            self.0.click(&element.0);
        }
        fn media(&self) -> Option<Self::Media> {
            self.0.media()
        }
        fn show_toast(&self, message: &str) {
            self.0.show_toast(message);
        }
        fn hide_toast(&self) {
            self.0.hide_toast();
        }
    }

    #[test]
    fn single_pattern_feed_needs_no_identity_checks() {
        let nodes = (0..200)
            .map(|i| {
                let y = f64::from(i) * 160.0;
                FakeNode::video(0.0, y, 200.0, y + 150.0)
            })
            .collect();
        let page = CountingPage(FakePage::new(nodes));
        COMPARISONS.with(|c| c.set(0));

        let found = collect(&page, &CardRecognizer::youtube());

        assert_eq!(found.len(), 200);
        assert_eq!(COMPARISONS.with(std::cell::Cell::get), 0);
    }
}

#![forbid(unsafe_code)]

//! The single highlighted card.
//!
//! At most one element carries the emphasis style. The selection is only
//! valid while its element is present in the latest candidate list; callers
//! check with [`Selection::index_in`] before every directional move.

use tracing::debug;

use crate::candidate::Candidate;
use crate::config::Emphasis;
use crate::host::PageHost;

/// Currently selected element, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<E> {
    current: Option<E>,
}

impl<E> Default for Selection<E> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<E: Clone + PartialEq> Selection<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&E> {
        self.current.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Position of the selected element within `candidates`.
    pub fn index_in(&self, candidates: &[Candidate<E>]) -> Option<usize> {
        let current = self.current.as_ref()?;
        candidates.iter().position(|c| &c.element == current)
    }

    /// Move the highlight to `candidate`.
    ///
    /// Scrolls only when the card is within `margin` of the viewport's top or
    /// bottom edge (or beyond it).
    pub fn select<H>(&mut self, host: &H, candidate: &Candidate<E>, emphasis: &Emphasis, margin: f64)
    where
        H: PageHost<Element = E>,
    {
        if let Some(previous) = self.current.take()
            && previous != candidate.element
        {
            host.set_emphasis(&previous, None);
        }
        host.set_emphasis(&candidate.element, Some(emphasis));

        let rect = candidate.rect;
        if rect.top() < margin || rect.bottom() > host.viewport_height() - margin {
            host.scroll_into_view(&candidate.element);
        }
        self.current = Some(candidate.element.clone());
    }

    /// Remove the highlight. Never scrolls.
    pub fn clear<H>(&mut self, host: &H)
    where
        H: PageHost<Element = E>,
    {
        if let Some(previous) = self.current.take() {
            host.set_emphasis(&previous, None);
            debug!("selection cleared");
        }
    }

    /// Index of a valid selection, selecting the first candidate if needed.
    ///
    /// Returns `None` only when `candidates` is empty.
    pub fn ensure<H>(
        &mut self,
        host: &H,
        candidates: &[Candidate<E>],
        emphasis: &Emphasis,
        margin: f64,
    ) -> Option<usize>
    where
        H: PageHost<Element = E>,
    {
        if let Some(index) = self.index_in(candidates) {
            return Some(index);
        }
        let first = candidates.first()?;
        self.select(host, first, emphasis, margin);
        Some(0)
    }
}

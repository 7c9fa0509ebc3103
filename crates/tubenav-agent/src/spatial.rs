#![forbid(unsafe_code)]

//! Spatial navigation: directional card movement based on on-screen geometry.
//!
//! Given the collected cards and the current one, finds the best candidate in
//! a direction with a two-tier search, then a cross-region fallback.
//!
//! # Algorithm
//!
//! 1. **Strict test.** Up/Down: the candidate's center must be past the
//!    origin's center by more than `epsilon`. Left/Right: the candidate's near
//!    edge must be at or beyond the origin's far edge (within `epsilon`), and
//!    the two vertical spans must overlap.
//! 2. **Score** each valid candidate as `primary × axis_weight + secondary`,
//!    where `primary` is the gap along the movement axis and `secondary` the
//!    perpendicular center offset. Lowest score wins; with the default weight
//!    of 1000 axis distance always dominates alignment.
//! 3. **Same-row band** (Left/Right only, when step 1 finds nothing): keep
//!    candidates whose center is within `row_band_ratio × height` of the
//!    origin's center row and strictly past it horizontally; score by
//!    horizontal then vertical distance.
//! 4. **Cross-region.** Sidebar → Right → nearest main card by vertical center
//!    among those whose center clears the sidebar card's right edge.
//!    Main → Left → nearest sidebar card by vertical center.
//!
//! # Invariants
//!
//! - Down never yields a card whose center is not below the origin's by more
//!   than `epsilon` (and symmetrically for Up). No fallback runs vertically.
//! - Deterministic: same geometry and direction → same index. Ties go to the
//!   earlier card in collection order.
//! - Not reversible: Right then Left may land elsewhere when a fallback tier
//!   picked the first hop.

use serde::{Deserialize, Serialize};
use tubenav_core::geometry::{NavDirection, Rect};

use crate::candidate::Region;

/// Geometry and region of one card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavItem {
    pub rect: Rect,
    pub region: Region,
}

impl NavItem {
    #[must_use]
    pub const fn new(rect: Rect, region: Region) -> Self {
        Self { rect, region }
    }

    /// Main-region item.
    #[must_use]
    pub const fn main(rect: Rect) -> Self {
        Self::new(rect, Region::Main)
    }

    /// Sidebar item.
    #[must_use]
    pub const fn sidebar(rect: Rect) -> Self {
        Self::new(rect, Region::Sidebar)
    }
}

/// Tuning for the directional search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialParams {
    /// Pixel tolerance against sub-pixel rounding.
    pub epsilon: f64,
    /// Multiplier that makes the movement axis dominate.
    pub axis_weight: f64,
    /// Same-row band half-height, as a fraction of the origin's height.
    pub row_band_ratio: f64,
    /// Restrict the first search to the origin's region.
    pub scope_to_region: bool,
}

impl Default for SpatialParams {
    fn default() -> Self {
        Self {
            epsilon: 4.0,
            axis_weight: 1000.0,
            row_band_ratio: 0.6,
            scope_to_region: true,
        }
    }
}

/// Best target from `current` in `dir`: scoped search, then cross-region.
///
/// Returns `None` when nothing qualifies or `current` is out of range.
#[must_use]
pub fn next(
    items: &[NavItem],
    current: usize,
    dir: NavDirection,
    params: &SpatialParams,
) -> Option<usize> {
    let origin = items.get(current)?;
    let scope = params.scope_to_region.then_some(origin.region);
    find_in_direction(items, current, dir, params, scope)
        .or_else(|| cross_region(items, current, dir, params))
}

/// Strict test plus same-row band, over items in `scope` (all when `None`).
#[must_use]
pub fn find_in_direction(
    items: &[NavItem],
    current: usize,
    dir: NavDirection,
    params: &SpatialParams,
    scope: Option<Region>,
) -> Option<usize> {
    let origin = items.get(current)?.rect;
    let candidates = || {
        items
            .iter()
            .enumerate()
            .filter(move |&(idx, item)| {
                idx != current && scope.is_none_or(|region| item.region == region)
            })
            .map(|(idx, item)| (idx, &item.rect))
    };

    let strict = lowest_score(candidates().filter_map(|(idx, rect)| {
        strict_score(&origin, rect, dir, params).map(|score| (idx, score))
    }));
    if strict.is_some() || !dir.is_horizontal() {
        return strict;
    }

    lowest_score(candidates().filter_map(|(idx, rect)| {
        band_score(&origin, rect, dir, params).map(|score| (idx, score))
    }))
}

/// Cross-region fallback between the sidebar and the main grid.
#[must_use]
pub fn cross_region(
    items: &[NavItem],
    current: usize,
    dir: NavDirection,
    params: &SpatialParams,
) -> Option<usize> {
    let origin = items.get(current)?;
    let (target_region, needs_clearance) = match (origin.region, dir) {
        (Region::Sidebar, NavDirection::Right) => (Region::Main, true),
        (Region::Main, NavDirection::Left) => (Region::Sidebar, false),
        _ => return None,
    };

    let o = origin.rect;
    let (ocx, ocy) = o.center();
    lowest_score(
        items
            .iter()
            .enumerate()
            .filter(|&(idx, item)| idx != current && item.region == target_region)
            .filter_map(|(idx, item)| {
                let (tx, ty) = item.rect.center();
                if needs_clearance && !(tx > o.right()) {
                    return None;
                }
                let score = (ty - ocy).abs() * params.axis_weight + (tx - ocx).abs();
                Some((idx, score))
            }),
    )
}

/// Score under the strict directional test, `None` if the test fails.
fn strict_score(o: &Rect, r: &Rect, dir: NavDirection, params: &SpatialParams) -> Option<f64> {
    let eps = params.epsilon;
    let (ocx, ocy) = o.center();
    let (tx, ty) = r.center();

    let (valid, primary, secondary) = match dir {
        NavDirection::Down => (ty - ocy > eps, ty - ocy, (tx - ocx).abs()),
        NavDirection::Up => (ocy - ty > eps, ocy - ty, (tx - ocx).abs()),
        NavDirection::Right => (
            r.left() >= o.right() - eps && r.vertical_overlap(o),
            (r.left() - o.right()).max(0.0),
            (ty - ocy).abs(),
        ),
        NavDirection::Left => (
            r.right() <= o.left() + eps && r.vertical_overlap(o),
            (o.left() - r.right()).max(0.0),
            (ty - ocy).abs(),
        ),
    };

    valid.then(|| primary * params.axis_weight + secondary)
}

/// Score under the same-row band heuristic (horizontal only).
fn band_score(o: &Rect, r: &Rect, dir: NavDirection, params: &SpatialParams) -> Option<f64> {
    let eps = params.epsilon;
    let (ocx, ocy) = o.center();
    let (tx, ty) = r.center();
    let dy = (ty - ocy).abs();

    if !(dy <= o.height * params.row_band_ratio) {
        return None;
    }
    let ordered = match dir {
        NavDirection::Right => tx > ocx + eps,
        NavDirection::Left => tx < ocx - eps,
        NavDirection::Up | NavDirection::Down => false,
    };
    ordered.then(|| (tx - ocx).abs() * params.axis_weight + dy)
}

/// Index with the lowest finite score; earlier indices win ties.
fn lowest_score(scored: impl Iterator<Item = (usize, f64)>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, score) in scored {
        if !score.is_finite() {
            continue;
        }
        if best.is_none_or(|(_, best_score)| score < best_score) {
            best = Some((idx, score));
        }
    }
    best.map(|(idx, _)| idx)
}

// =========================================================================
// Tests
// =========================================================================

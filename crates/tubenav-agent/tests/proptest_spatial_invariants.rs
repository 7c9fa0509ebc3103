//! Property-based invariant tests for the spatial navigator.
//!
//! 1. Vertical moves never pick a card that is not past the origin's center.
//! 2. The result is always a different, in-range index.
//! 3. Scoped search stays in the origin's region.
//! 4. Sidebar → Right fallback lands on a main card clearing the sidebar edge.
//! 5. Determinism: same layout, same answer.

use proptest::prelude::*;
use proptest::sample::Index;
use tubenav_agent::Region;
use tubenav_agent::spatial::{NavItem, SpatialParams, cross_region, find_in_direction, next};
use tubenav_core::geometry::{NavDirection, Rect};

// ── Helpers ─────────────────────────────────────────────────────────────

fn item() -> impl Strategy<Value = NavItem> {
    (0.0..2000.0f64, 0.0..3000.0f64, 1.0..400.0f64, 1.0..400.0f64, any::<bool>()).prop_map(
        |(x, y, w, h, sidebar)| {
            let region = if sidebar { Region::Sidebar } else { Region::Main };
            NavItem::new(Rect::new(x, y, w, h), region)
        },
    )
}

fn layout() -> impl Strategy<Value = Vec<NavItem>> {
    proptest::collection::vec(item(), 1..=40)
}

fn direction() -> impl Strategy<Value = NavDirection> {
    prop::sample::select(NavDirection::ALL.to_vec())
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Vertical moves respect the center test
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn down_is_strictly_below(items in layout(), pick in any::<Index>()) {
        let params = SpatialParams::default();
        let current = pick.index(items.len());
        if let Some(found) = next(&items, current, NavDirection::Down, &params) {
            let (_, oy) = items[current].rect.center();
            let (_, ty) = items[found].rect.center();
            prop_assert!(ty - oy > params.epsilon, "down picked {found} at {ty} from {oy}");
        }
    }

    #[test]
    fn up_is_strictly_above(items in layout(), pick in any::<Index>()) {
        let params = SpatialParams::default();
        let current = pick.index(items.len());
        if let Some(found) = next(&items, current, NavDirection::Up, &params) {
            let (_, oy) = items[current].rect.center();
            let (_, ty) = items[found].rect.center();
            prop_assert!(oy - ty > params.epsilon, "up picked {found} at {ty} from {oy}");
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Result is a different, valid index
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn result_is_other_valid_index(
        items in layout(),
        pick in any::<Index>(),
        dir in direction(),
    ) {
        let current = pick.index(items.len());
        if let Some(found) = next(&items, current, dir, &SpatialParams::default()) {
            prop_assert!(found < items.len());
            prop_assert_ne!(found, current);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Scoped search stays in region
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn scoped_search_stays_in_region(
        items in layout(),
        pick in any::<Index>(),
        dir in direction(),
    ) {
        let current = pick.index(items.len());
        let region = items[current].region;
        let params = SpatialParams::default();
        if let Some(found) = find_in_direction(&items, current, dir, &params, Some(region)) {
            prop_assert_eq!(items[found].region, region);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Sidebar → main fallback
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn sidebar_right_lands_on_main_clearing_edge(items in layout(), pick in any::<Index>()) {
        let current = pick.index(items.len());
        let params = SpatialParams::default();
        let result = cross_region(&items, current, NavDirection::Right, &params);
        if items[current].region != Region::Sidebar {
            prop_assert_eq!(result, None);
        } else if let Some(found) = result {
            prop_assert_eq!(items[found].region, Region::Main);
            let (tx, _) = items[found].rect.center();
            prop_assert!(tx > items[current].rect.right());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Determinism
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn deterministic(items in layout(), pick in any::<Index>(), dir in direction()) {
        let current = pick.index(items.len());
        let params = SpatialParams::default();
        let first = next(&items, current, dir, &params);
        let cloned = items.clone();
        prop_assert_eq!(first, next(&cloned, current, dir, &params));
    }
}

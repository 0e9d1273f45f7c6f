//! Property-based tests for layout and indexing invariants.
//!
//! Tests validate:
//! 1. Layout is a pure function of (row, width) and height agrees with it
//! 2. The expand control appears exactly when the bounded body is shorter than the full body
//! 3. Expanding never shrinks a row and always removes the control
//! 4. Height index offsets are prefix sums of the row heights
//! 5. Rating glyphs always show five stars

use proptest::prelude::*;
use reviewlist::model::{ReviewRecord, RowFactory, RowModel, Typography};
use reviewlist::view::render::rating_glyphs;
use reviewlist::view_state::{HeightIndex, RowLayoutEngine};

fn body_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-z]{1,12}( [a-z]{1,12}){0,80}",
    ]
}

fn row(text: String, max_lines: usize, typography: Typography) -> RowModel {
    RowFactory::new(typography, max_lines).make_row(ReviewRecord {
        text,
        created: "3 March 2024".to_string(),
        first_name: "Jo".to_string(),
        last_name: "Doe".to_string(),
        rating: 3,
        avatar_url: None,
    })
}

// ===== Property 1: Determinism =====

proptest! {
    #[test]
    fn layout_is_deterministic(text in body_text(), width in 0.0f64..800.0, max_lines in 0usize..6) {
        let row = row(text, max_lines, Typography::default());
        let first = RowLayoutEngine::default().layout(&row, width);
        let second = RowLayoutEngine::default().layout(&row, width);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn height_equals_layout_total(text in body_text(), width in 0.0f64..800.0, max_lines in 0usize..6) {
        let engine = RowLayoutEngine::terminal();
        let row = row(text, max_lines, Typography::terminal());
        prop_assert_eq!(engine.height(&row, width), engine.layout(&row, width).total_height);
    }

    #[test]
    fn timestamp_closes_the_row(text in body_text(), width in 40.0f64..800.0) {
        let engine = RowLayoutEngine::default();
        let layout = engine.layout(&row(text, 3, Typography::default()), width);
        let bottom = layout.timestamp.y + layout.timestamp.height + engine.metrics().insets.bottom;
        prop_assert!((layout.total_height - bottom).abs() < 1e-9);
        prop_assert!(layout.name.y < layout.rating.y);
        prop_assert!(layout.rating.y < layout.timestamp.y);
    }
}

// ===== Property 2 & 3: Expand Control =====

proptest! {
    #[test]
    fn expand_control_iff_body_truncated(text in body_text(), width in 0.0f64..800.0, max_lines in 0usize..6) {
        let engine = RowLayoutEngine::default();
        let row = row(text, max_lines, Typography::default());
        let column = engine.text_column_width(width);
        let metrics = engine.text_metrics();

        let bounded = metrics.measure(row.styled_text(), column, row.max_lines());
        let unbounded = metrics.measure_unbounded(row.styled_text(), column);
        let expected = max_lines != 0 && unbounded.height > bounded.height;

        let layout = engine.layout(&row, width);
        prop_assert_eq!(layout.shows_expand_control, expected);
        prop_assert_eq!(layout.expand_control.width > 0.0, expected);
    }

    #[test]
    fn expanding_removes_control_and_never_shrinks(text in body_text(), width in 0.0f64..800.0) {
        let engine = RowLayoutEngine::default();
        let collapsed = row(text, 3, Typography::default());
        let expanded = collapsed.expanded();

        let before = engine.layout(&collapsed, width);
        let after = engine.layout(&expanded, width);
        prop_assert!(!after.shows_expand_control);
        prop_assert!(after.body.height >= before.body.height);
        if !before.shows_expand_control {
            prop_assert_eq!(after.total_height, before.total_height);
        }
        prop_assert_eq!(expanded.id(), collapsed.id());
    }
}

// ===== Property 4: Height Index =====

proptest! {
    #[test]
    fn offsets_are_prefix_sums(heights in prop::collection::vec(0usize..50, 0..200)) {
        let index = HeightIndex::from_heights(heights.iter().copied());
        let mut running = 0;
        for (i, &height) in heights.iter().enumerate() {
            prop_assert_eq!(index.offset_of(i), running);
            if height > 0 {
                prop_assert_eq!(index.lower_bound(running), Some(i));
            }
            running += height;
        }
        prop_assert_eq!(index.total(), running);
        prop_assert_eq!(index.lower_bound(running), None);
    }
}

// ===== Property 5: Rating Glyphs =====

proptest! {
    #[test]
    fn rating_glyphs_show_clamped_count(rating in any::<i32>()) {
        let glyphs = rating_glyphs(rating);
        prop_assert_eq!(glyphs.chars().count(), 5);
        let filled = glyphs.chars().filter(|&c| c == '★').count() as i32;
        prop_assert_eq!(filled, rating.clamp(0, 5));
    }
}

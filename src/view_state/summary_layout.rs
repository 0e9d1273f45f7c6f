//! Geometry of the trailing "Total reviews: N" row.

use super::layout_params::LayoutMetrics;
use super::text_metrics::TextMetrics;
use super::types::Rect;
use crate::model::{StyledText, Typography};

/// Frames of the summary row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryLayout {
    /// Centered label.
    pub label: Rect,
    /// Row height, never below the configured floor.
    pub total_height: f64,
}

/// Label text for a total of `total_count` reviews.
pub fn summary_text(total_count: usize) -> String {
    format!("Total reviews: {total_count}")
}

/// Styled summary label.
pub fn summary_label(total_count: usize, typography: &Typography) -> StyledText {
    StyledText::new(
        summary_text(total_count),
        typography.summary,
        typography.summary_color,
    )
}

/// Lays out the summary row.
///
/// The text is measured in `width - 2 * horizontal_padding`; the row is never shorter than
/// `summary_min_height`.
pub fn layout_summary(
    total_count: usize,
    width: f64,
    metrics: &LayoutMetrics,
    typography: &Typography,
    text_metrics: &TextMetrics,
) -> SummaryLayout {
    let label = summary_label(total_count, typography);
    let available = (width - 2.0 * metrics.summary_horizontal_padding).max(0.0);
    let text = text_metrics.measure_unbounded(&label, available);

    let total_height = metrics
        .summary_min_height
        .max(text.height + metrics.summary_vertical_padding);
    let x = ((width - text.width) / 2.0).max(0.0);
    let y = ((total_height - text.height) / 2.0).max(0.0);

    SummaryLayout {
        label: Rect::from_origin_size(x, y, text),
        total_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view_state::types::Size;

    fn point_layout(total: usize, width: f64) -> SummaryLayout {
        layout_summary(
            total,
            width,
            &LayoutMetrics::default(),
            &Typography::default(),
            &TextMetrics::new(),
        )
    }

    #[test]
    fn summary_text_format() {
        assert_eq!(summary_text(57), "Total reviews: 57");
    }

    #[test]
    fn single_line_summary_hits_height_floor() {
        // 14pt font: 16.8pt line + 20pt padding = 36.8 < 44
        let layout = point_layout(57, 375.0);
        assert_eq!(layout.total_height, 44.0);
    }

    #[test]
    fn label_is_centered() {
        let layout = point_layout(57, 375.0);
        let left = layout.label.x;
        let right = 375.0 - layout.label.max_x();
        assert!((left - right).abs() < 1e-9, "left {left} vs right {right}");
        let top = layout.label.y;
        let bottom = layout.total_height - layout.label.max_y();
        assert!((top - bottom).abs() < 1e-9, "top {top} vs bottom {bottom}");
    }

    #[test]
    fn narrow_width_wraps_and_grows_past_floor() {
        // 24pt available fits only "Total" per line
        let layout = point_layout(57, 48.0);
        assert!(layout.label.height > Typography::default().summary.line_height);
        assert!(layout.total_height > 44.0);
        assert_eq!(
            layout.total_height,
            layout.label.height + LayoutMetrics::default().summary_vertical_padding
        );
    }

    #[test]
    fn terminal_summary_is_two_cells() {
        let layout = layout_summary(
            57,
            40.0,
            &LayoutMetrics::terminal(),
            &Typography::terminal(),
            &TextMetrics::new(),
        );
        assert_eq!(layout.total_height, 2.0);
        assert_eq!(layout.label.width, 17.0);
        assert_eq!(layout.label.height, 1.0);
    }

    #[test]
    fn zero_width_keeps_minimum_height() {
        let layout = point_layout(3, 0.0);
        assert_eq!(layout.total_height, 44.0);
        assert_eq!(layout.label.size(), Size::ZERO);
    }
}

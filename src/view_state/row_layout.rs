//! Row geometry for review rows.
//!
//! This is THE canonical implementation: `height` delegates to `layout`, so the height a list
//! asks for and the frames a renderer places can never disagree.
//!
//! # Contract
//! - Pure function of `(row, max_width)`: no state is written between calls
//! - Expand control shown iff `max_lines != 0` and the unbounded body is taller than the bounded
//!   body, both measured with the same font and width
//! - Absent elements (empty body, hidden control) get [`Rect::ZERO`] and add no spacing

use super::layout_params::LayoutMetrics;
use super::text_metrics::TextMetrics;
use super::types::{Rect, Size};
use crate::model::{RowModel, StyledText, Typography};

/// Frames of every element of a review row plus the row height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutResult {
    /// Avatar square.
    pub avatar: Rect,
    /// Reviewer name, one line.
    pub name: Rect,
    /// Five-star strip.
    pub rating: Rect,
    /// Review body; zero when the body is empty.
    pub body: Rect,
    /// "Show more" control; zero when not shown.
    pub expand_control: Rect,
    /// Creation timestamp.
    pub timestamp: Rect,
    /// Whether the "show more" control is present.
    pub shows_expand_control: bool,
    /// Height of the whole row.
    pub total_height: f64,
}

/// Computes [`LayoutResult`]s. Holds only constants and a measurement memo, so it can be shared
/// across threads for off-main-thread precomputation.
#[derive(Debug)]
pub struct RowLayoutEngine {
    metrics: LayoutMetrics,
    typography: Typography,
    text_metrics: TextMetrics,
    show_more: StyledText,
    show_more_size: Size,
}

impl Default for RowLayoutEngine {
    fn default() -> Self {
        Self::new(LayoutMetrics::default(), Typography::default())
    }
}

impl RowLayoutEngine {
    /// Engine with its own wrap memo.
    pub fn new(metrics: LayoutMetrics, typography: Typography) -> Self {
        let text_metrics = TextMetrics::new();
        let show_more = StyledText::new(
            metrics.show_more_label,
            typography.show_more,
            typography.show_more_color,
        );
        let show_more_size = text_metrics.measure_unbounded(&show_more, f64::INFINITY);

        Self {
            metrics,
            typography,
            text_metrics,
            show_more,
            show_more_size,
        }
    }

    /// Engine configured for terminal cells.
    pub fn terminal() -> Self {
        Self::new(LayoutMetrics::terminal(), Typography::terminal())
    }

    /// Spacing and size constants.
    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    /// Fonts used for labels the row model does not carry.
    pub fn typography(&self) -> &Typography {
        &self.typography
    }

    /// Measurer shared by every layout of this engine.
    pub fn text_metrics(&self) -> &TextMetrics {
        &self.text_metrics
    }

    /// Styled label of the expand control.
    pub fn show_more_label(&self) -> &StyledText {
        &self.show_more
    }

    /// Fixed size of the expand control.
    pub fn show_more_size(&self) -> Size {
        self.show_more_size
    }

    /// Width available to name, rating, body and timestamp.
    pub fn text_column_width(&self, max_width: f64) -> f64 {
        let m = &self.metrics;
        let content_width = max_width - m.insets.horizontal();
        (content_width - (m.avatar_size + m.avatar_to_name)).max(0.0)
    }

    /// Row height for `row` at `max_width`.
    pub fn height(&self, row: &RowModel, max_width: f64) -> f64 {
        self.layout(row, max_width).total_height
    }

    /// Full geometry for `row` at `max_width`.
    pub fn layout(&self, row: &RowModel, max_width: f64) -> LayoutResult {
        let m = &self.metrics;
        let mut y = m.insets.top;

        // 1. Avatar in the top-left content corner
        let avatar = Rect::new(m.insets.left, y, m.avatar_size, m.avatar_size);

        // Everything else sits in the column to the right of the avatar
        let column_x = avatar.max_x() + m.avatar_to_name;
        let column_width = self.text_column_width(max_width);

        // 2. Name, top-aligned with the avatar
        let name = Rect::new(column_x, y, column_width, self.typography.name.line_height);
        y = name.max_y() + m.name_to_rating;

        // 3. Rating: sized for the full star count, whatever the value
        let rating = Rect::new(column_x, y, m.rating_width(), m.star_height);
        y = rating.max_y() + m.rating_to_text;

        // 4. Body, measured bounded and unbounded with the same font and width
        let text = row.styled_text();
        let mut body = Rect::ZERO;
        let mut shows_expand_control = false;
        if !text.is_empty() {
            let bounded = self.text_metrics.measure(text, column_width, row.max_lines());
            let unbounded = self.text_metrics.measure_unbounded(text, column_width);
            shows_expand_control = row.max_lines() != 0 && unbounded.height > bounded.height;

            body = Rect::from_origin_size(column_x, y, bounded);
            y = body.max_y() + m.text_to_created;
        }

        // 5. Expand control, absent unless the body is truncated
        let mut expand_control = Rect::ZERO;
        if shows_expand_control {
            expand_control = Rect::from_origin_size(column_x, y, self.show_more_size);
            y = expand_control.max_y() + m.show_more_to_created;
        }

        // 6. Timestamp, always last
        let created = self
            .text_metrics
            .measure_unbounded(row.styled_created(), column_width);
        let timestamp = Rect::from_origin_size(column_x, y, created);

        LayoutResult {
            avatar,
            name,
            rating,
            body,
            expand_control,
            timestamp,
            shows_expand_control,
            total_height: timestamp.max_y() + m.insets.bottom,
        }
    }
}

#[cfg(test)]
#[path = "row_layout_tests.rs"]
mod tests;

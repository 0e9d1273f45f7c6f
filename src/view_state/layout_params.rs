//! Fixed layout constants for review and summary rows.

use super::types::EdgeInsets;

/// Constants that drive row geometry.
///
/// None of these are derived from content. `Default` reproduces the point metrics of the
/// reviews screen; [`LayoutMetrics::terminal`] scales them down to terminal cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMetrics {
    /// Distances from the row edges to its content.
    pub insets: EdgeInsets,
    /// Side of the square avatar.
    pub avatar_size: f64,
    /// Gap between avatar and name.
    pub avatar_to_name: f64,
    /// Gap between name and stars.
    pub name_to_rating: f64,
    /// Gap between stars and body.
    pub rating_to_text: f64,
    /// Gap after the body.
    pub text_to_created: f64,
    /// Gap between the expand control and the timestamp.
    pub show_more_to_created: f64,
    /// Width of one star glyph.
    pub star_width: f64,
    /// Height of the star strip.
    pub star_height: f64,
    /// Gap between stars.
    pub star_spacing: f64,
    /// Stars drawn regardless of the rating.
    pub star_count: u32,
    /// Label of the expand control.
    pub show_more_label: &'static str,
    /// Horizontal padding of the trailing summary row.
    pub summary_horizontal_padding: f64,
    /// Vertical padding added around the summary text.
    pub summary_vertical_padding: f64,
    /// Height floor for the summary row.
    pub summary_min_height: f64,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            insets: EdgeInsets::new(9.0, 12.0, 9.0, 12.0),
            avatar_size: 36.0,
            avatar_to_name: 10.0,
            name_to_rating: 6.0,
            rating_to_text: 6.0,
            text_to_created: 6.0,
            show_more_to_created: 6.0,
            star_width: 16.0,
            star_height: 16.0,
            star_spacing: 1.0,
            star_count: 5,
            show_more_label: "Show more...",
            summary_horizontal_padding: 12.0,
            summary_vertical_padding: 20.0,
            summary_min_height: 44.0,
        }
    }
}

impl LayoutMetrics {
    /// Cell metrics: one blank line between rows, no vertical spacing inside a row.
    pub fn terminal() -> Self {
        Self {
            insets: EdgeInsets::new(0.0, 1.0, 1.0, 1.0),
            avatar_size: 2.0,
            avatar_to_name: 1.0,
            name_to_rating: 0.0,
            rating_to_text: 0.0,
            text_to_created: 0.0,
            show_more_to_created: 0.0,
            star_width: 1.0,
            star_height: 1.0,
            star_spacing: 1.0,
            star_count: 5,
            show_more_label: "Show more...",
            summary_horizontal_padding: 1.0,
            summary_vertical_padding: 1.0,
            summary_min_height: 2.0,
        }
    }

    /// Width of the rating graphic. Independent of the actual rating.
    pub fn rating_width(&self) -> f64 {
        let stars = f64::from(self.star_count);
        if self.star_count == 0 {
            return 0.0;
        }
        (self.star_width + self.star_spacing) * stars - self.star_spacing
    }
}

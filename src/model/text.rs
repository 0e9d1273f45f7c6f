//! Styled text primitives shared by the row model and the layout engine.

use ratatui::style::Color;
use std::sync::Arc;

/// Font metrics used for measurement.
///
/// Measurement is metric-driven rather than glyph-driven: every unicode column advances by
/// `glyph_advance` and every line is `line_height` tall. The same struct describes a point-based
/// font (`Font::system`) and a terminal cell (`Font::cell`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    /// Nominal size in points.
    pub point_size: f64,
    /// Height of one rendered line.
    pub line_height: f64,
    /// Horizontal advance of a single-column glyph.
    pub glyph_advance: f64,
    /// Bold weight.
    pub bold: bool,
}

impl Font {
    const LINE_HEIGHT_RATIO: f64 = 1.2;
    const REGULAR_ADVANCE_RATIO: f64 = 0.5;
    const BOLD_ADVANCE_RATIO: f64 = 0.55;

    /// Regular system font at `size` points.
    pub fn system(size: f64) -> Self {
        Self {
            point_size: size,
            line_height: size * Self::LINE_HEIGHT_RATIO,
            glyph_advance: size * Self::REGULAR_ADVANCE_RATIO,
            bold: false,
        }
    }

    /// Bold system font at `size` points.
    pub fn bold_system(size: f64) -> Self {
        Self {
            point_size: size,
            line_height: size * Self::LINE_HEIGHT_RATIO,
            glyph_advance: size * Self::BOLD_ADVANCE_RATIO,
            bold: true,
        }
    }

    /// One terminal cell per column, one row per line.
    pub fn cell() -> Self {
        Self {
            point_size: 1.0,
            line_height: 1.0,
            glyph_advance: 1.0,
            bold: false,
        }
    }

    /// Same metrics with the weight replaced.
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Bit-exact representation, used as a hash key.
    pub(crate) fn key_bits(&self) -> (u64, u64, u64, bool) {
        (
            self.point_size.to_bits(),
            self.line_height.to_bits(),
            self.glyph_advance.to_bits(),
            self.bold,
        )
    }
}

/// Text together with the font and color it is rendered in.
///
/// The text is reference counted so snapshots and memo keys share one allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledText {
    text: Arc<str>,
    font: Font,
    color: Color,
}

impl StyledText {
    /// Styled text from any string-like value.
    pub fn new(text: impl Into<Arc<str>>, font: Font, color: Color) -> Self {
        Self {
            text: text.into(),
            font,
            color,
        }
    }

    /// The raw text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn shared_text(&self) -> &Arc<str> {
        &self.text
    }

    /// Font the text is measured and drawn with.
    pub fn font(&self) -> Font {
        self.font
    }

    /// Foreground color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// True for an empty string.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Fonts and colors for every text element of the review list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Typography {
    /// Review body.
    pub body: Font,
    /// Creation timestamp under the body.
    pub created: Font,
    /// Reviewer name.
    pub name: Font,
    /// "Show more" expand control label.
    pub show_more: Font,
    /// Trailing total-count row.
    pub summary: Font,
    /// Color of the review body.
    pub body_color: Color,
    /// Color of the creation timestamp.
    pub created_color: Color,
    /// Color of the "Show more" label.
    pub show_more_color: Color,
    /// Color of the total-count row.
    pub summary_color: Color,
}

impl Default for Typography {
    /// Point-based typography of the reviews screen.
    fn default() -> Self {
        Self {
            body: Font::system(16.0),
            created: Font::system(14.0),
            name: Font::bold_system(16.0),
            show_more: Font::system(16.0),
            summary: Font::system(14.0),
            body_color: Color::Reset,
            created_color: Color::Gray,
            show_more_color: Color::Blue,
            summary_color: Color::Gray,
        }
    }
}

impl Typography {
    /// Cell-based typography for terminal rendering.
    pub fn terminal() -> Self {
        Self {
            body: Font::cell(),
            created: Font::cell(),
            name: Font::cell().with_bold(true),
            show_more: Font::cell(),
            summary: Font::cell(),
            ..Self::default()
        }
    }
}

//! Text measurement.
//!
//! Greedy word wrapping over font metrics. The same wrap feeds both `measure` and
//! `wrap_lines`, so what the renderer draws is exactly what the layout measured.
//!
//! # Contract
//! - Deterministic for identical `(text, font, max_width, max_lines)`
//! - `max_lines == 0` means unlimited
//! - Empty text or a non-positive width measures as [`Size::ZERO`]

use super::cache::{MeasureCache, MeasureKey, WrappedLine, WrappedText};
use super::types::Size;
use crate::model::{Font, StyledText};
use std::sync::Arc;
use unicode_width::UnicodeWidthChar;

/// Slack for float comparisons when deciding whether a word still fits on a line.
const FIT_EPSILON: f64 = 1e-9;

/// Measures styled text. Cheap to share across threads.
#[derive(Debug, Default)]
pub struct TextMetrics {
    cache: MeasureCache,
}

impl TextMetrics {
    /// Measurer with a default-sized wrap memo.
    pub fn new() -> Self {
        Self::default()
    }

    /// Metrics with a wrap memo of the given capacity (0 selects the default).
    pub fn with_cache_capacity(capacity: usize) -> Self {
        Self {
            cache: MeasureCache::new(capacity),
        }
    }

    /// Rendered size of `text` within `max_width`, limited to `max_lines` (0 = unlimited).
    pub fn measure(&self, text: &StyledText, max_width: f64, max_lines: usize) -> Size {
        if text.is_empty() || !(max_width > 0.0) {
            return Size::ZERO;
        }

        let wrapped = self.wrap_lines(text, max_width);
        let visible = visible_line_count(wrapped.lines.len(), max_lines);
        let width = wrapped.lines[..visible]
            .iter()
            .map(|line| line.width)
            .fold(0.0_f64, f64::max)
            .min(max_width);

        Size::new(width, visible as f64 * text.font().line_height)
    }

    /// Rendered size with no line limit.
    pub fn measure_unbounded(&self, text: &StyledText, max_width: f64) -> Size {
        self.measure(text, max_width, 0)
    }

    /// Full wrap of `text` at `max_width`.
    pub fn wrap_lines(&self, text: &StyledText, max_width: f64) -> Arc<WrappedText> {
        if text.is_empty() || !(max_width > 0.0) {
            return Arc::new(WrappedText::default());
        }

        let key = MeasureKey::new(Arc::clone(text.shared_text()), text.font(), max_width);
        self.cache
            .get_or_insert_with(key, || wrap(text.text(), text.font(), max_width))
    }

    /// Width of a single unwrapped line of `text` in `font`.
    pub fn line_width(text: &str, font: Font) -> f64 {
        text.chars().map(|c| char_advance(c, font)).sum()
    }
}

/// Lines shown for a text that wraps into `total` lines under a `max_lines` cap.
pub fn visible_line_count(total: usize, max_lines: usize) -> usize {
    if max_lines == 0 {
        total
    } else {
        total.min(max_lines)
    }
}

fn char_advance(c: char, font: Font) -> f64 {
    c.width().unwrap_or(0) as f64 * font.glyph_advance
}

fn wrap(text: &str, font: Font, max_width: f64) -> WrappedText {
    let space = char_advance(' ', font);
    let mut out = LineBuilder::default();

    for paragraph in text.split('\n') {
        let mut words = paragraph.split_whitespace().peekable();
        if words.peek().is_none() {
            // Blank paragraph still occupies a line
            out.finish_line();
            continue;
        }

        for word in words {
            let word_width = TextMetrics::line_width(word, font);
            if out.is_empty() {
                out.place_word(word, word_width, font, max_width);
            } else if out.width + space + word_width <= max_width + FIT_EPSILON {
                out.push_str(" ", space);
                out.push_str(word, word_width);
            } else {
                out.finish_line();
                out.place_word(word, word_width, font, max_width);
            }
        }
        out.finish_line();
    }

    WrappedText { lines: out.lines }
}

#[derive(Default)]
struct LineBuilder {
    lines: Vec<WrappedLine>,
    current: String,
    width: f64,
}

impl LineBuilder {
    fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    fn push_str(&mut self, s: &str, width: f64) {
        self.current.push_str(s);
        self.width += width;
    }

    fn finish_line(&mut self) {
        self.lines.push(WrappedLine {
            text: std::mem::take(&mut self.current),
            width: self.width,
        });
        self.width = 0.0;
    }

    /// Place a word at the start of an empty line, breaking it between chars if too wide.
    fn place_word(&mut self, word: &str, word_width: f64, font: Font, max_width: f64) {
        if word_width <= max_width + FIT_EPSILON {
            self.push_str(word, word_width);
            return;
        }

        for c in word.chars() {
            let advance = char_advance(c, font);
            if !self.is_empty() && self.width + advance > max_width + FIT_EPSILON {
                self.finish_line();
            }
            self.current.push(c);
            self.width += advance;
        }
    }
}

//! Row models derived from decoded reviews.

use super::identifiers::RowId;
use super::review::ReviewRecord;
use super::text::{StyledText, Typography};

/// Line limit applied to collapsed review bodies.
pub const DEFAULT_COLLAPSED_MAX_LINES: usize = 3;

/// A renderable review row.
///
/// Rows carry only their identity; routing a "show more" tap back to the controller is the
/// shell's job (`PaginationController::expand_row(row.id())`).
///
/// # Invariants
/// - `id` never changes for the lifetime of the row.
/// - `max_lines` is the only field that differs between two snapshots of the same row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowModel {
    id: RowId,
    styled_text: StyledText,
    styled_created: StyledText,
    max_lines: usize,
    first_name: String,
    last_name: String,
    rating: i32,
    avatar_url: Option<String>,
}

impl RowModel {
    /// Assembles a row from already styled parts. [`RowFactory::make_row`] is the usual way in.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: RowId,
        styled_text: StyledText,
        styled_created: StyledText,
        max_lines: usize,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        rating: i32,
        avatar_url: Option<String>,
    ) -> Self {
        Self {
            id,
            styled_text,
            styled_created,
            max_lines,
            first_name: first_name.into(),
            last_name: last_name.into(),
            rating,
            avatar_url,
        }
    }

    /// Identity token; survives expansion.
    pub fn id(&self) -> RowId {
        self.id
    }

    /// Review body with its font.
    pub fn styled_text(&self) -> &StyledText {
        &self.styled_text
    }

    /// Creation timestamp with its font.
    pub fn styled_created(&self) -> &StyledText {
        &self.styled_created
    }

    /// Body line limit; `0` means unlimited.
    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    /// True once the line limit has been removed.
    pub fn is_expanded(&self) -> bool {
        self.max_lines == 0
    }

    /// Reviewer's first name.
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Reviewer's last name.
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// "First Last", as shown in the name label.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Star rating as received.
    pub fn rating(&self) -> i32 {
        self.rating
    }

    /// Avatar URL, used as the image cache key.
    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }

    /// Same row with the body line cap removed.
    pub fn expanded(&self) -> Self {
        Self {
            max_lines: 0,
            ..self.clone()
        }
    }
}

/// Builds [`RowModel`]s from decoded records.
///
/// Every call produces a row with a fresh id, so re-delivered content is never merged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowFactory {
    typography: Typography,
    collapsed_max_lines: usize,
}

impl Default for RowFactory {
    fn default() -> Self {
        Self::new(Typography::default(), DEFAULT_COLLAPSED_MAX_LINES)
    }
}

impl RowFactory {
    /// Factory styling rows with `typography` and collapsing bodies to
    /// `collapsed_max_lines` lines.
    pub fn new(typography: Typography, collapsed_max_lines: usize) -> Self {
        Self {
            typography,
            collapsed_max_lines,
        }
    }

    /// Fonts and colors applied to new rows.
    pub fn typography(&self) -> &Typography {
        &self.typography
    }

    /// Builds a row with a fresh id from a decoded record.
    pub fn make_row(&self, record: ReviewRecord) -> RowModel {
        let typo = &self.typography;
        let styled_text = StyledText::new(record.text, typo.body, typo.body_color);
        let styled_created = StyledText::new(record.created, typo.created, typo.created_color);
        // An empty URL string means "no avatar"
        let avatar_url = record
            .avatar_url
            .filter(|url| !url.trim().is_empty());

        RowModel::new(
            RowId::next(),
            styled_text,
            styled_created,
            self.collapsed_max_lines,
            record.first_name,
            record.last_name,
            record.rating,
            avatar_url,
        )
    }
}

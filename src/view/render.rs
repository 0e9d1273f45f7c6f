//! Frame rendering for the review list.
//!
//! Rows are drawn from [`LayoutResult`] geometry in content coordinates and then shifted by the
//! scroll offset, so a row that is partly scrolled out still draws its visible lines.

use crate::model::RowModel;
use crate::state::LoadPhase;
use crate::view_state::summary_layout::summary_label;
use crate::view_state::text_metrics::visible_line_count;
use crate::view_state::{CatalogLayout, CatalogRow, HeightIndex, LayoutResult, Rect, RowCatalog};
use ratatui::{
    buffer::Buffer,
    layout::Rect as Area,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    Frame,
};
use std::collections::HashMap;

/// Number of stars in a rating.
pub const MAX_RATING: i32 = 5;

const FILLED_STAR: char = '★';
const EMPTY_STAR: char = '☆';
const SELECTION_MARKER: &str = "▌";
const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Filled then empty stars for `rating`, clamped to `0..=MAX_RATING`.
///
/// ```
/// use reviewlist::view::render::rating_glyphs;
/// assert_eq!(rating_glyphs(3), "★★★☆☆");
/// assert_eq!(rating_glyphs(9), "★★★★★");
/// assert_eq!(rating_glyphs(-2), "☆☆☆☆☆");
/// ```
pub fn rating_glyphs(rating: i32) -> String {
    let filled = rating.clamp(0, MAX_RATING) as usize;
    let empty = MAX_RATING as usize - filled;
    std::iter::repeat(FILLED_STAR)
        .take(filled)
        .chain(std::iter::repeat(EMPTY_STAR).take(empty))
        .collect()
}

/// Up to two initials shown while an avatar is missing.
pub fn initials(row: &RowModel) -> String {
    [row.first_name(), row.last_name()]
        .iter()
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Everything one frame needs. Borrowed from the app for the duration of a draw.
pub struct ListView<'a> {
    /// Entries to draw.
    pub catalog: &'a RowCatalog,
    /// Heights of `catalog` at the current width.
    pub index: &'a HeightIndex,
    /// Content line at the top of the list area.
    pub scroll_offset: usize,
    /// Highlighted catalog entry.
    pub selected: usize,
    /// Average avatar colors known at draw time, keyed by URL.
    pub avatar_colors: &'a HashMap<String, [u8; 3]>,
    /// Spinner frame counter.
    pub tick: usize,
}

/// A line positioned relative to the top-left corner of its row.
struct PlacedLine {
    x: f64,
    y: f64,
    line: Line<'static>,
}

/// Renders the list area and the status bar.
pub fn render(frame: &mut Frame, view: &ListView<'_>) {
    let area = frame.area();
    if area.height == 0 || area.width == 0 {
        return;
    }
    let list_area = Area {
        height: area.height - 1,
        ..area
    };
    let status_area = Area {
        y: area.y + area.height - 1,
        height: 1,
        ..area
    };

    let buf = frame.buffer_mut();
    render_list(buf, list_area, view);
    render_status(buf, status_area, view);
}

fn render_list(buf: &mut Buffer, area: Area, view: &ListView<'_>) {
    let snapshot = view.catalog.snapshot();
    if view.catalog.is_empty() {
        let message = if snapshot.last_error().is_some() {
            "Could not load reviews".to_string()
        } else if !snapshot.has_more() {
            "No reviews yet".to_string()
        } else {
            format!("{} Loading reviews...", spinner(view.tick))
        };
        render_centered(buf, area, Line::styled(message, Style::default().fg(Color::Gray)));
        return;
    }

    let width = f64::from(area.width);
    let viewport_end = view.scroll_offset + usize::from(area.height);
    let Some(first) = view.index.lower_bound(view.scroll_offset) else {
        return;
    };

    for index in first..view.index.len() {
        let top = view.index.offset_of(index);
        if top >= viewport_end {
            break;
        }
        let (Some(row), Some(layout)) = (
            view.catalog.row_at(index),
            view.catalog.layout(index, width),
        ) else {
            break;
        };

        let lines = match (&row, &layout) {
            (CatalogRow::Review(model), CatalogLayout::Review(layout)) => review_lines(
                model,
                layout,
                view,
                width,
                index == view.selected,
            ),
            (CatalogRow::Summary { total_count }, CatalogLayout::Summary(layout)) => {
                let label = summary_label(*total_count, view.catalog.engine().typography());
                vec![PlacedLine {
                    x: layout.label.x,
                    y: layout.label.y,
                    line: Line::styled(
                        label.text().to_string(),
                        Style::default().fg(label.color()),
                    ),
                }]
            }
            _ => Vec::new(),
        };

        for placed in lines {
            let content_y = top + placed.y.max(0.0) as usize;
            if content_y < view.scroll_offset || content_y >= viewport_end {
                continue;
            }
            let x = placed.x.max(0.0) as u16;
            if x >= area.width {
                continue;
            }
            let y = area.y + (content_y - view.scroll_offset) as u16;
            buf.set_line(area.x + x, y, &placed.line, area.width - x);
        }
    }
}

fn review_lines(
    row: &RowModel,
    layout: &LayoutResult,
    view: &ListView<'_>,
    width: f64,
    selected: bool,
) -> Vec<PlacedLine> {
    let engine = view.catalog.engine();
    let metrics = engine.metrics();
    let mut lines = Vec::new();

    if selected {
        let content_rows = (layout.total_height - metrics.insets.bottom).max(1.0) as usize;
        lines.extend((0..content_rows).map(|y| PlacedLine {
            x: 0.0,
            y: y as f64,
            line: Line::styled(SELECTION_MARKER, Style::default().fg(Color::Cyan)),
        }));
    }

    lines.extend(avatar_lines(row, &layout.avatar, view));

    let name_style = Style::default().add_modifier(Modifier::BOLD);
    lines.push(PlacedLine {
        x: layout.name.x,
        y: layout.name.y,
        line: Line::styled(row.display_name(), name_style),
    });

    lines.push(PlacedLine {
        x: layout.rating.x,
        y: layout.rating.y,
        line: rating_line(row.rating(), metrics.star_width, metrics.star_spacing),
    });

    let body = row.styled_text();
    if !body.is_empty() {
        let wrapped = engine
            .text_metrics()
            .wrap_lines(body, engine.text_column_width(width));
        let visible = visible_line_count(wrapped.lines.len(), row.max_lines());
        let line_height = body.font().line_height;
        let style = Style::default().fg(body.color());
        lines.extend(
            wrapped.lines[..visible]
                .iter()
                .enumerate()
                .map(|(i, line)| PlacedLine {
                    x: layout.body.x,
                    y: layout.body.y + i as f64 * line_height,
                    line: Line::styled(line.text.clone(), style),
                }),
        );
    }

    if layout.shows_expand_control {
        let label = engine.show_more_label();
        lines.push(PlacedLine {
            x: layout.expand_control.x,
            y: layout.expand_control.y,
            line: Line::styled(
                label.text().to_string(),
                Style::default()
                    .fg(label.color())
                    .add_modifier(Modifier::UNDERLINED),
            ),
        });
    }

    let created = row.styled_created();
    lines.push(PlacedLine {
        x: layout.timestamp.x,
        y: layout.timestamp.y,
        line: Line::styled(
            created.text().to_string(),
            Style::default().fg(created.color()),
        ),
    });

    lines
}

/// Avatar block: a swatch of the avatar's average color, or initials on gray until it loads.
fn avatar_lines(row: &RowModel, frame: &Rect, view: &ListView<'_>) -> Vec<PlacedLine> {
    let cells = frame.width.max(0.0) as usize;
    let rows = frame.height.max(0.0) as usize;
    if cells == 0 || rows == 0 {
        return Vec::new();
    }

    let color = row
        .avatar_url()
        .and_then(|url| view.avatar_colors.get(url))
        .map(|&[r, g, b]| Color::Rgb(r, g, b));

    (0..rows)
        .map(|y| {
            let line = match color {
                Some(color) => Line::styled(" ".repeat(cells), Style::default().bg(color)),
                None => {
                    let text = if y == 0 {
                        format!("{:<cells$}", initials(row))
                    } else {
                        " ".repeat(cells)
                    };
                    Line::styled(
                        text,
                        Style::default().fg(Color::White).bg(Color::DarkGray),
                    )
                }
            };
            PlacedLine {
                x: frame.x,
                y: frame.y + y as f64,
                line,
            }
        })
        .collect()
}

/// Stars spaced the way the layout sized the rating frame.
fn rating_line(rating: i32, star_width: f64, spacing: f64) -> Line<'static> {
    let gap = " ".repeat(spacing.max(0.0) as usize);
    let pad = " ".repeat((star_width - 1.0).max(0.0) as usize);
    let style = Style::default().fg(Color::Yellow);
    let spans: Vec<Span<'static>> = rating_glyphs(rating)
        .chars()
        .enumerate()
        .flat_map(|(i, star)| {
            let lead = (i > 0).then(|| Span::raw(gap.clone()));
            lead.into_iter()
                .chain(std::iter::once(Span::styled(format!("{star}{pad}"), style)))
        })
        .collect();
    Line::from(spans)
}

fn render_status(buf: &mut Buffer, area: Area, view: &ListView<'_>) {
    let snapshot = view.catalog.snapshot();
    let loaded = snapshot.rows().len();

    let left = if let Some(err) = snapshot.last_error() {
        Line::from(vec![
            Span::styled(" ! ", Style::default().fg(Color::White).bg(Color::Red)),
            Span::styled(format!(" {err} "), Style::default().fg(Color::Red)),
            Span::styled("press r to retry", Style::default().add_modifier(Modifier::BOLD)),
        ])
    } else {
        match snapshot.phase() {
            LoadPhase::LoadingInitial => {
                Line::from(format!(" {} Loading reviews...", spinner(view.tick)))
            }
            LoadPhase::LoadingMore => {
                Line::from(format!(" {} Loading more...", spinner(view.tick)))
            }
            LoadPhase::Idle | LoadPhase::Loaded => {
                Line::from(" j/k select  enter expand  r reload  q quit")
                    .style(Style::default().fg(Color::DarkGray))
            }
        }
    };

    let right = if snapshot.has_more() {
        format!("{loaded} loaded ")
    } else {
        format!("{loaded}/{} ", snapshot.total_count())
    };

    buf.set_style(area, Style::default().bg(Color::Black));
    buf.set_line(area.x, area.y, &left, area.width);
    let right_width = right.chars().count() as u16;
    if right_width < area.width {
        buf.set_string(
            area.x + area.width - right_width,
            area.y,
            right,
            Style::default().fg(Color::Gray),
        );
    }
}

fn render_centered(buf: &mut Buffer, area: Area, line: Line<'_>) {
    if area.height == 0 {
        return;
    }
    let width = (line.width() as u16).min(area.width);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + area.height / 2;
    buf.set_line(x, y, &line, width);
}

fn spinner(tick: usize) -> &'static str {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

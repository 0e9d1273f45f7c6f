//! Terminal shell for the review list.
//!
//! `TuiApp` owns the terminal and the pagination controller. Snapshots arrive over the
//! controller's subscription channel; every frame is drawn from the latest one.

pub mod avatars;
pub mod render;

use crate::image_cache::ImageCache;
use crate::source::AvatarSource;
use crate::state::{PaginationController, RequestOutcome, Snapshot};
use crate::view_state::{CatalogRow, HeightIndex, RowCatalog, RowLayoutEngine};
use avatars::AvatarLoader;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, layout::Size, Terminal};
use std::collections::HashMap;
use std::io::{self, Stdout};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur in the TUI
#[derive(Debug, Error)]
pub enum TuiError {
    /// Reading events or drawing to the terminal failed.
    #[error("Terminal I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Main TUI application
pub struct TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    terminal: Terminal<B>,
    controller: PaginationController,
    /// Snapshots published by the controller.
    updates: Receiver<Snapshot>,
    catalog: RowCatalog,
    /// Entry heights of `catalog` at `heights_width`, kept current across snapshots.
    heights: HeightIndex,
    heights_width: u16,
    avatars: AvatarLoader,
    /// Index into the catalog of the highlighted entry.
    selected: usize,
    /// Content offset of the first visible line.
    scroll_offset: usize,
    /// Last known terminal size.
    viewport: Size,
    /// Animation counter for the loading spinner.
    tick: usize,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Create and initialize a new TUI application
    ///
    /// Sets up terminal in raw mode with alternate screen and requests the first page.
    pub fn new(
        controller: PaginationController,
        avatar_source: Option<Arc<dyn AvatarSource>>,
    ) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Self::with_terminal(terminal, controller, ImageCache::global(), avatar_source)
    }

    /// Run the main event loop
    ///
    /// Returns when user quits (q, Esc or Ctrl+C)
    pub fn run(&mut self) -> Result<(), TuiError> {
        // Drives page completions, avatar arrival and the spinner
        const TIMER_INTERVAL: Duration = Duration::from_millis(100);

        self.draw()?;

        loop {
            if event::poll(TIMER_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key) {
                            return Ok(());
                        }
                        self.draw()?;
                        continue;
                    }
                    Event::Resize(width, height) => {
                        self.handle_resize(width, height);
                        self.draw()?;
                        continue;
                    }
                    _ => {}
                }
            }

            if self.tick() {
                self.draw()?;
            }
        }
    }
}

impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    fn with_terminal(
        terminal: Terminal<B>,
        mut controller: PaginationController,
        cache: Arc<ImageCache>,
        avatar_source: Option<Arc<dyn AvatarSource>>,
    ) -> Result<Self, TuiError> {
        let (tx, updates) = mpsc::channel();
        controller.subscribe(tx);

        let viewport = terminal.size()?;
        let catalog = RowCatalog::new(
            controller.snapshot(),
            Arc::new(RowLayoutEngine::terminal()),
        );
        let heights = catalog.height_index(f64::from(viewport.width));

        let mut app = Self {
            terminal,
            controller,
            updates,
            catalog,
            heights,
            heights_width: viewport.width,
            avatars: AvatarLoader::new(cache, avatar_source),
            selected: 0,
            scroll_offset: 0,
            viewport,
            tick: 0,
        };

        let outcome = app.controller.request_page();
        info!(?outcome, "Initial page requested");
        app.drain_updates();
        Ok(app)
    }

    /// Timer work. Returns true if the screen needs a redraw.
    fn tick(&mut self) -> bool {
        let list_changed = self.drain_updates();
        let avatars_changed = self.avatars.settle();
        let animating = self.catalog.snapshot().is_loading();
        if animating {
            self.tick = self.tick.wrapping_add(1);
        }
        list_changed || avatars_changed || animating
    }

    /// Applies finished fetches and adopts the newest published snapshot.
    ///
    /// Returns true if a new snapshot arrived.
    fn drain_updates(&mut self) -> bool {
        self.controller.poll_completions();

        let Some(latest) = self.updates.try_iter().last() else {
            return false;
        };
        debug!(
            rows = latest.rows().len(),
            phase = ?latest.phase(),
            "Snapshot received"
        );
        self.adopt(latest);

        // A list shorter than the prefetch window never scrolls; keep filling it. A failed
        // page waits for an explicit retry.
        if self.catalog.snapshot().last_error().is_none() {
            self.check_prefetch();
        }
        true
    }

    fn adopt(&mut self, snapshot: Snapshot) {
        let catalog = RowCatalog::new(snapshot, Arc::clone(self.catalog.engine()));
        catalog.update_height_index(
            &self.catalog,
            &mut self.heights,
            f64::from(self.heights_width),
        );
        self.catalog = catalog;
        self.selected = self.selected.min(self.catalog.count().saturating_sub(1));
    }

    /// Shows the in-flight state of a page request that did not publish a snapshot.
    fn note_request(&mut self, outcome: RequestOutcome) {
        if matches!(outcome, RequestOutcome::Started) {
            self.adopt(self.controller.snapshot());
        }
    }

    /// Handle a single keyboard event
    ///
    /// Returns true if app should quit
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Down | KeyCode::Char('j') => self.select(self.selected.saturating_add(1)),
            KeyCode::Up | KeyCode::Char('k') => self.select(self.selected.saturating_sub(1)),
            KeyCode::Home | KeyCode::Char('g') => self.select(0),
            KeyCode::End | KeyCode::Char('G') => self.select(usize::MAX),
            KeyCode::PageDown | KeyCode::Char(' ') => {
                let page = self.list_height();
                self.scroll_to(self.scroll_offset.saturating_add(page));
            }
            KeyCode::PageUp => {
                let page = self.list_height();
                self.scroll_to(self.scroll_offset.saturating_sub(page));
            }
            KeyCode::Enter => self.expand_selected(),
            KeyCode::Char('r') => {
                let outcome = self.controller.request_page();
                info!(?outcome, "Reload requested");
                self.note_request(outcome);
            }
            _ => {}
        }

        self.drain_updates();
        false
    }

    fn handle_resize(&mut self, width: u16, height: u16) {
        debug!("Handling resize to {}x{}", width, height);
        self.viewport = Size { width, height };
        self.sync_heights();
        self.reveal_selected();
    }

    /// Re-measures every entry if the terminal width changed since the index was built.
    fn sync_heights(&mut self) {
        if self.heights_width != self.viewport.width {
            self.heights = self
                .catalog
                .height_index(f64::from(self.viewport.width));
            self.heights_width = self.viewport.width;
        }
    }

    /// Moves the selection, clamped to the catalog, and scrolls it into view.
    fn select(&mut self, index: usize) {
        let count = self.catalog.count();
        if count == 0 {
            return;
        }
        self.selected = index.min(count - 1);
        self.reveal_selected();
    }

    fn expand_selected(&mut self) {
        let Some(CatalogRow::Review(row)) = self.catalog.row_at(self.selected) else {
            return;
        };
        if self.controller.expand_row(row.id()) {
            debug!(id = %row.id(), "Expanded selected row");
        }
    }

    /// Scrolls just enough to bring the selected entry fully into view.
    fn reveal_selected(&mut self) {
        if self.selected >= self.heights.len() {
            return;
        }
        let top = self.heights.offset_of(self.selected);
        let bottom = top + self.heights.height(self.selected);
        let viewport = self.list_height();

        let target = if top < self.scroll_offset {
            top
        } else if bottom > self.scroll_offset + viewport {
            // Tall rows align to their top
            bottom.saturating_sub(viewport).min(top)
        } else {
            self.scroll_offset
        };
        self.scroll_to(target);
    }

    /// Sets the scroll offset, clamped to the content, then runs the near-end check.
    ///
    /// A failed page is left for an explicit retry.
    fn scroll_to(&mut self, offset: usize) {
        let list_height = self.list_height();
        let max_offset = self.heights.total().saturating_sub(list_height);
        self.scroll_offset = offset.min(max_offset);

        // Keep the selection on screen after paging
        if let Some(first) = self.heights.lower_bound(self.scroll_offset) {
            let visible_end = self.scroll_offset + list_height;
            let selected_top = (self.selected < self.heights.len())
                .then(|| self.heights.offset_of(self.selected));
            if selected_top.is_none_or(|top| top < self.scroll_offset || top >= visible_end) {
                self.selected = first;
            }
        }

        if self.catalog.snapshot().last_error().is_none() {
            self.check_prefetch();
        }
    }

    /// Asks the controller for the next page if the scroll offset is near the end.
    fn check_prefetch(&mut self) {
        let content = self.heights.total() as f64;
        let viewport = self.list_height() as f64;
        if let Some(outcome) =
            self.controller
                .on_scroll_will_end(viewport, content, self.scroll_offset as f64)
        {
            debug!(?outcome, offset = self.scroll_offset, "Near end of list");
            self.note_request(outcome);
        }
    }

    /// Rows available to the list; the last terminal row is the status bar.
    fn list_height(&self) -> usize {
        usize::from(self.viewport.height.saturating_sub(1))
    }

    /// Requests avatars for rows on screen and collects the colors already known.
    fn visible_avatar_colors(&mut self) -> HashMap<String, [u8; 3]> {
        let end = self.scroll_offset + self.list_height();
        let index = &self.heights;
        let mut colors = HashMap::new();
        let Some(first) = index.lower_bound(self.scroll_offset) else {
            return colors;
        };

        for i in first..index.len() {
            if index.offset_of(i) >= end {
                break;
            }
            let Some(CatalogRow::Review(row)) = self.catalog.row_at(i) else {
                continue;
            };
            let Some(url) = row.avatar_url() else {
                continue;
            };
            match self.avatars.color(url) {
                Some(color) => {
                    colors.insert(url.to_string(), color);
                }
                None => self.avatars.request(url),
            }
        }
        colors
    }

    /// Render the current frame
    fn draw(&mut self) -> Result<(), TuiError> {
        self.viewport = self.terminal.size()?;
        self.sync_heights();
        let max_offset = self.heights.total().saturating_sub(self.list_height());
        self.scroll_offset = self.scroll_offset.min(max_offset);

        let avatar_colors = self.visible_avatar_colors();
        let view = render::ListView {
            catalog: &self.catalog,
            index: &self.heights,
            scroll_offset: self.scroll_offset,
            selected: self.selected,
            avatar_colors: &avatar_colors,
            tick: self.tick,
        };

        self.terminal.draw(|frame| {
            render::render(frame, &view);
        })?;

        Ok(())
    }
}

// ===== Test Helpers =====

#[cfg(test)]
impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    /// Create TuiApp for testing with a private image cache
    pub(crate) fn new_for_test(
        terminal: Terminal<B>,
        controller: PaginationController,
        avatar_source: Option<Arc<dyn AvatarSource>>,
    ) -> Self {
        Self::with_terminal(
            terminal,
            controller,
            Arc::new(ImageCache::new()),
            avatar_source,
        )
        .expect("test terminal size")
    }

    /// Entry heights the shell currently scrolls with.
    pub(crate) fn height_index(&self) -> &HeightIndex {
        &self.heights
    }

    /// Waits for the in-flight page and adopts the resulting snapshot.
    pub(crate) fn settle_page(&mut self) {
        if self.controller.snapshot().is_fetching() {
            assert!(
                self.controller
                    .wait_for_completion(Duration::from_secs(5)),
                "page fetch did not complete"
            );
        }
        self.drain_updates();
    }
}

/// Initialize and run the TUI application
///
/// This is the main entry point for the TUI. It handles terminal
/// setup, runs the event loop, and ensures cleanup on exit.
///
/// Note: Logging must be initialized by caller before calling this function.
pub fn run(
    controller: PaginationController,
    avatar_source: Option<Arc<dyn AvatarSource>>,
) -> Result<(), TuiError> {
    let result = TuiApp::new(controller, avatar_source).and_then(|mut app| app.run());

    // Always restore terminal state
    restore_terminal()?;

    result
}

/// Restore terminal to normal state
///
/// Disables raw mode and leaves alternate screen
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;

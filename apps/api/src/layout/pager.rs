//! Pager: owns the page collection and the vertical write position.
//!
//! This is the only place that decides whether content flows to a new page. Every
//! block asks `ensure_space` once with its full height before painting anything, and
//! uses the cursor it finds afterwards; nothing re-derives page state on its own.

use tracing::debug;

use crate::errors::LayoutError;
use crate::layout::config::LayoutConfig;
use crate::layout::page::{DrawOp, Page};

/// Tolerance for "the cursor is at the top margin".
const EPSILON: f32 = 1e-3;

/// Mutable state of one layout run. Created fresh per run and consumed by `into_pages`.
pub struct LayoutState<'a> {
    config: &'a LayoutConfig,
    pages: Vec<Page>,
    cursor_y: f32,
}

impl<'a> LayoutState<'a> {
    /// Starts with exactly one empty page and the cursor at the top margin.
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self {
            config,
            pages: vec![Page::new(1, config.page_width, config.page_height)],
            cursor_y: config.margin,
        }
    }

    pub fn config(&self) -> &'a LayoutConfig {
        self.config
    }

    pub fn cursor_y(&self) -> f32 {
        self.cursor_y
    }

    /// Index of the page currently being written.
    pub fn page_index(&self) -> usize {
        self.pages.len() - 1
    }

    #[cfg(test)]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// True while nothing has advanced the cursor on the current page.
    pub fn at_page_top(&self) -> bool {
        (self.cursor_y - self.config.margin).abs() < EPSILON
    }

    /// Makes room for a block of `needed_height` starting at the cursor.
    ///
    /// Returns `true` when a new page was appended (the cursor is then at the top
    /// margin). A block that does not fit even on an empty page is left where it is
    /// when the cursor is already at the top, so no blank page is produced.
    pub fn ensure_space(&mut self, needed_height: f32) -> Result<bool, LayoutError> {
        if self.cursor_y + needed_height <= self.config.bottom_limit() || self.at_page_top() {
            return Ok(false);
        }
        debug!(
            page = self.pages.len(),
            cursor_y = self.cursor_y,
            needed_height,
            "Page break"
        );
        self.new_page()?;
        Ok(true)
    }

    /// Moves the cursor down. Never triggers a break by itself; the next block's
    /// `ensure_space` does.
    pub fn advance(&mut self, amount: f32) {
        self.cursor_y += amount.max(0.0);
    }

    fn new_page(&mut self) -> Result<(), LayoutError> {
        if self.pages.len() >= self.config.max_pages {
            return Err(LayoutError::PageLimitExceeded {
                limit: self.config.max_pages,
            });
        }
        let number = self.pages.len() + 1;
        self.pages.push(Page::new(
            number,
            self.config.page_width,
            self.config.page_height,
        ));
        self.cursor_y = self.config.margin;
        Ok(())
    }

    /// Paints onto the current page.
    pub fn push(&mut self, op: DrawOp) {
        let index = self.page_index();
        self.push_to(index, op);
    }

    /// Paints onto an earlier page without touching the cursor.
    pub fn push_to(&mut self, page_index: usize, op: DrawOp) {
        if let Some(page) = self.pages.get_mut(page_index) {
            page.elements.push(op);
        }
    }

    #[cfg(test)]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }
}

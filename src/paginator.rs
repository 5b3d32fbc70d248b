//! A page indicator for the carousel's dot navigation.
//!
//! This component tracks which page of slides is showing and renders it either
//! as a row of dots or as a `current/total` counter. It does not move the
//! carousel by itself: the carousel keeps the page in sync with its current
//! index, and forwards page keys so the paginator can report which page the
//! user asked for.

use crate::key::{self, KeyMap as KeyMapTrait};
use bubbletea_rs::{KeyMsg, Msg};
use crossterm::event::KeyCode;

/// The type of pagination to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Type {
    /// Display pagination as dots (e.g., "• ○ ○ ○").
    #[default]
    Dots,
    /// Display pagination as Arabic numerals (e.g., "1/4").
    Arabic,
}

/// Key bindings for page navigation.
///
/// # Examples
///
/// ```rust
/// use bubbletea_carousel::paginator::PaginatorKeyMap;
/// use bubbletea_carousel::key::{Binding, KeyMap};
/// use crossterm::event::KeyCode;
///
/// let keymap = PaginatorKeyMap {
///     prev_page: Binding::new(vec![KeyCode::Char('[')]).with_help("[", "previous page"),
///     next_page: Binding::new(vec![KeyCode::Char(']')]).with_help("]", "next page"),
/// };
/// assert_eq!(keymap.short_help().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct PaginatorKeyMap {
    /// Previous page. Default: PageUp.
    pub prev_page: key::Binding,
    /// Next page. Default: PageDown.
    pub next_page: key::Binding,
}

impl Default for PaginatorKeyMap {
    fn default() -> Self {
        Self {
            prev_page: key::Binding::new(vec![KeyCode::PageUp]).with_help("pgup", "prev page"),
            next_page: key::Binding::new(vec![KeyCode::PageDown]).with_help("pgdn", "next page"),
        }
    }
}

impl KeyMapTrait for PaginatorKeyMap {
    fn short_help(&self) -> Vec<&key::Binding> {
        vec![&self.prev_page, &self.next_page]
    }

    fn full_help(&self) -> Vec<Vec<&key::Binding>> {
        vec![vec![&self.prev_page, &self.next_page]]
    }
}

/// Page indicator state.
///
/// # Examples
///
/// ```rust
/// use bubbletea_carousel::paginator::{Model, Type};
///
/// let mut dots = Model::new().with_total_pages(4);
/// assert_eq!(dots.view(), "• ○ ○ ○");
///
/// dots.set_page(2);
/// assert_eq!(dots.view(), "○ ○ • ○");
///
/// dots.paginator_type = Type::Arabic;
/// assert_eq!(dots.view(), "3/4");
/// ```
#[derive(Debug, Clone)]
pub struct Model {
    /// The type of pagination to display.
    pub paginator_type: Type,
    /// The current page.
    pub page: usize,
    /// The total number of pages.
    pub total_pages: usize,

    /// The character to use for the active page in Dots mode.
    pub active_dot: String,
    /// The character to use for inactive pages in Dots mode.
    pub inactive_dot: String,
    /// The format string for Arabic mode (e.g., "%d/%d").
    pub arabic_format: String,

    /// Key bindings.
    pub keymap: PaginatorKeyMap,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            paginator_type: Type::default(),
            page: 0,
            total_pages: 1,
            active_dot: "•".to_string(),
            inactive_dot: "○".to_string(),
            arabic_format: "%d/%d".to_string(),
            keymap: PaginatorKeyMap::default(),
        }
    }
}

impl Model {
    /// Creates a single-page indicator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of pages (builder pattern).
    pub fn with_total_pages(mut self, pages: usize) -> Self {
        self.set_total_pages(pages);
        self
    }

    /// Sets the number of pages. Never goes below one; the current page is
    /// clamped to the new range.
    pub fn set_total_pages(&mut self, pages: usize) {
        self.total_pages = pages.max(1);
        if self.page >= self.total_pages {
            self.page = self.total_pages - 1;
        }
    }

    /// Sets the current page, clamped to the last page.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.min(self.total_pages.saturating_sub(1));
    }

    /// Navigates to the previous page, stopping at the first.
    pub fn prev_page(&mut self) {
        if self.page > 0 {
            self.page -= 1;
        }
    }

    /// Navigates to the next page, stopping at the last.
    pub fn next_page(&mut self) {
        if !self.on_last_page() {
            self.page += 1;
        }
    }

    /// Returns true on the first page.
    pub fn on_first_page(&self) -> bool {
        self.page == 0
    }

    /// Returns true on the last page.
    pub fn on_last_page(&self) -> bool {
        self.page == self.total_pages.saturating_sub(1)
    }

    /// Handles page keys. Returns the newly selected page when a key moved it.
    pub fn update(&mut self, msg: &Msg) -> Option<usize> {
        let key_msg = msg.downcast_ref::<KeyMsg>()?;
        let before = self.page;
        if self.keymap.next_page.matches(key_msg) {
            self.next_page();
        } else if self.keymap.prev_page.matches(key_msg) {
            self.prev_page();
        }
        (self.page != before).then_some(self.page)
    }

    /// Renders the indicator.
    pub fn view(&self) -> String {
        match self.paginator_type {
            Type::Arabic => self.arabic_view(),
            Type::Dots => self.dots_view(),
        }
    }

    fn arabic_view(&self) -> String {
        self.arabic_format
            .replacen("%d", &(self.page + 1).to_string(), 1)
            .replacen("%d", &self.total_pages.to_string(), 1)
    }

    fn dots_view(&self) -> String {
        (0..self.total_pages)
            .map(|i| {
                if i == self.page {
                    self.active_dot.as_str()
                } else {
                    self.inactive_dot.as_str()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

//! Movie browser state management.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use cinefind_api::tmdb::MovieSummary;
use ratatui::widgets::TableState;

use crate::search::{FetchRequest, FetchResponse, Notification, Notifier, QueryStateController};

/// How long a toast stays on screen.
const TOAST_TTL: Duration = Duration::from_secs(3);

/// Maximum number of toasts kept at once.
const TOAST_CAPACITY: usize = 4;

/// Input mode for the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Navigating results.
    Normal,
    /// Typing into the search box.
    Search,
}

/// A notification with its arrival time.
#[derive(Debug, Clone)]
pub struct Toast {
    /// Message and severity.
    pub notification: Notification,
    /// When the toast was raised.
    pub raised_at: Instant,
}

/// Queue of transient messages, newest last.
#[derive(Debug)]
pub struct Toasts {
    items: VecDeque<Toast>,
    ttl: Duration,
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new(TOAST_TTL)
    }
}

impl Toasts {
    /// Creates an empty queue whose toasts live for `ttl`.
    #[must_use]
    pub const fn new(ttl: Duration) -> Self {
        Self {
            items: VecDeque::new(),
            ttl,
        }
    }

    /// Drops toasts older than the TTL.
    pub fn prune(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.items
            .retain(|t| now.saturating_duration_since(t.raised_at) < ttl);
    }

    /// Visible toasts, oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Toast> {
        self.items.iter()
    }

    /// No toast is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Notifier for Toasts {
    fn notify(&mut self, notification: Notification) {
        if self.items.len() >= TOAST_CAPACITY {
            self.items.pop_front();
        }
        self.items.push_back(Toast {
            notification,
            raised_at: Instant::now(),
        });
    }
}

/// State for the movie browser TUI.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct BrowserState {
    /// Query, page, selection, and results.
    pub controller: QueryStateController,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Search box contents.
    pub input: String,
    /// Table state for the result list (handles cursor and scroll).
    pub table_state: TableState,
    /// Transient messages.
    pub toasts: Toasts,
    /// Digits typed for a page jump.
    pub page_input: String,
}

impl Default for BrowserState {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserState {
    /// Creates an idle browser that starts in search mode.
    #[must_use]
    pub fn new() -> Self {
        Self {
            controller: QueryStateController::new(),
            input_mode: InputMode::Search,
            input: String::new(),
            table_state: TableState::default(),
            toasts: Toasts::default(),
            page_input: String::new(),
        }
    }

    /// Returns the cursor position in the result list.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    /// Movies on the displayed page.
    #[must_use]
    pub fn movies(&self) -> &[MovieSummary] {
        self.controller
            .results()
            .map_or(&[], |r| r.results.as_slice())
    }

    /// Movie under the cursor.
    #[must_use]
    pub fn current_movie(&self) -> Option<&MovieSummary> {
        self.movies().get(self.cursor())
    }

    /// Appends a character to the search box.
    pub fn input_push(&mut self, ch: char) {
        self.input.push(ch);
    }

    /// Removes the last character from the search box.
    pub fn input_pop(&mut self) {
        self.input.pop();
    }

    /// Submits the search box contents.
    ///
    /// Blank input raises a toast and keeps search mode.
    pub fn submit_input(&mut self) -> Option<FetchRequest> {
        let result = self
            .controller
            .submit_search(&self.input, &mut self.toasts);
        match result {
            Ok(request) => {
                self.input_mode = InputMode::Normal;
                if request.is_some() {
                    self.table_state.select(None);
                }
                request
            }
            Err(_) => None,
        }
    }

    /// Moves the cursor up.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn move_up(&mut self) {
        let current = self.cursor();
        if current > 0 {
            self.table_state.select(Some(current - 1));
        }
    }

    /// Moves the cursor down.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn move_down(&mut self) {
        let current = self.cursor();
        if current + 1 < self.movies().len() {
            self.table_state.select(Some(current + 1));
        }
    }

    /// Goes to the next result page.
    pub fn next_page(&mut self) -> Option<FetchRequest> {
        self.controller.next_page()
    }

    /// Goes to the previous result page.
    pub fn prev_page(&mut self) -> Option<FetchRequest> {
        self.controller.prev_page()
    }

    /// Goes to `page`, raising a toast when the page does not exist.
    pub fn jump_to_page(&mut self, page: u32) -> Option<FetchRequest> {
        match self.controller.select_page(page) {
            Ok(request) => request,
            Err(err) => {
                self.toasts.notify(Notification::error(err.to_string()));
                None
            }
        }
    }

    /// Goes to the last page of the current result.
    pub fn last_page(&mut self) -> Option<FetchRequest> {
        let total = self.controller.total_pages();
        if total == 0 {
            return None;
        }
        self.jump_to_page(total)
    }

    /// Appends a digit to the pending page jump.
    pub fn page_input_push(&mut self, digit: char) {
        if digit.is_ascii_digit() && self.page_input.len() < 6 {
            self.page_input.push(digit);
        }
    }

    /// Jumps to the typed page number and clears the pending input.
    pub fn submit_page_input(&mut self) -> Option<FetchRequest> {
        let typed = std::mem::take(&mut self.page_input);
        let page = typed.parse::<u32>().ok()?;
        self.jump_to_page(page)
    }

    /// Opens the detail overlay for the movie under the cursor.
    pub fn open_detail(&mut self) {
        let movie = self.current_movie().cloned();
        if movie.is_some() {
            self.controller.select_movie(movie);
        }
    }

    /// Dismisses the detail overlay.
    pub fn close_detail(&mut self) {
        self.controller.select_movie(None);
    }

    /// Applies a resolved fetch and resets the cursor when a new page lands.
    pub fn apply_response(&mut self, response: FetchResponse) {
        if self.controller.apply_response(response, &mut self.toasts) {
            if self.movies().is_empty() {
                self.table_state.select(None);
            } else {
                self.table_state.select(Some(0));
            }
        }
    }
}

//! Movie browser TUI main loop.

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use cinefind_api::tmdb::{CatalogApi, MovieSummary};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use super::state::{BrowserState, InputMode};
use super::ui;
use crate::search::{FetchDispatcher, FetchRequest, Notification, Notifier, SearchOptions};

/// Redraw interval while idle.
const TICK: Duration = Duration::from_millis(100);

/// What the event loop does after a key press.
#[derive(Debug, PartialEq, Eq)]
enum Action {
    /// Keep going.
    Continue,
    /// Issue a catalog fetch.
    Fetch(FetchRequest),
    /// Leave the browser.
    Quit,
}

impl From<Option<FetchRequest>> for Action {
    fn from(request: Option<FetchRequest>) -> Self {
        request.map_or(Self::Continue, Self::Fetch)
    }
}

/// Runs the movie browser until the user quits.
///
/// When `initial_query` is set, the first search is submitted on start.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
pub async fn run_browser<A>(
    api: Arc<A>,
    options: SearchOptions,
    initial_query: Option<String>,
) -> Result<()>
where
    A: CatalogApi + Sync + 'static,
{
    let mut state = BrowserState::new();
    let mut dispatcher = FetchDispatcher::new(api, options);

    if let Some(query) = initial_query {
        state.input = query;
        if let Some(request) = state.submit_input() {
            dispatcher.dispatch(request);
        }
    }

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut state, &mut dispatcher).await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop.
///
/// Waits on fetch completions and the tick timer so spawned fetches make
/// progress on the current-thread runtime, then drains pending key events.
async fn run_event_loop<A>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut BrowserState,
    dispatcher: &mut FetchDispatcher<A>,
) -> Result<()>
where
    A: CatalogApi + Sync + 'static,
{
    loop {
        state.toasts.prune(Instant::now());
        terminal
            .draw(|frame| ui::draw(frame, state))
            .context("failed to draw TUI")?;

        tokio::select! {
            Some(response) = dispatcher.recv() => state.apply_response(response),
            () = tokio::time::sleep(TICK) => {}
        }
        while let Some(response) = dispatcher.try_recv() {
            state.apply_response(response);
        }

        while event::poll(Duration::ZERO).context("failed to poll events")? {
            if let Event::Key(key) = event::read().context("failed to read event")?
                && key.kind == KeyEventKind::Press
            {
                match handle_key(state, key) {
                    Action::Continue => {}
                    Action::Fetch(request) => dispatcher.dispatch(request),
                    Action::Quit => return Ok(()),
                }
            }
        }
    }
}

/// Routes a key press to the handler for the active view.
fn handle_key(state: &mut BrowserState, key: KeyEvent) -> Action {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }
    if state.controller.selection().is_some() {
        return handle_detail_input(state, key.code);
    }
    match state.input_mode {
        InputMode::Search => handle_search_input(state, key.code),
        InputMode::Normal => handle_normal_input(state, key.code),
    }
}

/// Handles key input while typing a query.
fn handle_search_input(state: &mut BrowserState, key: KeyCode) -> Action {
    match key {
        KeyCode::Esc => {
            state.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => return state.submit_input().into(),
        KeyCode::Backspace => state.input_pop(),
        KeyCode::Char(c) => state.input_push(c),
        _ => {}
    }
    Action::Continue
}

/// Handles key input while navigating results.
fn handle_normal_input(state: &mut BrowserState, key: KeyCode) -> Action {
    match key {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('/' | 's') => {
            state.input_mode = InputMode::Search;
        }
        KeyCode::Up | KeyCode::Char('k') => state.move_up(),
        KeyCode::Down | KeyCode::Char('j') => state.move_down(),
        KeyCode::Left | KeyCode::PageUp | KeyCode::Char('h') => {
            return state.prev_page().into();
        }
        KeyCode::Right | KeyCode::PageDown | KeyCode::Char('l') => {
            return state.next_page().into();
        }
        KeyCode::Home if state.controller.total_pages() > 0 => {
            return state.jump_to_page(1).into();
        }
        KeyCode::End => return state.last_page().into(),
        KeyCode::Char(c) if c.is_ascii_digit() => state.page_input_push(c),
        KeyCode::Enter if !state.page_input.is_empty() => {
            return state.submit_page_input().into();
        }
        KeyCode::Esc => state.page_input.clear(),
        KeyCode::Enter => state.open_detail(),
        KeyCode::Char('o') => {
            if let Some(url) = state.current_movie().map(MovieSummary::tmdb_url) {
                open_in_browser(&url, &mut state.toasts);
            }
        }
        _ => {}
    }
    Action::Continue
}

/// Handles key input while the detail overlay is shown.
fn handle_detail_input(state: &mut BrowserState, key: KeyCode) -> Action {
    match key {
        KeyCode::Esc | KeyCode::Char('q') => state.close_detail(),
        KeyCode::Char('o') => {
            if let Some(url) = state.controller.selection().map(MovieSummary::tmdb_url) {
                open_in_browser(&url, &mut state.toasts);
            }
        }
        _ => {}
    }
    Action::Continue
}

/// Opens `url` in the system browser and reports the outcome as a toast.
fn open_in_browser(url: &str, notifier: &mut impl Notifier) {
    match open::that_detached(url) {
        Ok(()) => notifier.notify(Notification::info(format!("Opened {url}"))),
        Err(e) => {
            tracing::debug!(url, error = %e, "failed to open browser");
            notifier.notify(Notification::error("Could not open a browser."));
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use cinefind_api::tmdb::SearchMovieResponse;

    use super::*;
    use crate::search::FetchResponse;

    fn press(state: &mut BrowserState, code: KeyCode) -> Action {
        handle_key(state, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(state: &mut BrowserState, text: &str) {
        for c in text.chars() {
            assert_eq!(press(state, KeyCode::Char(c)), Action::Continue);
        }
    }

    fn resolve(state: &mut BrowserState, request: &FetchRequest, ids: &[u64], total_pages: u32) {
        let results = ids
            .iter()
            .map(|id| serde_json::from_value(serde_json::json!({ "id": id })).unwrap())
            .collect();
        state.apply_response(FetchResponse {
            generation: request.generation,
            key: request.key.clone(),
            outcome: Ok(SearchMovieResponse {
                page: request.key.page,
                results,
                total_pages,
                total_results: 60,
            }),
        });
    }

    fn searched_state() -> BrowserState {
        let mut state = BrowserState::new();
        type_text(&mut state, "batman");
        let Action::Fetch(request) = press(&mut state, KeyCode::Enter) else {
            panic!("expected a fetch");
        };
        resolve(&mut state, &request, &[1, 2, 3], 3);
        state
    }

    #[test]
    fn test_typing_and_submit_issues_fetch() {
        // Arrange
        let mut state = BrowserState::new();
        type_text(&mut state, "batmann");
        press(&mut state, KeyCode::Backspace);

        // Act
        let action = press(&mut state, KeyCode::Enter);

        // Assert
        let Action::Fetch(request) = action else {
            panic!("expected a fetch, got {action:?}");
        };
        assert_eq!(request.key.query, "batman");
        assert_eq!(request.key.page, 1);
        assert_eq!(state.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_q_types_in_search_mode() {
        // Arrange
        let mut state = BrowserState::new();

        // Act
        let action = press(&mut state, KeyCode::Char('q'));

        // Assert
        assert_eq!(action, Action::Continue);
        assert_eq!(state.input, "q");
    }

    #[test]
    fn test_blank_submit_stays_in_search_mode() {
        // Arrange
        let mut state = BrowserState::new();
        type_text(&mut state, "  ");

        // Act
        let action = press(&mut state, KeyCode::Enter);

        // Assert
        assert_eq!(action, Action::Continue);
        assert_eq!(state.input_mode, InputMode::Search);
        assert_eq!(state.toasts.iter().count(), 1);
    }

    #[test]
    fn test_ctrl_c_quits_from_any_mode() {
        // Arrange
        let mut state = BrowserState::new();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);

        // Act & Assert
        assert_eq!(handle_key(&mut state, ctrl_c), Action::Quit);
        let mut state = searched_state();
        assert_eq!(handle_key(&mut state, ctrl_c), Action::Quit);
    }

    #[test]
    fn test_normal_mode_navigation() {
        // Arrange
        let mut state = searched_state();

        // Act
        press(&mut state, KeyCode::Char('j'));
        press(&mut state, KeyCode::Down);
        press(&mut state, KeyCode::Char('k'));

        // Assert
        assert_eq!(state.cursor(), 1);
    }

    #[test]
    fn test_page_keys_issue_fetches() {
        // Arrange
        let mut state = searched_state();

        // Act
        let back = press(&mut state, KeyCode::Left);
        let forward = press(&mut state, KeyCode::Char('l'));

        // Assert
        assert_eq!(back, Action::Continue);
        let Action::Fetch(request) = forward else {
            panic!("expected a fetch, got {forward:?}");
        };
        assert_eq!(request.key.page, 2);
        assert_eq!(request.key.query, "batman");
    }

    #[test]
    fn test_home_end_and_typed_page_jumps() {
        // Arrange
        let mut state = searched_state();

        // Act
        let end = press(&mut state, KeyCode::End);
        let Action::Fetch(request) = end else {
            panic!("expected a fetch, got {end:?}");
        };
        resolve(&mut state, &request, &[9], 3);
        let home = press(&mut state, KeyCode::Home);
        let Action::Fetch(request) = home else {
            panic!("expected a fetch, got {home:?}");
        };
        resolve(&mut state, &request, &[1, 2, 3], 3);
        press(&mut state, KeyCode::Char('2'));
        let typed = press(&mut state, KeyCode::Enter);

        // Assert
        assert!(state.controller.selection().is_none());
        let Action::Fetch(request) = typed else {
            panic!("expected a fetch, got {typed:?}");
        };
        assert_eq!(request.key.page, 2);
        assert_eq!(request.key.query, "batman");
    }

    #[test]
    fn test_esc_discards_typed_page() {
        // Arrange
        let mut state = searched_state();
        press(&mut state, KeyCode::Char('7'));

        // Act
        press(&mut state, KeyCode::Esc);
        let action = press(&mut state, KeyCode::Enter);

        // Assert
        assert_eq!(action, Action::Continue);
        assert_eq!(state.controller.selection().map(|m| m.id), Some(1));
    }

    #[test]
    fn test_home_without_results_does_nothing() {
        // Arrange
        let mut state = BrowserState::new();
        press(&mut state, KeyCode::Esc);

        // Act
        let action = press(&mut state, KeyCode::Home);

        // Assert
        assert_eq!(action, Action::Continue);
        assert!(state.toasts.is_empty());
    }

    #[test]
    fn test_last_page_does_not_advance() {
        // Arrange
        let mut state = searched_state();
        let Action::Fetch(request) = press(&mut state, KeyCode::PageDown) else {
            panic!("expected a fetch");
        };
        resolve(&mut state, &request, &[4], 3);
        let Action::Fetch(request) = press(&mut state, KeyCode::PageDown) else {
            panic!("expected a fetch");
        };
        resolve(&mut state, &request, &[5], 3);

        // Act
        let action = press(&mut state, KeyCode::PageDown);

        // Assert
        assert_eq!(action, Action::Continue);
        assert_eq!(state.controller.page(), 3);
    }

    #[test]
    fn test_enter_opens_detail_and_esc_closes_it() {
        // Arrange
        let mut state = searched_state();
        press(&mut state, KeyCode::Char('j'));

        // Act
        press(&mut state, KeyCode::Enter);

        // Assert
        assert_eq!(state.controller.selection().unwrap().id, 2);

        // Act: q closes the overlay instead of quitting
        let action = press(&mut state, KeyCode::Char('q'));

        // Assert
        assert_eq!(action, Action::Continue);
        assert!(state.controller.selection().is_none());
        assert_eq!(press(&mut state, KeyCode::Char('q')), Action::Quit);
    }

    #[test]
    fn test_slash_returns_to_search_mode() {
        // Arrange
        let mut state = searched_state();

        // Act
        press(&mut state, KeyCode::Char('/'));
        type_text(&mut state, " returns");
        let action = press(&mut state, KeyCode::Enter);

        // Assert
        let Action::Fetch(request) = action else {
            panic!("expected a fetch, got {action:?}");
        };
        assert_eq!(request.key.query, "batman returns");
        assert_eq!(request.key.page, 1);
    }

    #[test]
    fn test_resubmitting_same_query_does_not_refetch() {
        // Arrange
        let mut state = searched_state();
        press(&mut state, KeyCode::Char('s'));

        // Act
        let action = press(&mut state, KeyCode::Enter);

        // Assert
        assert_eq!(action, Action::Continue);
        assert_eq!(state.movies().len(), 3);
    }
}

//! TUI rendering logic for the movie browser.

use cinefind_api::tmdb::MovieSummary;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table, Wrap};

use super::pager::{MARGIN_PAGES_DISPLAYED, PAGE_RANGE_DISPLAYED, PageItem, page_items};
use super::state::{BrowserState, InputMode};
use crate::search::NotifyLevel;

/// Generic message shown for a failed fetch.
const ERROR_TEXT: &str = "There was an error, please try again...";

/// Toast width in columns.
const TOAST_WIDTH: u16 = 48;

/// Draws the movie browser UI.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &mut BrowserState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // search box
            Constraint::Min(5),    // results
            Constraint::Length(3), // page selector
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], state);
    draw_results(frame, chunks[1], state);
    draw_pager(frame, chunks[2], state);
    draw_footer(frame, chunks[3], state);

    if let Some(movie) = state.controller.selection() {
        draw_detail(frame, movie);
    }
    draw_toasts(frame, state);
}

/// Draws the search box and the result summary.
#[allow(clippy::indexing_slicing)]
fn draw_header(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let input_style = if state.input_mode == InputMode::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let input = Paragraph::new(state.input.as_str())
        .style(input_style)
        .block(Block::default().borders(Borders::ALL).title(" Search: / "));
    frame.render_widget(input, header_chunks[0]);

    if state.input_mode == InputMode::Search {
        let width = u16::try_from(state.input.chars().count()).unwrap_or(u16::MAX);
        let x = header_chunks[0]
            .x
            .saturating_add(1)
            .saturating_add(width)
            .min(header_chunks[0].right().saturating_sub(2));
        frame.set_cursor_position((x, header_chunks[0].y.saturating_add(1)));
    }

    let controller = &state.controller;
    let summary = controller.results().map_or_else(String::new, |r| {
        format!(
            "{} results  page {}/{}",
            r.total_results,
            controller.page(),
            r.total_pages
        )
    });
    let summary = if controller.is_fetching() {
        format!("{summary}  (fetching...)")
    } else {
        summary
    };
    let status = Paragraph::new(summary)
        .block(Block::default().borders(Borders::ALL).title(" cinefind "));
    frame.render_widget(status, header_chunks[1]);
}

/// Draws the result table, or the loading / error / idle panel.
fn draw_results(frame: &mut Frame, area: Rect, state: &mut BrowserState) {
    let block = Block::default().borders(Borders::ALL).title(" Movies ");
    let controller = &state.controller;

    if controller.is_loading() {
        frame.render_widget(Paragraph::new("Loading...").block(block), area);
        return;
    }
    if controller.is_error() {
        let text = Paragraph::new(ERROR_TEXT)
            .style(Style::default().fg(Color::Red))
            .block(block);
        frame.render_widget(text, area);
        return;
    }
    if controller.results().is_none() {
        let hint = Paragraph::new("Type a title and press Enter to search.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let header = Row::new(vec!["Title", "Year", "Rating", "Votes", "Lang"])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let rows: Vec<Row> = state
        .movies()
        .iter()
        .map(|m| {
            Row::new(vec![
                m.title.clone(),
                m.release_year()
                    .map_or_else(|| String::from("--"), |y| y.to_string()),
                format!("{:.1}", m.vote_average),
                m.vote_count.to_string(),
                m.original_language.clone(),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(30),
        Constraint::Length(6),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(5),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(table, area, &mut state.table_state);
}

/// Draws the page selector.
fn draw_pager(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let title = if state.page_input.is_empty() {
        String::from(" Pages ")
    } else {
        format!(" Go to page: {} ", state.page_input)
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let total = state.controller.total_pages();
    if total <= 1 {
        frame.render_widget(block, area);
        return;
    }

    let current = state.controller.page();
    let mut spans = vec![Span::raw("\u{2190} ")];
    for item in page_items(current, total, PAGE_RANGE_DISPLAYED, MARGIN_PAGES_DISPLAYED) {
        match item {
            PageItem::Page(page) if page == current => spans.push(Span::styled(
                format!("[{page}]"),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            PageItem::Page(page) => spans.push(Span::raw(format!(" {page} "))),
            PageItem::Gap => spans.push(Span::raw(" \u{2026} ")),
        }
        spans.push(Span::raw(" "));
    }
    spans.push(Span::raw("\u{2192}"));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// Draws the footer with key hints.
fn draw_footer(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let help_text = if state.controller.selection().is_some() {
        "Esc/q: close  o: open in browser"
    } else if state.input_mode == InputMode::Search {
        "Type to search | Enter: submit | Esc: cancel"
    } else {
        "\u{2191}\u{2193}/j/k: move  \u{2190}\u{2192}/h/l: page  Home/End/0-9: jump  Enter: details  /: search  o: open  q: quit"
    };

    let footer = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

/// Draws the detail overlay for the selected movie.
fn draw_detail(frame: &mut Frame, movie: &MovieSummary) {
    let area = centered_rect(70, 70, frame.area());

    let label = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(Span::styled(
            movie.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    if movie.original_title != movie.title && !movie.original_title.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Original title: ", label),
            Span::raw(movie.original_title.clone()),
        ]));
    }
    lines.push(Line::from(vec![
        Span::styled("Release date: ", label),
        Span::raw(
            movie
                .release_date
                .as_deref()
                .filter(|d| !d.is_empty())
                .unwrap_or("--")
                .to_owned(),
        ),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Rating: ", label),
        Span::raw(format!(
            "{:.1}/10 ({} votes)",
            movie.vote_average, movie.vote_count
        )),
    ]));
    if let Some(url) = movie.poster_url("w500") {
        lines.push(Line::from(vec![
            Span::styled("Poster: ", label),
            Span::raw(url),
        ]));
    }
    if let Some(url) = movie.backdrop_url("original") {
        lines.push(Line::from(vec![
            Span::styled("Backdrop: ", label),
            Span::raw(url),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(
        movie
            .overview
            .as_deref()
            .filter(|o| !o.is_empty())
            .unwrap_or("No overview available.")
            .to_owned(),
    ));

    let detail = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" {} ", movie.tmdb_url())),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(detail, area);
}

/// Draws toasts stacked in the top-right corner, newest at the top.
fn draw_toasts(frame: &mut Frame, state: &BrowserState) {
    if state.toasts.is_empty() {
        return;
    }
    let screen = frame.area();
    let width = TOAST_WIDTH.min(screen.width);
    let x = screen.right().saturating_sub(width);
    let mut y = screen.y.saturating_add(3);

    for toast in state.toasts.iter().rev() {
        if y.saturating_add(3) > screen.bottom() {
            break;
        }
        let area = Rect::new(x, y, width, 3);
        let color = match toast.notification.level {
            NotifyLevel::Error => Color::Red,
            NotifyLevel::Info => Color::Green,
        };
        let widget = Paragraph::new(toast.notification.message.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
        frame.render_widget(Clear, area);
        frame.render_widget(widget, area);
        y = y.saturating_add(3);
    }
}

/// Returns a rect of `percent_x` by `percent_y` centered in `area`.
#[allow(clippy::indexing_slicing)]
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let margin_y = 100u16.saturating_sub(percent_y) / 2;
    let margin_x = 100u16.saturating_sub(percent_x) / 2;

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(margin_y),
            Constraint::Percentage(percent_y),
            Constraint::Percentage(margin_y),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(margin_x),
            Constraint::Percentage(percent_x),
            Constraint::Percentage(margin_x),
        ])
        .split(vertical[1])[1]
}

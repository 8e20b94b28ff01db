use std::cmp::min;
use std::mem;
use std::sync::mpsc::{Receiver, TryRecvError};

use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;
use tracing::debug;

use crate::catalog::LoadResult;
use crate::error::CatalogError;
use crate::models::{SortKey, Song};
use crate::search::{LoadState, SearchModel};

use super::helpers::{
    centered_rect, column_title, favorite_marker, favorite_style, input_cursor_x, key_hint,
};

/// Height of the search box, borders included.
const SEARCH_HEIGHT: u16 = 3;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows skipped by PageUp/PageDown.
const SELECTION_JUMP: isize = 10;
const SEARCH_PROMPT: &str = "Search: ";

/// Whether the detail overlay is open, and for which song.
enum Mode {
    Normal,
    Detail(Song),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Terminal-side state wrapped around the [`SearchModel`]: the pending catalog
/// load, the highlighted row, the overlay and the footer message.
pub struct App {
    model: SearchModel,
    loader: Option<Receiver<LoadResult>>,
    selected: usize,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(model: SearchModel, loader: Receiver<LoadResult>) -> Self {
        Self {
            model,
            loader: Some(loader),
            selected: 0,
            mode: Mode::Normal,
            status: None,
        }
    }

    pub fn model(&self) -> &SearchModel {
        &self.model
    }

    /// Hand the catalog to the model once the loader thread delivers it.
    pub(crate) fn poll_loader(&mut self) {
        let Some(loader) = &self.loader else {
            return;
        };
        let result = match loader.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => Err(CatalogError::LoaderStopped),
        };
        self.loader = None;
        self.model.finish_load(result);
        if let LoadState::Error(message) = self.model.load_state().clone() {
            self.set_status(message, StatusKind::Error);
        }
    }

    /// Handle a plain key press. Returns `true` when the app should exit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Detail(song) => self.handle_detail_key(code, song),
        };
        exit
    }

    /// Handle a key pressed together with Ctrl. Returns `true` on exit.
    pub fn handle_ctrl_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('c') | KeyCode::Char('q') => return true,
            KeyCode::Char('u') => self.update_query(String::new()),
            KeyCode::Char('f') => {
                let target = match &self.mode {
                    Mode::Detail(song) => Some(song.clone()),
                    Mode::Normal => self.current_song().cloned(),
                };
                match target {
                    Some(song) => self.toggle_favorite(&song),
                    None => self.set_status("No song selected.", StatusKind::Error),
                }
            }
            KeyCode::Char('o') => self.toggle_favorites_only(),
            KeyCode::Char('g') => self.toggle_pagination(),
            KeyCode::Char('n') => self.change_page(1),
            KeyCode::Char('p') => self.change_page(-1),
            _ => {}
        }
        false
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        if !self.model.is_ready() {
            if matches!(code, KeyCode::Esc | KeyCode::Char('q')) {
                *exit = true;
            }
            return Mode::Normal;
        }

        match code {
            KeyCode::Esc => {
                if self.model.state().query.is_empty() {
                    *exit = true;
                } else {
                    self.update_query(String::new());
                }
            }
            KeyCode::Char(ch) => {
                let mut query = self.model.state().query.clone();
                query.push(ch);
                self.update_query(query);
            }
            KeyCode::Backspace => {
                let mut query = self.model.state().query.clone();
                if query.pop().is_some() {
                    self.update_query(query);
                }
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-SELECTION_JUMP),
            KeyCode::PageDown => self.move_selection(SELECTION_JUMP),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = self.model.page_rows().len().saturating_sub(1),
            KeyCode::Left => self.change_page(-1),
            KeyCode::Right => self.change_page(1),
            KeyCode::Tab | KeyCode::BackTab => self.toggle_sort(),
            KeyCode::Enter => {
                if let Some(song) = self.current_song().cloned() {
                    self.clear_status();
                    return Mode::Detail(song);
                }
            }
            _ => {}
        }
        Mode::Normal
    }

    fn handle_detail_key(&mut self, code: KeyCode, song: Song) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Mode::Normal,
            KeyCode::Char(' ') | KeyCode::Char('f') => {
                self.toggle_favorite(&song);
                Mode::Detail(song)
            }
            _ => Mode::Detail(song),
        }
    }

    fn update_query(&mut self, query: String) {
        self.model.set_query(query);
        self.selected = 0;
    }

    fn toggle_favorite(&mut self, song: &Song) {
        let Some(favorited) = self.model.toggle_favorite(&song.id) else {
            return;
        };
        let mut message = if favorited {
            format!("Added \"{}\" to favorites.", song.title)
        } else {
            format!("Removed \"{}\" from favorites.", song.title)
        };
        if !self.model.persistence_enabled() {
            message.push_str(" Favorites are not saved on this device.");
        }
        self.set_status(message, StatusKind::Info);
        self.clamp_selection();
    }

    fn toggle_favorites_only(&mut self) {
        if !self.favorites_toggle_visible() {
            return;
        }
        self.model.toggle_favorites_only();
        self.selected = 0;
        let message = if self.model.state().show_only_favorites {
            "Showing only favorites."
        } else {
            "Showing all songs."
        };
        self.set_status(message, StatusKind::Info);
    }

    fn toggle_sort(&mut self) {
        let next = self.model.state().sort_by.toggled();
        self.model.set_sort_by(next);
        self.set_status(format!("Sorted by {}.", next.label()), StatusKind::Info);
    }

    fn toggle_pagination(&mut self) {
        self.model.toggle_pagination();
        self.selected = 0;
        let message = if self.model.state().paginate {
            format!("Pagination on ({} per page).", self.model.page_size())
        } else {
            "Pagination off.".to_string()
        };
        self.set_status(message, StatusKind::Info);
    }

    fn change_page(&mut self, delta: isize) {
        if !self.model.state().paginate {
            return;
        }
        let before = self.model.page();
        if delta > 0 {
            self.model.next_page();
        } else {
            self.model.prev_page();
        }
        if self.model.page() != before {
            debug!(page = self.model.page(), "page changed");
            self.selected = 0;
        }
    }

    /// The favorites-only toggle is hidden until a favorite exists, but stays
    /// reachable while the filter is on so it can be switched back off.
    fn favorites_toggle_visible(&self) -> bool {
        self.model.has_favorites() || self.model.state().show_only_favorites
    }

    fn current_song(&self) -> Option<&Song> {
        self.model.page_rows().get(self.selected)
    }

    fn move_selection(&mut self, offset: isize) {
        let len = self.model.page_rows().len() as isize;
        if len == 0 {
            return;
        }
        let new = (self.selected as isize + offset).clamp(0, len - 1);
        self.selected = new as usize;
    }

    fn clamp_selection(&mut self) {
        let len = self.model.page_rows().len();
        self.selected = min(self.selected, len.saturating_sub(1));
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(SEARCH_HEIGHT),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_search_bar(frame, chunks[0]);
        self.draw_controls(frame, chunks[1]);

        match self.model.load_state() {
            LoadState::Loading => {
                let message = Paragraph::new("Loading songs...")
                    .alignment(Alignment::Center)
                    .block(Block::default().borders(Borders::ALL));
                frame.render_widget(message, chunks[2]);
            }
            LoadState::Error(error) => {
                let message = Paragraph::new(vec![
                    Line::from(Span::styled(
                        "The song list could not be loaded.",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red))),
                ])
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL));
                frame.render_widget(message, chunks[2]);
            }
            LoadState::Ready => self.draw_results(frame, chunks[2]),
        }

        self.draw_footer(frame, chunks[3]);

        if let Mode::Detail(song) = &self.mode {
            self.draw_detail(frame, area, song);
        }
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Karaoke Songbook");
        let query = &self.model.state().query;
        let line = if query.is_empty() {
            Line::from(vec![
                Span::raw(SEARCH_PROMPT),
                Span::styled(
                    "type part of a song or artist...",
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        } else {
            Line::from(format!("{SEARCH_PROMPT}{query}"))
        };
        frame.render_widget(Paragraph::new(line).block(block.clone()), area);

        if self.model.is_ready() && matches!(self.mode, Mode::Normal) {
            let inner = block.inner(area);
            let cursor_x = input_cursor_x(inner, SEARCH_PROMPT, query);
            frame.set_cursor_position((cursor_x, inner.y));
        }
    }

    fn draw_controls(&self, frame: &mut Frame, area: Rect) {
        if !self.model.is_ready() {
            return;
        }
        let state = self.model.state();
        let active = Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let sort_span = |key: SortKey, label: &'static str| {
            if state.sort_by == key {
                Span::styled(label, active)
            } else {
                Span::raw(label)
            }
        };

        let mut spans = vec![
            Span::raw(" "),
            sort_span(SortKey::Title, " Sort by Title "),
            Span::raw(" "),
            sort_span(SortKey::Artist, " Sort by Artist "),
            Span::raw("   "),
        ];
        if self.favorites_toggle_visible() {
            let label = if state.show_only_favorites {
                Span::styled(
                    " ★ Show All ",
                    Style::default().fg(Color::Black).bg(Color::Yellow),
                )
            } else {
                Span::raw(format!(" ★ Favorites Only ({}) ", self.model.favorites_count()))
            };
            spans.push(label);
            spans.push(Span::raw("   "));
        }
        if state.paginate {
            spans.push(Span::raw(format!(
                "Page {} of {}",
                self.model.page(),
                self.model.page_count()
            )));
        } else {
            spans.push(Span::styled("Pages: Off", Style::default().fg(Color::DarkGray)));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn draw_results(&self, frame: &mut Frame, area: Rect) {
        if self.model.needs_longer_query() || self.model.visible().is_empty() {
            self.draw_search_hints(frame, area);
            return;
        }

        let sort_by = self.model.state().sort_by;
        let header = Row::new(vec![
            Cell::from("Fave"),
            Cell::from(column_title("Song Title", sort_by == SortKey::Title)),
            Cell::from(column_title("Artist", sort_by == SortKey::Artist)),
        ])
        .style(Style::default().add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = self
            .model
            .page_rows()
            .iter()
            .map(|song| {
                let favorite = self.model.is_favorite(&song.id);
                Row::new(vec![
                    Cell::from(favorite_marker(favorite)).style(favorite_style(favorite)),
                    Cell::from(song.title.clone()),
                    Cell::from(song.artist.clone()),
                ])
            })
            .collect();

        let title = format!("{} results", self.model.visible().len());
        let table = Table::new(
            rows,
            [
                Constraint::Length(4),
                Constraint::Fill(5),
                Constraint::Fill(4),
            ],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .highlight_symbol("▶ ");

        let mut table_state = TableState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(table, area, &mut table_state);
    }

    fn draw_search_hints(&self, frame: &mut Frame, area: Rect) {
        let state = self.model.state();
        let mut lines = Vec::new();
        if !state.query_is_short() && !state.show_only_favorites {
            lines.push(Line::from(Span::styled(
                format!("No songs match \"{}\".", state.trimmed_query()),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
        }
        lines.push(Line::from(
            "For best results search portions of a song or artist, not all entries are correctly spelled.",
        ));
        lines.push(Line::from(
            "Example, if looking for \"Tennessee Whiskey\", try \"Tennessee\" or \"Whiskey\".",
        ));
        if self.model.show_no_favorites_hint() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "No favorite songs yet. Press Ctrl+F on a song to add it to favorites.",
                Style::default().fg(Color::Yellow),
            )));
        }

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(paragraph, area);
    }

    fn draw_detail(&self, frame: &mut Frame, area: Rect, song: &Song) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let favorite = self.model.is_favorite(&song.id);
        let favorite_text = if favorite {
            "In your favorites"
        } else {
            "Not in favorites"
        };
        let mut hints = Vec::new();
        hints.extend(key_hint("Space", "Toggle Favorite"));
        hints.extend(key_hint("Esc", "Close"));

        let lines = vec![
            Line::from(Span::styled(
                song.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                song.artist.clone(),
                Style::default().fg(Color::Gray),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled(favorite_marker(favorite), favorite_style(favorite)),
                Span::raw(format!(" {favorite_text}")),
            ]),
            Line::from(""),
            Line::from(hints),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Song Details"));
        frame.render_widget(paragraph, popup_area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let mut spans = Vec::new();
        match (&self.mode, self.model.load_state()) {
            (Mode::Detail(_), _) => {
                spans.extend(key_hint("Space", "Favorite"));
                spans.extend(key_hint("Esc", "Close"));
            }
            (Mode::Normal, LoadState::Ready) => {
                spans.extend(key_hint("↑↓", "Select"));
                spans.extend(key_hint("Enter", "Details"));
                spans.extend(key_hint("^F", "Favorite"));
                spans.extend(key_hint("Tab", "Sort"));
                if self.favorites_toggle_visible() {
                    spans.extend(key_hint("^O", "Favorites Only"));
                }
                spans.extend(key_hint("^G", "Pages"));
                if self.model.state().paginate {
                    spans.extend(key_hint("←→", "Page"));
                }
                spans.extend(key_hint("Esc", "Clear/Quit"));
            }
            (Mode::Normal, _) => {
                spans.extend(key_hint("q", "Quit"));
            }
        }
        Line::from(spans)
    }
}

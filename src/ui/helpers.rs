use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

/// Star shown in the favorite column and the detail overlay.
pub(crate) fn favorite_marker(favorite: bool) -> &'static str {
    if favorite {
        "★"
    } else {
        "☆"
    }
}

/// Style for the star column; filled stars stand out in yellow.
pub(crate) fn favorite_style(favorite: bool) -> Style {
    if favorite {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// A `[key] label` pair for instruction lines.
pub(crate) fn key_hint(key: &str, label: &str) -> [Span<'static>; 2] {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    [
        Span::styled(format!("[{key}]"), key_style),
        Span::raw(format!(" {label}   ")),
    ]
}

/// Column header text with a marker on the active sort column.
pub(crate) fn column_title(label: &str, sorted: bool) -> String {
    if sorted {
        format!("{label} (sorted)")
    } else {
        label.to_string()
    }
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for the detail overlay.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Column of the text cursor after `prompt` and `input`, kept inside `area`.
pub(crate) fn input_cursor_x(area: Rect, prompt: &str, input: &str) -> u16 {
    let width = |text: &str| u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
    area.x
        .saturating_add(width(prompt))
        .saturating_add(width(input))
        .min(area.right())
}

//! Help overlay: keybinding table.
//!
//! Renders a centered overlay listing the bindings that apply to the
//! running front-end.

use crate::app::{App, Mode};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Row, Table},
    Frame,
};

const GENERAL: &[(&str, &str)] = &[
    ("j/k, Up/Down", "Move selection"),
    ("PgUp/PgDn", "Move one screen"),
    ("g/G, Home/End", "First / last"),
    ("Tab/S-Tab", "Next / previous category"),
    ("m", "Load more results"),
    ("r", "Reload emoji data"),
    ("?", "Toggle help"),
    ("q, Ctrl+c", "Quit"),
];

const SEARCH: &[(&str, &str)] = &[
    ("/, Ctrl+k", "Focus search"),
    ("Ctrl+/", "Clear search"),
    ("Enter", "Done typing"),
    ("Esc", "Clear and leave search"),
];

const BROWSE: &[(&str, &str)] = &[("Enter", "Copy emoji to clipboard")];

const CURATE: &[(&str, &str)] = &[
    ("Enter, Space", "Add / remove popular emoji"),
    ("p", "Switch grid / popular strip"),
    ("h/l", "Move in popular strip"),
    ("x, Delete", "Remove from popular"),
    ("C", "Clear all popular"),
    ("Ctrl+s", "Save popular emojis"),
];

/// Render the help overlay on top of the current view.
pub fn render(f: &mut Frame, app: &App) {
    let overlay = centered_rect(70, 80, f.area());
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }

    f.render_widget(Clear, overlay);

    let mode_section = match app.mode {
        Mode::Browse => ("Browse", BROWSE),
        Mode::Curate => ("Curate", CURATE),
    };
    let sections = [("General", GENERAL), ("Search", SEARCH), mode_section];

    let mut rows: Vec<Row> = Vec::new();
    for (label, bindings) in sections {
        rows.push(Row::new(vec![
            Line::from(Span::styled(
                format!("-- {} --", label),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ]));
        for (key, description) in bindings {
            rows.push(Row::new(vec![format!("  {}", key), description.to_string()]));
        }
        rows.push(Row::new(vec![String::new(), String::new()]));
    }
    rows.pop();

    let widths = [Constraint::Length(18), Constraint::Min(20)];

    let table = Table::new(rows, widths)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help (? to close) "),
        )
        .header(
            Row::new(vec!["Key", "Action"])
                .style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .add_modifier(Modifier::UNDERLINED),
                )
                .bottom_margin(1),
        );

    f.render_widget(table, overlay);
}

/// Create a centered rectangle with the given percentage of the parent area.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

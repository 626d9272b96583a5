//! Render functions for the TUI.
//!
//! Lays out the search header, result grid, popular strip (curate only) and
//! status bar, then draws any overlay on top.

use crate::app::{App, ConfirmAction, Mode};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::{grid, help, popular, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 40;
pub(super) const MIN_HEIGHT: u16 = 10;

/// Height of the popular strip including borders.
const POPULAR_HEIGHT: u16 = 3;

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let mut constraints = vec![Constraint::Length(3), Constraint::Min(0)];
    if app.mode == Mode::Curate {
        constraints.push(Constraint::Length(POPULAR_HEIGHT));
    }
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    render_header(f, app, chunks[0]);
    grid::render(f, app, chunks[1]);
    if app.mode == Mode::Curate {
        popular::render(f, app, chunks[2]);
    }
    status::render(f, app, chunks[chunks.len() - 1]);

    if app.show_help {
        help::render(f, app);
    }

    if let Some(confirm) = app.pending_confirm {
        render_confirm_overlay(f, confirm);
    }
}

/// Search line plus the active category filter.
fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let title = match app.mode {
        Mode::Browse => " Emoji Picker ",
        Mode::Curate => " Emoji Picker - Manage Popular ",
    };

    let (input_style, cursor) = if app.search_mode {
        (Style::default().fg(Color::White), "_")
    } else {
        (Style::default().fg(Color::Gray), "")
    };

    let search_text = if app.search_input.is_empty() && !app.search_mode {
        Span::styled(
            "Search emojis... (/)",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::styled(format!("{}{}", app.search_input, cursor), input_style)
    };

    let line = Line::from(vec![
        Span::styled("Search: ", Style::default().add_modifier(Modifier::BOLD)),
        search_text,
        Span::raw("   "),
        Span::styled(
            format!("[{}]", app.category_label()),
            Style::default().fg(Color::Yellow),
        ),
    ]);

    let border_style = if app.search_mode {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );
    f.render_widget(paragraph, area);
}

/// Render a confirmation dialog overlay centered on screen.
fn render_confirm_overlay(f: &mut Frame, confirm: ConfirmAction) {
    let area = f.area();

    let text = match confirm {
        ConfirmAction::ClearPopular => {
            "Are you sure you want to clear all popular emojis?\n\n(y) Confirm  (n/Esc) Cancel"
        }
    };

    let width = 56u16.min(area.width.saturating_sub(4));
    let height = 6u16.min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let overlay = Rect::new(x, y, width, height);

    if overlay.width < 10 || overlay.height < 5 {
        return;
    }

    f.render_widget(Clear, overlay);

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Confirm "),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, overlay);
}

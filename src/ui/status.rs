use crate::app::{App, Focus, Mode, StatusKind};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let (text, style): (Cow<'_, str>, Style) = if let Some(status) = &app.status_message {
        let bg = match status.kind {
            StatusKind::Success => Color::Green,
            StatusKind::Info => Color::Blue,
            StatusKind::Error => Color::Red,
        };
        (
            Cow::Borrowed(status.text.as_ref()),
            Style::default().bg(bg).fg(Color::White),
        )
    } else {
        (
            Cow::Borrowed(hint(app)),
            Style::default().bg(Color::DarkGray).fg(Color::White),
        )
    };

    f.render_widget(Paragraph::new(text).style(style), area);
}

/// Keybinding hints for the current context.
fn hint(app: &App) -> &'static str {
    if app.search_mode {
        return "Type to search | ESC clear | ENTER done | Ctrl+/ clear";
    }
    match (app.mode, app.focus) {
        (Mode::Browse, _) => "[Enter]copy [/]search [Tab]category [m]ore [r]eload [?]help [q]uit",
        (Mode::Curate, Focus::Grid) => {
            "[Enter]toggle [p]opular [/]search [Tab]category [C]lear [Ctrl+s]ave [?]help [q]uit"
        }
        (Mode::Curate, Focus::Popular) => "[h/l]move [x]remove [C]lear [p]grid [Ctrl+s]ave [q]uit",
    }
}

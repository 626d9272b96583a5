use crate::app::{App, Focus};
use crate::util::{display_width, strip_control_chars};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Shift `offset` so the cells `offset..=selected` fit in `width` columns.
///
/// `widths` holds the column width of each cell. A lone cell wider than the
/// strip still starts at `selected`.
pub(super) fn strip_offset(
    widths: &[usize],
    selected: usize,
    offset: usize,
    width: usize,
) -> usize {
    if widths.is_empty() {
        return 0;
    }
    let selected = selected.min(widths.len() - 1);
    let mut offset = offset.min(selected);
    while offset < selected && widths[offset..=selected].iter().sum::<usize>() > width {
        offset += 1;
    }
    offset
}

/// Render the popular selection strip (curate mode).
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let is_focused = app.focus == Focus::Popular;
    let border_style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let line = if app.popular.is_empty() {
        app.popular_offset = 0;
        Line::from(Span::styled(
            "No popular emojis selected yet",
            Style::default().fg(Color::Gray),
        ))
    } else {
        let inner_width = area.width.saturating_sub(2) as usize;
        let cells: Vec<String> = app
            .popular
            .glyphs()
            .iter()
            .map(|glyph| format!(" {} ", strip_control_chars(glyph)))
            .collect();
        let widths: Vec<usize> = cells.iter().map(|c| display_width(c)).collect();
        let offset = strip_offset(&widths, app.popular_selected, app.popular_offset, inner_width);
        app.popular_offset = offset;

        let mut used = 0;
        let mut spans = Vec::new();
        for (i, cell) in cells.into_iter().enumerate().skip(offset) {
            used += widths[i];
            if used > inner_width && i != offset {
                break;
            }
            let style = if is_focused && i == app.popular_selected {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else {
                Style::default()
            };
            spans.push(Span::styled(cell, style));
        }
        Line::from(spans)
    };

    let dirty = if app.popular.is_dirty() { " *" } else { "" };
    let title = format!(" Popular Emojis ({}){} ", app.popular.len(), dirty);

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );
    f.render_widget(paragraph, area);
}

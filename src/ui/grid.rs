use crate::app::{App, Focus, LoadState, Mode};
use crate::dataset::display_category;
use crate::util::{pad_to_width, strip_control_chars, truncate_to_width};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Width reserved for the name column before the category.
const NAME_COLUMN: usize = 36;

/// Keep `selected` inside the window `[offset, offset + height)`.
pub(super) fn scroll_offset(selected: usize, offset: usize, height: usize) -> usize {
    if height == 0 {
        return 0;
    }
    if selected < offset {
        selected
    } else if selected >= offset + height {
        selected + 1 - height
    } else {
        offset
    }
}

/// Render the result grid with a trailing "load more" row.
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let is_focused = app.focus == Focus::Grid && !app.search_mode;
    let border_style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let page = app.visible();
    let title = format!(
        " {} of {} emojis ",
        page.items.len(),
        app.filtered.len()
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);

    if page.items.is_empty() {
        let msg = match &app.load_state {
            LoadState::Loading => "Loading emoji data...".to_string(),
            LoadState::Failed(reason) => format!("Failed to load emoji data\n\n{}", reason),
            LoadState::Ready => "No emojis found".to_string(),
        };
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let inner_height = area.height.saturating_sub(2) as usize;
    let inner_width = area.width.saturating_sub(2) as usize;
    let remaining = app.filtered.len().saturating_sub(page.items.len());
    let has_more = page.has_more;

    let offset = scroll_offset(app.selected, app.grid_offset, inner_height);
    let show_popular_marks = app.mode == Mode::Curate || !app.popular.is_empty();

    let mut items: Vec<ListItem> = page
        .items
        .iter()
        .enumerate()
        .skip(offset)
        .take(inner_height)
        .map(|(i, record)| {
            let mut spans = Vec::with_capacity(4);

            if show_popular_marks {
                if app.popular.is_selected(&record.glyph) {
                    spans.push(Span::styled("★ ", Style::default().fg(Color::Yellow)));
                } else {
                    spans.push(Span::raw("  "));
                }
            }

            let row_style = if i == app.selected {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else {
                Style::default()
            };

            let glyph = strip_control_chars(&record.glyph);
            let name = strip_control_chars(&record.name);
            spans.push(Span::styled(
                format!("{}  {}", glyph, pad_to_width(&name, NAME_COLUMN)),
                row_style,
            ));

            let category = display_category(&record.category);
            let used = 2 + 2 + NAME_COLUMN + if show_popular_marks { 2 } else { 0 };
            let room = inner_width.saturating_sub(used + 2);
            if room > 0 {
                spans.push(Span::styled(
                    format!("  {}", truncate_to_width(&category, room)),
                    Style::default().fg(Color::DarkGray),
                ));
            }

            ListItem::new(Line::from(spans))
        })
        .collect();

    let load_more_index = page.items.len();
    if has_more && load_more_index >= offset && load_more_index < offset + inner_height {
        let style = if app.selected == load_more_index {
            Style::default().bg(Color::DarkGray).fg(Color::White)
        } else {
            Style::default().fg(Color::Cyan)
        };
        items.push(ListItem::new(Line::from(Span::styled(
            format!("  Load more ({} remaining)", remaining),
            style.add_modifier(Modifier::BOLD),
        ))));
    }

    let list = List::new(items).block(block);
    f.render_widget(list, area);

    app.grid_offset = offset;
    app.grid_viewport = inner_height;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_offset_keeps_selection_visible() {
        assert_eq!(scroll_offset(0, 0, 10), 0);
        assert_eq!(scroll_offset(9, 0, 10), 0);
        assert_eq!(scroll_offset(10, 0, 10), 1);
        assert_eq!(scroll_offset(25, 3, 10), 16);
        assert_eq!(scroll_offset(2, 5, 10), 2);
    }

    #[test]
    fn test_scroll_offset_stable_inside_window() {
        assert_eq!(scroll_offset(12, 8, 10), 8);
    }

    #[test]
    fn test_scroll_offset_zero_height() {
        assert_eq!(scroll_offset(5, 3, 0), 0);
    }
}

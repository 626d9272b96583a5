//! Input handling for the TUI.
//!
//! This module processes keyboard input and dispatches to the appropriate
//! handler based on overlays, search mode, focus, and front-end mode.

use crate::app::{App, AppEvent, Focus, Mode, StatusKind};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use super::Action;

/// Rows moved by PageUp/PageDown before the first frame reports a height.
const DEFAULT_PAGE_ROWS: usize = 10;

/// Main input dispatch function.
///
/// Overlays capture all keys first, then search mode, then global
/// shortcuts, then the focused panel.
pub(super) async fn handle_input(
    app: &mut App,
    key: KeyEvent,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    let KeyEvent {
        code, modifiers, ..
    } = key;

    if app.show_help {
        return Ok(handle_help_input(app, code));
    }

    if app.pending_confirm.is_some() {
        return Ok(handle_confirm_input(app, code));
    }

    if modifiers.contains(KeyModifiers::CONTROL) {
        return handle_ctrl_input(app, code).await;
    }

    if app.search_mode {
        return Ok(handle_search_input(app, code, event_tx));
    }

    match app.focus {
        Focus::Grid => handle_grid_input(app, code, event_tx),
        Focus::Popular => Ok(handle_popular_input(app, code, event_tx)),
    }
}

/// Handle input while the help overlay is visible.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    if matches!(code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')) {
        app.show_help = false;
    }
    Action::Continue
}

/// Handle input while a confirmation dialog is visible.
fn handle_confirm_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_pending(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_pending(),
        _ => {}
    }
    Action::Continue
}

/// Ctrl shortcuts work in every panel, including while typing a search.
async fn handle_ctrl_input(app: &mut App, code: KeyCode) -> Result<Action> {
    match code {
        KeyCode::Char('c') => return Ok(Action::Quit),
        KeyCode::Char('k') => app.enter_search_mode(),
        // Terminals report Ctrl+/ as either '/' or '_' (0x1f)
        KeyCode::Char('/') | KeyCode::Char('_') => app.clear_search(),
        KeyCode::Char('s') if app.mode == Mode::Curate => app.save_popular().await,
        _ => {}
    }
    Ok(Action::Continue)
}

/// Typing into the search line. Filtering is debounced.
fn handle_search_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) -> Action {
    match code {
        KeyCode::Esc => {
            app.clear_search();
            app.exit_search_mode();
        }
        KeyCode::Enter | KeyCode::Down | KeyCode::Tab => app.exit_search_mode(),
        KeyCode::Backspace => app.search_pop(event_tx),
        KeyCode::Char(c) => app.search_push(c, event_tx),
        _ => {}
    }
    Action::Continue
}

fn handle_grid_input(
    app: &mut App,
    code: KeyCode,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    let page_rows = if app.grid_viewport > 0 {
        app.grid_viewport
    } else {
        DEFAULT_PAGE_ROWS
    };

    match code {
        KeyCode::Char('q') => return Ok(Action::Quit),
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char('/') => app.enter_search_mode(),
        KeyCode::Esc => {
            if !app.search_input.is_empty() {
                app.clear_search();
            }
        }
        KeyCode::Tab => app.cycle_category(true),
        KeyCode::BackTab => app.cycle_category(false),
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
        KeyCode::PageDown => app.page_down(page_rows),
        KeyCode::PageUp => app.page_up(page_rows),
        KeyCode::Char('g') | KeyCode::Home => app.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(),
        KeyCode::Char('m') => {
            if !app.load_more() {
                app.set_status_kind("No more emojis", StatusKind::Info);
            }
        }
        KeyCode::Char('r') => {
            app.begin_load(event_tx);
            app.set_status_kind("Reloading emoji data...", StatusKind::Info);
        }
        KeyCode::Enter => {
            if app.on_load_more_row() {
                app.load_more();
            } else {
                match app.mode {
                    Mode::Browse => app.copy_selected(event_tx),
                    Mode::Curate => {
                        app.toggle_selected();
                    }
                }
            }
        }
        KeyCode::Char(' ') if app.mode == Mode::Curate => {
            app.toggle_selected();
        }
        KeyCode::Char('p') => app.toggle_focus(),
        KeyCode::Char('C') if app.mode == Mode::Curate => {
            app.request_clear_popular();
        }
        _ => {}
    }
    Ok(Action::Continue)
}

/// Popular strip (curate mode). Left/right move, x/Delete/Enter remove.
fn handle_popular_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) -> Action {
    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char('p') | KeyCode::Esc => app.toggle_focus(),
        KeyCode::Char('/') => app.enter_search_mode(),
        KeyCode::Char('l') | KeyCode::Right => app.select_next(),
        KeyCode::Char('h') | KeyCode::Left => app.select_prev(),
        KeyCode::Char('g') | KeyCode::Home => app.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(),
        KeyCode::Char('x') | KeyCode::Delete | KeyCode::Enter => app.remove_popular_selected(),
        KeyCode::Char('C') => {
            app.request_clear_popular();
        }
        KeyCode::Char('r') => app.begin_load(event_tx),
        _ => {}
    }
    Action::Continue
}

//! Application event handling.
//!
//! Processes completions from background tasks: dataset loads, debounced
//! search timers and clipboard copies.

use crate::app::{App, AppEvent};

/// Apply a background event to the application state.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::DatasetLoaded { generation, result } => {
            if app.finish_load(generation, result) {
                tracing::debug!(
                    records = app.dataset.len(),
                    origin = ?app.dataset.origin(),
                    "Dataset applied"
                );
            }
        }
        AppEvent::SearchDebounced { generation } => {
            app.on_search_debounced(generation);
        }
        AppEvent::CopyFinished { glyph, result } => {
            app.finish_copy(&glyph, result);
        }
    }
}

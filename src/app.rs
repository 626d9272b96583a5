use crate::clipboard::{self, ClipboardError, CopyMethod};
use crate::dataset::{
    self, display_category, Dataset, DatasetOrigin, DatasetSource, EmojiRecord, LoadError,
    LoadPolicy, KNOWN_CATEGORIES,
};
use crate::debounce::Debouncer;
use crate::filter::{self, FilterQuery, FilteredView};
use crate::pagination::{Page, PaginationCursor, PAGE_SIZE};
use crate::popular::{PopularSelection, SelectionState};
use crate::storage::Database;
use crate::util::strip_control_chars;
use anyhow::Result;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Maximum search query length accepted from the input line.
pub const MAX_SEARCH_LENGTH: usize = 256;

/// How long a status toast stays visible.
pub const STATUS_TTL: Duration = Duration::from_secs(2);

// ============================================================================
// Mode, Focus and State Enums
// ============================================================================

/// Which front-end is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Search and copy glyphs to the clipboard.
    Browse,
    /// Edit the popular selection.
    Curate,
}

impl Mode {
    /// Load policy used when the config does not set one.
    pub fn default_load_policy(self) -> LoadPolicy {
        match self {
            Mode::Browse => LoadPolicy::FailSoft,
            Mode::Curate => LoadPolicy::FailVisible,
        }
    }
}

/// Dataset load progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

/// Which panel receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Grid,
    /// Popular strip (curate mode only).
    Popular,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Info,
    Error,
}

/// A toast shown in the status bar until it expires.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: Cow<'static, str>,
    pub kind: StatusKind,
    pub shown_at: Instant,
}

/// Pending confirmation for destructive operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    ClearPopular,
}

/// Events from background tasks
#[derive(Debug)]
pub enum AppEvent {
    /// A dataset load finished. Ignored unless `generation` is current.
    DatasetLoaded {
        generation: u64,
        result: Result<Dataset, LoadError>,
    },
    /// The search input has been quiet for the debounce delay.
    SearchDebounced { generation: u64 },
    /// A clipboard tool finished (or gave up) copying `glyph`.
    CopyFinished {
        glyph: String,
        result: Result<&'static str, ClipboardError>,
    },
}

/// Startup options resolved from config and CLI.
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub mode: Mode,
    pub source: DatasetSource,
    pub load_policy: LoadPolicy,
    pub fetch_timeout: Duration,
    pub search_debounce: Duration,
    pub popular_key: String,
}

// ============================================================================
// App
// ============================================================================

/// Application state shared by both front-ends.
pub struct App {
    pub db: Database,
    pub http_client: reqwest::Client,
    pub mode: Mode,

    // Dataset
    pub source: DatasetSource,
    pub load_policy: LoadPolicy,
    pub fetch_timeout: Duration,
    pub dataset: Dataset,
    pub load_state: LoadState,
    /// Bumped for every load; stale results are discarded.
    pub load_generation: u64,
    pub load_handle: Option<JoinHandle<()>>,

    // Filter and pagination
    pub query: FilterQuery,
    pub filtered: FilteredView,
    pub cursor: PaginationCursor,
    /// 0 = all categories, otherwise 1 + index into `KNOWN_CATEGORIES`.
    pub category_index: usize,

    // Search input
    pub search_mode: bool,
    pub search_input: String,
    pub search_debounce: Debouncer,

    // Popular selection
    pub popular_key: String,
    pub popular: PopularSelection,

    // Navigation
    pub focus: Focus,
    /// Row in the grid. One past the last revealed record is the "load more" row.
    pub selected: usize,
    /// First grid row on screen; kept across frames so scrolling is stable.
    pub grid_offset: usize,
    /// Grid rows visible in the last frame (page size for PageUp/PageDown).
    pub grid_viewport: usize,
    pub popular_selected: usize,
    /// First glyph drawn in the popular strip.
    pub popular_offset: usize,

    // UI state
    pub status_message: Option<StatusMessage>,
    pub needs_redraw: bool,
    pub show_help: bool,
    pub pending_confirm: Option<ConfirmAction>,
}

impl App {
    pub fn new(db: Database, options: AppOptions) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(30))
            .timeout(options.fetch_timeout)
            .user_agent(concat!("emoji-picker/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            db,
            http_client,
            mode: options.mode,
            source: options.source,
            load_policy: options.load_policy,
            fetch_timeout: options.fetch_timeout,
            dataset: Dataset::empty(),
            load_state: LoadState::Loading,
            load_generation: 0,
            load_handle: None,
            query: FilterQuery::default(),
            filtered: FilteredView::default(),
            cursor: PaginationCursor::new(PAGE_SIZE),
            category_index: 0,
            search_mode: false,
            search_input: String::new(),
            search_debounce: Debouncer::new(options.search_debounce),
            popular_key: options.popular_key,
            popular: PopularSelection::new(),
            focus: Focus::Grid,
            selected: 0,
            grid_offset: 0,
            grid_viewport: 0,
            popular_selected: 0,
            popular_offset: 0,
            status_message: None,
            needs_redraw: true,
            show_help: false,
            pending_confirm: None,
        })
    }

    /// Read the stored popular selection.
    pub async fn load_popular(&mut self) {
        self.popular = PopularSelection::load(&self.db, &self.popular_key).await;
        tracing::debug!(count = self.popular.len(), "Loaded popular selection");
    }

    // ========================================================================
    // Dataset Loading
    // ========================================================================

    /// Start a background dataset load, aborting any load still in flight.
    pub fn begin_load(&mut self, event_tx: &mpsc::Sender<AppEvent>) {
        if let Some(handle) = self.load_handle.take() {
            handle.abort();
            tracing::debug!("Aborted previous dataset load");
        }

        self.load_generation = self.load_generation.wrapping_add(1);
        let generation = self.load_generation;
        self.load_state = LoadState::Loading;

        let client = self.http_client.clone();
        let source = self.source.clone();
        let policy = self.load_policy;
        let timeout = self.fetch_timeout;
        let tx = event_tx.clone();

        tracing::debug!(source = %source, generation, "Spawning dataset load");

        self.load_handle = Some(tokio::spawn(async move {
            let result = dataset::load_dataset(&client, &source, policy, timeout).await;
            let event = AppEvent::DatasetLoaded { generation, result };

            if let Err(e) = tx.send(event).await {
                tracing::warn!(error = %e, "Failed to send dataset (receiver dropped)");
            }
        }));
    }

    /// Apply a finished load. Returns `false` if the result was stale.
    pub fn finish_load(&mut self, generation: u64, result: Result<Dataset, LoadError>) -> bool {
        if generation != self.load_generation {
            tracing::debug!(
                generation,
                current = self.load_generation,
                "Discarding stale dataset load"
            );
            return false;
        }
        self.load_handle = None;

        match result {
            Ok(dataset) => {
                if dataset.origin() == DatasetOrigin::Fallback {
                    self.set_status_kind(
                        "Emoji data unavailable, showing a built-in set",
                        StatusKind::Info,
                    );
                }
                self.load_state = LoadState::Ready;
                self.set_dataset(dataset);
            }
            Err(e) => {
                self.load_state = LoadState::Failed(e.to_string());
                self.set_dataset(Dataset::empty());
                self.set_status_kind(
                    "Failed to load emoji data. Press r to retry.",
                    StatusKind::Error,
                );
            }
        }
        true
    }

    /// Replace the dataset and recompute the view.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.dataset = dataset;
        self.apply_filter();
    }

    // ========================================================================
    // Filtering and Pagination
    // ========================================================================

    /// Recompute the filtered view from the current query. Resets paging.
    pub fn apply_filter(&mut self) {
        self.filtered = filter::apply(&self.dataset, &self.query);
        self.cursor.reset();
        self.selected = 0;
        self.grid_offset = 0;
        self.needs_redraw = true;
    }

    /// Records revealed so far (pages `1..=current`).
    pub fn visible(&self) -> Page<'_, Arc<EmojiRecord>> {
        self.cursor.revealed(&self.filtered)
    }

    /// Number of grid rows, including the "load more" row.
    pub fn row_count(&self) -> usize {
        let page = self.visible();
        page.items.len() + usize::from(page.has_more)
    }

    pub fn on_load_more_row(&self) -> bool {
        let page = self.visible();
        page.has_more && self.selected == page.items.len()
    }

    pub fn selected_record(&self) -> Option<&Arc<EmojiRecord>> {
        self.visible().items.get(self.selected)
    }

    /// Reveal the next page. Selection stays put.
    pub fn load_more(&mut self) -> bool {
        let moved = self.cursor.load_more(self.filtered.len());
        if moved {
            self.needs_redraw = true;
        }
        moved
    }

    /// Current category slug, or `None` for all categories.
    pub fn category_filter(&self) -> Option<&'static str> {
        self.category_index
            .checked_sub(1)
            .and_then(|i| dataset::known_slugs().nth(i))
    }

    pub fn category_label(&self) -> String {
        self.category_filter()
            .map(display_category)
            .unwrap_or_else(|| "All".to_string())
    }

    /// Step through "All" and the known categories.
    pub fn cycle_category(&mut self, forward: bool) {
        let count = KNOWN_CATEGORIES.len() + 1;
        self.category_index = if forward {
            (self.category_index + 1) % count
        } else {
            (self.category_index + count - 1) % count
        };
        self.query.category = self.category_filter().map(str::to_string);
        self.apply_filter();
    }

    // ========================================================================
    // Search Input
    // ========================================================================

    pub fn enter_search_mode(&mut self) {
        self.search_mode = true;
        self.focus = Focus::Grid;
    }

    /// Leave the input line, keeping the current query.
    pub fn exit_search_mode(&mut self) {
        self.search_mode = false;
        if self.search_debounce.is_pending() {
            self.commit_search();
        }
    }

    pub fn search_push(&mut self, c: char, event_tx: &mpsc::Sender<AppEvent>) {
        if self.search_input.chars().count() >= MAX_SEARCH_LENGTH {
            self.set_status_kind(
                format!("Search query too long (max {} chars)", MAX_SEARCH_LENGTH),
                StatusKind::Error,
            );
            return;
        }
        self.search_input.push(c);
        self.schedule_search(event_tx);
    }

    pub fn search_pop(&mut self, event_tx: &mpsc::Sender<AppEvent>) {
        if self.search_input.pop().is_some() {
            self.schedule_search(event_tx);
        }
    }

    fn schedule_search(&mut self, event_tx: &mpsc::Sender<AppEvent>) {
        if self.search_debounce.delay().is_zero() {
            self.commit_search();
            return;
        }
        self.search_debounce
            .schedule(event_tx, |generation| AppEvent::SearchDebounced { generation });
    }

    /// Debounce timer fired. Stale timers are ignored.
    pub fn on_search_debounced(&mut self, generation: u64) {
        if self.search_debounce.complete(generation) {
            self.commit_search();
        }
    }

    /// Filter with whatever is in the input line now.
    pub fn commit_search(&mut self) {
        self.search_debounce.cancel();
        if self.query.text != self.search_input {
            self.query.text = self.search_input.clone();
            self.apply_filter();
        }
    }

    /// Empty the input line and filter immediately.
    pub fn clear_search(&mut self) {
        self.search_input.clear();
        self.commit_search();
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub fn select_next(&mut self) {
        match self.focus {
            Focus::Grid => {
                if self.selected + 1 < self.row_count() {
                    self.selected += 1;
                }
            }
            Focus::Popular => {
                if self.popular_selected + 1 < self.popular.len() {
                    self.popular_selected += 1;
                }
            }
        }
    }

    pub fn select_prev(&mut self) {
        match self.focus {
            Focus::Grid => self.selected = self.selected.saturating_sub(1),
            Focus::Popular => self.popular_selected = self.popular_selected.saturating_sub(1),
        }
    }

    pub fn select_first(&mut self) {
        match self.focus {
            Focus::Grid => self.selected = 0,
            Focus::Popular => self.popular_selected = 0,
        }
    }

    pub fn select_last(&mut self) {
        match self.focus {
            Focus::Grid => self.selected = self.row_count().saturating_sub(1),
            Focus::Popular => self.popular_selected = self.popular.len().saturating_sub(1),
        }
    }

    pub fn page_down(&mut self, rows: usize) {
        if self.focus == Focus::Grid {
            self.selected = (self.selected + rows).min(self.row_count().saturating_sub(1));
        }
    }

    pub fn page_up(&mut self, rows: usize) {
        if self.focus == Focus::Grid {
            self.selected = self.selected.saturating_sub(rows);
        }
    }

    /// Switch between the grid and the popular strip (curate only).
    pub fn toggle_focus(&mut self) {
        if self.mode != Mode::Curate {
            return;
        }
        self.focus = match self.focus {
            Focus::Grid => Focus::Popular,
            Focus::Popular => Focus::Grid,
        };
        self.clamp_popular_selection();
    }

    fn clamp_popular_selection(&mut self) {
        self.popular_selected = self
            .popular_selected
            .min(self.popular.len().saturating_sub(1));
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// Copy the selected glyph to the clipboard (browse).
    pub fn copy_selected(&mut self, event_tx: &mpsc::Sender<AppEvent>) {
        let Some(record) = self.selected_record() else {
            return;
        };
        let glyph = record.glyph.clone();
        let tx = event_tx.clone();

        tokio::spawn(async move {
            let result = clipboard::copy_with_command(&glyph).await;
            if let Err(e) = tx.send(AppEvent::CopyFinished { glyph, result }).await {
                tracing::warn!(error = %e, "Failed to send copy result (receiver dropped)");
            }
        });
    }

    /// Report a finished copy, falling back to OSC 52 if no tool worked.
    pub fn finish_copy(&mut self, glyph: &str, result: Result<&'static str, ClipboardError>) {
        let method = match result {
            Ok(command) => Ok(CopyMethod::Command(command)),
            Err(e) => {
                tracing::debug!(error = %e, "Clipboard command unavailable, trying OSC 52");
                clipboard::copy_osc52(glyph)
            }
        };

        match method {
            Ok(method) => {
                tracing::debug!(?method, "Copied glyph");
                self.set_status(format!("Copied {} to clipboard!", strip_control_chars(glyph)));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Clipboard copy failed");
                self.set_status_kind(format!("Failed to copy: {}", e), StatusKind::Error);
            }
        }
    }

    /// Toggle the selected glyph in the popular selection (curate).
    pub fn toggle_selected(&mut self) -> Option<SelectionState> {
        let glyph = self.selected_record()?.glyph.clone();
        let state = self.popular.toggle(&glyph);
        match state {
            SelectionState::Added => {
                self.set_status_kind("Added to popular emojis", StatusKind::Success)
            }
            SelectionState::Removed => {
                self.set_status_kind("Removed from popular emojis", StatusKind::Info)
            }
        }
        self.clamp_popular_selection();
        Some(state)
    }

    /// Remove the highlighted glyph in the popular strip.
    pub fn remove_popular_selected(&mut self) {
        // Out-of-range is logged by the store
        if self.popular.remove(self.popular_selected).is_ok() {
            self.clamp_popular_selection();
            self.set_status_kind("Removed from popular emojis", StatusKind::Info);
        }
    }

    /// Ask before clearing. Returns whether a confirmation is now pending.
    pub fn request_clear_popular(&mut self) -> bool {
        if self.popular.is_empty() {
            self.set_status_kind("No popular emojis to clear", StatusKind::Info);
            return false;
        }
        self.pending_confirm = Some(ConfirmAction::ClearPopular);
        true
    }

    /// Run the pending confirmation, if any.
    pub fn confirm_pending(&mut self) {
        if let Some(ConfirmAction::ClearPopular) = self.pending_confirm.take() {
            self.popular.clear();
            self.popular_selected = 0;
            self.popular_offset = 0;
            self.focus = Focus::Grid;
            self.set_status_kind("All popular emojis cleared", StatusKind::Info);
        }
    }

    pub fn cancel_pending(&mut self) {
        self.pending_confirm = None;
    }

    /// Persist the popular selection.
    pub async fn save_popular(&mut self) {
        match self.popular.save(&self.db, &self.popular_key).await {
            Ok(()) => self.set_status_kind("Popular emojis saved successfully!", StatusKind::Success),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to save popular selection");
                self.set_status_kind(format!("Failed to save: {}", e), StatusKind::Error);
            }
        }
    }

    /// Best-effort save on exit, only when curate mode changed something.
    pub async fn save_popular_on_exit(&mut self) {
        if self.mode != Mode::Curate || !self.popular.is_dirty() {
            return;
        }
        match self.popular.save(&self.db, &self.popular_key).await {
            Ok(()) => tracing::info!(count = self.popular.len(), "Saved popular selection on exit"),
            Err(e) => tracing::warn!(error = %e, "Failed to save popular selection on exit"),
        }
    }

    // ========================================================================
    // Status
    // ========================================================================

    /// Set a success toast (expires after `STATUS_TTL`)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.set_status_kind(msg, StatusKind::Success);
    }

    pub fn set_status_kind(&mut self, msg: impl Into<Cow<'static, str>>, kind: StatusKind) {
        self.status_message = Some(StatusMessage {
            text: msg.into(),
            kind,
            shown_at: Instant::now(),
        });
        self.needs_redraw = true;
    }

    /// Clear status message if expired.
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some(status) = &self.status_message {
            if status.shown_at.elapsed() >= STATUS_TTL {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

// ============================================================================
// Resource Cleanup
// ============================================================================

/// Abort the in-flight load so it does not outlive the event loop.
impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.load_handle.take() {
            handle.abort();
            tracing::debug!("Aborted dataset load on App drop");
        }
    }
}

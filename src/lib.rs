//! Terminal emoji picker.
//!
//! The core is a small in-memory pipeline: a categorized emoji dataset is
//! loaded and flattened ([`dataset`]), filtered by free text and category
//! ([`filter`]), and sliced into "load more" pages ([`pagination`]). A curated
//! list of popular glyphs ([`popular`]) is persisted to a local key-value
//! store ([`storage`]).
//!
//! Two terminal front-ends consume the core through [`app::App`]: a browse
//! view that copies glyphs to the clipboard, and a curate view that edits the
//! popular list.

pub mod app;
pub mod clipboard;
pub mod config;
pub mod dataset;
pub mod debounce;
pub mod filter;
pub mod pagination;
pub mod popular;
pub mod storage;
pub mod ui;
pub mod util;

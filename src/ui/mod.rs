//! Terminal User Interface module.
//!
//! Both front-ends (browse and curate) share this module; the differences are
//! driven by [`crate::app::Mode`].
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `render` - Layout, overlays and view dispatch
//! - `grid` - Emoji result list with the "load more" row
//! - `popular` - Popular selection strip (curate)
//! - `status` - Status bar widget
//! - `help` - Keybinding overlay

mod events;
mod grid;
mod help;
mod input;
mod loop_runner;
mod popular;
mod render;
mod status;

pub use loop_runner::{run, Action};

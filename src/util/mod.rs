//! Terminal text helpers.
//!
//! Dataset names and glyphs are untrusted and of mixed width (emoji are
//! usually two columns), so everything drawn in the grid goes through these.
//!
//! ```
//! use emoji_picker::util::{display_width, truncate_to_width};
//!
//! assert_eq!(display_width("ok 😀"), 5);
//! assert_eq!(truncate_to_width("grinning face", 8), "grinn...");
//! ```

mod text;

pub use text::{display_width, pad_to_width, strip_control_chars, truncate_to_width};

//! Emoji dataset loading and normalization.
//!
//! The dataset source is a nested JSON document:
//!
//! ```json
//! { "@version": "16.0",
//!   "emojis": { "Smileys & Emotion": { "face-smiling": [ { "emoji": "😀", "name": "grinning face" } ] } } }
//! ```
//!
//! It is flattened into a [`Dataset`] of [`EmojiRecord`]s in source order:
//! categories, then subcategories, then entries.
//!
//! # Submodules
//!
//! - [`category`] - Category label to slug normalization and display names
//! - [`keywords`] - Searchable keyword derivation
//! - `source` - Raw document shape and [`DatasetSource`] parsing
//! - `loader` - Fetching (HTTP or file) with fail-soft / fail-visible policy
//! - `fallback` - Built-in records used when the source is unavailable

pub mod category;
mod fallback;
pub mod keywords;
mod loader;
mod source;
mod types;

pub use category::{category_slug, display_category, known_slugs, KNOWN_CATEGORIES};
pub use fallback::fallback_dataset;
pub use keywords::generate_keywords;
pub use loader::{
    build_dataset, fetch_dataset, load_dataset, parse_dataset, LoadError, LoadPolicy,
    DEFAULT_FETCH_TIMEOUT, DEFAULT_UNICODE_VERSION, UNKNOWN_NAME,
};
pub use source::{DatasetSource, OrderedMap, RawDataset, RawEmoji};
pub use types::{Dataset, DatasetOrigin, EmojiRecord};

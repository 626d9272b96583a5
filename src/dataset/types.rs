use std::collections::BTreeSet;
use std::ops::Deref;
use std::sync::Arc;

// ============================================================================
// Emoji Record
// ============================================================================

/// A single emoji, flattened out of the nested source document.
///
/// Immutable after load. Records are shared as `Arc<EmojiRecord>` so that
/// filtered views hold cheap references instead of deep copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmojiRecord {
    /// The emoji character sequence itself.
    pub glyph: String,
    /// Human-readable name ("Unknown" when the source omits it).
    pub name: String,
    /// Normalized category slug, e.g. `smileys-emotion`.
    pub category: String,
    /// Lowercase, deduplicated, non-empty search tokens.
    pub keywords: BTreeSet<String>,
    pub unicode_version: String,
}

// ============================================================================
// Dataset
// ============================================================================

/// Where a [`Dataset`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetOrigin {
    /// Parsed from the configured source.
    Source,
    /// Built-in records substituted after a failed load.
    Fallback,
    /// Nothing loaded (before the first load, or after a visible failure).
    Empty,
}

/// Ordered, immutable sequence of emoji records.
///
/// Built once per load and replaced wholesale on reload. Cloning is O(1):
/// the record slice is reference counted.
#[derive(Debug, Clone)]
pub struct Dataset {
    version: Arc<str>,
    origin: DatasetOrigin,
    records: Arc<[Arc<EmojiRecord>]>,
}

impl Dataset {
    pub fn new(version: impl Into<Arc<str>>, origin: DatasetOrigin, records: Vec<EmojiRecord>) -> Self {
        Self {
            version: version.into(),
            origin,
            records: records.into_iter().map(Arc::new).collect(),
        }
    }

    /// An empty dataset, used before the first load completes.
    pub fn empty() -> Self {
        Self::new("", DatasetOrigin::Empty, Vec::new())
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn origin(&self) -> DatasetOrigin {
        self.origin
    }

    pub fn records(&self) -> &[Arc<EmojiRecord>] {
        &self.records
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::empty()
    }
}

impl Deref for Dataset {
    type Target = [Arc<EmojiRecord>];

    fn deref(&self) -> &Self::Target {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(glyph: &str) -> EmojiRecord {
        EmojiRecord {
            glyph: glyph.to_string(),
            name: "test".to_string(),
            category: "symbols".to_string(),
            keywords: BTreeSet::new(),
            unicode_version: "16.0".to_string(),
        }
    }

    #[test]
    fn test_empty_dataset() {
        let ds = Dataset::empty();
        assert!(ds.is_empty());
        assert_eq!(ds.origin(), DatasetOrigin::Empty);
    }

    #[test]
    fn test_clone_shares_records() {
        let ds = Dataset::new("15.1", DatasetOrigin::Source, vec![record("😀"), record("😂")]);
        let copy = ds.clone();
        assert!(Arc::ptr_eq(&ds[0], &copy[0]));
        assert_eq!(copy.len(), 2);
        assert_eq!(copy.version(), "15.1");
    }
}

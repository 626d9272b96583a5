//! Free-text and category filtering over a [`Dataset`](crate::dataset::Dataset).
//!
//! Filtering is a pure function of the record slice and a [`FilterQuery`]. The
//! result keeps dataset order; there is no ranking.

use std::ops::Deref;
use std::sync::Arc;

use crate::dataset::EmojiRecord;

/// A search constraint: free text and an optional exact category slug.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterQuery {
    pub text: String,
    pub category: Option<String>,
}

impl FilterQuery {
    pub fn new(text: impl Into<String>, category: Option<String>) -> Self {
        Self {
            text: text.into(),
            category,
        }
    }

    /// Lowercased, trimmed search text.
    pub fn normalized_text(&self) -> String {
        self.text.trim().to_lowercase()
    }

    /// Category constraint, with an empty slug treated as "no constraint".
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    /// True when the query selects every record.
    pub fn is_unconstrained(&self) -> bool {
        self.text.trim().is_empty() && self.category().is_none()
    }

    /// Whether `record` satisfies this query.
    pub fn matches(&self, record: &EmojiRecord) -> bool {
        self.matches_normalized(record, &self.normalized_text())
    }

    fn matches_normalized(&self, record: &EmojiRecord, text: &str) -> bool {
        if let Some(category) = self.category() {
            if record.category != category {
                return false;
            }
        }

        text.is_empty()
            || record.name.to_lowercase().contains(text)
            || record.keywords.iter().any(|k| k.contains(text))
            || record.category.contains(text)
    }
}

/// Ordered subsequence of a dataset that satisfied a [`FilterQuery`].
///
/// Holds shared references to the dataset's records, never copies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredView(Vec<Arc<EmojiRecord>>);

impl FilteredView {
    pub fn into_inner(self) -> Vec<Arc<EmojiRecord>> {
        self.0
    }
}

impl Deref for FilteredView {
    type Target = [Arc<EmojiRecord>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Filter `records` by `query`, preserving order.
pub fn apply(records: &[Arc<EmojiRecord>], query: &FilterQuery) -> FilteredView {
    if query.is_unconstrained() {
        return FilteredView(records.to_vec());
    }

    let text = query.normalized_text();
    FilteredView(
        records
            .iter()
            .filter(|r| query.matches_normalized(r, &text))
            .cloned()
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{category_slug, generate_keywords};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn record(glyph: &str, name: &str, category_label: &str, subcategory: &str) -> Arc<EmojiRecord> {
        Arc::new(EmojiRecord {
            glyph: glyph.to_string(),
            name: name.to_string(),
            category: category_slug(category_label),
            keywords: generate_keywords(name, category_label, subcategory),
            unicode_version: "16.0".to_string(),
        })
    }

    fn sample() -> Vec<Arc<EmojiRecord>> {
        vec![
            record("😀", "grinning face", "Smileys & Emotion", "face-smiling"),
            record("🐶", "dog face", "Animals & Nature", "animal-mammal"),
            record("🍕", "pizza", "Food & Drink", "food-prepared"),
            record("😺", "grinning cat", "Smileys & Emotion", "cat-face"),
            record("🏁", "chequered flag", "Flags", "flag"),
        ]
    }

    fn glyphs(view: &FilteredView) -> Vec<&str> {
        view.iter().map(|r| r.glyph.as_str()).collect()
    }

    #[test]
    fn test_empty_query_is_identity() {
        let data = sample();
        let view = apply(&data, &FilterQuery::default());
        assert_eq!(view.len(), data.len());
        assert!(view.iter().zip(&data).all(|(a, b)| Arc::ptr_eq(a, b)));
    }

    #[test]
    fn test_substring_matches_name_and_keywords() {
        let data = sample();
        let view = apply(&data, &FilterQuery::new("smil", None));
        // "smileys" keyword on both smileys, "smiling" subcategory on the face
        assert_eq!(glyphs(&view), vec!["😀", "😺"]);
    }

    #[test]
    fn test_text_is_trimmed_and_case_insensitive() {
        let data = sample();
        let view = apply(&data, &FilterQuery::new("  DOG ", None));
        assert_eq!(glyphs(&view), vec!["🐶"]);
    }

    #[test]
    fn test_category_slug_substring_matches() {
        let data = sample();
        let view = apply(&data, &FilterQuery::new("food-dr", None));
        assert_eq!(glyphs(&view), vec!["🍕"]);
    }

    #[test]
    fn test_category_is_exact() {
        let data = sample();
        let view = apply(&data, &FilterQuery::new("", Some("smileys".to_string())));
        assert!(view.is_empty());

        let view = apply(&data, &FilterQuery::new("", Some("flags".to_string())));
        assert_eq!(glyphs(&view), vec!["🏁"]);
    }

    #[test]
    fn test_text_and_category_combined() {
        let data = sample();
        let query = FilterQuery::new("face", Some("smileys-emotion".to_string()));
        assert_eq!(glyphs(&apply(&data, &query)), vec!["😀", "😺"]);

        let query = FilterQuery::new("dog", Some("smileys-emotion".to_string()));
        assert!(apply(&data, &query).is_empty());
    }

    #[test]
    fn test_empty_category_string_is_no_constraint() {
        let data = sample();
        let view = apply(&data, &FilterQuery::new("", Some(String::new())));
        assert_eq!(view.len(), data.len());
    }

    #[test]
    fn test_no_match() {
        let data = sample();
        assert!(apply(&data, &FilterQuery::new("zzzz", None)).is_empty());
    }

    fn arb_record() -> impl Strategy<Value = Arc<EmojiRecord>> {
        (
            "[a-z]{1,3}",
            "[a-c]{1,4}( [a-c]{1,4}){0,2}",
            prop::sample::select(vec!["Smileys & Emotion", "Flags", "Objects", "Extra Bits"]),
            "[a-c]{1,3}-[a-c]{1,3}",
        )
            .prop_map(|(glyph, name, category, sub)| record(&glyph, &name, category, &sub))
    }

    fn arb_query() -> impl Strategy<Value = FilterQuery> {
        (
            "[a-cA-C ]{0,3}",
            prop::option::of(prop::sample::select(vec![
                "smileys-emotion".to_string(),
                "flags".to_string(),
                "extra-bits".to_string(),
                String::new(),
            ])),
        )
            .prop_map(|(text, category)| FilterQuery { text, category })
    }

    proptest! {
        #[test]
        fn prop_unconstrained_is_identity(data in prop::collection::vec(arb_record(), 0..40)) {
            let view = apply(&data, &FilterQuery::new("   ", None));
            prop_assert_eq!(view.into_inner(), data);
        }

        #[test]
        fn prop_sound_and_order_preserving(
            data in prop::collection::vec(arb_record(), 0..40),
            query in arb_query(),
        ) {
            let view = apply(&data, &query);
            prop_assert!(view.iter().all(|r| query.matches(r)));

            // Subsequence of data, and every matching record is present
            let expected: Vec<_> = data.iter().filter(|r| query.matches(r)).cloned().collect();
            prop_assert_eq!(view.len(), expected.len());
            prop_assert!(view.iter().zip(&expected).all(|(a, b)| Arc::ptr_eq(a, b)));
        }

        #[test]
        fn prop_deterministic(
            data in prop::collection::vec(arb_record(), 0..40),
            query in arb_query(),
        ) {
            let first = apply(&data, &query);
            let second = apply(&data, &query);
            prop_assert_eq!(&first, &second);
            // Filtering the result again changes nothing
            let again = apply(&first, &query);
            prop_assert_eq!(first, again);
        }
    }
}

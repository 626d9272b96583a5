use std::collections::BTreeSet;

use super::keywords::generate_keywords;
use super::loader::DEFAULT_UNICODE_VERSION;
use super::types::{Dataset, DatasetOrigin, EmojiRecord};

const FALLBACK_CATEGORY_LABEL: &str = "Smileys & Emotion";
const FALLBACK_CATEGORY: &str = "smileys-emotion";

/// glyph, name, extra search hints
const FALLBACK_EMOJIS: [(&str, &str, &[&str]); 10] = [
    ("😀", "grinning face", &["happy", "smile", "grin"]),
    ("😃", "grinning face with big eyes", &["happy", "smile", "grin"]),
    ("😄", "grinning face with smiling eyes", &["happy", "smile", "grin"]),
    ("😁", "beaming face with smiling eyes", &["happy", "smile", "grin"]),
    ("😅", "grinning face with sweat", &["happy", "sweat", "laugh"]),
    ("😂", "face with tears of joy", &["laugh", "cry", "funny"]),
    ("🤣", "rolling on the floor laughing", &["laugh", "funny", "rofl"]),
    ("😊", "smiling face with smiling eyes", &["smile", "happy"]),
    ("😍", "smiling face with heart-eyes", &["love", "heart", "smile"]),
    ("🥰", "smiling face with hearts", &["love", "heart", "smile"]),
];

/// Small built-in dataset substituted when the real one cannot be loaded.
pub fn fallback_dataset() -> Dataset {
    let records = FALLBACK_EMOJIS
        .iter()
        .map(|(glyph, name, hints)| {
            let mut keywords: BTreeSet<String> =
                generate_keywords(name, FALLBACK_CATEGORY_LABEL, "");
            keywords.extend(hints.iter().map(|h| h.to_string()));

            EmojiRecord {
                glyph: glyph.to_string(),
                name: name.to_string(),
                category: FALLBACK_CATEGORY.to_string(),
                keywords,
                unicode_version: DEFAULT_UNICODE_VERSION.to_string(),
            }
        })
        .collect();

    Dataset::new(DEFAULT_UNICODE_VERSION, DatasetOrigin::Fallback, records)
}

//! Keyword derivation for search.
use std::collections::BTreeSet;

fn is_word_separator(c: char) -> bool {
    c.is_whitespace() || c == '-'
}

/// Category labels additionally split on `&` ("Smileys & Emotion").
fn is_category_separator(c: char) -> bool {
    is_word_separator(c) || c == '&'
}

fn tokens(text: &str, separator: fn(char) -> bool) -> impl Iterator<Item = String> + '_ {
    text.split(separator)
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

/// Derive the searchable keyword set for an emoji.
///
/// `name` and `subcategory` split on runs of whitespace or `-`; `category`
/// also splits on `&`. Tokens are lowercased, empty tokens are dropped and
/// duplicates collapse. Empty inputs contribute nothing.
///
/// ```
/// use emoji_picker::dataset::generate_keywords;
///
/// let kw = generate_keywords("Grinning Face", "Smileys & Emotion", "face-smiling");
/// assert!(kw.contains("grinning") && kw.contains("smiling") && kw.contains("emotion"));
/// ```
pub fn generate_keywords(name: &str, category: &str, subcategory: &str) -> BTreeSet<String> {
    tokens(name, is_word_separator)
        .chain(tokens(category, is_category_separator))
        .chain(tokens(subcategory, is_word_separator))
        .collect()
}

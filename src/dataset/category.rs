//! Category label normalization.
//!
//! Source documents label categories with human strings ("Smileys & Emotion").
//! Records carry a slug instead: one of the nine known slugs below, or a slug
//! derived mechanically from an unrecognized label.

/// Known category labels and their slugs, in display order.
pub const KNOWN_CATEGORIES: [(&str, &str); 9] = [
    ("Smileys & Emotion", "smileys-emotion"),
    ("People & Body", "people-body"),
    ("Animals & Nature", "animals-nature"),
    ("Food & Drink", "food-drink"),
    ("Travel & Places", "travel-places"),
    ("Activities", "activities"),
    ("Objects", "objects"),
    ("Symbols", "symbols"),
    ("Flags", "flags"),
];

/// Map a category label to its slug.
///
/// Known labels use the fixed table. Anything else is lowercased, runs of
/// whitespace become a single `-`, and characters outside `[a-z0-9-]` are
/// dropped.
///
/// ```
/// use emoji_picker::dataset::category_slug;
///
/// assert_eq!(category_slug("Food & Drink"), "food-drink");
/// assert_eq!(category_slug("Component  Parts!"), "component-parts");
/// ```
pub fn category_slug(label: &str) -> String {
    if let Some((_, slug)) = KNOWN_CATEGORIES.iter().find(|(known, _)| *known == label) {
        return (*slug).to_string();
    }
    derive_slug(label)
}

fn derive_slug(label: &str) -> String {
    let lower = label.to_lowercase();
    let mut slug = String::with_capacity(lower.len());
    let mut in_whitespace = false;

    for c in lower.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            slug.push(c);
        }
    }

    slug
}

/// Iterate the known slugs in display order.
pub fn known_slugs() -> impl Iterator<Item = &'static str> {
    KNOWN_CATEGORIES.iter().map(|(_, slug)| *slug)
}

/// Human-readable form of a slug: hyphens become spaces and the first
/// letter of every word is uppercased (`smileys-emotion` → `Smileys Emotion`).
pub fn display_category(slug: &str) -> String {
    let mut out = String::with_capacity(slug.len());
    let mut prev_is_word = false;

    for c in slug.chars() {
        let c = if c == '-' { ' ' } else { c };
        let is_word = c.is_ascii_alphanumeric() || c == '_';
        if is_word && !prev_is_word {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
        prev_is_word = is_word;
    }

    out
}

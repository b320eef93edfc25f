//! Presentation helpers for search matches.

use crate::search::Match;

/// Converts matched text with embedded markup (e.g. `<em>`) to plain text
pub fn strip_markup(text: &str) -> String {
    nanohtml2text::html2text(text).trim().to_string()
}

/// Text shown to the operator for a single match
///
/// Uses the matched text, falling back to the item title when the service
/// sent no match info. With `plain` set, markup is stripped first.
pub fn display_match(candidate: &Match, plain: bool) -> String {
    let text = if candidate.text.is_empty() {
        candidate.item_title.as_deref().unwrap_or_default()
    } else {
        candidate.text.as_str()
    };

    let text = if plain {
        strip_markup(text)
    } else {
        text.to_string()
    };

    match &candidate.field_name {
        Some(field) => format!("{text} [{field}]"),
        None => text,
    }
}

//! Keyword matching over free text.

/// Whether lowercased `text` mentions lowercased `term`.
///
/// Terms containing non-ASCII characters (CJK) match as substrings, since
/// those scripts have no word separators. ASCII terms must sit on word
/// boundaries, so "ui" does not match "quite". A trailing plural "s" or "es"
/// is accepted ("cards" matches "card").
pub fn mentions(text: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    if !term.is_ascii() {
        return text.contains(term);
    }

    text.match_indices(term).any(|(start, _)| {
        let before = text[..start].chars().next_back();
        let after = &text[start + term.len()..];
        !before.is_some_and(char::is_alphanumeric) && ends_word(after)
    })
}

fn ends_word(rest: &str) -> bool {
    let rest = rest
        .strip_prefix("es")
        .filter(|r| at_boundary(r))
        .or_else(|| rest.strip_prefix('s'))
        .unwrap_or(rest);
    at_boundary(rest)
}

fn at_boundary(rest: &str) -> bool {
    !rest.chars().next().is_some_and(char::is_alphanumeric)
}

//! Name normalization and tokenization shared by the scorer and the
//! pattern detector.

use regex::Regex;
use std::sync::LazyLock;

/// Runs of anything that is not a letter or digit.
static SEPARATOR_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}]+").expect("Invalid separator regex"));

/// Lowercase, collapse separators to single spaces, trim, and singularize
/// each word.
///
/// `"Drum__Loops"` and `"drum-loop"` both normalize to `"drum loop"`.
pub fn normalize(name: &str) -> String {
    let lowered = name.to_lowercase();
    let spaced = SEPARATOR_RUN.replace_all(&lowered, " ");

    spaced
        .split_whitespace()
        .map(singularize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a raw folder name into deduplicated, singular, lowercase tokens.
///
/// Splits on separators and on camelCase / letter-digit boundaries, so
/// `"DeepHouseKicks_808"` becomes `["deep", "house", "kick", "808"]`.
pub fn tokenize(name: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();

    for word in SEPARATOR_RUN.split(name) {
        for piece in split_case_boundaries(word) {
            let token = singularize(&piece.to_lowercase());
            if !token.is_empty() && !tokens.contains(&token) {
                tokens.push(token);
            }
        }
    }

    tokens
}

/// Split `word` at lower→upper, letter↔digit, and `ABc` acronym boundaries.
fn split_case_boundaries(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut pieces = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if let Some(&prev) = i.checked_sub(1).and_then(|p| chars.get(p)) {
            let next = chars.get(i + 1).copied();
            let boundary = (prev.is_lowercase() && c.is_uppercase())
                || (prev.is_alphabetic() && c.is_numeric())
                || (prev.is_numeric() && c.is_alphabetic())
                || (prev.is_uppercase()
                    && c.is_uppercase()
                    && next.is_some_and(|n| n.is_lowercase()));

            if boundary && !current.is_empty() {
                pieces.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }

    if !current.is_empty() {
        pieces.push(current);
    }

    pieces
}

/// Strip simple English plurals from a lowercase word.
pub fn singularize(word: &str) -> String {
    let len = word.chars().count();
    if len <= 3 || !word.ends_with('s') {
        return word.to_string();
    }

    if let Some(stem) = word.strip_suffix("ies")
        && len > 4
    {
        return format!("{}y", stem);
    }

    for suffix in ["sses", "xes", "ches", "shes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }

    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return word.to_string();
    }

    word[..word.len() - 1].to_string()
}

/// Lowercase with every separator removed (`"Drum_Loops"` -> `"drumloops"`).
pub fn strip_separators(name: &str) -> String {
    SEPARATOR_RUN.replace_all(&name.to_lowercase(), "").to_string()
}

/// Lowercase, singularizing each word but keeping the original separators.
pub fn singularize_words(name: &str) -> String {
    let lowered = name.to_lowercase();
    let mut result = String::with_capacity(lowered.len());
    let mut last = 0;

    for m in SEPARATOR_RUN.find_iter(&lowered) {
        result.push_str(&singularize(&lowered[last..m.start()]));
        result.push_str(m.as_str());
        last = m.end();
    }
    result.push_str(&singularize(&lowered[last..]));

    result
}

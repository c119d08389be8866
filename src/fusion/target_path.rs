//! Deterministic target paths for fusion groups.

use crate::model::GroupClassification;

/// Placeholder for segments that sanitize to nothing.
pub const UNNAMED_SEGMENT: &str = "Unnamed";

/// Make one path segment safe for every common filesystem.
///
/// Illegal characters (`<>:"/\|?*` and control characters) and whitespace
/// runs become `_`, repeated `_` collapse, and leading or trailing `_`, `.`
/// and `-` are trimmed. The result is never empty and sanitizing it again
/// returns it unchanged.
///
/// ```
/// use packfuse::fusion::sanitize_segment;
///
/// assert_eq!(sanitize_segment("Bass Music"), "Bass_Music");
/// assert_eq!(sanitize_segment(" ..?? "), "Unnamed");
/// ```
pub fn sanitize_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());

    for c in segment.chars() {
        let replaced = if c.is_control()
            || c.is_whitespace()
            || matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*')
        {
            '_'
        } else {
            c
        };

        if replaced == '_' && out.ends_with('_') {
            continue;
        }
        out.push(replaced);
    }

    let trimmed = out.trim_matches(|c| matches!(c, '_' | '.' | '-'));
    if trimmed.is_empty() {
        UNNAMED_SEGMENT.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Logical target of a fusion group below the library root.
///
/// Full form is `/Family/Type/Style[/Format]/Canonical[/Variant]`, short form
/// is `/Family/Type/Canonical`. The result depends only on its arguments.
pub fn generate_target_path(
    canonical: &str,
    classification: &GroupClassification,
    use_full_path: bool,
) -> String {
    let mut segments: Vec<&str> = vec![
        classification.family.as_str(),
        classification.type_name.as_str(),
    ];

    if use_full_path {
        segments.push(&classification.style);
        if let Some(format) = classification.format.as_deref() {
            segments.push(format);
        }
        segments.push(canonical);
        if let Some(variant) = classification.variant.as_deref() {
            segments.push(variant);
        }
    } else {
        segments.push(canonical);
    }

    segments
        .into_iter()
        .map(|s| format!("/{}", sanitize_segment(s)))
        .collect()
}

//! Naming-variant detection used to seed clusters.

use super::normalize::{singularize_words, strip_separators};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("Invalid digit regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// `"Kick"` / `"Kicks"`.
    Plural,
    /// `"Drum Loops"` / `"Drum_Loops"` / `"DrumLoops"`.
    Separator,
    /// `"Kit 1"` / `"Kit 2"` -> `"Kit #"`.
    Numbered,
}

/// A set of folder names that are variants of one pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamePattern {
    pub pattern: String,
    pub kind: PatternKind,
    /// Distinct input names, in input order.
    pub members: Vec<String>,
}

/// Group folder names by plural, separator and digit-substitution variants.
///
/// A name may appear under several kinds. Only groups with at least two
/// genuinely different spellings are reported; output is ordered by kind,
/// then by pattern key.
pub fn detect_common_patterns<S: AsRef<str>>(names: &[S]) -> Vec<NamePattern> {
    let mut distinct: Vec<&str> = Vec::new();
    for name in names {
        let name = name.as_ref();
        if !name.trim().is_empty() && !distinct.contains(&name) {
            distinct.push(name);
        }
    }

    let mut patterns = Vec::new();
    patterns.extend(group_by(&distinct, PatternKind::Plural, |n| {
        Some(singularize_words(n))
    }));
    patterns.extend(group_by(&distinct, PatternKind::Separator, |n| {
        let key = strip_separators(n);
        (!key.is_empty()).then_some(key)
    }));
    patterns.extend(group_by(&distinct, PatternKind::Numbered, |n| {
        DIGIT_RUN
            .is_match(n)
            .then(|| DIGIT_RUN.replace_all(&n.to_lowercase(), "#").to_string())
    }));

    patterns
}

fn group_by<F>(names: &[&str], kind: PatternKind, key_of: F) -> Vec<NamePattern>
where
    F: Fn(&str) -> Option<String>,
{
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for name in names {
        if let Some(key) = key_of(name) {
            groups.entry(key).or_default().push(name.to_string());
        }
    }

    groups
        .into_iter()
        .filter(|(_, members)| distinct_spellings(members) >= 2)
        .map(|(key, members)| {
            let pattern = match kind {
                PatternKind::Numbered => DIGIT_RUN.replace_all(&members[0], "#").to_string(),
                PatternKind::Plural | PatternKind::Separator => key,
            };
            NamePattern {
                pattern,
                kind,
                members,
            }
        })
        .collect()
}

/// Case-insensitive count of different spellings.
fn distinct_spellings(members: &[String]) -> usize {
    let mut seen: Vec<String> = members.iter().map(|m| m.to_lowercase()).collect();
    seen.sort();
    seen.dedup();
    seen.len()
}

//! Keyword tables for lexical type, format and variant detection.
//!
//! Patterns match against `similarity::normalize` output, which is lowercase,
//! space-separated and singular, so `"Kicks"` is matched by `kick`.

use crate::similarity::normalize;
use regex::Regex;
use std::sync::LazyLock;

type Table = Vec<(&'static str, Regex)>;

fn compile(entries: &[(&'static str, &str)]) -> Table {
    entries
        .iter()
        .map(|(label, pattern)| {
            let regex = Regex::new(&format!(r"\b(?:{})\b", pattern))
                .expect("Invalid keyword table regex");
            (*label, regex)
        })
        .collect()
}

/// Content types, most specific first.
static TYPE_TABLE: LazyLock<Table> = LazyLock::new(|| {
    compile(&[
        ("KICK", r"kick|kik|bd|bassdrum|bass drum"),
        ("SNARE", r"snare|snr|rim|rimshot"),
        ("HIHAT", r"hihat|hi hat|hat|hh"),
        ("CLAP", r"clap|snap"),
        ("CYMBAL", r"cymbal|crash|ride"),
        ("PERC", r"perc|percussion|shaker|tom|conga|bongo|tambourine"),
        ("VOCAL", r"vocal|vox|acapella|acappella|chant"),
        ("FX", r"fx|sfx|riser|impact|sweep|transition|downlifter|uplifter|foley"),
        ("BASS", r"bass|sub|808|reese"),
        ("SYNTH", r"synth|lead|pad|pluck|arp|chord|stab"),
        ("KEYS", r"key|piano|rhode|organ"),
        ("GUITAR", r"guitar|gtr"),
        ("DRUMS", r"drum|break|beat|top|groove|fill"),
    ])
});

static FORMAT_TABLE: LazyLock<Table> = LazyLock::new(|| {
    compile(&[
        ("MIDI", r"midi|mid"),
        ("Preset", r"preset|patch|fxp|fxb|serum|vital|sylenth|massive"),
        ("Stem", r"stem|multitrack|multi track"),
        ("Loop", r"loop"),
        ("OneShot", r"one shot|oneshot|hit|single|shot"),
    ])
});

static VARIANT_TABLE: LazyLock<Table> = LazyLock::new(|| {
    compile(&[
        ("Clean", r"clean"),
        ("Dirty", r"dirty"),
        ("Wet", r"wet"),
        ("Dry", r"dry"),
        ("Hard", r"hard"),
        ("Soft", r"soft"),
        ("Processed", r"processed"),
        ("Raw", r"raw"),
        ("Distorted", r"distorted|distortion"),
    ])
});

fn first_match(table: &Table, text: &str) -> Option<&'static str> {
    let normalized = normalize(text);
    table
        .iter()
        .find(|(_, regex)| regex.is_match(&normalized))
        .map(|(label, _)| *label)
}

/// Content type named in a folder path or name, if any.
pub fn detect_type(text: &str) -> Option<&'static str> {
    first_match(&TYPE_TABLE, text)
}

/// Sample format (`MIDI`, `Preset`, `Stem`, `Loop`, `OneShot`).
pub fn detect_format(text: &str) -> Option<&'static str> {
    first_match(&FORMAT_TABLE, text)
}

/// Processing variant (`Clean`, `Dirty`, `Wet`, `Dry`, ...).
pub fn detect_variant(text: &str) -> Option<&'static str> {
    first_match(&VARIANT_TABLE, text)
}

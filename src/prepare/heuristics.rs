//! Keyword heuristics used to annotate dream reports.
//!
//! All matching is plain substring search on the cleaned, lowercased text,
//! so `"run"` also fires on `"running"` and `"fly"` on `"butterfly"`. The
//! dream table was built with these exact rules; changing them shifts every
//! stored mood coordinate.

use regex::Regex;
use std::sync::OnceLock;

use crate::types::{DreamRecord, TagField};

const POSITIVE_WORDS: &[&str] = &[
    "happy", "joy", "love", "beautiful", "wonderful", "amazing", "peaceful", "calm", "good",
    "great",
];
const NEGATIVE_WORDS: &[&str] = &[
    "scared", "afraid", "sad", "angry", "terrible", "horrible", "dark", "evil", "bad", "wrong",
];
const HIGH_AROUSAL_WORDS: &[&str] = &[
    "running", "screaming", "fighting", "flying", "racing", "excited", "panic", "intense",
];
const LOW_AROUSAL_WORDS: &[&str] = &[
    "sleeping", "quiet", "still", "calm", "slow", "peaceful", "gentle", "soft", "relaxed",
];

/// (tag, trigger keywords). Every matching rule adds its tag, in order.
type Rules = &'static [(&'static str, &'static [&'static str])];

const EMOTION_RULES: Rules = &[
    ("fear", &["afraid", "scared", "terror"]),
    ("happy", &["happy", "joy", "excited"]),
    ("sad", &["sad", "crying"]),
];
const SETTING_RULES: Rules = &[
    ("home", &["house", "home", "room"]),
    ("school", &["school", "class"]),
    ("city", &["city", "street"]),
];
const THEME_RULES: Rules = &[
    ("chase", &["chase", "run", "escape"]),
    ("flying", &["fly", "flying"]),
];

fn disallowed_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s\.,!\?:;]").expect("static pattern"))
}

fn whitespace_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static pattern"))
}

/// Replace everything except word chars, whitespace and `. , ! ? : ;` with
/// a space, collapse whitespace, trim and lowercase.
pub fn clean_dream_text(text: &str) -> String {
    let stripped = disallowed_chars().replace_all(text, " ");
    let collapsed = whitespace_runs().replace_all(&stripped, " ");
    collapsed.trim().to_lowercase()
}

fn count_present(text: &str, words: &[&str]) -> usize {
    words.iter().filter(|w| text.contains(*w)).count()
}

#[allow(clippy::cast_precision_loss)]
fn balance(up: usize, down: usize) -> f64 {
    let total = up + down;
    if total == 0 {
        0.0
    } else {
        (up as f64 - down as f64) / total as f64
    }
}

/// Keyword-balance mood estimate, each axis in [-1, 1].
///
/// Returns `(valence, arousal)`. Each keyword counts at most once however
/// often it appears.
pub fn analyze_dream_mood(text: &str) -> (f64, f64) {
    let valence = balance(
        count_present(text, POSITIVE_WORDS),
        count_present(text, NEGATIVE_WORDS),
    );
    let arousal = balance(
        count_present(text, HIGH_AROUSAL_WORDS),
        count_present(text, LOW_AROUSAL_WORDS),
    );
    (valence, arousal)
}

fn classify(text: &str, rules: Rules, default: &str) -> Vec<String> {
    let mut tags: Vec<String> = rules
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(tag, _)| (*tag).to_string())
        .collect();
    if tags.is_empty() {
        tags.push(default.to_string());
    }
    tags
}

/// Tag a cleaned report with emotions, settings and themes.
///
/// The returned record has only its tag columns filled; characters,
/// objects, activities and colors stay empty.
pub fn extract_dream_elements(text: &str) -> DreamRecord {
    let mut record = DreamRecord::default();
    *record.tags_mut(TagField::Emotions) = classify(text, EMOTION_RULES, "neutral");
    *record.tags_mut(TagField::Settings) = classify(text, SETTING_RULES, "unknown");
    *record.tags_mut(TagField::Themes) = classify(text, THEME_RULES, "everyday");
    record
}

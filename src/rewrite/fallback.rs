//! Local Fallback Transform
//!
//! Deterministic cleanup used whenever the remote rewrite is unavailable.
//! Any input, even blank, yields non-empty text ending in terminal
//! punctuation.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::tone::Tone;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref SPACE_BEFORE_PUNCT: Regex = Regex::new(r"\s+([,.!?;:])").unwrap();
    static ref MISSING_SPACE: Regex = Regex::new(r"([,;])([A-Za-z])").unwrap();
    static ref SENTENCE_START: Regex = Regex::new(r"(^|[.!?]\s+)([a-z])").unwrap();
    static ref FILLER: Regex =
        Regex::new(r"(?i)\b(just|really|very|actually|basically|kind of|sort of)\b").unwrap();
    static ref TERMINAL: Regex = Regex::new(r#"[.!?]"?$"#).unwrap();
}

/// Clean up `text` for `tone` without any remote help
pub fn polish(text: &str, tone: Tone) -> String {
    let mut out = tidy(text);
    if tone == Tone::Concise {
        out = tidy(&FILLER.replace_all(&out, ""));
    }
    if !TERMINAL.is_match(&out) {
        out.push('.');
    }
    out
}

/// Whitespace, punctuation spacing and sentence capitals
fn tidy(text: &str) -> String {
    let collapsed = WHITESPACE.replace_all(text.trim(), " ");
    let attached = SPACE_BEFORE_PUNCT.replace_all(&collapsed, "$1");
    let spaced = MISSING_SPACE.replace_all(&attached, "$1 $2");
    SENTENCE_START
        .replace_all(&spaced, |caps: &Captures| {
            format!("{}{}", &caps[1], caps[2].to_uppercase())
        })
        .trim()
        .to_string()
}

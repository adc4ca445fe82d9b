//! Selection Capture & Replacement
//!
//! Capture turns the user's current selection into a serializable
//! [`SelectionDescriptor`], tagging the page so the selection can be found
//! again after the rewrite. Replacement consumes that descriptor, splices
//! in the new text and removes every tag capture left behind.

pub mod capture;
pub mod replace;

pub use capture::capture;
pub use replace::{abandon, replace};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Attribute holding a field's correlation token
pub const TOKEN_ATTRIBUTE: &str = "data-typewell-marker";

/// `input` types treated as single-line text fields
pub const TEXT_INPUT_TYPES: [&str; 5] = ["text", "search", "email", "url", "tel"];

const TOKEN_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const TOKEN_LENGTH: usize = 11;

/// What capture found, in a form that can cross the page boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionDescriptor {
    /// No usable selection
    None,
    /// Char range inside a text field tagged with `token`
    Field {
        token: String,
        start: usize,
        end: usize,
        text: String,
    },
    /// Range in page content delimited by two hidden marker spans
    Content {
        start_marker: String,
        end_marker: String,
        text: String,
    },
}

impl SelectionDescriptor {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Field { text, .. } | Self::Content { text, .. } => Some(text),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// `prefix` followed by random base-36 chars
pub(crate) fn random_id(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..TOKEN_LENGTH)
        .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
        .collect();
    format!("{prefix}{suffix}")
}

/// Chars `[start, end)` of `text`
pub(crate) fn char_slice(text: &str, start: usize, end: usize) -> String {
    text.chars()
        .skip(start)
        .take(end.saturating_sub(start))
        .collect()
}

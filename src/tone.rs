//! Rewrite Tones
//!
//! The fixed set of styles offered in the context menu and popup.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypewellError;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Friendly,
    Concise,
    /// Grammar fixes only
    Fix,
}

impl Tone {
    /// Menu order
    pub const ALL: [Tone; 4] = [Tone::Professional, Tone::Friendly, Tone::Concise, Tone::Fix];

    /// Identifier used in prompts and on the command line
    pub fn id(&self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Friendly => "friendly",
            Tone::Concise => "concise",
            Tone::Fix => "fix",
        }
    }

    /// Menu entry title
    pub fn title(&self) -> &'static str {
        match self {
            Tone::Professional => "Professional",
            Tone::Friendly => "Friendly",
            Tone::Concise => "Concise",
            Tone::Fix => "Fix Grammar",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Tone {
    type Err = TypewellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Tone::ALL
            .into_iter()
            .find(|tone| tone.id() == wanted)
            .ok_or_else(|| TypewellError::UnknownTone(s.to_string()))
    }
}

//! Typewell Library
//!
//! Polishes the user's selected text: capture the selection from a page
//! snapshot, rewrite it remotely (or with the local fallback), and put the
//! result back in place.

pub mod config;
pub mod error;
pub mod host;
pub mod notice;
pub mod page;
pub mod polish;
pub mod rewrite;
pub mod selection;
pub mod store;
pub mod tone;

pub use error::{TypewellError, TypewellResult};
pub use host::{PageHost, Tab};
pub use polish::{Outcome, Polisher};
pub use selection::SelectionDescriptor;
pub use tone::Tone;

//! User Notices
//!
//! Short status messages shown while a polish runs. They are purely
//! presentational; the flow never depends on how they are displayed.

use std::fmt;
use tracing::{info, warn};

use crate::rewrite::FallbackReason;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Contacting,
    MissingKey,
    RemoteOk,
    RemoteStatus(u16),
    RemoteEmpty,
    RemoteMalformed,
    NetworkError,
    CannotAccessPage,
    SelectTextFirst,
    Polished,
    SomethingWentWrong,
}

impl Notice {
    /// Notice explaining why the fallback was used
    pub fn for_fallback(reason: FallbackReason) -> Self {
        match reason {
            FallbackReason::MissingKey => Notice::MissingKey,
            FallbackReason::Status(status) => Notice::RemoteStatus(status),
            FallbackReason::Empty => Notice::RemoteEmpty,
            FallbackReason::Malformed => Notice::RemoteMalformed,
            FallbackReason::Network => Notice::NetworkError,
        }
    }

    pub fn is_problem(&self) -> bool {
        !matches!(
            self,
            Notice::Contacting | Notice::RemoteOk | Notice::Polished
        )
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Contacting => write!(f, "Typewell: contacting Hugging Face…"),
            Notice::MissingKey => write!(f, "Typewell: add your Hugging Face key in the popup."),
            Notice::RemoteOk => write!(f, "Typewell: HF ✓"),
            Notice::RemoteStatus(status) => write!(f, "Typewell: HF {status} — using fallback."),
            Notice::RemoteEmpty => write!(f, "Typewell: HF empty — using fallback."),
            Notice::RemoteMalformed => write!(f, "Typewell: HF unreadable — using fallback."),
            Notice::NetworkError => write!(f, "Typewell: network error — using fallback."),
            Notice::CannotAccessPage => write!(f, "Typewell: can’t access this page."),
            Notice::SelectTextFirst => write!(f, "Typewell: select some text first."),
            Notice::Polished => write!(f, "Typewell: Polished ✓"),
            Notice::SomethingWentWrong => write!(f, "Typewell: something went wrong."),
        }
    }
}

/// Shows notices to the user
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

/// Writes notices to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: &Notice) {
        if notice.is_problem() {
            warn!("{}", notice);
        } else {
            info!("{}", notice);
        }
    }
}

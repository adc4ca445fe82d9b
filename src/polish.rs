//! Polish Flow
//!
//! Capture → rewrite → replace for one user action, with the busy,
//! success and error notices around it. Each invocation is independent.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::TypewellResult;
use crate::host::PageHost;
use crate::notice::{Notice, Notifier};
use crate::rewrite::{RewriteSource, Rewriter, ToneRequest};
use crate::selection::{self, SelectionDescriptor};
use crate::tone::Tone;

/// How a polish invocation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Selection replaced with text from `source`
    Polished(RewriteSource),
    /// Nothing selected; page untouched
    NoSelection,
    /// The page refused script access; page untouched
    PageDenied,
    /// Unexpected failure
    Failed(String),
}

/// Runs the polish flow for a tone
#[derive(Clone)]
pub struct Polisher {
    rewriter: Rewriter,
    notifier: Arc<dyn Notifier>,
}

impl Polisher {
    pub fn new(rewriter: Rewriter, notifier: Arc<dyn Notifier>) -> Self {
        Self { rewriter, notifier }
    }

    /// Polish the current selection on `host` in `tone`
    pub async fn run<H: PageHost + ?Sized>(&self, host: &mut H, tone: Tone) -> Outcome {
        match self.try_run(host, tone).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Typewell error: {}", e);
                self.notifier.notify(&Notice::SomethingWentWrong);
                Outcome::Failed(e.to_string())
            }
        }
    }

    async fn try_run<H: PageHost + ?Sized>(&self, host: &mut H, tone: Tone) -> TypewellResult<Outcome> {
        self.notifier.notify(&Notice::Contacting);

        let descriptor = match host.page() {
            Ok(page) => selection::capture(page),
            Err(e) => {
                warn!("Capture failed: {}", e);
                self.notifier.notify(&Notice::CannotAccessPage);
                return Ok(Outcome::PageDenied);
            }
        };

        let text = match &descriptor {
            SelectionDescriptor::None => {
                self.notifier.notify(&Notice::SelectTextFirst);
                return Ok(Outcome::NoSelection);
            }
            SelectionDescriptor::Field { text, .. } | SelectionDescriptor::Content { text, .. } => {
                text.clone()
            }
        };

        let request = ToneRequest::new(text, tone);
        let rewrite = self.rewriter.rewrite(&request, self.notifier.as_ref()).await;

        let page = host.page()?;
        selection::replace(page, descriptor, &rewrite.text);

        info!("Polished selection in {} tone ({:?})", tone, rewrite.source);
        self.notifier.notify(&Notice::Polished);
        Ok(Outcome::Polished(rewrite.source))
    }
}

//! Rewrite Provider
//!
//! Turns source text plus a tone into rewritten text. The remote service is
//! tried first; anything short of a usable answer falls back to the local
//! transform, so a rewrite always produces text.

pub mod fallback;
pub mod remote;

pub use remote::{ChatClient, RemoteError};

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::notice::{Notice, Notifier};
use crate::store::{CredentialStore, API_KEY_NAME};
use crate::tone::Tone;

/// Text to rewrite and the style to rewrite it in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToneRequest {
    pub text: String,
    pub tone: Tone,
}

impl ToneRequest {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

/// Trait for remote rewrite backends
#[async_trait]
pub trait RewriteProvider: Send + Sync {
    /// Rewrite with the service, authenticated by `api_key`
    async fn complete(&self, api_key: &str, request: &ToneRequest) -> Result<String, RemoteError>;

    /// Get the provider name
    fn name(&self) -> &str;
}

/// Why the local transform was used instead of the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    MissingKey,
    Status(u16),
    Empty,
    Malformed,
    Network,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteSource {
    Remote,
    Fallback(FallbackReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    pub source: RewriteSource,
}

impl Rewrite {
    fn fallback(request: &ToneRequest, reason: FallbackReason) -> Self {
        Self {
            text: fallback::polish(&request.text, request.tone),
            source: RewriteSource::Fallback(reason),
        }
    }
}

/// Remote-first rewriter with the local transform as a safety net
#[derive(Clone)]
pub struct Rewriter {
    provider: Arc<dyn RewriteProvider>,
    store: Arc<dyn CredentialStore>,
}

impl Rewriter {
    pub fn new(provider: Arc<dyn RewriteProvider>, store: Arc<dyn CredentialStore>) -> Self {
        Self { provider, store }
    }

    /// Rewrite `request`, telling the user which path was taken
    pub async fn rewrite(&self, request: &ToneRequest, notifier: &dyn Notifier) -> Rewrite {
        let api_key = match self.store.get(API_KEY_NAME) {
            Ok(Some(key)) => key,
            Ok(None) => return self.fall_back(request, FallbackReason::MissingKey, notifier),
            Err(e) => {
                warn!("Could not read API key: {}", e);
                return self.fall_back(request, FallbackReason::MissingKey, notifier);
            }
        };

        match self.provider.complete(&api_key, request).await {
            Ok(text) if !text.trim().is_empty() => {
                debug!("{} rewrote {} chars", self.provider.name(), request.text.len());
                notifier.notify(&Notice::RemoteOk);
                Rewrite {
                    text,
                    source: RewriteSource::Remote,
                }
            }
            Ok(_) => self.fall_back(request, FallbackReason::Empty, notifier),
            Err(e) => {
                warn!("{} failed: {}", self.provider.name(), e);
                self.fall_back(request, e.fallback_reason(), notifier)
            }
        }
    }

    fn fall_back(
        &self,
        request: &ToneRequest,
        reason: FallbackReason,
        notifier: &dyn Notifier,
    ) -> Rewrite {
        notifier.notify(&Notice::for_fallback(reason));
        Rewrite::fallback(request, reason)
    }
}

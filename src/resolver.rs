//! Reply resolution: remote completion with a local keyword fallback
//!
//! ```text
//! utterance + history
//!        │
//!        ▼
//!  credential? ──no──────────────┐
//!        │yes                    │
//!        ▼                       ▼
//!  remote completion ──err──► local classifier ──► category reply / default
//!        │ok
//!        ▼
//!  first choice content
//! ```

use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::classifier::LocalClassifier;
use crate::completion::{self, CompletionError, CompletionProvider, OpenAiCompletion};
use crate::config::Config;
use crate::conversation::Turn;
use crate::Result;

/// Where a reply came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplySource {
    /// Remote completion service
    Remote,
    /// Local classifier category
    Category(String),
    /// Local classifier default reply
    Default,
}

/// A resolved reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub source: ReplySource,
}

struct Remote {
    provider: Arc<dyn CompletionProvider>,
    system_prompt: String,
    timeout: Duration,
}

/// Produces one reply per caller utterance
///
/// Holds no per-call state; a single instance is shared across requests.
pub struct ReplyResolver {
    remote: Option<Remote>,
    classifier: LocalClassifier,
}

impl ReplyResolver {
    /// Resolver that only uses the local classifier
    #[must_use]
    pub const fn local(classifier: LocalClassifier) -> Self {
        Self {
            remote: None,
            classifier,
        }
    }

    /// Resolver that tries `provider` first, bounded by `timeout`
    #[must_use]
    pub fn with_remote(
        provider: Arc<dyn CompletionProvider>,
        system_prompt: impl Into<String>,
        timeout: Duration,
        classifier: LocalClassifier,
    ) -> Self {
        Self {
            remote: Some(Remote {
                provider,
                system_prompt: system_prompt.into(),
                timeout,
            }),
            classifier,
        }
    }

    /// Build a resolver from configuration
    ///
    /// The remote path is enabled only when a credential is configured.
    ///
    /// # Errors
    ///
    /// Returns error if the completion HTTP client cannot be built
    pub fn from_config(config: &Config) -> Result<Self> {
        let classifier = LocalClassifier::with_config(
            &config.classifier.rules,
            config.classifier.default_reply.as_deref(),
        );

        let Some(api_key) = &config.completion.api_key else {
            tracing::info!("no completion credential configured, using local classifier only");
            return Ok(Self::local(classifier));
        };

        let api_key = SecretString::from(api_key.expose_secret().to_string());
        let provider = OpenAiCompletion::new(api_key, &config.completion)?;
        tracing::info!(
            endpoint = provider.endpoint(),
            model = %config.completion.model,
            "remote completion enabled"
        );

        Ok(Self::with_remote(
            Arc::new(provider),
            config.completion.system_prompt.clone(),
            config.completion.timeout,
            classifier,
        ))
    }

    /// Whether a remote provider is configured
    #[must_use]
    pub const fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Resolve a reply for `utterance` given prior turns
    ///
    /// Always returns a non-empty string.
    pub async fn resolve(&self, utterance: &str, history: &[Turn]) -> String {
        self.resolve_reply(utterance, history).await.text
    }

    /// Resolve a reply, reporting its source
    pub async fn resolve_reply(&self, utterance: &str, history: &[Turn]) -> Reply {
        match self.complete_remote(utterance, history).await {
            Ok(text) => Reply {
                text,
                source: ReplySource::Remote,
            },
            Err(CompletionError::NotConfigured) => self.classify(utterance),
            Err(e) => {
                tracing::warn!(error = %e, "remote completion failed, using local classifier");
                self.classify(utterance)
            }
        }
    }

    /// Local classifier reply for `utterance`
    #[must_use]
    pub fn classify(&self, utterance: &str) -> Reply {
        let classification = self.classifier.classify(utterance);
        tracing::debug!(category = ?classification.category, "classified utterance");

        Reply {
            text: classification.reply.to_string(),
            source: classification
                .category
                .map_or(ReplySource::Default, |c| ReplySource::Category(c.to_string())),
        }
    }

    async fn complete_remote(
        &self,
        utterance: &str,
        history: &[Turn],
    ) -> std::result::Result<String, CompletionError> {
        let remote = self.remote.as_ref().ok_or(CompletionError::NotConfigured)?;
        let messages = completion::build_messages(&remote.system_prompt, history, utterance);

        tracing::debug!(
            provider = remote.provider.name(),
            turns = history.len(),
            "requesting remote completion"
        );

        let text = tokio::time::timeout(remote.timeout, remote.provider.complete(&messages))
            .await
            .map_err(|_| CompletionError::Timeout(remote.timeout))??;

        // Providers may return blank content; it must never reach the caller
        if text.trim().is_empty() {
            return Err(CompletionError::Malformed("empty completion".to_string()));
        }

        Ok(text)
    }
}

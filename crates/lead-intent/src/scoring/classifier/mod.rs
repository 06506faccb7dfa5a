//! Semantic intent classification.
//!
//! [`SemanticClassifier`] is the raw external call and may fail. [`FallbackClassifier`]
//! wraps it and always produces a [`ClassificationResult`], substituting the Medium
//! default whenever the service is unreachable or answers with something unusable.
//! The orchestrator talks to the [`IntentClassifier`] seam so tests can script verdicts
//! and failures per lead.

mod groq;
mod prompt;

pub use groq::ChatCompletionClassifier;
pub use prompt::ClassificationPrompt;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::config::ClassifierConfig;
use crate::scoring::domain::{ClassificationResult, Lead, Offer};

/// Classification step as seen by the orchestrator.
///
/// An `Err` is treated as a per-lead failure and produces a degraded record.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(
        &self,
        lead: &Lead,
        offer: &Offer,
    ) -> Result<ClassificationResult, ClassificationError>;
}

/// Verdict payload expected from the external service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClassifierVerdict {
    pub intent: String,
    #[serde(default)]
    pub reasoning: String,
}

/// Transport to an external semantic-classification service.
#[async_trait]
pub trait SemanticClassifier: Send + Sync {
    async fn request_verdict(
        &self,
        prompt: &ClassificationPrompt,
    ) -> Result<ClassifierVerdict, ClassificationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ClassificationError {
    #[error("classifier transport error: {0}")]
    Transport(String),
    #[error("classifier returned HTTP {status}: {body}")]
    Api { status: u16, body: String },
    #[error("invalid classifier response: {0}")]
    InvalidResponse(String),
    #[error("classifier misconfigured: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for ClassificationError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Best-effort classifier: never returns `Err`.
pub struct FallbackClassifier<S> {
    service: S,
}

impl<S> FallbackClassifier<S>
where
    S: SemanticClassifier,
{
    pub fn new(service: S) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<S> IntentClassifier for FallbackClassifier<S>
where
    S: SemanticClassifier,
{
    async fn classify(
        &self,
        lead: &Lead,
        offer: &Offer,
    ) -> Result<ClassificationResult, ClassificationError> {
        let prompt = ClassificationPrompt::build(lead, offer);
        match self.service.request_verdict(&prompt).await {
            Ok(verdict) => Ok(ClassificationResult::from_verdict(
                &verdict.intent,
                verdict.reasoning,
            )),
            Err(err) => {
                warn!(
                    lead = %lead.name,
                    error = %err,
                    "classifier unavailable, using default verdict"
                );
                Ok(ClassificationResult::fallback())
            }
        }
    }
}

/// Builds the production classifier, or `None` when no API key is configured.
pub fn classifier_from_config(
    config: &ClassifierConfig,
) -> Result<Option<Arc<dyn IntentClassifier>>, ClassificationError> {
    if config.api_key.is_none() {
        return Ok(None);
    }

    let transport = ChatCompletionClassifier::new(config)?;
    Ok(Some(Arc::new(FallbackClassifier::new(transport))))
}

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use super::classifier::IntentClassifier;
use super::domain::{Lead, Offer, ScoredLead};
use super::report::{BatchSummary, ScoringReport};
use super::rules::calculate_rule_score;

/// Batch-level preconditions. Violations are reported before any lead is scored.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("No offer data found. Please POST to /offer first.")]
    MissingOffer,
    #[error("No leads found. Please POST to /leads/upload first.")]
    MissingLeads,
    #[error("classifier API key not configured")]
    ClassifierNotConfigured,
}

/// Runs the rule scorer and the classifier for each lead and aggregates the batch.
///
/// With the default concurrency of 1 each lead completes before the next starts.
/// Higher limits overlap classifier calls but results keep input order.
#[derive(Clone)]
pub struct ScoringOrchestrator {
    classifier: Arc<dyn IntentClassifier>,
    max_concurrency: usize,
}

impl ScoringOrchestrator {
    pub fn new(classifier: Arc<dyn IntentClassifier>) -> Self {
        Self {
            classifier,
            max_concurrency: 1,
        }
    }

    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = limit.max(1);
        self
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    pub async fn run_batch(
        &self,
        leads: &[Lead],
        offer: &Offer,
    ) -> Result<ScoringReport, ScoringError> {
        if leads.is_empty() {
            return Err(ScoringError::MissingLeads);
        }

        let total = leads.len();
        info!(leads = total, concurrency = self.max_concurrency, "scoring batch");

        let results: Vec<ScoredLead> = if self.max_concurrency == 1 {
            let mut results = Vec::with_capacity(total);
            for (index, lead) in leads.iter().enumerate() {
                results.push(self.score_lead(index, total, lead, offer).await);
            }
            results
        } else {
            // futures are built eagerly so the stream holds no higher-ranked closure
            let pending: Vec<_> = leads
                .iter()
                .enumerate()
                .map(|(index, lead)| self.score_lead(index, total, lead, offer))
                .collect();
            stream::iter(pending)
                .buffered(self.max_concurrency)
                .collect()
                .await
        };

        let summary = BatchSummary::from_results(&results);
        info!(
            total = summary.total,
            high = summary.high,
            medium = summary.medium,
            low = summary.low,
            average_score = summary.average_score,
            "scoring complete"
        );

        Ok(ScoringReport { summary, results })
    }

    async fn score_lead(
        &self,
        index: usize,
        total: usize,
        lead: &Lead,
        offer: &Offer,
    ) -> ScoredLead {
        info!(position = index + 1, total, lead = %lead.name, "processing lead");

        let rules = calculate_rule_score(lead, offer);
        match self.classifier.classify(lead, offer).await {
            Ok(verdict) => ScoredLead::scored(lead, rules, verdict),
            Err(err) => {
                warn!(position = index + 1, lead = %lead.name, error = %err, "lead scoring failed");
                ScoredLead::degraded(lead, &err)
            }
        }
    }
}

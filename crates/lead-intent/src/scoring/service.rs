use std::io::Read;
use std::sync::Arc;

use tracing::info;

use super::classifier::IntentClassifier;
use super::domain::{Lead, Offer, OfferError, ScoredLead};
use super::ingest::{parse_leads, LeadImportError};
use super::orchestrator::{ScoringError, ScoringOrchestrator};
use super::report::{results_to_csv, ExportError, ScoringReport};
use super::repository::{SessionStore, StoreError};

/// Service composing the session store and the scoring orchestrator.
///
/// The orchestrator is absent when no classifier is configured; scoring then
/// fails with [`ScoringError::ClassifierNotConfigured`].
pub struct ScoringService<S> {
    store: Arc<S>,
    orchestrator: Option<ScoringOrchestrator>,
}

impl<S> ScoringService<S>
where
    S: SessionStore + 'static,
{
    pub fn new(store: Arc<S>, classifier: Option<Arc<dyn IntentClassifier>>) -> Self {
        Self {
            store,
            orchestrator: classifier.map(ScoringOrchestrator::new),
        }
    }

    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.orchestrator = self
            .orchestrator
            .map(|orchestrator| orchestrator.with_concurrency(limit));
        self
    }

    pub fn classifier_configured(&self) -> bool {
        self.orchestrator.is_some()
    }

    /// Validate and store the offer, replacing any previous one.
    pub fn set_offer(&self, offer: Offer) -> Result<Offer, ScoringServiceError> {
        offer.validate()?;
        self.store.replace_offer(offer.clone())?;
        info!(offer = %offer.name, use_cases = offer.ideal_use_cases.len(), "offer stored");
        Ok(offer)
    }

    pub fn offer(&self) -> Result<Option<Offer>, ScoringServiceError> {
        Ok(self.store.offer()?)
    }

    /// Parse a lead CSV and replace the current batch.
    pub fn import_leads<R: Read>(&self, reader: R) -> Result<Vec<Lead>, ScoringServiceError> {
        let leads = parse_leads(reader)?;
        self.store.replace_leads(leads.clone())?;
        info!(count = leads.len(), "leads stored");
        Ok(leads)
    }

    pub fn leads(&self) -> Result<Vec<Lead>, ScoringServiceError> {
        Ok(self.store.leads()?)
    }

    /// Score the current batch against the active offer and store the results.
    pub async fn score(&self) -> Result<ScoringReport, ScoringServiceError> {
        let offer = self.store.offer()?.ok_or(ScoringError::MissingOffer)?;
        let leads = self.store.leads()?;
        if leads.is_empty() {
            return Err(ScoringError::MissingLeads.into());
        }
        let orchestrator = self
            .orchestrator
            .as_ref()
            .ok_or(ScoringError::ClassifierNotConfigured)?;

        let report = orchestrator.run_batch(&leads, &offer).await?;
        self.store.replace_results(report.results.clone())?;
        Ok(report)
    }

    pub fn results(&self) -> Result<Vec<ScoredLead>, ScoringServiceError> {
        Ok(self.store.results()?)
    }

    /// CSV export of the stored results, or `None` when nothing has been scored.
    pub fn results_csv(&self) -> Result<Option<String>, ScoringServiceError> {
        let results = self.store.results()?;
        if results.is_empty() {
            return Ok(None);
        }
        Ok(Some(results_to_csv(&results)?))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScoringServiceError {
    #[error(transparent)]
    Precondition(#[from] ScoringError),
    #[error(transparent)]
    Offer(#[from] OfferError),
    #[error(transparent)]
    Import(#[from] LeadImportError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

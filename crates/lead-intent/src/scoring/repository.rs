use super::domain::{Lead, Offer, ScoredLead};

/// Holds the active offer, the current lead batch and the latest results.
///
/// Every setter replaces the previous value.
pub trait SessionStore: Send + Sync {
    fn offer(&self) -> Result<Option<Offer>, StoreError>;
    fn replace_offer(&self, offer: Offer) -> Result<(), StoreError>;
    fn leads(&self) -> Result<Vec<Lead>, StoreError>;
    fn replace_leads(&self, leads: Vec<Lead>) -> Result<(), StoreError>;
    fn results(&self) -> Result<Vec<ScoredLead>, StoreError>;
    fn replace_results(&self, results: Vec<ScoredLead>) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

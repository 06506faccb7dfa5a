use lead_intent::scoring::{Lead, Offer, ScoredLead, SessionStore, StoreError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) classifier_configured: bool,
}

#[derive(Default)]
struct Session {
    offer: Option<Offer>,
    leads: Vec<Lead>,
    results: Vec<ScoredLead>,
}

/// Process-local session: one offer, one lead batch and one result set at a time.
#[derive(Default, Clone)]
pub(crate) struct InMemorySessionStore {
    session: Arc<Mutex<Session>>,
}

impl SessionStore for InMemorySessionStore {
    fn offer(&self) -> Result<Option<Offer>, StoreError> {
        let guard = self.session.lock().expect("session mutex poisoned");
        Ok(guard.offer.clone())
    }

    fn replace_offer(&self, offer: Offer) -> Result<(), StoreError> {
        let mut guard = self.session.lock().expect("session mutex poisoned");
        guard.offer = Some(offer);
        Ok(())
    }

    fn leads(&self) -> Result<Vec<Lead>, StoreError> {
        let guard = self.session.lock().expect("session mutex poisoned");
        Ok(guard.leads.clone())
    }

    fn replace_leads(&self, leads: Vec<Lead>) -> Result<(), StoreError> {
        let mut guard = self.session.lock().expect("session mutex poisoned");
        guard.leads = leads;
        Ok(())
    }

    fn results(&self) -> Result<Vec<ScoredLead>, StoreError> {
        let guard = self.session.lock().expect("session mutex poisoned");
        Ok(guard.results.clone())
    }

    fn replace_results(&self, results: Vec<ScoredLead>) -> Result<(), StoreError> {
        let mut guard = self.session.lock().expect("session mutex poisoned");
        guard.results = results;
        Ok(())
    }
}

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::scoring::classifier::{ClassificationError, IntentClassifier};
use crate::scoring::domain::{ClassificationResult, Lead, Offer, ScoredLead};
use crate::scoring::repository::{SessionStore, StoreError};
use crate::scoring::service::ScoringService;

pub(super) fn offer() -> Offer {
    Offer {
        name: "AI Outreach Tool".to_string(),
        value_props: vec!["24/7 automation".to_string(), "More meetings".to_string()],
        ideal_use_cases: vec!["B2B SaaS".to_string()],
    }
}

pub(super) fn lead(name: &str, role: &str, industry: &str) -> Lead {
    Lead {
        name: name.to_string(),
        role: role.to_string(),
        company: "TechCorp".to_string(),
        industry: industry.to_string(),
        location: "NYC".to_string(),
        linkedin_bio: "Sales leader".to_string(),
    }
}

pub(super) const LEADS_CSV: &str = "name,role,company,industry,location,linkedin_bio\n\
Jane Smith,VP of Sales,TechCorp,SaaS,NYC,Sales leader\n\
Raj Mehta,Engineering Manager,Stackly,Software,Pune,Builds platforms\n\
Lena Ortiz,Intern,Corner Shop,Retail,Madrid,\n";

/// Classifier answering per lead name; unknown names get a Low verdict.
#[derive(Default)]
pub(super) struct ScriptedClassifier {
    verdicts: HashMap<String, Result<(String, String), String>>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl ScriptedClassifier {
    pub(super) fn verdict(mut self, name: &str, intent: &str, reasoning: &str) -> Self {
        self.verdicts.insert(
            name.to_string(),
            Ok((intent.to_string(), reasoning.to_string())),
        );
        self
    }

    pub(super) fn failure(mut self, name: &str, message: &str) -> Self {
        self.verdicts
            .insert(name.to_string(), Err(message.to_string()));
        self
    }

    pub(super) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    pub(super) fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IntentClassifier for ScriptedClassifier {
    async fn classify(
        &self,
        lead: &Lead,
        _offer: &Offer,
    ) -> Result<ClassificationResult, ClassificationError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push(lead.name.clone());

        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.verdicts.get(&lead.name) {
            Some(Ok((intent, reasoning))) => {
                Ok(ClassificationResult::from_verdict(intent, reasoning.clone()))
            }
            Some(Err(message)) => Err(ClassificationError::InvalidResponse(message.clone())),
            None => Ok(ClassificationResult::from_verdict("Low", "no script")),
        }
    }
}

#[derive(Default)]
pub(super) struct MemoryStore {
    offer: Mutex<Option<Offer>>,
    leads: Mutex<Vec<Lead>>,
    results: Mutex<Vec<ScoredLead>>,
}

impl SessionStore for MemoryStore {
    fn offer(&self) -> Result<Option<Offer>, StoreError> {
        Ok(self.offer.lock().expect("offer mutex poisoned").clone())
    }

    fn replace_offer(&self, offer: Offer) -> Result<(), StoreError> {
        *self.offer.lock().expect("offer mutex poisoned") = Some(offer);
        Ok(())
    }

    fn leads(&self) -> Result<Vec<Lead>, StoreError> {
        Ok(self.leads.lock().expect("leads mutex poisoned").clone())
    }

    fn replace_leads(&self, leads: Vec<Lead>) -> Result<(), StoreError> {
        *self.leads.lock().expect("leads mutex poisoned") = leads;
        Ok(())
    }

    fn results(&self) -> Result<Vec<ScoredLead>, StoreError> {
        Ok(self.results.lock().expect("results mutex poisoned").clone())
    }

    fn replace_results(&self, results: Vec<ScoredLead>) -> Result<(), StoreError> {
        *self.results.lock().expect("results mutex poisoned") = results;
        Ok(())
    }
}

pub(super) fn service_with(
    classifier: Option<Arc<ScriptedClassifier>>,
) -> (Arc<MemoryStore>, ScoringService<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let classifier = classifier.map(|classifier| classifier as Arc<dyn IntentClassifier>);
    let service = ScoringService::new(store.clone(), classifier);
    (store, service)
}

/// Store whose backend is always down.
pub(super) struct UnavailableStore;

impl SessionStore for UnavailableStore {
    fn offer(&self) -> Result<Option<Offer>, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    fn replace_offer(&self, _offer: Offer) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    fn leads(&self) -> Result<Vec<Lead>, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    fn replace_leads(&self, _leads: Vec<Lead>) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    fn results(&self) -> Result<Vec<ScoredLead>, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    fn replace_results(&self, _results: Vec<ScoredLead>) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) const BOUNDARY: &str = "lead-intent-boundary";

/// Multipart body carrying a single file field.
pub(super) fn multipart_body(field: &str, file_name: &str, contents: &str) -> String {
    format!(
        "--{BOUNDARY}\r\n\
Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
Content-Type: application/octet-stream\r\n\r\n\
{contents}\r\n\
--{BOUNDARY}--\r\n"
    )
}

//! Lead buying-intent scoring: deterministic rules, semantic classification,
//! batch orchestration, and the session-backed service and router around them.

pub mod classifier;
pub mod domain;
pub mod ingest;
pub mod orchestrator;
pub mod report;
pub mod repository;
pub mod router;
pub mod rules;
pub mod service;

#[cfg(test)]
mod tests;

pub use classifier::{
    classifier_from_config, ChatCompletionClassifier, ClassificationError, ClassificationPrompt,
    ClassifierVerdict, FallbackClassifier, IntentClassifier, SemanticClassifier,
};
pub use domain::{
    ClassificationResult, ClassifiedIntent, IntentLabel, Lead, Offer, OfferError, RuleBreakdown,
    ScoreBreakdown, ScoreDetails, ScoredLead, FALLBACK_REASONING, UNRECOGNIZED_INTENT_POINTS,
};
pub use ingest::{leads_from_path, parse_leads, LeadImportError};
pub use orchestrator::{ScoringError, ScoringOrchestrator};
pub use report::{results_to_csv, BatchSummary, ExportError, ScoringReport};
pub use repository::{SessionStore, StoreError};
pub use router::scoring_router;
pub use rules::calculate_rule_score;
pub use service::{ScoringService, ScoringServiceError};

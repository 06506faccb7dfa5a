use std::sync::Arc;

use super::common::*;
use crate::scoring::domain::{ClassifiedIntent, IntentLabel, Lead};
use crate::scoring::orchestrator::{ScoringError, ScoringOrchestrator};

fn orchestrator(classifier: &Arc<ScriptedClassifier>) -> ScoringOrchestrator {
    ScoringOrchestrator::new(classifier.clone())
}

#[tokio::test]
async fn top_rules_and_high_verdict_score_one_hundred() {
    let classifier = Arc::new(ScriptedClassifier::default().verdict("Jane", "High", "Strong fit"));
    let report = orchestrator(&classifier)
        .run_batch(&[lead("Jane", "VP of Sales", "SaaS")], &offer())
        .await
        .expect("batch runs");

    let scored = &report.results[0];
    assert_eq!(scored.score, 100);
    assert_eq!(scored.intent, IntentLabel::High);
    assert_eq!(scored.reasoning, "Strong fit");
    let breakdown = scored.score_breakdown.as_ref().expect("breakdown");
    assert_eq!(breakdown.rule_score, 50);
    assert_eq!(breakdown.ai_score, 50);
}

#[tokio::test]
async fn low_rules_and_low_verdict_stay_low() {
    // influencer role, unrelated industry, missing bio: 10 rule points
    let mut weak = lead("Lena", "Senior Developer", "Retail");
    weak.linkedin_bio.clear();
    let classifier = Arc::new(ScriptedClassifier::default().verdict("Lena", "low", "Poor fit"));

    let report = orchestrator(&classifier)
        .run_batch(&[weak], &offer())
        .await
        .expect("batch runs");

    assert_eq!(report.results[0].score, 20);
    assert_eq!(report.results[0].intent, IntentLabel::Low);
}

#[tokio::test]
async fn medium_boundary_inputs_land_in_medium_band() {
    // decision maker, adjacent industry, incomplete data: 20 + 10 + 0 = 30
    let mut lead = lead("Omar", "Founder", "Software");
    lead.location.clear();
    let classifier = Arc::new(ScriptedClassifier::default().verdict("Omar", "Medium", "Some fit"));

    let report = orchestrator(&classifier)
        .run_batch(&[lead], &offer())
        .await
        .expect("batch runs");

    assert_eq!(report.results[0].score, 60);
    assert_eq!(report.results[0].intent, IntentLabel::Medium);
}

#[tokio::test]
async fn final_label_can_disagree_with_classifier_label() {
    let classifier =
        Arc::new(ScriptedClassifier::default().verdict("Jane", "Low", "Budget frozen"));
    let report = orchestrator(&classifier)
        .run_batch(&[lead("Jane", "CEO", "SaaS")], &offer())
        .await
        .expect("batch runs");

    let scored = &report.results[0];
    assert_eq!(scored.score, 60);
    assert_eq!(scored.intent, IntentLabel::Medium);
    assert_eq!(
        scored.score_breakdown.as_ref().expect("breakdown").details.ai_intent,
        ClassifiedIntent::Known(IntentLabel::Low)
    );
}

#[tokio::test]
async fn unrecognized_verdict_scores_ten_and_is_preserved() {
    let classifier = Arc::new(ScriptedClassifier::default().verdict("Jane", "maybe", "Unclear"));
    let report = orchestrator(&classifier)
        .run_batch(&[lead("Jane", "CEO", "SaaS")], &offer())
        .await
        .expect("batch runs");

    let breakdown = report.results[0].score_breakdown.as_ref().expect("breakdown");
    assert_eq!(breakdown.ai_score, 10);
    assert_eq!(
        breakdown.details.ai_intent,
        ClassifiedIntent::Unrecognized("Maybe".to_string())
    );
    assert_eq!(report.results[0].score, 60);
}

#[tokio::test]
async fn failing_lead_is_degraded_and_batch_continues() {
    let classifier = Arc::new(
        ScriptedClassifier::default()
            .verdict("A", "High", "great")
            .failure("B", "unexpected payload")
            .verdict("C", "Medium", "ok"),
    );
    let leads = vec![
        lead("A", "CEO", "SaaS"),
        lead("B", "CEO", "SaaS"),
        lead("C", "Manager", "Healthcare"),
    ];

    let report = orchestrator(&classifier)
        .run_batch(&leads, &offer())
        .await
        .expect("batch runs");

    assert_eq!(report.results.len(), 3);
    let failed = &report.results[1];
    assert!(failed.error);
    assert_eq!(failed.score, 0);
    assert_eq!(failed.intent, IntentLabel::Low);
    assert!(failed.reasoning.starts_with("Error during scoring:"));
    assert!(failed.reasoning.contains("unexpected payload"));
    assert!(failed.score_breakdown.is_none());

    // A: 50 + 50, B: 0, C: 10 + 0 + 10 + 30 = 50
    assert_eq!(report.results[2].score, 50);
    assert_eq!(report.summary.total, 3);
    assert_eq!(report.summary.high, 1);
    assert_eq!(report.summary.medium, 1);
    assert_eq!(report.summary.low, 1);
    assert_eq!(report.summary.average_score, 50);
}

#[tokio::test]
async fn leads_are_processed_in_input_order_one_at_a_time() {
    let classifier = Arc::new(ScriptedClassifier::default());
    let leads: Vec<Lead> = ["first", "second", "third"]
        .iter()
        .map(|name| lead(name, "CEO", "SaaS"))
        .collect();

    let report = orchestrator(&classifier)
        .run_batch(&leads, &offer())
        .await
        .expect("batch runs");

    assert_eq!(classifier.calls(), vec!["first", "second", "third"]);
    assert_eq!(classifier.peak_in_flight(), 1);
    let names: Vec<_> = report.results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["first", "second", "third"]);
}

#[tokio::test]
async fn bounded_concurrency_matches_sequential_output() {
    let script = || {
        ScriptedClassifier::default()
            .verdict("a", "High", "x")
            .verdict("b", "Low", "y")
            .failure("c", "broken")
            .verdict("d", "Medium", "z")
            .verdict("e", "High", "w")
    };
    let leads: Vec<Lead> = ["a", "b", "c", "d", "e"]
        .iter()
        .map(|name| lead(name, "Director", "Software"))
        .collect();

    let sequential = ScoringOrchestrator::new(Arc::new(script()))
        .run_batch(&leads, &offer())
        .await
        .expect("sequential batch");

    let parallel_classifier = Arc::new(script());
    let parallel = ScoringOrchestrator::new(parallel_classifier.clone())
        .with_concurrency(3)
        .run_batch(&leads, &offer())
        .await
        .expect("parallel batch");

    assert_eq!(sequential, parallel);
    assert!(parallel_classifier.peak_in_flight() <= 3);
}

#[tokio::test]
async fn repeated_runs_are_identical_with_deterministic_classifier() {
    let classifier = Arc::new(ScriptedClassifier::default().verdict("Jane", "High", "fit"));
    let leads = vec![lead("Jane", "CEO", "SaaS"), lead("Kim", "Intern", "Retail")];
    let orchestrator = orchestrator(&classifier);

    let first = orchestrator.run_batch(&leads, &offer()).await.expect("first");
    let second = orchestrator.run_batch(&leads, &offer()).await.expect("second");
    assert_eq!(first, second);
}

#[tokio::test]
async fn empty_batch_is_a_precondition_error() {
    let classifier = Arc::new(ScriptedClassifier::default());
    let error = orchestrator(&classifier)
        .run_batch(&[], &offer())
        .await
        .expect_err("no leads");
    assert_eq!(error, ScoringError::MissingLeads);
    assert!(classifier.calls().is_empty());
}

#[test]
fn concurrency_limit_is_at_least_one() {
    let classifier = Arc::new(ScriptedClassifier::default());
    assert_eq!(orchestrator(&classifier).with_concurrency(0).max_concurrency(), 1);
}

use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::error;

use super::domain::Offer;
use super::ingest::REQUIRED_COLUMNS;
use super::orchestrator::ScoringError;
use super::repository::SessionStore;
use super::service::{ScoringService, ScoringServiceError};

pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
const LEAD_PREVIEW: usize = 3;
const RESULT_PREVIEW: usize = 5;

/// Router exposing offer intake, lead upload, scoring and result export.
pub fn scoring_router<S>(service: Arc<ScoringService<S>>) -> Router
where
    S: SessionStore + 'static,
{
    Router::new()
        .route(
            "/offer",
            post(set_offer_handler::<S>).get(get_offer_handler::<S>),
        )
        .route("/leads/upload", post(upload_leads_handler::<S>))
        .route("/score", post(score_handler::<S>))
        .route("/results", get(results_handler::<S>))
        .route("/results/csv", get(results_csv_handler::<S>))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(service)
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

fn internal_error(context: &str, err: &ScoringServiceError) -> Response {
    error!(error = %err, "{context}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": context, "message": err.to_string() })),
    )
        .into_response()
}

pub(crate) async fn set_offer_handler<S>(
    State(service): State<Arc<ScoringService<S>>>,
    payload: Result<Json<Offer>, JsonRejection>,
) -> Response
where
    S: SessionStore + 'static,
{
    let Json(offer) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            let body = json!({
                "error": "Missing required fields",
                "required": ["name", "value_props", "ideal_use_cases"],
                "message": rejection.body_text(),
            });
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };

    match service.set_offer(offer) {
        Ok(offer) => (
            StatusCode::CREATED,
            Json(json!({ "message": "Offer stored successfully", "offer": offer })),
        )
            .into_response(),
        Err(ScoringServiceError::Offer(err)) => {
            error_response(StatusCode::BAD_REQUEST, err.to_string())
        }
        Err(other) => internal_error("Failed to store offer", &other),
    }
}

pub(crate) async fn get_offer_handler<S>(State(service): State<Arc<ScoringService<S>>>) -> Response
where
    S: SessionStore + 'static,
{
    match service.offer() {
        Ok(Some(offer)) => (StatusCode::OK, Json(offer)).into_response(),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            "No offer found. Please POST to /offer first.",
        ),
        Err(other) => internal_error("Failed to load offer", &other),
    }
}

pub(crate) async fn upload_leads_handler<S>(
    State(service): State<Arc<ScoringService<S>>>,
    mut multipart: Multipart,
) -> Response
where
    S: SessionStore + 'static,
{
    let upload = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                if !is_csv_file(&file_name) {
                    return error_response(StatusCode::BAD_REQUEST, "Only CSV files are allowed");
                }
                match field.bytes().await {
                    Ok(bytes) => break bytes,
                    Err(err) => return error_response(StatusCode::BAD_REQUEST, err.body_text()),
                }
            }
            Ok(Some(_)) => continue,
            Ok(None) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    "No file uploaded. Please attach a CSV file.",
                )
            }
            Err(err) => return error_response(StatusCode::BAD_REQUEST, err.body_text()),
        }
    };

    match service.import_leads(Cursor::new(upload)) {
        Ok(leads) => {
            let preview = &leads[..leads.len().min(LEAD_PREVIEW)];
            (
                StatusCode::CREATED,
                Json(json!({
                    "message": "Leads uploaded successfully",
                    "count": leads.len(),
                    "preview": preview,
                })),
            )
                .into_response()
        }
        Err(ScoringServiceError::Import(err)) => {
            let body = json!({
                "error": "Failed to process CSV file",
                "message": err.to_string(),
                "required": REQUIRED_COLUMNS,
            });
            (StatusCode::BAD_REQUEST, Json(body)).into_response()
        }
        Err(other) => internal_error("Failed to store leads", &other),
    }
}

fn is_csv_file(file_name: &str) -> bool {
    mime_guess::from_path(file_name).first_raw() == Some("text/csv")
}

pub(crate) async fn score_handler<S>(State(service): State<Arc<ScoringService<S>>>) -> Response
where
    S: SessionStore + 'static,
{
    match service.score().await {
        Ok(report) => (
            StatusCode::OK,
            Json(json!({
                "message": "Scoring completed successfully",
                "summary": report.summary,
                "preview": report.preview(RESULT_PREVIEW),
            })),
        )
            .into_response(),
        Err(ScoringServiceError::Precondition(
            err @ (ScoringError::MissingOffer | ScoringError::MissingLeads),
        )) => error_response(StatusCode::BAD_REQUEST, err.to_string()),
        Err(ScoringServiceError::Precondition(err @ ScoringError::ClassifierNotConfigured)) => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
        Err(other) => internal_error("Failed to score leads", &other),
    }
}

const NO_RESULTS: &str = "No results found. Please POST to /score first.";

pub(crate) async fn results_handler<S>(State(service): State<Arc<ScoringService<S>>>) -> Response
where
    S: SessionStore + 'static,
{
    match service.results() {
        Ok(results) if results.is_empty() => error_response(StatusCode::NOT_FOUND, NO_RESULTS),
        Ok(results) => (StatusCode::OK, Json(results)).into_response(),
        Err(other) => internal_error("Failed to load results", &other),
    }
}

pub(crate) async fn results_csv_handler<S>(
    State(service): State<Arc<ScoringService<S>>>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.results_csv() {
        Ok(Some(csv)) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=scored_leads.csv",
                ),
            ],
            csv,
        )
            .into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, NO_RESULTS),
        Err(other) => internal_error("Failed to export results", &other),
    }
}

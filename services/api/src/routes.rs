use crate::infra::AppState;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use chrono::{SecondsFormat, Utc};
use lead_intent::scoring::{scoring_router, ScoringService, SessionStore};
use serde::Serialize;
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

#[derive(Debug, Serialize)]
pub(crate) struct ServiceInfo {
    pub(crate) status: &'static str,
    pub(crate) message: &'static str,
    pub(crate) version: &'static str,
    pub(crate) timestamp: String,
    pub(crate) endpoints: EndpointIndex,
}

#[derive(Debug, Serialize)]
pub(crate) struct EndpointIndex {
    pub(crate) offer: &'static str,
    pub(crate) upload: &'static str,
    pub(crate) score: &'static str,
    pub(crate) results: &'static str,
    pub(crate) export: &'static str,
}

pub(crate) fn with_service_routes<S>(
    service: Arc<ScoringService<S>>,
    cors_origins: &[String],
) -> Router
where
    S: SessionStore + 'static,
{
    scoring_router(service)
        .route("/", get(service_info))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .fallback(route_not_found)
        .layer(build_cors_layer(cors_origins))
}

/// Any origin when none are configured, otherwise only the listed ones.
pub(crate) fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    info!(origins = parsed.len(), "CORS restricted to configured origins");
    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

pub(crate) async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        status: "healthy",
        message: "Lead Scoring API",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        endpoints: EndpointIndex {
            offer: "POST /offer - Store product/offer details",
            upload: "POST /leads/upload - Upload CSV file with leads",
            score: "POST /score - Run scoring pipeline",
            results: "GET /results - Get scored leads as JSON",
            export: "GET /results/csv - Export results as CSV",
        },
    })
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready", "classifier_configured": state.classifier_configured })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn route_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Route not found" })),
    )
}

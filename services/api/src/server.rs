use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySessionStore};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use lead_intent::config::AppConfig;
use lead_intent::error::AppError;
use lead_intent::scoring::{classifier_from_config, ScoringService};
use lead_intent::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let classifier = classifier_from_config(&config.classifier)?;
    if classifier.is_none() {
        warn!("GROQ_API_KEY not set; POST /score will fail until it is configured");
    }

    let store = Arc::new(InMemorySessionStore::default());
    let service = ScoringService::new(store, classifier)
        .with_concurrency(config.scoring.max_concurrency);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        classifier_configured: service.classifier_configured(),
    };

    let app = with_service_routes(Arc::new(service), &config.server.cors_origins)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        model = %config.classifier.model,
        concurrency = config.scoring.max_concurrency,
        "lead scoring service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

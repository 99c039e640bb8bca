//! MediAid REST API server binary.
//!
//! ## Purpose
//! Exposes the triage pipeline over HTTP: one endpoint to classify symptom
//! text and one to read back the triage history, with OpenAPI/Swagger UI.
//!
//! ## Environment Variables
//! - `MEDIAID_REST_ADDR`: server address (default: "0.0.0.0:3000")
//! - `MEDIAID_DATASET_FILE`: symptom dataset CSV (default: "symptoms_diseases.csv";
//!   a missing file disables the dataset tier, a malformed file aborts startup)
//! - `MEDIAID_HISTORY_FILE`: history JSON file (default: "mediaid_history.json")
//! - `OPENAI_API_KEY`: reasoning credential (absent: reasoning tier disabled)
//! - `OPENAI_API_BASE`, `MEDIAID_REASONING_MODEL`, `MEDIAID_REASONING_TIMEOUT_SECS`:
//!   reasoning service overrides

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use mediaid_core::{
    config::{DEFAULT_HISTORY_FILE, DEFAULT_REASONING_TIMEOUT_SECS},
    CoreConfig, HistoryStore, ReasoningConfig, TriageEngine,
};

/// Application state for the REST API server
///
/// Contains shared state accessible to all request handlers: the triage
/// engine (read-only after startup) and the history store.
#[derive(Clone)]
struct AppState {
    engine: Arc<TriageEngine>,
    history: Arc<HistoryStore>,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, triage, history),
    components(schemas(
        HealthRes,
        TriageReq,
        TriageRes,
        HistoryEntryRes,
        HistoryRes,
    ))
)]
struct ApiDoc;

#[derive(serde::Serialize, utoipa::ToSchema)]
struct HealthRes {
    ok: bool,
    message: String,
}

#[derive(serde::Deserialize, utoipa::ToSchema)]
struct TriageReq {
    /// Free-text symptom description
    symptoms: String,
}

#[derive(serde::Serialize, utoipa::ToSchema)]
struct TriageRes {
    symptoms: String,
    /// One of "Mild", "Moderate", "Severe"
    severity: String,
    advice: String,
    /// Probable condition, empty when no matcher named one
    disease: String,
}

#[derive(serde::Serialize, utoipa::ToSchema)]
struct HistoryEntryRes {
    symptoms: String,
    severity: String,
    advice: String,
    disease: String,
    /// RFC 3339 UTC timestamp of the request
    recorded_at: String,
}

#[derive(serde::Serialize, utoipa::ToSchema)]
struct HistoryRes {
    entries: Vec<HistoryEntryRes>,
}

/// Main entry point for the MediAid REST API server
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the dataset file is present but malformed (failing fast beats silently
///   matching nothing),
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("mediaid_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("MEDIAID_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    tracing::info!("-- Starting MediAid REST API on {}", addr);

    let dataset_file =
        CoreConfig::resolve_dataset_file(std::env::var("MEDIAID_DATASET_FILE").ok().map(PathBuf::from));
    let history_file = PathBuf::from(
        std::env::var("MEDIAID_HISTORY_FILE").unwrap_or_else(|_| DEFAULT_HISTORY_FILE.into()),
    );

    let reasoning = match std::env::var("OPENAI_API_KEY") {
        Ok(api_key) => {
            let timeout_secs = std::env::var("MEDIAID_REASONING_TIMEOUT_SECS")
                .ok()
                .map(|v| v.parse::<u64>())
                .transpose()
                .map_err(|e| anyhow::anyhow!("invalid MEDIAID_REASONING_TIMEOUT_SECS: {e}"))?
                .unwrap_or(DEFAULT_REASONING_TIMEOUT_SECS);
            Some(ReasoningConfig::new(
                api_key,
                std::env::var("OPENAI_API_BASE").ok(),
                std::env::var("MEDIAID_REASONING_MODEL").ok(),
                Some(timeout_secs),
            )?)
        }
        Err(_) => None,
    };

    let cfg = CoreConfig::new(dataset_file, history_file, reasoning)?;
    let engine = TriageEngine::from_config(&cfg)?;

    let state = AppState {
        engine: Arc::new(engine),
        history: Arc::new(HistoryStore::new(cfg.history_file())),
    };

    let app = Router::new()
        .route("/health", get(health))
        .route("/triage", post(triage))
        .route("/history", get(history))
        .merge(
            SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "MediAid REST API is alive".into(),
    })
}

#[utoipa::path(
    post,
    path = "/triage",
    request_body = TriageReq,
    responses(
        (status = 200, description = "Triage verdict", body = TriageRes)
    )
)]
/// Classify free-text symptoms into an urgency tier with advice
///
/// Runs the three-tier triage pipeline and appends the request/response pair
/// to the history log. The pipeline is total, so this endpoint always
/// returns a verdict; a history-append failure is logged but never suppresses
/// an already-computed verdict.
#[axum::debug_handler]
async fn triage(State(state): State<AppState>, Json(req): Json<TriageReq>) -> Json<TriageRes> {
    let verdict = state.engine.triage(&req.symptoms).await;

    if let Err(e) = state.history.append(&req.symptoms, &verdict) {
        tracing::error!("failed to append triage history: {}", e);
    }

    Json(TriageRes {
        symptoms: req.symptoms,
        severity: verdict.severity.to_string(),
        advice: verdict.advice.as_str().to_string(),
        disease: verdict.disease,
    })
}

#[utoipa::path(
    get,
    path = "/history",
    responses(
        (status = 200, description = "Full triage history, oldest first", body = HistoryRes),
        (status = 500, description = "Internal server error")
    )
)]
/// List all recorded triage requests, oldest first
///
/// Consumers wanting reverse-chronological order reverse the list themselves.
///
/// # Errors
/// Returns `500 Internal Server Error` if the history file cannot be read or
/// parsed.
#[axum::debug_handler]
async fn history(
    State(state): State<AppState>,
) -> Result<Json<HistoryRes>, (StatusCode, &'static str)> {
    match state.history.all() {
        Ok(entries) => Ok(Json(HistoryRes {
            entries: entries
                .into_iter()
                .map(|e| HistoryEntryRes {
                    symptoms: e.symptoms,
                    severity: e.severity.to_string(),
                    advice: e.advice.as_str().to_string(),
                    disease: e.disease,
                    recorded_at: e.recorded_at.to_rfc3339(),
                })
                .collect(),
        })),
        Err(e) => {
            tracing::error!("read history error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}

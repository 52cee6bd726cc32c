//! HTTP routes: the HTML page, the classify endpoint and a health probe.

use axum::{
    Json, Router,
    extract::State,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::triage::{ClassificationResult, EmailRequest, TriageService};

/// The single-page UI.
const INDEX_HTML: &str = include_str!("../../templates/index.html");

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub triage: TriageService,
}

/// Build the Axum router.
pub fn app_routes(triage: TriageService) -> Router {
    let state = AppState { triage };

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/classify", post(classify))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ── Page ────────────────────────────────────────────────────────────────

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "email-triage",
        "llm_configured": state.triage.llm_configured(),
    }))
}

// ── Classify ────────────────────────────────────────────────────────────

/// POST /api/classify
///
/// Always answers 200; failures are described in the body fields.
async fn classify(
    State(state): State<AppState>,
    Json(body): Json<EmailRequest>,
) -> Json<ClassificationResult> {
    debug!(bytes = body.email_text.len(), "Classify request received");
    Json(state.triage.process(&body.email_text).await)
}

use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use http::{HeaderValue, Method};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::assistant::configuration::Configuration;
use crate::assistant::orchestrator::Orchestrator;
use crate::assistant::state::ResearchReport;
use crate::frontend::INDEX_HTML;

pub struct AppState {
    orchestrator: Orchestrator,
}

#[derive(Debug, Deserialize)]
pub struct ResearchRequest {
    pub topic: String,
}

#[derive(Debug, Serialize)]
struct ProgressResponse {
    message: String,
}

#[derive(Debug, Serialize)]
struct ProposalResponse {
    proposal: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug)]
pub enum ApiError {
    BlankTopic,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BlankTopic => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Topic must not be empty".to_string(),
                }),
            )
                .into_response(),
        }
    }
}

/// Rejects blank topics; accepted topics are passed on exactly as sent.
fn require_topic(topic: &str) -> Result<(), ApiError> {
    if topic.trim().is_empty() {
        warn!("Rejected request with an empty topic");
        return Err(ApiError::BlankTopic);
    }
    Ok(())
}

/// Origins that fail to parse as header values are skipped with a warning.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin {}: {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

pub fn router(orchestrator: Orchestrator, cors: CorsLayer) -> Router {
    let state = Arc::new(AppState { orchestrator });

    Router::new()
        .route("/", get(serve_index))
        .route("/health", get(health))
        .route("/research", post(handle_research))
        .route("/progress/:topic", get(handle_progress))
        .route("/proposal/:topic", get(handle_proposal))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: Configuration, orchestrator: Orchestrator) -> anyhow::Result<()> {
    let app = router(orchestrator, cors_layer(&config.allowed_origins));
    let addr = config.socket_addr();

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Starting server on http://{}", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .context("Server error")
}

async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn handle_research(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ResearchRequest>,
) -> Result<Json<ResearchReport>, ApiError> {
    require_topic(&request.topic)?;
    let topic = request.topic.as_str();
    info!("Received research request for topic: {}", topic);

    let report = state.orchestrator.research_topic(topic).await;
    if report.is_pipeline_failure() {
        error!("Research pipeline failed for topic: {}", topic);
    }
    Ok(Json(report))
}

async fn handle_progress(
    State(state): State<Arc<AppState>>,
    Path(topic): Path<String>,
) -> Result<Json<ProgressResponse>, ApiError> {
    require_topic(&topic)?;
    Ok(Json(ProgressResponse {
        message: state.orchestrator.track_research_progress(&topic),
    }))
}

async fn handle_proposal(
    State(state): State<Arc<AppState>>,
    Path(topic): Path<String>,
) -> Result<Json<ProposalResponse>, ApiError> {
    require_topic(&topic)?;
    Ok(Json(ProposalResponse {
        proposal: state.orchestrator.generate_research_proposal(&topic),
    }))
}

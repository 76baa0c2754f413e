pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tree-of-Thoughts API",
        version = "0.1.0",
        description = "Beam-search tree-of-thoughts runs over an LLM oracle"
    ),
    paths(
        routes::health_check,
        routes::solve_game24,
        routes::solve_creative_writing,
        routes::run_task,
        routes::sse::run_stream,
    ),
    components(schemas(
        routes::HealthResponse,
        error::ErrorResponse,
        tot_core::RunRequest,
        tot_core::Game24Request,
        tot_core::CreativeWritingRequest,
        tot_core::RunResult,
        tot_core::TaskKind,
        tot_core::Verdict,
    )),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "runs", description = "Synchronous search runs"),
        (name = "events", description = "Streamed search runs (SSE)"),
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health_check))
        .route("/api/openapi.json", get(openapi_json))
        .route("/api/game24", post(routes::solve_game24))
        .route("/api/creative-writing", post(routes::solve_creative_writing))
        .route("/api/runs", post(routes::run_task))
        .route("/api/runs/stream", post(routes::sse::run_stream))
        .route("/ws", get(routes::websocket_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

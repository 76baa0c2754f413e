use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::Value;

use tot_core::{RunRequest, RunResult, TaskInput};

use crate::error::{AppError, ErrorResponse};
use crate::state::AppState;

pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

async fn solve(state: &AppState, input: TaskInput) -> Result<Json<RunResult>, AppError> {
    let result = state.service.run_detached(&input).await?;
    Ok(Json(result))
}

#[utoipa::path(
    post,
    path = "/api/game24",
    request_body = tot_core::Game24Request,
    responses(
        (status = 200, description = "Search finished", body = RunResult),
        (status = 400, description = "Invalid numbers", body = ErrorResponse),
        (status = 502, description = "Oracle failure", body = ErrorResponse)
    ),
    tag = "runs"
)]
pub async fn solve_game24(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<RunResult>, AppError> {
    let input = TaskInput::game24(&json_body(payload)?)?;
    solve(&state, input).await
}

#[utoipa::path(
    post,
    path = "/api/creative-writing",
    request_body = tot_core::CreativeWritingRequest,
    responses(
        (status = 200, description = "Search finished", body = RunResult),
        (status = 400, description = "Invalid seed sentences", body = ErrorResponse),
        (status = 502, description = "Oracle failure", body = ErrorResponse)
    ),
    tag = "runs"
)]
pub async fn solve_creative_writing(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<RunResult>, AppError> {
    let input = TaskInput::creative_writing(&json_body(payload)?)?;
    solve(&state, input).await
}

#[utoipa::path(
    post,
    path = "/api/runs",
    request_body = RunRequest,
    responses(
        (status = 200, description = "Search finished", body = RunResult),
        (status = 400, description = "Unknown task or invalid payload", body = ErrorResponse),
        (status = 502, description = "Oracle failure", body = ErrorResponse)
    ),
    tag = "runs"
)]
pub async fn run_task(
    State(state): State<AppState>,
    payload: Result<Json<RunRequest>, JsonRejection>,
) -> Result<Json<RunResult>, AppError> {
    let input = json_body(payload)?.validate()?;
    solve(&state, input).await
}

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures::stream::{Stream, StreamExt};
use tokio_stream::wrappers::ReceiverStream;

use tot_core::RunRequest;

use crate::error::AppError;
use crate::routes::solve::json_body;
use crate::state::AppState;

pub const SSE_KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

fn envelope_to_sse_event(envelope: &events::EventEnvelope) -> Result<Event, Infallible> {
    let data = serde_json::to_string(&envelope.event).unwrap_or_else(|_| "{}".to_string());

    Ok(Event::default()
        .id(envelope.seq.to_string())
        .event(envelope.event.event_type())
        .data(data))
}

/// Stream one run as server-sent events. The stream ends after the terminal
/// event; a client that disconnects cancels the run.
#[utoipa::path(
    post,
    path = "/api/runs/stream",
    request_body = RunRequest,
    responses(
        (status = 200, description = "SSE progress stream"),
        (status = 400, description = "Unknown task or invalid payload", body = crate::error::ErrorResponse)
    ),
    tag = "events"
)]
pub async fn run_stream(
    State(state): State<AppState>,
    payload: Result<Json<RunRequest>, JsonRejection>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let input = json_body(payload)?.validate()?;
    tracing::debug!(task = %input.kind(), "Starting streamed run");

    let stream = ReceiverStream::new(state.service.spawn(input).into_inner())
        .map(|envelope| envelope_to_sse_event(&envelope));

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(SSE_KEEP_ALIVE_INTERVAL)
            .text("keep-alive"),
    ))
}

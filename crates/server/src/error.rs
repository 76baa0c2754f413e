use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use engine::EngineError;
use tot_core::CoreError;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Core(CoreError),
    Engine(EngineError),
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            AppError::Core(err) => match err {
                CoreError::UnknownTask(_) => {
                    (StatusCode::BAD_REQUEST, "unknown_task", err.to_string())
                }
                CoreError::Validation(_) => {
                    (StatusCode::BAD_REQUEST, "validation_error", err.to_string())
                }
            },
            AppError::Engine(err) => match err {
                EngineError::Oracle(ref e) => {
                    tracing::warn!("Oracle error: {}", e);
                    (StatusCode::BAD_GATEWAY, "oracle_error", err.public_message())
                }
                EngineError::InvalidConfig(_) => {
                    (StatusCode::BAD_REQUEST, "invalid_config", err.public_message())
                }
                EngineError::Cancelled => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "cancelled",
                    err.public_message(),
                ),
                EngineError::InvalidTransition { .. } | EngineError::Internal(_) => {
                    tracing::error!("Engine error: {:?}", err);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal_error",
                        err.public_message(),
                    )
                }
            },
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        AppError::Core(err)
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        AppError::Engine(err)
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::billing::PaymentError;
use crate::optimization::OptimizationError;
use crate::session::SessionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Plan not found: {0}")]
    PlanNotFound(String),

    #[error("Optimization error: {0}")]
    Optimization(#[from] OptimizationError),

    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Validation(e) => AppError::Validation(e.to_string()),
            e @ SessionError::InvalidTransition { .. } => AppError::InvalidTransition(e.to_string()),
            SessionError::PlanNotFound(id) => AppError::PlanNotFound(id),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InvalidTransition(msg) => {
                (StatusCode::CONFLICT, "INVALID_TRANSITION", msg.clone())
            }
            AppError::PlanNotFound(id) => (
                StatusCode::NOT_FOUND,
                "PLAN_NOT_FOUND",
                format!("No plan with id '{id}'"),
            ),
            // Logged with its cause where the session is returned to input.
            AppError::Optimization(e) => {
                (StatusCode::BAD_GATEWAY, "OPTIMIZATION_ERROR", e.to_string())
            }
            AppError::Payment(e) => {
                tracing::warn!("Payment error: {e}");
                (StatusCode::PAYMENT_REQUIRED, "PAYMENT_ERROR", e.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

// src/errors.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Record not found: {0}")]
    NotFound(String),

    // Validation errors — malformed dates, money, or rate-table config
    #[error("Validation error: {0}")]
    Validation(String),

    // Business logic errors
    #[error("A payroll run already exists for period {0}")]
    DuplicatePeriod(String),

    #[error("Cannot finalize: employee {employee_id} has a negative net pay of {net_pay}")]
    InvalidNetPay {
        employee_id: uuid::Uuid,
        net_pay: rust_decimal::Decimal,
    },

    #[error("Invalid run state: {0}")]
    State(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicatePeriod(_) | AppError::State(_) => StatusCode::CONFLICT,
            AppError::InvalidNetPay { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = json!({
            "error": {
                "code": status.as_u16(),
                "message": self.to_string(),
            }
        });
        (status, Json(body)).into_response()
    }
}

// Convenience alias
pub type AppResult<T> = Result<T, AppError>;

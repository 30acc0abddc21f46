use axum::{http::StatusCode, response::Json};
use compute::error::ComputeError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use tracing::{error, warn};

use super::responses::{HandlerError, error_response};
use crate::schemas::ErrorResponse;

/// Failures a handler reports to the client.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Compute(#[from] ComputeError),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),
}

impl ApiError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        ApiError::NotFound { entity, id }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Compute(ComputeError::NotFound { .. }) | ApiError::NotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            ApiError::Compute(ComputeError::ReceiptCollision { .. })
            | ApiError::Compute(ComputeError::FeeStructureInUse { .. })
            | ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Compute(ComputeError::Database(err)) | ApiError::Database(err)
                if is_unique_violation(err) =>
            {
                StatusCode::CONFLICT
            }
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Compute(ComputeError::Database(_)) | ApiError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Compute(ComputeError::NotFound { .. }) | ApiError::NotFound { .. } => {
                "NOT_FOUND"
            }
            ApiError::Compute(ComputeError::ReceiptCollision { .. }) => "RECEIPT_COLLISION",
            ApiError::Compute(ComputeError::FeeStructureInUse { .. }) => "FEE_STRUCTURE_IN_USE",
            ApiError::Compute(ComputeError::Database(err)) | ApiError::Database(err)
                if is_unique_violation(err) =>
            {
                "DUPLICATE"
            }
            ApiError::Conflict(_) => "DUPLICATE",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Compute(ComputeError::Database(_)) | ApiError::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// True when `err` was raised by a UNIQUE index.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

impl From<ApiError> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: ApiError) -> HandlerError {
        let status = err.status();
        if status.is_server_error() {
            error!("Request failed: {}", err);
            return error_response(status, err.code(), "Internal database error");
        }

        warn!("Request rejected with {}: {}", status, err);
        let message = match &err {
            ApiError::Compute(ComputeError::Database(_)) | ApiError::Database(_) => {
                "A record with the same unique values already exists".to_string()
            }
            other => other.to_string(),
        };
        error_response(status, err.code(), message)
    }
}

impl From<ComputeError> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: ComputeError) -> HandlerError {
        ApiError::from(err).into()
    }
}

impl From<DbErr> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: DbErr) -> HandlerError {
        ApiError::from(err).into()
    }
}

use axum::{http::StatusCode, response::Json};

use crate::schemas::{ApiResponse, ErrorResponse};

/// Error half of every handler result.
pub type HandlerError = (StatusCode, Json<ErrorResponse>);

/// Return type shared by the API handlers.
pub type HandlerResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), HandlerError>;

/// Wraps `data` in a successful [`ApiResponse`].
pub fn respond<T>(status: StatusCode, data: T, message: impl Into<String>) -> HandlerResult<T> {
    Ok((
        status,
        Json(ApiResponse {
            data,
            message: message.into(),
            success: true,
        }),
    ))
}

pub fn error_response(status: StatusCode, code: &str, error: impl Into<String>) -> HandlerError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.to_string(),
            success: false,
        }),
    )
}

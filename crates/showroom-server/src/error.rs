use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use showroom_core::error::AppError;

use crate::dto::ErrorResponse;

/// Wrapper so we can implement `IntoResponse` for `AppError`.
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        let err = &self.0;

        let status = if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            match err {
                AppError::HostingError { .. } | AppError::MailError { .. } => {
                    StatusCode::BAD_GATEWAY
                }
                AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            }
        };

        let kind = match err {
            AppError::ValidationError(_) => "validation_error",
            AppError::SerializationError(_) => "serialization_error",
            AppError::HostingError { .. } => "hosting_error",
            AppError::MailError { .. } => "mail_error",
            AppError::Timeout(_) => "timeout",
            AppError::DatabaseError(_) => "database_error",
            AppError::ConfigError(_) => "config_error",
            _ => "internal_error",
        };

        (status, kind)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_kind();

        if status.is_server_error() {
            tracing::error!(
                status = status.as_u16(),
                upstream = self.0.is_upstream(),
                error = %self.0,
                "Request failed"
            );
        }

        let body = ErrorResponse {
            error: error_type.to_string(),
            message: self.0.to_string(),
        };

        (status, axum::Json(body)).into_response()
    }
}

/// 404 for a listing id that does not exist (or does not parse).
pub fn not_found(what: &str) -> Response {
    let body = ErrorResponse {
        error: "not_found".to_string(),
        message: format!("{what} not found"),
    };
    (StatusCode::NOT_FOUND, axum::Json(body)).into_response()
}

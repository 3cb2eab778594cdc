use thiserror::Error;

/// Application-wide error types for Showroom.
#[derive(Error, Debug)]
pub enum AppError {
    /// Outbound HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Image hosting service rejected or failed an upload.
    #[error("Image hosting error (HTTP {status_code}): {message}")]
    HostingError { message: String, status_code: u16 },

    /// Mail transport rejected or failed a send.
    #[error("Mail transport error (HTTP {status_code}): {message}")]
    MailError { message: String, status_code: u16 },

    /// Incoming payload failed coercion or bounds checks.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic error.
    #[error("{0}")]
    Generic(String),
}

impl AppError {
    /// Returns true if the failure came from a third-party service
    /// (image host or mail transport) rather than from us.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            AppError::HostingError { .. }
                | AppError::MailError { .. }
                | AppError::HttpError(_)
                | AppError::NetworkError(_)
                | AppError::Timeout(_)
        )
    }

    /// Returns true if the caller sent something we could not accept.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::ValidationError(_) | AppError::SerializationError(_)
        )
    }
}

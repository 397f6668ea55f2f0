//! Backend API-specific error types.

/// Errors that can occur while talking to the Leadline backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Backend returned an error response
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Failed to deserialize a backend response
    #[error("Failed to deserialize API response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// Prospect not found
    #[error("Prospect not found: {id}")]
    ProspectNotFound { id: i64 },

    /// Generic API error
    #[error("Leadline API error: {0}")]
    Other(String),
}

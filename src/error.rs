//! Error types for Akwaba
//!
//! All errors in the client core are converted to `AppError`.
//! Authentication failures (401) are handled globally by the gateway
//! and session store; everything else propagates to the caller so it
//! can surface a specific message.

use thiserror::Error;

/// Application-wide error type
///
/// This enum represents all possible errors that can occur
/// in the client core.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication required (401). Handled globally: by the time the
    /// caller sees this, the session token has already been cleared.
    #[error("Authentication required")]
    Unauthorized,

    /// Access denied (403) or a capability check failed client-side
    #[error("Access denied")]
    Forbidden,

    /// Validation error caught client-side; no request was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Non-2xx backend response with the backend's message when present
    #[error("Backend error ({status}): {}", message.as_deref().unwrap_or("request failed"))]
    Api {
        status: u16,
        message: Option<String>,
    },

    /// Response body did not match the expected shape
    #[error("Malformed response from {operation}: {detail}")]
    BadResponse {
        operation: &'static str,
        detail: String,
    },

    /// Transport-level HTTP error
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Token persistence error
    #[error("Token store error: {0}")]
    TokenStore(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl AppError {
    /// Message suitable for a transient user-facing notification.
    ///
    /// Backend-provided messages win; transport and parse errors fall
    /// back to a generic string so internals never leak into the UI.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Api {
                message: Some(message),
                ..
            } => message.clone(),
            AppError::Validation(message) => message.clone(),
            AppError::Unauthorized => "Your session has expired. Please sign in again.".to_string(),
            AppError::Forbidden => "You are not allowed to do that.".to_string(),
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }

    /// True for the globally-handled authentication failure.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::Unauthorized)
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

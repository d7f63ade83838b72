// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types with a consistent mapping from API responses.

use reqwest::StatusCode;
use serde::Deserialize;

/// Client error type.
///
/// `Clone` so a single refresh outcome can be handed to every request that
/// queued behind it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    /// Bad credentials or a rejected/expired refresh token.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A 401 returned to the caller without recovery.
    #[error("Authentication required: {0}")]
    Unauthorized(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Permission denied: {0}")]
    Permission(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl AppError {
    pub const NO_REFRESH_TOKEN: &'static str = "No refresh token available";
    pub const ADMIN_REQUIRED: &'static str = "Admin access required";

    /// Map a non-success HTTP status and its body to an error.
    ///
    /// The body is expected to carry `{"message": "..."}`; anything else is
    /// reported verbatim (or as the status reason when empty).
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = extract_message(body).unwrap_or_else(|| {
            if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                body.trim().to_string()
            }
        });

        match status {
            StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
            StatusCode::FORBIDDEN => AppError::Permission(message),
            StatusCode::NOT_FOUND => AppError::NotFound(message),
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                AppError::Validation(message)
            }
            _ => AppError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// True for a 401 that the refresh machine may recover from.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::Unauthorized(_))
    }

    /// True if this error tears down the session (bad credentials or a failed
    /// refresh).
    pub fn is_auth_error(&self) -> bool {
        matches!(self, AppError::Auth(_))
    }

    /// Server-provided message, if any.
    pub fn message(&self) -> &str {
        match self {
            AppError::Auth(msg)
            | AppError::Unauthorized(msg)
            | AppError::Network(msg)
            | AppError::Validation(msg)
            | AppError::Permission(msg)
            | AppError::NotFound(msg)
            | AppError::Decode(msg)
            | AppError::Storage(msg) => msg,
            AppError::Api { message, .. } => message,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Decode(err.to_string())
        } else {
            AppError::Network(err.to_string())
        }
    }
}

/// JSON error body returned by the API.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn extract_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, AppError>;

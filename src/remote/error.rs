//! Error handling for the lead API.
//!
//! Non-success responses are first captured as an [`ApiError`] carrying the
//! HTTP status and the server's message, then converted to a [`LeadError`].

use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::LeadError;

/// Error body shape used by the API: `{"error": "..."}`, occasionally
/// `{"message": "..."}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    /// HTTP status code, if available
    pub status: Option<StatusCode>,
    /// Server-provided message; empty when the body carried none
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn with_status(message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Build from a failed response's status and raw body.
    ///
    /// Bodies that are not the JSON error shape yield an empty message so the
    /// caller falls back to its generic text.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error.or(b.message))
            .map(|m| m.trim().to_string())
            .unwrap_or_default();
        Self::with_status(message, status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(StatusCode::UNAUTHORIZED)
    }

    pub fn is_transient(&self) -> bool {
        self.status.is_some_and(|s| s.is_server_error())
    }

    pub fn to_lead_error(&self) -> LeadError {
        if self.is_unauthorized() {
            return LeadError::Unauthorized;
        }
        LeadError::Api(self.message.clone())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.status, self.message.is_empty()) {
            (Some(status), true) => write!(f, "HTTP {status}"),
            (Some(status), false) => write!(f, "HTTP {status}: {}", self.message),
            (None, _) => write!(f, "{}", self.message),
        }
    }
}

impl From<ApiError> for LeadError {
    fn from(error: ApiError) -> Self {
        error.to_lead_error()
    }
}

/// Map a transport failure, turning timeouts into [`LeadError::Timeout`].
pub fn transport_error(error: reqwest::Error, timeout_secs: u64) -> LeadError {
    if error.is_timeout() {
        LeadError::Timeout(timeout_secs)
    } else {
        LeadError::Http(error)
    }
}

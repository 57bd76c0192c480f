//! Error types for Riot API access.

use serde::Deserialize;

/// Result type for lolbyte operations.
pub type LolResult<T> = Result<T, LolError>;

/// Errors raised while building requests or talking to the Riot API.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LolError {
    /// A caller-supplied argument failed a structural precondition.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The remote service answered with a non-success status, or the call
    /// itself failed (connect error, timeout).
    #[error("Riot API error{}: {message}", status_suffix(.status))]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    /// A payload lacked a field needed to continue an aggregation.
    #[error("Unexpected payload: {0}")]
    UnexpectedPayload(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A spawned fan-out task panicked or was aborted.
    #[error("Task failed: {0}")]
    Task(String),
}

impl LolError {
    /// Create an upstream error from a status code and response body.
    ///
    /// Riot wraps errors as `{"status": {"message": .., "status_code": ..}}`;
    /// anything else is carried through verbatim.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<RiotErrorResponse>(body) {
            Ok(response) => response.status.message,
            Err(_) if body.trim().is_empty() => format!("HTTP {}", status),
            Err(_) => body.to_string(),
        };

        Self::Upstream {
            status: Some(status),
            message,
        }
    }

    /// Upstream HTTP status, when the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => *status,
            _ => None,
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. })
    }
}

impl From<reqwest::Error> for LolError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else {
            err.to_string()
        };

        Self::Upstream {
            status: err.status().map(|s| s.as_u16()),
            message,
        }
    }
}

impl From<serde_json::Error> for LolError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<tokio::task::JoinError> for LolError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {})", s)).unwrap_or_default()
}

/// Error body returned by the Riot API.
#[derive(Debug, Deserialize)]
struct RiotErrorResponse {
    status: RiotErrorStatus,
}

#[derive(Debug, Deserialize)]
struct RiotErrorStatus {
    message: String,
}

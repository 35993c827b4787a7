//! Gateway error taxonomy.

use axum::http::StatusCode;
use thiserror::Error;

/// Longest body excerpt carried in diagnostics.
pub const SNIPPET_CHARS: usize = 200;

/// Errors raised while forwarding a request.
///
/// Upstream replies with status >= 400 are not errors; they are relayed.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The backend could not be reached (DNS, connect, IO).
    #[error("Proxy error: {0}")]
    Upstream(#[from] reqwest::Error),

    /// The backend answered with something that is not JSON.
    #[error("Invalid JSON response from backend")]
    InvalidJson { snippet: String },

    /// No usable backend URL could be resolved.
    #[error("Backend misconfigured: {0}")]
    Misconfigured(String),

    /// The inbound body cannot be forwarded as this route expects.
    #[error("{0}")]
    InvalidBody(String),

    /// State derived from an earlier call is missing.
    #[error("{0}")]
    NotFound(String),
}

impl GatewayError {
    /// Status surfaced to the browser.
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Upstream(_)
            | GatewayError::InvalidJson { .. }
            | GatewayError::Misconfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Short label used in metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Upstream(e) if e.is_timeout() => "timeout",
            GatewayError::Upstream(e) if e.is_connect() => "connect",
            GatewayError::Upstream(_) => "upstream",
            GatewayError::InvalidJson { .. } => "invalid_json",
            GatewayError::Misconfigured(_) => "misconfigured",
            GatewayError::InvalidBody(_) => "invalid_body",
            GatewayError::NotFound(_) => "not_found",
        }
    }

    /// Offending body excerpt, when there is one.
    pub fn snippet(&self) -> Option<&str> {
        match self {
            GatewayError::InvalidJson { snippet } => Some(snippet),
            _ => None,
        }
    }

    pub(crate) fn invalid_json(body: &str) -> Self {
        GatewayError::InvalidJson {
            snippet: snippet(body),
        }
    }
}

/// First [`SNIPPET_CHARS`] characters of `body`.
pub fn snippet(body: &str) -> String {
    body.chars().take(SNIPPET_CHARS).collect()
}

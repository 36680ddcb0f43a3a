//! Typed errors for Cursor API calls, classified for retry decisions.

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde_json::Value;

/// Payload carried by every HTTP-level error: status code, extracted
/// message, decoded body and the complete response headers.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status_code: u16,
    pub message: String,
    /// Response body parsed as JSON, when it was JSON.
    pub body: Option<Value>,
    /// Response headers, preserved verbatim (`Retry-After` lives here).
    pub headers: HeaderMap,
}

impl ApiError {
    /// Builds the payload from a raw error response body.
    pub(crate) fn from_response(status: StatusCode, headers: HeaderMap, text: &str) -> Self {
        let body: Option<Value> = serde_json::from_str(text).ok();
        let message = extract_message(status, body.as_ref(), text);
        ApiError {
            status_code: status.as_u16(),
            message,
            body,
            headers,
        }
    }

    /// Parses the `Retry-After` header as fractional seconds.
    /// Header lookup is case-insensitive; returns `None` when the header
    /// is absent or does not parse as a number.
    pub fn retry_after_seconds(&self) -> Option<f64> {
        let value = self.headers.get(RETRY_AFTER)?;
        value.to_str().ok()?.trim().parse::<f64>().ok()
    }
}

/// Pulls a human-readable message out of an error response. Prefers the
/// `message` then `error` keys of a JSON object body, then the raw text.
fn extract_message(status: StatusCode, body: Option<&Value>, text: &str) -> String {
    if let Some(Value::Object(map)) = body {
        for key in ["message", "error"] {
            if let Some(Value::String(s)) = map.get(key) {
                if !s.is_empty() {
                    return s.clone();
                }
            }
        }
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        trimmed.to_string()
    }
}

/// Error type for all Cursor API operations.
#[derive(Debug)]
pub enum CursorError {
    /// HTTP error response (status >= 400) not covered by a more specific
    /// variant.
    Api(ApiError),
    /// Authentication or authorization failure (HTTP 401 or 403).
    Auth(ApiError),
    /// Rate limit exceeded (HTTP 429). The preserved headers carry any
    /// `Retry-After` hint the server sent.
    RateLimit(ApiError),
    /// Transport-level failure: connect, TLS, timeout, or reading the
    /// response body. The underlying error is kept as the source.
    Network {
        message: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Request rejected client-side before any I/O was attempted.
    InvalidRequest(String),
}

/// Error classification used by retry policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Api,
    Auth,
    RateLimit,
    Network,
    InvalidRequest,
}

impl CursorError {
    /// Maps an error response to the matching variant.
    pub(crate) fn from_response(status: StatusCode, headers: HeaderMap, text: &str) -> Self {
        let api = ApiError::from_response(status, headers, text);
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CursorError::Auth(api),
            StatusCode::TOO_MANY_REQUESTS => CursorError::RateLimit(api),
            _ => CursorError::Api(api),
        }
    }

    /// Creates a `Network` error from a message and its underlying cause.
    pub fn network(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        CursorError::Network {
            message: message.into(),
            source: source.into(),
        }
    }

    /// The classification of this error, for retryable-set membership.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CursorError::Api(_) => ErrorKind::Api,
            CursorError::Auth(_) => ErrorKind::Auth,
            CursorError::RateLimit(_) => ErrorKind::RateLimit,
            CursorError::Network { .. } => ErrorKind::Network,
            CursorError::InvalidRequest(_) => ErrorKind::InvalidRequest,
        }
    }

    /// HTTP status code, for the variants that carry a response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            CursorError::Api(e) | CursorError::Auth(e) | CursorError::RateLimit(e) => {
                Some(e.status_code)
            }
            _ => None,
        }
    }

    /// The HTTP error payload, for the variants that carry a response.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            CursorError::Api(e) | CursorError::Auth(e) | CursorError::RateLimit(e) => Some(e),
            _ => None,
        }
    }
}

impl std::fmt::Display for CursorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CursorError::Api(e) => {
                write!(f, "Cursor API error {}: {}", e.status_code, e.message)
            }
            CursorError::Auth(e) => {
                write!(
                    f,
                    "Authentication failed (HTTP {}): {}. Check your API key.",
                    e.status_code, e.message
                )
            }
            CursorError::RateLimit(e) => {
                write!(
                    f,
                    "Rate limit exceeded (HTTP {}): {}. Try again later.",
                    e.status_code, e.message
                )
            }
            CursorError::Network { message, .. } => {
                write!(f, "Network error: {}", message)
            }
            CursorError::InvalidRequest(msg) => {
                write!(f, "Invalid request: {}", msg)
            }
        }
    }
}

impl std::error::Error for CursorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CursorError::Network { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CursorError {
    fn from(error: reqwest::Error) -> Self {
        CursorError::Network {
            message: error.to_string(),
            source: Box::new(error),
        }
    }
}

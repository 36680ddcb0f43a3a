//! HTTP client for the Cursor REST APIs.

use log::debug;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::time::Duration;

use crate::errors::CursorError;

/// Default base URL for the Cursor APIs.
pub const DEFAULT_BASE_URL: &str = "https://api.cursor.com";

/// Default request timeout when no HTTP client is injected.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How the API key is presented to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthScheme {
    /// HTTP Basic with the API key as username and an empty password.
    #[default]
    Basic,
    /// `Authorization: Bearer <key>`.
    Bearer,
}

/// Client for the Cursor REST APIs.
///
/// Cheap to clone and safe to share across tasks. The client performs no
/// retries of its own; callers opt in by wrapping calls in
/// [`crate::retry::with_retry`].
#[derive(Clone)]
pub struct CursorClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    auth: AuthScheme,
}

/// Builder for [`CursorClient`].
pub struct ClientBuilder {
    api_key: String,
    base_url: String,
    timeout: Duration,
    auth: AuthScheme,
    http: Option<reqwest::Client>,
}

impl ClientBuilder {
    /// Overrides the base URL (trailing slashes are trimmed). Tests point
    /// this at a local mock server.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Selects how the API key is sent.
    pub fn auth_scheme(mut self, auth: AuthScheme) -> Self {
        self.auth = auth;
        self
    }

    /// Uses a preconfigured `reqwest::Client` instead of building one.
    /// The builder's timeout is ignored in that case.
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    pub fn build(self) -> Result<CursorClient, CursorError> {
        let http = match self.http {
            Some(http) => http,
            None => reqwest::Client::builder().timeout(self.timeout).build()?,
        };

        Ok(CursorClient {
            http,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            api_key: self.api_key,
            auth: self.auth,
        })
    }
}

impl CursorClient {
    /// Creates a client with default settings: Basic auth against
    /// `https://api.cursor.com` with a 30 second timeout.
    pub fn new(api_key: impl Into<String>) -> Result<Self, CursorError> {
        Self::builder(api_key).build()
    }

    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            auth: AuthScheme::Basic,
            http: None,
        }
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends one request and decodes the response. No retries happen
    /// here.
    #[tracing::instrument(skip(self, body))]
    pub(crate) async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, CursorError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}...", method, url);

        let mut request = self.http.request(method, &url);
        request = match self.auth {
            AuthScheme::Basic => request.basic_auth(&self.api_key, Some("")),
            AuthScheme::Bearer => request.bearer_auth(&self.api_key),
        };
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        decode_response(response).await
    }
}

impl std::fmt::Debug for CursorClient {
    // The API key stays out of Debug output.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CursorClient")
            .field("base_url", &self.base_url)
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

/// Turns a response into a decoded payload or a typed error.
async fn decode_response(response: reqwest::Response) -> Result<Value, CursorError> {
    let status = response.status();
    let headers = response.headers().clone();
    let text = response.text().await?;

    if status.is_client_error() || status.is_server_error() {
        return Err(CursorError::from_response(status, headers, &text));
    }

    Ok(decode_payload(status, &headers, &text))
}

/// Decodes a success payload. 204 and empty bodies become `Null`; a JSON
/// content type parses to its value, falling back to the raw text when
/// the body does not actually parse; anything else is the raw text.
fn decode_payload(status: StatusCode, headers: &HeaderMap, text: &str) -> Value {
    if status == StatusCode::NO_CONTENT || text.is_empty() {
        return Value::Null;
    }

    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("json"));

    if is_json {
        serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
    } else {
        Value::String(text.to_string())
    }
}

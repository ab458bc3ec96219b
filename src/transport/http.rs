//! transport::http
//!
//! HTTP transport using reqwest.
//!
//! # Design
//!
//! Every request path is appended to the configured base URL, which may
//! carry a deployment prefix such as `/v0`. Bodies are JSON in both
//! directions. Status mapping:
//!
//! | Status          | Result                                        |
//! |-----------------|-----------------------------------------------|
//! | 2xx             | decoded body (`Value::Null` for empty bodies) |
//! | 404             | `Ok(None)`; `TransportError::NotFound` for POST |
//! | 401, 403        | `TransportError::AuthFailed`                  |
//! | 429             | `TransportError::RateLimited`                 |
//! | anything else   | `TransportError::ApiError`                    |
//!
//! There is no retry: a 409 from a stale revision is returned as-is.
//!
//! # Example
//!
//! ```ignore
//! use nexus_repo::transport::{HttpTransport, Transport};
//!
//! let transport = HttpTransport::new("https://store.example.com/v0")?
//!     .with_token("token");
//! let org = transport.get("/organizations/acme").await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::traits::{Method, Transport, TransportError};
use crate::core::config::Config;

/// User-Agent header value for requests.
const USER_AGENT_VALUE: &str = concat!("nexus-repo/", env!("CARGO_PKG_VERSION"));

/// Error body shape returned by the store.
#[derive(Debug, Deserialize)]
struct StoreErrorResponse {
    message: Option<String>,
    code: Option<String>,
}

/// Transport that talks to the store over HTTP.
pub struct HttpTransport {
    /// HTTP client for making requests
    client: Client,
    /// Base URL without trailing slash
    base_url: String,
    /// Path component of the base URL, without trailing slash
    base_path: String,
    /// Bearer token, if any
    token: Option<String>,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("has_token", &self.token.is_some())
            .finish()
    }
}

impl HttpTransport {
    /// Create a transport for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::InvalidUrl` if `base_url` is not an absolute
    /// URL.
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        Self::build(base_url, Client::new())
    }

    /// Create a transport from loaded configuration.
    ///
    /// Applies the configured token and request timeout.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::InvalidUrl` if no base URL is configured.
    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        let base_url = config.base_url().ok_or_else(|| {
            TransportError::InvalidUrl(
                "no base_url configured (set it with 'nxr config set base_url <url>' or --base-url)"
                    .into(),
            )
        })?;

        let transport = Self::new(base_url)?.with_timeout(config.timeout())?;
        Ok(match config.token() {
            Some(token) => transport.with_token(token),
            None => transport,
        })
    }

    fn build(base_url: &str, client: Client) -> Result<Self, TransportError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| TransportError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(TransportError::InvalidUrl(format!(
                "{}: cannot be used as a base URL",
                base_url
            )));
        }

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            base_path: parsed.path().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Attach a bearer token to every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, TransportError> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::NetworkError(e.to_string()))?;
        Ok(self)
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the absolute URL for a relative path.
    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Build common headers for requests.
    fn headers(&self) -> Result<HeaderMap, TransportError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
                TransportError::AuthFailed("token contains invalid header characters".into())
            })?;
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        Ok(headers)
    }

    /// Send one request and map the response.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Option<Value>, TransportError> {
        let url = self.url(path);
        debug!(method = %method, url = %url, "sending request");

        let builder = match method {
            Method::Get => self.client.get(&url),
            Method::Put => self.client.put(&url),
            Method::Post => self.client.post(&url),
            Method::Patch => self.client.patch(&url),
            Method::Delete => self.client.delete(&url),
        };
        let builder = builder.headers(self.headers()?);
        let builder = match body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::NetworkError(e.to_string()))?;

        self.handle_response(method, response).await
    }

    /// Handle a response, mapping errors appropriately.
    async fn handle_response(
        &self,
        method: Method,
        response: Response,
    ) -> Result<Option<Value>, TransportError> {
        let status = response.status();
        debug!(method = %method, status = status.as_u16(), "received response");

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            return Err(Self::error_from_response(response, status).await);
        }

        let text = response
            .text()
            .await
            .map_err(|e| TransportError::NetworkError(e.to_string()))?;

        if text.trim().is_empty() {
            return Ok(Some(Value::Null));
        }

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| TransportError::Decode(e.to_string()))
    }

    /// Build the error for a non-success response.
    async fn error_from_response(response: Response, status: StatusCode) -> TransportError {
        let message = match response.json::<StoreErrorResponse>().await {
            Ok(StoreErrorResponse {
                message: Some(message),
                ..
            }) => message,
            Ok(StoreErrorResponse {
                code: Some(code), ..
            }) => code,
            _ => status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
        };

        match status {
            StatusCode::UNAUTHORIZED => TransportError::AuthFailed(format!(
                "invalid or expired token: {}",
                message
            )),
            StatusCode::FORBIDDEN => {
                TransportError::AuthFailed(format!("permission denied: {}", message))
            }
            StatusCode::TOO_MANY_REQUESTS => TransportError::RateLimited,
            _ if status.is_server_error() => TransportError::ApiError {
                status: status.as_u16(),
                message: format!("store server error: {}", message),
            },
            _ => TransportError::ApiError {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &'static str {
        "http"
    }

    fn base_path(&self) -> &str {
        &self.base_path
    }

    async fn get(&self, path: &str) -> Result<Option<Value>, TransportError> {
        self.send(Method::Get, path, None).await
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Option<Value>, TransportError> {
        self.send(Method::Put, path, Some(body)).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, TransportError> {
        self.send(Method::Post, path, Some(body))
            .await?
            .ok_or_else(|| TransportError::NotFound(path.to_string()))
    }

    async fn patch(&self, path: &str, body: &Value) -> Result<Option<Value>, TransportError> {
        self.send(Method::Patch, path, Some(body)).await
    }

    async fn delete(&self, path: &str) -> Result<Option<Value>, TransportError> {
        self.send(Method::Delete, path, None).await
    }
}

//! transport::mock
//!
//! Mock transport for deterministic testing.
//!
//! # Design
//!
//! Responses are scripted per `(method, path)`. Each scripted path holds a
//! queue; a request pops the front response, and the last response stays in
//! place so repeated reads keep seeing it. Unscripted requests behave as
//! "not found". Every request is recorded so tests can assert the exact
//! sequence of round-trips.
//!
//! # Example
//!
//! ```
//! use nexus_repo::transport::mock::{MockRequest, MockTransport};
//! use nexus_repo::transport::{Method, Transport};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let transport = MockTransport::new()
//!     .respond(Method::Get, "/organizations/acme", json!({"rev": 1}));
//!
//! let body = transport.get("/organizations/acme").await.unwrap();
//! assert_eq!(body, Some(json!({"rev": 1})));
//! assert_eq!(transport.get("/organizations/other").await.unwrap(), None);
//!
//! assert_eq!(
//!     transport.requests()[0],
//!     MockRequest::new(Method::Get, "/organizations/acme", None),
//! );
//! # });
//! ```

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use super::traits::{Method, Transport, TransportError};

/// Mock transport for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone)]
pub struct MockTransport {
    /// Internal state shared across clones.
    inner: Arc<Mutex<MockTransportInner>>,
    /// Base path reported to the repository.
    base_path: Arc<str>,
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MockTransportInner {
    /// Scripted responses by method and path. `None` scripts "not found".
    responses: HashMap<(Method, String), VecDeque<Option<Value>>>,
    /// Method to fail on (for testing error paths).
    fail_on: Option<FailOn>,
    /// Recorded requests for verification.
    requests: Vec<MockRequest>,
}

/// Configuration for which requests should fail.
#[derive(Debug, Clone)]
pub struct FailOn {
    /// Verb to fail.
    pub method: Method,
    /// Fail only this path; every path when `None`.
    pub path: Option<String>,
    /// Error to return.
    pub error: TransportError,
}

/// Recorded request for test verification.
#[derive(Debug, Clone, PartialEq)]
pub struct MockRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl MockRequest {
    /// Build an expected request for comparisons.
    pub fn new(method: Method, path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method,
            path: path.into(),
            body,
        }
    }
}

impl MockTransport {
    /// Create a mock that answers "not found" to everything.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockTransportInner::default())),
            base_path: Arc::from(""),
        }
    }

    /// Queue a response for `(method, path)`.
    pub fn respond(self, method: Method, path: impl Into<String>, body: Value) -> Self {
        self.push(method, path.into(), Some(body));
        self
    }

    /// Queue a "not found" answer for `(method, path)`.
    pub fn respond_not_found(self, method: Method, path: impl Into<String>) -> Self {
        self.push(method, path.into(), None);
        self
    }

    /// Report a base path, as a transport with a prefixed base URL would.
    pub fn with_base_path(mut self, base_path: &str) -> Self {
        self.base_path = Arc::from(base_path);
        self
    }

    /// Configure the mock to fail matching requests.
    ///
    /// # Example
    ///
    /// ```
    /// use nexus_repo::transport::mock::{FailOn, MockTransport};
    /// use nexus_repo::transport::{Method, TransportError};
    ///
    /// let transport = MockTransport::new().fail_on(FailOn {
    ///     method: Method::Put,
    ///     path: None,
    ///     error: TransportError::RateLimited,
    /// });
    /// ```
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.fail_on = Some(fail_on);
        }
        self
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_on = None;
    }

    /// Get all recorded requests.
    pub fn requests(&self) -> Vec<MockRequest> {
        let inner = self.inner.lock().unwrap();
        inner.requests.clone()
    }

    /// Recorded requests as `"METHOD path"` strings.
    pub fn request_lines(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }

    /// Clear recorded requests.
    pub fn clear_requests(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.clear();
    }

    fn push(&self, method: Method, path: String, body: Option<Value>) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .responses
            .entry((method, path))
            .or_default()
            .push_back(body);
    }

    /// Record a request and produce its scripted answer.
    fn handle(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Option<Value>, TransportError> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .requests
            .push(MockRequest::new(method, path, body.cloned()));

        if let Some(fail) = &inner.fail_on {
            let path_matches = fail.path.as_deref().map_or(true, |p| p == path);
            if fail.method == method && path_matches {
                return Err(fail.error.clone());
            }
        }

        let queue = match inner.responses.get_mut(&(method, path.to_string())) {
            Some(queue) => queue,
            None => return Ok(None),
        };

        if queue.len() > 1 {
            Ok(queue.pop_front().flatten())
        } else {
            Ok(queue.front().cloned().flatten())
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn base_path(&self) -> &str {
        &self.base_path
    }

    async fn get(&self, path: &str) -> Result<Option<Value>, TransportError> {
        self.handle(Method::Get, path, None)
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Option<Value>, TransportError> {
        self.handle(Method::Put, path, Some(body))
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, TransportError> {
        self.handle(Method::Post, path, Some(body))?
            .ok_or_else(|| TransportError::NotFound(path.to_string()))
    }

    async fn patch(&self, path: &str, body: &Value) -> Result<Option<Value>, TransportError> {
        self.handle(Method::Patch, path, Some(body))
    }

    async fn delete(&self, path: &str) -> Result<Option<Value>, TransportError> {
        self.handle(Method::Delete, path, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn unscripted_requests_are_not_found() {
        let transport = MockTransport::new();
        assert_eq!(transport.get("/x").await.unwrap(), None);
        assert_eq!(transport.put("/x", &json!({})).await.unwrap(), None);
        assert_eq!(transport.delete("/x").await.unwrap(), None);
        assert!(matches!(
            transport.post("/x", &json!({})).await,
            Err(TransportError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn queued_responses_pop_until_last() {
        let transport = MockTransport::new()
            .respond(Method::Get, "/x", json!({"rev": 1}))
            .respond(Method::Get, "/x", json!({"rev": 2}));

        assert_eq!(transport.get("/x").await.unwrap(), Some(json!({"rev": 1})));
        assert_eq!(transport.get("/x").await.unwrap(), Some(json!({"rev": 2})));
        assert_eq!(transport.get("/x").await.unwrap(), Some(json!({"rev": 2})));
    }

    #[tokio::test]
    async fn scripted_not_found() {
        let transport = MockTransport::new()
            .respond_not_found(Method::Get, "/x")
            .respond(Method::Get, "/x", json!({"rev": 1}));

        assert_eq!(transport.get("/x").await.unwrap(), None);
        assert_eq!(transport.get("/x").await.unwrap(), Some(json!({"rev": 1})));
    }

    #[tokio::test]
    async fn records_requests_with_bodies() {
        let transport = MockTransport::new();
        transport.get("/a").await.unwrap();
        transport.patch("/b", &json!({"published": true})).await.unwrap();

        assert_eq!(
            transport.requests(),
            vec![
                MockRequest::new(Method::Get, "/a", None),
                MockRequest::new(Method::Patch, "/b", Some(json!({"published": true}))),
            ]
        );
        assert_eq!(transport.request_lines(), vec!["GET /a", "PATCH /b"]);

        transport.clear_requests();
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn fail_on_matching_method_and_path() {
        let transport = MockTransport::new()
            .respond(Method::Get, "/ok", json!({}))
            .fail_on(FailOn {
                method: Method::Get,
                path: Some("/broken".into()),
                error: TransportError::RateLimited,
            });

        assert!(transport.get("/ok").await.is_ok());
        assert_eq!(
            transport.get("/broken").await,
            Err(TransportError::RateLimited)
        );

        transport.clear_fail_on();
        assert_eq!(transport.get("/broken").await, Ok(None));
    }

    #[test]
    fn base_path_defaults_empty() {
        assert_eq!(MockTransport::new().base_path(), "");
        assert_eq!(
            MockTransport::new().with_base_path("/v0").base_path(),
            "/v0"
        );
    }

    #[test]
    fn clones_share_state() {
        let transport = MockTransport::new();
        let clone = transport.clone();
        tokio_test::block_on(clone.get("/shared")).unwrap();
        assert_eq!(transport.requests().len(), 1);
    }
}

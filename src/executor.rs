//! Request dispatch against the application under test.
//!
//! The checker never talks to the network itself; it hands a fully resolved
//! [`OutgoingRequest`] to an injected [`HttpExecutor`] and captures whatever
//! comes back. [`RouterExecutor`] is the bundled implementation: it drives
//! an `axum::Router` in process through `tower::ServiceExt::oneshot`, so
//! contract checks run without binding a socket.

use async_trait::async_trait;
use axum::{Router, body::Body};
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode};
use tower::ServiceExt;

use crate::error::ContractError;

/// A resolved request ready for dispatch: URI with base path and query
/// already applied, headers in supplied order, body already encoded.
#[derive(Debug, Clone)]
pub struct OutgoingRequest {
    /// Full request target, e.g. `/api/pets/42?limit=10`.
    pub uri: String,
    /// HTTP method.
    pub method: Method,
    /// Headers in supplied order; duplicates resolve last-write-wins.
    pub headers: Vec<(String, String)>,
    /// Encoded body; empty for body-less requests.
    pub body: Bytes,
}

/// The response captured from one dispatch.
#[derive(Debug, Clone)]
pub struct CapturedResponse {
    /// Response status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Raw response body.
    pub body: Bytes,
}

impl CapturedResponse {
    /// Body rendered as text for diagnostics; invalid UTF-8 is replaced.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Dispatches one request against the application under test.
#[async_trait]
pub trait HttpExecutor: Send + Sync {
    /// Sends the request and captures the response.
    ///
    /// # Errors
    ///
    /// Transport-level failures are configuration-class
    /// [`ContractError`]s, never contract violations.
    async fn execute(&self, request: OutgoingRequest) -> Result<CapturedResponse, ContractError>;
}

/// In-process executor over an `axum::Router`.
#[derive(Debug, Clone)]
pub struct RouterExecutor {
    app: Router,
}

impl RouterExecutor {
    /// Wraps the router under test.
    #[must_use]
    pub fn new(app: Router) -> Self {
        Self { app }
    }
}

#[async_trait]
impl HttpExecutor for RouterExecutor {
    async fn execute(&self, request: OutgoingRequest) -> Result<CapturedResponse, ContractError> {
        let headers = build_header_map(&request.headers)?;

        let mut req = Request::builder()
            .method(request.method.clone())
            .uri(request.uri.as_str())
            .body(Body::from(request.body.clone()))
            .map_err(|err| ContractError::Dispatch(err.to_string()))?;
        *req.headers_mut() = headers;

        let response = self
            .app
            .clone()
            .oneshot(req)
            .await
            .map_err(|err| ContractError::Dispatch(err.to_string()))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|err| ContractError::Dispatch(err.to_string()))?;

        Ok(CapturedResponse {
            status,
            headers,
            body,
        })
    }
}

/// Parses the ordered header pairs into a `HeaderMap`.
///
/// `insert` replaces any earlier value for the same name, which is exactly
/// the last-write-wins rule the test-case contract promises.
fn build_header_map(pairs: &[(String, String)]) -> Result<HeaderMap, ContractError> {
    let mut headers = HeaderMap::with_capacity(pairs.len());
    for (name, value) in pairs {
        let name: HeaderName = name.parse().map_err(|_| ContractError::Header {
            name: name.clone(),
            reason: "invalid header name".to_string(),
        })?;
        let value: HeaderValue = value.parse().map_err(|_| ContractError::Header {
            name: name.to_string(),
            reason: "invalid header value".to_string(),
        })?;
        headers.insert(name, value);
    }
    Ok(headers)
}

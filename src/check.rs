//! The contract checker: one declared request, one verdict.
//!
//! A [`ContractCheck`] takes an explicit [`TestCase`], asks the
//! [`SpecDocument`] whether the declared request shape exists, dispatches
//! the request through the injected executor, and validates the captured
//! response against the declared schema. Contract violations surface as a
//! `false` verdict with diagnostics; a malformed test case is a
//! [`ContractError`] instead, raised before anything is dispatched.

use std::collections::BTreeMap;

use bytes::Bytes;
use http::Method;
use serde_json::Value;
use tracing::debug;

use crate::error::ContractError;
use crate::executor::{CapturedResponse, HttpExecutor, OutgoingRequest};
use crate::spec::{ContractValidation, RequestDescriptor, SpecDocument};
use crate::template;

/// One declared request plus the concrete inputs to test it with.
///
/// Built explicitly; every field is public so callers can use struct-update
/// syntax on top of [`TestCase::new`]. Validated eagerly by
/// [`ContractCheck::new`], so a malformed case fails at construction rather
/// than mid-check.
#[derive(Debug, Clone)]
pub struct TestCase {
    /// Declared path template, e.g. `/pets/{id}`. Used for spec lookup and
    /// diagnostics, and for dispatch unless `proxy_path` overrides it.
    pub path: String,
    /// Alternate template used only for dispatch, e.g. when the test
    /// application sits behind a gateway prefix. Spec lookup still uses
    /// `path`.
    pub proxy_path: Option<String>,
    /// HTTP method of the operation under test.
    pub method: Method,
    /// Status code the response is expected to carry.
    pub expected_code: u16,
    /// Declared media type, e.g. `application/json`.
    pub media_type: String,
    /// Substitution values for `{name}` placeholders, keyed by bare name.
    pub path_params: BTreeMap<String, String>,
    /// Query pairs, url-encoded and appended to the dispatch URI.
    pub query_params: Vec<(String, String)>,
    /// Request headers in order; duplicates resolve last-write-wins.
    pub headers: Vec<(String, String)>,
    /// Request payload, encoded according to `media_type` at dispatch.
    pub body: Option<Value>,
}

impl TestCase {
    /// Creates a case with empty parameters and `application/json` as the
    /// declared media type.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>, expected_code: u16) -> Self {
        Self {
            path: path.into(),
            proxy_path: None,
            method,
            expected_code,
            media_type: "application/json".to_string(),
            path_params: BTreeMap::new(),
            query_params: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    fn validate(&self) -> Result<(), ContractError> {
        if !self.path.starts_with('/') {
            return Err(ContractError::InvalidTestCase(format!(
                "path {:?} must start with '/'",
                self.path
            )));
        }
        if let Some(proxy) = &self.proxy_path {
            if !proxy.starts_with('/') {
                return Err(ContractError::InvalidTestCase(format!(
                    "proxy path {proxy:?} must start with '/'"
                )));
            }
        }
        if !(100..=599).contains(&self.expected_code) {
            return Err(ContractError::InvalidTestCase(format!(
                "expected code {} is not a valid HTTP status",
                self.expected_code
            )));
        }
        if self.media_type.is_empty() {
            return Err(ContractError::InvalidTestCase(
                "media type must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Checks one [`TestCase`] against a specification document.
///
/// After [`ContractCheck::matches`] returns, the captured response (if any)
/// and the accumulated validation state stay readable for reporting.
pub struct ContractCheck<E> {
    case: TestCase,
    executor: E,
    response: Option<CapturedResponse>,
    validation: Option<Box<dyn ContractValidation>>,
}

impl<E: HttpExecutor> ContractCheck<E> {
    /// Builds a checker from an eagerly validated test case and an injected
    /// executor.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::InvalidTestCase`] when the case fails eager
    /// validation.
    pub fn new(case: TestCase, executor: E) -> Result<Self, ContractError> {
        case.validate()?;
        Ok(Self {
            case,
            executor,
            response: None,
            validation: None,
        })
    }

    /// Runs the check: request-shape validation, dispatch, response
    /// validation, in that order.
    ///
    /// Returns `Ok(true)` only when both phases produced no errors. A
    /// request shape the specification rejects short-circuits to
    /// `Ok(false)` without dispatching anything.
    ///
    /// # Errors
    ///
    /// Configuration errors (unresolved placeholder, unencodable body,
    /// transport failure) abort the check; they are never folded into the
    /// verdict.
    #[tracing::instrument(
        name = "contract.check",
        skip_all,
        fields(
            method = %self.case.method,
            path = %self.case.path,
            expected = self.case.expected_code,
        )
    )]
    pub async fn matches(&mut self, doc: &dyn SpecDocument) -> Result<bool, ContractError> {
        self.response = None;
        self.validation = None;

        let descriptor = RequestDescriptor {
            path: &self.case.path,
            method: &self.case.method,
            expected_code: self.case.expected_code,
            media_type: &self.case.media_type,
        };
        let mut validation = doc.validate_request(&descriptor);
        if !validation.is_valid() {
            debug!(
                errors = validation.errors().len(),
                "request shape rejected by specification"
            );
            self.validation = Some(validation);
            return Ok(false);
        }

        let request = self.outgoing_request(doc)?;
        debug!(uri = %request.uri, "dispatching request");
        let response = self.executor.execute(request).await?;
        debug!(status = %response.status, "response captured");

        validation.validate_response(&response.body, response.status.as_u16());
        let verdict = validation.is_valid();

        self.response = Some(response);
        self.validation = Some(validation);
        Ok(verdict)
    }

    /// Human-readable description of what the check asserts, rendered from
    /// the declared path, never the substituted or proxy one.
    #[must_use]
    pub fn description(&self) -> String {
        format!(
            "return valid response with code {} on \"{} {}\"",
            self.case.expected_code,
            self.case.method.as_str().to_ascii_uppercase(),
            self.case.path
        )
    }

    /// Explanation for a failed check: the captured response body (when a
    /// request was dispatched) followed by every accumulated error, one per
    /// line.
    #[must_use]
    pub fn failure_message(&self) -> String {
        let errors: &[String] = self
            .validation
            .as_deref()
            .map_or(&[], ContractValidation::errors);
        match &self.response {
            Some(response) => {
                let mut lines = Vec::with_capacity(errors.len() + 2);
                lines.push("Response:".to_string());
                lines.push(response.body_text());
                lines.extend(errors.iter().cloned());
                lines.join("\n")
            }
            None => errors.join("\n"),
        }
    }

    /// The response captured by the last check, if one was dispatched.
    #[must_use]
    pub fn response(&self) -> Option<&CapturedResponse> {
        self.response.as_ref()
    }

    /// Validation state accumulated by the last check.
    #[must_use]
    pub fn validation(&self) -> Option<&dyn ContractValidation> {
        self.validation.as_deref()
    }

    /// Resolves the dispatch URI and assembles the outgoing request.
    fn outgoing_request(&self, doc: &dyn SpecDocument) -> Result<OutgoingRequest, ContractError> {
        let template = self.case.proxy_path.as_deref().unwrap_or(&self.case.path);
        let resolved = template::resolve_path(template, &self.case.path_params)?;

        let query = template::encode_query(&self.case.query_params);
        let uri = if query.is_empty() {
            format!("{}{}", doc.base_path(), resolved)
        } else {
            format!("{}{}?{}", doc.base_path(), resolved, query)
        };

        let body = self.encode_body()?;
        let mut headers = Vec::with_capacity(self.case.headers.len() + 1);
        if self.case.body.is_some() {
            headers.push(("content-type".to_string(), self.case.media_type.clone()));
        }
        headers.extend(self.case.headers.iter().cloned());

        Ok(OutgoingRequest {
            uri,
            method: self.case.method.clone(),
            headers,
            body,
        })
    }

    /// Encodes the payload for the declared media type: JSON media types
    /// serialize the value, form media types url-encode top-level pairs,
    /// anything else sends the text form.
    fn encode_body(&self) -> Result<Bytes, ContractError> {
        let Some(body) = &self.case.body else {
            return Ok(Bytes::new());
        };
        let media_type = self.case.media_type.as_str();

        if media_type == "application/json" || media_type.ends_with("+json") {
            let encoded = serde_json::to_vec(body).map_err(|err| ContractError::Body {
                media_type: media_type.to_string(),
                reason: err.to_string(),
            })?;
            return Ok(Bytes::from(encoded));
        }

        if media_type == "application/x-www-form-urlencoded" {
            let Value::Object(fields) = body else {
                return Err(ContractError::Body {
                    media_type: media_type.to_string(),
                    reason: "form payload must be a JSON object".to_string(),
                });
            };
            let mut serializer = url::form_urlencoded::Serializer::new(String::new());
            for (key, value) in fields {
                serializer.append_pair(key, &scalar_text(value));
            }
            return Ok(Bytes::from(serializer.finish().into_bytes()));
        }

        Ok(Bytes::from(scalar_text(body).into_bytes()))
    }
}

/// String form of a JSON value: strings verbatim, everything else as JSON
/// text.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

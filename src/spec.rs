//! Capability traits for the API specification document.
//!
//! The checker never parses OpenAPI itself. It consumes a [`SpecDocument`]
//! supplied by the caller: an already-parsed specification that can judge
//! whether a declared request shape exists and whether a captured response
//! conforms to the declared schema. Validation state for one check lives in
//! a [`ContractValidation`] object returned by the request-phase call and
//! extended in place by the response phase.

use http::Method;

/// The declared request shape handed to the specification for lookup.
///
/// Carries the declared path template, never the proxy path: spec lookup is
/// always done against the path as written in the specification.
#[derive(Debug, Clone, Copy)]
pub struct RequestDescriptor<'a> {
    /// Declared path template, e.g. `/pets/{id}`.
    pub path: &'a str,
    /// HTTP method of the operation under test.
    pub method: &'a Method,
    /// Status code the test expects the operation to produce.
    pub expected_code: u16,
    /// Declared media type, e.g. `application/json`.
    pub media_type: &'a str,
}

/// Per-check validation state produced by [`SpecDocument::validate_request`].
///
/// The same object accumulates errors across both phases: request-phase
/// errors first, then response-phase errors appended by
/// [`ContractValidation::validate_response`]. Once the request phase leaves
/// it invalid, the checker short-circuits and the response phase never runs.
pub trait ContractValidation: Send {
    /// True while no errors have been recorded in either phase.
    fn is_valid(&self) -> bool;

    /// Accumulated error lines, in append order.
    fn errors(&self) -> &[String];

    /// Validates a captured response body and status against the schema
    /// declared for the expected code, appending any mismatches.
    fn validate_response(&mut self, body: &[u8], status: u16);
}

/// An already-parsed API specification document.
///
/// Implementations are read-only with respect to the document itself; the
/// only mutable state per check is the [`ContractValidation`] they hand out,
/// so one document can be shared across many checks.
pub trait SpecDocument: Send + Sync {
    /// Path prefix prepended to every dispatched request URI.
    fn base_path(&self) -> &str;

    /// Validates that the declared request shape exists in the specification
    /// (path, method, status code, media type all declared together).
    fn validate_request(&self, request: &RequestDescriptor<'_>) -> Box<dyn ContractValidation>;
}

/// Reusable error accumulator for [`ContractValidation`] implementations.
///
/// Not every spec engine exposes its errors as owned strings; this is the
/// shape the checker's diagnostics expect, offered as a building block.
#[derive(Debug, Default, Clone)]
pub struct ValidationErrors {
    errors: Vec<String>,
}

impl ValidationErrors {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one error line.
    pub fn push(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    /// True when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Recorded error lines in append order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.errors
    }

    /// Joins the recorded errors into a single line for logging.
    #[must_use]
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulator_preserves_append_order() {
        let mut errors = ValidationErrors::new();
        assert!(errors.is_empty());

        errors.push("request: method not declared");
        errors.push("response: missing field `name`");

        assert_eq!(errors.as_slice().len(), 2);
        assert!(errors.as_slice()[0].starts_with("request:"));
        assert_eq!(
            errors.error_message(),
            "request: method not declared; response: missing field `name`"
        );
    }
}

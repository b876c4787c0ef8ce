//! Configuration-class errors raised by the contract checker.
//!
//! These indicate a malformed test case or a broken dispatch path, never a
//! contract violation: specification mismatches are accumulated inside the
//! check's [`crate::spec::ContractValidation`] state and surfaced through
//! the verdict and failure message instead of being raised here.

use thiserror::Error;

/// Fatal errors that abort a check before a verdict can be produced.
#[derive(Debug, Error)]
pub enum ContractError {
    /// A `{name}` placeholder in the path template has no value in
    /// `path_params`. The test itself is malformed, so this aborts the
    /// check instead of counting as a failed contract.
    #[error("no substitution data found for {{{name}}} to test the path {template}")]
    MissingPathParam {
        /// Placeholder name as written in the template, without braces.
        name: String,
        /// The offending path template.
        template: String,
    },

    /// The test case failed eager validation at construction time.
    #[error("invalid test case: {0}")]
    InvalidTestCase(String),

    /// A supplied header name or value cannot be represented on the wire.
    #[error("invalid header {name:?}: {reason}")]
    Header {
        /// Header name as supplied by the test case.
        name: String,
        /// Parse failure detail.
        reason: String,
    },

    /// The body payload cannot be encoded for the declared media type.
    #[error("cannot encode request body as {media_type}: {reason}")]
    Body {
        /// Declared media type of the test case.
        media_type: String,
        /// Encoding failure detail.
        reason: String,
    },

    /// The executor failed to complete the request at the transport level.
    #[error("request dispatch failed: {0}")]
    Dispatch(String),
}

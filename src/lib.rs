//! # contract-probe
//!
//! Single-request API contract checker. Given an already-parsed
//! specification document (a [`SpecDocument`] capability), a declared
//! endpoint, and concrete test inputs, one check:
//!
//! 1. validates that the declared request shape exists in the
//!    specification (wrong method/status/media-type combinations fail
//!    before any request is built),
//! 2. resolves the path template, dispatches the request through an
//!    injected [`HttpExecutor`] (the bundled [`RouterExecutor`] drives an
//!    `axum::Router` in process), and
//! 3. validates the captured response against the schema declared for the
//!    expected status code.
//!
//! The verdict is a plain `bool`; diagnostics stay readable afterwards via
//! [`ContractCheck::description`], [`ContractCheck::failure_message`], the
//! captured response, and the accumulated validation state, which is the
//! surface a test framework's matcher protocol needs.
//!
//! Contract violations never become errors: they accumulate in the check's
//! validation state and only show up in the verdict and failure message. A
//! malformed test case (an unresolved `{name}` placeholder, an unencodable
//! body) is a [`ContractError`] instead, raised before anything is
//! dispatched.
//!
//! ```ignore
//! let mut case = TestCase::new(Method::GET, "/pets/{id}", 200);
//! case.path_params.insert("id".into(), "42".into());
//!
//! let mut check = ContractCheck::new(case, RouterExecutor::new(app))?;
//! assert!(check.matches(&spec_document).await?, "{}", check.failure_message());
//! ```

pub mod check;
pub mod error;
pub mod executor;
pub mod spec;
pub mod template;

pub use check::{ContractCheck, TestCase};
pub use error::ContractError;
pub use executor::{CapturedResponse, HttpExecutor, OutgoingRequest, RouterExecutor};
pub use spec::{ContractValidation, RequestDescriptor, SpecDocument, ValidationErrors};

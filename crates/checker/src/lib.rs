//! Live endpoint checks for the subnet registry
//!
//! Every endpoint with a curated `request.json` becomes a [`TestCase`]. The
//! [`TestRunner`] sends it through the aggregated API and compares the reply
//! with the curated `response.json` using [`validate_response`], which checks
//! field presence and value types rather than exact values.
//!
//! # Examples
//!
//! ```no_run
//! use registry_openapi_checker::{generate_test_cases, CheckConfig, ReqwestTransport, TestRunner};
//! # use registry_openapi_common::{ExampleKind, ExampleSource, ProviderId};
//! # struct NoExamples;
//! # impl ExampleSource for NoExamples {
//! #     fn load_example(&self, _: ProviderId, _: &str, _: ExampleKind) -> Option<serde_json::Value> { None }
//! # }
//!
//! let cases = generate_test_cases(&[], &NoExamples, None);
//! let config = CheckConfig::new("https://api.example.com", "token");
//! let runner = TestRunner::new(ReqwestTransport::new(&config)?, config);
//! let results = runner.run(&cases);
//! # Ok::<(), registry_openapi_checker::CheckError>(())
//! ```

mod cases;
mod executor;
mod validator;

pub use cases::{generate_test_cases, TestCase};
pub use executor::{
    CheckConfig, HttpRequest, HttpResponse, Outcome, ReqwestTransport, TestResult, TestRunner,
    Transport, DEFAULT_RETRY_COUNT, DEFAULT_TIMEOUT_MS,
};
pub use validator::{validate_response, ValidationResult, ID_FIELDS, TYPED_FIELDS};

use thiserror::Error;

/// Errors from the HTTP layer of a check run
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Request failed: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, CheckError>;

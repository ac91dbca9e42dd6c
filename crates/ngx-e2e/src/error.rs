// Error types for ngx-e2e

use std::time::Duration;
use thiserror::Error;

/// Result type alias for ngx-e2e operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by page objects, assertions and the browser session
#[derive(Debug, Error)]
pub enum Error {
    /// Error reported by the Playwright bindings
    ///
    /// Not-found and timeout conditions raised by the engine's own
    /// actionability waiting arrive through this variant unchanged.
    #[error(transparent)]
    Browser(#[from] playwright_rs::Error),

    /// Element not found by selector
    #[error("Element not found: selector '{0}'")]
    ElementNotFound(String),

    /// A wait condition was never satisfied within its budget
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Auto-retrying assertion did not match before its timeout
    #[error("Assertion timeout: {0}")]
    AssertionTimeout(String),

    /// Immediate assertion read a value different from the expected one
    #[error("Assertion failed for {subject}: expected {expected:?}, got {actual:?}")]
    AssertionMismatch {
        subject: String,
        expected: String,
        actual: String,
    },

    /// One or more soft assertions failed during the test
    #[error("{} soft assertion(s) failed:\n{}", .0.len(), format_failures(.0))]
    SoftAssertions(Vec<Error>),

    /// The whole test exceeded its time budget
    #[error("Test '{name}' exceeded its timeout of {budget:?}")]
    TestTimeout { name: String, budget: Duration },

    /// Selector cannot be expressed in the form an operation needs
    #[error("Unsupported selector for {operation}: '{selector}'")]
    UnsupportedSelector { operation: String, selector: String },

    /// Invalid argument provided to a method
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error with additional context
    #[error("{0}: {1}")]
    Context(String, #[source] Box<Error>),
}

/// Failure categories a test can end with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Target element absent within the wait budget
    NotFound,
    /// Condition never satisfied within the wait budget
    Timeout,
    /// Observed value differs from the expected one
    Mismatch,
    /// Anything else (transport, configuration, I/O)
    Other,
}

impl Error {
    /// Adds context to the error
    pub fn context(self, msg: impl Into<String>) -> Self {
        Error::Context(msg.into(), Box::new(self))
    }

    /// Classifies the error into a [`FailureKind`].
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::ElementNotFound(_) => FailureKind::NotFound,
            Error::Timeout(_) | Error::AssertionTimeout(_) | Error::TestTimeout { .. } => {
                FailureKind::Timeout
            }
            Error::AssertionMismatch { .. } | Error::SoftAssertions(_) => FailureKind::Mismatch,
            Error::Context(_, inner) => inner.kind(),
            Error::Browser(inner) => match inner {
                playwright_rs::Error::ElementNotFound(_) => FailureKind::NotFound,
                playwright_rs::Error::Timeout(_)
                | playwright_rs::Error::NavigationTimeout { .. }
                | playwright_rs::Error::AssertionTimeout(_) => FailureKind::Timeout,
                _ => FailureKind::Other,
            },
            _ => FailureKind::Other,
        }
    }
}

fn format_failures(failures: &[Error]) -> String {
    failures
        .iter()
        .enumerate()
        .map(|(i, e)| format!("  {}. {}", i + 1, e))
        .collect::<Vec<_>>()
        .join("\n")
}

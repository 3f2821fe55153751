#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for the dlock deadlock analysis engine
//!
//! Errors are grouped by domain. Only structural problems with the input
//! (and configuration) are errors; a state that turns out to be deadlocked,
//! or a search that finds nothing, is reported as ordinary data.

use std::borrow::Cow;

use thiserror::Error;

pub mod config;
pub mod import;
pub mod recovery;
pub mod validation;

pub use config::ConfigError;
pub use import::ImportError;
pub use recovery::RecoveryError;
pub use validation::{Field, ValidationError};

/// Generic error type for cross-crate boundaries
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("import error: {0}")]
    Import(#[from] ImportError),

    #[error("recovery error: {0}")]
    Recovery(#[from] RecoveryError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to serialize analysis report: {message}")]
    ReportSerialization { message: String },
}

impl Error {
    /// Whether this error stems from a malformed or inconsistent input state.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Import(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Import(err.into())
    }
}

/// Result type alias for dlock operations
pub type Result<T> = std::result::Result<T, Error>;

/// Minimal interface for rendering user-facing error information.
pub trait UserFacingError {
    /// Short message suitable for display.
    fn user_message(&self) -> Cow<'_, str>;

    /// Optional remediation hint.
    fn user_hint(&self) -> Option<&'static str> {
        None
    }

    /// Stable error code for structured reporting.
    fn user_code(&self) -> Option<&'static str> {
        None
    }
}

impl UserFacingError for Error {
    fn user_message(&self) -> Cow<'_, str> {
        match self {
            Error::Validation(err) => err.user_message(),
            Error::Import(err) => err.user_message(),
            Error::Recovery(err) => err.user_message(),
            Error::Config(err) => err.user_message(),
            Error::ReportSerialization { .. } => Cow::Owned(self.to_string()),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Error::Validation(err) => err.user_hint(),
            Error::Import(err) => err.user_hint(),
            Error::Recovery(err) => err.user_hint(),
            Error::Config(err) => err.user_hint(),
            Error::ReportSerialization { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Error::Validation(err) => err.user_code(),
            Error::Import(err) => err.user_code(),
            Error::Recovery(err) => err.user_code(),
            Error::Config(err) => err.user_code(),
            Error::ReportSerialization { .. } => Some("report.serialize"),
        }
    }
}

//! State document import/export error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ImportError {
    #[error("malformed state document: {message}")]
    Malformed { message: String },

    #[error("schema version mismatch: expected '{expected}', got '{found}'")]
    SchemaVersionMismatch { expected: String, found: String },

    #[error("failed to serialize state document: {message}")]
    SerializeFailed { message: String },
}

impl UserFacingError for ImportError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::Malformed { .. } => Some("Check that the file is valid JSON with all state fields."),
            Self::SchemaVersionMismatch { .. } => {
                Some("Re-export the state with a matching version of the tool.")
            }
            Self::SerializeFailed { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::Malformed { .. } => "import.malformed",
            Self::SchemaVersionMismatch { .. } => "import.schema_version",
            Self::SerializeFailed { .. } => "import.serialize",
        })
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed {
            message: err.to_string(),
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::EventSource;
use dlock_errors::UserFacingError;

/// Structured failure information shared across domains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureContext {
    /// Stable error code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Short user-facing message.
    pub message: String,
    /// Optional remediation hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl FailureContext {
    /// Build failure context from a `UserFacingError` implementation.
    #[must_use]
    pub fn from_error<E: UserFacingError + ?Sized>(error: &E) -> Self {
        Self {
            code: error.user_code().map(Into::into),
            message: error.user_message().into_owned(),
            hint: error.user_hint().map(Into::into),
        }
    }
}

pub mod detection;
pub mod general;
pub mod recovery;

pub use detection::*;
pub use general::*;
pub use recovery::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// General utility events (warnings, errors, operations)
    General(GeneralEvent),

    /// Validation and detector runs
    Detection(DetectionEvent),

    /// Termination and preemption planning
    Recovery(RecoveryEvent),
}

impl AppEvent {
    /// Identify the source domain for this event (used for metadata/logging).
    #[must_use]
    pub fn event_source(&self) -> EventSource {
        match self {
            Self::General(_) => EventSource::GENERAL,
            Self::Detection(_) => EventSource::DETECTION,
            Self::Recovery(_) => EventSource::RECOVERY,
        }
    }

    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            Self::General(GeneralEvent::Error { .. } | GeneralEvent::OperationFailed { .. })
            | Self::Detection(DetectionEvent::Rejected { .. }) => Level::ERROR,

            Self::General(GeneralEvent::Warning { .. })
            | Self::Detection(
                DetectionEvent::PreconditionNotMet { .. }
                | DetectionEvent::RequestExceedsInstances { .. },
            )
            | Self::Recovery(RecoveryEvent::SearchLimitExceeded { .. }) => Level::WARN,

            Self::General(GeneralEvent::DebugLog { .. }) => Level::DEBUG,

            _ => Level::INFO,
        }
    }

    /// Get the log target for this event (for structured logging)
    #[must_use]
    pub fn log_target(&self) -> &'static str {
        match self {
            Self::General(_) => "dlock::events::general",
            Self::Detection(_) => "dlock::events::detection",
            Self::Recovery(_) => "dlock::events::recovery",
        }
    }
}

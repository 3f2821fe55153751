//! Recovery planning error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum RecoveryError {
    #[error("process P{pid} is not part of the system state ({process_count} processes)")]
    UnknownProcess { pid: usize, process_count: usize },

    #[error(
        "termination search over {deadlocked} deadlocked processes exceeds the limit of {limit}"
    )]
    SearchLimitExceeded { deadlocked: usize, limit: usize },
}

impl UserFacingError for RecoveryError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::SearchLimitExceeded { .. } => {
                Some("Raise recovery.max_search_processes or rely on preemption suggestions.")
            }
            Self::UnknownProcess { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::UnknownProcess { .. } => "recovery.unknown_process",
            Self::SearchLimitExceeded { .. } => "recovery.search_limit",
        })
    }
}

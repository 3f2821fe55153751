use super::FailureContext;
use dlock_types::{Algorithm, Pid};
use serde::{Deserialize, Serialize};

/// Detection domain events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DetectionEvent {
    /// Validation passed and a detector is about to run
    Started {
        algorithm: Algorithm,
        processes: usize,
        resource_types: usize,
    },

    /// A configured algorithm was used although the state does not meet its
    /// precondition (WFG on multi-instance resources)
    PreconditionNotMet {
        algorithm: Algorithm,
        reason: String,
    },

    /// A request can never be satisfied because it exceeds total instances
    RequestExceedsInstances {
        process: Pid,
        resource: usize,
        requested: u32,
        total: u32,
    },

    /// Detector finished
    Completed {
        algorithm: Algorithm,
        deadlocked: bool,
        deadlocked_processes: Vec<Pid>,
    },

    /// Validation rejected the state
    Rejected { failure: FailureContext },
}

use dlock_types::Pid;
use serde::{Deserialize, Serialize};

/// Recovery planning events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RecoveryEvent {
    /// Recovery planning started for a deadlocked set
    Started { deadlocked_processes: Vec<Pid> },

    /// Termination search skipped because the deadlocked set is too large
    SearchLimitExceeded { deadlocked: usize, limit: usize },

    /// Recovery planning finished
    Completed {
        termination_suggestions: usize,
        preemption_suggestions: usize,
        /// Size of the smallest termination set found, if any
        minimal_set_size: Option<usize>,
    },
}

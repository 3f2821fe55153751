//! Recovery suggestion types

use dlock_types::{PidSet, RidSet};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Terminate,
    Preempt,
}

impl ActionType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Terminate => "terminate",
            Self::Preempt => "preempt",
        }
    }
}

/// A set of processes whose termination leaves a deadlock-free state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminationSuggestion {
    pub action_type: ActionType,
    /// One-line summary, e.g. `Terminate 1 process(es): P0`
    pub description: String,
    pub processes: PidSet,
    /// Multi-line account including the re-run detection trace
    pub explanation: String,
}

/// Resources that could be taken from a single deadlocked process.
///
/// Advisory only: no re-simulation backs these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreemptionSuggestion {
    pub action_type: ActionType,
    pub description: String,
    pub processes: PidSet,
    pub resources: RidSet,
    /// Instances returned to the pool, summed over `resources`
    pub released_instances: u64,
    pub explanation: String,
}

/// Combined recovery output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryPlan {
    pub termination: Vec<TerminationSuggestion>,
    pub preemption: Vec<PreemptionSuggestion>,
}

impl RecoveryPlan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.termination.is_empty() && self.preemption.is_empty()
    }

    /// Cardinality of the minimal termination sets, if any were found
    #[must_use]
    pub fn minimal_set_size(&self) -> Option<usize> {
        self.termination.first().map(|s| s.processes.len())
    }
}

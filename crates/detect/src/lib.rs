#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Deadlock detectors for dlock
//!
//! Two detectors are provided: a wait-for graph cycle search that is exact
//! for single-instance resources, and a Work/Finish simulation that is exact
//! for any instance counts. Both expect a state that already passed
//! [`dlock_types::validate`]; they tolerate requests above a resource's total
//! instances and simply treat them as unsatisfiable.

pub mod matrix;
pub mod wfg;

pub use matrix::{detect_matrix, MatrixResult, MatrixStep};
pub use wfg::{detect_wfg, Cycle, CycleEdge, WaitForEdge, WaitForGraph, WfgResult, WfgStep};

use dlock_types::{Algorithm, PidSet, SystemState};
use serde::{Deserialize, Serialize};

/// Result of either detector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Detection {
    Wfg(WfgResult),
    Matrix(MatrixResult),
}

impl Detection {
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Self::Wfg(_) => Algorithm::Wfg,
            Self::Matrix(_) => Algorithm::Matrix,
        }
    }

    #[must_use]
    pub fn deadlocked(&self) -> bool {
        match self {
            Self::Wfg(result) => result.deadlocked,
            Self::Matrix(result) => result.deadlocked,
        }
    }

    #[must_use]
    pub fn deadlocked_processes(&self) -> &PidSet {
        match self {
            Self::Wfg(result) => &result.deadlocked_processes,
            Self::Matrix(result) => &result.deadlocked_processes,
        }
    }

    #[must_use]
    pub fn trace_lines(&self) -> Vec<String> {
        match self {
            Self::Wfg(result) => result.trace_lines(),
            Self::Matrix(result) => result.trace_lines(),
        }
    }
}

/// Run the named detector.
///
/// Running WFG on a multi-instance state is allowed but may report cycles
/// that would resolve; callers wanting the exact answer should pass
/// [`Algorithm::for_state`].
#[must_use]
pub fn detect(state: &SystemState, algorithm: Algorithm) -> Detection {
    match algorithm {
        Algorithm::Wfg => Detection::Wfg(detect_wfg(state)),
        Algorithm::Matrix => Detection::Matrix(detect_matrix(state)),
    }
}

/// Run whichever detector is exact for `state`.
#[must_use]
pub fn detect_auto(state: &SystemState) -> Detection {
    detect(state, Algorithm::for_state(state))
}

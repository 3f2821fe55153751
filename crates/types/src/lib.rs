#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for the dlock deadlock analysis engine
//!
//! This crate provides the resource-allocation snapshot every detector
//! consumes, the structural checks that must pass before detection runs,
//! and the versioned JSON document used to exchange snapshots.

pub mod document;
pub mod state;
pub mod validation;

pub use document::{export_json, import_json, StateDocument, SCHEMA_VERSION};
pub use state::{Pid, PidSet, Process, ResourceType, Rid, RidSet, SystemState};
pub use validation::{check_request_bounds, request_bound_violations, validate};

use serde::{Deserialize, Serialize};

/// Detection algorithm applied to a state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Wait-for graph cycle search; exact for single-instance resources
    Wfg,
    /// Work/Finish simulation; exact for any instance counts
    Matrix,
}

impl Algorithm {
    /// Selection policy: WFG when every resource type has exactly one
    /// instance, Matrix otherwise.
    #[must_use]
    pub fn for_state(state: &SystemState) -> Self {
        if state.is_single_instance() {
            Self::Wfg
        } else {
            Self::Matrix
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wfg => "wfg",
            Self::Matrix => "matrix",
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Wfg => write!(f, "Wait-For Graph"),
            Self::Matrix => write!(f, "Matrix-Based Detection"),
        }
    }
}

/// Render a set of process ids as `P0, P2, P5`.
#[must_use]
pub fn format_pids<'a>(pids: impl IntoIterator<Item = &'a Pid>) -> String {
    pids.into_iter()
        .map(|pid| format!("P{pid}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render a set of resource ids as `R0, R1`.
#[must_use]
pub fn format_rids<'a>(rids: impl IntoIterator<Item = &'a Rid>) -> String {
    rids.into_iter()
        .map(|rid| format!("R{rid}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render a count vector as `[3, 3, 2]`.
#[must_use]
pub fn format_vector(values: &[u32]) -> String {
    let parts: Vec<String> = values.iter().map(ToString::to_string).collect();
    format!("[{}]", parts.join(", "))
}

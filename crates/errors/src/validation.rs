//! System state validation error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

/// Which numeric table of a system state an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Field {
    Available,
    Allocation,
    Request,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "Available"),
            Self::Allocation => write!(f, "Allocation"),
            Self::Request => write!(f, "Request"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ValidationError {
    #[error("Available vector must have {expected} elements, got {actual}")]
    AvailableLength { expected: usize, actual: usize },

    #[error("{field} matrix must have {expected} rows, got {actual}")]
    MatrixRows {
        field: Field,
        expected: usize,
        actual: usize,
    },

    #[error("{field}[{row}] must have {expected} columns, got {actual}")]
    MatrixColumns {
        field: Field,
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("{field}{} must be non-negative, got {value}", index_suffix(*.row, *.column))]
    NegativeValue {
        field: Field,
        row: Option<usize>,
        column: usize,
        value: i64,
    },

    #[error("value {value} at {field}{} does not fit a resource count", index_suffix(*.row, *.column))]
    ValueOutOfRange {
        field: Field,
        row: Option<usize>,
        column: usize,
        value: i64,
    },

    #[error("instance count of resource {index} must be non-negative, got {value}")]
    NegativeInstances { index: usize, value: i64 },

    #[error("instance count of resource {index} does not fit a resource count, got {value}")]
    InstancesOutOfRange { index: usize, value: i64 },

    #[error("process at position {position} has pid {pid}; pids must be dense and 0-indexed")]
    ProcessIdMismatch { position: usize, pid: i64 },

    #[error("resource type at position {position} has rid {rid}; rids must be dense and 0-indexed")]
    ResourceIdMismatch { position: usize, rid: i64 },

    #[error("process name cannot be empty (pid {pid})")]
    EmptyProcessName { pid: usize },

    #[error("resource name cannot be empty (rid {rid})")]
    EmptyResourceName { rid: usize },

    #[error(
        "resource conservation violated for {name} (R{index}): \
         Available({available}) + Allocated({allocated}) = {} != Total({total})",
        *.available + *.allocated
    )]
    ConservationViolated {
        index: usize,
        name: String,
        available: u64,
        allocated: u64,
        total: u64,
    },

    #[error("P{process} requests {requested} of R{resource} but only {total} instance(s) exist")]
    RequestExceedsInstances {
        process: usize,
        resource: usize,
        requested: u32,
        total: u32,
    },
}

fn index_suffix(row: Option<usize>, column: usize) -> String {
    match row {
        Some(row) => format!("[{row}][{column}]"),
        None => format!("[{column}]"),
    }
}

impl UserFacingError for ValidationError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::AvailableLength { .. } | Self::MatrixRows { .. } | Self::MatrixColumns { .. } => {
                Some("Make the matrices n x m and the available vector length m.")
            }
            Self::ConservationViolated { .. } => {
                Some("Available plus all allocations of a resource must equal its instance count.")
            }
            Self::RequestExceedsInstances { .. } => {
                Some("Lower the request or raise the resource's instance count.")
            }
            Self::ProcessIdMismatch { .. } | Self::ResourceIdMismatch { .. } => {
                Some("Number processes and resource types 0, 1, 2, ... in list order.")
            }
            _ => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::AvailableLength { .. } | Self::MatrixRows { .. } | Self::MatrixColumns { .. } => {
                "validation.dimensions"
            }
            Self::NegativeValue { .. }
            | Self::NegativeInstances { .. }
            | Self::InstancesOutOfRange { .. }
            | Self::ValueOutOfRange { .. } => "validation.range",
            Self::ProcessIdMismatch { .. } | Self::ResourceIdMismatch { .. } => "validation.ids",
            Self::EmptyProcessName { .. } | Self::EmptyResourceName { .. } => "validation.names",
            Self::ConservationViolated { .. } => "validation.conservation",
            Self::RequestExceedsInstances { .. } => "validation.request_bounds",
        })
    }
}

//! Versioned JSON exchange format for system states
//!
//! The document mirrors [`SystemState`] field for field, plus a
//! `schema_version`. Counts are read as signed integers so that a negative
//! entry is reported with its position instead of as a parse failure.

use crate::state::{Process, ResourceType, SystemState};
use crate::validation::{check_shape, validate};
use dlock_errors::{Error, Field, ImportError, ValidationError};
use serde::{Deserialize, Serialize};

/// Schema version written on export and required on import.
pub const SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessEntry {
    pub pid: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEntry {
    pub rid: i64,
    pub name: String,
    pub instances: i64,
}

/// On-disk representation of a [`SystemState`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDocument {
    #[serde(default)]
    pub schema_version: Option<String>,
    pub processes: Vec<ProcessEntry>,
    pub resource_types: Vec<ResourceEntry>,
    pub available: Vec<i64>,
    pub allocation: Vec<Vec<i64>>,
    pub request: Vec<Vec<i64>>,
}

impl StateDocument {
    /// Build a document at the current schema version.
    #[must_use]
    pub fn from_state(state: &SystemState) -> Self {
        Self {
            schema_version: Some(SCHEMA_VERSION.to_string()),
            processes: state
                .processes
                .iter()
                .map(|p| ProcessEntry {
                    pid: to_signed(p.pid),
                    name: p.name.clone(),
                })
                .collect(),
            resource_types: state
                .resource_types
                .iter()
                .map(|r| ResourceEntry {
                    rid: to_signed(r.rid),
                    name: r.name.clone(),
                    instances: i64::from(r.instances),
                })
                .collect(),
            available: state.available.iter().map(|&v| i64::from(v)).collect(),
            allocation: widen_matrix(&state.allocation),
            request: widen_matrix(&state.request),
        }
    }

    /// Convert into a validated [`SystemState`].
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::SchemaVersionMismatch`] when the version is
    /// missing or differs from [`SCHEMA_VERSION`], and a [`ValidationError`]
    /// for mismatched ids, wrong dimensions, negative or oversized counts,
    /// or any other structural violation, checked in that order.
    pub fn into_state(self) -> Result<SystemState, Error> {
        match self.schema_version.as_deref() {
            Some(SCHEMA_VERSION) => {}
            found => {
                return Err(ImportError::SchemaVersionMismatch {
                    expected: SCHEMA_VERSION.to_string(),
                    found: found.unwrap_or("<missing>").to_string(),
                }
                .into())
            }
        }

        let processes = self
            .processes
            .into_iter()
            .enumerate()
            .map(|(position, entry)| {
                let pid = usize::try_from(entry.pid)
                    .map_err(|_| ValidationError::ProcessIdMismatch {
                        position,
                        pid: entry.pid,
                    })?;
                Ok(Process::new(pid, entry.name))
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        let resource_types = self
            .resource_types
            .into_iter()
            .enumerate()
            .map(|(position, entry)| {
                let rid = usize::try_from(entry.rid)
                    .map_err(|_| ValidationError::ResourceIdMismatch {
                        position,
                        rid: entry.rid,
                    })?;
                let instances = u32::try_from(entry.instances).map_err(|_| {
                    if entry.instances < 0 {
                        ValidationError::NegativeInstances {
                            index: position,
                            value: entry.instances,
                        }
                    } else {
                        ValidationError::InstancesOutOfRange {
                            index: position,
                            value: entry.instances,
                        }
                    }
                })?;
                Ok(ResourceType::new(rid, entry.name, instances))
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        // Shape is checked on the signed values so a misshapen document is
        // reported as such even when it also carries a negative entry.
        check_shape(
            processes.len(),
            resource_types.len(),
            &self.available,
            &self.allocation,
            &self.request,
        )?;

        let available = self
            .available
            .iter()
            .enumerate()
            .map(|(column, &value)| narrow(Field::Available, None, column, value))
            .collect::<Result<Vec<_>, _>>()?;
        let allocation = narrow_matrix(Field::Allocation, &self.allocation)?;
        let request = narrow_matrix(Field::Request, &self.request)?;

        let state = SystemState::new(processes, resource_types, available, allocation, request);
        validate(&state)?;
        Ok(state)
    }
}

fn to_signed(id: usize) -> i64 {
    i64::try_from(id).unwrap_or(i64::MAX)
}

fn widen_matrix(matrix: &[Vec<u32>]) -> Vec<Vec<i64>> {
    matrix
        .iter()
        .map(|row| row.iter().map(|&v| i64::from(v)).collect())
        .collect()
}

fn narrow(
    field: Field,
    row: Option<usize>,
    column: usize,
    value: i64,
) -> Result<u32, ValidationError> {
    if value < 0 {
        return Err(ValidationError::NegativeValue {
            field,
            row,
            column,
            value,
        });
    }
    u32::try_from(value).map_err(|_| ValidationError::ValueOutOfRange {
        field,
        row,
        column,
        value,
    })
}

fn narrow_matrix(field: Field, matrix: &[Vec<i64>]) -> Result<Vec<Vec<u32>>, ValidationError> {
    matrix
        .iter()
        .enumerate()
        .map(|(row, values)| {
            values
                .iter()
                .enumerate()
                .map(|(column, &value)| narrow(field, Some(row), column, value))
                .collect()
        })
        .collect()
}

/// Parse, version-check and validate a JSON state document.
///
/// # Errors
///
/// Returns [`ImportError::Malformed`] for unparsable input, otherwise the
/// errors of [`StateDocument::into_state`].
pub fn import_json(json: &str) -> Result<SystemState, Error> {
    let document: StateDocument = serde_json::from_str(json).map_err(ImportError::from)?;
    document.into_state()
}

/// Serialize a state as a pretty-printed JSON document.
///
/// # Errors
///
/// Returns [`ImportError::SerializeFailed`] if serialization fails.
pub fn export_json(state: &SystemState) -> Result<String, Error> {
    serde_json::to_string_pretty(&StateDocument::from_state(state)).map_err(|e| {
        ImportError::SerializeFailed {
            message: e.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_PROCESS: &str = r#"{
        "schema_version": "1.0",
        "processes": [{"pid": 0, "name": "A"}, {"pid": 1, "name": "B"}],
        "resource_types": [
            {"rid": 0, "name": "File1", "instances": 1},
            {"rid": 1, "name": "File2", "instances": 1}
        ],
        "available": [0, 0],
        "allocation": [[1, 0], [0, 1]],
        "request": [[0, 1], [1, 0]]
    }"#;

    #[test]
    fn test_import_valid_document() {
        let state = import_json(TWO_PROCESS).unwrap();
        assert_eq!(state.process_count(), 2);
        assert_eq!(state.resource_types[1].name, "File2");
        assert_eq!(state.request[1], vec![1, 0]);
    }

    #[test]
    fn test_schema_version_mismatch() {
        let json = TWO_PROCESS.replace("\"1.0\"", "\"2.0\"");
        let err = import_json(&json).unwrap_err();
        assert!(matches!(
            err,
            Error::Import(ImportError::SchemaVersionMismatch { ref found, .. }) if found == "2.0"
        ));
    }

    #[test]
    fn test_missing_schema_version() {
        let json = TWO_PROCESS.replace("\"schema_version\": \"1.0\",", "");
        let err = import_json(&json).unwrap_err();
        assert!(matches!(
            err,
            Error::Import(ImportError::SchemaVersionMismatch { ref found, .. }) if found == "<missing>"
        ));
    }

    #[test]
    fn test_negative_value_located() {
        let json = TWO_PROCESS.replace("[[1, 0], [0, 1]]", "[[1, 0], [0, -1]]");
        let err = import_json(&json).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::NegativeValue {
                field: Field::Allocation,
                row: Some(1),
                column: 1,
                value: -1
            })
        ));
    }

    #[test]
    fn test_instances_out_of_range() {
        let json = TWO_PROCESS.replacen("\"instances\": 1}", "\"instances\": 5000000000}", 1);
        let err = import_json(&json).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InstancesOutOfRange {
                index: 0,
                value: 5_000_000_000
            })
        ));
    }

    #[test]
    fn test_dimensions_checked_before_negatives() {
        let json = TWO_PROCESS.replace("\"available\": [0, 0]", "\"available\": [0, -1, 0]");
        let err = import_json(&json).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::AvailableLength {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_ragged_matrix_with_negative_entry() {
        let json = TWO_PROCESS.replace("[[0, 1], [1, 0]]", "[[0, 1], [-1]]");
        let err = import_json(&json).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::MatrixColumns {
                field: Field::Request,
                row: 1,
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_malformed_document() {
        let err = import_json("{\"processes\": ").unwrap_err();
        assert!(matches!(err, Error::Import(ImportError::Malformed { .. })));
    }

    #[test]
    fn test_export_then_import() {
        let state = import_json(TWO_PROCESS).unwrap();
        let json = export_json(&state).unwrap();
        assert!(json.contains("\"schema_version\": \"1.0\""));
        assert_eq!(import_json(&json).unwrap(), state);
    }
}

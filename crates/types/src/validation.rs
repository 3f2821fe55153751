//! Structural and conservation checks on a system state
//!
//! Checks run in a fixed order and stop at the first violation:
//! dimensions, process/resource identity, names, then conservation.
//! Counts are unsigned in [`SystemState`], so non-negativity is enforced
//! when a document is converted (see [`crate::document`]).

use crate::state::SystemState;
use dlock_errors::{Field, ValidationError};

/// Validate a state before detection.
///
/// The empty system is valid. Request feasibility (request not exceeding
/// total instances) is not checked here; see [`check_request_bounds`].
///
/// # Errors
///
/// Returns the first [`ValidationError`] found.
pub fn validate(state: &SystemState) -> Result<(), ValidationError> {
    check_dimensions(state)?;
    check_identities(state)?;
    check_conservation(state)
}

fn check_dimensions(state: &SystemState) -> Result<(), ValidationError> {
    check_shape(
        state.process_count(),
        state.resource_count(),
        &state.available,
        &state.allocation,
        &state.request,
    )
}

/// Dimension checks shared with the signed document representation.
pub(crate) fn check_shape<T>(
    n: usize,
    m: usize,
    available: &[T],
    allocation: &[Vec<T>],
    request: &[Vec<T>],
) -> Result<(), ValidationError> {
    if available.len() != m {
        return Err(ValidationError::AvailableLength {
            expected: m,
            actual: available.len(),
        });
    }

    for (field, matrix) in [(Field::Allocation, allocation), (Field::Request, request)] {
        if matrix.len() != n {
            return Err(ValidationError::MatrixRows {
                field,
                expected: n,
                actual: matrix.len(),
            });
        }
        if let Some((row, cols)) = matrix
            .iter()
            .enumerate()
            .find(|(_, cols)| cols.len() != m)
        {
            return Err(ValidationError::MatrixColumns {
                field,
                row,
                expected: m,
                actual: cols.len(),
            });
        }
    }

    Ok(())
}

fn check_identities(state: &SystemState) -> Result<(), ValidationError> {
    for (position, process) in state.processes.iter().enumerate() {
        if process.pid != position {
            return Err(ValidationError::ProcessIdMismatch {
                position,
                pid: i64::try_from(process.pid).unwrap_or(i64::MAX),
            });
        }
        if process.name.trim().is_empty() {
            return Err(ValidationError::EmptyProcessName { pid: process.pid });
        }
    }

    for (position, resource) in state.resource_types.iter().enumerate() {
        if resource.rid != position {
            return Err(ValidationError::ResourceIdMismatch {
                position,
                rid: i64::try_from(resource.rid).unwrap_or(i64::MAX),
            });
        }
        if resource.name.trim().is_empty() {
            return Err(ValidationError::EmptyResourceName { rid: resource.rid });
        }
    }

    Ok(())
}

fn check_conservation(state: &SystemState) -> Result<(), ValidationError> {
    for (index, resource) in state.resource_types.iter().enumerate() {
        let available = u64::from(state.available[index]);
        let allocated = state.allocated(index);
        let total = u64::from(resource.instances);

        if available + allocated != total {
            return Err(ValidationError::ConservationViolated {
                index,
                name: resource.name.clone(),
                available,
                allocated,
                total,
            });
        }
    }

    Ok(())
}

/// Every (process, resource) pair whose request exceeds the resource's
/// total instance count, in row-major order.
///
/// Such a request can never be granted. Detectors tolerate it (the process
/// simply never finishes); callers decide whether to warn or reject.
#[must_use]
pub fn request_bound_violations(state: &SystemState) -> Vec<ValidationError> {
    let mut violations = Vec::new();

    for (process, row) in state.request.iter().enumerate() {
        for (resource, &requested) in row.iter().enumerate() {
            let Some(resource_type) = state.resource_types.get(resource) else {
                continue;
            };
            if requested > resource_type.instances {
                violations.push(ValidationError::RequestExceedsInstances {
                    process,
                    resource,
                    requested,
                    total: resource_type.instances,
                });
            }
        }
    }

    if !violations.is_empty() {
        tracing::debug!(count = violations.len(), "requests exceed total instances");
    }

    violations
}

/// Fail on the first request exceeding its resource's total instances.
///
/// # Errors
///
/// Returns [`ValidationError::RequestExceedsInstances`] for the first
/// offending pair.
pub fn check_request_bounds(state: &SystemState) -> Result<(), ValidationError> {
    match request_bound_violations(state).into_iter().next() {
        Some(violation) => Err(violation),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Process, ResourceType};

    fn two_by_two() -> SystemState {
        SystemState::new(
            vec![Process::new(0, "P0"), Process::new(1, "P1")],
            vec![ResourceType::new(0, "R0", 1), ResourceType::new(1, "R1", 1)],
            vec![0, 0],
            vec![vec![1, 0], vec![0, 1]],
            vec![vec![0, 1], vec![1, 0]],
        )
    }

    #[test]
    fn test_valid_state() {
        assert!(validate(&two_by_two()).is_ok());
    }

    #[test]
    fn test_empty_state_is_valid() {
        assert!(validate(&SystemState::default()).is_ok());

        // processes but no resource types
        let state = SystemState::new(
            vec![Process::new(0, "P0")],
            vec![],
            vec![],
            vec![vec![]],
            vec![vec![]],
        );
        assert!(validate(&state).is_ok());
    }

    #[test]
    fn test_available_length() {
        let mut state = two_by_two();
        state.available.push(0);
        assert_eq!(
            validate(&state),
            Err(ValidationError::AvailableLength {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn test_request_rows_and_columns() {
        let mut state = two_by_two();
        state.request.pop();
        assert_eq!(
            validate(&state),
            Err(ValidationError::MatrixRows {
                field: Field::Request,
                expected: 2,
                actual: 1
            })
        );

        let mut state = two_by_two();
        state.allocation[1] = vec![0];
        assert_eq!(
            validate(&state),
            Err(ValidationError::MatrixColumns {
                field: Field::Allocation,
                row: 1,
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_conservation_violation_reports_resource() {
        let mut state = two_by_two();
        state.available[1] = 1;
        let err = validate(&state).unwrap_err();
        assert_eq!(
            err,
            ValidationError::ConservationViolated {
                index: 1,
                name: "R1".into(),
                available: 1,
                allocated: 1,
                total: 1,
            }
        );
    }

    #[test]
    fn test_identity_checks() {
        let mut state = two_by_two();
        state.processes[1].pid = 5;
        assert!(matches!(
            validate(&state),
            Err(ValidationError::ProcessIdMismatch {
                position: 1,
                pid: 5
            })
        ));

        let mut state = two_by_two();
        state.resource_types[0].name = "  ".into();
        assert_eq!(
            validate(&state),
            Err(ValidationError::EmptyResourceName { rid: 0 })
        );
    }

    #[test]
    fn test_request_bounds() {
        let mut state = two_by_two();
        assert!(check_request_bounds(&state).is_ok());

        state.request[0][1] = 2;
        let violations = request_bound_violations(&state);
        assert_eq!(violations.len(), 1);
        assert_eq!(
            check_request_bounds(&state),
            Err(ValidationError::RequestExceedsInstances {
                process: 0,
                resource: 1,
                requested: 2,
                total: 1
            })
        );
        // bounds are not part of structural validation
        assert!(validate(&state).is_ok());
    }
}

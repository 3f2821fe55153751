//! Resource-allocation snapshot

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Process identifier; equal to the process's position in the state.
pub type Pid = usize;

/// Resource type identifier; equal to the resource's position in the state.
pub type Rid = usize;

/// Ordered set of process ids. Iterates in ascending pid order.
pub type PidSet = BTreeSet<Pid>;

/// Ordered set of resource ids. Iterates in ascending rid order.
pub type RidSet = BTreeSet<Rid>;

/// A process that holds and requests resource instances
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    pub pid: Pid,
    pub name: String,
}

impl Process {
    #[must_use]
    pub fn new(pid: Pid, name: impl Into<String>) -> Self {
        Self {
            pid,
            name: name.into(),
        }
    }
}

/// A category of interchangeable resource instances
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceType {
    pub rid: Rid,
    pub name: String,
    /// Total instances of this type in the system
    pub instances: u32,
}

impl ResourceType {
    #[must_use]
    pub fn new(rid: Rid, name: impl Into<String>, instances: u32) -> Self {
        Self {
            rid,
            name: name.into(),
            instances,
        }
    }
}

/// Snapshot of processes, resource types and the allocation/request matrices.
///
/// Construction does not validate; call [`crate::validate`] before handing a
/// state to a detector. Detectors index by position, so `processes[i].pid`
/// must equal `i` (and likewise for resource types).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SystemState {
    pub processes: Vec<Process>,
    pub resource_types: Vec<ResourceType>,
    /// Unallocated instances per resource type
    pub available: Vec<u32>,
    /// `allocation[i][j]`: instances of resource `j` held by process `i`
    pub allocation: Vec<Vec<u32>>,
    /// `request[i][j]`: instances of resource `j` process `i` still waits for
    pub request: Vec<Vec<u32>>,
}

impl SystemState {
    #[must_use]
    pub fn new(
        processes: Vec<Process>,
        resource_types: Vec<ResourceType>,
        available: Vec<u32>,
        allocation: Vec<Vec<u32>>,
        request: Vec<Vec<u32>>,
    ) -> Self {
        Self {
            processes,
            resource_types,
            available,
            allocation,
            request,
        }
    }

    /// Editor starting point: `n` processes and `m` single-instance resources
    /// with zeroed matrices.
    ///
    /// With `m > 0` the result does not satisfy conservation until the
    /// available vector or allocations are filled in.
    #[must_use]
    pub fn blank(n: usize, m: usize) -> Self {
        Self {
            processes: (0..n).map(|i| Process::new(i, format!("P{i}"))).collect(),
            resource_types: (0..m)
                .map(|j| ResourceType::new(j, format!("R{j}"), 1))
                .collect(),
            available: vec![0; m],
            allocation: vec![vec![0; m]; n],
            request: vec![vec![0; m]; n],
        }
    }

    /// Number of processes (`n`)
    #[must_use]
    pub fn process_count(&self) -> usize {
        self.processes.len()
    }

    /// Number of resource types (`m`)
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.resource_types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty() && self.resource_types.is_empty()
    }

    /// Whether every resource type has exactly one instance.
    ///
    /// Vacuously true for a state without resource types.
    #[must_use]
    pub fn is_single_instance(&self) -> bool {
        self.resource_types.iter().all(|r| r.instances == 1)
    }

    /// Sum of `allocation[i][rid]` over all processes
    #[must_use]
    pub fn allocated(&self, rid: Rid) -> u64 {
        self.allocation
            .iter()
            .filter_map(|row| row.get(rid))
            .map(|&v| u64::from(v))
            .sum()
    }

    /// Resource types currently held by `pid`, with the instance counts
    #[must_use]
    pub fn held_by(&self, pid: Pid) -> Vec<(Rid, u32)> {
        self.allocation
            .get(pid)
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|&(_, &held)| held > 0)
                    .map(|(rid, &held)| (rid, held))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_state_dimensions() {
        let state = SystemState::blank(3, 2);
        assert_eq!(state.process_count(), 3);
        assert_eq!(state.resource_count(), 2);
        assert_eq!(state.allocation, vec![vec![0, 0]; 3]);
        assert_eq!(state.request, vec![vec![0, 0]; 3]);
        assert_eq!(state.processes[2].name, "P2");
        assert!(state.is_single_instance());
    }

    #[test]
    fn test_single_instance_vacuous() {
        assert!(SystemState::default().is_single_instance());

        let mut state = SystemState::blank(1, 2);
        state.resource_types[1].instances = 3;
        assert!(!state.is_single_instance());
    }

    #[test]
    fn test_held_by() {
        let mut state = SystemState::blank(2, 3);
        state.allocation[1] = vec![2, 0, 1];
        assert_eq!(state.held_by(1), vec![(0, 2), (2, 1)]);
        assert!(state.held_by(0).is_empty());
        assert!(state.held_by(9).is_empty());
        assert_eq!(state.allocated(0), 2);
    }
}

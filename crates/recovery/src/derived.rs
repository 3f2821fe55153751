//! Post-termination states used as inputs to re-detection

use dlock_detect::{detect_matrix, MatrixResult};
use dlock_types::{Pid, PidSet, Process, SystemState};

/// State left after terminating a set of processes.
///
/// Survivors are renumbered densely in their original relative order so the
/// derived state passes validation; `survivors[new_pid]` maps back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedState {
    pub state: SystemState,
    pub survivors: Vec<Pid>,
}

impl DerivedState {
    /// Original pid of a process in the derived state
    #[must_use]
    pub fn original_pid(&self, derived: Pid) -> Option<Pid> {
        self.survivors.get(derived).copied()
    }

    /// Whether any survivor received a different pid
    #[must_use]
    pub fn is_renumbered(&self) -> bool {
        self.survivors
            .iter()
            .enumerate()
            .any(|(new, &old)| new != old)
    }
}

/// Remove `terminated` from `state` and return their holdings to `available`.
///
/// Pids in `terminated` that are not part of `state` are ignored; callers
/// check membership first. Conservation is preserved: whatever left the
/// allocation matrix is added to the available vector.
#[must_use]
pub fn derived_state(state: &SystemState, terminated: &PidSet) -> DerivedState {
    let mut available = state.available.clone();
    let mut processes = Vec::new();
    let mut allocation = Vec::new();
    let mut request = Vec::new();
    let mut survivors = Vec::new();

    for (pid, process) in state.processes.iter().enumerate() {
        let held = &state.allocation[pid];
        if terminated.contains(&pid) {
            for (free, &released) in available.iter_mut().zip(held) {
                *free = free.saturating_add(released);
            }
            continue;
        }
        processes.push(Process::new(survivors.len(), process.name.clone()));
        allocation.push(held.clone());
        request.push(state.request[pid].clone());
        survivors.push(pid);
    }

    DerivedState {
        state: SystemState::new(
            processes,
            state.resource_types.clone(),
            available,
            allocation,
            request,
        ),
        survivors,
    }
}

/// Result of re-running matrix detection after a hypothetical termination
#[derive(Debug, Clone)]
pub struct TerminationOutcome {
    pub derived: DerivedState,
    pub detection: MatrixResult,
}

impl TerminationOutcome {
    /// Whether the derived state is free of deadlock
    #[must_use]
    pub fn resolves(&self) -> bool {
        !self.detection.deadlocked
    }
}

/// Terminate `terminated` and check the survivors with the matrix detector.
#[must_use]
pub fn simulate_termination(state: &SystemState, terminated: &PidSet) -> TerminationOutcome {
    let derived = derived_state(state, terminated);
    let detection = detect_matrix(&derived.state);
    TerminationOutcome { derived, detection }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dlock_types::{validate, ResourceType};

    fn three_way() -> SystemState {
        SystemState::new(
            (0..3).map(|i| Process::new(i, format!("worker-{i}"))).collect(),
            vec![ResourceType::new(0, "disk", 3), ResourceType::new(1, "tape", 2)],
            vec![0, 0],
            vec![vec![2, 1], vec![1, 0], vec![0, 1]],
            vec![vec![1, 1], vec![1, 2], vec![3, 1]],
        )
    }

    #[test]
    fn test_returns_holdings_to_available() {
        let state = three_way();
        let derived = derived_state(&state, &PidSet::from([0]));

        assert_eq!(derived.state.available, vec![2, 1]);
        assert_eq!(derived.state.allocation, vec![vec![1, 0], vec![0, 1]]);
        assert_eq!(derived.survivors, vec![1, 2]);
        assert!(derived.is_renumbered());
        assert_eq!(derived.original_pid(0), Some(1));
        assert!(validate(&derived.state).is_ok());
    }

    #[test]
    fn test_survivors_keep_names() {
        let derived = derived_state(&three_way(), &PidSet::from([1]));
        assert_eq!(derived.state.processes[1].pid, 1);
        assert_eq!(derived.state.processes[1].name, "worker-2");
    }

    #[test]
    fn test_terminate_none_is_identity() {
        let state = three_way();
        let derived = derived_state(&state, &PidSet::new());
        assert_eq!(derived.state, state);
        assert!(!derived.is_renumbered());
    }

    #[test]
    fn test_terminate_all_leaves_empty_safe_state() {
        let state = three_way();
        let outcome = simulate_termination(&state, &PidSet::from([0, 1, 2]));

        assert_eq!(outcome.derived.state.process_count(), 0);
        assert_eq!(outcome.derived.state.available, vec![3, 2]);
        assert!(validate(&outcome.derived.state).is_ok());
        assert!(outcome.resolves());
    }

    #[test]
    fn test_single_termination_resolves() {
        // Killing P0 frees [2, 1]: P1 still needs 2 tapes, P2 needs 3 disks
        let outcome = simulate_termination(&three_way(), &PidSet::from([0]));
        assert!(!outcome.resolves());

        let outcome = simulate_termination(&three_way(), &PidSet::from([0, 1]));
        assert!(outcome.resolves());
    }
}

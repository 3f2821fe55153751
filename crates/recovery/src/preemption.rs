//! Preemption candidates

use dlock_errors::RecoveryError;
use dlock_types::{format_rids, PidSet, RidSet, SystemState};

use crate::check_known;
use crate::suggestion::{ActionType, PreemptionSuggestion};

/// One suggestion per deadlocked process that holds anything, ascending pid.
///
/// # Errors
///
/// Returns [`RecoveryError::UnknownProcess`] when a pid is not in `state`.
pub fn suggest_preemption_targets(
    state: &SystemState,
    deadlocked: &PidSet,
) -> Result<Vec<PreemptionSuggestion>, RecoveryError> {
    check_known(state, deadlocked)?;

    let suggestions = deadlocked
        .iter()
        .filter_map(|&pid| {
            let held = state.held_by(pid);
            if held.is_empty() {
                return None;
            }

            let resources: RidSet = held.iter().map(|&(rid, _)| rid).collect();
            let released: u64 = held.iter().map(|&(_, count)| u64::from(count)).sum();
            let names = format_rids(&resources);

            Some(PreemptionSuggestion {
                action_type: ActionType::Preempt,
                description: format!("Preempt resources from P{pid}: {names}"),
                processes: PidSet::from([pid]),
                resources,
                released_instances: released,
                explanation: format!(
                    "Preempt resources {names} from P{pid}.\n\
                     This releases {released} resource instance(s) back to the available pool.\n\
                     P{pid} would need to be rolled back and restarted later."
                ),
            })
        })
        .collect();

    Ok(suggestions)
}

#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Deadlock recovery suggestions for dlock
//!
//! Given the deadlocked processes a detector reported, this crate searches
//! for minimum-cardinality termination sets (re-running matrix detection on
//! each hypothetical post-termination state) and lists resources that could
//! be preempted from each deadlocked process instead.

pub mod combinations;
pub mod derived;
pub mod preemption;
pub mod suggestion;
pub mod termination;

pub use combinations::{binomial, combinations, Combinations};
pub use derived::{derived_state, simulate_termination, DerivedState, TerminationOutcome};
pub use preemption::suggest_preemption_targets;
pub use suggestion::{ActionType, PreemptionSuggestion, RecoveryPlan, TerminationSuggestion};
pub use termination::find_minimal_termination_set;

use dlock_errors::RecoveryError;
use dlock_types::{PidSet, SystemState};

/// Knobs for [`generate_recovery_with`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryOptions {
    /// Refuse the termination search above this many deadlocked processes
    pub max_search_processes: Option<usize>,
    pub include_preemption: bool,
}

impl Default for RecoveryOptions {
    fn default() -> Self {
        Self {
            max_search_processes: None,
            include_preemption: true,
        }
    }
}

/// Termination and preemption suggestions with no search bound.
///
/// # Errors
///
/// Returns [`RecoveryError::UnknownProcess`] when a pid is not in `state`.
pub fn generate_recovery(
    state: &SystemState,
    deadlocked: &PidSet,
) -> Result<RecoveryPlan, RecoveryError> {
    generate_recovery_with(state, deadlocked, RecoveryOptions::default())
}

/// Termination and preemption suggestions under `options`.
///
/// # Errors
///
/// Returns [`RecoveryError::UnknownProcess`] when a pid is not in `state`,
/// and [`RecoveryError::SearchLimitExceeded`] when `deadlocked` is larger
/// than `options.max_search_processes`.
pub fn generate_recovery_with(
    state: &SystemState,
    deadlocked: &PidSet,
    options: RecoveryOptions,
) -> Result<RecoveryPlan, RecoveryError> {
    check_known(state, deadlocked)?;
    if let Some(limit) = options.max_search_processes {
        if deadlocked.len() > limit {
            return Err(RecoveryError::SearchLimitExceeded {
                deadlocked: deadlocked.len(),
                limit,
            });
        }
    }

    let termination = find_minimal_termination_set(state, deadlocked)?;
    let preemption = if options.include_preemption {
        suggest_preemption_targets(state, deadlocked)?
    } else {
        Vec::new()
    };

    tracing::info!(
        deadlocked = deadlocked.len(),
        termination = termination.len(),
        preemption = preemption.len(),
        "recovery plan generated"
    );

    Ok(RecoveryPlan {
        termination,
        preemption,
    })
}

pub(crate) fn check_known(state: &SystemState, pids: &PidSet) -> Result<(), RecoveryError> {
    let process_count = state.process_count();
    match pids.iter().find(|&&pid| pid >= process_count) {
        Some(&pid) => Err(RecoveryError::UnknownProcess { pid, process_count }),
        None => Ok(()),
    }
}

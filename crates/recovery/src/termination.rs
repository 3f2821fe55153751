//! Minimal termination set search

use dlock_errors::RecoveryError;
use dlock_types::{format_pids, Pid, PidSet, SystemState};

use crate::combinations::{binomial, combinations};
use crate::derived::{simulate_termination, TerminationOutcome};
use crate::suggestion::{ActionType, TerminationSuggestion};
use crate::check_known;

/// Find every minimum-cardinality subset of `deadlocked` whose termination
/// resolves the deadlock.
///
/// Subset sizes are tried in increasing order, subsets of one size in
/// lexicographic order of pid. The search stops after the first size that
/// yields any resolving subset, so every returned suggestion has the same
/// cardinality. An empty `deadlocked` set yields no suggestions.
///
/// The search is exponential in `deadlocked.len()`; bound it with
/// [`crate::RecoveryOptions::max_search_processes`].
///
/// # Errors
///
/// Returns [`RecoveryError::UnknownProcess`] when a pid is not in `state`.
pub fn find_minimal_termination_set(
    state: &SystemState,
    deadlocked: &PidSet,
) -> Result<Vec<TerminationSuggestion>, RecoveryError> {
    check_known(state, deadlocked)?;

    let pool: Vec<Pid> = deadlocked.iter().copied().collect();
    let mut suggestions = Vec::new();

    for size in 1..=pool.len() {
        tracing::debug!(
            size,
            candidates = %binomial(pool.len(), size),
            "trying termination subsets"
        );

        for subset in combinations(&pool, size) {
            let terminated: PidSet = subset.into_iter().collect();
            let outcome = simulate_termination(state, &terminated);
            if outcome.resolves() {
                suggestions.push(termination_suggestion(&terminated, &outcome));
            }
        }

        if !suggestions.is_empty() {
            tracing::debug!(
                size,
                found = suggestions.len(),
                "minimal termination sets found"
            );
            return Ok(suggestions);
        }
    }

    Ok(suggestions)
}

fn termination_suggestion(
    terminated: &PidSet,
    outcome: &TerminationOutcome,
) -> TerminationSuggestion {
    let names = format_pids(terminated);
    let mut lines = vec![
        format!("Terminating {names} releases their allocated resources."),
        "After termination:".to_string(),
    ];

    let derived = &outcome.derived;
    if derived.survivors.is_empty() {
        lines.push("No processes remain.".to_string());
    } else {
        if derived.is_renumbered() {
            let mapping: Vec<String> = derived
                .survivors
                .iter()
                .enumerate()
                .map(|(new, old)| format!("P{old} as P{new}"))
                .collect();
            lines.push(format!("Remaining processes: {}", mapping.join(", ")));
        }
        lines.extend(outcome.detection.trace_lines());
    }

    TerminationSuggestion {
        action_type: ActionType::Terminate,
        description: format!("Terminate {} process(es): {names}", terminated.len()),
        processes: terminated.clone(),
        explanation: lines.join("\n"),
    }
}

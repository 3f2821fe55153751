//! Validate, detect and plan recovery for one state

use dlock_config::RequestBoundsPolicy;
use dlock_detect::{detect, Detection};
use dlock_errors::{Error, RecoveryError, ValidationError};
use dlock_events::{DetectionEvent, EventEmitter, FailureContext, RecoveryEvent};
use dlock_recovery::{
    generate_recovery_with, suggest_preemption_targets, RecoveryOptions, RecoveryPlan,
};
use dlock_types::{import_json, request_bound_violations, validate, Algorithm, SystemState};

use crate::{AnalysisReport, OpsCtx};

/// Run the full pipeline on `state` under `ctx.config`.
///
/// Validation failures stop the pipeline; a deadlock, or an empty recovery
/// plan, is an ordinary result.
///
/// # Errors
///
/// Returns an error if the state fails validation, if the request-bounds
/// policy is `reject` and a request exceeds its resource's instances, or if
/// recovery planning fails for a reason other than the search limit.
pub fn analyze(ctx: &OpsCtx, state: &SystemState) -> Result<AnalysisReport, Error> {
    ctx.emit_operation_started("analyze");

    match run(ctx, state) {
        Ok(report) => {
            ctx.emit_operation_completed("analyze", true);
            Ok(report)
        }
        Err(err) => {
            ctx.emit_operation_failed("analyze", err.to_string());
            Err(err)
        }
    }
}

/// Import a JSON state document and analyze it.
///
/// # Errors
///
/// Returns an import error for malformed documents or a schema version
/// mismatch, and otherwise the errors of [`analyze`].
pub fn analyze_json(ctx: &OpsCtx, json: &str) -> Result<AnalysisReport, Error> {
    let state = import_json(json).inspect_err(|err| reject(ctx, err))?;
    analyze(ctx, &state)
}

fn run(ctx: &OpsCtx, state: &SystemState) -> Result<AnalysisReport, Error> {
    if let Err(err) = validate(state) {
        let err = Error::from(err);
        reject(ctx, &err);
        return Err(err);
    }

    let mut warnings = check_request_bounds(ctx, state)?;

    let algorithm = ctx.config.detection.algorithm.resolve(state);
    ctx.emit_debug(format!(
        "selected {algorithm} ({:?} requested) for {} processes and {} resource types",
        ctx.config.detection.algorithm,
        state.process_count(),
        state.resource_count()
    ));
    if algorithm == Algorithm::Wfg && !state.is_single_instance() {
        let reason =
            "multi-instance resources present; a wait-for cycle may not imply deadlock".to_string();
        ctx.emit_detection(DetectionEvent::PreconditionNotMet {
            algorithm,
            reason: reason.clone(),
        });
        warn(ctx, &mut warnings, format!("{algorithm} forced: {reason}"), "detection");
    }

    ctx.emit_detection(DetectionEvent::Started {
        algorithm,
        processes: state.process_count(),
        resource_types: state.resource_count(),
    });
    let detection = detect(state, algorithm);
    ctx.emit_detection(DetectionEvent::Completed {
        algorithm,
        deadlocked: detection.deadlocked(),
        deadlocked_processes: detection.deadlocked_processes().iter().copied().collect(),
    });

    let recovery = if detection.deadlocked() && ctx.config.recovery.enabled {
        Some(plan_recovery(ctx, state, &detection, &mut warnings)?)
    } else {
        None
    };

    Ok(AnalysisReport {
        algorithm,
        detection,
        recovery,
        warnings,
    })
}

/// Record a tolerated anomaly in the report and on the event channel.
fn warn(ctx: &OpsCtx, warnings: &mut Vec<String>, message: String, context: &str) {
    ctx.emit_warning_with_context(message.clone(), context);
    warnings.push(message);
}

fn reject(ctx: &OpsCtx, err: &Error) {
    ctx.emit_detection(DetectionEvent::Rejected {
        failure: FailureContext::from_error(err),
    });
}

/// Apply the request-bounds policy; returns warnings to carry in the report.
fn check_request_bounds(ctx: &OpsCtx, state: &SystemState) -> Result<Vec<String>, Error> {
    let policy = ctx.config.detection.request_bounds;
    if policy == RequestBoundsPolicy::Ignore {
        return Ok(Vec::new());
    }

    let violations = request_bound_violations(state);
    if policy == RequestBoundsPolicy::Reject {
        if let Some(first) = violations.into_iter().next() {
            let err = Error::from(first);
            reject(ctx, &err);
            return Err(err);
        }
        return Ok(Vec::new());
    }

    let mut warnings = Vec::with_capacity(violations.len());
    for violation in violations {
        if let ValidationError::RequestExceedsInstances {
            process,
            resource,
            requested,
            total,
        } = violation
        {
            ctx.emit_detection(DetectionEvent::RequestExceedsInstances {
                process,
                resource,
                requested,
                total,
            });
        }
        warn(ctx, &mut warnings, violation.to_string(), "request_bounds");
    }
    Ok(warnings)
}

fn plan_recovery(
    ctx: &OpsCtx,
    state: &SystemState,
    detection: &Detection,
    warnings: &mut Vec<String>,
) -> Result<RecoveryPlan, Error> {
    let config = &ctx.config.recovery;
    let deadlocked = detection.deadlocked_processes();
    ctx.emit_recovery(RecoveryEvent::Started {
        deadlocked_processes: deadlocked.iter().copied().collect(),
    });

    let options = RecoveryOptions {
        max_search_processes: Some(config.max_search_processes),
        include_preemption: config.include_preemption,
    };
    let plan = match generate_recovery_with(state, deadlocked, options) {
        Ok(plan) => plan,
        Err(RecoveryError::SearchLimitExceeded { deadlocked: count, limit }) => {
            ctx.emit_recovery(RecoveryEvent::SearchLimitExceeded {
                deadlocked: count,
                limit,
            });
            let message = RecoveryError::SearchLimitExceeded {
                deadlocked: count,
                limit,
            }
            .to_string();
            warn(ctx, warnings, message, "recovery");
            let preemption = if config.include_preemption {
                suggest_preemption_targets(state, deadlocked)?
            } else {
                Vec::new()
            };
            RecoveryPlan {
                termination: Vec::new(),
                preemption,
            }
        }
        Err(err) => return Err(err.into()),
    };

    ctx.emit_recovery(RecoveryEvent::Completed {
        termination_suggestions: plan.termination.len(),
        preemption_suggestions: plan.preemption.len(),
        minimal_set_size: plan.minimal_set_size(),
    });
    Ok(plan)
}

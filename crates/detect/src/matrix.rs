//! Work/Finish detector for multi-instance resources
//!
//! Simulates optimistic completion: any process whose outstanding request
//! fits in the current work vector is assumed to finish and return what it
//! holds. Whatever never finishes is deadlocked.

use dlock_types::{format_pids, format_vector, Pid, PidSet, SystemState};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry of the matrix detector's explanation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum MatrixStep {
    SystemSize {
        processes: usize,
        resource_types: usize,
    },
    Initialized {
        work: Vec<u32>,
    },
    Pass {
        number: usize,
    },
    Satisfiable {
        pid: Pid,
        request: Vec<u32>,
        work: Vec<u32>,
    },
    Released {
        pid: Pid,
        allocation: Vec<u32>,
        work: Vec<u32>,
    },
    Blocked {
        pid: Pid,
        request: Vec<u32>,
        work: Vec<u32>,
    },
    NoProgress,
    Finish {
        finish: Vec<bool>,
    },
    Safe {
        execution_order: Vec<Pid>,
    },
    Deadlocked {
        processes: PidSet,
    },
}

impl fmt::Display for MatrixStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SystemSize {
                processes,
                resource_types,
            } => write!(
                f,
                "System: {processes} processes, {resource_types} resource types"
            ),
            Self::Initialized { work } => write!(f, "Work = Available = {}", format_vector(work)),
            Self::Pass { number } => write!(f, "Pass {number}:"),
            Self::Satisfiable { pid, request, work } => write!(
                f,
                "  P{pid}: Request {} <= Work {}, can finish",
                format_vector(request),
                format_vector(work)
            ),
            Self::Released {
                pid,
                allocation,
                work,
            } => write!(
                f,
                "  P{pid} releases {}, Work = {}",
                format_vector(allocation),
                format_vector(work)
            ),
            Self::Blocked { pid, request, work } => write!(
                f,
                "  P{pid}: Request {} exceeds Work {}, must wait",
                format_vector(request),
                format_vector(work)
            ),
            Self::NoProgress => write!(f, "  No process can proceed."),
            Self::Finish { finish } => {
                let flags: Vec<&str> = finish
                    .iter()
                    .map(|&done| if done { "T" } else { "F" })
                    .collect();
                write!(f, "Finish = [{}]", flags.join(", "))
            }
            Self::Safe { execution_order } => write!(
                f,
                "All processes can finish. Safe sequence: {}",
                format_pids(execution_order)
            ),
            Self::Deadlocked { processes } => write!(
                f,
                "System is DEADLOCKED. Deadlocked processes: {}",
                format_pids(processes)
            ),
        }
    }
}

/// Outcome of [`detect_matrix`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixResult {
    pub deadlocked: bool,
    pub deadlocked_processes: PidSet,
    /// `finish[i]`: whether process `i` can complete under the simulation
    pub finish: Vec<bool>,
    /// Completion order; a safe sequence when the state is not deadlocked
    pub execution_order: Vec<Pid>,
    pub trace: Vec<MatrixStep>,
}

impl MatrixResult {
    /// Human-readable rendering of the trace
    #[must_use]
    pub fn trace_lines(&self) -> Vec<String> {
        self.trace.iter().map(ToString::to_string).collect()
    }
}

fn fits(request: &[u32], work: &[u32]) -> bool {
    request.iter().zip(work).all(|(need, have)| need <= have)
}

/// Run Work/Finish detection on a validated state.
///
/// Processes are scanned in index order on every pass and a satisfiable
/// process is serviced immediately, so later processes in the same pass see
/// the enlarged work vector. Passes repeat until one makes no progress.
#[must_use]
pub fn detect_matrix(state: &SystemState) -> MatrixResult {
    let n = state.process_count();
    let mut work = state.available.clone();
    let mut finish = vec![false; n];
    let mut execution_order = Vec::with_capacity(n);

    let mut trace = vec![
        MatrixStep::SystemSize {
            processes: n,
            resource_types: state.resource_count(),
        },
        MatrixStep::Initialized { work: work.clone() },
    ];

    let mut pass = 0;
    while execution_order.len() < n {
        pass += 1;
        trace.push(MatrixStep::Pass { number: pass });
        let mut progressed = false;

        for pid in 0..n {
            if finish[pid] {
                continue;
            }
            let request = &state.request[pid];
            if !fits(request, &work) {
                trace.push(MatrixStep::Blocked {
                    pid,
                    request: request.clone(),
                    work: work.clone(),
                });
                continue;
            }

            trace.push(MatrixStep::Satisfiable {
                pid,
                request: request.clone(),
                work: work.clone(),
            });
            let allocation = &state.allocation[pid];
            for (have, &held) in work.iter_mut().zip(allocation) {
                *have = have.saturating_add(held);
            }
            trace.push(MatrixStep::Released {
                pid,
                allocation: allocation.clone(),
                work: work.clone(),
            });

            finish[pid] = true;
            execution_order.push(pid);
            progressed = true;
        }

        if !progressed {
            trace.push(MatrixStep::NoProgress);
            break;
        }
    }

    trace.push(MatrixStep::Finish {
        finish: finish.clone(),
    });

    let deadlocked_processes: PidSet = finish
        .iter()
        .enumerate()
        .filter(|&(_, &done)| !done)
        .map(|(pid, _)| pid)
        .collect();

    if deadlocked_processes.is_empty() {
        trace.push(MatrixStep::Safe {
            execution_order: execution_order.clone(),
        });
    } else {
        trace.push(MatrixStep::Deadlocked {
            processes: deadlocked_processes.clone(),
        });
    }

    tracing::debug!(
        passes = pass,
        finished = execution_order.len(),
        deadlocked = deadlocked_processes.len(),
        "matrix detection finished"
    );

    MatrixResult {
        deadlocked: !deadlocked_processes.is_empty(),
        deadlocked_processes,
        finish,
        execution_order,
        trace,
    }
}

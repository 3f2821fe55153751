#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! High-level operations orchestration for dlock
//!
//! This crate strings the engine together for a caller: validate a state,
//! pick a detector under the configured policy, run it, and plan recovery
//! when a deadlock is found. Progress is reported as domain events through
//! the context's event sender.

mod analyze;
mod context;
mod report;

pub use analyze::{analyze, analyze_json};
pub use context::{OpsContextBuilder, OpsCtx};
pub use report::AnalysisReport;

//! Combined analysis output

use dlock_detect::Detection;
use dlock_errors::Error;
use dlock_recovery::RecoveryPlan;
use dlock_types::{Algorithm, PidSet};
use serde::Serialize;

/// Detector result plus recovery plan, as handed to a renderer.
///
/// Serializes as the detector's own fields with `algorithm`, `recovery`
/// and (when present) `warnings` alongside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    pub algorithm: Algorithm,
    #[serde(flatten)]
    pub detection: Detection,
    /// Present only when the state is deadlocked and recovery is enabled
    pub recovery: Option<RecoveryPlan>,
    /// Tolerated anomalies: oversized requests, a forced detector
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl AnalysisReport {
    #[must_use]
    pub fn deadlocked(&self) -> bool {
        self.detection.deadlocked()
    }

    #[must_use]
    pub fn deadlocked_processes(&self) -> &PidSet {
        self.detection.deadlocked_processes()
    }

    /// Convert to pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReportSerialization`] if serialization fails.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(|e| Error::ReportSerialization {
            message: e.to_string(),
        })
    }

    /// Human-readable account: warnings, detector trace, then recovery options
    #[must_use]
    pub fn trace_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .warnings
            .iter()
            .map(|w| format!("Warning: {w}"))
            .collect();
        lines.push(format!("Algorithm: {}", self.algorithm));
        lines.extend(self.detection.trace_lines());

        if let Some(plan) = &self.recovery {
            lines.push("Recovery options:".to_string());
            if plan.termination.is_empty() {
                lines.push("  No termination set searched or found.".to_string());
            }
            for suggestion in &plan.termination {
                lines.push(format!("  {}", suggestion.description));
            }
            for suggestion in &plan.preemption {
                lines.push(format!("  {}", suggestion.description));
            }
        }

        lines
    }
}

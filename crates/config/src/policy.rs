//! Detection policy switches

use dlock_types::{Algorithm, SystemState};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which detector to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlgorithmChoice {
    /// WFG when every resource type is single-instance, Matrix otherwise
    #[default]
    Auto,
    Wfg,
    Matrix,
}

impl AlgorithmChoice {
    /// Resolve the choice against a concrete state
    #[must_use]
    pub fn resolve(self, state: &SystemState) -> Algorithm {
        match self {
            Self::Auto => Algorithm::for_state(state),
            Self::Wfg => Algorithm::Wfg,
            Self::Matrix => Algorithm::Matrix,
        }
    }
}

impl FromStr for AlgorithmChoice {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "wfg" => Ok(Self::Wfg),
            "matrix" => Ok(Self::Matrix),
            _ => Err(()),
        }
    }
}

/// Handling of requests that exceed a resource's total instances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestBoundsPolicy {
    /// Run detection without looking
    Ignore,
    /// Run detection and report each offending request
    #[default]
    Warn,
    /// Treat the first offending request as a validation error
    Reject,
}

impl FromStr for RequestBoundsPolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ignore" => Ok(Self::Ignore),
            "warn" => Ok(Self::Warn),
            "reject" => Ok(Self::Reject),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_resolution() {
        let mut state = SystemState::blank(1, 1);
        state.available = vec![1];
        assert_eq!(AlgorithmChoice::Auto.resolve(&state), Algorithm::Wfg);

        state.resource_types[0].instances = 4;
        state.available = vec![4];
        assert_eq!(AlgorithmChoice::Auto.resolve(&state), Algorithm::Matrix);
        assert_eq!(AlgorithmChoice::Wfg.resolve(&state), Algorithm::Wfg);
    }

    #[test]
    fn test_parse() {
        assert_eq!("matrix".parse(), Ok(AlgorithmChoice::Matrix));
        assert!("bankers".parse::<AlgorithmChoice>().is_err());
        assert_eq!("reject".parse(), Ok(RequestBoundsPolicy::Reject));
    }
}

//! Machine-readable summaries of proof runs.

use serde::{Deserialize, Serialize};

use crate::runtime::executor::ProofContext;
use crate::syntax::ast::Proof;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub step: u32,
    pub action: String,
    pub succeeded: bool,
    pub error: Option<String>,
}

/// Summary of one proof execution, built from the run's context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofReport {
    pub target: String,
    pub given: Vec<String>,
    pub using: Vec<String>,
    pub succeeded: bool,
    /// Names derived during the run, in derivation order.
    pub derived: Vec<String>,
    pub steps: Vec<StepReport>,
}

impl ProofReport {
    pub fn from_run(proof: &Proof, succeeded: bool, context: &ProofContext) -> Self {
        ProofReport {
            target: proof.prove.clone(),
            given: proof.given.clone(),
            using: proof.using.clone(),
            succeeded,
            derived: context.derived.keys().cloned().collect(),
            steps: context
                .history()
                .iter()
                .map(|record| StepReport {
                    step: record.step,
                    action: record.action.clone(),
                    succeeded: record.result,
                    error: record.error.clone(),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProofReport {
        ProofReport {
            target: "q".to_string(),
            given: vec!["p".to_string()],
            using: vec!["ModusPonens".to_string()],
            succeeded: true,
            derived: vec!["q".to_string()],
            steps: vec![
                StepReport {
                    step: 1,
                    action: "ASSERT:p IMPLIES q".to_string(),
                    succeeded: true,
                    error: None,
                },
                StepReport {
                    step: 2,
                    action: "INFER:q VIA:ModusPonens".to_string(),
                    succeeded: true,
                    error: None,
                },
            ],
        }
    }

    #[test]
    fn report_round_trips_through_json() {
        let report = sample();
        let json = report.to_json().unwrap();
        let parsed: ProofReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn json_contains_step_outcomes() {
        let json = sample().to_json().unwrap();
        assert!(json.contains("\"target\": \"q\""));
        assert!(json.contains("INFER:q VIA:ModusPonens"));
    }
}

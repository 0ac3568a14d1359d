//! Report aggregation and the success output artifact

use crate::error::{AssertionError, AssertionResult};
use crate::types::{Assertion, EvaluationOutcome, Report};
use std::io::Write;

const FAILURE_PREFIX: &str = "[POLICY ASSERTION FAILED]";

/// Message describing one mismatched simulation result
pub fn failure_message(assertion: &Assertion, outcome: &EvaluationOutcome) -> String {
    let detail = format!(
        "( for {} [ {} ]: expected '{}', but got '{}' )",
        outcome.eval_action_name,
        outcome.eval_resource_name,
        assertion.expected_result,
        outcome.eval_decision
    );
    if assertion.comment.is_empty() {
        format!("{FAILURE_PREFIX} {detail}")
    } else {
        format!("{FAILURE_PREFIX} {} {detail}", assertion.comment)
    }
}

impl Report {
    pub fn failure_count(&self) -> usize {
        self.messages.len()
    }

    pub fn is_success(&self) -> bool {
        self.messages.is_empty()
    }

    /// Count a classified result, keeping a message when it did not match
    pub fn record(&mut self, assertion: &Assertion, outcome: &EvaluationOutcome) {
        self.evaluated += 1;
        if !outcome.matches_expectation {
            self.messages.push(failure_message(assertion, outcome));
        }
    }

    /// Turn accumulated mismatches into the run's error
    pub fn into_result(self) -> AssertionResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(AssertionError::Failed(self))
        }
    }
}

/// The success artifact: the validated policy re-wrapped for the next
/// pipeline step, e.g. `{"policy_json": "{\"Version\": ...}"}`.
pub fn output_artifact(policy_json: &str) -> AssertionResult<String> {
    let escaped = serde_json::to_string(policy_json)
        .map_err(|e| AssertionError::parse(format!("Failed to serialize policy_json; {e}")))?;
    Ok(format!("{{\"policy_json\": {escaped}}}"))
}

pub fn write_output<W: Write>(policy_json: &str, mut out: W) -> AssertionResult<()> {
    out.write_all(output_artifact(policy_json)?.as_bytes())?;
    out.flush()?;
    Ok(())
}

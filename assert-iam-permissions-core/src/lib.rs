//! This crate provides the core logic of assert-iam-permissions:
//! - Input normalization (stdin JSON in its several encodings, flag values)
//! - Policy document length checks
//! - Assertion evaluation through the IAM policy simulator
//! - Failure reporting and the success output artifact
//!

mod aws;
pub mod commands;
mod config;
mod error;
pub mod parsing;
pub mod simulation;
mod types;

// Re-exports for a small, focused public API
pub use aws::{AwsError, AwsResult};
pub use commands::{
    check_length, output_artifact, run, AssertionService, AwsConnector, SimulatorConnector,
};
pub use config::{ResolvedRun, RunConfig};
pub use error::{AssertionError, AssertionResult};
pub use parsing::{parse_inputs, PartialInputs};
pub use simulation::{ContextEntry, PolicySimulator, SimulationRequest, SimulationResult};
pub use types::{
    Assertion, ContextEntryValue, EvaluationOutcome, ExpectedResult, Inputs, Report,
    DEFAULT_CONTEXT_KEY_TYPE, DENY_SUFFIX,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsing_sample_inputs() {
        let input = r#"{
            "assertions": [
                {
                    "action_names": ["s3:ListBucket"],
                    "resource_arns": ["arn:aws:s3:::my-bucket"],
                    "expected_result": "allowed"
                }
            ],
            "max_length": 1024,
            "policy_json": "{\"Version\": \"2012-10-17\"}"
        }"#;
        let parsed = parse_inputs(input.as_bytes()).expect("should parse");
        assert_eq!(parsed.assertions.len(), 1);
        assert_eq!(parsed.assertions[0].action_names, vec!["s3:ListBucket"]);
        assert_eq!(parsed.policy_json, "{\"Version\": \"2012-10-17\"}");
        assert_eq!(parsed.max_length, Some(1024));
    }
}

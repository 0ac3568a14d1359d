//! End-to-end run: resolve inputs, check length, evaluate, emit the artifact

use super::length::check_length;
use super::report::write_output;
use super::service::AssertionService;
use crate::config::RunConfig;
use crate::error::AssertionResult;
use crate::types::Report;
use async_trait::async_trait;
use log::info;
use std::io::{Read, Write};

/// Creates the service for a run once its inputs are known.
#[async_trait]
pub trait SimulatorConnector: Send + Sync {
    async fn connect(&self, assume_role_arn: Option<&str>) -> AssertionResult<AssertionService>;
}

/// Connects to the AWS IAM policy simulator.
pub struct AwsConnector;

#[async_trait]
impl SimulatorConnector for AwsConnector {
    async fn connect(&self, assume_role_arn: Option<&str>) -> AssertionResult<AssertionService> {
        AssertionService::new(assume_role_arn).await
    }
}

/// Execute one assertion run.
///
/// The output artifact is written to `stdout` only when the length check
/// passes and every simulation result matches. Any other outcome is returned
/// as an error and nothing is written.
pub async fn run<R: Read, W: Write>(
    config: &RunConfig,
    stdin: R,
    stdout: W,
    connector: &dyn SimulatorConnector,
) -> AssertionResult<Report> {
    let resolved = config.resolve(stdin)?;
    let inputs = &resolved.inputs;
    info!(
        "Asserting {} statement(s) against the policy document",
        inputs.assertions.len()
    );

    // Checked before any AWS call
    if let Some(max_length) = resolved.max_length {
        check_length(max_length, &inputs.policy_json)?;
    }

    let service = connector
        .connect(resolved.assume_role_arn.as_deref())
        .await?;
    let report = service.assert_permissions(inputs).await?;
    info!(
        "All {} simulation result(s) matched their assertions",
        report.evaluated
    );

    write_output(&inputs.policy_json, stdout)?;
    Ok(report)
}

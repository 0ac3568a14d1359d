//! AWS IAM policy simulator client
//!
//! Wraps `SimulateCustomPolicy`, following `Marker` pagination until every
//! evaluation result has been collected.

use crate::aws::{AwsError, AwsResult};
use crate::simulation::{PolicySimulator, SimulationRequest, SimulationResult};
use async_trait::async_trait;
use aws_sdk_iam::error::DisplayErrorContext;
use aws_sdk_iam::operation::simulate_custom_policy::builders::SimulateCustomPolicyFluentBuilder;
use aws_sdk_iam::types::{ContextEntry, ContextKeyTypeEnum, EvaluationResult};
use aws_sdk_iam::Client as IamClient;
use log::trace;

pub struct AwsIamSimulator {
    client: IamClient,
}

impl AwsIamSimulator {
    pub fn new(client: IamClient) -> Self {
        Self { client }
    }

    fn simulate_custom_policy(
        &self,
        request: &SimulationRequest,
        marker: Option<String>,
    ) -> SimulateCustomPolicyFluentBuilder {
        self.client
            .simulate_custom_policy()
            .set_policy_input_list(Some(request.policy_documents.clone()))
            .set_action_names(Some(request.action_names.clone()))
            .set_resource_arns(non_empty_list(&request.resource_arns))
            .set_caller_arn(request.caller_arn.clone())
            .set_resource_owner(request.resource_owner.clone())
            .set_resource_policy(request.resource_policy.clone())
            .set_resource_handling_option(request.resource_handling_option.clone())
            .set_context_entries(context_entries(request))
            .set_marker(marker)
    }
}

#[async_trait]
impl PolicySimulator for AwsIamSimulator {
    async fn simulate(&self, request: &SimulationRequest) -> AwsResult<Vec<SimulationResult>> {
        let mut results = Vec::new();
        let mut marker = None;

        loop {
            let response = self
                .simulate_custom_policy(request, marker.take())
                .send()
                .await
                .map_err(|e| {
                    AwsError::IamError(format!(
                        "Failed to simulate custom policy for {:?}: {}",
                        request.action_names,
                        DisplayErrorContext(&e)
                    ))
                })?;

            results.extend(response.evaluation_results().iter().map(to_simulation_result));

            marker = next_marker(response.is_truncated(), response.marker());
            if marker.is_none() {
                break;
            }
            trace!("Simulation results truncated, continuing from marker");
        }

        Ok(results)
    }
}

/// Marker for the next page, or `None` when the result set is complete
fn next_marker(is_truncated: bool, marker: Option<&str>) -> Option<String> {
    match marker {
        Some(next) if is_truncated && !next.is_empty() => Some(next.to_string()),
        _ => None,
    }
}

// The simulator treats an absent resource list as "*"; an empty one is rejected.
fn non_empty_list(values: &[String]) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values.to_vec())
    }
}

fn context_entries(request: &SimulationRequest) -> Option<Vec<ContextEntry>> {
    if request.context_entries.is_empty() {
        return None;
    }
    Some(
        request
            .context_entries
            .iter()
            .map(|entry| {
                ContextEntry::builder()
                    .context_key_name(&entry.name)
                    .set_context_key_values(Some(entry.values.clone()))
                    .context_key_type(ContextKeyTypeEnum::from(entry.key_type.as_str()))
                    .build()
            })
            .collect(),
    )
}

fn to_simulation_result(result: &EvaluationResult) -> SimulationResult {
    SimulationResult::new(
        result.eval_action_name(),
        result.eval_resource_name().unwrap_or_default(),
        result.eval_decision().as_str(),
    )
}

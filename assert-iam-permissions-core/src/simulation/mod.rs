//! Contract with the policy simulation service.
//!
//! [`PolicySimulator`] is the single integration point with the remote
//! simulator. The AWS implementation lives in `aws::iam_client`; tests plug in
//! their own.

use crate::aws::AwsResult;
use crate::types::{Assertion, EvaluationOutcome};
use async_trait::async_trait;

/// A simulated condition key and its values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextEntry {
    pub name: String,
    pub values: Vec<String>,
    pub key_type: String,
}

/// One simulation call for one assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationRequest {
    pub action_names: Vec<String>,
    pub resource_arns: Vec<String>,
    /// Never `Some("")`.
    pub caller_arn: Option<String>,
    /// Always exactly one document: the policy under test.
    pub policy_documents: Vec<String>,
    pub resource_owner: Option<String>,
    pub resource_policy: Option<String>,
    pub resource_handling_option: Option<String>,
    pub context_entries: Vec<ContextEntry>,
}

impl SimulationRequest {
    /// Build the request that checks `assertion` against `policy_json`
    pub fn for_assertion(assertion: &Assertion, policy_json: &str) -> Self {
        let context_entries = assertion
            .context_entries
            .iter()
            .map(|(name, value)| ContextEntry {
                name: name.clone(),
                values: value.values.clone(),
                key_type: value.key_type().to_string(),
            })
            .collect();

        Self {
            action_names: assertion.action_names.clone(),
            resource_arns: assertion.resource_arns.clone(),
            caller_arn: non_empty(assertion.caller_arn.as_deref()),
            policy_documents: vec![policy_json.to_string()],
            resource_owner: non_empty(assertion.resource_owner.as_deref()),
            resource_policy: non_empty(assertion.resource_policy.as_deref()),
            resource_handling_option: non_empty(assertion.resource_handling_option.as_deref()),
            context_entries,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Decision returned for one action/resource pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationResult {
    pub eval_action_name: String,
    pub eval_resource_name: String,
    pub eval_decision: String,
}

impl SimulationResult {
    pub fn new(
        eval_action_name: impl Into<String>,
        eval_resource_name: impl Into<String>,
        eval_decision: impl Into<String>,
    ) -> Self {
        Self {
            eval_action_name: eval_action_name.into(),
            eval_resource_name: eval_resource_name.into(),
            eval_decision: eval_decision.into(),
        }
    }

    /// Classify this result against the assertion that produced it
    pub fn classify(self, assertion: &Assertion) -> EvaluationOutcome {
        let matches_expectation = assertion.expected_result.matches(&self.eval_decision);
        EvaluationOutcome {
            eval_action_name: self.eval_action_name,
            eval_resource_name: self.eval_resource_name,
            eval_decision: self.eval_decision,
            matches_expectation,
        }
    }
}

/// Evaluates a policy against a hypothetical request.
///
/// Implementations return every result for the request, in the order the
/// service produced them. Any error is treated as fatal for the whole run.
#[async_trait]
pub trait PolicySimulator: Send + Sync {
    async fn simulate(&self, request: &SimulationRequest) -> AwsResult<Vec<SimulationResult>>;
}

#[cfg(test)]
pub(crate) mod stub {
    use super::*;
    use std::sync::{Arc, Mutex};

    type Respond = dyn Fn(&SimulationRequest) -> AwsResult<Vec<SimulationResult>> + Send + Sync;

    /// In-process simulator that records every request it receives.
    pub(crate) struct StubSimulator {
        respond: Box<Respond>,
        pub(crate) requests: Arc<Mutex<Vec<SimulationRequest>>>,
    }

    impl StubSimulator {
        pub(crate) fn new(
            respond: impl Fn(&SimulationRequest) -> AwsResult<Vec<SimulationResult>>
                + Send
                + Sync
                + 'static,
        ) -> Self {
            Self {
                respond: Box::new(respond),
                requests: Arc::default(),
            }
        }

        /// Returns `decision` for every action/resource pair of a request
        pub(crate) fn deciding(decision: &'static str) -> Self {
            Self::new(move |request| Ok(cross(request, decision)))
        }
    }

    pub(crate) fn cross(request: &SimulationRequest, decision: &str) -> Vec<SimulationResult> {
        let resources = if request.resource_arns.is_empty() {
            vec!["*".to_string()]
        } else {
            request.resource_arns.clone()
        };
        request
            .action_names
            .iter()
            .flat_map(|action| {
                resources
                    .iter()
                    .map(move |resource| SimulationResult::new(action, resource, decision))
            })
            .collect()
    }

    #[async_trait]
    impl PolicySimulator for StubSimulator {
        async fn simulate(&self, request: &SimulationRequest) -> AwsResult<Vec<SimulationResult>> {
            self.requests
                .lock()
                .expect("request log poisoned")
                .push(request.clone());
            (self.respond)(request)
        }
    }
}

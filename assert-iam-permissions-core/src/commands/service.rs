//! Assertion service layer
//!
//! The service owns the policy simulator for one run and exposes the
//! high-level operations (evaluate, assert) used by the CLI adapter.

use crate::aws::iam_client::AwsIamSimulator;
use crate::error::AssertionResult;
use crate::simulation::PolicySimulator;
use crate::types::{Inputs, Report};

/// Main service struct: holds the simulator and runs assertions through it
pub struct AssertionService {
    pub(crate) simulator: Box<dyn PolicySimulator>,
}

impl AssertionService {
    /// Create a service backed by the AWS IAM policy simulator
    ///
    /// AWS configuration is loaded with the default credential provider
    /// chain. When `assume_role_arn` is set, the simulator is called with
    /// credentials for that role.
    ///
    /// # Errors
    ///
    /// Returns an error if the role cannot be assumed.
    pub async fn new(assume_role_arn: Option<&str>) -> AssertionResult<Self> {
        let client = crate::aws::iam_client(assume_role_arn).await?;
        Ok(Self::with_simulator(AwsIamSimulator::new(client)))
    }

    /// Create a service around any simulator implementation
    pub fn with_simulator(simulator: impl PolicySimulator + 'static) -> Self {
        Self {
            simulator: Box::new(simulator),
        }
    }

    /// Evaluate `inputs` and fail with the aggregated report on any mismatch
    pub async fn assert_permissions(&self, inputs: &Inputs) -> AssertionResult<Report> {
        self.evaluate(&inputs.assertions, &inputs.policy_json)
            .await?
            .into_result()
    }

    // evaluate() is implemented in evaluate.rs
}

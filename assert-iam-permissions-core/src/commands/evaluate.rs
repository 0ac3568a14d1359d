//! Assertion evaluation against the policy simulator

use crate::error::AssertionResult;
use crate::simulation::SimulationRequest;
use crate::types::{Assertion, Report};
use log::{debug, trace};

impl super::service::AssertionService {
    /// Simulate every assertion against `policy_json` and collect mismatches.
    ///
    /// Assertions are simulated one at a time, in order. A simulator error
    /// aborts the pass immediately; mismatches never do, they are gathered
    /// into the returned [`Report`].
    pub async fn evaluate(
        &self,
        assertions: &[Assertion],
        policy_json: &str,
    ) -> AssertionResult<Report> {
        let mut report = Report::default();

        for (index, assertion) in assertions.iter().enumerate() {
            let request = SimulationRequest::for_assertion(assertion, policy_json);
            debug!(
                "Simulating assertion #{} ({}): actions={:?} resources={:?} context_keys={}",
                index + 1,
                assertion.expected_result,
                request.action_names,
                request.resource_arns,
                request.context_entries.len()
            );

            let results = self.simulator.simulate(&request).await?;

            for result in results {
                let outcome = result.classify(assertion);
                trace!(
                    "{} [ {} ] -> {} (expected {}, match: {})",
                    outcome.eval_action_name,
                    outcome.eval_resource_name,
                    outcome.eval_decision,
                    assertion.expected_result,
                    outcome.matches_expectation
                );
                report.record(assertion, &outcome);
            }
        }

        Ok(report)
    }
}

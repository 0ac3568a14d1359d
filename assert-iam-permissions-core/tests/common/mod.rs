#![allow(dead_code)]

use assert_iam_permissions_core::{
    AssertionResult, AssertionService, AwsResult, PolicySimulator, SimulationRequest,
    SimulationResult, SimulatorConnector,
};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

pub const TEST_POLICY: &str = r#"
{
	"Version": "2012-10-17",
	"Statement": [
			{
					"Sid": "",
					"Effect": "Allow",
					"Action": [
							"s3:PutObject",
							"s3:GetObject",
							"s3:DeleteObject"
					],
					"Resource": [
							"arn:aws:s3:::my-bucket/bucket-path/*",
							"arn:aws:s3:::my-bucket/bucket-path"
					]
			},
			{
					"Sid": "",
					"Effect": "Allow",
					"Action": "s3:ListBucket",
					"Resource": "arn:aws:s3:::my-bucket"
			},
			{
					"Sid": "",
					"Effect": "Allow",
					"Action": "ec2:RunInstances",
					"Resource": "*",
					"Condition": {
							"ForAllValues:StringLike": {
									"aws:RequestTag/application-group": "important-stuff"
							}
					}
			},
			{
					"Sid": "",
					"Effect": "Deny",
					"Action": "s3:DeleteBucket",
					"Resource": "*"
			}
	]
}
"#;

/// One canned rule of the scripted simulator.
pub struct Rule {
    pub effect: &'static str,
    pub action: &'static str,
    pub resource: &'static str,
    pub condition: Option<(&'static str, &'static str)>,
}

impl Rule {
    fn applies(&self, action: &str, resource: &str, request: &SimulationRequest) -> bool {
        if self.action != action || (self.resource != "*" && self.resource != resource) {
            return false;
        }
        match self.condition {
            None => true,
            Some((key, value)) => request
                .context_entries
                .iter()
                .any(|entry| entry.name == key && entry.values.iter().any(|v| v == value)),
        }
    }
}

/// Rules mirroring [`TEST_POLICY`]
pub fn test_policy_rules() -> Vec<Rule> {
    let allow = |action, resource| Rule {
        effect: "Allow",
        action,
        resource,
        condition: None,
    };
    vec![
        allow("s3:GetObject", "arn:aws:s3:::my-bucket/bucket-path/*"),
        allow("s3:PutObject", "arn:aws:s3:::my-bucket/bucket-path/*"),
        allow("s3:ListBucket", "arn:aws:s3:::my-bucket"),
        Rule {
            effect: "Allow",
            action: "ec2:RunInstances",
            resource: "*",
            condition: Some(("aws:RequestTag/application-group", "important-stuff")),
        },
        Rule {
            effect: "Deny",
            action: "s3:DeleteBucket",
            resource: "*",
            condition: None,
        },
    ]
}

/// Simulator answering from a fixed rule table, recording every request.
pub struct ScriptedSimulator {
    rules: Vec<Rule>,
    pub requests: Arc<Mutex<Vec<SimulationRequest>>>,
}

impl ScriptedSimulator {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules,
            requests: Arc::default(),
        }
    }

    fn decide(&self, action: &str, resource: &str, request: &SimulationRequest) -> &'static str {
        let matching: Vec<&Rule> = self
            .rules
            .iter()
            .filter(|rule| rule.applies(action, resource, request))
            .collect();
        if matching.iter().any(|rule| rule.effect == "Deny") {
            "explicitDeny"
        } else if matching.is_empty() {
            "implicitDeny"
        } else {
            "allowed"
        }
    }
}

#[async_trait]
impl PolicySimulator for ScriptedSimulator {
    async fn simulate(&self, request: &SimulationRequest) -> AwsResult<Vec<SimulationResult>> {
        self.requests
            .lock()
            .expect("request log poisoned")
            .push(request.clone());

        let resources = if request.resource_arns.is_empty() {
            vec!["*".to_string()]
        } else {
            request.resource_arns.clone()
        };
        let mut results = Vec::new();
        for action in &request.action_names {
            for resource in &resources {
                results.push(SimulationResult::new(
                    action,
                    resource,
                    self.decide(action, resource, request),
                ));
            }
        }
        Ok(results)
    }
}

/// Connector handing out services backed by [`ScriptedSimulator`]
#[derive(Default)]
pub struct ScriptedConnector {
    pub requests: Arc<Mutex<Vec<SimulationRequest>>>,
}

#[async_trait]
impl SimulatorConnector for ScriptedConnector {
    async fn connect(&self, _assume_role_arn: Option<&str>) -> AssertionResult<AssertionService> {
        let mut simulator = ScriptedSimulator::new(test_policy_rules());
        simulator.requests = Arc::clone(&self.requests);
        Ok(AssertionService::with_simulator(simulator))
    }
}

//! Shared data types: assertions, canonical inputs, evaluation outcomes and reports

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// Context key type used when an entry does not name one.
pub const DEFAULT_CONTEXT_KEY_TYPE: &str = "string";

/// Decision suffix shared by every deny sub-state (`implicitDeny`, `explicitDeny`).
pub const DENY_SUFFIX: &str = "Deny";

/// Expected outcome of a simulated request.
///
/// `deny` and `denied` accept any deny sub-state; the remaining values must
/// match the simulator's decision exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum ExpectedResult {
    #[serde(rename = "allowed")]
    Allowed,
    #[serde(rename = "implicitDeny")]
    ImplicitDeny,
    #[serde(rename = "explicitDeny")]
    ExplicitDeny,
    #[serde(rename = "deny")]
    Deny,
    #[serde(rename = "denied")]
    Denied,
}

impl ExpectedResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allowed => "allowed",
            Self::ImplicitDeny => "implicitDeny",
            Self::ExplicitDeny => "explicitDeny",
            Self::Deny => "deny",
            Self::Denied => "denied",
        }
    }

    pub fn is_deny_alias(&self) -> bool {
        matches!(self, Self::Deny | Self::Denied)
    }

    /// Whether a simulator decision satisfies this expectation
    pub fn matches(&self, decision: &str) -> bool {
        if self.is_deny_alias() {
            decision.ends_with(DENY_SUFFIX)
        } else {
            decision == self.as_str()
        }
    }
}

impl fmt::Display for ExpectedResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values for one simulated condition key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "ContextEntryEncoding")]
pub struct ContextEntryValue {
    pub key_type: Option<String>,
    pub values: Vec<String>,
}

impl ContextEntryValue {
    pub fn new(key_type: Option<&str>, values: Vec<String>) -> Self {
        Self {
            key_type: key_type.map(str::to_string),
            values,
        }
    }

    /// The key type sent to the simulator, `string` when unset or empty
    pub fn key_type(&self) -> &str {
        match self.key_type.as_deref() {
            Some(key_type) if !key_type.is_empty() => key_type,
            _ => DEFAULT_CONTEXT_KEY_TYPE,
        }
    }
}

// Older inputs give a context entry as a bare list of string values.
#[derive(Deserialize)]
#[serde(untagged)]
enum ContextEntryEncoding {
    Values(Vec<String>),
    Typed {
        #[serde(rename = "type", default)]
        key_type: Option<String>,
        #[serde(default)]
        values: Vec<String>,
    },
}

impl From<ContextEntryEncoding> for ContextEntryValue {
    fn from(encoding: ContextEntryEncoding) -> Self {
        match encoding {
            ContextEntryEncoding::Values(values) => Self {
                key_type: None,
                values,
            },
            ContextEntryEncoding::Typed { key_type, values } => Self { key_type, values },
        }
    }
}

/// A single expected-permission check against the policy document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Assertion {
    #[serde(default)]
    pub comment: String,
    pub expected_result: ExpectedResult,
    #[serde(default)]
    pub action_names: Vec<String>,
    #[serde(default)]
    pub resource_arns: Vec<String>,
    #[serde(default)]
    pub resource_policy: Option<String>,
    #[serde(default)]
    pub resource_owner: Option<String>,
    #[serde(default)]
    pub caller_arn: Option<String>,
    /// Keyed by condition key; ordered so requests are built deterministically.
    #[serde(default)]
    pub context_entries: BTreeMap<String, ContextEntryValue>,
    #[serde(default)]
    pub resource_handling_option: Option<String>,
}

impl Assertion {
    pub fn new(
        expected_result: ExpectedResult,
        action_names: Vec<String>,
        resource_arns: Vec<String>,
    ) -> Self {
        Self {
            comment: String::new(),
            expected_result,
            action_names,
            resource_arns,
            resource_policy: None,
            resource_owner: None,
            caller_arn: None,
            context_entries: BTreeMap::new(),
            resource_handling_option: None,
        }
    }
}

/// Canonical inputs of a run: what to assert, and against which policy.
#[derive(Debug, Clone, PartialEq)]
pub struct Inputs {
    pub assertions: Vec<Assertion>,
    pub policy_json: String,
}

/// Classification of a single simulator result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationOutcome {
    pub eval_action_name: String,
    pub eval_resource_name: String,
    pub eval_decision: String,
    pub matches_expectation: bool,
}

/// Accumulated mismatches of one evaluation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Number of simulator results classified.
    pub evaluated: usize,
    pub messages: Vec<String>,
}

/// Separator between failure messages in the combined error text
pub const REPORT_SEPARATOR: &str = ",";

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages.join(REPORT_SEPARATOR))
    }
}

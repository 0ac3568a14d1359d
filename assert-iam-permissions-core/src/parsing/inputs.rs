//! Canonicalization of run inputs
//!
//! Inputs arrive as flag values and/or one JSON document on stdin. The stdin
//! document comes in several shapes in practice:
//!
//! - strict JSON with `assertions` as an array and `policy_json` as a string
//! - `assertions` as a JSON-encoded string (tools that can only pass strings)
//! - "JSON" with literal newlines and tabs inside string values, as produced by
//!   template engines that splice a pretty-printed policy into a quoted field
//!
//! Each shape is reduced to one [`PartialInputs`] per source; sources are then
//! merged field by field and validated into [`Inputs`].

use crate::error::{AssertionError, AssertionResult};
use crate::types::{Assertion, Inputs};
use log::{debug, warn};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Inputs contributed by a single source, before merging and validation.
///
/// Empty collections and `None` mean "not provided by this source".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialInputs {
    pub assertions: Vec<Assertion>,
    pub policy_json: String,
    pub max_length: Option<usize>,
    pub assume_role_arn: Option<String>,
}

// Fields keep their raw JSON value so every accepted encoding can be
// normalized explicitly.
#[derive(Debug, Deserialize)]
struct RawInputs {
    #[serde(default)]
    assertions: Value,
    #[serde(default)]
    policy_json: Value,
    #[serde(default)]
    max_length: Value,
    #[serde(default)]
    assume_role_arn: Option<String>,
}

impl RawInputs {
    fn normalize(self) -> AssertionResult<PartialInputs> {
        Ok(PartialInputs {
            assertions: assertions_from_value(self.assertions)?,
            policy_json: policy_from_value(self.policy_json)?,
            max_length: max_length_from_value(self.max_length)?,
            assume_role_arn: self.assume_role_arn.filter(|arn| !arn.is_empty()),
        })
    }
}

/// Parse a stdin document into the inputs it provides.
///
/// Strict JSON is tried first. If that fails, newlines and tabs are stripped
/// (they are insignificant in policy documents) and the document is parsed
/// again. Either way the document must be a JSON object.
pub fn parse_inputs(data: &[u8]) -> AssertionResult<PartialInputs> {
    if data.iter().all(u8::is_ascii_whitespace) {
        debug!("No inputs provided on stdin");
        return Ok(PartialInputs::default());
    }

    let document = match serde_json::from_slice::<Map<String, Value>>(data) {
        Ok(document) => document,
        Err(strict_error) => {
            warn!("Inputs are not strict JSON ({strict_error}); retrying without newlines and tabs");
            let sanitized: Vec<u8> = data
                .iter()
                .copied()
                .filter(|b| !matches!(b, b'\n' | b'\t'))
                .collect();
            serde_json::from_slice::<Map<String, Value>>(&sanitized).map_err(|e| {
                AssertionError::parse(format!("Error unmarshaling inputs json; {e}"))
            })?
        }
    };

    // Only a JSON object reaches here; arrays never bind fields by position
    let raw: RawInputs = serde_json::from_value(Value::Object(document))
        .map_err(|e| AssertionError::parse(format!("Error unmarshaling inputs json; {e}")))?;
    raw.normalize()
}

/// Parse an assertions array given as JSON text.
///
/// The text may hold the array itself or a JSON string that encodes it.
pub fn parse_assertions(text: &str) -> AssertionResult<Vec<Assertion>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let value: Value = serde_json::from_str(text)
        .map_err(|e| AssertionError::parse(format!("Error unmarshaling inputs.assertions; {e}")))?;
    assertions_from_value(value)
}

fn assertions_from_value(value: Value) -> AssertionResult<Vec<Assertion>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(encoded) => parse_assertions(&encoded),
        value @ Value::Array(_) => serde_json::from_value(value).map_err(|e| {
            AssertionError::parse(format!("Error unmarshaling inputs.assertions; {e}"))
        }),
        other => Err(AssertionError::parse(format!(
            "'assertions' must be a JSON array or a JSON-encoded array, got {}",
            json_type(&other)
        ))),
    }
}

fn policy_from_value(value: Value) -> AssertionResult<String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(policy) => Ok(policy),
        // A policy given as a JSON object rather than as text
        value @ Value::Object(_) => serde_json::to_string(&value).map_err(|e| {
            AssertionError::parse(format!("Error serializing inputs.policy_json; {e}"))
        }),
        other => Err(AssertionError::parse(format!(
            "'policy_json' must be a string or an object, got {}",
            json_type(&other)
        ))),
    }
}

fn max_length_from_value(value: Value) -> AssertionResult<Option<usize>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => number
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| {
                AssertionError::parse(format!(
                    "'max_length' must be a non-negative integer, got {number}"
                ))
            }),
        Value::String(text) if text.trim().is_empty() => Ok(None),
        Value::String(text) => text.trim().parse::<usize>().map(Some).map_err(|e| {
            AssertionError::parse(format!("Error unmarshaling inputs.max_length '{text}'; {e}"))
        }),
        other => Err(AssertionError::parse(format!(
            "'max_length' must be a number or a numeric string, got {}",
            json_type(&other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Merge two sources field by field.
///
/// A field from `direct` wins when it is non-empty; otherwise the field from
/// `fallback` is used. Assertion lists and policy text are replaced whole.
pub fn merge(direct: PartialInputs, fallback: PartialInputs) -> PartialInputs {
    PartialInputs {
        assertions: if direct.assertions.is_empty() {
            fallback.assertions
        } else {
            direct.assertions
        },
        policy_json: if direct.policy_json.is_empty() {
            fallback.policy_json
        } else {
            direct.policy_json
        },
        max_length: direct.max_length.or(fallback.max_length),
        assume_role_arn: direct.assume_role_arn.or(fallback.assume_role_arn),
    }
}

/// Check required fields and assertion invariants after merging.
pub fn validate(partial: PartialInputs) -> AssertionResult<Inputs> {
    if partial.assertions.is_empty() {
        return Err(AssertionError::validation("'assertions' is required"));
    }
    if partial.policy_json.is_empty() {
        return Err(AssertionError::validation("'policy-json' is required"));
    }
    if let Some((index, assertion)) = partial
        .assertions
        .iter()
        .enumerate()
        .find(|(_, assertion)| assertion.action_names.is_empty())
    {
        let label = if assertion.comment.is_empty() {
            format!("#{}", index + 1)
        } else {
            format!("#{} ('{}')", index + 1, assertion.comment)
        };
        return Err(AssertionError::validation(format!(
            "assertion {label} has no 'action_names'"
        )));
    }

    Ok(Inputs {
        assertions: partial.assertions,
        policy_json: partial.policy_json,
    })
}

//! Run configuration
//!
//! [`RunConfig`] is everything the caller decided (flags, environment); it is
//! resolved against stdin into a [`ResolvedRun`] once per run.

use crate::error::AssertionResult;
use crate::parsing::{merge, parse_assertions, parse_inputs, validate, PartialInputs};
use crate::types::Inputs;
use log::debug;
use std::io::Read;

/// Configuration supplied directly by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunConfig {
    /// Full text of the policy document under test
    pub policy_json: Option<String>,
    /// JSON array of assertions, possibly string-encoded
    pub assertions: Option<String>,
    /// Read a JSON inputs document from stdin
    pub read_stdin: bool,
    pub verbose: bool,
    /// Maximum number of non-whitespace characters in the policy document
    pub max_length: Option<usize>,
    /// Role to assume before calling the policy simulator
    pub assume_role_arn: Option<String>,
}

/// Inputs and settings of a run after merging every source.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRun {
    pub inputs: Inputs,
    pub max_length: Option<usize>,
    pub assume_role_arn: Option<String>,
}

impl RunConfig {
    fn direct_inputs(&self) -> AssertionResult<PartialInputs> {
        Ok(PartialInputs {
            assertions: match self.assertions.as_deref() {
                Some(text) => parse_assertions(text)?,
                None => Vec::new(),
            },
            policy_json: self.policy_json.clone().unwrap_or_default(),
            max_length: self.max_length,
            assume_role_arn: self
                .assume_role_arn
                .clone()
                .filter(|arn| !arn.is_empty()),
        })
    }

    /// Merge direct settings with stdin (when enabled) and validate the result.
    ///
    /// Direct settings win over stdin field by field.
    pub fn resolve<R: Read>(&self, mut stdin: R) -> AssertionResult<ResolvedRun> {
        let direct = self.direct_inputs()?;

        let from_stdin = if self.read_stdin {
            let mut data = Vec::new();
            stdin.read_to_end(&mut data)?;
            debug!("Read {} bytes of inputs from stdin", data.len());
            parse_inputs(&data)?
        } else {
            PartialInputs::default()
        };

        let merged = merge(direct, from_stdin);
        let max_length = merged.max_length;
        let assume_role_arn = merged.assume_role_arn.clone();

        Ok(ResolvedRun {
            inputs: validate(merged)?,
            max_length,
            assume_role_arn,
        })
    }
}

//! Policy document length guard

use crate::error::{AssertionError, AssertionResult};
use regex::Regex;
use std::sync::OnceLock;

fn whitespace() -> &'static Regex {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    // ASCII whitespace only; NBSP and other Unicode spaces count as characters
    WHITESPACE
        .get_or_init(|| Regex::new(r"[\t\n\x0C\r ]+").expect("whitespace pattern is valid"))
}

/// Number of characters in the policy once all whitespace is removed
pub fn non_whitespace_length(policy_json: &str) -> usize {
    whitespace().replace_all(policy_json, "").chars().count()
}

/// Fail when the policy, whitespace excluded, is longer than `max_length`.
///
/// IAM enforces its policy size quotas on the document with whitespace
/// removed, so reformatting never changes the outcome.
pub fn check_length(max_length: usize, policy_json: &str) -> AssertionResult<()> {
    let length = non_whitespace_length(policy_json);
    if length > max_length {
        return Err(AssertionError::Length {
            overage: length - max_length,
            max_length,
        });
    }
    Ok(())
}

//! STS role assumption

use crate::aws::{AwsError, AwsResult};
use aws_credential_types::Credentials;
use aws_sdk_sts::error::DisplayErrorContext;
use aws_sdk_sts::Client as StsClient;
use std::time::SystemTime;

pub(crate) const ROLE_SESSION_NAME: &str = "assert-iam-permissions";

const CREDENTIALS_PROVIDER_NAME: &str = "AssumeRole";

/// Assume `role_arn` and return its temporary credentials
pub(crate) async fn assume_role_credentials(
    client: &StsClient,
    role_arn: &str,
) -> AwsResult<Credentials> {
    let response = client
        .assume_role()
        .role_arn(role_arn)
        .role_session_name(ROLE_SESSION_NAME)
        .send()
        .await
        .map_err(|e| {
            AwsError::StsError(format!(
                "Failed to assume role '{role_arn}': {}",
                DisplayErrorContext(&e)
            ))
        })?;

    let credentials = response.credentials().ok_or_else(|| {
        AwsError::StsError(format!("AssumeRole for '{role_arn}' returned no credentials"))
    })?;

    Ok(Credentials::new(
        credentials.access_key_id(),
        credentials.secret_access_key(),
        Some(credentials.session_token().to_string()),
        SystemTime::try_from(*credentials.expiration()).ok(),
        CREDENTIALS_PROVIDER_NAME,
    ))
}

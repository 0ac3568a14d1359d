//! AWS SDK integration: IAM policy simulator client, role assumption, client setup.

pub(crate) mod iam_client;
pub(crate) mod sts;

use aws_config::BehaviorVersion;
use aws_sdk_iam::Client as IamClient;
use aws_sdk_sts::Client as StsClient;
use log::debug;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AwsError {
    #[error("IAM client error: {0}")]
    IamError(String),
    #[error("STS client error: {0}")]
    StsError(String),
}

pub type AwsResult<T> = Result<T, AwsError>;

/// Build the IAM client for a run.
///
/// Configuration comes from the standard provider chain. With a role ARN,
/// the client is backed by short-lived credentials from STS `AssumeRole`.
pub(crate) async fn iam_client(assume_role_arn: Option<&str>) -> AwsResult<IamClient> {
    let config = aws_config::defaults(BehaviorVersion::latest()).load().await;

    let Some(role_arn) = assume_role_arn else {
        return Ok(IamClient::new(&config));
    };

    debug!("Assuming role {role_arn} for policy simulation");
    let credentials = sts::assume_role_credentials(&StsClient::new(&config), role_arn).await?;
    let iam_config = aws_sdk_iam::config::Builder::from(&config)
        .credentials_provider(credentials)
        .build();
    Ok(IamClient::from_conf(iam_config))
}

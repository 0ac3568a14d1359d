//! Command-line entry point for assert-iam-permissions.

use anyhow::Result;
use assert_iam_permissions_core::{run, AssertionError, AwsConnector, RunConfig};
use clap::builder::FalseyValueParser;
use clap::{CommandFactory, Parser};
use log::{error, LevelFilter};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "assert-iam-permissions",
    about = "Assert that an IAM policy document allows or denies a set of actions, using the IAM policy simulator"
)]
struct Cli {
    /// Full text of the policy document under test
    #[arg(long, env = "AAIP_POLICY_JSON")]
    policy_json: Option<String>,

    /// JSON array of assertions (may itself be a JSON-encoded string)
    #[arg(long, env = "AAIP_ASSERTIONS")]
    assertions: Option<String>,

    /// Read a JSON inputs document from stdin; flag values take precedence
    #[arg(short = 'i', long, env = "AAIP_READ_STDIN", value_parser = FalseyValueParser::new())]
    read_stdin: bool,

    /// Log each simulation request
    #[arg(short = 'V', long, env = "AAIP_VERBOSE", value_parser = FalseyValueParser::new())]
    verbose: bool,

    /// Maximum number of non-whitespace characters allowed in the policy document
    #[arg(long, env = "AAIP_MAX_LENGTH")]
    max_length: Option<usize>,

    /// Role to assume before calling the policy simulator
    #[arg(long, env = "AAIP_ASSUME_ROLE_ARN")]
    assume_role_arn: Option<String>,
}

impl From<Cli> for RunConfig {
    fn from(cli: Cli) -> Self {
        Self {
            policy_json: cli.policy_json,
            assertions: cli.assertions,
            read_stdin: cli.read_stdin,
            verbose: cli.verbose,
            max_length: cli.max_length,
            assume_role_arn: cli.assume_role_arn,
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

async fn execute(config: RunConfig) -> Result<()> {
    let stdin = std::io::stdin().lock();
    let stdout = std::io::stdout().lock();
    run(&config, stdin, stdout, &AwsConnector).await?;
    Ok(())
}

/// Usage text shown after errors caused by missing or incomplete inputs
fn usage_hint(err: &anyhow::Error) -> Option<String> {
    match err.downcast_ref::<AssertionError>() {
        Some(AssertionError::Validation(_)) => Some(Cli::command().render_usage().to_string()),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = RunConfig::from(Cli::parse());
    init_logging(config.verbose);

    match execute(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            if let Some(usage) = usage_hint(&e) {
                eprintln!("{usage}");
            }
            ExitCode::FAILURE
        }
    }
}

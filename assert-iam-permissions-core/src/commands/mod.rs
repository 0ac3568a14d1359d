//! Commands module - service layer for policy assertion runs

mod evaluate;
pub mod length;
pub mod report;
pub mod run;
pub(crate) mod service;

pub use length::{check_length, non_whitespace_length};
pub use report::{failure_message, output_artifact, write_output};
pub use run::{run, AwsConnector, SimulatorConnector};
pub use service::AssertionService;

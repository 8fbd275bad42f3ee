// stack-cleanup - Tear down CloudFormation stacks that own S3 and S3 Tables data
//
// For each selected stack, strictly in order:
// - empty every S3 bucket (current objects, then versions and delete markers)
// - delete every S3 Tables table, then its namespace
// - delete the stack and report its status
//
// Every AWS failure along the way is logged as a warning and the run carries
// on. Only a named stack that cannot be found aborts the run.

use stack_cleanup_config::CleanupConfig;
use tracing::info;

pub mod aws;
pub mod buckets;
pub mod cleanup;
pub mod cloud;
pub mod error;
pub mod model;
pub mod prompt;
pub mod report;
pub mod resolve;
pub mod tables;

mod init;

#[cfg(test)]
mod fake;

pub use cleanup::Cleanup;
pub use error::{CleanupError, CloudError};
pub use init::init_tracing;
pub use report::{CleanupReport, Disposition, StackReport};

use aws::AwsClients;
use prompt::{AssumeYes, Confirm, TerminalConfirm};

/// Run the cleanup against AWS with the resolved configuration
pub async fn run_with_config(
    config: &CleanupConfig,
    stack_name: Option<&str>,
) -> Result<CleanupReport, CleanupError> {
    info!(
        region = %config.region,
        profile = config.profile.as_deref().unwrap_or("default"),
        "Loading AWS configuration"
    );
    let clients = AwsClients::load(&config.region, config.profile.as_deref()).await;

    let confirm: Box<dyn Confirm> = if config.assume_yes {
        Box::new(AssumeYes)
    } else {
        Box::new(TerminalConfirm)
    };

    Cleanup {
        stacks: &clients.stacks,
        buckets: &clients.buckets,
        tables: &clients.tables,
        confirm: confirm.as_ref(),
        config,
    }
    .run(stack_name)
    .await
}

/// Process exit code for a finished run: only a failed stack lookup is fatal
pub fn exit_code(result: &Result<CleanupReport, CleanupError>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

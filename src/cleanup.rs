//! Per-stack cleanup: empty buckets, tear down S3 Tables, delete the stack

use crate::buckets;
use crate::cloud::{BucketApi, StackApi, TableCatalogApi};
use crate::error::{CleanupError, CloudError};
use crate::model::{Stack, StackContents, DELETE_COMPLETE, DELETE_FAILED};
use crate::prompt::Confirm;
use crate::report::{CleanupReport, Disposition, StackReport};
use crate::resolve;
use crate::tables;
use stack_cleanup_config::CleanupConfig;
use tracing::{debug, info, warn};

/// Reported when the stack status could not be read
const UNKNOWN_STATUS: &str = "UNKNOWN";

/// Everything a cleanup run talks to
pub struct Cleanup<'a> {
    pub stacks: &'a dyn StackApi,
    pub buckets: &'a dyn BucketApi,
    pub tables: &'a dyn TableCatalogApi,
    pub confirm: &'a dyn Confirm,
    pub config: &'a CleanupConfig,
}

impl Cleanup<'_> {
    /// Clean up one named stack, or every stack matching the configured
    /// prefix after confirmation.
    pub async fn run(&self, stack_name: Option<&str>) -> Result<CleanupReport, CleanupError> {
        let mut report = CleanupReport::new(&self.config.region);

        match stack_name {
            Some(name) => {
                let stack = resolve::named_stack(self.stacks, name, &self.config.region).await?;
                report.stacks.push(self.clean_stack(&stack).await);
            }
            None => {
                let candidates =
                    match resolve::matching_stacks(self.stacks, &self.config.stack_prefix).await {
                        Ok(stacks) => stacks,
                        Err(e) => {
                            report.warn(format!("Failed to list stacks: {}", e));
                            Vec::new()
                        }
                    };

                info!(
                    region = %self.config.region,
                    prefix = %self.config.stack_prefix,
                    count = candidates.len(),
                    "Found matching stacks"
                );

                for stack in &candidates {
                    if self.confirmed(stack) {
                        report.stacks.push(self.clean_stack(stack).await);
                    } else {
                        info!(stack = %stack.name, "Skipping stack");
                        report.stacks.push(StackReport::skipped(&stack.name));
                    }
                }
            }
        }

        Ok(report)
    }

    fn confirmed(&self, stack: &Stack) -> bool {
        let prompt = format!("Delete stack '{}' ({})?", stack.name, stack.status);
        match self.confirm.confirm(&prompt) {
            Ok(answer) => answer,
            Err(e) => {
                warn!(
                    stack = %stack.name,
                    "Could not ask for confirmation ({}); skipping. Use --yes to run unattended",
                    e
                );
                false
            }
        }
    }

    async fn clean_stack(&self, stack: &Stack) -> StackReport {
        let dry_run = self.config.dry_run;
        let mut report = StackReport::new(&stack.name);
        info!(stack = %stack.name, status = %stack.status, dry_run, "Cleaning up stack");

        let resources = match self.stacks.list_stack_resources(&stack.name).await {
            Ok(resources) => resources,
            Err(e) => {
                report.warn(format!("Failed to list resources of {}: {}", stack.name, e));
                Vec::new()
            }
        };

        let contents = StackContents::from_resources(&resources);
        debug!(
            stack = %stack.name,
            buckets = contents.buckets.len(),
            table_buckets = contents.table_buckets.len(),
            "Stack contents"
        );

        for bucket in &contents.buckets {
            buckets::empty_bucket(self.buckets, bucket, dry_run, &mut report).await;
        }

        for table_bucket in &contents.table_buckets {
            tables::teardown_table_bucket(
                self.tables,
                table_bucket,
                dry_run,
                &self.config.wait,
                &mut report,
            )
            .await;
        }

        if dry_run {
            info!(stack = %stack.name, "Dry run: would delete stack");
            report.disposition = Disposition::Planned;
            return report;
        }

        info!(stack = %stack.name, "Deleting stack");
        if let Err(e) = self.stacks.delete_stack(&stack.name).await {
            report.warn(format!("Failed to delete stack {}: {}", stack.name, e));
            report.disposition = Disposition::DeleteFailed;
            return report;
        }
        info!(stack = %stack.name, "CloudFormation stack deletion initiated");

        let status = if self.config.wait.stack_deletion {
            self.wait_for_deletion(&stack.name, &mut report).await
        } else {
            self.current_status(&stack.name, &mut report).await
        };
        info!(stack = %stack.name, status = %status, "Stack status");

        report.disposition = Disposition::Deleted { status };
        report
    }

    async fn current_status(&self, name: &str, report: &mut StackReport) -> String {
        match self.describe_status(name).await {
            Ok(status) => status,
            Err(e) => {
                report.warn(format!("Failed to read status of {}: {}", name, e));
                UNKNOWN_STATUS.to_string()
            }
        }
    }

    /// A stack that no longer exists has finished deleting
    async fn describe_status(&self, name: &str) -> Result<String, CloudError> {
        Ok(self
            .stacks
            .describe_stack(name)
            .await?
            .map_or_else(|| DELETE_COMPLETE.to_string(), |stack| stack.status))
    }

    async fn wait_for_deletion(&self, name: &str, report: &mut StackReport) -> String {
        let wait = &self.config.wait;
        let mut status = UNKNOWN_STATUS.to_string();
        let mut describe_failed = false;

        for attempt in 1..=wait.stack_attempts {
            status = match self.describe_status(name).await {
                Ok(status) => status,
                Err(e) => {
                    // One warning per stack, however long the throttling lasts
                    if !describe_failed {
                        report.warn(format!("Failed to read status of {}: {}", name, e));
                        describe_failed = true;
                    } else {
                        debug!(stack = %name, error = %e, "Status poll failed again");
                    }
                    UNKNOWN_STATUS.to_string()
                }
            };
            if status == DELETE_COMPLETE {
                return status;
            }
            if status == DELETE_FAILED {
                report.warn(format!("Stack {} failed to delete", name));
                return status;
            }

            info!(stack = %name, status = %status, attempt, "Waiting for stack deletion...");
            if attempt < wait.stack_attempts {
                tokio::time::sleep(wait.interval()).await;
            }
        }

        report.warn(format!(
            "Timeout waiting for stack {} to delete (last status {})",
            name, status
        ));
        status
    }
}

use crate::cloud::StackApi;
use crate::error::CloudError;
use crate::model::{Stack, StackResource, DELETE_COMPLETE};
use async_trait::async_trait;
use aws_sdk_cloudformation::types::StackStatus;
use aws_sdk_cloudformation::Client;

pub struct CloudFormation {
    client: Client,
}

impl CloudFormation {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

/// Every stack status except DELETE_COMPLETE
fn live_statuses() -> Vec<StackStatus> {
    StackStatus::values()
        .iter()
        .filter(|&&status| status != DELETE_COMPLETE)
        .map(|status| StackStatus::from(*status))
        .collect()
}

fn status_name<S: AsRef<str>>(status: Option<S>) -> String {
    status
        .map(|s| s.as_ref().to_string())
        .unwrap_or_else(|| "UNKNOWN".to_string())
}

#[async_trait]
impl StackApi for CloudFormation {
    async fn describe_stack(&self, name: &str) -> Result<Option<Stack>, CloudError> {
        let output = match self.client.describe_stacks().stack_name(name).send().await {
            Ok(output) => output,
            Err(e) => {
                // CloudFormation answers a missing stack with ValidationError
                let err = CloudError::from_sdk("DescribeStacks", e);
                if err.is_not_found() {
                    return Ok(None);
                }
                return Err(err);
            }
        };

        Ok(output.stacks().first().map(|stack| {
            Stack::new(
                stack.stack_name().unwrap_or(name),
                status_name(stack.stack_status()),
            )
        }))
    }

    async fn list_stacks(&self) -> Result<Vec<Stack>, CloudError> {
        let statuses = live_statuses();
        let mut stacks = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let output = self
                .client
                .list_stacks()
                .set_stack_status_filter(Some(statuses.clone()))
                .set_next_token(next_token)
                .send()
                .await
                .map_err(|e| CloudError::from_sdk("ListStacks", e))?;

            for summary in output.stack_summaries() {
                if let Some(name) = summary.stack_name() {
                    stacks.push(Stack::new(name, status_name(summary.stack_status())));
                }
            }

            next_token = output.next_token().map(str::to_string);
            if next_token.is_none() {
                break;
            }
        }

        Ok(stacks)
    }

    async fn list_stack_resources(&self, stack: &str) -> Result<Vec<StackResource>, CloudError> {
        let mut resources = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let output = self
                .client
                .list_stack_resources()
                .stack_name(stack)
                .set_next_token(next_token)
                .send()
                .await
                .map_err(|e| CloudError::from_sdk("ListStackResources", e))?;

            for summary in output.stack_resource_summaries() {
                resources.push(StackResource {
                    logical_id: summary.logical_resource_id().unwrap_or_default().to_string(),
                    physical_id: summary.physical_resource_id().map(str::to_string),
                    resource_type: summary.resource_type().unwrap_or_default().to_string(),
                    status: status_name(summary.resource_status()),
                });
            }

            next_token = output.next_token().map(str::to_string);
            if next_token.is_none() {
                break;
            }
        }

        Ok(resources)
    }

    async fn delete_stack(&self, stack: &str) -> Result<(), CloudError> {
        self.client
            .delete_stack()
            .stack_name(stack)
            .send()
            .await
            .map_err(|e| CloudError::from_sdk("DeleteStack", e))?;
        Ok(())
    }
}

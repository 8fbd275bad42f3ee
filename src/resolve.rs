//! Finding the stacks to clean up

use crate::cloud::StackApi;
use crate::error::{CleanupError, CloudError};
use crate::model::Stack;

/// Look up a stack by name. A missing stack is a hard failure.
pub async fn named_stack(
    api: &dyn StackApi,
    name: &str,
    region: &str,
) -> Result<Stack, CleanupError> {
    match api.describe_stack(name).await {
        Ok(Some(stack)) => Ok(stack),
        Ok(None) => Err(CleanupError::StackNotFound {
            name: name.to_string(),
            region: region.to_string(),
        }),
        Err(source) => Err(CleanupError::StackLookup {
            name: name.to_string(),
            source,
        }),
    }
}

/// Every live stack whose name starts with `prefix`, sorted by name
pub async fn matching_stacks(api: &dyn StackApi, prefix: &str) -> Result<Vec<Stack>, CloudError> {
    let mut stacks: Vec<Stack> = api
        .list_stacks()
        .await?
        .into_iter()
        .filter(|stack| stack.name.starts_with(prefix))
        .collect();
    stacks.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(stacks)
}

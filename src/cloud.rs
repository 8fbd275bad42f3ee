//! Service seams used by the cleanup flow
//!
//! Each trait covers exactly the calls the cleanup issues against one AWS
//! service. Pagination is the implementor's job: list calls return every item.
//! [`crate::aws`] implements them over the AWS SDK.

use crate::error::CloudError;
use crate::model::{DeleteOutcome, ObjectRef, Stack, StackResource, TableBucketArn};
use async_trait::async_trait;

/// CloudFormation
#[async_trait]
pub trait StackApi: Send + Sync {
    /// `Ok(None)` when the stack does not exist
    async fn describe_stack(&self, name: &str) -> Result<Option<Stack>, CloudError>;

    /// Every stack that has not finished deleting
    async fn list_stacks(&self) -> Result<Vec<Stack>, CloudError>;

    async fn list_stack_resources(&self, stack: &str) -> Result<Vec<StackResource>, CloudError>;

    async fn delete_stack(&self, stack: &str) -> Result<(), CloudError>;
}

/// Amazon S3
#[async_trait]
pub trait BucketApi: Send + Sync {
    /// Keys of every current object
    async fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectRef>, CloudError>;

    /// True when versioning is Enabled or Suspended
    async fn is_versioned(&self, bucket: &str) -> Result<bool, CloudError>;

    /// Every object version and delete marker
    async fn list_object_versions(&self, bucket: &str) -> Result<Vec<ObjectRef>, CloudError>;

    /// One DeleteObjects request; callers keep batches within [`crate::buckets::MAX_DELETE_BATCH`]
    async fn delete_objects(
        &self,
        bucket: &str,
        objects: Vec<ObjectRef>,
    ) -> Result<DeleteOutcome, CloudError>;
}

/// Amazon S3 Tables
#[async_trait]
pub trait TableCatalogApi: Send + Sync {
    async fn list_namespaces(&self, bucket: &TableBucketArn) -> Result<Vec<String>, CloudError>;

    async fn list_tables(
        &self,
        bucket: &TableBucketArn,
        namespace: &str,
    ) -> Result<Vec<String>, CloudError>;

    async fn delete_table(
        &self,
        bucket: &TableBucketArn,
        namespace: &str,
        table: &str,
    ) -> Result<(), CloudError>;

    async fn delete_namespace(
        &self,
        bucket: &TableBucketArn,
        namespace: &str,
    ) -> Result<(), CloudError>;
}

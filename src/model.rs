//! Transient views of the remote resources the cleanup walks through

use std::fmt;

pub const S3_BUCKET_TYPE: &str = "AWS::S3::Bucket";
pub const TABLE_BUCKET_TYPE: &str = "AWS::S3Tables::TableBucket";

pub const DELETE_COMPLETE: &str = "DELETE_COMPLETE";
pub const DELETE_FAILED: &str = "DELETE_FAILED";

/// A CloudFormation stack and its current status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack {
    pub name: String,
    pub status: String,
}

impl Stack {
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: status.into(),
        }
    }
}

/// One row of ListStackResources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackResource {
    pub logical_id: String,
    pub physical_id: Option<String>,
    pub resource_type: String,
    pub status: String,
}

impl StackResource {
    fn live_physical_id(&self, resource_type: &str) -> Option<&str> {
        if self.resource_type != resource_type || self.status == DELETE_COMPLETE {
            return None;
        }
        self.physical_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Resources of a stack that need emptying before the stack can be deleted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackContents {
    pub buckets: Vec<String>,
    pub table_buckets: Vec<TableBucketArn>,
}

impl StackContents {
    /// Pick the S3 buckets and S3 Tables buckets out of a stack's resources,
    /// keeping resource order.
    pub fn from_resources(resources: &[StackResource]) -> Self {
        let buckets = resources
            .iter()
            .filter_map(|r| r.live_physical_id(S3_BUCKET_TYPE))
            .map(str::to_string)
            .collect();
        let table_buckets = resources
            .iter()
            .filter_map(|r| r.live_physical_id(TABLE_BUCKET_TYPE))
            .map(TableBucketArn::new)
            .collect();

        Self {
            buckets,
            table_buckets,
        }
    }
}

/// ARN of an S3 Tables table bucket, as CloudFormation reports its physical id
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableBucketArn(String);

impl TableBucketArn {
    pub fn new(arn: impl Into<String>) -> Self {
        Self(arn.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The bucket name after `bucket/`, or the whole ARN if it has no such part
    pub fn bucket_name(&self) -> &str {
        self.0
            .rsplit_once(":bucket/")
            .map(|(_, name)| name)
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for TableBucketArn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An object key, optionally pinned to a version, for DeleteObjects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub key: String,
    pub version_id: Option<String>,
}

impl ObjectRef {
    pub fn current(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            version_id: None,
        }
    }

    pub fn versioned(key: impl Into<String>, version_id: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            version_id: Some(version_id.into()),
        }
    }
}

/// Result of one DeleteObjects call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub deleted: usize,
    /// `(key, message)` for every entry S3 refused to delete
    pub failed: Vec<(String, String)>,
}

//! Error types for the cleanup run

use aws_sdk_cloudformation::error::{DisplayErrorContext, ProvideErrorMetadata};
use thiserror::Error;

/// A failed AWS call
#[derive(Debug, Clone, Error)]
#[error("{operation} failed: {message}")]
pub struct CloudError {
    pub operation: &'static str,
    /// AWS error code, e.g. `ValidationError` or `NoSuchBucket`
    pub code: Option<String>,
    pub message: String,
}

impl CloudError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Capture code and full error chain from an SDK error
    pub(crate) fn from_sdk<E>(operation: &'static str, err: E) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
    {
        Self {
            operation,
            code: err.code().map(str::to_string),
            message: DisplayErrorContext(&err).to_string(),
        }
    }

    /// Whether the remote side reported that the target does not exist
    pub fn is_not_found(&self) -> bool {
        let code_says_missing = matches!(
            self.code.as_deref(),
            Some("NotFoundException" | "NotFound" | "NoSuchBucket")
        );
        code_says_missing || self.message.contains("does not exist")
    }
}

/// Failures that abort the run
#[derive(Debug, Error)]
pub enum CleanupError {
    #[error("Stack '{name}' not found in region {region}")]
    StackNotFound { name: String, region: String },

    #[error("Failed to look up stack '{name}': {source}")]
    StackLookup {
        name: String,
        #[source]
        source: CloudError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        let validation = CloudError::new(
            "DescribeStacks",
            "ValidationError: Stack with id smoke-lambda-1 does not exist",
        )
        .with_code("ValidationError");
        assert!(validation.is_not_found());

        let missing_bucket = CloudError::new("ListObjectsV2", "bucket gone").with_code("NoSuchBucket");
        assert!(missing_bucket.is_not_found());

        let throttled = CloudError::new("ListStacks", "Rate exceeded").with_code("Throttling");
        assert!(!throttled.is_not_found());
    }

    #[test]
    fn test_display() {
        let err = CleanupError::StackNotFound {
            name: "smoke-lambda-ab12".to_string(),
            region: "us-west-2".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Stack 'smoke-lambda-ab12' not found in region us-west-2"
        );
    }
}

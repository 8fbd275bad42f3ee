use crate::cloud::BucketApi;
use crate::error::CloudError;
use crate::model::{DeleteOutcome, ObjectRef};
use async_trait::async_trait;
use aws_sdk_s3::types::{BucketVersioningStatus, Delete, ObjectIdentifier};
use aws_sdk_s3::Client;

pub struct S3 {
    client: Client,
}

impl S3 {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BucketApi for S3 {
    async fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectRef>, CloudError> {
        let mut objects = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let output = self
                .client
                .list_objects_v2()
                .bucket(bucket)
                .set_continuation_token(continuation_token)
                .send()
                .await
                .map_err(|e| CloudError::from_sdk("ListObjectsV2", e))?;

            objects.extend(
                output
                    .contents()
                    .iter()
                    .filter_map(|object| object.key())
                    .map(ObjectRef::current),
            );

            if !output.is_truncated().unwrap_or(false) {
                break;
            }
            continuation_token = output.next_continuation_token().map(str::to_string);
            if continuation_token.is_none() {
                break;
            }
        }

        Ok(objects)
    }

    async fn is_versioned(&self, bucket: &str) -> Result<bool, CloudError> {
        let output = self
            .client
            .get_bucket_versioning()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| CloudError::from_sdk("GetBucketVersioning", e))?;

        Ok(matches!(
            output.status(),
            Some(BucketVersioningStatus::Enabled | BucketVersioningStatus::Suspended)
        ))
    }

    async fn list_object_versions(&self, bucket: &str) -> Result<Vec<ObjectRef>, CloudError> {
        let mut objects = Vec::new();
        let mut key_marker: Option<String> = None;
        let mut version_id_marker: Option<String> = None;

        loop {
            let output = self
                .client
                .list_object_versions()
                .bucket(bucket)
                .set_key_marker(key_marker)
                .set_version_id_marker(version_id_marker)
                .send()
                .await
                .map_err(|e| CloudError::from_sdk("ListObjectVersions", e))?;

            for version in output.versions() {
                if let (Some(key), Some(version_id)) = (version.key(), version.version_id()) {
                    objects.push(ObjectRef::versioned(key, version_id));
                }
            }
            for marker in output.delete_markers() {
                if let (Some(key), Some(version_id)) = (marker.key(), marker.version_id()) {
                    objects.push(ObjectRef::versioned(key, version_id));
                }
            }

            if !output.is_truncated().unwrap_or(false) {
                break;
            }
            key_marker = output.next_key_marker().map(str::to_string);
            version_id_marker = output.next_version_id_marker().map(str::to_string);
            if key_marker.is_none() && version_id_marker.is_none() {
                break;
            }
        }

        Ok(objects)
    }

    async fn delete_objects(
        &self,
        bucket: &str,
        objects: Vec<ObjectRef>,
    ) -> Result<DeleteOutcome, CloudError> {
        let requested = objects.len();
        let identifiers = objects
            .into_iter()
            .map(|object| {
                ObjectIdentifier::builder()
                    .key(object.key)
                    .set_version_id(object.version_id)
                    .build()
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CloudError::new("DeleteObjects", e.to_string()))?;

        let delete = Delete::builder()
            .set_objects(Some(identifiers))
            .quiet(true)
            .build()
            .map_err(|e| CloudError::new("DeleteObjects", e.to_string()))?;

        let output = self
            .client
            .delete_objects()
            .bucket(bucket)
            .delete(delete)
            .send()
            .await
            .map_err(|e| CloudError::from_sdk("DeleteObjects", e))?;

        // Quiet mode only reports failures
        let failed: Vec<(String, String)> = output
            .errors()
            .iter()
            .map(|error| {
                let message = error
                    .message()
                    .or(error.code())
                    .unwrap_or("unknown error");
                (
                    error.key().unwrap_or_default().to_string(),
                    message.to_string(),
                )
            })
            .collect();

        Ok(DeleteOutcome {
            deleted: requested.saturating_sub(failed.len()),
            failed,
        })
    }
}

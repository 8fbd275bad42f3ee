//! Emptying S3 buckets so CloudFormation can delete them

use crate::cloud::BucketApi;
use crate::model::ObjectRef;
use crate::report::StackReport;
use tracing::{debug, info};

/// DeleteObjects accepts at most this many keys per request
pub const MAX_DELETE_BATCH: usize = 1000;

/// Per-key failures logged individually before being summarised
const MAX_LOGGED_KEY_FAILURES: usize = 5;

/// Delete every current object, then every version and delete marker if the
/// bucket is versioned. Failures are recorded as warnings. The bucket counts
/// as emptied only when every listing and batch succeeded.
pub async fn empty_bucket(
    api: &dyn BucketApi,
    bucket: &str,
    dry_run: bool,
    report: &mut StackReport,
) {
    info!(bucket = %bucket, "Emptying bucket");

    let current_cleared = match api.list_objects(bucket).await {
        Ok(objects) => delete_in_batches(api, bucket, objects, dry_run, report).await,
        Err(e) => {
            report.warn(format!("Failed to list objects in bucket {}: {}", bucket, e));
            false
        }
    };

    let versions_cleared = match api.is_versioned(bucket).await {
        Ok(true) => {
            info!(bucket = %bucket, "Bucket is versioned, deleting object versions");
            match api.list_object_versions(bucket).await {
                Ok(versions) => delete_in_batches(api, bucket, versions, dry_run, report).await,
                Err(e) => {
                    report.warn(format!(
                        "Failed to list object versions in bucket {}: {}",
                        bucket, e
                    ));
                    false
                }
            }
        }
        Ok(false) => {
            debug!(bucket = %bucket, "Bucket is not versioned");
            true
        }
        Err(e) => {
            report.warn(format!(
                "Failed to read versioning status of bucket {}: {}",
                bucket, e
            ));
            false
        }
    };

    if current_cleared && versions_cleared && !dry_run {
        report.buckets_emptied += 1;
    }
}

/// Returns true when every object was deleted


async fn delete_in_batches(
    api: &dyn BucketApi,
    bucket: &str,
    objects: Vec<ObjectRef>,
    dry_run: bool,
    report: &mut StackReport,
) -> bool {
    if objects.is_empty() {
        debug!(bucket = %bucket, "Nothing to delete");
        return true;
    }

    if dry_run {
        info!(
            bucket = %bucket,
            count = objects.len(),
            "Dry run: would delete objects"
        );
        return true;
    }

    let mut cleared = true;
    for batch in objects.chunks(MAX_DELETE_BATCH) {
        match api.delete_objects(bucket, batch.to_vec()).await {
            Ok(outcome) => {
                report.objects_deleted += outcome.deleted;
                cleared &= outcome.failed.is_empty();
                debug!(bucket = %bucket, deleted = outcome.deleted, "Deleted batch");

                for (key, message) in outcome.failed.iter().take(MAX_LOGGED_KEY_FAILURES) {
                    report.warn(format!(
                        "Failed to delete {} from bucket {}: {}",
                        key, bucket, message
                    ));
                }
                if outcome.failed.len() > MAX_LOGGED_KEY_FAILURES {
                    report.warn(format!(
                        "{} more objects could not be deleted from bucket {}",
                        outcome.failed.len() - MAX_LOGGED_KEY_FAILURES,
                        bucket
                    ));
                }
            }
            Err(e) => {
                report.warn(format!(
                    "Failed to delete {} objects from bucket {}: {}",
                    batch.len(),
                    bucket,
                    e
                ));
                cleared = false;
            }
        }
    }
    cleared
}

//! Tearing down S3 Tables buckets: tables first, then their namespaces

use crate::cloud::TableCatalogApi;
use crate::model::TableBucketArn;
use crate::report::StackReport;
use stack_cleanup_config::WaitConfig;
use tracing::{debug, info};

/// Delete every table and namespace in a table bucket. The bucket itself is
/// left to CloudFormation.
pub async fn teardown_table_bucket(
    api: &dyn TableCatalogApi,
    bucket: &TableBucketArn,
    dry_run: bool,
    wait: &WaitConfig,
    report: &mut StackReport,
) {
    info!(table_bucket = %bucket, "Deleting S3 Tables resources");

    let namespaces = match api.list_namespaces(bucket).await {
        Ok(namespaces) => namespaces,
        Err(e) => {
            report.warn(format!(
                "Failed to list namespaces in table bucket {}: {}",
                bucket.bucket_name(),
                e
            ));
            return;
        }
    };

    for namespace in &namespaces {
        teardown_namespace(api, bucket, namespace, dry_run, wait, report).await;
    }
}

async fn teardown_namespace(
    api: &dyn TableCatalogApi,
    bucket: &TableBucketArn,
    namespace: &str,
    dry_run: bool,
    wait: &WaitConfig,
    report: &mut StackReport,
) {
    let tables = match api.list_tables(bucket, namespace).await {
        Ok(tables) => tables,
        Err(e) => {
            report.warn(format!(
                "Failed to list tables in namespace {}: {}",
                namespace, e
            ));
            Vec::new()
        }
    };

    for table in &tables {
        if dry_run {
            info!(namespace = %namespace, table = %table, "Dry run: would delete table");
            continue;
        }

        info!(namespace = %namespace, table = %table, "Deleting table");
        match api.delete_table(bucket, namespace, table).await {
            Ok(()) => report.tables_deleted += 1,
            Err(e) => report.warn(format!(
                "Failed to delete table {}.{}: {}",
                namespace, table, e
            )),
        }
    }

    if dry_run {
        info!(namespace = %namespace, "Dry run: would delete namespace");
        return;
    }

    if !tables.is_empty() {
        wait_for_tables(api, bucket, namespace, wait, report).await;
    }

    info!(namespace = %namespace, "Deleting namespace");
    match api.delete_namespace(bucket, namespace).await {
        Ok(()) => report.namespaces_deleted += 1,
        Err(e) => report.warn(format!("Failed to delete namespace {}: {}", namespace, e)),
    }
}

/// Table deletion is asynchronous; a namespace can only go once it is empty.
async fn wait_for_tables(
    api: &dyn TableCatalogApi,
    bucket: &TableBucketArn,
    namespace: &str,
    wait: &WaitConfig,
    report: &mut StackReport,
) {
    for attempt in 1..=wait.table_attempts {
        match api.list_tables(bucket, namespace).await {
            Ok(remaining) if remaining.is_empty() => {
                debug!(namespace = %namespace, "All tables deleted");
                return;
            }
            Ok(remaining) => {
                info!(
                    namespace = %namespace,
                    remaining = remaining.len(),
                    attempt,
                    "Still waiting for tables to delete..."
                );
                if attempt < wait.table_attempts {
                    tokio::time::sleep(wait.interval()).await;
                }
            }
            Err(e) => {
                report.warn(format!(
                    "Error checking table deletion status in namespace {}: {}",
                    namespace, e
                ));
                return;
            }
        }
    }

    report.warn(format!(
        "Timeout waiting for tables in namespace {} to delete, continuing anyway",
        namespace
    ));
}

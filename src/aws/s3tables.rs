use crate::cloud::TableCatalogApi;
use crate::error::CloudError;
use crate::model::TableBucketArn;
use async_trait::async_trait;
use aws_sdk_s3tables::Client;

pub struct S3Tables {
    client: Client,
}

impl S3Tables {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TableCatalogApi for S3Tables {
    async fn list_namespaces(&self, bucket: &TableBucketArn) -> Result<Vec<String>, CloudError> {
        let mut namespaces = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let output = self
                .client
                .list_namespaces()
                .table_bucket_arn(bucket.as_str())
                .set_continuation_token(continuation_token)
                .send()
                .await
                .map_err(|e| CloudError::from_sdk("ListNamespaces", e))?;

            // S3 Tables namespaces are single-level
            namespaces.extend(
                output
                    .namespaces()
                    .iter()
                    .filter_map(|summary| summary.namespace().first().cloned()),
            );

            continuation_token = output.continuation_token().map(str::to_string);
            if continuation_token.is_none() {
                break;
            }
        }

        Ok(namespaces)
    }

    async fn list_tables(
        &self,
        bucket: &TableBucketArn,
        namespace: &str,
    ) -> Result<Vec<String>, CloudError> {
        let mut tables = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let output = self
                .client
                .list_tables()
                .table_bucket_arn(bucket.as_str())
                .namespace(namespace)
                .set_continuation_token(continuation_token)
                .send()
                .await
                .map_err(|e| CloudError::from_sdk("ListTables", e))?;

            tables.extend(output.tables().iter().map(|table| table.name().to_string()));

            continuation_token = output.continuation_token().map(str::to_string);
            if continuation_token.is_none() {
                break;
            }
        }

        Ok(tables)
    }

    async fn delete_table(
        &self,
        bucket: &TableBucketArn,
        namespace: &str,
        table: &str,
    ) -> Result<(), CloudError> {
        self.client
            .delete_table()
            .table_bucket_arn(bucket.as_str())
            .namespace(namespace)
            .name(table)
            .send()
            .await
            .map_err(|e| CloudError::from_sdk("DeleteTable", e))?;
        Ok(())
    }

    async fn delete_namespace(
        &self,
        bucket: &TableBucketArn,
        namespace: &str,
    ) -> Result<(), CloudError> {
        self.client
            .delete_namespace()
            .table_bucket_arn(bucket.as_str())
            .namespace(namespace)
            .send()
            .await
            .map_err(|e| CloudError::from_sdk("DeleteNamespace", e))?;
        Ok(())
    }
}

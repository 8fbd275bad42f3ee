//! AWS SDK implementations of the service traits in [`crate::cloud`]

mod cloudformation;
mod s3;
mod s3tables;

pub use cloudformation::CloudFormation;
pub use s3::S3;
pub use s3tables::S3Tables;

use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Clients for every service the cleanup touches, sharing one SDK config
pub struct AwsClients {
    pub stacks: CloudFormation,
    pub buckets: S3,
    pub tables: S3Tables,
}

impl AwsClients {
    pub async fn load(region: &str, profile: Option<&str>) -> Self {
        let sdk_config = load_sdk_config(region, profile).await;
        Self::from_sdk_config(&sdk_config)
    }

    pub fn from_sdk_config(sdk_config: &SdkConfig) -> Self {
        Self {
            stacks: CloudFormation::new(aws_sdk_cloudformation::Client::new(sdk_config)),
            buckets: S3::new(aws_sdk_s3::Client::new(sdk_config)),
            tables: S3Tables::new(aws_sdk_s3tables::Client::new(sdk_config)),
        }
    }
}

async fn load_sdk_config(region: &str, profile: Option<&str>) -> SdkConfig {
    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));
    if let Some(profile) = profile {
        loader = loader.profile_name(profile);
    }
    loader.load().await
}

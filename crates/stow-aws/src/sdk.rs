use aws_config::{BehaviorVersion, Region, SdkConfig};
use stow_core::config::AwsConfig;

use crate::{S3ObjectStore, SqsQueue};

/// Load the shared SDK configuration: the default provider chain, with the
/// region and endpoint overridden when configured.
pub async fn load_sdk_config(config: &AwsConfig) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = &config.region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(endpoint) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }
    loader.load().await
}

/// SQS and S3 adapters built from one shared SDK configuration.
#[derive(Debug, Clone)]
pub struct AwsClients {
    pub queue: SqsQueue,
    pub store: S3ObjectStore,
}

impl AwsClients {
    pub async fn from_config(config: &AwsConfig) -> Self {
        let sdk_config = load_sdk_config(config).await;
        Self::from_sdk_config(&sdk_config, config.endpoint_url.is_some())
    }

    /// Custom endpoints (LocalStack, MinIO) generally need path-style bucket
    /// addressing.
    pub fn from_sdk_config(sdk_config: &SdkConfig, force_path_style: bool) -> Self {
        let sqs = aws_sdk_sqs::Client::new(sdk_config);
        let s3_config = aws_sdk_s3::config::Builder::from(sdk_config)
            .force_path_style(force_path_style)
            .build();
        Self {
            queue: SqsQueue::new(sqs),
            store: S3ObjectStore::new(aws_sdk_s3::Client::from_conf(s3_config)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn region_override_is_applied() {
        let config = AwsConfig {
            region: Some("eu-west-1".to_string()),
            endpoint_url: Some("http://localhost:4566".to_string()),
        };
        let sdk_config = load_sdk_config(&config).await;
        assert_eq!(
            sdk_config.region().map(|r| r.to_string()),
            Some("eu-west-1".to_string())
        );
        assert_eq!(sdk_config.endpoint_url(), Some("http://localhost:4566"));

        let clients = AwsClients::from_sdk_config(&sdk_config, true);
        assert_eq!(
            clients.store.client().config().region().map(|r| r.to_string()),
            Some("eu-west-1".to_string())
        );
    }
}

//! SDK configuration for the SQS client

use aws_config::{retry::RetryConfig, BehaviorVersion, SdkConfig};
use aws_sdk_sqs::config::Region;
use serde::Deserialize;
use tracing::debug;

/// Overrides applied on top of the SDK's default provider chain.
///
/// Anything left unset is resolved the usual way: environment variables,
/// then the shared config and credentials files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AwsSettings {
    #[serde(default)]
    pub region: Option<String>,

    /// Custom endpoint, e.g. a local SQS emulator
    #[serde(default)]
    pub endpoint_url: Option<String>,

    /// Named profile from the shared config files
    #[serde(default)]
    pub profile: Option<String>,
}

/// Resolve an SDK config with retries disabled
pub async fn load_sdk_config(settings: &AwsSettings) -> SdkConfig {
    debug!(
        region = ?settings.region,
        endpoint_url = ?settings.endpoint_url,
        profile = ?settings.profile,
        "Loading AWS configuration"
    );

    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).retry_config(RetryConfig::disabled());

    if let Some(profile) = &settings.profile {
        loader = loader.profile_name(profile);
    }
    if let Some(region) = &settings.region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(endpoint_url) = &settings.endpoint_url {
        loader = loader.endpoint_url(endpoint_url);
    }

    loader.load().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_overrides_are_applied() {
        let settings = AwsSettings {
            region: Some("eu-west-1".to_string()),
            endpoint_url: Some("http://127.0.0.1:9324".to_string()),
            profile: None,
        };

        let config = load_sdk_config(&settings).await;

        assert_eq!(
            config.region().map(ToString::to_string),
            Some("eu-west-1".to_string())
        );
        assert_eq!(config.endpoint_url(), Some("http://127.0.0.1:9324"));
        assert_eq!(config.retry_config().map(|r| r.max_attempts()), Some(1));
    }
}

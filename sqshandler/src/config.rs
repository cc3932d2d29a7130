//! Configuration management

use anyhow::Context;
use serde::Deserialize;
use sqshandler_core::config::LEGACY_DEFAULT;
use sqshandler_core::ConnectionConfig;
use sqshandler_sqs::AwsSettings;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub queue: QueueConfig,

    #[serde(default)]
    pub aws: AwsSettings,
}

#[derive(Debug, Deserialize)]
pub struct QueueConfig {
    /// Queue URL
    #[serde(default)]
    pub address: Option<String>,

    #[serde(default = "default_one")]
    pub pull_batch_size: u32,

    #[serde(default = "default_one")]
    pub pull_visibility_seconds: u32,

    #[serde(default = "default_one")]
    pub push_delay_seconds: u32,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            address: None,
            pull_batch_size: default_one(),
            pull_visibility_seconds: default_one(),
            push_delay_seconds: default_one(),
        }
    }
}

fn default_one() -> u32 {
    LEGACY_DEFAULT
}

/// Values given on the command line; they win over file and environment
#[derive(Debug, Default)]
pub struct Overrides {
    pub address: Option<String>,
    pub pull_batch_size: Option<u32>,
    pub pull_visibility_seconds: Option<u32>,
    pub push_delay_seconds: Option<u32>,
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
    pub profile: Option<String>,
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Without an explicit path an optional `sqshandler.{toml,yaml,json}` in
    /// the working directory is read. Environment variables use the
    /// `SQSHANDLER_` prefix with `__` between levels, e.g.
    /// `SQSHANDLER_QUEUE__ADDRESS`.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_from(path, environment())
    }

    fn load_from(path: Option<&Path>, env: config::Environment) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("sqshandler").required(false),
        };

        let config = config::Config::builder()
            .add_source(file)
            .add_source(env)
            .build()
            .context("failed to read configuration")?;

        config
            .try_deserialize::<Config>()
            .context("invalid configuration")
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(address) = overrides.address {
            self.queue.address = Some(address);
        }
        if let Some(batch) = overrides.pull_batch_size {
            self.queue.pull_batch_size = batch;
        }
        if let Some(visibility) = overrides.pull_visibility_seconds {
            self.queue.pull_visibility_seconds = visibility;
        }
        if let Some(delay) = overrides.push_delay_seconds {
            self.queue.push_delay_seconds = delay;
        }
        if overrides.region.is_some() {
            self.aws.region = overrides.region;
        }
        if overrides.endpoint_url.is_some() {
            self.aws.endpoint_url = overrides.endpoint_url;
        }
        if overrides.profile.is_some() {
            self.aws.profile = overrides.profile;
        }
    }

    pub fn connection_config(&self) -> anyhow::Result<ConnectionConfig> {
        let address = self
            .queue
            .address
            .clone()
            .context("no queue address configured (use --address or SQSHANDLER_QUEUE__ADDRESS)")?;

        Ok(ConnectionConfig::with_params(
            address,
            self.queue.pull_batch_size,
            self.queue.pull_visibility_seconds,
            self.queue.push_delay_seconds,
        ))
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("SQSHANDLER")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment().source(Some(map))
    }

    #[test]
    fn test_defaults() {
        let config = Config::load_from(None, env(&[])).unwrap();

        assert_eq!(config.queue.address, None);
        assert_eq!(config.queue.pull_batch_size, 1);
        assert_eq!(config.queue.pull_visibility_seconds, 1);
        assert_eq!(config.queue.push_delay_seconds, 1);
        assert_eq!(config.aws, AwsSettings::default());
        assert!(config.connection_config().is_err());
    }

    #[test]
    fn test_file_then_environment() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[queue]
address = "https://sqs.us-east-1.amazonaws.com/123456789012/jobs"
pull_batch_size = 5
pull_visibility_seconds = 30

[aws]
region = "us-east-1"
"#
        )
        .unwrap();

        let config = Config::load_from(
            Some(file.path()),
            env(&[
                ("SQSHANDLER_QUEUE__PUSH_DELAY_SECONDS", "2"),
                ("SQSHANDLER_AWS__REGION", "eu-west-1"),
            ]),
        )
        .unwrap();

        assert_eq!(
            config.connection_config().unwrap(),
            ConnectionConfig::with_params(
                "https://sqs.us-east-1.amazonaws.com/123456789012/jobs",
                5,
                30,
                2
            )
        );
        assert_eq!(config.aws.region.as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        assert!(Config::load_from(Some(&path), env(&[])).is_err());
    }

    #[test]
    fn test_overrides_win() {
        let mut config = Config::load_from(
            None,
            env(&[
                ("SQSHANDLER_QUEUE__ADDRESS", "from-env"),
                ("SQSHANDLER_QUEUE__PULL_BATCH_SIZE", "4"),
            ]),
        )
        .unwrap();

        config.apply(Overrides {
            address: Some("from-cli".to_string()),
            push_delay_seconds: Some(9),
            endpoint_url: Some("http://localhost:4566".to_string()),
            ..Overrides::default()
        });

        assert_eq!(
            config.connection_config().unwrap(),
            ConnectionConfig::with_params("from-cli", 4, 1, 9)
        );
        assert_eq!(
            config.aws.endpoint_url.as_deref(),
            Some("http://localhost:4566")
        );
    }
}

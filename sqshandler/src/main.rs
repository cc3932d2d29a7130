//! sqshandler - pull, push and delete messages on an SQS queue
//!
//! Each invocation performs exactly one request against the queue. Settings
//! come from an optional config file, `SQSHANDLER_*` environment variables and
//! command-line flags, in increasing order of precedence.

mod cli;
mod config;

use clap::Parser;
use sqshandler_core::QueueConnection;
use sqshandler_sqs::AwsSqsTransport;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Command;
use crate::config::{Config, Overrides};

#[derive(Parser, Debug)]
#[command(name = "sqshandler")]
#[command(about = "Pull, push and delete messages on an Amazon SQS queue", long_about = None)]
struct Args {
    /// Config file (toml, yaml or json)
    #[arg(short, long, env = "SQSHANDLER_CONFIG")]
    config: Option<PathBuf>,

    /// Queue URL
    #[arg(short, long)]
    address: Option<String>,

    /// Maximum number of messages per pull
    #[arg(long)]
    pull_batch_size: Option<u32>,

    /// Seconds a pulled message stays hidden from other consumers
    #[arg(long)]
    visibility_timeout: Option<u32>,

    /// Seconds before a pushed message becomes visible
    #[arg(long)]
    push_delay: Option<u32>,

    /// AWS region
    #[arg(long)]
    region: Option<String>,

    /// Custom SQS endpoint, e.g. a local emulator
    #[arg(long)]
    endpoint_url: Option<String>,

    /// Named profile from the shared AWS config files
    #[arg(long)]
    profile: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", env = "SQSHANDLER_LOG_LEVEL")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            address: self.address.clone(),
            pull_batch_size: self.pull_batch_size,
            pull_visibility_seconds: self.visibility_timeout,
            push_delay_seconds: self.push_delay,
            region: self.region.clone(),
            endpoint_url: self.endpoint_url.clone(),
            profile: self.profile.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "sqshandler={level},sqshandler_core={level},sqshandler_sqs={level}",
                    level = args.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::load(args.config.as_deref())?;
    config.apply(args.overrides());
    debug!(?config, "Resolved configuration");

    let conn = connect(&config).await?;

    let mut stdout = std::io::stdout().lock();
    cli::run(&conn, args.command, &mut stdout).await
}

/// Build the connection; the queue settings are checked before any AWS
/// credential or region lookup happens
async fn connect(config: &Config) -> anyhow::Result<QueueConnection<AwsSqsTransport>> {
    let connection_config = config.connection_config()?;
    let transport = AwsSqsTransport::from_settings(&config.aws).await;
    Ok(QueueConnection::new(connection_config, transport))
}

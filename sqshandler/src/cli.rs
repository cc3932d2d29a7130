//! Subcommands and their execution

use anyhow::Context;
use clap::Subcommand;
use sqshandler_core::{QueueConnection, QueueTransport};
use std::io::Write;
use tracing::info;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Receive up to the configured batch of messages, one JSON object per line
    Pull,

    /// Send one message
    Push {
        /// Message body
        body: String,
    },

    /// Delete a message by the receipt handle returned from `pull`
    Delete {
        receipt_handle: String,
    },

    /// Print the queue address
    Describe,
}

/// Run one command against `conn`, writing results to `out`
pub async fn run<T, W>(
    conn: &QueueConnection<T>,
    command: Command,
    out: &mut W,
) -> anyhow::Result<()>
where
    T: QueueTransport,
    W: Write,
{
    match command {
        Command::Pull => {
            let messages = conn.pull().await?;
            info!(queue = %conn.describe(), count = messages.len(), "Pulled");
            for message in &messages {
                let line = serde_json::to_string(message).context("failed to encode message")?;
                writeln!(out, "{}", line)?;
            }
        }
        Command::Push { body } => {
            conn.push(body).await?;
            info!(queue = %conn.describe(), "Pushed");
        }
        Command::Delete { receipt_handle } => {
            conn.delete(receipt_handle).await?;
            info!(queue = %conn.describe(), "Deleted");
        }
        Command::Describe => {
            writeln!(out, "{}", conn.describe())?;
        }
    }
    Ok(())
}

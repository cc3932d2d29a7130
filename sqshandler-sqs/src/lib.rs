//! Amazon SQS transport for sqshandler
//!
//! Provides [`AwsSqsTransport`], a [`sqshandler_core::QueueTransport`] backed by
//! `aws-sdk-sqs`:
//! - ReceiveMessage, SendMessage, DeleteMessage
//! - Credentials and region from the SDK's default provider chain
//! - SDK retries disabled, one attempt per call

mod settings;
mod transport;

pub use settings::{load_sdk_config, AwsSettings};
pub use transport::AwsSqsTransport;

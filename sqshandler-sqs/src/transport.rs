//! `QueueTransport` backed by the AWS SDK

use async_trait::async_trait;
use aws_sdk_sqs::config::http::HttpResponse;
use aws_sdk_sqs::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_sqs::operation::RequestId;
use aws_sdk_sqs::{types, Client};
use tracing::debug;

use sqshandler_core::{
    DeleteRequest, Message, Operation, QueueError, QueueTransport, ReceiveRequest, SendRequest,
};

use crate::settings::{load_sdk_config, AwsSettings};

/// SQS client owned by a connection
#[derive(Debug, Clone)]
pub struct AwsSqsTransport {
    client: Client,
}

impl AwsSqsTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the default provider chain plus `settings`
    pub async fn from_settings(settings: &AwsSettings) -> Self {
        let config = load_sdk_config(settings).await;
        Self::new(Client::new(&config))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl QueueTransport for AwsSqsTransport {
    async fn receive(&self, request: ReceiveRequest) -> Result<Vec<Message>, QueueError> {
        let output = self
            .client
            .receive_message()
            .queue_url(request.queue_url)
            .max_number_of_messages(saturate(request.max_messages))
            .visibility_timeout(saturate(request.visibility_timeout))
            .send()
            .await
            .map_err(|e| queue_error(Operation::Receive, e))?;

        Ok(output
            .messages
            .unwrap_or_default()
            .into_iter()
            .map(convert_message)
            .collect())
    }

    async fn send(&self, request: SendRequest) -> Result<(), QueueError> {
        let output = self
            .client
            .send_message()
            .queue_url(request.queue_url)
            .message_body(request.body)
            .delay_seconds(saturate(request.delay_seconds))
            .send()
            .await
            .map_err(|e| queue_error(Operation::Send, e))?;

        debug!(message_id = ?output.message_id, "SQS accepted message");
        Ok(())
    }

    async fn delete(&self, request: DeleteRequest) -> Result<(), QueueError> {
        self.client
            .delete_message()
            .queue_url(request.queue_url)
            .receipt_handle(request.receipt_handle)
            .send()
            .await
            .map_err(|e| queue_error(Operation::Delete, e))?;
        Ok(())
    }
}

/// SQS takes 32-bit integers; larger values go out as `i32::MAX`
fn saturate(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn convert_message(message: types::Message) -> Message {
    Message {
        message_id: message.message_id.unwrap_or_default(),
        receipt_handle: message.receipt_handle.unwrap_or_default(),
        body: message.body.unwrap_or_default(),
        md5_of_body: message.md5_of_body.unwrap_or_default(),
        attributes: message
            .attributes
            .unwrap_or_default()
            .into_iter()
            .map(|(name, value)| (name.as_str().to_string(), value))
            .collect(),
    }
}

fn queue_error<E>(operation: Operation, err: SdkError<E, HttpResponse>) -> QueueError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let message = match err.message() {
        Some(message) => message.to_string(),
        None => DisplayErrorContext(&err).to_string(),
    };

    let mut error = QueueError::new(operation, message);
    if let Some(code) = err.code() {
        error = error.with_code(code);
    }
    if let Some(request_id) = err.request_id() {
        error = error.with_request_id(request_id);
    }
    error.with_source(err)
}

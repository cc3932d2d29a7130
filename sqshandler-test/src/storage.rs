//! In-memory queues behind the fake SQS endpoint

use dashmap::DashMap;
use md5::{Digest, Md5};
use std::collections::VecDeque;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum FakeSqsError {
    #[error("The specified queue does not exist: {0}")]
    QueueNotFound(String),
    #[error("The receipt handle \"{0}\" is not valid")]
    ReceiptHandleIsInvalid(String),
    #[error("Value {value} for parameter {name} is invalid")]
    InvalidParameterValue { name: &'static str, value: i64 },
}

impl FakeSqsError {
    /// Error code as reported on the wire
    pub fn code(&self) -> &'static str {
        match self {
            Self::QueueNotFound(_) => "QueueDoesNotExist",
            Self::ReceiptHandleIsInvalid(_) => "ReceiptHandleIsInvalid",
            Self::InvalidParameterValue { .. } => "InvalidParameterValue",
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoredMessage {
    pub message_id: String,
    pub receipt_handle: Option<String>,
    pub body: String,
    pub md5_of_body: String,
    pub sent_timestamp: u128,
    pub receive_count: u32,
    visible_at: Instant,
}

impl StoredMessage {
    fn new(body: String, delay: Duration) -> Self {
        let sent_timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();

        Self {
            message_id: uuid::Uuid::new_v4().to_string(),
            receipt_handle: None,
            md5_of_body: md5_hex(&body),
            body,
            sent_timestamp,
            receive_count: 0,
            visible_at: Instant::now() + delay,
        }
    }
}

pub fn md5_hex(input: &str) -> String {
    hex::encode(Md5::digest(input.as_bytes()))
}

#[derive(Debug, Default)]
pub struct FakeQueues {
    queues: DashMap<String, VecDeque<StoredMessage>>,
}

impl FakeQueues {
    pub fn create_queue(&self, url: &str) {
        info!(url = %url, "Creating fake queue");
        self.queues.entry(url.to_string()).or_default();
    }

    pub fn send_message(
        &self,
        url: &str,
        body: String,
        delay_seconds: i64,
    ) -> Result<StoredMessage, FakeSqsError> {
        if !(0..=900).contains(&delay_seconds) {
            return Err(FakeSqsError::InvalidParameterValue {
                name: "DelaySeconds",
                value: delay_seconds,
            });
        }

        let mut messages = self
            .queues
            .get_mut(url)
            .ok_or_else(|| FakeSqsError::QueueNotFound(url.to_string()))?;

        let message = StoredMessage::new(body, Duration::from_secs(delay_seconds.unsigned_abs()));
        messages.push_back(message.clone());

        info!(queue = %url, message_id = %message.message_id, "Stored message");
        Ok(message)
    }

    /// Hand out up to `max_messages` visible messages and hide them for
    /// `visibility_timeout` seconds under a fresh receipt handle
    pub fn receive_message(
        &self,
        url: &str,
        max_messages: i64,
        visibility_timeout: i64,
    ) -> Result<Vec<StoredMessage>, FakeSqsError> {
        if !(1..=10).contains(&max_messages) {
            return Err(FakeSqsError::InvalidParameterValue {
                name: "MaxNumberOfMessages",
                value: max_messages,
            });
        }
        if !(0..=43_200).contains(&visibility_timeout) {
            return Err(FakeSqsError::InvalidParameterValue {
                name: "VisibilityTimeout",
                value: visibility_timeout,
            });
        }

        let mut messages = self
            .queues
            .get_mut(url)
            .ok_or_else(|| FakeSqsError::QueueNotFound(url.to_string()))?;

        let now = Instant::now();
        let hidden_until = now + Duration::from_secs(visibility_timeout.unsigned_abs());
        let mut result = Vec::new();

        for msg in messages.iter_mut().filter(|m| m.visible_at <= now) {
            if result.len() as i64 >= max_messages {
                break;
            }
            msg.receive_count += 1;
            msg.receipt_handle = Some(uuid::Uuid::new_v4().to_string());
            msg.visible_at = hidden_until;
            result.push(msg.clone());
        }

        info!(queue = %url, count = result.len(), "Delivered messages");
        Ok(result)
    }

    pub fn delete_message(&self, url: &str, receipt_handle: &str) -> Result<(), FakeSqsError> {
        let mut messages = self
            .queues
            .get_mut(url)
            .ok_or_else(|| FakeSqsError::QueueNotFound(url.to_string()))?;

        let original_len = messages.len();
        messages.retain(|m| m.receipt_handle.as_deref() != Some(receipt_handle));

        if messages.len() == original_len {
            return Err(FakeSqsError::ReceiptHandleIsInvalid(receipt_handle.to_string()));
        }

        info!(queue = %url, receipt = %receipt_handle, "Deleted message");
        Ok(())
    }

    /// Messages still stored, visible or not
    pub fn message_count(&self, url: &str) -> usize {
        self.queues.get(url).map(|m| m.len()).unwrap_or(0)
    }
}

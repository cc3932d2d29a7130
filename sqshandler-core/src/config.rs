//! Per-queue connection configuration

use crate::message::{DeleteRequest, ReceiveRequest, SendRequest};

/// Batch size, visibility timeout and delay used by the legacy constructor
pub const LEGACY_DEFAULT: u32 = 1;

/// Immutable configuration captured when a connection is built.
///
/// Nothing is validated here. Out-of-range values go out as-is and are
/// rejected by the queue service at call time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionConfig {
    address: String,
    pull_batch_size: u32,
    pull_visibility_seconds: u32,
    push_delay_seconds: u32,
}

impl ConnectionConfig {
    /// Configuration with every numeric parameter set to 1
    pub fn new(address: impl Into<String>) -> Self {
        Self::with_params(address, LEGACY_DEFAULT, LEGACY_DEFAULT, LEGACY_DEFAULT)
    }

    pub fn with_params(
        address: impl Into<String>,
        pull_batch_size: u32,
        pull_visibility_seconds: u32,
        push_delay_seconds: u32,
    ) -> Self {
        Self {
            address: address.into(),
            pull_batch_size,
            pull_visibility_seconds,
            push_delay_seconds,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn pull_batch_size(&self) -> u32 {
        self.pull_batch_size
    }

    pub fn pull_visibility_seconds(&self) -> u32 {
        self.pull_visibility_seconds
    }

    pub fn push_delay_seconds(&self) -> u32 {
        self.push_delay_seconds
    }

    pub fn receive_request(&self) -> ReceiveRequest {
        ReceiveRequest {
            queue_url: self.address.clone(),
            max_messages: self.pull_batch_size,
            visibility_timeout: self.pull_visibility_seconds,
        }
    }

    pub fn send_request(&self, body: impl Into<String>) -> SendRequest {
        SendRequest {
            queue_url: self.address.clone(),
            body: body.into(),
            delay_seconds: self.push_delay_seconds,
        }
    }

    pub fn delete_request(&self, receipt_handle: impl Into<String>) -> DeleteRequest {
        DeleteRequest {
            queue_url: self.address.clone(),
            receipt_handle: receipt_handle.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_defaults() {
        let config = ConnectionConfig::new("https://sqs.us-east-1.amazonaws.com/1/jobs");

        assert_eq!(config.pull_batch_size(), 1);
        assert_eq!(config.pull_visibility_seconds(), 1);
        assert_eq!(config.push_delay_seconds(), 1);
        assert_eq!(
            config,
            ConnectionConfig::with_params("https://sqs.us-east-1.amazonaws.com/1/jobs", 1, 1, 1)
        );
    }

    #[test]
    fn test_identical_arguments_give_equal_configs() {
        let a = ConnectionConfig::with_params("q1", 5, 30, 2);
        let b = ConnectionConfig::with_params("q1", 5, 30, 2);

        assert_eq!(a, b);
        assert_eq!(a.receive_request(), b.receive_request());
        assert_ne!(a, ConnectionConfig::with_params("q1", 5, 30, 3));
    }

    #[test]
    fn test_request_shapes() {
        let config = ConnectionConfig::with_params("q1", 5, 30, 2);

        assert_eq!(
            config.receive_request(),
            ReceiveRequest {
                queue_url: "q1".to_string(),
                max_messages: 5,
                visibility_timeout: 30,
            }
        );
        assert_eq!(
            config.send_request("hello"),
            SendRequest {
                queue_url: "q1".to_string(),
                body: "hello".to_string(),
                delay_seconds: 2,
            }
        );
        assert_eq!(
            config.delete_request("handle-123"),
            DeleteRequest {
                queue_url: "q1".to_string(),
                receipt_handle: "handle-123".to_string(),
            }
        );
    }

    #[test]
    fn test_zero_values_pass_through() {
        // No local validation; the service decides
        let config = ConnectionConfig::with_params("", 0, 0, 0);
        assert_eq!(config.receive_request().max_messages, 0);
        assert_eq!(config.address(), "");
    }
}

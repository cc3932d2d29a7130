//! Queue connection

use tracing::{debug, warn};

use crate::config::ConnectionConfig;
use crate::error::QueueError;
use crate::message::Message;
use crate::transport::QueueTransport;

/// Connection to a single queue.
///
/// Holds the configuration fixed at construction and the transport used to
/// reach the service. Each operation is one request with no retry; calls do
/// not depend on one another, so a shared connection can be used from many
/// tasks at once.
#[derive(Debug, Clone)]
pub struct QueueConnection<T> {
    config: ConnectionConfig,
    transport: T,
}

impl<T: QueueTransport> QueueConnection<T> {
    pub fn new(config: ConnectionConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// Receive up to `pull_batch_size` messages, hiding them for
    /// `pull_visibility_seconds`
    pub async fn pull(&self) -> Result<Vec<Message>, QueueError> {
        let request = self.config.receive_request();
        debug!(
            queue = %request.queue_url,
            max_messages = request.max_messages,
            visibility_timeout = request.visibility_timeout,
            "Pulling messages"
        );

        match self.transport.receive(request).await {
            Ok(messages) => {
                debug!(queue = %self.config.address(), count = messages.len(), "Pulled messages");
                Ok(messages)
            }
            Err(e) => {
                warn!(queue = %self.config.address(), error = %e, "Pull failed");
                Err(e)
            }
        }
    }

    /// Send one message delayed by `push_delay_seconds`
    pub async fn push(&self, body: impl Into<String>) -> Result<(), QueueError> {
        let request = self.config.send_request(body);
        debug!(
            queue = %request.queue_url,
            delay_seconds = request.delay_seconds,
            bytes = request.body.len(),
            "Pushing message"
        );

        self.transport
            .send(request)
            .await
            .inspect_err(|e| warn!(queue = %self.config.address(), error = %e, "Push failed"))
    }

    /// Delete the message identified by a receipt handle from an earlier pull
    pub async fn delete(&self, receipt_handle: impl Into<String>) -> Result<(), QueueError> {
        let request = self.config.delete_request(receipt_handle);
        debug!(queue = %request.queue_url, receipt = %request.receipt_handle, "Deleting message");

        self.transport
            .delete(request)
            .await
            .inspect_err(|e| warn!(queue = %self.config.address(), error = %e, "Delete failed"))
    }
}

impl<T> QueueConnection<T> {
    /// The queue address this connection was built with
    pub fn describe(&self) -> &str {
        self.config.address()
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Operation;
    use crate::message::{DeleteRequest, ReceiveRequest, SendRequest};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Debug, PartialEq, Eq)]
    enum Call {
        Receive(ReceiveRequest),
        Send(SendRequest),
        Delete(DeleteRequest),
    }

    #[derive(Default)]
    struct FakeTransport {
        calls: Mutex<Vec<Call>>,
        fail: bool,
    }

    impl FakeTransport {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn error(&self, operation: Operation) -> Result<(), QueueError> {
            if self.fail {
                Err(QueueError::new(operation, "Rate exceeded").with_code("ThrottlingException"))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl QueueTransport for FakeTransport {
        async fn receive(&self, request: ReceiveRequest) -> Result<Vec<Message>, QueueError> {
            self.calls.lock().push(Call::Receive(request));
            self.error(Operation::Receive)?;
            Ok(vec![Message {
                message_id: "m-1".to_string(),
                receipt_handle: "rh-1".to_string(),
                body: "payload".to_string(),
                ..Message::default()
            }])
        }

        async fn send(&self, request: SendRequest) -> Result<(), QueueError> {
            self.calls.lock().push(Call::Send(request));
            self.error(Operation::Send)
        }

        async fn delete(&self, request: DeleteRequest) -> Result<(), QueueError> {
            self.calls.lock().push(Call::Delete(request));
            self.error(Operation::Delete)
        }
    }

    fn connection(transport: Arc<FakeTransport>) -> QueueConnection<Arc<FakeTransport>> {
        QueueConnection::new(ConnectionConfig::with_params("q1", 5, 30, 2), transport)
    }

    #[test]
    fn test_describe_returns_address() {
        for address in ["q1", "https://sqs.eu-west-1.amazonaws.com/123456789012/orders"] {
            let conn = QueueConnection::new(ConnectionConfig::new(address), FakeTransport::default());
            assert_eq!(conn.describe(), address);
        }
    }

    #[tokio::test]
    async fn test_operations_shape_requests() {
        let transport = Arc::new(FakeTransport::default());
        let conn = connection(transport.clone());

        let messages = conn.pull().await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].receipt_handle, "rh-1");

        conn.push("hello").await.unwrap();
        conn.delete("handle-123").await.unwrap();

        let calls = transport.calls.lock();
        assert_eq!(
            *calls,
            vec![
                Call::Receive(ReceiveRequest {
                    queue_url: "q1".to_string(),
                    max_messages: 5,
                    visibility_timeout: 30,
                }),
                Call::Send(SendRequest {
                    queue_url: "q1".to_string(),
                    body: "hello".to_string(),
                    delay_seconds: 2,
                }),
                Call::Delete(DeleteRequest {
                    queue_url: "q1".to_string(),
                    receipt_handle: "handle-123".to_string(),
                }),
            ]
        );
    }

    #[tokio::test]
    async fn test_errors_are_returned_after_one_call() {
        let transport = Arc::new(FakeTransport::failing());
        let conn = connection(transport.clone());

        let err = conn.pull().await.unwrap_err();
        assert_eq!(err.operation, Operation::Receive);
        assert_eq!(err.code.as_deref(), Some("ThrottlingException"));
        assert_eq!(transport.calls.lock().len(), 1);

        let err = conn.push("hello").await.unwrap_err();
        assert_eq!(err.operation, Operation::Send);
        assert_eq!(transport.calls.lock().len(), 2);

        let err = conn.delete("stale").await.unwrap_err();
        assert_eq!(err.operation, Operation::Delete);
        assert_eq!(err.message, "Rate exceeded");
        assert_eq!(transport.calls.lock().len(), 3);
    }

    #[tokio::test]
    async fn test_concurrent_calls_share_one_connection() {
        let transport = Arc::new(FakeTransport::default());
        let conn = Arc::new(connection(transport.clone()));

        let mut handles = Vec::new();
        for i in 0..8 {
            let conn = conn.clone();
            handles.push(tokio::spawn(async move {
                conn.push(format!("msg-{}", i)).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let calls = transport.calls.lock();
        assert_eq!(calls.len(), 8);
        assert!(calls.iter().all(|c| matches!(c, Call::Send(r) if r.delay_seconds == 2)));
    }

    #[tokio::test]
    async fn test_boxed_transport_connection() {
        let transport: Box<dyn QueueTransport> = Box::new(FakeTransport::failing());
        let conn = QueueConnection::new(ConnectionConfig::with_params("q1", 5, 30, 2), transport);

        let err = conn.pull().await.unwrap_err();
        assert_eq!(err.operation, Operation::Receive);
        assert_eq!(err.code.as_deref(), Some("ThrottlingException"));

        let err = conn.delete("rh-1").await.unwrap_err();
        assert_eq!(err.operation, Operation::Delete);
        assert_eq!(conn.describe(), "q1");
    }
}

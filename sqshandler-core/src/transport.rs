//! Seam between a connection and the queue service client

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::QueueError;
use crate::message::{DeleteRequest, Message, ReceiveRequest, SendRequest};

/// One round trip per call against the queue service.
///
/// Implementations must not retry; whatever the service answers is returned.
#[async_trait]
pub trait QueueTransport: Send + Sync {
    async fn receive(&self, request: ReceiveRequest) -> Result<Vec<Message>, QueueError>;

    async fn send(&self, request: SendRequest) -> Result<(), QueueError>;

    async fn delete(&self, request: DeleteRequest) -> Result<(), QueueError>;
}

#[async_trait]
impl<T: QueueTransport + ?Sized> QueueTransport for Arc<T> {
    async fn receive(&self, request: ReceiveRequest) -> Result<Vec<Message>, QueueError> {
        (**self).receive(request).await
    }

    async fn send(&self, request: SendRequest) -> Result<(), QueueError> {
        (**self).send(request).await
    }

    async fn delete(&self, request: DeleteRequest) -> Result<(), QueueError> {
        (**self).delete(request).await
    }
}

#[async_trait]
impl<T: QueueTransport + ?Sized> QueueTransport for Box<T> {
    async fn receive(&self, request: ReceiveRequest) -> Result<Vec<Message>, QueueError> {
        (**self).receive(request).await
    }

    async fn send(&self, request: SendRequest) -> Result<(), QueueError> {
        (**self).send(request).await
    }

    async fn delete(&self, request: DeleteRequest) -> Result<(), QueueError> {
        (**self).delete(request).await
    }
}

//! In-memory transport that records requests

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

use sqshandler_core::{
    DeleteRequest, Message, QueueError, QueueTransport, ReceiveRequest, SendRequest,
};

/// A request seen by [`RecordingTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Receive(ReceiveRequest),
    Send(SendRequest),
    Delete(DeleteRequest),
}

/// Test double for the queue service.
///
/// Every call is recorded before anything else happens. A queued failure is
/// consumed by the next call of any kind; otherwise receives hand out the
/// scripted batches in order and return nothing once they run out.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<RecordedCall>>,
    batches: Mutex<VecDeque<Vec<Message>>>,
    failures: Mutex<VecDeque<QueueError>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a batch to be returned by a later receive
    pub fn push_batch(&self, messages: Vec<Message>) {
        self.batches.lock().push_back(messages);
    }

    /// Make the next call fail with `error`
    pub fn fail_next(&self, error: QueueError) {
        self.failures.lock().push_back(error);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        self.calls.lock().last().cloned()
    }

    fn record(&self, call: RecordedCall) -> Result<(), QueueError> {
        self.calls.lock().push(call);
        match self.failures.lock().pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl QueueTransport for RecordingTransport {
    async fn receive(&self, request: ReceiveRequest) -> Result<Vec<Message>, QueueError> {
        self.record(RecordedCall::Receive(request))?;
        Ok(self.batches.lock().pop_front().unwrap_or_default())
    }

    async fn send(&self, request: SendRequest) -> Result<(), QueueError> {
        self.record(RecordedCall::Send(request))
    }

    async fn delete(&self, request: DeleteRequest) -> Result<(), QueueError> {
        self.record(RecordedCall::Delete(request))
    }
}

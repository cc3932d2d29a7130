//! Queue service error type

use std::fmt;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Remote operation that produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Receive,
    Send,
    Delete,
}

impl Operation {
    /// Name of the operation on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Receive => "ReceiveMessage",
            Self::Send => "SendMessage",
            Self::Delete => "DeleteMessage",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error reported by the external queue service or the transport reaching it.
///
/// Network failures, authorization failures, malformed requests and
/// throttling all land here. The connection never inspects or reclassifies
/// it; `code` and `request_id` are only filled when the service sent them.
#[derive(Debug, Error)]
#[error("{operation} failed: {}", detail(.code.as_deref(), .message.as_str()))]
pub struct QueueError {
    pub operation: Operation,
    pub code: Option<String>,
    pub message: String,
    pub request_id: Option<String>,
    #[source]
    pub source: Option<BoxError>,
}

impl QueueError {
    pub fn new(operation: Operation, message: impl Into<String>) -> Self {
        Self {
            operation,
            code: None,
            message: message.into(),
            request_id: None,
            source: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }
}

fn detail(code: Option<&str>, message: &str) -> String {
    match code {
        Some(code) => format!("{}: {}", code, message),
        None => message.to_string(),
    }
}

//! In-process fake SQS server

use axum::{routing::post, Router};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::handlers::handle_request;
use crate::storage::FakeQueues;
use crate::FAKE_ACCOUNT_ID;

/// A request as it arrived on the wire
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// Value of the `X-Amz-Target` header, e.g. `AmazonSQS.SendMessage`
    pub target: String,
    pub body: Value,
}

/// Error response served instead of handling the next request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectedFailure {
    pub status: u16,
    pub code: String,
    pub message: String,
}

/// State shared by the fake server's handlers
#[derive(Debug, Default)]
pub struct FakeSqsState {
    queues: FakeQueues,
    requests: Mutex<Vec<RecordedRequest>>,
    failures: Mutex<VecDeque<InjectedFailure>>,
}

impl FakeSqsState {
    pub(crate) fn queues(&self) -> &FakeQueues {
        &self.queues
    }

    pub(crate) fn record(&self, request: RecordedRequest) {
        self.requests.lock().push(request);
    }

    pub(crate) fn take_failure(&self) -> Option<InjectedFailure> {
        self.failures.lock().pop_front()
    }
}

/// A running fake SQS endpoint bound to a random local port
pub struct FakeSqsServer {
    addr: SocketAddr,
    base_url: String,
    state: Arc<FakeSqsState>,
    handle: JoinHandle<()>,
}

impl FakeSqsServer {
    /// Start serving on `127.0.0.1` with an OS-assigned port
    pub async fn start() -> Result<Self, TestError> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(TestError::Bind)?;
        let addr = listener.local_addr().map_err(TestError::Bind)?;
        let base_url = format!("http://{}", addr);

        let state = Arc::new(FakeSqsState::default());
        let router = Router::new()
            .route("/", post(handle_request))
            .with_state(state.clone());

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                warn!(error = %e, "Fake SQS server stopped");
            }
        });

        info!(addr = %addr, "Fake SQS server ready");
        Ok(Self {
            addr,
            base_url,
            state,
            handle,
        })
    }

    /// Get the base URL
    pub fn url(&self) -> &str {
        &self.base_url
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Create a queue and return its URL
    pub fn create_queue(&self, name: &str) -> String {
        let url = format!("{}/{}/{}", self.base_url, FAKE_ACCOUNT_ID, name);
        self.state.queues.create_queue(&url);
        url
    }

    /// Serve `code` with `status` for the next request, whatever it is
    pub fn fail_next(&self, status: u16, code: impl Into<String>, message: impl Into<String>) {
        self.state.failures.lock().push_back(InjectedFailure {
            status,
            code: code.into(),
            message: message.into(),
        });
    }

    /// Every request received so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().clone()
    }

    /// Requests for one operation, e.g. `"ReceiveMessage"`
    pub fn requests_for(&self, operation: &str) -> Vec<RecordedRequest> {
        let target = format!("AmazonSQS.{}", operation);
        self.state
            .requests
            .lock()
            .iter()
            .filter(|r| r.target == target)
            .cloned()
            .collect()
    }

    pub fn message_count(&self, queue_url: &str) -> usize {
        self.state.queues.message_count(queue_url)
    }

    /// SDK client pointed at this server with static test credentials
    pub fn sdk_client(&self) -> aws_sdk_sqs::Client {
        crate::client::sdk_client(&self.base_url)
    }

    /// Raw JSON client for requests the SDK would refuse to build
    pub fn raw_client(&self) -> crate::RawSqsClient {
        crate::RawSqsClient::new(self.base_url.clone())
    }
}

impl Drop for FakeSqsServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Errors that can occur with the fake server
#[derive(Debug)]
pub enum TestError {
    Bind(std::io::Error),
}

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestError::Bind(e) => write!(f, "Failed to bind fake SQS server: {}", e),
        }
    }
}

impl std::error::Error for TestError {}

//! Test utilities for sqshandler
//!
//! Two ways to stand in for the queue service:
//! - [`RecordingTransport`]: an in-memory `QueueTransport` that records every
//!   request and replays scripted responses and failures
//! - [`FakeSqsServer`]: an in-process HTTP server speaking the SQS JSON
//!   protocol, so the real SDK client can be exercised end to end
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sqshandler_test::FakeSqsServer;
//!
//! #[tokio::test]
//! async fn test_send() {
//!     let server = FakeSqsServer::start().await.unwrap();
//!     let queue_url = server.create_queue("jobs");
//!     let client = server.sdk_client();
//!
//!     client
//!         .send_message()
//!         .queue_url(&queue_url)
//!         .message_body("hello")
//!         .send()
//!         .await
//!         .unwrap();
//!
//!     assert_eq!(server.message_count(&queue_url), 1);
//! }
//! ```

pub mod client;
pub mod handlers;
pub mod recording;
pub mod server;
mod storage;

pub use client::{sdk_client, ClientError, RawResponse, RawSqsClient};
pub use recording::{RecordedCall, RecordingTransport};
pub use server::{FakeSqsServer, InjectedFailure, RecordedRequest, TestError};

/// Account id used in fake queue URLs
pub const FAKE_ACCOUNT_ID: &str = "000000000000";

/// Visibility timeout applied when a receive request does not carry one
pub const DEFAULT_VISIBILITY_TIMEOUT_SECS: u64 = 30;

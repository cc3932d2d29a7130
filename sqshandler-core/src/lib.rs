//! Core types and traits for sqshandler
//!
//! A [`QueueConnection`] holds the immutable per-queue configuration and
//! forwards pull, push and delete to an injected [`QueueTransport`]. Every
//! call is a single request; errors come back exactly as the transport
//! produced them.

pub mod config;
pub mod connection;
pub mod error;
pub mod message;
pub mod transport;

pub use config::ConnectionConfig;
pub use connection::QueueConnection;
pub use error::{BoxError, Operation, QueueError};
pub use message::{DeleteRequest, Message, ReceiveRequest, SendRequest};
pub use transport::QueueTransport;

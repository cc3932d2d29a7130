//! Messages and the request shapes handed to a transport

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A message delivered by a pull.
///
/// Fields the service left out are empty rather than invented.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: String,
    /// Delivery handle; pass it back to delete the message
    pub receipt_handle: String,
    pub body: String,
    pub md5_of_body: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveRequest {
    pub queue_url: String,
    pub max_messages: u32,
    pub visibility_timeout: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
    pub queue_url: String,
    pub body: String,
    pub delay_seconds: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub queue_url: String,
    pub receipt_handle: String,
}

//! Clients for talking to the fake SQS server

use aws_sdk_sqs::config::{retry::RetryConfig, BehaviorVersion, Credentials, Region};
use aws_sdk_sqs::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

/// Create an SDK client pointing at `endpoint_url`.
///
/// Static credentials, `us-east-1`, retries off. Nothing is read from the
/// environment or the shared config files.
pub fn sdk_client(endpoint_url: &str) -> Client {
    let config = aws_sdk_sqs::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .endpoint_url(endpoint_url)
        .credentials_provider(Credentials::new("test", "test", None, None, "test"))
        .region(Region::new("us-east-1"))
        .retry_config(RetryConfig::disabled())
        .build();

    Client::from_conf(config)
}

/// Client that posts hand-built JSON bodies to the fake server
pub struct RawSqsClient {
    base_url: String,
    client: reqwest::Client,
}

/// Status and decoded body of a raw call
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Value,
}

impl RawSqsClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Post `body` with `X-Amz-Target: AmazonSQS.<operation>`
    pub async fn call(&self, operation: &str, body: &Value) -> Result<RawResponse, ClientError> {
        let url = format!("{}/", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("X-Amz-Target", format!("AmazonSQS.{}", operation))
            .header(CONTENT_TYPE, "application/x-amz-json-1.0")
            .body(body.to_string())
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        let body =
            serde_json::from_str(&text).map_err(|e| ClientError::ParseError(e.to_string()))?;
        Ok(RawResponse { status, body })
    }
}

/// Client errors
#[derive(Debug)]
pub enum ClientError {
    RequestError(reqwest::Error),
    ParseError(String),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::RequestError(e) => write!(f, "Request error: {}", e),
            ClientError::ParseError(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::RequestError(e)
    }
}

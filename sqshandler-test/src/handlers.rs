//! HTTP handlers for the fake SQS endpoint (JSON protocol)

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::Response,
};
use bytes::Bytes;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

use crate::server::{FakeSqsState, InjectedFailure, RecordedRequest};
use crate::storage::{FakeSqsError, StoredMessage};
use crate::DEFAULT_VISIBILITY_TIMEOUT_SECS;

const JSON_CONTENT_TYPE: &str = "application/x-amz-json-1.0";

/// Handle SQS requests based on X-Amz-Target header
pub async fn handle_request(
    State(state): State<Arc<FakeSqsState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let target = headers
        .get("x-amz-target")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    info!(target = %target, "SQS request");

    let input: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "SerializationException",
                &format!("Malformed request body: {}", e),
            );
        }
    };

    state.record(RecordedRequest {
        target: target.clone(),
        body: input.clone(),
    });

    if let Some(InjectedFailure {
        status,
        code,
        message,
    }) = state.take_failure()
    {
        warn!(target = %target, code = %code, "Injected failure");
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return error_response(status, &code, &message);
    }

    match target.as_str() {
        "AmazonSQS.SendMessage" => handle_send_message(&state, &input),
        "AmazonSQS.ReceiveMessage" => handle_receive_message(&state, &input),
        "AmazonSQS.DeleteMessage" => handle_delete_message(&state, &input),
        _ => {
            warn!(target = %target, "Unknown SQS operation");
            error_response(
                StatusCode::BAD_REQUEST,
                "UnknownOperationException",
                &format!("Unknown operation: {}", target),
            )
        }
    }
}

// === Handlers ===

fn handle_send_message(state: &FakeSqsState, input: &Value) -> Response {
    let queue_url = match required_str(input, "QueueUrl") {
        Ok(url) => url,
        Err(response) => return response,
    };
    let message_body = match required_str(input, "MessageBody") {
        Ok(body) => body,
        Err(response) => return response,
    };
    let delay_seconds = input
        .get("DelaySeconds")
        .and_then(Value::as_i64)
        .unwrap_or(0);

    match state
        .queues()
        .send_message(queue_url, message_body.to_string(), delay_seconds)
    {
        Ok(msg) => json_response(
            StatusCode::OK,
            &json!({
                "MessageId": msg.message_id,
                "MD5OfMessageBody": msg.md5_of_body,
            }),
        ),
        Err(e) => storage_error(&e),
    }
}

fn handle_receive_message(state: &FakeSqsState, input: &Value) -> Response {
    let queue_url = match required_str(input, "QueueUrl") {
        Ok(url) => url,
        Err(response) => return response,
    };
    let max_messages = input
        .get("MaxNumberOfMessages")
        .and_then(Value::as_i64)
        .unwrap_or(1);
    let visibility_timeout = input
        .get("VisibilityTimeout")
        .and_then(Value::as_i64)
        .unwrap_or(DEFAULT_VISIBILITY_TIMEOUT_SECS as i64);

    match state
        .queues()
        .receive_message(queue_url, max_messages, visibility_timeout)
    {
        Ok(messages) => {
            let messages: Vec<Value> = messages.iter().map(message_json).collect();
            json_response(StatusCode::OK, &json!({ "Messages": messages }))
        }
        Err(e) => storage_error(&e),
    }
}

fn handle_delete_message(state: &FakeSqsState, input: &Value) -> Response {
    let queue_url = match required_str(input, "QueueUrl") {
        Ok(url) => url,
        Err(response) => return response,
    };
    let receipt_handle = match required_str(input, "ReceiptHandle") {
        Ok(handle) => handle,
        Err(response) => return response,
    };

    match state.queues().delete_message(queue_url, receipt_handle) {
        Ok(()) => json_response(StatusCode::OK, &json!({})),
        Err(e) => storage_error(&e),
    }
}

// === JSON Helpers ===

fn required_str<'a>(input: &'a Value, name: &str) -> Result<&'a str, Response> {
    input.get(name).and_then(Value::as_str).ok_or_else(|| {
        error_response(
            StatusCode::BAD_REQUEST,
            "MissingParameter",
            &format!("The request must contain the parameter {}.", name),
        )
    })
}

fn message_json(msg: &StoredMessage) -> Value {
    json!({
        "MessageId": msg.message_id,
        "ReceiptHandle": msg.receipt_handle,
        "MD5OfBody": msg.md5_of_body,
        "Body": msg.body,
        "Attributes": {
            "ApproximateReceiveCount": msg.receive_count.to_string(),
            "SentTimestamp": msg.sent_timestamp.to_string(),
        },
    })
}

fn storage_error(e: &FakeSqsError) -> Response {
    error_response(StatusCode::BAD_REQUEST, e.code(), &e.to_string())
}

fn json_response(status: StatusCode, body: &Value) -> Response {
    let mut response = Response::new(Body::from(body.to_string()));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(JSON_CONTENT_TYPE),
    );
    insert_request_id(headers);
    response
}

fn error_response(status: StatusCode, code: &str, message: &str) -> Response {
    let body = json!({
        "__type": format!("com.amazonaws.sqs#{}", code),
        "message": message,
    });
    let mut response = json_response(status, &body);
    if let Ok(value) = HeaderValue::from_str(&format!("{};Sender", code)) {
        response.headers_mut().insert("x-amzn-query-error", value);
    }
    response
}

fn insert_request_id(headers: &mut HeaderMap) {
    if let Ok(value) = HeaderValue::from_str(&uuid::Uuid::new_v4().to_string()) {
        headers.insert("x-amzn-requestid", value);
    }
}

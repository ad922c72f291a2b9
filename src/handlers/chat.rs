//! Chat request handler
//!
//! Takes an API Gateway style event (`{"body": ...}`), runs the agent on the
//! message and answers with `{statusCode, headers, body}`. Failures never
//! escape: they become a 500 response with `success: false`.
//!
//! Success and error responses carry different CORS header sets. The error
//! path only sets `Access-Control-Allow-Origin`; deployed clients have only
//! ever seen that, so it stays as is.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::agent::ChatAgent;

pub const SUCCESS_HEADERS: [(&str, &str); 4] = [
    ("Content-Type", "application/json"),
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "POST, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type, X-Api-Key"),
];

pub const ERROR_HEADERS: [(&str, &str); 2] = [
    ("Content-Type", "application/json"),
    ("Access-Control-Allow-Origin", "*"),
];

/// Inbound chat payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    /// Prior turns as sent by the client. Read and logged, not forwarded to the agent.
    #[serde(default)]
    pub chat_history: Vec<Value>,
}

/// Body of every handler response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: Option<String>,
    pub timestamp: String,
    pub success: bool,
    pub error: Option<String>,
}

impl ChatResponse {
    pub fn success(response: String) -> Self {
        Self {
            response: Some(response),
            timestamp: utc_timestamp(),
            success: true,
            error: None,
        }
    }

    pub fn failure(error: String) -> Self {
        Self {
            response: None,
            timestamp: utc_timestamp(),
            success: false,
            error: Some(error),
        }
    }
}

/// API Gateway proxy response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl HandlerResponse {
    /// 500 response with the reduced error header set.
    pub fn failure(error: String) -> Self {
        Self::new(500, &ERROR_HEADERS, &ChatResponse::failure(error))
    }

    fn new(status_code: u16, headers: &[(&str, &str)], body: &ChatResponse) -> Self {
        let body = serde_json::to_string(body).unwrap_or_else(|e| {
            format!(
                r#"{{"response": null, "timestamp": "{}", "success": false, "error": "Failed to serialize response: {}"}}"#,
                utc_timestamp(),
                e
            )
        });
        Self {
            status_code,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("Invalid JSON body: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Request body must be a JSON object")]
    NotAnObject,

    #[error("Invalid request: {0}")]
    InvalidRequest(#[source] serde_json::Error),
}

/// ISO-8601 UTC timestamp with microseconds and a trailing `Z`
pub fn utc_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// Decode the body of an event, accepting both a JSON string and an already
/// parsed object. A missing body counts as `{}`; an explicit `null` does not.
pub fn parse_body(event: &Value) -> Result<Value, RequestError> {
    let body = match event.get("body") {
        None => Value::Object(Default::default()),
        Some(Value::String(raw)) => serde_json::from_str(raw).map_err(RequestError::InvalidJson)?,
        Some(parsed) => parsed.clone(),
    };
    if !body.is_object() {
        return Err(RequestError::NotAnObject);
    }
    Ok(body)
}

pub fn parse_chat_request(body: Value) -> Result<ChatRequest, RequestError> {
    serde_json::from_value(body).map_err(RequestError::InvalidRequest)
}

/// Handle one chat event end to end.
pub async fn handle_event<A: ChatAgent>(agent: &A, event: &Value) -> HandlerResponse {
    log::info!("Received event: {}", event);

    match process(agent, event).await {
        Ok(reply) => {
            let body = ChatResponse::success(reply);
            let response = HandlerResponse::new(200, &SUCCESS_HEADERS, &body);
            log::info!("Final response body: {}", response.body);
            response
        }
        Err(e) => {
            log::error!("Error processing request: {}", e);
            HandlerResponse::failure(e)
        }
    }
}

async fn process<A: ChatAgent>(agent: &A, event: &Value) -> Result<String, String> {
    let body = parse_body(event).map_err(|e| e.to_string())?;
    log::info!("Parsed body: {}", body);

    let request = parse_chat_request(body).map_err(|e| e.to_string())?;
    log::info!("Message: {}", request.message);
    log::info!("Chat history length: {}", request.chat_history.len());

    let reply = agent
        .respond(&request.message)
        .await
        .map_err(|e| e.to_string())?;
    log::info!("Agent response: {}", reply);
    Ok(reply)
}

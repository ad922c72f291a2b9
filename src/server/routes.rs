//! HTTP Routes for the chat server
//!
//! - `POST /chat` - Raw request body is forwarded as the event `body`
//! - `OPTIONS /chat` - CORS preflight
//! - `/health` - Health check endpoint

use std::sync::Arc;

use axum::{
    Json,
    body::Body,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::agent::ChatAgent;
use crate::handlers::chat::{HandlerResponse, SUCCESS_HEADERS, handle_event};

/// Health check endpoint.
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "iot-fleet-agent",
        "version": crate::VERSION
    }))
}

/// Chat endpoint: wraps the body in an event and runs the handler.
pub async fn chat<A: ChatAgent + 'static>(State(agent): State<Arc<A>>, body: String) -> Response {
    let event = json!({ "body": body });
    into_http(handle_event(agent.as_ref(), &event).await)
}

/// CORS preflight for `/chat`.
pub async fn preflight() -> Response {
    let mut builder = Response::builder().status(StatusCode::OK);
    for (name, value) in SUCCESS_HEADERS {
        builder = builder.header(name, value);
    }
    builder
        .body(Body::empty())
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// Convert a handler response into an HTTP response.
pub fn into_http(response: HandlerResponse) -> Response {
    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = Response::builder().status(status);
    for (name, value) in &response.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
        .body(Body::from(response.body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

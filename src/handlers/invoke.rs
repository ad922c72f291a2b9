use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};

use crate::agent::BedrockFleetAgent;
use crate::config::types::Config;
use crate::error::FleetError;
use crate::handlers::chat::{HandlerResponse, handle_event};

pub const DEFAULT_TEST_MESSAGE: &str = "Tell me about all the iot things";

/// Event with a JSON-string body, as API Gateway delivers it.
pub fn test_event(message: &str) -> Value {
    json!({
        "body": json!({
            "message": message,
            "chat_history": []
        })
        .to_string()
    })
}

/// Read an event from a JSON file.
pub fn read_event(path: &Path) -> crate::Result<Value> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| FleetError::InvalidEvent {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Run the chat handler once, locally, and print the result.
pub async fn handle_invoke(
    message: Option<String>,
    event_file: Option<PathBuf>,
    config: &Config,
) -> crate::Result<()> {
    let event = match event_file {
        Some(path) => read_event(&path)?,
        None => test_event(message.as_deref().unwrap_or(DEFAULT_TEST_MESSAGE)),
    };

    // Agent setup failures are reported like any other handler failure.
    let result =
        match BedrockFleetAgent::from_env(config.agent.clone(), config.location.clone()).await {
            Ok(agent) => {
                log::info!("Invoking agent with model {}", agent.model());
                handle_event(&agent, &event).await
            }
            Err(e) => {
                log::error!("Error building agent: {}", e);
                HandlerResponse::failure(e.to_string())
            }
        };

    println!("{}", render_result(&result)?);
    Ok(())
}

/// Status line followed by the pretty-printed response body.
pub fn render_result(result: &HandlerResponse) -> crate::Result<String> {
    let body: Value = serde_json::from_str(&result.body)?;
    Ok(format!(
        "Status Code: {}\nResponse Body:\n{}",
        result.status_code,
        serde_json::to_string_pretty(&body)?
    ))
}

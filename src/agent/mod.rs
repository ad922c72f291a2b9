//! Agent module for the IoT fleet assistant
//!
//! Builds a Rig agent on AWS Bedrock with the fleet system prompt and the four
//! fleet tools, and runs one prompt per request. Nothing is kept between
//! requests: every call to [`ChatAgent::respond`] builds a fresh agent.
//!
//! # Usage
//!
//! ```bash
//! # One-off invocation with the default test message
//! fleet-ctl invoke
//!
//! # Local HTTP endpoint
//! fleet-ctl serve --port 9090
//! ```

pub mod prompts;
pub mod tools;

use std::future::Future;
use std::sync::Arc;

use rig::{
    client::{CompletionClient, ProviderClient},
    completion::Prompt,
};

use crate::config::types::{AgentConfig, LocationQueryConfig};
use tools::{
    AthenaQueryService, ConnectedDevicesTool, IotRegistry, ListDevicesTool, ListThingTypesTool,
    VehicleLocationTool,
};

/// Error types for the agent
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Client error: {0}")]
    ClientError(String),
}

pub type AgentResult<T> = Result<T, AgentError>;

/// Something that turns a user message into an assistant reply
pub trait ChatAgent: Send + Sync {
    fn respond(&self, message: &str) -> impl Future<Output = AgentResult<String>> + Send;
}

/// Fleet assistant backed by Bedrock, IoT Core and Athena
pub struct BedrockFleetAgent {
    client: rig_bedrock::client::Client,
    agent_config: AgentConfig,
    location_config: LocationQueryConfig,
    registry: Arc<IotRegistry>,
    analytics: Arc<AthenaQueryService>,
}

impl BedrockFleetAgent {
    /// Create the agent from the ambient AWS environment.
    ///
    /// Must be called from a multi-threaded tokio runtime.
    pub async fn from_env(
        agent_config: AgentConfig,
        location_config: LocationQueryConfig,
    ) -> AgentResult<Self> {
        let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        if sdk_config.region().is_none() {
            return Err(AgentError::ClientError(
                "No AWS region configured. Set AWS_REGION or a profile region.".to_string(),
            ));
        }

        // Bedrock uses AWS credentials from environment
        let client = rig_bedrock::client::Client::from_env();

        Ok(Self {
            client,
            agent_config,
            location_config,
            registry: Arc::new(IotRegistry::new(&sdk_config)),
            analytics: Arc::new(AthenaQueryService::new(&sdk_config)),
        })
    }

    pub fn model(&self) -> &str {
        &self.agent_config.model
    }
}

impl ChatAgent for BedrockFleetAgent {
    async fn respond(&self, message: &str) -> AgentResult<String> {
        let preamble = prompts::fleet_system_prompt();

        let agent = self
            .client
            .agent(&self.agent_config.model)
            .preamble(&preamble)
            .max_tokens(self.agent_config.max_tokens)
            .tool(ListDevicesTool::new(Arc::clone(&self.registry)))
            .tool(ListThingTypesTool::new(Arc::clone(&self.registry)))
            .tool(ConnectedDevicesTool::new(Arc::clone(&self.registry)))
            .tool(VehicleLocationTool::new(
                Arc::clone(&self.analytics),
                self.location_config.clone(),
            ))
            .build();

        agent
            .prompt(message)
            .multi_turn(self.agent_config.max_turns)
            .await
            .map_err(|e| AgentError::ProviderError(e.to_string()))
    }
}

//! # IoT Fleet Agent
//!
//! Two independent pieces of AWS glue:
//!
//! - **Profile inspector**: for each named AWS profile, finds the API Gateway
//!   invoke URL and the first API key value.
//! - **Chat handler**: forwards a chat message to a Bedrock agent equipped with
//!   IoT Core and Athena lookup tools and returns an API Gateway style response.
//!
//! ## Example
//!
//! ```rust,no_run
//! use iot_fleet_agent::agent::BedrockFleetAgent;
//! use iot_fleet_agent::config::types::Config;
//! use iot_fleet_agent::handlers::handle_event;
//!
//! # async fn run() -> iot_fleet_agent::Result<()> {
//! let config = Config::default();
//! let agent = BedrockFleetAgent::from_env(config.agent, config.location).await?;
//! let event = serde_json::json!({"body": r#"{"message": "Which vehicles are online?"}"#});
//! let response = handle_event(&agent, &event).await;
//! println!("{}", response.body);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod inspector;
pub mod server;

pub use error::{FleetError, Result};
use cli::Commands;
use config::types::Config;

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub async fn run_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Inspect { profiles } => {
            let profiles = if profiles.is_empty() {
                config.inspector.profiles.clone()
            } else {
                profiles
            };
            handlers::handle_inspect(&profiles, &config.inspector.default_region).await
        }
        Commands::Invoke { message, event } => handlers::handle_invoke(message, event, config).await,
        Commands::Serve { host, port } => handlers::handle_serve(host, port, config).await,
    }
}

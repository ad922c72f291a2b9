use crate::agent::BedrockFleetAgent;
use crate::config::types::Config;
use crate::server::FleetServer;

/// Start the local chat server.
pub async fn handle_serve(host: Option<String>, port: Option<u16>, config: &Config) -> crate::Result<()> {
    let mut server_config = config.server.clone();
    if let Some(host) = host {
        server_config.host = host;
    }
    if let Some(port) = port {
        server_config.port = port;
    }

    let agent =
        BedrockFleetAgent::from_env(config.agent.clone(), config.location.clone()).await?;
    log::info!("Serving agent with model {}", agent.model());

    FleetServer::new(server_config, agent).run().await
}

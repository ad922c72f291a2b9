//! Local HTTP server for the chat handler
//!
//! Exposes the same handler that runs behind API Gateway so the agent can be
//! exercised from a browser or curl.
//!
//! ```text
//! Client
//!     ↓ POST /chat
//! FleetServer (this module)
//!     ↓ handle_event
//! ChatAgent (Bedrock + fleet tools)
//! ```

pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::agent::ChatAgent;
use crate::config::types::ServerConfig;
use crate::error::{FleetError, Result};

/// The HTTP server wrapping a chat agent.
pub struct FleetServer<A> {
    config: ServerConfig,
    agent: Arc<A>,
}

impl<A: ChatAgent + 'static> FleetServer<A> {
    pub fn new(config: ServerConfig, agent: A) -> Self {
        Self {
            config,
            agent: Arc::new(agent),
        }
    }

    /// Returns the address the server will listen on.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/chat", post(routes::chat::<A>).options(routes::preflight))
            .route("/health", get(routes::health))
            .with_state(Arc::clone(&self.agent))
    }

    /// Runs the server until Ctrl-C.
    pub async fn run(self) -> Result<()> {
        let addr: SocketAddr = self
            .addr()
            .parse()
            .map_err(|e| FleetError::Server(format!("Invalid address {}: {}", self.addr(), e)))?;

        let app = self.router();
        let listener = tokio::net::TcpListener::bind(addr).await?;
        log::info!("Chat server listening on http://{}", addr);
        println!("Chat server listening on http://{}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down chat server");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentResult;

    struct SilentAgent;

    impl ChatAgent for SilentAgent {
        async fn respond(&self, _message: &str) -> AgentResult<String> {
            Ok(String::new())
        }
    }

    #[test]
    fn test_server_addr() {
        let server = FleetServer::new(ServerConfig::default(), SilentAgent);
        assert_eq!(server.addr(), "127.0.0.1:9090");
    }

    #[tokio::test]
    async fn test_invalid_host_is_error() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            port: 80,
        };
        let result = FleetServer::new(config, SilentAgent).run().await;
        assert!(matches!(result, Err(FleetError::Server(_))));
    }
}

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub inspector: InspectorConfig,
    pub agent: AgentConfig,
    pub location: LocationQueryConfig,
    pub server: ServerConfig,
}

/// Profile inspector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorConfig {
    /// Named AWS profiles to inspect, in order
    pub profiles: Vec<String>,
    /// Region used when a profile does not set one
    pub default_region: String,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            profiles: vec!["default".to_string(), "prod".to_string()],
            default_region: "us-east-1".to_string(),
        }
    }
}

/// Agent/Chat configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Bedrock model identifier
    pub model: String,
    pub max_tokens: u64,
    /// Upper bound on tool-call round trips per request
    pub max_turns: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: "us.amazon.nova-pro-v1:0".to_string(),
            max_tokens: 4096,
            max_turns: 10,
        }
    }
}

/// Athena settings for the vehicle GPS lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationQueryConfig {
    pub database: String,
    pub table: String,
    pub partition_key: String,
    /// S3 location for query results, e.g. `s3://bucket/prefix/`
    pub output_location: String,
    /// Delay between two status checks
    pub poll_interval_ms: u64,
    /// Maximum number of status checks before giving up
    pub max_poll_attempts: u32,
}

impl Default for LocationQueryConfig {
    fn default() -> Self {
        Self {
            database: "iot_data".to_string(),
            table: "vehicle_gps_data".to_string(),
            partition_key: "thing_name".to_string(),
            output_location: "s3://iot-athena-query-results/".to_string(),
            poll_interval_ms: 500,
            max_poll_attempts: 60,
        }
    }
}

impl LocationQueryConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Local HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9090,
        }
    }
}

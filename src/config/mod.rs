pub mod types;

use crate::error::{ConfigError, Result};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = ".fleet-agent.toml";

/// Get the global config file path (~/.fleet-agent.toml)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_FILE_NAME))
}

/// Get the local config file path (./.fleet-agent.toml)
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

/// Load configuration from an explicit file or use defaults.
///
/// An explicit path must exist and parse. Without one, the local config in the
/// current directory is tried first, then the global config; the first file
/// found must parse.
pub fn load_config(explicit: Option<&Path>) -> Result<types::Config> {
    if let Some(path) = explicit {
        return read_config_file(path);
    }

    let local = std::env::current_dir().ok().map(|cwd| local_config_path(&cwd));
    for candidate in local.into_iter().chain(global_config_path()) {
        if candidate.exists() {
            log::debug!("Loading configuration from {}", candidate.display());
            return read_config_file(&candidate);
        }
    }

    Ok(types::Config::default())
}

/// Parse and validate a config file
pub fn read_config_file(path: &Path) -> Result<types::Config> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&content)?;
    Ok(config)
}

pub fn parse_config(content: &str) -> std::result::Result<types::Config, ConfigError> {
    let config: types::Config =
        toml::from_str(content).map_err(|e| ConfigError::ParsingFailed(e.to_string()))?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &types::Config) -> std::result::Result<(), ConfigError> {
    if config.location.max_poll_attempts == 0 {
        return Err(ConfigError::InvalidValue {
            field: "location.max_poll_attempts",
            reason: "must be at least 1".to_string(),
        });
    }
    if !config.location.output_location.starts_with("s3://") {
        return Err(ConfigError::InvalidValue {
            field: "location.output_location",
            reason: format!("expected an s3:// URI, got '{}'", config.location.output_location),
        });
    }
    if config.agent.max_turns == 0 {
        return Err(ConfigError::InvalidValue {
            field: "agent.max_turns",
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.inspector.profiles, vec!["default", "prod"]);
        assert_eq!(config.inspector.default_region, "us-east-1");
        assert_eq!(config.agent.model, "us.amazon.nova-pro-v1:0");
        assert_eq!(config.location.database, "iot_data");
        assert_eq!(config.location.table, "vehicle_gps_data");
        assert_eq!(config.location.partition_key, "thing_name");
        assert_eq!(config.location.output_location, "s3://iot-athena-query-results/");
        assert_eq!(config.server.port, 9090);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = parse_config(
            r#"
            [location]
            database = "fleet"
            poll_interval_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.location.database, "fleet");
        assert_eq!(config.location.table, "vehicle_gps_data");
        assert_eq!(config.location.poll_interval().as_millis(), 250);
        assert_eq!(config.location.max_poll_attempts, 60);
    }

    #[test]
    fn test_zero_poll_attempts_rejected() {
        let err = parse_config("[location]\nmax_poll_attempts = 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { field: "location.max_poll_attempts", .. }
        ));
    }

    #[test]
    fn test_non_s3_output_location_rejected() {
        let err = parse_config("[location]\noutput_location = \"/tmp/out\"\n").unwrap_err();
        assert!(err.to_string().contains("s3://"));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = parse_config("[inspector\nprofiles = 3").unwrap_err();
        assert!(matches!(err, ConfigError::ParsingFailed(_)));
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[inspector]\nprofiles = [\"staging\"]").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.inspector.profiles, vec!["staging"]);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let result = load_config(Some(Path::new("/nonexistent/.fleet-agent.toml")));
        assert!(result.is_err());
    }
}

// config.rs
// Client connection configuration

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::RestError;

/// Connection settings for a TShock REST endpoint.
///
/// Immutable once handed to the client. 7878 is the default port the
/// TShock REST interface listens on.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    /// Request timeout in seconds.
    pub timeout: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
            timeout: 30,
        }
    }
}

impl ClientConfig {
    /// Loads settings from a `key = value` file. Missing keys fall back
    /// to their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RestError> {
        let content = fs::read_to_string(&path).map_err(|e| {
            RestError::Config(format!(
                "cannot read {}: {e}",
                path.as_ref().display()
            ))
        })?;
        let config_map = parse_config(&content);
        let defaults = Self::default();

        let host = config_map
            .get("host")
            .cloned()
            .unwrap_or(defaults.host);

        let port = config_map
            .get("port")
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(defaults.port);

        let timeout = config_map
            .get("timeout")
            .and_then(|t| t.parse::<u64>().ok())
            .unwrap_or(defaults.timeout);

        Ok(ClientConfig { host, port, timeout })
    }

    /// Base URL of the REST interface, without a trailing slash.
    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

fn parse_config(content: &str) -> HashMap<String, String> {
    let mut config = HashMap::new();

    for line in content.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Parse key = value pairs
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim().to_string();
            let value = value.trim().to_string();
            config.insert(key, value);
        }
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let content = r#"
            # This is a comment
            host = terraria.example.net
            port = 8080
            # Another comment
            timeout = 10
        "#;

        let config = parse_config(content);
        assert_eq!(config.get("host"), Some(&"terraria.example.net".to_string()));
        assert_eq!(config.get("port"), Some(&"8080".to_string()));
        assert_eq!(config.get("timeout"), Some(&"10".to_string()));
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 7878);
        assert_eq!(config.timeout, 30);
    }

    #[test]
    fn test_client_config_server_url() {
        let config = ClientConfig {
            host: "192.168.1.100".to_string(),
            port: 7879,
            timeout: 30,
        };
        assert_eq!(config.server_url(), "http://192.168.1.100:7879");
    }

    #[test]
    fn test_from_file_missing_path() {
        let result = ClientConfig::from_file("conf/does-not-exist.conf");
        assert!(matches!(result, Err(RestError::Config(_))));
    }
}

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;
use validator::Validate;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("No triple store configured: set an endpoint URL or a Turtle data file")]
    MissingStore,
}

/// Where queries are sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreTarget {
    /// SPARQL 1.1 protocol endpoint
    Endpoint(String),
    /// Turtle file loaded into an in-memory store
    Data(String),
}

/// Service configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize, PartialEq)]
pub struct ServiceConfig {
    /// YAML entity schema
    #[validate(length(min = 1, message = "Schema path cannot be empty"))]
    pub schema_path: String,

    /// SPARQL query endpoint; takes precedence over `data_path`
    #[validate(url(message = "SPARQL endpoint must be a valid URL"))]
    pub endpoint_url: Option<String>,

    /// Turtle file for the embedded store
    pub data_path: Option<String>,

    /// Timeout for one store round-trip (1-600 seconds)
    #[validate(range(
        min = 1,
        max = 600,
        message = "Request timeout must be between 1 and 600 seconds"
    ))]
    pub request_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            schema_path: "schema.yaml".to_string(),
            endpoint_url: None,
            data_path: None,
            request_timeout_secs: 30,
        }
    }
}

impl ServiceConfig {
    /// Create configuration from environment variables (and `.env`) with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = Self {
            schema_path: env::var("ODATA_SPARQL_SCHEMA").unwrap_or_else(|_| "schema.yaml".to_string()),
            endpoint_url: env::var("ODATA_SPARQL_ENDPOINT").ok(),
            data_path: env::var("ODATA_SPARQL_DATA").ok(),
            request_timeout_secs: parse_env_var("ODATA_SPARQL_TIMEOUT_SECS", "30")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from CLI arguments with validation
    pub fn from_cli(cli: CliConfig) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            schema_path: cli.schema_path.unwrap_or(defaults.schema_path),
            endpoint_url: cli.endpoint_url,
            data_path: cli.data_path,
            request_timeout_secs: cli
                .request_timeout_secs
                .unwrap_or(defaults.request_timeout_secs),
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Overlay the values given on the command line
    pub fn merge(&mut self, cli: CliConfig) -> Result<(), ConfigError> {
        if let Some(schema_path) = cli.schema_path {
            self.schema_path = schema_path;
        }
        if cli.endpoint_url.is_some() || cli.data_path.is_some() {
            self.endpoint_url = cli.endpoint_url;
            self.data_path = cli.data_path;
        }
        if let Some(timeout) = cli.request_timeout_secs {
            self.request_timeout_secs = timeout;
        }
        self.validate()?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn store_target(&self) -> Result<StoreTarget, ConfigError> {
        match (&self.endpoint_url, &self.data_path) {
            (Some(endpoint), _) => Ok(StoreTarget::Endpoint(endpoint.clone())),
            (None, Some(data)) => Ok(StoreTarget::Data(data.clone())),
            (None, None) => Err(ConfigError::MissingStore),
        }
    }
}

/// CLI configuration (parsed from command line arguments); `None` keeps the
/// environment's value
#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    pub schema_path: Option<String>,
    pub endpoint_url: Option<String>,
    pub data_path: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn clear_env() {
        for key in [
            "ODATA_SPARQL_SCHEMA",
            "ODATA_SPARQL_ENDPOINT",
            "ODATA_SPARQL_DATA",
            "ODATA_SPARQL_TIMEOUT_SECS",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(matches!(config.store_target(), Err(ConfigError::MissingStore)));
    }

    #[test]
    fn test_invalid_timeout() {
        let config = ServiceConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_endpoint() {
        let config = ServiceConfig {
            endpoint_url: Some("not a url".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_endpoint_takes_precedence() {
        let config = ServiceConfig {
            endpoint_url: Some("http://localhost:7878/query".to_string()),
            data_path: Some("data.ttl".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.store_target().unwrap(),
            StoreTarget::Endpoint("http://localhost:7878/query".to_string())
        );
    }

    #[test]
    #[serial]
    fn test_from_env() {
        clear_env();
        env::set_var("ODATA_SPARQL_SCHEMA", "blog.yaml");
        env::set_var("ODATA_SPARQL_DATA", "blog.ttl");
        env::set_var("ODATA_SPARQL_TIMEOUT_SECS", "5");
        let config = ServiceConfig::from_env().unwrap();
        clear_env();

        assert_eq!(config.schema_path, "blog.yaml");
        assert_eq!(config.store_target().unwrap(), StoreTarget::Data("blog.ttl".to_string()));
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_timeout() {
        clear_env();
        env::set_var("ODATA_SPARQL_TIMEOUT_SECS", "soon");
        let result = ServiceConfig::from_env();
        clear_env();
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_cli_overrides_store() {
        let mut config = ServiceConfig {
            endpoint_url: Some("http://localhost:7878/query".to_string()),
            ..Default::default()
        };
        config
            .merge(CliConfig {
                data_path: Some("local.ttl".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(config.store_target().unwrap(), StoreTarget::Data("local.ttl".to_string()));
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "schema_path: blog.yaml\nendpoint_url: http://localhost:7878/query\ndata_path: null\nrequest_timeout_secs: 10"
        )
        .unwrap();
        let config = ServiceConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:7878/query"));
    }
}

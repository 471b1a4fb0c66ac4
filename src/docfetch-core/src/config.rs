use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::auth::AuthConfig;
use crate::error::ConfigError;

pub const ENV_ENDPOINT: &str = "DOCFETCH_ENDPOINT";
pub const ENV_DATA_SOURCE: &str = "DOCFETCH_DATA_SOURCE";
pub const ENV_API_KEY: &str = "DOCFETCH_API_KEY";
pub const ENV_EMAIL: &str = "DOCFETCH_EMAIL";
pub const ENV_PASSWORD: &str = "DOCFETCH_PASSWORD";
pub const ENV_JWT_TOKEN: &str = "DOCFETCH_JWT_TOKEN";
pub const ENV_BEARER_TOKEN: &str = "DOCFETCH_BEARER_TOKEN";
pub const ENV_TIMEOUT_SECS: &str = "DOCFETCH_TIMEOUT_SECS";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Data API base URL, e.g. `https://data.mongodb-api.com/app/<app-id>/endpoint/data/v1`
    pub endpoint: String,
    pub data_source: String,
    pub auth: AuthConfig,

    // Extra headers sent with every request
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Per-request timeout for the bundled HTTP transport. None = no timeout
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

pub fn default_user_agent() -> String {
    format!("docfetch/{}", env!("CARGO_PKG_VERSION"))
}

impl Config {
    pub fn new(endpoint: impl Into<String>, data_source: impl Into<String>, auth: AuthConfig) -> Self {
        Self {
            endpoint: endpoint.into(),
            data_source: data_source.into(),
            auth,
            headers: BTreeMap::new(),
            timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        tracing::debug!(path = %path.display(), data_source = %config.data_source, "Loaded config");
        Ok(config)
    }

    /// Build a config from `DOCFETCH_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let endpoint = lookup(ENV_ENDPOINT).ok_or(ConfigError::MissingSetting(ENV_ENDPOINT))?;
        let data_source =
            lookup(ENV_DATA_SOURCE).ok_or(ConfigError::MissingSetting(ENV_DATA_SOURCE))?;

        let auth = AuthConfig {
            api_key: lookup(ENV_API_KEY),
            email: lookup(ENV_EMAIL),
            password: lookup(ENV_PASSWORD),
            jwt_token: lookup(ENV_JWT_TOKEN),
            bearer_token: lookup(ENV_BEARER_TOKEN),
        };

        let timeout_secs = match lookup(ENV_TIMEOUT_SECS) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
                ConfigError::InvalidSetting {
                    name: ENV_TIMEOUT_SECS,
                    reason: e.to_string(),
                }
            })?),
            None => None,
        };

        let mut config = Config::new(endpoint, data_source, auth);
        config.timeout_secs = timeout_secs;
        Ok(config)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = serde_json::from_str(
            r#"{
                "endpoint": "https://data.example.com/app/x/endpoint/data/v1",
                "data_source": "Cluster0",
                "auth": { "api_key": "k" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.data_source, "Cluster0");
        assert_eq!(config.auth.api_key.as_deref(), Some("k"));
        assert!(config.headers.is_empty());
        assert!(config.timeout().is_none());
        assert!(config.user_agent.starts_with("docfetch/"));
    }

    #[test]
    fn test_from_env() {
        let config = Config::from_lookup(lookup_from(&[
            (ENV_ENDPOINT, "https://data.example.com"),
            (ENV_DATA_SOURCE, "Cluster0"),
            (ENV_BEARER_TOKEN, "tok"),
            (ENV_TIMEOUT_SECS, "15"),
        ]))
        .unwrap();

        assert_eq!(config.endpoint, "https://data.example.com");
        assert_eq!(config.auth.bearer_token.as_deref(), Some("tok"));
        assert_eq!(config.timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_from_env_missing_endpoint() {
        let err = Config::from_lookup(lookup_from(&[(ENV_DATA_SOURCE, "Cluster0")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSetting(ENV_ENDPOINT)));
    }

    #[test]
    fn test_from_env_bad_timeout() {
        let err = Config::from_lookup(lookup_from(&[
            (ENV_ENDPOINT, "https://data.example.com"),
            (ENV_DATA_SOURCE, "Cluster0"),
            (ENV_TIMEOUT_SECS, "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSetting { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/definitely/not/here/config.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::utils::error::{SkillError, SkillResult};

pub const ENV_BASE_URL: &str = "SKILLKIT_BASE_URL";
pub const ENV_API_KEY: &str = "SKILLKIT_API_KEY";
pub const ENV_TIMEOUT_SECONDS: &str = "SKILLKIT_TIMEOUT_SECONDS";

/// Remote service client configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
    pub endpoints: EndpointConfig,
}

/// Paths of the capability endpoints, relative to the base URL
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub image_generation: String,
    pub speech_synthesis: String,
    pub speech_recognition: String,
    pub search: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            api_key: None,
            timeout_seconds: 60,
            endpoints: EndpointConfig::default(),
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            image_generation: "/v1/images/generations".to_string(),
            speech_synthesis: "/v1/audio/speech".to_string(),
            speech_recognition: "/v1/audio/transcriptions".to_string(),
            search: "/v1/search".to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the service base URL
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    /// Set the API key sent as a bearer token
    pub fn with_api_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.to_string());
        self
    }

    /// Set timeout in seconds
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Load configuration: defaults, then the optional JSON file, then the process environment
    pub fn load(path: Option<&Path>) -> SkillResult<Self> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let env: HashMap<String, String> = std::env::vars().collect();
        base.with_env_overrides(&env)
    }

    /// Read a JSON configuration file
    pub fn from_file(path: &Path) -> SkillResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            SkillError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: ClientConfig = serde_json::from_str(&contents).map_err(|e| {
            SkillError::Configuration(format!("invalid config file {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `SKILLKIT_*` overrides from the given variables
    pub fn with_env_overrides(mut self, vars: &HashMap<String, String>) -> SkillResult<Self> {
        if let Some(base_url) = vars.get(ENV_BASE_URL) {
            self.base_url = base_url.clone();
        }
        if let Some(key) = vars.get(ENV_API_KEY) {
            if !key.is_empty() {
                self.api_key = Some(key.clone());
            }
        }
        if let Some(timeout) = vars.get(ENV_TIMEOUT_SECONDS) {
            self.timeout_seconds = timeout.parse().map_err(|_| {
                SkillError::Configuration(format!(
                    "{} must be a positive integer, got '{}'",
                    ENV_TIMEOUT_SECONDS, timeout
                ))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check that the base URL parses and the timeout is usable
    pub fn validate(&self) -> SkillResult<()> {
        self.parsed_base_url()?;
        if self.timeout_seconds == 0 {
            return Err(SkillError::Configuration(
                "timeout_seconds must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn parsed_base_url(&self) -> SkillResult<Url> {
        Url::parse(&self.base_url).map_err(|e| {
            SkillError::Configuration(format!("invalid base URL '{}': {}", self.base_url, e))
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

//! Configuration for the `agent-schema` command-line tool
//!
//! The library itself needs no configuration. The CLI reads an optional TOML
//! file naming the agent on whose behalf storage handles are built, plus
//! logging preferences.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Top-level configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SchemaToolConfig {
    #[serde(default)]
    pub agent: Option<AgentSection>,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Agent section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentSection {
    /// Agent identifier (must match [a-zA-Z0-9._-]+)
    pub id: String,
    /// Description of what this agent does
    #[serde(default)]
    pub description: Option<String>,
}

/// Logging section; environment variables take precedence over these values
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSection {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format (json, pretty, compact)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Emit span open/close events
    #[serde(default)]
    pub spans: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            spans: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Invalid agent ID format: {0}")]
    InvalidAgentId(String),
    #[error("No agent ID configured; pass --agent-id or set [agent].id")]
    MissingAgentId,
}

impl SchemaToolConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SchemaToolConfig = toml::from_str(content)?;

        if let Some(agent) = &config.agent {
            validate_agent_id(&agent.id)?;
        }

        Ok(config)
    }

    /// Resolve the agent ID, preferring an explicit override over the config file
    pub fn resolve_agent_id(&self, override_id: Option<&str>) -> Result<String, ConfigError> {
        match override_id {
            Some(id) => {
                validate_agent_id(id)?;
                Ok(id.to_string())
            }
            None => self
                .agent
                .as_ref()
                .map(|agent| agent.id.clone())
                .ok_or(ConfigError::MissingAgentId),
        }
    }
}

/// Validate agent ID format
pub fn validate_agent_id(agent_id: &str) -> Result<(), ConfigError> {
    let valid_chars = agent_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-');

    if agent_id.is_empty() || !valid_chars {
        return Err(ConfigError::InvalidAgentId(format!(
            "Agent ID '{agent_id}' must match pattern [a-zA-Z0-9._-]+"
        )));
    }

    Ok(())
}

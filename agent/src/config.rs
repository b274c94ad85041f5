use std::env;
use std::str::FromStr;

use anchor_lang::prelude::Pubkey;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Reward recipient
    pub agent_address: Pubkey,
    /// Committed as the model commitment of every proof
    pub model_id: String,
    /// Must be on the prover's deployment allowlist
    pub cluster: String,

    pub log_level: String,

    /// Wall-clock milliseconds per compute unit
    pub compute_time_unit_ms: u64,
    /// Units charged when the engine reports no estimate
    pub default_complexity_units: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            agent_address: Pubkey::default(),
            model_id: "model:default".to_string(),
            cluster: agent_work_host::config::DEFAULT_CLUSTER.to_string(),
            log_level: "info".to_string(),
            compute_time_unit_ms: 100,
            default_complexity_units: 100,
        }
    }
}

impl AgentConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = AgentConfig::default();

        // Required configuration
        let address = env::var("AGENT_ADDRESS")
            .map_err(|_| ConfigError::MissingEnvVar("AGENT_ADDRESS".to_string()))?;
        config.agent_address = Pubkey::from_str(&address)
            .map_err(|_| ConfigError::InvalidEnvVar("AGENT_ADDRESS".to_string(), address))?;

        // Optional configuration with defaults
        if let Ok(val) = env::var("AGENT_MODEL_ID") {
            config.model_id = val;
        }

        if let Ok(val) = env::var("AGENT_CLUSTER") {
            config.cluster = val;
        }

        if let Ok(val) = env::var("LOG_LEVEL") {
            config.log_level = val;
        }

        if let Ok(val) = env::var("COMPUTE_TIME_UNIT_MS") {
            config.compute_time_unit_ms = val
                .parse()
                .map_err(|_| ConfigError::InvalidEnvVar("COMPUTE_TIME_UNIT_MS".to_string(), val))?;
        }

        if let Ok(val) = env::var("DEFAULT_COMPLEXITY_UNITS") {
            config.default_complexity_units = val.parse().map_err(|_| {
                ConfigError::InvalidEnvVar("DEFAULT_COMPLEXITY_UNITS".to_string(), val)
            })?;
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agent_address == Pubkey::default() {
            return Err(ConfigError::ValidationError(
                "AGENT_ADDRESS must not be the default key".to_string(),
            ));
        }

        if self.model_id.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "AGENT_MODEL_ID must not be empty".to_string(),
            ));
        }

        if self.compute_time_unit_ms == 0 {
            return Err(ConfigError::ValidationError(
                "COMPUTE_TIME_UNIT_MS must be greater than 0".to_string(),
            ));
        }

        agent_work_host::config::deployment(&self.cluster)
            .map_err(|e| ConfigError::ValidationError(format!("AGENT_CLUSTER: {e}")))?;

        Ok(())
    }
}

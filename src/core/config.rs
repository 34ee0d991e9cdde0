//! Engine configuration with documented constants
//!
//! Loaded from TOML at startup and handed to the registry builder. Missing
//! keys fall back to the defaults below.

use serde::Deserialize;
use std::path::Path;

use crate::core::error::{ConfigError, ConfigResult};

/// Configuration for the evaluation engine
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum operator nesting accepted while deserializing
    ///
    /// Curried operators persist their base operator recursively, so a
    /// corrupted or hostile record could nest without bound. Records deeper
    /// than this fail with a parse error.
    pub max_nesting_depth: usize,

    /// Maximum length (bytes) of persisted operator text
    pub max_persisted_len: usize,

    /// Language table used for names, tooltips and error messages
    pub locale: String,

    /// Default tracing filter for the binary (RUST_LOG overrides it)
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: 64,
            max_persisted_len: 1 << 20,
            locale: "en_us".to_string(),
            log_filter: "logicnet=info".to_string(),
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_nesting_depth == 0 {
            return Err(ConfigError::Invalid(
                "max_nesting_depth must be at least 1".into(),
            ));
        }

        if self.max_persisted_len == 0 {
            return Err(ConfigError::Invalid(
                "max_persisted_len must be positive".into(),
            ));
        }

        if self.locale.is_empty() {
            return Err(ConfigError::Invalid("locale must not be empty".into()));
        }

        Ok(())
    }
}

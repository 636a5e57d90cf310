//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings.
//! Configuration is loaded from a TOML file; the control-plane credential
//! and any secret variable values come from the environment only.
//!
//! # Example
//!
//! ```no_run
//! use zeabur_ops::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("zeabur.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::api::{ApiConfig, Secret, TOKEN_ENV_VARS};
use super::deploy::DeployConfig;
use super::inspect::InspectConfig;
use super::logging::LoggingConfig;
use super::target::TargetConfig;
use crate::error::{ConfigError, Result};

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Control-plane endpoint, timeouts, and retry budget.
    #[serde(default)]
    pub api: ApiConfig,

    /// Project and service selection heuristics.
    #[serde(default)]
    pub target: TargetConfig,

    /// Inspect report settings.
    #[serde(default)]
    pub inspect: InspectConfig,

    /// Configure-and-deploy settings, including the variable table.
    #[serde(default)]
    pub deploy: DeployConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse configuration from TOML content, reading the credential from
    /// the process environment.
    pub fn parse_toml(content: &str) -> Result<Self> {
        Self::parse_toml_with(content, |name| std::env::var(name).ok())
    }

    /// Parse configuration from TOML content with an explicit environment.
    pub fn parse_toml_with<F>(content: &str, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.api.token = load_token(&env);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load from `path` when it exists, otherwise use defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }
        debug!(path = %path.display(), "Config file not found, using defaults");
        Self::parse_toml("")
    }

    /// The bearer credential, or a configuration error naming where it is read from.
    pub fn require_token(&self) -> Result<&Secret> {
        self.api.token.as_ref().ok_or_else(|| {
            ConfigError::MissingSecret {
                name: TOKEN_ENV_VARS[0].to_string(),
            }
            .into()
        })
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<()> {
        if self.api.endpoint.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "endpoint" }.into());
        }
        match url::Url::parse(&self.api.endpoint) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(ConfigError::InvalidValue {
                    field: "endpoint",
                    reason: format!("unsupported scheme {}", url.scheme()),
                }
                .into())
            }
            Err(err) => {
                return Err(ConfigError::InvalidValue {
                    field: "endpoint",
                    reason: err.to_string(),
                }
                .into())
            }
        }
        if self.api.retry_max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry_max_attempts",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.api.connect_timeout_ms == 0 || self.api.read_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeouts",
                reason: "connect and read timeouts must be greater than 0".to_string(),
            }
            .into());
        }
        if self.target.project.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "project" }.into());
        }
        if self.target.database_url_var.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "database_url_var",
            }
            .into());
        }

        if self.deploy.variables.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "variables",
                reason: "variable table must not be empty".to_string(),
            }
            .into());
        }
        let mut names = HashSet::new();
        for spec in &self.deploy.variables {
            if spec.name.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "variables",
                    reason: "variable name must not be empty".to_string(),
                }
                .into());
            }
            if !names.insert(spec.name.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "variables",
                    reason: format!("duplicate variable {}", spec.name),
                }
                .into());
            }
            if spec.value.is_some() && spec.from_env.is_some() {
                return Err(ConfigError::InvalidValue {
                    field: "variables",
                    reason: format!("{} sets both value and from_env", spec.name),
                }
                .into());
            }
        }

        if self.inspect.log_tail == 0 {
            return Err(ConfigError::InvalidValue {
                field: "log_tail",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

fn load_token<F>(env: &F) -> Option<Secret>
where
    F: Fn(&str) -> Option<String>,
{
    TOKEN_ENV_VARS
        .iter()
        .filter_map(|name| env(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .map(Secret::new)
}

//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use toolgate_application::config::PipelineSettings;
use toolgate_domain::hook::entities::{FailurePolicy, TrustScope};
use toolgate_domain::tool::binding::BindLimits;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("dispatch.workers cannot be 0")]
    ZeroWorkers,

    #[error("binding.max_arguments cannot be 0")]
    ZeroArgumentLimit,

    #[error("binding.max_value_bytes cannot be 0")]
    ZeroValueLimit,

    #[error("hooks.trust_scope cannot be empty")]
    EmptyTrustScope,

    #[error("session.default_timeout_secs cannot be 0")]
    ZeroSessionTimeout,
}

/// Raw dispatch configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDispatchConfig {
    /// Worker pool capacity; unset sizes the pool from available parallelism
    pub workers: Option<usize>,
}

/// Raw hook chain configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileHooksConfig {
    /// Reaction to a hook's internal error (strict, warn, silent)
    pub failure_policy: FailurePolicy,
    /// Trust root that hook registrations must fall under
    pub trust_scope: String,
}

impl Default for FileHooksConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::Warn,
            trust_scope: "app".to_string(),
        }
    }
}

/// Raw argument binding configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBindingConfig {
    /// Maximum number of caller-supplied arguments per call
    pub max_arguments: usize,
    /// Maximum byte length of a single string argument
    pub max_value_bytes: usize,
}

impl Default for FileBindingConfig {
    fn default() -> Self {
        let limits = BindLimits::default();
        Self {
            max_arguments: limits.max_arguments,
            max_value_bytes: limits.max_value_bytes,
        }
    }
}

/// Raw session configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    /// Idle seconds before a session expires
    pub default_timeout_secs: u64,
}

impl Default for FileSessionConfig {
    fn default() -> Self {
        Self {
            default_timeout_secs: 3600,
        }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Dispatch settings
    pub dispatch: FileDispatchConfig,
    /// Hook chain settings
    pub hooks: FileHooksConfig,
    /// Argument binding settings
    pub binding: FileBindingConfig,
    /// Session settings
    pub session: FileSessionConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if let Some(0) = self.dispatch.workers {
            return Err(ConfigValidationError::ZeroWorkers);
        }
        if self.binding.max_arguments == 0 {
            return Err(ConfigValidationError::ZeroArgumentLimit);
        }
        if self.binding.max_value_bytes == 0 {
            return Err(ConfigValidationError::ZeroValueLimit);
        }
        if self.hooks.trust_scope.trim().is_empty() {
            return Err(ConfigValidationError::EmptyTrustScope);
        }
        if self.session.default_timeout_secs == 0 {
            return Err(ConfigValidationError::ZeroSessionTimeout);
        }
        Ok(())
    }

    /// Convert into the application-layer pipeline settings
    pub fn into_settings(self) -> PipelineSettings {
        PipelineSettings {
            workers: self.dispatch.workers,
            failure_policy: self.hooks.failure_policy,
            trust_scope: TrustScope::new(self.hooks.trust_scope),
            bind_limits: BindLimits {
                max_arguments: self.binding.max_arguments,
                max_value_bytes: self.binding.max_value_bytes,
            },
            session_timeout: Duration::from_secs(self.session.default_timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[dispatch]
workers = 8

[hooks]
failure_policy = "strict"
trust_scope = "app.plugins"

[binding]
max_arguments = 16
max_value_bytes = 4096

[session]
default_timeout_secs = 120
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.dispatch.workers, Some(8));
        assert_eq!(config.hooks.failure_policy, FailurePolicy::Strict);
        assert_eq!(config.hooks.trust_scope, "app.plugins");
        assert_eq!(config.binding.max_arguments, 16);
        assert_eq!(config.binding.max_value_bytes, 4096);
        assert_eq!(config.session.default_timeout_secs, 120);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[hooks]
failure_policy = "silent"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.hooks.failure_policy, FailurePolicy::Silent);
        // Defaults should apply
        assert_eq!(config.hooks.trust_scope, "app");
        assert_eq!(config.dispatch.workers, None);
        assert_eq!(config.binding.max_arguments, 50);
        assert_eq!(config.session.default_timeout_secs, 3600);
    }

    #[test]
    fn test_default_config_validates() {
        let config = FileConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.binding.max_value_bytes, 1024 * 1024);
    }

    #[test]
    fn test_invalid_policy_string_fails_to_parse() {
        let toml_str = r#"
[hooks]
failure_policy = "loud"
"#;
        assert!(toml::from_str::<FileConfig>(toml_str).is_err());
    }

    #[test]
    fn test_validate_zero_workers() {
        let config: FileConfig = toml::from_str("[dispatch]\nworkers = 0\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::ZeroWorkers)
        ));
    }

    #[test]
    fn test_validate_zero_limits() {
        let config: FileConfig = toml::from_str("[binding]\nmax_arguments = 0\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::ZeroArgumentLimit)
        ));

        let config: FileConfig = toml::from_str("[session]\ndefault_timeout_secs = 0\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::ZeroSessionTimeout)
        ));
    }

    #[test]
    fn test_into_settings() {
        let toml_str = r#"
[dispatch]
workers = 4

[hooks]
trust_scope = "app.audit"

[session]
default_timeout_secs = 60
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let settings = config.into_settings();
        assert_eq!(settings.workers, Some(4));
        assert_eq!(settings.trust_scope.as_str(), "app.audit");
        assert_eq!(settings.bind_limits.max_arguments, 50);
        assert_eq!(settings.session_timeout, Duration::from_secs(60));
    }
}

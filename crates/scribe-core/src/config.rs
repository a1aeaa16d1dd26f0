//! Configuration types for the scribe codec.
//!
//! Configuration is stored in TOML format at `~/.scribe/config.toml`. Every
//! field has a default, so an empty or missing file yields [`Config::default`].
//!
//! # Examples
//!
//! ```
//! use scribe_core::config::{Config, LegacyVPolicy};
//!
//! let config = Config::default();
//! assert_eq!(config.codec.legacy_v, LegacyVPolicy::Strict);
//! assert!(!config.codec.require_replay_protection);
//! assert_eq!(config.logging.level, "info");
//! ```
//!
//! # Default TOML Output
//!
//! ```toml
//! [codec]
//! legacy_v = "strict"
//! require_replay_protection = false
//!
//! [logging]
//! level = "info"
//! format = "pretty"
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Log levels accepted by `logging.level`.
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Log formats accepted by `logging.format`.
const LOG_FORMATS: &[&str] = &["pretty", "json", "compact"];

/// Top-level configuration.
///
/// ```
/// use scribe_core::config::{Config, LegacyVPolicy};
///
/// let config: Config = toml::from_str(r#"
/// [codec]
/// legacy_v = "lenient"
/// "#).unwrap();
///
/// assert_eq!(config.codec.legacy_v, LegacyVPolicy::Lenient);
/// assert_eq!(config.logging.format, "pretty");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Transaction codec behavior.
    #[serde(default)]
    pub codec: CodecConfig,

    /// Logging output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How a legacy transaction's `v` value outside the canonical set is treated.
///
/// Canonical values are `27`, `28` and anything `>= 35` (EIP-155).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegacyVPolicy {
    /// Reject non-canonical `v` values.
    #[default]
    Strict,

    /// Derive `yParity = v % 2` for non-canonical values and log a warning.
    Lenient,
}

/// Transaction codec settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Treatment of legacy `v` values outside `{27, 28} ∪ [35, ∞)`.
    #[serde(default)]
    pub legacy_v: LegacyVPolicy,

    /// Reject transaction requests that carry no chain id.
    #[serde(default)]
    pub require_replay_protection: bool,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "pretty".to_string()
}

/// Logging settings. CLI verbosity flags override `level`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum level: `trace`, `debug`, `info`, `warn` or `error`.
    #[serde(default = "default_level")]
    pub level: String,

    /// Output format: `pretty`, `json` or `compact`.
    #[serde(default = "default_format")]
    pub format: String,

    /// Optional log file. Logs go to stderr when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
            file: None,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if:
    /// - `logging.level` is not a known level
    /// - `logging.format` is not `pretty`, `json` or `compact`
    /// - `logging.file` is present but empty
    ///
    /// # Examples
    ///
    /// ```
    /// use scribe_core::config::Config;
    ///
    /// let mut config = Config::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.logging.format = "xml".to_string();
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::invalid_value(
                "logging.level",
                &self.logging.level,
            ));
        }

        let format = self.logging.format.to_ascii_lowercase();
        if !LOG_FORMATS.contains(&format.as_str()) {
            return Err(ConfigError::invalid_value(
                "logging.format",
                &self.logging.format,
            ));
        }

        if self.logging.file.as_deref().is_some_and(str::is_empty) {
            return Err(ConfigError::invalid_value("logging.file", "<empty>"));
        }

        Ok(())
    }

    /// Generates the default configuration as a commented TOML string.
    ///
    /// ```
    /// use scribe_core::config::Config;
    ///
    /// let toml = Config::default_toml();
    /// assert!(toml.contains("[codec]"));
    /// assert!(toml.contains("[logging]"));
    /// ```
    #[must_use]
    pub fn default_toml() -> String {
        r#"[codec]
# "strict" rejects legacy v values other than 27, 28 or >= 35.
# "lenient" accepts them as yParity = v % 2.
legacy_v = "strict"
require_replay_protection = false

[logging]
level = "info"
format = "pretty"
# file = "~/.scribe/scribe.log"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.codec.legacy_v, LegacyVPolicy::Strict);
        assert!(!config.codec.require_replay_protection);
        assert_eq!(config.logging, LoggingConfig::default());
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_default_toml_parses_to_default() {
        let parsed: Config = toml::from_str(&Config::default_toml()).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_partial_toml() {
        let parsed: Config = toml::from_str(
            r#"
            [codec]
            require_replay_protection = true

            [logging]
            format = "json"
            file = "/tmp/scribe.log"
            "#,
        )
        .unwrap();

        assert!(parsed.codec.require_replay_protection);
        assert_eq!(parsed.codec.legacy_v, LegacyVPolicy::Strict);
        assert_eq!(parsed.logging.level, "info");
        assert_eq!(parsed.logging.format, "json");
        assert_eq!(parsed.logging.file.as_deref(), Some("/tmp/scribe.log"));
    }

    #[test]
    fn test_unknown_legacy_policy_rejected() {
        let result: Result<Config, _> = toml::from_str("[codec]\nlegacy_v = \"loose\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_logging() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "logging.level"
        ));

        let mut config = Config::default();
        config.logging.file = Some(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_uppercase_level() {
        let mut config = Config::default();
        config.logging.level = "DEBUG".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_serialization_roundtrip() {
        let mut config = Config::default();
        config.codec.legacy_v = LegacyVPolicy::Lenient;
        config.logging.file = Some("out.log".to_string());

        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed, config);
    }
}

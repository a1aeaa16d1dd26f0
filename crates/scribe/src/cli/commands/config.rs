//! # Config Command
//!
//! ```text
//! scribe config show         # Print the effective configuration
//! scribe config path         # Print the configuration file path
//! scribe config init [-f]    # Write the default configuration file
//! ```
//!
//! `-c <PATH>` points every action at another file.

use std::fs;
use std::path::PathBuf;

use scribe_core::config::Config;
use scribe_core::config_loader::{load_from_path, ConfigLoader};
use scribe_core::ConfigError;

use super::CommandError;
use crate::cli::args::ConfigAction;

/// The `scribe config` command handler.
#[derive(Debug, Clone)]
pub struct ConfigCommand {
    /// The action to perform.
    pub action: ConfigAction,
    /// Explicit file from `-c`, if any.
    pub path: Option<PathBuf>,
}

impl ConfigCommand {
    /// Create a new `ConfigCommand`.
    #[must_use]
    pub const fn new(action: ConfigAction, path: Option<PathBuf>) -> Self {
        Self { action, path }
    }

    /// Run the command and return the text to print.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The home directory cannot be determined
    /// - The configuration file is unreadable or invalid
    /// - `init` would overwrite a file without `--force`
    pub fn run(&self) -> Result<String, CommandError> {
        match &self.action {
            ConfigAction::Show => {
                let config = self.load()?;
                toml::to_string_pretty(&config).map_err(|e| {
                    ConfigError::parse_failed(format!("failed to serialize configuration: {e}"))
                        .into()
                })
            }
            ConfigAction::Path => Ok(self.config_path()?.display().to_string()),
            ConfigAction::Init { force } => {
                let path = self.config_path()?;
                if path.exists() && !force {
                    return Err(CommandError::AlreadyExists(path.display().to_string()));
                }
                match &self.path {
                    Some(path) => {
                        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                            fs::create_dir_all(parent)?;
                        }
                        fs::write(path, Config::default_toml())?;
                    }
                    None => ConfigLoader::new()?.write_default()?,
                }
                tracing::info!(path = %path.display(), "wrote default configuration");
                Ok(format!("Wrote {}", path.display()))
            }
        }
    }

    fn config_path(&self) -> Result<PathBuf, CommandError> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => Ok(ConfigLoader::new()?.config_path()),
        }
    }

    /// The effective configuration: the `-c` file (which must exist) or the
    /// default location (defaults when missing).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails validation.
    pub fn load(&self) -> Result<Config, CommandError> {
        match &self.path {
            Some(path) => Ok(load_from_path(path)?),
            None => Ok(ConfigLoader::new()?.load()?),
        }
    }
}

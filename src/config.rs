//! Layered service settings.
//!
//! Settings are read from an optional `signoff.toml` in the working
//! directory and then overridden by `SIGNOFF__*` environment variables, with
//! `__` separating nested keys (for example `SIGNOFF__DATABASE__URL`).

use crate::approval::domain::{RoutingBase, TaskDomainError};
use config::{Config, Environment, File, FileFormat, Source};
use serde::Deserialize;
use thiserror::Error;

/// Base name of the optional settings file.
pub const SETTINGS_FILE: &str = "signoff";

/// Prefix of environment variable overrides.
pub const ENV_PREFIX: &str = "SIGNOFF";

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A source could not be read or deserialised.
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    /// The configured routing base is unusable.
    #[error("invalid routing settings: {0}")]
    Routing(#[source] TaskDomainError),
}

/// Top-level service settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Database connection settings.
    pub database: DatabaseSettings,
    /// Public routing used to compose approval links.
    pub routing: RoutingSettings,
    /// Outgoing mail settings.
    #[serde(default)]
    pub mail: MailSettings,
    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Database connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseSettings {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Upper bound on pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

const fn default_max_connections() -> u32 {
    8
}

/// Public routing settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoutingSettings {
    /// URL prefix under which approve/decline links are served.
    pub base_url: String,
}

impl RoutingSettings {
    /// Validates the configured base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Routing`] when the base URL is blank.
    pub fn routing_base(&self) -> Result<RoutingBase, SettingsError> {
        RoutingBase::new(self.base_url.as_str()).map_err(SettingsError::Routing)
    }
}

/// Outgoing mail settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MailSettings {
    /// Sender address attached to outgoing mail.
    pub sender: Option<String>,
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingSettings {
    /// `tracing-subscriber` filter directives.
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_filter() -> String {
    "info".to_owned()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}

impl Settings {
    /// Loads settings from `signoff.toml` (if present) and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Load`] when a source is malformed or a
    /// required key is missing.
    pub fn load() -> Result<Self, SettingsError> {
        Self::layered(
            File::with_name(SETTINGS_FILE).required(false),
            Self::environment(),
        )
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    fn layered(
        file: impl Source + Send + Sync + 'static,
        environment: Environment,
    ) -> Result<Self, SettingsError> {
        let config = Config::builder()
            .add_source(file)
            .add_source(environment)
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Parses settings from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Load`] when the document is malformed or a
    /// required key is missing.
    pub fn from_toml(document: &str) -> Result<Self, SettingsError> {
        let config = Config::builder()
            .add_source(File::from_str(document, FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}

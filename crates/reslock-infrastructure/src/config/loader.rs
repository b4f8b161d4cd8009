//! Configuration loader
//!
//! Handles loading configuration from TOML files, environment variables,
//! and default values using Figment.

use crate::config::{AppConfig, EventBusKind};
use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME,
};
use crate::error_ext::ErrorContext;
use crate::logging::{log_config_loaded, parse_log_level};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use reslock_domain::error::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// Sources are merged in this order (later sources override earlier):
    /// 1. Default values from `AppConfig::default()`
    /// 2. TOML configuration file (explicit path, or the first default location found)
    /// 3. Environment variables, e.g. `RESLOCK__LOCK__KEY_PREFIX`
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        match &self.config_path {
            Some(config_path) if config_path.exists() => {
                figment = figment.merge(Toml::file(config_path));
                log_config_loaded(config_path, true);
            }
            Some(config_path) => log_config_loaded(config_path, false),
            None => {
                if let Some(default_path) = Self::find_default_config_path() {
                    figment = figment.merge(Toml::file(&default_path));
                    log_config_loaded(&default_path, true);
                }
            }
        }

        // `__` separates nested keys; single underscores belong to field names
        figment = figment.merge(
            Env::prefixed(&format!("{}{}", self.env_prefix, CONFIG_ENV_SEPARATOR))
                .split(CONFIG_ENV_SEPARATOR),
        );

        let app_config: AppConfig = figment
            .extract()
            .config_context("Failed to extract configuration")?;

        validate_app_config(&app_config)?;

        Ok(app_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).config_context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string).config_context("Failed to write config file")?;

        Ok(())
    }

    /// Get the configured file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// First existing file among the default locations
    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let candidates = [
            Some(current_dir.join(DEFAULT_CONFIG_FILENAME)),
            Some(
                current_dir
                    .join(DEFAULT_CONFIG_DIR)
                    .join(DEFAULT_CONFIG_FILENAME),
            ),
            dirs::config_dir().map(|d| d.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME)),
            dirs::home_dir().map(|d| {
                d.join(format!(".{DEFAULT_CONFIG_DIR}"))
                    .join(DEFAULT_CONFIG_FILENAME)
            }),
        ];

        candidates.into_iter().flatten().find(|path| path.exists())
    }
}

/// Validate application configuration
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    validate_logging_config(config)?;
    validate_lock_config(config)?;
    validate_throttling_config(config)?;
    validate_storage_config(config)?;
    validate_event_bus_config(config)?;
    Ok(())
}

fn validate_logging_config(config: &AppConfig) -> Result<()> {
    parse_log_level(&config.logging.level).map(|_| ())
}

fn validate_lock_config(config: &AppConfig) -> Result<()> {
    let lock = &config.lock;
    if lock.key_prefix.is_empty() {
        return Err(Error::configuration("Lock key prefix cannot be empty"));
    }
    if lock.max_resource_name_length == 0 {
        return Err(Error::configuration(
            "Maximum resource name length cannot be 0",
        ));
    }
    if lock.max_concurrent_waiting_resources == 0 {
        return Err(Error::configuration(
            "Maximum concurrent waiting resources cannot be 0",
        ));
    }
    if lock.max_waiters_per_resource == 0 {
        return Err(Error::configuration(
            "Maximum waiters per resource cannot be 0",
        ));
    }
    if lock.default_time_until_expires_secs == 0 {
        return Err(Error::configuration("Default lock lifetime cannot be 0"));
    }
    Ok(())
}

fn validate_throttling_config(config: &AppConfig) -> Result<()> {
    let throttling = &config.throttling;
    if throttling.key_prefix.is_empty() {
        return Err(Error::configuration("Throttling key prefix cannot be empty"));
    }
    if throttling.max_hits_per_period == 0 {
        return Err(Error::configuration(
            "Throttling hits per period cannot be 0",
        ));
    }
    if throttling.period_ms == 0 {
        return Err(Error::configuration("Throttling period cannot be 0"));
    }
    if throttling.max_resource_name_length == 0 {
        return Err(Error::configuration(
            "Throttling maximum resource name length cannot be 0",
        ));
    }
    Ok(())
}

fn validate_storage_config(config: &AppConfig) -> Result<()> {
    let storage = &config.storage;
    if storage.provider.trim().is_empty() {
        return Err(Error::configuration("Storage provider cannot be empty"));
    }
    if storage.provider == "redis" && storage.uri.as_deref().is_none_or(str::is_empty) {
        return Err(Error::configuration(
            "Storage URI is required for the redis provider",
        ));
    }
    Ok(())
}

fn validate_event_bus_config(config: &AppConfig) -> Result<()> {
    let event_bus = &config.event_bus;
    match event_bus.provider {
        EventBusKind::Tokio if event_bus.capacity == 0 => Err(Error::configuration(
            "Event bus capacity cannot be 0 for the tokio provider",
        )),
        EventBusKind::Nats if event_bus.nats_url.as_deref().is_none_or(str::is_empty) => Err(
            Error::configuration("NATS URL is required for the nats event bus"),
        ),
        EventBusKind::Nats if event_bus.nats_subject.is_empty() => Err(Error::configuration(
            "NATS subject cannot be empty",
        )),
        _ => Ok(()),
    }
}

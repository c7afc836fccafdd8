use crate::config::{Cli, LoggingConfig};
use crate::core::field_factory::FactoryOptions;
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{0}': {1}")]
    Read(String, String),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("form.schema_path must not be empty")]
    MissingSchemaPath,

    #[error("invalid id prefix '{0}': must be non-empty and free of '.'")]
    InvalidPrefix(String),

    #[error("field and form id prefixes must differ")]
    SharedPrefix,

    #[error("ids.key_suffix_length must be between 1 and 32, got {0}")]
    InvalidKeySuffixLength(usize),

    #[error("logging.log_file_path must be set when log_to_file is enabled")]
    MissingLogFile,

    #[error("invalid log level '{0}'")]
    InvalidLogLevel(String),

    #[error("cannot open log file '{0}': {1}")]
    LogFile(String, String),
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub form: FormConfig,
    #[serde(default)]
    pub ids: IdConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct FormConfig {
    /// JSON schema to load.
    pub schema_path: PathBuf,
    /// Optional data object to bind against the loaded form.
    #[serde(default)]
    pub data_path: Option<PathBuf>,
    /// Where to write the normalized schema, if anywhere.
    #[serde(default)]
    pub export_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct IdConfig {
    pub field_prefix: String,
    pub form_prefix: String,
    pub key_suffix_length: usize,
}

impl Default for IdConfig {
    fn default() -> Self {
        let options = FactoryOptions::default();
        Self {
            field_prefix: options.field_id_prefix,
            form_prefix: options.form_id_prefix,
            key_suffix_length: options.key_suffix_length,
        }
    }
}

impl IdConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for prefix in [&self.field_prefix, &self.form_prefix] {
            if prefix.trim().is_empty() || prefix.contains('.') {
                return Err(ConfigError::InvalidPrefix(prefix.clone()));
            }
        }
        if self.field_prefix == self.form_prefix {
            return Err(ConfigError::SharedPrefix);
        }
        if !(1..=32).contains(&self.key_suffix_length) {
            return Err(ConfigError::InvalidKeySuffixLength(self.key_suffix_length));
        }
        Ok(())
    }
}

impl From<&IdConfig> for FactoryOptions {
    fn from(ids: &IdConfig) -> Self {
        FactoryOptions {
            field_id_prefix: ids.field_prefix.clone(),
            form_id_prefix: ids.form_prefix.clone(),
            key_suffix_length: ids.key_suffix_length,
        }
    }
}

impl Config {
    /// Reads the file named by `--config`.
    pub fn from_args() -> Result<Self, ConfigError> {
        let cli = Cli::parse();
        Self::load_from_file(&cli.config_path)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.display().to_string(), e.to_string()))?;
        let mut config: Config = toml::from_str(&contents)?;

        // relative paths are taken from the config file's directory
        if let Some(base) = path.parent() {
            config.form.resolve_relative_to(base);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.form.schema_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingSchemaPath);
        }
        self.ids.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    pub fn factory_options(&self) -> FactoryOptions {
        FactoryOptions::from(&self.ids)
    }
}

impl FormConfig {
    fn resolve_relative_to(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() && !p.as_os_str().is_empty() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.schema_path);
        if let Some(p) = self.data_path.as_mut() {
            resolve(p);
        }
        if let Some(p) = self.export_path.as_mut() {
            resolve(p);
        }
    }
}

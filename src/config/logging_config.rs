use crate::config::ConfigError;
use serde::Deserialize;
use std::fs::File;
use std::sync::Arc;
use tracing_subscriber::{prelude::*, EnvFilter};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_to_file: bool,
    pub log_file_path: String,
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    pub log_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_to_file: false,
            log_file_path: "formwork.log".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_to_file && self.log_file_path.trim().is_empty() {
            return Err(ConfigError::MissingLogFile);
        }
        if EnvFilter::try_new(&self.log_level).is_err() {
            return Err(ConfigError::InvalidLogLevel(self.log_level.clone()));
        }
        Ok(())
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.log_level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }

    /// Installs the global subscriber: stdout, plus a file when configured.
    ///
    /// Safe to call more than once; later calls leave the first subscriber
    /// in place.
    pub fn init(&self) -> Result<(), ConfigError> {
        let stdout = tracing_subscriber::fmt::layer()
            .with_file(true)
            .with_line_number(true);

        let file = if self.log_to_file {
            let file = File::create(&self.log_file_path).map_err(|e| {
                ConfigError::LogFile(self.log_file_path.clone(), e.to_string())
            })?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(Arc::new(file)),
            )
        } else {
            None
        };

        let _ = tracing_subscriber::registry()
            .with(self.filter())
            .with(stdout)
            .with(file)
            .try_init();
        Ok(())
    }
}

mod logging_config;
pub mod config;

pub use config::{Config, ConfigError, FormConfig, IdConfig};
pub use logging_config::LoggingConfig;

use clap::Parser;

/// Command line arguments of the `formwork` binary.
#[derive(Debug, Parser)]
#[command(name = "formwork", about = "Loads a form schema and resolves its data bindings")]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(short, long = "config", default_value = "formwork.toml")]
    pub config_path: String,
}

impl Cli {
    pub fn new(config_path: String) -> Self {
        Self { config_path }
    }
}

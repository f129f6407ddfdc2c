use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::env;

use crate::error::VendorError;

/// Number of leaked bindings listed before a teardown report is truncated
pub const DEFAULT_LEAK_REPORT_LIMIT: usize = 15;

/// Environment variable naming an optional TOML file with overrides
pub const CONFIG_FILE_ENV: &str = "MOCK_VENDOR_CONFIG";

/// Prefix of environment variable overrides (`MOCK_VENDOR_STRICT_LOOKUP=false`)
pub const ENV_PREFIX: &str = "MOCK_VENDOR";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct VendorConfig {
    /// Maximum leaked bindings enumerated per teardown report
    pub leak_report_limit: usize,
    /// Panic when a real object looks up a mock it never vended
    pub strict_lookup: bool,
    /// Panic from `ScopedVendor::drop` when teardown finds failures
    pub panic_on_failure: bool,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (pretty, json, compact)
    pub format: LogFormat,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
    Compact,
}

impl VendorConfig {
    /// Load configuration from the embedded defaults, an optional file and
    /// the environment, in that order of precedence
    pub fn from_env() -> Result<Self> {
        let mut builder = ConfigBuilder::builder().add_source(File::from_str(
            include_str!("../config/default.toml"),
            FileFormat::Toml,
        ));

        if let Ok(config_file) = env::var(CONFIG_FILE_ENV) {
            builder = builder.add_source(
                File::with_name(&config_file)
                    .required(false)
                    .format(FileFormat::Toml),
            );
        }

        let config = builder
            .add_source(Self::environment())
            .build()
            .context("Failed to build mock vendor configuration")?;

        let result: VendorConfig = config
            .try_deserialize()
            .context("Failed to deserialize mock vendor configuration")?;

        result.validate()?;
        Ok(result)
    }

    /// Load configuration from a specific file layered over the defaults
    pub fn from_file(path: &str) -> Result<Self> {
        let config = ConfigBuilder::builder()
            .add_source(File::from_str(
                include_str!("../config/default.toml"),
                FileFormat::Toml,
            ))
            .add_source(File::with_name(path).format(FileFormat::Toml))
            .add_source(Self::environment())
            .build()
            .context("Failed to build mock vendor configuration from file")?;

        let result: VendorConfig = config
            .try_deserialize()
            .context("Failed to deserialize mock vendor configuration from file")?;

        result.validate()?;
        Ok(result)
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(VendorError::Configuration(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                ))
                .into());
            }
        }

        Ok(())
    }
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            leak_report_limit: DEFAULT_LEAK_REPORT_LIMIT,
            strict_lookup: true,
            panic_on_failure: true,
            logging: LoggingConfig {
                level: "warn".to_string(),
                format: LogFormat::Compact,
            },
        }
    }
}

use std::env;
use thiserror::Error;

pub const BUFFER_SIZE_VAR: &str = "CATALOG_BUFFER_SIZE";
pub const SEED_DEMO_VAR: &str = "CATALOG_SEED_DEMO";

/// Configuration error type
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Failed to parse environment variable '{key}': {details}")]
    ParseError { key: String, details: String },
}

/// Runtime settings for the catalog system.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    /// Capacity of the product actor's mailbox.
    pub buffer_size: usize,
    /// Load the three demo products on startup.
    pub seed_demo_data: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            buffer_size: 32,
            seed_demo_data: true,
        }
    }
}

impl CatalogConfig {
    /// Reads `CATALOG_BUFFER_SIZE` and `CATALOG_SEED_DEMO`, falling back to defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let buffer_size = match env::var(BUFFER_SIZE_VAR) {
            Ok(raw) => parse_buffer_size(&raw)?,
            Err(_) => defaults.buffer_size,
        };
        let seed_demo_data = match env::var(SEED_DEMO_VAR) {
            Ok(raw) => parse_flag(SEED_DEMO_VAR, &raw)?,
            Err(_) => defaults.seed_demo_data,
        };

        Ok(Self {
            buffer_size,
            seed_demo_data,
        })
    }
}

fn parse_buffer_size(raw: &str) -> Result<usize, ConfigError> {
    let parse_error = |details: String| ConfigError::ParseError {
        key: BUFFER_SIZE_VAR.to_string(),
        details,
    };
    let size: usize = raw.trim().parse().map_err(|e| parse_error(format!("{}", e)))?;
    // tokio::sync::mpsc::channel panics on zero capacity
    if size == 0 {
        return Err(parse_error("must be greater than zero".to_string()));
    }
    Ok(size)
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(ConfigError::ParseError {
            key: key.to_string(),
            details: format!("expected a boolean, got '{}'", other),
        }),
    }
}

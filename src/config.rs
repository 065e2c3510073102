//! Runtime settings: defaults, then `LIBRAS_QUIZ_*` environment variables.
//! Command-line flags are applied on top by the binary.

use crate::db;
use crate::generator::DEFAULT_MAX_ATTEMPTS;
use crate::logger;
use std::path::PathBuf;
use thiserror::Error;

pub const ENV_DB: &str = "LIBRAS_QUIZ_DB";
pub const ENV_SEED: &str = "LIBRAS_QUIZ_SEED";
pub const ENV_REQUIRE_CONFIRMATION: &str = "LIBRAS_QUIZ_REQUIRE_CONFIRMATION";
pub const ENV_MAX_ATTEMPTS: &str = "LIBRAS_QUIZ_MAX_ATTEMPTS";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {var}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    /// Fixed RNG seed; `None` draws from the thread RNG.
    pub seed: Option<u64>,
    pub require_confirmation: bool,
    pub max_attempts: usize,
    pub log_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: db::get_db_path(),
            seed: None,
            require_confirmation: false,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            log_path: PathBuf::from(logger::DEFAULT_LOG_FILE),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the config from `lookup`, which maps a variable name to its
    /// value. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(path) = get(ENV_DB) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(value) = get(ENV_SEED) {
            config.seed = Some(parse_number(ENV_SEED, &value)?);
        }
        if let Some(value) = get(ENV_REQUIRE_CONFIRMATION) {
            config.require_confirmation = parse_flag(ENV_REQUIRE_CONFIRMATION, &value)?;
        }
        if let Some(value) = get(ENV_MAX_ATTEMPTS) {
            let attempts: usize = parse_number(ENV_MAX_ATTEMPTS, &value)?;
            if attempts == 0 {
                return Err(ConfigError::Invalid {
                    var: ENV_MAX_ATTEMPTS,
                    value,
                });
            }
            config.max_attempts = attempts;
        }

        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        var,
        value: value.to_string(),
    })
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: value.to_string(),
        }),
    }
}

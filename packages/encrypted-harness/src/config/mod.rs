mod log;

pub use log::{LogConfig, LogFormat, LogLevel, LogOutput};

use crate::error::{ConfigError, Error};
use crate::mode::Mode;
use config::{Config, Environment};
use regex::Regex;
use serde::Deserialize;
use std::{env, fmt::Display, time::Duration};

pub const CS_PREFIX: &str = "CS";
pub const DATABASE_URL: &str = "DATABASE_URL";
pub const DEFAULT_CONFIG_FILE_PATH: &str = "encrypted-harness.toml";

///
/// Everything a test needs to reach the database and decide what to run.
///
/// Built from (in increasing precedence):
///     an optional config file
///     `CS_` prefixed env vars, nested with `__` (eg `CS_LOG__LEVEL`)
///     `DATABASE_URL`
///
#[derive(Clone, Debug, Deserialize)]
pub struct HarnessConfig {
    pub database_url: String,

    #[serde(default = "HarnessConfig::default_modes")]
    pub modes: Vec<Mode>,

    #[serde(default = "HarnessConfig::default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub log: LogConfig,
}

impl HarnessConfig {
    pub fn default_modes() -> Vec<Mode> {
        Mode::ALL.to_vec()
    }

    // 30 seconds
    pub const fn default_timeout() -> u64 {
        30 * 1000
    }

    pub fn load() -> Result<HarnessConfig, Error> {
        HarnessConfig::build(DEFAULT_CONFIG_FILE_PATH)
    }

    pub fn build(path: &str) -> Result<Self, Error> {
        let cs_env_source = Environment::with_prefix(CS_PREFIX)
            .try_parsing(true)
            .separator("__")
            .prefix_separator("_")
            .list_separator(",")
            .with_list_parse_key("modes");

        let database_url = env::var(DATABASE_URL).ok().filter(|url| !url.is_empty());

        let config: Self = Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(cs_env_source)
            .set_override_option("database_url", database_url)
            .map_err(ConfigError::from)?
            .build()
            .map_err(ConfigError::from)?
            .try_deserialize()
            .map_err(deserialize_error)?;

        // Fail before any test runs rather than on first connect
        config.connection_config()?;

        if config.modes.is_empty() {
            return Err(ConfigError::InvalidParameter {
                name: "modes".to_string(),
                value: "".to_string(),
            }
            .into());
        }

        Ok(config)
    }

    pub fn connection_config(&self) -> Result<tokio_postgres::Config, Error> {
        let config = self
            .database_url
            .parse::<tokio_postgres::Config>()
            .map_err(ConfigError::InvalidDatabaseUrl)?;
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }
}

///
/// Password is NEVER EVER displayed
///
impl Display for HarnessConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let modes = self
            .modes
            .iter()
            .map(|mode| mode.to_string())
            .collect::<Vec<_>>()
            .join(",");

        match self.connection_config() {
            Ok(config) => write!(
                f,
                "{}@{} [{modes}]",
                config.get_user().unwrap_or("postgres"),
                config.get_dbname().unwrap_or_default(),
            ),
            Err(_) => write!(f, "<invalid database url> [{modes}]"),
        }
    }
}

///
/// A missing field is reported as `ConfigError::MissingParameter`.
/// config 0.15 reports it as `NotFound`, older versions as a serde `missing field` message.
///
fn deserialize_error(err: config::ConfigError) -> ConfigError {
    match err {
        config::ConfigError::NotFound(ref key) => ConfigError::MissingParameter {
            name: parameter_name(key),
        },
        config::ConfigError::Message(ref s) if s.contains("missing field") => {
            let name = extract_field_name(s).unwrap_or("unknown".to_string());
            ConfigError::MissingParameter {
                name: parameter_name(&name),
            }
        }
        _ => err.into(),
    }
}

///
/// `database_url` is only ever set from `DATABASE_URL`, so that is the name reported.
///
fn parameter_name(field: &str) -> String {
    match field {
        "database_url" => DATABASE_URL.to_string(),
        _ => field.to_string(),
    }
}

///
/// Extracts a field name (if present) from a config::ConfigError::Message
/// This is called in `build` if a ConfigError message contains the string `missing field`
///
fn extract_field_name(input: &str) -> Option<String> {
    let re = Regex::new(r"`(\w+)`").ok()?;
    re.captures(input)
        .and_then(|caps| caps.get(1).map(|m| m.as_str().to_string()))
}

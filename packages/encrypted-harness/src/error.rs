use crate::{matcher::CallForm, mode::Mode};
use std::fmt::{self, Display};
use thiserror::Error;
use tokio::time::error::Elapsed;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Cleanup of fixture row {id} failed")]
    Cleanup {
        id: i64,
        #[source]
        source: Box<Error>,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Connection timed out")]
    ConnectionTimeout(#[from] Elapsed),

    #[error(transparent)]
    Database(#[from] tokio_postgres::Error),

    #[error("Column {column} could not be decoded: {message}")]
    Decode { column: usize, message: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("{form} query in mode {mode} expected {expected} but returned {actual}")]
    Mismatch {
        form: CallForm,
        mode: Mode,
        expected: String,
        actual: String,
    },

    #[error("Query references ${index} but only {count} parameters were provided")]
    MissingParameter { index: usize, count: usize },

    #[error("{} of the execution modes failed: {}", .0.len(), ModeFailures(.0))]
    ModeFailures(Vec<ModeFailure>),

    #[error("No rows in result set")]
    NoRows,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    FileOrEnvironment(#[from] config::ConfigError),

    #[error("Invalid connection string: {0}")]
    InvalidDatabaseUrl(tokio_postgres::Error),

    #[error("Invalid value {value} for parameter {name}")]
    InvalidParameter { name: String, value: String },

    #[error("Missing field {name} from configuration file or environment")]
    MissingParameter { name: String },
}

///
/// A single execution mode that did not complete.
/// Captures panics as well as returned errors so sibling modes can still report.
///
#[derive(Debug)]
pub struct ModeFailure {
    pub mode: Mode,
    pub reason: String,
}

impl Display for ModeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.mode, self.reason)
    }
}

struct ModeFailures<'a>(&'a [ModeFailure]);

impl Display for ModeFailures<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let failures = self
            .0
            .iter()
            .map(|failure| failure.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{failures}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_failures_name_every_mode() {
        let err = Error::ModeFailures(vec![
            ModeFailure {
                mode: Mode::Exec,
                reason: "boom".to_string(),
            },
            ModeFailure {
                mode: Mode::SimpleProtocol,
                reason: "timed out".to_string(),
            },
        ]);

        let message = err.to_string();
        assert!(message.starts_with("2 of the execution modes failed"));
        assert!(message.contains("[exec] boom"));
        assert!(message.contains("[simple_protocol] timed out"));
    }

    #[test]
    fn missing_database_url_message() {
        let err: Error = ConfigError::MissingParameter {
            name: "DATABASE_URL".to_string(),
        }
        .into();

        assert_eq!(
            err.to_string(),
            "Missing field DATABASE_URL from configuration file or environment"
        );
    }
}

use crate::error::ConfigError;
use serde::Deserialize;
use std::{fmt::Display, str::FromStr};

///
/// How a query and its parameters travel to the server.
///
/// The extended protocol modes differ in how often they Parse/Describe:
///
///     CacheStatement  prepare once per SQL text and reuse the named statement
///     CacheDescribe   describe once per SQL text, then execute with the cached parameter types
///     DescribeExec    prepare an unnamed statement and execute it, every time
///     Exec            execute without a describe step, parameter types come from the values
///     SimpleProtocol  parameters are rendered into the SQL text and sent as a simple Query
///
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String")]
pub enum Mode {
    CacheStatement,
    CacheDescribe,
    DescribeExec,
    Exec,
    SimpleProtocol,
}

impl Mode {
    pub const ALL: [Mode; 5] = [
        Mode::CacheStatement,
        Mode::CacheDescribe,
        Mode::DescribeExec,
        Mode::Exec,
        Mode::SimpleProtocol,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Mode::CacheStatement => "cache_statement",
            Mode::CacheDescribe => "cache_describe",
            Mode::DescribeExec => "describe_exec",
            Mode::Exec => "exec",
            Mode::SimpleProtocol => "simple_protocol",
        }
    }

    ///
    /// False where a float parameter is formatted by the client without a declared server type,
    /// so the value that arrives is not guaranteed to be the value that was sent.
    ///
    pub fn preserves_float_literals(&self) -> bool {
        !matches!(self, Mode::Exec | Mode::SimpleProtocol)
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase().replace('-', "_");

        Mode::ALL
            .into_iter()
            .find(|mode| mode.name() == name)
            .ok_or_else(|| ConfigError::InvalidParameter {
                name: "modes".to_string(),
                value: s.to_string(),
            })
    }
}

impl TryFrom<String> for Mode {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

use crate::{error::Error, row::Payload};
use serde_json::{Number, Value};
use std::fmt::{self, Display};

///
/// The shape a query result must have.
///
#[derive(Clone, Debug, PartialEq)]
pub enum Expected {
    /// The query returns no rows at all
    NoResult,
    /// The first column decodes to exactly this boolean
    NativeBool(bool),
    /// The first column is a zero-length payload (eg NULL from `jsonb_path_query_first`)
    Empty,
    /// The first column decodes as JSON, deep-equal to this value with numbers compared as f64
    Json(Value),
}

///
/// What the first column of the first row held, read according to the expected shape.
///
#[derive(Clone, Debug, PartialEq)]
pub enum Observed {
    Bool(bool),
    Payload(Payload),
}

impl Expected {
    pub fn json(value: impl Into<Value>) -> Self {
        Expected::Json(value.into())
    }

    pub fn reads_bool(&self) -> bool {
        matches!(self, Expected::NativeBool(_))
    }

    ///
    /// Check a query outcome against the expectation.
    ///
    /// `Err(Error::NoRows)` is an outcome like any other and matches `NoResult`.
    /// Any other error is returned unchanged, wrapped in `Mismatch::Error`.
    ///
    pub fn check(&self, outcome: Result<Observed, Error>) -> Result<(), Mismatch> {
        let observed = match (self, outcome) {
            (Expected::NoResult, Err(Error::NoRows)) => return Ok(()),
            (_, Err(Error::NoRows)) => return Err(Mismatch::Actual("no rows".to_string())),
            (_, Err(err)) => return Err(Mismatch::Error(err)),
            (_, Ok(observed)) => observed,
        };

        match (self, observed) {
            (Expected::NoResult, observed) => Err(Mismatch::Actual(observed.to_string())),

            (Expected::NativeBool(expected), Observed::Bool(actual)) if *expected == actual => {
                Ok(())
            }

            (Expected::Empty, Observed::Payload(payload)) if payload.is_empty() => Ok(()),

            (Expected::Json(expected), Observed::Payload(payload)) if !payload.is_empty() => {
                let actual = payload.json().map_err(Mismatch::Error)?;
                if normalize(expected) == normalize(&actual) {
                    Ok(())
                } else {
                    Err(Mismatch::Actual(actual.to_string()))
                }
            }

            (_, observed) => Err(Mismatch::Actual(observed.to_string())),
        }
    }
}

impl Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::NoResult => write!(f, "no rows"),
            Expected::NativeBool(b) => write!(f, "{b}"),
            Expected::Empty => write!(f, "an empty result"),
            Expected::Json(value) => write!(f, "{value}"),
        }
    }
}

impl Display for Observed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Observed::Bool(b) => write!(f, "{b}"),
            Observed::Payload(payload) if payload.is_empty() => write!(f, "an empty result"),
            Observed::Payload(payload) => {
                write!(f, "{}", String::from_utf8_lossy(payload.as_bytes()))
            }
        }
    }
}

///
/// Why an outcome did not match.
///
#[derive(Debug)]
pub enum Mismatch {
    /// The query ran but produced something else
    Actual(String),
    /// The query or decoding failed
    Error(Error),
}

///
/// Every JSON number becomes an f64, so `42` and `42.0` compare equal.
///
pub fn normalize(value: &Value) -> Value {
    match value {
        Value::Number(n) => n
            .as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| value.clone()),
        Value::Array(values) => Value::Array(values.iter().map(normalize).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.to_owned(), normalize(v)))
                .collect(),
        ),
        _ => value.clone(),
    }
}

use crate::{error::Error, param::Domain};
use postgres_types::{FromSql, Type};
use serde_json::Value;
use std::error::Error as StdError;
use tokio_postgres::{Row, SimpleQueryRow};

///
/// A result row from either protocol.
///
/// Extended protocol rows carry binary values with server types,
/// simple protocol rows carry text (or NULL) only.
///
pub enum ResultRow {
    Extended(Row),
    Simple(SimpleQueryRow),
}

impl ResultRow {
    pub fn get<T: Column>(&self, idx: usize) -> Result<T, Error> {
        match self {
            ResultRow::Extended(row) => T::from_row(row, idx),
            ResultRow::Simple(row) => {
                let text = row.try_get(idx).map_err(|err| decode_error(idx, err))?;
                T::from_text(text).map_err(|message| Error::Decode {
                    column: idx,
                    message,
                })
            }
        }
    }
}

impl From<Row> for ResultRow {
    fn from(row: Row) -> Self {
        ResultRow::Extended(row)
    }
}

impl From<SimpleQueryRow> for ResultRow {
    fn from(row: SimpleQueryRow) -> Self {
        ResultRow::Simple(row)
    }
}

///
/// A Rust type that a result column can be read into, from either protocol.
///
pub trait Column: Sized {
    fn from_row(row: &Row, idx: usize) -> Result<Self, Error>;

    fn from_text(text: Option<&str>) -> Result<Self, String>;
}

fn decode_error(column: usize, err: impl ToString) -> Error {
    Error::Decode {
        column,
        message: err.to_string(),
    }
}

fn decode<'a, T: FromSql<'a>>(row: &'a Row, idx: usize) -> Result<T, Error> {
    row.try_get(idx).map_err(|err| decode_error(idx, err))
}

fn not_null(text: Option<&str>) -> Result<&str, String> {
    text.ok_or_else(|| "unexpected NULL".to_string())
}

macro_rules! impl_column_from_str {
    ($($ty:ty),*) => {
        $(
            impl Column for $ty {
                fn from_row(row: &Row, idx: usize) -> Result<Self, Error> {
                    decode(row, idx)
                }

                fn from_text(text: Option<&str>) -> Result<Self, String> {
                    not_null(text)?.parse::<$ty>().map_err(|err| err.to_string())
                }
            }
        )*
    };
}

impl_column_from_str!(i16, i32, i64, f64, String);

impl Column for bool {
    fn from_row(row: &Row, idx: usize) -> Result<Self, Error> {
        decode(row, idx)
    }

    fn from_text(text: Option<&str>) -> Result<Self, String> {
        match not_null(text)? {
            "t" | "true" => Ok(true),
            "f" | "false" => Ok(false),
            other => Err(format!("{other} is not a boolean")),
        }
    }
}

impl Column for Domain {
    fn from_row(row: &Row, idx: usize) -> Result<Self, Error> {
        decode(row, idx)
    }

    fn from_text(text: Option<&str>) -> Result<Self, String> {
        not_null(text).map(|s| Domain(s.to_string()))
    }
}

impl Column for Payload {
    fn from_row(row: &Row, idx: usize) -> Result<Self, Error> {
        decode(row, idx)
    }

    fn from_text(text: Option<&str>) -> Result<Self, String> {
        Ok(text.map(Payload::from).unwrap_or_default())
    }
}

///
/// The raw bytes of a column, whatever its type.
///
/// NULL reads as an empty payload.
/// Binary JSONB has its version byte removed, so a payload holds JSON text in both protocols.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Payload(Vec<u8>);

const JSONB_VERSION: u8 = 1;

impl Payload {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn json(&self) -> Result<Value, Error> {
        let value = serde_json::from_slice(&self.0)?;
        Ok(value)
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Payload(s.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload(bytes)
    }
}

impl<'a> FromSql<'a> for Payload {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        let bytes = match raw.split_first() {
            Some((&JSONB_VERSION, json)) if *ty == Type::JSONB => json,
            _ => raw,
        };
        Ok(Payload(bytes.to_vec()))
    }

    fn from_sql_null(_ty: &Type) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        Ok(Payload::default())
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }
}

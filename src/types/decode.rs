//! Decoding of native column values.
//!
//! Executors fetch rows through the native client library, which reports a
//! datatype per column and a raw payload per cell. This module turns those
//! into [`Value`]s.

use crate::error::TransportError;
use crate::types::Value;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Seconds from the Unix epoch to 2001-01-01T00:00:00Z, the engine's epoch.
const ENGINE_EPOCH_OFFSET: i64 = 978_307_200;

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Column datatypes the client can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Boolean,
    TinyInteger,
    SmallInteger,
    Integer,
    LongInteger,
    Timestamp,
    TimestampTz,
    Character,
    VCharacter,
    Bit,
    VBit,
}

impl ColumnType {
    /// Decode one cell of this column.
    ///
    /// `Null` decodes to `Value::Null` for every column type.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::InvalidColumnValue` if the payload does not
    /// belong to this column type or a timestamp is out of range.
    pub fn decode(self, raw: NativeColumn<'_>) -> Result<Value, TransportError> {
        match (self, raw) {
            (_, NativeColumn::Null) => Ok(Value::Null),
            (ColumnType::Boolean, NativeColumn::Boolean(v)) => Ok(Value::Bool(v)),
            (ColumnType::TinyInteger, NativeColumn::TinyInteger(v)) => Ok(Value::Int(v.into())),
            (ColumnType::SmallInteger, NativeColumn::SmallInteger(v)) => Ok(Value::Int(v.into())),
            (ColumnType::Integer, NativeColumn::Integer(v)) => Ok(Value::Int(v.into())),
            (ColumnType::LongInteger, NativeColumn::LongInteger(v)) => Ok(Value::Int(v)),
            (ColumnType::Timestamp | ColumnType::TimestampTz, NativeColumn::Timestamp(secs)) => {
                decode_timestamp(secs).map(Value::Timestamp)
            }
            (ColumnType::Character | ColumnType::VCharacter, NativeColumn::Character(s)) => {
                Ok(Value::Text(s.to_string()))
            }
            (ColumnType::Bit | ColumnType::VBit, NativeColumn::Bit(bytes)) => {
                Ok(Value::Bytes(bytes.to_vec()))
            }
            (column_type, raw) => Err(TransportError::InvalidColumnValue(format!(
                "{} column holding {}",
                column_type,
                raw.kind()
            ))),
        }
    }
}

impl FromStr for ColumnType {
    type Err = TransportError;

    /// Parse a SQL datatype name such as `INTEGER` or `CHARACTER VARYING(20)`.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::UnsupportedColumnType` for any other type.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.split('(').next().unwrap_or(s).trim().to_ascii_uppercase();

        match name.as_str() {
            "BOOLEAN" => Ok(ColumnType::Boolean),
            "TINYINT" => Ok(ColumnType::TinyInteger),
            "SMALLINT" => Ok(ColumnType::SmallInteger),
            "INTEGER" | "INT" => Ok(ColumnType::Integer),
            "LONGINT" => Ok(ColumnType::LongInteger),
            "TIMESTAMP" => Ok(ColumnType::Timestamp),
            "TIMESTAMP WITH TIME ZONE" => Ok(ColumnType::TimestampTz),
            "CHARACTER" | "CHAR" => Ok(ColumnType::Character),
            "CHARACTER VARYING" | "VARCHAR" => Ok(ColumnType::VCharacter),
            "BIT" => Ok(ColumnType::Bit),
            "BIT VARYING" => Ok(ColumnType::VBit),
            _ => Err(TransportError::UnsupportedColumnType(s.trim().to_string())),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::TinyInteger => "TINYINT",
            ColumnType::SmallInteger => "SMALLINT",
            ColumnType::Integer => "INTEGER",
            ColumnType::LongInteger => "LONGINT",
            ColumnType::Timestamp => "TIMESTAMP",
            ColumnType::TimestampTz => "TIMESTAMP WITH TIME ZONE",
            ColumnType::Character => "CHARACTER",
            ColumnType::VCharacter => "CHARACTER VARYING",
            ColumnType::Bit => "BIT",
            ColumnType::VBit => "BIT VARYING",
        };
        f.write_str(name)
    }
}

/// Raw cell payload as read from the native library.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NativeColumn<'a> {
    Null,
    Boolean(bool),
    TinyInteger(i8),
    SmallInteger(i16),
    Integer(i32),
    LongInteger(i64),
    /// Seconds since 2001-01-01T00:00:00Z, fractional part included
    Timestamp(f64),
    Character(&'a str),
    Bit(&'a [u8]),
}

impl NativeColumn<'_> {
    fn kind(&self) -> &'static str {
        match self {
            NativeColumn::Null => "null",
            NativeColumn::Boolean(_) => "boolean",
            NativeColumn::TinyInteger(_) => "tinyint",
            NativeColumn::SmallInteger(_) => "smallint",
            NativeColumn::Integer(_) => "integer",
            NativeColumn::LongInteger(_) => "longint",
            NativeColumn::Timestamp(_) => "timestamp",
            NativeColumn::Character(_) => "character",
            NativeColumn::Bit(_) => "bit",
        }
    }
}

/// Convert a raw engine timestamp to UTC.
///
/// The fraction is taken from the floor of `raw_secs`, so instants before
/// the engine epoch keep their sub-second part pointing forward in time.
///
/// # Errors
///
/// Returns `TransportError::InvalidColumnValue` for non-finite or
/// out-of-range input.
pub fn decode_timestamp(raw_secs: f64) -> Result<DateTime<Utc>, TransportError> {
    let invalid = || TransportError::InvalidColumnValue(format!("timestamp {}", raw_secs));

    if !raw_secs.is_finite() {
        return Err(invalid());
    }

    let whole = raw_secs.floor();
    // Rounding can push the fraction to a full second.
    let nanos = (((raw_secs - whole) * NANOS_PER_SEC) as u32).min(999_999_999);

    let secs = (whole as i64)
        .checked_add(ENGINE_EPOCH_OFFSET)
        .ok_or_else(invalid)?;

    DateTime::from_timestamp(secs, nanos).ok_or_else(invalid)
}

/// Decode a fetched row given the column types from the result metadata.
///
/// # Errors
///
/// Fails if the row has fewer cells than columns, or any cell fails to
/// decode.
pub fn decode_row<'a>(
    column_types: &[ColumnType],
    cells: impl IntoIterator<Item = NativeColumn<'a>>,
) -> Result<Vec<Value>, TransportError> {
    let mut cells = cells.into_iter();

    column_types
        .iter()
        .enumerate()
        .map(|(index, column_type)| {
            let cell = cells.next().ok_or_else(|| {
                TransportError::InvalidColumnValue(format!("no column at index {}", index))
            })?;
            column_type.decode(cell)
        })
        .collect()
}

//! Bindable scalar values and their SQL literal encoding.

use chrono::{DateTime, TimeZone, Utc};
use std::fmt::{self, Write};

/// A scalar value that can be bound to a placeholder or read from a row.
///
/// The set of kinds is closed. Supporting a new kind means adding a variant
/// here, which the compiler then forces through the encoder.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL
    Null,
    /// BOOLEAN
    Bool(bool),
    /// Any signed integer width
    Int(i64),
    /// Any unsigned integer width
    UInt(u64),
    /// DOUBLE PRECISION
    Float(f64),
    /// BIT / BIT VARYING
    Bytes(Vec<u8>),
    /// CHARACTER / CHARACTER VARYING
    Text(String),
    /// TIMESTAMP, always held in UTC
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Render this value as the literal text the engine accepts.
    ///
    /// | Kind | Output |
    /// |---|---|
    /// | `Int` / `UInt` | decimal digits, `-` for negatives |
    /// | `Float` | shortest round-trip decimal, no exponent |
    /// | `Bool` | `true` / `false` |
    /// | `Bytes` | `x'<lowercase hex>'` |
    /// | `Null` | `NULL` |
    /// | `Text` | single-quoted with `'` doubled |
    /// | `Timestamp` | `TIMESTAMP 'YYYY-MM-DD HH:MM:SS.mmm'` in UTC |
    ///
    /// `UInt` values above `i64::MAX` may overflow the engine's integer
    /// literal range. Non-finite floats render as `NaN` / `inf` and are
    /// rejected by the engine.
    pub fn to_sql_literal(&self) -> String {
        let mut out = String::new();
        self.write_sql_literal(&mut out);
        out
    }

    /// Append the literal encoding of this value to `out`.
    pub fn write_sql_literal(&self, out: &mut String) {
        match self {
            Value::Null => out.push_str("NULL"),
            Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            // Writing into a String cannot fail.
            Value::Int(i) => {
                let _ = write!(out, "{}", i);
            }
            Value::UInt(u) => {
                let _ = write!(out, "{}", u);
            }
            Value::Float(f) => {
                let _ = write!(out, "{}", f);
            }
            Value::Bytes(bytes) => {
                out.reserve(bytes.len() * 2 + 3);
                out.push_str("x'");
                out.push_str(&hex::encode(bytes));
                out.push('\'');
            }
            Value::Text(s) => {
                out.reserve(s.len() + 2);
                out.push('\'');
                for ch in s.chars() {
                    if ch == '\'' {
                        out.push('\'');
                    }
                    out.push(ch);
                }
                out.push('\'');
            }
            Value::Timestamp(ts) => {
                let _ = write!(out, "TIMESTAMP '{}'", ts.format("%Y-%m-%d %H:%M:%S%.3f"));
            }
        }
    }

    /// Check if the value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the value as `i64`, converting unsigned values that fit.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::UInt(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    /// Get the value as `u64`, converting non-negative signed values.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::UInt(u) => Some(*u),
            Value::Int(i) => u64::try_from(*i).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            Value::UInt(u) => Some(*u as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql_literal())
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::Int(value as i64)
                }
            }
        )*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::UInt(value as u64)
                }
            }
        )*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f32> for Value {
    /// Widens through the shortest `f32` text, so `1.1f32` stays `1.1`.
    fn from(value: f32) -> Self {
        let widened = value.to_string().parse().unwrap_or(f64::from(value));
        Value::Float(widened)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Bytes(value.to_vec())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    fn from(value: DateTime<Tz>) -> Self {
        Value::Timestamp(value.with_timezone(&Utc))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

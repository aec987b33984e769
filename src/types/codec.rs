use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::value::{DomainValue, SqlValue};

/// A codec-level failure, wrapped with entity/field context by callers.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct CodecError(pub String);

impl CodecError {
    fn mismatch(codec: &ValueType, value: &dyn std::fmt::Display) -> Self {
        Self(format!(
            "value {} does not match codec {}",
            value,
            codec.sql_data_type()
        ))
    }
}

/// The driver-primitive kind a codec reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Primitive {
    Bool,
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Float,
    Double,
    Text,
    Bytes,
    Date,
    Time,
    Timestamp,
    TimestampTz,
    Uuid,
    Decimal,
}

/// A concrete codec pairing one domain type with exactly one driver
/// primitive. Two codecs are equal iff their DDL representation and
/// primitive accessors are equal, which the derived `PartialEq` gives us.
///
/// Invariant: `decode(encode(x)) == x` over the domain's canonical range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueType {
    Bool,
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Float,
    Double,
    Varchar {
        length: u32,
    },
    Bytes,
    Date,
    Time,
    DateTime,
    Instant,
    Uuid,
    /// Stored as BIGINT milliseconds.
    Duration,
    /// `precision: None` renders an unconstrained DECIMAL.
    Decimal {
        precision: Option<u32>,
        scale: u32,
    },
    /// Stored as TEXT via serde_json.
    Json,
    /// Stored as VARCHAR of the longest constant name (unless hinted).
    Enum {
        name: String,
        constants: Vec<String>,
        case_insensitive: bool,
        length: u32,
    },
}

impl ValueType {
    /// The DDL data type string. Used only when emitting CREATE TABLE.
    pub fn sql_data_type(&self) -> String {
        match self {
            Self::Bool => "BOOLEAN".to_string(),
            Self::TinyInt => "TINYINT".to_string(),
            Self::SmallInt => "SMALLINT".to_string(),
            Self::Int => "INT".to_string(),
            Self::BigInt => "BIGINT".to_string(),
            Self::Float => "REAL".to_string(),
            Self::Double => "DOUBLE PRECISION".to_string(),
            Self::Varchar { length } => format!("VARCHAR({})", length),
            Self::Bytes => "BLOB".to_string(),
            Self::Date => "DATE".to_string(),
            Self::Time => "TIME".to_string(),
            Self::DateTime => "TIMESTAMP".to_string(),
            Self::Instant => "TIMESTAMP WITH TIME ZONE".to_string(),
            Self::Uuid => "UUID".to_string(),
            Self::Duration => "BIGINT".to_string(),
            Self::Decimal {
                precision: Some(p),
                scale,
            } => format!("DECIMAL({},{})", p, scale),
            Self::Decimal {
                precision: None, ..
            } => "DECIMAL".to_string(),
            Self::Json => "TEXT".to_string(),
            Self::Enum { length, .. } => format!("VARCHAR({})", length),
        }
    }

    /// The primitive kind this codec binds through the driver.
    pub fn primitive(&self) -> Primitive {
        match self {
            Self::Bool => Primitive::Bool,
            Self::TinyInt => Primitive::TinyInt,
            Self::SmallInt => Primitive::SmallInt,
            Self::Int => Primitive::Int,
            Self::BigInt | Self::Duration => Primitive::BigInt,
            Self::Float => Primitive::Float,
            Self::Double => Primitive::Double,
            Self::Varchar { .. } | Self::Json | Self::Enum { .. } => Primitive::Text,
            Self::Bytes => Primitive::Bytes,
            Self::Date => Primitive::Date,
            Self::Time => Primitive::Time,
            Self::DateTime => Primitive::Timestamp,
            Self::Instant => Primitive::TimestampTz,
            Self::Uuid => Primitive::Uuid,
            Self::Decimal { .. } => Primitive::Decimal,
        }
    }

    /// Encode a domain value into the driver primitive.
    pub fn encode(&self, value: &DomainValue) -> Result<SqlValue, CodecError> {
        if value.is_null() {
            return Ok(SqlValue::Null);
        }
        match (self, value) {
            (Self::Bool, DomainValue::Bool(b)) => Ok(SqlValue::Bool(*b)),
            (Self::TinyInt, DomainValue::TinyInt(n)) => Ok(SqlValue::TinyInt(*n)),
            (Self::SmallInt, DomainValue::SmallInt(n)) => Ok(SqlValue::SmallInt(*n)),
            (Self::Int, DomainValue::Int(n)) => Ok(SqlValue::Int(*n)),
            (Self::BigInt, DomainValue::BigInt(n)) => Ok(SqlValue::BigInt(*n)),
            (Self::Float, DomainValue::Float(n)) => Ok(SqlValue::Float(*n)),
            (Self::Double, DomainValue::Double(n)) => Ok(SqlValue::Double(*n)),
            (Self::Varchar { .. }, DomainValue::String(s)) => Ok(SqlValue::Text(s.clone())),
            (Self::Bytes, DomainValue::Bytes(b)) => Ok(SqlValue::Bytes(b.clone())),
            (Self::Date, DomainValue::Date(d)) => Ok(SqlValue::Date(*d)),
            (Self::Time, DomainValue::Time(t)) => Ok(SqlValue::Time(*t)),
            (Self::DateTime, DomainValue::DateTime(ts)) => Ok(SqlValue::Timestamp(*ts)),
            (Self::Instant, DomainValue::Instant(ts)) => Ok(SqlValue::TimestampTz(*ts)),
            (Self::Uuid, DomainValue::Uuid(u)) => Ok(SqlValue::Uuid(*u)),
            (Self::Duration, DomainValue::Duration(d)) => {
                Ok(SqlValue::BigInt(d.num_milliseconds()))
            }
            (Self::Decimal { .. }, DomainValue::Decimal(d)) => Ok(SqlValue::Decimal(*d)),
            (Self::Json, DomainValue::Json(v)) => Ok(SqlValue::Text(v.to_string())),
            (
                Self::Enum {
                    name,
                    constants,
                    case_insensitive,
                    ..
                },
                DomainValue::Enum(s) | DomainValue::String(s),
            ) => match find_constant(constants, s, *case_insensitive) {
                Some(canonical) => Ok(SqlValue::Text(canonical.clone())),
                None => Err(CodecError(format!(
                    "'{}' is not a constant of enum {}",
                    s, name
                ))),
            },
            (codec, other) => Err(CodecError::mismatch(codec, other)),
        }
    }

    /// Decode a driver primitive back into the domain.
    pub fn decode(&self, value: SqlValue) -> Result<DomainValue, CodecError> {
        if value.is_null() {
            return Ok(DomainValue::Null);
        }
        match (self, value) {
            (Self::Bool, SqlValue::Bool(b)) => Ok(DomainValue::Bool(b)),
            (Self::TinyInt, SqlValue::TinyInt(n)) => Ok(DomainValue::TinyInt(n)),
            (Self::SmallInt, SqlValue::SmallInt(n)) => Ok(DomainValue::SmallInt(n)),
            (Self::Int, SqlValue::Int(n)) => Ok(DomainValue::Int(n)),
            (Self::BigInt, SqlValue::BigInt(n)) => Ok(DomainValue::BigInt(n)),
            (Self::Float, SqlValue::Float(n)) => Ok(DomainValue::Float(n)),
            (Self::Double, SqlValue::Double(n)) => Ok(DomainValue::Double(n)),
            (Self::Varchar { .. }, SqlValue::Text(s)) => Ok(DomainValue::String(s)),
            (Self::Bytes, SqlValue::Bytes(b)) => Ok(DomainValue::Bytes(b)),
            (Self::Date, SqlValue::Date(d)) => Ok(DomainValue::Date(d)),
            (Self::Time, SqlValue::Time(t)) => Ok(DomainValue::Time(t)),
            (Self::DateTime, SqlValue::Timestamp(ts)) => Ok(DomainValue::DateTime(ts)),
            (Self::Instant, SqlValue::TimestampTz(ts)) => Ok(DomainValue::Instant(ts)),
            (Self::Uuid, SqlValue::Uuid(u)) => Ok(DomainValue::Uuid(u)),
            (Self::Duration, SqlValue::BigInt(ms)) => {
                Ok(DomainValue::Duration(chrono::Duration::milliseconds(ms)))
            }
            (Self::Decimal { .. }, SqlValue::Decimal(d)) => Ok(DomainValue::Decimal(d)),
            (Self::Json, SqlValue::Text(s)) => serde_json::from_str(&s)
                .map(DomainValue::Json)
                .map_err(|e| CodecError(format!("invalid JSON text: {}", e))),
            (
                Self::Enum {
                    name,
                    constants,
                    case_insensitive,
                    ..
                },
                SqlValue::Text(s),
            ) => match find_constant(constants, &s, *case_insensitive) {
                Some(canonical) => Ok(DomainValue::Enum(canonical.clone())),
                None => Err(CodecError(format!(
                    "stored value '{}' matches no constant of enum {}",
                    s, name
                ))),
            },
            (codec, other) => Err(CodecError::mismatch(codec, &other)),
        }
    }
}

fn find_constant<'a>(
    constants: &'a [String],
    value: &str,
    case_insensitive: bool,
) -> Option<&'a String> {
    constants.iter().find(|c| {
        if case_insensitive {
            c.eq_ignore_ascii_case(value)
        } else {
            c.as_str() == value
        }
    })
}

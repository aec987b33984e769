use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decode::EntityRecord;

/// A driver-primitive value: the shapes a database driver binds and returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SqlValue {
    /// SQL NULL. Always takes precedence over any raw physical value.
    Null,
    Bool(bool),
    TinyInt(i8),
    SmallInt(i16),
    Int(i32),
    BigInt(i64),
    Float(f32),
    Double(f64),
    Text(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    TimestampTz(DateTime<Utc>),
    Uuid(Uuid),
    Decimal(Decimal),
}

impl SqlValue {
    /// True for SQL NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl std::fmt::Display for SqlValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::Bool(b) => write!(f, "{}", b),
            SqlValue::TinyInt(n) => write!(f, "{}", n),
            SqlValue::SmallInt(n) => write!(f, "{}", n),
            SqlValue::Int(n) => write!(f, "{}", n),
            SqlValue::BigInt(n) => write!(f, "{}", n),
            SqlValue::Float(n) => write!(f, "{}", n),
            SqlValue::Double(n) => write!(f, "{}", n),
            SqlValue::Text(s) => write!(f, "'{}'", s),
            SqlValue::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            SqlValue::Date(d) => write!(f, "'{}'", d),
            SqlValue::Time(t) => write!(f, "'{}'", t),
            SqlValue::Timestamp(ts) => write!(f, "'{}'", ts),
            SqlValue::TimestampTz(ts) => write!(f, "'{}'", ts),
            SqlValue::Uuid(u) => write!(f, "'{}'", u),
            SqlValue::Decimal(d) => write!(f, "{}", d),
        }
    }
}

/// An application-level value, before encoding / after decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainValue {
    Null,
    Bool(bool),
    TinyInt(i8),
    SmallInt(i16),
    Int(i32),
    BigInt(i64),
    Float(f32),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Instant(DateTime<Utc>),
    Uuid(Uuid),
    Decimal(Decimal),
    Duration(Duration),
    Json(serde_json::Value),
    /// An enum constant, by name.
    Enum(String),
    /// A nested entity produced by the decoder's foreign-reference rule.
    Record(Box<EntityRecord>),
}

impl DomainValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl std::fmt::Display for DomainValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainValue::Null => write!(f, "NULL"),
            DomainValue::Bool(b) => write!(f, "{}", b),
            DomainValue::TinyInt(n) => write!(f, "{}", n),
            DomainValue::SmallInt(n) => write!(f, "{}", n),
            DomainValue::Int(n) => write!(f, "{}", n),
            DomainValue::BigInt(n) => write!(f, "{}", n),
            DomainValue::Float(n) => write!(f, "{}", n),
            DomainValue::Double(n) => write!(f, "{}", n),
            DomainValue::String(s) => write!(f, "'{}'", s),
            DomainValue::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            DomainValue::Date(d) => write!(f, "'{}'", d),
            DomainValue::Time(t) => write!(f, "'{}'", t),
            DomainValue::DateTime(ts) => write!(f, "'{}'", ts),
            DomainValue::Instant(ts) => write!(f, "'{}'", ts),
            DomainValue::Uuid(u) => write!(f, "'{}'", u),
            DomainValue::Decimal(d) => write!(f, "{}", d),
            DomainValue::Duration(d) => write!(f, "{}ms", d.num_milliseconds()),
            DomainValue::Json(v) => write!(f, "{}", v),
            DomainValue::Enum(s) => write!(f, "{}", s),
            DomainValue::Record(r) => write!(f, "<{}>", r.entity),
        }
    }
}

impl From<bool> for DomainValue {
    fn from(b: bool) -> Self {
        DomainValue::Bool(b)
    }
}

impl From<i8> for DomainValue {
    fn from(n: i8) -> Self {
        DomainValue::TinyInt(n)
    }
}

impl From<i16> for DomainValue {
    fn from(n: i16) -> Self {
        DomainValue::SmallInt(n)
    }
}

impl From<i32> for DomainValue {
    fn from(n: i32) -> Self {
        DomainValue::Int(n)
    }
}

impl From<i64> for DomainValue {
    fn from(n: i64) -> Self {
        DomainValue::BigInt(n)
    }
}

impl From<f32> for DomainValue {
    fn from(n: f32) -> Self {
        DomainValue::Float(n)
    }
}

impl From<f64> for DomainValue {
    fn from(n: f64) -> Self {
        DomainValue::Double(n)
    }
}

impl From<&str> for DomainValue {
    fn from(s: &str) -> Self {
        DomainValue::String(s.to_string())
    }
}

impl From<String> for DomainValue {
    fn from(s: String) -> Self {
        DomainValue::String(s)
    }
}

impl From<Uuid> for DomainValue {
    fn from(u: Uuid) -> Self {
        DomainValue::Uuid(u)
    }
}

impl From<Decimal> for DomainValue {
    fn from(d: Decimal) -> Self {
        DomainValue::Decimal(d)
    }
}

impl From<NaiveDate> for DomainValue {
    fn from(d: NaiveDate) -> Self {
        DomainValue::Date(d)
    }
}

impl From<NaiveTime> for DomainValue {
    fn from(t: NaiveTime) -> Self {
        DomainValue::Time(t)
    }
}

impl From<NaiveDateTime> for DomainValue {
    fn from(ts: NaiveDateTime) -> Self {
        DomainValue::DateTime(ts)
    }
}

impl From<DateTime<Utc>> for DomainValue {
    fn from(ts: DateTime<Utc>) -> Self {
        DomainValue::Instant(ts)
    }
}

impl From<Duration> for DomainValue {
    fn from(d: Duration) -> Self {
        DomainValue::Duration(d)
    }
}

impl From<serde_json::Value> for DomainValue {
    fn from(v: serde_json::Value) -> Self {
        DomainValue::Json(v)
    }
}

impl<T> From<Option<T>> for DomainValue
where
    T: Into<DomainValue>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => DomainValue::Null,
        }
    }
}

/// Type tag used for codec-registry lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainType {
    Bool,
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Float,
    Double,
    String,
    Bytes,
    Date,
    Time,
    DateTime,
    Instant,
    Uuid,
    Duration,
    Decimal,
    Json,
    /// An enum type with its constant names in declaration order.
    Enum {
        name: String,
        constants: Vec<String>,
    },
    /// An application type with no registered codec. Resolution of such a
    /// field is a fatal descriptor-build error.
    Other(String),
}

impl std::fmt::Display for DomainType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainType::Enum { name, .. } => write!(f, "enum {}", name),
            DomainType::Other(name) => write!(f, "{}", name),
            other => write!(f, "{:?}", other),
        }
    }
}

//! Error types for keelsql.

use thiserror::Error;

/// The main error type for SQL generation and row decoding.
#[derive(Debug, Error)]
pub enum SqlGenError {
    /// The codec registry found no mapping for a domain type.
    /// Fatal at descriptor-build time, never retried.
    #[error("Unresolvable type for field '{field}': {detail}")]
    UnresolvableType { field: String, detail: String },

    /// The dialect has no implementation for the requested operation
    /// (e.g. `save` on the base dialect).
    #[error("Operation '{operation}' is not implemented for dialect '{dialect}'")]
    UnsupportedOperation {
        dialect: &'static str,
        operation: &'static str,
    },

    /// A stored value does not match the expected shape.
    #[error("Decode error for '{entity}.{column}': {detail}")]
    Decode {
        entity: String,
        column: String,
        detail: String,
    },

    /// The single-key foreign-reference shortcut was attempted on an
    /// entity with zero or more than one key field.
    #[error("Entity '{entity}' has {count} key fields; a referenced entity must have exactly one")]
    KeyCardinality { entity: String, count: usize },

    /// A filter could not be built (empty combinator, empty IN list,
    /// empty key-field set, value incompatible with the field codec).
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
}

impl SqlGenError {
    /// Create an unresolvable-type error for the given field.
    pub fn unresolvable(field: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::UnresolvableType {
            field: field.into(),
            detail: detail.into(),
        }
    }

    /// Create an unsupported-operation error.
    pub fn unsupported(dialect: &'static str, operation: &'static str) -> Self {
        Self::UnsupportedOperation { dialect, operation }
    }

    /// Create a decode error with entity and column context.
    pub fn decode(
        entity: impl Into<String>,
        column: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::Decode {
            entity: entity.into(),
            column: column.into(),
            detail: detail.into(),
        }
    }

    /// Create an invalid-filter error.
    pub fn filter(detail: impl Into<String>) -> Self {
        Self::InvalidFilter(detail.into())
    }
}

/// Result type alias for keelsql operations.
pub type SqlGenResult<T> = Result<T, SqlGenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SqlGenError::unsupported("ansi", "save");
        assert_eq!(
            err.to_string(),
            "Operation 'save' is not implemented for dialect 'ansi'"
        );
    }

    #[test]
    fn test_decode_error_carries_context() {
        let err = SqlGenError::decode("person", "status", "no enum constant matches 'gone'");
        assert_eq!(
            err.to_string(),
            "Decode error for 'person.status': no enum constant matches 'gone'"
        );
    }
}

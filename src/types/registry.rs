use serde::{Deserialize, Serialize};
use tracing::debug;

use super::codec::ValueType;
use super::value::DomainType;
use crate::error::{SqlGenError, SqlGenResult};

/// Default VARCHAR width when no size hint is given.
pub const DEFAULT_STRING_LENGTH: u32 = 1024;
/// Default DECIMAL precision/scale when no size hint is given.
pub const DEFAULT_DECIMAL_PRECISION: u32 = 28;
pub const DEFAULT_DECIMAL_SCALE: u32 = 10;

/// Optional column-size hints supplied alongside a domain type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SizeHint {
    pub length: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
}

impl SizeHint {
    pub fn length(length: u32) -> Self {
        Self {
            length: Some(length),
            ..Self::default()
        }
    }

    pub fn decimal(precision: u32, scale: u32) -> Self {
        Self {
            precision: Some(precision),
            scale: Some(scale),
            ..Self::default()
        }
    }

    pub fn scale(scale: u32) -> Self {
        Self {
            scale: Some(scale),
            ..Self::default()
        }
    }
}

/// Resolves the codec to use for a domain type.
///
/// The built-in catalog is consulted in declaration order; the first entry
/// matching the queried type wins. Enum, decimal and string types fall back
/// to parameterized codecs; anything else is an unmappable field.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    enum_case_insensitive: bool,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self {
            enum_case_insensitive: true,
        }
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store and compare enum constants exactly instead of case-folded.
    pub fn with_case_sensitive_enums(mut self) -> Self {
        self.enum_case_insensitive = false;
        self
    }

    /// Resolve the codec for `field`'s domain type.
    ///
    /// Fails with [`SqlGenError::UnresolvableType`] when no catalog entry
    /// matches and none of the enum/decimal/string fallbacks apply. The
    /// caller must treat that as a fatal descriptor-build error.
    pub fn resolve(
        &self,
        field: &str,
        domain: &DomainType,
        hint: Option<&SizeHint>,
    ) -> SqlGenResult<ValueType> {
        let codec = match domain {
            DomainType::Bool => ValueType::Bool,
            DomainType::TinyInt => ValueType::TinyInt,
            DomainType::SmallInt => ValueType::SmallInt,
            DomainType::Int => ValueType::Int,
            DomainType::BigInt => ValueType::BigInt,
            DomainType::Float => ValueType::Float,
            DomainType::Double => ValueType::Double,
            DomainType::Bytes => ValueType::Bytes,
            DomainType::Date => ValueType::Date,
            DomainType::Time => ValueType::Time,
            DomainType::DateTime => ValueType::DateTime,
            DomainType::Instant => ValueType::Instant,
            DomainType::Uuid => ValueType::Uuid,
            DomainType::Duration => ValueType::Duration,
            DomainType::Json => ValueType::Json,
            DomainType::Enum { name, constants } => {
                if constants.is_empty() {
                    return Err(SqlGenError::unresolvable(
                        field,
                        format!("enum {} declares no constants", name),
                    ));
                }
                let length = match hint.and_then(|h| h.length) {
                    Some(len) => len,
                    None => constants.iter().map(|c| c.len() as u32).max().unwrap_or(1),
                };
                ValueType::Enum {
                    name: name.clone(),
                    constants: constants.clone(),
                    case_insensitive: self.enum_case_insensitive,
                    length,
                }
            }
            DomainType::Decimal => match hint {
                Some(h) => ValueType::Decimal {
                    // Scale without precision means unconstrained precision.
                    precision: h.precision,
                    scale: h.scale.unwrap_or(DEFAULT_DECIMAL_SCALE),
                },
                None => ValueType::Decimal {
                    precision: Some(DEFAULT_DECIMAL_PRECISION),
                    scale: DEFAULT_DECIMAL_SCALE,
                },
            },
            DomainType::String => ValueType::Varchar {
                length: hint
                    .and_then(|h| h.length)
                    .unwrap_or(DEFAULT_STRING_LENGTH),
            },
            DomainType::Other(name) => {
                return Err(SqlGenError::unresolvable(
                    field,
                    format!("no codec registered for type {}", name),
                ));
            }
        };
        debug!(field, domain = %domain, codec = %codec.sql_data_type(), "resolved codec");
        Ok(codec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_resolution() {
        let registry = TypeRegistry::new();
        assert_eq!(
            registry.resolve("id", &DomainType::Uuid, None).unwrap(),
            ValueType::Uuid
        );
        assert_eq!(
            registry.resolve("age", &DomainType::Int, None).unwrap(),
            ValueType::Int
        );
    }

    #[test]
    fn test_string_defaults_to_wide_varchar() {
        let registry = TypeRegistry::new();
        assert_eq!(
            registry.resolve("name", &DomainType::String, None).unwrap(),
            ValueType::Varchar { length: 1024 }
        );
        assert_eq!(
            registry
                .resolve("name", &DomainType::String, Some(&SizeHint::length(64)))
                .unwrap(),
            ValueType::Varchar { length: 64 }
        );
    }

    #[test]
    fn test_decimal_hints() {
        let registry = TypeRegistry::new();
        assert_eq!(
            registry.resolve("price", &DomainType::Decimal, None).unwrap(),
            ValueType::Decimal {
                precision: Some(DEFAULT_DECIMAL_PRECISION),
                scale: DEFAULT_DECIMAL_SCALE
            }
        );
        // Scale-only hint leaves precision unconstrained.
        assert_eq!(
            registry
                .resolve("price", &DomainType::Decimal, Some(&SizeHint::scale(2)))
                .unwrap(),
            ValueType::Decimal {
                precision: None,
                scale: 2
            }
        );
    }

    #[test]
    fn test_enum_length_is_longest_constant() {
        let registry = TypeRegistry::new();
        let domain = DomainType::Enum {
            name: "Status".into(),
            constants: vec!["Active".into(), "Suspended".into()],
        };
        let codec = registry.resolve("status", &domain, None).unwrap();
        match codec {
            ValueType::Enum {
                length,
                case_insensitive,
                ..
            } => {
                assert_eq!(length, 9);
                assert!(case_insensitive);
            }
            other => panic!("expected enum codec, got {:?}", other),
        }
    }

    #[test]
    fn test_case_sensitive_registry() {
        let registry = TypeRegistry::new().with_case_sensitive_enums();
        let domain = DomainType::Enum {
            name: "Status".into(),
            constants: vec!["Active".into()],
        };
        match registry.resolve("status", &domain, None).unwrap() {
            ValueType::Enum {
                case_insensitive, ..
            } => assert!(!case_insensitive),
            other => panic!("expected enum codec, got {:?}", other),
        }
    }

    #[test]
    fn test_unregistered_type_is_unresolvable() {
        let registry = TypeRegistry::new();
        let err = registry
            .resolve("blob", &DomainType::Other("MyStruct".into()), None)
            .unwrap_err();
        assert!(matches!(err, SqlGenError::UnresolvableType { .. }));
    }

    #[test]
    fn test_empty_enum_is_unresolvable() {
        let registry = TypeRegistry::new();
        let domain = DomainType::Enum {
            name: "Empty".into(),
            constants: vec![],
        };
        let err = registry.resolve("status", &domain, None).unwrap_err();
        assert!(matches!(err, SqlGenError::UnresolvableType { .. }));
    }
}

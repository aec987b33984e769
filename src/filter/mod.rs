//! Filter algebra: a predicate tree describing a WHERE condition,
//! independent of rendering.
//!
//! Operand order is preserved everywhere; it determines both emitted SQL
//! order and parameter order. A combinator with a single operand behaves
//! identically to that operand (flattening rule).

pub mod builder;

pub use builder::FilterBuilder;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{SqlGenError, SqlGenResult};
use crate::schema::FieldDescriptor;
use crate::types::DomainValue;

/// Comparison operator for leaf predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CmpOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CmpOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
        }
    }
}

/// Right-hand side of a comparison leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A yet-unbound positional parameter, bound by the executor.
    Param,
    /// An immediate value, still passed as a parameter at render time,
    /// never string-interpolated.
    Value(DomainValue),
}

/// A predicate tree. Leaves carry the field they test and an optional
/// table alias; combinators hold their operands in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    IsNull {
        field: Arc<FieldDescriptor>,
        alias: Option<String>,
    },
    IsNotNull {
        field: Arc<FieldDescriptor>,
        alias: Option<String>,
    },
    Cmp {
        field: Arc<FieldDescriptor>,
        alias: Option<String>,
        op: CmpOp,
        operand: Operand,
    },
    Like {
        field: Arc<FieldDescriptor>,
        alias: Option<String>,
        pattern: String,
    },
    Between {
        field: Arc<FieldDescriptor>,
        alias: Option<String>,
        lo: DomainValue,
        hi: DomainValue,
    },
    In {
        field: Arc<FieldDescriptor>,
        alias: Option<String>,
        values: Vec<DomainValue>,
    },
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

impl Filter {
    fn cmp(field: &Arc<FieldDescriptor>, op: CmpOp, operand: Operand) -> Self {
        Self::Cmp {
            field: Arc::clone(field),
            alias: None,
            op,
            operand,
        }
    }

    pub fn eq(field: &Arc<FieldDescriptor>, value: impl Into<DomainValue>) -> Self {
        Self::cmp(field, CmpOp::Eq, Operand::Value(value.into()))
    }

    pub fn ne(field: &Arc<FieldDescriptor>, value: impl Into<DomainValue>) -> Self {
        Self::cmp(field, CmpOp::Ne, Operand::Value(value.into()))
    }

    pub fn gt(field: &Arc<FieldDescriptor>, value: impl Into<DomainValue>) -> Self {
        Self::cmp(field, CmpOp::Gt, Operand::Value(value.into()))
    }

    pub fn ge(field: &Arc<FieldDescriptor>, value: impl Into<DomainValue>) -> Self {
        Self::cmp(field, CmpOp::Ge, Operand::Value(value.into()))
    }

    pub fn lt(field: &Arc<FieldDescriptor>, value: impl Into<DomainValue>) -> Self {
        Self::cmp(field, CmpOp::Lt, Operand::Value(value.into()))
    }

    pub fn le(field: &Arc<FieldDescriptor>, value: impl Into<DomainValue>) -> Self {
        Self::cmp(field, CmpOp::Le, Operand::Value(value.into()))
    }

    /// Comparison against a late-bound positional parameter.
    pub fn cmp_param(field: &Arc<FieldDescriptor>, op: CmpOp) -> Self {
        Self::cmp(field, op, Operand::Param)
    }

    /// Equality against a late-bound positional parameter.
    pub fn eq_param(field: &Arc<FieldDescriptor>) -> Self {
        Self::cmp_param(field, CmpOp::Eq)
    }

    pub fn is_null(field: &Arc<FieldDescriptor>) -> Self {
        Self::IsNull {
            field: Arc::clone(field),
            alias: None,
        }
    }

    pub fn is_not_null(field: &Arc<FieldDescriptor>) -> Self {
        Self::IsNotNull {
            field: Arc::clone(field),
            alias: None,
        }
    }

    pub fn like(field: &Arc<FieldDescriptor>, pattern: impl Into<String>) -> Self {
        Self::Like {
            field: Arc::clone(field),
            alias: None,
            pattern: pattern.into(),
        }
    }

    pub fn between(
        field: &Arc<FieldDescriptor>,
        lo: impl Into<DomainValue>,
        hi: impl Into<DomainValue>,
    ) -> Self {
        Self::Between {
            field: Arc::clone(field),
            alias: None,
            lo: lo.into(),
            hi: hi.into(),
        }
    }

    /// Build an IN predicate. Empty value lists are rejected here, not at
    /// render time.
    pub fn in_values<V: Into<DomainValue>>(
        field: &Arc<FieldDescriptor>,
        values: impl IntoIterator<Item = V>,
    ) -> SqlGenResult<Self> {
        let values: Vec<DomainValue> = values.into_iter().map(|v| v.into()).collect();
        if values.is_empty() {
            return Err(SqlGenError::filter(format!(
                "IN over '{}' requires at least one value",
                field.name
            )));
        }
        Ok(Self::In {
            field: Arc::clone(field),
            alias: None,
            values,
        })
    }

    /// AND of the given operands. A single operand is returned unwrapped;
    /// an empty list is an invalid filter.
    pub fn and(operands: Vec<Filter>) -> SqlGenResult<Self> {
        Self::combine(operands, Filter::And)
    }

    /// OR of the given operands, with the same flattening rule as `and`.
    pub fn or(operands: Vec<Filter>) -> SqlGenResult<Self> {
        Self::combine(operands, Filter::Or)
    }

    fn combine(
        mut operands: Vec<Filter>,
        wrap: impl FnOnce(Vec<Filter>) -> Filter,
    ) -> SqlGenResult<Self> {
        match operands.len() {
            0 => Err(SqlGenError::filter(
                "a combinator requires at least one operand",
            )),
            1 => Ok(operands.remove(0)),
            _ => Ok(wrap(operands)),
        }
    }

    /// Attach a table alias to a leaf. No effect on combinators.
    pub fn aliased(mut self, table_alias: impl Into<String>) -> Self {
        let table_alias = table_alias.into();
        match &mut self {
            Self::IsNull { alias, .. }
            | Self::IsNotNull { alias, .. }
            | Self::Cmp { alias, .. }
            | Self::Like { alias, .. }
            | Self::Between { alias, .. }
            | Self::In { alias, .. } => *alias = Some(table_alias),
            Self::And(_) | Self::Or(_) => {}
        }
        self
    }

    /// Every literal value held by value-bound leaves, in tree
    /// left-to-right order. Late-bound parameters contribute nothing.
    /// `Like` patterns are plain match strings, not domain values, and
    /// are likewise excluded; they only surface as bound text at render
    /// time.
    pub fn values(&self) -> Vec<&DomainValue> {
        let mut out = Vec::new();
        self.collect_values(&mut out);
        out
    }

    fn collect_values<'a>(&'a self, out: &mut Vec<&'a DomainValue>) {
        match self {
            Self::Cmp {
                operand: Operand::Value(v),
                ..
            } => out.push(v),
            Self::Between { lo, hi, .. } => {
                out.push(lo);
                out.push(hi);
            }
            Self::In { values, .. } => out.extend(values.iter()),
            Self::And(ops) | Self::Or(ops) => {
                for op in ops {
                    op.collect_values(out);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::EntityDescriptor;
    use crate::types::DomainType;
    use pretty_assertions::assert_eq;

    fn person() -> std::sync::Arc<EntityDescriptor> {
        EntityDescriptor::builder("Person")
            .key("id", DomainType::Uuid)
            .column("age", DomainType::Int)
            .column("name", DomainType::String)
            .build()
            .unwrap()
    }

    #[test]
    fn test_single_operand_flattens() {
        let person = person();
        let leaf = Filter::eq(person.field("age").unwrap(), 42);
        assert_eq!(Filter::and(vec![leaf.clone()]).unwrap(), leaf);
        assert_eq!(Filter::or(vec![leaf.clone()]).unwrap(), leaf);
    }

    #[test]
    fn test_empty_combinator_is_invalid() {
        assert!(matches!(
            Filter::and(vec![]),
            Err(SqlGenError::InvalidFilter(_))
        ));
        assert!(matches!(
            Filter::or(vec![]),
            Err(SqlGenError::InvalidFilter(_))
        ));
    }

    #[test]
    fn test_empty_in_is_invalid() {
        let person = person();
        let empty: Vec<i32> = Vec::new();
        let result = Filter::in_values(person.field("age").unwrap(), empty);
        assert!(matches!(result, Err(SqlGenError::InvalidFilter(_))));
    }

    #[test]
    fn test_values_flatten_left_to_right() {
        let person = person();
        let age = person.field("age").unwrap();
        let name = person.field("name").unwrap();
        let tree = Filter::and(vec![
            Filter::between(age, 10, 20),
            Filter::or(vec![
                Filter::eq(name, "ada"),
                Filter::in_values(age, vec![1, 2]).unwrap(),
            ])
            .unwrap(),
            Filter::eq_param(age),
        ])
        .unwrap();
        let values = tree.values();
        let rendered: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        assert_eq!(rendered, vec!["10", "20", "'ada'", "1", "2"]);
    }

    #[test]
    fn test_like_patterns_are_not_values() {
        let person = person();
        let age = person.field("age").unwrap();
        let name = person.field("name").unwrap();
        let tree = Filter::and(vec![Filter::like(name, "A%"), Filter::eq(age, 1)]).unwrap();
        let rendered: Vec<String> = tree.values().iter().map(|v| v.to_string()).collect();
        assert_eq!(rendered, vec!["1"]);
    }
}

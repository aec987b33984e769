//! Fluent builder over a flat AND scope.

use std::sync::Arc;

use super::{CmpOp, Filter};
use crate::error::{SqlGenError, SqlGenResult};
use crate::schema::FieldDescriptor;
use crate::types::DomainValue;

/// Collects conditions into a flat top-level AND scope, in declaration
/// order. `or` nests previously added conditions without double-counting
/// them: its operands are removed from the flat list before the `Or` node
/// is pushed.
#[derive(Debug, Default)]
pub struct FilterBuilder {
    scope: Vec<Filter>,
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, filter: Filter) -> Filter {
        self.scope.push(filter.clone());
        filter
    }

    pub fn eq(&mut self, field: &Arc<FieldDescriptor>, value: impl Into<DomainValue>) -> Filter {
        self.push(Filter::eq(field, value))
    }

    pub fn ne(&mut self, field: &Arc<FieldDescriptor>, value: impl Into<DomainValue>) -> Filter {
        self.push(Filter::ne(field, value))
    }

    pub fn gt(&mut self, field: &Arc<FieldDescriptor>, value: impl Into<DomainValue>) -> Filter {
        self.push(Filter::gt(field, value))
    }

    pub fn ge(&mut self, field: &Arc<FieldDescriptor>, value: impl Into<DomainValue>) -> Filter {
        self.push(Filter::ge(field, value))
    }

    pub fn lt(&mut self, field: &Arc<FieldDescriptor>, value: impl Into<DomainValue>) -> Filter {
        self.push(Filter::lt(field, value))
    }

    pub fn le(&mut self, field: &Arc<FieldDescriptor>, value: impl Into<DomainValue>) -> Filter {
        self.push(Filter::le(field, value))
    }

    pub fn eq_param(&mut self, field: &Arc<FieldDescriptor>) -> Filter {
        self.push(Filter::eq_param(field))
    }

    pub fn cmp_param(&mut self, field: &Arc<FieldDescriptor>, op: CmpOp) -> Filter {
        self.push(Filter::cmp_param(field, op))
    }

    pub fn is_null(&mut self, field: &Arc<FieldDescriptor>) -> Filter {
        self.push(Filter::is_null(field))
    }

    pub fn is_not_null(&mut self, field: &Arc<FieldDescriptor>) -> Filter {
        self.push(Filter::is_not_null(field))
    }

    pub fn like(&mut self, field: &Arc<FieldDescriptor>, pattern: impl Into<String>) -> Filter {
        self.push(Filter::like(field, pattern))
    }

    pub fn between(
        &mut self,
        field: &Arc<FieldDescriptor>,
        lo: impl Into<DomainValue>,
        hi: impl Into<DomainValue>,
    ) -> Filter {
        self.push(Filter::between(field, lo, hi))
    }

    pub fn in_values<V: Into<DomainValue>>(
        &mut self,
        field: &Arc<FieldDescriptor>,
        values: impl IntoIterator<Item = V>,
    ) -> SqlGenResult<Filter> {
        Ok(self.push(Filter::in_values(field, values)?))
    }

    /// OR the given operands. Each operand already present in the scope is
    /// removed (first structural match) so it is not counted twice at the
    /// top level.
    pub fn or(&mut self, operands: Vec<Filter>) -> SqlGenResult<Filter> {
        for operand in &operands {
            if let Some(pos) = self.scope.iter().position(|f| f == operand) {
                self.scope.remove(pos);
            }
        }
        let filter = Filter::or(operands)?;
        Ok(self.push(filter))
    }

    /// Nested AND with the same scope-extraction rule as [`Self::or`].
    pub fn and(&mut self, operands: Vec<Filter>) -> SqlGenResult<Filter> {
        for operand in &operands {
            if let Some(pos) = self.scope.iter().position(|f| f == operand) {
                self.scope.remove(pos);
            }
        }
        let filter = Filter::and(operands)?;
        Ok(self.push(filter))
    }

    /// Finish the scope: `None` when empty, the sole condition when one,
    /// an AND over all of them otherwise (declaration order preserved).
    pub fn build(mut self) -> Option<Filter> {
        match self.scope.len() {
            0 => None,
            1 => Some(self.scope.remove(0)),
            _ => Some(Filter::And(self.scope)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::EntityDescriptor;
    use crate::types::DomainType;
    use pretty_assertions::assert_eq;

    fn person() -> Arc<EntityDescriptor> {
        EntityDescriptor::builder("Person")
            .key("id", DomainType::Uuid)
            .column("age", DomainType::Int)
            .column("name", DomainType::String)
            .build()
            .unwrap()
    }

    #[test]
    fn test_empty_scope_builds_none() {
        assert_eq!(FilterBuilder::new().build(), None);
    }

    #[test]
    fn test_single_condition_is_unwrapped() {
        let person = person();
        let mut builder = FilterBuilder::new();
        let leaf = builder.eq(person.field("age").unwrap(), 1);
        assert_eq!(builder.build(), Some(leaf));
    }

    #[test]
    fn test_multiple_conditions_and_in_order() {
        let person = person();
        let age = person.field("age").unwrap().clone();
        let name = person.field("name").unwrap().clone();
        let mut builder = FilterBuilder::new();
        let a = builder.gt(&age, 18);
        let b = builder.like(&name, "A%");
        assert_eq!(builder.build(), Some(Filter::And(vec![a, b])));
    }

    #[test]
    fn test_or_removes_operands_from_scope() {
        let person = person();
        let age = person.field("age").unwrap().clone();
        let name = person.field("name").unwrap().clone();
        let mut builder = FilterBuilder::new();
        let keep = builder.is_not_null(&name);
        let a = builder.eq(&age, 1);
        let b = builder.eq(&age, 2);
        let ored = builder.or(vec![a, b]).unwrap();
        // `a` and `b` must not be double-counted at the top level.
        assert_eq!(builder.build(), Some(Filter::And(vec![keep, ored])));
    }

    #[test]
    fn test_or_of_everything_leaves_single_node() {
        let person = person();
        let age = person.field("age").unwrap().clone();
        let mut builder = FilterBuilder::new();
        let a = builder.eq(&age, 1);
        let b = builder.eq(&age, 2);
        let ored = builder.or(vec![a, b]).unwrap();
        assert_eq!(builder.build(), Some(ored));
    }
}

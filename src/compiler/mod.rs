//! Dialect query compiler.
//!
//! Pure functions over immutable descriptors and filter trees; the only
//! state is the per-call [`ParamContext`]. The emitted SQL and the
//! returned parameter list always agree positionally.

pub mod ddl;
pub mod dml;
pub mod query;
pub mod render;

#[cfg(test)]
mod tests;

pub use query::{ParamContext, Parameter, Query};
pub use render::render_filter;

use std::sync::Arc;

use crate::dialect::Dialect;
use crate::error::{SqlGenError, SqlGenResult};
use crate::filter::Filter;
use crate::schema::{EntityDescriptor, FieldDescriptor};

/// Compiles descriptor + filter inputs into [`Query`] values for one
/// dialect. Holds no mutable state; cheap to construct per call site.
pub struct QueryBuilder<'d> {
    dialect: &'d dyn Dialect,
}

impl<'d> QueryBuilder<'d> {
    pub fn new(dialect: &'d dyn Dialect) -> Self {
        Self { dialect }
    }

    pub fn select(
        &self,
        entity: &EntityDescriptor,
        filter: Option<&Filter>,
    ) -> SqlGenResult<Query> {
        dml::build_select(entity, filter, self.dialect)
    }

    /// INSERT over the named fields, in the given order.
    pub fn insert(&self, entity: &EntityDescriptor, fields: &[&str]) -> SqlGenResult<Query> {
        dml::build_insert(entity, &resolve_fields(entity, fields)?, self.dialect)
    }

    /// INSERT over every descriptor field.
    pub fn insert_all(&self, entity: &EntityDescriptor) -> SqlGenResult<Query> {
        dml::build_insert(entity, &entity.fields, self.dialect)
    }

    pub fn update(
        &self,
        entity: &EntityDescriptor,
        update_fields: &[&str],
        key_fields: &[&str],
    ) -> SqlGenResult<Query> {
        dml::build_update(
            entity,
            &resolve_fields(entity, update_fields)?,
            &resolve_fields(entity, key_fields)?,
            self.dialect,
        )
    }

    pub fn delete(&self, entity: &EntityDescriptor, filter: &Filter) -> SqlGenResult<Query> {
        dml::build_delete(entity, filter, self.dialect)
    }

    /// DELETE keyed on the entity's designated key fields.
    pub fn delete_by_key(&self, entity: &EntityDescriptor) -> SqlGenResult<Query> {
        dml::build_delete_by_key(entity, &entity.key_fields(), self.dialect)
    }

    /// Upsert. Delegates to the dialect hook; the base dialect reports
    /// the operation as unsupported.
    pub fn save(
        &self,
        entity: &EntityDescriptor,
        update_fields: &[&str],
        key_fields: &[&str],
    ) -> SqlGenResult<Query> {
        self.dialect.save(
            entity,
            &resolve_fields(entity, update_fields)?,
            &resolve_fields(entity, key_fields)?,
        )
    }

    /// CREATE TABLE plus trailing CREATE INDEX statements.
    pub fn create_table(
        &self,
        entity: &EntityDescriptor,
        if_not_exists: bool,
    ) -> SqlGenResult<Vec<Query>> {
        ddl::build_create_table(entity, if_not_exists, self.dialect)
    }

    pub fn drop_table(&self, entity: &EntityDescriptor, if_exists: bool) -> Query {
        ddl::build_drop_table(entity, if_exists, self.dialect)
    }
}

fn resolve_fields(
    entity: &EntityDescriptor,
    names: &[&str],
) -> SqlGenResult<Vec<Arc<FieldDescriptor>>> {
    names
        .iter()
        .map(|name| {
            entity.field(name).cloned().ok_or_else(|| {
                SqlGenError::filter(format!(
                    "'{}' has no field named '{}'",
                    entity.table.name, name
                ))
            })
        })
        .collect()
}

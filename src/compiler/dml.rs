//! DML statement builders (SELECT, INSERT, UPDATE, DELETE).

use std::sync::Arc;

use super::query::{ParamContext, Query};
use super::render::render_filter;
use crate::dialect::Dialect;
use crate::error::{SqlGenError, SqlGenResult};
use crate::filter::Filter;
use crate::schema::{EntityDescriptor, FieldDescriptor};

/// Generate `SELECT <columns> FROM <table> [WHERE <filter>]`.
/// Column order is the descriptor's field order, never re-sorted.
pub fn build_select(
    entity: &EntityDescriptor,
    filter: Option<&Filter>,
    dialect: &dyn Dialect,
) -> SqlGenResult<Query> {
    let columns = entity
        .fields
        .iter()
        .map(|f| dialect.quote(&f.column_name))
        .collect::<Vec<_>>()
        .join(",");
    let mut sql = format!(
        "SELECT {} FROM {}",
        columns,
        dialect.quote_table(&entity.table)
    );
    let mut ctx = ParamContext::new();
    if let Some(filter) = filter {
        sql.push_str(" WHERE ");
        sql.push_str(&render_filter(filter, dialect, &mut ctx)?);
    }
    Ok(Query {
        sql,
        params: ctx.into_params(),
    })
}

/// Generate `INSERT INTO <table> (<fields>) VALUES (?, ...)`, one
/// late-bound parameter per field, in the given order.
pub fn build_insert(
    entity: &EntityDescriptor,
    fields: &[Arc<FieldDescriptor>],
    dialect: &dyn Dialect,
) -> SqlGenResult<Query> {
    if fields.is_empty() {
        return Err(SqlGenError::filter(format!(
            "insert into '{}' requires at least one field",
            entity.table.name
        )));
    }
    let mut ctx = ParamContext::new();
    let columns = fields
        .iter()
        .map(|f| dialect.quote(&f.column_name))
        .collect::<Vec<_>>()
        .join(",");
    let placeholders = fields
        .iter()
        .map(|f| ctx.bind(dialect, f.column_name.clone(), None))
        .collect::<Vec<_>>()
        .join(",");
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        dialect.quote_table(&entity.table),
        columns,
        placeholders
    );
    Ok(Query {
        sql,
        params: ctx.into_params(),
    })
}

/// Generate `UPDATE <table> SET <field = ?,...> WHERE <key equality>`.
/// SET parameters come first, then the key parameters, matching
/// placeholder order.
pub fn build_update(
    entity: &EntityDescriptor,
    update_fields: &[Arc<FieldDescriptor>],
    key_fields: &[Arc<FieldDescriptor>],
    dialect: &dyn Dialect,
) -> SqlGenResult<Query> {
    if update_fields.is_empty() {
        return Err(SqlGenError::filter(format!(
            "update of '{}' requires at least one field to set",
            entity.table.name
        )));
    }
    let mut ctx = ParamContext::new();
    let assignments = update_fields
        .iter()
        .map(|f| {
            let placeholder = ctx.bind(dialect, f.column_name.clone(), None);
            format!("{} = {}", dialect.quote(&f.column_name), placeholder)
        })
        .collect::<Vec<_>>()
        .join(",");
    let where_clause = render_filter(&key_equality(entity, key_fields)?, dialect, &mut ctx)?;
    let sql = format!(
        "UPDATE {} SET {} WHERE {}",
        dialect.quote_table(&entity.table),
        assignments,
        where_clause
    );
    Ok(Query {
        sql,
        params: ctx.into_params(),
    })
}

/// Generate `DELETE FROM <table> WHERE <filter>`.
pub fn build_delete(
    entity: &EntityDescriptor,
    filter: &Filter,
    dialect: &dyn Dialect,
) -> SqlGenResult<Query> {
    let mut ctx = ParamContext::new();
    let where_clause = render_filter(filter, dialect, &mut ctx)?;
    let sql = format!(
        "DELETE FROM {} WHERE {}",
        dialect.quote_table(&entity.table),
        where_clause
    );
    Ok(Query {
        sql,
        params: ctx.into_params(),
    })
}

/// Generate `DELETE FROM <table> WHERE <key equality>`.
pub fn build_delete_by_key(
    entity: &EntityDescriptor,
    key_fields: &[Arc<FieldDescriptor>],
    dialect: &dyn Dialect,
) -> SqlGenResult<Query> {
    build_delete(entity, &key_equality(entity, key_fields)?, dialect)
}

/// The default key filter: each key field paired with a late-bound
/// parameter, AND-combined. Empty key sets fail here, not at render time.
pub fn key_equality(
    entity: &EntityDescriptor,
    key_fields: &[Arc<FieldDescriptor>],
) -> SqlGenResult<Filter> {
    if key_fields.is_empty() {
        return Err(SqlGenError::filter(format!(
            "'{}' has no key fields to filter on",
            entity.table.name
        )));
    }
    Filter::and(key_fields.iter().map(Filter::eq_param).collect())
}

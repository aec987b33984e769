//! Shared filter-to-SQL rendering.
//!
//! Depth-first traversal of the filter tree. This function is the single
//! source of truth for parameter ordering: the SQL text and the parameter
//! list must always agree positionally, so dialects do not override it.

use std::sync::Arc;

use super::query::ParamContext;
use crate::dialect::Dialect;
use crate::error::{SqlGenError, SqlGenResult};
use crate::filter::{Filter, Operand};
use crate::schema::FieldDescriptor;
use crate::types::{DomainValue, SqlValue};

pub fn render_filter(
    filter: &Filter,
    dialect: &dyn Dialect,
    ctx: &mut ParamContext,
) -> SqlGenResult<String> {
    match filter {
        Filter::And(ops) => render_combinator(ops, " AND ", dialect, ctx),
        Filter::Or(ops) => render_combinator(ops, " OR ", dialect, ctx),
        Filter::IsNull { field, alias } => {
            Ok(format!("{} IS NULL", column(field, alias, dialect)))
        }
        Filter::IsNotNull { field, alias } => {
            Ok(format!("{} IS NOT NULL", column(field, alias, dialect)))
        }
        Filter::Cmp {
            field,
            alias,
            op,
            operand,
        } => {
            let col = column(field, alias, dialect);
            let placeholder = match operand {
                Operand::Param => ctx.bind(dialect, field.column_name.clone(), None),
                Operand::Value(value) => {
                    let encoded = encode(field, value)?;
                    ctx.bind(dialect, field.column_name.clone(), Some(encoded))
                }
            };
            Ok(format!("{} {} {}", col, op.as_sql(), placeholder))
        }
        Filter::Like {
            field,
            alias,
            pattern,
        } => {
            let col = column(field, alias, dialect);
            let placeholder = ctx.bind(
                dialect,
                field.column_name.clone(),
                Some(SqlValue::Text(pattern.clone())),
            );
            Ok(format!("{} LIKE {}", col, placeholder))
        }
        Filter::Between {
            field,
            alias,
            lo,
            hi,
        } => {
            let col = column(field, alias, dialect);
            let lo_ph = ctx.bind(
                dialect,
                format!("{}_0", field.column_name),
                Some(encode(field, lo)?),
            );
            let hi_ph = ctx.bind(
                dialect,
                format!("{}_1", field.column_name),
                Some(encode(field, hi)?),
            );
            Ok(format!("{} BETWEEN {} AND {}", col, lo_ph, hi_ph))
        }
        Filter::In {
            field,
            alias,
            values,
        } => {
            let col = column(field, alias, dialect);
            let mut placeholders = Vec::with_capacity(values.len());
            for (i, value) in values.iter().enumerate() {
                placeholders.push(ctx.bind(
                    dialect,
                    format!("{}_{}", field.column_name, i),
                    Some(encode(field, value)?),
                ));
            }
            Ok(format!("{} IN ({})", col, placeholders.join(",")))
        }
    }
}

fn render_combinator(
    operands: &[Filter],
    separator: &str,
    dialect: &dyn Dialect,
    ctx: &mut ParamContext,
) -> SqlGenResult<String> {
    match operands {
        [] => Err(SqlGenError::filter(
            "a combinator requires at least one operand",
        )),
        // Single operand renders without wrapping parentheses.
        [only] => render_filter(only, dialect, ctx),
        many => {
            let mut parts = Vec::with_capacity(many.len());
            for op in many {
                parts.push(render_filter(op, dialect, ctx)?);
            }
            Ok(format!("({})", parts.join(separator)))
        }
    }
}

fn column(field: &Arc<FieldDescriptor>, alias: &Option<String>, dialect: &dyn Dialect) -> String {
    match alias {
        Some(alias) => format!(
            "{}.{}",
            dialect.quote(alias),
            dialect.quote(&field.column_name)
        ),
        None => dialect.quote(&field.column_name),
    }
}

fn encode(field: &Arc<FieldDescriptor>, value: &DomainValue) -> SqlGenResult<SqlValue> {
    field.value_type.encode(value).map_err(|e| {
        SqlGenError::filter(format!("field '{}': {}", field.name, e))
    })
}

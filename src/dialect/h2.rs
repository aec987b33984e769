use std::sync::Arc;

use super::Dialect;
use crate::compiler::{ParamContext, Query};
use crate::error::{SqlGenError, SqlGenResult};
use crate::schema::{EntityDescriptor, FieldDescriptor};

/// H2 dialect: double-quoted identifiers and `MERGE INTO ... KEY` upserts.
pub struct H2;

impl Dialect for H2 {
    fn name(&self) -> &'static str {
        "h2"
    }

    fn open_quote(&self) -> &'static str {
        "\""
    }

    fn close_quote(&self) -> &'static str {
        "\""
    }

    fn save(
        &self,
        entity: &EntityDescriptor,
        update_fields: &[Arc<FieldDescriptor>],
        key_fields: &[Arc<FieldDescriptor>],
    ) -> SqlGenResult<Query> {
        if update_fields.is_empty() || key_fields.is_empty() {
            return Err(SqlGenError::filter(format!(
                "save on '{}' requires update fields and key fields",
                entity.table.name
            )));
        }
        let mut ctx = ParamContext::new();
        let columns: Vec<&Arc<FieldDescriptor>> =
            update_fields.iter().chain(key_fields.iter()).collect();
        let col_list = columns
            .iter()
            .map(|f| self.quote(&f.column_name))
            .collect::<Vec<_>>()
            .join(",");
        let key_list = key_fields
            .iter()
            .map(|f| self.quote(&f.column_name))
            .collect::<Vec<_>>()
            .join(",");
        let placeholders = columns
            .iter()
            .map(|f| ctx.bind(self, f.column_name.clone(), None))
            .collect::<Vec<_>>()
            .join(",");

        let sql = format!(
            "MERGE INTO {} ({}) KEY ({}) VALUES ({})",
            self.quote_table(&entity.table),
            col_list,
            key_list,
            placeholders
        );
        Ok(Query {
            sql,
            params: ctx.into_params(),
        })
    }
}

use std::sync::Arc;

use super::Dialect;
use crate::compiler::{ParamContext, Query};
use crate::error::{SqlGenError, SqlGenResult};
use crate::schema::{EntityDescriptor, FieldDescriptor};

/// Postgres dialect: double-quoted identifiers, `$n` placeholders,
/// `ON CONFLICT ... DO UPDATE` upserts.
pub struct Postgres;

impl Dialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn open_quote(&self) -> &'static str {
        "\""
    }

    fn close_quote(&self) -> &'static str {
        "\""
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${}", index)
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
        let placeholders = columns
            .iter()
            .map(|f| ctx.bind(self, f.column_name.clone(), None))
            .collect::<Vec<_>>()
            .join(",");
        let conflict_target = key_fields
            .iter()
            .map(|f| self.quote(&f.column_name))
            .collect::<Vec<_>>()
            .join(",");

        let mut updates: Vec<String> = update_fields
            .iter()
            .filter(|f| !key_fields.iter().any(|k| k.column_name == f.column_name))
            .map(|f| {
                let quoted = self.quote(&f.column_name);
                format!("{} = EXCLUDED.{}", quoted, quoted)
            })
            .collect();
        if updates.is_empty() {
            updates = key_fields
                .iter()
                .map(|f| {
                    let quoted = self.quote(&f.column_name);
                    format!("{} = EXCLUDED.{}", quoted, quoted)
                })
                .collect();
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT ({}) DO UPDATE SET {}",
            self.quote_table(&entity.table),
            col_list,
            placeholders,
            conflict_target,
            updates.join(",")
        );
        Ok(Query {
            sql,
            params: ctx.into_params(),
        })
    }
}

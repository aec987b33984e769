use std::sync::Arc;

use super::Dialect;
use crate::compiler::{ParamContext, Query};
use crate::error::{SqlGenError, SqlGenResult};
use crate::schema::{EntityDescriptor, FieldDescriptor};

/// MySQL dialect: `?` placeholders and `ON DUPLICATE KEY UPDATE` upserts.
pub struct MySql;

impl Dialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
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

        // Only non-key fields appear in the update clause.
        let mut updates: Vec<String> = update_fields
            .iter()
            .filter(|f| !key_fields.iter().any(|k| k.column_name == f.column_name))
            .map(|f| {
                let quoted = self.quote(&f.column_name);
                format!("{}=VALUES({})", quoted, quoted)
            })
            .collect();
        if updates.is_empty() {
            updates = key_fields
                .iter()
                .map(|f| {
                    let quoted = self.quote(&f.column_name);
                    format!("{}=VALUES({})", quoted, quoted)
                })
                .collect();
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) ON DUPLICATE KEY UPDATE {}",
            self.quote_table(&entity.table),
            col_list,
            placeholders,
            updates.join(",")
        );
        Ok(Query {
            sql,
            params: ctx.into_params(),
        })
    }
}

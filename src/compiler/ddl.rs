//! DDL statement builders (CREATE/DROP TABLE, CREATE INDEX).

use super::query::Query;
use crate::dialect::Dialect;
use crate::error::SqlGenResult;
use crate::schema::{EntityDescriptor, IndexColumn};

/// Generate the CREATE TABLE statement followed by one CREATE INDEX
/// statement per declared index, in declaration order.
pub fn build_create_table(
    entity: &EntityDescriptor,
    if_not_exists: bool,
    dialect: &dyn Dialect,
) -> SqlGenResult<Vec<Query>> {
    let mut sql = String::from("CREATE TABLE ");
    if if_not_exists && dialect.supports_if_not_exists() {
        sql.push_str("IF NOT EXISTS ");
    }
    sql.push_str(&dialect.quote_table(&entity.table));
    sql.push_str(" (\n");

    let mut defs = Vec::new();
    for field in &entity.fields {
        let mut line = format!(
            "    {} {}",
            dialect.quote(&field.column_name),
            field.value_type.sql_data_type()
        );
        if !field.nullable {
            line.push_str(" NOT NULL");
        }
        defs.push(line);
    }

    let key_columns: Vec<String> = entity
        .key_fields()
        .iter()
        .map(|f| dialect.quote(&f.column_name))
        .collect();
    if !key_columns.is_empty() {
        let mut line = String::from("    ");
        if let Some(name) = &entity.primary_key_name {
            line.push_str(&format!("CONSTRAINT {} ", dialect.quote(name)));
        }
        line.push_str(&format!("PRIMARY KEY ({})", key_columns.join(",")));
        defs.push(line);
    }

    for unique in &entity.unique_constraints {
        let mut line = String::from("    ");
        if let Some(name) = &unique.name {
            line.push_str(&format!("CONSTRAINT {} ", dialect.quote(name)));
        }
        line.push_str(&format!(
            "UNIQUE ({})",
            column_refs(&unique.columns, dialect)
        ));
        defs.push(line);
    }

    for fk in &entity.foreign_keys {
        let mut line = String::from("    ");
        if let Some(name) = &fk.name {
            line.push_str(&format!("CONSTRAINT {} ", dialect.quote(name)));
        }
        line.push_str(&format!(
            "FOREIGN KEY ({}) REFERENCES {} ({})",
            fk.columns
                .iter()
                .map(|c| dialect.quote(c))
                .collect::<Vec<_>>()
                .join(","),
            dialect.quote_table(&fk.referenced_table),
            fk.referenced_columns
                .iter()
                .map(|c| dialect.quote(c))
                .collect::<Vec<_>>()
                .join(",")
        ));
        if let Some(action) = fk.on_delete {
            line.push_str(&format!(" ON DELETE {}", action.as_sql()));
        }
        if let Some(action) = fk.on_update {
            line.push_str(&format!(" ON UPDATE {}", action.as_sql()));
        }
        defs.push(line);
    }

    sql.push_str(&defs.join(",\n"));
    sql.push_str("\n)");

    let mut statements = vec![Query::plain(sql)];
    for index in &entity.indexes {
        statements.push(build_create_index(entity, index, if_not_exists, dialect));
    }
    Ok(statements)
}

fn build_create_index(
    entity: &EntityDescriptor,
    index: &crate::schema::Index,
    if_not_exists: bool,
    dialect: &dyn Dialect,
) -> Query {
    let mut sql = String::from("CREATE ");
    if index.unique {
        sql.push_str("UNIQUE ");
    }
    sql.push_str("INDEX ");
    if if_not_exists && dialect.supports_if_not_exists() {
        sql.push_str("IF NOT EXISTS ");
    }
    if let Some(name) = &index.name {
        sql.push_str(&dialect.quote(name));
        sql.push(' ');
    }
    sql.push_str(&format!(
        "ON {} ({})",
        dialect.quote_table(&entity.table),
        column_refs(&index.columns, dialect)
    ));
    Query::plain(sql)
}

/// Generate `DROP TABLE [IF EXISTS] <table>`.
pub fn build_drop_table(
    entity: &EntityDescriptor,
    if_exists: bool,
    dialect: &dyn Dialect,
) -> Query {
    let mut sql = String::from("DROP TABLE ");
    if if_exists && dialect.supports_if_not_exists() {
        sql.push_str("IF EXISTS ");
    }
    sql.push_str(&dialect.quote_table(&entity.table));
    Query::plain(sql)
}

fn column_refs(columns: &[IndexColumn], dialect: &dyn Dialect) -> String {
    columns
        .iter()
        .map(|c| {
            if c.descending {
                format!("{} DESC", dialect.quote(&c.name))
            } else {
                dialect.quote(&c.name)
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

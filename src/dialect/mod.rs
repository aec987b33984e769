//! Dialect strategy objects.
//!
//! A [`Dialect`] is a family of rendering rules for one database product:
//! identifier quoting, placeholder tokens, upsert syntax. The shared
//! compiler algorithm composes a dialect by reference; dialects never
//! reimplement the traversal itself.

pub mod ansi;
pub mod h2;
pub mod mysql;
pub mod postgres;
pub mod sqlserver;

pub use ansi::Ansi;
pub use h2::H2;
pub use mysql::MySql;
pub use postgres::Postgres;
pub use sqlserver::SqlServer;

use std::sync::Arc;

use crate::compiler::Query;
use crate::error::{SqlGenError, SqlGenResult};
use crate::schema::{EntityDescriptor, FieldDescriptor, TableName};

/// Rendering hooks a concrete dialect may override.
pub trait Dialect: Send + Sync {
    fn name(&self) -> &'static str;

    /// Opening identifier quote. Default: none.
    fn open_quote(&self) -> &'static str {
        ""
    }

    /// Closing identifier quote. Default: none.
    fn close_quote(&self) -> &'static str {
        ""
    }

    /// Placeholder token for the 1-based parameter `index`.
    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn quote(&self, ident: &str) -> String {
        format!("{}{}{}", self.open_quote(), ident, self.close_quote())
    }

    fn quote_table(&self, table: &TableName) -> String {
        match &table.schema {
            Some(schema) => format!("{}.{}", self.quote(schema), self.quote(&table.name)),
            None => self.quote(&table.name),
        }
    }

    fn supports_if_not_exists(&self) -> bool {
        true
    }

    /// Upsert. Idiomatic syntax is dialect-specific, so the base dialect
    /// reports the operation as unsupported rather than guessing.
    fn save(
        &self,
        _entity: &EntityDescriptor,
        _update_fields: &[Arc<FieldDescriptor>],
        _key_fields: &[Arc<FieldDescriptor>],
    ) -> SqlGenResult<Query> {
        Err(SqlGenError::unsupported(self.name(), "save"))
    }
}

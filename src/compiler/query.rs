use serde::{Deserialize, Serialize};

use crate::dialect::Dialect;
use crate::types::SqlValue;

/// One bind parameter of a generated statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// 1-based position, strictly increasing in placeholder order.
    pub index: usize,
    /// Parameter name. Synthetic names are the field's column name,
    /// suffixed `_<i>` for multi-value leaves.
    pub name: String,
    /// The literal value for value-bound parameters; `None` for
    /// late-bound parameters supplied by the executor.
    #[serde(default)]
    pub value: Option<SqlValue>,
}

/// A generated SQL statement plus its ordered parameter list.
///
/// The placeholder count in `sql` always equals `params.len()`, and the
/// positions agree: drivers bind positionally by `index`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub sql: String,
    pub params: Vec<Parameter>,
}

impl Query {
    /// A statement with no bind parameters (DDL).
    pub fn plain(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }
}

/// Shared parameter-tracking state for one compile call.
///
/// Every placeholder emitted bumps the 1-based counter that becomes the
/// parameter's index; this is the single source of truth for ordering.
#[derive(Debug, Default)]
pub struct ParamContext {
    index: usize,
    params: Vec<Parameter>,
}

impl ParamContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter and return its placeholder token.
    pub fn bind(
        &mut self,
        dialect: &dyn Dialect,
        name: impl Into<String>,
        value: Option<SqlValue>,
    ) -> String {
        self.index += 1;
        self.params.push(Parameter {
            index: self.index,
            name: name.into(),
            value,
        });
        dialect.placeholder(self.index)
    }

    pub fn count(&self) -> usize {
        self.index
    }

    pub fn into_params(self) -> Vec<Parameter> {
        self.params
    }
}

use super::Dialect;

/// SQL Server dialect: bracket-quoted identifiers.
pub struct SqlServer;

impl Dialect for SqlServer {
    fn name(&self) -> &'static str {
        "sqlserver"
    }

    fn open_quote(&self) -> &'static str {
        "["
    }

    fn close_quote(&self) -> &'static str {
        "]"
    }

    fn supports_if_not_exists(&self) -> bool {
        false
    }
}

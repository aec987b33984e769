pub mod error;
pub mod schema;
pub mod types;
pub mod filter;
pub mod dialect;
pub mod compiler;
pub mod decode;

pub use error::{SqlGenError, SqlGenResult};

pub mod prelude {
    pub use crate::compiler::{Parameter, Query, QueryBuilder};
    pub use crate::decode::{DecoderFactory, EntityRecord, Row};
    pub use crate::dialect::Dialect;
    pub use crate::error::{SqlGenError, SqlGenResult};
    pub use crate::filter::{Filter, FilterBuilder};
    pub use crate::schema::{EntityDescriptor, FieldDescriptor, NamingStrategy, TableName};
    pub use crate::types::{DomainType, DomainValue, SizeHint, SqlValue, TypeRegistry, ValueType};
}

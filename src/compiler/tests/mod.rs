//! Compiler tests: literal-SQL assertions per dialect plus parameter
//! ordering properties.


use std::sync::Arc;

use crate::schema::{EntityDescriptor, NamingStrategy};
use crate::types::DomainType;

/// Person with fields declared age, id(key), name.
pub fn person() -> Arc<EntityDescriptor> {
    EntityDescriptor::builder("Person")
        .naming(NamingStrategy::AsIs)
        .column("age", DomainType::Int)
        .key("id", DomainType::Uuid)
        .column("name", DomainType::String)
        .build()
        .unwrap()
}

/// Lowercase-table variant used by the upsert scenarios.
pub fn person_lower() -> Arc<EntityDescriptor> {
    EntityDescriptor::builder("person")
        .naming(NamingStrategy::AsIs)
        .column("name", DomainType::String)
        .key("id", DomainType::Uuid)
        .column("age", DomainType::Int)
        .build()
        .unwrap()
}

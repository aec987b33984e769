//! Entity and schema descriptor model.
//!
//! Descriptors are built once per entity type and shared behind `Arc`;
//! everything downstream (compiler, decoder) treats them as immutable.

pub mod constraints;
pub mod entity;
pub mod naming;
pub mod table;

pub use constraints::{ForeignKey, Index, IndexColumn, ReferentialAction, UniqueConstraint};
pub use entity::{EntityBuilder, EntityDescriptor, FieldDescriptor};
pub use naming::NamingStrategy;
pub use table::TableName;

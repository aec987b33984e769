//! Value codec layer.
//!
//! Maps application-level domain values to the single driver primitive a
//! database accepts, and back. Codecs are immutable and shareable; the
//! registry resolves a [`ValueType`] for a domain type once, at
//! descriptor-build time.

pub mod codec;
pub mod registry;
pub mod value;

pub use codec::{CodecError, Primitive, ValueType};
pub use registry::{SizeHint, TypeRegistry};
pub use value::{DomainType, DomainValue, SqlValue};

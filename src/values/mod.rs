//! Typed values
//!
//! Value types describe a kind of value (identity, default, text form);
//! values are immutable payloads tagged with the type that produced them.
//! The registry maps stable type names back to descriptors so persisted
//! text can be read again.

pub mod builtin;
pub mod registry;
pub mod value;
pub mod value_type;

pub use registry::ValueTypeRegistry;
pub use value::{DomainPayload, ObjectPayload, RawValue, Value};
pub use value_type::{ValueType, ValueTypeRef};

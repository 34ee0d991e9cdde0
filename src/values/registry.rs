//! Value type registry: stable identifier -> value type descriptor.

use ahash::AHashMap;

use super::value_type::ValueTypeRef;
use crate::core::error::{ConfigError, ConfigResult, EvalError, LookupKind, Result};

/// Append-only catalog of value types, keyed by type name
#[derive(Debug, Default, Clone)]
pub struct ValueTypeRegistry {
    types: AHashMap<String, ValueTypeRef>,
}

impl ValueTypeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a value type under its unique name
    pub fn register(&mut self, value_type: ValueTypeRef) -> ConfigResult<()> {
        let name = value_type.type_name().to_string();
        if self.types.contains_key(&name) {
            return Err(ConfigError::DuplicateValueType(name));
        }
        self.types.insert(name, value_type);
        Ok(())
    }

    /// Look up a value type by name.
    ///
    /// Unknown names come from corrupted or version-mismatched data, so the
    /// failure is a recoverable lookup error.
    pub fn get_value_type(&self, name: &str) -> Result<ValueTypeRef> {
        self.types
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::lookup(LookupKind::ValueType, name))
    }

    pub fn contains(&self, value_type: &ValueTypeRef) -> bool {
        self.types.contains_key(value_type.type_name())
    }

    /// All registered types, in no particular order
    pub fn value_types(&self) -> impl Iterator<Item = &ValueTypeRef> + '_ {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

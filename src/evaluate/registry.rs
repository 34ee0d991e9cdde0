//! Operator registry and the serialization protocol for operators.
//!
//! Every operator names the serializer for its kind (`serializer_id`).
//! Persisted text is an envelope carrying that name and the serializer's own
//! record, so reading it back picks the same serializer out again:
//!
//! ```text
//! {"serializer":"curry","value":"{\"valueType\":\"boolean\",...}"}
//! ```

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::base::BASIC_SERIALIZER;
use super::operator::{Operator, OperatorRef};
use crate::core::error::{ConfigError, ConfigResult, EvalError, LookupKind, Result};
use crate::registry::Registries;
use crate::values::ValueTypeRegistry;

/// Registry entry that persists one kind of operator
pub trait OperatorSerializer: Send + Sync {
    /// Stable name written into the persisted envelope
    fn unique_name(&self) -> &str;

    fn serialize(&self, operator: &dyn Operator, registries: &Registries) -> Result<String>;

    fn deserialize(&self, text: &str, ctx: &DeserializeContext<'_>) -> Result<OperatorRef>;
}

/// Wrapper naming the serializer that produced `value`
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Envelope {
    pub serializer: String,
    pub value: String,
}

/// State threaded through a (possibly nested) deserialization
pub struct DeserializeContext<'a> {
    registries: &'a Registries,
    depth: usize,
}

impl<'a> DeserializeContext<'a> {
    pub(crate) fn new(registries: &'a Registries, depth: usize) -> Self {
        Self { registries, depth }
    }

    pub fn registries(&self) -> &Registries {
        self.registries
    }

    pub fn value_types(&self) -> &ValueTypeRegistry {
        self.registries.value_types()
    }

    pub fn operators(&self) -> &OperatorRegistry {
        self.registries.operators()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Deserialize an operator persisted inside the current record
    pub fn deserialize_nested(&self, text: &str) -> Result<OperatorRef> {
        self.registries.deserialize_at(text, self.depth + 1)
    }
}

/// Base operators persist as their unique name
#[derive(Debug, Default)]
pub struct BasicSerializer;

impl OperatorSerializer for BasicSerializer {
    fn unique_name(&self) -> &str {
        BASIC_SERIALIZER
    }

    fn serialize(&self, operator: &dyn Operator, registries: &Registries) -> Result<String> {
        // Only registered operators can be read back
        let registered = registries.operators().get_operator(operator.unique_name())?;
        Ok(registered.unique_name().to_string())
    }

    fn deserialize(&self, text: &str, ctx: &DeserializeContext<'_>) -> Result<OperatorRef> {
        ctx.operators().get_operator(text)
    }
}

/// Append-only catalog of operators and operator serializers
#[derive(Default)]
pub struct OperatorRegistry {
    operators: AHashMap<String, OperatorRef>,
    serializers: AHashMap<String, Arc<dyn OperatorSerializer>>,
}

impl OperatorRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_operator(&mut self, operator: OperatorRef) -> ConfigResult<()> {
        let name = operator.unique_name().to_string();
        if self.operators.contains_key(&name) {
            return Err(ConfigError::DuplicateOperator(name));
        }
        self.operators.insert(name, operator);
        Ok(())
    }

    pub fn register_serializer(&mut self, serializer: Arc<dyn OperatorSerializer>) -> ConfigResult<()> {
        let name = serializer.unique_name().to_string();
        if self.serializers.contains_key(&name) {
            return Err(ConfigError::DuplicateSerializer(name));
        }
        self.serializers.insert(name, serializer);
        Ok(())
    }

    pub fn get_operator(&self, name: &str) -> Result<OperatorRef> {
        self.operators
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::lookup(LookupKind::Operator, name))
    }

    pub fn serializer(&self, name: &str) -> Result<&Arc<dyn OperatorSerializer>> {
        self.serializers
            .get(name)
            .ok_or_else(|| EvalError::lookup(LookupKind::Serializer, name))
    }

    /// All registered operators, in no particular order
    pub fn operators(&self) -> impl Iterator<Item = &OperatorRef> + '_ {
        self.operators.values()
    }

    pub fn serializer_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.serializers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

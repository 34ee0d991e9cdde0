//! Value type descriptors and the shared handle used to refer to them.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use super::value::{RawValue, Value};
use crate::core::error::Result;
use crate::core::l10n::L10nMessage;

/// Describes one kind of value.
///
/// Implementations work on raw payloads; `ValueTypeRef` attaches the type
/// back onto the payloads it produces. For every payload a type produces,
/// `deserialize(serialize(raw)) == raw` must hold.
pub trait ValueType: Send + Sync {
    /// Globally unique, version-stable identifier (the serialization key)
    fn type_name(&self) -> &str;

    /// Translation key of the display name
    fn name_key(&self) -> String {
        format!("valuetype.{}", self.type_name())
    }

    fn default_raw(&self) -> RawValue;

    fn serialize(&self, raw: &RawValue) -> Result<String>;

    fn deserialize(&self, text: &str) -> Result<RawValue>;

    /// Whether `raw` has the payload shape this type produces
    fn accepts_raw(&self, raw: &RawValue) -> bool;

    /// Short human-readable rendering of a payload
    fn to_display(&self, raw: &RawValue) -> String {
        self.serialize(raw).unwrap_or_else(|_| format!("{:?}", raw))
    }

    /// Categories group other types and are only used as declared input types
    fn is_category(&self) -> bool {
        false
    }

    /// Whether a value of type `other` may be passed where `self` is declared
    fn corresponds_to(&self, other: &dyn ValueType) -> bool {
        self.type_name() == other.type_name()
    }

    /// Concrete type owning `raw` when this type is a category
    fn member_type(&self, _raw: &RawValue) -> Option<ValueTypeRef> {
        None
    }
}

/// Shared handle to a registered value type.
///
/// Two handles are equal when their type names are equal.
#[derive(Clone)]
pub struct ValueTypeRef(Arc<dyn ValueType>);

impl ValueTypeRef {
    pub fn new<T: ValueType + 'static>(value_type: T) -> Self {
        Self(Arc::new(value_type))
    }

    /// Wrap a payload as a value of this type. Categories never own
    /// values: the payload is tagged with the member type it belongs to.
    pub fn value(&self, raw: RawValue) -> Value {
        debug_assert!(
            self.0.accepts_raw(&raw),
            "payload {:?} is not a {}",
            raw,
            self.0.type_name()
        );
        Value::from_parts(self.owner_of(&raw), raw)
    }

    pub fn default_value(&self) -> Value {
        let raw = self.0.default_raw();
        Value::from_parts(self.owner_of(&raw), raw)
    }

    pub fn serialize_value(&self, value: &Value) -> Result<String> {
        self.0.serialize(value.raw())
    }

    pub fn deserialize_value(&self, text: &str) -> Result<Value> {
        let raw = self.0.deserialize(text)?;
        Ok(Value::from_parts(self.owner_of(&raw), raw))
    }

    fn owner_of(&self, raw: &RawValue) -> ValueTypeRef {
        self.0.member_type(raw).unwrap_or_else(|| self.clone())
    }

    /// Whether `actual` satisfies this declared type
    pub fn accepts(&self, actual: &ValueTypeRef) -> bool {
        self.0.corresponds_to(actual.0.as_ref())
    }

    pub fn display_name(&self) -> L10nMessage {
        L10nMessage::new(self.0.name_key())
    }
}

impl Deref for ValueTypeRef {
    type Target = dyn ValueType;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl PartialEq for ValueTypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.0.type_name() == other.0.type_name()
    }
}

impl Eq for ValueTypeRef {}

impl Hash for ValueTypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.type_name().hash(state);
    }
}

impl fmt::Debug for ValueTypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValueType({})", self.0.type_name())
    }
}

impl fmt::Display for ValueTypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.type_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::builtin;

    #[test]
    fn test_handles_compare_by_name() {
        assert_eq!(builtin::integer(), builtin::integer());
        assert_ne!(builtin::integer(), builtin::double());
    }

    #[test]
    fn test_default_value_has_owning_type() {
        let value = builtin::boolean().default_value();
        assert_eq!(value.value_type(), &builtin::boolean());
        assert_eq!(value.as_boolean(), Some(false));
    }

    #[test]
    fn test_category_accepts_members() {
        assert!(builtin::any().accepts(&builtin::string()));
        assert!(builtin::number().accepts(&builtin::integer()));
        assert!(builtin::number().accepts(&builtin::double()));
        assert!(!builtin::number().accepts(&builtin::boolean()));
        assert!(!builtin::integer().accepts(&builtin::number()));
    }

    #[test]
    fn test_category_values_take_member_type() {
        let value = builtin::number().value(RawValue::Integer(4));
        assert_eq!(value.value_type(), &builtin::integer());

        let value = builtin::number().default_value();
        assert_eq!(value.value_type(), &builtin::integer());

        let value = builtin::any().deserialize_value("1.5").unwrap();
        assert_eq!(value.value_type(), &builtin::double());
    }

    #[test]
    fn test_display_name_key() {
        assert_eq!(builtin::string().display_name().key, "valuetype.string");
    }
}

//! Immutable typed values and their raw payloads.

use ordered_float::OrderedFloat;
use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::value_type::ValueTypeRef;

/// Payload of a domain value type the engine treats as opaque
pub trait DomainPayload: fmt::Debug + Send + Sync + 'static {
    fn as_any(&self) -> &dyn Any;
    fn payload_eq(&self, other: &dyn DomainPayload) -> bool;
    fn payload_hash(&self, state: &mut dyn Hasher);
}

impl<T> DomainPayload for T
where
    T: fmt::Debug + Eq + Hash + Send + Sync + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn payload_eq(&self, other: &dyn DomainPayload) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .map_or(false, |other| self == other)
    }

    fn payload_hash(&self, mut state: &mut dyn Hasher) {
        self.hash(&mut state);
    }
}

/// Shared handle to a domain payload, compared and hashed by content
#[derive(Clone)]
pub struct ObjectPayload(Arc<dyn DomainPayload>);

impl ObjectPayload {
    pub fn new<T: DomainPayload>(payload: T) -> Self {
        Self(Arc::new(payload))
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }
}

impl fmt::Debug for ObjectPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl PartialEq for ObjectPayload {
    fn eq(&self, other: &Self) -> bool {
        self.0.payload_eq(other.0.as_ref())
    }
}

impl Eq for ObjectPayload {}

impl Hash for ObjectPayload {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.payload_hash(state);
    }
}

/// Raw payload carried by a `Value`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RawValue {
    Boolean(bool),
    Integer(i32),
    Double(OrderedFloat<f64>),
    String(String),
    Object(ObjectPayload),
}

/// An immutable instance of exactly one value type.
///
/// Equality and hashing look only at the raw payload.
#[derive(Clone)]
pub struct Value {
    value_type: ValueTypeRef,
    raw: RawValue,
}

impl Value {
    pub(crate) fn from_parts(value_type: ValueTypeRef, raw: RawValue) -> Self {
        Self { value_type, raw }
    }

    pub fn value_type(&self) -> &ValueTypeRef {
        &self.value_type
    }

    pub fn raw(&self) -> &RawValue {
        &self.raw
    }

    pub fn into_raw(self) -> RawValue {
        self.raw
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self.raw {
            RawValue::Boolean(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self.raw {
            RawValue::Integer(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self.raw {
            RawValue::Double(d) => Some(d.into_inner()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.raw {
            RawValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object<T: 'static>(&self) -> Option<&T> {
        match &self.raw {
            RawValue::Object(payload) => payload.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Numeric view of integer and double payloads
    pub fn as_number(&self) -> Option<f64> {
        match self.raw {
            RawValue::Integer(i) => Some(i as f64),
            RawValue::Double(d) => Some(d.into_inner()),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.value_type.type_name(), self.raw)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value_type.to_display(&self.raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::builtin;
    use std::collections::HashSet;

    #[derive(Debug, PartialEq, Eq, Hash)]
    struct Marker(u8);

    #[test]
    fn test_equality_uses_payload() {
        let a = builtin::integer().value(RawValue::Integer(3));
        let b = builtin::integer().value(RawValue::Integer(3));
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_object_payload_equality() {
        let a = ObjectPayload::new(Marker(1));
        let b = ObjectPayload::new(Marker(1));
        let c = ObjectPayload::new(Marker(2));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.downcast_ref::<Marker>(), Some(&Marker(1)));
        assert!(a.downcast_ref::<u8>().is_none());
    }

    #[test]
    fn test_accessors() {
        let v = builtin::double().value(RawValue::Double(OrderedFloat(2.5)));
        assert_eq!(v.as_double(), Some(2.5));
        assert_eq!(v.as_number(), Some(2.5));
        assert_eq!(v.as_integer(), None);
        assert_eq!(v.value_type().type_name(), "double");
    }
}

//! Built-in value types: boolean, integer, double, string and the `any` and
//! `number` categories.

use ordered_float::OrderedFloat;
use std::sync::OnceLock;

use super::registry::ValueTypeRegistry;
use super::value::RawValue;
use super::value_type::{ValueType, ValueTypeRef};
use crate::core::error::{ConfigResult, EvalError, Result};

fn malformed(type_name: &str, text: &str) -> EvalError {
    EvalError::Parse(format!("invalid {} literal '{}'", type_name, text))
}

fn wrong_payload(type_name: &str, raw: &RawValue) -> EvalError {
    EvalError::Parse(format!("cannot serialize {:?} as {}", raw, type_name))
}

#[derive(Debug)]
struct BooleanType;

impl ValueType for BooleanType {
    fn type_name(&self) -> &str {
        "boolean"
    }

    fn default_raw(&self) -> RawValue {
        RawValue::Boolean(false)
    }

    fn serialize(&self, raw: &RawValue) -> Result<String> {
        match raw {
            RawValue::Boolean(b) => Ok(b.to_string()),
            other => Err(wrong_payload(self.type_name(), other)),
        }
    }

    fn deserialize(&self, text: &str) -> Result<RawValue> {
        match text {
            "true" => Ok(RawValue::Boolean(true)),
            "false" => Ok(RawValue::Boolean(false)),
            _ => Err(malformed(self.type_name(), text)),
        }
    }

    fn accepts_raw(&self, raw: &RawValue) -> bool {
        matches!(raw, RawValue::Boolean(_))
    }
}

#[derive(Debug)]
struct IntegerType;

impl ValueType for IntegerType {
    fn type_name(&self) -> &str {
        "integer"
    }

    fn default_raw(&self) -> RawValue {
        RawValue::Integer(0)
    }

    fn serialize(&self, raw: &RawValue) -> Result<String> {
        match raw {
            RawValue::Integer(i) => Ok(i.to_string()),
            other => Err(wrong_payload(self.type_name(), other)),
        }
    }

    fn deserialize(&self, text: &str) -> Result<RawValue> {
        text.parse::<i32>()
            .map(RawValue::Integer)
            .map_err(|_| malformed(self.type_name(), text))
    }

    fn accepts_raw(&self, raw: &RawValue) -> bool {
        matches!(raw, RawValue::Integer(_))
    }
}

#[derive(Debug)]
struct DoubleType;

impl ValueType for DoubleType {
    fn type_name(&self) -> &str {
        "double"
    }

    fn default_raw(&self) -> RawValue {
        RawValue::Double(OrderedFloat(0.0))
    }

    // f64 Display is the shortest text that parses back to the same bits
    fn serialize(&self, raw: &RawValue) -> Result<String> {
        match raw {
            RawValue::Double(d) => Ok(d.into_inner().to_string()),
            other => Err(wrong_payload(self.type_name(), other)),
        }
    }

    fn deserialize(&self, text: &str) -> Result<RawValue> {
        text.parse::<f64>()
            .map(|d| RawValue::Double(OrderedFloat(d)))
            .map_err(|_| malformed(self.type_name(), text))
    }

    fn accepts_raw(&self, raw: &RawValue) -> bool {
        matches!(raw, RawValue::Double(_))
    }
}

#[derive(Debug)]
struct StringType;

impl ValueType for StringType {
    fn type_name(&self) -> &str {
        "string"
    }

    fn default_raw(&self) -> RawValue {
        RawValue::String(String::new())
    }

    fn serialize(&self, raw: &RawValue) -> Result<String> {
        match raw {
            RawValue::String(s) => Ok(s.clone()),
            other => Err(wrong_payload(self.type_name(), other)),
        }
    }

    fn deserialize(&self, text: &str) -> Result<RawValue> {
        Ok(RawValue::String(text.to_string()))
    }

    fn accepts_raw(&self, raw: &RawValue) -> bool {
        matches!(raw, RawValue::String(_))
    }

    fn to_display(&self, raw: &RawValue) -> String {
        match raw {
            RawValue::String(s) => format!("\"{}\"", s),
            other => format!("{:?}", other),
        }
    }
}

/// A category type: declared-only. Payloads belong to a member; the
/// default is the first member's default.
struct CategoryType {
    name: &'static str,
    members: Vec<ValueTypeRef>,
}

impl CategoryType {
    fn first(&self) -> &ValueTypeRef {
        &self.members[0]
    }

    fn member_for(&self, raw: &RawValue) -> Option<&ValueTypeRef> {
        self.members.iter().find(|m| m.accepts_raw(raw))
    }
}

impl ValueType for CategoryType {
    fn type_name(&self) -> &str {
        self.name
    }

    fn default_raw(&self) -> RawValue {
        self.first().default_raw()
    }

    fn serialize(&self, raw: &RawValue) -> Result<String> {
        self.member_for(raw)
            .ok_or_else(|| wrong_payload(self.name, raw))?
            .serialize(raw)
    }

    /// First member, in declaration order, that reads `text`
    fn deserialize(&self, text: &str) -> Result<RawValue> {
        self.members
            .iter()
            .find_map(|m| m.deserialize(text).ok())
            .ok_or_else(|| malformed(self.name, text))
    }

    fn accepts_raw(&self, raw: &RawValue) -> bool {
        self.member_for(raw).is_some()
    }

    fn is_category(&self) -> bool {
        true
    }

    fn corresponds_to(&self, other: &dyn ValueType) -> bool {
        self.name == "any"
            || other.type_name() == self.name
            || self
                .members
                .iter()
                .any(|m| m.type_name() == other.type_name())
    }

    fn member_type(&self, raw: &RawValue) -> Option<ValueTypeRef> {
        self.member_for(raw).cloned()
    }
}

macro_rules! builtin_type {
    ($fn_name:ident, $init:expr) => {
        pub fn $fn_name() -> ValueTypeRef {
            static CELL: OnceLock<ValueTypeRef> = OnceLock::new();
            CELL.get_or_init(|| $init).clone()
        }
    };
}

builtin_type!(boolean, ValueTypeRef::new(BooleanType));
builtin_type!(integer, ValueTypeRef::new(IntegerType));
builtin_type!(double, ValueTypeRef::new(DoubleType));
builtin_type!(string, ValueTypeRef::new(StringType));
builtin_type!(
    any,
    ValueTypeRef::new(CategoryType {
        name: "any",
        members: vec![boolean(), integer(), double(), string()],
    })
);
builtin_type!(
    number,
    ValueTypeRef::new(CategoryType {
        name: "number",
        members: vec![integer(), double()],
    })
);

/// Register every built-in value type
pub fn register_value_types(registry: &mut ValueTypeRegistry) -> ConfigResult<()> {
    for value_type in [boolean(), integer(), double(), string(), any(), number()] {
        registry.register(value_type)?;
    }
    Ok(())
}

//! Shared fixtures: a small item/block domain registered on top of the
//! built-in registries, the way a content module would extend the engine.

#![allow(dead_code)]

use logicnet::core::{EngineConfig, EvalError, Result};
use logicnet::evaluate::builtin::{double_value, integer_value};
use logicnet::evaluate::{BaseOperator, OperatorRef, Variable};
use logicnet::values::builtin::{double, integer};
use logicnet::values::{ObjectPayload, RawValue, Value, ValueType, ValueTypeRef};
use logicnet::Registries;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A stack of items
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemStack {
    pub item: String,
    pub count: i32,
    /// Highest block harvest level this item can mine (-1: not a tool)
    pub harvest_level: i32,
    /// Mining speed when the tool is effective
    pub efficiency: i32,
}

/// A placed block
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    pub name: String,
    pub harvest_level: i32,
}

/// Value type whose payload is JSON-encoded `T`
struct JsonObjectType<T> {
    name: &'static str,
    default: fn() -> T,
}

impl<T> ValueType for JsonObjectType<T>
where
    T: Clone + Eq + std::hash::Hash + std::fmt::Debug + Serialize + for<'de> Deserialize<'de>,
    T: Send + Sync + 'static,
{
    fn type_name(&self) -> &str {
        self.name
    }

    fn default_raw(&self) -> RawValue {
        RawValue::Object(ObjectPayload::new((self.default)()))
    }

    fn serialize(&self, raw: &RawValue) -> Result<String> {
        match raw {
            RawValue::Object(payload) => {
                let inner = payload
                    .downcast_ref::<T>()
                    .ok_or_else(|| EvalError::Parse(format!("not a {}", self.name)))?;
                Ok(serde_json::to_string(inner)?)
            }
            other => Err(EvalError::Parse(format!("not a {}: {:?}", self.name, other))),
        }
    }

    fn deserialize(&self, text: &str) -> Result<RawValue> {
        let inner: T = serde_json::from_str(text)?;
        Ok(RawValue::Object(ObjectPayload::new(inner)))
    }

    fn accepts_raw(&self, raw: &RawValue) -> bool {
        matches!(raw, RawValue::Object(payload) if payload.downcast_ref::<T>().is_some())
    }
}

pub fn itemstack_type() -> ValueTypeRef {
    static CELL: OnceLock<ValueTypeRef> = OnceLock::new();
    CELL.get_or_init(|| {
        ValueTypeRef::new(JsonObjectType::<ItemStack> {
            name: "itemstack",
            default: || ItemStack {
                item: "air".into(),
                count: 0,
                harvest_level: -1,
                efficiency: 1,
            },
        })
    })
    .clone()
}

pub fn block_type() -> ValueTypeRef {
    static CELL: OnceLock<ValueTypeRef> = OnceLock::new();
    CELL.get_or_init(|| {
        ValueTypeRef::new(JsonObjectType::<Block> {
            name: "block",
            default: || Block {
                name: "air".into(),
                harvest_level: 0,
            },
        })
    })
    .clone()
}

/// A type nothing accepts except itself
pub fn dummy_type() -> ValueTypeRef {
    static CELL: OnceLock<ValueTypeRef> = OnceLock::new();
    CELL.get_or_init(|| {
        ValueTypeRef::new(JsonObjectType::<()> {
            name: "dummy",
            default: || (),
        })
    })
    .clone()
}

pub fn item(item: &str, count: i32) -> Variable {
    Variable::captured(itemstack_type().value(RawValue::Object(ObjectPayload::new(
        ItemStack {
            item: item.into(),
            count,
            harvest_level: -1,
            efficiency: 1,
        },
    ))))
}

pub fn tool(item: &str, harvest_level: i32, efficiency: i32) -> Variable {
    Variable::captured(itemstack_type().value(RawValue::Object(ObjectPayload::new(
        ItemStack {
            item: item.into(),
            count: 1,
            harvest_level,
            efficiency,
        },
    ))))
}

pub fn block(name: &str, harvest_level: i32) -> Variable {
    Variable::captured(block_type().value(RawValue::Object(ObjectPayload::new(Block {
        name: name.into(),
        harvest_level,
    }))))
}

pub fn dummy() -> Variable {
    Variable::captured(dummy_type().default_value())
}

pub fn size_operator() -> OperatorRef {
    BaseOperator::new(
        "itemstack.size",
        "size",
        vec![itemstack_type()],
        integer(),
        |inputs| {
            let stack: ItemStack = inputs.object(0, "itemstack")?;
            Ok(integer_value(stack.count))
        },
    )
    .into_ref()
}

/// Mining speed of a tool against a block: its efficiency when it can
/// harvest the block, 1.0 otherwise
pub fn strength_operator() -> OperatorRef {
    BaseOperator::new(
        "itemstack.strength",
        "strength",
        vec![itemstack_type(), block_type()],
        double(),
        |inputs| {
            let tool: ItemStack = inputs.object(0, "itemstack")?;
            let target: Block = inputs.object(1, "block")?;
            if tool.harvest_level >= target.harvest_level {
                Ok(double_value(tool.efficiency as f64))
            } else {
                Ok(double_value(1.0))
            }
        },
    )
    .into_ref()
}

/// Built-in registries extended with the item/block domain
pub fn registries() -> Registries {
    registries_with(EngineConfig::default())
}

pub fn registries_with(config: EngineConfig) -> Registries {
    Registries::builder()
        .with_config(config)
        .with_builtins()
        .and_then(|b| b.register_value_type(itemstack_type()))
        .and_then(|b| b.register_value_type(block_type()))
        .and_then(|b| b.register_value_type(dummy_type()))
        .and_then(|b| b.register_operator(size_operator()))
        .and_then(|b| b.register_operator(strength_operator()))
        .and_then(|b| b.build())
        .expect("domain registries build")
}

pub fn value_of(var: &Variable) -> Value {
    var.value().expect("captured variables always evaluate")
}

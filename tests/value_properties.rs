//! Property tests: persisted values and curried operators read back equal

mod common;

use common::*;
use logicnet::evaluate::builtin::{double_value, integer_value, string_value};
use logicnet::evaluate::{CurriedOperator, Operator, Variable};
use logicnet::values::builtin::{any as any_type, boolean, double, integer, number, string};
use logicnet::values::{ObjectPayload, RawValue};
use ordered_float::OrderedFloat;
use proptest::prelude::*;

fn scalar() -> impl Strategy<Value = RawValue> {
    prop_oneof![
        any::<bool>().prop_map(RawValue::Boolean),
        any::<i32>().prop_map(RawValue::Integer),
        proptest::num::f64::NORMAL.prop_map(|d| RawValue::Double(OrderedFloat(d))),
        ".*".prop_map(RawValue::String),
    ]
}

proptest! {
    #[test]
    fn integer_text_round_trips(i in any::<i32>()) {
        let value = integer_value(i);
        let text = integer().serialize_value(&value).unwrap();
        prop_assert_eq!(integer().deserialize_value(&text).unwrap(), value);
    }

    #[test]
    fn finite_double_text_round_trips(d in proptest::num::f64::NORMAL | proptest::num::f64::ZERO) {
        let value = double_value(d);
        let text = double().serialize_value(&value).unwrap();
        prop_assert_eq!(double().deserialize_value(&text).unwrap(), value);
    }

    #[test]
    fn string_text_round_trips(s in ".*") {
        let value = string_value(&s);
        let text = string().serialize_value(&value).unwrap();
        prop_assert_eq!(string().deserialize_value(&text).unwrap(), value);
    }

    #[test]
    fn boolean_text_round_trips(b in any::<bool>()) {
        let value = boolean().value(RawValue::Boolean(b));
        let text = boolean().serialize_value(&value).unwrap();
        prop_assert_eq!(boolean().deserialize_value(&text).unwrap(), value);
    }

    #[test]
    fn itemstack_text_round_trips(name in "[a-z_]{1,16}", count in 0i32..=64, level in -1i32..=4) {
        let stack = ItemStack { item: name, count, harvest_level: level, efficiency: 2 };
        let value = itemstack_type().value(RawValue::Object(ObjectPayload::new(stack.clone())));
        let text = itemstack_type().serialize_value(&value).unwrap();
        let back = itemstack_type().deserialize_value(&text).unwrap();
        prop_assert_eq!(back.as_object::<ItemStack>(), Some(&stack));
    }

    #[test]
    fn curried_subtraction_survives_persistence(a in -1000i32..1000, b in -1000i32..1000) {
        let registries = registries();
        let sub = registries.operators().get_operator("arithmetic.subtraction").unwrap();
        let curried = CurriedOperator::curry(sub, Variable::captured(integer_value(a))).unwrap();

        let text = registries.serialize_operator(curried.as_ref()).unwrap();
        let back = registries.deserialize_operator(&text).unwrap();

        let input = [Variable::captured(integer_value(b))];
        prop_assert_eq!(back.evaluate(&input).unwrap().as_integer(), Some(a - b));
    }

    #[test]
    fn any_values_round_trip_through_member(raw in scalar()) {
        let value = any_type().value(raw);
        let owner = value.value_type().clone();
        prop_assert!(!owner.is_category());
        let text = owner.serialize_value(&value).unwrap();
        prop_assert_eq!(owner.deserialize_value(&text).unwrap(), value);
    }

    #[test]
    fn number_values_round_trip_through_member(
        raw in prop_oneof![
            any::<i32>().prop_map(RawValue::Integer),
            proptest::num::f64::NORMAL.prop_map(|d| RawValue::Double(OrderedFloat(d))),
        ]
    ) {
        let value = number().value(raw);
        let owner = value.value_type().clone();
        prop_assert!(owner == integer() || owner == double());
        let text = owner.serialize_value(&value).unwrap();
        prop_assert_eq!(owner.deserialize_value(&text).unwrap(), value);
    }
}

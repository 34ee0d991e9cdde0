//! Built-in operators: logical, arithmetic, relational, string and general.

use ordered_float::OrderedFloat;

use super::base::{BaseOperator, Inputs};
use super::operator::OperatorRef;
use super::variable::Variable;
use crate::core::error::{EvalError, Result};
use crate::values::builtin::{any, boolean, double, integer, number, string};
use crate::values::{RawValue, Value, ValueTypeRef};

pub fn boolean_value(b: bool) -> Value {
    boolean().value(RawValue::Boolean(b))
}

pub fn integer_value(i: i32) -> Value {
    integer().value(RawValue::Integer(i))
}

pub fn double_value(d: f64) -> Value {
    double().value(RawValue::Double(OrderedFloat(d)))
}

pub fn string_value(s: impl Into<String>) -> Value {
    string().value(RawValue::String(s.into()))
}

// === LOGICAL ===

fn logical_unary(name: &str, symbol: &str, f: fn(bool) -> bool) -> OperatorRef {
    BaseOperator::new(name, symbol, vec![boolean()], boolean(), move |inputs| {
        Ok(boolean_value(f(inputs.boolean(0)?)))
    })
    .into_ref()
}

/// `short` is the value of the first input that decides the result alone
fn logical_binary(name: &str, symbol: &str, short: bool, negate: bool) -> OperatorRef {
    BaseOperator::new(
        name,
        symbol,
        vec![boolean(), boolean()],
        boolean(),
        move |inputs| {
            let first = inputs.boolean(0)?;
            let result = if first == short {
                short
            } else {
                inputs.boolean(1)?
            };
            Ok(boolean_value(result != negate))
        },
    )
    .into_ref()
}

// === ARITHMETIC ===

/// Integer when every input is an integer, double when any input is a
/// double. Inputs only known as `number` leave the result a `number`.
fn numeric_output(inputs: &[Variable]) -> ValueTypeRef {
    if inputs.iter().all(|v| v.value_type() == &integer()) {
        integer()
    } else if inputs.iter().any(|v| v.value_type() == &double()) {
        double()
    } else {
        number()
    }
}

fn arithmetic(
    name: &str,
    symbol: &str,
    int_op: fn(i32, i32) -> Option<i32>,
    double_op: fn(f64, f64) -> f64,
    rejects_zero_divisor: bool,
) -> OperatorRef {
    BaseOperator::new(
        name,
        symbol,
        vec![number(), number()],
        number(),
        move |inputs| {
            let a = inputs.value(0)?;
            let b = inputs.value(1)?;
            match (a.as_integer(), b.as_integer()) {
                (Some(x), Some(y)) => {
                    if rejects_zero_divisor && y == 0 {
                        return Err(inputs.domain_error("division by zero"));
                    }
                    int_op(x, y)
                        .map(integer_value)
                        .ok_or_else(|| inputs.domain_error("integer overflow"))
                }
                _ => {
                    let x = numeric(inputs, &a)?;
                    let y = numeric(inputs, &b)?;
                    if rejects_zero_divisor && y == 0.0 {
                        return Err(inputs.domain_error("division by zero"));
                    }
                    Ok(double_value(double_op(x, y)))
                }
            }
        },
    )
    .with_conditional_output(numeric_output)
    .into_ref()
}

fn numeric(inputs: &Inputs<'_>, value: &Value) -> Result<f64> {
    value
        .as_number()
        .ok_or_else(|| inputs.domain_error(format!("{} is not a number", value)))
}

fn modulus() -> OperatorRef {
    BaseOperator::new(
        "arithmetic.modulus",
        "%",
        vec![integer(), integer()],
        integer(),
        |inputs| {
            let a = inputs.integer(0)?;
            let b = inputs.integer(1)?;
            if b == 0 {
                return Err(inputs.domain_error("modulus by zero"));
            }
            a.checked_rem(b)
                .map(integer_value)
                .ok_or_else(|| inputs.domain_error("integer overflow"))
        },
    )
    .into_ref()
}

// === RELATIONAL ===

fn equality(name: &str, symbol: &str, negate: bool) -> OperatorRef {
    BaseOperator::new(name, symbol, vec![any(), any()], boolean(), move |inputs| {
        let equal = inputs.value(0)? == inputs.value(1)?;
        Ok(boolean_value(equal != negate))
    })
    .into_ref()
}

fn comparison(name: &str, symbol: &str, cmp: fn(f64, f64) -> bool) -> OperatorRef {
    BaseOperator::new(
        name,
        symbol,
        vec![number(), number()],
        boolean(),
        move |inputs| Ok(boolean_value(cmp(inputs.number(0)?, inputs.number(1)?))),
    )
    .into_ref()
}

// === STRING ===

fn length() -> OperatorRef {
    BaseOperator::new(
        "string.length",
        "len",
        vec![string()],
        integer(),
        |inputs| {
            let s = inputs.string(0)?;
            i32::try_from(s.chars().count())
                .map(integer_value)
                .map_err(|_| inputs.domain_error("string too long"))
        },
    )
    .into_ref()
}

fn concat() -> OperatorRef {
    BaseOperator::new(
        "string.concat",
        "+",
        vec![string(), string()],
        string(),
        |inputs| {
            let mut s = inputs.string(0)?;
            s.push_str(&inputs.string(1)?);
            Ok(string_value(s))
        },
    )
    .into_ref()
}

// === GENERAL ===

fn choice() -> OperatorRef {
    BaseOperator::new(
        "general.choice",
        "?",
        vec![boolean(), any(), any()],
        any(),
        |inputs| {
            if inputs.boolean(0)? {
                inputs.value(1)
            } else {
                inputs.value(2)
            }
        },
    )
    .with_type_validator(|operator, types| {
        if types[1] != types[2] {
            return Err(EvalError::TypeMismatch {
                operator: operator.to_string(),
                index: 2,
                expected: types[1].type_name().to_string(),
                got: types[2].type_name().to_string(),
            });
        }
        Ok(())
    })
    .with_conditional_output(|inputs| {
        inputs
            .get(1)
            .map_or_else(any, |v| v.value_type().clone())
    })
    .into_ref()
}

fn identity() -> OperatorRef {
    BaseOperator::new("general.identity", "id", vec![any()], any(), |inputs| {
        inputs.value(0)
    })
    .with_conditional_output(|inputs| {
        inputs
            .first()
            .map_or_else(any, |v| v.value_type().clone())
    })
    .into_ref()
}

/// Every built-in operator
pub fn operators() -> Vec<OperatorRef> {
    vec![
        logical_binary("logical.and", "&&", false, false),
        logical_binary("logical.or", "||", true, false),
        logical_binary("logical.nand", "!&&", false, true),
        logical_binary("logical.nor", "!||", true, true),
        logical_unary("logical.not", "!", |b| !b),
        arithmetic("arithmetic.addition", "+", i32::checked_add, |a, b| a + b, false),
        arithmetic("arithmetic.subtraction", "-", i32::checked_sub, |a, b| a - b, false),
        arithmetic("arithmetic.multiplication", "*", i32::checked_mul, |a, b| a * b, false),
        arithmetic("arithmetic.division", "/", i32::checked_div, |a, b| a / b, true),
        arithmetic("arithmetic.maximum", "max", |a, b| Some(a.max(b)), f64::max, false),
        arithmetic("arithmetic.minimum", "min", |a, b| Some(a.min(b)), f64::min, false),
        modulus(),
        equality("relational.equals", "==", false),
        equality("relational.notequals", "!=", true),
        comparison("relational.gt", ">", |a, b| a > b),
        comparison("relational.lt", "<", |a, b| a < b),
        comparison("relational.ge", ">=", |a, b| a >= b),
        comparison("relational.le", "<=", |a, b| a <= b),
        length(),
        concat(),
        choice(),
        identity(),
    ]
}

//! The operator contract and the arity/type checks every operator runs
//! before it computes anything.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::variable::Variable;
use crate::core::error::{EvalError, Result};
use crate::core::l10n::{L10nMessage, Localizer};
use crate::values::{Value, ValueTypeRef};

/// Shared, stateless operator handle
pub type OperatorRef = Arc<dyn Operator>;

/// A pure function over an ordered list of variables.
///
/// Operators are shared and stateless: they never own the variables they
/// are given and may be called concurrently.
pub trait Operator: Send + Sync + fmt::Debug {
    /// Short display token, e.g. `+`
    fn symbol(&self) -> String;

    /// Stable identifier of this operator
    fn unique_name(&self) -> &str;

    /// Translation key of the operator name
    fn name_key(&self) -> String;

    /// Translation key of the operator category
    fn category_key(&self) -> String;

    fn localized_name_full(&self, l10n: &Localizer) -> String;

    fn load_tooltip(&self, l10n: &Localizer, lines: &mut Vec<String>, append_optional_info: bool);

    fn input_types(&self) -> Vec<ValueTypeRef>;

    fn output_type(&self) -> ValueTypeRef;

    fn required_input_length(&self) -> usize;

    /// Output type for these concrete inputs. Must agree with the type of
    /// the value `evaluate` returns for them.
    fn conditional_output_type(&self, _inputs: &[Variable]) -> ValueTypeRef {
        self.output_type()
    }

    fn evaluate(&self, inputs: &[Variable]) -> Result<Value>;

    /// Value-free check of input types; `None` when they are acceptable
    fn validate_types(&self, input: &[ValueTypeRef]) -> Option<L10nMessage>;

    /// Equivalent operator with every lazy variable snapshotted
    fn materialize(self: Arc<Self>) -> Result<OperatorRef>;

    /// Name of the registry serializer for this operator kind
    fn serializer_id(&self) -> &str;

    fn as_any(&self) -> &dyn Any;
}

/// Fail unless exactly `expected` inputs were supplied
pub fn check_arity(operator: &str, expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(EvalError::Arity {
            operator: operator.to_string(),
            expected,
            got,
        });
    }
    Ok(())
}

/// Check `actual` against `declared`, arity first and then position by position
pub fn check_input_types(
    operator: &str,
    declared: &[ValueTypeRef],
    actual: &[ValueTypeRef],
) -> Result<()> {
    check_arity(operator, declared.len(), actual.len())?;
    for (index, (expected, got)) in declared.iter().zip(actual).enumerate() {
        if !expected.accepts(got) {
            return Err(EvalError::TypeMismatch {
                operator: operator.to_string(),
                index,
                expected: expected.type_name().to_string(),
                got: got.type_name().to_string(),
            });
        }
    }
    Ok(())
}

/// Declared types of a list of variables
pub fn variable_types(inputs: &[Variable]) -> Vec<ValueTypeRef> {
    inputs.iter().map(|v| v.value_type().clone()).collect()
}

/// Render a list of types as `a, b, c`
pub fn join_types(types: &[ValueTypeRef]) -> String {
    types
        .iter()
        .map(|t| t.type_name())
        .collect::<Vec<_>>()
        .join(", ")
}

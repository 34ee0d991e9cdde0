//! Partial application: an operator with its first input bound to a variable.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::operator::{Operator, OperatorRef};
use super::registry::{DeserializeContext, OperatorSerializer};
use super::variable::Variable;
use crate::core::error::{ConfigError, ConfigResult, EvalError, Result};
use crate::core::l10n::{L10nMessage, Localizer};
use crate::registry::Registries;
use crate::values::{Value, ValueTypeRef};

/// Serializer id of curried operators
pub const CURRY_SERIALIZER: &str = "curry";

/// An operator that is partially applied.
///
/// The base operator is shared; the same base may be curried many times
/// with different applied variables. Display text shows the *type* that
/// was curried in, evaluation uses its *value*.
pub struct CurriedOperator {
    base: OperatorRef,
    applied: Variable,
}

impl CurriedOperator {
    /// Bind the first input of `base`. Fails when `base` takes no inputs.
    pub fn new(base: OperatorRef, applied: Variable) -> ConfigResult<Self> {
        if base.required_input_length() == 0 {
            return Err(ConfigError::NullaryCurry(base.unique_name().to_string()));
        }
        Ok(Self { base, applied })
    }

    pub fn curry(base: OperatorRef, applied: Variable) -> ConfigResult<OperatorRef> {
        Ok(Arc::new(Self::new(base, applied)?))
    }

    pub fn base_operator(&self) -> &OperatorRef {
        &self.base
    }

    pub fn applied_variable(&self) -> &Variable {
        &self.applied
    }

    fn applied_symbol(&self) -> &str {
        self.applied.value_type().type_name()
    }

    /// Prepend `first` to `partial`, never producing more inputs than the
    /// base operator takes. Surplus trailing inputs are dropped; the base
    /// still checks the arity of what remains.
    fn derive_full_input<T: Clone>(&self, first: T, partial: &[T]) -> Vec<T> {
        let base_len = self.base.required_input_length();
        let len = base_len.min(partial.len() + 1);
        if partial.len() + 1 > base_len {
            tracing::debug!(
                "Clamping {} curried inputs to {} for {}",
                partial.len(),
                base_len - 1,
                self.base.unique_name()
            );
        }

        let mut full = Vec::with_capacity(len);
        full.push(first);
        full.extend_from_slice(&partial[..len - 1]);
        full
    }

    fn derive_full_input_variables(&self, partial: &[Variable]) -> Vec<Variable> {
        self.derive_full_input(self.applied.clone(), partial)
    }

    fn derive_full_input_types(&self, partial: &[ValueTypeRef]) -> Vec<ValueTypeRef> {
        self.derive_full_input(self.applied.value_type().clone(), partial)
    }
}

impl fmt::Debug for CurriedOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurriedOperator")
            .field("base", &self.base)
            .field("applied", &self.applied)
            .finish()
    }
}

impl Operator for CurriedOperator {
    fn symbol(&self) -> String {
        format!("{} [{}]", self.base.symbol(), self.applied_symbol())
    }

    fn unique_name(&self) -> &str {
        "curried_operator"
    }

    fn name_key(&self) -> String {
        self.base.name_key()
    }

    fn category_key(&self) -> String {
        self.base.category_key()
    }

    fn localized_name_full(&self, l10n: &Localizer) -> String {
        l10n.render(
            &L10nMessage::new("operator.applied.name")
                .with_arg(self.base.localized_name_full(l10n))
                .with_arg(self.applied_symbol()),
        )
    }

    fn load_tooltip(&self, l10n: &Localizer, lines: &mut Vec<String>, append_optional_info: bool) {
        self.base.load_tooltip(l10n, lines, append_optional_info);
        lines.push(l10n.render(
            &L10nMessage::new("operator.applied.type").with_arg(self.applied_symbol()),
        ));
    }

    fn input_types(&self) -> Vec<ValueTypeRef> {
        self.base.input_types().into_iter().skip(1).collect()
    }

    fn output_type(&self) -> ValueTypeRef {
        self.base.output_type()
    }

    fn required_input_length(&self) -> usize {
        self.base.required_input_length() - 1
    }

    fn conditional_output_type(&self, inputs: &[Variable]) -> ValueTypeRef {
        self.base
            .conditional_output_type(&self.derive_full_input_variables(inputs))
    }

    fn evaluate(&self, inputs: &[Variable]) -> Result<Value> {
        self.base.evaluate(&self.derive_full_input_variables(inputs))
    }

    fn validate_types(&self, input: &[ValueTypeRef]) -> Option<L10nMessage> {
        self.base.validate_types(&self.derive_full_input_types(input))
    }

    fn materialize(self: Arc<Self>) -> Result<OperatorRef> {
        Ok(Arc::new(CurriedOperator {
            base: self.base.clone().materialize()?,
            applied: self.applied.materialize()?,
        }))
    }

    fn serializer_id(&self) -> &str {
        CURRY_SERIALIZER
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Persisted form of a curried operator
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct CurriedRecord {
    value_type: String,
    value: String,
    base_operator: String,
}

/// Registry entry persisting `CurriedOperator`s
#[derive(Debug, Default)]
pub struct CurriedSerializer;

impl OperatorSerializer for CurriedSerializer {
    fn unique_name(&self) -> &str {
        CURRY_SERIALIZER
    }

    fn serialize(&self, operator: &dyn Operator, registries: &Registries) -> Result<String> {
        let curried = operator
            .as_any()
            .downcast_ref::<CurriedOperator>()
            .ok_or_else(|| {
                EvalError::domain(operator.unique_name(), "not a curried operator")
            })?;

        // Persistence must not fail because a live source is offline
        let value = match curried.applied.value() {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(
                    "Applied variable of {} unavailable ({}), persisting default value",
                    curried.base.unique_name(),
                    e
                );
                curried.applied.value_type().default_value()
            }
        };

        let value_type = value.value_type();
        let record = CurriedRecord {
            value_type: value_type.type_name().to_string(),
            value: value_type.serialize_value(&value)?,
            base_operator: registries.serialize_operator(curried.base.as_ref())?,
        };
        Ok(serde_json::to_string(&record)?)
    }

    fn deserialize(&self, text: &str, ctx: &DeserializeContext<'_>) -> Result<OperatorRef> {
        let record: CurriedRecord = serde_json::from_str(text)?;
        let value_type = ctx.value_types().get_value_type(&record.value_type)?;
        let value = value_type.deserialize_value(&record.value)?;
        let base = ctx.deserialize_nested(&record.base_operator)?;

        CurriedOperator::curry(base, Variable::captured(value))
            .map_err(|e| EvalError::Parse(e.to_string()))
    }
}

//! Function-backed operators with a fixed signature.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::operator::{check_input_types, join_types, variable_types, Operator, OperatorRef};
use super::variable::Variable;
use crate::core::error::{EvalError, Result};
use crate::core::l10n::{L10nMessage, Localizer};
use crate::values::{Value, ValueTypeRef};

/// Computation of a base operator over already type-checked inputs
pub type OperatorFunction = Arc<dyn Fn(&Inputs<'_>) -> Result<Value> + Send + Sync>;

/// Output type derived from the concrete inputs
pub type OutputTypeFunction = Arc<dyn Fn(&[Variable]) -> ValueTypeRef + Send + Sync>;

/// Extra type rule run after the declared input types matched
pub type TypeValidator = Arc<dyn Fn(&str, &[ValueTypeRef]) -> Result<()> + Send + Sync>;

/// Serializer id of base operators
pub const BASIC_SERIALIZER: &str = "basic";

/// Typed access to the inputs of one evaluation.
///
/// Variables are only read when a value is requested, so an operator that
/// short-circuits never evaluates the inputs it skips.
pub struct Inputs<'a> {
    operator: &'a str,
    variables: &'a [Variable],
}

impl<'a> Inputs<'a> {
    pub(crate) fn new(operator: &'a str, variables: &'a [Variable]) -> Self {
        Self {
            operator,
            variables,
        }
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn operator(&self) -> &str {
        self.operator
    }

    /// Input `index`; out of range is an arity error, never a panic
    pub fn variable(&self, index: usize) -> Result<&Variable> {
        self.variables.get(index).ok_or_else(|| EvalError::Arity {
            operator: self.operator.to_string(),
            expected: index + 1,
            got: self.variables.len(),
        })
    }

    pub fn value(&self, index: usize) -> Result<Value> {
        self.variable(index)?.value()
    }

    pub fn boolean(&self, index: usize) -> Result<bool> {
        let value = self.value(index)?;
        value
            .as_boolean()
            .ok_or_else(|| self.mismatch(index, "boolean", &value))
    }

    pub fn integer(&self, index: usize) -> Result<i32> {
        let value = self.value(index)?;
        value
            .as_integer()
            .ok_or_else(|| self.mismatch(index, "integer", &value))
    }

    pub fn number(&self, index: usize) -> Result<f64> {
        let value = self.value(index)?;
        value
            .as_number()
            .ok_or_else(|| self.mismatch(index, "number", &value))
    }

    pub fn string(&self, index: usize) -> Result<String> {
        let value = self.value(index)?;
        match value.as_str() {
            Some(s) => Ok(s.to_string()),
            None => Err(self.mismatch(index, "string", &value)),
        }
    }

    /// Domain payload of input `index`
    pub fn object<T: Clone + 'static>(&self, index: usize, expected: &str) -> Result<T> {
        let value = self.value(index)?;
        match value.as_object::<T>() {
            Some(payload) => Ok(payload.clone()),
            None => Err(self.mismatch(index, expected, &value)),
        }
    }

    pub fn domain_error(&self, reason: impl Into<String>) -> EvalError {
        EvalError::domain(self.operator, reason)
    }

    fn mismatch(&self, index: usize, expected: &str, value: &Value) -> EvalError {
        EvalError::TypeMismatch {
            operator: self.operator.to_string(),
            index,
            expected: expected.to_string(),
            got: value.value_type().type_name().to_string(),
        }
    }
}

/// An operator defined by a signature and a function
pub struct BaseOperator {
    unique_name: String,
    symbol: String,
    category: String,
    input_types: Vec<ValueTypeRef>,
    output_type: ValueTypeRef,
    function: OperatorFunction,
    output_type_fn: Option<OutputTypeFunction>,
    type_validator: Option<TypeValidator>,
}

impl BaseOperator {
    /// `unique_name` is `<category>.<name>`, e.g. `arithmetic.addition`
    pub fn new<F>(
        unique_name: &str,
        symbol: &str,
        input_types: Vec<ValueTypeRef>,
        output_type: ValueTypeRef,
        function: F,
    ) -> Self
    where
        F: Fn(&Inputs<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        let category = unique_name
            .split_once('.')
            .map_or(unique_name, |(category, _)| category)
            .to_string();
        Self {
            unique_name: unique_name.to_string(),
            symbol: symbol.to_string(),
            category,
            input_types,
            output_type,
            function: Arc::new(function),
            output_type_fn: None,
            type_validator: None,
        }
    }

    /// Derive the output type from the concrete inputs
    pub fn with_conditional_output<F>(mut self, output_type_fn: F) -> Self
    where
        F: Fn(&[Variable]) -> ValueTypeRef + Send + Sync + 'static,
    {
        self.output_type_fn = Some(Arc::new(output_type_fn));
        self
    }

    /// Add a family-specific rule over the input types, e.g. "both branches
    /// have the same type"
    pub fn with_type_validator<F>(mut self, type_validator: F) -> Self
    where
        F: Fn(&str, &[ValueTypeRef]) -> Result<()> + Send + Sync + 'static,
    {
        self.type_validator = Some(Arc::new(type_validator));
        self
    }

    fn check_types(&self, input: &[ValueTypeRef]) -> Result<()> {
        check_input_types(&self.unique_name, &self.input_types, input)?;
        match &self.type_validator {
            Some(type_validator) => type_validator(&self.unique_name, input),
            None => Ok(()),
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn into_ref(self) -> OperatorRef {
        Arc::new(self)
    }
}

impl fmt::Debug for BaseOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseOperator")
            .field("unique_name", &self.unique_name)
            .field("symbol", &self.symbol)
            .field("input_types", &self.input_types)
            .field("output_type", &self.output_type)
            .finish()
    }
}

impl Operator for BaseOperator {
    fn symbol(&self) -> String {
        self.symbol.clone()
    }

    fn unique_name(&self) -> &str {
        &self.unique_name
    }

    fn name_key(&self) -> String {
        format!("operator.{}", self.unique_name)
    }

    fn category_key(&self) -> String {
        format!("operator.category.{}", self.category)
    }

    fn localized_name_full(&self, l10n: &Localizer) -> String {
        l10n.localize(&self.name_key())
    }

    fn load_tooltip(&self, l10n: &Localizer, lines: &mut Vec<String>, append_optional_info: bool) {
        lines.push(l10n.render(
            &L10nMessage::new("operator.tooltip.operator_name")
                .with_arg(self.localized_name_full(l10n))
                .with_arg(&self.symbol),
        ));
        lines.push(l10n.render(
            &L10nMessage::new("operator.tooltip.input_types").with_arg(join_types(&self.input_types)),
        ));
        lines.push(l10n.render(
            &L10nMessage::new("operator.tooltip.output_type").with_arg(&self.output_type),
        ));
        if append_optional_info {
            lines.push(l10n.render(
                &L10nMessage::new("operator.tooltip.category")
                    .with_arg(l10n.localize(&self.category_key())),
            ));
            lines.push(l10n.render(
                &L10nMessage::new("operator.tooltip.unique_name").with_arg(&self.unique_name),
            ));
        }
    }

    fn input_types(&self) -> Vec<ValueTypeRef> {
        self.input_types.clone()
    }

    fn output_type(&self) -> ValueTypeRef {
        self.output_type.clone()
    }

    fn required_input_length(&self) -> usize {
        self.input_types.len()
    }

    fn conditional_output_type(&self, inputs: &[Variable]) -> ValueTypeRef {
        match &self.output_type_fn {
            Some(output_type_fn) => output_type_fn(inputs),
            None => self.output_type.clone(),
        }
    }

    fn evaluate(&self, inputs: &[Variable]) -> Result<Value> {
        self.check_types(&variable_types(inputs))?;
        (self.function)(&Inputs::new(&self.unique_name, inputs))
    }

    fn validate_types(&self, input: &[ValueTypeRef]) -> Option<L10nMessage> {
        self.check_types(input)
            .err()
            .map(|e| e.message())
    }

    fn materialize(self: Arc<Self>) -> Result<OperatorRef> {
        Ok(self)
    }

    fn serializer_id(&self) -> &str {
        BASIC_SERIALIZER
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

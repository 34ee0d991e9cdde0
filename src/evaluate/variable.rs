//! Variables: typed, possibly-failing sources of a single value.

use std::fmt;
use std::sync::Arc;

use super::operator::OperatorRef;
use crate::core::error::{EvalError, Result};
use crate::values::{Value, ValueTypeRef};

/// Recompute capability of a live variable
pub type ValueSource = Arc<dyn Fn() -> Result<Value> + Send + Sync>;

/// A typed binding that yields a `Value` on demand.
///
/// `Live` recomputes on every read and may fail transiently; `Captured`
/// holds a fixed value. `materialize` turns the former into the latter.
#[derive(Clone)]
pub enum Variable {
    Live {
        value_type: ValueTypeRef,
        source: ValueSource,
    },
    Captured(Value),
}

impl Variable {
    pub fn live<F>(value_type: ValueTypeRef, source: F) -> Self
    where
        F: Fn() -> Result<Value> + Send + Sync + 'static,
    {
        Variable::Live {
            value_type,
            source: Arc::new(source),
        }
    }

    pub fn captured(value: Value) -> Self {
        Variable::Captured(value)
    }

    /// A live variable evaluating `operator` over `inputs` on every read.
    ///
    /// Its declared type is the operator's conditional output type for
    /// these inputs.
    pub fn from_operator(operator: OperatorRef, inputs: Vec<Variable>) -> Self {
        let value_type = operator.conditional_output_type(&inputs);
        Variable::live(value_type, move || operator.evaluate(&inputs))
    }

    pub fn value_type(&self) -> &ValueTypeRef {
        match self {
            Variable::Live { value_type, .. } => value_type,
            Variable::Captured(value) => value.value_type(),
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Variable::Live { .. })
    }

    /// Produce the current value, checking it against the declared type.
    /// A live variable declared with a category may yield any member.
    pub fn value(&self) -> Result<Value> {
        match self {
            Variable::Live { value_type, source } => {
                let value = source()?;
                if !value_type.accepts(value.value_type()) {
                    return Err(EvalError::TypeMismatch {
                        operator: "variable".to_string(),
                        index: 0,
                        expected: value_type.type_name().to_string(),
                        got: value.value_type().type_name().to_string(),
                    });
                }
                Ok(value)
            }
            Variable::Captured(value) => Ok(value.clone()),
        }
    }

    /// Snapshot the current value into a captured variable
    pub fn materialize(&self) -> Result<Variable> {
        match self {
            Variable::Live { .. } => Ok(Variable::Captured(self.value()?)),
            Variable::Captured(_) => Ok(self.clone()),
        }
    }
}

impl From<Value> for Variable {
    fn from(value: Value) -> Self {
        Variable::Captured(value)
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variable::Live { value_type, .. } => write!(f, "Live({})", value_type),
            Variable::Captured(value) => write!(f, "Captured({:?})", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use crate::values::{builtin, RawValue};
    use std::sync::atomic::{AtomicI32, Ordering};

    #[test]
    fn test_captured_returns_fixed_value() {
        let value = builtin::integer().value(RawValue::Integer(7));
        let var = Variable::captured(value.clone());
        assert_eq!(var.value().unwrap(), value);
        assert_eq!(var.value_type(), &builtin::integer());
        assert!(!var.is_live());
    }

    #[test]
    fn test_live_recomputes() {
        let counter = Arc::new(AtomicI32::new(0));
        let source = counter.clone();
        let var = Variable::live(builtin::integer(), move || {
            let n = source.fetch_add(1, Ordering::SeqCst);
            Ok(builtin::integer().value(RawValue::Integer(n)))
        });

        assert_eq!(var.value().unwrap().as_integer(), Some(0));
        assert_eq!(var.value().unwrap().as_integer(), Some(1));
    }

    #[test]
    fn test_live_type_disagreement_rejected() {
        let var = Variable::live(builtin::integer(), || {
            Ok(builtin::boolean().value(RawValue::Boolean(true)))
        });
        assert_eq!(var.value().unwrap_err().kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_live_category_yields_member() {
        let var = Variable::live(builtin::number(), || {
            Ok(crate::evaluate::builtin::double_value(2.5))
        });
        assert_eq!(var.value().unwrap().value_type(), &builtin::double());

        let var = Variable::live(builtin::number(), || Ok(builtin::string().default_value()));
        assert_eq!(var.value().unwrap_err().kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_live_failure_is_transient() {
        let available = Arc::new(AtomicI32::new(0));
        let flag = available.clone();
        let var = Variable::live(builtin::boolean(), move || {
            if flag.load(Ordering::SeqCst) == 0 {
                Err(EvalError::VariableUnavailable {
                    value_type: "boolean".into(),
                    reason: "source offline".into(),
                })
            } else {
                Ok(builtin::boolean().value(RawValue::Boolean(true)))
            }
        });

        assert!(var.value().is_err());
        available.store(1, Ordering::SeqCst);
        assert_eq!(var.value().unwrap().as_boolean(), Some(true));
    }

    #[test]
    fn test_materialize_decouples_from_source() {
        let counter = Arc::new(AtomicI32::new(10));
        let source = counter.clone();
        let var = Variable::live(builtin::integer(), move || {
            Ok(builtin::integer().value(RawValue::Integer(source.load(Ordering::SeqCst))))
        });

        let snapshot = var.materialize().unwrap();
        counter.store(20, Ordering::SeqCst);

        assert!(!snapshot.is_live());
        assert_eq!(snapshot.value().unwrap().as_integer(), Some(10));
        assert_eq!(var.value().unwrap().as_integer(), Some(20));
    }
}

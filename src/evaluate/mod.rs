//! Operator evaluation
//!
//! Operators are pure, arity-fixed functions over variables. Base operators
//! carry a signature and a function; curried operators bind the first input
//! of another operator. The operator registry persists any composition of
//! them through per-kind serializers.

pub mod base;
pub mod builtin;
pub mod curried;
pub mod operator;
pub mod registry;
pub mod variable;

pub use base::{BaseOperator, Inputs};
pub use curried::{CurriedOperator, CurriedSerializer};
pub use operator::{Operator, OperatorRef};
pub use registry::{BasicSerializer, DeserializeContext, OperatorRegistry, OperatorSerializer};
pub use variable::Variable;

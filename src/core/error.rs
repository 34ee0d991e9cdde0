use thiserror::Error;

use crate::core::l10n::L10nMessage;

/// Coarse classification of an evaluation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Arity,
    TypeMismatch,
    Domain,
    Lookup,
    Parse,
    VariableUnavailable,
}

/// What kind of identifier failed to resolve during deserialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    ValueType,
    Operator,
    Serializer,
}

impl std::fmt::Display for LookupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupKind::ValueType => write!(f, "value type"),
            LookupKind::Operator => write!(f, "operator"),
            LookupKind::Serializer => write!(f, "operator serializer"),
        }
    }
}

/// The single failure type of evaluation, validation and (de)serialization.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Operator {operator} expected {expected} inputs, got {got}")]
    Arity {
        operator: String,
        expected: usize,
        got: usize,
    },

    #[error("Operator {operator} expected {expected} at input {index}, got {got}")]
    TypeMismatch {
        operator: String,
        index: usize,
        expected: String,
        got: String,
    },

    #[error("Operator {operator} rejected its inputs: {reason}")]
    Domain { operator: String, reason: String },

    #[error("Unknown {kind} identifier: {name}")]
    Lookup { kind: LookupKind, name: String },

    #[error("Malformed persisted text: {0}")]
    Parse(String),

    #[error("Variable of type {value_type} is unavailable: {reason}")]
    VariableUnavailable { value_type: String, reason: String },
}

impl EvalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EvalError::Arity { .. } => ErrorKind::Arity,
            EvalError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            EvalError::Domain { .. } => ErrorKind::Domain,
            EvalError::Lookup { .. } => ErrorKind::Lookup,
            EvalError::Parse(_) => ErrorKind::Parse,
            EvalError::VariableUnavailable { .. } => ErrorKind::VariableUnavailable,
        }
    }

    pub fn domain(operator: impl Into<String>, reason: impl Into<String>) -> Self {
        EvalError::Domain {
            operator: operator.into(),
            reason: reason.into(),
        }
    }

    pub fn lookup(kind: LookupKind, name: impl Into<String>) -> Self {
        EvalError::Lookup {
            kind,
            name: name.into(),
        }
    }

    /// Translatable form of this error, for hosts rendering other locales
    pub fn message(&self) -> L10nMessage {
        match self {
            EvalError::Arity {
                operator,
                expected,
                got,
            } => L10nMessage::new("error.arity")
                .with_arg(operator)
                .with_arg(expected)
                .with_arg(got),
            EvalError::TypeMismatch {
                operator,
                index,
                expected,
                got,
            } => L10nMessage::new("error.type_mismatch")
                .with_arg(operator)
                .with_arg(expected)
                .with_arg(index)
                .with_arg(got),
            EvalError::Domain { operator, reason } => L10nMessage::new("error.domain")
                .with_arg(operator)
                .with_arg(reason),
            EvalError::Lookup { kind, name } => L10nMessage::new("error.lookup")
                .with_arg(kind)
                .with_arg(name),
            EvalError::Parse(reason) => L10nMessage::new("error.parse").with_arg(reason),
            EvalError::VariableUnavailable { value_type, reason } => {
                L10nMessage::new("error.variable").with_arg(value_type).with_arg(reason)
            }
        }
    }
}

impl From<serde_json::Error> for EvalError {
    fn from(e: serde_json::Error) -> Self {
        EvalError::Parse(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EvalError>;

/// Startup failures while assembling registries or loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Value type already registered: {0}")]
    DuplicateValueType(String),

    #[error("Operator already registered: {0}")]
    DuplicateOperator(String),

    #[error("Operator serializer already registered: {0}")]
    DuplicateSerializer(String),

    #[error("Operator {operator} uses unregistered value type {value_type}")]
    UnregisteredType { operator: String, value_type: String },

    #[error("Cannot curry operator {0}: it takes no inputs")]
    NullaryCurry(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

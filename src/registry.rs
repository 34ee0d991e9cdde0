//! Composition root: builds the immutable value-type and operator registries
//! and runs the persisted-operator protocol against them.
//!
//! Registries are assembled once through `RegistryBuilder` and never mutated
//! afterwards, so a built `Registries` can be shared across threads freely.

use std::sync::Arc;

use crate::core::config::EngineConfig;
use crate::core::error::{ConfigError, ConfigResult, EvalError, Result};
use crate::core::l10n::Localizer;
use crate::evaluate::builtin as builtin_operators;
use crate::evaluate::curried::CurriedSerializer;
use crate::evaluate::operator::{Operator, OperatorRef};
use crate::evaluate::registry::{
    BasicSerializer, DeserializeContext, Envelope, OperatorRegistry, OperatorSerializer,
};
use crate::values::builtin as builtin_types;
use crate::values::{ValueTypeRef, ValueTypeRegistry};

/// One row of the operator display index
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub unique_name: String,
    pub symbol: String,
    pub name: String,
    pub category: String,
    pub tooltip: Vec<String>,
    pub persisted: String,
}

/// Immutable value-type and operator registries plus engine configuration
pub struct Registries {
    config: EngineConfig,
    value_types: ValueTypeRegistry,
    operators: OperatorRegistry,
}

impl Registries {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Registries holding every built-in type, operator and serializer
    pub fn with_builtins(config: EngineConfig) -> ConfigResult<Self> {
        RegistryBuilder::new()
            .with_config(config)
            .with_builtins()?
            .build()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn value_types(&self) -> &ValueTypeRegistry {
        &self.value_types
    }

    pub fn operators(&self) -> &OperatorRegistry {
        &self.operators
    }

    /// Persist `operator` through the serializer registered for its kind
    pub fn serialize_operator(&self, operator: &dyn Operator) -> Result<String> {
        let name = operator.serializer_id();
        let serializer = self.operators.serializer(name)?;
        let envelope = Envelope {
            serializer: name.to_string(),
            value: serializer.serialize(operator, self)?,
        };
        Ok(serde_json::to_string(&envelope)?)
    }

    /// Read back an operator persisted by `serialize_operator`
    pub fn deserialize_operator(&self, text: &str) -> Result<OperatorRef> {
        self.deserialize_at(text, 0).map_err(|e| {
            tracing::debug!("Failed to deserialize operator: {}", e);
            e
        })
    }

    pub(crate) fn deserialize_at(&self, text: &str, depth: usize) -> Result<OperatorRef> {
        if depth > self.config.max_nesting_depth {
            return Err(EvalError::Parse(format!(
                "operator nesting exceeds {} levels",
                self.config.max_nesting_depth
            )));
        }
        if text.len() > self.config.max_persisted_len {
            return Err(EvalError::Parse(format!(
                "persisted operator is {} bytes, limit is {}",
                text.len(),
                self.config.max_persisted_len
            )));
        }

        let envelope: Envelope = serde_json::from_str(text)?;
        let serializer = self.operators.serializer(&envelope.serializer)?;
        serializer.deserialize(&envelope.value, &DeserializeContext::new(self, depth))
    }

    /// Best-effort display index of every registered operator, sorted by
    /// unique name. Entries that cannot be persisted are skipped.
    pub fn catalog(&self, l10n: &Localizer) -> Vec<CatalogEntry> {
        let mut operators: Vec<&OperatorRef> = self.operators.operators().collect();
        operators.sort_by(|a, b| a.unique_name().cmp(b.unique_name()));

        let mut entries = Vec::with_capacity(operators.len());
        for operator in operators {
            let persisted = match self.serialize_operator(operator.as_ref()) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(
                        "Skipping {} in operator catalog: {}",
                        operator.unique_name(),
                        e
                    );
                    continue;
                }
            };

            let mut tooltip = Vec::new();
            operator.load_tooltip(l10n, &mut tooltip, true);
            entries.push(CatalogEntry {
                unique_name: operator.unique_name().to_string(),
                symbol: operator.symbol(),
                name: operator.localized_name_full(l10n),
                category: l10n.localize(&operator.category_key()),
                tooltip,
                persisted,
            });
        }
        entries
    }
}

/// Single-writer startup step producing `Registries`
pub struct RegistryBuilder {
    config: EngineConfig,
    value_types: ValueTypeRegistry,
    operators: OperatorRegistry,
    serializers: Vec<Arc<dyn OperatorSerializer>>,
}

impl RegistryBuilder {
    /// An empty builder with the basic and curry serializers
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            value_types: ValueTypeRegistry::new(),
            operators: OperatorRegistry::new(),
            serializers: vec![Arc::new(BasicSerializer), Arc::new(CurriedSerializer)],
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_builtin_value_types(mut self) -> ConfigResult<Self> {
        builtin_types::register_value_types(&mut self.value_types)?;
        Ok(self)
    }

    pub fn with_builtins(self) -> ConfigResult<Self> {
        let mut builder = self.with_builtin_value_types()?;
        for operator in builtin_operators::operators() {
            builder.operators.register_operator(operator)?;
        }
        Ok(builder)
    }

    pub fn register_value_type(mut self, value_type: ValueTypeRef) -> ConfigResult<Self> {
        self.value_types.register(value_type)?;
        Ok(self)
    }

    pub fn register_operator(mut self, operator: OperatorRef) -> ConfigResult<Self> {
        self.operators.register_operator(operator)?;
        Ok(self)
    }

    pub fn register_serializer(
        mut self,
        serializer: Arc<dyn OperatorSerializer>,
    ) -> ConfigResult<Self> {
        let name = serializer.unique_name();
        if self.serializers.iter().any(|s| s.unique_name() == name) {
            return Err(ConfigError::DuplicateSerializer(name.to_string()));
        }
        self.serializers.push(serializer);
        Ok(self)
    }

    /// Check every operator signature against the registered types and
    /// freeze the registries
    pub fn build(self) -> ConfigResult<Registries> {
        self.config.validate()?;

        let mut operators = self.operators;
        for serializer in self.serializers {
            operators.register_serializer(serializer)?;
        }

        for operator in operators.operators() {
            let signature = operator
                .input_types()
                .into_iter()
                .chain(std::iter::once(operator.output_type()));
            for value_type in signature {
                if !self.value_types.contains(&value_type) {
                    return Err(ConfigError::UnregisteredType {
                        operator: operator.unique_name().to_string(),
                        value_type: value_type.type_name().to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "Built registries: {} value types, {} operators, {} serializers",
            self.value_types.len(),
            operators.len(),
            operators.serializer_names().count()
        );

        Ok(Registries {
            config: self.config,
            value_types: self.value_types,
            operators,
        })
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

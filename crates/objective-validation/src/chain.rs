//! # Composition
//!
//! [`Chain`] runs validators in sequence, each receiving the previous
//! output; the first failure ends the chain. [`FieldValue`] runs another
//! field's full deserialize pipeline as one step, so a field type can be
//! reused as a converter.

use std::fmt;
use std::sync::Arc;

use objective_core::{Environment, Invalid, Node, NodeType, SchemaError, Validator, Value};

/// Runs validators one after another.
#[derive(Clone, Default)]
pub struct Chain {
    steps: Vec<Arc<dyn Validator>>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step.
    pub fn then(mut self, step: impl Validator + 'static) -> Self {
        self.steps.push(Arc::new(step));
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Validator for Chain {
    fn validate(&self, node: &Node, value: Value, env: &Environment) -> Result<Value, Invalid> {
        self.steps
            .iter()
            .try_fold(value, |value, step| step.validate(node, value, env))
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain").field("steps", &self.steps.len()).finish()
    }
}

/// Deserializes the value through a node of another type.
pub struct FieldValue {
    field: Node,
}

impl FieldValue {
    /// # Errors
    ///
    /// Fails when `field_type` cannot be instantiated.
    pub fn new(field_type: &NodeType) -> Result<Self, SchemaError> {
        Ok(Self {
            field: field_type.instantiate()?,
        })
    }

    pub fn field(&self) -> &Node {
        &self.field
    }
}

impl Validator for FieldValue {
    fn validate(&self, node: &Node, value: Value, env: &Environment) -> Result<Value, Invalid> {
        self.field.deserialize_with(value, env).map_err(|invalid| {
            tracing::debug!(
                node = %node.display_name(),
                field = self.field.type_name(),
                "delegated field rejected value"
            );
            invalid.reattach(node)
        })
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldValue")
            .field("field", &self.field.type_name())
            .finish()
    }
}

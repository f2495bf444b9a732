//! # Field Traversal Pipeline
//!
//! Every field runs the same fixed pipeline, implemented once on [`Node`]:
//!
//! 1. [`Node::resolve_value`]: apply the missing policy to `Undefined`.
//! 2. [`Node::coerce`]: the kind-specific conversion of [`FieldKind`].
//! 3. The validator, if any. Bare failures from steps 2 and 3 are attached
//!    to the field.
//!
//! Serialization runs steps 1 and 2 with [`FieldKind::serialize`] and never
//! runs the validator: serialized data comes from the application and is
//! assumed valid.
//!
//! Concrete kinds implement only their own conversion. A kind that refines
//! another one calls the inner kind's method directly, so a field's
//! validator never runs twice.

use crate::environment::Environment;
use crate::error::Invalid;
use crate::missing::Outcome;
use crate::node::Node;
use crate::value::Value;

/// The kind-specific conversion step of a field.
///
/// Both methods default to passing the value through unchanged.
pub trait FieldKind: Send + Sync {
    /// Short name used in diagnostics.
    fn kind_name(&self) -> &'static str;

    /// Converts an input value into its application form.
    fn deserialize(&self, node: &Node, value: Value, env: &Environment) -> Result<Value, Invalid> {
        let _ = (node, env);
        Ok(value)
    }

    /// Converts an application value into its transportable form.
    fn serialize(&self, node: &Node, value: Value, env: &Environment) -> Result<Value, Invalid> {
        let _ = (node, env);
        Ok(value)
    }
}

/// The generic field: accepts any value as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct Field;

impl FieldKind for Field {
    fn kind_name(&self) -> &'static str {
        "Field"
    }
}

impl Node {
    /// Applies the missing policy when `value` is `Undefined`.
    pub fn resolve_value(&self, value: Value, env: &Environment) -> Result<Outcome, Invalid> {
        if value.is_undefined() {
            self.missing().resolve(self, env)
        } else {
            Ok(Outcome::Value(value))
        }
    }

    fn not_a_field(&self, value: Value) -> Invalid {
        let message = format!("`{}` is a plain node, not a field", self.type_name());
        Invalid::value(self, value).with_message(message)
    }

    /// Runs only the kind-specific deserialization step.
    pub fn coerce(&self, value: Value, env: &Environment) -> Result<Value, Invalid> {
        match self.node_type().kind() {
            Some(kind) => kind.deserialize(self, value, env),
            None => Err(self.not_a_field(value)),
        }
    }

    /// Runs only the kind-specific serialization step.
    pub fn render(&self, value: Value, env: &Environment) -> Result<Value, Invalid> {
        match self.node_type().kind() {
            Some(kind) => kind.serialize(self, value, env),
            None => Err(self.not_a_field(value)),
        }
    }

    /// Full deserialize pipeline, reporting omission explicitly.
    pub fn deserialize_outcome(&self, value: Value, env: &Environment) -> Result<Outcome, Invalid> {
        let value = match self.resolve_value(value, env)? {
            Outcome::Value(value) => value,
            Outcome::Omit => return Ok(Outcome::Omit),
        };

        let input = value.clone();
        let value = self
            .coerce(value, env)
            .map_err(|invalid| invalid.normalize(self, &input))?;

        let value = match self.validator() {
            Some(validator) => {
                let input = value.clone();
                validator
                    .validate(self, value, env)
                    .map_err(|invalid| invalid.normalize(self, &input))?
            }
            None => value,
        };

        Ok(Outcome::Value(value))
    }

    /// Full serialize pipeline, reporting omission explicitly.
    pub fn serialize_outcome(&self, value: Value, env: &Environment) -> Result<Outcome, Invalid> {
        let value = match self.resolve_value(value, env)? {
            Outcome::Value(value) => value,
            Outcome::Omit => return Ok(Outcome::Omit),
        };

        let input = value.clone();
        self.render(value, env)
            .map(Outcome::Value)
            .map_err(|invalid| invalid.normalize(self, &input))
    }

    /// Deserializes `value` with an empty environment.
    ///
    /// A top-level value that is ignored as missing yields `Undefined`.
    pub fn deserialize(&self, value: impl Into<Value>) -> Result<Value, Invalid> {
        self.deserialize_with(value, &Environment::default())
    }

    /// Deserializes `value` within `env`.
    pub fn deserialize_with(&self, value: impl Into<Value>, env: &Environment) -> Result<Value, Invalid> {
        self.deserialize_outcome(value.into(), env).map(Outcome::into_value)
    }

    /// Serializes `value` with an empty environment.
    pub fn serialize(&self, value: impl Into<Value>) -> Result<Value, Invalid> {
        self.serialize_with(value, &Environment::default())
    }

    /// Serializes `value` within `env`.
    pub fn serialize_with(&self, value: impl Into<Value>, env: &Environment) -> Result<Value, Invalid> {
        self.serialize_outcome(value.into(), env).map(Outcome::into_value)
    }
}

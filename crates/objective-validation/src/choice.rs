//! # Membership Validators
//!
//! [`OneOf`] accepts only listed values, [`NoneOf`] rejects listed values.
//! Both report a bare failure, which the pipeline attaches to the field with
//! the default ``Invalid value for `name`: value`` message.

use objective_core::{Environment, Invalid, Node, Validator, Value};

/// Returns the value unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Validator for Identity {
    fn validate(&self, _node: &Node, value: Value, _env: &Environment) -> Result<Value, Invalid> {
        Ok(value)
    }
}

/// Passes values that are one of `choices`.
#[derive(Debug, Clone, Default)]
pub struct OneOf {
    choices: Vec<Value>,
}

impl OneOf {
    pub fn new<I, V>(choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }

    pub fn choices(&self) -> &[Value] {
        &self.choices
    }
}

impl Validator for OneOf {
    fn validate(&self, _node: &Node, value: Value, _env: &Environment) -> Result<Value, Invalid> {
        if self.choices.contains(&value) {
            Ok(value)
        } else {
            Err(Invalid::bare("").with_value(value))
        }
    }
}

/// Rejects values that are one of `choices`.
#[derive(Debug, Clone, Default)]
pub struct NoneOf {
    choices: Vec<Value>,
}

impl NoneOf {
    pub fn new<I, V>(choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }

    pub fn choices(&self) -> &[Value] {
        &self.choices
    }
}

impl Validator for NoneOf {
    fn validate(&self, _node: &Node, value: Value, _env: &Environment) -> Result<Value, Invalid> {
        if self.choices.contains(&value) {
            Err(Invalid::bare("").with_value(value))
        } else {
            Ok(value)
        }
    }
}

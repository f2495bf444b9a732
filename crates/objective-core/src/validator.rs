//! # Validator Hook
//!
//! A [`Validator`] runs after a field's coercion step and may check or
//! transform the coerced value. It reports problems as [`Invalid`]; a bare
//! failure (no node attached) is attached to the validated field by the
//! traversal engine, so callers always see a node-bound failure.
//!
//! Any closure `Fn(&Node, Value, &Environment) -> Result<Value, Invalid>`
//! is a validator.

use crate::environment::Environment;
use crate::error::Invalid;
use crate::node::Node;
use crate::value::Value;

/// Checks or transforms a coerced field value.
pub trait Validator: Send + Sync {
    /// Validates `value` for `node`, returning the (possibly transformed)
    /// value.
    fn validate(&self, node: &Node, value: Value, env: &Environment) -> Result<Value, Invalid>;
}

impl<F> Validator for F
where
    F: Fn(&Node, Value, &Environment) -> Result<Value, Invalid> + Send + Sync,
{
    fn validate(&self, node: &Node, value: Value, env: &Environment) -> Result<Value, Invalid> {
        self(node, value, env)
    }
}

//! # Missing-Value Policies
//!
//! A field whose input is [`Value::Undefined`] consults its [`Missing`]
//! policy. The policy either fails ([`Missing::Required`]), drops the field
//! from the parent's output ([`Missing::Ignore`]), or substitutes a value.
//!
//! Dropping is not an error: it is reported as [`Outcome::Omit`], a plain
//! result the immediate parent container turns into "no entry". It never
//! reaches the caller of a nested traversal.

use std::fmt;
use std::sync::Arc;

use crate::environment::Environment;
use crate::error::Invalid;
use crate::node::Node;
use crate::value::Value;

/// Result of resolving one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The field produced a value.
    Value(Value),
    /// The field asks its parent to leave it out.
    Omit,
}

impl Outcome {
    pub fn is_omit(&self) -> bool {
        matches!(self, Outcome::Omit)
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Outcome::Value(value) => Some(value),
            Outcome::Omit => None,
        }
    }

    /// The produced value; `Omit` becomes `Undefined`.
    pub fn into_value(self) -> Value {
        match self {
            Outcome::Value(value) => value,
            Outcome::Omit => Value::Undefined,
        }
    }
}

/// A user-defined reaction to a missing value.
pub trait MissingPolicy: Send + Sync {
    /// Decides the outcome for `node`, whose input was `Undefined`.
    fn on_missing(&self, node: &Node, env: &Environment) -> Result<Outcome, Invalid>;
}

/// What a field does when its input is `Undefined`.
#[derive(Clone, Default)]
pub enum Missing {
    /// Fail with a missing-value failure.
    #[default]
    Required,
    /// Leave the field out of the parent's output.
    Ignore,
    /// Substitute a fixed value.
    Default(Value),
    /// Substitute a freshly produced value.
    Factory(Arc<dyn Fn() -> Value + Send + Sync>),
    /// Delegate to a custom policy.
    Policy(Arc<dyn MissingPolicy>),
}

impl Missing {
    /// Substitute `value` when missing.
    pub fn value(value: impl Into<Value>) -> Self {
        Missing::Default(value.into())
    }

    /// Substitute the result of `produce` when missing.
    pub fn factory(produce: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        Missing::Factory(Arc::new(produce))
    }

    /// Delegate to `policy` when missing.
    pub fn policy(policy: impl MissingPolicy + 'static) -> Self {
        Missing::Policy(Arc::new(policy))
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Missing::Required)
    }

    pub fn is_ignore(&self) -> bool {
        matches!(self, Missing::Ignore)
    }

    /// Applies the policy on behalf of `node`.
    pub fn resolve(&self, node: &Node, env: &Environment) -> Result<Outcome, Invalid> {
        match self {
            Missing::Required => Err(Invalid::missing(node)),
            Missing::Ignore => {
                tracing::trace!(node = %node.display_name(), "ignoring missing value");
                Ok(Outcome::Omit)
            }
            Missing::Default(value) => Ok(Outcome::Value(value.clone())),
            Missing::Factory(produce) => Ok(Outcome::Value(produce())),
            Missing::Policy(policy) => policy.on_missing(node, env),
        }
    }
}

impl fmt::Debug for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Missing::Required => f.write_str("Required"),
            Missing::Ignore => f.write_str("Ignore"),
            Missing::Default(value) => f.debug_tuple("Default").field(value).finish(),
            Missing::Factory(_) => f.write_str("Factory(..)"),
            Missing::Policy(_) => f.write_str("Policy(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types;

    fn node() -> Node {
        types::field().instantiate().unwrap()
    }

    #[test]
    fn test_required_fails_with_missing() {
        let err = Missing::Required
            .resolve(&node(), &Environment::default())
            .unwrap_err();
        assert!(err.is_missing());
        assert_eq!(err.message(), "Value for `Field` is missing!");
    }

    #[test]
    fn test_ignore_omits() {
        let outcome = Missing::Ignore.resolve(&node(), &Environment::default()).unwrap();
        assert!(outcome.is_omit());
        assert_eq!(outcome.into_value(), Value::Undefined);
    }

    #[test]
    fn test_default_and_factory_substitute() {
        let env = Environment::default();
        assert_eq!(
            Missing::value("default").resolve(&node(), &env).unwrap(),
            Outcome::Value(Value::from("default"))
        );
        assert_eq!(
            Missing::factory(|| Value::Int(7)).resolve(&node(), &env).unwrap(),
            Outcome::Value(Value::Int(7))
        );
    }

    struct FromEnvironment;

    impl MissingPolicy for FromEnvironment {
        fn on_missing(&self, node: &Node, env: &Environment) -> Result<Outcome, Invalid> {
            env.get("fallback")
                .cloned()
                .map(Outcome::Value)
                .ok_or_else(|| Invalid::missing(node))
        }
    }

    #[test]
    fn test_custom_policy_reads_environment() {
        let policy = Missing::policy(FromEnvironment);
        let env = Environment::new().with("fallback", 3);
        assert_eq!(
            policy.resolve(&node(), &env).unwrap(),
            Outcome::Value(Value::Int(3))
        );
        assert!(policy.resolve(&node(), &Environment::default()).is_err());
    }
}

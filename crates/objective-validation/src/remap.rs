//! # Value Remapping
//!
//! [`ValueMap`] replaces a value by looking it up in a table or by calling a
//! function. An unmapped value falls back to the default when one is set and
//! fails otherwise.

use std::fmt;
use std::sync::Arc;

use objective_core::{Environment, Invalid, Node, Validator, Value};

type MapFn = Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>;

#[derive(Clone)]
enum Source {
    Table(Vec<(Value, Value)>),
    Function(MapFn),
}

/// Remaps values through a table or a function.
#[derive(Clone)]
pub struct ValueMap {
    source: Source,
    default: Option<Value>,
}

impl ValueMap {
    /// Remaps through `(from, to)` pairs.
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        Self {
            source: Source::Table(
                pairs
                    .into_iter()
                    .map(|(from, to)| (from.into(), to.into()))
                    .collect(),
            ),
            default: None,
        }
    }

    /// Remaps through `map`; `None` means unmapped.
    pub fn with_fn(map: impl Fn(&Value) -> Option<Value> + Send + Sync + 'static) -> Self {
        Self {
            source: Source::Function(Arc::new(map)),
            default: None,
        }
    }

    /// The value used for unmapped inputs.
    pub fn default_value(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    fn lookup(&self, value: &Value) -> Option<Value> {
        match &self.source {
            Source::Table(pairs) => pairs
                .iter()
                .find(|(from, _)| from == value)
                .map(|(_, to)| to.clone()),
            Source::Function(map) => map(value),
        }
    }
}

impl Validator for ValueMap {
    fn validate(&self, _node: &Node, value: Value, _env: &Environment) -> Result<Value, Invalid> {
        match self.lookup(&value).or_else(|| self.default.clone()) {
            Some(mapped) => Ok(mapped),
            None => Err(Invalid::bare("").with_value(value)),
        }
    }
}

impl fmt::Debug for ValueMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("ValueMap");
        match &self.source {
            Source::Table(pairs) => out.field("pairs", pairs),
            Source::Function(_) => out.field("pairs", &".."),
        };
        out.field("default", &self.default).finish()
    }
}

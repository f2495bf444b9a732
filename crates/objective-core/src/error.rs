//! # Error Types: Failure Trees and Configuration Errors
//!
//! Two families of errors exist and are never mixed:
//!
//! - [`Invalid`]: data failures produced while deserializing or serializing
//!   a value. A failure is attached to the node that raised it and carries a
//!   message plus the offending value. Aggregating failures
//!   ([`InvalidKind::Children`]) own the failures of their children and form
//!   a tree mirroring the part of the schema that failed.
//! - [`SchemaError`]: configuration failures of a schema definition, raised
//!   when a type is built or instantiated, before any value is examined.
//!
//! ## Flattened View
//!
//! [`Invalid::error_dict`] flattens a failure tree into a map from the path
//! of display names (mapping keys or sequence indices) to messages. This is
//! the primary format for reporting failures to callers.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::node::Node;
use crate::value::Value;

/// One step of a failure path: a child's external name or a sequence index.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathSegment {
    /// Name of a mapping child.
    Name(String),
    /// Position of a collection element.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Name(name) => f.write_str(name),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(name: &str) -> Self {
        PathSegment::Name(name.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(name: String) -> Self {
        PathSegment::Name(name)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Path of display names from the root failure's children down to a failure.
pub type ErrorPath = Vec<PathSegment>;

/// Flattened failure tree: path to message.
pub type ErrorDict = BTreeMap<ErrorPath, String>;

/// What kind of failure an [`Invalid`] describes.
#[derive(Debug, Clone)]
pub enum InvalidKind {
    /// Raised by a validator or coercion step without a node attached yet.
    /// The traversal engine always turns it into [`InvalidKind::Value`].
    Bare,
    /// A single node's value failed coercion or validation.
    Value,
    /// A mandatory value was absent. Both "invalid" and "undefined".
    Missing,
    /// One or more children failed.
    Children(Vec<Invalid>),
}

/// A data failure attached to a schema node.
#[derive(Debug, Clone)]
pub struct Invalid {
    kind: InvalidKind,
    segment: Option<PathSegment>,
    node_type: Option<String>,
    message: Option<String>,
    value: Value,
}

impl Invalid {
    /// A failure not yet attached to a node, as raised by validators.
    pub fn bare(message: impl Into<String>) -> Self {
        Self {
            kind: InvalidKind::Bare,
            segment: None,
            node_type: None,
            message: Some(message.into()),
            value: Value::Undefined,
        }
    }

    /// A failure of `node` for the offending `value`, with the default
    /// message ``Invalid value for `name`: value``.
    pub fn value(node: &Node, value: Value) -> Self {
        Self::attached(InvalidKind::Value, node, value)
    }

    /// The mandatory `node` received no value.
    pub fn missing(node: &Node) -> Self {
        Self::attached(InvalidKind::Missing, node, Value::Undefined)
    }

    /// Aggregates the failures of `node`'s children.
    pub fn children(node: &Node, children: Vec<Invalid>) -> Self {
        Self::attached(InvalidKind::Children(children), node, Value::Undefined)
    }

    fn attached(kind: InvalidKind, node: &Node, value: Value) -> Self {
        Self {
            kind,
            segment: node.name().map(PathSegment::from),
            node_type: Some(node.type_name().to_string()),
            message: None,
            value,
        }
    }

    /// Replaces the default message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Records the offending value.
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = value;
        self
    }

    /// Attaches a bare failure to `node`, turning it into a value failure.
    ///
    /// `value` is recorded unless the failure already carries one. Failures
    /// that are already attached are returned unchanged.
    pub fn normalize(self, node: &Node, value: &Value) -> Self {
        match self.kind {
            InvalidKind::Bare => {
                tracing::trace!(node = %node.display_name(), "normalizing bare failure");
                let recorded = if self.value.is_undefined() {
                    value.clone()
                } else {
                    self.value
                };
                let normalized = Self::value(node, recorded);
                match self.message {
                    Some(message) if !message.is_empty() => normalized.with_message(message),
                    _ => normalized,
                }
            }
            _ => self,
        }
    }

    /// Moves an attached failure onto `node`, keeping its kind, message,
    /// value and nested failures. Bare failures are returned unchanged.
    pub fn reattach(mut self, node: &Node) -> Self {
        if !self.is_bare() {
            self.segment = node.name().map(PathSegment::from);
            self.node_type = Some(node.type_name().to_string());
        }
        self
    }

    /// Relabels this failure with a sequence index, as collections do for
    /// failing elements.
    pub fn at_index(mut self, index: usize) -> Self {
        self.segment = Some(PathSegment::Index(index));
        self
    }

    pub fn kind(&self) -> &InvalidKind {
        &self.kind
    }

    pub fn is_bare(&self) -> bool {
        matches!(self.kind, InvalidKind::Bare)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self.kind, InvalidKind::Missing)
    }

    pub fn is_children(&self) -> bool {
        matches!(self.kind, InvalidKind::Children(_))
    }

    /// Failures of the children; empty unless this is an aggregate.
    pub fn failures(&self) -> &[Invalid] {
        match &self.kind {
            InvalidKind::Children(children) => children,
            _ => &[],
        }
    }

    /// The offending value, or `Undefined`.
    pub fn offending_value(&self) -> &Value {
        &self.value
    }

    /// The declared name (or index) of the failing node, if any.
    pub fn name(&self) -> Option<&PathSegment> {
        self.segment.as_ref()
    }

    /// Type name of the failing node.
    pub fn node_type(&self) -> Option<&str> {
        self.node_type.as_deref()
    }

    /// The failing node's name, falling back to its type name.
    pub fn display_segment(&self) -> PathSegment {
        match (&self.segment, &self.node_type) {
            (Some(segment), _) => segment.clone(),
            (None, Some(node_type)) => PathSegment::Name(node_type.clone()),
            (None, None) => PathSegment::Name(String::new()),
        }
    }

    /// The human-readable message.
    pub fn message(&self) -> String {
        if let Some(message) = &self.message {
            return message.clone();
        }
        let name = self.display_segment();
        match self.kind {
            InvalidKind::Missing => format!("Value for `{name}` is missing!"),
            _ => format!("Invalid value for `{name}`: {}", self.value),
        }
    }

    /// Depth-first walk of all descendant failures.
    ///
    /// Each item is the chain of failures from this failure's direct child
    /// down to the yielded failure (inclusive), paired with that failure.
    pub fn iter(&self) -> std::vec::IntoIter<(Vec<&Invalid>, &Invalid)> {
        let mut out = Vec::new();
        let mut prefix = Vec::new();
        collect_failures(self, &mut prefix, &mut out);
        out.into_iter()
    }

    /// Flattens the failure tree into path → message.
    pub fn error_dict(&self) -> ErrorDict {
        self.iter()
            .map(|(path, invalid)| {
                let path = path.iter().map(|step| step.display_segment()).collect();
                (path, invalid.message())
            })
            .collect()
    }
}

fn collect_failures<'a>(
    invalid: &'a Invalid,
    prefix: &mut Vec<&'a Invalid>,
    out: &mut Vec<(Vec<&'a Invalid>, &'a Invalid)>,
) {
    for child in invalid.failures() {
        prefix.push(child);
        out.push((prefix.clone(), child));
        collect_failures(child, prefix, out);
        prefix.pop();
    }
}

impl<'a> IntoIterator for &'a Invalid {
    type Item = (Vec<&'a Invalid>, &'a Invalid);
    type IntoIter = std::vec::IntoIter<(Vec<&'a Invalid>, &'a Invalid)>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Invalid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for Invalid {}

/// A schema definition that cannot be built or instantiated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A declaration never received a node type.
    #[error(
        "declaration `{name}` has no node type: create it with `Declaration::of` \
         or decorate a node type with it"
    )]
    MissingNodeType {
        /// Name of the declaration.
        name: String,
    },

    /// A child name that the node does not declare.
    #[error("`{name}` not in {node}")]
    UnknownChild {
        /// The requested name.
        name: String,
        /// Rendering of the node that was asked.
        node: String,
    },

    /// The bases of a type admit no consistent linearization.
    #[error("cannot linearize the bases of `{type_name}`: {reason}")]
    InconsistentHierarchy {
        /// Type being built.
        type_name: String,
        /// Why linearization failed.
        reason: String,
    },
}

/// Top-level error for callers that handle both families in one place.
#[derive(Error, Debug)]
pub enum ObjectiveError {
    /// A value failed validation.
    #[error("validation failed: {0}")]
    Invalid(#[from] Invalid),

    /// A schema could not be built or instantiated.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
}

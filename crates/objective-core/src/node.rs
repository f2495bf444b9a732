//! # Node Instances
//!
//! A [`Node`] is one instance of a [`NodeType`]. Its children are built on
//! first access from the type's declarations and memoized, so repeated
//! lookups of the same child return the same `Arc`. Two instances of one
//! type never share child nodes.
//!
//! A node built from a declaration keeps that declaration and takes its
//! external name from it. A root node built with
//! [`NodeType::instantiate`] has no name and displays as its type name.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::declaration::{Declaration, NodeArgs};
use crate::error::SchemaError;
use crate::missing::Missing;
use crate::schema::NodeType;
use crate::validator::Validator;

/// Attribute name of a collection's element declaration.
pub const ITEMS: &str = "items";

/// An instantiated schema node.
pub struct Node {
    node_type: NodeType,
    declaration: Option<Declaration>,
    missing: Missing,
    validator: Option<Arc<dyn Validator>>,
    /// Per-instance declarations replacing the type's, by attribute name.
    overrides: HashMap<String, Declaration>,
    children: Mutex<HashMap<String, Arc<Node>>>,
}

impl Node {
    pub(crate) fn new(node_type: NodeType, declaration: Option<Declaration>, args: &NodeArgs) -> Node {
        let validator = args
            .validator
            .clone()
            .or_else(|| node_type.validator().cloned());
        let mut overrides = HashMap::new();
        if let Some(items) = &args.items {
            overrides.insert(ITEMS.to_string(), items.attach_name(ITEMS));
        }
        Node {
            node_type,
            declaration,
            missing: args.missing_policy(),
            validator,
            overrides,
            children: Mutex::new(HashMap::new()),
        }
    }

    pub fn node_type(&self) -> &NodeType {
        &self.node_type
    }

    pub fn type_name(&self) -> &str {
        self.node_type.name()
    }

    /// The declaration this node was built from, if any.
    pub fn declaration(&self) -> Option<&Declaration> {
        self.declaration.as_ref()
    }

    /// The external name given by the parent's declaration.
    pub fn name(&self) -> Option<&str> {
        self.declaration.as_ref().and_then(Declaration::name)
    }

    /// The name, or the type name for unnamed nodes.
    pub fn display_name(&self) -> &str {
        self.name().unwrap_or_else(|| self.type_name())
    }

    pub fn missing(&self) -> &Missing {
        &self.missing
    }

    pub fn validator(&self) -> Option<&Arc<dyn Validator>> {
        self.validator.as_ref()
    }

    /// External child names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.node_type.names()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.node_type.contains(name)
    }

    pub fn len(&self) -> usize {
        self.node_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_type.is_empty()
    }

    /// The child under the external `name`.
    ///
    /// # Errors
    ///
    /// [`SchemaError::UnknownChild`] when the type declares no such child.
    pub fn child(&self, name: &str) -> Result<Arc<Node>, SchemaError> {
        match self.node_type.attribute_name(name) {
            Some(attr) => self.attribute(attr),
            None => Err(self.unknown(name)),
        }
    }

    /// The child stored under an attribute name, materialized on first use.
    pub fn attribute(&self, attr: &str) -> Result<Arc<Node>, SchemaError> {
        let mut children = self.children.lock();
        if let Some(child) = children.get(attr) {
            return Ok(Arc::clone(child));
        }
        let declaration = self
            .overrides
            .get(attr)
            .or_else(|| self.node_type.attribute(attr))
            .ok_or_else(|| self.unknown(attr))?;
        let child = Arc::new(declaration.resolve()?);
        tracing::trace!(parent = %self.display_name(), child = attr, "materialized child node");
        children.insert(attr.to_string(), Arc::clone(&child));
        Ok(child)
    }

    /// All children with their external names, in order.
    pub fn children(&self) -> Result<Vec<(String, Arc<Node>)>, SchemaError> {
        let mut children = Vec::with_capacity(self.len());
        for (name, attr) in self.node_type.name_map() {
            children.push((name.to_string(), self.attribute(attr)?));
        }
        Ok(children)
    }

    fn unknown(&self, name: &str) -> SchemaError {
        SchemaError::UnknownChild {
            name: name.to_string(),
            node: self.to_string(),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        match self.name() {
            Some(name) => write!(f, "<{}:{} [{}]>", self.type_name(), name, names.join(", ")),
            None => write!(f, "<{} [{}]>", self.type_name(), names.join(", ")),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("type", &self.type_name())
            .field("name", &self.name())
            .field("missing", &self.missing)
            .finish()
    }
}

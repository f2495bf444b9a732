//! # Declarations: Placeholders for Child Nodes
//!
//! A [`Declaration`] records how to build one child node of a schema type:
//! the target [`NodeType`], an optional explicit external name, and the
//! constructor arguments ([`NodeArgs`]) forwarded at instantiation.
//!
//! Declarations belong to the schema type and are shared by every instance
//! of it. Each schema instance materializes its own node from a declaration
//! on first access and keeps it (see [`crate::node`]).
//!
//! ## Ordering
//!
//! Every declaration receives a process-wide, monotonically increasing
//! creation index when it is constructed. The schema compiler orders a
//! type's own children by that index, so children appear in the order they
//! were declared regardless of the order they are registered in.
//!
//! ## Decoration
//!
//! A declaration may be created without a target and receive one later via
//! [`Declaration::decorate`], which allows declaring a nested schema type
//! in place:
//!
//! ```
//! use objective_core::{types, Declaration, NodeType};
//!
//! let inner = NodeType::derive("inner", &types::mapping())
//!     .item("baz", Declaration::of(&types::field()))
//!     .build()
//!     .unwrap();
//! let outer = NodeType::derive("Outer", &types::mapping())
//!     .item("_inner", Declaration::new().named("inner").decorate(&inner))
//!     .build()
//!     .unwrap();
//! assert_eq!(outer.names().collect::<Vec<_>>(), vec!["inner"]);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::SchemaError;
use crate::missing::Missing;
use crate::node::Node;
use crate::schema::NodeType;
use crate::validator::Validator;

static CREATION_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Constructor arguments forwarded to a node when it is instantiated.
#[derive(Clone, Default)]
pub struct NodeArgs {
    /// Replaces the type-level validator.
    pub validator: Option<Arc<dyn Validator>>,
    /// Missing policy; defaults to [`Missing::Required`].
    pub missing: Option<Missing>,
    /// Shortcut for [`Missing::Ignore`] when no policy is given.
    pub optional: bool,
    /// Replaces the element declaration of a collection.
    pub items: Option<Declaration>,
}

impl NodeArgs {
    /// The effective missing policy.
    pub fn missing_policy(&self) -> Missing {
        match (&self.missing, self.optional) {
            (Some(missing), _) => missing.clone(),
            (None, true) => Missing::Ignore,
            (None, false) => Missing::Required,
        }
    }
}

impl fmt::Debug for NodeArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeArgs")
            .field("validator", &self.validator.as_ref().map(|_| ".."))
            .field("missing", &self.missing)
            .field("optional", &self.optional)
            .field("items", &self.items)
            .finish()
    }
}

#[derive(Clone)]
struct DeclarationInner {
    target: Option<NodeType>,
    name: Option<String>,
    args: NodeArgs,
    index: u64,
}

/// How to build one child node of a schema type.
#[derive(Clone)]
pub struct Declaration {
    inner: Arc<DeclarationInner>,
}

impl Declaration {
    /// A declaration without a target type; supply one with
    /// [`Declaration::decorate`].
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DeclarationInner {
                target: None,
                name: None,
                args: NodeArgs::default(),
                index: CREATION_COUNTER.fetch_add(1, Ordering::Relaxed),
            }),
        }
    }

    /// A declaration of a `target` node.
    pub fn of(target: &NodeType) -> Self {
        Self::new().decorate(target)
    }

    fn inner_mut(&mut self) -> &mut DeclarationInner {
        Arc::make_mut(&mut self.inner)
    }

    /// Sets the external name, which takes precedence over the attribute
    /// name the declaration is registered under.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.inner_mut().name = Some(name.into());
        self
    }

    /// Sets the target type.
    pub fn decorate(mut self, target: &NodeType) -> Self {
        self.inner_mut().target = Some(target.clone());
        self
    }

    pub fn missing(mut self, missing: Missing) -> Self {
        self.inner_mut().args.missing = Some(missing);
        self
    }

    /// Ignore the field when it is missing, unless a policy is given.
    pub fn optional(mut self) -> Self {
        self.inner_mut().args.optional = true;
        self
    }

    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.inner_mut().args.validator = Some(Arc::new(validator));
        self
    }

    /// Replaces a collection's element declaration for this node.
    pub fn items(mut self, items: Declaration) -> Self {
        self.inner_mut().args.items = Some(items);
        self
    }

    /// Replaces all constructor arguments.
    pub fn with_args(mut self, args: NodeArgs) -> Self {
        self.inner_mut().args = args;
        self
    }

    pub fn creation_index(&self) -> u64 {
        self.inner.index
    }

    /// The external name, once set explicitly or attached by a schema type.
    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    pub fn target(&self) -> Option<&NodeType> {
        self.inner.target.as_ref()
    }

    pub fn args(&self) -> &NodeArgs {
        &self.inner.args
    }

    /// A copy named `default` unless a name is already set. An explicit name
    /// always wins over the attribute name.
    pub fn attach_name(&self, default: &str) -> Declaration {
        if self.inner.name.is_some() {
            return self.clone();
        }
        let mut attached = self.clone();
        attached.inner_mut().name = Some(default.to_string());
        attached
    }

    /// Instantiates the target type with the forwarded arguments. The new
    /// node refers back to this declaration for its name.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingNodeType`] when no target was ever set.
    pub fn resolve(&self) -> Result<Node, SchemaError> {
        let target = self.target().ok_or_else(|| SchemaError::MissingNodeType {
            name: self.name().unwrap_or("<unnamed>").to_string(),
        })?;
        Ok(Node::new(target.clone(), Some(self.clone()), &self.inner.args))
    }
}

impl Default for Declaration {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Declaration: {} = {}>",
            self.name().unwrap_or("None"),
            self.target().map_or("None", |t| t.name())
        )
    }
}

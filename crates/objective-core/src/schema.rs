//! # Schema Compiler: Compiled Schema Types
//!
//! A [`NodeType`] is the compiled, immutable description of a schema type:
//! its bases, its own child [`Declaration`]s, the ordered map of external
//! child names, the effective field kind and validator. Types are built once
//! with [`NodeTypeBuilder`] and shared freely (`Arc` inside, `Send + Sync`).
//!
//! ## Child Order
//!
//! The external-name order of a type is computed at build time:
//!
//! 1. Own declarations are sorted by their creation index.
//! 2. The name maps of the bases are merged in base order. A name already
//!    present keeps its position and takes the later entry.
//! 3. Own declarations are merged last, each named by its explicit name or
//!    else its attribute name. Redeclaring an inherited child overrides it in
//!    place instead of appending it.
//!
//! ## Attribute Lookup
//!
//! Which declaration backs an attribute follows the C3 linearization of the
//! type's bases, own declarations first. Bases that admit no consistent
//! linearization are rejected with [`SchemaError::InconsistentHierarchy`].
//!
//! ## Root Type
//!
//! [`NodeType::root`] is the implicit base of every builder without explicit
//! bases. It declares no children and is not a field.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;

use crate::declaration::{Declaration, NodeArgs};
use crate::error::SchemaError;
use crate::field::FieldKind;
use crate::node::Node;
use crate::validator::Validator;

struct TypeInner {
    name: String,
    bases: Vec<NodeType>,
    /// C3 linearization of the bases, excluding this type.
    ancestors: Vec<NodeType>,
    /// Own declarations in creation order, names attached.
    own: Vec<(String, Declaration)>,
    /// External name → attribute name.
    names: IndexMap<String, String>,
    /// Attribute name → effective declaration.
    attributes: HashMap<String, Declaration>,
    own_kind: Option<Arc<dyn FieldKind>>,
    kind: Option<Arc<dyn FieldKind>>,
    own_validator: Option<Arc<dyn Validator>>,
    validator: Option<Arc<dyn Validator>>,
}

/// A compiled schema type.
#[derive(Clone)]
pub struct NodeType {
    inner: Arc<TypeInner>,
}

impl NodeType {
    /// The root of all schema types.
    pub fn root() -> NodeType {
        static ROOT: OnceLock<NodeType> = OnceLock::new();
        ROOT.get_or_init(|| {
            compile(Blueprint {
                name: "Node".to_string(),
                bases: Vec::new(),
                ancestors: Vec::new(),
                items: Vec::new(),
                kind: None,
                validator: None,
            })
        })
        .clone()
    }

    /// Starts a type whose bases are given with [`NodeTypeBuilder::extends`].
    pub fn builder(name: impl Into<String>) -> NodeTypeBuilder {
        NodeTypeBuilder {
            name: name.into(),
            bases: Vec::new(),
            items: Vec::new(),
            kind: None,
            validator: None,
        }
    }

    /// Starts a type deriving from `base`.
    pub fn derive(name: impl Into<String>, base: &NodeType) -> NodeTypeBuilder {
        Self::builder(name).extends(base)
    }

    /// Derives a childless single-base type with its own field kind. A
    /// single base always linearizes, so this cannot fail.
    pub fn with_kind(base: &NodeType, name: impl Into<String>, kind: impl FieldKind + 'static) -> NodeType {
        Self::single_base(base, name.into(), Vec::new(), Some(Arc::new(kind)))
    }

    pub(crate) fn single_base(
        base: &NodeType,
        name: String,
        items: Vec<(String, Declaration)>,
        kind: Option<Arc<dyn FieldKind>>,
    ) -> NodeType {
        compile(Blueprint {
            name,
            bases: vec![base.clone()],
            ancestors: base.mro(),
            items,
            kind,
            validator: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn bases(&self) -> &[NodeType] {
        &self.inner.bases
    }

    /// This type followed by its linearized ancestors.
    pub fn mro(&self) -> Vec<NodeType> {
        let mut mro = Vec::with_capacity(self.inner.ancestors.len() + 1);
        mro.push(self.clone());
        mro.extend(self.inner.ancestors.iter().cloned());
        mro
    }

    /// Whether `self` is `other` or derives from it.
    pub fn is_subtype_of(&self, other: &NodeType) -> bool {
        self == other || self.inner.ancestors.iter().any(|ancestor| ancestor == other)
    }

    /// External child names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.inner.names.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.inner.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.names.contains_key(name)
    }

    /// (external name, attribute name) pairs in order.
    pub fn name_map(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.inner
            .names
            .iter()
            .map(|(name, attr)| (name.as_str(), attr.as_str()))
    }

    /// The attribute backing the external `name`.
    pub fn attribute_name(&self, name: &str) -> Option<&str> {
        self.inner.names.get(name).map(String::as_str)
    }

    /// The declaration registered under an attribute name.
    pub fn attribute(&self, attribute: &str) -> Option<&Declaration> {
        self.inner.attributes.get(attribute)
    }

    /// The declaration behind the external `name`.
    pub fn declaration(&self, name: &str) -> Option<&Declaration> {
        self.attribute_name(name).and_then(|attr| self.attribute(attr))
    }

    /// The target type of the child `name`, usable as a base type.
    pub fn child_type(&self, name: &str) -> Option<NodeType> {
        self.declaration(name).and_then(|decl| decl.target().cloned())
    }

    /// (external name, declaration) pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Declaration)> + '_ {
        self.inner.names.iter().filter_map(move |(name, attr)| {
            self.inner
                .attributes
                .get(attr)
                .map(|decl| (name.as_str(), decl))
        })
    }

    /// The effective field kind, if this type is a field.
    pub fn kind(&self) -> Option<&Arc<dyn FieldKind>> {
        self.inner.kind.as_ref()
    }

    pub fn is_field(&self) -> bool {
        self.inner.kind.is_some()
    }

    /// The effective type-level validator.
    pub fn validator(&self) -> Option<&Arc<dyn Validator>> {
        self.inner.validator.as_ref()
    }

    /// Instantiates a root node of this type with default arguments.
    pub fn instantiate(&self) -> Result<Node, SchemaError> {
        self.instantiate_with(&NodeArgs::default())
    }

    /// Instantiates a root node of this type.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingNodeType`] if any declaration reachable
    /// from this type (or from `args`) never received a target type.
    pub fn instantiate_with(&self, args: &NodeArgs) -> Result<Node, SchemaError> {
        let mut seen = HashSet::new();
        self.check_declarations(&mut seen)?;
        if let Some(items) = &args.items {
            check_declaration("items", items, &mut seen)?;
        }
        Ok(Node::new(self.clone(), None, args))
    }

    fn check_declarations(&self, seen: &mut HashSet<usize>) -> Result<(), SchemaError> {
        if !seen.insert(Arc::as_ptr(&self.inner) as usize) {
            return Ok(());
        }
        for (attr, decl) in &self.inner.attributes {
            check_declaration(attr, decl, seen)?;
        }
        Ok(())
    }
}

fn check_declaration(attr: &str, decl: &Declaration, seen: &mut HashSet<usize>) -> Result<(), SchemaError> {
    let target = decl.target().ok_or_else(|| SchemaError::MissingNodeType {
        name: decl.name().unwrap_or(attr).to_string(),
    })?;
    target.check_declarations(seen)?;
    if let Some(items) = &decl.args().items {
        check_declaration("items", items, seen)?;
    }
    Ok(())
}

impl PartialEq for NodeType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for NodeType {}

impl fmt::Debug for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeType")
            .field("name", &self.inner.name)
            .field("children", &self.inner.names.keys().collect::<Vec<_>>())
            .field("kind", &self.inner.kind.as_ref().map(|k| k.kind_name()))
            .finish()
    }
}

/// Builds a [`NodeType`].
pub struct NodeTypeBuilder {
    name: String,
    bases: Vec<NodeType>,
    items: Vec<(String, Declaration)>,
    kind: Option<Arc<dyn FieldKind>>,
    validator: Option<Arc<dyn Validator>>,
}

impl NodeTypeBuilder {
    /// Adds a base. Earlier bases take precedence.
    pub fn extends(mut self, base: &NodeType) -> Self {
        self.bases.push(base.clone());
        self
    }

    /// Declares a child under an attribute name. Registering the same
    /// attribute twice keeps the later declaration.
    pub fn item(mut self, attribute: impl Into<String>, declaration: Declaration) -> Self {
        let attribute = attribute.into();
        self.items.retain(|(attr, _)| *attr != attribute);
        self.items.push((attribute, declaration));
        self
    }

    /// Gives the type its own field kind instead of inheriting one.
    pub fn kind(mut self, kind: impl FieldKind + 'static) -> Self {
        self.kind = Some(Arc::new(kind));
        self
    }

    /// Sets a type-level validator, inherited by subtypes.
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Compiles the type.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InconsistentHierarchy`] when the bases cannot
    /// be linearized (for instance a base listed twice).
    pub fn build(self) -> Result<NodeType, SchemaError> {
        let bases = if self.bases.is_empty() {
            vec![NodeType::root()]
        } else {
            self.bases
        };
        let ancestors = linearize(&self.name, &bases)?;
        Ok(compile(Blueprint {
            name: self.name,
            bases,
            ancestors,
            items: self.items,
            kind: self.kind,
            validator: self.validator,
        }))
    }
}

struct Blueprint {
    name: String,
    bases: Vec<NodeType>,
    ancestors: Vec<NodeType>,
    items: Vec<(String, Declaration)>,
    kind: Option<Arc<dyn FieldKind>>,
    validator: Option<Arc<dyn Validator>>,
}

fn compile(blueprint: Blueprint) -> NodeType {
    let Blueprint {
        name,
        bases,
        ancestors,
        mut items,
        kind: own_kind,
        validator: own_validator,
    } = blueprint;

    items.sort_by_key(|(_, decl)| decl.creation_index());
    let own: Vec<(String, Declaration)> = items
        .into_iter()
        .map(|(attr, decl)| {
            let decl = decl.attach_name(&attr);
            (attr, decl)
        })
        .collect();

    let mut names = IndexMap::new();
    for base in &bases {
        for (external, attr) in &base.inner.names {
            names.insert(external.clone(), attr.clone());
        }
    }
    for (attr, decl) in &own {
        let external = decl.name().unwrap_or(attr).to_string();
        names.insert(external, attr.clone());
    }

    let mut attributes: HashMap<String, Declaration> = own
        .iter()
        .map(|(attr, decl)| (attr.clone(), decl.clone()))
        .collect();
    for ancestor in &ancestors {
        for (attr, decl) in &ancestor.inner.own {
            attributes
                .entry(attr.clone())
                .or_insert_with(|| decl.clone());
        }
    }

    let kind = own_kind.clone().or_else(|| {
        ancestors
            .iter()
            .find_map(|ancestor| ancestor.inner.own_kind.clone())
    });
    let validator = own_validator.clone().or_else(|| {
        ancestors
            .iter()
            .find_map(|ancestor| ancestor.inner.own_validator.clone())
    });

    tracing::trace!(schema = %name, children = names.len(), "compiled schema type");

    NodeType {
        inner: Arc::new(TypeInner {
            name,
            bases,
            ancestors,
            own,
            names,
            attributes,
            own_kind,
            kind,
            own_validator,
            validator,
        }),
    }
}

/// C3 linearization of `bases`, excluding the type being built.
fn linearize(name: &str, bases: &[NodeType]) -> Result<Vec<NodeType>, SchemaError> {
    let mut sequences: Vec<Vec<NodeType>> = bases.iter().map(NodeType::mro).collect();
    sequences.push(bases.to_vec());

    let mut result = Vec::new();
    loop {
        sequences.retain(|sequence| !sequence.is_empty());
        if sequences.is_empty() {
            return Ok(result);
        }

        let candidate = sequences
            .iter()
            .map(|sequence| &sequence[0])
            .find(|head| {
                !sequences
                    .iter()
                    .any(|sequence| sequence[1..].contains(*head))
            })
            .cloned();

        let Some(candidate) = candidate else {
            let heads: Vec<&str> = sequences.iter().map(|s| s[0].name()).collect();
            return Err(SchemaError::InconsistentHierarchy {
                type_name: name.to_string(),
                reason: format!("no consistent order for bases {}", heads.join(", ")),
            });
        };

        for sequence in &mut sequences {
            if sequence[0] == candidate {
                sequence.remove(0);
            }
        }
        result.push(candidate);
    }
}

//! # objective-core: Declarative Schema Engine
//!
//! This crate defines schemas as trees of typed nodes and runs structured
//! values through them in both directions:
//!
//! - **deserialize** turns external data into application values, applying
//!   missing-value policies, coercion, and validation;
//! - **serialize** turns application values back into transportable data.
//!
//! Failures never stop a traversal early. Every failing field contributes
//! one [`Invalid`], and a failing container reports all of them in one
//! aggregated failure that [`Invalid::error_dict`] flattens into
//! path → message form.
//!
//! ## Building Schemas
//!
//! A [`NodeType`] is compiled once from a [`NodeTypeBuilder`]: its bases,
//! its child [`Declaration`]s, an optional field kind and an optional
//! validator. Child order is declaration order, inherited children first;
//! redeclaring an inherited child overrides it in place.
//!
//! ```
//! use objective_core::{types, Declaration, Missing, NodeType, PathSegment, Value};
//!
//! let schema = NodeType::derive("Account", &types::mapping())
//!     .item("login", Declaration::of(&types::field()))
//!     .item("note", Declaration::of(&types::field()).missing(Missing::value("none")))
//!     .build()
//!     .unwrap();
//! let node = schema.instantiate().unwrap();
//!
//! let input = Value::from(serde_json::json!({"login": "bob"}));
//! let output = node.deserialize(input).unwrap();
//! assert_eq!(output.get("note"), Some(&Value::from("none")));
//!
//! let err = node.deserialize(Value::from(serde_json::json!({}))).unwrap_err();
//! let dict = err.error_dict();
//! assert_eq!(dict[&vec![PathSegment::from("login")]], "Value for `login` is missing!");
//! ```
//!
//! ## Crate Policy
//!
//! - No dependencies on other `objective-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Schema configuration errors ([`SchemaError`]) and data failures
//!   ([`Invalid`]) are separate types and never mixed.

pub mod collection;
pub mod declaration;
pub mod environment;
pub mod error;
pub mod field;
pub mod mapping;
pub mod missing;
pub mod node;
pub mod schema;
pub mod types;
pub mod validator;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use collection::{List, Set};
pub use declaration::{Declaration, NodeArgs};
pub use environment::Environment;
pub use error::{ErrorDict, ErrorPath, Invalid, InvalidKind, ObjectiveError, PathSegment, SchemaError};
pub use field::{Field, FieldKind};
pub use mapping::{Container, Mapping};
pub use missing::{Missing, MissingPolicy, Outcome};
pub use node::{Node, ITEMS};
pub use schema::{NodeType, NodeTypeBuilder};
pub use validator::Validator;
pub use value::{Bunch, Map, OrderedMap, Value, ValueSet};

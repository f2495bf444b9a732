//! # Built-in Schema Types
//!
//! Shared base types. Each is compiled once per process; every call returns
//! a handle to the same type, so types derived from them compare as
//! subtypes.
//!
//! | Type             | Kind                    | Children |
//! |------------------|-------------------------|----------|
//! | `Node`           | none (plain node)       | none     |
//! | `Field`          | [`Field`]               | none     |
//! | `Mapping`        | [`Mapping`] (map)       | none     |
//! | `BunchMapping`   | [`Mapping`] (bunch)     | none     |
//! | `OrderedMapping` | [`Mapping`] (ordered)   | none     |
//! | `List`           | [`List`]                | `items`  |
//! | `Set`            | [`Set`]                 | `items`  |

use std::sync::{Arc, OnceLock};

use crate::collection::{List, Set};
use crate::declaration::Declaration;
use crate::field::Field;
use crate::mapping::{Container, Mapping};
use crate::node::ITEMS;
use crate::schema::NodeType;

/// The root node type.
pub fn node() -> NodeType {
    NodeType::root()
}

/// The generic pass-through field.
pub fn field() -> NodeType {
    static FIELD: OnceLock<NodeType> = OnceLock::new();
    FIELD
        .get_or_init(|| NodeType::with_kind(&node(), "Field", Field))
        .clone()
}

pub fn mapping() -> NodeType {
    static MAPPING: OnceLock<NodeType> = OnceLock::new();
    MAPPING
        .get_or_init(|| NodeType::with_kind(&field(), "Mapping", Mapping::new(Container::Map)))
        .clone()
}

/// A mapping producing [`crate::Bunch`] values.
pub fn bunch_mapping() -> NodeType {
    static BUNCH: OnceLock<NodeType> = OnceLock::new();
    BUNCH
        .get_or_init(|| NodeType::with_kind(&mapping(), "BunchMapping", Mapping::new(Container::Bunch)))
        .clone()
}

/// A mapping producing values in declared child order.
pub fn ordered_mapping() -> NodeType {
    static ORDERED: OnceLock<NodeType> = OnceLock::new();
    ORDERED
        .get_or_init(|| NodeType::with_kind(&mapping(), "OrderedMapping", Mapping::new(Container::Ordered)))
        .clone()
}

pub fn list() -> NodeType {
    static LIST: OnceLock<NodeType> = OnceLock::new();
    LIST.get_or_init(|| {
        NodeType::single_base(
            &field(),
            "List".to_string(),
            vec![(ITEMS.to_string(), Declaration::of(&field()))],
            Some(Arc::new(List)),
        )
    })
    .clone()
}

pub fn set() -> NodeType {
    static SET: OnceLock<NodeType> = OnceLock::new();
    SET.get_or_init(|| {
        NodeType::single_base(
            &field(),
            "Set".to_string(),
            vec![(ITEMS.to_string(), Declaration::of(&field()))],
            Some(Arc::new(Set)),
        )
    })
    .clone()
}

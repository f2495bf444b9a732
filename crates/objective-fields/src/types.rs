//! # Built-in Leaf Types
//!
//! Schema types for the leaf kinds of this crate, compiled once per process.
//! `Float` and `Int` derive from `Number`; all others derive from
//! [`objective_core::types::field`].

use std::sync::OnceLock;

use objective_core::{types as core_types, NodeType};

use crate::boolean::Bool;
use crate::datetime::UtcDateTime;
use crate::number::Number;
use crate::text::Text;

/// Integer-or-float number.
pub fn number() -> NodeType {
    static NUMBER: OnceLock<NodeType> = OnceLock::new();
    NUMBER
        .get_or_init(|| NodeType::with_kind(&core_types::field(), "Number", Number::any()))
        .clone()
}

pub fn float() -> NodeType {
    static FLOAT: OnceLock<NodeType> = OnceLock::new();
    FLOAT
        .get_or_init(|| NodeType::with_kind(&number(), "Float", Number::float()))
        .clone()
}

pub fn int() -> NodeType {
    static INT: OnceLock<NodeType> = OnceLock::new();
    INT.get_or_init(|| NodeType::with_kind(&number(), "Int", Number::int()))
        .clone()
}

/// UTF-8 text.
pub fn text() -> NodeType {
    static TEXT: OnceLock<NodeType> = OnceLock::new();
    TEXT.get_or_init(|| NodeType::with_kind(&core_types::field(), "Text", Text::default()))
        .clone()
}

pub fn utc_datetime() -> NodeType {
    static DATETIME: OnceLock<NodeType> = OnceLock::new();
    DATETIME
        .get_or_init(|| NodeType::with_kind(&core_types::field(), "UtcDateTime", UtcDateTime))
        .clone()
}

pub fn boolean() -> NodeType {
    static BOOLEAN: OnceLock<NodeType> = OnceLock::new();
    BOOLEAN
        .get_or_init(|| NodeType::with_kind(&core_types::field(), "Bool", Bool))
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hierarchy() {
        assert!(int().is_subtype_of(&number()));
        assert!(float().is_subtype_of(&number()));
        assert!(text().is_subtype_of(&core_types::field()));
        assert!(boolean().is_field());
        assert_eq!(utc_datetime(), utc_datetime());
    }
}

//! # Mapping Fields
//!
//! A mapping field walks its declared children in order. For each child it
//! looks up the child's external name in the input (absent keys become
//! `Undefined`) and runs the child's pipeline. Children that ask to be
//! omitted produce no entry. Failures of all children are collected and
//! reported together as one [`Invalid::children`] failure; the output is
//! only built when every child succeeded.
//!
//! Input keys that the schema does not declare are dropped.
//!
//! The same walk serves both directions; only the per-child step differs.

use crate::environment::Environment;
use crate::error::Invalid;
use crate::field::FieldKind;
use crate::missing::Outcome;
use crate::node::Node;
use crate::value::{Bunch, OrderedMap, Value};

/// The container a mapping field produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Container {
    /// A plain key-sorted map.
    #[default]
    Map,
    /// A map with attribute-style field access.
    Bunch,
    /// A map preserving the schema's child order.
    Ordered,
}

impl Container {
    fn finish(self, entries: OrderedMap) -> Value {
        match self {
            Container::Map => Value::Map(entries.into_iter().collect()),
            Container::Bunch => Value::Bunch(entries.into_iter().collect::<Bunch>()),
            Container::Ordered => Value::Ordered(entries),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Deserialize,
    Serialize,
}

/// Field kind of mapping nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mapping {
    pub container: Container,
}

impl Mapping {
    pub fn new(container: Container) -> Self {
        Self { container }
    }

    fn traverse(&self, node: &Node, mut value: Value, env: &Environment, direction: Direction) -> Result<Value, Invalid> {
        if !value.is_mapping() {
            let message = format!(
                "Expected a mapping for `{}`, got {}",
                node.display_name(),
                value.type_name()
            );
            return Err(Invalid::value(node, value).with_message(message));
        }

        let children = node
            .children()
            .map_err(|err| Invalid::value(node, Value::Undefined).with_message(err.to_string()))?;

        let mut entries = OrderedMap::with_capacity(children.len());
        let mut failures = Vec::new();
        for (name, child) in children {
            let input = value.take(&name);
            let outcome = match direction {
                Direction::Deserialize => child.deserialize_outcome(input, env),
                Direction::Serialize => child.serialize_outcome(input, env),
            };
            match outcome {
                Ok(Outcome::Value(output)) => {
                    entries.insert(name, output);
                }
                Ok(Outcome::Omit) => {
                    tracing::trace!(node = %node.display_name(), child = %name, "omitted child");
                }
                Err(invalid) => failures.push(invalid),
            }
        }

        if failures.is_empty() {
            Ok(self.container.finish(entries))
        } else {
            tracing::debug!(
                node = %node.display_name(),
                failures = failures.len(),
                ?direction,
                "mapping children failed"
            );
            Err(Invalid::children(node, failures))
        }
    }
}

impl FieldKind for Mapping {
    fn kind_name(&self) -> &'static str {
        "Mapping"
    }

    fn deserialize(&self, node: &Node, value: Value, env: &Environment) -> Result<Value, Invalid> {
        self.traverse(node, value, env, Direction::Deserialize)
    }

    fn serialize(&self, node: &Node, value: Value, env: &Environment) -> Result<Value, Invalid> {
        self.traverse(node, value, env, Direction::Serialize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::Declaration;
    use crate::error::PathSegment;
    use crate::missing::Missing;
    use crate::schema::NodeType;
    use crate::types;
    use crate::value::Map;
    use serde_json::json;

    fn value(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    fn pair(base: &NodeType) -> NodeType {
        NodeType::derive("Pair", base)
            .item("foo", Declaration::of(&types::field()))
            .item("bar", Declaration::of(&types::field()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_round_trip_and_unknown_keys_dropped() {
        let node = pair(&types::mapping()).instantiate().unwrap();
        let out = node
            .deserialize(value(json!({"foo": 1, "bar": "x", "extra": true})))
            .unwrap();
        assert_eq!(out, value(json!({"foo": 1, "bar": "x"})));
        assert_eq!(node.serialize(out.clone()).unwrap(), out);
    }

    #[test]
    fn test_all_child_failures_collected() {
        let node = pair(&types::mapping()).instantiate().unwrap();
        let err = node.deserialize(value(json!({}))).unwrap_err();
        assert!(err.is_children());
        let dict = err.error_dict();
        assert_eq!(dict.len(), 2);
        assert_eq!(
            dict.get(&vec![PathSegment::from("foo")]).map(String::as_str),
            Some("Value for `foo` is missing!")
        );
        assert_eq!(
            dict.get(&vec![PathSegment::from("bar")]).map(String::as_str),
            Some("Value for `bar` is missing!")
        );
    }

    #[test]
    fn test_omitted_child_has_no_entry() {
        let node = NodeType::derive("M", &types::mapping())
            .item("foo", Declaration::of(&types::field()).optional())
            .item("bar", Declaration::of(&types::field()).missing(Missing::value("default")))
            .build()
            .unwrap()
            .instantiate()
            .unwrap();
        let out = node.deserialize(value(json!({}))).unwrap();
        let mut expected = Map::new();
        expected.insert("bar".into(), Value::from("default"));
        assert_eq!(out, Value::Map(expected));
    }

    #[test]
    fn test_non_mapping_input_is_invalid() {
        let node = pair(&types::mapping()).instantiate().unwrap();
        let err = node.deserialize(value(json!([1, 2]))).unwrap_err();
        assert!(!err.is_children());
        assert_eq!(err.message(), "Expected a mapping for `Pair`, got list");
    }

    #[test]
    fn test_containers() {
        let input = value(json!({"bar": 2, "foo": 1}));

        let bunch = pair(&types::bunch_mapping()).instantiate().unwrap();
        match bunch.deserialize(input.clone()).unwrap() {
            Value::Bunch(out) => assert_eq!(out.field("foo"), &Value::Int(1)),
            other => panic!("expected a bunch, got {other:?}"),
        }

        let ordered = pair(&types::ordered_mapping()).instantiate().unwrap();
        match ordered.deserialize(input).unwrap() {
            Value::Ordered(out) => {
                assert_eq!(out.keys().collect::<Vec<_>>(), vec!["foo", "bar"]);
            }
            other => panic!("expected an ordered map, got {other:?}"),
        }
    }
}

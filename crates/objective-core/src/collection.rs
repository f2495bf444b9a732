//! # Collection Fields
//!
//! [`List`] and [`Set`] fields run every element of a sequence through their
//! `items` child. Failing elements are collected and reported together,
//! each failure labelled with the element's index. Elements whose pipeline
//! asks to be omitted are skipped.
//!
//! A set rejects elements that cannot be hashed and drops duplicates,
//! keeping the first occurrence. Both kinds serialize to a list.

use crate::environment::Environment;
use crate::error::Invalid;
use crate::field::FieldKind;
use crate::missing::Outcome;
use crate::node::{Node, ITEMS};
use crate::value::{Value, ValueSet};

fn elements(node: &Node, value: Value) -> Result<Vec<Value>, Invalid> {
    match value {
        Value::List(items) => Ok(items),
        Value::Set(items) => Ok(items.into_iter().collect()),
        other => {
            let message = format!(
                "Expected a sequence for `{}`, got {}",
                node.display_name(),
                other.type_name()
            );
            Err(Invalid::value(node, other).with_message(message))
        }
    }
}

fn items_node(node: &Node) -> Result<std::sync::Arc<Node>, Invalid> {
    node.attribute(ITEMS)
        .map_err(|err| Invalid::value(node, Value::Undefined).with_message(err.to_string()))
}

/// Runs each element through `step`, collecting indexed failures.
fn each<F>(node: &Node, value: Value, mut step: F) -> Result<Vec<Value>, Invalid>
where
    F: FnMut(Value) -> Result<Outcome, Invalid>,
{
    let mut output = Vec::new();
    let mut failures = Vec::new();
    for (index, element) in elements(node, value)?.into_iter().enumerate() {
        match step(element) {
            Ok(Outcome::Value(value)) => output.push(value),
            Ok(Outcome::Omit) => {}
            Err(invalid) => failures.push(invalid.at_index(index)),
        }
    }
    if failures.is_empty() {
        Ok(output)
    } else {
        tracing::debug!(node = %node.display_name(), failures = failures.len(), "collection elements failed");
        Err(Invalid::children(node, failures))
    }
}

fn serialize_elements(node: &Node, value: Value, env: &Environment) -> Result<Value, Invalid> {
    let items = items_node(node)?;
    each(node, value, |element| items.serialize_outcome(element, env)).map(Value::List)
}

/// Field kind of sequence nodes producing a list.
#[derive(Debug, Clone, Copy, Default)]
pub struct List;

impl FieldKind for List {
    fn kind_name(&self) -> &'static str {
        "List"
    }

    fn deserialize(&self, node: &Node, value: Value, env: &Environment) -> Result<Value, Invalid> {
        let items = items_node(node)?;
        each(node, value, |element| items.deserialize_outcome(element, env)).map(Value::List)
    }

    fn serialize(&self, node: &Node, value: Value, env: &Environment) -> Result<Value, Invalid> {
        serialize_elements(node, value, env)
    }
}

/// Field kind of sequence nodes producing a set of hashable elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct Set;

impl FieldKind for Set {
    fn kind_name(&self) -> &'static str {
        "Set"
    }

    fn deserialize(&self, node: &Node, value: Value, env: &Environment) -> Result<Value, Invalid> {
        let items = items_node(node)?;
        let output = each(node, value, |element| {
            let outcome = items.deserialize_outcome(element, env)?;
            if let Outcome::Value(value) = &outcome {
                if !value.is_hashable() {
                    let message = format!("Unhashable value {} for `{}`", value.type_name(), node.display_name());
                    return Err(Invalid::value(&items, value.clone()).with_message(message));
                }
            }
            Ok(outcome)
        })?;
        Ok(Value::Set(output.into_iter().collect::<ValueSet>()))
    }

    fn serialize(&self, node: &Node, value: Value, env: &Environment) -> Result<Value, Invalid> {
        serialize_elements(node, value, env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::{Declaration, NodeArgs};
    use crate::error::PathSegment;
    use crate::schema::NodeType;
    use crate::types;
    use serde_json::json;

    fn value(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn test_list_passes_elements_through_items() {
        let list = types::list().instantiate().unwrap();
        assert_eq!(
            list.deserialize(value(json!([1, "a", null]))).unwrap(),
            value(json!([1, "a", null]))
        );
    }

    #[test]
    fn test_non_sequence_is_invalid() {
        let list = types::list().instantiate().unwrap();
        let err = list.deserialize(5).unwrap_err();
        assert_eq!(err.message(), "Expected a sequence for `List`, got int");
    }

    #[test]
    fn test_element_failures_are_indexed() {
        let pair = NodeType::derive("pair", &types::mapping())
            .item("a", Declaration::of(&types::field()))
            .build()
            .unwrap();
        let args = NodeArgs {
            items: Some(Declaration::of(&pair)),
            ..NodeArgs::default()
        };
        let list = types::list().instantiate_with(&args).unwrap();
        let err = list
            .deserialize(value(json!([{"a": 1}, {}, {"a": 2}, 4])))
            .unwrap_err();
        let dict = err.error_dict();
        assert_eq!(
            dict.get(&vec![PathSegment::Index(1), "a".into()]).map(String::as_str),
            Some("Value for `a` is missing!")
        );
        assert!(dict.contains_key(&vec![PathSegment::Index(3)]));
        assert_eq!(err.failures().len(), 2);
    }

    #[test]
    fn test_set_dedupes_and_rejects_unhashable() {
        let set = types::set().instantiate().unwrap();
        let out = set.deserialize(value(json!([1, 2, 1, 3]))).unwrap();
        let expected: ValueSet = [1, 2, 3].into_iter().map(Value::from).collect();
        assert_eq!(out, Value::Set(expected));

        let err = set.deserialize(value(json!([1, [2]]))).unwrap_err();
        assert_eq!(err.failures()[0].name(), Some(&PathSegment::Index(1)));
    }

    #[test]
    fn test_collections_serialize_to_list() {
        let set = types::set().instantiate().unwrap();
        let input: ValueSet = ["x", "y"].into_iter().map(Value::from).collect();
        assert_eq!(
            set.serialize(Value::Set(input)).unwrap(),
            value(json!(["x", "y"]))
        );
    }
}

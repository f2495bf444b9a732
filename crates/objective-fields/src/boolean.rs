//! # Boolean Fields
//!
//! `Null` is false, booleans pass through, and anything else is rendered
//! as text, trimmed, lower-cased and looked up in [`TRUTHY`]. Unknown
//! tokens are false, never an error.

use objective_core::{Environment, FieldKind, Invalid, Node, Value};

/// Tokens that deserialize to `true`.
pub const TRUTHY: &[&str] = &["yes", "enabled", "true", "1", "t", "on", "y"];

/// Field kind producing booleans.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bool;

impl FieldKind for Bool {
    fn kind_name(&self) -> &'static str {
        "Bool"
    }

    fn deserialize(&self, _node: &Node, value: Value, _env: &Environment) -> Result<Value, Invalid> {
        let truth = match &value {
            Value::Null => false,
            Value::Bool(b) => *b,
            other => {
                let token = other.to_string().trim().to_lowercase();
                TRUTHY.contains(&token.as_str())
            }
        };
        Ok(Value::Bool(truth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types;
    use proptest::prelude::*;

    #[test]
    fn test_truth_table() {
        let field = types::boolean().instantiate().unwrap();
        for token in ["y", "yes", "true", "1", "t", "on", " Enabled ", "TRUE"] {
            assert_eq!(field.deserialize(token).unwrap(), Value::Bool(true), "{token}");
        }
        for token in ["foo", "no", "0", "", "off"] {
            assert_eq!(field.deserialize(token).unwrap(), Value::Bool(false), "{token}");
        }
        assert_eq!(field.deserialize(Value::Null).unwrap(), Value::Bool(false));
        assert_eq!(field.deserialize(true).unwrap(), Value::Bool(true));
        assert_eq!(field.deserialize(1).unwrap(), Value::Bool(true));
        assert_eq!(field.deserialize(0).unwrap(), Value::Bool(false));
    }

    proptest! {
        #[test]
        fn truthy_tokens_ignore_case_and_padding(
            index in 0..TRUTHY.len(),
            upper in any::<bool>(),
            pad in 0..3usize,
        ) {
            let token = if upper { TRUTHY[index].to_uppercase() } else { TRUTHY[index].to_string() };
            let padded = format!("{}{token}{}", " ".repeat(pad), "\t".repeat(pad));
            let field = types::boolean().instantiate().unwrap();
            prop_assert_eq!(field.deserialize(padded).unwrap(), Value::Bool(true));
        }

        #[test]
        fn unknown_tokens_are_false(token in "[a-z]{2,8}") {
            prop_assume!(!TRUTHY.contains(&token.as_str()));
            let field = types::boolean().instantiate().unwrap();
            prop_assert_eq!(field.deserialize(token).unwrap(), Value::Bool(false));
        }
    }
}

//! # Numeric Fields
//!
//! A [`Number`] tries an ordered list of candidate numeric types and keeps
//! the first successful cast. The generic number tries integer before
//! float, so `"123"` becomes `Int(123)` and `"123.456"` becomes
//! `Float(123.456)`. Int and Float fields have a single candidate.
//!
//! Casting rules per candidate:
//!
//! | Input        | `Int`                         | `Float`            |
//! |--------------|-------------------------------|--------------------|
//! | `Int`        | unchanged                     | widened            |
//! | `Float`      | truncated toward zero if finite | unchanged        |
//! | `Bool`       | `0` / `1`                     | `0.0` / `1.0`      |
//! | `Text`/`Bytes` | parsed after trimming       | parsed after trimming |
//!
//! Anything else fails for every candidate.

use std::fmt;

use objective_core::{Environment, FieldKind, Invalid, Node, Value};

/// A numeric candidate type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberType {
    Int,
    Float,
}

impl NumberType {
    fn cast(self, value: &Value) -> Option<Value> {
        match self {
            NumberType::Int => cast_int(value).map(Value::Int),
            NumberType::Float => cast_float(value).map(Value::Float),
        }
    }
}

impl fmt::Display for NumberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberType::Int => f.write_str("int"),
            NumberType::Float => f.write_str("float"),
        }
    }
}

fn text_of(value: &Value) -> Option<&str> {
    match value {
        Value::Text(s) => Some(s.trim()),
        Value::Bytes(b) => std::str::from_utf8(b).ok().map(str::trim),
        _ => None,
    }
}

fn cast_int(value: &Value) -> Option<i64> {
    match value {
        Value::Int(i) => Some(*i),
        Value::Float(f) if f.is_finite() && *f >= i64::MIN as f64 && *f < i64::MAX as f64 => {
            Some(f.trunc() as i64)
        }
        Value::Bool(b) => Some(i64::from(*b)),
        other => text_of(other).and_then(|s| s.parse().ok()),
    }
}

fn cast_float(value: &Value) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        other => text_of(other).and_then(|s| s.parse().ok()),
    }
}

/// Field kind casting values through candidate numeric types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Number {
    candidates: Vec<NumberType>,
}

impl Number {
    pub fn new(candidates: impl IntoIterator<Item = NumberType>) -> Self {
        Self {
            candidates: candidates.into_iter().collect(),
        }
    }

    /// Integer first, then float.
    pub fn any() -> Self {
        Self::new([NumberType::Int, NumberType::Float])
    }

    pub fn int() -> Self {
        Self::new([NumberType::Int])
    }

    pub fn float() -> Self {
        Self::new([NumberType::Float])
    }

    pub fn candidates(&self) -> &[NumberType] {
        &self.candidates
    }
}

impl Default for Number {
    fn default() -> Self {
        Self::any()
    }
}

impl FieldKind for Number {
    fn kind_name(&self) -> &'static str {
        "Number"
    }

    fn deserialize(&self, node: &Node, value: Value, _env: &Environment) -> Result<Value, Invalid> {
        if let Some(cast) = self.candidates.iter().find_map(|candidate| candidate.cast(&value)) {
            return Ok(cast);
        }
        let candidates: Vec<String> = self.candidates.iter().map(ToString::to_string).collect();
        let message = format!("Invalid value `{value}` for `[{}]`", candidates.join(", "));
        tracing::trace!(node = %node.display_name(), %value, "number cast failed");
        Err(Invalid::value(node, value).with_message(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types;
    use proptest::prelude::*;

    #[test]
    fn test_generic_number_prefers_int() {
        let number = types::number().instantiate().unwrap();
        assert_eq!(number.deserialize("123").unwrap(), Value::Int(123));
        assert_eq!(number.deserialize("123.456").unwrap(), Value::Float(123.456));
        assert_eq!(number.deserialize(" 7 ").unwrap(), Value::Int(7));
        assert_eq!(number.deserialize(1.5).unwrap(), Value::Int(1));
    }

    #[test]
    fn test_failure_names_candidates() {
        let number = types::number().instantiate().unwrap();
        let err = number.deserialize("foo").unwrap_err();
        assert_eq!(err.message(), "Invalid value `foo` for `[int, float]`");
        assert_eq!(err.offending_value(), &Value::from("foo"));

        let int = types::int().instantiate().unwrap();
        let err = int.deserialize("1.5").unwrap_err();
        assert_eq!(err.message(), "Invalid value `1.5` for `[int]`");
    }

    #[test]
    fn test_float_and_int_fields() {
        let float = types::float().instantiate().unwrap();
        assert_eq!(float.deserialize("2").unwrap(), Value::Float(2.0));
        assert_eq!(float.deserialize(3).unwrap(), Value::Float(3.0));
        assert!(float.deserialize(Value::Null).is_err());

        let int = types::int().instantiate().unwrap();
        assert_eq!(int.deserialize(true).unwrap(), Value::Int(1));
        assert!(int.deserialize(f64::INFINITY).is_err());
    }

    #[test]
    fn test_serialize_passes_through() {
        let number = types::number().instantiate().unwrap();
        assert_eq!(number.serialize("12").unwrap(), Value::from("12"));
    }

    proptest! {
        #[test]
        fn integer_text_round_trips(n in any::<i64>()) {
            let number = types::number().instantiate().unwrap();
            prop_assert_eq!(number.deserialize(n.to_string()).unwrap(), Value::Int(n));
        }
    }
}

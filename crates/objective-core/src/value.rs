//! # Value Model
//!
//! Defines [`Value`], the in-memory structured value that flows through
//! every deserialize and serialize call, and the [`Value::Undefined`]
//! sentinel that marks "no value supplied".
//!
//! ## Sentinel
//!
//! `Undefined` is distinct from `Null`: a mapping lookup for an absent key
//! yields `Undefined`, and only `Undefined` triggers a field's missing
//! policy. `Null` is an ordinary value supplied by the caller.
//!
//! ## Mapping Containers
//!
//! Three mapping flavours exist so a schema can choose its output container:
//!
//! - [`Value::Map`]: a generic dictionary.
//! - [`Value::Bunch`]: a dictionary whose entries are read by field name.
//! - [`Value::Ordered`]: a dictionary that remembers insertion order.
//!
//! All three compare equal when they hold the same entries, whatever their
//! flavour or key order. [`Value::same_order`] compares key order as well.
//!
//! ## Hashability
//!
//! Scalars are hashable; containers are not. A `Set` only admits hashable
//! elements, which [`Value::is_hashable`] reports.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Deref, DerefMut, Index};

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::{IndexMap, IndexSet};
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// A generic string-keyed dictionary.
pub type Map = BTreeMap<String, Value>;

/// A string-keyed dictionary preserving insertion order.
pub type OrderedMap = IndexMap<String, Value>;

/// An insertion-ordered set of unique values.
pub type ValueSet = IndexSet<Value>;

static UNDEFINED: Value = Value::Undefined;

/// An in-memory structured value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// No value was supplied.
    #[default]
    Undefined,
    /// An explicit null.
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A text string.
    Text(String),
    /// Raw bytes, e.g. undecoded text.
    Bytes(Vec<u8>),
    /// A UTC timestamp.
    DateTime(DateTime<Utc>),
    /// An ordered sequence.
    List(Vec<Value>),
    /// A sequence of unique hashable values.
    Set(ValueSet),
    /// A generic dictionary.
    Map(Map),
    /// A dictionary read by field name.
    Bunch(Bunch),
    /// An order-preserving dictionary.
    Ordered(OrderedMap),
}

impl Value {
    /// Returns true for the `Undefined` sentinel.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Returns true for an explicit null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true for any of the three mapping containers.
    pub fn is_mapping(&self) -> bool {
        matches!(self, Value::Map(_) | Value::Bunch(_) | Value::Ordered(_))
    }

    /// Returns true for lists and sets.
    pub fn is_sequence(&self) -> bool {
        matches!(self, Value::List(_) | Value::Set(_))
    }

    /// Whether this value may be stored in a [`Value::Set`].
    pub fn is_hashable(&self) -> bool {
        !matches!(
            self,
            Value::List(_) | Value::Set(_) | Value::Map(_) | Value::Bunch(_) | Value::Ordered(_)
        )
    }

    /// A short, lower-case name for the variant, used in failure messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::DateTime(_) => "datetime",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
            Value::Bunch(_) => "bunch",
            Value::Ordered(_) => "ordered map",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&ValueSet> {
        match self {
            Value::Set(items) => Some(items),
            _ => None,
        }
    }

    /// Looks up `key` in a mapping container.
    ///
    /// Returns `None` for absent keys and for non-mapping values.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(map) => map.get(key),
            Value::Bunch(bunch) => bunch.get(key),
            Value::Ordered(map) => map.get(key),
            _ => None,
        }
    }

    /// Looks up `key`, yielding `Undefined` when it is absent.
    pub fn lookup(&self, key: &str) -> Value {
        self.get(key).cloned().unwrap_or_default()
    }

    /// Removes `key` from a mapping container, yielding `Undefined` when it
    /// is absent or `self` is not a mapping.
    pub fn take(&mut self, key: &str) -> Value {
        let taken = match self {
            Value::Map(map) => map.remove(key),
            Value::Bunch(bunch) => bunch.remove(key),
            Value::Ordered(map) => map.swap_remove(key),
            _ => None,
        };
        taken.unwrap_or_default()
    }

    /// Number of entries of a mapping container.
    pub fn mapping_len(&self) -> Option<usize> {
        match self {
            Value::Map(map) => Some(map.len()),
            Value::Bunch(bunch) => Some(bunch.len()),
            Value::Ordered(map) => Some(map.len()),
            _ => None,
        }
    }

    /// Iterates the entries of a mapping container.
    pub fn entries(&self) -> Option<Box<dyn Iterator<Item = (&String, &Value)> + '_>> {
        match self {
            Value::Map(map) => Some(Box::new(map.iter())),
            Value::Bunch(bunch) => Some(Box::new(bunch.iter())),
            Value::Ordered(map) => Some(Box::new(map.iter())),
            _ => None,
        }
    }

    /// Equal, and mapping containers also list their keys in the same order.
    pub fn same_order(&self, other: &Value) -> bool {
        match (self.entries(), other.entries()) {
            (Some(ours), Some(theirs)) => {
                self == other && ours.map(|(key, _)| key).eq(theirs.map(|(key, _)| key))
            }
            _ => self == other,
        }
    }

    fn same_entries(&self, other: &Value) -> bool {
        match (self.entries(), other.mapping_len()) {
            (Some(mut entries), Some(len)) if Some(len) == self.mapping_len() => {
                entries.all(|(key, value)| other.get(key) == Some(value))
            }
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b || a.to_bits() == b.to_bits(),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            _ if self.is_mapping() && other.is_mapping() => self.same_entries(other),
            _ => false,
        }
    }
}

// Floats compare by value or by identical bits, so NaN equals itself.
impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Undefined => 0u8.hash(state),
            Value::Null => 1u8.hash(state),
            Value::Bool(b) => {
                2u8.hash(state);
                b.hash(state);
            }
            Value::Int(i) => {
                3u8.hash(state);
                i.hash(state);
            }
            Value::Float(f) => {
                4u8.hash(state);
                // 0.0 and -0.0 are equal and must hash alike.
                let f = if *f == 0.0 { 0.0 } else { *f };
                f.to_bits().hash(state);
            }
            Value::Text(s) => {
                5u8.hash(state);
                s.hash(state);
            }
            Value::Bytes(b) => {
                6u8.hash(state);
                b.hash(state);
            }
            Value::DateTime(dt) => {
                7u8.hash(state);
                dt.hash(state);
            }
            Value::List(items) => {
                8u8.hash(state);
                items.hash(state);
            }
            Value::Set(items) => {
                9u8.hash(state);
                items.len().hash(state);
            }
            Value::Map(_) | Value::Bunch(_) | Value::Ordered(_) => {
                10u8.hash(state);
                self.mapping_len().hash(state);
            }
        }
    }
}

fn write_nested(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Text(s) => write!(f, "{s:?}"),
        other => write!(f, "{other}"),
    }
}

fn write_items<'a>(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    close: &str,
    items: impl Iterator<Item = &'a Value>,
) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_nested(f, item)?;
    }
    f.write_str(close)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("<Undefined>"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Text(s) => f.write_str(s),
            Value::Bytes(b) => f.write_str(&String::from_utf8_lossy(b)),
            Value::DateTime(dt) => f.write_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::List(items) => write_items(f, "[", "]", items.iter()),
            Value::Set(items) => write_items(f, "{", "}", items.iter()),
            Value::Map(_) | Value::Bunch(_) | Value::Ordered(_) => {
                f.write_str("{")?;
                if let Some(entries) = self.entries() {
                    for (i, (key, value)) in entries.enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{key:?}: ")?;
                        write_nested(f, value)?;
                    }
                }
                f.write_str("}")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Bunch
// ---------------------------------------------------------------------------

/// A dictionary whose entries are read by field name.
///
/// Indexing an absent field yields [`Value::Undefined`] instead of panicking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bunch(Map);

impl Bunch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a field, yielding `Undefined` when it is absent.
    pub fn field(&self, name: &str) -> &Value {
        self.0.get(name).unwrap_or(&UNDEFINED)
    }

    pub fn into_inner(self) -> Map {
        self.0
    }
}

impl Deref for Bunch {
    type Target = Map;

    fn deref(&self) -> &Map {
        &self.0
    }
}

impl DerefMut for Bunch {
    fn deref_mut(&mut self) -> &mut Map {
        &mut self.0
    }
}

impl Index<&str> for Bunch {
    type Output = Value;

    fn index(&self, name: &str) -> &Value {
        self.field(name)
    }
}

impl From<Map> for Bunch {
    fn from(map: Map) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Bunch {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Bytes(bytes)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<ValueSet> for Value {
    fn from(items: ValueSet) -> Self {
        Value::Set(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

impl From<Bunch> for Value {
    fn from(bunch: Bunch) -> Self {
        Value::Bunch(bunch)
    }
}

impl From<OrderedMap> for Value {
    fn from(map: OrderedMap) -> Self {
        Value::Ordered(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// serde
// ---------------------------------------------------------------------------

fn serialize_entries<'a, S: Serializer>(
    serializer: S,
    len: usize,
    entries: impl Iterator<Item = (&'a String, &'a Value)>,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(len))?;
    for (key, value) in entries {
        map.serialize_entry(key, value)?;
    }
    map.end()
}

fn serialize_items<'a, S: Serializer>(
    serializer: S,
    len: usize,
    items: impl Iterator<Item = &'a Value>,
) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(len))?;
    for item in items {
        seq.serialize_element(item)?;
    }
    seq.end()
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Undefined | Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Bytes(b) => serializer.serialize_bytes(b),
            Value::DateTime(dt) => {
                serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Value::List(items) => serialize_items(serializer, items.len(), items.iter()),
            Value::Set(items) => serialize_items(serializer, items.len(), items.iter()),
            Value::Map(map) => serialize_entries(serializer, map.len(), map.iter()),
            Value::Bunch(bunch) => serialize_entries(serializer, bunch.len(), bunch.iter()),
            Value::Ordered(map) => serialize_entries(serializer, map.len(), map.iter()),
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any structured value")
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> Result<Value, E> {
        Ok(Value::Bool(b))
    }

    fn visit_i64<E: de::Error>(self, i: i64) -> Result<Value, E> {
        Ok(Value::Int(i))
    }

    fn visit_u64<E: de::Error>(self, u: u64) -> Result<Value, E> {
        Ok(i64::try_from(u).map_or(Value::Float(u as f64), Value::Int))
    }

    fn visit_f64<E: de::Error>(self, f: f64) -> Result<Value, E> {
        Ok(Value::Float(f))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<Value, E> {
        Ok(Value::Text(s.to_string()))
    }

    fn visit_string<E: de::Error>(self, s: String) -> Result<Value, E> {
        Ok(Value::Text(s))
    }

    fn visit_bytes<E: de::Error>(self, b: &[u8]) -> Result<Value, E> {
        Ok(Value::Bytes(b.to_vec()))
    }

    fn visit_byte_buf<E: de::Error>(self, b: Vec<u8>) -> Result<Value, E> {
        Ok(Value::Bytes(b))
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Value, A::Error> {
        let mut map = Map::new();
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            map.insert(key, value);
        }
        Ok(Value::Map(map))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_undefined_is_not_null() {
        assert_ne!(Value::Undefined, Value::Null);
        assert_eq!(Value::Undefined, Value::Undefined);
        assert!(Value::default().is_undefined());
    }

    #[test]
    fn test_from_json_object() {
        let value = Value::from(json!({"a": 1, "b": [true, null], "c": 1.5, "d": "x"}));
        assert_eq!(value.get("a"), Some(&Value::Int(1)));
        assert_eq!(
            value.get("b"),
            Some(&Value::List(vec![Value::Bool(true), Value::Null]))
        );
        assert_eq!(value.get("c"), Some(&Value::Float(1.5)));
        assert_eq!(value.get("d"), Some(&Value::from("x")));
        assert_eq!(value.lookup("missing"), Value::Undefined);
    }

    #[test]
    fn test_mapping_flavours_compare_as_dictionaries() {
        let map = Value::from(json!({"a": 1, "b": 2}));
        let mut ordered = OrderedMap::new();
        ordered.insert("b".into(), Value::Int(2));
        ordered.insert("a".into(), Value::Int(1));
        let bunch: Bunch = [("a".to_string(), Value::Int(1)), ("b".to_string(), Value::Int(2))]
            .into_iter()
            .collect();

        assert_eq!(map, Value::Ordered(ordered.clone()));
        assert_eq!(map, Value::Bunch(bunch.clone()));
        assert_eq!(Value::Bunch(bunch), Value::Ordered(ordered));
    }

    #[test]
    fn test_mapping_equality_is_transitive_across_key_order() {
        let mut ab = OrderedMap::new();
        ab.insert("a".into(), Value::Int(1));
        ab.insert("b".into(), Value::Int(2));
        let mut ba = OrderedMap::new();
        ba.insert("b".into(), Value::Int(2));
        ba.insert("a".into(), Value::Int(1));
        let (ab, ba) = (Value::Ordered(ab), Value::Ordered(ba));
        let map = Value::from(json!({"a": 1, "b": 2}));

        assert_eq!(map, ab);
        assert_eq!(map, ba);
        assert_eq!(ab, ba);
        assert!(!ab.same_order(&ba));
        assert!(ab.same_order(&ab.clone()));
        assert!(map.same_order(&ab));
    }

    #[test]
    fn test_bunch_field_access() {
        let bunch: Bunch = [("foo".to_string(), Value::from("bar"))].into_iter().collect();
        assert_eq!(bunch["foo"], Value::from("bar"));
        assert_eq!(bunch["missing"], Value::Undefined);
    }

    #[test]
    fn test_take_removes_entry() {
        let mut value = Value::from(json!({"a": 1}));
        assert_eq!(value.take("a"), Value::Int(1));
        assert_eq!(value.take("a"), Value::Undefined);
        assert_eq!(Value::Int(3).take("a"), Value::Undefined);
    }

    #[test]
    fn test_hashability() {
        assert!(Value::from("x").is_hashable());
        assert!(Value::Int(1).is_hashable());
        assert!(!Value::List(vec![]).is_hashable());
        assert!(!Value::Map(Map::new()).is_hashable());
    }

    #[test]
    fn test_set_deduplicates_floats_and_zero_signs() {
        let mut set = ValueSet::new();
        set.insert(Value::Float(0.0));
        set.insert(Value::Float(-0.0));
        set.insert(Value::Float(f64::NAN));
        set.insert(Value::Float(f64::NAN));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Undefined.to_string(), "<Undefined>");
        assert_eq!(Value::Float(1.0).to_string(), "1.0");
        assert_eq!(Value::from("foo").to_string(), "foo");
        assert_eq!(
            Value::List(vec![Value::from("a"), Value::Int(1)]).to_string(),
            "[\"a\", 1]"
        );
        assert_eq!(Value::from(json!({"k": "v"})).to_string(), "{\"k\": \"v\"}");
    }

    #[test]
    fn test_serde_roundtrip_through_json() {
        let value = Value::from(json!({"a": [1, 2.5, "x"], "b": {"c": null}}));
        let text = serde_json::to_string(&value).unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value, parsed);
    }

    #[test]
    fn test_serialize_undefined_as_null() {
        let mut map = Map::new();
        map.insert("a".into(), Value::Undefined);
        let json = serde_json::to_value(Value::Map(map)).unwrap();
        assert_eq!(json, json!({"a": null}));
    }
}

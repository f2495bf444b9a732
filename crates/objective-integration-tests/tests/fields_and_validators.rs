//! # Leaf Fields and Validators in Schemas
//!
//! Number, text, boolean and date/time fields inside mappings, and the
//! validator library attached to schema children.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use objective_core::{types, Declaration, Environment, Missing, NodeType, Value};
use objective_fields::types as fields;
use objective_integration_tests::{errors, expected, value};
use objective_validation::{Chain, Email, FieldValue, OneOf, Pattern, ValueMap};
use serde_json::json;

// =========================================================================
// Numbers
// =========================================================================

fn numbers() -> NodeType {
    NodeType::derive("M", &types::mapping())
        .item("n", Declaration::of(&fields::number()))
        .item("m", Declaration::of(&fields::number()).missing(Missing::value("456")))
        .build()
        .unwrap()
}

#[test]
fn number_defaults_are_coerced_too() {
    let m = numbers().instantiate().unwrap();
    assert_eq!(
        m.deserialize(value(json!({"n": "123"}))).unwrap(),
        value(json!({"n": 123, "m": 456}))
    );
    assert_eq!(
        m.deserialize(value(json!({"n": "123", "m": "123.456"}))).unwrap(),
        value(json!({"n": 123, "m": 123.456}))
    );
}

#[test]
fn number_failure_is_attached_to_the_child() {
    let m = numbers().instantiate().unwrap();
    let err = m.deserialize(value(json!({"n": "foo"}))).unwrap_err();
    assert!(err.is_children());
    assert_eq!(
        errors(&err),
        expected(&[("n", "Invalid value `foo` for `[int, float]`")])
    );
}

// =========================================================================
// Text, booleans, date/time
// =========================================================================

#[test]
fn text_always_produces_text() {
    let u = fields::text().instantiate().unwrap();
    assert_eq!(u.deserialize("abc").unwrap(), Value::from("abc"));
    assert_eq!(u.deserialize(123).unwrap(), Value::from("123"));
    assert_eq!(u.serialize("123").unwrap(), Value::from("123"));
}

#[test]
fn datetime_inputs_agree() {
    let f = fields::utc_datetime().instantiate().unwrap();
    let reference = f.deserialize("2014-05-07T14:19:09.522Z").unwrap();
    for input in [
        Value::from("2014-05-07 14:19:09.522000+00:00"),
        Value::Float(1399472349.522),
    ] {
        assert_eq!(f.deserialize(input).unwrap(), reference);
    }
}

#[test]
fn naive_datetime_is_utc() {
    let f = fields::utc_datetime().instantiate().unwrap();
    let expected = Utc.with_ymd_and_hms(2001, 9, 11, 10, 42, 3).single().unwrap();
    assert_eq!(f.deserialize("2001-09-11 10:42:03").unwrap(), Value::DateTime(expected));
    assert_eq!(f.serialize(expected).unwrap(), Value::from("2001-09-11T10:42:03Z"));
}

proptest! {
    #[test]
    fn boolean_never_fails_on_text(token in ".{0,12}") {
        let b = fields::boolean().instantiate().unwrap();
        prop_assert!(matches!(b.deserialize(token).unwrap(), Value::Bool(_)));
    }
}

// =========================================================================
// Validators
// =========================================================================

#[test]
fn register_and_login_share_validated_body() {
    let register_body = NodeType::derive("body", &types::mapping())
        .item("email", Declaration::of(&fields::text()).validator(Email))
        .item("password", Declaration::of(&fields::text()).missing(Missing::Ignore))
        .build()
        .unwrap();
    let login_body = NodeType::derive("body", &register_body)
        .item("password", Declaration::of(&fields::text()))
        .build()
        .unwrap();
    let login = NodeType::derive("LoginUserObjective", &types::bunch_mapping())
        .item("body", Declaration::of(&login_body))
        .build()
        .unwrap()
        .instantiate()
        .unwrap();

    let ok = login
        .deserialize(value(json!({"body": {"password": "foo", "email": "foo@example.com"}})))
        .unwrap();
    assert_eq!(
        ok,
        value(json!({"body": {"password": "foo", "email": "foo@example.com"}}))
    );

    let err = login
        .deserialize(value(json!({"body": {"email": "not-an-address"}})))
        .unwrap_err();
    assert_eq!(
        errors(&err),
        expected(&[
            ("body", "Invalid value for `body`: <Undefined>"),
            ("body/email", "'not-an-address' is not a valid email address"),
            ("body/password", "Value for `password` is missing!"),
        ])
    );
}

#[test]
fn membership_and_pattern_validators() {
    let schema = NodeType::derive("Palette", &types::mapping())
        .item("color", Declaration::of(&fields::text()).validator(OneOf::new(["red", "green"])))
        .item("code", Declaration::of(&fields::text()).validator(Pattern::new("^#[0-9a-f]{6}$").unwrap()))
        .build()
        .unwrap()
        .instantiate()
        .unwrap();

    assert!(schema
        .deserialize(value(json!({"color": "red", "code": "#00ff00"})))
        .is_ok());

    let err = schema
        .deserialize(value(json!({"color": "blue", "code": "green"})))
        .unwrap_err();
    assert_eq!(
        errors(&err),
        expected(&[
            ("color", "Invalid value for `color`: blue"),
            ("code", "'green' does not match pattern '^#[0-9a-f]{6}$'"),
        ])
    );
}

#[test]
fn value_map_with_default() {
    let map = ValueMap::new([(true, "0"), (false, "1")]).default_value("2");
    let node = types::field().instantiate().unwrap();
    let env = Environment::default();
    for (input, result) in [(true.into(), "0"), (false.into(), "1"), (Value::Null, "2")] {
        assert_eq!(
            objective_core::Validator::validate(&map, &node, input, &env).unwrap(),
            Value::from(result)
        );
    }
}

#[test]
fn chained_remap_then_boolean_field() {
    let toggle = NodeType::derive("Toggle", &types::mapping())
        .item(
            "flag",
            Declaration::of(&types::field()).validator(
                Chain::new()
                    .then(ValueMap::new([(true, "False"), (false, "On")]).default_value("2"))
                    .then(FieldValue::new(&fields::boolean()).unwrap()),
            ),
        )
        .build()
        .unwrap()
        .instantiate()
        .unwrap();

    for (input, result) in [(json!(true), false), (json!(false), true), (json!(null), false)] {
        assert_eq!(
            toggle.deserialize(value(json!({"flag": input}))).unwrap(),
            value(json!({"flag": result}))
        );
    }
}

#[test]
fn delegated_field_failures_use_the_outer_name() {
    let pair = NodeType::derive("Pair", &types::mapping())
        .item("x", Declaration::of(&fields::text()))
        .build()
        .unwrap();
    let schema = NodeType::derive("M", &types::mapping())
        .item(
            "age",
            Declaration::of(&types::field()).validator(FieldValue::new(&fields::int()).unwrap()),
        )
        .item(
            "pair",
            Declaration::of(&types::field()).validator(FieldValue::new(&pair).unwrap()),
        )
        .build()
        .unwrap()
        .instantiate()
        .unwrap();

    assert_eq!(
        schema.deserialize(value(json!({"age": "7", "pair": {"x": 1}}))).unwrap(),
        value(json!({"age": 7, "pair": {"x": "1"}}))
    );

    let err = schema
        .deserialize(value(json!({"age": "abc", "pair": {}})))
        .unwrap_err();
    assert_eq!(
        errors(&err),
        expected(&[
            ("age", "Invalid value `abc` for `[int]`"),
            ("pair", "Invalid value for `pair`: <Undefined>"),
            ("pair/x", "Value for `x` is missing!"),
        ])
    );
}

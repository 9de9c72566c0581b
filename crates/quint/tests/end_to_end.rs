//! End-to-end decode/encode scenarios.

use quint::{Decoder, EncodeError, Encoder, Map, Value};

#[test]
fn mixed_key_object_decodes_in_order() {
    let value = quint::from_str("{ key: 'v', \"k2\": 0xFF, arr: [1, 2,], }").unwrap();
    let object = value.as_object().unwrap();

    let keys: Vec<&str> = object.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["key", "k2", "arr"]);
    assert_eq!(object["key"], Value::Str("v".to_string()));
    assert_eq!(object["k2"], Value::Int(255));
    assert_eq!(object["arr"], Value::Array(vec![Value::Int(1), Value::Int(2)]));
}

#[test]
fn infinities_and_nan_decode() {
    let value = quint::from_str("[Infinity, -Infinity, NaN]").unwrap();
    let items = value.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0], Value::Float(f64::INFINITY));
    assert_eq!(items[1], Value::Float(f64::NEG_INFINITY));
    assert!(items[2].as_float().unwrap().is_nan());
}

#[test]
fn padded_line_continuation_collapses() {
    let value = quint::from_str("'a\\\n  b'").unwrap();
    assert_eq!(value, Value::Str("ab".to_string()));
}

#[test]
fn indent_two_produces_trailing_comma_layout() {
    let mut map = Map::new();
    map.insert("a".to_string(), Value::Int(1));
    map.insert(
        "b".to_string(),
        Value::Array(vec![Value::Int(2), Value::Int(3)]),
    );
    let text = Encoder::new().indent(2).encode(&Value::Object(map)).unwrap();
    assert_eq!(text, "{\n  \"a\": 1,\n  \"b\": [\n    2,\n    3,\n  ],\n}");
}

#[test]
fn nan_with_allow_nan_off_is_rejected() {
    let mut map = Map::new();
    map.insert("x".to_string(), Value::Float(f64::NAN));
    let err = Encoder::new()
        .allow_nan(false)
        .encode(&Value::Object(map))
        .unwrap_err();
    assert!(matches!(err, EncodeError::FloatOutOfRange(_)));
}

#[test]
fn schema_comment_appears_before_key() {
    let schema = quint::from_str("{ properties: { x: { description: 'top' } } }").unwrap();

    let mut map = Map::new();
    map.insert("x".to_string(), Value::Int(1));

    let text = Encoder::new()
        .indent(2)
        .encode_with_schema(&Value::Object(map), Some(&schema))
        .unwrap();
    assert_eq!(text, "{\n  // top\n  \"x\": 1,\n}");
}

#[test]
fn decoded_showcase_document_re_encodes_stably() {
    let source = r#"{
        // a config
        name: 'demo',          /* block comment */
        retries: 3,
        ratio: .5,
        limits: { lo: -0x10, hi: 0xFF, },
        tags: ['a', 'b',],
    }"#;
    let first = quint::from_str(source).unwrap();
    let text = quint::to_string(&first).unwrap();
    let second = quint::from_str(&text).unwrap();
    assert_eq!(first, second);
}

#[test]
fn hooks_compose_with_encode() {
    // Parse every integer as a string tagged with its literal text, then
    // encode the transformed tree.
    let decoder = Decoder::new().parse_int(|text| Ok(Value::Str(format!("<{text}>"))));
    let value = decoder.decode("[1, 2]").unwrap();
    assert_eq!(quint::to_string(&value).unwrap(), "[\"<1>\", \"<2>\"]");
}

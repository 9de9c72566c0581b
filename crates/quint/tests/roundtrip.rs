//! Round-trip stability: decode∘encode and encode∘decode.

use proptest::prelude::*;

use quint::{Decoder, Encoder, KeyQuotation, Map, Value};

fn roundtrip(value: &Value) -> Value {
    let text = quint::to_string(value).unwrap();
    // Strict mode rejects the letter escapes the encoder emits for
    // \n, \r and \t; round-trips therefore decode in non-strict mode.
    Decoder::new().strict(false).decode(&text).unwrap()
}

#[test]
fn scalars_roundtrip() {
    for value in [
        Value::Null,
        Value::Bool(true),
        Value::Bool(false),
        Value::Int(0),
        Value::Int(i64::MIN),
        Value::Int(i64::MAX),
        Value::Float(0.5),
        Value::Float(-1.25e-9),
        Value::Float(8675309.0),
        Value::Float(1e300),
        Value::Str(String::new()),
        Value::Str("plain".to_string()),
        Value::Str("tab\t newline\n quote\" backslash\\".to_string()),
        Value::Str("unicode é 中 😀".to_string()),
    ] {
        assert_eq!(roundtrip(&value), value);
    }
}

#[test]
fn infinities_roundtrip() {
    assert_eq!(
        roundtrip(&Value::Float(f64::INFINITY)),
        Value::Float(f64::INFINITY)
    );
    assert_eq!(
        roundtrip(&Value::Float(f64::NEG_INFINITY)),
        Value::Float(f64::NEG_INFINITY)
    );
    assert!(roundtrip(&Value::Float(f64::NAN)).as_float().unwrap().is_nan());
}

#[test]
fn nested_tree_roundtrips() {
    let mut inner = Map::new();
    inner.insert("z".to_string(), Value::Null);
    inner.insert("nine".to_string(), Value::Int(9));
    let mut outer = Map::new();
    outer.insert("list".to_string(), Value::Array(vec![
        Value::Int(1),
        Value::Float(2.5),
        Value::Str("three".to_string()),
        Value::Object(inner),
    ]));
    outer.insert("empty".to_string(), Value::Array(vec![]));
    outer.insert("nothing".to_string(), Value::Object(Map::new()));
    let value = Value::Object(outer);

    assert_eq!(roundtrip(&value), value);
}

#[test]
fn roundtrip_through_every_layout() {
    let value = quint::from_str("{a: [1, 2.5, 'x'], b: {c: null, d: true}}").unwrap();

    let encoders = [
        Encoder::new(),
        Encoder::new().indent(4),
        Encoder::new().indent(2).trailing_comma(false),
        Encoder::new().trailing_comma(true),
        Encoder::new().sort_keys(true),
        Encoder::new().key_quotation(KeyQuotation::Single),
        Encoder::new().key_quotation(KeyQuotation::Bare),
        Encoder::new().ensure_ascii(false),
        Encoder::new().separators(",", ":"),
    ];
    for encoder in encoders {
        let text = encoder.encode(&value).unwrap();
        assert_eq!(quint::from_str(&text).unwrap(), value, "layout: {text}");
    }
}

fn value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        any::<f64>()
            .prop_filter("finite floats only", |f| f.is_finite())
            .prop_map(|f| Value::Float(if f == 0.0 { 0.0 } else { f })),
        "\\PC{0,12}".prop_map(Value::Str),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,8}", inner), 0..6).prop_map(|entries| {
                let mut map = Map::new();
                for (key, value) in entries {
                    map.insert(key, value);
                }
                Value::Object(map)
            }),
        ]
    })
}

proptest! {
    #[test]
    fn prop_decode_of_encode_is_identity(value in value_strategy()) {
        prop_assert_eq!(roundtrip(&value), value);
    }

    #[test]
    fn prop_pretty_layout_decodes_equal(value in value_strategy()) {
        let text = Encoder::new().indent(2).encode(&value).unwrap();
        let decoded = Decoder::new().strict(false).decode(&text).unwrap();
        prop_assert_eq!(decoded, value);
    }
}

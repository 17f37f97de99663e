//! Standard JSON stays a strict subset: every valid JSON document parses
//! to an equivalent value, and the `quote_keys` emitter mode renders back
//! to documents a standard JSON parser agrees with. `serde_json` (with
//! `preserve_order`) is the oracle.

use kjson::{EmitOptions, Value, parse, to_string_with};

fn json_mode() -> EmitOptions {
    EmitOptions {
        quote_keys: true,
        ..EmitOptions::default()
    }
}

/// Parses `doc` as kJSON, re-emits it in standard-JSON mode, and checks
/// the result against the original through `serde_json`.
fn assert_json_equivalent(doc: &str) {
    let value = parse(doc).unwrap_or_else(|e| panic!("kjson rejected valid JSON {doc:?}: {e}"));
    let emitted = to_string_with(&value, &json_mode());
    let original: serde_json::Value = serde_json::from_str(doc).unwrap();
    let round: serde_json::Value = serde_json::from_str(&emitted)
        .unwrap_or_else(|e| panic!("emitted {emitted:?} is not standard JSON: {e}"));
    assert_eq!(round, original, "document {doc:?} changed through {emitted:?}");
}

#[test]
fn json_documents_survive_the_round_trip() {
    let docs = [
        "null",
        "true",
        "[]",
        "{}",
        r#""plain string""#,
        "[1, 2, 3]",
        r#"{"a": 1, "b": [true, false, null], "c": {"d": "e"}}"#,
        r#"{"mixed": [0, -7, 2.5, "s", {"k": []}]}"#,
        r#"{"needs escape": "tab\tnewline\nquote\"", "unicode": "é "}"#,
        r#"{"": "empty key", "sp ace": 1}"#,
        "[1000, -2.5e-2, 0.125]",
    ]; // integers and fraction-preserving floats only, so the serde_json
    // number comparison stays exact
    for doc in docs {
        assert_json_equivalent(doc);
    }
}

#[test]
fn json_key_order_is_preserved() {
    let value = parse(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
    let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, ["z", "a", "m"]);
}

#[test]
fn json_numbers_parse_as_doubles() {
    let value = parse("[0, -1, 2.5, 1e10]").unwrap();
    assert_eq!(
        value,
        Value::Array(vec![
            Value::Number(0.0),
            Value::Number(-1.0),
            Value::Number(2.5),
            Value::Number(1e10),
        ])
    );
}

#[test]
fn escaped_and_raw_unicode_agree() {
    let a = parse("\"caf\\u00E9\"").unwrap();
    let b = parse("\"café\"").unwrap();
    assert_eq!(a, b);
}

#[test]
fn surrogate_pair_escapes_decode() {
    let v = parse("\"\\uD83D\\uDE00\"").unwrap();
    assert_eq!(v, Value::from("\u{1F600}"));
}

#[test]
fn json_mode_quotes_reserved_word_keys() {
    let value = parse("{null: 1}").unwrap();
    assert_eq!(to_string_with(&value, &json_mode()), r#"{"null": 1}"#);
}

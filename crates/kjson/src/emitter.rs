//! Rendering [`Value`] trees back to kJSON text.
//!
//! The emitter is total: every well-formed value renders. Its canonical
//! output is itself valid kJSON, and with `quote_keys` enabled the output
//! of extended-type-free trees is valid standard JSON.
//!
//! Two policies live here. Key quoting: a key stays bare iff it matches
//! identifier syntax and is not a reserved word. Quote selection: each
//! string picks the delimiter (single, double, or backtick) that needs the
//! fewest escapes, ties resolved single > double > backtick; backtick
//! strings may carry raw newlines.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::value::Value;

/// Configuration options for [`to_string_with`].
///
/// The default renders compact output with `, ` and `: ` separators,
/// unquoted identifier keys, and `n`/`m` suffixes on the extended numeric
/// types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Indentation unit for pretty output, e.g. `"  "`. `None` emits the
    /// compact single-line form.
    ///
    /// # Default
    ///
    /// `None`
    pub indent: Option<String>,

    /// Quote every key and every string with double quotes, JSON-style.
    /// This is the standard-JSON compatibility mode: trees without
    /// extended types render as plain JSON, and `undefined` members inside
    /// containers degrade to `null`.
    ///
    /// # Default
    ///
    /// `false`
    pub quote_keys: bool,

    /// Emit the `n` suffix on big integers. Disabling it makes big
    /// integers indistinguishable from plain numbers on re-parse.
    ///
    /// # Default
    ///
    /// `true`
    pub bigint_suffix: bool,

    /// Emit the `m` suffix on decimals. Disabling it loses the decimal
    /// typing on re-parse.
    ///
    /// # Default
    ///
    /// `true`
    pub decimal_suffix: bool,

    /// Emit object members in sorted key order instead of insertion order.
    ///
    /// # Default
    ///
    /// `false`
    pub sort_keys: bool,

    /// Escape every code point at or above `U+007F` as `\uXXXX` (surrogate
    /// pairs outside the BMP).
    ///
    /// # Default
    ///
    /// `false`
    pub escape_non_ascii: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        EmitOptions {
            indent: None,
            quote_keys: false,
            bigint_suffix: true,
            decimal_suffix: true,
            sort_keys: false,
            escape_non_ascii: false,
        }
    }
}

impl EmitOptions {
    /// The conventional pretty configuration: two-space indentation.
    #[must_use]
    pub fn pretty() -> Self {
        EmitOptions {
            indent: Some("  ".to_string()),
            ..EmitOptions::default()
        }
    }
}

/// Renders `value` compactly with default options.
#[must_use]
pub fn to_string(value: &Value) -> String {
    to_string_with(value, &EmitOptions::default())
}

/// Renders `value` pretty-printed with two-space indentation.
#[must_use]
pub fn to_string_pretty(value: &Value) -> String {
    to_string_with(value, &EmitOptions::pretty())
}

/// Renders `value` according to `options`.
#[must_use]
pub fn to_string_with(value: &Value, options: &EmitOptions) -> String {
    let mut out = String::new();
    Emitter { options }.write_value(&mut out, value, 0, false);
    out
}

struct Emitter<'opts> {
    options: &'opts EmitOptions,
}

impl Emitter<'_> {
    fn write_value(&self, out: &mut String, value: &Value, depth: usize, in_container: bool) {
        match value {
            Value::Null => out.push_str("null"),
            Value::Undefined => {
                // Standard-JSON mode keeps containers JSON-clean.
                if self.options.quote_keys && in_container {
                    out.push_str("null");
                } else {
                    out.push_str("undefined");
                }
            }
            Value::Bool(true) => out.push_str("true"),
            Value::Bool(false) => out.push_str("false"),
            Value::Number(n) => write_number(out, *n),
            Value::BigInt(b) => {
                out.push_str(&b.to_string());
                if self.options.bigint_suffix {
                    out.push('n');
                }
            }
            Value::Decimal(d) => {
                d.write_canonical(out);
                if self.options.decimal_suffix {
                    out.push('m');
                }
            }
            Value::String(s) => self.write_string(out, s),
            Value::Uuid(u) => {
                let mut buf = uuid::Uuid::encode_buffer();
                out.push_str(u.hyphenated().encode_lower(&mut buf));
            }
            Value::Instant(t) => t.write_canonical(out),
            Value::Duration(d) => d.write_canonical(out),
            Value::Binary(bytes) => {
                // Text kJSON has no binary literal; ship the octets as a
                // base64 string. Lossless only through kJSONB.
                self.write_string(out, &BASE64.encode(bytes));
            }
            Value::Array(items) => self.write_array(out, items, depth),
            Value::Object(map) => self.write_object(out, map, depth),
        }
    }

    fn write_array(&self, out: &mut String, items: &[Value], depth: usize) {
        if items.is_empty() {
            out.push_str("[]");
            return;
        }
        out.push('[');
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push(',');
                if self.options.indent.is_none() {
                    out.push(' ');
                }
            }
            self.newline_indent(out, depth + 1);
            self.write_value(out, item, depth + 1, true);
        }
        self.newline_indent(out, depth);
        out.push(']');
    }

    fn write_object(&self, out: &mut String, map: &crate::value::Map, depth: usize) {
        if map.is_empty() {
            out.push_str("{}");
            return;
        }
        let mut members: Vec<(&String, &Value)> = map.iter().collect();
        if self.options.sort_keys {
            members.sort_by(|a, b| a.0.cmp(b.0));
        }
        out.push('{');
        for (i, (key, value)) in members.iter().enumerate() {
            if i > 0 {
                out.push(',');
                if self.options.indent.is_none() {
                    out.push(' ');
                }
            }
            self.newline_indent(out, depth + 1);
            self.write_key(out, key);
            out.push_str(": ");
            self.write_value(out, value, depth + 1, true);
        }
        self.newline_indent(out, depth);
        out.push('}');
    }

    fn newline_indent(&self, out: &mut String, depth: usize) {
        if let Some(indent) = &self.options.indent {
            out.push('\n');
            for _ in 0..depth {
                out.push_str(indent);
            }
        }
    }

    fn write_key(&self, out: &mut String, key: &str) {
        if !self.options.quote_keys && is_bare_key(key) {
            out.push_str(key);
        } else {
            self.write_string(out, key);
        }
    }

    fn write_string(&self, out: &mut String, s: &str) {
        let delim = if self.options.quote_keys {
            '"'
        } else {
            select_quote(s)
        };
        out.push(delim);
        for c in s.chars() {
            match c {
                c if c == delim => {
                    out.push('\\');
                    out.push(c);
                }
                '\\' => out.push_str("\\\\"),
                '\u{0008}' => out.push_str("\\b"),
                '\t' => out.push_str("\\t"),
                '\n' if delim == '`' => out.push('\n'),
                '\n' => out.push_str("\\n"),
                '\u{000C}' => out.push_str("\\f"),
                '\r' => out.push_str("\\r"),
                // Escape the separators older JSON parsers mishandle.
                '\u{2028}' | '\u{2029}' => push_unicode_escape(out, c),
                c if c.is_control() => push_unicode_escape(out, c),
                c if self.options.escape_non_ascii && (c as u32) >= 0x7F => {
                    push_unicode_escape(out, c);
                }
                c => out.push(c),
            }
        }
        out.push(delim);
    }
}

/// Emits `\uXXXX`, using a surrogate pair above the BMP.
fn push_unicode_escape(out: &mut String, c: char) {
    use core::fmt::Write;

    let code = c as u32;
    if code <= 0xFFFF {
        let _ = write!(out, "\\u{code:04X}");
    } else {
        let reduced = code - 0x10000;
        let high = 0xD800 + (reduced >> 10);
        let low = 0xDC00 + (reduced & 0x3FF);
        let _ = write!(out, "\\u{high:04X}\\u{low:04X}");
    }
}

/// Shortest-round-trip number rendering; non-finite values become the
/// bare words the scanner recognises.
fn write_number(out: &mut String, n: f64) {
    use core::fmt::Write;

    if n.is_nan() {
        out.push_str("NaN");
    } else if n == f64::INFINITY {
        out.push_str("Infinity");
    } else if n == f64::NEG_INFINITY {
        out.push_str("-Infinity");
    } else {
        let _ = write!(out, "{n}");
    }
}

/// Reserved words can never be bare keys; the parser would read them as
/// their literal values.
const RESERVED: [&str; 6] = ["true", "false", "null", "undefined", "Infinity", "NaN"];

fn is_bare_key(key: &str) -> bool {
    let mut chars = key.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_' || first == '$') {
        return false;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$') {
        return false;
    }
    // A key like "P1Y" would re-scan as a duration literal, not an
    // identifier, so it must be quoted.
    if crate::parser::scanner::match_duration(key.as_bytes()) == Some(key.len()) {
        return false;
    }
    !RESERVED.contains(&key)
}

/// Picks the delimiter needing the fewest escapes; ties break single >
/// double > backtick.
fn select_quote(s: &str) -> char {
    let mut singles = 0usize;
    let mut doubles = 0usize;
    let mut backticks = 0usize;
    let mut newlines = 0usize;
    for c in s.chars() {
        match c {
            '\'' => singles += 1,
            '"' => doubles += 1,
            '`' => backticks += 1,
            '\n' => newlines += 1,
            _ => {}
        }
    }
    // Backslashes and other control characters cost the same escape under
    // every delimiter, so only the quote characters themselves and
    // newlines (free inside backticks) influence the choice.
    let single_cost = singles + newlines;
    let double_cost = doubles + newlines;
    let backtick_cost = backticks;
    if single_cost <= double_cost && single_cost <= backtick_cost {
        '\''
    } else if double_cost <= backtick_cost {
        '"'
    } else {
        '`'
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::types::{BigInt, Decimal128};
    use crate::value::Map;

    fn obj(pairs: &[(&str, Value)]) -> Value {
        let mut map = Map::new();
        for (k, v) in pairs {
            map.insert((*k).to_string(), v.clone());
        }
        Value::Object(map)
    }

    #[test]
    fn compact_object_uses_spaced_separators() {
        let v = obj(&[
            ("a", Value::Number(1.0)),
            ("b", Value::BigInt(BigInt::from(2i64))),
            ("c", Value::Decimal("3.5".parse::<Decimal128>().unwrap())),
        ]);
        assert_eq!(to_string(&v), "{a: 1, b: 2n, c: 3.5m}");
    }

    #[test]
    fn pretty_prints_one_member_per_line() {
        let v = obj(&[("a", Value::Number(1.0)), ("b", Value::Array(vec![
            Value::Number(2.0),
            Value::Number(3.0),
        ]))]);
        assert_eq!(
            to_string_pretty(&v),
            "{\n  a: 1,\n  b: [\n    2,\n    3\n  ]\n}"
        );
    }

    #[test]
    fn empty_containers_stay_flat() {
        assert_eq!(to_string_pretty(&Value::Array(vec![])), "[]");
        assert_eq!(to_string_pretty(&Value::Object(Map::new())), "{}");
    }

    #[test]
    fn keys_needing_quotes_get_them() {
        let v = obj(&[
            ("plain_key", Value::Null),
            ("needs space", Value::Null),
            ("null", Value::Null),
            ("", Value::Null),
        ]);
        assert_eq!(
            to_string(&v),
            "{plain_key: null, 'needs space': null, 'null': null, '': null}"
        );
    }

    #[test]
    fn duration_shaped_keys_are_quoted() {
        let v = obj(&[("P1Y", Value::Null), ("PT5M", Value::Null), ("Plain", Value::Null)]);
        let text = to_string(&v);
        assert_eq!(text, "{'P1Y': null, 'PT5M': null, Plain: null}");
        assert_eq!(parse(&text).unwrap(), v);
    }

    #[test]
    fn quote_selection_minimises_escapes() {
        // No quotes at all: single wins the tie.
        assert_eq!(to_string(&Value::from("plain")), "'plain'");
        // A single quote inside: double costs less.
        assert_eq!(to_string(&Value::from("it's")), "\"it's\"");
        // Both quote kinds inside: backtick costs less.
        assert_eq!(to_string(&Value::from("'\"")), "`'\"`");
        // Delimiter occurrences still escape when unavoidable.
        assert_eq!(to_string(&Value::from("''\"\"``")), "'\\'\\'\"\"``'");
    }

    #[test]
    fn backtick_carries_raw_newlines() {
        assert_eq!(to_string(&Value::from("a\nb")), "`a\nb`");
        let round = parse(&to_string(&Value::from("a\nb"))).unwrap();
        assert_eq!(round, Value::from("a\nb"));
    }

    #[test]
    fn control_characters_escape_everywhere() {
        assert_eq!(to_string(&Value::from("\u{0000}")), "'\\u0000'");
        assert_eq!(to_string(&Value::from("\u{2028}")), "'\\u2028'");
    }

    #[test]
    fn escape_non_ascii_uses_surrogate_pairs() {
        let opts = EmitOptions {
            escape_non_ascii: true,
            ..EmitOptions::default()
        };
        assert_eq!(to_string_with(&Value::from("é"), &opts), "'\\u00E9'");
        assert_eq!(
            to_string_with(&Value::from("\u{1F600}"), &opts),
            "'\\uD83D\\uDE00'"
        );
    }

    #[test]
    fn non_finite_numbers_emit_bare_words() {
        assert_eq!(to_string(&Value::Number(f64::NAN)), "NaN");
        assert_eq!(to_string(&Value::Number(f64::INFINITY)), "Infinity");
        assert_eq!(to_string(&Value::Number(f64::NEG_INFINITY)), "-Infinity");
    }

    #[test]
    fn integral_numbers_print_without_fraction() {
        assert_eq!(to_string(&Value::Number(1.0)), "1");
        assert_eq!(to_string(&Value::Number(-0.5)), "-0.5");
    }

    #[test]
    fn undefined_is_kept_by_default() {
        let v = obj(&[("a", Value::Undefined)]);
        assert_eq!(to_string(&v), "{a: undefined}");
    }

    #[test]
    fn quote_keys_mode_is_standard_json() {
        let v = obj(&[
            ("a", Value::Number(1.0)),
            ("b", Value::from("it's")),
            ("c", Value::Undefined),
        ]);
        let opts = EmitOptions {
            quote_keys: true,
            ..EmitOptions::default()
        };
        let text = to_string_with(&v, &opts);
        assert_eq!(text, "{\"a\": 1, \"b\": \"it's\", \"c\": null}");
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["b"], serde_json::json!("it's"));
    }

    #[test]
    fn sorted_keys_override_insertion_order() {
        let v = obj(&[("b", Value::Null), ("a", Value::Null)]);
        let opts = EmitOptions {
            sort_keys: true,
            ..EmitOptions::default()
        };
        assert_eq!(to_string_with(&v, &opts), "{a: null, b: null}");
    }

    #[test]
    fn suffixes_can_be_disabled() {
        let opts = EmitOptions {
            bigint_suffix: false,
            decimal_suffix: false,
            ..EmitOptions::default()
        };
        assert_eq!(
            to_string_with(&Value::BigInt(BigInt::from(7i64)), &opts),
            "7"
        );
        assert_eq!(
            to_string_with(&Value::Decimal("2.5".parse().unwrap()), &opts),
            "2.5"
        );
    }

    #[test]
    fn binary_renders_as_base64_string() {
        assert_eq!(to_string(&Value::Binary(vec![1, 2, 3])), "'AQID'");
    }

    #[test]
    fn uuid_and_temporal_literals_are_bare() {
        let v = Value::Uuid("550e8400-e29b-41d4-a716-446655440000".parse().unwrap());
        assert_eq!(to_string(&v), "550e8400-e29b-41d4-a716-446655440000");
        let t: crate::types::Instant = "2025-01-15T10:30:00+05:30".parse().unwrap();
        assert_eq!(to_string(&Value::Instant(t)), "2025-01-15T05:00:00Z");
        let d: crate::types::Duration = "P1DT6H".parse().unwrap();
        assert_eq!(to_string(&Value::Duration(d)), "P1DT6H");
    }
}

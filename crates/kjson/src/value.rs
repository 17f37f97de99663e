//! The kJSON value model.
//!
//! This module defines [`Value`], the tagged union every other component
//! speaks: the text parser and emitter, the kJSONB codec, and the
//! line-delimited stream adapter all produce or consume `Value` trees.
//!
//! Objects preserve insertion order — key order observed on parse is the
//! order of first occurrence in the source, and emission replays it.

use indexmap::IndexMap;
use uuid::Uuid;

use crate::types::{BigInt, Decimal128, Duration, Instant};

/// Ordered object representation: keys in first-insertion order.
pub type Map = IndexMap<String, Value>;
/// Array representation.
pub type Array = Vec<Value>;

/// A kJSON value.
///
/// Beyond the six JSON shapes, kJSON carries first-class big integers,
/// decimals, UUIDs, UTC instants, ISO-8601 durations, an explicit
/// `undefined`, and (in the binary format only) raw byte blobs.
///
/// # Examples
///
/// ```
/// use kjson::{Map, Value};
///
/// let mut map = Map::new();
/// map.insert("key".to_string(), Value::String("value".into()));
/// let v = Value::Object(map);
/// assert_eq!(v.to_string(), "{key: 'value'}");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// The JSON `null`.
    #[default]
    Null,
    /// The JavaScript-style `undefined`, distinct from `Null`. Kept through
    /// round-trips rather than dropped.
    Undefined,
    /// `true` or `false`.
    Bool(bool),
    /// An IEEE-754 double.
    Number(f64),
    /// An arbitrary-precision integer (`42n`).
    BigInt(BigInt),
    /// A decimal with preserved textual significance (`3.50m`).
    Decimal(Decimal128),
    /// A UTF-8 string.
    String(String),
    /// An RFC 4122 UUID.
    Uuid(Uuid),
    /// An absolute UTC point in time with nanosecond resolution.
    Instant(Instant),
    /// An ISO-8601 duration.
    Duration(Duration),
    /// Raw octets. Only kJSONB can represent these losslessly; the text
    /// emitter falls back to a base64 string.
    Binary(Vec<u8>),
    /// An ordered sequence of values.
    Array(Array),
    /// An ordered sequence of key/value members.
    Object(Map),
}

impl Value {
    /// Returns `true` if the value is [`Null`](Value::Null).
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if the value is [`Undefined`](Value::Undefined).
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Returns `true` if the value is [`Bool`](Value::Bool).
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(..))
    }

    /// Returns `true` if the value is [`Number`](Value::Number).
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(..))
    }

    /// Returns `true` if the value is [`BigInt`](Value::BigInt).
    #[must_use]
    pub fn is_bigint(&self) -> bool {
        matches!(self, Value::BigInt(..))
    }

    /// Returns `true` if the value is [`Decimal`](Value::Decimal).
    #[must_use]
    pub fn is_decimal(&self) -> bool {
        matches!(self, Value::Decimal(..))
    }

    /// Returns `true` if the value is [`String`](Value::String).
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(..))
    }

    /// Returns `true` if the value is [`Uuid`](Value::Uuid).
    #[must_use]
    pub fn is_uuid(&self) -> bool {
        matches!(self, Value::Uuid(..))
    }

    /// Returns `true` if the value is [`Instant`](Value::Instant).
    #[must_use]
    pub fn is_instant(&self) -> bool {
        matches!(self, Value::Instant(..))
    }

    /// Returns `true` if the value is [`Duration`](Value::Duration).
    #[must_use]
    pub fn is_duration(&self) -> bool {
        matches!(self, Value::Duration(..))
    }

    /// Returns `true` if the value is [`Binary`](Value::Binary).
    #[must_use]
    pub fn is_binary(&self) -> bool {
        matches!(self, Value::Binary(..))
    }

    /// Returns `true` if the value is [`Array`](Value::Array).
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(..))
    }

    /// Returns `true` if the value is [`Object`](Value::Object).
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(..))
    }

    /// Borrows the boolean payload, if any.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Borrows the number payload, if any.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Borrows the string payload, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrows the big-integer payload, if any.
    #[must_use]
    pub fn as_bigint(&self) -> Option<&BigInt> {
        match self {
            Value::BigInt(b) => Some(b),
            _ => None,
        }
    }

    /// Borrows the decimal payload, if any.
    #[must_use]
    pub fn as_decimal(&self) -> Option<&Decimal128> {
        match self {
            Value::Decimal(d) => Some(d),
            _ => None,
        }
    }

    /// Borrows the UUID payload, if any.
    #[must_use]
    pub fn as_uuid(&self) -> Option<&Uuid> {
        match self {
            Value::Uuid(u) => Some(u),
            _ => None,
        }
    }

    /// Borrows the instant payload, if any.
    #[must_use]
    pub fn as_instant(&self) -> Option<&Instant> {
        match self {
            Value::Instant(t) => Some(t),
            _ => None,
        }
    }

    /// Borrows the duration payload, if any.
    #[must_use]
    pub fn as_duration(&self) -> Option<&Duration> {
        match self {
            Value::Duration(d) => Some(d),
            _ => None,
        }
    }

    /// Borrows the binary payload, if any.
    #[must_use]
    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            Value::Binary(b) => Some(b),
            _ => None,
        }
    }

    /// Borrows the array payload, if any.
    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Borrows the object payload, if any.
    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Looks up a member by key, if this value is an object.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|o| o.get(key))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(f64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<BigInt> for Value {
    fn from(v: BigInt) -> Self {
        Value::BigInt(v)
    }
}

impl From<Decimal128> for Value {
    fn from(v: Decimal128) -> Self {
        Value::Decimal(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<Instant> for Value {
    fn from(v: Instant) -> Self {
        Value::Instant(v)
    }
}

impl From<Duration> for Value {
    fn from(v: Duration) -> Self {
        Value::Duration(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Value::Object(v)
    }
}

impl core::fmt::Display for Value {
    /// Renders the compact textual form with default emitter options.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&crate::emitter::to_string(self))
    }
}

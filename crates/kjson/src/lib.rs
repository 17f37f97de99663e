//! kJSON (Kind JSON) — extended JSON with native type support.
//!
//! kJSON extends JSON with first-class big integers, 128-bit decimals,
//! UUIDs, nanosecond-precision instants, ISO-8601 durations, and binary
//! blobs, while accepting a relaxed JSON5-like surface: comments,
//! unquoted identifier keys, trailing commas, and single-, double-, or
//! backtick-quoted strings. Values convert freely between the textual
//! form and kJSONB, a compact type-tagged binary form.
//!
//! # Parsing and emitting text
//!
//! ```
//! use kjson::{Value, parse, to_string};
//!
//! let v = parse("{a: 1, b: 2n, c: 3.5m}").unwrap();
//! assert!(v.get("b").unwrap().is_bigint());
//! assert_eq!(to_string(&v), "{a: 1, b: 2n, c: 3.5m}");
//! ```
//!
//! Extended literals stand bare in the text, and ambiguity resolves in
//! favour of the richer type — a token shaped like a UUID is a UUID, a
//! token shaped like an ISO-8601 instant is an instant:
//!
//! ```
//! use kjson::parse;
//!
//! let v = parse("[550e8400-e29b-41d4-a716-446655440000, 2025-01-15T10:30:00Z]").unwrap();
//! assert!(v.as_array().unwrap()[0].is_uuid());
//! assert!(v.as_array().unwrap()[1].is_instant());
//! ```
//!
//! # The binary form
//!
//! ```
//! use kjson::{Value, decode_binary, encode_binary};
//!
//! let v = Value::Array(vec![Value::Number(1.0), Value::Number(2.0)]);
//! let bytes = encode_binary(&v);
//! assert_eq!(decode_binary(&bytes).unwrap(), v);
//! ```
//!
//! # Streams
//!
//! The [`stream`] module reads and writes newline-delimited sequences of
//! values, with opt-in error recovery for tail-style consumers.
//!
//! # Concurrency
//!
//! Every parse, emit, encode, and decode call is synchronous and owns its
//! state; none of the types here provide interior locking. `Value` trees
//! are plain data and freely shareable across threads once built.

mod emitter;
mod error;
mod parser;
mod types;
mod value;

pub mod binary;
pub mod stream;

pub use emitter::{EmitOptions, to_string, to_string_pretty, to_string_with};
pub use error::{Error, ErrorKind, Result};
pub use parser::{
    DuplicateKeys, ParserOptions, is_valid, is_valid_with, parse, parse_with, safe_parse,
    safe_parse_with,
};
pub use types::{BigInt, Decimal128, Duration, Instant, uuid_v4, uuid_v7};
pub use value::{Array, Map, Value};

pub use binary::{DecodeOptions, decode_binary, decode_binary_with, encode_binary};

// Re-export the UUID type; kJSON stores it as-is.
pub use uuid::Uuid;

//! kJSONB, the compact binary form.
//!
//! Every value is framed as `<type byte> <payload>`. Lengths and counts
//! use unsigned LEB128 varints (7 data bits per byte, high bit =
//! continuation), capped at ten bytes and bounded by
//! [`DecodeOptions::max_payload`]. Containers carry element counts, so a
//! buffer of concatenated values needs no global framing; see
//! [`BinaryReader`] for that streaming use.
//!
//! Integers are stored in the smallest of the signed tags (or `Uint64`)
//! that holds them; non-finite doubles degrade to `Null`. The instant tag
//! stores milliseconds since the Unix epoch, so sub-millisecond
//! nanoseconds truncate on encode.

use crate::error::{Error, ErrorKind, Result};
use crate::types::{BigInt, Decimal128, Duration, Instant};
use crate::value::{Map, Value};

mod tags {
    pub const NULL: u8 = 0x00;
    pub const FALSE: u8 = 0x01;
    pub const TRUE: u8 = 0x02;
    pub const INT8: u8 = 0x10;
    pub const INT16: u8 = 0x11;
    pub const INT32: u8 = 0x12;
    pub const INT64: u8 = 0x13;
    pub const UINT64: u8 = 0x14;
    pub const FLOAT32: u8 = 0x15;
    pub const FLOAT64: u8 = 0x16;
    pub const BIGINT: u8 = 0x17;
    pub const DECIMAL128: u8 = 0x18;
    pub const STRING: u8 = 0x20;
    pub const BINARY: u8 = 0x21;
    pub const INSTANT: u8 = 0x30;
    pub const UUID: u8 = 0x31;
    pub const DURATION: u8 = 0x32;
    pub const ARRAY: u8 = 0x40;
    pub const OBJECT: u8 = 0x41;
    pub const UNDEFINED: u8 = 0xF0;
}

/// The longest legal varint: ten bytes covers a full 64-bit value.
const MAX_VARINT_BYTES: usize = 10;

/// Configuration options for [`decode_binary_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Maximum container nesting depth.
    ///
    /// # Default
    ///
    /// `1024`
    pub max_depth: usize,

    /// Upper bound on any decoded varint (payload lengths and element
    /// counts).
    ///
    /// # Default
    ///
    /// `2^31`
    pub max_payload: u64,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            max_depth: 1024,
            max_payload: 1 << 31,
        }
    }
}

// -------------------------------------------------------------------
// Encoding
// -------------------------------------------------------------------

/// Encodes a value to kJSONB bytes.
///
/// Lossy corners, by format design: non-finite numbers encode as `Null`,
/// and instants truncate to millisecond resolution.
#[must_use]
pub fn encode_binary(value: &Value) -> Vec<u8> {
    let mut out = Vec::new();
    encode_value(&mut out, value);
    out
}

fn write_varint(out: &mut Vec<u8>, mut v: u64) {
    loop {
        let cur = v & 0x7f;
        if cur == v {
            out.push(u8::try_from(cur).unwrap_or(0));
            return;
        }
        out.push(u8::try_from(cur | 0x80).unwrap_or(0x80));
        v >>= 7;
    }
}

fn encode_value(out: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Null => out.push(tags::NULL),
        Value::Undefined => out.push(tags::UNDEFINED),
        Value::Bool(false) => out.push(tags::FALSE),
        Value::Bool(true) => out.push(tags::TRUE),
        Value::Number(n) => encode_number(out, *n),
        Value::BigInt(b) => {
            out.push(tags::BIGINT);
            let digits = b.digits().as_bytes();
            let header = (digits.len() as u64) << 1 | u64::from(b.is_negative());
            write_varint(out, header);
            out.extend_from_slice(digits);
        }
        Value::Decimal(d) => {
            out.push(tags::DECIMAL128);
            let mut text = String::new();
            d.write_canonical(&mut text);
            write_varint(out, text.len() as u64);
            out.extend_from_slice(text.as_bytes());
        }
        Value::String(s) => {
            out.push(tags::STRING);
            write_varint(out, s.len() as u64);
            out.extend_from_slice(s.as_bytes());
        }
        Value::Binary(bytes) => {
            out.push(tags::BINARY);
            write_varint(out, bytes.len() as u64);
            out.extend_from_slice(bytes);
        }
        Value::Uuid(u) => {
            out.push(tags::UUID);
            out.extend_from_slice(u.as_bytes());
        }
        Value::Instant(t) => {
            out.push(tags::INSTANT);
            out.extend_from_slice(&t.unix_millis().to_le_bytes());
        }
        Value::Duration(d) => {
            out.push(tags::DURATION);
            let mut text = String::new();
            d.write_canonical(&mut text);
            write_varint(out, text.len() as u64);
            out.extend_from_slice(text.as_bytes());
        }
        Value::Array(items) => {
            out.push(tags::ARRAY);
            write_varint(out, items.len() as u64);
            for item in items {
                encode_value(out, item);
            }
        }
        Value::Object(map) => {
            out.push(tags::OBJECT);
            write_varint(out, map.len() as u64);
            for (key, item) in map {
                write_varint(out, key.len() as u64);
                out.extend_from_slice(key.as_bytes());
                encode_value(out, item);
            }
        }
    }
}

/// Integers take the smallest tag whose range contains them; everything
/// else falls to Float32 (when exact) or Float64.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn encode_number(out: &mut Vec<u8>, n: f64) {
    // 2^63 and 2^64 are exact in f64; strict upper bounds keep the casts
    // below lossless.
    const TWO_63: f64 = 9_223_372_036_854_775_808.0;
    const TWO_64: f64 = 18_446_744_073_709_551_616.0;

    if !n.is_finite() {
        out.push(tags::NULL);
        return;
    }
    if n.fract() == 0.0 {
        if n >= -TWO_63 && n < TWO_63 {
            let v = n as i64;
            if let Ok(b) = i8::try_from(v) {
                out.push(tags::INT8);
                out.extend_from_slice(&b.to_le_bytes());
            } else if let Ok(h) = i16::try_from(v) {
                out.push(tags::INT16);
                out.extend_from_slice(&h.to_le_bytes());
            } else if let Ok(w) = i32::try_from(v) {
                out.push(tags::INT32);
                out.extend_from_slice(&w.to_le_bytes());
            } else {
                out.push(tags::INT64);
                out.extend_from_slice(&v.to_le_bytes());
            }
            return;
        }
        if n >= TWO_63 && n < TWO_64 {
            out.push(tags::UINT64);
            out.extend_from_slice(&(n as u64).to_le_bytes());
            return;
        }
    }
    let narrow = n as f32;
    if f64::from(narrow) == n {
        out.push(tags::FLOAT32);
        out.extend_from_slice(&narrow.to_le_bytes());
    } else {
        out.push(tags::FLOAT64);
        out.extend_from_slice(&n.to_le_bytes());
    }
}

// -------------------------------------------------------------------
// Decoding
// -------------------------------------------------------------------

/// Decodes a single kJSONB value that must span the whole buffer.
///
/// # Errors
///
/// Rejects unknown type bytes, truncated payloads, oversized varints,
/// containers that cannot fit the remaining input, over-deep nesting,
/// invalid UTF-8 in string payloads, and trailing bytes.
pub fn decode_binary(bytes: &[u8]) -> Result<Value> {
    decode_binary_with(bytes, &DecodeOptions::default())
}

/// Decodes a single whole-buffer kJSONB value with explicit options.
///
/// # Errors
///
/// As [`decode_binary`].
pub fn decode_binary_with(bytes: &[u8], options: &DecodeOptions) -> Result<Value> {
    let mut decoder = Decoder {
        bytes,
        pos: 0,
        options: *options,
    };
    let value = decoder.decode_value(0)?;
    if decoder.pos != bytes.len() {
        return Err(Error::at_offset(ErrorKind::TrailingContent, decoder.pos));
    }
    Ok(value)
}

/// Iterator over concatenated kJSONB values in a single buffer.
///
/// # Examples
///
/// ```
/// use kjson::binary::BinaryReader;
/// use kjson::{Value, encode_binary};
///
/// let mut buf = encode_binary(&Value::Number(1.0));
/// buf.extend(encode_binary(&Value::Bool(true)));
/// let values: Result<Vec<_>, _> = BinaryReader::new(&buf).collect();
/// assert_eq!(values.unwrap(), [Value::Number(1.0), Value::Bool(true)]);
/// ```
#[derive(Debug)]
pub struct BinaryReader<'buf> {
    bytes: &'buf [u8],
    pos: usize,
    options: DecodeOptions,
    failed: bool,
}

impl<'buf> BinaryReader<'buf> {
    /// Creates a reader over `bytes` with default options.
    #[must_use]
    pub fn new(bytes: &'buf [u8]) -> Self {
        BinaryReader::with_options(bytes, &DecodeOptions::default())
    }

    /// Creates a reader over `bytes` with explicit options.
    #[must_use]
    pub fn with_options(bytes: &'buf [u8], options: &DecodeOptions) -> Self {
        BinaryReader {
            bytes,
            pos: 0,
            options: *options,
            failed: false,
        }
    }

    /// Byte offset of the next undecoded value.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl Iterator for BinaryReader<'_> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.bytes.len() {
            return None;
        }
        let mut decoder = Decoder {
            bytes: self.bytes,
            pos: self.pos,
            options: self.options,
        };
        match decoder.decode_value(0) {
            Ok(value) => {
                self.pos = decoder.pos;
                Some(Ok(value))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

struct Decoder<'buf> {
    bytes: &'buf [u8],
    pos: usize,
    options: DecodeOptions,
}

impl Decoder<'_> {
    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&[u8]> {
        if self.remaining() < n {
            return Err(Error::at_offset(ErrorKind::UnexpectedEof, self.bytes.len()));
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn take_byte(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_varint(&mut self) -> Result<u64> {
        let start = self.pos;
        let mut value = 0u64;
        let mut shift = 0u32;
        for _ in 0..MAX_VARINT_BYTES {
            let byte = self.take_byte()?;
            let cur = u64::from(byte & 0x7f);
            if shift >= 64 || (shift > 0 && cur << shift >> shift != cur) {
                return Err(Error::at_offset(ErrorKind::VarintOverflow, start));
            }
            value |= cur << shift;
            if byte & 0x80 == 0 {
                if value > self.options.max_payload {
                    return Err(Error::at_offset(ErrorKind::VarintOverflow, start));
                }
                return Ok(value);
            }
            shift += 7;
        }
        Err(Error::at_offset(ErrorKind::VarintOverflow, start))
    }

    /// Reads a varint that names a count of elements at least
    /// `min_element_size` bytes wide, rejecting counts the remaining
    /// input cannot possibly satisfy.
    fn read_count(&mut self, min_element_size: usize) -> Result<usize> {
        let start = self.pos;
        let count = self.read_varint()?;
        let count = usize::try_from(count)
            .map_err(|_| Error::at_offset(ErrorKind::VarintOverflow, start))?;
        if count.saturating_mul(min_element_size) > self.remaining() {
            return Err(Error::at_offset(ErrorKind::LengthExceedsInput, start));
        }
        Ok(count)
    }

    fn take_text(&mut self) -> Result<String> {
        let start = self.pos;
        let len = self.read_count(1)?;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| Error::at_offset(ErrorKind::InvalidUtf8, start))
    }

    #[expect(clippy::too_many_lines, clippy::cast_precision_loss)]
    fn decode_value(&mut self, depth: usize) -> Result<Value> {
        let tag_offset = self.pos;
        let tag = self.take_byte()?;
        match tag {
            tags::NULL => Ok(Value::Null),
            tags::UNDEFINED => Ok(Value::Undefined),
            tags::FALSE => Ok(Value::Bool(false)),
            tags::TRUE => Ok(Value::Bool(true)),
            tags::INT8 => {
                let b = self.take(1)?;
                Ok(Value::Number(f64::from(i8::from_le_bytes([b[0]]))))
            }
            tags::INT16 => {
                let b = self.take(2)?;
                Ok(Value::Number(f64::from(i16::from_le_bytes([b[0], b[1]]))))
            }
            tags::INT32 => {
                let b: [u8; 4] = self.take(4)?.try_into().unwrap_or_default();
                Ok(Value::Number(f64::from(i32::from_le_bytes(b))))
            }
            tags::INT64 => {
                let b: [u8; 8] = self.take(8)?.try_into().unwrap_or_default();
                Ok(Value::Number(i64::from_le_bytes(b) as f64))
            }
            tags::UINT64 => {
                let b: [u8; 8] = self.take(8)?.try_into().unwrap_or_default();
                Ok(Value::Number(u64::from_le_bytes(b) as f64))
            }
            tags::FLOAT32 => {
                let b: [u8; 4] = self.take(4)?.try_into().unwrap_or_default();
                Ok(Value::Number(f64::from(f32::from_le_bytes(b))))
            }
            tags::FLOAT64 => {
                let b: [u8; 8] = self.take(8)?.try_into().unwrap_or_default();
                Ok(Value::Number(f64::from_le_bytes(b)))
            }
            tags::BIGINT => {
                let start = self.pos;
                let header = self.read_varint()?;
                let negative = header & 1 == 1;
                let len = usize::try_from(header >> 1)
                    .map_err(|_| Error::at_offset(ErrorKind::VarintOverflow, start))?;
                if len > self.remaining() {
                    return Err(Error::at_offset(ErrorKind::LengthExceedsInput, start));
                }
                let digits = self.take(len)?;
                let digits = core::str::from_utf8(digits)
                    .map_err(|_| Error::at_offset(ErrorKind::InvalidUtf8, start))?;
                BigInt::from_parts(negative, digits)
                    .map(Value::BigInt)
                    .ok_or_else(|| Error::at_offset(ErrorKind::InvalidNumber, start))
            }
            tags::DECIMAL128 => {
                let start = self.pos;
                let text = self.take_text()?;
                text.parse::<Decimal128>()
                    .map(Value::Decimal)
                    .map_err(|()| Error::at_offset(ErrorKind::InvalidNumber, start))
            }
            tags::STRING => Ok(Value::String(self.take_text()?)),
            tags::BINARY => {
                let len = self.read_count(1)?;
                Ok(Value::Binary(self.take(len)?.to_vec()))
            }
            tags::INSTANT => {
                let b: [u8; 8] = self.take(8)?.try_into().unwrap_or_default();
                Ok(Value::Instant(Instant::from_unix_millis(i64::from_le_bytes(
                    b,
                ))))
            }
            tags::UUID => {
                let b: [u8; 16] = self.take(16)?.try_into().unwrap_or_default();
                Ok(Value::Uuid(uuid::Uuid::from_bytes(b)))
            }
            tags::DURATION => {
                let start = self.pos;
                let text = self.take_text()?;
                text.parse::<Duration>()
                    .map(Value::Duration)
                    .map_err(|()| Error::at_offset(ErrorKind::InvalidDuration, start))
            }
            tags::ARRAY => {
                if depth >= self.options.max_depth {
                    return Err(Error::at_offset(ErrorKind::DepthExceeded, tag_offset));
                }
                let count = self.read_count(1)?;
                let mut items = Vec::with_capacity(count.min(4096));
                for _ in 0..count {
                    items.push(self.decode_value(depth + 1)?);
                }
                Ok(Value::Array(items))
            }
            tags::OBJECT => {
                if depth >= self.options.max_depth {
                    return Err(Error::at_offset(ErrorKind::DepthExceeded, tag_offset));
                }
                // A member is at least a one-byte key length plus a
                // one-byte value tag.
                let count = self.read_count(2)?;
                let mut map = Map::with_capacity(count.min(4096));
                for _ in 0..count {
                    let key = self.take_text()?;
                    let value = self.decode_value(depth + 1)?;
                    map.insert(key, value);
                }
                Ok(Value::Object(map))
            }
            other => Err(Error::at_offset(ErrorKind::UnknownType(other), tag_offset)),
        }
    }
}

//! Line-delimited kJSON for append and tail workloads.
//!
//! Each record is one compact kJSON value followed by `\n`. The reader
//! splits its input at newline boundaries that sit outside every string
//! and at bracket depth zero, so backtick strings carrying raw newlines
//! do not break a record apart. Empty (and whitespace-only) lines are
//! skipped silently.

use std::io::{Read, Write};

use bstr::ByteSlice;

use crate::emitter;
use crate::error::{Error, ErrorKind, Result};
use crate::parser::{self, ParserOptions};
use crate::value::Value;

const READ_CHUNK: usize = 8 * 1024;

/// Callback invoked for each record dropped under
/// [`ReaderOptions::skip_invalid`]: the error, the raw record text, and
/// its 1-based line number.
pub type ErrorHook<'h> = Box<dyn FnMut(&Error, &str, u64) + 'h>;

/// Configuration options for [`StreamReader`].
pub struct ReaderOptions<'h> {
    /// Drop records that fail to parse and keep reading instead of ending
    /// the stream. Only recoverable errors are skipped; I/O failures and
    /// oversized lines still abort.
    ///
    /// # Default
    ///
    /// `false`
    pub skip_invalid: bool,

    /// Observer for skipped records; only called when `skip_invalid` is
    /// set.
    ///
    /// # Default
    ///
    /// `None`
    pub on_error: Option<ErrorHook<'h>>,

    /// Upper bound on a single record's byte length. Exceeding it is a
    /// fatal [`LineTooLong`](ErrorKind::LineTooLong).
    ///
    /// # Default
    ///
    /// 16 MiB
    pub max_line_bytes: usize,

    /// Options applied to each record parse.
    ///
    /// # Default
    ///
    /// [`ParserOptions::default`]
    pub parser: ParserOptions,
}

impl Default for ReaderOptions<'_> {
    fn default() -> Self {
        ReaderOptions {
            skip_invalid: false,
            on_error: None,
            max_line_bytes: 16 * 1024 * 1024,
            parser: ParserOptions::default(),
        }
    }
}

impl core::fmt::Debug for ReaderOptions<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ReaderOptions")
            .field("skip_invalid", &self.skip_invalid)
            .field("on_error", &self.on_error.is_some())
            .field("max_line_bytes", &self.max_line_bytes)
            .field("parser", &self.parser)
            .finish()
    }
}

// -------------------------------------------------------------------
// Writer
// -------------------------------------------------------------------

/// Writes values as compact records, one per line.
///
/// Writes are sequenced: once `write` returns `Ok`, the record is fully
/// in the sink, strictly after every earlier record. Flushing is the
/// caller's call, via [`flush`](StreamWriter::flush) or drop of the
/// underlying sink.
///
/// # Examples
///
/// ```
/// use kjson::stream::StreamWriter;
/// use kjson::Value;
///
/// let mut out = Vec::new();
/// let mut writer = StreamWriter::new(&mut out);
/// writer.write(&Value::Number(1.0)).unwrap();
/// writer.write(&Value::Bool(true)).unwrap();
/// drop(writer);
/// assert_eq!(out, b"1\ntrue\n");
/// ```
#[derive(Debug)]
pub struct StreamWriter<W: Write> {
    sink: W,
}

impl<W: Write> StreamWriter<W> {
    /// Wraps a byte sink.
    pub fn new(sink: W) -> Self {
        StreamWriter { sink }
    }

    /// Emits one value and its trailing newline.
    ///
    /// # Errors
    ///
    /// Propagates sink failures as [`ErrorKind::Io`].
    pub fn write(&mut self, value: &Value) -> Result<()> {
        let mut line = emitter::to_string(value);
        line.push('\n');
        self.sink
            .write_all(line.as_bytes())
            .map_err(|e| Error::io(&e))
    }

    /// Flushes the underlying sink.
    ///
    /// # Errors
    ///
    /// Propagates sink failures as [`ErrorKind::Io`].
    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush().map_err(|e| Error::io(&e))
    }

    /// Flushes and returns the sink.
    ///
    /// # Errors
    ///
    /// Propagates sink failures as [`ErrorKind::Io`].
    pub fn close(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.sink)
    }

    /// Unwraps the sink without flushing.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

// -------------------------------------------------------------------
// Reader
// -------------------------------------------------------------------

/// Tracks whether a byte position is inside a string or a nested
/// container, so record boundaries only land on top-level newlines.
#[derive(Debug, Default)]
struct Splitter {
    in_string: Option<u8>,
    escaped: bool,
    depth: usize,
}

impl Splitter {
    /// Feeds one byte; returns `true` when a `\n` at this position ends a
    /// record.
    fn is_boundary(&mut self, byte: u8) -> bool {
        if let Some(delim) = self.in_string {
            if self.escaped {
                self.escaped = false;
            } else if byte == b'\\' {
                self.escaped = true;
            } else if byte == delim {
                self.in_string = None;
            }
            return false;
        }
        match byte {
            b'"' | b'\'' | b'`' => {
                self.in_string = Some(byte);
                false
            }
            b'{' | b'[' => {
                self.depth += 1;
                false
            }
            b'}' | b']' => {
                self.depth = self.depth.saturating_sub(1);
                false
            }
            b'\n' => self.depth == 0,
            _ => false,
        }
    }
}

/// Reads newline-delimited kJSON values from a byte source.
///
/// The iterator yields records in input order. Any fatal error (I/O, a
/// record over `max_line_bytes`, or bytes that are not UTF-8) ends the
/// stream after being yielded; parse errors end it too unless
/// `skip_invalid` is set.
pub struct StreamReader<'h, R: Read> {
    source: R,
    options: ReaderOptions<'h>,
    buf: Vec<u8>,
    /// Bytes of `buf` already classified by the splitter.
    scanned: usize,
    splitter: Splitter,
    eof: bool,
    finished: bool,
    line_number: u64,
}

impl<'h, R: Read> StreamReader<'h, R> {
    /// Wraps a byte source with default options.
    pub fn new(source: R) -> Self {
        StreamReader::with_options(source, ReaderOptions::default())
    }

    /// Wraps a byte source.
    pub fn with_options(source: R, options: ReaderOptions<'h>) -> Self {
        StreamReader {
            source,
            options,
            buf: Vec::new(),
            scanned: 0,
            splitter: Splitter::default(),
            eof: false,
            finished: false,
            line_number: 0,
        }
    }

    /// Pulls the next complete record out of the buffer, refilling from
    /// the source as needed. Returns `None` at end of input.
    fn next_record(&mut self) -> Option<Result<String>> {
        loop {
            // Scan unclassified bytes for a top-level newline.
            while self.scanned < self.buf.len() {
                let byte = self.buf[self.scanned];
                let boundary = self.splitter.is_boundary(byte);
                self.scanned += 1;
                if boundary {
                    let mut record: Vec<u8> = self.buf.drain(..self.scanned).collect();
                    record.pop();
                    self.scanned = 0;
                    self.splitter = Splitter::default();
                    return Some(self.finish_record(record));
                }
            }

            if self.buf.len() > self.options.max_line_bytes {
                self.finished = true;
                return Some(Err(Error::at_offset(ErrorKind::LineTooLong, 0)));
            }

            if self.eof {
                if self.buf.is_empty() {
                    return None;
                }
                let record = core::mem::take(&mut self.buf);
                self.scanned = 0;
                return Some(self.finish_record(record));
            }

            let mut chunk = [0u8; READ_CHUNK];
            match self.source.read(&mut chunk) {
                Ok(0) => self.eof = true,
                Ok(n) => self.buf.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.finished = true;
                    return Some(Err(Error::io(&e)));
                }
            }
        }
    }

    fn finish_record(&mut self, record: Vec<u8>) -> Result<String> {
        self.line_number += 1;
        if record.len() > self.options.max_line_bytes {
            return Err(Error::at_offset(ErrorKind::LineTooLong, 0));
        }
        String::from_utf8(record).map_err(|_| Error::at_offset(ErrorKind::InvalidUtf8, 0))
    }
}

impl<R: Read> Iterator for StreamReader<'_, R> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            let record = match self.next_record()? {
                Ok(record) => record,
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err));
                }
            };
            if record.as_bytes().find_not_byteset(b" \t\r\n\x0c\x0b").is_none() {
                continue;
            }
            match parser::parse_with(&record, &self.options.parser) {
                Ok(value) => return Some(Ok(value)),
                Err(err) if self.options.skip_invalid && err.is_recoverable() => {
                    if let Some(hook) = &mut self.options.on_error {
                        hook(&err, &record, self.line_number);
                    }
                }
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Map;

    fn write_all(values: &[Value]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut writer = StreamWriter::new(&mut out);
        for v in values {
            writer.write(v).unwrap();
        }
        out
    }

    fn read_all(bytes: &[u8]) -> Vec<Value> {
        StreamReader::new(bytes)
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn writer_emits_one_compact_record_per_line() {
        let mut map = Map::new();
        map.insert("a".to_string(), Value::Number(1.0));
        let bytes = write_all(&[Value::Object(map), Value::Null]);
        assert_eq!(bytes, b"{a: 1}\nnull\n");
    }

    #[test]
    fn read_back_preserves_order() {
        let values = vec![
            Value::Number(1.0),
            Value::from("two"),
            Value::Array(vec![Value::Number(3.0), Value::Number(4.0)]),
        ];
        assert_eq!(read_all(&write_all(&values)), values);
    }

    #[test]
    fn embedded_newline_in_backtick_string_survives() {
        let values = vec![Value::from("line one\nline two"), Value::Number(5.0)];
        let bytes = write_all(&values);
        // The raw newline is inside the record.
        assert_eq!(bytes.iter().filter(|b| **b == b'\n').count(), 3);
        assert_eq!(read_all(&bytes), values);
    }

    #[test]
    fn empty_and_blank_lines_are_skipped() {
        let bytes = b"1\n\n  \n2\n";
        assert_eq!(read_all(bytes), [Value::Number(1.0), Value::Number(2.0)]);
    }

    #[test]
    fn final_record_without_newline_is_read() {
        assert_eq!(read_all(b"1\n2"), [Value::Number(1.0), Value::Number(2.0)]);
    }

    #[test]
    fn parse_error_ends_the_stream_by_default() {
        let mut reader = StreamReader::new(&b"1\n%%%\n2\n"[..]);
        assert_eq!(reader.next(), Some(Ok(Value::Number(1.0))));
        assert!(matches!(reader.next(), Some(Err(_))));
        assert_eq!(reader.next(), None);
    }

    #[test]
    fn skip_invalid_reports_and_continues() {
        let mut skipped = Vec::new();
        {
            let options = ReaderOptions {
                skip_invalid: true,
                on_error: Some(Box::new(|err: &Error, raw: &str, line: u64| {
                    skipped.push((err.clone(), raw.to_string(), line));
                })),
                ..ReaderOptions::default()
            };
            let reader = StreamReader::with_options(&b"1\n%%%\n3\n"[..], options);
            let values: Vec<_> = reader.collect::<Result<Vec<_>>>().unwrap();
            assert_eq!(values, [Value::Number(1.0), Value::Number(3.0)]);
        }
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].1, "%%%");
        assert_eq!(skipped[0].2, 2);
    }

    #[test]
    fn oversized_record_is_fatal_even_when_skipping() {
        let mut data = vec![b'"'];
        data.extend(std::iter::repeat_n(b'a', 64));
        data.extend_from_slice(b"\"\n1\n");
        let options = ReaderOptions {
            skip_invalid: true,
            max_line_bytes: 16,
            ..ReaderOptions::default()
        };
        let mut reader = StreamReader::with_options(&data[..], options);
        let err = reader.next().unwrap().unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::LineTooLong);
        assert_eq!(reader.next(), None);
    }

    #[test]
    fn reader_applies_parser_options() {
        let options = ReaderOptions {
            parser: ParserOptions {
                allow_comments: false,
                ..ParserOptions::default()
            },
            ..ReaderOptions::default()
        };
        let mut reader = StreamReader::with_options(&b"1 // c\n"[..], options);
        assert!(matches!(reader.next(), Some(Err(_))));
    }

    #[test]
    fn splitter_ignores_newlines_inside_nested_containers() {
        let bytes = b"[1,\n2]\n3\n";
        assert_eq!(
            read_all(bytes),
            [
                Value::Array(vec![Value::Number(1.0), Value::Number(2.0)]),
                Value::Number(3.0)
            ]
        );
    }
}

//! Structured errors for the text parser, the binary decoder, and the
//! line-delimited stream adapter.
//!
//! Every failure carries the byte offset where it was detected; textual
//! errors additionally carry a 1-based line and column. Binary and I/O
//! errors set `line` to zero, which switches the display form from
//! `"… at line:column"` to `"… at offset N"`.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// An error produced while parsing kJSON text, decoding kJSONB bytes, or
/// reading a line-delimited stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub(crate) kind: ErrorKind,
    pub(crate) offset: usize,
    pub(crate) line: usize,
    pub(crate) column: usize,
}

/// The specific failure a parse, decode, or stream operation ran into.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A character that cannot start or continue the current construct.
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    /// A string literal whose closing delimiter never appears.
    #[error("unterminated string")]
    UnterminatedString,
    /// A malformed escape sequence inside a string literal.
    #[error("invalid escape sequence")]
    InvalidEscape,
    /// A token that looks numeric but violates the number grammar.
    #[error("invalid number literal")]
    InvalidNumber,
    /// A token shaped like a UUID whose hex groups do not check out.
    #[error("invalid UUID literal")]
    InvalidUuid,
    /// A token shaped like an ISO-8601 instant with out-of-range fields.
    #[error("invalid instant literal")]
    InvalidInstant,
    /// A malformed ISO-8601 duration.
    #[error("invalid duration literal")]
    InvalidDuration,
    /// A trailing comma while `allow_trailing_commas` is off.
    #[error("trailing comma not allowed")]
    TrailingCommaDisallowed,
    /// An unquoted object key while `allow_unquoted_keys` is off.
    #[error("unquoted key not allowed")]
    UnquotedKeyDisallowed,
    /// A repeated object key under the `DuplicateKeys::Error` policy.
    #[error("duplicate key {0:?}")]
    DuplicateKey(String),
    /// Nesting beyond the configured maximum depth.
    #[error("maximum nesting depth exceeded")]
    DepthExceeded,
    /// Non-trivia input after a complete top-level value.
    #[error("trailing content after value")]
    TrailingContent,
    /// An unassigned kJSONB type byte.
    #[error("unknown type byte 0x{0:02x}")]
    UnknownType(u8),
    /// Input ended inside a token or a binary payload.
    #[error("unexpected end of input")]
    UnexpectedEof,
    /// A varint longer than ten bytes or above the configured bound.
    #[error("varint overflow")]
    VarintOverflow,
    /// A container whose declared element count cannot fit in the
    /// remaining input.
    #[error("declared length exceeds remaining input")]
    LengthExceedsInput,
    /// A kJSONB string or key payload that is not valid UTF-8.
    #[error("invalid UTF-8 in payload")]
    InvalidUtf8,
    /// A stream record larger than `max_line_bytes`.
    #[error("line exceeds maximum length")]
    LineTooLong,
    /// An error reported by the underlying byte source or sink.
    #[error("i/o error: {0}")]
    Io(String),
}

impl Error {
    /// Builds a textual error at a line/column position.
    pub(crate) fn at(kind: ErrorKind, offset: usize, line: usize, column: usize) -> Self {
        Error {
            kind,
            offset,
            line,
            column,
        }
    }

    /// Builds a positionless (binary or stream) error at a byte offset.
    pub(crate) fn at_offset(kind: ErrorKind, offset: usize) -> Self {
        Error {
            kind,
            offset,
            line: 0,
            column: 0,
        }
    }

    pub(crate) fn io(err: &std::io::Error) -> Self {
        Error::at_offset(ErrorKind::Io(err.to_string()), 0)
    }

    /// The kind of failure.
    #[must_use]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Byte offset into the input where the error was detected.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// 1-based line of the error, or 0 for binary and stream errors.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// 1-based column of the error, or 0 for binary and stream errors.
    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }

    /// Whether a stream reader running with `skip_invalid` may drop the
    /// offending record and continue.
    ///
    /// Syntax, lexical, structural, and binary errors are recoverable;
    /// resource-limit and I/O errors abort the stream.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self.kind, ErrorKind::LineTooLong | ErrorKind::Io(_))
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.line == 0 {
            write!(f, "{} at offset {}", self.kind, self.offset)
        } else {
            write!(f, "{} at {}:{}", self.kind, self.line, self.column)
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn textual_errors_display_line_and_column() {
        let err = Error::at(ErrorKind::UnexpectedChar('%'), 12, 3, 5);
        assert_eq!(err.to_string(), "unexpected character '%' at 3:5");
    }

    #[test]
    fn binary_errors_display_offset() {
        let err = Error::at_offset(ErrorKind::UnknownType(0x7f), 9);
        assert_eq!(err.to_string(), "unknown type byte 0x7f at offset 9");
    }

    #[test]
    fn limit_and_io_errors_are_fatal() {
        assert!(!Error::at_offset(ErrorKind::LineTooLong, 0).is_recoverable());
        assert!(!Error::at_offset(ErrorKind::Io("broken pipe".into()), 0).is_recoverable());
        assert!(Error::at(ErrorKind::DepthExceeded, 0, 1, 1).is_recoverable());
        assert!(Error::at_offset(ErrorKind::UnexpectedEof, 3).is_recoverable());
    }
}

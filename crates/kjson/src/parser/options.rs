//! Configuration options for the text parser.

/// What to do when an object repeats a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateKeys {
    /// Later occurrences replace the value; the member keeps the position
    /// of the key's first occurrence.
    #[default]
    KeepLast,
    /// Later occurrences are ignored.
    KeepFirst,
    /// A repeated key is a [`DuplicateKey`](crate::ErrorKind::DuplicateKey)
    /// error.
    Error,
}

/// Configuration options for [`parse_with`](crate::parse_with).
///
/// The defaults give the full relaxed kJSON surface: comments, trailing
/// commas, unquoted keys, and instant literals all enabled.
///
/// # Examples
///
/// ```
/// use kjson::{parse_with, ParserOptions};
///
/// let opts = ParserOptions {
///     allow_comments: false,
///     ..ParserOptions::default()
/// };
/// assert!(parse_with("1 // nope", &opts).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Whether `//` and `/* */` comments are accepted as trivia.
    ///
    /// # Default
    ///
    /// `true`
    pub allow_comments: bool,

    /// Whether a comma may trail the last member of an object or array.
    ///
    /// # Default
    ///
    /// `true`
    pub allow_trailing_commas: bool,

    /// Whether object keys may be bare identifiers.
    ///
    /// # Default
    ///
    /// `true`
    pub allow_unquoted_keys: bool,

    /// Whether ISO-8601 instant literals parse to
    /// [`Instant`](crate::Value::Instant) values. When `false`, the raw
    /// lexeme is kept as a string.
    ///
    /// # Default
    ///
    /// `true`
    pub parse_dates: bool,

    /// Whether suffix-less numbers parse as
    /// [`Decimal`](crate::Value::Decimal) instead of `f64`
    /// [`Number`](crate::Value::Number)s. `n`/`m`-suffixed literals and the
    /// non-finite words are unaffected.
    ///
    /// # Default
    ///
    /// `false`
    pub parse_numbers_as_decimals: bool,

    /// Maximum container nesting depth. A document nested exactly this deep
    /// parses; one level deeper is a
    /// [`DepthExceeded`](crate::ErrorKind::DepthExceeded) error.
    ///
    /// # Default
    ///
    /// `1024`
    pub max_depth: usize,

    /// Repeated-key policy for objects.
    ///
    /// # Default
    ///
    /// [`DuplicateKeys::KeepLast`]
    pub duplicate_keys: DuplicateKeys,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            allow_comments: true,
            allow_trailing_commas: true,
            allow_unquoted_keys: true,
            parse_dates: true,
            parse_numbers_as_decimals: false,
            max_depth: 1024,
            duplicate_keys: DuplicateKeys::KeepLast,
        }
    }
}

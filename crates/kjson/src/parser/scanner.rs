//! Tokeniser for kJSON text.
//!
//! The scanner walks the source bytes once, tracking byte offset, 1-based
//! line, and 1-based column for every token. It owns the JSON5 relaxations
//! (comments, unicode whitespace, three string delimiters with the extended
//! escape set) and the literal disambiguation ladder: after an optional
//! minus, a run that looks like a value is tried as UUID, then ISO-8601
//! instant, then ISO-8601 duration, then a JSON number with an optional
//! `n`/`m` suffix. Whatever fails the ladder and starts like an identifier
//! becomes an `Ident` or one of the reserved words.

use crate::error::{Error, ErrorKind, Result};

/// The kind of a scanned token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Colon,
    Comma,
    /// A string literal; `text` holds the decoded content.
    String,
    /// An unquoted identifier that is not a reserved word.
    Ident,
    /// A plain JSON number; `text` holds the lexeme.
    Number,
    /// An `n`-suffixed integer; `text` holds the digits without the suffix.
    BigInt,
    /// An `m`-suffixed decimal; `text` holds the lexeme without the suffix.
    Decimal,
    /// A bare 8-4-4-4-12 UUID literal.
    Uuid,
    /// A bare ISO-8601 instant literal.
    Instant,
    /// A bare ISO-8601 duration literal.
    Duration,
    True,
    False,
    Null,
    Undefined,
    Infinity,
    NegInfinity,
    NaN,
    Eof,
}

/// A token with its decoded text and source position.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

/// Whitespace per the kJSON surface: the JSON four plus FF, VT, and the
/// Unicode line/paragraph separators.
fn is_whitespace(c: char) -> bool {
    matches!(
        c,
        ' ' | '\t' | '\r' | '\n' | '\u{000C}' | '\u{000B}' | '\u{2028}' | '\u{2029}'
    )
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphanumeric()
}

pub(crate) struct Scanner<'src> {
    bytes: &'src [u8],
    src: &'src str,
    pos: usize,
    line: usize,
    column: usize,
    allow_comments: bool,
}

impl<'src> Scanner<'src> {
    pub(crate) fn new(src: &'src str, allow_comments: bool) -> Self {
        // A leading BOM is stripped, but only at offset zero.
        let pos = if src.starts_with('\u{FEFF}') { 3 } else { 0 };
        Scanner {
            bytes: src.as_bytes(),
            src,
            pos,
            line: 1,
            column: 1,
            allow_comments,
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_byte(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    /// Consumes one character, updating line/column. CRLF counts as a
    /// single line break.
    fn bump(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        match c {
            '\n' | '\u{2028}' | '\u{2029}' => {
                self.line += 1;
                self.column = 1;
            }
            '\r' => {
                if self.peek_byte(0) != Some(b'\n') {
                    self.line += 1;
                    self.column = 1;
                }
            }
            _ => self.column += 1,
        }
        Some(c)
    }

    fn err_here(&self, kind: ErrorKind) -> Error {
        Error::at(kind, self.pos, self.line, self.column)
    }

    /// Skips whitespace and (when enabled) `//` and `/* */` comments.
    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            match self.peek_char() {
                Some(c) if is_whitespace(c) => {
                    self.bump();
                }
                Some('/') => {
                    if !self.allow_comments {
                        return Err(self.err_here(ErrorKind::UnexpectedChar('/')));
                    }
                    let (offset, line, column) = (self.pos, self.line, self.column);
                    self.bump();
                    match self.peek_char() {
                        Some('/') => {
                            self.bump();
                            while let Some(c) = self.peek_char() {
                                if matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}') {
                                    break;
                                }
                                self.bump();
                            }
                        }
                        Some('*') => {
                            self.bump();
                            loop {
                                match self.bump() {
                                    Some('*') if self.peek_byte(0) == Some(b'/') => {
                                        self.bump();
                                        break;
                                    }
                                    Some(_) => {}
                                    None => {
                                        return Err(Error::at(
                                            ErrorKind::UnexpectedEof,
                                            offset,
                                            line,
                                            column,
                                        ));
                                    }
                                }
                            }
                        }
                        _ => {
                            return Err(Error::at(
                                ErrorKind::UnexpectedChar('/'),
                                offset,
                                line,
                                column,
                            ));
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Produces the next token, or `Eof` once the input is exhausted.
    pub(crate) fn next_token(&mut self) -> Result<Token> {
        self.skip_trivia()?;
        let (offset, line, column) = (self.pos, self.line, self.column);
        let token = |kind: TokenKind, text: String| Token {
            kind,
            text,
            offset,
            line,
            column,
        };

        let Some(c) = self.peek_char() else {
            return Ok(token(TokenKind::Eof, String::new()));
        };

        match c {
            '{' => {
                self.bump();
                Ok(token(TokenKind::LBrace, String::new()))
            }
            '}' => {
                self.bump();
                Ok(token(TokenKind::RBrace, String::new()))
            }
            '[' => {
                self.bump();
                Ok(token(TokenKind::LBracket, String::new()))
            }
            ']' => {
                self.bump();
                Ok(token(TokenKind::RBracket, String::new()))
            }
            ':' => {
                self.bump();
                Ok(token(TokenKind::Colon, String::new()))
            }
            ',' => {
                self.bump();
                Ok(token(TokenKind::Comma, String::new()))
            }
            '"' | '\'' | '`' => {
                let text = self.scan_string(c)?;
                Ok(token(TokenKind::String, text))
            }
            _ => self.scan_literal(),
        }
    }

    // ---------------------------------------------------------------
    // Strings
    // ---------------------------------------------------------------

    fn scan_string(&mut self, delim: char) -> Result<String> {
        let (open_offset, open_line, open_column) = (self.pos, self.line, self.column);
        self.bump();
        let mut out = String::new();
        loop {
            let (esc_offset, esc_line, esc_column) = (self.pos, self.line, self.column);
            match self.bump() {
                None => {
                    return Err(Error::at(
                        ErrorKind::UnterminatedString,
                        open_offset,
                        open_line,
                        open_column,
                    ));
                }
                Some(c) if c == delim => return Ok(out),
                Some('\\') => {
                    self.scan_escape(&mut out, esc_offset, esc_line, esc_column)?;
                }
                // Raw line breaks terminate quote-delimited strings;
                // backtick strings keep them.
                Some('\n' | '\r') if delim != '`' => {
                    return Err(Error::at(
                        ErrorKind::UnterminatedString,
                        open_offset,
                        open_line,
                        open_column,
                    ));
                }
                Some(c) => out.push(c),
            }
        }
    }

    fn scan_escape(
        &mut self,
        out: &mut String,
        offset: usize,
        line: usize,
        column: usize,
    ) -> Result<()> {
        let invalid = || Error::at(ErrorKind::InvalidEscape, offset, line, column);
        let Some(c) = self.bump() else {
            return Err(invalid());
        };
        match c {
            '"' | '\'' | '`' | '\\' | '/' => out.push(c),
            'b' => out.push('\u{0008}'),
            'f' => out.push('\u{000C}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'x' => {
                let hi = self.hex_digit().ok_or_else(invalid)?;
                let lo = self.hex_digit().ok_or_else(invalid)?;
                out.push(char::from(hi * 16 + lo));
            }
            'u' => {
                if self.peek_byte(0) == Some(b'{') {
                    self.bump();
                    let mut code = 0u32;
                    let mut digits = 0;
                    loop {
                        match self.bump() {
                            Some('}') if digits > 0 => break,
                            Some(d) if d.is_ascii_hexdigit() && digits < 6 => {
                                code = code * 16 + d.to_digit(16).unwrap_or(0);
                                digits += 1;
                            }
                            _ => return Err(invalid()),
                        }
                    }
                    out.push(char::from_u32(code).ok_or_else(invalid)?);
                } else {
                    let unit = self.hex4().ok_or_else(invalid)?;
                    if (0xD800..0xDC00).contains(&unit) {
                        // High surrogate: the low half must follow as
                        // another \uXXXX escape.
                        if self.bump() != Some('\\') || self.bump() != Some('u') {
                            return Err(invalid());
                        }
                        let low = self.hex4().ok_or_else(invalid)?;
                        if !(0xDC00..0xE000).contains(&low) {
                            return Err(invalid());
                        }
                        let code = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                        out.push(char::from_u32(code).ok_or_else(invalid)?);
                    } else {
                        out.push(char::from_u32(unit).ok_or_else(invalid)?);
                    }
                }
            }
            // Line continuation: backslash followed by a line break
            // contributes nothing.
            '\n' | '\u{2028}' | '\u{2029}' => {}
            '\r' => {
                if self.peek_byte(0) == Some(b'\n') {
                    self.bump();
                }
            }
            _ => return Err(invalid()),
        }
        Ok(())
    }

    fn hex_digit(&mut self) -> Option<u8> {
        let c = self.peek_char()?;
        let v = c.to_digit(16)?;
        self.bump();
        u8::try_from(v).ok()
    }

    fn hex4(&mut self) -> Option<u32> {
        let mut v = 0u32;
        for _ in 0..4 {
            v = v * 16 + u32::from(self.hex_digit()?);
        }
        Some(v)
    }

    // ---------------------------------------------------------------
    // Literals: the UUID -> instant -> duration -> number ladder
    // ---------------------------------------------------------------

    /// True when the byte after the candidate token can legally follow a
    /// complete value token.
    fn delimiter_at(&self, at: usize) -> bool {
        match self.src[at..].chars().next() {
            None => true,
            Some(c) if is_whitespace(c) => true,
            Some('{' | '}' | '[' | ']' | ':' | ',' | '"' | '\'' | '`' | '/') => true,
            Some(_) => false,
        }
    }

    /// Advances over `len` bytes that are known to contain no line breaks.
    fn advance_inline(&mut self, len: usize) {
        self.pos += len;
        self.column += len;
    }

    fn scan_literal(&mut self) -> Result<Token> {
        let (offset, line, column) = (self.pos, self.line, self.column);
        let token = |kind: TokenKind, text: String| Token {
            kind,
            text,
            offset,
            line,
            column,
        };
        let rest = &self.bytes[self.pos..];

        if let Some(len) = match_uuid(rest) {
            if self.delimiter_at(self.pos + len) {
                let text = self.src[self.pos..self.pos + len].to_ascii_lowercase();
                self.advance_inline(len);
                return Ok(token(TokenKind::Uuid, text));
            }
            return Err(Error::at(ErrorKind::InvalidUuid, offset, line, column));
        }

        let negative = rest.first() == Some(&b'-');
        let body = if negative { &rest[1..] } else { rest };

        if !negative {
            if let Some(len) = match_instant(body) {
                if self.delimiter_at(self.pos + len) {
                    let text = self.src[self.pos..self.pos + len].to_string();
                    self.advance_inline(len);
                    return Ok(token(TokenKind::Instant, text));
                }
                return Err(Error::at(ErrorKind::InvalidInstant, offset, line, column));
            }
        }

        if body.first() == Some(&b'P') {
            let sign = usize::from(negative);
            if let Some(len) = match_duration(body) {
                if self.delimiter_at(self.pos + sign + len) {
                    let text = self.src[self.pos..self.pos + sign + len].to_string();
                    self.advance_inline(sign + len);
                    return Ok(token(TokenKind::Duration, text));
                }
            }
            if negative {
                return Err(Error::at(ErrorKind::InvalidDuration, offset, line, column));
            }
            // An unsigned `P…` that is not a duration can still be an
            // identifier such as `Pi`.
        }

        if body.first().is_some_and(u8::is_ascii_digit) {
            return self.scan_number(offset, line, column, negative);
        }

        if negative {
            // `-Infinity` and `-NaN` ride through the number path.
            if body.starts_with(b"Infinity") && self.delimiter_at(self.pos + 9) {
                self.advance_inline(9);
                return Ok(token(TokenKind::NegInfinity, String::new()));
            }
            if body.starts_with(b"NaN") && self.delimiter_at(self.pos + 4) {
                self.advance_inline(4);
                return Ok(token(TokenKind::NaN, String::new()));
            }
            return Err(Error::at(ErrorKind::InvalidNumber, offset, line, column));
        }

        let Some(c) = self.peek_char() else {
            return Ok(token(TokenKind::Eof, String::new()));
        };
        if !is_ident_start(c) {
            return Err(Error::at(ErrorKind::UnexpectedChar(c), offset, line, column));
        }
        while let Some(c) = self.peek_char() {
            if !is_ident_continue(c) {
                break;
            }
            self.bump();
        }
        let text = &self.src[offset..self.pos];
        let kind = match text {
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            "undefined" => TokenKind::Undefined,
            "Infinity" => TokenKind::Infinity,
            "NaN" => TokenKind::NaN,
            _ => TokenKind::Ident,
        };
        Ok(token(kind, text.to_string()))
    }

    /// Scans a JSON number with an optional `n` or `m` suffix. `self.pos`
    /// still sits on the sign when `negative` is set.
    fn scan_number(
        &mut self,
        offset: usize,
        line: usize,
        column: usize,
        negative: bool,
    ) -> Result<Token> {
        let invalid = || Error::at(ErrorKind::InvalidNumber, offset, line, column);
        let start = self.pos;
        let body_start = start + usize::from(negative);
        let body = &self.bytes[body_start..];

        let mut i = 0;
        // Integer part: 0 or [1-9][0-9]*.
        if body.first() == Some(&b'0') {
            i = 1;
        } else {
            while body.get(i).is_some_and(u8::is_ascii_digit) {
                i += 1;
            }
            if i == 0 {
                return Err(invalid());
            }
        }

        let mut integral = true;
        if body.get(i) == Some(&b'.') {
            integral = false;
            i += 1;
            let frac_start = i;
            while body.get(i).is_some_and(u8::is_ascii_digit) {
                i += 1;
            }
            if i == frac_start {
                return Err(invalid());
            }
        }
        if matches!(body.get(i), Some(b'e' | b'E')) {
            integral = false;
            i += 1;
            if matches!(body.get(i), Some(b'+' | b'-')) {
                i += 1;
            }
            let exp_start = i;
            while body.get(i).is_some_and(u8::is_ascii_digit) {
                i += 1;
            }
            if i == exp_start {
                return Err(invalid());
            }
        }

        let lexeme_end = body_start + i;
        let (kind, token_end) = match body.get(i) {
            Some(b'n') => {
                if !integral {
                    return Err(invalid());
                }
                (TokenKind::BigInt, lexeme_end + 1)
            }
            Some(b'm') => (TokenKind::Decimal, lexeme_end + 1),
            _ => (TokenKind::Number, lexeme_end),
        };
        if !self.delimiter_at(token_end) {
            return Err(invalid());
        }

        let text = self.src[start..lexeme_end].to_string();
        self.advance_inline(token_end - start);
        Ok(Token {
            kind,
            text,
            offset,
            line,
            column,
        })
    }
}

// -------------------------------------------------------------------
// Shape matchers, byte-level and allocation-free
// -------------------------------------------------------------------

fn digits(s: &[u8], at: usize, n: usize) -> bool {
    s.len() >= at + n && s[at..at + n].iter().all(u8::is_ascii_digit)
}

/// Matches a strict 8-4-4-4-12 hex UUID, returning its length (36).
fn match_uuid(s: &[u8]) -> Option<usize> {
    if s.len() < 36 {
        return None;
    }
    for (i, b) in s[..36].iter().enumerate() {
        match i {
            8 | 13 | 18 | 23 => {
                if *b != b'-' {
                    return None;
                }
            }
            _ => {
                if !b.is_ascii_hexdigit() {
                    return None;
                }
            }
        }
    }
    Some(36)
}

/// Matches `YYYY-MM-DDTHH:MM:SS[.f+][Z|±HH:MM|±HHMM]`, returning its
/// length. Field ranges are validated later by `Instant::from_str`.
fn match_instant(s: &[u8]) -> Option<usize> {
    if !(digits(s, 0, 4) && s.get(4) == Some(&b'-') && digits(s, 5, 2) && s.get(7) == Some(&b'-'))
    {
        return None;
    }
    if !(digits(s, 8, 2) && s.get(10) == Some(&b'T')) {
        return None;
    }
    if !(digits(s, 11, 2)
        && s.get(13) == Some(&b':')
        && digits(s, 14, 2)
        && s.get(16) == Some(&b':')
        && digits(s, 17, 2))
    {
        return None;
    }
    let mut i = 19;
    if s.get(i) == Some(&b'.') {
        let frac_start = i + 1;
        i += 1;
        while s.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        if i == frac_start {
            return None;
        }
    }
    match s.get(i) {
        Some(b'Z') => Some(i + 1),
        Some(b'+' | b'-') => {
            if !digits(s, i + 1, 2) {
                return None;
            }
            if s.get(i + 3) == Some(&b':') && digits(s, i + 4, 2) {
                Some(i + 6)
            } else if digits(s, i + 3, 2) {
                Some(i + 5)
            } else {
                None
            }
        }
        _ => Some(i),
    }
}

/// Matches `P[nY][nM][nW][nD][T[nH][nM][n[.f]S]]` loosely, returning its
/// length. Component order and fraction placement are validated by
/// `Duration::from_str`. The emitter also consults this: an identifier
/// that would re-scan as a duration cannot be a bare object key.
pub(crate) fn match_duration(s: &[u8]) -> Option<usize> {
    if s.first() != Some(&b'P') {
        return None;
    }
    let mut i = 1;
    let mut matched = false;
    while i < s.len() {
        match s[i] {
            b'T' => i += 1,
            b'0'..=b'9' => {
                while s.get(i).is_some_and(u8::is_ascii_digit) {
                    i += 1;
                }
                if s.get(i) == Some(&b'.') {
                    i += 1;
                    while s.get(i).is_some_and(u8::is_ascii_digit) {
                        i += 1;
                    }
                }
                match s.get(i) {
                    Some(b'Y' | b'M' | b'W' | b'D' | b'H' | b'S') => {
                        i += 1;
                        matched = true;
                    }
                    _ => return None,
                }
            }
            _ => break,
        }
    }
    matched.then_some(i)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn tokens(src: &str) -> Vec<(TokenKind, String)> {
        let mut scanner = Scanner::new(src, true);
        let mut out = Vec::new();
        loop {
            let tok = scanner.next_token().unwrap();
            let done = tok.kind == TokenKind::Eof;
            out.push((tok.kind, tok.text));
            if done {
                return out;
            }
        }
    }

    fn first_err(src: &str) -> Error {
        let mut scanner = Scanner::new(src, true);
        loop {
            match scanner.next_token() {
                Ok(tok) if tok.kind == TokenKind::Eof => panic!("no error in {src:?}"),
                Ok(_) => {}
                Err(e) => return e,
            }
        }
    }

    #[rstest]
    #[case("42", TokenKind::Number, "42")]
    #[case("-1.5e3", TokenKind::Number, "-1.5e3")]
    #[case("2n", TokenKind::BigInt, "2")]
    #[case("-99n", TokenKind::BigInt, "-99")]
    #[case("3.5m", TokenKind::Decimal, "3.5")]
    #[case("-0.25m", TokenKind::Decimal, "-0.25")]
    #[case("1e2m", TokenKind::Decimal, "1e2")]
    fn numeric_tokens(#[case] src: &str, #[case] kind: TokenKind, #[case] text: &str) {
        assert_eq!(tokens(src)[0], (kind, text.to_string()));
    }

    #[rstest]
    #[case("true", TokenKind::True)]
    #[case("false", TokenKind::False)]
    #[case("null", TokenKind::Null)]
    #[case("undefined", TokenKind::Undefined)]
    #[case("Infinity", TokenKind::Infinity)]
    #[case("-Infinity", TokenKind::NegInfinity)]
    #[case("NaN", TokenKind::NaN)]
    #[case("-NaN", TokenKind::NaN)]
    fn reserved_words(#[case] src: &str, #[case] kind: TokenKind) {
        assert_eq!(tokens(src)[0].0, kind);
    }

    #[test]
    fn uuid_wins_over_hex_runs() {
        let toks = tokens("550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(
            toks[0],
            (
                TokenKind::Uuid,
                "550e8400-e29b-41d4-a716-446655440000".to_string()
            )
        );
    }

    #[test]
    fn uuid_is_lowercased() {
        let toks = tokens("550E8400-E29B-41D4-A716-446655440000");
        assert_eq!(toks[0].1, "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn instant_token_spans_colons() {
        let toks = tokens("{a: 2025-01-15T10:30:00Z}");
        assert_eq!(toks[3], (TokenKind::Instant, "2025-01-15T10:30:00Z".into()));
    }

    #[rstest]
    #[case("2025-01-15T10:30:00")]
    #[case("2025-01-15T10:30:00.123456789Z")]
    #[case("2025-01-15T10:30:00+05:30")]
    #[case("2025-01-15T10:30:00-0800")]
    fn instant_shapes(#[case] src: &str) {
        assert_eq!(tokens(src)[0], (TokenKind::Instant, src.to_string()));
    }

    #[rstest]
    #[case("P1Y2M3DT4H5M6S")]
    #[case("-P1DT6H")]
    #[case("PT0.5S")]
    fn duration_shapes(#[case] src: &str) {
        assert_eq!(tokens(src)[0], (TokenKind::Duration, src.to_string()));
    }

    #[test]
    fn p_identifier_is_not_a_duration() {
        assert_eq!(tokens("Pi")[0], (TokenKind::Ident, "Pi".to_string()));
    }

    #[rstest]
    #[case("\"hello\"", "hello")]
    #[case("'hello'", "hello")]
    #[case("`hello`", "hello")]
    #[case(r#"'it\'s'"#, "it's")]
    #[case(r#""tab\there""#, "tab\there")]
    #[case(r#""\x41B\u{43}""#, "ABC")]
    #[case(r#""😀""#, "\u{1F600}")]
    #[case("\"a\\\nb\"", "ab")]
    #[case("`line\nbreak`", "line\nbreak")]
    fn string_tokens(#[case] src: &str, #[case] expect: &str) {
        assert_eq!(tokens(src)[0], (TokenKind::String, expect.to_string()));
    }

    #[test]
    fn comments_are_trivia() {
        let toks = tokens("// leading\n[1, /* inner */ 2]");
        let kinds: Vec<_> = toks.iter().map(|t| t.0).collect();
        assert_eq!(
            kinds,
            [
                TokenKind::LBracket,
                TokenKind::Number,
                TokenKind::Comma,
                TokenKind::Number,
                TokenKind::RBracket,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn comment_disallowed_is_an_error() {
        let mut scanner = Scanner::new("// nope", false);
        let err = scanner.next_token().unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::UnexpectedChar('/'));
    }

    #[test]
    fn bom_is_stripped() {
        assert_eq!(tokens("\u{FEFF}1")[0], (TokenKind::Number, "1".to_string()));
    }

    #[test]
    fn positions_are_one_based() {
        let mut scanner = Scanner::new("{\n  a: 1}", true);
        let lbrace = scanner.next_token().unwrap();
        assert_eq!((lbrace.line, lbrace.column, lbrace.offset), (1, 1, 0));
        let key = scanner.next_token().unwrap();
        assert_eq!((key.line, key.column), (2, 3));
    }

    #[test]
    fn unterminated_string_points_at_the_opening_quote() {
        let err = first_err("  \"abc");
        assert_eq!(*err.kind(), ErrorKind::UnterminatedString);
        assert_eq!((err.line(), err.column()), (1, 3));
    }

    #[rstest]
    #[case("\"ab\ncd\"")]
    #[case("'ab\rcd'")]
    fn raw_newline_in_quoted_string(#[case] src: &str) {
        assert_eq!(*first_err(src).kind(), ErrorKind::UnterminatedString);
    }

    #[rstest]
    #[case(r#""\q""#)]
    #[case(r#""\u12""#)]
    #[case(r#""\u{}""#)]
    #[case(r#""\uD800""#)]
    #[case(r#""\uD800A""#)]
    #[case(r#""\u{110000}""#)]
    fn invalid_escapes(#[case] src: &str) {
        assert_eq!(*first_err(src).kind(), ErrorKind::InvalidEscape);
    }

    #[rstest]
    #[case("01")]
    #[case("1.")]
    #[case("1e")]
    #[case("1.5n")]
    #[case("123abc")]
    #[case("-")]
    fn invalid_numbers(#[case] src: &str) {
        assert_eq!(*first_err(src).kind(), ErrorKind::InvalidNumber);
    }

    #[test]
    fn truncated_uuid_falls_through_to_number_error() {
        // 8-4-4 only: not a UUID, not an instant, not a valid number.
        assert_eq!(
            *first_err("550e8400-e29b-41d4").kind(),
            ErrorKind::InvalidNumber
        );
    }
}

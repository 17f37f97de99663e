//! Recursive-descent parser from kJSON text to [`Value`] trees.
//!
//! The parser pulls tokens from the [`scanner`] one at a time and never
//! backtracks past a completed token; errors surface at the first
//! offending token with its position. Depth is bounded by
//! [`ParserOptions::max_depth`], and anything after the top-level value
//! except trivia is a [`TrailingContent`](ErrorKind::TrailingContent)
//! error.

mod options;
pub(crate) mod scanner;


pub use options::{DuplicateKeys, ParserOptions};

use indexmap::map::Entry;

use crate::error::{Error, ErrorKind, Result};
use crate::types::{BigInt, Decimal128, Duration, Instant};
use crate::value::{Map, Value};
use scanner::{Scanner, Token, TokenKind};

/// Parses a complete kJSON document with default options.
///
/// # Errors
///
/// Returns the first syntax, lexical, or structural error with its
/// position.
pub fn parse(source: &str) -> Result<Value> {
    parse_with(source, &ParserOptions::default())
}

/// Parses a complete kJSON document.
///
/// # Errors
///
/// Returns the first syntax, lexical, or structural error with its
/// position.
pub fn parse_with(source: &str, options: &ParserOptions) -> Result<Value> {
    let mut parser = Parser {
        scanner: Scanner::new(source, options.allow_comments),
        options: *options,
        depth: 0,
    };
    let first = parser.scanner.next_token()?;
    let value = parser.parse_value(first)?;
    let trailing = parser.scanner.next_token()?;
    if trailing.kind != TokenKind::Eof {
        return Err(Error::at(
            ErrorKind::TrailingContent,
            trailing.offset,
            trailing.line,
            trailing.column,
        ));
    }
    Ok(value)
}

/// Returns whether `source` parses cleanly with default options. Never
/// panics or errors.
#[must_use]
pub fn is_valid(source: &str) -> bool {
    parse(source).is_ok()
}

/// Returns whether `source` parses cleanly. Never panics or errors.
#[must_use]
pub fn is_valid_with(source: &str, options: &ParserOptions) -> bool {
    parse_with(source, options).is_ok()
}

/// Parses `source`, returning `fallback` on any error.
#[must_use]
pub fn safe_parse(source: &str, fallback: Value) -> Value {
    parse(source).unwrap_or(fallback)
}

/// Parses `source` with explicit options, returning `fallback` on any
/// error.
#[must_use]
pub fn safe_parse_with(source: &str, fallback: Value, options: &ParserOptions) -> Value {
    parse_with(source, options).unwrap_or(fallback)
}

struct Parser<'src> {
    scanner: Scanner<'src>,
    options: ParserOptions,
    depth: usize,
}

impl Parser<'_> {
    fn parse_value(&mut self, token: Token) -> Result<Value> {
        match token.kind {
            TokenKind::LBrace => self.parse_object(&token),
            TokenKind::LBracket => self.parse_array(&token),
            TokenKind::String => Ok(Value::String(token.text)),
            TokenKind::Number => self.number_value(&token),
            TokenKind::BigInt => token
                .text
                .parse::<BigInt>()
                .map(Value::BigInt)
                .map_err(|()| err_at(ErrorKind::InvalidNumber, &token)),
            TokenKind::Decimal => token
                .text
                .parse::<Decimal128>()
                .map(Value::Decimal)
                .map_err(|()| err_at(ErrorKind::InvalidNumber, &token)),
            TokenKind::Uuid => token
                .text
                .parse::<uuid::Uuid>()
                .map(Value::Uuid)
                .map_err(|_| err_at(ErrorKind::InvalidUuid, &token)),
            TokenKind::Instant => {
                if self.options.parse_dates {
                    token
                        .text
                        .parse::<Instant>()
                        .map(Value::Instant)
                        .map_err(|()| err_at(ErrorKind::InvalidInstant, &token))
                } else {
                    Ok(Value::String(token.text))
                }
            }
            TokenKind::Duration => token
                .text
                .parse::<Duration>()
                .map(Value::Duration)
                .map_err(|()| err_at(ErrorKind::InvalidDuration, &token)),
            TokenKind::True => Ok(Value::Bool(true)),
            TokenKind::False => Ok(Value::Bool(false)),
            TokenKind::Null => Ok(Value::Null),
            TokenKind::Undefined => Ok(Value::Undefined),
            TokenKind::Infinity => Ok(Value::Number(f64::INFINITY)),
            TokenKind::NegInfinity => Ok(Value::Number(f64::NEG_INFINITY)),
            TokenKind::NaN => Ok(Value::Number(f64::NAN)),
            TokenKind::Eof => Err(err_at(ErrorKind::UnexpectedEof, &token)),
            TokenKind::RBrace | TokenKind::RBracket | TokenKind::Colon | TokenKind::Comma
            | TokenKind::Ident => Err(err_at(
                ErrorKind::UnexpectedChar(first_char(&token)),
                &token,
            )),
        }
    }

    fn number_value(&self, token: &Token) -> Result<Value> {
        if self.options.parse_numbers_as_decimals {
            return token
                .text
                .parse::<Decimal128>()
                .map(Value::Decimal)
                .map_err(|()| err_at(ErrorKind::InvalidNumber, token));
        }
        token
            .text
            .parse::<f64>()
            .map(Value::Number)
            .map_err(|_| err_at(ErrorKind::InvalidNumber, token))
    }

    fn enter(&mut self, open: &Token) -> Result<()> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(err_at(ErrorKind::DepthExceeded, open));
        }
        Ok(())
    }

    fn parse_array(&mut self, open: &Token) -> Result<Value> {
        self.enter(open)?;
        let mut items = Vec::new();
        let mut token = self.scanner.next_token()?;
        if token.kind != TokenKind::RBracket {
            loop {
                items.push(self.parse_value(token)?);
                let sep = self.scanner.next_token()?;
                match sep.kind {
                    TokenKind::RBracket => break,
                    TokenKind::Comma => {
                        token = self.scanner.next_token()?;
                        if token.kind == TokenKind::RBracket {
                            if self.options.allow_trailing_commas {
                                break;
                            }
                            return Err(err_at(ErrorKind::TrailingCommaDisallowed, &token));
                        }
                    }
                    _ => {
                        return Err(err_at(ErrorKind::UnexpectedChar(first_char(&sep)), &sep));
                    }
                }
            }
        }
        self.depth -= 1;
        Ok(Value::Array(items))
    }

    fn parse_object(&mut self, open: &Token) -> Result<Value> {
        self.enter(open)?;
        let mut map = Map::new();
        let mut first = true;
        loop {
            let token = self.scanner.next_token()?;
            match token.kind {
                TokenKind::RBrace if first => break,
                TokenKind::RBrace => {
                    if self.options.allow_trailing_commas {
                        break;
                    }
                    return Err(err_at(ErrorKind::TrailingCommaDisallowed, &token));
                }
                _ => {}
            }
            first = false;
            let key = self.member_key(token)?;
            let colon = self.scanner.next_token()?;
            if colon.kind != TokenKind::Colon {
                return Err(err_at(
                    ErrorKind::UnexpectedChar(first_char(&colon)),
                    &colon,
                ));
            }
            let value_token = self.scanner.next_token()?;
            let value = self.parse_value(value_token)?;
            self.insert_member(&mut map, key, value)?;

            let sep = self.scanner.next_token()?;
            match sep.kind {
                TokenKind::RBrace => break,
                TokenKind::Comma => continue,
                _ => return Err(err_at(ErrorKind::UnexpectedChar(first_char(&sep)), &sep)),
            }
        }
        self.depth -= 1;
        Ok(Value::Object(map))
    }

    fn member_key(&self, token: Token) -> Result<(String, Token)> {
        match token.kind {
            TokenKind::String => Ok((token.text.clone(), token)),
            // Bare identifiers, including the reserved words: `{true: 1}`
            // has the key "true".
            TokenKind::Ident
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Null
            | TokenKind::Undefined
            | TokenKind::Infinity
            | TokenKind::NaN => {
                if !self.options.allow_unquoted_keys {
                    return Err(err_at(ErrorKind::UnquotedKeyDisallowed, &token));
                }
                let key = if token.text.is_empty() {
                    keyword_text(token.kind).to_string()
                } else {
                    token.text.clone()
                };
                Ok((key, token))
            }
            _ => Err(err_at(ErrorKind::UnexpectedChar(first_char(&token)), &token)),
        }
    }

    fn insert_member(&self, map: &mut Map, key: (String, Token), value: Value) -> Result<()> {
        let (key, token) = key;
        match map.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
            Entry::Occupied(mut slot) => match self.options.duplicate_keys {
                DuplicateKeys::KeepLast => {
                    slot.insert(value);
                    Ok(())
                }
                DuplicateKeys::KeepFirst => Ok(()),
                DuplicateKeys::Error => Err(err_at(
                    ErrorKind::DuplicateKey(slot.key().clone()),
                    &token,
                )),
            },
        }
    }
}

fn err_at(kind: ErrorKind, token: &Token) -> Error {
    Error::at(kind, token.offset, token.line, token.column)
}

fn keyword_text(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::True => "true",
        TokenKind::False => "false",
        TokenKind::Null => "null",
        TokenKind::Undefined => "undefined",
        TokenKind::Infinity => "Infinity",
        TokenKind::NaN => "NaN",
        _ => "",
    }
}

fn first_char(token: &Token) -> char {
    match token.kind {
        TokenKind::RBrace => '}',
        TokenKind::RBracket => ']',
        TokenKind::Colon => ':',
        TokenKind::Comma => ',',
        _ => token.text.chars().next().unwrap_or('?'),
    }
}

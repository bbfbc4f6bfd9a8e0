#![allow(unsafe_code)]

#[cfg(test)]
#[path = "./parser_tests.rs"]
mod tests;

use crate::{
    Span,
    arena::Arena,
    array::Array,
    error::{Error, ErrorKind},
    report::locate,
    table::Table,
    tokenizer::{Token, TokenKind, Tokenizer},
    value::{Key, Value},
};
use std::str::CharIndices;

/// Arrays and inline tables nested deeper than this are rejected, as are
/// key paths (header plus dotted key) with more segments than this.
pub const MAX_NESTING: usize = 128;

// Zero-sized so that the hot paths carry no error payload. When a method
// returns `Err(ParseError)` the details are already stored in
// `Parser::error_kind` and `Parser::error_span`.
#[derive(Copy, Clone, Debug)]
struct ParseError;

struct Parser<'de> {
    input: &'de str,
    tokens: Tokenizer<'de>,
    arena: &'de Arena,
    depth: usize,

    error_span: Span,
    error_kind: Option<ErrorKind>,
}

impl<'de> Parser<'de> {
    fn new(input: &'de str, arena: &'de Arena) -> Self {
        Parser {
            input,
            tokens: Tokenizer::new(input),
            arena,
            depth: 0,
            error_span: Span::default(),
            error_kind: None,
        }
    }

    // -- error helpers ------------------------------------------------------

    #[cold]
    fn set_error(&mut self, span: Span, kind: ErrorKind) -> ParseError {
        trace!("parse error at {}..{}: {}", span.start, span.end, kind);
        self.error_span = span;
        self.error_kind = Some(kind);
        ParseError
    }

    #[cold]
    fn eof(&mut self) -> ParseError {
        let end = self.input.len() as u32;
        self.set_error(Span::new(end, end), ErrorKind::UnexpectedEof)
    }

    #[cold]
    fn wanted(&mut self, found: Token, expected: &'static str) -> ParseError {
        self.set_error(
            found.span,
            ErrorKind::Wanted {
                expected,
                found: found.kind.describe(),
            },
        )
    }

    fn take_error(&mut self) -> Error {
        debug_assert!(self.error_kind.is_some(), "take_error without a pending error");
        let kind = self.error_kind.take().unwrap_or(ErrorKind::UnexpectedEof);
        let span = self.error_span;
        Error {
            kind,
            span,
            line_info: Some(locate(self.input, span.start as usize)),
        }
    }

    // -- token helpers ------------------------------------------------------

    fn next(&mut self) -> Result<Token, ParseError> {
        match self.tokens.next_token() {
            Some(token) => Ok(token),
            None => Err(self.eof()),
        }
    }

    fn peek(&mut self) -> Result<Token, ParseError> {
        match self.tokens.peek_token() {
            Some(token) => Ok(token),
            None => Err(self.eof()),
        }
    }

    /// Like `peek`, but steps over newlines first.
    fn peek_skipping_newlines(&mut self) -> Result<Token, ParseError> {
        loop {
            let token = self.peek()?;
            if token.kind != TokenKind::Newline {
                return Ok(token);
            }
            self.tokens.next_token();
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token, ParseError> {
        let token = self.next()?;
        if token.kind != kind {
            return Err(self.wanted(token, expected));
        }
        Ok(token)
    }

    /// A line must end in a newline or the end of input.
    fn end_of_line(&mut self) -> Result<(), ParseError> {
        match self.tokens.next_token() {
            None => Ok(()),
            Some(token) if token.kind == TokenKind::Newline => Ok(()),
            Some(token) => Err(self.wanted(token, "a newline")),
        }
    }

    // -- keys ---------------------------------------------------------------

    /// Parses `ident ( '.' ident )*` into `path`, copying each segment into
    /// the arena.
    fn dotted_key(&mut self, path: &mut Vec<Key<'de>>) -> Result<(), ParseError> {
        loop {
            let token = self.next()?;
            if token.kind != TokenKind::Identifier {
                return Err(self.wanted(token, "an identifier"));
            }
            path.push(Key {
                name: self.arena.alloc_str(self.tokens.slice(token.span)),
                span: token.span,
            });
            match self.tokens.peek_token() {
                Some(Token {
                    kind: TokenKind::Dot,
                    ..
                }) => {
                    self.tokens.next_token();
                }
                _ => return Ok(()),
            }
        }
    }

    /// Every key segment opens a table, so a path that starts `outer` levels
    /// deep may have at most `MAX_NESTING - outer` segments.
    fn key_depth(&mut self, outer: usize, path: &[Key<'de>]) -> Result<(), ParseError> {
        match path.get(MAX_NESTING.saturating_sub(outer)) {
            Some(key) => Err(self.set_error(key.span, ErrorKind::NestingTooDeep)),
            None => Ok(()),
        }
    }

    fn insert(
        &mut self,
        table: &mut Table<'de>,
        path: &[Key<'de>],
        value: Value<'de>,
    ) -> Result<(), ParseError> {
        match table.insert_path(path, value) {
            Ok(_) => {
                trace!("inserted {:?}", path);
                Ok(())
            }
            Err(err) => Err(self.set_error(err.span, err.kind)),
        }
    }

    // -- values -------------------------------------------------------------

    fn value(&mut self) -> Result<Value<'de>, ParseError> {
        let token = self.next()?;
        match token.kind {
            TokenKind::String => self.string(token.span).map(Value::String),
            TokenKind::Integer => self.integer(token.span).map(Value::Integer),
            TokenKind::Float => self.float(token.span).map(Value::Float),
            TokenKind::Identifier => match self.tokens.slice(token.span) {
                "true" => Ok(Value::Boolean(true)),
                "false" => Ok(Value::Boolean(false)),
                "inf" => Ok(Value::Float(f64::INFINITY)),
                "nan" => Ok(Value::Float(f64::NAN)),
                _ => Err(self.set_error(token.span, ErrorKind::UnexpectedIdentifier)),
            },
            TokenKind::LeftBracket => self.nested(token.span, Self::array).map(Value::Array),
            TokenKind::LeftBrace => self
                .nested(token.span, Self::inline_table)
                .map(Value::Table),
            TokenKind::SingleQuote => {
                Err(self.set_error(token.span, ErrorKind::Unsupported("literal strings")))
            }
            TokenKind::UnterminatedString => {
                Err(self.set_error(token.span, ErrorKind::UnterminatedString))
            }
            TokenKind::Illegal => {
                let ch = self.tokens.slice(token.span).chars().next().unwrap_or('\0');
                Err(self.set_error(token.span, ErrorKind::IllegalCharacter(ch)))
            }
            _ => Err(self.wanted(token, "an expression")),
        }
    }

    fn nested<T>(
        &mut self,
        open: Span,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(self.set_error(open, ErrorKind::NestingTooDeep));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// The opening `[` has been consumed.
    fn array(&mut self) -> Result<Array<'de>, ParseError> {
        let mut array = Array::new();
        loop {
            let token = self.peek_skipping_newlines()?;
            if token.kind == TokenKind::RightBracket {
                self.tokens.next_token();
                return Ok(array);
            }
            array.push(self.value()?);

            let token = self.peek_skipping_newlines()?;
            if token.kind == TokenKind::Comma {
                self.tokens.next_token();
            }
        }
    }

    /// The opening `{` has been consumed.
    fn inline_table(&mut self) -> Result<Table<'de>, ParseError> {
        let mut table = Table::new();
        let mut path = Vec::new();
        loop {
            let token = self.peek()?;
            if token.kind == TokenKind::RightBrace {
                self.tokens.next_token();
                return Ok(table);
            }

            path.clear();
            self.dotted_key(&mut path)?;
            self.key_depth(self.depth, &path)?;
            self.expect(TokenKind::Equals, "'='")?;
            let value = self.value()?;
            self.insert(&mut table, &path, value)?;

            if self.peek()?.kind == TokenKind::Comma {
                self.tokens.next_token();
            } else {
                break;
            }
        }
        self.expect(TokenKind::RightBrace, "'}'")?;
        Ok(table)
    }

    fn string(&mut self, span: Span) -> Result<&'de str, ParseError> {
        let raw = self.tokens.slice(span);
        if !raw.bytes().any(|b| b == b'\\' || is_forbidden_in_string(b)) {
            return Ok(self.arena.alloc_str(raw));
        }

        // Safety: nothing else allocates from the arena until the scratch
        // is committed or dropped below.
        let mut scratch = unsafe { self.arena.scratch() };
        let mut chars = raw.char_indices();
        while let Some((i, ch)) = chars.next() {
            let at = span.start + i as u32;
            match ch {
                '\\' => match self.escape(&mut chars, span, at) {
                    Ok(decoded) => scratch.push_char(decoded),
                    Err(err) => return Err(err),
                },
                '\t' => scratch.push(b'\t'),
                c if (c as u32) < 0x80 && is_forbidden_in_string(c as u8) => {
                    return Err(self.set_error(
                        Span::new(at, at + 1),
                        ErrorKind::InvalidCharInString(c),
                    ));
                }
                c => scratch.push_char(c),
            }
        }
        let bytes = scratch.commit();
        // Safety: only whole chars were pushed into the scratch.
        Ok(unsafe { std::str::from_utf8_unchecked(bytes) })
    }

    /// Decodes the escape after a backslash found at byte offset `at`.
    fn escape(
        &mut self,
        chars: &mut CharIndices<'de>,
        string: Span,
        at: u32,
    ) -> Result<char, ParseError> {
        let Some((i, ch)) = chars.next() else {
            // The tokenizer never ends a string on a backslash.
            return Err(self.set_error(string, ErrorKind::UnterminatedString));
        };
        match ch {
            '"' => Ok('"'),
            '\\' => Ok('\\'),
            'b' => Ok('\u{8}'),
            'f' => Ok('\u{c}'),
            'n' => Ok('\n'),
            'r' => Ok('\r'),
            't' => Ok('\t'),
            'e' => Ok('\u{1b}'),
            'u' => self.hex_escape(chars, 4, string, at),
            'U' => self.hex_escape(chars, 8, string, at),
            c => {
                let start = string.start + i as u32;
                Err(self.set_error(
                    Span::new(start, start + c.len_utf8() as u32),
                    ErrorKind::InvalidEscape(c),
                ))
            }
        }
    }

    fn hex_escape(
        &mut self,
        chars: &mut CharIndices<'de>,
        digits: u32,
        string: Span,
        at: u32,
    ) -> Result<char, ParseError> {
        let mut value = 0u32;
        for _ in 0..digits {
            let (offset, ch) = match chars.next() {
                Some((i, ch)) => (string.start + i as u32, ch),
                // Ran into the closing quote.
                None => (string.end, '"'),
            };
            match ch.to_digit(16) {
                Some(digit) => value = (value << 4) | digit,
                None => {
                    return Err(self.set_error(
                        Span::new(offset, offset + ch.len_utf8() as u32),
                        ErrorKind::InvalidHexEscape(ch),
                    ));
                }
            }
        }
        match char::from_u32(value) {
            Some(ch) => Ok(ch),
            None => Err(self.set_error(
                Span::new(at, at + 2 + digits),
                ErrorKind::InvalidEscapeValue(value),
            )),
        }
    }

    fn integer(&mut self, span: Span) -> Result<i64, ParseError> {
        let text = self.tokens.slice(span);
        let (negative, unsigned) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };
        let signed = unsigned.len() != text.len();

        let (radix, digits) = if let Some(rest) = unsigned.strip_prefix("0x") {
            (16, rest)
        } else if let Some(rest) = unsigned.strip_prefix("0o") {
            (8, rest)
        } else if let Some(rest) = unsigned.strip_prefix("0b") {
            (2, rest)
        } else {
            (10, unsigned)
        };
        if digits.is_empty() || (signed && radix != 10) {
            return Err(self.set_error(span, ErrorKind::InvalidNumber));
        }

        let bytes = digits.as_bytes();
        let mut value: i64 = 0;
        for (i, &b) in bytes.iter().enumerate() {
            if b == b'_' {
                let between_digits = i > 0 && i + 1 < bytes.len() && bytes[i - 1] != b'_';
                if !between_digits {
                    return Err(self.set_error(span, ErrorKind::InvalidNumber));
                }
                continue;
            }
            let Some(digit) = (b as char).to_digit(radix) else {
                return Err(self.set_error(span, ErrorKind::InvalidNumber));
            };
            // Accumulate towards the sign so that i64::MIN is reachable.
            let next = value.checked_mul(radix as i64).and_then(|v| {
                if negative {
                    v.checked_sub(digit as i64)
                } else {
                    v.checked_add(digit as i64)
                }
            });
            match next {
                Some(v) => value = v,
                None => return Err(self.set_error(span, ErrorKind::IntegerOutOfRange)),
            }
        }
        Ok(value)
    }

    fn float(&mut self, span: Span) -> Result<f64, ParseError> {
        let text = self.tokens.slice(span);
        // Safety: the scratch is dropped without committing before anything
        // else touches the arena.
        let mut scratch = unsafe { self.arena.scratch() };
        let parsed = if scratch.push_strip_underscores(text.as_bytes()) {
            std::str::from_utf8(scratch.as_bytes())
                .ok()
                .and_then(|s| s.parse::<f64>().ok())
        } else {
            None
        };
        drop(scratch);
        match parsed {
            Some(f) => Ok(f),
            None => Err(self.set_error(span, ErrorKind::InvalidNumber)),
        }
    }

    // -- document -----------------------------------------------------------

    fn document(&mut self, root: &mut Table<'de>) -> Result<(), ParseError> {
        let mut current: Vec<Key<'de>> = Vec::new();
        let mut path = Vec::new();
        while let Some(token) = self.tokens.peek_token() {
            match token.kind {
                TokenKind::Newline => {
                    self.tokens.next_token();
                }
                TokenKind::LeftBracket => {
                    self.tokens.next_token();
                    self.header(root, token.span, &mut current)?;
                }
                TokenKind::Identifier => {
                    path.clear();
                    self.dotted_key(&mut path)?;
                    self.key_depth(current.len(), &path)?;
                    self.expect(TokenKind::Equals, "'='")?;
                    let value = self.value()?;
                    self.end_of_line()?;
                    match root.table_at_mut(&current) {
                        Some(table) => self.insert(table, &path, value)?,
                        None => return Err(self.lost_header(&current)),
                    }
                }
                _ => {
                    self.tokens.next_token();
                    return Err(self.wanted(token, "a key or table header"));
                }
            }
        }
        Ok(())
    }

    /// `[ key.path ]`, with the opening bracket at `open` already consumed.
    fn header(
        &mut self,
        root: &mut Table<'de>,
        open: Span,
        current: &mut Vec<Key<'de>>,
    ) -> Result<(), ParseError> {
        if let Some(token) = self.tokens.peek_token() {
            if token.kind == TokenKind::LeftBracket {
                return Err(self.set_error(
                    Span::new(open.start, token.span.end),
                    ErrorKind::Unsupported("arrays of tables"),
                ));
            }
        }

        let mut path = Vec::new();
        self.dotted_key(&mut path)?;
        self.key_depth(0, &path)?;
        self.expect(TokenKind::RightBracket, "']'")?;
        self.end_of_line()?;
        self.insert(root, &path, Value::Table(Table::new()))?;
        trace!("entering table {:?}", path);
        *current = path;
        Ok(())
    }

    // A header path always names a table: headers only ever create tables
    // and nothing replaces an existing entry.
    #[cold]
    fn lost_header(&mut self, current: &[Key<'de>]) -> ParseError {
        let (key, span) = match current.last() {
            Some(last) => (last.name.to_owned(), last.span),
            None => (String::new(), Span::default()),
        };
        self.set_error(span, ErrorKind::DottedKeyInvalidType { key, first: span })
    }
}

/// Control characters other than tab may not appear raw in a string.
#[inline]
fn is_forbidden_in_string(b: u8) -> bool {
    (b < 0x20 && b != b'\t') || b == 0x7f
}

/// Parses a document into its root [`Table`].
///
/// Strings and key names are copied into `arena`, so the returned table
/// borrows from it (and not from `input`) for their storage.
///
/// # Errors
///
/// Returns the first error found. Its `Display` renders
/// `"<line>:<col>: <message>"`.
///
/// # Examples
///
/// ```
/// let arena = conftree::Arena::new();
/// let err = conftree::parse("hello = [}", &arena).unwrap_err();
/// assert_eq!(err.to_string(), "1:10: expected an expression, found a right brace");
/// ```
pub fn parse<'de>(input: &'de str, arena: &'de Arena) -> Result<Table<'de>, Error> {
    if input.len() > u32::MAX as usize {
        return Err(Error {
            kind: ErrorKind::FileTooLarge,
            span: Span::default(),
            line_info: None,
        });
    }

    trace!("parsing {} bytes", input.len());
    let mut root = Table::new();
    let mut parser = Parser::new(input, arena);
    match parser.document(&mut root) {
        Ok(()) => Ok(root),
        Err(ParseError) => Err(parser.take_error()),
    }
}

/// Like [`parse`], but first validates that `input` is UTF-8.
///
/// # Errors
///
/// [`ErrorKind::InvalidUtf8`] located at the first malformed sequence, or any
/// error [`parse`] returns.
pub fn parse_bytes<'de>(input: &'de [u8], arena: &'de Arena) -> Result<Table<'de>, Error> {
    if input.len() > u32::MAX as usize {
        return Err(Error {
            kind: ErrorKind::FileTooLarge,
            span: Span::default(),
            line_info: None,
        });
    }
    match std::str::from_utf8(input) {
        Ok(text) => parse(text, arena),
        Err(err) => {
            let at = err.valid_up_to();
            let len = err.error_len().unwrap_or(input.len() - at);
            let valid = std::str::from_utf8(&input[..at]).unwrap_or_default();
            Err(Error {
                kind: ErrorKind::InvalidUtf8,
                span: Span::new(at as u32, (at + len) as u32),
                line_info: Some(locate(valid, at)),
            })
        }
    }
}

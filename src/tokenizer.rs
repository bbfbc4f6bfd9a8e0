//! Splits the input into lexical tokens.
//!
//! Tokens only carry a [`Span`] into the input; nothing is copied here. The
//! parser decides what a token means and copies what it keeps into the arena.

#[cfg(test)]
#[path = "./tokenizer_tests.rs"]
mod tests;

use crate::Span;
use crate::cursor::Cursor;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum TokenKind {
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Equals,
    Comma,
    Dot,
    /// `\n` or `\r\n`.
    Newline,
    Identifier,
    /// Basic string; the span excludes the quotes.
    String,
    Integer,
    Float,
    /// Opening quote of a literal string.
    SingleQuote,
    /// A `"` with no closing quote before the end of input.
    UnterminatedString,
    Illegal,
}

impl TokenKind {
    /// Description used in error messages.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::LeftBracket => "a left bracket",
            TokenKind::RightBracket => "a right bracket",
            TokenKind::LeftBrace => "a left brace",
            TokenKind::RightBrace => "a right brace",
            TokenKind::Equals => "an equals",
            TokenKind::Comma => "a comma",
            TokenKind::Dot => "a period",
            TokenKind::Newline => "a newline",
            TokenKind::Identifier => "an identifier",
            TokenKind::String | TokenKind::UnterminatedString => "a string",
            TokenKind::Integer => "an integer",
            TokenKind::Float => "a float",
            TokenKind::SingleQuote => "a literal string",
            TokenKind::Illegal => "a character",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

pub(crate) struct Tokenizer<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            cursor: Cursor::new(input),
        }
    }

    /// Source text covered by `span`.
    #[inline]
    pub fn slice(&self, span: Span) -> &'a str {
        &self.cursor.input()[span.start as usize..span.end as usize]
    }

    /// Returns the next token without consuming it.
    pub fn peek_token(&mut self) -> Option<Token> {
        let checkpoint = self.cursor.checkpoint();
        let token = self.next_token();
        self.cursor.restore(checkpoint);
        token
    }

    /// Produces the next token, or `None` at the end of input. Comments are
    /// skipped.
    pub fn next_token(&mut self) -> Option<Token> {
        loop {
            self.eat_while(|c| c == ' ' || c == '\t');

            let start = self.cursor.byte_offset();
            let ch = self.cursor.next()?;
            let kind = match ch {
                '[' => TokenKind::LeftBracket,
                ']' => TokenKind::RightBracket,
                '{' => TokenKind::LeftBrace,
                '}' => TokenKind::RightBrace,
                '=' => TokenKind::Equals,
                ',' => TokenKind::Comma,
                '.' => TokenKind::Dot,
                '\n' => TokenKind::Newline,
                '\r' => {
                    if self.cursor.eat('\n') {
                        TokenKind::Newline
                    } else {
                        TokenKind::Illegal
                    }
                }
                '#' => {
                    self.eat_while(|c| c != '\n' && c != '\r');
                    continue;
                }
                '"' => return Some(self.basic_string(start)),
                '\'' => TokenKind::SingleQuote,
                '0'..='9' => self.numeral(ch),
                '+' | '-' if matches!(self.cursor.peek(), Some('0'..='9')) => {
                    match self.cursor.next() {
                        Some(first) => self.numeral(first),
                        None => TokenKind::Illegal,
                    }
                }
                c if c.is_ascii_alphabetic() => {
                    self.eat_while(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
                    TokenKind::Identifier
                }
                _ => TokenKind::Illegal,
            };
            return Some(self.token(kind, start));
        }
    }

    #[inline]
    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            span: Span::new(start as u32, self.cursor.byte_offset() as u32),
        }
    }

    /// Steps past code points matching `pred`, leaving the cursor on the
    /// first one that does not.
    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.cursor.next() {
            if !pred(c) {
                self.cursor.retreat();
                break;
            }
        }
    }

    /// The opening quote at `start` has already been consumed.
    fn basic_string(&mut self, start: usize) -> Token {
        loop {
            match self.cursor.next() {
                None => return self.token(TokenKind::UnterminatedString, start),
                Some('\\') => {
                    self.cursor.next();
                }
                Some('"') => {
                    let end = self.cursor.byte_offset() - 1;
                    return Token {
                        kind: TokenKind::String,
                        span: Span::new(start as u32 + 1, end as u32),
                    };
                }
                Some(_) => {}
            }
        }
    }

    /// The first digit has already been consumed.
    fn numeral(&mut self, first: char) -> TokenKind {
        if first == '0' {
            let radix = match self.cursor.peek() {
                Some('x') => 16,
                Some('o') => 8,
                Some('b') => 2,
                _ => 10,
            };
            if radix != 10 {
                self.cursor.next();
                self.eat_while(|c| c == '_' || c.is_digit(radix));
                return TokenKind::Integer;
            }
        }

        self.eat_while(|c| c == '_' || c.is_ascii_digit());
        let mut kind = TokenKind::Integer;

        let before_fraction = self.cursor.checkpoint();
        if self.cursor.eat('.') {
            if matches!(self.cursor.peek(), Some('0'..='9')) {
                self.eat_while(|c| c == '_' || c.is_ascii_digit());
                kind = TokenKind::Float;
            } else {
                self.cursor.restore(before_fraction);
            }
        }

        let before_exponent = self.cursor.checkpoint();
        if self.cursor.eat('e') || self.cursor.eat('E') {
            if !self.cursor.eat('+') {
                self.cursor.eat('-');
            }
            if matches!(self.cursor.peek(), Some('0'..='9')) {
                self.eat_while(|c| c == '_' || c.is_ascii_digit());
                kind = TokenKind::Float;
            } else {
                self.cursor.restore(before_exponent);
            }
        }

        kind
    }
}

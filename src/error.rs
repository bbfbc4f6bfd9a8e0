use crate::Span;
use std::fmt::{self, Debug, Display};

#[cfg(test)]
#[path = "./error_tests.rs"]
mod tests;

/// Error produced when parsing fails.
///
/// `Display` renders `"<line>:<col>: <message>"` when location information is
/// available, which is always the case for errors returned by
/// [`parse`](crate::parse).
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    /// The error kind
    pub kind: ErrorKind,
    /// The span where the error occurs.
    ///
    /// Note some [`ErrorKind`] contain additional span information
    pub span: Span,
    /// 1-based line and column (in code points) of `span.start`
    pub line_info: Option<(usize, usize)>,
}

impl std::error::Error for Error {}

impl From<(ErrorKind, Span)> for Error {
    fn from((kind, span): (ErrorKind, Span)) -> Self {
        Self {
            kind,
            span,
            line_info: None,
        }
    }
}

/// The different ways parsing can fail.
#[derive(Clone, PartialEq)]
pub enum ErrorKind {
    /// The input ended in the middle of a construct.
    UnexpectedEof,

    /// The input is larger than spans can address (4GiB).
    FileTooLarge,

    /// The input bytes are not valid UTF-8.
    InvalidUtf8,

    /// Wanted one sort of token, but found another.
    Wanted {
        /// Expected token type.
        expected: &'static str,
        /// Actually found token type.
        found: &'static str,
    },

    /// An identifier other than `true`, `false`, `inf` or `nan` in value
    /// position.
    UnexpectedIdentifier,

    /// A character that cannot start any token.
    IllegalCharacter(char),

    /// A string with no closing quote.
    UnterminatedString,

    /// An invalid character was found in a string.
    InvalidCharInString(char),

    /// An invalid character was found as an escape.
    InvalidEscape(char),

    /// An invalid character was found in a hex escape.
    InvalidHexEscape(char),

    /// A hex escape that is not a Unicode scalar value.
    InvalidEscapeValue(u32),

    /// A number failed to parse.
    InvalidNumber,

    /// An integer does not fit in an `i64`.
    IntegerOutOfRange,

    /// A key was assigned twice in the same table.
    DuplicateKey {
        /// The duplicate key
        key: String,
        /// The span where the first key is located
        first: Span,
    },

    /// A dotted key or header path went through a value that is not a table.
    DottedKeyInvalidType {
        /// The path segment naming the non-table value
        key: String,
        /// The span where the non-table value was defined
        first: Span,
    },

    /// Syntax this parser deliberately does not implement.
    Unsupported(&'static str),

    /// Tables or arrays nested beyond [`MAX_NESTING`](crate::MAX_NESTING),
    /// whether through brackets, braces or key segments.
    NestingTooDeep,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::UnexpectedEof => "unexpected-eof",
            Self::FileTooLarge => "file-too-large",
            Self::InvalidUtf8 => "invalid-utf8",
            Self::Wanted { .. } => "wanted",
            Self::UnexpectedIdentifier => "unexpected-identifier",
            Self::IllegalCharacter(..) => "illegal-character",
            Self::UnterminatedString => "unterminated-string",
            Self::InvalidCharInString(..) => "invalid-char-in-string",
            Self::InvalidEscape(..) => "invalid-escape",
            Self::InvalidHexEscape(..) => "invalid-hex-escape",
            Self::InvalidEscapeValue(..) => "invalid-escape-value",
            Self::InvalidNumber => "invalid-number",
            Self::IntegerOutOfRange => "integer-out-of-range",
            Self::DuplicateKey { .. } => "duplicate-key",
            Self::DottedKeyInvalidType { .. } => "dotted-key-invalid-type",
            Self::Unsupported(..) => "unsupported",
            Self::NestingTooDeep => "nesting-too-deep",
        };
        f.write_str(text)
    }
}

impl Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

struct Escape(char);

impl fmt::Display for Escape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use std::fmt::Write as _;

        if self.0.is_whitespace() || self.0.is_control() {
            for esc in self.0.escape_default() {
                f.write_char(esc)?;
            }
            Ok(())
        } else {
            f.write_char(self.0)
        }
    }
}

/// Human readable message of an [`ErrorKind`], without location.
pub(crate) struct Message<'a>(pub &'a ErrorKind);

impl Display for Message<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            ErrorKind::UnexpectedEof => f.write_str("unexpected EOF"),
            ErrorKind::FileTooLarge => f.write_str("input is too large (maximum 4GiB)"),
            ErrorKind::InvalidUtf8 => f.write_str("invalid UTF-8"),
            ErrorKind::Wanted { expected, found } => {
                f.write_str("expected ")?;
                f.write_str(expected)?;
                f.write_str(", found ")?;
                f.write_str(found)
            }
            ErrorKind::UnexpectedIdentifier => f.write_str("unexpected identifier"),
            ErrorKind::IllegalCharacter(c) => {
                f.write_str("illegal character `")?;
                Escape(*c).fmt(f)?;
                f.write_str("`")
            }
            ErrorKind::UnterminatedString => f.write_str("unterminated string"),
            ErrorKind::InvalidCharInString(c) => {
                f.write_str("invalid character in string: `")?;
                Escape(*c).fmt(f)?;
                f.write_str("`")
            }
            ErrorKind::InvalidEscape(c) => {
                f.write_str("invalid escape character in string: `")?;
                Escape(*c).fmt(f)?;
                f.write_str("`")
            }
            ErrorKind::InvalidHexEscape(c) => {
                f.write_str("invalid hex escape character in string: `")?;
                Escape(*c).fmt(f)?;
                f.write_str("`")
            }
            ErrorKind::InvalidEscapeValue(v) => write!(f, "invalid escape value: `{v:#x}`"),
            ErrorKind::InvalidNumber => f.write_str("invalid number"),
            ErrorKind::IntegerOutOfRange => f.write_str("integer out of range"),
            ErrorKind::DuplicateKey { key, .. } => {
                f.write_str("cannot redefine key '")?;
                f.write_str(key)?;
                f.write_str("'")
            }
            ErrorKind::DottedKeyInvalidType { key, .. } => {
                f.write_str("expected key '")?;
                f.write_str(key)?;
                f.write_str("' to refer to a table")
            }
            ErrorKind::Unsupported(feature) => {
                f.write_str(feature)?;
                f.write_str(" are not supported")
            }
            ErrorKind::NestingTooDeep => f.write_str("tables or arrays are nested too deeply"),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some((line, column)) = self.line_info {
            write!(f, "{line}:{column}: ")?;
        }
        Message(&self.kind).fmt(f)
    }
}

impl Error {
    /// Writes the rendered error into `buf`, silently truncating it to the
    /// buffer's capacity, and returns the written text.
    ///
    /// Truncation never splits a UTF-8 sequence.
    pub fn write_to<'b>(&self, buf: &'b mut [u8]) -> &'b str {
        match self.line_info {
            Some((line, column)) => {
                crate::report::write_diagnostic(buf, line, column, Message(&self.kind))
            }
            None => crate::report::write_bounded(buf, Message(&self.kind)),
        }
    }
}

#[cfg(feature = "reporting")]
#[cfg_attr(docsrs, doc(cfg(feature = "reporting")))]
impl Error {
    /// Converts this [`Error`] into a [`codespan_reporting::diagnostic::Diagnostic`]
    pub fn to_diagnostic<FileId: Copy + PartialEq>(
        &self,
        fid: FileId,
    ) -> codespan_reporting::diagnostic::Diagnostic<FileId> {
        use codespan_reporting::diagnostic::{Diagnostic, Label};

        let diag = Diagnostic::error()
            .with_code(self.kind.to_string())
            .with_message(Message(&self.kind).to_string());
        let primary = Label::primary(fid, self.span);

        match &self.kind {
            ErrorKind::DuplicateKey { first, .. } => diag.with_labels(vec![
                Label::secondary(fid, *first).with_message("first key instance"),
                primary.with_message("duplicate key"),
            ]),
            ErrorKind::DottedKeyInvalidType { first, .. } => diag.with_labels(vec![
                primary.with_message("attempted to extend table here"),
                Label::secondary(fid, *first).with_message("non-table"),
            ]),
            ErrorKind::Wanted { expected, .. } => {
                diag.with_labels(vec![primary.with_message(format!("expected {expected}"))])
            }
            ErrorKind::UnterminatedString => diag.with_labels(vec![
                primary.with_message("eof reached before string terminator"),
            ]),
            ErrorKind::UnexpectedEof => {
                diag.with_labels(vec![primary.with_message("input ends here")])
            }
            ErrorKind::Unsupported(_) => {
                diag.with_labels(vec![primary.with_message("unsupported syntax")])
            }
            _ => diag.with_labels(vec![primary]),
        }
    }
}

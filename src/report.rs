//! Source locations and bounded diagnostic formatting.

#[cfg(test)]
#[path = "./report_tests.rs"]
mod tests;

use crate::cursor::Cursor;
use std::fmt::{self, Display, Write as _};

/// Computes the 1-based line and column of the byte `offset` in `input`.
///
/// Lines are broken by `\n`; a `\r\n` pair counts as a single break. The
/// column counts code points since the start of the line. Offsets past the
/// end of `input` are clamped to its end.
pub fn locate(input: &str, offset: usize) -> (usize, usize) {
    let mut cursor = Cursor::new(input);
    let mut line = 1;
    let mut line_start = 0;
    while cursor.byte_offset() < offset && !cursor.is_eof() {
        if cursor.next() == Some('\n') {
            line += 1;
            line_start = cursor.char_offset();
        }
    }
    (line, cursor.char_offset() - line_start + 1)
}

/// Writes `"<line>:<col>: <message>"` into `buf` and returns the written text.
///
/// Output that does not fit is dropped; this never fails.
pub fn write_diagnostic<'b>(
    buf: &'b mut [u8],
    line: usize,
    column: usize,
    message: impl Display,
) -> &'b str {
    write_bounded(buf, format_args!("{line}:{column}: {message}"))
}

/// Writes `message` into `buf`, truncating on a character boundary.
pub(crate) fn write_bounded<'b>(buf: &'b mut [u8], message: impl Display) -> &'b str {
    let len = {
        let mut out = Bounded {
            buf: &mut *buf,
            len: 0,
            full: false,
        };
        // Bounded never reports an error; a Display impl that does simply
        // leaves a shorter message.
        let _ = write!(out, "{message}");
        out.len
    };
    let written: &'b [u8] = buf;
    std::str::from_utf8(&written[..len]).unwrap_or_default()
}

struct Bounded<'b> {
    buf: &'b mut [u8],
    len: usize,
    full: bool,
}

impl fmt::Write for Bounded<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.full {
            return Ok(());
        }
        let room = self.buf.len() - self.len;
        let take = if s.len() <= room {
            s.len()
        } else {
            self.full = true;
            let mut at = room;
            while !s.is_char_boundary(at) {
                at -= 1;
            }
            at
        };
        self.buf[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;
        Ok(())
    }
}

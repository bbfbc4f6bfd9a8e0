//! Code-point cursor over a UTF-8 document.

#[cfg(test)]
#[path = "./cursor_tests.rs"]
mod tests;

/// Saved cursor position, restored with [`Cursor::restore`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Checkpoint {
    byte_offset: usize,
    char_offset: usize,
}

/// Steps through the input one code point at a time.
///
/// Tracks both the byte offset (for spans) and the code-point offset. The
/// last step can be undone with [`retreat`](Cursor::retreat); there is no
/// deeper history.
#[derive(Clone)]
pub(crate) struct Cursor<'a> {
    input: &'a str,
    byte_offset: usize,
    char_offset: usize,
    /// Width in bytes of the last decoded code point, 0 once retreated.
    last_width: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            byte_offset: 0,
            char_offset: 0,
            last_width: 0,
        }
    }

    #[inline]
    pub fn input(&self) -> &'a str {
        self.input
    }

    #[inline]
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    #[inline]
    pub fn char_offset(&self) -> usize {
        self.char_offset
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.byte_offset >= self.input.len()
    }

    /// Decodes the next code point and steps past it.
    #[inline]
    pub fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        let width = ch.len_utf8();
        self.byte_offset += width;
        self.char_offset += 1;
        self.last_width = width;
        Some(ch)
    }

    /// Returns the next code point without stepping past it.
    #[inline]
    pub fn peek(&self) -> Option<char> {
        let rest = self.input.get(self.byte_offset..)?;
        let &first = rest.as_bytes().first()?;
        if first < 0x80 {
            Some(first as char)
        } else {
            rest.chars().next()
        }
    }

    /// Steps past the next code point if it equals `ch`.
    #[inline]
    pub fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.next();
            true
        } else {
            false
        }
    }

    /// Undoes the most recent [`next`](Self::next).
    ///
    /// Calling this twice without an intervening `next` is a bug in the
    /// caller.
    #[inline]
    pub fn retreat(&mut self) {
        debug_assert!(self.last_width != 0, "retreat without a preceding next");
        if self.last_width == 0 {
            return;
        }
        self.byte_offset -= self.last_width;
        self.char_offset -= 1;
        self.last_width = 0;
    }

    #[inline]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            byte_offset: self.byte_offset,
            char_offset: self.char_offset,
        }
    }

    #[inline]
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.byte_offset = checkpoint.byte_offset;
        self.char_offset = checkpoint.char_offset;
        self.last_width = 0;
    }
}

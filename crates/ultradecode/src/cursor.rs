//! Read position over the input buffer.
//!
//! The decoder scans as if the input were terminated by a NUL byte: reading at
//! or past the end yields `0`, and an embedded `0x00` stops every scan loop the
//! same way. Unlike a raw pointer walk, the cursor never leaves the slice.

pub(crate) const NUL: u8 = 0;

#[derive(Debug, Clone)]
pub(crate) struct Cursor<'src> {
    input: &'src [u8],
    pos: usize,
}

impl<'src> Cursor<'src> {
    pub fn new(input: &'src [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Current offset from the start of the input.
    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.input.len()
    }

    /// Bytes left between the cursor and the end of the input.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.peek() == NUL
    }

    #[inline]
    pub fn peek(&self) -> u8 {
        self.peek_at(0)
    }

    #[inline]
    pub fn peek_at(&self, ahead: usize) -> u8 {
        self.input.get(self.pos + ahead).copied().unwrap_or(NUL)
    }

    /// Consumes and returns the next byte. At the end of the input this
    /// returns `NUL` without moving.
    #[inline]
    pub fn bump(&mut self) -> u8 {
        let b = self.peek();
        self.advance();
        b
    }

    #[inline]
    pub fn advance(&mut self) {
        if self.pos < self.input.len() {
            self.pos += 1;
        }
    }

    /// Steps back over the byte just consumed.
    #[inline]
    pub fn rewind(&mut self) {
        debug_assert!(self.pos > 0, "rewind at start of input");
        self.pos = self.pos.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_nul_past_end_without_moving() {
        let mut c = Cursor::new(b"ab");
        assert_eq!(c.bump(), b'a');
        assert_eq!(c.bump(), b'b');
        assert_eq!(c.offset(), 2);
        assert_eq!(c.bump(), NUL);
        assert_eq!(c.bump(), NUL);
        assert_eq!(c.offset(), 2);
        assert!(c.is_at_end());
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn embedded_nul_acts_as_terminator() {
        let mut c = Cursor::new(b"a\0b");
        c.advance();
        assert!(c.is_at_end());
        assert_eq!(c.peek_at(1), b'b');
        assert_eq!(c.remaining(), 2);
    }

    #[test]
    fn rewind_steps_back_one() {
        let mut c = Cursor::new(b"-1");
        c.bump();
        c.rewind();
        assert_eq!(c.offset(), 0);
        assert_eq!(c.peek(), b'-');
    }
}

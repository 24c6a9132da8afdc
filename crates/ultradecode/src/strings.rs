//! String literal decoding into the scratch buffer.
use crate::{
    builder::{Builder, ScratchAllocator},
    cursor::NUL,
    decoder::{State, TokenKind},
    error::{DecodeError, ErrorKind},
    escape_buffer::UnicodeEscapeBuffer,
};

/// Maps the byte after a backslash to the byte it stands for. Zero marks an
/// unrecognized escape.
static UNESCAPE: [u8; 256] = build_unescape_table();

const fn build_unescape_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    table[b'\\' as usize] = b'\\';
    table[b'"' as usize] = b'"';
    table[b'/' as usize] = b'/';
    table[b'b' as usize] = 0x08;
    table[b'f' as usize] = 0x0C;
    table[b'n' as usize] = b'\n';
    table[b'r' as usize] = b'\r';
    table[b't' as usize] = b'\t';
    table
}

const HIGH_SURROGATES: core::ops::RangeInclusive<u16> = 0xD800..=0xDBFF;
const LOW_SURROGATES: core::ops::RangeInclusive<u16> = 0xDC00..=0xDFFF;

impl<B: Builder, A: ScratchAllocator + ?Sized> State<'_, '_, B, A> {
    /// Decodes a string. The dispatcher has already consumed the opening
    /// quote.
    pub(crate) fn decode_string(&mut self) -> Result<B::Value, DecodeError> {
        self.last_kind = TokenKind::Invalid;

        // An unescaped string is never longer than the raw input left.
        self.scratch.reserve(self.cursor.remaining(), &mut *self.allocator);

        let mut written = 0;
        loop {
            let offset = self.cursor.offset();
            let out = match self.cursor.bump() {
                NUL => return Err(DecodeError::new(offset, ErrorKind::UnterminatedString)),
                b'"' => break,
                b'\\' => match self.cursor.bump() {
                    NUL => return Err(DecodeError::new(offset, ErrorKind::UnterminatedEscape)),
                    b'u' if self.options.decode_unicode_escapes => {
                        written += self.decode_unicode_escape(offset, written)?;
                        continue;
                    }
                    escape => match UNESCAPE[usize::from(escape)] {
                        0 => {
                            return Err(DecodeError::new(
                                offset + 1,
                                ErrorKind::UnrecognizedEscape,
                            ));
                        }
                        unescaped => unescaped,
                    },
                },
                b => b,
            };
            self.scratch.as_mut_slice()[written] = out;
            written += 1;
        }

        self.last_kind = TokenKind::String;
        Ok(self.builder.new_string(&self.scratch.as_slice()[..written]))
    }

    /// Decodes the rest of a `\u` escape starting at `escape_offset`, writes
    /// its UTF-8 encoding at `written`, and returns the number of bytes
    /// written.
    fn decode_unicode_escape(
        &mut self,
        escape_offset: usize,
        written: usize,
    ) -> Result<usize, DecodeError> {
        let unit = self.read_code_unit()?;
        let scalar = if HIGH_SURROGATES.contains(&unit) {
            if self.cursor.peek() != b'\\' || self.cursor.peek_at(1) != b'u' {
                return Err(DecodeError::new(escape_offset, ErrorKind::InvalidSurrogate));
            }
            self.cursor.advance();
            self.cursor.advance();
            let low = self.read_code_unit()?;
            if !LOW_SURROGATES.contains(&low) {
                return Err(DecodeError::new(escape_offset, ErrorKind::InvalidSurrogate));
            }
            0x1_0000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00)
        } else {
            u32::from(unit)
        };

        // Lone low surrogates are rejected here.
        let ch = char::from_u32(scalar)
            .ok_or(DecodeError::new(escape_offset, ErrorKind::InvalidSurrogate))?;
        let len = ch.len_utf8();
        ch.encode_utf8(&mut self.scratch.as_mut_slice()[written..written + len]);
        Ok(len)
    }

    fn read_code_unit(&mut self) -> Result<u16, DecodeError> {
        let mut buf = UnicodeEscapeBuffer::new();
        loop {
            let offset = self.cursor.offset();
            let b = self.cursor.peek();
            if b == NUL {
                return Err(DecodeError::new(offset, ErrorKind::UnterminatedEscape));
            }
            let unit = buf.feed(b).map_err(|kind| DecodeError::new(offset, kind))?;
            self.cursor.advance();
            if let Some(unit) = unit {
                return Ok(unit);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_exactly_the_json_escapes() {
        let recognized: alloc::vec::Vec<u8> = (0u8..=255)
            .filter(|&b| UNESCAPE[usize::from(b)] != 0)
            .collect();
        assert_eq!(recognized, b"\"/\\bfnrt");
        assert_eq!(UNESCAPE[usize::from(b'b')], 0x08);
        assert_eq!(UNESCAPE[usize::from(b'f')], 0x0C);
        assert_eq!(UNESCAPE[usize::from(b'u')], 0);
    }
}

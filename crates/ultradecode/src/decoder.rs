//! The recursive-descent decoder.
//!
//! [`Decoder::decode`] builds a fresh [`State`] over the input and runs the
//! value dispatcher once. The dispatcher classifies the next significant byte
//! and hands the state to the matching literal, number, string, array or
//! object parser, each of which calls back into the [`Builder`] to
//! materialize what it found.
//!
//! # Examples
//!
//! ```rust
//! use ultradecode::{Decoder, Value, ValueBuilder};
//!
//! let mut decoder = Decoder::new(ValueBuilder);
//! let value = decoder.decode(br#"{"key": [null, true, 3.25]}"#).unwrap();
//! assert_eq!(
//!     value.unwrap().to_string(),
//!     r#"{"key":[null,true,3.25]}"#
//! );
//!
//! // A lone closing bracket is "no value", not an error.
//! assert_eq!(decoder.decode(b"]").unwrap(), None);
//! ```
use alloc::vec::Vec;

use crate::{
    builder::{Builder, GlobalScratch, ScratchAllocator},
    cursor::{Cursor, NUL},
    error::{DecodeError, ErrorKind},
    options::DecoderOptions,
    scratch::{INLINE_SCRATCH_CAPACITY, Scratch},
};

/// Classification of the most recently decoded value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Nothing was decoded, or the last parser failed.
    #[default]
    Invalid,
    /// An integer literal.
    Integer,
    /// A literal with a fraction or exponent.
    Double,
    /// `true`.
    True,
    /// `false`.
    False,
    /// `null`.
    Null,
    /// A string.
    String,
    /// An array.
    Array,
    /// An object.
    Object,
}

/// What the dispatcher found where a value could start.
pub(crate) enum Slot<V> {
    /// A value, and the offset of its first byte.
    Value { value: V, offset: usize },
    /// A `}`, `]` or unrecognized byte, already consumed.
    Closed,
    /// The end of the input.
    End,
}

/// Per-call decoding state. Never shared between decode calls.
pub(crate) struct State<'src, 'd, B, A: ?Sized> {
    pub(crate) cursor: Cursor<'src>,
    pub(crate) scratch: Scratch<'d>,
    pub(crate) builder: &'d mut B,
    pub(crate) allocator: &'d mut A,
    pub(crate) options: DecoderOptions,
    pub(crate) last_kind: TokenKind,
    depth: usize,
}

impl<B: Builder, A: ScratchAllocator + ?Sized> State<'_, '_, B, A> {
    /// Skips whitespace and commas, then decodes whatever value starts at the
    /// next byte.
    pub(crate) fn decode_any(&mut self) -> Result<Slot<B::Value>, DecodeError> {
        self.last_kind = TokenKind::Invalid;

        loop {
            let offset = self.cursor.offset();
            let value = match self.cursor.peek() {
                NUL => return Ok(Slot::End),
                // Separators are not checked against their context.
                b' ' | b'\t' | b'\r' | b'\n' | b',' => {
                    self.cursor.advance();
                    continue;
                }
                b => {
                    self.cursor.advance();
                    match b {
                        b'"' => self.decode_string()?,
                        b'0'..=b'9' | b'-' => self.decode_numeric(),
                        b'[' => self.decode_array()?,
                        b'{' => self.decode_object()?,
                        b't' => self.decode_true()?,
                        b'f' => self.decode_false()?,
                        b'n' => self.decode_null()?,
                        _ => return Ok(Slot::Closed),
                    }
                }
            };
            return Ok(Slot::Value { value, offset });
        }
    }

    fn decode_array(&mut self) -> Result<B::Value, DecodeError> {
        self.enter()?;
        let mut array = self.builder.new_array();
        self.last_kind = TokenKind::Invalid;

        while !self.cursor.is_at_end() {
            match self.decode_any()? {
                Slot::Value { value, .. } => self.builder.array_append(&mut array, value),
                Slot::Closed => {
                    self.leave();
                    self.last_kind = TokenKind::Array;
                    return Ok(array);
                }
                Slot::End => break,
            }
        }

        Err(self.error(ErrorKind::UnmatchedArrayClose))
    }

    fn decode_object(&mut self) -> Result<B::Value, DecodeError> {
        self.enter()?;
        let mut object = self.builder.new_object();
        self.last_kind = TokenKind::Invalid;

        while !self.cursor.is_at_end() {
            let key = match self.decode_any()? {
                Slot::Value { value, offset } => {
                    if self.last_kind != TokenKind::String {
                        return Err(DecodeError::new(offset, ErrorKind::ObjectKeyNotString));
                    }
                    value
                }
                Slot::Closed => {
                    self.leave();
                    self.last_kind = TokenKind::Object;
                    return Ok(object);
                }
                Slot::End => break,
            };

            self.expect_colon()?;

            match self.decode_any()? {
                Slot::Value { value, .. } => self.builder.object_insert(&mut object, key, value),
                Slot::Closed => {
                    return Err(DecodeError::new(
                        self.cursor.offset() - 1,
                        ErrorKind::MissingValue,
                    ));
                }
                Slot::End => return Err(self.error(ErrorKind::MissingValue)),
            }
        }

        Err(self.error(ErrorKind::UnmatchedObjectClose))
    }

    fn expect_colon(&mut self) -> Result<(), DecodeError> {
        loop {
            match self.cursor.peek() {
                b' ' | b'\t' | b'\r' | b'\n' => self.cursor.advance(),
                b':' => {
                    self.cursor.advance();
                    return Ok(());
                }
                _ => return Err(self.error(ErrorKind::MissingColon)),
            }
        }
    }

    fn decode_true(&mut self) -> Result<B::Value, DecodeError> {
        self.last_kind = TokenKind::Invalid;
        self.expect_keyword(b"rue", ErrorKind::TrueLiteralMismatch)?;
        self.last_kind = TokenKind::True;
        Ok(self.builder.new_true())
    }

    fn decode_false(&mut self) -> Result<B::Value, DecodeError> {
        self.last_kind = TokenKind::Invalid;
        self.expect_keyword(b"alse", ErrorKind::FalseLiteralMismatch)?;
        self.last_kind = TokenKind::False;
        Ok(self.builder.new_false())
    }

    fn decode_null(&mut self) -> Result<B::Value, DecodeError> {
        self.last_kind = TokenKind::Invalid;
        self.expect_keyword(b"ull", ErrorKind::NullLiteralMismatch)?;
        self.last_kind = TokenKind::Null;
        Ok(self.builder.new_null())
    }

    fn expect_keyword(&mut self, tail: &[u8], kind: ErrorKind) -> Result<(), DecodeError> {
        for &expected in tail {
            if self.cursor.peek() != expected {
                return Err(self.error(kind));
            }
            self.cursor.advance();
        }
        Ok(())
    }

    /// Called with the opening bracket already consumed.
    fn enter(&mut self) -> Result<(), DecodeError> {
        self.depth += 1;
        match self.options.max_depth {
            Some(max) if self.depth > max => Err(DecodeError::new(
                self.cursor.offset() - 1,
                ErrorKind::DepthLimitExceeded,
            )),
            _ => Ok(()),
        }
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn error(&self, kind: ErrorKind) -> DecodeError {
        DecodeError::new(self.cursor.offset(), kind)
    }
}

/// Decodes JSON text through a [`Builder`].
///
/// A decoder owns its builder, its scratch allocator, and an inline scratch
/// region that every decode call starts from. The region grows to fit the
/// largest input seen, up to [`INLINE_SCRATCH_CAPACITY`]; longer strings go
/// through the allocator. A decoder can be reused for any number of
/// documents; each [`Decoder::decode`] call is independent.
#[derive(Debug)]
pub struct Decoder<B, A = GlobalScratch> {
    builder: B,
    allocator: A,
    options: DecoderOptions,
    inline: Vec<u8>,
    inline_capacity: usize,
    last_kind: TokenKind,
}

impl<B: Builder> Decoder<B> {
    /// Creates a decoder with default options and the global allocator.
    #[must_use]
    pub fn new(builder: B) -> Self {
        Self::with_options(builder, DecoderOptions::default())
    }

    /// Creates a decoder with the given options and the global allocator.
    #[must_use]
    pub fn with_options(builder: B, options: DecoderOptions) -> Self {
        Self::with_allocator(builder, GlobalScratch, options)
    }
}

impl<B: Builder, A: ScratchAllocator> Decoder<B, A> {
    /// Creates a decoder that grows its string scratch through `allocator`.
    #[must_use]
    pub fn with_allocator(builder: B, allocator: A, options: DecoderOptions) -> Self {
        Self::with_inline_capacity(builder, allocator, options, INLINE_SCRATCH_CAPACITY)
    }

    /// Like [`Decoder::with_allocator`], with an inline scratch region of
    /// `inline_capacity` bytes so small inputs exercise heap growth.
    #[cfg(feature = "fuzzing")]
    #[doc(hidden)]
    #[must_use]
    pub fn with_small_scratch(
        builder: B,
        allocator: A,
        options: DecoderOptions,
        inline_capacity: usize,
    ) -> Self {
        Self::with_inline_capacity(builder, allocator, options, inline_capacity)
    }

    pub(crate) fn with_inline_capacity(
        builder: B,
        allocator: A,
        options: DecoderOptions,
        inline_capacity: usize,
    ) -> Self {
        Self {
            builder,
            allocator,
            options,
            inline: Vec::new(),
            inline_capacity,
            last_kind: TokenKind::Invalid,
        }
    }

    /// Decodes one value from the start of `input`.
    ///
    /// Decoding stops at the end of `input` or at the first NUL byte,
    /// whichever comes first. Bytes after the first complete value are not
    /// examined.
    ///
    /// Returns `Ok(None)` when no value starts where one was expected, for
    /// example when the input is empty, whitespace, a lone `]` or `}`, or
    /// begins with a byte that cannot start a value. In that case no error is
    /// recorded.
    ///
    /// # Errors
    ///
    /// Returns the first [`DecodeError`] encountered. Values the builder
    /// constructed before the failure are dropped.
    pub fn decode(&mut self, input: &[u8]) -> Result<Option<B::Value>, DecodeError> {
        // No string can be longer than the input.
        let wanted = input.len().min(self.inline_capacity);
        if self.inline.len() < wanted {
            self.inline.resize(wanted, 0);
        }

        let mut state = State {
            cursor: Cursor::new(input),
            scratch: Scratch::new(&mut self.inline),
            builder: &mut self.builder,
            allocator: &mut self.allocator,
            options: self.options,
            last_kind: TokenKind::Invalid,
            depth: 0,
        };

        let result = state.decode_any();

        let State {
            cursor,
            scratch,
            allocator,
            last_kind,
            ..
        } = state;
        scratch.release(allocator);
        self.last_kind = last_kind;

        match result {
            Ok(Slot::Value { value, .. }) => {
                tracing::trace!(consumed = cursor.offset(), kind = ?last_kind, "decoded value");
                Ok(Some(value))
            }
            Ok(Slot::Closed | Slot::End) => {
                tracing::trace!(consumed = cursor.offset(), "no value in input");
                Ok(None)
            }
            Err(err) => {
                self.last_kind = TokenKind::Invalid;
                tracing::debug!(offset = err.offset, kind = ?err.kind, len = cursor.len(), "decode failed");
                Err(err)
            }
        }
    }

    /// Kind of the value produced by the most recent decode call, or
    /// [`TokenKind::Invalid`] if it produced none.
    #[must_use]
    pub fn last_kind(&self) -> TokenKind {
        self.last_kind
    }

    /// The options this decoder was created with.
    #[must_use]
    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// The builder values are constructed through.
    #[must_use]
    pub fn builder(&self) -> &B {
        &self.builder
    }

    /// Mutable access to the builder, e.g. to reset an arena between
    /// documents.
    pub fn builder_mut(&mut self) -> &mut B {
        &mut self.builder
    }

    /// Consumes the decoder, returning its builder and allocator.
    #[must_use]
    pub fn into_parts(self) -> (B, A) {
        (self.builder, self.allocator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ValueBuilder;

    #[test]
    fn inline_region_grows_with_input() {
        let mut decoder = Decoder::new(ValueBuilder);
        assert!(decoder.inline.is_empty());

        decoder.decode(b"1").unwrap();
        assert_eq!(decoder.inline.len(), 1);

        decoder.decode(br#"["abc", "def"]"#).unwrap();
        assert_eq!(decoder.inline.len(), 14);

        // never shrinks
        decoder.decode(b"2").unwrap();
        assert_eq!(decoder.inline.len(), 14);
    }

    #[test]
    fn inline_region_is_capped() {
        let mut input = alloc::string::String::from("\"");
        input.push_str(&"a".repeat(INLINE_SCRATCH_CAPACITY * 2));
        input.push('"');

        let mut decoder = Decoder::new(ValueBuilder);
        decoder.decode(input.as_bytes()).unwrap();
        assert_eq!(decoder.inline.len(), INLINE_SCRATCH_CAPACITY);
    }
}

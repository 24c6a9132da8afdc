//! A single-pass JSON decoder that builds caller-defined values.
//!
//! The decoder walks a byte buffer once, recursively, and materializes every
//! value it finds through a [`Builder`]. [`ValueBuilder`] produces the bundled
//! [`Value`] type; implement [`Builder`] to decode straight into your own
//! representation.
//!
//! ```rust
//! use ultradecode::Value;
//!
//! let value = ultradecode::decode(br#"{"a": [1, 2.5, "x\ty"]}"#).unwrap();
//! assert_eq!(value.get("a").unwrap().to_string(), r#"[1,2.5,"x\ty"]"#);
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod builder;
mod cursor;
mod decoder;
mod error;
mod escape_buffer;
mod numbers;
mod options;
mod scratch;
mod strings;
mod value;


pub use builder::{Builder, GlobalScratch, PooledScratch, ScratchAllocator, ValueBuilder};
pub use decoder::{Decoder, TokenKind};
pub use error::{DecodeError, ErrorKind};
pub use options::{DEFAULT_MAX_DEPTH, DecoderOptions, IntegerOverflow};
pub use scratch::INLINE_SCRATCH_CAPACITY;
pub use value::{Array, Map, Value};

/// Decodes `input` into a [`Value`] with default options.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the input is malformed, or one of kind
/// [`ErrorKind::NoValue`] if no value starts at the beginning of the input.
pub fn decode(input: &[u8]) -> Result<Value, DecodeError> {
    decode_with_options(input, DecoderOptions::default())
}

/// Decodes `input` into a [`Value`].
///
/// # Errors
///
/// See [`decode`].
pub fn decode_with_options(input: &[u8], options: DecoderOptions) -> Result<Value, DecodeError> {
    let mut decoder = Decoder::with_options(ValueBuilder, options);
    decoder.decode(input)?.ok_or_else(|| DecodeError {
        offset: 0,
        kind: ErrorKind::NoValue,
    })
}

/// Nesting depth allowed by [`DecoderOptions::default`].
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Configuration options for the decoder.
///
/// # Examples
///
/// ```rust
/// use ultradecode::{DecoderOptions, IntegerOverflow};
///
/// let options = DecoderOptions {
///     decode_unicode_escapes: true,
///     integer_overflow: IntegerOverflow::Promote,
///     ..Default::default()
/// };
/// let value = ultradecode::decode_with_options(br#""\u00e9""#, options).unwrap();
/// assert_eq!(value.as_str(), Some("é"));
/// ```
///
/// # Default
///
/// Unicode escapes are rejected, integers wrap, and nesting is limited to
/// [`DEFAULT_MAX_DEPTH`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Whether to decode `\uXXXX` escapes (including surrogate pairs) into
    /// UTF-8.
    ///
    /// When `false`, `\u` is reported as
    /// [`ErrorKind::UnrecognizedEscape`](crate::ErrorKind::UnrecognizedEscape).
    ///
    /// # Default
    ///
    /// `false`
    pub decode_unicode_escapes: bool,

    /// How integer literals that do not fit in an `i64` are handled.
    ///
    /// # Default
    ///
    /// [`IntegerOverflow::Wrap`]
    pub integer_overflow: IntegerOverflow,

    /// Maximum nesting depth of arrays and objects, or `None` for no limit.
    ///
    /// Without a limit, deeply nested input is bounded only by the call stack.
    ///
    /// # Default
    ///
    /// `Some(DEFAULT_MAX_DEPTH)`
    pub max_depth: Option<usize>,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            decode_unicode_escapes: false,
            integer_overflow: IntegerOverflow::default(),
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}

/// Integer overflow policy for the numeric parser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IntegerOverflow {
    /// Accumulate digits with two's-complement wrapping.
    ///
    /// A literal whose accumulator wraps negative keeps that sign instead of
    /// being negated again, so `-9223372036854775808` decodes to `i64::MIN`.
    /// Other out-of-range literals decode to wrapped values.
    #[default]
    Wrap,
    /// Detect overflow and emit literals that do not fit an `i64` as doubles.
    Promote,
}

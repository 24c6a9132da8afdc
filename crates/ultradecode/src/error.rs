use thiserror::Error;

/// A decode failure: what went wrong and where.
///
/// `offset` is measured in bytes from the start of the input buffer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("{kind} at offset {offset}")]
pub struct DecodeError {
    /// Byte offset of the failure, relative to the start of the input.
    pub offset: usize,
    /// The kind of failure.
    pub kind: ErrorKind,
}

impl DecodeError {
    pub(crate) fn new(offset: usize, kind: ErrorKind) -> Self {
        Self { offset, kind }
    }

    /// The static description of this error, without the offset.
    #[must_use]
    pub fn message(&self) -> &'static str {
        self.kind.message()
    }
}

/// Every way a decode call can fail. All of them are terminal.
///
/// Displays as [`ErrorKind::message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// A `t` was not followed by `rue`.
    TrueLiteralMismatch,
    /// An `f` was not followed by `alse`.
    FalseLiteralMismatch,
    /// An `n` was not followed by `ull`.
    NullLiteralMismatch,
    /// The input ended inside a string.
    UnterminatedString,
    /// The input ended right after a backslash.
    UnterminatedEscape,
    /// A backslash was followed by a byte with no escape meaning.
    UnrecognizedEscape,
    /// A `\u` escape did not carry four hex digits.
    InvalidUnicodeEscape,
    /// A `\u` escape produced an unpaired UTF-16 surrogate.
    InvalidSurrogate,
    /// An object key decoded to something other than a string.
    ObjectKeyNotString,
    /// An object key was not followed by `:`.
    MissingColon,
    /// An object key and `:` were not followed by a value.
    MissingValue,
    /// The input ended before the closing `}`.
    UnmatchedObjectClose,
    /// The input ended before the closing `]`.
    UnmatchedArrayClose,
    /// Arrays and objects were nested deeper than allowed.
    DepthLimitExceeded,
    /// The input held no value at all.
    NoValue,
}

impl ErrorKind {
    /// Returns the static description of this kind of failure.
    #[must_use]
    pub fn message(self) -> &'static str {
        use ErrorKind::*;
        match self {
            TrueLiteralMismatch => "unexpected character found when decoding 'true'",
            FalseLiteralMismatch => "unexpected character found when decoding 'false'",
            NullLiteralMismatch => "unexpected character found when decoding 'null'",
            UnterminatedString => "unmatched '\"' when decoding 'string'",
            UnterminatedEscape => "unterminated escape sequence when decoding 'string'",
            UnrecognizedEscape => "unrecognized escape sequence when decoding 'string'",
            InvalidUnicodeEscape => "invalid unicode escape sequence when decoding 'string'",
            InvalidSurrogate => "unpaired surrogate in unicode escape when decoding 'string'",
            ObjectKeyNotString => "key name of object must be 'string' when decoding 'object'",
            MissingColon => "no ':' found when decoding object value",
            MissingValue => "missing value after ':' when decoding 'object'",
            UnmatchedObjectClose => "unmatched '}' when decoding 'object'",
            UnmatchedArrayClose => "unmatched ']' when decoding 'array'",
            DepthLimitExceeded => "maximum nesting depth exceeded",
            NoValue => "no JSON value found",
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn display_matches_message() {
        use ErrorKind::*;
        for kind in [
            TrueLiteralMismatch,
            FalseLiteralMismatch,
            NullLiteralMismatch,
            UnterminatedString,
            UnterminatedEscape,
            UnrecognizedEscape,
            InvalidUnicodeEscape,
            InvalidSurrogate,
            ObjectKeyNotString,
            MissingColon,
            MissingValue,
            UnmatchedObjectClose,
            UnmatchedArrayClose,
            DepthLimitExceeded,
            NoValue,
        ] {
            assert_eq!(kind.to_string(), kind.message());
        }
        assert_eq!(
            UnmatchedObjectClose.to_string(),
            "unmatched '}' when decoding 'object'"
        );
    }

    #[test]
    fn error_display_includes_offset() {
        let err = DecodeError::new(7, ErrorKind::MissingColon);
        assert_eq!(err.to_string(), "no ':' found when decoding object value at offset 7");
        assert_eq!(err.message(), ErrorKind::MissingColon.message());
    }
}

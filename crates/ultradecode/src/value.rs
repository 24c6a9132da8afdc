//! JSON value types and utilities.
//!
//! This module defines the [`Value`] enum produced by
//! [`ValueBuilder`](crate::ValueBuilder), and its JSON rendering through
//! [`Display`](core::fmt::Display).
use alloc::{collections::BTreeMap, string::String, vec::Vec};
use core::fmt::Write as _;

/// Object members, ordered by key.
pub type Map = BTreeMap<String, Value>;
/// Array items.
pub type Array = Vec<Value>;

/// A decoded JSON value.
///
/// Numbers keep the integer/double distinction the decoder makes: literals
/// without a fraction or exponent are [`Integer`](Value::Integer).
///
/// # Examples
///
/// ```
/// use ultradecode::{Map, Value};
///
/// let mut map = Map::new();
/// map.insert("key".to_string(), Value::Integer(1));
/// let v = Value::Object(map);
/// assert_eq!(v.to_string(), r#"{"key":1}"#);
/// // Display output decodes back with default options.
/// assert_eq!(ultradecode::decode(v.to_string().as_bytes()).unwrap(), v);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// `null`.
    #[default]
    Null,
    /// `true` or `false`.
    Boolean(bool),
    /// A number literal without fraction or exponent.
    Integer(i64),
    /// A number literal with a fraction or exponent.
    Double(f64),
    /// A string.
    String(String),
    /// An array.
    Array(Array),
    /// An object.
    Object(Map),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl From<Array> for Value {
    fn from(v: Array) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Object(v)
    }
}

impl Value {
    /// Returns `true` if the value is [`Null`](Value::Null).
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the boolean, if this is a [`Boolean`](Value::Boolean).
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer, if this is an [`Integer`](Value::Integer).
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the number as a double, for both integers and doubles.
    ///
    /// # Examples
    ///
    /// ```
    /// use ultradecode::Value;
    ///
    /// assert_eq!(Value::Integer(2).as_f64(), Some(2.0));
    /// assert_eq!(Value::Double(0.5).as_f64(), Some(0.5));
    /// assert_eq!(Value::Null.as_f64(), None);
    /// ```
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(*n as f64),
            Self::Double(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string, if this is a [`String`](Value::String).
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the items, if this is an [`Array`](Value::Array).
    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns the members, if this is an [`Object`](Value::Object).
    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Self::Object(m) => Some(m),
            _ => None,
        }
    }

    /// Looks up `key` in an object.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object()?.get(key)
    }
}

/// Escapes a string for inclusion in a JSON string literal.
///
/// Quotes, backslashes and the control characters with a short escape use
/// that escape. Remaining characters below U+0020 are written as `\uXXXX`;
/// everything else is written as is.
pub(crate) fn write_escaped_string<W: core::fmt::Write>(src: &str, f: &mut W) -> core::fmt::Result {
    for c in src.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            '\u{8}' => f.write_str("\\b")?,
            '\u{c}' => f.write_str("\\f")?,
            c if u32::from(c) < 0x20 => write!(f, "\\u{:04X}", u32::from(c))?,
            _ => f.write_char(c)?,
        }
    }
    Ok(())
}

/// Renders compact JSON.
///
/// The output decodes back to an equal value, up to rounding of doubles, with
/// [`decode`](crate::decode), except for strings holding control characters below U+0020 other than
/// `\b`, `\f`, `\n`, `\r` and `\t`: those are written as `\uXXXX` and need
/// [`DecoderOptions::decode_unicode_escapes`](crate::DecoderOptions::decode_unicode_escapes).
/// Non-finite doubles render as `null`.
impl core::fmt::Display for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => f.write_str(if *b { "true" } else { "false" }),
            Value::Integer(n) => write!(f, "{n}"),
            // Debug formatting always keeps a '.' or an exponent, so the
            // text decodes back to a double.
            Value::Double(n) if n.is_finite() => write!(f, "{n:?}"),
            Value::Double(_) => f.write_str("null"),
            Value::String(s) => {
                f.write_char('"')?;
                write_escaped_string(s, f)?;
                f.write_char('"')
            }
            Value::Array(arr) => {
                f.write_str("[")?;
                let mut first = true;
                for v in arr {
                    if !first {
                        f.write_str(",")?;
                    }
                    first = false;
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
            Value::Object(map) => {
                f.write_str("{")?;
                let mut first = true;
                for (k, v) in map {
                    if !first {
                        f.write_str(",")?;
                    }
                    first = false;
                    f.write_char('"')?;
                    write_escaped_string(k, f)?;
                    write!(f, "\":{v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::{SerializeMap, SerializeSeq};

        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Integer(n) => serializer.serialize_i64(*n),
            Value::Double(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for v in arr {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
            Value::Object(map) => {
                let mut m = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    m.serialize_entry(k, v)?;
                }
                m.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::ToString, vec};

    use super::*;

    #[test]
    fn display_renders_compact_json() {
        let v = Value::Array(vec![
            Value::Null,
            Value::Boolean(true),
            Value::Integer(-3),
            Value::Double(1.0),
            Value::Double(2.5e-7),
            Value::String("a\"b\\c\nd\u{1}".into()),
            Value::Object([("k".to_string(), Value::Array(vec![]))].into()),
        ]);
        assert_eq!(
            v.to_string(),
            r#"[null,true,-3,1.0,2.5e-7,"a\"b\\c\nd\u0001",{"k":[]}]"#
        );
    }

    #[test]
    fn short_escapes_and_raw_non_ascii() {
        let v = Value::String("\r\u{8}\u{c}\u{7f}\u{85}\u{2028}é".into());
        assert_eq!(v.to_string(), "\"\\r\\b\\f\u{7f}\u{85}\u{2028}é\"");
        assert_eq!(crate::decode(v.to_string().as_bytes()), Ok(v));
    }

    #[test]
    fn non_finite_doubles_render_as_null() {
        assert_eq!(Value::Double(f64::NAN).to_string(), "null");
        assert_eq!(Value::Double(f64::INFINITY).to_string(), "null");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_like_display() {
        let v = Value::Object(
            [
                ("a".to_string(), Value::Array(vec![Value::Integer(1), Value::Double(0.5)])),
                ("b".to_string(), Value::String("x\ny".into())),
            ]
            .into(),
        );
        assert_eq!(serde_json::to_string(&v).unwrap(), v.to_string());
    }

    #[test]
    fn accessors() {
        let v = Value::Object([("n".to_string(), Value::Integer(4))].into());
        assert_eq!(v.get("n").and_then(Value::as_i64), Some(4));
        assert_eq!(v.get("n").and_then(Value::as_f64), Some(4.0));
        assert!(v.get("missing").is_none());
        assert!(Value::default().is_null());
        assert_eq!(Value::from("s").as_str(), Some("s"));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from(vec![Value::Null]).as_array().map(Vec::len), Some(1));
    }
}

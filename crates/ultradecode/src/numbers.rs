//! Numeric literal scanning and reconstruction.
//!
//! A literal is scanned in one pass over three phases (integer, fraction,
//! exponent), feeding a [`NumberAccumulator`]. The accumulator decides at the
//! end whether the literal is an integer or a double.
#![expect(clippy::cast_precision_loss)]
#![expect(clippy::cast_possible_truncation)]
#![expect(clippy::cast_sign_loss)]

use crate::{
    builder::{Builder, ScratchAllocator},
    decoder::{State, TokenKind},
    options::IntegerOverflow,
};

/// Fraction digits beyond this many are consumed but ignored.
const MAX_DECIMALS: usize = 10;

const POW10: [f64; MAX_DECIMALS + 1] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10,
];

// Past this, any non-zero mantissa overflows or underflows anyway.
const MAX_EXPONENT: f64 = 700.0;

// Exponents are applied in steps of at most this many powers of ten, so no
// intermediate factor leaves the finite range.
const EXPONENT_STEP: f64 = 300.0;
const EXPONENT_STEP_FACTOR: f64 = 1e300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Integer,
    Fraction,
    Exponent,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Number {
    Integer(i64),
    Double(f64),
}

#[derive(Debug, Clone)]
pub(crate) struct NumberAccumulator {
    negative: bool,
    wrapping: i64,
    magnitude: Option<u64>,
    wide: f64,
    fraction: f64,
    decimals: usize,
    exponent: f64,
    exponent_negative: bool,
    has_fraction: bool,
    has_exponent: bool,
}

impl NumberAccumulator {
    pub fn new(negative: bool) -> Self {
        Self {
            negative,
            wrapping: 0,
            magnitude: Some(0),
            wide: 0.0,
            fraction: 0.0,
            decimals: 0,
            exponent: 0.0,
            exponent_negative: false,
            has_fraction: false,
            has_exponent: false,
        }
    }

    pub fn push_integer_digit(&mut self, d: u8) {
        // unchecked on purpose: `IntegerOverflow::Wrap` relies on it
        self.wrapping = self.wrapping.wrapping_mul(10).wrapping_add(i64::from(d));
        self.magnitude = self
            .magnitude
            .and_then(|m| m.checked_mul(10)?.checked_add(u64::from(d)));
        self.wide = self.wide * 10.0 + f64::from(d);
    }

    pub fn start_fraction(&mut self) {
        self.has_fraction = true;
    }

    pub fn push_fraction_digit(&mut self, d: u8) {
        if self.decimals < MAX_DECIMALS {
            self.fraction = self.fraction * 10.0 + f64::from(d);
            self.decimals += 1;
        }
    }

    pub fn start_exponent(&mut self, negative: bool) {
        self.has_exponent = true;
        self.exponent_negative = negative;
    }

    pub fn push_exponent_digit(&mut self, d: u8) {
        self.exponent = self.exponent * 10.0 + f64::from(d);
    }

    pub fn finish(&self, policy: IntegerOverflow) -> Number {
        let is_double = self.has_fraction || self.has_exponent;
        match policy {
            IntegerOverflow::Wrap => {
                // An accumulator that wrapped negative already carries its sign.
                let negate = self.negative && self.wrapping >= 0;
                if !is_double {
                    return Number::Integer(if negate {
                        self.wrapping.wrapping_neg()
                    } else {
                        self.wrapping
                    });
                }
                let value = self.scale(self.wrapping as f64);
                Number::Double(if negate { -value } else { value })
            }
            IntegerOverflow::Promote => {
                if !is_double {
                    if let Some(n) = self.exact_integer() {
                        return Number::Integer(n);
                    }
                }
                let int = self.magnitude.map_or(self.wide, |m| m as f64);
                let value = self.scale(int);
                Number::Double(if self.negative { -value } else { value })
            }
        }
    }

    fn exact_integer(&self) -> Option<i64> {
        let m = self.magnitude?;
        if !self.negative {
            return i64::try_from(m).ok();
        }
        match i64::try_from(m) {
            Ok(n) => Some(-n),
            Err(_) if m == i64::MIN.unsigned_abs() => Some(i64::MIN),
            Err(_) => None,
        }
    }

    fn scale(&self, int: f64) -> f64 {
        let mut value = int + self.fraction / POW10[self.decimals];
        if !self.has_exponent || value == 0.0 {
            return value;
        }
        if self.exponent > MAX_EXPONENT {
            return if self.exponent_negative {
                value / f64::INFINITY
            } else {
                value * f64::INFINITY
            };
        }

        let mut exp = self.exponent;
        while exp > EXPONENT_STEP {
            value = if self.exponent_negative {
                value / EXPONENT_STEP_FACTOR
            } else {
                value * EXPONENT_STEP_FACTOR
            };
            exp -= EXPONENT_STEP;
        }
        let factor = pow10(exp);
        if self.exponent_negative {
            value / factor
        } else {
            value * factor
        }
    }
}

/// `10^exp` for `0 <= exp <= 300`, by repeated squaring.
fn pow10(exp: f64) -> f64 {
    debug_assert!(exp <= EXPONENT_STEP, "pow10({exp})");
    let mut n = exp as u32;
    let mut base = 10.0_f64;
    let mut acc = 1.0_f64;
    while n > 0 {
        if n & 1 == 1 {
            acc *= base;
        }
        base *= base;
        n >>= 1;
    }
    acc
}

impl<B: Builder, A: ScratchAllocator + ?Sized> State<'_, '_, B, A> {
    /// Decodes a number. The dispatcher has already consumed its first byte.
    pub(crate) fn decode_numeric(&mut self) -> B::Value {
        self.last_kind = TokenKind::Invalid;
        self.cursor.rewind();

        let negative = self.cursor.peek() == b'-';
        if negative {
            self.cursor.advance();
        }

        let mut acc = NumberAccumulator::new(negative);
        let mut phase = Phase::Integer;
        loop {
            let b = self.cursor.peek();
            match (phase, b) {
                (Phase::Integer, b'0'..=b'9') => acc.push_integer_digit(b - b'0'),
                (Phase::Integer, b'.') => {
                    acc.start_fraction();
                    phase = Phase::Fraction;
                }
                (Phase::Fraction, b'0'..=b'9') => acc.push_fraction_digit(b - b'0'),
                (Phase::Integer | Phase::Fraction, b'e' | b'E') => {
                    self.cursor.advance();
                    let sign = self.cursor.peek();
                    if sign == b'-' || sign == b'+' {
                        self.cursor.advance();
                    }
                    acc.start_exponent(sign == b'-');
                    phase = Phase::Exponent;
                    continue;
                }
                (Phase::Exponent, b'0'..=b'9') => acc.push_exponent_digit(b - b'0'),
                _ => break,
            }
            self.cursor.advance();
        }

        match acc.finish(self.options.integer_overflow) {
            Number::Integer(n) => {
                self.last_kind = TokenKind::Integer;
                self.builder.new_integer(n)
            }
            Number::Double(n) => {
                self.last_kind = TokenKind::Double;
                self.builder.new_double(n)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]

    use alloc::string::ToString;

    use rstest::rstest;

    use super::*;

    fn accumulate(text: &str, policy: IntegerOverflow) -> Number {
        let bytes = text.as_bytes();
        let (negative, digits) = match bytes.split_first() {
            Some((b'-', rest)) => (true, rest),
            _ => (false, bytes),
        };
        let mut acc = NumberAccumulator::new(negative);
        let mut phase = Phase::Integer;
        let mut iter = digits.iter().copied().peekable();
        while let Some(b) = iter.next() {
            match (phase, b) {
                (Phase::Integer, b'0'..=b'9') => acc.push_integer_digit(b - b'0'),
                (Phase::Integer, b'.') => {
                    acc.start_fraction();
                    phase = Phase::Fraction;
                }
                (Phase::Fraction, b'0'..=b'9') => acc.push_fraction_digit(b - b'0'),
                (_, b'e' | b'E') => {
                    let negative = iter.peek() == Some(&b'-');
                    if matches!(iter.peek(), Some(b'-' | b'+')) {
                        iter.next();
                    }
                    acc.start_exponent(negative);
                    phase = Phase::Exponent;
                }
                (Phase::Exponent, b'0'..=b'9') => acc.push_exponent_digit(b - b'0'),
                _ => panic!("unexpected byte in {text:?}"),
            }
        }
        acc.finish(policy)
    }

    #[rstest]
    #[case("0", 0)]
    #[case("-0", 0)]
    #[case("42", 42)]
    #[case("-42", -42)]
    #[case("9223372036854775807", i64::MAX)]
    #[case("-9223372036854775807", -i64::MAX)]
    #[case("-9223372036854775808", i64::MIN)]
    fn integers_in_range(#[case] text: &str, #[case] expected: i64) {
        for policy in [IntegerOverflow::Wrap, IntegerOverflow::Promote] {
            assert_eq!(accumulate(text, policy), Number::Integer(expected), "{text}");
        }
    }

    #[test]
    fn wrapping_overflow_results() {
        // 2^63 wraps to i64::MIN and is not negated back
        assert_eq!(
            accumulate("9223372036854775808", IntegerOverflow::Wrap),
            Number::Integer(i64::MIN)
        );
        assert_eq!(
            accumulate("18446744073709551617", IntegerOverflow::Wrap),
            Number::Integer(1)
        );
    }

    #[rstest]
    #[case("9223372036854775808", 9_223_372_036_854_775_808.0)]
    #[case("-9223372036854775809", -9_223_372_036_854_775_809.0)]
    #[case("100000000000000000000000", 1e23)]
    fn promotion_to_double(#[case] text: &str, #[case] expected: f64) {
        assert_eq!(
            accumulate(text, IntegerOverflow::Promote),
            Number::Double(expected)
        );
    }

    #[rstest]
    #[case("1.5", 1.5)]
    #[case("-0.25", -0.25)]
    #[case("1e3", 1000.0)]
    #[case("1E+3", 1000.0)]
    #[case("-1e-2", -0.01)]
    #[case("2.5e2", 250.0)]
    #[case("1.", 1.0)]
    #[case("0e999", 0.0)]
    fn doubles(#[case] text: &str, #[case] expected: f64) {
        assert_eq!(
            accumulate(text, IntegerOverflow::Wrap),
            Number::Double(expected)
        );
    }

    #[test]
    fn fraction_digits_past_cap_are_ignored() {
        assert_eq!(
            accumulate("0.123456789012345", IntegerOverflow::Wrap),
            Number::Double(0.123_456_789_0)
        );
    }

    #[test]
    fn huge_exponents_saturate() {
        assert_eq!(
            accumulate("1e500", IntegerOverflow::Wrap),
            Number::Double(f64::INFINITY)
        );
        assert_eq!(
            accumulate("1e-500", IntegerOverflow::Wrap),
            Number::Double(0.0)
        );
    }

    #[quickcheck_macros::quickcheck]
    fn policies_agree_on_in_range_integers(n: i64) -> bool {
        let text = n.to_string();
        accumulate(&text, IntegerOverflow::Wrap) == Number::Integer(n)
            && accumulate(&text, IntegerOverflow::Promote) == Number::Integer(n)
    }

    #[rstest]
    #[case("123456e-312", 1.23456e-307)]
    #[case("1e-310", 1e-310)]
    #[case("-2.5e-320", -2.5e-320)]
    #[case("0.0000000001e318", 1e308)]
    #[case("123e-400", 1.23e-398)]
    #[case("1e308", 1e308)]
    fn exponents_beyond_a_single_power_table(#[case] text: &str, #[case] expected: f64) {
        let Number::Double(got) = accumulate(text, IntegerOverflow::Wrap) else {
            panic!("{text} is not a double");
        };
        if expected.abs() < f64::MIN_POSITIVE {
            // subnormal: compare in units of the smallest subnormal
            assert!((got - expected).abs() <= 2.0 * 5e-324, "{text}: {got:e}");
        } else {
            assert!(((got - expected) / expected).abs() < 1e-12, "{text}: {got:e}");
        }
    }

    #[rstest]
    #[case(0.0, 1.0)]
    #[case(1.0, 10.0)]
    #[case(2.0, 100.0)]
    #[case(10.0, 1e10)]
    #[case(22.0, 1e22)]
    fn pow10_is_exact_for_small_exponents(#[case] exp: f64, #[case] expected: f64) {
        assert_eq!(pow10(exp), expected);
    }
}

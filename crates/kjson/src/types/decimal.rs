//! 128-bit style decimals, stored as sign + significand digits + base-10
//! exponent.
//!
//! `Decimal128` preserves the written form faithfully: `3.50` keeps its
//! trailing zero (significand `350`, exponent -2) and renders back as
//! `3.50`. It is an interchange record, not an arithmetic type; kJSONB
//! stores its canonical text.

use core::str::FromStr;

/// How many leading placeholder zeros plain notation may spend before the
/// renderer switches to scientific notation.
const PLAIN_ZERO_LIMIT: i32 = 6;

/// A decimal number with an explicit base-10 exponent.
///
/// The value is `±digits × 10^exponent` where `digits` is an integer
/// significand with no leading zeros (trailing zeros are significant and
/// preserved). Textual kJSON writes these with an `m` suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal128 {
    negative: bool,
    digits: String,
    exponent: i32,
}

impl Decimal128 {
    /// The zero value.
    #[must_use]
    pub fn zero() -> Self {
        Decimal128 {
            negative: false,
            digits: String::from("0"),
            exponent: 0,
        }
    }

    /// Builds a value from parts, normalising leading zeros, the sign of
    /// zero, and the canonical zero exponent.
    ///
    /// Returns `None` if `digits` is empty or contains a non-digit byte.
    #[must_use]
    pub fn from_parts(negative: bool, digits: &str, exponent: i32) -> Option<Self> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            return Some(Decimal128::zero());
        }
        Some(Decimal128 {
            negative,
            digits: trimmed.to_string(),
            exponent,
        })
    }

    /// Whether the value is negative. Zero is never negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Whether the value is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.digits == "0"
    }

    /// The significand digits, without sign or decimal point.
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// The base-10 exponent applied to the significand.
    #[must_use]
    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    /// Approximates the value as `f64`.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(f64::NAN)
    }

    /// Writes the canonical text (no `m` suffix) into `out`.
    ///
    /// Plain decimal notation is used whenever the decimal point lands
    /// inside the digit string or needs at most a few placeholder zeros;
    /// larger magnitudes use `<digits>e<exp>`. Either form reparses to an
    /// identical record.
    pub(crate) fn write_canonical(&self, out: &mut String) {
        if self.negative {
            out.push('-');
        }
        if self.exponent == 0 {
            out.push_str(&self.digits);
            return;
        }
        if self.exponent > 0 {
            out.push_str(&self.digits);
            out.push('e');
            out.push_str(&self.exponent.to_string());
            return;
        }
        let len = self.digits.len() as i64;
        let point = len + i64::from(self.exponent);
        if point > 0 {
            let at = usize::try_from(point).unwrap_or_default();
            out.push_str(&self.digits[..at]);
            out.push('.');
            out.push_str(&self.digits[at..]);
        } else if -point <= i64::from(PLAIN_ZERO_LIMIT) {
            out.push_str("0.");
            for _ in 0..-point {
                out.push('0');
            }
            out.push_str(&self.digits);
        } else {
            out.push_str(&self.digits);
            out.push('e');
            out.push_str(&self.exponent.to_string());
        }
    }
}

impl FromStr for Decimal128 {
    type Err = ();

    /// Parses decimal text: optional sign, integer part, optional fraction,
    /// optional `e`/`E` exponent. The `m` suffix of the surface syntax is
    /// not part of this representation.
    fn from_str(s: &str) -> Result<Self, ()> {
        let (negative, rest) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        if rest.is_empty() {
            return Err(());
        }

        let (mantissa, exp_part) = match rest.find(['e', 'E']) {
            Some(at) => (&rest[..at], Some(&rest[at + 1..])),
            None => (rest, None),
        };
        let (int_part, frac_part) = match mantissa.find('.') {
            Some(at) => (&mantissa[..at], &mantissa[at + 1..]),
            None => (mantissa, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(());
        }
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) {
            return Err(());
        }

        let mut exponent: i32 = match exp_part {
            Some(e) if !e.is_empty() => e.parse().map_err(|_| ())?,
            Some(_) => return Err(()),
            None => 0,
        };
        exponent = exponent
            .checked_sub(i32::try_from(frac_part.len()).map_err(|_| ())?)
            .ok_or(())?;

        let mut digits = String::with_capacity(int_part.len() + frac_part.len());
        digits.push_str(int_part);
        digits.push_str(frac_part);
        Decimal128::from_parts(negative, &digits, exponent).ok_or(())
    }
}

impl From<i64> for Decimal128 {
    fn from(v: i64) -> Self {
        Decimal128 {
            negative: v < 0,
            digits: v.unsigned_abs().to_string(),
            exponent: 0,
        }
    }
}

impl core::fmt::Display for Decimal128 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut buf = String::with_capacity(self.digits.len() + 8);
        self.write_canonical(&mut buf);
        f.write_str(&buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal128 {
        s.parse().unwrap()
    }

    #[test]
    fn parses_point_notation() {
        let v = dec("3.5");
        assert_eq!(v.digits(), "35");
        assert_eq!(v.exponent(), -1);
        assert!(!v.is_negative());
    }

    #[test]
    fn preserves_trailing_zeros() {
        let v = dec("3.50");
        assert_eq!(v.digits(), "350");
        assert_eq!(v.exponent(), -2);
        assert_eq!(v.to_string(), "3.50");
    }

    #[test]
    fn strips_leading_zeros() {
        let v = dec("0.0035");
        assert_eq!(v.digits(), "35");
        assert_eq!(v.exponent(), -4);
        assert_eq!(v.to_string(), "0.0035");
    }

    #[test]
    fn zero_is_canonical() {
        for s in ["0", "0.0", "-0.000", "0e5"] {
            let v = dec(s);
            assert_eq!(v, Decimal128::zero());
            assert!(!v.is_negative());
            assert_eq!(v.exponent(), 0);
        }
    }

    #[test]
    fn positive_exponent_stays_scientific() {
        let v = dec("35e2");
        assert_eq!(v.to_string(), "35e2");
        assert_eq!(dec(&v.to_string()), v);
    }

    #[test]
    fn large_negative_exponent_goes_scientific() {
        let v = dec("35e-40");
        assert_eq!(v.to_string(), "35e-40");
        assert_eq!(dec(&v.to_string()), v);
    }

    #[test]
    fn exponent_combines_with_fraction() {
        let v = dec("3.5e-3");
        assert_eq!(v.digits(), "35");
        assert_eq!(v.exponent(), -4);
    }

    #[test]
    fn canonical_text_reparses_identically() {
        for s in [
            "1", "-1", "3.5", "-3.50", "0.001", "123456.789", "9e9", "35e-40", "-2.25e10",
        ] {
            let v = dec(s);
            assert_eq!(dec(&v.to_string()), v, "round-trip of {s}");
        }
    }

    #[test]
    fn thirty_four_significant_digits() {
        let digits = "1234567890123456789012345678901234";
        let v = dec(digits);
        assert_eq!(v.digits(), digits);
        assert_eq!(dec(&v.to_string()), v);
    }

    #[test]
    fn rejects_malformed_text() {
        for s in ["", "-", ".", "1.2.3", "1e", "e5", "1x", "--1"] {
            assert!(s.parse::<Decimal128>().is_err(), "accepted {s:?}");
        }
    }
}

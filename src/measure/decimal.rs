//! # Arbitrary-Precision Decimals
//!
//! [`Decimal`] is an exact decimal number `unscaled × 10^-scale` backed by a
//! [`BigInt`]. Addition, subtraction and multiplication are always exact.
//! Division is exact when the quotient has a terminating decimal expansion,
//! and otherwise needs a [`MathContext`] bounding the number of significant
//! digits kept:
//!
//! ```rust
//! use measure::{Decimal, MathContext};
//!
//! let one = Decimal::from(1);
//! let three = Decimal::from(3);
//! assert!(one.div(&three, None).is_err());
//!
//! let third = one.div(&three, Some(&MathContext::DECIMAL32)).unwrap();
//! assert_eq!(third.to_string(), "0.3333333");
//! ```
//!
//! ## Precision Contexts
//!
//! | Context      | Significant digits | Rounding  |
//! |--------------|--------------------|-----------|
//! | `UNLIMITED`  | unbounded          | half up   |
//! | `DECIMAL32`  | 7                  | half even |
//! | `DECIMAL64`  | 16                 | half even |
//! | `DECIMAL128` | 34                 | half even |
//!
//! Equality, ordering and hashing are numeric: `1.0 == 1.00`.

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    ops::Neg,
    str::FromStr,
};

use num_bigint::{BigInt, Sign};
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecimalError {
    #[error("Malformed decimal number: '{0}'")]
    Malformed(String),

    #[error("Non-terminating decimal expansion; no exact representable decimal result")]
    NonTerminating,

    #[error("Rounding necessary")]
    RoundingNecessary,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Cannot represent {0} as a decimal")]
    NotFinite(f64),
}

/// How discarded digits are rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RoundingMode {
    /// Away from zero.
    Up,
    /// Towards zero.
    Down,
    /// Towards positive infinity.
    Ceiling,
    /// Towards negative infinity.
    Floor,
    HalfUp,
    HalfDown,
    /// Banker's rounding.
    #[default]
    HalfEven,
    /// Fails unless the result is exact.
    Unnecessary,
}

/// Number of significant digits and rounding mode for inexact operations.
///
/// A precision of zero means unbounded: operations are exact and fail rather
/// than round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MathContext {
    precision: u32,
    rounding: RoundingMode,
}

impl MathContext {
    pub const UNLIMITED: MathContext = MathContext::new(0, RoundingMode::HalfUp);
    pub const DECIMAL32: MathContext = MathContext::new(7, RoundingMode::HalfEven);
    pub const DECIMAL64: MathContext = MathContext::new(16, RoundingMode::HalfEven);
    pub const DECIMAL128: MathContext = MathContext::new(34, RoundingMode::HalfEven);

    pub const fn new(precision: u32, rounding: RoundingMode) -> Self {
        MathContext {
            precision,
            rounding,
        }
    }

    /// A context rounding half up to `precision` digits.
    pub const fn with_precision(precision: u32) -> Self {
        MathContext::new(precision, RoundingMode::HalfUp)
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn rounding(&self) -> RoundingMode {
        self.rounding
    }

    pub fn is_unlimited(&self) -> bool {
        self.precision == 0
    }
}

impl Default for MathContext {
    fn default() -> Self {
        MathContext::DECIMAL128
    }
}

/// An exact decimal number `unscaled × 10^-scale`.
#[derive(Clone)]
pub struct Decimal {
    unscaled: BigInt,
    scale: i64,
}

/// Largest scale magnitude accepted from text.
pub const MAX_PARSED_SCALE: i64 = 4096;

fn ten() -> BigInt {
    BigInt::from(10u8)
}

fn pow10(exponent: u64) -> BigInt {
    num_traits::pow(ten(), exponent as usize)
}

/// Number of decimal digits of `|n|`; zero has one digit.
fn digit_count(n: &BigInt) -> u64 {
    if n.is_zero() {
        1
    } else {
        n.magnitude().to_str_radix(10).len() as u64
    }
}

/// `numerator / denominator` rounded to an integer with `mode`.
fn divide_rounded(
    numerator: &BigInt,
    denominator: &BigInt,
    mode: RoundingMode,
) -> Result<BigInt, DecimalError> {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if remainder.is_zero() {
        return Ok(quotient);
    }
    let negative = (numerator.sign() == Sign::Minus) != (denominator.sign() == Sign::Minus);
    let half = (remainder.abs() * 2u8).cmp(&denominator.abs());
    let away = match mode {
        RoundingMode::Unnecessary => return Err(DecimalError::RoundingNecessary),
        RoundingMode::Up => true,
        RoundingMode::Down => false,
        RoundingMode::Ceiling => !negative,
        RoundingMode::Floor => negative,
        RoundingMode::HalfUp => half != Ordering::Less,
        RoundingMode::HalfDown => half == Ordering::Greater,
        RoundingMode::HalfEven => match half {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => !(&quotient % 2u8).is_zero(),
        },
    };
    Ok(match (away, negative) {
        (false, _) => quotient,
        (true, false) => quotient + 1u8,
        (true, true) => quotient - 1u8,
    })
}

impl Decimal {
    pub fn new(unscaled: impl Into<BigInt>, scale: i64) -> Self {
        Decimal {
            unscaled: unscaled.into(),
            scale,
        }
    }

    pub fn zero() -> Self {
        Decimal::new(0, 0)
    }

    pub fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }

    /// Number of digits to the right of the decimal point; negative scales
    /// stand for trailing zeros.
    pub fn scale(&self) -> i64 {
        self.scale
    }

    /// Number of significant digits of the unscaled value.
    pub fn precision(&self) -> u64 {
        digit_count(&self.unscaled)
    }

    pub fn is_zero(&self) -> bool {
        self.unscaled.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.unscaled.is_negative()
    }

    /// Exact decimal form of the shortest text representation of `value`.
    pub fn from_f64(value: f64) -> Result<Self, DecimalError> {
        if !value.is_finite() {
            return Err(DecimalError::NotFinite(value));
        }
        format!("{}", value).parse()
    }

    /// Nearest `f64`.
    pub fn to_f64(&self) -> f64 {
        format!("{}e{}", self.unscaled, -i128::from(self.scale))
            .parse()
            .unwrap_or(f64::NAN)
    }

    /// The value as an `i64`, if it is integral and in range.
    pub fn to_i64(&self) -> Option<i64> {
        let stripped = self.strip_trailing_zeros();
        // Anything with more than 18 trailing zeros exceeds i64.
        if stripped.scale > 0 || stripped.scale < -18 {
            return None;
        }
        (stripped.unscaled * pow10(stripped.scale.unsigned_abs())).to_i64()
    }

    /// Position of the most significant digit, `precision - scale`.
    fn adjusted_exponent(&self) -> i128 {
        i128::from(self.precision()) - i128::from(self.scale)
    }

    /// The unscaled value brought to a scale no smaller than the current one.
    fn unscaled_at(&self, scale: i64) -> BigInt {
        debug_assert!(scale >= self.scale);
        &self.unscaled * pow10(scale.abs_diff(self.scale))
    }

    pub fn add(&self, other: &Decimal) -> Decimal {
        let scale = self.scale.max(other.scale);
        Decimal::new(self.unscaled_at(scale) + other.unscaled_at(scale), scale)
    }

    pub fn sub(&self, other: &Decimal) -> Decimal {
        self.add(&-other.clone())
    }

    pub fn mul(&self, other: &Decimal) -> Decimal {
        Decimal::new(&self.unscaled * &other.unscaled, self.scale + other.scale)
    }

    /// `self + other`, rounded to `context`.
    pub fn add_rounded(&self, other: &Decimal, context: &MathContext) -> Result<Decimal, DecimalError> {
        self.add(other).round(context)
    }

    /// `self * other`, rounded to `context`.
    pub fn mul_rounded(&self, other: &Decimal, context: &MathContext) -> Result<Decimal, DecimalError> {
        self.mul(other).round(context)
    }

    /// Rounds to the precision of `context`.
    pub fn round(&self, context: &MathContext) -> Result<Decimal, DecimalError> {
        let precision = u64::from(context.precision);
        let digits = self.precision();
        if precision == 0 || digits <= precision {
            return Ok(self.clone());
        }
        let dropped = digits - precision;
        let mut unscaled = divide_rounded(&self.unscaled, &pow10(dropped), context.rounding)?;
        let mut scale = self.scale - dropped as i64;
        // 9.99 -> 10.0 carries into an extra digit
        if digit_count(&unscaled) > precision {
            unscaled /= ten();
            scale -= 1;
        }
        Ok(Decimal::new(unscaled, scale))
    }

    /// Moves to `scale`, rounding discarded digits with `mode`.
    pub fn with_scale(&self, scale: i64, mode: RoundingMode) -> Result<Decimal, DecimalError> {
        if scale >= self.scale {
            return Ok(Decimal::new(self.unscaled_at(scale), scale));
        }
        let divisor = pow10(self.scale.abs_diff(scale));
        Ok(Decimal::new(
            divide_rounded(&self.unscaled, &divisor, mode)?,
            scale,
        ))
    }

    /// `self / divisor`.
    ///
    /// Without a context (or with an unlimited one) the quotient must have a
    /// terminating expansion. With a bounded context it is rounded to that
    /// many significant digits. Exact quotients drop trailing zeros down to
    /// the scale `self.scale - divisor.scale`.
    pub fn div(&self, divisor: &Decimal, context: Option<&MathContext>) -> Result<Decimal, DecimalError> {
        if divisor.is_zero() {
            return Err(DecimalError::DivisionByZero);
        }
        let preferred = self.scale - divisor.scale;
        if self.is_zero() {
            return Ok(Decimal::new(0, preferred));
        }
        match context.filter(|c| !c.is_unlimited()) {
            None => self.div_exact(divisor, preferred),
            Some(context) => self.div_rounded(divisor, context, preferred),
        }
    }

    fn div_exact(&self, divisor: &Decimal, preferred: i64) -> Result<Decimal, DecimalError> {
        let ratio = BigRational::new(self.unscaled.clone(), divisor.unscaled.clone());
        // Terminating iff the reduced denominator is 2^a * 5^b.
        let mut rest = ratio.denom().clone();
        let (two, five) = (BigInt::from(2u8), BigInt::from(5u8));
        let (mut twos, mut fives) = (0u64, 0u64);
        while (&rest % &two).is_zero() {
            rest /= &two;
            twos += 1;
        }
        while (&rest % &five).is_zero() {
            rest /= &five;
            fives += 1;
        }
        if !rest.is_one() {
            return Err(DecimalError::NonTerminating);
        }
        let exponent = twos.max(fives);
        let unscaled = ratio.numer() * (pow10(exponent) / ratio.denom());
        Ok(Decimal::new(unscaled, preferred + exponent as i64).strip_trailing_zeros_to(preferred))
    }

    fn div_rounded(
        &self,
        divisor: &Decimal,
        context: &MathContext,
        preferred: i64,
    ) -> Result<Decimal, DecimalError> {
        let precision = u64::from(context.precision);
        let scaled = |shift: i64| -> (BigInt, BigInt) {
            if shift >= 0 {
                (&self.unscaled * pow10(shift.unsigned_abs()), divisor.unscaled.clone())
            } else {
                (self.unscaled.clone(), &divisor.unscaled * pow10(shift.unsigned_abs()))
            }
        };

        // Pick the shift giving an integer quotient of exactly `precision` digits.
        let mut shift = i64::from(context.precision) - (self.precision() as i64 - divisor.precision() as i64);
        let (numerator, denominator) = scaled(shift);
        if digit_count(&(&numerator / &denominator)) > precision {
            shift -= 1;
        }
        let (numerator, denominator) = scaled(shift);
        let exact = (&numerator % &denominator).is_zero();
        let mut unscaled = divide_rounded(&numerator, &denominator, context.rounding)?;
        let mut scale = preferred + shift;
        if digit_count(&unscaled) > precision {
            unscaled /= ten();
            scale -= 1;
        }
        let quotient = Decimal::new(unscaled, scale);
        if exact {
            Ok(quotient.strip_trailing_zeros_to(preferred))
        } else {
            Ok(quotient)
        }
    }

    /// Removes every trailing zero; zero itself gets scale 0.
    pub fn strip_trailing_zeros(&self) -> Decimal {
        if self.is_zero() {
            return Decimal::zero();
        }
        self.strip_trailing_zeros_to(i64::MIN)
    }

    /// Removes trailing zeros without going below `preferred` scale.
    fn strip_trailing_zeros_to(&self, preferred: i64) -> Decimal {
        if self.is_zero() {
            return Decimal::new(0, self.scale.min(preferred));
        }
        let ten = ten();
        let mut unscaled = self.unscaled.clone();
        let mut scale = self.scale;
        while scale > preferred && (&unscaled % &ten).is_zero() {
            unscaled /= &ten;
            scale -= 1;
        }
        Decimal::new(unscaled, scale)
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Decimal::new(value, 0)
    }
}

impl From<i32> for Decimal {
    fn from(value: i32) -> Self {
        Decimal::new(value, 0)
    }
}

impl From<BigInt> for Decimal {
    fn from(value: BigInt) -> Self {
        Decimal::new(value, 0)
    }
}

impl Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal::new(-self.unscaled, self.scale)
    }
}

impl FromStr for Decimal {
    type Err = DecimalError;

    /// Accepts plain (`-12.50`) and scientific (`1.5E-3`) notation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || DecimalError::Malformed(s.to_string());

        let (mantissa, exponent) = match s.find(['e', 'E']) {
            Some(i) => (
                &s[..i],
                s[i + 1..].parse::<i64>().map_err(|_| malformed())?,
            ),
            None => (s, 0),
        };
        let (negative, digits) = match mantissa.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, mantissa.strip_prefix('+').unwrap_or(mantissa)),
        };
        let (integer, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if integer.is_empty() && fraction.is_empty() {
            return Err(malformed());
        }
        if !integer.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
            return Err(malformed());
        }

        let mut unscaled = BigInt::parse_bytes(format!("{}{}", integer, fraction).as_bytes(), 10)
            .ok_or_else(malformed)?;
        if negative {
            unscaled = -unscaled;
        }
        let scale = (fraction.len() as i64)
            .checked_sub(exponent)
            .filter(|scale| scale.abs() <= MAX_PARSED_SCALE)
            .ok_or_else(malformed)?;
        Ok(Decimal::new(unscaled, scale))
    }
}

impl fmt::Display for Decimal {
    /// Plain notation, never scientific.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let digits = self.unscaled.magnitude().to_str_radix(10);
        if self.scale <= 0 {
            let zeros = if self.is_zero() { 0 } else { self.scale.unsigned_abs() as usize };
            return write!(f, "{}{}{}", sign, digits, "0".repeat(zeros));
        }
        let scale = self.scale as usize;
        if digits.len() > scale {
            let (integer, fraction) = digits.split_at(digits.len() - scale);
            write!(f, "{}{}.{}", sign, integer, fraction)
        } else {
            write!(f, "{}0.{}{}", sign, "0".repeat(scale - digits.len()), digits)
        }
    }
}

impl fmt::Debug for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decimal({})", self)
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let sign = self.unscaled.sign();
        match sign.cmp(&other.unscaled.sign()) {
            Ordering::Equal if sign == Sign::NoSign => return Ordering::Equal,
            Ordering::Equal => {}
            unequal => return unequal,
        }
        // Same sign: the magnitudes differ by orders of magnitude first.
        let magnitude = self.adjusted_exponent().cmp(&other.adjusted_exponent());
        if magnitude != Ordering::Equal {
            return if sign == Sign::Minus {
                magnitude.reverse()
            } else {
                magnitude
            };
        }
        let scale = self.scale.max(other.scale);
        self.unscaled_at(scale).cmp(&other.unscaled_at(scale))
    }
}

impl Hash for Decimal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let stripped = self.strip_trailing_zeros();
        stripped.unscaled.hash(state);
        stripped.scale.hash(state);
    }
}

impl Serialize for Decimal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(dec("12.50").to_string(), "12.50");
        assert_eq!(dec("-0.005").to_string(), "-0.005");
        assert_eq!(dec("1.5E3").to_string(), "1500");
        assert_eq!(dec("1.5e-3").to_string(), "0.0015");
        assert_eq!(dec("+7").to_string(), "7");
        assert_eq!(dec(".5").to_string(), "0.5");
    }

    #[test]
    fn test_parse_malformed() {
        for text in ["", "-", ".", "1.2.3", "12a", "1e", "e5", "1 000"] {
            assert!(
                matches!(text.parse::<Decimal>(), Err(DecimalError::Malformed(_))),
                "expected malformed: {:?}",
                text
            );
        }
    }

    #[test]
    fn test_numeric_equality_and_hash() {
        use std::collections::hash_map::DefaultHasher;

        let hash = |d: &Decimal| {
            let mut hasher = DefaultHasher::new();
            d.hash(&mut hasher);
            hasher.finish()
        };
        assert_eq!(dec("1.0"), dec("1.00"));
        assert_eq!(hash(&dec("1.0")), hash(&dec("1.00")));
        assert_eq!(hash(&dec("0.000")), hash(&Decimal::zero()));
        assert!(dec("-1.5") < dec("-1.49"));
        assert!(dec("100") > dec("99.999"));
    }

    #[test]
    fn test_exact_arithmetic() {
        assert_eq!(dec("0.1").add(&dec("0.2")).to_string(), "0.3");
        assert_eq!(dec("1.5").mul(&dec("1.5")).to_string(), "2.25");
        assert_eq!(dec("1").sub(&dec("0.001")).to_string(), "0.999");
    }

    #[test]
    fn test_exact_division() {
        assert_eq!(dec("1").div(&dec("4"), None).unwrap().to_string(), "0.25");
        assert_eq!(dec("1.00").div(&dec("1"), None).unwrap().to_string(), "1.00");
        assert_eq!(dec("10").div(&dec("0.5"), None).unwrap(), dec("20"));
        assert_eq!(
            dec("1").div(&dec("3"), None).unwrap_err(),
            DecimalError::NonTerminating
        );
        assert_eq!(
            dec("1").div(&Decimal::zero(), None).unwrap_err(),
            DecimalError::DivisionByZero
        );
    }

    #[test]
    fn test_bounded_division() {
        let third = dec("1").div(&dec("3"), Some(&MathContext::DECIMAL32)).unwrap();
        assert_eq!(third.to_string(), "0.3333333");
        let two_thirds = dec("2").div(&dec("3"), Some(&MathContext::DECIMAL32)).unwrap();
        assert_eq!(two_thirds.to_string(), "0.6666667");
        let exact = dec("1").div(&dec("4"), Some(&MathContext::DECIMAL128)).unwrap();
        assert_eq!(exact.to_string(), "0.25");
    }

    #[test]
    fn test_bounded_division_speed_of_light_in_mph() {
        let c = dec("299792458").mul(&Decimal::from(3125));
        let mph = c.div(&Decimal::from(1397), Some(&MathContext::DECIMAL128)).unwrap();
        assert_eq!(mph.to_string(), "670616629.3843951324266284896206156");
        assert_eq!(mph.precision(), 34);
    }

    #[test]
    fn test_rounding_modes() {
        let inputs = ["5.5", "2.5", "1.6", "1.1", "1.0", "-1.0", "-1.1", "-1.6", "-2.5", "-5.5"];
        let table: [(RoundingMode, [i64; 10]); 7] = [
            (RoundingMode::Up, [6, 3, 2, 2, 1, -1, -2, -2, -3, -6]),
            (RoundingMode::Down, [5, 2, 1, 1, 1, -1, -1, -1, -2, -5]),
            (RoundingMode::Ceiling, [6, 3, 2, 2, 1, -1, -1, -1, -2, -5]),
            (RoundingMode::Floor, [5, 2, 1, 1, 1, -1, -2, -2, -3, -6]),
            (RoundingMode::HalfUp, [6, 3, 2, 1, 1, -1, -1, -2, -3, -6]),
            (RoundingMode::HalfDown, [5, 2, 2, 1, 1, -1, -1, -2, -2, -5]),
            (RoundingMode::HalfEven, [6, 2, 2, 1, 1, -1, -1, -2, -2, -6]),
        ];
        for (mode, expected) in table {
            let context = MathContext::new(1, mode);
            for (input, want) in inputs.iter().zip(expected) {
                let rounded = dec(input).round(&context).unwrap();
                assert_eq!(rounded, Decimal::from(want), "{:?} of {}", mode, input);
            }
        }
    }

    #[test]
    fn test_rounding_unnecessary() {
        let context = MathContext::new(1, RoundingMode::Unnecessary);
        assert_eq!(dec("1.0").round(&context).unwrap(), dec("1"));
        assert_eq!(
            dec("1.5").round(&context).unwrap_err(),
            DecimalError::RoundingNecessary
        );
    }

    #[test]
    fn test_round_carry() {
        let context = MathContext::new(2, RoundingMode::HalfUp);
        let rounded = dec("9.96").round(&context).unwrap();
        assert_eq!(rounded, dec("10"));
        assert_eq!(rounded.precision(), 2);
    }

    #[test]
    fn test_with_scale() {
        assert_eq!(
            dec("2.345").with_scale(2, RoundingMode::HalfEven).unwrap().to_string(),
            "2.34"
        );
        assert_eq!(dec("2").with_scale(3, RoundingMode::Unnecessary).unwrap().to_string(), "2.000");
    }

    #[test]
    fn test_f64_round_trip() {
        assert_eq!(Decimal::from_f64(0.3048).unwrap().to_string(), "0.3048");
        assert_eq!(Decimal::from_f64(273.15).unwrap().to_f64(), 273.15);
        assert_eq!(
            Decimal::from_f64(f64::NAN).unwrap_err().to_string(),
            "Cannot represent NaN as a decimal"
        );
    }

    #[test]
    fn test_to_i64() {
        assert_eq!(dec("42.000").to_i64(), Some(42));
        assert_eq!(dec("4.2E1").to_i64(), Some(42));
        assert_eq!(dec("42.5").to_i64(), None);
        assert_eq!(dec("1E30").to_i64(), None);
        assert_eq!(dec("1E18").to_i64(), Some(1_000_000_000_000_000_000));
        assert_eq!(dec("1E4000").to_i64(), None);
    }

    #[test]
    fn test_large_exponents_compare_by_magnitude() {
        let big = dec("1E4000");
        assert!(big > dec("9.99E3999"));
        assert!(big > dec("1"));
        assert!(-big.clone() < dec("-1"));
        assert!(dec("-1E-4000") > dec("-1E-3999"));
        assert!(dec("1E-4000") < dec("1E-3999"));
        assert_eq!(big, dec("10E3999"));
        assert_eq!(dec("0E4000"), dec("0.000"));
        assert_eq!(big.to_f64(), f64::INFINITY);
        assert_eq!(dec("2.5E-3").to_f64(), 0.0025);
    }

    #[test]
    fn test_parse_rejects_unbounded_exponents() {
        assert!(matches!(
            "1E3000000".parse::<Decimal>(),
            Err(DecimalError::Malformed(_))
        ));
        assert!(matches!(
            "1E-9223372036854775808".parse::<Decimal>(),
            Err(DecimalError::Malformed(_))
        ));
        assert_eq!(dec("1E4096").to_f64(), f64::INFINITY);
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&dec("-12.50")).unwrap();
        assert_eq!(json, "\"-12.50\"");
        let back: Decimal = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_string(), "-12.50");
    }
}

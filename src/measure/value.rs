//! Numeric representations a [`Measure`](super::Measure) can hold.
//!
//! Each representation decides how it scales exactly, how it adds an offset
//! and how it widens when added to another measure. Fixed-width
//! representations go through `f64`; integral ones round to nearest and
//! refuse values they cannot hold.

use std::fmt;

use log::warn;

use crate::converter::UnitConverter;

use super::{
    MeasureError,
    decimal::{Decimal, MathContext},
};

/// 2^63, the first `f64` past `i64::MAX`.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Rounds to the nearest `i64`, failing on NaN and out of range values.
pub(crate) fn round_to_i64(value: f64) -> Result<i64, MeasureError> {
    let rounded = value.round();
    if rounded.is_nan() || !(-I64_BOUND..I64_BOUND).contains(&rounded) {
        return Err(MeasureError::OutOfRange {
            value,
            target: "i64",
        });
    }
    Ok(rounded as i64)
}

/// Rounds to the nearest `i32`, failing on NaN and out of range values.
pub(crate) fn round_to_i32(value: f64) -> Result<i32, MeasureError> {
    let out_of_range = || MeasureError::OutOfRange {
        value,
        target: "i32",
    };
    let wide = round_to_i64(value).map_err(|_| out_of_range())?;
    i32::try_from(wide).map_err(|_| out_of_range())
}

/// A numeric representation for measure values.
pub trait MeasureValue: Clone + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Representation of the sum of two measures whose left side is `Self`.
    type Sum: MeasureValue;

    /// Nearest `f64`.
    fn to_f64(&self) -> f64;

    /// Converts from `f64`, rounding integral representations to nearest.
    fn from_f64(value: f64) -> Result<Self, MeasureError>;

    /// Parses the textual magnitude of a measure.
    fn parse_value(text: &str) -> Result<Self, MeasureError>;

    /// The exact integral value, when the representation holds one.
    fn exact_i64(&self) -> Option<i64> {
        None
    }

    fn as_decimal(&self) -> Option<&Decimal> {
        None
    }

    /// `self * dividend / divisor`.
    fn scale_rational(
        &self,
        dividend: i64,
        divisor: i64,
        _context: Option<&MathContext>,
    ) -> Result<Self, MeasureError> {
        Self::from_f64(self.to_f64() * dividend as f64 / divisor as f64)
    }

    /// `self * factor`.
    fn scale(&self, factor: f64, _context: Option<&MathContext>) -> Result<Self, MeasureError> {
        Self::from_f64(self.to_f64() * factor)
    }

    /// `self + offset`.
    fn offset(&self, offset: f64, _context: Option<&MathContext>) -> Result<Self, MeasureError> {
        Self::from_f64(self.to_f64() + offset)
    }

    /// Applies a converter with no exact form through `f64`.
    fn convert_nonlinear(&self, converter: &UnitConverter) -> Result<Self, MeasureError> {
        Self::from_f64(converter.convert(self.to_f64()))
    }

    /// `self + converter(other)`, in the widened representation.
    fn sum<W: MeasureValue>(
        &self,
        other: &W,
        converter: &UnitConverter,
    ) -> Result<Self::Sum, MeasureError>;
}

/// Converts `value` through `converter`, keeping exact forms exact.
pub(crate) fn convert<V: MeasureValue>(
    value: &V,
    converter: &UnitConverter,
    context: Option<&MathContext>,
) -> Result<V, MeasureError> {
    match converter {
        UnitConverter::Identity => Ok(value.clone()),
        UnitConverter::Rational(r) => value.scale_rational(r.dividend(), r.divisor(), context),
        linear if linear.is_linear() => value.scale(linear.convert(1.0), context),
        UnitConverter::Add(a) => value.offset(a.offset(), context),
        other => value.convert_nonlinear(other),
    }
}

/// `converter(other)` as an `i64`, exact when no conversion is needed.
fn converted_i64<W: MeasureValue>(other: &W, converter: &UnitConverter) -> Result<i64, MeasureError> {
    match (converter, other.exact_i64()) {
        (UnitConverter::Identity, Some(exact)) => Ok(exact),
        _ => round_to_i64(converter.convert(other.to_f64())),
    }
}

impl MeasureValue for f64 {
    type Sum = f64;

    fn to_f64(&self) -> f64 {
        *self
    }

    fn from_f64(value: f64) -> Result<Self, MeasureError> {
        Ok(value)
    }

    fn parse_value(text: &str) -> Result<Self, MeasureError> {
        text.parse()
            .map_err(|_| MeasureError::MalformedNumber(text.to_string()))
    }

    fn sum<W: MeasureValue>(&self, other: &W, converter: &UnitConverter) -> Result<f64, MeasureError> {
        Ok(self + converter.convert(other.to_f64()))
    }
}

impl MeasureValue for f32 {
    type Sum = f64;

    fn to_f64(&self) -> f64 {
        f64::from(*self)
    }

    fn from_f64(value: f64) -> Result<Self, MeasureError> {
        Ok(value as f32)
    }

    fn parse_value(text: &str) -> Result<Self, MeasureError> {
        text.parse()
            .map_err(|_| MeasureError::MalformedNumber(text.to_string()))
    }

    fn sum<W: MeasureValue>(&self, other: &W, converter: &UnitConverter) -> Result<f64, MeasureError> {
        Ok(f64::from(*self) + converter.convert(other.to_f64()))
    }
}

impl MeasureValue for i64 {
    type Sum = i64;

    fn to_f64(&self) -> f64 {
        *self as f64
    }

    fn from_f64(value: f64) -> Result<Self, MeasureError> {
        round_to_i64(value)
    }

    fn parse_value(text: &str) -> Result<Self, MeasureError> {
        text.parse()
            .map_err(|_| MeasureError::MalformedNumber(text.to_string()))
    }

    fn exact_i64(&self) -> Option<i64> {
        Some(*self)
    }

    fn sum<W: MeasureValue>(&self, other: &W, converter: &UnitConverter) -> Result<i64, MeasureError> {
        let addend = converted_i64(other, converter)?;
        self.checked_add(addend).ok_or(MeasureError::OutOfRange {
            value: *self as f64 + addend as f64,
            target: "i64",
        })
    }
}

impl MeasureValue for i32 {
    type Sum = i64;

    fn to_f64(&self) -> f64 {
        f64::from(*self)
    }

    fn from_f64(value: f64) -> Result<Self, MeasureError> {
        round_to_i32(value)
    }

    fn parse_value(text: &str) -> Result<Self, MeasureError> {
        text.parse()
            .map_err(|_| MeasureError::MalformedNumber(text.to_string()))
    }

    fn exact_i64(&self) -> Option<i64> {
        Some(i64::from(*self))
    }

    fn sum<W: MeasureValue>(&self, other: &W, converter: &UnitConverter) -> Result<i64, MeasureError> {
        i64::from(*self).sum(other, converter)
    }
}

impl MeasureValue for Decimal {
    type Sum = Decimal;

    fn to_f64(&self) -> f64 {
        Decimal::to_f64(self)
    }

    fn from_f64(value: f64) -> Result<Self, MeasureError> {
        Decimal::from_f64(value).map_err(|_| MeasureError::OutOfRange {
            value,
            target: "decimal",
        })
    }

    fn parse_value(text: &str) -> Result<Self, MeasureError> {
        text.parse()
            .map_err(|_| MeasureError::MalformedNumber(text.to_string()))
    }

    fn exact_i64(&self) -> Option<i64> {
        self.to_i64()
    }

    fn as_decimal(&self) -> Option<&Decimal> {
        Some(self)
    }

    fn scale_rational(
        &self,
        dividend: i64,
        divisor: i64,
        context: Option<&MathContext>,
    ) -> Result<Self, MeasureError> {
        let (dividend, divisor) = (Decimal::from(dividend), Decimal::from(divisor));
        let product = match context {
            Some(context) => self.mul_rounded(&dividend, context)?,
            None => self.mul(&dividend),
        };
        Ok(product.div(&divisor, context)?)
    }

    fn scale(&self, factor: f64, context: Option<&MathContext>) -> Result<Self, MeasureError> {
        let factor = Decimal::from_f64(factor)?;
        match context {
            Some(context) => Ok(self.mul_rounded(&factor, context)?),
            None => Ok(self.mul(&factor)),
        }
    }

    fn offset(&self, offset: f64, context: Option<&MathContext>) -> Result<Self, MeasureError> {
        let offset = Decimal::from_f64(offset)?;
        match context {
            Some(context) => Ok(self.add_rounded(&offset, context)?),
            None => Ok(self.add(&offset)),
        }
    }

    fn convert_nonlinear(&self, converter: &UnitConverter) -> Result<Self, MeasureError> {
        warn!(
            "Converting decimal {} through {:?} in floating point, precision may be lost",
            self, converter
        );
        <Self as MeasureValue>::from_f64(converter.convert(self.to_f64()))
    }

    fn sum<W: MeasureValue>(&self, other: &W, converter: &UnitConverter) -> Result<Decimal, MeasureError> {
        let addend = match other.as_decimal() {
            Some(exact) => convert(exact, converter, None)?,
            None => Decimal::from_f64(converter.convert(other.to_f64()))?,
        };
        Ok(self.add(&addend))
    }
}

//! # Measures
//!
//! A [`Measure`] is an immutable `(value, unit)` pair tagged with a
//! [`Quantity`] kind. The value can be held in any [`MeasureValue`]
//! representation: `f64`, `f32`, `i64`, `i32` or the arbitrary-precision
//! [`Decimal`](decimal::Decimal).
//!
//! Conversions keep exact forms exact where the representation allows it:
//! rational scales are applied as multiply-then-divide, offsets are added,
//! and only non-linear converters fall back to floating point evaluation.
//!
//! ```rust
//! use measure::{Measure, quantity::Length, unit::si};
//!
//! let distance: Measure<f64, Length> = Measure::new(1.0, si::kilometer());
//! let meters = distance.to(&si::meter()).unwrap();
//! assert_eq!(*meters.value(), 1000.0);
//! ```
//!
//! ## Equality
//!
//! Two measures are equal when their units are compatible and their values
//! compare equal once expressed in the same unit, so `5 A == 5000 mA`.
//! Hashing only covers the standard unit, which keeps it consistent with
//! that equality across compatible units.

pub mod decimal;
mod format;
pub mod value;

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    converter::ConversionError,
    quantity::{Dimensionless, Quantity},
    unit::{Unit, UnitCatalog, UnitParseError},
};

use decimal::{DecimalError, MathContext};
pub use value::MeasureValue;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeasureError {
    /// The converted value does not fit the target representation.
    #[error("{value} is out of range for {target}")]
    OutOfRange { value: f64, target: &'static str },

    /// The textual magnitude is not a number.
    #[error("Malformed numeric value: '{0}'")]
    MalformedNumber(String),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    UnitParse(#[from] UnitParseError),

    #[error(transparent)]
    Decimal(#[from] DecimalError),
}

/// An immutable value and unit pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measure<V, Q = Dimensionless> {
    value: V,
    unit: Unit,
    #[serde(skip)]
    quantity: PhantomData<fn() -> Q>,
}

impl<V: MeasureValue, Q: Quantity> Measure<V, Q> {
    pub fn new(value: V, unit: Unit) -> Self {
        Measure {
            value,
            unit,
            quantity: PhantomData,
        }
    }

    /// A measure in the default unit of `Q`.
    pub fn of(value: V) -> Self {
        Self::new(value, Q::default_unit())
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn into_value(self) -> V {
        self.value
    }

    /// This measure expressed in `unit`.
    ///
    /// # Errors
    ///
    /// Fails for incompatible units, for integral representations that cannot
    /// hold the converted value and for decimal quotients with no terminating
    /// expansion. Use [`Measure::to_with_context`] to bound the precision of
    /// decimal conversions instead.
    pub fn to(&self, unit: &Unit) -> Result<Self, MeasureError> {
        self.convert_to(unit, None)
    }

    /// This measure expressed in `unit`, rounding decimal arithmetic to
    /// `context`. Other representations ignore the context.
    pub fn to_with_context(&self, unit: &Unit, context: &MathContext) -> Result<Self, MeasureError> {
        self.convert_to(unit, Some(context))
    }

    fn convert_to(&self, unit: &Unit, context: Option<&MathContext>) -> Result<Self, MeasureError> {
        if *unit == self.unit {
            return Ok(self.clone());
        }
        let converter = self.unit.converter_to(unit)?;
        let value = value::convert(&self.value, &converter, context)?;
        Ok(Self::new(value, unit.clone()))
    }

    /// The value in `unit`, as an `f64`.
    pub fn double_value(&self, unit: &Unit) -> Result<f64, MeasureError> {
        if *unit == self.unit {
            return Ok(self.value.to_f64());
        }
        Ok(self.unit.converter_to(unit)?.convert(self.value.to_f64()))
    }

    /// The value in `unit`, as an `f32`.
    pub fn float_value(&self, unit: &Unit) -> Result<f32, MeasureError> {
        Ok(self.double_value(unit)? as f32)
    }

    /// The value in `unit`, rounded to the nearest `i64`.
    pub fn long_value(&self, unit: &Unit) -> Result<i64, MeasureError> {
        if *unit == self.unit {
            if let Some(exact) = self.value.exact_i64() {
                return Ok(exact);
            }
        }
        value::round_to_i64(self.double_value(unit)?)
    }

    /// The value in `unit`, rounded to the nearest `i32`.
    pub fn int_value(&self, unit: &Unit) -> Result<i32, MeasureError> {
        let wide = self.long_value(unit)?;
        i32::try_from(wide).map_err(|_| MeasureError::OutOfRange {
            value: wide as f64,
            target: "i32",
        })
    }

    /// Adds `other`, converted into this measure's unit, in the widened
    /// representation of `V`.
    pub fn add<W: MeasureValue>(&self, other: &Measure<W, Q>) -> Result<Measure<V::Sum, Q>, MeasureError> {
        let converter = other.unit.converter_to(&self.unit)?;
        let value = self.value.sum(&other.value, &converter)?;
        Ok(Measure::new(value, self.unit.clone()))
    }

    /// Orders both measures by value in this measure's unit.
    ///
    /// Two decimal measures compare exactly when the conversion terminates.
    pub fn compare_to<W: MeasureValue>(&self, other: &Measure<W, Q>) -> Result<Ordering, MeasureError> {
        if let (Some(this), Some(that)) = (self.value.as_decimal(), other.value.as_decimal()) {
            let converter = other.unit.converter_to(&self.unit)?;
            if let Ok(that) = value::convert(that, &converter, None) {
                return Ok(this.cmp(&that));
            }
        }
        let this = self.value.to_f64();
        let that = other.double_value(&self.unit)?;
        Ok(this.total_cmp(&that))
    }

    /// The same measure in another representation.
    pub fn cast<W: MeasureValue>(&self) -> Result<Measure<W, Q>, MeasureError> {
        let value = match self.value.as_decimal() {
            Some(exact) => W::parse_value(&exact.to_string())
                .or_else(|_| W::from_f64(self.value.to_f64()))?,
            None => W::from_f64(self.value.to_f64())?,
        };
        Ok(Measure::new(value, self.unit.clone()))
    }

    /// Parses `"<number> <unit>"`, resolving the unit against `catalog`.
    ///
    /// The text is split at its first whitespace run; a missing unit means
    /// the dimensionless unit.
    pub fn parse_with(text: &str, catalog: &UnitCatalog) -> Result<Self, MeasureError> {
        let (number, unit) = match text.find(char::is_whitespace) {
            Some(i) => (&text[..i], text[i..].trim_start()),
            None => (text, ""),
        };
        let value = V::parse_value(number)?;
        let unit = if unit.is_empty() {
            Unit::one()
        } else {
            catalog.parse(unit)?
        };
        Ok(Self::new(value, unit))
    }
}

impl<Q: Quantity> Measure<i32, Q> {
    /// An exact zero in `unit`.
    pub fn zero(unit: Unit) -> Self {
        Measure::new(0, unit)
    }
}

impl<V: MeasureValue, W: MeasureValue, Q: Quantity> PartialEq<Measure<W, Q>> for Measure<V, Q> {
    fn eq(&self, other: &Measure<W, Q>) -> bool {
        self.unit.is_compatible(&other.unit)
            && matches!(self.compare_to(other), Ok(Ordering::Equal))
    }
}

impl<V: MeasureValue, Q: Quantity> Eq for Measure<V, Q> {}

impl<V: MeasureValue, W: MeasureValue, Q: Quantity> PartialOrd<Measure<W, Q>> for Measure<V, Q> {
    fn partial_cmp(&self, other: &Measure<W, Q>) -> Option<Ordering> {
        if !self.unit.is_compatible(&other.unit) {
            return None;
        }
        self.compare_to(other).ok()
    }
}

impl<V: MeasureValue, Q: Quantity> Hash for Measure<V, Q> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Units without a standard form are only equal to themselves.
        match self.unit.standard_unit() {
            Ok(standard) => standard.hash(state),
            Err(_) => self.unit.hash(state),
        }
    }
}

impl<V: MeasureValue, Q: Quantity> fmt::Display for Measure<V, Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.unit {
            Unit::Compound(_) => format::write_compound(f, self.value.to_f64(), &self.unit),
            unit if unit.is_one() => write!(f, "{}", self.value),
            unit => write!(f, "{} {}", self.value, unit),
        }
    }
}

impl<V: MeasureValue, Q: Quantity> FromStr for Measure<V, Q> {
    type Err = MeasureError;

    /// Parses against the standard unit catalog.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with(s, UnitCatalog::standard())
    }
}

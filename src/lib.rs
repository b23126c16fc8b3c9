//! Physical quantities and units.
//!
//! This crate models units as an algebra ([`Unit`]) over exact and floating
//! converters ([`UnitConverter`]), and wraps numeric values of several
//! representations into unit-tagged [`Measure`]s that convert without
//! surprising precision loss.

pub mod converter;
pub mod measure;
#[cfg(feature = "observation")]
pub mod observation;
pub mod quantity;
pub mod unit;

#[cfg(test)]
mod test_utils;

pub use crate::converter::{ConversionError, UnitConverter};
pub use crate::measure::decimal::{Decimal, DecimalError, MathContext, RoundingMode};
pub use crate::measure::{Measure, MeasureError, MeasureValue};
pub use crate::quantity::Quantity;
pub use crate::unit::{CompoundUnit, ProductUnit, Unit, UnitCatalog, UnitParseError};

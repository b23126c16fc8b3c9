//! # Units
//!
//! A [`Unit`] is an immutable value identifying a physical unit. Units form an
//! algebra: they can be multiplied, divided, raised to integer powers, have
//! integer roots extracted, be transformed by a [`UnitConverter`] or be joined
//! into a mixed-radix compound (e.g. `h:min`).
//!
//! Every unit resolves to a *standard unit* built only from base units, and a
//! converter to that standard unit. Two units are compatible when their
//! standard units are equal; conversion between compatible units always goes
//! through the standard unit.
//!
//! ## Kinds
//!
//! - [`BaseUnit`]: an independent dimension identified by its symbol (`m`, `s`).
//! - [`TransformedUnit`]: a parent unit plus a converter to it (`km`, `°C`).
//! - [`ProductUnit`]: a canonical product of rational powers (`m/s^2`).
//! - [`CompoundUnit`]: a high/low pair used for mixed-radix display.
//!
//! Structurally equal units are equal, regardless of how they were built:
//!
//! ```rust
//! use measure::unit::si;
//!
//! let area = si::meter().pow(2);
//! assert_eq!(area.divide(&si::meter()), si::meter());
//! ```

mod catalog;
mod compound;
mod parse;
mod product;
pub mod si;

use std::{
    collections::hash_map::DefaultHasher,
    fmt,
    hash::{Hash, Hasher},
    ops::{Div, Mul},
    sync::{Arc, LazyLock},
};

use serde::{Deserialize, Serialize};

use crate::converter::{ConversionError, UnitConverter};

pub use catalog::UnitCatalog;
pub use compound::CompoundUnit;
pub use parse::UnitParseError;
pub use product::{Element, ProductUnit};

static ONE: LazyLock<Unit> = LazyLock::new(|| Unit::Product(Arc::new(ProductUnit::empty())));

/// A physical unit.
///
/// Cloning is cheap: payloads are shared behind [`Arc`].
#[derive(Clone)]
pub enum Unit {
    Base(Arc<BaseUnit>),
    Transformed(Arc<TransformedUnit>),
    Product(Arc<ProductUnit>),
    Compound(Arc<CompoundUnit>),
}

/// An independent dimension, identified by its symbol alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BaseUnit {
    symbol: String,
}

impl BaseUnit {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

/// A unit derived from a parent unit through a converter.
///
/// The optional symbol is a display label only and takes no part in
/// equality or hashing.
#[derive(Debug, Clone)]
pub struct TransformedUnit {
    parent: Unit,
    to_parent: UnitConverter,
    symbol: Option<String>,
}

impl TransformedUnit {
    pub fn parent(&self) -> &Unit {
        &self.parent
    }

    /// Converter from this unit to its parent.
    pub fn to_parent(&self) -> &UnitConverter {
        &self.to_parent
    }

    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }
}

impl PartialEq for TransformedUnit {
    fn eq(&self, other: &Self) -> bool {
        self.parent == other.parent && self.to_parent == other.to_parent
    }
}

impl Eq for TransformedUnit {}

impl Unit {
    /// The dimensionless unit: a product with no elements.
    pub fn one() -> Unit {
        ONE.clone()
    }

    /// Creates a base unit with the given symbol.
    pub fn base(symbol: impl Into<String>) -> Unit {
        Unit::Base(Arc::new(BaseUnit {
            symbol: symbol.into(),
        }))
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Unit::Product(p) if p.is_empty())
    }

    /// Returns the canonical product `self * other`.
    ///
    /// # Panics
    ///
    /// When a resulting exponent does not fit an `i32`; see
    /// [`Unit::checked_times`].
    pub fn times(&self, other: &Unit) -> Unit {
        self.checked_times(other)
            .unwrap_or_else(|e| panic!("unit product overflow: {}", e))
    }

    /// Returns the canonical product `self * other`.
    ///
    /// # Errors
    ///
    /// [`ConversionError::ExponentOverflow`] when a resulting exponent does
    /// not fit an `i32`.
    pub fn checked_times(&self, other: &Unit) -> Result<Unit, ConversionError> {
        product::product_of(self, other)
    }

    /// Returns the canonical quotient `self / other`.
    ///
    /// # Panics
    ///
    /// When a resulting exponent does not fit an `i32`; see
    /// [`Unit::checked_divide`].
    pub fn divide(&self, other: &Unit) -> Unit {
        self.checked_divide(other)
            .unwrap_or_else(|e| panic!("unit quotient overflow: {}", e))
    }

    /// Returns the canonical quotient `self / other`.
    ///
    /// # Errors
    ///
    /// [`ConversionError::ExponentOverflow`] when a resulting exponent does
    /// not fit an `i32`.
    pub fn checked_divide(&self, other: &Unit) -> Result<Unit, ConversionError> {
        product::quotient_of(self, other)
    }

    /// Raises this unit to an integer power.
    ///
    /// `pow(0)` is [`Unit::one`]; negative powers invert.
    ///
    /// # Panics
    ///
    /// When a resulting exponent does not fit an `i32`; see
    /// [`Unit::checked_pow`].
    pub fn pow(&self, n: i32) -> Unit {
        self.checked_pow(n)
            .unwrap_or_else(|e| panic!("unit power overflow: {}", e))
    }

    /// Raises this unit to an integer power.
    ///
    /// # Errors
    ///
    /// [`ConversionError::ExponentOverflow`] when a resulting exponent does
    /// not fit an `i32`.
    pub fn checked_pow(&self, n: i32) -> Result<Unit, ConversionError> {
        match n {
            0 => Ok(Unit::one()),
            _ => product::pow_of(self, n),
        }
    }

    /// Extracts the `n`-th root of this unit; negative roots invert.
    ///
    /// # Errors
    ///
    /// [`ConversionError::ZeroRoot`] when `n` is zero and
    /// [`ConversionError::ExponentOverflow`] when a resulting exponent does
    /// not fit an `i32`.
    pub fn root(&self, n: i32) -> Result<Unit, ConversionError> {
        match n {
            0 => Err(ConversionError::ZeroRoot),
            n => product::root_of(self, n),
        }
    }

    /// Joins `self` (high) and `low` into a mixed-radix compound unit.
    ///
    /// # Errors
    ///
    /// [`ConversionError::Incompatible`] when both parts do not share a
    /// standard unit.
    pub fn compound(&self, low: &Unit) -> Result<Unit, ConversionError> {
        Ok(Unit::Compound(Arc::new(CompoundUnit::new(
            self.clone(),
            low.clone(),
        )?)))
    }

    /// Derives a unit through `operation`, which converts values of the
    /// resulting unit into values of `self`.
    ///
    /// Transforming a transformed unit folds both converters onto the
    /// untransformed parent; an identity result yields that parent.
    pub fn transform(&self, operation: UnitConverter) -> Unit {
        if let Unit::Transformed(tf) = self {
            let to_parent = tf.to_parent.concatenate(&operation);
            if to_parent.is_identity() {
                return tf.parent.clone();
            }
            return Unit::Transformed(Arc::new(TransformedUnit {
                parent: tf.parent.clone(),
                to_parent,
                symbol: None,
            }));
        }
        if operation.is_identity() {
            return self.clone();
        }
        Unit::Transformed(Arc::new(TransformedUnit {
            parent: self.clone(),
            to_parent: operation,
            symbol: None,
        }))
    }

    /// `self * factor`, e.g. `m.times_factor(1000)` is a kilometer.
    pub fn times_factor(&self, factor: i64) -> Result<Unit, ConversionError> {
        Ok(self.transform(UnitConverter::rational(factor, 1)?))
    }

    /// `self / divisor`, e.g. `kg.divide_factor(1000)` is a gram.
    pub fn divide_factor(&self, divisor: i64) -> Result<Unit, ConversionError> {
        Ok(self.transform(UnitConverter::rational(1, divisor)?))
    }

    /// `self * factor` for factors without an exact integer form.
    pub fn times_f64(&self, factor: f64) -> Result<Unit, ConversionError> {
        Ok(self.transform(UnitConverter::multiply(factor)?))
    }

    /// `self + offset`, e.g. `K.plus(273.15)` is a degree Celsius.
    pub fn plus(&self, offset: f64) -> Result<Unit, ConversionError> {
        Ok(self.transform(UnitConverter::add(offset)?))
    }

    /// Attaches a display symbol to a transformed unit.
    ///
    /// Other kinds are returned unchanged: their symbol (if any) is part of
    /// their identity.
    pub fn labeled(&self, symbol: impl Into<String>) -> Unit {
        match self {
            Unit::Transformed(tf) => Unit::Transformed(Arc::new(TransformedUnit {
                parent: tf.parent.clone(),
                to_parent: tf.to_parent.clone(),
                symbol: Some(symbol.into()),
            })),
            other => other.clone(),
        }
    }

    /// The unit built only from base units that this unit resolves to.
    ///
    /// # Errors
    ///
    /// [`ConversionError::ExponentOverflow`] when the standard form of a
    /// product needs an exponent beyond the `i32` range.
    pub fn standard_unit(&self) -> Result<Unit, ConversionError> {
        match self {
            Unit::Base(_) => Ok(self.clone()),
            Unit::Transformed(tf) => tf.parent.standard_unit(),
            Unit::Product(p) => p.standard_unit(self),
            Unit::Compound(c) => c.low().standard_unit(),
        }
    }

    /// Converter from this unit to its standard unit.
    ///
    /// # Errors
    ///
    /// Product units fail with [`ConversionError::NonLinear`] or
    /// [`ConversionError::FractionalExponent`] when an element cannot be
    /// folded into a multiplicative chain.
    pub fn to_standard_unit(&self) -> Result<UnitConverter, ConversionError> {
        match self {
            Unit::Base(_) => Ok(UnitConverter::Identity),
            Unit::Transformed(tf) => Ok(tf
                .parent
                .to_standard_unit()?
                .concatenate(&tf.to_parent)),
            Unit::Product(p) => p.to_standard_unit(),
            Unit::Compound(c) => c.low().to_standard_unit(),
        }
    }

    pub fn is_standard_unit(&self) -> bool {
        matches!(self.standard_unit(), Ok(standard) if standard == *self)
    }

    /// Whether both units share a standard unit.
    pub fn is_compatible(&self, other: &Unit) -> bool {
        if self == other {
            return true;
        }
        match (self.standard_unit(), other.standard_unit()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }

    /// Converter from values in `self` to values in `that`.
    ///
    /// # Errors
    ///
    /// [`ConversionError::Incompatible`] when both units do not share a
    /// standard unit, or any error raised while resolving either side's
    /// standard converter.
    pub fn converter_to(&self, that: &Unit) -> Result<UnitConverter, ConversionError> {
        if self == that {
            return Ok(UnitConverter::Identity);
        }
        if self.standard_unit()? != that.standard_unit()? {
            return Err(ConversionError::Incompatible {
                from: self.to_string(),
                to: that.to_string(),
            });
        }
        Ok(that
            .to_standard_unit()?
            .inverse()
            .concatenate(&self.to_standard_unit()?))
    }

    /// Stable structural hash, consistent with equality.
    pub(crate) fn structural_hash(&self) -> u64 {
        match self {
            Unit::Base(b) => {
                let mut hasher = DefaultHasher::new();
                b.hash(&mut hasher);
                hasher.finish()
            }
            Unit::Transformed(tf) => {
                let mut hasher = DefaultHasher::new();
                tf.to_parent.hash(&mut hasher);
                tf.parent
                    .structural_hash()
                    .wrapping_mul(31)
                    .wrapping_add(hasher.finish())
            }
            Unit::Product(p) => p.structural_hash(),
            Unit::Compound(c) => c.high().structural_hash() ^ c.low().structural_hash(),
        }
    }

    /// Whether this unit needs parentheses when used as a product element or
    /// a transformation parent.
    fn needs_grouping(&self) -> bool {
        match self {
            Unit::Base(_) => false,
            Unit::Transformed(tf) => tf.symbol.is_none(),
            Unit::Product(p) => !p.is_empty(),
            Unit::Compound(_) => true,
        }
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Unit::Base(a), Unit::Base(b)) => Arc::ptr_eq(a, b) || a == b,
            (Unit::Transformed(a), Unit::Transformed(b)) => Arc::ptr_eq(a, b) || a == b,
            (Unit::Product(a), Unit::Product(b)) => Arc::ptr_eq(a, b) || a == b,
            (Unit::Compound(a), Unit::Compound(b)) => Arc::ptr_eq(a, b) || a == b,
            _ => false,
        }
    }
}

impl Eq for Unit {}

impl Hash for Unit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.structural_hash());
    }
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Base(b) => f.debug_tuple("Base").field(&b.symbol).finish(),
            Unit::Transformed(tf) => f.debug_tuple("Transformed").field(tf).finish(),
            Unit::Product(p) => f.debug_tuple("Product").field(p).finish(),
            Unit::Compound(c) => f.debug_tuple("Compound").field(c).finish(),
        }
    }
}

/// Writes `unit`, wrapped in parentheses when it is not atomic.
pub(crate) fn fmt_grouped(f: &mut fmt::Formatter<'_>, unit: &Unit) -> fmt::Result {
    if unit.needs_grouping() {
        write!(f, "({})", unit)
    } else {
        write!(f, "{}", unit)
    }
}

/// Writes a converter as the textual operations producing it, in the order
/// they would be written after the parent unit.
fn fmt_operations(f: &mut fmt::Formatter<'_>, converter: &UnitConverter) -> fmt::Result {
    match converter {
        UnitConverter::Identity => Ok(()),
        UnitConverter::Rational(r) => match (r.dividend(), r.divisor()) {
            (dividend, 1) => write!(f, "*{}", dividend),
            (1, divisor) => write!(f, "/{}", divisor),
            (dividend, divisor) => write!(f, "*{}/{}", dividend, divisor),
        },
        UnitConverter::Multiply(m) => write!(f, "*{:?}", m.factor()),
        UnitConverter::Add(a) if a.offset() < 0.0 => write!(f, "-{:?}", -a.offset()),
        UnitConverter::Add(a) => write!(f, "+{:?}", a.offset()),
        UnitConverter::Log { base } => write!(f, "[log {:?}]", base),
        UnitConverter::Exp { base } => write!(f, "[exp {:?}]", base),
        // The operation applied last to a value is written first.
        UnitConverter::Compound(c) => {
            fmt_operations(f, c.second())?;
            fmt_operations(f, c.first())
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Base(b) => f.write_str(&b.symbol),
            Unit::Transformed(tf) => match &tf.symbol {
                Some(symbol) => f.write_str(symbol),
                None => {
                    fmt_grouped(f, &tf.parent)?;
                    fmt_operations(f, &tf.to_parent)
                }
            },
            Unit::Product(p) => fmt::Display::fmt(p.as_ref(), f),
            Unit::Compound(c) => fmt::Display::fmt(c.as_ref(), f),
        }
    }
}

impl Mul for &Unit {
    type Output = Unit;

    fn mul(self, rhs: &Unit) -> Unit {
        self.times(rhs)
    }
}

impl Div for &Unit {
    type Output = Unit;

    fn div(self, rhs: &Unit) -> Unit {
        self.divide(rhs)
    }
}

impl std::str::FromStr for Unit {
    type Err = UnitParseError;

    /// Parses a unit expression against the standard catalog.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnitCatalog::standard().parse(s)
    }
}

impl<'de> Deserialize<'de> for Unit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        UnitCatalog::standard()
            .parse(&s)
            .map_err(serde::de::Error::custom)
    }
}

impl Serialize for Unit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{assert_float_eq, unit};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_one_is_empty_product() {
        assert!(Unit::one().is_one());
        assert_eq!(Unit::one().to_string(), "1");
        assert_eq!(Unit::one().standard_unit().unwrap(), Unit::one());
    }

    #[test]
    fn test_base_equality_by_symbol() {
        assert_eq!(Unit::base("m"), Unit::base("m"));
        assert_ne!(Unit::base("m"), Unit::base("s"));
    }

    #[test]
    fn test_transform_folds_converters() {
        let m = Unit::base("m");
        let km = m.times_factor(1000).unwrap();
        let back = km.divide_factor(1000).unwrap();
        assert_eq!(back, m);

        let mm = km.divide_factor(1_000_000).unwrap();
        match &mm {
            Unit::Transformed(tf) => {
                assert_eq!(*tf.parent(), m);
                assert_eq!(*tf.to_parent(), UnitConverter::rational(1, 1000).unwrap());
            }
            other => panic!("Expected transformed unit, got {:?}", other),
        }
    }

    #[test]
    fn test_label_is_ignored_by_equality() {
        let m = Unit::base("m");
        let km = m.times_factor(1000).unwrap();
        let labeled = km.labeled("km");
        assert_eq!(km, labeled);
        assert_eq!(km.structural_hash(), labeled.structural_hash());
        assert_eq!(labeled.to_string(), "km");
        assert_eq!(km.to_string(), "m*1000");
    }

    #[test]
    fn test_converter_to_through_standard_unit() {
        let m = Unit::base("m");
        let km = m.times_factor(1000).unwrap();
        let cm = m.divide_factor(100).unwrap();
        let c = km.converter_to(&cm).unwrap();
        assert_eq!(c, UnitConverter::rational(100_000, 1).unwrap());
        assert_eq!(km.converter_to(&km).unwrap(), UnitConverter::Identity);
    }

    #[test]
    fn test_incompatible_units() {
        let err = Unit::base("m").converter_to(&Unit::base("s")).unwrap_err();
        assert_eq!(
            err,
            ConversionError::Incompatible {
                from: "m".to_string(),
                to: "s".to_string()
            }
        );
    }

    #[test]
    fn test_offset_unit_conversion() {
        let kelvin = Unit::base("K");
        let celsius = kelvin.plus(273.15).unwrap();
        let c = celsius.converter_to(&kelvin).unwrap();
        assert_float_eq(c.convert(0.0), 273.15, 1e-12);
        assert_float_eq(c.inverse().convert(273.15), 0.0, 1e-12);
        assert_eq!(celsius.to_string(), "K+273.15");
    }

    #[test]
    fn test_root_errors_and_negatives() {
        let m = Unit::base("m");
        assert_eq!(m.root(0).unwrap_err(), ConversionError::ZeroRoot);
        let area = m.pow(2);
        assert_eq!(area.root(2).unwrap(), m);
        assert_eq!(area.root(-2).unwrap(), Unit::one().divide(&m));
        assert_eq!(m.pow(0), Unit::one());
        assert_eq!(m.pow(-1), Unit::one().divide(&m));
    }

    #[test]
    fn test_operators() {
        let m = Unit::base("m");
        let s = Unit::base("s");
        assert_eq!(&m / &s, m.divide(&s));
        assert_eq!(&(&m / &s) * &s, m);
    }

    #[test]
    fn test_is_compatible() {
        assert!(unit("km/h").is_compatible(&unit("m/s")));
        assert!(unit("J").is_compatible(&unit("N*m")));
        assert!(!unit("J").is_compatible(&unit("W")));
        assert!(unit("°C").is_compatible(&unit("K")));
        assert!(unit("kg*m/s^2").is_standard_unit());
        assert!(!unit("km").is_standard_unit());
    }
}

//! # Unit Converters
//!
//! A [`UnitConverter`] is a pure, immutable function over real numbers used to
//! move a numeric value from one unit's scale to another's. Converters form a
//! small closed algebra: any two converters can be concatenated, and every
//! converter has an inverse computed algebraically.
//!
//! ## Variants
//!
//! | Variant | Function | Linear |
//! |---------|----------|--------|
//! | `Identity` | `x` | yes |
//! | `Rational` | `x * dividend / divisor` | yes |
//! | `Multiply` | `x * factor` | yes |
//! | `Add` | `x + offset` | no |
//! | `Log` | `ln(x) / ln(base)` | no |
//! | `Exp` | `base^x` | no |
//! | `Compound` | `second(first(x))` | if both operands are |
//!
//! Linearity here means `f(a + b) == f(a) + f(b)`, which is why an additive
//! offset is *not* linear: offset units (e.g. degree Celsius) cannot take part
//! in multiplicative unit products.
//!
//! ## Invariants
//!
//! The constructors never produce a `Rational`, `Multiply` or `Add` converter
//! that represents the identity; such requests collapse to
//! [`UnitConverter::Identity`]. Factors, offsets and bases are always finite
//! and factors have a finite reciprocal, which makes structural equality
//! total and inversion exact in range.
//!
//! ## Examples
//!
//! ```rust
//! use measure::UnitConverter;
//!
//! let kilo = UnitConverter::rational(1000, 1).unwrap();
//! assert_eq!(kilo.convert(1.0), 1000.0);
//!
//! let milli = kilo.inverse();
//! assert_eq!(milli.concatenate(&kilo), UnitConverter::Identity);
//! ```

use std::hash::{Hash, Hasher};

use thiserror::Error;

/// Errors raised by the converter algebra and by unit conversion resolution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// The two units do not share a standard unit.
    #[error("{from} is not compatible with {to}")]
    Incompatible { from: String, to: String },

    /// A product unit holds a unit whose conversion to its standard unit is
    /// not linear, so it cannot be folded into a multiplicative chain.
    #[error("{unit} is non-linear, cannot convert")]
    NonLinear { unit: String },

    /// A product unit holds a non-standard unit raised to a fractional power.
    #[error("{unit} holds a base unit with fractional exponent")]
    FractionalExponent { unit: String },

    /// A product exponent does not fit an `i32`.
    #[error("Exponent of {unit} is out of range")]
    ExponentOverflow { unit: String },

    /// `root(0)` is undefined.
    #[error("Root's order of zero")]
    ZeroRoot,

    /// A rational converter was requested with a zero divisor.
    #[error("Rational converter divisor cannot be zero")]
    ZeroDivisor,

    /// The factor, offset or base is not usable (zero, non-finite, ...).
    #[error("Invalid converter factor: {0}")]
    InvalidFactor(f64),
}

/// Exact multiply-then-divide converter.
///
/// Always stored reduced, with a positive divisor, a dividend other than
/// `i64::MIN` (so both negate) and a ratio different from one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RationalConverter {
    dividend: i64,
    divisor: i64,
}

impl RationalConverter {
    pub fn dividend(&self) -> i64 {
        self.dividend
    }

    pub fn divisor(&self) -> i64 {
        self.divisor
    }

    /// The ratio as a floating factor.
    pub fn factor(&self) -> f64 {
        self.dividend as f64 / self.divisor as f64
    }

    fn convert(&self, x: f64) -> f64 {
        x * self.dividend as f64 / self.divisor as f64
    }

    fn inverse(&self) -> UnitConverter {
        if self.dividend < 0 {
            UnitConverter::Rational(RationalConverter {
                dividend: -self.divisor,
                divisor: -self.dividend,
            })
        } else {
            UnitConverter::Rational(RationalConverter {
                dividend: self.divisor,
                divisor: self.dividend,
            })
        }
    }

    fn concatenate(&self, other: &RationalConverter) -> UnitConverter {
        // Cross-reduce first to keep the products small.
        let g1 = gcd(self.dividend, other.divisor);
        let g2 = gcd(other.dividend, self.divisor);
        let dividend = (self.dividend / g1).checked_mul(other.dividend / g2);
        let divisor = (self.divisor / g2).checked_mul(other.divisor / g1);
        match (dividend, divisor) {
            (Some(dividend), Some(divisor)) => UnitConverter::reduced_rational(dividend, divisor)
                .unwrap_or_else(|| UnitConverter::product_of_factors(self.factor(), other.factor())),
            // i64 overflow, fall back to a floating factor.
            _ => UnitConverter::product_of_factors(self.factor(), other.factor()),
        }
    }
}

/// Floating scale converter, used when no exact rational form is available.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiplyConverter {
    factor: f64,
}

impl MultiplyConverter {
    pub fn factor(&self) -> f64 {
        self.factor
    }
}

/// Additive offset converter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AddConverter {
    offset: f64,
}

impl AddConverter {
    pub fn offset(&self) -> f64 {
        self.offset
    }
}

/// Chained converter: `second(first(x))`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundConverter {
    first: Box<UnitConverter>,
    second: Box<UnitConverter>,
}

impl CompoundConverter {
    /// The converter applied first.
    pub fn first(&self) -> &UnitConverter {
        &self.first
    }

    /// The converter applied last.
    pub fn second(&self) -> &UnitConverter {
        &self.second
    }
}

/// A pure, composable value transformation between two unit scales.
#[derive(Debug, Clone, PartialEq)]
pub enum UnitConverter {
    Identity,
    Rational(RationalConverter),
    Multiply(MultiplyConverter),
    Add(AddConverter),
    Log { base: f64 },
    Exp { base: f64 },
    Compound(CompoundConverter),
}

// Factors, offsets and bases are finite by construction, and factors stay
// finite when inverted.
impl Eq for UnitConverter {}

impl Hash for UnitConverter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            UnitConverter::Identity => {}
            UnitConverter::Rational(r) => r.hash(state),
            UnitConverter::Multiply(m) => m.factor.to_bits().hash(state),
            UnitConverter::Add(a) => a.offset.to_bits().hash(state),
            UnitConverter::Log { base } | UnitConverter::Exp { base } => base.to_bits().hash(state),
            UnitConverter::Compound(c) => {
                c.first.hash(state);
                c.second.hash(state);
            }
        }
    }
}

impl UnitConverter {
    /// Exact `x * dividend / divisor` converter.
    ///
    /// The ratio is reduced and its sign carried by the dividend; a ratio of
    /// one yields [`UnitConverter::Identity`].
    ///
    /// # Errors
    ///
    /// [`ConversionError::ZeroDivisor`] for a zero divisor and
    /// [`ConversionError::InvalidFactor`] for a zero (non-invertible) ratio or
    /// one whose reduced dividend is `i64::MIN`.
    pub fn rational(dividend: i64, divisor: i64) -> Result<Self, ConversionError> {
        if divisor == 0 {
            return Err(ConversionError::ZeroDivisor);
        }
        if dividend == 0 {
            return Err(ConversionError::InvalidFactor(0.0));
        }
        let (dividend, divisor) = if divisor < 0 {
            match (dividend.checked_neg(), divisor.checked_neg()) {
                (Some(dividend), Some(divisor)) => (dividend, divisor),
                _ => return Err(ConversionError::InvalidFactor(dividend as f64 / divisor as f64)),
            }
        } else {
            (dividend, divisor)
        };
        Self::reduced_rational(dividend, divisor)
            .ok_or(ConversionError::InvalidFactor(dividend as f64 / divisor as f64))
    }

    /// Floating `x * factor` converter.
    ///
    /// # Errors
    ///
    /// [`ConversionError::InvalidFactor`] unless both `factor` and its
    /// reciprocal are finite and non-zero.
    pub fn multiply(factor: f64) -> Result<Self, ConversionError> {
        if !is_invertible(factor) {
            return Err(ConversionError::InvalidFactor(factor));
        }
        Ok(Self::scale(factor))
    }

    /// `x + offset` converter.
    pub fn add(offset: f64) -> Result<Self, ConversionError> {
        if !offset.is_finite() {
            return Err(ConversionError::InvalidFactor(offset));
        }
        if offset == 0.0 {
            return Ok(UnitConverter::Identity);
        }
        Ok(UnitConverter::Add(AddConverter { offset }))
    }

    /// Logarithmic converter `ln(x) / ln(base)`.
    pub fn log(base: f64) -> Result<Self, ConversionError> {
        Self::check_base(base)?;
        Ok(UnitConverter::Log { base })
    }

    /// Exponential converter `base^x`.
    pub fn exp(base: f64) -> Result<Self, ConversionError> {
        Self::check_base(base)?;
        Ok(UnitConverter::Exp { base })
    }

    fn check_base(base: f64) -> Result<(), ConversionError> {
        if !base.is_finite() || base <= 0.0 || base == 1.0 {
            return Err(ConversionError::InvalidFactor(base));
        }
        Ok(())
    }

    /// Infallible form of [`UnitConverter::rational`] for known-good constants.
    pub(crate) fn ratio(dividend: i64, divisor: i64) -> Self {
        debug_assert!(dividend != 0 && divisor > 0);
        Self::reduced_rational(dividend, divisor)
            .unwrap_or_else(|| Self::scale(dividend as f64 / divisor as f64))
    }

    /// Infallible form of [`UnitConverter::add`] for known-good constants.
    pub(crate) fn offset(offset: f64) -> Self {
        debug_assert!(offset.is_finite());
        if offset == 0.0 {
            UnitConverter::Identity
        } else {
            UnitConverter::Add(AddConverter { offset })
        }
    }

    /// Builds a rational converter from a positive divisor, reducing it.
    /// `None` when the reduced dividend is `i64::MIN`.
    fn reduced_rational(dividend: i64, divisor: i64) -> Option<Self> {
        let g = gcd(dividend, divisor);
        let (dividend, divisor) = (dividend / g, divisor / g);
        if dividend == i64::MIN {
            None
        } else if dividend == divisor {
            Some(UnitConverter::Identity)
        } else {
            Some(UnitConverter::Rational(RationalConverter { dividend, divisor }))
        }
    }

    /// `x * a * b`, as one scale when `a * b` stays invertible in `f64`,
    /// otherwise as a chain of both.
    fn product_of_factors(a: f64, b: f64) -> Self {
        let factor = a * b;
        if is_invertible(factor) {
            Self::scale(factor)
        } else {
            UnitConverter::Compound(CompoundConverter {
                first: Box::new(Self::scale(b)),
                second: Box::new(Self::scale(a)),
            })
        }
    }

    /// Builds a floating scale from an already validated factor.
    fn scale(factor: f64) -> Self {
        if factor == 1.0 {
            UnitConverter::Identity
        } else {
            UnitConverter::Multiply(MultiplyConverter { factor })
        }
    }

    /// Applies this converter to `x`.
    pub fn convert(&self, x: f64) -> f64 {
        match self {
            UnitConverter::Identity => x,
            UnitConverter::Rational(r) => r.convert(x),
            UnitConverter::Multiply(m) => x * m.factor,
            UnitConverter::Add(a) => x + a.offset,
            UnitConverter::Log { base } => x.ln() / base.ln(),
            UnitConverter::Exp { base } => (base.ln() * x).exp(),
            UnitConverter::Compound(c) => c.second.convert(c.first.convert(x)),
        }
    }

    /// Returns the converter undoing this one.
    pub fn inverse(&self) -> UnitConverter {
        match self {
            UnitConverter::Identity => UnitConverter::Identity,
            UnitConverter::Rational(r) => r.inverse(),
            UnitConverter::Multiply(m) => Self::scale(1.0 / m.factor),
            UnitConverter::Add(a) => UnitConverter::Add(AddConverter { offset: -a.offset }),
            UnitConverter::Log { base } => UnitConverter::Exp { base: *base },
            UnitConverter::Exp { base } => UnitConverter::Log { base: *base },
            UnitConverter::Compound(c) => UnitConverter::Compound(CompoundConverter {
                first: Box::new(c.second.inverse()),
                second: Box::new(c.first.inverse()),
            }),
        }
    }

    /// Returns `self ∘ other`: the resulting converter applies `other` first,
    /// then `self`.
    pub fn concatenate(&self, other: &UnitConverter) -> UnitConverter {
        use UnitConverter::*;

        match (self, other) {
            (Identity, c) | (c, Identity) => c.clone(),
            (Rational(a), Rational(b)) => a.concatenate(b),
            (Multiply(a), Multiply(b)) => Self::product_of_factors(a.factor, b.factor),
            (Rational(r), Multiply(m)) => Self::product_of_factors(r.factor(), m.factor),
            (Multiply(m), Rational(r)) => Self::product_of_factors(m.factor, r.factor()),
            (Add(a), Add(b)) if (a.offset + b.offset).is_finite() => {
                let offset = a.offset + b.offset;
                if offset == 0.0 {
                    Identity
                } else {
                    Add(AddConverter { offset })
                }
            }
            _ => Compound(CompoundConverter {
                first: Box::new(other.clone()),
                second: Box::new(self.clone()),
            }),
        }
    }

    /// Whether `f(a + b) == f(a) + f(b)` holds for this converter.
    pub fn is_linear(&self) -> bool {
        match self {
            UnitConverter::Identity | UnitConverter::Rational(_) | UnitConverter::Multiply(_) => {
                true
            }
            UnitConverter::Add(_) | UnitConverter::Log { .. } | UnitConverter::Exp { .. } => false,
            UnitConverter::Compound(c) => c.first.is_linear() && c.second.is_linear(),
        }
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, UnitConverter::Identity)
    }
}

fn is_invertible(factor: f64) -> bool {
    factor.is_finite() && factor != 0.0 && factor.recip().is_finite()
}

/// Euclid's algorithm; always non-negative, never zero for a non-zero input.
fn gcd(m: i64, n: i64) -> i64 {
    let (mut m, mut n) = (m.unsigned_abs(), n.unsigned_abs());
    while n != 0 {
        (m, n) = (n, m % n);
    }
    // 2^63 only comes out of gcd(i64::MIN, 0 or i64::MIN).
    i64::try_from(m).unwrap_or(1).max(1)
}

//! Canonical products of rational unit powers.
//!
//! A product holds each distinct unit at most once, with an exponent
//! `pow/root` reduced by their gcd and never zero. Products that reduce to no
//! element collapse to [`Unit::one`]; products of a single unit at exponent
//! one collapse to that unit.

use std::{fmt, sync::Arc, sync::OnceLock};

use crate::converter::{ConversionError, UnitConverter};

use super::{Unit, fmt_grouped};

/// One factor of a [`ProductUnit`]: `unit^(pow/root)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    unit: Unit,
    pow: i32,
    root: i32,
}

impl Element {
    fn new(unit: Unit, pow: i32, root: i32) -> Self {
        Element { unit, pow, root }
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    /// Numerator of the exponent; never zero.
    pub fn pow(&self) -> i32 {
        self.pow
    }

    /// Denominator of the exponent; always positive.
    pub fn root(&self) -> i32 {
        self.root
    }
}

/// A canonical product of [`Element`]s.
pub struct ProductUnit {
    elements: Vec<Element>,
    hash: OnceLock<u64>,
}

impl ProductUnit {
    pub(crate) fn empty() -> Self {
        Self::from_elements(Vec::new())
    }

    fn from_elements(elements: Vec<Element>) -> Self {
        ProductUnit {
            elements,
            hash: OnceLock::new(),
        }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The element at `index`, in construction order.
    pub fn get(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    fn has_only_standard_units(&self) -> bool {
        self.elements.iter().all(|e| e.unit.is_standard_unit())
    }

    pub(crate) fn standard_unit(&self, this: &Unit) -> Result<Unit, ConversionError> {
        if self.has_only_standard_units() {
            return Ok(this.clone());
        }
        self.elements.iter().try_fold(Unit::one(), |acc, e| {
            let standard = raised(
                &e.unit.standard_unit()?,
                i64::from(e.pow),
                i64::from(e.root),
            )?;
            product_of(&acc, &standard)
        })
    }

    pub(crate) fn to_standard_unit(&self) -> Result<UnitConverter, ConversionError> {
        if self.has_only_standard_units() {
            return Ok(UnitConverter::Identity);
        }
        let mut converter = UnitConverter::Identity;
        for e in &self.elements {
            let mut element_converter = e.unit.to_standard_unit()?;
            if !element_converter.is_linear() {
                return Err(ConversionError::NonLinear {
                    unit: e.unit.to_string(),
                });
            }
            if e.root != 1 {
                return Err(ConversionError::FractionalExponent {
                    unit: e.unit.to_string(),
                });
            }
            if e.pow < 0 {
                element_converter = element_converter.inverse();
            }
            converter = converter.concatenate(&repeated(&element_converter, e.pow.unsigned_abs())?);
        }
        Ok(converter)
    }

    /// Order-independent hash, cached on first use.
    pub(crate) fn structural_hash(&self) -> u64 {
        *self.hash.get_or_init(|| {
            self.elements.iter().fold(0u64, |acc, e| {
                let weight = i64::from(e.pow) * 3 - i64::from(e.root) * 2;
                acc.wrapping_add(e.unit.structural_hash().wrapping_mul(weight as u64))
            })
        })
    }
}

impl PartialEq for ProductUnit {
    fn eq(&self, other: &Self) -> bool {
        self.elements.len() == other.elements.len()
            && self.elements.iter().all(|e| {
                other
                    .elements
                    .iter()
                    .any(|o| o.unit == e.unit && o.pow == e.pow && o.root == e.root)
            })
    }
}

impl Eq for ProductUnit {}

impl fmt::Debug for ProductUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.elements).finish()
    }
}

fn fmt_element(f: &mut fmt::Formatter<'_>, unit: &Unit, pow: i32, root: i32) -> fmt::Result {
    fmt_grouped(f, unit)?;
    match (pow, root) {
        (1, 1) => Ok(()),
        (pow, 1) => write!(f, "^{}", pow),
        (pow, root) => write!(f, "^({}/{})", pow, root),
    }
}

impl fmt::Display for ProductUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut numerator = self.elements.iter().filter(|e| e.pow > 0).peekable();
        if numerator.peek().is_none() {
            f.write_str("1")?;
        }
        for (i, e) in numerator.enumerate() {
            if i > 0 {
                f.write_str("*")?;
            }
            fmt_element(f, &e.unit, e.pow, e.root)?;
        }
        for e in self.elements.iter().filter(|e| e.pow < 0) {
            f.write_str("/")?;
            fmt_element(f, &e.unit, -e.pow, e.root)?;
        }
        Ok(())
    }
}

fn gcd(m: i64, n: i64) -> i64 {
    let (mut m, mut n) = (m.unsigned_abs(), n.unsigned_abs());
    while n != 0 {
        (m, n) = (n, m % n);
    }
    i64::try_from(m).unwrap_or(1).max(1)
}

/// A linear `converter` applied `n` times, by repeated squaring.
///
/// Scales that no longer fold into a single factor are out of `f64` range.
fn repeated(converter: &UnitConverter, n: u32) -> Result<UnitConverter, ConversionError> {
    let (mut result, mut square, mut n) = (UnitConverter::Identity, converter.clone(), n);
    while n > 0 {
        if matches!(square, UnitConverter::Compound(_)) {
            return Err(ConversionError::InvalidFactor(square.convert(1.0)));
        }
        if n & 1 == 1 {
            result = result.concatenate(&square);
        }
        n >>= 1;
        if n > 0 {
            square = square.concatenate(&square);
        }
    }
    Ok(result)
}

/// The elements a unit contributes to a product.
fn elements_of(unit: &Unit) -> Vec<Element> {
    match unit {
        Unit::Product(p) => p.elements.clone(),
        other => vec![Element::new(other.clone(), 1, 1)],
    }
}

/// Reduces `unit^(pow/root)` by the gcd, for a positive `root`.
fn reduced(unit: &Unit, pow: i64, root: i64) -> Result<Element, ConversionError> {
    let g = gcd(pow, root);
    match (i32::try_from(pow / g), i32::try_from(root / g)) {
        (Ok(pow), Ok(root)) => Ok(Element::new(unit.clone(), pow, root)),
        _ => Err(ConversionError::ExponentOverflow {
            unit: unit.to_string(),
        }),
    }
}

/// Merges two element lists into a canonical unit, the right exponents
/// multiplied by `sign` first.
///
/// Exponents of units present on both sides are added; zero exponents are
/// dropped. Left elements keep their order, followed by right-only ones.
fn combine(left: &[Element], right: &[Element], sign: i64) -> Result<Unit, ConversionError> {
    let mut result = Vec::with_capacity(left.len() + right.len());
    for l in left {
        // i32 exponents keep these products and their sum within i64.
        let (pow, root) = match right.iter().find(|r| r.unit == l.unit) {
            Some(r) => (
                i64::from(l.pow) * i64::from(r.root) + sign * i64::from(r.pow) * i64::from(l.root),
                i64::from(l.root) * i64::from(r.root),
            ),
            None => (i64::from(l.pow), i64::from(l.root)),
        };
        if pow != 0 {
            result.push(reduced(&l.unit, pow, root)?);
        }
    }
    for r in right.iter().filter(|r| !left.iter().any(|l| l.unit == r.unit)) {
        result.push(reduced(&r.unit, sign * i64::from(r.pow), i64::from(r.root))?);
    }
    Ok(match result.as_slice() {
        [] => Unit::one(),
        [only] if only.pow == 1 && only.root == 1 => only.unit.clone(),
        _ => Unit::Product(Arc::new(ProductUnit::from_elements(result))),
    })
}

pub(crate) fn product_of(left: &Unit, right: &Unit) -> Result<Unit, ConversionError> {
    combine(&elements_of(left), &elements_of(right), 1)
}

pub(crate) fn quotient_of(dividend: &Unit, divisor: &Unit) -> Result<Unit, ConversionError> {
    combine(&elements_of(dividend), &elements_of(divisor), -1)
}

/// `unit^(pow/root)`, for a non-zero `pow` and a positive `root`, both
/// within the `i32` range.
fn raised(unit: &Unit, pow: i64, root: i64) -> Result<Unit, ConversionError> {
    let elements = elements_of(unit)
        .iter()
        .map(|e| reduced(&e.unit, i64::from(e.pow) * pow, i64::from(e.root) * root))
        .collect::<Result<Vec<_>, _>>()?;
    combine(&elements, &[], 1)
}

/// `unit^n`, for any non-zero `n`.
pub(crate) fn pow_of(unit: &Unit, n: i32) -> Result<Unit, ConversionError> {
    raised(unit, i64::from(n), 1)
}

/// `unit^(1/n)`, for any non-zero `n`; a negative `n` inverts.
pub(crate) fn root_of(unit: &Unit, n: i32) -> Result<Unit, ConversionError> {
    let n = i64::from(n);
    raised(unit, n.signum(), n.abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn m() -> Unit {
        Unit::base("m")
    }

    fn s() -> Unit {
        Unit::base("s")
    }

    fn kg() -> Unit {
        Unit::base("kg")
    }

    #[test]
    fn test_cancellation_collapses_to_bare_unit() {
        let result = m().pow(2).divide(&m());
        assert!(matches!(result, Unit::Base(_)));
        assert_eq!(result, m());
    }

    #[test]
    fn test_full_cancellation_is_one() {
        let velocity = m().divide(&s());
        assert_eq!(velocity.divide(&velocity), Unit::one());
        assert_eq!(m().times(&Unit::one()), m());
    }

    #[test]
    fn test_equality_ignores_order() {
        let a = m().times(&s()).times(&kg());
        let b = kg().times(&s()).times(&m());
        assert_eq!(a, b);
        assert_eq!(a.structural_hash(), b.structural_hash());
    }

    #[test]
    fn test_exponents_are_reduced() {
        let unit = m().pow(4).root(6).unwrap();
        match &unit {
            Unit::Product(p) => {
                assert_eq!(p.len(), 1);
                let e = p.get(0).unwrap();
                assert_eq!((e.pow(), e.root()), (2, 3));
            }
            other => panic!("Expected product unit, got {:?}", other),
        }
        assert_eq!(unit.to_string(), "m^(2/3)");
    }

    #[test]
    fn test_display() {
        let force = kg().times(&m()).divide(&s().pow(2));
        assert_eq!(force.to_string(), "kg*m/s^2");
        assert_eq!(Unit::one().divide(&s()).to_string(), "1/s");
    }

    #[test]
    fn test_display_groups_transformed_elements() {
        let km = m().times_factor(1000).unwrap();
        let per_km = Unit::one().divide(&km);
        assert_eq!(per_km.to_string(), "1/(m*1000)");
        assert_eq!(per_km.divide(&s()).to_string(), "1/(m*1000)/s");
    }

    #[test]
    fn test_standard_unit_of_scaled_product() {
        let km = m().times_factor(1000).unwrap();
        let h = s().times_factor(3600).unwrap();
        let speed = km.divide(&h);
        assert_eq!(speed.standard_unit().unwrap(), m().divide(&s()));
        assert_eq!(
            speed.to_standard_unit().unwrap(),
            UnitConverter::rational(5, 18).unwrap()
        );
    }

    #[test]
    fn test_to_standard_rejects_offset_elements() {
        let celsius = Unit::base("K").plus(273.15).unwrap();
        let per_celsius = Unit::one().divide(&celsius);
        assert!(matches!(
            per_celsius.to_standard_unit(),
            Err(ConversionError::NonLinear { .. })
        ));
    }

    #[test]
    fn test_to_standard_rejects_fractional_scaled_elements() {
        let km = m().times_factor(1000).unwrap();
        let root = km.root(2).unwrap();
        assert!(matches!(
            root.to_standard_unit(),
            Err(ConversionError::FractionalExponent { .. })
        ));
    }

    #[test]
    fn test_standard_products_convert_by_identity() {
        let root = m().root(2).unwrap();
        assert!(root.is_standard_unit());
        assert_eq!(root.to_standard_unit().unwrap(), UnitConverter::Identity);
    }

    #[test]
    fn test_exponent_overflow_is_an_error() {
        let huge = m().pow(i32::MAX);
        assert!(matches!(
            huge.checked_times(&m()),
            Err(ConversionError::ExponentOverflow { .. })
        ));
        assert_eq!(huge.checked_divide(&m()).unwrap(), m().pow(i32::MAX - 1));
        assert!(matches!(
            m().pow(65536).checked_pow(65536),
            Err(ConversionError::ExponentOverflow { .. })
        ));
        assert!(matches!(
            m().pow(i32::MIN).checked_pow(-1),
            Err(ConversionError::ExponentOverflow { .. })
        ));
    }

    #[test]
    #[should_panic(expected = "unit product overflow")]
    fn test_times_panics_on_exponent_overflow() {
        m().pow(i32::MAX).times(&m());
    }

    #[test]
    fn test_root_of_minimum_order() {
        assert!(matches!(
            m().root(i32::MIN),
            Err(ConversionError::ExponentOverflow { .. })
        ));
        let inverse = m().pow(2).root(i32::MIN).unwrap();
        assert_eq!(inverse, m().root(1 << 30).unwrap().pow(-1));
    }

    #[test]
    fn test_to_standard_rejects_out_of_range_scale() {
        let km = m().times_factor(1000).unwrap();
        assert!(matches!(
            km.pow(i32::MAX).to_standard_unit(),
            Err(ConversionError::InvalidFactor(_))
        ));
        assert_eq!(
            km.pow(3).to_standard_unit().unwrap(),
            UnitConverter::rational(1_000_000_000, 1).unwrap()
        );
    }
}

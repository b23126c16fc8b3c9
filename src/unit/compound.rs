use std::fmt;

use crate::converter::ConversionError;

use super::Unit;

/// A mixed-radix unit such as `h:min` or `ft:in`.
///
/// Only used for presentation: values are always held in the low unit, to
/// which the standard unit and converters delegate. Equality is ordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundUnit {
    high: Unit,
    low: Unit,
}

impl CompoundUnit {
    pub(crate) fn new(high: Unit, low: Unit) -> Result<Self, ConversionError> {
        if high.standard_unit()? != low.standard_unit()? {
            return Err(ConversionError::Incompatible {
                from: high.to_string(),
                to: low.to_string(),
            });
        }
        Ok(CompoundUnit { high, low })
    }

    pub fn high(&self) -> &Unit {
        &self.high
    }

    pub fn low(&self) -> &Unit {
        &self.low
    }
}

impl fmt::Display for CompoundUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.high)?;
        if matches!(self.low, Unit::Compound(_)) {
            write!(f, "({})", self.low)
        } else {
            write!(f, "{}", self.low)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::UnitConverter;

    fn hour_minute() -> (Unit, Unit) {
        let s = Unit::base("s");
        let h = s.times_factor(3600).unwrap().labeled("h");
        let min = s.times_factor(60).unwrap().labeled("min");
        (h, min)
    }

    #[test]
    fn test_compound_delegates_to_low() {
        let (h, min) = hour_minute();
        let hm = h.compound(&min).unwrap();
        assert_eq!(hm.standard_unit().unwrap(), Unit::base("s"));
        assert_eq!(
            hm.to_standard_unit().unwrap(),
            UnitConverter::rational(60, 1).unwrap()
        );
        assert_eq!(hm.to_string(), "h:min");
    }

    #[test]
    fn test_compound_requires_compatible_parts() {
        let (h, _) = hour_minute();
        let err = h.compound(&Unit::base("m")).unwrap_err();
        assert!(matches!(err, ConversionError::Incompatible { .. }));
    }

    #[test]
    fn test_compound_equality_is_ordered() {
        let (h, min) = hour_minute();
        let hm = h.compound(&min).unwrap();
        let mh = min.compound(&h).unwrap();
        assert_ne!(hm, mh);
        assert_eq!(hm, h.compound(&min).unwrap());
    }
}

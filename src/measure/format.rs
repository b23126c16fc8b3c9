use std::fmt;

use crate::unit::Unit;

/// Writes `value`, held in the low unit of `unit`, split across its
/// high/low parts: 192 in `h:min` is written `3 h 12 min`.
pub(crate) fn write_compound(f: &mut fmt::Formatter<'_>, value: f64, unit: &Unit) -> fmt::Result {
    let Unit::Compound(compound) = unit else {
        return write!(f, "{} {}", value, unit);
    };
    let (high, low) = (compound.high(), compound.low());
    let to_high = low.converter_to(high).map_err(|_| fmt::Error)?;
    let to_low = high.converter_to(low).map_err(|_| fmt::Error)?;

    let high_value = to_high.convert(value).trunc();
    let low_value = value - to_low.convert(high_value);
    write_compound(f, high_value, high)?;
    write!(f, " {} {}", low_value, low)
}

#[cfg(test)]
mod tests {
    use crate::{Measure, quantity::Duration, unit::si};

    #[test]
    fn test_hours_and_minutes() {
        let hm = si::hour().compound(&si::minute()).unwrap();
        let m: Measure<f64, Duration> = Measure::new(192.0, hm);
        assert_eq!(m.to_string(), "3 h 12 min");
    }

    #[test]
    fn test_nested_compound() {
        let hms = si::hour()
            .compound(&si::minute())
            .unwrap()
            .compound(&si::second())
            .unwrap();
        let m: Measure<i64, Duration> = Measure::new(3725, hms);
        assert_eq!(m.to_string(), "1 h 2 min 5 s");
    }

    #[test]
    fn test_negative_values_truncate_towards_zero() {
        let hm = si::hour().compound(&si::minute()).unwrap();
        let m: Measure<f64, Duration> = Measure::new(-90.0, hm);
        assert_eq!(m.to_string(), "-1 h -30 min");
    }
}

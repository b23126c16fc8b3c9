//! Predefined units.
//!
//! | Symbol | Definition        | Aliases        |
//! |--------|-------------------|----------------|
//! | m      |                   | meter, metre   |
//! | kg     |                   | kilogram       |
//! | s      |                   | second, sec    |
//! | A      |                   | ampere         |
//! | K      |                   | kelvin         |
//! | mol    |                   | mole           |
//! | cd     |                   | candela        |
//! | EUR    |                   | €              |
//! | g      | kg/1000           | gram           |
//! | km     | m*1000            |                |
//! | cm     | m/100             |                |
//! | mm     | m/1000            |                |
//! | ft     | m*3048/10000      | foot           |
//! | in     | m*254/10000       | inch           |
//! | mile   | m*1609344/1000    | mi             |
//! | min    | s*60              | minute         |
//! | h      | s*3600            | hour           |
//! | day    | s*86400           |                |
//! | °C     | K+273.15          |                |
//! | Hz     | 1/s               |                |
//! | N      | kg*m/s^2          |                |
//! | Pa     | N/m^2             |                |
//! | J      | N*m               |                |
//! | W      | J/s               |                |
//! | kW     | W*1000            |                |
//! | Wh     | W*h               |                |
//! | kWh    | kW*h              |                |
//! | V      | W/A               |                |
//! | L      | m^3/1000          | liter, litre   |
//! | mph    | mile/h            |                |
//! | kph    | km/h              |                |

use crate::converter::UnitConverter;

use super::Unit;

pub fn meter() -> Unit {
    Unit::base("m")
}

pub fn kilogram() -> Unit {
    Unit::base("kg")
}

pub fn second() -> Unit {
    Unit::base("s")
}

pub fn ampere() -> Unit {
    Unit::base("A")
}

pub fn kelvin() -> Unit {
    Unit::base("K")
}

pub fn mole() -> Unit {
    Unit::base("mol")
}

pub fn candela() -> Unit {
    Unit::base("cd")
}

/// The euro, treated as an independent dimension.
pub fn euro() -> Unit {
    Unit::base("EUR")
}

fn scaled(parent: Unit, dividend: i64, divisor: i64, symbol: &str) -> Unit {
    parent
        .transform(UnitConverter::ratio(dividend, divisor))
        .labeled(symbol)
}

pub fn gram() -> Unit {
    scaled(kilogram(), 1, 1000, "g")
}

pub fn kilometer() -> Unit {
    scaled(meter(), 1000, 1, "km")
}

pub fn centimeter() -> Unit {
    scaled(meter(), 1, 100, "cm")
}

pub fn millimeter() -> Unit {
    scaled(meter(), 1, 1000, "mm")
}

pub fn foot() -> Unit {
    scaled(meter(), 3048, 10000, "ft")
}

pub fn inch() -> Unit {
    scaled(meter(), 254, 10000, "in")
}

/// International mile, exactly 1609.344 m.
pub fn mile() -> Unit {
    scaled(meter(), 1_609_344, 1000, "mile")
}

pub fn minute() -> Unit {
    scaled(second(), 60, 1, "min")
}

pub fn hour() -> Unit {
    scaled(second(), 3600, 1, "h")
}

pub fn day() -> Unit {
    scaled(second(), 86400, 1, "day")
}

pub fn celsius() -> Unit {
    kelvin().transform(UnitConverter::offset(273.15)).labeled("°C")
}

pub fn hertz() -> Unit {
    Unit::one().divide(&second())
}

pub fn newton() -> Unit {
    kilogram().times(&meter()).divide(&second().pow(2))
}

pub fn pascal() -> Unit {
    newton().divide(&meter().pow(2))
}

pub fn joule() -> Unit {
    newton().times(&meter())
}

pub fn watt() -> Unit {
    joule().divide(&second())
}

pub fn kilowatt() -> Unit {
    scaled(watt(), 1000, 1, "kW")
}

pub fn watt_hour() -> Unit {
    watt().times(&hour())
}

pub fn kilowatt_hour() -> Unit {
    kilowatt().times(&hour())
}

pub fn volt() -> Unit {
    watt().divide(&ampere())
}

pub fn liter() -> Unit {
    scaled(meter().pow(3), 1, 1000, "L")
}

pub fn meters_per_second() -> Unit {
    meter().divide(&second())
}

pub fn miles_per_hour() -> Unit {
    mile().divide(&hour())
}

pub fn kilometers_per_hour() -> Unit {
    kilometer().divide(&hour())
}

pub fn euros_per_hour() -> Unit {
    euro().divide(&hour())
}

/// Symbols of every predefined unit, primary symbol first.
pub fn standard_units() -> Vec<(&'static str, Unit)> {
    vec![
        ("m", meter()),
        ("meter", meter()),
        ("metre", meter()),
        ("kg", kilogram()),
        ("kilogram", kilogram()),
        ("s", second()),
        ("second", second()),
        ("sec", second()),
        ("A", ampere()),
        ("ampere", ampere()),
        ("K", kelvin()),
        ("kelvin", kelvin()),
        ("mol", mole()),
        ("mole", mole()),
        ("cd", candela()),
        ("candela", candela()),
        ("EUR", euro()),
        ("€", euro()),
        ("g", gram()),
        ("gram", gram()),
        ("km", kilometer()),
        ("cm", centimeter()),
        ("mm", millimeter()),
        ("ft", foot()),
        ("foot", foot()),
        ("in", inch()),
        ("inch", inch()),
        ("mile", mile()),
        ("mi", mile()),
        ("min", minute()),
        ("minute", minute()),
        ("h", hour()),
        ("hour", hour()),
        ("day", day()),
        ("°C", celsius()),
        ("Hz", hertz()),
        ("N", newton()),
        ("Pa", pascal()),
        ("J", joule()),
        ("W", watt()),
        ("kW", kilowatt()),
        ("Wh", watt_hour()),
        ("kWh", kilowatt_hour()),
        ("V", volt()),
        ("L", liter()),
        ("liter", liter()),
        ("litre", liter()),
        ("mph", miles_per_hour()),
        ("kph", kilometers_per_hour()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_float_eq;

    #[test]
    fn test_derived_standard_units() {
        assert_eq!(
            joule().standard_unit().unwrap(),
            kilogram()
                .times(&meter().pow(2))
                .divide(&second().pow(2))
        );
        assert_eq!(watt_hour().standard_unit().unwrap(), joule());
        assert_eq!(liter().standard_unit().unwrap(), meter().pow(3));
    }

    #[test]
    fn test_kilowatt_hour_in_joules() {
        let c = kilowatt_hour().converter_to(&joule()).unwrap();
        assert_eq!(c, UnitConverter::rational(3_600_000, 1).unwrap());
    }

    #[test]
    fn test_mph_to_meters_per_second() {
        let c = miles_per_hour().converter_to(&meters_per_second()).unwrap();
        assert_eq!(c, UnitConverter::rational(1397, 3125).unwrap());
        assert_float_eq(c.convert(1.0), 0.44704, 1e-12);
    }

    #[test]
    fn test_gram_is_labeled() {
        assert_eq!(gram().to_string(), "g");
        assert_eq!(
            gram().to_standard_unit().unwrap(),
            UnitConverter::rational(1, 1000).unwrap()
        );
    }
}

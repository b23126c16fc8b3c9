//! Quantity kinds.
//!
//! A quantity kind is a zero-sized marker type tagging a
//! [`Measure`](crate::Measure) with what it measures, so that adding a length
//! to a mass is rejected at compile time. The kind carries no runtime data
//! beyond its default unit; the unit actually held by a measure decides its
//! scale.

use std::fmt::Debug;

use crate::unit::{Unit, si};

/// A kind of physical quantity.
pub trait Quantity: Debug + Clone + Copy + PartialEq + Eq + Send + Sync + 'static {
    /// Human readable name of the kind.
    const NAME: &'static str;

    /// The unit measures of this kind use when none is given.
    fn default_unit() -> Unit;
}

macro_rules! quantity {
    ($(#[$meta:meta])* $name:ident, $label:literal, $unit:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name;

        impl Quantity for $name {
            const NAME: &'static str = $label;

            fn default_unit() -> Unit {
                $unit
            }
        }
    };
}

quantity!(
    /// Pure numbers, ratios and counts.
    Dimensionless,
    "dimensionless",
    Unit::one()
);
quantity!(Length, "length", si::meter());
quantity!(Mass, "mass", si::kilogram());
quantity!(Duration, "duration", si::second());
quantity!(Velocity, "velocity", si::meters_per_second());
quantity!(Temperature, "temperature", si::kelvin());
quantity!(ElectricCurrent, "electric current", si::ampere());
quantity!(Energy, "energy", si::joule());
quantity!(Power, "power", si::watt());
quantity!(Money, "money", si::euro());
quantity!(
    /// Money per unit of time, in euros per hour by default.
    MoneyFlow,
    "money flow",
    si::euros_per_hour()
);

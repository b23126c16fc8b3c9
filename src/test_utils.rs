#![cfg(test)]

use crate::{converter::UnitConverter, unit::Unit};

// Helper function to assert floating point equality with tolerance
pub fn assert_float_eq(a: f64, b: f64, tolerance: f64) {
    assert!(
        (a - b).abs() < tolerance,
        "Expected {} to be approximately equal to {} (tolerance: {})",
        a,
        b,
        tolerance
    );
}

/// Asserts both converters agree on every sample, within a relative tolerance.
pub fn assert_converters_agree(a: &UnitConverter, b: &UnitConverter, samples: &[f64]) {
    for &x in samples {
        let (left, right) = (a.convert(x), b.convert(x));
        let tolerance = 1e-9 * left.abs().max(right.abs()).max(1.0);
        assert!(
            (left - right).abs() < tolerance,
            "Converters {:?} and {:?} disagree at {}: {} vs {}",
            a,
            b,
            x,
            left,
            right
        );
    }
}

/// Parse a unit expression against the standard catalog.
pub fn unit(text: &str) -> Unit {
    text.parse()
        .unwrap_or_else(|e| panic!("Failed to parse unit '{}': {}", text, e))
}

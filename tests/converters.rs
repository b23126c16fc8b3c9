//! Converter algebra properties.

use measure::UnitConverter;
use proptest::prelude::*;

fn assert_agree(a: &UnitConverter, b: &UnitConverter, x: f64) -> Result<(), TestCaseError> {
    let (left, right) = (a.convert(x), b.convert(x));
    let tolerance = 1e-9 * left.abs().max(right.abs()).max(1.0);
    prop_assert!(
        (left - right).abs() < tolerance,
        "{:?} and {:?} disagree at {}: {} vs {}",
        a,
        b,
        x,
        left,
        right
    );
    Ok(())
}

/// Linear and affine converters, defined over every finite input.
fn affine() -> impl Strategy<Value = UnitConverter> {
    prop_oneof![
        Just(UnitConverter::Identity),
        (1i64..10_000, 1i64..10_000).prop_map(|(d, v)| UnitConverter::rational(d, v).unwrap()),
        (-10_000i64..-1, 1i64..10_000).prop_map(|(d, v)| UnitConverter::rational(d, v).unwrap()),
        (0.001f64..1000.0).prop_map(|f| UnitConverter::multiply(f).unwrap()),
        (-500.0f64..500.0).prop_map(|o| UnitConverter::add(o).unwrap()),
    ]
}

proptest! {
    #[test]
    fn prop_concatenate_is_associative(
        f in affine(),
        g in affine(),
        h in affine(),
        x in -1.0e6f64..1.0e6,
    ) {
        let left = f.concatenate(&g).concatenate(&h);
        let right = f.concatenate(&g.concatenate(&h));
        assert_agree(&left, &right, x)?;
    }

    #[test]
    fn prop_concatenate_applies_right_first(
        f in affine(),
        g in affine(),
        x in -1.0e6f64..1.0e6,
    ) {
        let chained = f.concatenate(&g);
        let expected = f.convert(g.convert(x));
        let actual = chained.convert(x);
        prop_assert!((expected - actual).abs() < 1e-9 * expected.abs().max(1.0));
        prop_assert_eq!(chained.is_linear(), f.is_linear() && g.is_linear());
    }

    #[test]
    fn prop_inverse_round_trip(c in affine(), x in -1.0e6f64..1.0e6) {
        let back = c.inverse().convert(c.convert(x));
        prop_assert!((back - x).abs() < 1e-9 * x.abs().max(1.0), "{:?} at {}: {}", c, x, back);
    }

    #[test]
    fn prop_chain_inverse_round_trip(
        f in affine(),
        g in affine(),
        x in -1.0e6f64..1.0e6,
    ) {
        let chained = f.concatenate(&g);
        let back = chained.inverse().convert(chained.convert(x));
        prop_assert!((back - x).abs() < 1e-8 * x.abs().max(1.0));
    }

    #[test]
    fn prop_log_exp_inverse(base in 1.5f64..100.0, x in 0.001f64..1.0e6, y in -20.0f64..20.0) {
        let log = UnitConverter::log(base).unwrap();
        let back = log.inverse().convert(log.convert(x));
        prop_assert!((back - x).abs() < 1e-9 * x.max(1.0));

        let exp = UnitConverter::exp(base).unwrap();
        let back = exp.inverse().convert(exp.convert(y));
        prop_assert!((back - y).abs() < 1e-9 * y.abs().max(1.0));
    }

    #[test]
    fn prop_rationals_stay_exact(d1 in 1i64..1000, v1 in 1i64..1000, d2 in 1i64..1000, v2 in 1i64..1000) {
        let a = UnitConverter::rational(d1, v1).unwrap();
        let b = UnitConverter::rational(d2, v2).unwrap();
        let chained = a.concatenate(&b);
        prop_assert!(matches!(chained, UnitConverter::Identity | UnitConverter::Rational(_)));
        prop_assert_eq!(chained, UnitConverter::rational(d1 * d2, v1 * v2).unwrap());
    }
}

#[test]
fn test_rational_identity_collapses_after_concatenation() {
    let a = UnitConverter::rational(3, 7).unwrap();
    assert_eq!(a.concatenate(&a.inverse()), UnitConverter::Identity);
}

#[test]
fn test_multiply_of_rational_is_multiply() {
    let a = UnitConverter::rational(1, 4).unwrap();
    let b = UnitConverter::multiply(2.0).unwrap();
    assert_eq!(a.concatenate(&b), UnitConverter::multiply(0.5).unwrap());
}

#[test]
fn test_offset_is_not_linear() {
    let add = UnitConverter::add(1.0).unwrap();
    let scale = UnitConverter::rational(2, 1).unwrap();
    assert!(!add.is_linear());
    assert!(!scale.concatenate(&add).is_linear());
    assert!(!UnitConverter::log(10.0).unwrap().is_linear());
}

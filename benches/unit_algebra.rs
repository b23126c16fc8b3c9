//! Performance benchmarks for unit algebra and measure conversion.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use measure::quantity::Velocity;
use measure::unit::si;
use measure::{Decimal, MathContext, Measure, Unit};

fn bench_build_products(c: &mut Criterion) {
    let kg = si::kilogram();
    let m = si::meter();
    let s = si::second();

    c.bench_function("build_newton", |b| {
        b.iter(|| black_box(&kg).times(black_box(&m)).divide(&black_box(&s).pow(2)))
    });
    c.bench_function("cancel_product", |b| {
        let n = si::newton();
        b.iter(|| black_box(&n).times(&m).divide(&m))
    });
}

fn bench_converter_to(c: &mut Criterion) {
    let mph = si::miles_per_hour();
    let kmh = si::kilometers_per_hour();
    let kwh = si::kilowatt_hour();
    let joule = si::joule();

    c.bench_function("converter_mph_kmh", |b| {
        b.iter(|| black_box(&mph).converter_to(black_box(&kmh)))
    });
    c.bench_function("converter_kwh_joule", |b| {
        b.iter(|| black_box(&kwh).converter_to(black_box(&joule)))
    });
}

fn bench_measure_conversion(c: &mut Criterion) {
    let mph = si::miles_per_hour();
    let double: Measure<f64, Velocity> = Measure::new(299_792_458.0, si::meters_per_second());
    let decimal: Measure<Decimal, Velocity> = Measure::new(
        Decimal::from(299_792_458i64),
        si::meters_per_second(),
    );

    c.bench_function("convert_f64", |b| {
        b.iter(|| black_box(&double).to(black_box(&mph)))
    });
    c.bench_function("convert_decimal128", |b| {
        b.iter(|| black_box(&decimal).to_with_context(black_box(&mph), &MathContext::DECIMAL128))
    });
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_unit", |b| {
        b.iter(|| black_box("kg*m^2/s^3").parse::<Unit>())
    });
    c.bench_function("parse_measure", |b| {
        b.iter(|| black_box("670616629.38 mile/h").parse::<Measure<Decimal, Velocity>>())
    });
}

criterion_group!(
    benches,
    bench_build_products,
    bench_converter_to,
    bench_measure_conversion,
    bench_parse
);
criterion_main!(benches);

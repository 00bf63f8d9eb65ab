use criterion::{criterion_group, criterion_main, Criterion};
use scancal_core::calibrator::Calibrator;
use scancal_core::Size;
use std::hint::black_box;

fn identity_codes(cal: &Calibrator) -> Vec<u32> {
    let token = cal
        .calibration_tokens(Size::Automatic)
        .unwrap()
        .next()
        .unwrap();
    token
        .next_barcode()
        .unwrap()
        .payload
        .chars()
        .map(|c| c as u32)
        .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    let cal = Calibrator::new();
    let codes = identity_codes(&cal);

    c.bench_function("baseline inference (identity)", |b| {
        b.iter(|| {
            let token = cal
                .calibration_tokens(Size::Automatic)
                .unwrap()
                .next()
                .unwrap();
            cal.calibrate(black_box(&codes), token).unwrap()
        })
    });

    c.bench_function("token generation (26x26 split)", |b| {
        b.iter(|| cal.calibration_tokens(black_box(Size::Dm26)).unwrap().count())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

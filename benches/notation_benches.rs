use RustedCalc::calculus::{evaluate, integrate};
use RustedCalc::symbolic::notation::normalize;
use RustedCalc::symbolic::symbolic_engine::Expr;
use criterion::{Criterion, criterion_group, criterion_main};
use ndarray::Array1;
use std::hint::black_box;

const INPUTS: [&str; 4] = ["2x^2+3", "(x+1)(x-1)", "2sin(x)+exp(3x)", "x^3-2x^2+5x-7"];

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    for input in INPUTS {
        group.bench_function(input, |b| b.iter(|| normalize(black_box(input))));
    }
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let normalized: Vec<String> = INPUTS.iter().map(|input| normalize(input)).collect();
    c.bench_function("parse normalized inputs", |b| {
        b.iter(|| {
            for text in &normalized {
                let _ = Expr::parse(black_box(text), "x");
            }
        })
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let samples = Array1::linspace(0.0, 10.0, 10_000);
    c.bench_function("evaluate 10k samples", |b| {
        b.iter(|| evaluate(black_box("2sin(x)+exp(3x)"), &samples))
    });
    c.bench_function("integrate polynomial", |b| {
        b.iter(|| integrate(black_box("x^3-2x^2+5x-7"), 0.0, 1.0))
    });
}

criterion_group!(benches, bench_normalize, bench_parse, bench_evaluate);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use naught::{build, TargetType, Value};

fn bench_classify(c: &mut Criterion) {
    let class = build(|b| {
        b.null_equivalents().extend(["", "none", "n/a"]);
    });
    let classifier = class.classifier();
    let existing = Value::Null(classifier.null());

    c.bench_function("classify/maybe_ordinary", |b| {
        b.iter(|| classifier.maybe(black_box(Value::Int(42))));
    });

    c.bench_function("classify/maybe_equivalent", |b| {
        b.iter(|| classifier.maybe(black_box(Value::from("n/a"))));
    });

    c.bench_function("classify/maybe_existing", |b| {
        b.iter(|| classifier.maybe(black_box(existing.clone())));
    });

    c.bench_function("classify/just_ordinary", |b| {
        b.iter(|| classifier.just(black_box(Value::Bool(false))));
    });
}

fn bench_dispatch(c: &mut Criterion) {
    let logger = TargetType::new("Logger").operations(["debug", "info", "warn", "error", "<<"]);
    let class = build(|b| {
        b.mimic(logger).black_hole();
    });
    let null = class.new().unwrap();
    let args = [Value::from("message")];

    c.bench_function("dispatch/mimicked_stub", |b| {
        b.iter(|| null.send(black_box("info"), &args));
    });

    let open = build(|_| {}).new().unwrap();
    c.bench_function("dispatch/method_missing", |b| {
        b.iter(|| open.send(black_box("anything"), &args));
    });
}

fn bench_generate(c: &mut Criterion) {
    let logger = TargetType::new("Logger").operations(["debug", "info", "warn", "error", "<<"]);
    c.bench_function("generate/mimic_traceable", |b| {
        b.iter(|| {
            let target = logger.clone();
            build(move |b| {
                b.mimic(target).traceable().define_explicit_conversions();
            })
        });
    });
}

criterion_group!(benches, bench_classify, bench_dispatch, bench_generate);
criterion_main!(benches);

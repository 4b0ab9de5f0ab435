use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use data_selection::{
    Cond, CondBuilder, DeMorganTransformer, EqualityMergingTransformer, EventRecord,
    FactoringTransformer, Predicate, RecordLayout, Transformer,
};

fn a_filter() -> Cond {
    let restriction = CondBuilder::field("restriction").eq("public").unwrap();
    let branches = ["abc", "def", "ghi"].map(|source| {
        CondBuilder::and([
            restriction.clone(),
            CondBuilder::field("source").eq(source).unwrap(),
            CondBuilder::field("asn").eq_any([1, 2, 3]).unwrap(),
        ])
    });
    CondBuilder::and([
        CondBuilder::or(branches),
        CondBuilder::not(CondBuilder::or([
            CondBuilder::field("ignored").is_true().unwrap(),
            CondBuilder::field("url").contains_substring("example.com").unwrap(),
        ])),
    ])
}

fn optimize(cond: &Cond) -> Cond {
    let cond = DeMorganTransformer.transform(cond).unwrap().unwrap();
    let cond = EqualityMergingTransformer.transform(&cond).unwrap().unwrap();
    FactoringTransformer.transform(&cond).unwrap().unwrap()
}

pub fn build(c: &mut Criterion) {
    c.bench_function("build", |b| b.iter(|| std::hint::black_box(a_filter())));
}

pub fn transform(c: &mut Criterion) {
    c.bench_function("transform", |b| {
        b.iter_batched(
            a_filter,
            |cond| std::hint::black_box(optimize(&cond)),
            BatchSize::SmallInput,
        )
    });
}

pub fn evaluate(c: &mut Criterion) {
    let predicate = Predicate::compile(&optimize(&a_filter())).unwrap();
    let layout = RecordLayout::default();
    let event = serde_json::json!({
        "restriction": "public",
        "source": "def",
        "url": "http://example.org/",
        "ignored": false,
        "address": [{"ip": "1.2.3.4", "asn": 5}, {"ip": "5.6.7.8", "asn": 2}],
    });
    let Some(fields) = event.as_object() else {
        unreachable!()
    };
    c.bench_function("evaluate", |b| {
        b.iter(|| {
            let record = EventRecord::new(fields, &layout);
            std::hint::black_box(predicate.evaluate(&record))
        })
    });
}

criterion_group!(benches, build, transform, evaluate);
criterion_main!(benches);

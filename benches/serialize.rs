//! Benchmarks for building and serializing diagrams.

use std::path::Path;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use sequenceplot::prelude::*;

fn build(calls: usize) -> Diagram {
    let (mut diagram, ids) = Diagram::with_participants(
        (0..8).map(|i| Participant::object(format!("o{i}:Worker"))),
    );
    for i in 0..calls {
        let from = ids[i % ids.len()];
        let to = ids[(i + 3) % ids.len()];
        diagram
            .participant(from)
            .call_method(to, Call::new(format!("work({i})")).response("done"))
            .unwrap();
    }
    diagram
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("build_1000_calls", |b| b.iter(|| build(black_box(1000))));
}

fn bench_to_pic(c: &mut Criterion) {
    let document = build(1000).finish().unwrap();
    c.bench_function("to_pic_1000_calls", |b| {
        b.iter(|| black_box(&document).to_pic(Path::new("sequence.pic")))
    });
}

criterion_group!(benches, bench_build, bench_to_pic);
criterion_main!(benches);

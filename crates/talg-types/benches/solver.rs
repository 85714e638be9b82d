//! Solver throughput: application chains, constraint propagation and canon
//! construction.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use talg_types::{Canon, Catalogue, Context, OpId, Scheme, Signature, Ty};

/// A chain of `depth` basic operators, each a subtype of the previous.
fn chain(depth: usize) -> (Catalogue, Vec<OpId>) {
    let mut cat = Catalogue::with_top();
    let mut ops = Vec::with_capacity(depth);
    for i in 0..depth {
        let parent = ops.last().copied();
        ops.push(cat.declare(&format!("T{i}"), 0, parent).unwrap());
    }
    (cat, ops)
}

fn bench_apply_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_chain");

    for depth in [4, 16, 64].iter() {
        let (cat, ops) = chain(*depth);
        let leq = Scheme::new(1, |v: &[Ty]| {
            Ty::curried([v[0].clone(), v[0].clone()], v[0].clone())
        });

        group.bench_with_input(BenchmarkId::from_parameter(depth), depth, |b, _| {
            b.iter(|| {
                let mut ctx = Context::new(&cat);
                let mut acc = ctx.instantiate(&leq).unwrap();
                acc = ctx.apply(&acc, &Ty::basic(ops[ops.len() - 1])).unwrap();
                acc = ctx.apply(&acc, &Ty::basic(ops[0])).unwrap();
                black_box(ctx.resolve(&acc).unwrap())
            });
        });
    }

    group.finish();
}

fn bench_propagate(c: &mut Criterion) {
    let mut cat = Catalogue::new();
    let any = cat.declare("Any", 0, None).unwrap();
    let int = cat.declare("Int", 0, Some(any)).unwrap();
    let containers: Vec<OpId> = (0..8)
        .map(|i| cat.declare(&format!("C{i}"), 1, None).unwrap())
        .collect();
    let last = containers[containers.len() - 1];

    let alternatives = containers.clone();
    let sum = Scheme::new(2, move |v: &[Ty]| {
        Signature::new(Ty::arrow(v[0].clone(), v[1].clone())).constrain(
            v[0].clone(),
            alternatives.iter().map(|&op| Ty::op(op, vec![v[1].clone()])),
        )
    });

    c.bench_function("propagate_8_alternatives", |b| {
        b.iter(|| {
            let mut ctx = Context::new(&cat);
            let f = ctx.instantiate(&sum).unwrap();
            let out = ctx.apply(&f, &Ty::op(last, vec![Ty::basic(int)])).unwrap();
            black_box(ctx.resolve(&out).unwrap())
        });
    });
}

fn bench_canon(c: &mut Criterion) {
    let mut group = c.benchmark_group("canon");

    for depth in [2, 4, 8].iter() {
        let (mut cat, ops) = chain(*depth);
        let pair = cat.declare("Pair", 2, None).unwrap();
        let seed = Ty::op(pair, vec![Ty::basic(ops[0]), Ty::basic(ops[0])]);

        group.bench_with_input(BenchmarkId::from_parameter(depth), depth, |b, _| {
            b.iter(|| black_box(Canon::new(&cat, [seed.clone()]).unwrap().len()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_apply_chain, bench_propagate, bench_canon);
criterion_main!(benches);

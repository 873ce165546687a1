//! Triangle clipping benchmarks.

use std::hint::black_box;
use std::ops::Range;

use criterion::{
    BenchmarkId, Criterion, Throughput, criterion_group, criterion_main,
};

use re::render::clip::Clipper;
use trifle_benches::{Rng, clip_tris};

/// Name, x/y range, and z range of the generated triangles.
const CASES: [(&str, Range<f32>, Range<f32>); 3] = [
    ("all_inside", -0.9..0.9, 0.1..0.9),
    ("mixed", -3.0..3.0, -1.0..2.0),
    ("all_outside", 1.5..10.0, 0.1..0.9),
];

fn clip(c: &mut Criterion) {
    let mut group = c.benchmark_group("clip");
    for n in [10, 100, 1000, 10_000] {
        group.throughput(Throughput::Elements(n as u64));

        for (name, xy, z) in CASES {
            let tris = clip_tris(n, xy, z, &mut Rng::new(n as u64));

            group.bench_with_input(BenchmarkId::new(name, n), &tris, |b, tris| {
                let mut clipper = Clipper::new();
                let mut out = Vec::new();
                b.iter(|| {
                    out.clear();
                    for tri in tris {
                        clipper.clip_to_view(tri, &mut out);
                    }
                    black_box(out.len())
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, clip);
criterion_main!(benches);

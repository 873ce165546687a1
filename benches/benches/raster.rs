//! Rasterization and whole-pipeline benchmarks.

use std::hint::black_box;

use criterion::{
    BenchmarkId, Criterion, Throughput, criterion_group, criterion_main,
};

use re::prelude::*;
use re::render::{
    Camera, Context, FragOps, ModelToProj, ModelToWorld, Target, TexCoord,
    clip::ClipVec,
};
use re_geom::solids::cube;
use trifle_benches::{frame, screen_tri};

const SIZES: [f32; 5] = [4.0, 16.0, 64.0, 256.0, 1024.0];

fn fill(c: &mut Criterion) {
    let shader = |f: Frag<Color4f>| f.var;
    let ops = FragOps {
        // Every iteration must write every pixel
        depth_test: None,
        ..Context::default().frag_ops()
    };

    let mut group = c.benchmark_group("fill");
    for size in SIZES {
        let tri = screen_tri(size);
        let sz = size as usize;
        let mut fb = frame(sz, sz);

        let frags = fb.rasterize(&tri, &shader, ops, 1).o;
        group.throughput(Throughput::Elements(frags as u64));

        for threads in [1, 4] {
            let id = BenchmarkId::new(format!("{threads}_threads"), sz);
            group.bench_function(id, |b| {
                b.iter(|| fb.rasterize(black_box(&tri), &shader, ops, threads))
            });
        }
    }
    group.finish();
}

fn cubes(c: &mut Criterion) {
    let mesh = cube();
    let shader = Shader::new(
        |v: Vertex3<(TexCoord, Normal3)>,
         (mvp, _): (Mat4x4<ModelToProj>, ())|
         -> Vertex<ClipVec, TexCoord> {
            vertex(mvp.apply(&v.pos), v.attrib.0)
        },
        |f: Frag<TexCoord>| rgba(f.var.u(), f.var.v(), 0.5, 1.0),
    );
    let cam = Camera::new((640, 480)).at(pt3(0.0, 4.0, 12.0));

    let mut group = c.benchmark_group("cubes");
    for threads in [1, 4] {
        let ctx = Context { threads, ..Context::default() };
        let mut fb = frame(640, 480);

        group.bench_function(BenchmarkId::new("threads", threads), |b| {
            b.iter(|| {
                fb.clear(&ctx);
                for j in -3..=3 {
                    for i in -3..=3 {
                        let pos = vec3(3.0 * i as f32, 0.0, 3.0 * j as f32);
                        let to_world: Mat4x4<ModelToWorld> =
                            rotate_y(degs(10.0 * (i + j) as f32))
                                .then(&translate(pos))
                                .to();
                        cam.render(
                            &mesh.faces,
                            &mesh.verts,
                            &to_world,
                            &shader,
                            (),
                            &mut fb,
                            &ctx,
                        );
                    }
                }
            })
        });
        let stats = ctx.stats.take();
        eprintln!("{threads} threads:\n{stats}");
    }
    group.finish();
}

criterion_group!(benches, fill, cubes);
criterion_main!(benches);

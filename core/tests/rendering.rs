use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering::Relaxed};

use trifle_core::assert_approx_eq;
use trifle_core::math::{ApproxEq, Mat3x3, ProjVec3};
use trifle_core::prelude::*;
use trifle_core::render::{
    Context, Framebuf, Msaa, Target, TexCoord, Texture, clip::ClipVec,
    clip::ClipVert, clip::Clipper, clip::view_frustum, draw, present, render,
    tex::SamplerNearest, uv,
};

type Fb = Framebuf<Buf2<Color4f>, Buf2<f32>>;

const RED: Color4f = rgba(1.0, 0.0, 0.0, 1.0);
const BLACK: Color4f = rgba(0.0, 0.0, 0.0, 1.0);

/// Returns a framebuffer cleared to opaque black and infinite depth.
fn framebuf(w: usize, h: usize) -> Fb {
    let mut fb = Framebuf {
        color_buf: Buf2::new_default(w, h),
        depth_buf: Buf2::new_default(w, h),
    };
    fb.clear(&Context::default());
    fb
}

fn clip(x: f32, y: f32, z: f32, w: f32) -> ClipVec {
    ProjVec3::new([x, y, z, w])
}

fn vp(w: u32, h: u32) -> Mat4x4<trifle_core::render::NdcToScreen> {
    viewport(pt2(0, h)..pt2(w, 0))
}

fn passthru<A>(v: Vertex<ClipVec, A>, _: ()) -> Vertex<ClipVec, A> {
    v
}

/// A triangle with screen-space corners (0, 0), (4, 0), and (0, 4)
/// in a 4×4 viewport.
fn corner_tri() -> [Vertex<ClipVec, ()>; 3] {
    [
        vertex(clip(-1.0, 1.0, 0.5, 1.0), ()),
        vertex(clip(1.0, 1.0, 0.5, 1.0), ()),
        vertex(clip(-1.0, -1.0, 0.5, 1.0), ()),
    ]
}

/// A counter-clockwise triangle covering the lower left half of NDC.
fn ccw_tri() -> [Vertex<ClipVec, ()>; 3] {
    [
        vertex(clip(-1.0, -1.0, 0.5, 1.0), ()),
        vertex(clip(1.0, -1.0, 0.5, 1.0), ()),
        vertex(clip(-1.0, 1.0, 0.5, 1.0), ()),
    ]
}

#[test]
fn concrete_scenario_4x4() {
    let mut fb = framebuf(4, 4);
    let ctx = Context {
        face_cull: None,
        ..Context::default()
    };
    fb.clear(&ctx);

    let shader = Shader::new(passthru::<()>, |_: Frag<()>| RED);
    draw(&corner_tri(), &shader, (), vp(4, 4), &mut fb, &ctx);

    for y in 0..4 {
        for x in 0..4 {
            let expected = if x + y < 4 { RED } else { BLACK };
            assert_eq!(fb.color_buf[[x, y]], expected, "pixel ({x}, {y})");
        }
    }
    assert_eq!(fb.color_buf.get(3, 3), BLACK);
    assert_eq!(ctx.stats.borrow().frags.o, 10);
}

#[test]
fn depth_test_is_idempotent() {
    let mut fb = framebuf(16, 16);
    let ctx = Context::default();
    fb.clear(&ctx);

    let verts = [
        vertex(clip(-0.8, -0.9, 0.2, 1.0), rgba(1.0, 0.0, 0.0, 1.0)),
        vertex(clip(0.9, -0.5, 0.6, 1.0), rgba(0.0, 1.0, 0.0, 1.0)),
        vertex(clip(-0.2, 0.8, 0.9, 1.0), rgba(0.0, 0.0, 1.0, 1.0)),
    ];
    let shader = Shader::new(passthru::<Color4f>, |f: Frag<Color4f>| f.var);

    draw(&verts, &shader, (), vp(16, 16), &mut fb, &ctx);
    let once = (fb.color_buf.clone(), fb.depth_buf.clone());
    let first = ctx.stats.take();
    assert!(first.frags.o > 0);

    draw(&verts, &shader, (), vp(16, 16), &mut fb, &ctx);
    let second = ctx.stats.take();

    assert_eq!(second.frags.i, first.frags.i);
    assert_eq!(second.frags.o, 0);
    assert_eq!(fb.color_buf.data(), once.0.data());
    assert_eq!(fb.depth_buf.data(), once.1.data());
}

#[test]
fn nearer_triangle_wins_regardless_of_order() {
    let near = [
        vertex(clip(-1.0, -1.0, 0.2, 1.0), RED),
        vertex(clip(1.0, -1.0, 0.2, 1.0), RED),
        vertex(clip(-1.0, 1.0, 0.2, 1.0), RED),
    ];
    let far = near.map(|v| {
        let [x, y, _, w] = v.pos.0;
        vertex(clip(x, y, 0.7, w), rgba(0.0, 0.0, 1.0, 1.0))
    });
    let shader = Shader::new(passthru::<Color4f>, |f: Frag<Color4f>| f.var);
    let ctx = Context::default();

    let mut results = vec![];
    for order in [[&near, &far], [&far, &near]] {
        let mut fb = framebuf(8, 8);
        fb.clear(&ctx);
        for tri in order {
            draw(tri, &shader, (), vp(8, 8), &mut fb, &ctx);
        }
        assert_eq!(fb.color_buf[[1, 6]], RED);
        results.push(fb.color_buf);
    }
    assert_eq!(results[0].data(), results[1].data());
}

#[test]
fn backfaces_are_never_shaded() {
    let calls = AtomicUsize::new(0);
    let shader = Shader::new(passthru::<()>, |_: Frag<()>| {
        calls.fetch_add(1, Relaxed);
        RED
    });
    let ctx = Context::default();
    let mut fb = framebuf(8, 8);

    let [a, b, c] = ccw_tri();
    draw(&[a, c, b], &shader, (), vp(8, 8), &mut fb, &ctx);
    assert_eq!(calls.load(Relaxed), 0);
    assert_eq!(ctx.stats.borrow().culled, 1);

    draw(&[a, b, c], &shader, (), vp(8, 8), &mut fb, &ctx);
    // Half of the 8×8 viewport, diagonal pixels included
    assert_eq!(calls.load(Relaxed), 36);
    assert_eq!(ctx.stats.borrow().culled, 1);
    assert_eq!(fb.color_buf[[0, 7]], RED);
}

#[test]
fn front_faces_culled_when_configured() {
    let calls = AtomicUsize::new(0);
    let shader = Shader::new(passthru::<()>, |_: Frag<()>| {
        calls.fetch_add(1, Relaxed);
        RED
    });
    let ctx = Context {
        face_cull: Some(trifle_core::render::FaceCull::Front),
        ..Context::default()
    };
    let mut fb = framebuf(8, 8);
    draw(&ccw_tri(), &shader, (), vp(8, 8), &mut fb, &ctx);
    assert_eq!(calls.load(Relaxed), 0);

    let [a, b, c] = ccw_tri();
    draw(&[a, c, b], &shader, (), vp(8, 8), &mut fb, &ctx);
    assert_eq!(calls.load(Relaxed), 36);
}

#[test]
fn perspective_correct_interpolation() {
    // NDC corners (-1, -1), (1, -1), (-1, 1) with w = 1, 2, 4.
    // The varying is 1 at the second vertex and 0 at the others.
    let verts = [
        vertex(clip(-1.0, -1.0, 0.5, 1.0), 0.0f32),
        vertex(clip(2.0, -2.0, 1.0, 2.0), 1.0),
        vertex(clip(-4.0, 4.0, 2.0, 4.0), 0.0),
    ];
    let frags = Mutex::new(vec![]);
    let shader = Shader::new(passthru::<f32>, |f: Frag<f32>| {
        frags.lock().unwrap().push((f.pos, f.var));
        RED
    });
    let mut fb = framebuf(8, 8);
    let ctx = Context::default();
    fb.clear(&ctx);
    draw(&verts, &shader, (), vp(8, 8), &mut fb, &ctx);

    let frags = frags.into_inner().unwrap();
    assert!(frags.len() > 20);

    let mut max_diff = 0.0f32;
    for (pos, var) in frags {
        // Screen-space barycentric coordinates; the screen-space
        // vertices are (0, 8), (8, 8), and (0, 0).
        let l1 = pos.x() / 8.0;
        let l2 = (8.0 - pos.y()) / 8.0;
        let l0 = 1.0 - l1 - l2;

        let expected = (l1 / 2.0) / (l0 / 1.0 + l1 / 2.0 + l2 / 4.0);
        assert_approx_eq!(var, expected, eps = 1e-5);
        assert_approx_eq!(pos.z(), 0.5, eps = 1e-5);

        max_diff = max_diff.max((var - l1).abs());
    }
    // Affine interpolation would give a measurably different answer
    assert!(max_diff > 0.1, "max difference {max_diff}");
}

#[test]
fn clipped_edge_interpolates_attributes() {
    // Plane x = w bisects the edge from a to b
    let a = vertex(clip(0.0, 0.0, 0.5, 1.0), uv(0.0, 0.0));
    let b = vertex(clip(2.0, 0.0, 0.5, 1.0), uv(1.0, 1.0));
    let c = vertex(clip(0.0, 0.5, 0.5, 1.0), uv(0.0, 0.0));
    let tri = Tri([a, b, c].map(ClipVert::new));

    let mut out = vec![];
    Clipper::new().clip_to_view(&tri, &mut out);
    assert!(!out.is_empty());

    let verts: Vec<&ClipVert<TexCoord>> =
        out.iter().flat_map(|t| &t.0).collect();
    for v in &verts {
        for p in &view_frustum::PLANES {
            assert!(p.signed_dist(&v.pos) <= 1e-6, "{v:?} outside {p:?}");
        }
    }
    let mid = verts
        .iter()
        .find(|v| v.pos.approx_eq(&clip(1.0, 0.0, 0.5, 1.0)))
        .expect("midpoint of a-b should be a vertex");
    assert_approx_eq!(mid.attrib, uv(0.5, 0.5));
}

#[test]
fn triangle_behind_camera_is_not_drawn() {
    let verts = [
        vertex(clip(-1.0, -1.0, -0.5, -1.0), ()),
        vertex(clip(1.0, -1.0, -0.5, -1.0), ()),
        vertex(clip(-1.0, 1.0, -0.5, -1.0), ()),
    ];
    let shader = Shader::new(passthru::<()>, |_: Frag<()>| RED);
    let ctx = Context::default();
    let mut fb = framebuf(4, 4);
    fb.clear(&ctx);
    draw(&verts, &shader, (), vp(4, 4), &mut fb, &ctx);

    assert!(fb.color_buf.iter().all(|c| *c == BLACK));
    assert_eq!(ctx.stats.borrow().rejected, 1);
}

#[test]
fn degenerate_and_invalid_triangles_are_skipped() {
    let ctx = Context {
        face_cull: None,
        ..Context::default()
    };
    let shader = Shader::new(passthru::<()>, |_: Frag<()>| RED);
    let mut fb = framebuf(4, 4);
    fb.clear(&ctx);

    let p = vertex(clip(0.0, 0.0, 0.5, 1.0), ());
    let q = vertex(clip(0.5, 0.5, 0.5, 1.0), ());
    let nan = vertex(clip(f32::NAN, 0.0, 0.5, 1.0), ());
    let verts = [p, q, p, nan];
    let tris = [tri(0, 1, 2), tri(0, 1, 3), tri(0, 1, 7)];
    render(&tris, &verts, &shader, (), vp(4, 4), &mut fb, &ctx);

    assert!(fb.color_buf.iter().all(|c| *c == BLACK));
    assert_eq!(ctx.stats.borrow().frags.i, 0);
}

#[test]
fn textured_quad_samples_texels() {
    const R: Color4f = rgba(1.0, 0.0, 0.0, 1.0);
    const G: Color4f = rgba(0.0, 1.0, 0.0, 1.0);
    const B: Color4f = rgba(0.0, 0.0, 1.0, 1.0);
    const W: Color4f = rgba(1.0, 1.0, 1.0, 1.0);
    let tex = Texture::from(Buf2::from_vec(2, 2, vec![R, G, B, W]));

    let verts = [
        vertex(pt3(-1.0, 1.0, 0.5), uv(0.0, 0.0)),
        vertex(pt3(-1.0, -1.0, 0.5), uv(0.0, 1.0)),
        vertex(pt3(1.0, -1.0, 0.5), uv(1.0, 1.0)),
        vertex(pt3(1.0, 1.0, 0.5), uv(1.0, 0.0)),
    ];
    let tris = [tri(0, 1, 2), tri(0, 2, 3)];
    let shader = Shader::new(
        |v: Vertex3<TexCoord>, _: ()| -> Vertex<ClipVec, TexCoord> {
            vertex(v.pos.to_homogeneous(), v.attrib)
        },
        |f: Frag<TexCoord>| SamplerNearest.sample(&tex, f.var),
    );
    let ctx = Context::default();
    let mut fb = framebuf(2, 2);
    fb.clear(&ctx);
    render(&tris, &verts, &shader, (), vp(2, 2), &mut fb, &ctx);

    assert_eq!(fb.color_buf.data(), &[R, G, B, W]);
}

#[test]
fn msaa_edge_pixels_are_partially_covered() {
    let mut fb = framebuf(4, 4);
    let ctx = Context {
        face_cull: None,
        msaa: Msaa::Grid2x2,
        ..Context::default()
    };
    fb.clear(&ctx);

    let shader = Shader::new(passthru::<()>, |_: Frag<()>| RED);
    draw(&corner_tri(), &shader, (), vp(4, 4), &mut fb, &ctx);

    assert_eq!(fb.color_buf[[0, 0]], RED);
    assert_approx_eq!(fb.color_buf[[0, 3]], rgba(0.75, 0.0, 0.0, 1.0));
    assert_approx_eq!(fb.color_buf[[1, 2]], rgba(0.75, 0.0, 0.0, 1.0));
    assert_eq!(fb.color_buf[[3, 3]], BLACK);
}

#[test]
fn parallel_rendering_matches_serial() {
    let verts: Vec<_> = (0..12)
        .map(|i| {
            let t = i as f32 / 12.0;
            let z = 0.1 + 0.8 * t;
            let c = rgba(t, 1.0 - t, 0.5, 1.0);
            match i % 3 {
                0 => vertex(clip(-1.2 + t, -1.1, z, 1.0 + t), c),
                1 => vertex(clip(1.1, -0.9 + t, z, 1.0), c),
                _ => vertex(clip(-0.3 * t, 1.3, 1.0 - z, 1.0 + 2.0 * t), c),
            }
        })
        .collect();
    let shader = Shader::new(passthru::<Color4f>, |f: Frag<Color4f>| f.var);

    let run = |threads| {
        let ctx = Context {
            face_cull: None,
            threads,
            ..Context::default()
        };
        let mut fb = framebuf(97, 61);
        fb.clear(&ctx);
        draw(&verts, &shader, (), vp(97, 61), &mut fb, &ctx);
        let frags = ctx.stats.borrow().frags;
        (fb, frags)
    };
    let (serial, io1) = run(1);
    let (parallel, io4) = run(4);

    assert!(io1.o > 0);
    assert_eq!(io1, io4);
    assert_eq!(serial.color_buf.data(), parallel.color_buf.data());
    assert_eq!(serial.depth_buf.data(), parallel.depth_buf.data());
}

#[test]
fn present_applies_gamma() {
    let mut src = Buf2::new_with(3, 2, |x, _| {
        [RED, BLACK, rgba(0.5, 0.5, 0.5, 1.0)][x]
    });
    src.set(0, 1, rgba(0.0, 0.0, 1.0, 0.0));

    for threads in [1, 2] {
        let mut dst = Buf2::<u32>::new_default(3, 2);
        present(&src, &mut dst, threads);
        assert_eq!(dst[[0, 0]], 0xFF_FF_00_00);
        assert_eq!(dst[[1, 0]], 0xFF_00_00_00);
        // Linear 0.5 is sRGB 0.735
        assert_eq!(dst[[2, 0]], 0xFF_BC_BC_BC);
        assert_eq!(dst[[0, 1]], 0x00_00_00_FF);
    }
}

#[test]
fn matrix_inverse() {
    let m: Mat3x3 = Matrix::new([
        [2.0, 0.0, 1.0],
        [1.0, 3.0, 0.0],
        [0.0, -1.0, 4.0],
    ]);
    let id: Mat3x3 = Mat3x3::identity();
    assert_approx_eq!(m * m.inverse(), id);
    assert_approx_eq!(m.inverse() * m, id);

    let singular: Mat3x3 = Matrix::new([
        [1.0, 2.0, 3.0],
        [2.0, 4.0, 6.0],
        [0.0, 1.0, 1.0],
    ]);
    assert_eq!(singular.inverse(), singular);
}

//! Shared fixtures of the `trifle` benchmarks.

use core::ops::Range;

use re::geom::{Tri, vertex};
use re::math::{Color4f, ProjVec3, pt3, rgba};
use re::render::clip::ClipVert;
use re::render::raster::setup;
use re::render::{Framebuf, ScreenVert, Setup};
use re::util::buf::Buf2;

/// The framebuffer type rendered into by the benchmarks.
pub type Frame = Framebuf<Buf2<Color4f>, Buf2<f32>>;

/// Xorshift pseudo-random number generator.
///
/// Deterministic, so that every run benchmarks the same inputs.
#[derive(Clone, Debug)]
pub struct Rng(u64);

impl Rng {
    pub fn new(seed: u64) -> Self {
        // Zero is a fixed point of xorshift
        Self(seed.max(1))
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    /// Returns a value uniformly distributed in `r`.
    pub fn range(&mut self, r: Range<f32>) -> f32 {
        let t = (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32;
        r.start + (r.end - r.start) * t
    }
}

/// Returns `n` random clip-space triangles with w = 1, x and y in `xy`,
/// and z in `z`.
pub fn clip_tris(
    n: usize,
    xy: Range<f32>,
    z: Range<f32>,
    rng: &mut Rng,
) -> Vec<Tri<ClipVert<Color4f>>> {
    (0..n)
        .map(|_| {
            Tri([(); 3].map(|_| {
                let pos = ProjVec3::new([
                    rng.range(xy.clone()),
                    rng.range(xy.clone()),
                    rng.range(z.clone()),
                    1.0,
                ]);
                let col = rgba(rng.range(0.0..1.0), 0.5, 0.5, 1.0);
                ClipVert::new(vertex(pos, col))
            }))
        })
        .collect()
}

/// Returns a framebuffer of the given size.
pub fn frame(w: usize, h: usize) -> Frame {
    Framebuf {
        color_buf: Buf2::new_default(w, h),
        depth_buf: Buf2::new_default(w, h),
    }
}

/// Returns a Gouraud-shaded screen-space triangle whose bounding box is
/// `size`×`size` pixels, set up for a target of the same size.
pub fn screen_tri(size: f32) -> Setup<Color4f> {
    let v = |x: f32, y: f32, var| ScreenVert {
        pos: pt3(x * size, y * size, 0.5),
        recip_w: 1.0,
        var,
    };
    let verts = [
        v(0.0, 0.1, rgba(0.9, 0.1, 0.0, 1.0)),
        v(0.3, 1.0, rgba(0.1, 0.8, 0.1, 1.0)),
        v(1.0, 0.0, rgba(0.2, 0.3, 1.0, 1.0)),
    ];
    let sz = size.ceil() as usize;
    setup(verts, sz, sz).expect("triangle has nonzero area")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rng_range() {
        let mut rng = Rng::new(0);
        for _ in 0..1000 {
            let x = rng.range(-2.0..3.0);
            assert!((-2.0..3.0).contains(&x), "{x}");
        }
    }

    #[test]
    fn screen_tri_is_not_degenerate() {
        assert!(screen_tri(16.0).area2().abs() > 100.0);
    }
}

//! Translation of triangles into discrete pixels in the framebuffer.
//!
//! Rasterization turns a screen-space triangle into a sequence of
//! *fragments* that represent potentially drawn pixels. This module uses
//! the bounding box method: every pixel center in the triangle's bounding
//! box, clamped to the target, is tested against the three edge functions
//! of the triangle. The normalized edge function values are the barycentric
//! weights of the pixel center, and a pixel is covered iff all three are
//! non-negative.
//!
//! The work is organized by row so that disjoint bands of rows can be
//! rasterized independently, for example by different threads.
//!
//! Depth is interpolated linearly in screen space, which is exact because
//! NDC depth is an affine function of screen x and y. All other varyings
//! are interpolated *perspective-correctly*: the barycentric weights are
//! divided by the clip-space w of each vertex and renormalized before use.

use core::ops::Range;

use crate::math::{Vary, float, point::Point3, pt3};

use super::Screen;

/// A vertex in screen space, ready for rasterization.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScreenVert<V> {
    /// Pixel coordinates in x and y, NDC depth in z.
    pub pos: ScreenPt,
    /// The reciprocal of the clip-space w coordinate.
    pub recip_w: f32,
    /// The varyings of the vertex.
    pub var: V,
}

/// A fragment, or a single "pixel" in a rasterized primitive.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frag<V> {
    /// Pixel center in x and y, interpolated depth in z.
    pub pos: ScreenPt,
    /// The perspective-corrected varyings.
    pub var: V,
    /// The fraction of samples covered by the primitive, in (0, 1].
    ///
    /// Always 1.0 unless multisampling is enabled.
    pub coverage: f32,
}

/// Point in screen space.
/// `x` and `y` are viewport pixel coordinates, `z` is depth.
pub type ScreenPt = Point3<Screen>;

/// Sample pattern used to compute pixel coverage.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Msaa {
    /// One sample at the pixel center.
    #[default]
    Off,
    /// Four samples in a regular 2×2 grid.
    Grid2x2,
    /// Four samples in a rotated grid, better for near-horizontal
    /// and near-vertical edges.
    Rotated4,
}

/// A triangle prepared for rasterization.
///
/// Created by [`setup`]; holds the vertices, the doubled signed area, and
/// the pixel bounding box clipped to the target.
#[derive(Clone, Debug)]
pub struct Setup<V> {
    verts: [ScreenVert<V>; 3],
    area2: f32,
    xs: Range<usize>,
    ys: Range<usize>,
}

/// Edge function tolerance. Pixel centers this little outside an edge,
/// in normalized units, still count as covered.
const COVER_EPS: f32 = -1e-6;

/// Triangles with doubled area, in pixels, below this are degenerate.
const MIN_AREA: f32 = 1e-8;

impl Msaa {
    /// Returns the sample offsets within a pixel, relative to its
    /// top left corner.
    pub fn samples(self) -> &'static [(f32, f32)] {
        match self {
            Self::Off => &[(0.5, 0.5)],
            Self::Grid2x2 => {
                &[(0.25, 0.25), (0.75, 0.25), (0.25, 0.75), (0.75, 0.75)]
            }
            Self::Rotated4 => {
                &[(0.375, 0.125), (0.875, 0.375), (0.125, 0.625), (0.625, 0.875)]
            }
        }
    }
}

/// Prepares a triangle for rasterization into a `width`×`height` target.
///
/// Returns `None` if the triangle is degenerate: if it has (almost) zero
/// area or any of its coordinates are non-finite. The triangle may be wound
/// either way.
pub fn setup<V>(
    verts: [ScreenVert<V>; 3],
    width: usize,
    height: usize,
) -> Option<Setup<V>> {
    let [a, b, c] = [0, 1, 2].map(|i| verts[i].pos);
    let finite = [a, b, c].iter().all(|p| p.0.iter().all(|c| c.is_finite()));
    if !finite {
        return None;
    }
    let area2 = edge(a, b, c);
    if !area2.is_finite() || float::abs(area2) < MIN_AREA {
        return None;
    }

    let min = |f: fn(&ScreenPt) -> f32| f(&a).min(f(&b)).min(f(&c));
    let max = |f: fn(&ScreenPt) -> f32| f(&a).max(f(&b)).max(f(&c));

    let clamp = |v: f32, hi: usize| v.max(0.0).min(hi as f32) as usize;
    let xs = clamp(float::floor(min(ScreenPt::x)), width)
        ..clamp(float::ceil(max(ScreenPt::x)), width);
    let ys = clamp(float::floor(min(ScreenPt::y)), height)
        ..clamp(float::ceil(max(ScreenPt::y)), height);

    Some(Setup { verts, area2, xs, ys })
}

/// Returns the doubled signed area of the triangle `abc` in the xy plane.
///
/// Also known as the edge function: positive if `c` is to the left of the
/// directed edge `ab` when y points up, negative if to the right.
#[inline]
fn edge(a: ScreenPt, b: ScreenPt, c: ScreenPt) -> f32 {
    (b.xy() - a.xy()).perp_dot(c.xy() - a.xy())
}

impl<V> Setup<V> {
    /// Returns the range of rows the triangle may cover.
    pub fn rows(&self) -> Range<usize> {
        self.ys.clone()
    }

    /// Returns the range of columns the triangle may cover.
    pub fn cols(&self) -> Range<usize> {
        self.xs.clone()
    }

    /// Returns the doubled signed area of the triangle, in pixels.
    pub fn area2(&self) -> f32 {
        self.area2
    }

    /// Returns the vertices of the triangle.
    pub fn verts(&self) -> &[ScreenVert<V>; 3] {
        &self.verts
    }

    /// Returns the barycentric weights of the point `(x, y)`, or `None`
    /// if the point is outside the triangle.
    pub fn weights(&self, x: f32, y: f32) -> Option<[f32; 3]> {
        let [a, b, c] = [0, 1, 2].map(|i| self.verts[i].pos);
        let p = pt3(x, y, 0.0);
        let ws = [edge(b, c, p), edge(c, a, p), edge(a, b, p)]
            .map(|e| e / self.area2);
        ws.iter().all(|&w| w >= COVER_EPS).then_some(ws)
    }
}

impl<V: Vary> Setup<V> {
    /// Computes the fragment at pixel `(x, y)`, if the pixel is covered
    /// by at least one sample of `msaa`.
    pub fn frag_at(&self, x: usize, y: usize, msaa: Msaa) -> Option<Frag<V>> {
        let samples = msaa.samples();
        let (x, y) = (x as f32, y as f32);

        let mut sum = [0.0; 3];
        let mut n = 0;
        for &(dx, dy) in samples {
            if let Some(ws) = self.weights(x + dx, y + dy) {
                sum = [0, 1, 2].map(|i| sum[i] + ws[i]);
                n += 1;
            }
        }
        if n == 0 {
            return None;
        }
        let ws = sum.map(|s| s / n as f32);
        let coverage = n as f32 / samples.len() as f32;

        let [a, b, c] = &self.verts;
        let z = ws[0] * a.pos.z() + ws[1] * b.pos.z() + ws[2] * c.pos.z();

        let var = Vary::barycentric(
            [&a.var, &b.var, &c.var],
            self.perspective_weights(ws),
        );
        let pos = pt3(x + 0.5, y + 0.5, z);
        Some(Frag { pos, var, coverage })
    }

    /// Invokes `frag_fn` for each covered pixel on row `y`.
    ///
    /// Returns the number of fragments emitted.
    pub fn scan_row(
        &self,
        y: usize,
        msaa: Msaa,
        mut frag_fn: impl FnMut(usize, Frag<V>),
    ) -> usize {
        let mut n = 0;
        for x in self.cols() {
            if let Some(frag) = self.frag_at(x, y, msaa) {
                frag_fn(x, frag);
                n += 1;
            }
        }
        n
    }

    /// Invokes `frag_fn` for each covered pixel of the triangle, row by row.
    ///
    /// Returns the number of fragments emitted.
    pub fn scan(
        &self,
        msaa: Msaa,
        mut frag_fn: impl FnMut(usize, usize, Frag<V>),
    ) -> usize {
        self.rows()
            .map(|y| self.scan_row(y, msaa, |x, f| frag_fn(x, y, f)))
            .sum()
    }

    /// Divides screen-space weights by the clip-space w of each vertex
    /// and renormalizes them.
    ///
    /// Falls back to `ws` unchanged if the corrected weights cannot be
    /// normalized.
    fn perspective_weights(&self, ws: [f32; 3]) -> [f32; 3] {
        let pw = [0, 1, 2].map(|i| ws[i] * self.verts[i].recip_w);
        let sum = pw[0] + pw[1] + pw[2];
        if sum.is_finite() && sum > 0.0 {
            pw.map(|w| w / sum)
        } else {
            ws
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use crate::assert_approx_eq;

    use super::*;

    fn sv<V>(x: f32, y: f32, var: V) -> ScreenVert<V> {
        ScreenVert { pos: pt3(x, y, 0.5), recip_w: 1.0, var }
    }

    fn covered<V: Vary>(s: &Setup<V>, msaa: Msaa) -> Vec<(usize, usize)> {
        let mut res = Vec::new();
        s.scan(msaa, |x, y, _| res.push((x, y)));
        res
    }

    #[test]
    fn degenerate_tris_are_rejected() {
        let collinear = [sv(0.0, 0.0, ()), sv(1.0, 1.0, ()), sv(2.0, 2.0, ())];
        assert!(setup(collinear, 4, 4).is_none());

        let nan = [sv(0.0, 0.0, ()), sv(f32::NAN, 1.0, ()), sv(2.0, 0.0, ())];
        assert!(setup(nan, 4, 4).is_none());

        let inf = [sv(0.0, 0.0, ()), sv(f32::INFINITY, 1.0, ()), sv(2.0, 0.0, ())];
        assert!(setup(inf, 4, 4).is_none());
    }

    #[test]
    fn bounds_are_clamped_to_target() {
        let tri = [sv(-5.0, -5.0, ()), sv(20.0, 1.0, ()), sv(1.0, 30.0, ())];
        let s = setup(tri, 8, 6).unwrap();
        assert_eq!(s.cols(), 0..8);
        assert_eq!(s.rows(), 0..6);

        let tri = [sv(1.2, 1.5, ()), sv(3.5, 1.5, ()), sv(1.2, 2.9, ())];
        let s = setup(tri, 8, 6).unwrap();
        assert_eq!(s.cols(), 1..4);
        assert_eq!(s.rows(), 1..3);
    }

    #[test]
    fn half_square_coverage() {
        // Pixels with center x + y <= 4
        let tri = [sv(0.0, 0.0, ()), sv(4.0, 0.0, ()), sv(0.0, 4.0, ())];
        let s = setup(tri, 4, 4).unwrap();
        let cov = covered(&s, Msaa::Off);
        assert_eq!(cov.len(), 10);
        assert!(cov.iter().all(|&(x, y)| x + y < 4));
    }

    #[test]
    fn winding_does_not_affect_coverage() {
        let ccw = [sv(0.0, 0.0, ()), sv(4.0, 0.0, ()), sv(0.0, 4.0, ())];
        let cw = [sv(0.0, 0.0, ()), sv(0.0, 4.0, ()), sv(4.0, 0.0, ())];
        let a = setup(ccw, 4, 4).unwrap();
        let b = setup(cw, 4, 4).unwrap();
        assert_eq!(a.area2(), -b.area2());
        assert_eq!(covered(&a, Msaa::Off), covered(&b, Msaa::Off));
    }

    #[test]
    fn weights_sum_to_one() {
        let tri = [sv(0.0, 0.0, ()), sv(8.0, 1.0, ()), sv(2.0, 7.0, ())];
        let s = setup(tri, 8, 8).unwrap();
        let ws = s.weights(3.0, 3.0).unwrap();
        assert_approx_eq!(ws[0] + ws[1] + ws[2], 1.0);
        assert_eq!(s.weights(0.0, 0.0), Some([1.0, 0.0, 0.0]));
        assert_eq!(s.weights(7.5, 7.5), None);
    }

    #[test]
    fn affine_varyings_with_uniform_w() {
        let tri = [sv(0.0, 0.0, 0.0), sv(4.0, 0.0, 4.0), sv(0.0, 4.0, 0.0)];
        let s = setup(tri, 4, 4).unwrap();
        s.scan(Msaa::Off, |x, _, f| {
            assert_approx_eq!(f.var, x as f32 + 0.5);
            assert_eq!(f.coverage, 1.0);
        });
    }

    #[test]
    fn perspective_correct_varyings() {
        // Clip-space w of 1, 2, and 4; the varying is linear in the
        // unprojected space, so at a fragment with screen-space weights
        // (b0, b1, b2) its value is (b0 v0/w0 + ...) / (b0/w0 + ...).
        let w = [1.0f32, 2.0, 4.0];
        let v = [0.0f32, 1.0, 2.0];
        let verts = [(0.0, 0.0), (8.0, 0.0), (0.0, 8.0)]
            .into_iter()
            .zip(w)
            .zip(v)
            .map(|(((x, y), w), v)| ScreenVert {
                pos: pt3(x, y, 0.5),
                recip_w: 1.0 / w,
                var: v,
            })
            .collect::<Vec<_>>();
        let s = setup([verts[0], verts[1], verts[2]], 8, 8).unwrap();

        let f = s.frag_at(2, 3, Msaa::Off).unwrap();
        let b = s.weights(2.5, 3.5).unwrap();
        let num: f32 = (0..3).map(|i| b[i] * v[i] / w[i]).sum();
        let den: f32 = (0..3).map(|i| b[i] / w[i]).sum();
        assert_approx_eq!(f.var, num / den);

        // Differs measurably from affine interpolation
        let affine: f32 = (0..3).map(|i| b[i] * v[i]).sum();
        assert!(float::abs(f.var - affine) > 0.1);
    }

    #[test]
    fn depth_is_screen_linear() {
        let tri = [
            ScreenVert { pos: pt3(0.0, 0.0, 0.0), recip_w: 1.0, var: () },
            ScreenVert { pos: pt3(4.0, 0.0, 1.0), recip_w: 0.25, var: () },
            ScreenVert { pos: pt3(0.0, 4.0, 0.0), recip_w: 0.5, var: () },
        ];
        let s = setup(tri, 4, 4).unwrap();
        let f = s.frag_at(1, 0, Msaa::Off).unwrap();
        assert_approx_eq!(f.pos.z(), 0.375);
    }

    #[test]
    fn msaa_partial_coverage() {
        // Edge x + y = 2 passes through the center of pixel (1, 0)
        // and splits its 2x2 samples into 3 covered and 1 not
        let tri = [sv(0.0, 0.0, ()), sv(2.0, 0.0, ()), sv(0.0, 2.0, ())];
        let s = setup(tri, 4, 4).unwrap();

        let f = s.frag_at(1, 0, Msaa::Grid2x2).unwrap();
        assert_eq!(f.coverage, 0.75);

        let f = s.frag_at(0, 0, Msaa::Grid2x2).unwrap();
        assert_eq!(f.coverage, 1.0);

        assert!(s.frag_at(2, 2, Msaa::Grid2x2).is_none());
        assert!(s.frag_at(0, 1, Msaa::Rotated4).is_some());
    }

    #[test]
    fn sample_patterns() {
        assert_eq!(Msaa::Off.samples().len(), 1);
        assert_eq!(Msaa::Grid2x2.samples().len(), 4);
        assert_eq!(Msaa::Rotated4.samples().len(), 4);
        for m in [Msaa::Off, Msaa::Grid2x2, Msaa::Rotated4] {
            assert!(m.samples().iter().all(|&(x, y)| {
                (0.0..1.0).contains(&x) && (0.0..1.0).contains(&y)
            }));
        }
    }
}

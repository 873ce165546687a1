//! Render targets.
//!
//! The typical render target is a framebuffer, comprising a color buffer
//! and a depth buffer. A bare color buffer can also be rendered to, in
//! which case no depth testing is done.
//!
//! Targets write fragments one triangle at a time. With the `std` feature
//! and [`Context::threads`][super::Context::threads] > 1, the rows covered
//! by a triangle are split into disjoint bands that are shaded in parallel.
//! Since each band owns its rows of the color and depth buffers, no two
//! threads ever touch the same pixel.

use alloc::vec::Vec;
use core::ops::Range;

use crate::math::{Color4f, Vary};
use crate::util::buf::{AsMutSlice2, AsSlice2, MutSlice2};

use super::ctx::{Context, FragOps};
use super::raster::Setup;
use super::shader::FragmentShader;
use super::stats::Throughput;

/// Trait for types that can be used as render targets.
pub trait Target {
    /// Returns the width and height of `self` in pixels.
    fn size(&self) -> (usize, usize);

    /// Clears `self` with the clear values in `ctx`.
    fn clear(&mut self, ctx: &Context);

    /// Rasterizes a triangle into `self`, shading each covered pixel
    /// with `fs`, using at most `threads` worker threads.
    ///
    /// Returns count of fragments input and output.
    fn rasterize<V, Fs>(
        &mut self,
        setup: &Setup<V>,
        fs: &Fs,
        ops: FragOps,
        threads: usize,
    ) -> Throughput
    where
        V: Vary + Sync,
        Fs: FragmentShader<V> + Sync;
}

/// Framebuffer, combining a color buffer and a depth buffer.
///
/// The buffers must have equal dimensions.
#[derive(Clone, Debug)]
pub struct Framebuf<Col, Dep> {
    pub color_buf: Col,
    pub depth_buf: Dep,
}

/// Triangles shorter than this many rows per thread are shaded serially.
const MIN_ROWS_PER_THREAD: usize = 8;

impl<Col, Dep> Target for Framebuf<Col, Dep>
where
    Col: AsSlice2<Color4f> + AsMutSlice2<Color4f>,
    Dep: AsSlice2<f32> + AsMutSlice2<f32>,
{
    fn size(&self) -> (usize, usize) {
        let c = self.color_buf.as_slice2();
        (c.width(), c.height())
    }

    fn clear(&mut self, ctx: &Context) {
        if let Some(c) = ctx.color_clear {
            self.color_buf.as_mut_slice2().fill(c);
        }
        if let Some(z) = ctx.depth_clear {
            self.depth_buf.as_mut_slice2().fill(z);
        }
    }

    /// Rasterizes a triangle into this framebuffer, doing depth testing
    /// and blending as specified by `ops`.
    fn rasterize<V, Fs>(
        &mut self,
        setup: &Setup<V>,
        fs: &Fs,
        ops: FragOps,
        threads: usize,
    ) -> Throughput
    where
        V: Vary + Sync,
        Fs: FragmentShader<V> + Sync,
    {
        let (d, c) = (self.depth_buf.as_slice2(), self.color_buf.as_slice2());
        debug_assert_eq!(
            (c.width(), c.height()),
            (d.width(), d.height()),
            "color and depth buffer dimensions differ"
        );
        let rows = setup.rows();
        let y0 = rows.start;
        let mut color = rows_of(self.color_buf.as_mut_slice2(), rows.clone());
        let mut depth = rows_of(self.depth_buf.as_mut_slice2(), rows.clone());

        let n = num_bands(threads, rows.len());
        if n <= 1 {
            return shade_band(setup, fs, ops, y0, &mut color, Some(&mut depth));
        }
        let bands = color.into_bands(n).into_iter().zip(depth.into_bands(n));
        let jobs = bands.map(|((y, mut c), (_, mut d))| {
            move || shade_band(setup, fs, ops, y0 + y, &mut c, Some(&mut d))
        });
        sum(in_parallel(jobs))
    }
}

impl<Buf> Target for Buf
where
    Buf: AsSlice2<Color4f> + AsMutSlice2<Color4f>,
{
    fn size(&self) -> (usize, usize) {
        let s = self.as_slice2();
        (s.width(), s.height())
    }

    fn clear(&mut self, ctx: &Context) {
        if let Some(c) = ctx.color_clear {
            self.as_mut_slice2().fill(c);
        }
    }

    /// Rasterizes a triangle into this color buffer.
    /// Does no z-buffering.
    fn rasterize<V, Fs>(
        &mut self,
        setup: &Setup<V>,
        fs: &Fs,
        ops: FragOps,
        threads: usize,
    ) -> Throughput
    where
        V: Vary + Sync,
        Fs: FragmentShader<V> + Sync,
    {
        let rows = setup.rows();
        let y0 = rows.start;
        let mut color = rows_of(self.as_mut_slice2(), rows.clone());

        let n = num_bands(threads, rows.len());
        if n <= 1 {
            return shade_band(setup, fs, ops, y0, &mut color, None);
        }
        let jobs = color.into_bands(n).into_iter().map(|(y, mut c)| {
            move || shade_band(setup, fs, ops, y0 + y, &mut c, None)
        });
        sum(in_parallel(jobs))
    }
}

/// Converts a linear color buffer into `u32`s in `0xAA_RR_GG_BB` format,
/// applying the sRGB transfer function ("gamma correction") to the
/// color channels. Alpha is kept linear.
///
/// Uses at most `threads` worker threads.
///
/// # Panics
/// In debug builds, if `src` and `dst` have different dimensions.
#[cfg(feature = "fp")]
pub fn present(
    src: &impl AsSlice2<Color4f>,
    dst: &mut impl AsMutSlice2<u32>,
    threads: usize,
) {
    present_with(src, dst, threads, |c| {
        c.to_srgb().with_alpha(c.a()).to_argb_u32()
    });
}

/// Converts each color in `src` with `conv` and writes the result to the
/// same position in `dst`.
///
/// Uses at most `threads` worker threads.
///
/// # Panics
/// In debug builds, if `src` and `dst` have different dimensions.
pub fn present_with<T, F>(
    src: &impl AsSlice2<Color4f>,
    dst: &mut impl AsMutSlice2<T>,
    threads: usize,
    conv: F,
) where
    T: Send,
    F: Fn(Color4f) -> T + Sync,
{
    let src = src.as_slice2();
    let dst = dst.as_mut_slice2();
    debug_assert_eq!(
        (src.width(), src.height()),
        (dst.width(), dst.height()),
        "source and destination dimensions differ"
    );
    let convert = |y0: usize, mut band: MutSlice2<'_, T>| {
        for (s, d) in src.rows().skip(y0).zip(band.rows_mut()) {
            for (s, d) in s.iter().zip(d) {
                *d = conv(*s);
            }
        }
    };
    if threads > 1 {
        let convert = &convert;
        let bands = dst.into_bands(threads).into_iter();
        in_parallel(bands.map(|(y0, band)| move || convert(y0, band)));
    } else {
        convert(0, dst);
    }
}

/// Returns the rows `ys` of `buf`, clamped to its height.
fn rows_of<T>(buf: MutSlice2<'_, T>, ys: Range<usize>) -> MutSlice2<'_, T> {
    let h = buf.height();
    let (_, rest) = buf.split_rows_mut(ys.start.min(h));
    let (mid, _) = rest.split_rows_mut(ys.len().min(h - ys.start.min(h)));
    mid
}

/// Returns the number of bands to split `rows` rows into.
fn num_bands(threads: usize, rows: usize) -> usize {
    if cfg!(feature = "std") {
        threads.min(rows / MIN_ROWS_PER_THREAD).max(1)
    } else {
        1
    }
}

/// Runs each job on its own scoped thread, returning the results in order.
#[cfg(feature = "std")]
fn in_parallel<T, J>(jobs: impl Iterator<Item = J>) -> Vec<T>
where
    T: Send,
    J: FnOnce() -> T + Send,
{
    std::thread::scope(|s| {
        let handles: Vec<_> = jobs.map(|job| s.spawn(job)).collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .collect()
    })
}

/// Runs each job in turn, returning the results in order.
#[cfg(not(feature = "std"))]
fn in_parallel<T, J>(jobs: impl Iterator<Item = J>) -> Vec<T>
where
    J: FnOnce() -> T,
{
    jobs.map(|job| job()).collect()
}

fn sum(ios: Vec<Throughput>) -> Throughput {
    ios.into_iter().fold(Throughput::default(), |mut acc, io| {
        acc += io;
        acc
    })
}

/// Shades the fragments of `setup` that fall within a band of rows.
///
/// `y0` is the index of the first row of `color` (and `depth`)
/// in target coordinates.
fn shade_band<V, Fs>(
    setup: &Setup<V>,
    fs: &Fs,
    ops: FragOps,
    y0: usize,
    color: &mut MutSlice2<'_, Color4f>,
    mut depth: Option<&mut MutSlice2<'_, f32>>,
) -> Throughput
where
    V: Vary,
    Fs: FragmentShader<V>,
{
    let mut io = Throughput::default();
    for y in y0..y0 + color.height() {
        let row = y - y0;
        io.i += setup.scan_row(y, ops.msaa, |x, frag| {
            let new_z = frag.pos.z();
            if let Some(d) = depth.as_deref_mut() {
                if !ops.depth_test(new_z, d[row][x]) {
                    return;
                }
            }
            let coverage = frag.coverage;
            let Some(src) = fs.shade_fragment(frag) else {
                return;
            };
            if ops.color_write {
                let dst = &mut color[row][x];
                *dst = blend(src, *dst, coverage, ops.blend);
            }
            if ops.depth_write {
                if let Some(d) = depth.as_deref_mut() {
                    d[row][x] = new_z;
                }
            }
            io.o += 1;
        });
    }
    io
}

/// Combines the fragment color `src` with the existing color `dst`.
///
/// Partial coverage scales the fragment's contribution: with blending on,
/// it multiplies the source alpha; with blending off, the result is a mix
/// of `src` and `dst` weighted by `coverage`.
#[inline]
fn blend(src: Color4f, dst: Color4f, coverage: f32, alpha: bool) -> Color4f {
    if alpha {
        src.with_alpha(src.a() * coverage).over(&dst)
    } else if coverage < 1.0 {
        dst.lerp(&src, coverage)
    } else {
        src
    }
}

#[cfg(test)]
mod tests {
    use crate::assert_approx_eq;
    use crate::math::{pt3, rgba};
    use crate::render::{Frag, Msaa, raster::{ScreenVert, setup}};
    use crate::util::buf::Buf2;

    use super::*;

    const RED: Color4f = rgba(1.0, 0.0, 0.0, 1.0);

    fn tri(z: f32) -> Setup<()> {
        let v = |x, y| ScreenVert { pos: pt3(x, y, z), recip_w: 1.0, var: () };
        setup([v(0.0, 0.0), v(4.0, 0.0), v(0.0, 4.0)], 4, 4).unwrap()
    }

    fn framebuf() -> Framebuf<Buf2<Color4f>, Buf2<f32>> {
        let mut fb = Framebuf {
            color_buf: Buf2::new_default(4, 4),
            depth_buf: Buf2::new_default(4, 4),
        };
        fb.clear(&Context::default());
        fb
    }

    #[test]
    fn clear_fills_both_buffers() {
        let fb = framebuf();
        assert_eq!(fb.size(), (4, 4));
        assert!(fb.color_buf.iter().all(|&c| c == rgba(0.0, 0.0, 0.0, 1.0)));
        assert!(fb.depth_buf.iter().all(|&z| z == f32::INFINITY));
    }

    #[test]
    fn depth_test_rejects_farther() {
        let mut fb = framebuf();
        let ops = Context::default().frag_ops();
        let fs = |_: Frag<()>| RED;

        let io = fb.rasterize(&tri(0.5), &fs, ops, 1);
        assert_eq!(io, Throughput { i: 10, o: 10 });
        assert_eq!(fb.depth_buf[[0, 0]], 0.5);

        let fs = |_: Frag<()>| rgba(0.0, 1.0, 0.0, 1.0);
        let io = fb.rasterize(&tri(0.7), &fs, ops, 1);
        assert_eq!(io, Throughput { i: 10, o: 0 });
        assert_eq!(fb.color_buf[[0, 0]], RED);

        let io = fb.rasterize(&tri(0.2), &fs, ops, 1);
        assert_eq!(io.o, 10);
        assert_eq!(fb.color_buf[[0, 0]], rgba(0.0, 1.0, 0.0, 1.0));
        assert_eq!(fb.depth_buf[[0, 0]], 0.2);
    }

    #[test]
    fn discarded_fragments_write_nothing() {
        let mut fb = framebuf();
        let ops = Context::default().frag_ops();
        let io = fb.rasterize(&tri(0.5), &|_: Frag<()>| None::<Color4f>, ops, 1);
        assert_eq!(io, Throughput { i: 10, o: 0 });
        assert!(fb.depth_buf.iter().all(|&z| z == f32::INFINITY));
    }

    #[test]
    fn write_masks() {
        let mut fb = framebuf();
        let ops = FragOps {
            color_write: false,
            ..Context::default().frag_ops()
        };
        fb.rasterize(&tri(0.5), &|_: Frag<()>| RED, ops, 1);
        assert_eq!(fb.color_buf[[0, 0]], rgba(0.0, 0.0, 0.0, 1.0));
        assert_eq!(fb.depth_buf[[0, 0]], 0.5);

        let mut fb = framebuf();
        let ops = FragOps {
            depth_write: false,
            ..Context::default().frag_ops()
        };
        fb.rasterize(&tri(0.5), &|_: Frag<()>| RED, ops, 1);
        assert_eq!(fb.color_buf[[0, 0]], RED);
        assert_eq!(fb.depth_buf[[0, 0]], f32::INFINITY);
    }

    #[test]
    fn alpha_blending() {
        let mut fb = framebuf();
        let ops = Context::default().frag_ops();
        let fs = |_: Frag<()>| rgba(1.0, 1.0, 1.0, 0.25);
        fb.rasterize(&tri(0.5), &fs, ops, 1);
        assert_approx_eq!(fb.color_buf[[0, 0]], rgba(0.25, 0.25, 0.25, 1.0));

        let ops = FragOps { blend: false, ..ops };
        fb.rasterize(&tri(0.1), &fs, ops, 1);
        assert_eq!(fb.color_buf[[0, 0]], rgba(1.0, 1.0, 1.0, 0.25));
    }

    #[test]
    fn partial_coverage_mixes_colors() {
        let blended = blend(RED, rgba(0.0, 0.0, 1.0, 1.0), 0.5, true);
        assert_approx_eq!(blended, rgba(0.5, 0.0, 0.5, 1.0));
        let mixed = blend(RED, rgba(0.0, 0.0, 1.0, 1.0), 0.5, false);
        assert_approx_eq!(mixed, rgba(0.5, 0.0, 0.5, 1.0));
        assert_eq!(blend(RED, rgba(0.0, 0.0, 1.0, 1.0), 1.0, false), RED);
    }

    #[test]
    fn color_only_target() {
        let mut buf = Buf2::<Color4f>::new_default(4, 4);
        let ops = FragOps { msaa: Msaa::Off, ..Context::default().frag_ops() };
        let io = buf.rasterize(&tri(0.5), &|_: Frag<()>| RED, ops, 1);
        assert_eq!(io.o, 10);
        assert_eq!(buf[[3, 0]], RED);
        assert_eq!(buf[[3, 3]], Color4f::default());
    }

    #[test]
    fn rows_of_clamps() {
        let mut buf = Buf2::<u8>::new_default(2, 4);
        assert_eq!(rows_of(buf.as_mut_slice2(), 1..3).height(), 2);
        assert_eq!(rows_of(buf.as_mut_slice2(), 3..9).height(), 1);
        assert_eq!(rows_of(buf.as_mut_slice2(), 7..9).height(), 0);
    }

    #[test]
    fn present_with_converts_every_pixel() {
        let src = Buf2::new_with(3, 5, |x, y| rgba(x as f32, y as f32, 0.0, 1.0));
        let mut dst = Buf2::<u32>::new_default(3, 5);
        present_with(&src, &mut dst, 1, |c| (c.r() + 10.0 * c.g()) as u32);
        assert_eq!(dst[[2, 4]], 42);
    }

    #[cfg(feature = "std")]
    #[test]
    fn parallel_present_matches_serial() {
        let src = Buf2::new_with(7, 13, |x, y| {
            rgba(x as f32 / 7.0, y as f32 / 13.0, 0.5, 1.0)
        });
        let mut a = Buf2::<u32>::new_default(7, 13);
        let mut b = Buf2::<u32>::new_default(7, 13);
        present(&src, &mut a, 1);
        present(&src, &mut b, 4);
        assert_eq!(a.data(), b.data());
        assert_eq!(a[[0, 0]] >> 24, 0xFF);
    }
}

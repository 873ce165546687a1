//! Textures and texture samplers.
//!
//! A [`Texture`] is a 2D grid of texels, stored either in ordinary
//! row-major order or in Z-order (Morton order), which keeps texels that
//! are close in 2D also close in memory. Samplers map continuous texture
//! coordinates to texel values; coordinates outside 0.0..=1.0 are clamped
//! to the edge of the texture.

use alloc::vec::Vec;

use crate::math::{Vary, Vec2, Vec3, Vector, float};
use crate::util::buf::{AsSlice2, Buf2};

/// Basis of the texture space.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Tex;

/// Texture coordinate vector. `u` increases to the right and `v` down;
/// (0, 0) is the top left corner of the texture and (1, 1) the bottom right.
pub type TexCoord = Vec2<Tex>;

/// Memory layout of texel data.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Layout {
    /// Row-major order.
    #[default]
    Linear,
    /// Z-order, with x and y index bits interleaved.
    Morton,
}

/// A 2D texture.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture<C> {
    w: usize,
    h: usize,
    layout: Layout,
    data: Vec<C>,
}

/// A sampler returning the texel nearest to the texture coordinate.
#[derive(Copy, Clone, Debug, Default)]
pub struct SamplerNearest;

/// A sampler interpolating bilinearly between the four texels
/// nearest to the texture coordinate.
#[derive(Copy, Clone, Debug, Default)]
pub struct SamplerBilinear;

/// A cube map: six square textures forming the faces of a cube,
/// sampled by direction.
#[derive(Clone, Debug)]
pub struct CubeMap<C> {
    faces: [Texture<C>; 6],
}

/// The faces of a cube map, in storage order.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Face {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

/// Returns a new texture coordinate with components `u` and `v`.
#[inline]
pub const fn uv(u: f32, v: f32) -> TexCoord {
    Vector::new([u, v])
}

impl TexCoord {
    /// Returns the u (horizontal) component of `self`.
    #[inline]
    pub fn u(&self) -> f32 {
        self.0[0]
    }
    /// Returns the v (vertical) component of `self`.
    #[inline]
    pub fn v(&self) -> f32 {
        self.0[1]
    }
}

impl<C> Texture<C> {
    /// Returns the width of `self` in texels.
    #[inline]
    pub fn width(&self) -> usize {
        self.w
    }
    /// Returns the height of `self` in texels.
    #[inline]
    pub fn height(&self) -> usize {
        self.h
    }
    /// Returns the memory layout of `self`.
    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Returns the texel at (x, y), or `None` if out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&C> {
        (x < self.w && y < self.h).then(|| &self.data[self.index(x, y)])
    }

    /// Returns the texel at (x, y), clamping the coordinates to bounds.
    ///
    /// # Panics
    /// If `self` is empty.
    #[inline]
    pub fn texel(&self, x: isize, y: isize) -> &C {
        let x = x.clamp(0, self.w as isize - 1) as usize;
        let y = y.clamp(0, self.h as isize - 1) as usize;
        &self.data[self.index(x, y)]
    }

    fn index(&self, x: usize, y: usize) -> usize {
        match self.layout {
            Layout::Linear => y * self.w + x,
            Layout::Morton => morton(x as u32, y as u32) as usize,
        }
    }
}

impl<C: Copy + Default> Texture<C> {
    /// Creates a texture from the contents of `buf` with the given layout.
    ///
    /// A Morton-order texture is padded to a square with a power-of-two
    /// side, so that every (x, y) in bounds has a unique index.
    pub fn new(buf: &impl AsSlice2<C>, layout: Layout) -> Self {
        let s = buf.as_slice2();
        let (w, h) = (s.width(), s.height());
        let data = match layout {
            Layout::Linear => s.iter().copied().collect(),
            Layout::Morton => {
                let side = w.max(h).next_power_of_two();
                let mut data = alloc::vec![C::default(); side * side];
                for (y, row) in s.rows().enumerate() {
                    for (x, c) in row.iter().enumerate() {
                        data[morton(x as u32, y as u32) as usize] = *c;
                    }
                }
                data
            }
        };
        Self { w, h, layout, data }
    }

    /// Returns `self` in the given layout.
    #[must_use]
    pub fn with_layout(self, layout: Layout) -> Self {
        if layout == self.layout {
            return self;
        }
        let buf = Buf2::new_with(self.w, self.h, |x, y| {
            self.get(x, y).copied().unwrap_or_default()
        });
        Self::new(&buf, layout)
    }
}

impl<C: Copy> From<Buf2<C>> for Texture<C> {
    fn from(buf: Buf2<C>) -> Self {
        let (w, h) = (buf.width(), buf.height());
        let data = if buf.is_contiguous() {
            buf.into_vec()
        } else {
            buf.iter().copied().collect()
        };
        Self { w, h, layout: Layout::Linear, data }
    }
}

/// Interleaves the bits of `x` and `y`, `x` in the even bit positions.
///
/// Only the low 16 bits of each argument are used.
pub fn morton(x: u32, y: u32) -> u32 {
    fn spread(mut v: u32) -> u32 {
        v &= 0x0000_FFFF;
        v = (v | (v << 8)) & 0x00FF_00FF;
        v = (v | (v << 4)) & 0x0F0F_0F0F;
        v = (v | (v << 2)) & 0x3333_3333;
        v = (v | (v << 1)) & 0x5555_5555;
        v
    }
    spread(x) | (spread(y) << 1)
}

impl SamplerNearest {
    /// Returns the texel of `tex` nearest to `tc`.
    ///
    /// # Panics
    /// If `tex` is empty.
    pub fn sample<C: Copy>(&self, tex: &Texture<C>, tc: TexCoord) -> C {
        let x = float::floor(tc.u() * tex.w as f32) as isize;
        let y = float::floor(tc.v() * tex.h as f32) as isize;
        *tex.texel(x, y)
    }
}

impl SamplerBilinear {
    /// Returns the value of `tex` at `tc`, interpolated bilinearly from
    /// the four texels whose centers surround `tc`.
    ///
    /// # Panics
    /// If `tex` is empty.
    pub fn sample<C: Vary>(&self, tex: &Texture<C>, tc: TexCoord) -> C {
        // Texel centers are at half-integer coordinates. Beyond one texel
        // past the edge every sample is the edge texel, so clamping there
        // keeps the indices small. `max` also maps NaN to the lower bound.
        let x = (tc.u() * tex.w as f32 - 0.5).max(-1.0).min(tex.w as f32);
        let y = (tc.v() * tex.h as f32 - 0.5).max(-1.0).min(tex.h as f32);
        let (x0, y0) = (float::floor(x), float::floor(y));
        let (fx, fy) = (x - x0, y - y0);
        let (x0, y0) = (x0 as isize, y0 as isize);

        let top = tex.texel(x0, y0).lerp(tex.texel(x0 + 1, y0), fx);
        let bot = tex.texel(x0, y0 + 1).lerp(tex.texel(x0 + 1, y0 + 1), fx);
        top.lerp(&bot, fy)
    }
}

impl<C> CubeMap<C> {
    /// Creates a cube map from six faces, in the order
    /// +x, -x, +y, -y, +z, -z.
    pub fn new(faces: [Texture<C>; 6]) -> Self {
        Self { faces }
    }

    /// Returns the given face of `self`.
    pub fn face(&self, f: Face) -> &Texture<C> {
        &self.faces[f as usize]
    }

    /// Returns the face hit by a ray from the center of the cube in the
    /// direction `dir`, and the texture coordinate of the hit point.
    ///
    /// The face is the one whose axis has the largest absolute component
    /// in `dir`. Ties resolve in favor of x, then y.
    pub fn face_uv<B>(dir: Vec3<B>) -> (Face, TexCoord) {
        let [x, y, z] = dir.0;
        let (ax, ay, az) = (float::abs(x), float::abs(y), float::abs(z));
        let (face, s, t, ma) = if ax >= ay && ax >= az {
            if x >= 0.0 {
                (Face::PosX, -z, -y, ax)
            } else {
                (Face::NegX, z, -y, ax)
            }
        } else if ay >= az {
            if y >= 0.0 {
                (Face::PosY, x, z, ay)
            } else {
                (Face::NegY, x, -z, ay)
            }
        } else if z >= 0.0 {
            (Face::PosZ, x, -y, az)
        } else {
            (Face::NegZ, -x, -y, az)
        };
        let ma = ma.max(f32::MIN_POSITIVE);
        (face, uv(0.5 * (s / ma + 1.0), 0.5 * (t / ma + 1.0)))
    }
}

impl<C: Vary> CubeMap<C> {
    /// Samples `self` in the direction `dir` with bilinear filtering.
    pub fn sample<B>(&self, dir: Vec3<B>) -> C {
        let (face, tc) = Self::face_uv(dir);
        SamplerBilinear.sample(self.face(face), tc)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use crate::assert_approx_eq;
    use crate::math::{Color4f, rgba, vec3};

    use super::*;

    const R: Color4f = rgba(1.0, 0.0, 0.0, 1.0);
    const G: Color4f = rgba(0.0, 1.0, 0.0, 1.0);
    const B: Color4f = rgba(0.0, 0.0, 1.0, 1.0);
    const W: Color4f = rgba(1.0, 1.0, 1.0, 1.0);

    fn tex(layout: Layout) -> Texture<Color4f> {
        Texture::new(&Buf2::from_vec(2, 2, vec![R, G, B, W]), layout)
    }

    #[test]
    fn morton_codes() {
        assert_eq!(morton(0, 0), 0);
        assert_eq!(morton(1, 0), 1);
        assert_eq!(morton(0, 1), 2);
        assert_eq!(morton(1, 1), 3);
        assert_eq!(morton(2, 0), 4);
        assert_eq!(morton(3, 5), 0b100111);
    }

    #[test]
    fn morton_layout_matches_linear() {
        let buf = Buf2::new_with(5, 3, |x, y| (10 * y + x) as u8);
        let lin = Texture::new(&buf, Layout::Linear);
        let mor = Texture::new(&buf, Layout::Morton);
        for y in 0..3 {
            for x in 0..5 {
                assert_eq!(lin.get(x, y), mor.get(x, y));
            }
        }
        assert_eq!(mor.get(5, 0), None);
        assert_eq!(mor.clone().with_layout(Layout::Linear), lin);
    }

    #[test]
    fn texel_clamps_to_edge() {
        let t = tex(Layout::Linear);
        assert_eq!(*t.texel(-3, 0), R);
        assert_eq!(*t.texel(5, -1), G);
        assert_eq!(*t.texel(7, 7), W);
    }

    #[test]
    fn nearest_sampling() {
        for layout in [Layout::Linear, Layout::Morton] {
            let t = tex(layout);
            let s = SamplerNearest;
            assert_eq!(s.sample(&t, uv(0.2, 0.2)), R);
            assert_eq!(s.sample(&t, uv(0.7, 0.2)), G);
            assert_eq!(s.sample(&t, uv(0.2, 0.7)), B);
            assert_eq!(s.sample(&t, uv(1.5, 1.5)), W);
            assert_eq!(s.sample(&t, uv(-1.0, 0.0)), R);
        }
    }

    #[test]
    fn bilinear_one_texel() {
        let t = Texture::from(Buf2::new_with(1, 1, |_, _| G));
        for tc in [uv(0.0, 0.0), uv(0.3, 0.9), uv(1.0, 1.0), uv(-2.0, 5.0)] {
            assert_eq!(SamplerBilinear.sample(&t, tc), G);
        }
    }

    #[test]
    fn bilinear_corners_and_center() {
        let t = tex(Layout::Morton);
        let s = SamplerBilinear;
        assert_approx_eq!(s.sample(&t, uv(0.0, 0.0)), R);
        assert_approx_eq!(s.sample(&t, uv(1.0, 0.0)), G);
        assert_approx_eq!(s.sample(&t, uv(0.0, 1.0)), B);
        assert_approx_eq!(s.sample(&t, uv(1.0, 1.0)), W);
        assert_approx_eq!(
            s.sample(&t, uv(0.5, 0.5)),
            rgba(0.5, 0.5, 0.5, 1.0)
        );
        assert_approx_eq!(
            s.sample(&t, uv(0.5, 0.25)),
            rgba(0.5, 0.5, 0.0, 1.0)
        );
    }

    #[test]
    fn bilinear_far_outside_clamps_to_edge() {
        let t = tex(Layout::Linear);
        let s = SamplerBilinear;
        assert_eq!(s.sample(&t, uv(1e30, 0.0)), G);
        assert_eq!(s.sample(&t, uv(f32::INFINITY, 1.0)), W);
        assert_eq!(s.sample(&t, uv(f32::NEG_INFINITY, 1e30)), B);
        assert_eq!(s.sample(&t, uv(-1e30, f32::NEG_INFINITY)), R);
        assert_approx_eq!(
            s.sample(&t, uv(1e30, 0.5)),
            rgba(0.5, 1.0, 0.5, 1.0)
        );
        assert_eq!(s.sample(&t, uv(f32::NAN, f32::NAN)), R);
    }

    #[test]
    fn cube_map_face_selection() {
        let (f, tc) = CubeMap::<()>::face_uv(vec3::<f32, ()>(1.0, 0.0, 0.0));
        assert_eq!(f, Face::PosX);
        assert_eq!(tc, uv(0.5, 0.5));

        let (f, _) = CubeMap::<()>::face_uv(vec3::<_, ()>(0.1, -2.0, 0.5));
        assert_eq!(f, Face::NegY);
        let (f, _) = CubeMap::<()>::face_uv(vec3::<_, ()>(0.0, 0.0, -1.0));
        assert_eq!(f, Face::NegZ);

        let (f, tc) = CubeMap::<()>::face_uv(vec3::<_, ()>(0.0, 0.0, 1.0));
        assert_eq!(f, Face::PosZ);
        assert_eq!(tc, uv(0.5, 0.5));

        let (f, tc) = CubeMap::<()>::face_uv(vec3::<_, ()>(1.0, 1.0, 1.0));
        assert_eq!(f, Face::PosX);
        assert_eq!(tc, uv(0.0, 0.0));
    }

    #[test]
    fn cube_map_sampling() {
        let solid = |c: Color4f| Texture::from(Buf2::new_with(2, 2, |_, _| c));
        let cube = CubeMap::new([R, G, B, W, R, G].map(solid));
        assert_eq!(cube.sample(vec3::<_, ()>(0.0, -3.0, 0.1)), W);
        assert_eq!(cube.sample(vec3::<_, ()>(-1.0, 0.2, 0.1)), G);
    }
}

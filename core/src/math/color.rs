//! Colors and color spaces.
//!
//! Colors are stored and blended in linear RGB with `f32` channels. Only
//! when presenting a finished image are they converted to sRGB and packed
//! into bytes.

use core::array;
use core::fmt::{self, Debug, Formatter};
use core::marker::PhantomData;
use core::ops::{Add, AddAssign, Mul, Sub};

use super::approx::ApproxEq;
use super::space::{Affine, Linear};

#[cfg(feature = "fp")]
use super::float;

//
// Types
//

/// A generic color type, similar to [`Vector`][super::vec::Vector].
///
/// # Type parameters
/// * `Repr`: the representation of the components of `Self`.
///   Color components are also called *channels*.
/// * `Space`: the color space that `Self` is an element of.
#[repr(transparent)]
pub struct Color<Repr, Space>(pub Repr, PhantomData<Space>);

/// The RGB color space.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Rgb;

/// The RGBA color space (RGB plus alpha, or opacity).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Rgba;

/// An RGB color with `u8` components.
pub type Color3<Space = Rgb> = Color<[u8; 3], Space>;
/// An RGBA color with `u8` components.
pub type Color4<Space = Rgba> = Color<[u8; 4], Space>;
/// An RGB color with `f32` components.
pub type Color3f<Space = Rgb> = Color<[f32; 3], Space>;
/// An RGBA color with `f32` components.
pub type Color4f<Space = Rgba> = Color<[f32; 4], Space>;

/// Returns a new RGB color with `r`, `g`, and `b` components.
pub const fn rgb<Ch>(r: Ch, g: Ch, b: Ch) -> Color<[Ch; 3], Rgb> {
    Color([r, g, b], PhantomData)
}

/// Returns a new RGBA color with `r`, `g`, `b`, and `a` components.
pub const fn rgba<Ch>(r: Ch, g: Ch, b: Ch, a: Ch) -> Color<[Ch; 4], Rgba> {
    Color([r, g, b, a], PhantomData)
}

/// Returns an RGB gray color with all components equal to `lum`.
pub const fn gray<Ch: Copy>(lum: Ch) -> Color<[Ch; 3], Rgb> {
    rgb(lum, lum, lum)
}

//
// Inherent impls
//

impl<R, Sp> Color<R, Sp> {
    /// Returns a new color with representation `repr`.
    #[inline]
    pub const fn new(repr: R) -> Self {
        Self(repr, PhantomData)
    }
}

impl<Ch: Copy> Color<[Ch; 3], Rgb> {
    /// Returns the red component of `self`.
    pub const fn r(&self) -> Ch {
        self.0[0]
    }
    /// Returns the green component of `self`.
    pub const fn g(&self) -> Ch {
        self.0[1]
    }
    /// Returns the blue component of `self`.
    pub const fn b(&self) -> Ch {
        self.0[2]
    }
    /// Returns `self` with alpha component `a` added.
    pub const fn to_rgba(self, a: Ch) -> Color<[Ch; 4], Rgba> {
        rgba(self.r(), self.g(), self.b(), a)
    }
}

impl<Ch: Copy> Color<[Ch; 4], Rgba> {
    /// Returns the red component of `self`.
    pub const fn r(&self) -> Ch {
        self.0[0]
    }
    /// Returns the green component of `self`.
    pub const fn g(&self) -> Ch {
        self.0[1]
    }
    /// Returns the blue component of `self`.
    pub const fn b(&self) -> Ch {
        self.0[2]
    }
    /// Returns the alpha component of `self`.
    pub const fn a(&self) -> Ch {
        self.0[3]
    }
    /// Returns the RGB components of `self`, discarding alpha.
    pub const fn to_rgb(self) -> Color<[Ch; 3], Rgb> {
        rgb(self.r(), self.g(), self.b())
    }
    /// Returns `self` with the alpha component replaced by `a`.
    #[must_use]
    pub const fn with_alpha(self, a: Ch) -> Self {
        rgba(self.r(), self.g(), self.b(), a)
    }
}

impl Color3 {
    /// Returns a `u32` containing the component bytes of `self`
    /// in format `0x00_RR_GG_BB`.
    pub const fn to_rgb_u32(self) -> u32 {
        let [r, g, b] = self.0;
        u32::from_be_bytes([0x00, r, g, b])
    }
}

impl Color4 {
    /// Returns a `u32` containing the component bytes of `self`
    /// in format `0xAA_RR_GG_BB`.
    pub const fn to_argb_u32(self) -> u32 {
        let [r, g, b, a] = self.0;
        u32::from_be_bytes([a, r, g, b])
    }

    /// Returns `self` with components mapped to the range 0.0..=1.0.
    pub fn to_color4f(self) -> Color4f {
        Color::new(self.0.map(|c| c as f32 / 255.0))
    }
}

impl<const N: usize, Sp> Color<[f32; N], Sp> {
    /// Returns `self` with each component clamped to 0.0..=1.0.
    #[must_use]
    pub fn clamp(&self) -> Self {
        Self::new(self.0.map(|c| c.clamp(0.0, 1.0)))
    }

    /// Returns the component-wise product of `self` and `other`.
    ///
    /// Used to modulate a color by another, for example a texel by the
    /// intensity of incident light.
    #[must_use]
    pub fn mul_comp(&self, other: &Self) -> Self {
        Self::new(array::from_fn(|i| self.0[i] * other.0[i]))
    }

    /// Converts each component of `self` from sRGB to linear RGB.
    #[cfg(feature = "fp")]
    #[must_use]
    pub fn to_linear(&self) -> Self {
        Self::new(self.0.map(srgb_to_linear))
    }

    /// Converts each component of `self` from linear RGB to sRGB.
    #[cfg(feature = "fp")]
    #[must_use]
    pub fn to_srgb(&self) -> Self {
        Self::new(self.0.map(linear_to_srgb))
    }

    /// Maps each component of `self` to `u8`, clamping to 0.0..=1.0
    /// and rounding to nearest.
    #[inline]
    fn to_u8(self) -> [u8; N] {
        self.0.map(|c| (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u8)
    }
}

impl Color3f {
    /// Returns `self` converted to a `Color3`, see [`Color4f::to_color4`].
    pub fn to_color3(self) -> Color3 {
        Color::new(self.to_u8())
    }
}

impl Color4f {
    /// Returns `self` converted to a `Color4`.
    ///
    /// Each component is clamped to 0.0..=1.0, then scaled to 0..=255
    /// and rounded to the nearest integer.
    pub fn to_color4(self) -> Color4 {
        Color::new(self.to_u8())
    }

    /// Returns `self` packed into a `u32` in format `0xAA_RR_GG_BB`,
    /// see [`Color4::to_argb_u32`].
    pub fn to_argb_u32(self) -> u32 {
        self.to_color4().to_argb_u32()
    }

    /// Composites `self` over `dst` using non-premultiplied alpha.
    ///
    /// The result alpha is `a_s + a_d (1 - a_s)` and the result color is
    /// `(c_s a_s + c_d a_d (1 - a_s)) / a_out`. A fully transparent result
    /// has all components zero.
    #[must_use]
    pub fn over(&self, dst: &Self) -> Self {
        let (sa, da) = (self.a(), dst.a());
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            return Self::new([0.0; 4]);
        }
        let dw = da * (1.0 - sa);
        let ch = |s: f32, d: f32| (s * sa + d * dw) / out_a;
        rgba(
            ch(self.r(), dst.r()),
            ch(self.g(), dst.g()),
            ch(self.b(), dst.b()),
            out_a,
        )
    }
}

/// Converts a single channel value from sRGB to linear.
#[cfg(feature = "fp")]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        float::powf((c + 0.055) / 1.055, 2.4)
    }
}

/// Converts a single channel value from linear to sRGB.
#[cfg(feature = "fp")]
pub fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * float::powf(c, 1.0 / 2.4) - 0.055
    }
}

//
// Local trait impls
//

impl<Sp, const DIM: usize> Affine for Color<[f32; DIM], Sp> {
    type Space = Sp;
    type Diff = Self;

    const DIM: usize = DIM;

    #[inline]
    fn add(&self, other: &Self) -> Self {
        Self::new(array::from_fn(|i| self.0[i] + other.0[i]))
    }
    #[inline]
    fn sub(&self, other: &Self) -> Self {
        Self::new(array::from_fn(|i| self.0[i] - other.0[i]))
    }
}

impl<Sp, const DIM: usize> Linear for Color<[f32; DIM], Sp> {
    type Scalar = f32;

    /// Returns the all-zeroes color (transparent black).
    fn zero() -> Self {
        Self::new([0.0; DIM])
    }
    #[inline]
    fn neg(&self) -> Self {
        Self::new(self.0.map(|c| -c))
    }
    #[inline]
    fn mul(&self, scalar: f32) -> Self {
        Self::new(self.0.map(|c| c * scalar))
    }
}

impl<Sp, const DIM: usize> ApproxEq<Self, f32> for Color<[f32; DIM], Sp> {
    fn approx_eq_eps(&self, other: &Self, eps: &f32) -> bool {
        self.0.approx_eq_eps(&other.0, eps)
    }
    fn relative_epsilon() -> f32 {
        f32::relative_epsilon()
    }
}

//
// Foreign trait impls
//

impl<R: Copy, Sp> Copy for Color<R, Sp> {}

impl<R: Clone, Sp> Clone for Color<R, Sp> {
    fn clone(&self) -> Self {
        Self(self.0.clone(), PhantomData)
    }
}

impl<R: Default, Sp> Default for Color<R, Sp> {
    fn default() -> Self {
        Self(R::default(), PhantomData)
    }
}

impl<R: Eq, Sp> Eq for Color<R, Sp> {}

impl<R: PartialEq, Sp> PartialEq for Color<R, Sp> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<R: Debug, Sp: Debug + Default> Debug for Color<R, Sp> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Color<{:?}>{:?}", Sp::default(), self.0)
    }
}

impl<R, Sp> From<R> for Color<R, Sp> {
    #[inline]
    fn from(els: R) -> Self {
        Self(els, PhantomData)
    }
}

impl<Sp, const DIM: usize> Add for Color<[f32; DIM], Sp> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Affine::add(&self, &rhs)
    }
}

impl<Sp, const DIM: usize> AddAssign for Color<[f32; DIM], Sp> {
    fn add_assign(&mut self, rhs: Self) {
        *self = Affine::add(&*self, &rhs);
    }
}

impl<Sp, const DIM: usize> Sub for Color<[f32; DIM], Sp> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Affine::sub(&self, &rhs)
    }
}

impl<Sp, const DIM: usize> Mul<f32> for Color<[f32; DIM], Sp> {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Linear::mul(&self, rhs)
    }
}

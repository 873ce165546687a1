//! Light sources

use core::fmt::{self, Debug, Formatter};

use crate::math::{Apply, Color3f, Mat4x4, Point3, RealToReal, Vary, Vec3};

/// A light source.
#[derive(Copy, Clone, PartialEq)]
pub enum Light<B> {
    /// A light source "at infinity", so that the light rays arrive
    /// parallel and the direction of the light source is the same for
    /// every point. For example the sun or the moon.
    ///
    /// The vector points *towards* the light.
    Directional { dir: Vec3<B>, color: Color3f },
    /// A light source radiating omnidirectionally from a single point.
    Point { pos: Point3<B>, color: Color3f },
}

impl<B> Light<B> {
    /// Creates a directional light shining from direction `dir`.
    pub fn directional(dir: Vec3<B>, color: Color3f) -> Self {
        Self::Directional { dir: unit_or_zero(dir), color }
    }

    /// Creates a point light at `pos`.
    pub fn point(pos: Point3<B>, color: Color3f) -> Self {
        Self::Point { pos, color }
    }

    /// Returns the color of `self`.
    pub fn color(&self) -> Color3f {
        match *self {
            Self::Directional { color, .. } | Self::Point { color, .. } => {
                color
            }
        }
    }

    /// Returns the unit vector from `pt` towards `self`, or the zero
    /// vector if `pt` coincides with a point light.
    #[inline]
    pub fn direction(&self, pt: Point3<B>) -> Vec3<B> {
        match *self {
            Self::Directional { dir, .. } => dir,
            Self::Point { pos, .. } => unit_or_zero(pos - pt),
        }
    }

    /// Returns the Lambertian diffuse factor of `self` at a surface point
    /// `pt` with unit normal `n`: the cosine of the angle between `n` and
    /// the direction to the light, clamped to zero for surfaces facing away.
    #[inline]
    pub fn lambert(&self, pt: Point3<B>, n: Vec3<B>) -> f32 {
        self.direction(pt).dot(&n).max(0.0)
    }

    /// Returns the diffuse light color reaching `pt` with unit normal `n`.
    pub fn diffuse(&self, pt: Point3<B>, n: Vec3<B>) -> Color3f {
        self.color().scale(self.lambert(pt, n))
    }

    /// Returns `self` transformed to another space.
    pub fn transform<C>(&self, mat: &Mat4x4<RealToReal<3, B, C>>) -> Light<C> {
        match self {
            Self::Directional { dir, color } => Light::Directional {
                dir: unit_or_zero(mat.apply(dir)),
                color: *color,
            },
            Self::Point { pos, color } => Light::Point {
                pos: mat.apply(pos),
                color: *color,
            },
        }
    }
}

fn unit_or_zero<B>(v: Vec3<B>) -> Vec3<B> {
    let len = v.len();
    if len > 0.0 { v / len } else { v }
}

// Manual impl to avoid a B: Debug bound on the derive.
impl<B: Debug + Default> Debug for Light<B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directional { dir, color } => f
                .debug_struct("Directional")
                .field("dir", dir)
                .field("color", color)
                .finish(),
            Self::Point { pos, color } => f
                .debug_struct("Point")
                .field("pos", pos)
                .field("color", color)
                .finish(),
        }
    }
}

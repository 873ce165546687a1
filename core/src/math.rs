//! Linear algebra and other useful mathematics.
//!
//! Includes [vectors][self::vec], [points][point], [matrices][mat],
//! [quaternions][quat], [colors][color], and [angles][angle], as well as
//! support for custom [varying][vary] types and utilities such as
//! approximate equality comparisons.
//!
//! Vectors, points, and colors are tagged with a type that represents the
//! *space* they are embedded in, and values in different spaces cannot be
//! mixed without explicit conversion. Matrices, similarly, are tagged by
//! both source and destination space, and can only be applied to matching
//! vectors. This turns many errors that would otherwise only manifest as
//! graphical glitches into compile-time type errors.

pub use {
    angle::{Angle, degs, rads, turns},
    approx::ApproxEq,
    color::{
        Color, Color3, Color3f, Color4, Color4f, Rgb, Rgba, gray, rgb, rgba,
    },
    mat::{
        Apply, Mat3x3, Mat4x4, Matrix, RealToProjective, RealToReal, look_at,
        orthographic, perspective, scale, translate, viewport,
    },
    point::{Point, Point2, Point2u, Point3, pt2, pt3},
    quat::Quat,
    space::{Affine, Linear, Proj4, Real},
    vary::{Vary, inv_lerp},
    vec::{
        ProjVec3, Vec2, Vec2i, Vec3, Vec3i, Vec4, Vector, splat, vec2, vec3,
        vec4,
    },
};
#[cfg(feature = "fp")]
pub use {
    angle::{acos, asin, atan2},
    mat::{rotate, rotate_euler, rotate_x, rotate_y, rotate_z},
};

pub mod angle;
pub mod approx;
pub mod color;
pub mod float;
pub mod mat;
pub mod point;
pub mod quat;
pub mod space;
pub mod vary;
pub mod vec;

/// Linearly interpolates between two values.
///
/// For more information, see [`Vary::lerp`].
///
/// # Examples
/// ```
/// use trifle_core::math::lerp;
/// assert_eq!(lerp(0.25, 1.0f32, 5.0), 2.0);
/// ```
#[inline]
pub fn lerp<T: Vary>(t: f32, from: T, to: T) -> T {
    from.lerp(&to, t)
}

//! Varyings: values interpolated across the face of a primitive.

use super::point::Point;
use super::space::{Affine, Linear};

/// Trait for types that can be interpolated across a triangle.
///
/// Vertex attributes such as colors, texture coordinates, and normals
/// are *varyings*: the rasterizer computes a weighted sum of the values at
/// the three vertices of a triangle for each fragment it emits. All that is
/// required of a varying is addition and scaling by a scalar; the remaining
/// methods are provided in terms of these.
///
/// `Vary` is implemented for all [`Linear`] types with `f32` scalars, for
/// points, and for tuples of varyings. Custom structs can implement it
/// field-wise with the [`impl_vary`][crate::impl_vary] macro.
pub trait Vary: Sized + Clone {
    /// Returns the sum of `self` and `other`.
    fn plus(&self, other: &Self) -> Self;

    /// Returns `self` scaled by `factor`.
    fn scale(&self, factor: f32) -> Self;

    /// Linearly interpolates between `self` and `other`.
    ///
    /// Returns `self` if `t` = 0, `other` if `t` = 1, and the weighted
    /// average `(1 - t) * self + t * other` in between.
    ///
    /// # Examples
    /// ```
    /// use trifle_core::math::{Vary, vec2, Vec2};
    ///
    /// assert_eq!(2.0f32.lerp(&5.0, 0.25), 2.75);
    /// let v: Vec2 = vec2(-2.0, 1.0);
    /// assert_eq!(v.lerp(&vec2(2.0, -1.0), 0.5), vec2(0.0, 0.0));
    /// ```
    #[inline]
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self.scale(1.0 - t).plus(&other.scale(t))
    }

    /// Returns the weighted sum of three values.
    ///
    /// If the weights sum to one, they are the barycentric coordinates of
    /// a point within the triangle whose vertex values are `vals`.
    #[inline]
    fn barycentric(vals: [&Self; 3], weights: [f32; 3]) -> Self {
        let [a, b, c] = vals;
        let [wa, wb, wc] = weights;
        a.scale(wa).plus(&b.scale(wb)).plus(&c.scale(wc))
    }
}

impl<T: Linear<Scalar = f32> + Clone> Vary for T {
    #[inline]
    fn plus(&self, other: &Self) -> Self {
        Affine::add(self, other)
    }
    #[inline]
    fn scale(&self, factor: f32) -> Self {
        Linear::mul(self, factor)
    }
}

impl<Sp, const N: usize> Vary for Point<[f32; N], Sp> {
    #[inline]
    fn plus(&self, other: &Self) -> Self {
        Point::new(core::array::from_fn(|i| self.0[i] + other.0[i]))
    }
    #[inline]
    fn scale(&self, factor: f32) -> Self {
        Point::new(self.0.map(|c| c * factor))
    }
}

impl Vary for () {
    fn plus(&self, _: &Self) {}
    fn scale(&self, _: f32) {}
}

impl<T: Vary, U: Vary> Vary for (T, U) {
    #[inline]
    fn plus(&self, (t, u): &Self) -> Self {
        (self.0.plus(t), self.1.plus(u))
    }
    #[inline]
    fn scale(&self, f: f32) -> Self {
        (self.0.scale(f), self.1.scale(f))
    }
}

impl<T: Vary, U: Vary, V: Vary> Vary for (T, U, V) {
    #[inline]
    fn plus(&self, (t, u, v): &Self) -> Self {
        (self.0.plus(t), self.1.plus(u), self.2.plus(v))
    }
    #[inline]
    fn scale(&self, f: f32) -> Self {
        (self.0.scale(f), self.1.scale(f), self.2.scale(f))
    }
}

/// Implements [`Vary`] for a struct with named fields, each of which
/// must itself implement `Vary`.
///
/// # Examples
/// ```
/// use trifle_core::impl_vary;
/// use trifle_core::math::{Color3f, Vary, Vec3, rgb, vec3};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Attrib {
///     color: Color3f,
///     normal: Vec3,
/// }
/// impl_vary!(Attrib { color, normal });
///
/// let a = Attrib { color: rgb(1.0, 0.0, 0.0), normal: vec3(0.0, 0.0, 2.0) };
/// let b = Attrib { color: rgb(0.0, 0.0, 1.0), normal: vec3(0.0, 2.0, 0.0) };
/// let mid = a.lerp(&b, 0.5);
/// assert_eq!(mid.color, rgb(0.5, 0.0, 0.5));
/// assert_eq!(mid.normal, vec3(0.0, 1.0, 1.0));
/// ```
#[macro_export]
macro_rules! impl_vary {
    ($ty:ident { $($field:ident),+ $(,)? }) => {
        impl $crate::math::vary::Vary for $ty {
            #[inline]
            fn plus(&self, other: &Self) -> Self {
                Self {
                    $($field: $crate::math::vary::Vary::plus(
                        &self.$field,
                        &other.$field,
                    )),+
                }
            }
            #[inline]
            fn scale(&self, factor: f32) -> Self {
                Self {
                    $($field: $crate::math::vary::Vary::scale(
                        &self.$field,
                        factor,
                    )),+
                }
            }
        }
    };
}

/// Returns the relative position of `t` between `min` and `max`.
///
/// That is, returns 0 when `t` = `min`, 1 when `t` = `max`, and linearly
/// interpolates in between. The result is unspecified if `min` = `max`.
#[inline]
pub fn inv_lerp(t: f32, min: f32, max: f32) -> f32 {
    (t - min) / (max - min)
}

#[cfg(test)]
mod tests {
    use crate::assert_approx_eq;
    use crate::math::color::{Color3f, rgb};
    use crate::math::point::{Point2, pt2};
    use crate::math::vec::{Vec2, vec2};

    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Attrib {
        uv: Vec2,
        col: Color3f,
    }
    impl_vary!(Attrib { uv, col });

    #[test]
    fn lerp_endpoints_are_exact() {
        let (a, b) = (0.1f32, 0.7f32);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        assert_approx_eq!(a.lerp(&b, 0.5), 0.4);
    }

    #[test]
    fn points_and_tuples() {
        let p: Point2 = pt2(-10.0, 5.0);
        assert_approx_eq!(p.lerp(&pt2(-5.0, 0.0), 0.4), pt2(-8.0, 3.0));

        let t = (1.0f32, vec2::<f32, ()>(0.0, 2.0));
        let u = (3.0, vec2(2.0, 0.0));
        assert_eq!(t.lerp(&u, 0.5), (2.0, vec2(1.0, 1.0)));
        let () = ().lerp(&(), 0.5);
    }

    #[test]
    fn barycentric_weights() {
        let vals = [0.0f32, 10.0, 20.0];
        let [a, b, c] = &vals;
        let v = f32::barycentric([a, b, c], [0.5, 0.25, 0.25]);
        assert_eq!(v, 7.5);
    }

    #[test]
    fn struct_varying() {
        let a = Attrib { uv: vec2(0.0, 0.0), col: rgb(1.0, 0.0, 0.0) };
        let b = Attrib { uv: vec2(1.0, 1.0), col: rgb(0.0, 1.0, 0.0) };
        let c = Attrib { uv: vec2(0.0, 1.0), col: rgb(0.0, 0.0, 1.0) };
        let third = 1.0 / 3.0;
        let m = Attrib::barycentric([&a, &b, &c], [third; 3]);
        assert_approx_eq!(m.uv, vec2(third, 2.0 * third));
        assert_approx_eq!(m.col, rgb(third, third, third));
    }

    #[test]
    fn inverse_lerp() {
        assert_eq!(inv_lerp(2.0, 1.0, 5.0), 0.25);
        assert_eq!(inv_lerp(0.0, -2.0, 2.0), 0.5);
    }
}

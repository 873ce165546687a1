//! Basic geometric primitives.

use crate::math::{Point2, Point3, Vec2, Vec3, float};
use crate::render::Model;

pub use mesh::Mesh;

pub mod mesh;

/// Vertex with a position and arbitrary other attributes.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Vertex<P, A> {
    pub pos: P,
    pub attrib: A,
}

/// Two-dimensional vertex type.
pub type Vertex2<A, B = Model> = Vertex<Point2<B>, A>;

/// Three-dimensional vertex type.
pub type Vertex3<A, B = Model> = Vertex<Point3<B>, A>;

/// Triangle, defined by three vertices.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[repr(transparent)]
pub struct Tri<V>(pub [V; 3]);

/// A surface normal in 3D.
pub type Normal3 = Vec3;
/// A surface normal in 2D.
pub type Normal2 = Vec2;

/// The orientation, or winding, of a polygon.
///
/// Given the vertices of a triangle in the order they are listed,
/// the winding tells whether they are laid out clockwise or counter-
/// clockwise when viewed from the positive z axis, with y pointing up:
/// ```text
///      Ccw            Cw
///       c             b
///      / \           / \
///     a - b         a - c
/// ```
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Winding {
    /// Clockwise.
    Cw,
    /// Counter-clockwise.
    #[default]
    Ccw,
}

/// Creates a `Vertex` with the give position and attribute values.
#[inline]
pub const fn vertex<P, A>(pos: P, attrib: A) -> Vertex<P, A> {
    Vertex { pos, attrib }
}

/// Creates a `Tri` with the given vertices.
#[inline]
pub const fn tri<V>(a: V, b: V, c: V) -> Tri<V> {
    Tri([a, b, c])
}

impl Winding {
    /// Returns the opposite winding.
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Cw => Self::Ccw,
            Self::Ccw => Self::Cw,
        }
    }
}

impl<V> Tri<V> {
    /// Returns `self` with the last two vertices swapped,
    /// reversing its winding order.
    #[must_use]
    pub fn flip(self) -> Self {
        let [a, b, c] = self.0;
        Tri([a, c, b])
    }

    /// Returns a triangle whose vertices are `f` applied to those of `self`.
    pub fn map<U>(self, f: impl FnMut(V) -> U) -> Tri<U> {
        Tri(self.0.map(f))
    }
}

impl<A, B> Tri<Vertex2<A, B>> {
    /// Returns the signed area of `self`.
    ///
    /// The area is positive if `self` is wound counter-clockwise
    /// and negative if clockwise. A degenerate triangle has zero area.
    ///
    /// # Examples
    /// ```
    /// use trifle_core::geom::{Tri, vertex};
    /// use trifle_core::math::pt2;
    ///
    /// let tri = Tri([
    ///     vertex(pt2::<f32, ()>(0.0, 0.0), ()),
    ///     vertex(pt2(4.0, 0.0), ()),
    ///     vertex(pt2(0.0, 3.0), ()),
    /// ]);
    /// assert_eq!(tri.signed_area(), 6.0);
    /// assert_eq!(tri.flip().signed_area(), -6.0);
    /// ```
    pub fn signed_area(&self) -> f32 {
        let [a, b, c] = &self.0;
        (b.pos - a.pos).perp_dot(c.pos - a.pos) / 2.0
    }

    /// Returns the area of `self`.
    pub fn area(&self) -> f32 {
        float::abs(self.signed_area())
    }

    /// Returns the winding order of `self`.
    ///
    /// A degenerate triangle is considered counter-clockwise.
    pub fn winding(&self) -> Winding {
        if self.signed_area() < 0.0 {
            Winding::Cw
        } else {
            Winding::Ccw
        }
    }
}

impl<A, B> Tri<Vertex3<A, B>> {
    /// Returns the vectors from the first vertex to the second and third.
    pub fn tangents(&self) -> [Vec3<B>; 2] {
        let [a, b, c] = &self.0;
        [b.pos - a.pos, c.pos - a.pos]
    }

    /// Returns the unit normal vector of `self`, pointing to the side
    /// from which the vertices appear counter-clockwise.
    pub fn normal(&self) -> Normal3 {
        let [t, u] = self.tangents();
        t.cross(&u).normalize().to()
    }
}

#[cfg(test)]
mod tests {
    use crate::math::{pt2, pt3, vec3};

    use super::*;

    fn tri2(a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> Tri<Vertex2<()>> {
        tri(
            vertex(pt2(a[0], a[1]), ()),
            vertex(pt2(b[0], b[1]), ()),
            vertex(pt2(c[0], c[1]), ()),
        )
    }

    #[test]
    fn winding_and_area() {
        let t = tri2([0.0, 0.0], [2.0, 0.0], [0.0, 2.0]);
        assert_eq!(t.winding(), Winding::Ccw);
        assert_eq!(t.area(), 2.0);

        let t = t.flip();
        assert_eq!(t.winding(), Winding::Cw);
        assert_eq!(t.signed_area(), -2.0);
        assert_eq!(t.area(), 2.0);
    }

    #[test]
    fn degenerate_has_zero_area() {
        let t = tri2([0.0, 0.0], [1.0, 1.0], [2.0, 2.0]);
        assert_eq!(t.signed_area(), 0.0);
    }

    #[test]
    fn winding_flip() {
        assert_eq!(Winding::Cw.flip(), Winding::Ccw);
        assert_eq!(Winding::default().flip(), Winding::Cw);
    }

    #[test]
    fn normal_of_xy_triangle() {
        let t: Tri<Vertex3<()>> = tri(
            vertex(pt3(0.0, 0.0, 1.0), ()),
            vertex(pt3(3.0, 0.0, 1.0), ()),
            vertex(pt3(0.0, 2.0, 1.0), ()),
        );
        assert_eq!(t.normal(), vec3(0.0, 0.0, 1.0));
        assert_eq!(t.flip().normal(), vec3(0.0, 0.0, -1.0));
    }

    #[test]
    fn map_vertices() {
        let t = tri(1, 2, 3).map(|i| i * 10);
        assert_eq!(t, Tri([10, 20, 30]));
    }
}

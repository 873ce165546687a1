//! Points in affine spaces.

use core::array;
use core::fmt::{Debug, Formatter};
use core::marker::PhantomData as Pd;
use core::ops::{Add, AddAssign, Index, Sub, SubAssign};

use super::approx::ApproxEq;
use super::space::{Affine, Linear, Real};
use super::vec::{ProjVec3, Vector};

/// A point in an affine space.
///
/// Unlike a [`Vector`], a point has a location but no direction or length.
/// Subtracting two points yields the vector between them, and adding a
/// vector to a point yields a new point. Points cannot be added together.
#[repr(transparent)]
pub struct Point<Repr, Space = ()>(pub Repr, Pd<Space>);

/// A 2-point with `f32` components.
pub type Point2<Basis = ()> = Point<[f32; 2], Real<2, Basis>>;
/// A 3-point with `f32` components.
pub type Point3<Basis = ()> = Point<[f32; 3], Real<3, Basis>>;
/// A 2-point with `u32` components.
pub type Point2u<Basis = ()> = Point<[u32; 2], Real<2, Basis>>;

/// Returns a real 2-point with `x` and `y` components.
pub const fn pt2<Sc, B>(x: Sc, y: Sc) -> Point<[Sc; 2], Real<2, B>> {
    Point([x, y], Pd)
}
/// Returns a real 3-point with `x`, `y`, and `z` components.
pub const fn pt3<Sc, B>(x: Sc, y: Sc, z: Sc) -> Point<[Sc; 3], Real<3, B>> {
    Point([x, y, z], Pd)
}

impl<R, Sp> Point<R, Sp> {
    /// Returns a new point with representation `repr`.
    #[inline]
    pub const fn new(repr: R) -> Self {
        Self(repr, Pd)
    }

    /// Returns a point with the same coordinates as `self` but in space `S`.
    #[inline]
    pub fn to<S>(self) -> Point<R, S> {
        Point::new(self.0)
    }

    /// Returns the vector from the origin to `self`.
    #[inline]
    pub fn to_vec(self) -> Vector<R, Sp> {
        Vector::new(self.0)
    }
}

impl<const N: usize, B> Point<[f32; N], Real<N, B>> {
    /// Returns the Euclidean distance between `self` and `other`.
    #[inline]
    pub fn distance(&self, other: &Self) -> f32 {
        Affine::sub(self, other).len()
    }
    /// Returns the Euclidean distance between `self` and `other`, squared.
    #[inline]
    pub fn distance_sqr(&self, other: &Self) -> f32 {
        Affine::sub(self, other).len_sqr()
    }
}

impl<Sc: Copy, B> Point<[Sc; 2], Real<2, B>> {
    /// Returns the x component of `self`.
    #[inline]
    pub fn x(&self) -> Sc {
        self.0[0]
    }
    /// Returns the y component of `self`.
    #[inline]
    pub fn y(&self) -> Sc {
        self.0[1]
    }
}

impl<Sc: Copy, B> Point<[Sc; 3], Real<3, B>> {
    /// Returns the x component of `self`.
    #[inline]
    pub fn x(&self) -> Sc {
        self.0[0]
    }
    /// Returns the y component of `self`.
    #[inline]
    pub fn y(&self) -> Sc {
        self.0[1]
    }
    /// Returns the z component of `self`.
    #[inline]
    pub fn z(&self) -> Sc {
        self.0[2]
    }
    /// Returns the x and y components of `self` as a 2-point.
    #[inline]
    pub fn xy(&self) -> Point<[Sc; 2], Real<2, B>> {
        pt2(self.x(), self.y())
    }
}

impl<B> Point3<B> {
    /// Returns `self` in homogeneous coordinates, with w equal to 1.
    #[inline]
    pub fn to_homogeneous(self) -> ProjVec3 {
        let [x, y, z] = self.0;
        Vector::new([x, y, z, 1.0])
    }
}

impl<Sc, Sp, const N: usize> Affine for Point<[Sc; N], Sp>
where
    Sc: Linear<Scalar = Sc> + Copy,
{
    type Space = Sp;
    type Diff = Vector<[Sc; N], Sp>;
    const DIM: usize = N;

    #[inline]
    fn add(&self, other: &Self::Diff) -> Self {
        Self(array::from_fn(|i| self.0[i].add(&other.0[i])), Pd)
    }
    #[inline]
    fn sub(&self, other: &Self) -> Self::Diff {
        Vector::new(array::from_fn(|i| self.0[i].sub(&other.0[i])))
    }
}

impl<Sp, const N: usize> ApproxEq<Self, f32> for Point<[f32; N], Sp> {
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

impl<R: Copy, S> Copy for Point<R, S> {}

impl<R: Clone, S> Clone for Point<R, S> {
    fn clone(&self) -> Self {
        Self(self.0.clone(), Pd)
    }
}

impl<R: Default, S> Default for Point<R, S> {
    fn default() -> Self {
        Self(R::default(), Pd)
    }
}

impl<R: Debug, Sp: Debug + Default> Debug for Point<R, Sp> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "Point<{:?}>", Sp::default())?;
        Debug::fmt(&self.0, f)
    }
}

impl<R: Eq, S> Eq for Point<R, S> {}

impl<R: PartialEq, S> PartialEq for Point<R, S> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<R, Sp> From<R> for Point<R, Sp> {
    #[inline]
    fn from(repr: R) -> Self {
        Self(repr, Pd)
    }
}

impl<Sc, Sp, const N: usize> Index<usize> for Point<[Sc; N], Sp> {
    type Output = Sc;
    #[inline]
    fn index(&self, i: usize) -> &Sc {
        &self.0[i]
    }
}

impl<Sc, Sp, const N: usize> Add<Vector<[Sc; N], Sp>> for Point<[Sc; N], Sp>
where
    Self: Affine<Diff = Vector<[Sc; N], Sp>>,
{
    type Output = Self;
    #[inline]
    fn add(self, other: Vector<[Sc; N], Sp>) -> Self {
        Affine::add(&self, &other)
    }
}

impl<Sc, Sp, const N: usize> AddAssign<Vector<[Sc; N], Sp>>
    for Point<[Sc; N], Sp>
where
    Self: Affine<Diff = Vector<[Sc; N], Sp>>,
{
    #[inline]
    fn add_assign(&mut self, other: Vector<[Sc; N], Sp>) {
        *self = Affine::add(&*self, &other);
    }
}

impl<Sc, Sp, const N: usize> Sub<Vector<[Sc; N], Sp>> for Point<[Sc; N], Sp>
where
    Self: Affine<Diff = Vector<[Sc; N], Sp>>,
    Sc: Linear<Scalar = Sc> + Copy,
{
    type Output = Self;
    #[inline]
    fn sub(self, other: Vector<[Sc; N], Sp>) -> Self {
        Affine::add(&self, &Linear::neg(&other))
    }
}

impl<Sc, Sp, const N: usize> SubAssign<Vector<[Sc; N], Sp>>
    for Point<[Sc; N], Sp>
where
    Self: Affine<Diff = Vector<[Sc; N], Sp>>,
    Sc: Linear<Scalar = Sc> + Copy,
{
    #[inline]
    fn sub_assign(&mut self, other: Vector<[Sc; N], Sp>) {
        *self = Affine::add(&*self, &Linear::neg(&other));
    }
}

impl<Sc, Sp, const N: usize> Sub for Point<[Sc; N], Sp>
where
    Self: Affine<Diff = Vector<[Sc; N], Sp>>,
{
    type Output = Vector<[Sc; N], Sp>;
    #[inline]
    fn sub(self, other: Self) -> Self::Output {
        Affine::sub(&self, &other)
    }
}

#[cfg(test)]
mod tests {
    use crate::assert_approx_eq;
    use crate::math::vec::{Vec2, Vec3, vec2, vec3};

    use super::*;

    #[test]
    fn point_vector_arithmetic() {
        let p: Point3 = pt3(1.0, 2.0, 3.0);
        let v: Vec3 = vec3(-1.0, 1.0, 0.5);
        assert_eq!(p + v, pt3(0.0, 3.0, 3.5));
        assert_eq!(p - v, pt3(2.0, 1.0, 2.5));
        assert_eq!(pt3(3.0, 3.0, 3.0) - p, vec3(2.0, 1.0, 0.0));
    }

    #[test]
    fn compound_assignment() {
        let mut p: Point2 = pt2(1.0, 1.0);
        let v: Vec2 = vec2(2.0, -1.0);
        p += v;
        assert_eq!(p, pt2(3.0, 0.0));
        p -= v;
        assert_eq!(p, pt2(1.0, 1.0));
    }

    #[test]
    fn distance() {
        let p: Point2 = pt2(1.0, 1.0);
        assert_eq!(p.distance_sqr(&pt2(4.0, 5.0)), 25.0);
        assert_approx_eq!(p.distance(&pt2(4.0, 5.0)), 5.0, eps = 1e-4);
    }

    #[test]
    fn homogeneous_has_unit_w() {
        let p: Point3 = pt3(1.0, -2.0, 3.0);
        assert_eq!(p.to_homogeneous().0, [1.0, -2.0, 3.0, 1.0]);
        assert_eq!(p.to_vec(), vec3(1.0, -2.0, 3.0));
    }
}

//! Real and projective vectors.

use core::array;
use core::fmt::{Debug, Formatter};
use core::marker::PhantomData;
use core::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg,
    Sub, SubAssign,
};

use super::approx::ApproxEq;
use super::float;
use super::point::Point;
use super::space::{Affine, Linear, Proj4, Real};

//
// Types
//

/// A generic vector type. Represents an element of a vector space or a
/// module, a generalization of a vector space where the scalars can be
/// integers (technically, the scalar type can be any *ring*-like type).
///
/// # Type parameters
/// * `Repr`: Representation of the scalar components of the vector,
///   for example an array or a SIMD vector.
/// * `Space`: The space that the vector is an element of. A tag type used to
///   prevent mixing up vectors of different spaces and bases.
#[repr(transparent)]
pub struct Vector<Repr, Space = ()>(pub Repr, PhantomData<Space>);

/// A 2-vector with `f32` components.
pub type Vec2<Basis = ()> = Vector<[f32; 2], Real<2, Basis>>;
/// A 3-vector with `f32` components.
pub type Vec3<Basis = ()> = Vector<[f32; 3], Real<3, Basis>>;
/// A 4-vector with `f32` components.
pub type Vec4<Basis = ()> = Vector<[f32; 4], Real<4, Basis>>;

/// A 2-vector with `i32` components.
pub type Vec2i<Basis = ()> = Vector<[i32; 2], Real<2, Basis>>;
/// A 3-vector with `i32` components.
pub type Vec3i<Basis = ()> = Vector<[i32; 3], Real<3, Basis>>;

/// A 4-vector in the projective 3-space over ℝ, also known as
/// homogeneous coordinates. The components are named x, y, z, and w.
pub type ProjVec3 = Vector<[f32; 4], Proj4>;

//
// Free functions
//

/// Returns a real 2-vector with components `x` and `y`.
pub const fn vec2<Sc, B>(x: Sc, y: Sc) -> Vector<[Sc; 2], Real<2, B>> {
    Vector::new([x, y])
}

/// Returns a real 3-vector with components `x`, `y`, and `z`.
pub const fn vec3<Sc, B>(x: Sc, y: Sc, z: Sc) -> Vector<[Sc; 3], Real<3, B>> {
    Vector::new([x, y, z])
}

/// Returns a real 4-vector with components `x`, `y`, `z`, and `w`.
pub const fn vec4<Sc, B>(
    x: Sc,
    y: Sc,
    z: Sc,
    w: Sc,
) -> Vector<[Sc; 4], Real<4, B>> {
    Vector::new([x, y, z, w])
}

/// Returns a vector with all components equal to the argument.
#[inline]
pub fn splat<Sp, Sc: Clone, const DIM: usize>(s: Sc) -> Vector<[Sc; DIM], Sp> {
    Vector::new(array::from_fn(|_| s.clone()))
}

//
// Inherent impls
//

impl<R, Sp> Vector<R, Sp> {
    /// Returns a new vector with representation `repr`.
    #[inline]
    pub const fn new(repr: R) -> Self {
        Self(repr, PhantomData)
    }

    /// Returns a vector with value equal to `self` but in space `S`.
    ///
    /// This method can be used to coerce a vector from one space
    /// to another in order to make types match. One use case is
    /// to cast a "generic" vector returned by one of the constructor
    /// functions to a more specific space.
    #[inline]
    pub fn to<S>(self) -> Vector<R, S> {
        Vector::new(self.0)
    }
}

impl<Sp, const N: usize> Vector<[f32; N], Sp> {
    /// Returns the length (magnitude) of `self`.
    #[inline]
    pub fn len(&self) -> f32 {
        float::sqrt(self.len_sqr())
    }

    /// Returns `self` normalized to unit length.
    ///
    /// The result is unspecified if `self` is a zero vector.
    #[inline]
    #[must_use]
    pub fn normalize(&self) -> Self {
        *self / self.len()
    }

    /// Returns `self` clamped component-wise to the given range.
    #[must_use]
    pub fn clamp(&self, min: &Self, max: &Self) -> Self {
        Vector::new(array::from_fn(|i| self.0[i].clamp(min.0[i], max.0[i])))
    }

    /// Returns the component-wise product of `self` and `other`.
    #[must_use]
    pub fn mul_comp(&self, other: &Self) -> Self {
        Vector::new(array::from_fn(|i| self.0[i] * other.0[i]))
    }

    /// Returns the component-wise quotient of `self` and `other`.
    #[must_use]
    pub fn div_comp(&self, other: &Self) -> Self {
        Vector::new(array::from_fn(|i| self.0[i] / other.0[i]))
    }

    /// Returns the dot product of `self` and `other`.
    #[inline]
    pub fn dot(&self, other: &Self) -> f32 {
        (0..N).map(|i| self.0[i] * other.0[i]).sum()
    }

    /// Returns the length of `self`, squared.
    ///
    /// Avoids the square root, and is thus faster than [`Self::len`]
    /// when only the relative magnitude matters.
    #[inline]
    pub fn len_sqr(&self) -> f32 {
        self.dot(self)
    }

    /// Returns whether all components of `self` are finite.
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|c| c.is_finite())
    }

    /// Returns the scalar projection of `self` onto `other`
    /// (the length of the component of `self` parallel to `other`).
    pub fn scalar_project(&self, other: &Self) -> f32 {
        self.dot(other) / other.dot(other)
    }
}

impl<Sc: Copy, B> Vector<[Sc; 2], Real<2, B>> {
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

    /// Converts `self` into a 3-vector with z component `z`.
    pub fn to_vec3(self, z: Sc) -> Vector<[Sc; 3], Real<3, B>> {
        vec3(self.x(), self.y(), z)
    }

    /// Converts `self` into a point with the same coordinates.
    pub fn to_pt(self) -> Point<[Sc; 2], Real<2, B>> {
        Point::new(self.0)
    }
}

impl<B> Vec2<B> {
    /// Returns the perpendicular dot product of `self` and `other`,
    /// the z component of the cross product of the two vectors
    /// extended to 3D.
    ///
    /// The result is positive if `other` is counter-clockwise of `self`,
    /// negative if clockwise, and zero if the vectors are parallel.
    #[inline]
    pub fn perp_dot(self, other: Self) -> f32 {
        self.x() * other.y() - self.y() * other.x()
    }

    /// Returns `self` rotated 90 degrees counter-clockwise.
    pub fn perp(self) -> Self {
        vec2(-self.y(), self.x())
    }
}

impl<Sc: Copy, B> Vector<[Sc; 3], Real<3, B>> {
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

    /// Returns the x and y components of `self` as a 2-vector.
    pub fn xy(&self) -> Vector<[Sc; 2], Real<2, B>> {
        vec2(self.x(), self.y())
    }

    /// Converts `self` into a point with the same coordinates.
    pub fn to_pt(self) -> Point<[Sc; 3], Real<3, B>> {
        Point::new(self.0)
    }
}

impl<B> Vec3<B> {
    /// Returns the cross product of `self` with `other`.
    ///
    /// The result is a vector perpendicular to both input vectors, its
    /// length equal to the area of the parallelogram spanned by the vectors,
    /// and its direction determined by the right-hand rule.
    #[must_use]
    pub fn cross(&self, other: &Self) -> Self {
        let (s, o) = (self, other);
        vec3(
            s.y() * o.z() - s.z() * o.y(),
            s.z() * o.x() - s.x() * o.z(),
            s.x() * o.y() - s.y() * o.x(),
        )
    }
}

impl<B> Vec4<B> {
    /// Returns the x component of `self`.
    #[inline]
    pub fn x(&self) -> f32 {
        self.0[0]
    }
    /// Returns the y component of `self`.
    #[inline]
    pub fn y(&self) -> f32 {
        self.0[1]
    }
    /// Returns the z component of `self`.
    #[inline]
    pub fn z(&self) -> f32 {
        self.0[2]
    }
    /// Returns the w component of `self`.
    #[inline]
    pub fn w(&self) -> f32 {
        self.0[3]
    }
}

impl ProjVec3 {
    /// Returns the x component of `self`.
    #[inline]
    pub fn x(&self) -> f32 {
        self.0[0]
    }
    /// Returns the y component of `self`.
    #[inline]
    pub fn y(&self) -> f32 {
        self.0[1]
    }
    /// Returns the z component of `self`.
    #[inline]
    pub fn z(&self) -> f32 {
        self.0[2]
    }
    /// Returns the w component of `self`.
    #[inline]
    pub fn w(&self) -> f32 {
        self.0[3]
    }

    /// Projects `self` into real 3-space by dividing by the w component.
    ///
    /// This is the so-called perspective divide. If w is zero the result
    /// has infinite or NaN components; the clipper guarantees w > 0 for
    /// any vertex that reaches the divide.
    #[inline]
    pub fn project_to_real<B>(&self) -> Point<[f32; 3], Real<3, B>> {
        let [x, y, z, w] = self.0;
        let rw = 1.0 / w;
        Point::new([x * rw, y * rw, z * rw])
    }
}

//
// Local trait impls
//

impl<Sc, Sp, const DIM: usize> Affine for Vector<[Sc; DIM], Sp>
where
    Sc: Linear<Scalar = Sc> + Copy,
{
    type Space = Sp;
    type Diff = Self;
    const DIM: usize = DIM;

    #[inline]
    fn add(&self, other: &Self) -> Self {
        Vector::new(array::from_fn(|i| self.0[i].add(&other.0[i])))
    }
    #[inline]
    fn sub(&self, other: &Self) -> Self {
        Vector::new(array::from_fn(|i| self.0[i].sub(&other.0[i])))
    }
}

impl<Sc, Sp, const DIM: usize> Linear for Vector<[Sc; DIM], Sp>
where
    Sc: Linear<Scalar = Sc> + Copy,
{
    type Scalar = Sc;

    #[inline]
    fn zero() -> Self {
        Vector::new(array::from_fn(|_| Sc::zero()))
    }
    #[inline]
    fn neg(&self) -> Self {
        Vector::new(array::from_fn(|i| self.0[i].neg()))
    }
    #[inline]
    fn mul(&self, scalar: Sc) -> Self {
        Vector::new(array::from_fn(|i| self.0[i].mul(scalar)))
    }
}

impl<Sp, const N: usize> ApproxEq<Self, f32> for Vector<[f32; N], Sp> {
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

// Manual impls of Copy, Clone, Eq, and PartialEq to avoid
// superfluous where Sp: Trait bounds

impl<R: Copy, Sp> Copy for Vector<R, Sp> {}

impl<R: Clone, Sp> Clone for Vector<R, Sp> {
    fn clone(&self) -> Self {
        Self(self.0.clone(), PhantomData)
    }
}

impl<R: Default, Sp> Default for Vector<R, Sp> {
    fn default() -> Self {
        Self(R::default(), PhantomData)
    }
}

impl<R: Eq, Sp> Eq for Vector<R, Sp> {}

impl<R: PartialEq, Sp> PartialEq for Vector<R, Sp> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<R: Debug, Sp: Debug + Default> Debug for Vector<R, Sp> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "Vec<{:?}>", Sp::default())?;
        Debug::fmt(&self.0, f)
    }
}

impl<R, Sp> From<R> for Vector<R, Sp> {
    #[inline]
    fn from(repr: R) -> Self {
        Self(repr, PhantomData)
    }
}

impl<Sc, Sp, const DIM: usize> Index<usize> for Vector<[Sc; DIM], Sp> {
    type Output = Sc;

    /// Returns the component of `self` with index `i`.
    ///
    /// # Panics
    /// If `i >= DIM`.
    #[inline]
    fn index(&self, i: usize) -> &Sc {
        &self.0[i]
    }
}

impl<Sc, Sp, const DIM: usize> IndexMut<usize> for Vector<[Sc; DIM], Sp> {
    /// Returns a mutable reference to the component of `self` with index `i`.
    ///
    /// # Panics
    /// If `i >= DIM`.
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut Sc {
        &mut self.0[i]
    }
}

//
// Arithmetic traits
//

impl<Sc, Sp, const DIM: usize> Add for Vector<[Sc; DIM], Sp>
where
    Self: Linear,
{
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Affine::add(&self, &rhs)
    }
}

impl<Sc, Sp, const DIM: usize> Sub for Vector<[Sc; DIM], Sp>
where
    Self: Linear,
{
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Affine::sub(&self, &rhs)
    }
}

impl<Sc, Sp, const DIM: usize> Neg for Vector<[Sc; DIM], Sp>
where
    Self: Linear,
{
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Linear::neg(&self)
    }
}

impl<Sc, Sp, const DIM: usize> Mul<Sc> for Vector<[Sc; DIM], Sp>
where
    Self: Linear<Scalar = Sc>,
{
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Sc) -> Self {
        Linear::mul(&self, rhs)
    }
}

impl<Sp, const DIM: usize> Div<f32> for Vector<[f32; DIM], Sp> {
    type Output = Self;
    #[inline]
    fn div(self, rhs: f32) -> Self {
        Linear::mul(&self, 1.0 / rhs)
    }
}

impl<Sc, Sp, const DIM: usize> AddAssign for Vector<[Sc; DIM], Sp>
where
    Self: Linear,
{
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = Affine::add(&*self, &rhs);
    }
}

impl<Sc, Sp, const DIM: usize> SubAssign for Vector<[Sc; DIM], Sp>
where
    Self: Linear,
{
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = Affine::sub(&*self, &rhs);
    }
}

impl<Sc, Sp, const DIM: usize> MulAssign<Sc> for Vector<[Sc; DIM], Sp>
where
    Self: Linear<Scalar = Sc>,
{
    #[inline]
    fn mul_assign(&mut self, rhs: Sc) {
        *self = Linear::mul(&*self, rhs);
    }
}

impl<Sp, const DIM: usize> DivAssign<f32> for Vector<[f32; DIM], Sp> {
    #[inline]
    fn div_assign(&mut self, rhs: f32) {
        *self = *self / rhs;
    }
}

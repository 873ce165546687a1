//! Matrices and linear and affine transforms.
//!
//! Matrices are row-major and operate on column vectors: the product `M * v`
//! applies the transform `M` to `v`, and `A * B` is the transform that first
//! applies `B`, then `A`. To make the order of operations read naturally,
//! [`Matrix::then`] composes transforms left to right instead.

use core::array;
use core::fmt::{self, Debug, Formatter};
use core::marker::PhantomData;
use core::ops::{Mul, Range};

use crate::render::{NdcToScreen, Screen};

use super::approx::ApproxEq;
use super::float;
use super::point::{Point, Point2u, Point3};
use super::space::{Proj4, Real};
use super::vec::{ProjVec3, Vec3, Vec4, Vector, vec3};

#[cfg(feature = "fp")]
use super::angle::Angle;

/// A linear transform from one space (or basis) to another.
///
/// This is a tag trait with no functionality in itself. It is used to
/// statically ensure that only compatible maps can be composed, and that
/// only compatible vectors can be transformed.
pub trait LinearMap {
    /// The source space, or domain, of `Self`.
    type Source;
    /// The destination space, or codomain, of `Self`.
    type Dest;
}

/// Composition of two `LinearMap`s, `Self` ∘ `Inner`.
///
/// If `Self` maps from `B` to `C`, and `Inner` maps from `A` to `B`,
/// `Self::Result` maps from `A` to `C`.
pub trait Compose<Inner>: LinearMap {
    /// The result of composing `Self` with `Inner`.
    type Result: LinearMap;
}

/// A linear map that has an inverse.
pub trait Invert: LinearMap {
    /// The inverse of `Self`, mapping from `Self::Dest` to `Self::Source`.
    type Inverse: LinearMap;
}

/// Trait for applying a transform to a value.
pub trait Apply<T> {
    /// The type of the transformed value.
    type Output;

    /// Transforms `t` by `self`.
    fn apply(&self, t: &T) -> Self::Output;
}

/// Dummy `LinearMap` to help with generic code.
impl LinearMap for () {
    type Source = ();
    type Dest = ();
}

/// A mapping from one basis to another in real vector space of dimension `DIM`.
///
/// Translation can be represented by a `RealToReal<3, ...>` map stored in a
/// 4x4 matrix, using homogeneous coordinates.
#[derive(Copy, Clone, Default, Eq, PartialEq)]
pub struct RealToReal<const DIM: usize, SrcBasis = (), DstBasis = ()>(
    PhantomData<(SrcBasis, DstBasis)>,
);

/// A mapping from real to projective space.
///
/// Perspective and orthographic projections are maps of this kind.
#[derive(Copy, Clone, Default, Eq, PartialEq)]
pub struct RealToProjective<SrcBasis>(PhantomData<SrcBasis>);

/// A generic matrix type.
#[repr(transparent)]
pub struct Matrix<Repr, Map>(pub Repr, PhantomData<Map>);

/// Type alias for a 3x3 float matrix.
pub type Mat3x3<Map = ()> = Matrix<[[f32; 3]; 3], Map>;
/// Type alias for a 4x4 float matrix.
pub type Mat4x4<Map = ()> = Matrix<[[f32; 4]; 4], Map>;

//
// Inherent impls
//

impl<Repr, Map> Matrix<Repr, Map> {
    /// Returns a matrix with the given elements.
    #[inline]
    pub const fn new(els: Repr) -> Self {
        Self(els, PhantomData)
    }

    /// Returns a matrix equal to `self` but with a different linear map.
    ///
    /// Used to reinterpret untyped matrices returned by the constructor
    /// functions as maps between specific spaces.
    #[inline]
    pub fn to<M>(&self) -> Matrix<Repr, M>
    where
        Repr: Clone,
    {
        Matrix::new(self.0.clone())
    }
}

impl<M, const N: usize> Matrix<[[f32; N]; N], M> {
    /// Returns the `N`×`N` identity matrix.
    pub fn identity() -> Self {
        Self::new(array::from_fn(|i| {
            array::from_fn(|j| if i == j { 1.0 } else { 0.0 })
        }))
    }

    /// Returns the row vector of `self` with index `i`.
    ///
    /// # Panics
    /// If `i >= N`.
    #[inline]
    pub fn row(&self, i: usize) -> [f32; N] {
        self.0[i]
    }

    /// Returns the column vector of `self` with index `i`.
    ///
    /// # Panics
    /// If `i >= N`.
    #[inline]
    pub fn col(&self, i: usize) -> [f32; N] {
        array::from_fn(|j| self.0[j][i])
    }

    /// Returns `self` with its rows and columns swapped.
    ///
    /// The transpose of a pure rotation is also its inverse.
    #[must_use]
    pub fn transpose(&self) -> Self {
        Self::new(array::from_fn(|i| self.col(i)))
    }

    /// Returns whether all elements of `self` are finite.
    pub fn is_finite(&self) -> bool {
        self.0.iter().flatten().all(|e| e.is_finite())
    }

    /// Returns the matrix product `self * other`, reinterpreted as map `R`.
    fn mul_raw<N2, R>(
        &self,
        other: &Matrix<[[f32; N]; N], N2>,
    ) -> Matrix<[[f32; N]; N], R> {
        Matrix::new(array::from_fn(|i| {
            let row = self.row(i);
            array::from_fn(|j| {
                let col = other.col(j);
                (0..N).map(|k| row[k] * col[k]).sum()
            })
        }))
    }

    /// Returns the composite transform of `self` followed by `other`.
    ///
    /// The result is equal to the matrix product `other * self`, a transform
    /// that first applies `self`, then `other`.
    ///
    /// # Examples
    /// ```
    /// # use trifle_core::math::{mat::*, vec::vec3};
    /// let m = translate(vec3(1.0, 0.0, 0.0)).then(&scale(vec3(2.0, 2.0, 2.0)));
    /// assert_eq!(m.apply(&vec3(0.0, 1.0, 0.0).to_pt()).0, [2.0, 2.0, 0.0]);
    /// ```
    #[must_use]
    pub fn then<M2>(
        &self,
        other: &Matrix<[[f32; N]; N], M2>,
    ) -> Matrix<[[f32; N]; N], M2::Result>
    where
        M2: Compose<M>,
    {
        other.mul_raw(self)
    }
}

impl<M> Mat3x3<M> {
    /// Returns the determinant of `self`.
    pub fn determinant(&self) -> f32 {
        det3(&self.0)
    }

    /// Returns the inverse of `self`, or `self` unchanged if `self` is
    /// singular or nearly so, that is, if the absolute value of its
    /// determinant is at most `f32::EPSILON`.
    ///
    /// The inverse is computed as the adjugate matrix divided by the
    /// determinant.
    #[must_use]
    pub fn inverse(&self) -> Mat3x3<M::Inverse>
    where
        M: Invert,
    {
        let det = self.determinant();
        if !(float::abs(det) > f32::EPSILON) {
            log::warn!("tried to invert a singular 3x3 matrix, det = {det}");
            return self.to();
        }
        let m = &self.0;
        let cof = |r0: usize, r1: usize, c0: usize, c1: usize| {
            m[r0][c0] * m[r1][c1] - m[r0][c1] * m[r1][c0]
        };
        // Adjugate is the transpose of the cofactor matrix
        let adj = [
            [cof(1, 2, 1, 2), -cof(0, 2, 1, 2), cof(0, 1, 1, 2)],
            [-cof(1, 2, 0, 2), cof(0, 2, 0, 2), -cof(0, 1, 0, 2)],
            [cof(1, 2, 0, 1), -cof(0, 2, 0, 1), cof(0, 1, 0, 1)],
        ];
        let rdet = 1.0 / det;
        Matrix::new(adj.map(|row| row.map(|e| e * rdet)))
    }
}

impl<M> Mat4x4<M> {
    /// Returns the determinant of `self`.
    pub fn determinant(&self) -> f32 {
        (0..4).map(|j| self.0[0][j] * cofactor4(&self.0, 0, j)).sum()
    }

    /// Returns the inverse of `self`, or `self` unchanged if `self` is
    /// singular or nearly so.
    ///
    /// Unlike [`Mat3x3::inverse`], the test is relative to the magnitude
    /// of `self`: the matrix counts as singular if the absolute value of
    /// its determinant is at most `f32::EPSILON` times the product of the
    /// lengths of its rows. That product bounds the determinant from above
    /// (Hadamard's inequality), so uniformly tiny but well-conditioned
    /// matrices such as `scale(splat(0.001))` are still inverted.
    ///
    /// The inverse is computed by cofactor expansion.
    #[must_use]
    pub fn inverse(&self) -> Mat4x4<M::Inverse>
    where
        M: Invert,
    {
        let det = self.determinant();
        // Squared to avoid needing sqrt
        let rows_sqr: f32 = self
            .0
            .iter()
            .map(|row| row.iter().map(|e| e * e).sum::<f32>())
            .product();
        if !(det * det > f32::EPSILON * f32::EPSILON * rows_sqr) {
            log::warn!("tried to invert a singular 4x4 matrix, det = {det}");
            return self.to();
        }
        let rdet = 1.0 / det;
        // Transposed cofactor matrix, ie. the adjugate
        Matrix::new(array::from_fn(|i| {
            array::from_fn(|j| cofactor4(&self.0, j, i) * rdet)
        }))
    }
}

//
// Local trait impls
//

impl<const DIM: usize, S, D> LinearMap for RealToReal<DIM, S, D> {
    type Source = Real<DIM, S>;
    type Dest = Real<DIM, D>;
}

impl<S> LinearMap for RealToProjective<S> {
    type Source = Real<3, S>;
    type Dest = Proj4;
}

impl<const DIM: usize, S, I, D> Compose<RealToReal<DIM, S, I>>
    for RealToReal<DIM, I, D>
{
    type Result = RealToReal<DIM, S, D>;
}

impl<S, I> Compose<RealToReal<3, S, I>> for RealToProjective<I> {
    type Result = RealToProjective<S>;
}

impl Compose<()> for () {
    type Result = ();
}

impl<const DIM: usize, S, D> Invert for RealToReal<DIM, S, D> {
    type Inverse = RealToReal<DIM, D, S>;
}

impl Invert for () {
    type Inverse = ();
}

impl<S, D> Apply<Vec3<S>> for Mat3x3<RealToReal<3, S, D>> {
    type Output = Vec3<D>;

    fn apply(&self, v: &Vec3<S>) -> Vec3<D> {
        let [x, y, z] = self.0.map(|row| Vec3::<S>::new(row).dot(v));
        vec3(x, y, z)
    }
}

impl Apply<Vec3> for Mat3x3 {
    type Output = Vec3;

    fn apply(&self, v: &Vec3) -> Vec3 {
        self.to::<RealToReal<3>>().apply(v)
    }
}

impl<S, D> Apply<Vec3<S>> for Mat4x4<RealToReal<3, S, D>> {
    type Output = Vec3<D>;

    /// Transforms a vector. Vectors are directions, so translation has
    /// no effect; the implied w component is 0.
    fn apply(&self, v: &Vec3<S>) -> Vec3<D> {
        let v = [v.x(), v.y(), v.z(), 0.0];
        let [x, y, z] = array::from_fn(|i| dot4(&self.0[i], &v));
        vec3(x, y, z)
    }
}

impl<S, D> Apply<Point3<S>> for Mat4x4<RealToReal<3, S, D>> {
    type Output = Point3<D>;

    /// Transforms a point. The implied w component is 1.
    fn apply(&self, p: &Point3<S>) -> Point3<D> {
        let p = [p.x(), p.y(), p.z(), 1.0];
        Point::new(array::from_fn(|i| dot4(&self.0[i], &p)))
    }
}

impl<S> Apply<Point3<S>> for Mat4x4<RealToProjective<S>> {
    type Output = ProjVec3;

    /// Projects a point into homogeneous coordinates.
    fn apply(&self, p: &Point3<S>) -> ProjVec3 {
        let p = [p.x(), p.y(), p.z(), 1.0];
        Vector::new(array::from_fn(|i| dot4(&self.0[i], &p)))
    }
}

impl Apply<Vec4> for Mat4x4 {
    type Output = Vec4;

    fn apply(&self, v: &Vec4) -> Vec4 {
        Vector::new(array::from_fn(|i| dot4(&self.0[i], &v.0)))
    }
}

impl Apply<Point3> for Mat4x4 {
    type Output = Point3;

    fn apply(&self, p: &Point3) -> Point3 {
        self.to::<RealToReal<3>>().apply(p)
    }
}

impl<M, const N: usize> ApproxEq<Self, f32> for Matrix<[[f32; N]; N], M> {
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

impl<R: Copy, M> Copy for Matrix<R, M> {}

impl<R: Clone, M> Clone for Matrix<R, M> {
    fn clone(&self) -> Self {
        Self(self.0.clone(), PhantomData)
    }
}

impl<R: PartialEq, M> PartialEq for Matrix<R, M> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<M, const N: usize> Default for Matrix<[[f32; N]; N], M> {
    /// Returns the identity matrix.
    fn default() -> Self {
        Self::identity()
    }
}

impl<R, M> From<R> for Matrix<R, M> {
    fn from(repr: R) -> Self {
        Self::new(repr)
    }
}

impl<const N: usize> Mul for Matrix<[[f32; N]; N], ()> {
    type Output = Self;

    /// Returns the matrix product of `self` and `rhs`.
    fn mul(self, rhs: Self) -> Self {
        self.mul_raw(&rhs)
    }
}

impl<S: Debug, M: Debug + Default, const N: usize> Debug
    for Matrix<[[S; N]; N], M>
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix<{:?}>[", M::default())?;
        for row in &self.0 {
            writeln!(f, "    {row:6.2?}")?;
        }
        write!(f, "]")
    }
}

impl<const DIM: usize, S, D> Debug for RealToReal<DIM, S, D>
where
    S: Debug + Default,
    D: Debug + Default,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}→{:?}", S::default(), D::default())
    }
}

impl<S: Debug + Default> Debug for RealToProjective<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}→Proj4", S::default())
    }
}

//
// Free functions
//

fn dot4(a: &[f32; 4], b: &[f32; 4]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

fn det3(m: &[[f32; 3]; 3]) -> f32 {
    let [[a, b, c], [d, e, f], [g, h, i]] = *m;
    a * (e * i - f * h) - b * (d * i - f * g) + c * (d * h - e * g)
}

/// Returns the signed cofactor of element (`row`, `col`) of `m`.
fn cofactor4(m: &[[f32; 4]; 4], row: usize, col: usize) -> f32 {
    let mut minor = [[0.0; 3]; 3];
    for (mi, r) in (0..4).filter(|&r| r != row).enumerate() {
        for (mj, c) in (0..4).filter(|&c| c != col).enumerate() {
            minor[mi][mj] = m[r][c];
        }
    }
    let sign = if (row + col) % 2 == 0 { 1.0 } else { -1.0 };
    sign * det3(&minor)
}

/// Returns a matrix applying a scaling by `s`.
///
/// Tip: use [`splat`][super::vec::splat] to scale uniformly:
/// ```
/// # use trifle_core::math::{mat::*, vec::splat};
/// let m = scale(splat(2.0));
/// assert_eq!(m.0[0][0], 2.0);
/// assert_eq!(m.0[1][1], 2.0);
/// assert_eq!(m.0[2][2], 2.0);
/// ```
pub fn scale(s: Vec3) -> Mat4x4 {
    let [x, y, z] = s.0;
    Matrix::new([
        [x, 0.0, 0.0, 0.0],
        [0.0, y, 0.0, 0.0],
        [0.0, 0.0, z, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Returns a matrix applying a translation by `t`.
pub fn translate(t: Vec3) -> Mat4x4 {
    let [x, y, z] = t.0;
    Matrix::new([
        [1.0, 0.0, 0.0, x],
        [0.0, 1.0, 0.0, y],
        [0.0, 0.0, 1.0, z],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Returns a matrix applying a rotation about the x axis by angle `a`.
///
/// Positive angles rotate y towards z.
#[cfg(feature = "fp")]
pub fn rotate_x(a: Angle) -> Mat4x4 {
    let (sin, cos) = a.sin_cos();
    Matrix::new([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, cos, -sin, 0.0],
        [0.0, sin, cos, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Returns a matrix applying a rotation about the y axis by angle `a`.
///
/// Positive angles rotate z towards x.
#[cfg(feature = "fp")]
pub fn rotate_y(a: Angle) -> Mat4x4 {
    let (sin, cos) = a.sin_cos();
    Matrix::new([
        [cos, 0.0, sin, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [-sin, 0.0, cos, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Returns a matrix applying a rotation about the z axis by angle `a`.
///
/// Positive angles rotate x towards y.
#[cfg(feature = "fp")]
pub fn rotate_z(a: Angle) -> Mat4x4 {
    let (sin, cos) = a.sin_cos();
    Matrix::new([
        [cos, -sin, 0.0, 0.0],
        [sin, cos, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Returns the rotation matrix Rx(`x`) · Ry(`y`) · Rz(`z`).
///
/// Applied to a column vector, the z rotation happens first and the
/// x rotation last.
#[cfg(feature = "fp")]
pub fn rotate_euler(x: Angle, y: Angle, z: Angle) -> Mat4x4 {
    rotate_x(x) * rotate_y(y) * rotate_z(z)
}

/// Returns a matrix applying a rotation by angle `a` about `axis`.
///
/// `axis` does not need to be normalized. Positive angles rotate
/// counter-clockwise when looking from the tip of `axis` towards
/// the origin.
#[cfg(feature = "fp")]
pub fn rotate(axis: Vec3, a: Angle) -> Mat4x4 {
    let [x, y, z] = axis.normalize().0;
    let (s, c) = a.sin_cos();
    let t = 1.0 - c;
    Matrix::new([
        [c + x * x * t, x * y * t - z * s, x * z * t + y * s, 0.0],
        [y * x * t + z * s, c + y * y * t, y * z * t - x * s, 0.0],
        [z * x * t - y * s, z * y * t + x * s, c + z * z * t, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Returns a view matrix for a camera at `eye` looking at `target`.
///
/// The resulting view space is right-handed with the camera looking down
/// the negative z axis and `up` pointing approximately towards positive y.
/// `up` must not be parallel to `target - eye`.
pub fn look_at<B>(eye: Point3<B>, target: Point3<B>, up: Vec3<B>) -> Mat4x4 {
    let fwd = (target - eye).normalize();
    let right = fwd.cross(&up).normalize();
    let up = right.cross(&fwd);
    let eye = eye.to_vec();
    Matrix::new([
        [right.x(), right.y(), right.z(), -right.dot(&eye)],
        [up.x(), up.y(), up.z(), -up.dot(&eye)],
        [-fwd.x(), -fwd.y(), -fwd.z(), fwd.dot(&eye)],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Returns a perspective projection matrix.
///
/// `focal_ratio` is the ratio of the focal length to half the horizontal
/// size of the image; 1.0 corresponds to a 90° horizontal field of view.
/// `aspect_ratio` is width divided by height. View-space depths in
/// `near_far` (measured along the negative z axis) map to NDC depths
/// 0.0 to 1.0 after the perspective divide.
///
/// # Panics
/// If any parameter value is non-positive, or if the range is empty.
pub fn perspective<B>(
    focal_ratio: f32,
    aspect_ratio: f32,
    near_far: Range<f32>,
) -> Mat4x4<RealToProjective<B>> {
    let Range { start: near, end: far } = near_far;

    assert!(focal_ratio > 0.0, "focal ratio must be positive");
    assert!(aspect_ratio > 0.0, "aspect ratio must be positive");
    assert!(near > 0.0, "near must be positive");
    assert!(far > near, "far must be greater than near");

    let (x, y) = (focal_ratio, focal_ratio * aspect_ratio);
    let z = far / (near - far);
    let zw = near * far / (near - far);
    Matrix::new([
        [x, 0.0, 0.0, 0.0],
        [0.0, y, 0.0, 0.0],
        [0.0, 0.0, z, zw],
        [0.0, 0.0, -1.0, 0.0],
    ])
}

/// Returns an orthographic projection matrix.
///
/// The x and y ranges of the box `lbn..rtf` map to -1.0..1.0. The z
/// coordinates are view-space *distances* along the negative z axis;
/// `lbn.z()` maps to depth 0.0 and `rtf.z()` to depth 1.0.
pub fn orthographic<B>(
    lbn: Point3<B>,
    rtf: Point3<B>,
) -> Mat4x4<RealToProjective<B>> {
    let [l, b, n] = lbn.0;
    let [r, t, f] = rtf.0;
    let (w, h, d) = (r - l, t - b, f - n);
    Matrix::new([
        [2.0 / w, 0.0, 0.0, -(r + l) / w],
        [0.0, 2.0 / h, 0.0, -(t + b) / h],
        [0.0, 0.0, -1.0 / d, -n / d],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Returns a viewport matrix mapping NDC to screen space.
///
/// NDC x = -1.0 maps to `bounds.start.x()` and x = 1.0 to `bounds.end.x()`,
/// and likewise for y. To get a y axis pointing down on screen, pass the
/// screen height as the start y and zero as the end y. Depth is unchanged.
pub fn viewport(bounds: Range<Point2u>) -> Mat4x4<NdcToScreen> {
    let Range { start, end } = bounds;
    let (l, t) = (start.x() as f32, start.y() as f32);
    let (r, b) = (end.x() as f32, end.y() as f32);
    let (h, v) = ((r - l) / 2.0, (b - t) / 2.0);
    Matrix::new([
        [h, 0.0, 0.0, h + l],
        [0.0, v, 0.0, v + t],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Returns the screen-space point corresponding to NDC point `ndc`.
pub fn to_screen<B>(
    viewport: &Mat4x4<NdcToScreen>,
    ndc: Point3<B>,
) -> Point3<Screen> {
    viewport.apply(&ndc.to())
}

//! Types and traits for representing linear (vector) and affine spaces.

use core::fmt::{self, Debug, Formatter};
use core::marker::PhantomData;

/// Trait for types representing elements of an affine space.
///
/// An affine space has points but no origin: two points can be subtracted
/// to get their difference, a vector, and a vector can be added to a point
/// to get another point, but adding two points is meaningless.
pub trait Affine: Sized {
    /// The type of the space that `Self` is an element of.
    type Space;
    /// The (signed) difference of two values of `Self`.
    type Diff: Linear;

    /// The dimension of `Self`.
    const DIM: usize;

    /// Adds `diff` to `self` component-wise.
    fn add(&self, diff: &Self::Diff) -> Self;

    /// Subtracts `other` from `self`, returning the (signed) difference.
    fn sub(&self, other: &Self) -> Self::Diff;
}

/// Trait for types representing elements of a linear space (vector space).
///
/// A `Linear` type is `Affine` with the following additional properties:
///
/// * Its difference type [`Diff`][Affine::Diff] is `Self`
/// * It has an additive identity, returned by [`zero`][Self::zero]
/// * Every value has an additive inverse, returned by [`neg`][Self::neg]
pub trait Linear: Affine<Diff = Self> {
    /// The scalar type associated with `Self`.
    type Scalar: Sized;

    /// Returns the additive identity of `Self`.
    fn zero() -> Self;

    /// Returns the additive inverse of `self`.
    fn neg(&self) -> Self;

    /// Multiplies all components of `self` by `scalar`.
    fn mul(&self, scalar: Self::Scalar) -> Self;
}

/// Tag type for real vector spaces (Euclidean spaces) of dimension `DIM`.
///
/// The `Basis` parameter distinguishes between different coordinate systems
/// of the same dimension, such as model and world space, so that values
/// in one cannot be accidentally mixed with values in another.
#[derive(Copy, Clone, Default, Eq, PartialEq)]
pub struct Real<const DIM: usize, Basis = ()>(PhantomData<Basis>);

/// Tag type for the projective 4-space over reals.
///
/// Vertices are in this space after projection and before the
/// perspective divide. Clipping is also done in this space.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Proj4;

impl Affine for f32 {
    type Space = ();
    type Diff = Self;
    const DIM: usize = 1;

    fn add(&self, other: &Self) -> Self {
        self + other
    }
    fn sub(&self, other: &Self) -> Self {
        self - other
    }
}

impl Linear for f32 {
    type Scalar = Self;

    fn zero() -> Self {
        0.0
    }
    fn neg(&self) -> Self {
        -*self
    }
    fn mul(&self, scalar: Self) -> Self {
        self * scalar
    }
}

impl Affine for i32 {
    type Space = ();
    type Diff = Self;
    const DIM: usize = 1;

    fn add(&self, rhs: &Self) -> Self {
        self + rhs
    }
    fn sub(&self, rhs: &Self) -> Self {
        self - rhs
    }
}

impl Linear for i32 {
    type Scalar = Self;

    fn zero() -> Self {
        0
    }
    fn neg(&self) -> Self {
        -self
    }
    fn mul(&self, rhs: Self) -> Self {
        self * rhs
    }
}

impl<const DIM: usize, B> Debug for Real<DIM, B> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        const DIMS: [&str; 4] = ["", "²", "³", "⁴"];
        let b = core::any::type_name::<B>();
        let b = b.rsplit("::").next().unwrap_or(b);
        match DIMS.get(DIM.wrapping_sub(1)) {
            Some(d) => write!(f, "ℝ{d}<{b}>"),
            None => write!(f, "ℝ^{DIM}<{b}>"),
        }
    }
}

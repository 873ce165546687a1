//! Angular quantities.

use core::f32::consts::{PI, TAU};
use core::fmt::{self, Debug, Display};
use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use super::approx::ApproxEq;
use super::float;
use super::space::{Affine, Linear};

/// A scalar angular quantity.
///
/// Prevents confusion between degrees and radians by requiring the use of
/// one of the named constructors to create an `Angle`, as well as one of
/// the named getter methods to obtain the angle as a raw `f32` value.
#[derive(Copy, Clone, Default, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Angle(f32);

const RADS_PER_DEG: f32 = PI / 180.0;
const RADS_PER_TURN: f32 = TAU;

/// Returns an angle of `a` radians.
pub const fn rads(a: f32) -> Angle {
    Angle(a)
}

/// Returns an angle of `a` degrees.
pub const fn degs(a: f32) -> Angle {
    Angle(a * RADS_PER_DEG)
}

/// Returns an angle of `a` turns.
pub const fn turns(a: f32) -> Angle {
    Angle(a * RADS_PER_TURN)
}

/// Returns the arcsine of `x` as an `Angle`, in the range [-90°, 90°].
///
/// `x` is clamped to [-1.0, 1.0] first, so that values slightly out of
/// range due to rounding errors do not produce a NaN.
#[cfg(feature = "fp")]
pub fn asin(x: f32) -> Angle {
    Angle(float::asin(x.clamp(-1.0, 1.0)))
}

/// Returns the arccosine of `x` as an `Angle`, in the range [0°, 180°].
///
/// `x` is clamped to [-1.0, 1.0] first.
#[cfg(feature = "fp")]
pub fn acos(x: f32) -> Angle {
    Angle(float::acos(x.clamp(-1.0, 1.0)))
}

/// Returns the four-quadrant arctangent of `y` and `x` as an `Angle`.
///
/// # Examples
/// ```
/// # use trifle_core::{assert_approx_eq, math::angle::*};
/// assert_approx_eq!(atan2(2.0, 2.0), degs(45.0));
/// assert_approx_eq!(atan2(3.0, 0.0), degs(90.0));
/// ```
#[cfg(feature = "fp")]
pub fn atan2(y: f32, x: f32) -> Angle {
    Angle(float::atan2(y, x))
}

impl Angle {
    /// A zero degree angle.
    pub const ZERO: Self = Self(0.0);
    /// A 90 degree angle.
    pub const RIGHT: Self = Self(RADS_PER_TURN / 4.0);
    /// A 180 degree angle.
    pub const STRAIGHT: Self = Self(RADS_PER_TURN / 2.0);
    /// A 360 degree angle.
    pub const FULL: Self = Self(RADS_PER_TURN);

    /// Returns the value of `self` in radians.
    pub const fn to_rads(self) -> f32 {
        self.0
    }
    /// Returns the value of `self` in degrees.
    pub fn to_degs(self) -> f32 {
        self.0 / RADS_PER_DEG
    }
    /// Returns the value of `self` in turns.
    pub fn to_turns(self) -> f32 {
        self.0 / RADS_PER_TURN
    }

    /// Returns the minimum of `self` and `other`.
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }
    /// Returns the maximum of `self` and `other`.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self(self.0.max(other.0))
    }
    /// Returns `self` clamped to the range `min..=max`.
    ///
    /// # Panics
    /// If `min > max`.
    #[must_use]
    pub fn clamp(self, min: Self, max: Self) -> Self {
        Self(self.0.clamp(min.0, max.0))
    }

    /// Returns `self` "wrapped around" to the range `min..max`.
    ///
    /// # Examples
    /// ```
    /// # use trifle_core::{assert_approx_eq, math::angle::*};
    /// let a = degs(400.0).wrap(Angle::ZERO, Angle::FULL);
    /// assert_approx_eq!(a, degs(40.0), eps = 1e-5);
    /// ```
    #[must_use]
    pub fn wrap(self, min: Self, max: Self) -> Self {
        let range = max.0 - min.0;
        let turns = float::floor((self.0 - min.0) / range);
        Self(self.0 - turns * range)
    }
}

#[cfg(feature = "fp")]
impl Angle {
    /// Returns the sine of `self`.
    pub fn sin(self) -> f32 {
        float::sin(self.0)
    }
    /// Returns the cosine of `self`.
    pub fn cos(self) -> f32 {
        float::cos(self.0)
    }
    /// Returns the sine and cosine of `self` as a pair.
    pub fn sin_cos(self) -> (f32, f32) {
        (self.sin(), self.cos())
    }
    /// Returns the tangent of `self`.
    pub fn tan(self) -> f32 {
        float::tan(self.0)
    }
}

impl ApproxEq<Self, f32> for Angle {
    fn approx_eq_eps(&self, other: &Self, eps: &f32) -> bool {
        self.0.approx_eq_eps(&other.0, eps)
    }
    fn relative_epsilon() -> f32 {
        f32::relative_epsilon()
    }
}

impl Affine for Angle {
    type Space = ();
    type Diff = Self;
    const DIM: usize = 1;

    fn add(&self, other: &Self) -> Self {
        *self + *other
    }
    fn sub(&self, other: &Self) -> Self {
        *self - *other
    }
}

impl Linear for Angle {
    type Scalar = f32;

    fn zero() -> Self {
        Self::ZERO
    }
    fn neg(&self) -> Self {
        -*self
    }
    fn mul(&self, scalar: f32) -> Self {
        *self * scalar
    }
}

impl Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (val, unit) = if f.alternate() {
            (self.to_rads(), " rad")
        } else {
            (self.to_degs(), "°")
        };
        Display::fmt(&val, f)?;
        f.write_str(unit)
    }
}

impl Debug for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Angle(")?;
        Display::fmt(self, f)?;
        f.write_str(")")
    }
}

impl Add for Angle {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Angle {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for Angle {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Angle {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Angle {
    type Output = Self;
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Mul<f32> for Angle {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self(self.0 * rhs)
    }
}

impl Div<f32> for Angle {
    type Output = Self;
    fn div(self, rhs: f32) -> Self {
        Self(self.0 / rhs)
    }
}

#[cfg(test)]
mod tests {
    use core::f32::consts::{FRAC_PI_2, PI};

    use crate::assert_approx_eq;

    use super::*;

    #[test]
    fn unit_conversions() {
        assert_approx_eq!(degs(180.0).to_rads(), PI);
        assert_approx_eq!(turns(0.25).to_degs(), 90.0);
        assert_approx_eq!(rads(FRAC_PI_2).to_turns(), 0.25);
        assert_eq!(Angle::RIGHT, turns(0.25));
    }

    #[test]
    fn arithmetic() {
        let mut a = degs(30.0);
        a += degs(60.0);
        assert_approx_eq!(a, degs(90.0));
        assert_approx_eq!(a * 2.0, degs(180.0));
        assert_approx_eq!(a / 3.0 - degs(30.0), Angle::ZERO);
        assert_approx_eq!(-a, degs(-90.0));
    }

    #[test]
    fn wrapping() {
        let full = Angle::FULL;
        assert_approx_eq!(
            degs(-90.0).wrap(Angle::ZERO, full),
            degs(270.0),
            eps = 1e-5
        );
        assert_approx_eq!(
            degs(370.0).wrap(Angle::ZERO, full),
            degs(10.0),
            eps = 1e-5
        );
        assert_approx_eq!(
            degs(190.0).wrap(-Angle::STRAIGHT, Angle::STRAIGHT),
            degs(-170.0),
            eps = 1e-5
        );
    }

    #[test]
    fn clamp_min_max() {
        assert_eq!(degs(100.0).clamp(Angle::ZERO, Angle::RIGHT), Angle::RIGHT);
        assert_eq!(degs(10.0).min(degs(20.0)), degs(10.0));
        assert_eq!(degs(10.0).max(degs(20.0)), degs(20.0));
    }

    #[cfg(feature = "fp")]
    #[test]
    fn trig_functions() {
        assert_approx_eq!(degs(30.0).sin(), 0.5);
        assert_approx_eq!(degs(60.0).cos(), 0.5);
        assert_approx_eq!(degs(45.0).tan(), 1.0);
        assert_approx_eq!(asin(1.0), degs(90.0));
        assert_approx_eq!(acos(-1.0), degs(180.0));
        assert_approx_eq!(atan2(0.0, -1.0), degs(180.0));
    }

    #[cfg(feature = "std")]
    #[test]
    fn display() {
        use alloc::format;
        assert_eq!(format!("{:.1}", degs(45.0)), "45.0°");
        assert_eq!(format!("{:#.2}", degs(180.0)), "3.14 rad");
    }
}

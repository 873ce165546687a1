//! Quaternions for representing 3D rotations.

use core::ops::Mul;

use super::approx::ApproxEq;
use super::float;
use super::mat::{Mat4x4, Matrix};
use super::space::Real;
use super::vec::{Vec3, vec3};

#[cfg(feature = "fp")]
use super::angle::{Angle, asin, atan2};

/// A quaternion `w + xi + yj + zk`.
///
/// Unit quaternions represent rotations in 3D space. Unlike Euler angles,
/// they do not suffer from gimbal lock, and unlike rotation matrices, they
/// can be cheaply renormalized to correct for accumulated rounding errors.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Quat {
    /// The real (scalar) part.
    pub w: f32,
    /// The coefficient of the imaginary unit i.
    pub x: f32,
    /// The coefficient of the imaginary unit j.
    pub y: f32,
    /// The coefficient of the imaginary unit k.
    pub z: f32,
}

impl Quat {
    /// The identity quaternion, representing no rotation.
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 0.0);

    /// Returns a quaternion with the given components.
    pub const fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self { w, x, y, z }
    }

    /// Returns a unit quaternion representing a rotation by angle `a`
    /// about `axis`.
    ///
    /// `axis` does not need to be normalized. If it is a zero vector,
    /// returns the identity.
    #[cfg(feature = "fp")]
    pub fn from_axis_angle(axis: Vec3, a: Angle) -> Self {
        let len = axis.len();
        if len == 0.0 {
            return Self::IDENTITY;
        }
        let (s, c) = (a / 2.0).sin_cos();
        let [x, y, z] = (axis * (s / len)).0;
        Self::new(c, x, y, z)
    }

    /// Returns a unit quaternion equivalent to the rotation matrix
    /// [`rotate_euler(x, y, z)`][super::mat::rotate_euler].
    #[cfg(feature = "fp")]
    pub fn from_euler(x: Angle, y: Angle, z: Angle) -> Self {
        let qx = Self::from_axis_angle(vec3(1.0, 0.0, 0.0), x);
        let qy = Self::from_axis_angle(vec3(0.0, 1.0, 0.0), y);
        let qz = Self::from_axis_angle(vec3(0.0, 0.0, 1.0), z);
        qx * qy * qz
    }

    /// Returns the imaginary part of `self` as a vector.
    pub fn imag(&self) -> Vec3 {
        vec3(self.x, self.y, self.z)
    }

    /// Returns the conjugate of `self`, equal to the inverse
    /// if `self` is a unit quaternion.
    #[must_use]
    pub fn conj(&self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    /// Returns the dot product of `self` and `other` as 4-vectors.
    pub fn dot(&self, other: &Self) -> f32 {
        self.w * other.w + self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Returns the norm of `self`, squared.
    pub fn len_sqr(&self) -> f32 {
        self.dot(self)
    }

    /// Returns the norm of `self`.
    pub fn len(&self) -> f32 {
        float::sqrt(self.len_sqr())
    }

    /// Returns `self` scaled to unit norm.
    ///
    /// Returns the identity if `self` is zero or not finite.
    #[must_use]
    pub fn normalize(&self) -> Self {
        let len = self.len();
        if !(len > 0.0 && len.is_finite()) {
            return Self::IDENTITY;
        }
        let r = 1.0 / len;
        Self::new(self.w * r, self.x * r, self.y * r, self.z * r)
    }

    /// Rotates vector `v` by `self`, which must be a unit quaternion.
    ///
    /// Equivalent to, but faster than, the conjugation `q v q*`.
    pub fn rotate<B>(&self, v: Vec3<B>) -> Vec3<B> {
        let q = self.imag().to::<Real<3, B>>();
        let t = q.cross(&v) * 2.0;
        v + t * self.w + q.cross(&t)
    }

    /// Returns the rotation matrix equivalent to `self`,
    /// which must be a unit quaternion.
    pub fn to_mat(&self) -> Mat4x4 {
        let Self { w, x, y, z } = *self;
        let (xx, yy, zz) = (x * x, y * y, z * z);
        let (xy, xz, yz) = (x * y, x * z, y * z);
        let (wx, wy, wz) = (w * x, w * y, w * z);
        Matrix::new([
            [1.0 - 2.0 * (yy + zz), 2.0 * (xy - wz), 2.0 * (xz + wy), 0.0],
            [2.0 * (xy + wz), 1.0 - 2.0 * (xx + zz), 2.0 * (yz - wx), 0.0],
            [2.0 * (xz - wy), 2.0 * (yz + wx), 1.0 - 2.0 * (xx + yy), 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Returns the Euler angles `(x, y, z)` of the rotation represented by
    /// `self`, such that [`from_euler(x, y, z)`][Self::from_euler] yields
    /// the same rotation.
    ///
    /// The y angle is in the range [-90°, 90°]. In the degenerate case
    /// where y is ±90°, the z angle is reported as zero.
    #[cfg(feature = "fp")]
    pub fn to_euler(&self) -> (Angle, Angle, Angle) {
        let m = self.to_mat().0;
        let sin_y = m[0][2];
        if float::abs(sin_y) > 0.99999 {
            (atan2(m[2][1], m[1][1]), asin(sin_y), Angle::ZERO)
        } else {
            (
                atan2(-m[1][2], m[2][2]),
                asin(sin_y),
                atan2(-m[0][1], m[0][0]),
            )
        }
    }
}

impl Default for Quat {
    /// Returns the identity quaternion.
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Quat {
    type Output = Self;

    /// Returns the Hamilton product of `self` and `q`.
    ///
    /// As rotations, `p * q` first applies `q`, then `p`.
    fn mul(self, q: Self) -> Self {
        let p = self;
        Self::new(
            p.w * q.w - p.x * q.x - p.y * q.y - p.z * q.z,
            p.w * q.x + p.x * q.w + p.y * q.z - p.z * q.y,
            p.w * q.y - p.x * q.z + p.y * q.w + p.z * q.x,
            p.w * q.z + p.x * q.y - p.y * q.x + p.z * q.w,
        )
    }
}

impl ApproxEq<Self, f32> for Quat {
    fn approx_eq_eps(&self, other: &Self, eps: &f32) -> bool {
        [self.w, self.x, self.y, self.z]
            .approx_eq_eps(&[other.w, other.x, other.y, other.z], eps)
    }
    fn relative_epsilon() -> f32 {
        f32::relative_epsilon()
    }
}

#[cfg(test)]
mod tests {
    use crate::assert_approx_eq;
    use crate::math::mat::{Apply, RealToReal};

    use super::*;

    #[test]
    fn identity_is_neutral() {
        let q = Quat::new(0.5, 0.5, -0.5, 0.5);
        assert_eq!(Quat::IDENTITY * q, q);
        assert_eq!(q * Quat::IDENTITY, q);
        let v: Vec3 = vec3(1.0, 2.0, 3.0);
        assert_eq!(Quat::IDENTITY.rotate(v), v);
    }

    #[test]
    fn unit_times_conjugate_is_identity() {
        let q = Quat::new(1.0, 2.0, -3.0, 4.0).normalize();
        assert_approx_eq!(q * q.conj(), Quat::IDENTITY, eps = 1e-6);
    }

    #[test]
    fn normalize_restores_unit_norm() {
        let drifted = Quat::new(0.71, 0.0, 0.71, 0.01);
        assert_approx_eq!(drifted.normalize().len(), 1.0, eps = 1e-6);
        assert_eq!(Quat::new(0.0, 0.0, 0.0, 0.0).normalize(), Quat::IDENTITY);
    }

    #[test]
    fn rotate_matches_matrix() {
        let q = Quat::new(0.9, 0.1, -0.3, 0.2).normalize();
        let v: Vec3 = vec3(1.0, -2.0, 0.5);
        let m = q.to_mat().to::<RealToReal<3>>();
        assert_approx_eq!(q.rotate(v), m.apply(&v), eps = 1e-5);
    }

    #[cfg(feature = "fp")]
    mod fp {
        use crate::math::angle::degs;
        use crate::math::mat::{rotate, rotate_euler};

        use super::*;

        #[test]
        fn axis_angle_rotation() {
            let q = Quat::from_axis_angle(vec3(0.0, 0.0, 1.0), degs(90.0));
            let v: Vec3 = vec3(1.0, 0.0, 0.0);
            assert_approx_eq!(q.rotate(v), vec3(0.0, 1.0, 0.0), eps = 1e-6);

            let axis = vec3(1.0, 1.0, -2.0);
            let q = Quat::from_axis_angle(axis, degs(40.0));
            assert_approx_eq!(q.to_mat(), rotate(axis, degs(40.0)), eps = 1e-6);
        }

        #[test]
        fn zero_axis_is_identity() {
            let q = Quat::from_axis_angle(vec3(0.0, 0.0, 0.0), degs(30.0));
            assert_eq!(q, Quat::IDENTITY);
        }

        #[test]
        fn euler_matches_matrix() {
            let (x, y, z) = (degs(20.0), degs(-35.0), degs(50.0));
            let q = Quat::from_euler(x, y, z);
            assert_approx_eq!(q.to_mat(), rotate_euler(x, y, z), eps = 1e-6);
        }

        #[test]
        fn to_euler_recovers_angles() {
            let (x, y, z) = (degs(20.0), degs(-35.0), degs(50.0));
            let (ex, ey, ez) = Quat::from_euler(x, y, z).to_euler();
            assert_approx_eq!(ex, x, eps = 1e-5);
            assert_approx_eq!(ey, y, eps = 1e-5);
            assert_approx_eq!(ez, z, eps = 1e-5);
        }

        #[test]
        fn to_euler_gimbal_lock() {
            let (x, y) = (degs(30.0), degs(90.0));
            let (ex, ey, ez) = Quat::from_euler(x, y, Angle::ZERO).to_euler();
            assert_approx_eq!(ex, x, eps = 1e-3);
            assert_approx_eq!(ey, y, eps = 1e-3);
            assert_eq!(ez, Angle::ZERO);
        }
    }
}

//! Floating-point compatibility API.
//!
//! Most floating-point functions are unavailable in `no_std`. This module
//! provides them using std, the `libm` crate, or the `micromath` crate,
//! depending on which feature is enabled. As a fallback, it also implements
//! a critical subset of the functions even if none of the features is.
//!
//! All functions are free functions taking and returning `f32`, so callers
//! never need to know which implementation is in use.

#[cfg(all(
    feature = "fp",
    not(any(feature = "std", feature = "libm", feature = "mm"))
))]
compile_error!("feature `fp` requires one of `std`, `libm`, or `mm`");

#[cfg(feature = "std")]
mod imp {
    #[inline]
    pub fn floor(x: f32) -> f32 {
        x.floor()
    }
    #[inline]
    pub fn abs(x: f32) -> f32 {
        x.abs()
    }
    #[inline]
    pub fn sqrt(x: f32) -> f32 {
        x.sqrt()
    }
    #[inline]
    pub fn powf(x: f32, y: f32) -> f32 {
        x.powf(y)
    }
    #[inline]
    pub fn sin(x: f32) -> f32 {
        x.sin()
    }
    #[inline]
    pub fn cos(x: f32) -> f32 {
        x.cos()
    }
    #[inline]
    pub fn tan(x: f32) -> f32 {
        x.tan()
    }
    #[inline]
    pub fn asin(x: f32) -> f32 {
        x.asin()
    }
    #[inline]
    pub fn acos(x: f32) -> f32 {
        x.acos()
    }
    #[inline]
    pub fn atan2(y: f32, x: f32) -> f32 {
        y.atan2(x)
    }
}

#[cfg(all(feature = "libm", not(feature = "std")))]
mod imp {
    pub use libm::{
        acosf as acos, asinf as asin, atan2f as atan2, cosf as cos,
        fabsf as abs, floorf as floor, powf, sinf as sin, sqrtf as sqrt,
        tanf as tan,
    };
}

#[cfg(all(feature = "mm", not(feature = "std"), not(feature = "libm")))]
mod imp {
    use micromath::F32Ext as mm;

    #[inline]
    pub fn floor(x: f32) -> f32 {
        mm::floor(x)
    }
    #[inline]
    pub fn abs(x: f32) -> f32 {
        mm::abs(x)
    }
    /// Returns the approximate square root of `x`.
    #[inline]
    pub fn sqrt(x: f32) -> f32 {
        let y = mm::sqrt(x);
        // Two rounds of Newton's method
        let y = 0.5 * (y + (x / y));
        0.5 * (y + (x / y))
    }
    #[inline]
    pub fn powf(x: f32, y: f32) -> f32 {
        mm::powf(x, y)
    }
    #[inline]
    pub fn sin(x: f32) -> f32 {
        mm::sin(x)
    }
    #[inline]
    pub fn cos(x: f32) -> f32 {
        mm::cos(x)
    }
    #[inline]
    pub fn tan(x: f32) -> f32 {
        mm::tan(x)
    }
    #[inline]
    pub fn asin(x: f32) -> f32 {
        mm::asin(x)
    }
    #[inline]
    pub fn acos(x: f32) -> f32 {
        mm::acos(x)
    }
    #[inline]
    pub fn atan2(y: f32, x: f32) -> f32 {
        if y == 0.0 && x == 0.0 {
            // Micromath yields a NaN but others return zero
            return 0.0;
        }
        mm::atan2(y, x)
    }
}

#[cfg(not(feature = "fp"))]
mod imp {
    /// Returns the largest integer less than or equal to `x`.
    #[inline]
    pub fn floor(x: f32) -> f32 {
        let t = x as i64 as f32;
        if t > x { t - 1.0 } else { t }
    }
    /// Returns the absolute value of `x`.
    #[inline]
    pub fn abs(x: f32) -> f32 {
        f32::from_bits(x.to_bits() & 0x7FFF_FFFF)
    }
    /// Returns the approximate square root of `x`.
    #[inline]
    pub fn sqrt(x: f32) -> f32 {
        if x == 0.0 {
            return 0.0;
        }
        let y = 1.0 / super::fast_recip_sqrt(x);
        // A round of Newton's method
        0.5 * (y + x / y)
    }
}

pub use imp::*;

/// Returns the smallest integer greater than or equal to `x`.
#[inline]
pub fn ceil(x: f32) -> f32 {
    -floor(-x)
}

/// Returns a fast approximation of the reciprocal square root of a number.
#[inline]
pub fn fast_recip_sqrt(x: f32) -> f32 {
    // https://en.wikipedia.org/wiki/Fast_inverse_square_root
    const MAGIC: u32 = 0x5f37_5a86;
    let y = f32::from_bits(MAGIC.saturating_sub(x.to_bits() >> 1));
    // A round of Newton's method
    y * (1.5 - 0.5 * x * y * y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq;

    #[test]
    fn floor_and_ceil() {
        assert_eq!(floor(1.5), 1.0);
        assert_eq!(floor(0.99), 0.0);
        assert_eq!(floor(-1.1), -2.0);
        assert_eq!(floor(-2.0), -2.0);
        assert_eq!(ceil(1.1), 2.0);
        assert_eq!(ceil(-1.5), -1.0);
        assert_eq!(ceil(3.0), 3.0);
    }

    #[test]
    fn abs_value() {
        assert_eq!(abs(-2.5), 2.5);
        assert_eq!(abs(2.5), 2.5);
        assert_eq!(abs(-0.0), 0.0);
    }

    #[test]
    fn square_root() {
        assert_approx_eq!(sqrt(9.0), 3.0, eps = 1e-4);
        assert_approx_eq!(sqrt(2.0), 1.4142135, eps = 1e-4);
        assert_eq!(sqrt(0.0), 0.0);
    }

    #[test]
    fn recip_sqrt_approx() {
        assert_approx_eq!(fast_recip_sqrt(4.0), 0.5, eps = 1e-2);
        assert_approx_eq!(fast_recip_sqrt(16.0), 0.25, eps = 1e-2);
    }

    #[cfg(feature = "fp")]
    #[test]
    fn trigonometry() {
        use core::f32::consts::*;
        assert_approx_eq!(sin(FRAC_PI_6), 0.5, eps = 1e-4);
        assert_approx_eq!(cos(PI), -1.0, eps = 1e-4);
        assert_approx_eq!(atan2(1.0, 1.0), FRAC_PI_4, eps = 1e-4);
        assert_approx_eq!(powf(2.0, 10.0), 1024.0, eps = 1e-4);
    }
}

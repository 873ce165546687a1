//! Approximate equality of floating-point values.

use core::iter::zip;

/// Equality up to accumulated rounding error.
///
/// The comparison is relative: the allowed difference grows with the
/// magnitude of `self` once that exceeds one. Composite types compare
/// componentwise with the same epsilon.
pub trait ApproxEq<Other: ?Sized = Self, Epsilon = Self> {
    /// Compares with the default [`relative_epsilon`][Self::relative_epsilon].
    fn approx_eq(&self, other: &Other) -> bool {
        self.approx_eq_eps(other, &Self::relative_epsilon())
    }

    /// Compares with a caller-chosen relative epsilon.
    fn approx_eq_eps(&self, other: &Other, rel_eps: &Epsilon) -> bool;

    /// Tolerance used by [`approx_eq`][Self::approx_eq].
    fn relative_epsilon() -> Epsilon;
}

impl ApproxEq for f32 {
    fn approx_eq_eps(&self, other: &Self, rel_eps: &Self) -> bool {
        use super::float::abs;
        abs(self - other) <= *rel_eps * abs(*self).max(1.0)
    }

    fn relative_epsilon() -> Self {
        // micromath trades accuracy for size
        if cfg!(any(feature = "std", feature = "libm")) {
            1e-6
        } else {
            5e-3
        }
    }
}

impl<E, T: Sized + ApproxEq<T, E>> ApproxEq<Self, E> for [T] {
    fn approx_eq_eps(&self, other: &Self, rel_eps: &E) -> bool {
        self.len() == other.len()
            && zip(self, other).all(|(s, o)| s.approx_eq_eps(o, rel_eps))
    }
    fn relative_epsilon() -> E {
        T::relative_epsilon()
    }
}

impl<E, T: Sized + ApproxEq<T, E>, const N: usize> ApproxEq<Self, E>
    for [T; N]
{
    fn approx_eq_eps(&self, other: &Self, rel_eps: &E) -> bool {
        self.as_slice().approx_eq_eps(other, rel_eps)
    }
    fn relative_epsilon() -> E {
        T::relative_epsilon()
    }
}

impl<E, T: ApproxEq<T, E>> ApproxEq<Self, E> for Option<T> {
    fn approx_eq_eps(&self, other: &Self, rel_eps: &E) -> bool {
        match (self, other) {
            (Some(s), Some(o)) => s.approx_eq_eps(o, rel_eps),
            (None, None) => true,
            _ => false,
        }
    }
    fn relative_epsilon() -> E {
        T::relative_epsilon()
    }
}

/// Panics unless `$a` and `$b` are equal within a relative epsilon.
///
/// Both sides must be `Debug`, and the left side must impl [`ApproxEq`]
/// for the right. An explicit `eps = ...` overrides the default
/// tolerance. A format string and arguments may follow, as with
/// `assert!`.
///
/// ```
/// # use trifle_core::assert_approx_eq;
/// let third = 1.0_f32 / 3.0;
/// assert_approx_eq!(third * 3.0, 1.0);
/// assert_approx_eq!([0.5, 2.0], [0.5, 2.0000002]);
/// assert_approx_eq!(1000.0, 1004.0, eps = 0.01, "within one percent");
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($a:expr, $b:expr $(,)?) => {
        match (&$a, &$b) {
            (left, right) => $crate::assert_approx_eq!(
                *left, *right,
                "not approximately equal\n  left: {left:?}\n right: {right:?}"
            )
        }
    };
    ($a:expr, $b:expr, eps = $eps:literal $(,)?) => {
        match (&$a, &$b) {
            (left, right) => $crate::assert_approx_eq!(
                *left, *right, eps = $eps,
                "not approximately equal (eps = {})\n  left: {left:?}\n right: {right:?}",
                $eps
            )
        }
    };
    ($a:expr, $b:expr, eps = $eps:literal, $fmt:literal $(, $args:expr)* $(,)?) => {{
        use $crate::math::approx::ApproxEq;
        match (&$a, &$b) {
            (left, right) => assert!(
                ApproxEq::approx_eq_eps(left, right, &$eps),
                $fmt $(, $args)*
            )
        }
    }};
    ($a:expr, $b:expr, $fmt:literal $(, $args:expr)* $(,)?) => {{
        use $crate::math::approx::ApproxEq;
        match (&$a, &$b) {
            (left, right) => {
                assert!(ApproxEq::approx_eq(left, right), $fmt $(, $args)*)
            }
        }
    }};
}

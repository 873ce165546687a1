//! Two-dimensional buffers, used as color and depth targets and
//! as texture storage.

use alloc::vec::Vec;
use core::fmt::{Debug, Formatter};
use core::iter::repeat_n;
use core::ops::{Deref, DerefMut};

use inner::Inner;

//
// Traits
//

/// A trait for types that can provide a view of their data as a `Slice2`.
pub trait AsSlice2<T> {
    /// Returns a borrowed `Slice2` view of `Self`.
    fn as_slice2(&self) -> Slice2<'_, T>;
}

/// A trait for types that can provide a mutable view of their data
/// as a `MutSlice2`.
pub trait AsMutSlice2<T> {
    /// Returns a mutably borrowed `MutSlice2` view of `Self`.
    fn as_mut_slice2(&mut self) -> MutSlice2<'_, T>;
}

//
// Types
//

/// A rectangular 2D buffer that owns its elements, backed by a `Vec`.
///
/// `Buf2` stores its elements contiguously, in standard row-major order,
/// such that element (x, y) maps to element at index
/// ```text
/// buf.width() * y + x
/// ```
/// in the backing vector.
///
/// # Examples
/// ```
/// # use trifle_core::util::buf::*;
/// // Elements initialized with `Default::default()`
/// let mut buf = Buf2::new_default(4, 4);
/// // Indexing with a pair [x, y] yields element at row y, column x:
/// buf[[2, 1]] = 123;
/// // Indexing with an usize i yields row with index i as a slice:
/// assert_eq!(&buf[1usize], &[0, 0, 123, 0]);
/// // Thus you can also do this, row first, column second:
/// assert_eq!(buf[1usize][2], 123)
/// ```
#[derive(Clone)]
#[repr(transparent)]
pub struct Buf2<T>(Inner<T, Vec<T>>);

/// An immutable rectangular view to a region of a [`Buf2`], another `Slice2`,
/// or in general any `&[T]` slice of memory. A two-dimensional analog to `&[T]`.
///
/// A `Slice2` may be discontiguous:
/// ```text
/// +------stride-----+
/// |    ____w____    |
/// |   |r0_______|   |
/// |   |r1_______| h |
/// |   |r2_______|   |
/// +-----------------+
/// ```
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct Slice2<'a, T>(Inner<T, &'a [T]>);

/// A mutable rectangular view to a region of a `Buf2`, a `Slice2`,
/// or in general any `&mut [T]` slice of memory.
///
/// Disjoint row bands of a `MutSlice2` can be split off with
/// [`split_rows_mut`][Self::split_rows_mut] and handed to different
/// threads.
#[repr(transparent)]
pub struct MutSlice2<'a, T>(Inner<T, &'a mut [T]>);

//
// Inherent impls
//

impl<T> Buf2<T> {
    /// Returns a buffer with size `w` × `h`, with elements initialized
    /// with values from `init` in row-major order.
    ///
    /// # Panics
    /// If there are fewer than `w * h` elements in `init`.
    pub fn new<I>(w: usize, h: usize, init: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let data: Vec<_> = init.into_iter().take(w * h).collect();
        assert_eq!(data.len(), w * h);
        Self(Inner::new(w, h, w, data))
    }
    /// Returns a buffer with size `w` × `h`, with every element
    /// initialized by calling `T::default()`.
    pub fn new_default(w: usize, h: usize) -> Self
    where
        T: Clone + Default,
    {
        Self::new(w, h, repeat_n(T::default(), w * h))
    }
    /// Returns a buffer with size `w` × `h`, with every element
    /// initialized by calling `init_fn(x, y)` where x is the column index
    /// and y the row index of the element being initialized.
    pub fn new_with<F>(w: usize, h: usize, mut init_fn: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let mut data = Vec::with_capacity(w * h);
        for y in 0..h {
            data.extend((0..w).map(|x| init_fn(x, y)));
        }
        Self(Inner::new(w, h, w, data))
    }
    /// Returns a buffer with size `w` × `h` that takes ownership of `data`.
    ///
    /// # Panics
    /// If `data.len() != w * h`.
    pub fn from_vec(w: usize, h: usize, data: Vec<T>) -> Self {
        assert_eq!(data.len(), w * h, "buffer size mismatch");
        Self(Inner::new(w, h, w, data))
    }

    /// Resizes `self` to `w` × `h`.
    ///
    /// The contents are not preserved: every element is reset
    /// to `T::default()`.
    pub fn resize(&mut self, w: usize, h: usize)
    where
        T: Clone + Default,
    {
        *self = Self::new_default(w, h);
    }

    /// Returns a view of the backing data of `self`.
    pub fn data(&self) -> &[T] {
        self.0.data()
    }
    /// Returns a mutable view of the backing data of `self`.
    pub fn data_mut(&mut self) -> &mut [T] {
        self.0.data_mut()
    }
    /// Consumes `self`, returning the backing vector.
    pub fn into_vec(self) -> Vec<T> {
        self.0.into_data()
    }
}

impl<'a, T> Slice2<'a, T> {
    /// Returns a new `Slice2` view to `data` with dimensions `w` and `h`
    /// and stride `stride`.
    ///
    /// # Examples
    /// ```
    /// # use trifle_core::util::buf::Slice2;
    /// let data = &[0, 1, 2, 3, 4, 5, 6];
    /// let slice = Slice2::new(2, 2, 3, data);
    /// assert_eq!(&slice[0usize], &[0, 1]);
    /// assert_eq!(&slice[1usize], &[3, 4]);
    /// ```
    /// Above, `slice` represents a 2×2 rectangle with stride 3, such that
    /// the first row maps to `data[0..2]` and the second to `data[3..5]`.
    ///
    /// # Panics
    /// if `stride < width` or if the slice would overflow `data`.
    pub fn new(
        width: usize,
        height: usize,
        stride: usize,
        data: &'a [T],
    ) -> Self {
        Self(Inner::new(width, height, stride, data))
    }
}

impl<'a, T> MutSlice2<'a, T> {
    /// Returns a new `MutSlice2` view to `data` with dimensions `w` and `h`
    /// and stride `stride`.
    ///
    /// # Panics
    /// if `stride < width` or if the slice would overflow `data`.
    pub fn new(w: usize, h: usize, stride: usize, data: &'a mut [T]) -> Self {
        Self(Inner::new(w, h, stride, data))
    }

    /// Splits `self` into two disjoint views, the first containing
    /// rows `0..at` and the second rows `at..height`.
    ///
    /// # Panics
    /// If `at > self.height()`.
    pub fn split_rows_mut(self, at: usize) -> (Self, Self) {
        let (w, h, stride) = (self.width(), self.height(), self.stride());
        assert!(at <= h, "split point {at} out of bounds 0..={h}");
        let data = self.0.into_data();
        let mid = (at * stride).min(data.len());
        let (top, bottom) = data.split_at_mut(mid);
        (
            Self::new(w, at, stride, top),
            Self::new(w, h - at, stride, bottom),
        )
    }

    /// Splits `self` into at most `n` horizontal bands of roughly equal
    /// height. Each band is returned with the index of its first row.
    ///
    /// Returns a single band if `n` is zero or one.
    pub fn into_bands(self, n: usize) -> Vec<(usize, Self)> {
        let h = self.height();
        let rows_per_band = h.div_ceil(n.max(1)).max(1);
        let mut bands = Vec::with_capacity(n.max(1));
        let (mut rest, mut y) = (self, 0);
        while rest.height() > rows_per_band {
            let (band, tail) = rest.split_rows_mut(rows_per_band);
            bands.push((y, band));
            y += rows_per_band;
            rest = tail;
        }
        bands.push((y, rest));
        bands
    }
}

//
// Local trait impls
//

impl<T> AsSlice2<T> for Buf2<T> {
    #[inline]
    fn as_slice2(&self) -> Slice2<'_, T> {
        self.0.as_slice2()
    }
}
impl<T> AsSlice2<T> for Slice2<'_, T> {
    #[inline]
    fn as_slice2(&self) -> Slice2<'_, T> {
        self.0.as_slice2()
    }
}
impl<T> AsSlice2<T> for MutSlice2<'_, T> {
    #[inline]
    fn as_slice2(&self) -> Slice2<'_, T> {
        self.0.as_slice2()
    }
}

impl<T> AsMutSlice2<T> for Buf2<T> {
    #[inline]
    fn as_mut_slice2(&mut self) -> MutSlice2<'_, T> {
        self.0.as_mut_slice2()
    }
}
impl<T> AsMutSlice2<T> for MutSlice2<'_, T> {
    #[inline]
    fn as_mut_slice2(&mut self) -> MutSlice2<'_, T> {
        self.0.as_mut_slice2()
    }
}

//
// Foreign trait impls
//

impl<T> Debug for Buf2<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        self.0.debug_fmt(f, "Buf2")
    }
}
impl<T> Debug for Slice2<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        self.0.debug_fmt(f, "Slice2")
    }
}
impl<T> Debug for MutSlice2<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        self.0.debug_fmt(f, "MutSlice2")
    }
}

impl<T> Deref for Buf2<T> {
    type Target = Inner<T, Vec<T>>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl<'a, T> Deref for Slice2<'a, T> {
    type Target = Inner<T, &'a [T]>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl<'a, T> Deref for MutSlice2<'a, T> {
    type Target = Inner<T, &'a mut [T]>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for Buf2<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
impl<T> DerefMut for MutSlice2<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

pub mod inner {
    use core::fmt::Formatter;
    use core::marker::PhantomData;
    use core::ops::{Deref, DerefMut, Index, IndexMut};

    use super::{MutSlice2, Slice2};

    /// A helper type that abstracts over owned and borrowed buffers.
    /// The types `Buf2`, `Slice2`, and `MutSlice2` deref to `Inner`.
    #[derive(Copy, Clone)]
    pub struct Inner<T, D> {
        w: usize,
        h: usize,
        stride: usize,
        data: D,
        _pd: PhantomData<T>,
    }

    impl<T, D> Inner<T, D> {
        /// Returns the width of `self`.
        #[inline]
        pub fn width(&self) -> usize {
            self.w
        }
        /// Returns the height of `self`.
        #[inline]
        pub fn height(&self) -> usize {
            self.h
        }
        /// Returns the stride of `self`.
        #[inline]
        pub fn stride(&self) -> usize {
            self.stride
        }
        /// Returns whether the rows of `self` are stored contiguously
        /// in memory. `Buf2` instances are always contiguous. `Slice2`
        /// and `MutSlice2` instances are contiguous if their width equals
        /// their stride, if their height is 1, or if they are empty.
        pub fn is_contiguous(&self) -> bool {
            self.stride == self.w || self.h <= 1 || self.w == 0
        }
        /// Returns whether `self` has no elements (if its width or height is 0).
        pub fn is_empty(&self) -> bool {
            self.w == 0 || self.h == 0
        }

        #[inline]
        fn to_index_checked(&self, x: usize, y: usize) -> Option<usize> {
            (x < self.w && y < self.h).then(|| y * self.stride + x)
        }

        #[cold]
        #[inline(never)]
        #[track_caller]
        fn position_out_of_bounds(&self, x: usize, y: usize) -> ! {
            panic!(
                "position (x={x}, y={y}) out of bounds (0..{}, 0..{})",
                self.w, self.h
            )
        }

        pub(super) fn into_data(self) -> D {
            self.data
        }

        /// A helper for implementing `Debug`.
        pub(super) fn debug_fmt(
            &self,
            f: &mut Formatter,
            name: &str,
        ) -> core::fmt::Result {
            f.debug_struct(name)
                .field("w", &self.w)
                .field("h", &self.h)
                .field("stride", &self.stride)
                .finish()
        }
    }

    impl<T, D: Deref<Target = [T]>> Inner<T, D> {
        /// # Panics
        /// if `stride < w` or if the slice would overflow `data`.
        #[rustfmt::skip]
        pub(super) fn new(w: usize, h: usize, stride: usize, data: D)
            -> Self
        {
            assert!(stride >= w);
            assert!(h == 0 || (h - 1) * stride + w <= data.len());
            Self { w, h, stride, data, _pd: PhantomData }
        }

        /// Returns the data of `self` as a linear slice.
        pub(super) fn data(&self) -> &[T] {
            &self.data
        }

        /// Borrows `self` as a `Slice2`.
        pub fn as_slice2(&self) -> Slice2<'_, T> {
            Slice2::new(self.w, self.h, self.stride, self.data())
        }

        /// Returns a reference to the element at (x, y),
        /// or `None` if the position is out of bounds.
        pub fn get_ref(&self, x: usize, y: usize) -> Option<&T> {
            self.to_index_checked(x, y).map(|i| &self.data[i])
        }

        /// Returns the element at (x, y), or `T::default()`
        /// if the position is out of bounds.
        #[inline]
        pub fn get(&self, x: usize, y: usize) -> T
        where
            T: Copy + Default,
        {
            self.get_ref(x, y).copied().unwrap_or_default()
        }

        /// Returns an iterator over the rows of `self` as `&[T]` slices.
        /// The length of each slice equals [`self.width()`](Self::width).
        pub fn rows(&self) -> impl Iterator<Item = &[T]> {
            let w = self.w;
            self.data()
                .chunks(self.stride.max(1))
                .take(self.h)
                .map(move |row| &row[..w])
        }

        /// Returns an iterator over all the elements of `self` in row-major
        /// order: first the elements on row 0 from left to right, followed
        /// by the elements on row 1, and so on.
        pub fn iter(&self) -> impl Iterator<Item = &T> {
            self.rows().flatten()
        }
    }

    impl<T, D: DerefMut<Target = [T]>> Inner<T, D> {
        /// Borrows `self` as a `MutSlice2`.
        pub fn as_mut_slice2(&mut self) -> MutSlice2<'_, T> {
            let (w, h, stride) = (self.w, self.h, self.stride);
            MutSlice2::new(w, h, stride, self.data_mut())
        }
        /// Returns the data of `self` as a single mutable slice.
        pub(super) fn data_mut(&mut self) -> &mut [T] {
            &mut self.data
        }

        /// Returns a mutable reference to the element at (x, y),
        /// or `None` if the position is out of bounds.
        pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
            self.to_index_checked(x, y).map(|i| &mut self.data[i])
        }

        /// Sets the element at (x, y) to `val`.
        /// Does nothing if the position is out of bounds.
        #[inline]
        pub fn set(&mut self, x: usize, y: usize, val: T) {
            if let Some(t) = self.get_mut(x, y) {
                *t = val;
            }
        }

        /// Returns an iterator over the rows of this buffer as `&mut [T]`.
        /// The length of each slice equals [`self.width()`](Self::width).
        pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [T]> {
            let (w, h, stride) = (self.w, self.h, self.stride.max(1));
            self.data
                .chunks_mut(stride)
                .take(h)
                .map(move |row| &mut row[..w])
        }

        /// Returns an iterator over all the elements of `self` in row-major
        /// order: first the elements on row 0 from left to right, followed
        /// by the elements on row 1, and so on.
        pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
            self.rows_mut().flatten()
        }

        /// Fills the buffer with clones of `val`.
        pub fn fill(&mut self, val: T)
        where
            T: Clone,
        {
            if self.is_contiguous() {
                let len = self.w * self.h;
                self.data_mut()[..len].fill(val);
            } else {
                self.rows_mut().for_each(|row| row.fill(val.clone()));
            }
        }

        /// Fills the buffer by invoking `f(x, y)` for every element, where
        /// `x` and `y` are the column and row of the element, respectively.
        pub fn fill_with<F>(&mut self, mut fill_fn: F)
        where
            F: FnMut(usize, usize) -> T,
        {
            for (y, row) in self.rows_mut().enumerate() {
                for (x, t) in row.iter_mut().enumerate() {
                    *t = fill_fn(x, y);
                }
            }
        }
    }

    impl<T, D: Deref<Target = [T]>> Index<usize> for Inner<T, D> {
        type Output = [T];

        /// Returns a reference to the row of `self` at index `i`.
        /// The returned slice has length `self.width()`.
        #[inline]
        fn index(&self, i: usize) -> &[T] {
            assert!(i < self.h, "row index {i} out of bounds 0..{}", self.h);
            &self.data()[i * self.stride..][..self.w]
        }
    }

    impl<T, D: DerefMut<Target = [T]>> IndexMut<usize> for Inner<T, D> {
        /// Returns a mutable reference to the row of `self` at index `i`.
        /// The returned slice has length `self.width()`.
        #[inline]
        fn index_mut(&mut self, i: usize) -> &mut [T] {
            assert!(i < self.h, "row index {i} out of bounds 0..{}", self.h);
            let idx = i * self.stride;
            let w = self.w;
            &mut self.data_mut()[idx..idx + w]
        }
    }

    impl<T, D: Deref<Target = [T]>> Index<[usize; 2]> for Inner<T, D> {
        type Output = T;

        /// Returns a reference to the element of `self` at position [x, y].
        /// # Panics
        /// If the position is out of bounds of `self`.
        #[inline]
        fn index(&self, [x, y]: [usize; 2]) -> &T {
            let idx = self
                .to_index_checked(x, y)
                .unwrap_or_else(|| self.position_out_of_bounds(x, y));
            &self.data[idx]
        }
    }

    impl<T, D: DerefMut<Target = [T]>> IndexMut<[usize; 2]> for Inner<T, D> {
        /// Returns a mutable reference to the element of `self`
        /// at position [x, y].
        /// # Panics
        /// If the position is out of bounds of `self`.
        #[inline]
        fn index_mut(&mut self, [x, y]: [usize; 2]) -> &mut T {
            let idx = self
                .to_index_checked(x, y)
                .unwrap_or_else(|| self.position_out_of_bounds(x, y));
            &mut self.data[idx]
        }
    }
}

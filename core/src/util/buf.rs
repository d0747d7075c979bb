use alloc::{vec, vec::Vec};
use core::fmt::{self, Debug, Formatter};
use core::ops::{Index, IndexMut};

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
/// # use softpipe_core::util::buf::Buf2;
/// // Elements initialized with `Default::default()`
/// let mut buf: Buf2<u32> = Buf2::new((4, 4));
/// // Indexing with [x, y] yields the element at column x, row y:
/// buf[[2, 1]] = 123;
/// // Indexing with a usize yields the row as a slice:
/// assert_eq!(&buf[1usize], &[0, 0, 123, 0]);
/// ```
#[derive(Clone, Eq, PartialEq)]
pub struct Buf2<T> {
    w: usize,
    h: usize,
    data: Vec<T>,
}

impl<T> Buf2<T> {
    /// Returns a buffer of dimensions `w` × `h` with every element
    /// initialized by calling `T::default()`.
    pub fn new((w, h): (usize, usize)) -> Self
    where
        T: Clone + Default,
    {
        Self { w, h, data: vec![T::default(); w * h] }
    }

    /// Returns a buffer of dimensions `w` × `h` with every element
    /// initialized by calling `init_fn(x, y)`, where `x` is the column
    /// and `y` the row of the element.
    pub fn new_with<F>((w, h): (usize, usize), mut init_fn: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let data = (0..h)
            .flat_map(|y| (0..w).map(move |x| (x, y)))
            .map(|(x, y)| init_fn(x, y))
            .collect();
        Self { w, h, data }
    }

    /// Returns a buffer of dimensions `w` × `h` with elements taken from
    /// `init` in row-major order.
    ///
    /// # Panics
    /// If `init` yields fewer than `w * h` elements.
    pub fn new_from<I>((w, h): (usize, usize), init: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let data: Vec<_> = init.into_iter().take(w * h).collect();
        assert_eq!(data.len(), w * h);
        Self { w, h, data }
    }

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

    /// Returns the backing data of `self` as a linear slice.
    pub fn data(&self) -> &[T] {
        &self.data
    }
    /// Returns the backing data of `self` as a mutable linear slice.
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Returns a reference to the element at (x, y), or `None` if the
    /// position is out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        (x < self.w && y < self.h).then(|| &self.data[y * self.w + x])
    }

    /// Returns an iterator over the rows of `self` as `&[T]` slices.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.data.chunks_exact(self.w.max(1))
    }

    /// Fills the buffer with clones of `val`.
    pub fn fill(&mut self, val: T)
    where
        T: Clone,
    {
        self.data.fill(val);
    }
}

impl<T> Index<[usize; 2]> for Buf2<T> {
    type Output = T;

    /// Returns a reference to the element at column `x`, row `y`.
    /// # Panics
    /// If the position is out of bounds of `self`.
    #[inline]
    fn index(&self, [x, y]: [usize; 2]) -> &T {
        assert!(x < self.w && y < self.h);
        &self.data[y * self.w + x]
    }
}

impl<T> IndexMut<[usize; 2]> for Buf2<T> {
    #[inline]
    fn index_mut(&mut self, [x, y]: [usize; 2]) -> &mut T {
        assert!(x < self.w && y < self.h);
        &mut self.data[y * self.w + x]
    }
}

impl<T> Index<usize> for Buf2<T> {
    type Output = [T];

    /// Returns the row of `self` at index `i` as a slice of length
    /// [`self.width()`](Self::width).
    #[inline]
    fn index(&self, i: usize) -> &[T] {
        &self.data[i * self.w..][..self.w]
    }
}

impl<T> IndexMut<usize> for Buf2<T> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut [T] {
        &mut self.data[i * self.w..][..self.w]
    }
}

impl<T> Debug for Buf2<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buf2")
            .field("w", &self.w)
            .field("h", &self.h)
            .finish()
    }
}

//! The owning array type.

use std::mem;
use std::ops::{Deref, DerefMut, Index, IndexMut};

use strata_core::{alloc_storage, alloc_storage_with, release_storage};

use crate::error::ArrayError;
use crate::view::{ArrayView, ArrayViewMut};

/// A `D`-dimensional array over one flat allocation.
///
/// Extents are fixed per instance until [`Array::reset`]; the stride
/// vector is always their row-major cumulative product, so the flat
/// offset of `[i_0, ..., i_{D-1}]` is `Σ i_d * stride[d]` with
/// `stride[D-1] == 1`.
///
/// A freshly constructed array owns no storage (all extents zero);
/// storage appears on [`Array::with_extents`], [`Array::filled`] or a
/// `reset`. Rank 0 degenerates to a scalar holding exactly one element
/// once allocated, and rank 1 dereferences to a plain slice.
///
/// # Example
///
/// ```
/// use strata_array::Array;
///
/// let mut heat: Array<f64, 2> = Array::filled([3, 4], 0.0)?;
/// heat[[2, 1]] = 1.5;
/// assert_eq!(heat.at(2).try_get(1), Ok(&1.5));
/// assert_eq!(heat.as_slice()[2 * 4 + 1], 1.5);
/// # Ok::<(), strata_array::ArrayError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Array<T, const D: usize> {
    extents: [usize; D],
    strides: [usize; D],
    data: Vec<T>,
}

impl<T, const D: usize> Array<T, D> {
    /// Number of dimensions.
    pub const RANK: usize = D;

    /// Row-major strides for a set of extents: the last axis is
    /// contiguous and each earlier stride is the product of the extents
    /// behind it.
    fn strides_for(extents: &[usize; D]) -> [usize; D] {
        let mut strides = [1usize; D];
        for axis in (1..D).rev() {
            strides[axis - 1] = strides[axis] * extents[axis];
        }
        strides
    }

    /// Number of elements a set of extents spans. The empty product is 1,
    /// which is exactly the rank-0 scalar case.
    fn volume(extents: &[usize; D]) -> usize {
        extents.iter().product()
    }

    /// An array with every extent zero and no storage.
    pub fn new() -> Self {
        let extents = [0; D];
        Self {
            strides: Self::strides_for(&extents),
            extents,
            data: Vec::new(),
        }
    }

    /// An array of the given extents with default-initialised elements.
    pub fn with_extents(extents: [usize; D]) -> Result<Self, ArrayError>
    where
        T: Default + Clone,
    {
        let mut array = Self::new();
        array.reset(extents)?;
        Ok(array)
    }

    /// An array of the given extents with every element set to `value`.
    pub fn filled(extents: [usize; D], value: T) -> Result<Self, ArrayError>
    where
        T: Clone,
    {
        let mut array = Self::new();
        array.reset_with(extents, value)?;
        Ok(array)
    }

    /// Whether the current allocation already matches `extents`.
    fn is_current(&self, extents: &[usize; D]) -> bool {
        self.extents == *extents && self.data.len() == Self::volume(extents)
    }

    fn replace_storage(&mut self, extents: [usize; D], fresh: Vec<T>) {
        let old = mem::replace(&mut self.data, fresh);
        if old.capacity() != 0 {
            release_storage(old);
        }
        self.strides = Self::strides_for(&extents);
        self.extents = extents;
    }

    /// Reshape to `extents`, reallocating only if they differ from the
    /// current ones.
    ///
    /// Equal extents are a no-op that preserves the existing allocation
    /// and its contents. Otherwise the old storage is released, a fresh
    /// default-initialised allocation takes its place, and the strides
    /// are recomputed. On allocation failure the array is left exactly as
    /// it was.
    ///
    /// Any views into the array end their borrow before `reset` can be
    /// called, so there is no way to observe the old storage afterwards.
    pub fn reset(&mut self, extents: [usize; D]) -> Result<(), ArrayError>
    where
        T: Default + Clone,
    {
        if self.is_current(&extents) {
            return Ok(());
        }
        let fresh = alloc_storage(Self::volume(&extents))?;
        self.replace_storage(extents, fresh);
        Ok(())
    }

    /// [`Array::reset`], then set every element to `value` — including on
    /// the no-op path, so the fill is unconditional.
    pub fn reset_with(&mut self, extents: [usize; D], value: T) -> Result<(), ArrayError>
    where
        T: Clone,
    {
        if self.is_current(&extents) {
            self.data.fill(value);
            return Ok(());
        }
        let fresh = alloc_storage_with(Self::volume(&extents), value)?;
        self.replace_storage(extents, fresh);
        Ok(())
    }

    /// Extent along one axis.
    ///
    /// # Panics
    ///
    /// Panics if `axis >= D`.
    pub fn extent(&self, axis: usize) -> usize {
        self.extents[axis]
    }

    /// All extents, outermost first.
    pub fn extents(&self) -> [usize; D] {
        self.extents
    }

    /// The row-major stride vector matching [`Array::extents`].
    pub fn strides(&self) -> [usize; D] {
        self.strides
    }

    /// Number of elements in the flat allocation.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The flat storage, row-major.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The flat storage, row-major, mutable.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Flat offset with every axis checked; the error names the first
    /// offending axis.
    fn axis_checked_offset(&self, index: [usize; D]) -> Result<usize, ArrayError> {
        let mut offset = 0;
        for axis in 0..D {
            if index[axis] >= self.extents[axis] {
                return Err(ArrayError::IndexOutOfBounds {
                    axis,
                    index: index[axis],
                    extent: self.extents[axis],
                });
            }
            offset += index[axis] * self.strides[axis];
        }
        Ok(offset)
    }

    /// Flat offset with no axis comparisons.
    #[cfg(feature = "unchecked-index")]
    fn offset_for(&self, index: [usize; D]) -> usize {
        let mut offset = 0;
        for axis in 0..D {
            offset += index[axis] * self.strides[axis];
        }
        offset
    }

    /// Flat offset for the panicking `Index` path.
    #[cfg(not(feature = "unchecked-index"))]
    fn offset_for(&self, index: [usize; D]) -> usize {
        match self.axis_checked_offset(index) {
            Ok(offset) => offset,
            Err(err) => panic!("{err}"),
        }
    }

    /// The element at a whole coordinate, or `None` out of bounds.
    pub fn get(&self, index: [usize; D]) -> Option<&T> {
        self.data.get(self.axis_checked_offset(index).ok()?)
    }

    /// Mutable form of [`Array::get`].
    pub fn get_mut(&mut self, index: [usize; D]) -> Option<&mut T> {
        let offset = self.axis_checked_offset(index).ok()?;
        self.data.get_mut(offset)
    }

    /// The element at a whole coordinate, with the offending axis named
    /// on failure.
    pub fn try_get(&self, index: [usize; D]) -> Result<&T, ArrayError> {
        let offset = self.axis_checked_offset(index)?;
        // Only a rank-0 array before its first reset can pass the axis
        // checks without owning the element.
        self.data.get(offset).ok_or(ArrayError::IndexOutOfBounds {
            axis: 0,
            index: offset,
            extent: self.data.len(),
        })
    }

    /// Mutable form of [`Array::try_get`].
    pub fn try_get_mut(&mut self, index: [usize; D]) -> Result<&mut T, ArrayError> {
        let offset = self.axis_checked_offset(index)?;
        let extent = self.data.len();
        self.data
            .get_mut(offset)
            .ok_or(ArrayError::IndexOutOfBounds {
                axis: 0,
                index: offset,
                extent,
            })
    }

    /// A full-rank view of the whole array.
    pub fn view(&self) -> ArrayView<'_, T> {
        ArrayView::new(&self.data, &self.extents, &self.strides)
    }

    /// A full-rank mutable view of the whole array.
    pub fn view_mut(&mut self) -> ArrayViewMut<'_, T> {
        ArrayViewMut::new(&mut self.data, &self.extents, &self.strides)
    }

    /// Narrow the outermost axis, yielding a rank `D - 1` view — the
    /// first step of `a.at(i).at(j)...` chains.
    ///
    /// # Panics
    ///
    /// Panics if `D < 2`, or on an out-of-range index unless the
    /// `unchecked-index` feature is enabled.
    pub fn at(&self, index: usize) -> ArrayView<'_, T> {
        self.view().at(index)
    }

    /// Checked form of [`Array::at`].
    ///
    /// # Panics
    ///
    /// Panics if `D < 2`.
    pub fn try_at(&self, index: usize) -> Result<ArrayView<'_, T>, ArrayError> {
        self.view().try_at(index)
    }

    /// Mutable form of [`Array::at`].
    ///
    /// # Panics
    ///
    /// Panics if `D < 2`, or on an out-of-range index unless the
    /// `unchecked-index` feature is enabled.
    pub fn at_mut(&mut self, index: usize) -> ArrayViewMut<'_, T> {
        self.view_mut().at(index)
    }

    /// Checked form of [`Array::at_mut`].
    ///
    /// # Panics
    ///
    /// Panics if `D < 2`.
    pub fn try_at_mut(&mut self, index: usize) -> Result<ArrayViewMut<'_, T>, ArrayError> {
        self.view_mut().try_at(index)
    }
}

impl<T, const D: usize> Default for Array<T, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const D: usize> Index<[usize; D]> for Array<T, D> {
    type Output = T;

    fn index(&self, index: [usize; D]) -> &T {
        &self.data[self.offset_for(index)]
    }
}

impl<T, const D: usize> IndexMut<[usize; D]> for Array<T, D> {
    fn index_mut(&mut self, index: [usize; D]) -> &mut T {
        let offset = self.offset_for(index);
        &mut self.data[offset]
    }
}

/// Rank 1 decays to a plain contiguous slice.
impl<T> Deref for Array<T, 1> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.data
    }
}

impl<T> DerefMut for Array<T, 1> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T, const D: usize> Drop for Array<T, D> {
    fn drop(&mut self) {
        let data = mem::take(&mut self.data);
        if data.capacity() != 0 {
            release_storage(data);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strides_are_the_row_major_cumulative_product() {
        let a: Array<u8, 3> = Array::with_extents([2, 3, 4]).unwrap();
        assert_eq!(a.strides(), [12, 4, 1]);
        assert_eq!(a.len(), 24);
    }

    #[test]
    fn two_d_indexing_matches_the_flat_layout() {
        let rows = 3;
        let cols = 5;
        let mut a: Array<usize, 2> = Array::with_extents([rows, cols]).unwrap();
        for r in 0..rows {
            for c in 0..cols {
                a[[r, c]] = r * 1000 + c;
            }
        }
        for r in 0..rows {
            for c in 0..cols {
                assert_eq!(a.as_slice()[r * cols + c], r * 1000 + c);
            }
        }
    }

    #[test]
    fn filled_sets_every_element() {
        let a: Array<f32, 3> = Array::filled([2, 3, 4], 7.25).unwrap();
        assert_eq!(a.len(), 24);
        assert!(a.as_slice().iter().all(|&v| v == 7.25));
    }

    #[test]
    fn reset_with_equal_extents_preserves_contents() {
        let mut a: Array<u32, 2> = Array::with_extents([4, 4]).unwrap();
        a[[2, 2]] = 0xC0FFEE;
        a.reset([4, 4]).unwrap();
        assert_eq!(a[[2, 2]], 0xC0FFEE, "no reallocation took place");
    }

    #[test]
    fn reset_with_new_extents_reallocates_and_defaults() {
        let mut a: Array<u32, 2> = Array::with_extents([4, 4]).unwrap();
        a[[0, 0]] = 9;
        a.reset([2, 8]).unwrap();
        assert_eq!(a.extents(), [2, 8]);
        assert_eq!(a.strides(), [8, 1]);
        assert_eq!(a[[0, 0]], 0, "fresh storage is default-initialised");
    }

    #[test]
    fn reset_with_fills_even_when_extents_match() {
        let mut a: Array<i8, 1> = Array::filled([4], 1).unwrap();
        a.reset_with([4], 3).unwrap();
        assert_eq!(a.as_slice(), &[3, 3, 3, 3]);
    }

    #[test]
    fn get_reports_the_offending_axis() {
        let a: Array<u8, 3> = Array::with_extents([2, 3, 4]).unwrap();
        assert_eq!(
            a.try_get([1, 3, 0]),
            Err(ArrayError::IndexOutOfBounds {
                axis: 1,
                index: 3,
                extent: 3,
            })
        );
        assert_eq!(a.get([1, 3, 0]), None);
        assert!(a.get([1, 2, 3]).is_some());
    }

    #[test]
    fn out_of_bounds_is_reported_for_every_rank() {
        // Rank 1 through 4, indexing one past the extent on each axis.
        let a1: Array<u8, 1> = Array::with_extents([3]).unwrap();
        assert!(matches!(
            a1.try_get([3]),
            Err(ArrayError::IndexOutOfBounds { axis: 0, .. })
        ));

        let a2: Array<u8, 2> = Array::with_extents([2, 3]).unwrap();
        assert!(matches!(
            a2.try_get([2, 0]),
            Err(ArrayError::IndexOutOfBounds { axis: 0, .. })
        ));
        assert!(matches!(
            a2.try_get([0, 3]),
            Err(ArrayError::IndexOutOfBounds { axis: 1, .. })
        ));

        let a3: Array<u8, 3> = Array::with_extents([2, 2, 2]).unwrap();
        for axis in 0..3 {
            let mut index = [0, 0, 0];
            index[axis] = 2;
            assert_eq!(
                a3.try_get(index),
                Err(ArrayError::IndexOutOfBounds {
                    axis,
                    index: 2,
                    extent: 2,
                })
            );
        }

        let a4: Array<u8, 4> = Array::with_extents([2, 2, 2, 2]).unwrap();
        for axis in 0..4 {
            let mut index = [1, 1, 1, 1];
            index[axis] = 2;
            assert!(matches!(
                a4.try_get(index),
                Err(ArrayError::IndexOutOfBounds { axis: a, .. }) if a == axis
            ));
        }
    }

    #[cfg(not(feature = "unchecked-index"))]
    #[test]
    #[should_panic(expected = "out of bounds for axis 0 with extent 2")]
    fn index_panics_with_the_axis_report() {
        let a: Array<u8, 2> = Array::with_extents([2, 3]).unwrap();
        let _ = a[[2, 0]];
    }

    #[test]
    fn rank_zero_holds_one_element_after_reset() {
        let mut scalar: Array<f64, 0> = Array::new();
        assert!(scalar.try_get([]).is_err(), "unallocated until reset");
        scalar.reset_with([], 2.5).unwrap();
        assert_eq!(scalar.len(), 1);
        assert_eq!(scalar[[]], 2.5);
        scalar[[]] = 3.5;
        assert_eq!(scalar.try_get([]), Ok(&3.5));
    }

    #[test]
    fn rank_one_decays_to_a_slice() {
        let mut a: Array<u16, 1> = Array::filled([5], 2).unwrap();
        // Deref gives the whole slice API.
        assert_eq!(a.iter().sum::<u16>(), 10);
        a.sort_unstable();
        let flat: &[u16] = &a;
        assert_eq!(flat.len(), 5);
    }

    #[test]
    fn zero_extent_axes_yield_an_empty_array() {
        let a: Array<u8, 2> = Array::with_extents([0, 4]).unwrap();
        assert!(a.is_empty());
        assert_eq!(a.get([0, 0]), None);
    }

    #[test]
    fn clone_is_deep() {
        let mut a: Array<u8, 2> = Array::filled([2, 2], 1).unwrap();
        let b = a.clone();
        a[[0, 0]] = 9;
        assert_eq!(b[[0, 0]], 1);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn nested_and_flat_offsets_agree(
                rows in 1usize..8,
                cols in 1usize..8,
                r in 0usize..8,
                c in 0usize..8,
            ) {
                prop_assume!(r < rows && c < cols);
                let mut a: Array<usize, 2> = Array::with_extents([rows, cols]).unwrap();
                a[[r, c]] = 42;
                prop_assert_eq!(a.as_slice()[r * cols + c], 42);
                prop_assert_eq!(a.at(r).try_get(c), Ok(&42));
            }

            #[test]
            fn volume_is_the_extent_product(
                extents in proptest::array::uniform3(1usize..6),
            ) {
                let a: Array<u8, 3> = Array::with_extents(extents).unwrap();
                prop_assert_eq!(a.len(), extents.iter().product::<usize>());
                // The outermost stride spans everything behind axis 0.
                prop_assert_eq!(a.strides()[0] * a.extents()[0], a.len());
            }
        }
    }
}

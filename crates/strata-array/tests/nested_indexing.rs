//! End-to-end checks of nested indexing against the flat layout.

use strata_array::{Array, ArrayError};

#[test]
fn three_d_fill_reaches_every_element() {
    let a: Array<char, 3> = Array::filled([2, 3, 4], 'x').unwrap();
    assert_eq!(a.len(), 24);
    for i in 0..2 {
        for j in 0..3 {
            for k in 0..4 {
                assert_eq!(a[[i, j, k]], 'x');
            }
        }
    }
}

#[test]
fn nested_and_flat_access_share_storage() {
    let (rows, cols) = (4, 6);
    let mut a: Array<usize, 2> = Array::with_extents([rows, cols]).unwrap();

    // Write through nested views, read through the flat slice.
    for r in 0..rows {
        let mut row = a.at_mut(r);
        for c in 0..cols {
            row[c] = r * 100 + c;
        }
    }
    for r in 0..rows {
        for c in 0..cols {
            assert_eq!(a.as_slice()[r * cols + c], r * 100 + c);
        }
    }

    // And the other way around.
    a.as_mut_slice()[2 * cols + 3] = 999;
    assert_eq!(a[[2, 3]], 999);
    assert_eq!(a.at(2).try_get(3), Ok(&999));
}

#[test]
fn reset_with_identical_extents_keeps_the_sentinel() {
    let mut a: Array<u64, 3> = Array::with_extents([3, 3, 3]).unwrap();
    a[[1, 1, 1]] = 0xDEAD_BEEF;
    a.reset([3, 3, 3]).unwrap();
    assert_eq!(a[[1, 1, 1]], 0xDEAD_BEEF);

    // A genuine reshape really does drop the old contents.
    a.reset([3, 3, 2]).unwrap();
    assert_eq!(a[[1, 1, 1]], 0);
}

#[test]
fn every_rank_rejects_out_of_range_indices_on_every_axis() {
    fn expect_oob<const D: usize>(a: &Array<u8, D>, index: [usize; D], axis: usize) {
        match a.try_get(index) {
            Err(ArrayError::IndexOutOfBounds { axis: reported, .. }) => {
                assert_eq!(reported, axis);
            }
            other => panic!("expected out-of-bounds on axis {axis}, got {other:?}"),
        }
    }

    let a1: Array<u8, 1> = Array::with_extents([2]).unwrap();
    expect_oob(&a1, [2], 0);

    let a2: Array<u8, 2> = Array::with_extents([2, 3]).unwrap();
    expect_oob(&a2, [2, 0], 0);
    expect_oob(&a2, [0, 3], 1);

    let a3: Array<u8, 3> = Array::with_extents([2, 3, 4]).unwrap();
    expect_oob(&a3, [2, 0, 0], 0);
    expect_oob(&a3, [0, 3, 0], 1);
    expect_oob(&a3, [0, 0, 4], 2);

    let a4: Array<u8, 4> = Array::with_extents([2, 2, 2, 2]).unwrap();
    for axis in 0..4 {
        let mut index = [0; 4];
        index[axis] = 2;
        expect_oob(&a4, index, axis);
    }
}

#[test]
fn deep_narrowing_matches_whole_coordinates() {
    let mut a: Array<u32, 4> = Array::with_extents([2, 3, 4, 5]).unwrap();
    let mut counter = 0;
    for i in 0..2 {
        for j in 0..3 {
            for k in 0..4 {
                for l in 0..5 {
                    a[[i, j, k, l]] = counter;
                    counter += 1;
                }
            }
        }
    }

    let view = a.at(1).at(2).at(3);
    assert_eq!(view.rank(), 1);
    for l in 0..5 {
        assert_eq!(view[l], a[[1, 2, 3, l]]);
    }
    // Row-major: the last axis is contiguous in the flat slice.
    let base = 1 * (3 * 4 * 5) + 2 * (4 * 5) + 3 * 5;
    assert_eq!(view.as_slice(), &a.as_slice()[base..base + 5]);
}

// Shape operation tests — reshape, squeeze, transpose, the writable shape
// property, resize in both forms, item, ordering, take/repeat, equality,
// and the nested round trip.

use marten::prelude::*;

fn arange(n: usize, shape: impl Into<Shape>) -> Array {
    Array::from_vec((0..n as i64).collect::<Vec<i64>>(), shape).expect("bad test shape")
}

// Reshape

#[test]
fn test_reshape_preserves_elem_count() {
    let a = arange(12, vec![3, 4]);
    let r = a.reshape(&[2, 6]).unwrap();
    assert_eq!(r.elem_count(), 12);
    assert_eq!(r.dims(), &[2, 6]);
    assert!(matches!(
        a.reshape(&[5, 3]),
        Err(Error::ReshapeElementMismatch { .. })
    ));
}

#[test]
fn test_reshape_inference() {
    let a = arange(12, 12);
    assert_eq!(a.reshape(&[3, -1]).unwrap().dims(), &[3, 4]);
    assert_eq!(a.reshape(&[-1, 2, 2]).unwrap().dims(), &[3, 2, 2]);
    assert!(a.reshape(&[-1, -1]).is_err());
    assert!(a.reshape(&[5, -1]).is_err());
}

#[test]
fn test_reshape_view_vs_copy() {
    let a = arange(12, vec![3, 4]);
    assert!(a.reshape(&[2, 6]).unwrap().shares_storage(&a));
    // The transposed layout cannot be regrouped without a copy.
    let t = a.transpose();
    let r = t.reshape(&[12]).unwrap();
    assert!(!r.shares_storage(&a));
    assert_eq!(r.to_vec::<i64>().unwrap()[..4], [0, 4, 8, 1]);
}

// Squeeze / transpose

#[test]
fn test_squeeze_identity_when_no_unit_axes() {
    let a = arange(6, vec![2, 3]);
    let s = a.squeeze();
    assert!(s.shares_storage(&a));
    assert_eq!(s.dims(), &[2, 3]);
}

#[test]
fn test_squeeze_removes_unit_axes() {
    let a = arange(6, vec![1, 2, 1, 3]);
    let s = a.squeeze();
    assert_eq!(s.dims(), &[2, 3]);
    assert_eq!(s.elem_count(), a.elem_count());
    assert!(s.shares_storage(&a));
}

#[test]
fn test_transpose_and_permute() {
    let a = arange(24, vec![2, 3, 4]);
    assert_eq!(a.transpose().dims(), &[4, 3, 2]);
    assert_eq!(a.permute(&[2, 0, 1]).unwrap().dims(), &[4, 2, 3]);
    assert_eq!(a.swap_axes(0, 2).unwrap().dims(), &[4, 3, 2]);
    assert!(a.permute(&[0, 1]).is_err());
    // Transposing twice restores the original order.
    let tt = a.transpose().transpose();
    assert_eq!(tt.to_vec::<i64>().unwrap(), a.to_vec::<i64>().unwrap());
}

// The writable shape property

#[test]
fn test_set_shape_on_strided_view() {
    let a = arange(28, vec![4, 7]);
    let mut v = a
        .get(&[
            IndexKey::Slice(Slice::from_start(1)),
            IndexKey::Slice(Slice::step_by(2)),
        ])
        .unwrap();
    assert_eq!(v.dims(), &[3, 4]);

    // Flattening the sliced view would need a copy: state error.
    assert!(matches!(
        v.set_shape(12),
        Err(Error::IncompatibleShape { .. })
    ));

    // Splitting the column axis works in place.
    v.set_shape((3, 2, 2)).unwrap();
    assert!(v.shares_storage(&a));
    assert_eq!(
        v.to_vec::<i64>().unwrap(),
        vec![7, 9, 11, 13, 14, 16, 18, 20, 21, 23, 25, 27]
    );

    // Broadcast-assign every trailing pair, visible through the base.
    let pair = Array::from_vec(vec![-1i64, -2], 2).unwrap();
    v.set(&[IndexKey::Ellipsis], &pair).unwrap();
    let data = a.to_vec::<i64>().unwrap();
    assert_eq!(data[7], -1);
    assert_eq!(data[9], -2);
    assert_eq!(data[27], -2);
    assert_eq!(data[8], 8); // untouched column
}

#[test]
fn test_set_shape_count_mismatch() {
    let mut a = arange(6, vec![2, 3]);
    assert!(matches!(
        a.set_shape((4, 2)),
        Err(Error::ReshapeElementMismatch { .. })
    ));
    a.set_shape((3, 2)).unwrap();
    assert_eq!(a.dims(), &[3, 2]);
}

// Resize

#[test]
fn test_resize_in_place_zero_fills() {
    let mut a = arange(10, 10);
    a.resize(12, true).unwrap();
    assert_eq!(
        a.to_vec::<i64>().unwrap(),
        vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 0]
    );
    a.resize(4, true).unwrap();
    assert_eq!(a.to_vec::<i64>().unwrap(), vec![0, 1, 2, 3]);
}

#[test]
fn test_resize_refuses_aliased_storage() {
    let mut a = arange(6, 6);
    let view = a.view();
    assert!(matches!(
        a.resize(8, true),
        Err(Error::StorageAliased { aliases: 2 })
    ));
    // The override replaces the shared buffer; the view goes stale.
    a.resize(8, false).unwrap();
    assert_eq!(a.elem_count(), 8);
    drop(view);
}

#[test]
fn test_resized_wraps_cyclically() {
    let a = arange(6, 6);
    let r = a.resized(9).unwrap();
    assert_eq!(r.to_vec::<i64>().unwrap(), vec![0, 1, 2, 3, 4, 5, 0, 1, 2]);
    assert!(!r.shares_storage(&a));
    let r = arange(10, 10).resized(12).unwrap();
    assert_eq!(
        r.to_vec::<i64>().unwrap(),
        vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 1]
    );
    let shrunk = a.resized((2, 2)).unwrap();
    assert_eq!(shrunk.to_vec::<i64>().unwrap(), vec![0, 1, 2, 3]);
}

// item

#[test]
fn test_item_flat_and_per_axis() {
    let a = arange(10, vec![2, 5]);
    assert_eq!(a.item(&[4]).unwrap(), Scalar::I64(4));
    assert_eq!(a.item(&[0, 4]).unwrap(), Scalar::I64(4));
    assert_eq!(a.item(&[-1]).unwrap(), Scalar::I64(9));
    assert!(matches!(
        a.item(&[11]),
        Err(Error::FlatIndexOutOfRange { .. })
    ));
    assert!(matches!(
        a.item(&[2, 1]),
        Err(Error::IndexOutOfRange { .. })
    ));

    let v = arange(10, 10);
    assert!(matches!(
        v.item(&[1, 1]),
        Err(Error::IndexCountMismatch { got: 2, rank: 1 })
    ));
}

#[test]
fn test_item_respects_view_layout() {
    let a = arange(6, vec![2, 3]);
    let t = a.transpose();
    // Flat order of the transposed view walks columns first.
    assert_eq!(t.item(&[1]).unwrap(), Scalar::I64(3));
    assert_eq!(t.item(&[2, 1]).unwrap(), Scalar::I64(5));
}

// Ordering

#[test]
fn test_sort_flattened_through_view() {
    let a = Array::from_vec(vec![3i64, 1, 2], 3).unwrap();
    let reversed = a.get(&[IndexKey::Slice(Slice::step_by(-1))]).unwrap();
    reversed.sort(None).unwrap();
    // Ascending through the reversed view is descending in the base.
    assert_eq!(a.to_vec::<i64>().unwrap(), vec![3, 2, 1]);
}

#[test]
fn test_sort_along_axis() {
    let a = Array::from_vec(vec![3i64, 1, 2, 0, 5, 4], (2, 3)).unwrap();
    a.sort(Some(1)).unwrap();
    assert_eq!(a.to_vec::<i64>().unwrap(), vec![1, 2, 3, 0, 4, 5]);
    let b = Array::from_vec(vec![4i64, 1, 0, 3], (2, 2)).unwrap();
    b.sort(Some(0)).unwrap();
    assert_eq!(b.to_vec::<i64>().unwrap(), vec![0, 1, 4, 3]);
}

#[test]
fn test_argsort_stable() {
    let a = Array::from_vec(vec![2i64, 1, 2, 0], 4).unwrap();
    let order = a.argsort(None).unwrap();
    assert_eq!(order.dtype(), DType::I64);
    assert_eq!(order.to_vec::<i64>().unwrap(), vec![3, 1, 0, 2]);
    let m = Array::from_vec(vec![2i64, 1, 0, 3], (2, 2)).unwrap();
    let order = m.argsort(Some(1)).unwrap();
    assert_eq!(order.dims(), &[2, 2]);
    assert_eq!(order.to_vec::<i64>().unwrap(), vec![1, 0, 0, 1]);
}

#[test]
fn test_sort_complex_is_kind_error() {
    use num_complex::Complex64;
    let a = Array::from_vec(
        vec![Complex64::new(1.0, 0.0), Complex64::new(0.0, 1.0)],
        2,
    )
    .unwrap();
    assert!(matches!(a.sort(None), Err(Error::RealRequired { .. })));
    assert!(matches!(a.argsort(None), Err(Error::RealRequired { .. })));
}

// take / repeat

#[test]
fn test_take_flat_and_axis() {
    let a = arange(12, vec![3, 4]);
    let flat = a.take(&[0, 5, -1], None).unwrap();
    assert_eq!(flat.to_vec::<i64>().unwrap(), vec![0, 5, 11]);
    let rows = a.take(&[2, 0], Some(0)).unwrap();
    assert_eq!(rows.dims(), &[2, 4]);
    assert_eq!(rows.to_vec::<i64>().unwrap(), vec![8, 9, 10, 11, 0, 1, 2, 3]);
    let cols = a.take(&[1], Some(1)).unwrap();
    assert_eq!(cols.dims(), &[3, 1]);
    assert_eq!(cols.to_vec::<i64>().unwrap(), vec![1, 5, 9]);
    assert!(a.take(&[12], None).is_err());
}

#[test]
fn test_repeat() {
    let a = Array::from_vec(vec![1i64, 2], 2).unwrap();
    let r = a.repeat(3, None).unwrap();
    assert_eq!(r.to_vec::<i64>().unwrap(), vec![1, 1, 1, 2, 2, 2]);
    let m = arange(4, vec![2, 2]);
    let r = m.repeat(2, Some(1)).unwrap();
    assert_eq!(r.dims(), &[2, 4]);
    assert_eq!(r.to_vec::<i64>().unwrap(), vec![0, 0, 1, 1, 2, 2, 3, 3]);
    let r = m.repeat(2, Some(0)).unwrap();
    assert_eq!(r.dims(), &[4, 2]);
    assert_eq!(r.to_vec::<i64>().unwrap(), vec![0, 1, 0, 1, 2, 3, 2, 3]);
}

// Equality

#[test]
fn test_eq_elementwise_and_broadcast() {
    let a = arange(6, vec![2, 3]);
    let e = a.eq_scalar(4i64).unwrap();
    assert_eq!(e.dtype(), DType::Bool);
    assert_eq!(
        e.to_vec::<bool>().unwrap(),
        vec![false, false, false, false, true, false]
    );
    let col = Array::from_vec(vec![0i64, 3], (2, 1)).unwrap();
    let e = a.eq(&col).unwrap();
    assert_eq!(e.dims(), &[2, 3]);
    assert_eq!(
        e.to_vec::<bool>().unwrap(),
        vec![true, false, false, true, false, false]
    );
}

#[test]
fn test_eq_across_kinds_and_nan() {
    let i = Array::from_vec(vec![1i64, 2], 2).unwrap();
    let f = Array::from_vec(vec![1.0f64, 2.5], 2).unwrap();
    assert_eq!(i.eq(&f).unwrap().to_vec::<bool>().unwrap(), vec![true, false]);
    let nan = Array::from_vec(vec![f64::NAN], 1).unwrap();
    assert_eq!(nan.eq(&nan).unwrap().to_vec::<bool>().unwrap(), vec![false]);
}

// Nested round trip

#[test]
fn test_nested_round_trip() {
    let a = Array::from_vec(vec![1.5f64, 2.5, 3.5, 4.5, 5.5, 6.5], (3, 2)).unwrap();
    let n = a.to_nested().unwrap();
    let b = Array::from_nested(&n, None).unwrap();
    assert_eq!(b.dims(), a.dims());
    assert_eq!(b.to_vec::<f64>().unwrap(), a.to_vec::<f64>().unwrap());
}

#[test]
fn test_from_nested_inference() {
    let n = Nested::from(vec![vec![1i64, 2], vec![3, 4]]);
    let a = Array::from_nested(&n, None).unwrap();
    assert_eq!(a.dims(), &[2, 2]);
    assert_eq!(a.dtype(), DType::I64);
    let forced = Array::from_nested(&n, Some(DType::F64)).unwrap();
    assert_eq!(forced.dtype(), DType::F64);
}

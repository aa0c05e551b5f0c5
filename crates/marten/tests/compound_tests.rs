// Compound array tests — structured elements over a trailing field axis.
// Selection always moves whole elements; field values never split.

use marten::prelude::*;

// Helper: n elements of two fields, element i holding (i, 100 + i)

fn records(n: usize) -> CompoundArray {
    let data: Vec<i64> = (0..n as i64).flat_map(|i| [i, 100 + i]).collect();
    CompoundArray::from_vec(data, n, 2).unwrap()
}

fn grid(rows: usize, cols: usize) -> CompoundArray {
    let n = rows * cols;
    let data: Vec<i64> = (0..n as i64).flat_map(|i| [i, 100 + i]).collect();
    CompoundArray::from_vec(data, vec![rows, cols], 2).unwrap()
}

// Shape and element access

#[test]
fn test_element_shape_hides_field_axis() {
    let c = grid(3, 4);
    assert_eq!(c.shape().dims(), &[3, 4]);
    assert_eq!(c.rank(), 2);
    assert_eq!(c.fields(), 2);
    assert_eq!(c.elem_count(), 12);
    assert_eq!(c.base().dims(), &[3, 4, 2]);
    assert_eq!(c.dtype(), DType::I64);
}

#[test]
fn test_item_flat_and_per_axis() {
    let c = grid(2, 3);
    assert_eq!(c.item(&[4]).unwrap(), vec![Scalar::I64(4), Scalar::I64(104)]);
    assert_eq!(
        c.item(&[1, 1]).unwrap(),
        vec![Scalar::I64(4), Scalar::I64(104)]
    );
    assert_eq!(c.item(&[-1]).unwrap()[0], Scalar::I64(5));
    assert!(matches!(
        c.item(&[6]),
        Err(Error::FlatIndexOutOfRange { .. })
    ));
    assert!(matches!(
        c.item(&[2, 0]),
        Err(Error::IndexOutOfRange { .. })
    ));
}

// Basic selection: aliasing views over elements

#[test]
fn test_slice_view_writes_reach_base() {
    let c = records(5);
    let v = c.get(&[IndexKey::slice(1, 4)]).unwrap();
    assert!(v.shares_storage(&c));
    assert_eq!(v.shape().dims(), &[3]);
    v.set_fields(&[IndexKey::At(0)], &[Scalar::I64(-1), Scalar::I64(-2)])
        .unwrap();
    assert_eq!(c.item(&[1]).unwrap(), vec![Scalar::I64(-1), Scalar::I64(-2)]);
    assert_eq!(c.item(&[0]).unwrap(), vec![Scalar::I64(0), Scalar::I64(100)]);
}

#[test]
fn test_ellipsis_never_swallows_field_axis() {
    let c = grid(2, 3);
    let v = c.get(&[IndexKey::Ellipsis, IndexKey::At(1)]).unwrap();
    // Ellipsis expands over the element axes only; the field axis stays.
    assert_eq!(v.shape().dims(), &[2]);
    assert_eq!(v.fields(), 2);
    assert_eq!(v.item(&[0]).unwrap(), vec![Scalar::I64(1), Scalar::I64(101)]);
}

#[test]
fn test_copy_is_isolated() {
    let c = records(3);
    let d = c.copy().unwrap();
    assert!(!d.shares_storage(&c));
    d.set_fields(&[IndexKey::At(0)], &[Scalar::I64(9), Scalar::I64(9)])
        .unwrap();
    assert_eq!(c.item(&[0]).unwrap(), vec![Scalar::I64(0), Scalar::I64(100)]);
}

// Advanced selection: gathers move whole elements

#[test]
fn test_take_gathers_whole_elements() {
    let c = records(5);
    let g = c.get(&[IndexKey::Take(vec![2, -3])]).unwrap();
    assert!(!g.shares_storage(&c));
    assert_eq!(g.shape().dims(), &[2]);
    // Both indices resolve to element 2.
    assert_eq!(g.item(&[0]).unwrap(), vec![Scalar::I64(2), Scalar::I64(102)]);
    assert_eq!(g.item(&[1]).unwrap(), vec![Scalar::I64(2), Scalar::I64(102)]);
}

#[test]
fn test_take_scatter_writes_elements_back() {
    let c = records(5);
    let values = CompoundArray::from_vec(vec![-1i64, -2, -3, -4], 2, 2).unwrap();
    c.set(&[IndexKey::Take(vec![4, 0])], &values).unwrap();
    assert_eq!(c.item(&[4]).unwrap(), vec![Scalar::I64(-1), Scalar::I64(-2)]);
    assert_eq!(c.item(&[0]).unwrap(), vec![Scalar::I64(-3), Scalar::I64(-4)]);
    assert_eq!(c.item(&[1]).unwrap(), vec![Scalar::I64(1), Scalar::I64(101)]);
}

#[test]
fn test_mask_gathers_in_row_major_element_order() {
    let c = grid(3, 4);
    let mask = Array::from_vec(
        vec![
            false, false, true, false, //
            true, false, false, false, //
            false, true, false, true,
        ],
        (3, 4),
    )
    .unwrap();
    let g = c.get(&[IndexKey::Mask(mask)]).unwrap();
    assert_eq!(g.shape().dims(), &[4]);
    for (slot, flat) in [2i64, 4, 9, 11].iter().enumerate() {
        assert_eq!(
            g.item(&[slot as isize]).unwrap(),
            vec![Scalar::I64(*flat), Scalar::I64(100 + flat)]
        );
    }
}

#[test]
fn test_set_fields_broadcasts_over_mask() {
    let c = records(4);
    let mask = Array::from_vec(vec![true, false, true, false], 4).unwrap();
    c.set_fields(&[IndexKey::Mask(mask)], &[Scalar::I64(7), Scalar::I64(8)])
        .unwrap();
    assert_eq!(c.item(&[0]).unwrap(), vec![Scalar::I64(7), Scalar::I64(8)]);
    assert_eq!(c.item(&[2]).unwrap(), vec![Scalar::I64(7), Scalar::I64(8)]);
    assert_eq!(c.item(&[1]).unwrap(), vec![Scalar::I64(1), Scalar::I64(101)]);
}

// Field count validation

#[test]
fn test_field_count_mismatch() {
    let c = records(3);
    assert!(matches!(
        c.set_fields(&[], &[Scalar::I64(1)]),
        Err(Error::FieldCountMismatch { fields: 2, got: 1 })
    ));
    let wide = CompoundArray::from_vec(vec![0i64, 0, 0], 1, 3).unwrap();
    assert!(matches!(
        c.set(&[IndexKey::At(0)], &wide),
        Err(Error::FieldCountMismatch { fields: 2, got: 3 })
    ));
}

#[test]
fn test_set_broadcasts_single_element() {
    let c = records(4);
    let one = CompoundArray::from_vec(vec![-5i64, -6], 1, 2).unwrap();
    c.set(&[IndexKey::slice(1, 3)], &one).unwrap();
    assert_eq!(c.item(&[1]).unwrap(), vec![Scalar::I64(-5), Scalar::I64(-6)]);
    assert_eq!(c.item(&[2]).unwrap(), vec![Scalar::I64(-5), Scalar::I64(-6)]);
    assert_eq!(c.item(&[3]).unwrap(), vec![Scalar::I64(3), Scalar::I64(103)]);
}

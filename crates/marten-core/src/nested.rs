use num_complex::Complex64;

use crate::array::Array;
use crate::dtype::{DType, Element, Scalar};
use crate::error::{Error, Result};
use crate::layout::Layout;
use crate::shape::Shape;
use crate::storage::Storage;

// Nested — Conversion to and from nested sequence form
//
// A Nested value is the structural, language-neutral form of an array: a
// tree of lists whose leaves are scalar values. Conversion is lossless for
// shape and values (not storage layout): any array converts to a Nested
// tree and back to an array of identical shape and elements.
//
// Kind inference for construction promotes along the ladder
// Bool < I64 < F64 < C128; an explicit kind overrides inference. Ragged
// input (sibling branches of different shapes) is rejected.

/// Nested sequence form of an array: lists of lists down to scalar leaves.
#[derive(Debug, Clone, PartialEq)]
pub enum Nested {
    Leaf(Scalar),
    List(Vec<Nested>),
}

impl Nested {
    /// The shape this tree describes. Fails on ragged input.
    pub fn shape(&self) -> Result<Shape> {
        match self {
            Nested::Leaf(_) => Ok(Shape::from(())),
            Nested::List(items) => {
                let mut inner: Option<Shape> = None;
                for item in items {
                    let s = item.shape()?;
                    match &inner {
                        None => inner = Some(s),
                        Some(first) if *first == s => {}
                        Some(first) => {
                            return Err(Error::ShapeMismatch {
                                expected: first.clone(),
                                got: s,
                            })
                        }
                    }
                }
                let mut dims = vec![items.len()];
                if let Some(inner) = inner {
                    dims.extend_from_slice(inner.dims());
                }
                Ok(Shape::new(dims))
            }
        }
    }

    /// The inferred element kind: the widest leaf kind along the ladder
    /// Bool < I64 < F64 < C128. An empty tree infers F64.
    pub fn dtype(&self) -> DType {
        fn ladder(dtype: DType) -> u8 {
            match dtype {
                DType::Bool => 0,
                d if d.is_int() => 1,
                d if d.is_complex() => 3,
                _ => 2,
            }
        }
        fn widest(n: &Nested) -> Option<DType> {
            match n {
                Nested::Leaf(s) => Some(match ladder(s.dtype()) {
                    0 => DType::Bool,
                    1 => DType::I64,
                    2 => DType::F64,
                    _ => DType::C128,
                }),
                Nested::List(items) => items
                    .iter()
                    .filter_map(widest)
                    .max_by_key(|&d| ladder(d)),
            }
        }
        widest(self).unwrap_or(DType::F64)
    }

    fn collect_leaves(&self, out: &mut Vec<Scalar>) {
        match self {
            Nested::Leaf(s) => out.push(*s),
            Nested::List(items) => {
                for item in items {
                    item.collect_leaves(out);
                }
            }
        }
    }
}

macro_rules! nested_leaf {
    ($t:ty) => {
        impl From<$t> for Nested {
            fn from(value: $t) -> Nested {
                Nested::Leaf(value.into_scalar())
            }
        }
    };
}

nested_leaf!(i32);
nested_leaf!(i64);
nested_leaf!(f32);
nested_leaf!(f64);
nested_leaf!(bool);
nested_leaf!(Complex64);

impl From<Scalar> for Nested {
    fn from(value: Scalar) -> Nested {
        Nested::Leaf(value)
    }
}

impl<N: Into<Nested>> From<Vec<N>> for Nested {
    fn from(items: Vec<N>) -> Nested {
        Nested::List(items.into_iter().map(Into::into).collect())
    }
}

impl Array {
    /// Build an array from nested sequence data. The element kind is
    /// `dtype` when given, otherwise inferred from the leaves.
    pub fn from_nested(nested: &Nested, dtype: Option<DType>) -> Result<Array> {
        let shape = nested.shape()?;
        let dtype = dtype.unwrap_or_else(|| nested.dtype());
        let mut leaves = Vec::with_capacity(shape.elem_count());
        nested.collect_leaves(&mut leaves);
        let mut storage = Storage::zeros(dtype, leaves.len());
        for (i, leaf) in leaves.into_iter().enumerate() {
            storage.set(i, leaf);
        }
        Ok(Array::from_storage(
            storage,
            Layout::contiguous(shape),
            dtype,
        ))
    }

    /// Convert to nested sequence form: a tree of lists mirroring the
    /// shape, with this array's elements at the leaves.
    pub fn to_nested(&self) -> Result<Nested> {
        fn build(dims: &[usize], flat: &[Scalar]) -> Nested {
            match dims.split_first() {
                None => Nested::Leaf(flat[0]),
                Some((&d, rest)) => {
                    let chunk: usize = rest.iter().product();
                    Nested::List(
                        (0..d)
                            .map(|i| build(rest, &flat[i * chunk..(i + 1) * chunk]))
                            .collect(),
                    )
                }
            }
        }
        let storage = self.read_storage()?;
        let flat: Vec<Scalar> = self
            .layout()
            .positions()
            .map(|pos| storage.get(pos))
            .collect();
        drop(storage);
        Ok(build(self.dims(), &flat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_inference() {
        let n = Nested::from(vec![vec![1.0f64, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]);
        assert_eq!(n.shape().unwrap().dims(), &[3, 2]);
        assert_eq!(Nested::from(7i64).shape().unwrap().rank(), 0);
    }

    #[test]
    fn test_ragged_rejected() {
        let n = Nested::List(vec![
            Nested::from(vec![1.0f64, 2.0]),
            Nested::from(vec![3.0f64]),
        ]);
        assert!(matches!(n.shape(), Err(Error::ShapeMismatch { .. })));
    }

    #[test]
    fn test_kind_promotion() {
        let ints = Nested::from(vec![1i64, 2]);
        assert_eq!(ints.dtype(), DType::I64);
        let mixed = Nested::List(vec![Nested::from(1i64), Nested::from(2.5f64)]);
        assert_eq!(mixed.dtype(), DType::F64);
        let with_complex = Nested::List(vec![
            Nested::from(1.0f64),
            Nested::from(Complex64::new(0.0, 1.0)),
        ]);
        assert_eq!(with_complex.dtype(), DType::C128);
        let bools = Nested::from(vec![true, false]);
        assert_eq!(bools.dtype(), DType::Bool);
    }

    #[test]
    fn test_explicit_kind_overrides() {
        let n = Nested::from(vec![1i64, 0, 2]);
        let a = Array::from_nested(&n, Some(DType::F32)).unwrap();
        assert_eq!(a.dtype(), DType::F32);
        assert_eq!(a.to_vec::<f32>().unwrap(), vec![1.0, 0.0, 2.0]);
    }

    #[test]
    fn test_round_trip() {
        let a = Array::from_vec((0..24).collect::<Vec<i64>>(), (2, 3, 4)).unwrap();
        let n = a.to_nested().unwrap();
        let b = Array::from_nested(&n, None).unwrap();
        assert_eq!(b.dims(), a.dims());
        assert_eq!(b.to_vec::<i64>().unwrap(), a.to_vec::<i64>().unwrap());
    }

    #[test]
    fn test_round_trip_through_view() {
        // A transposed view round-trips by value, not by layout.
        let a = Array::from_vec(vec![1i64, 2, 3, 4, 5, 6], (2, 3)).unwrap();
        let t = a.transpose();
        let b = Array::from_nested(&t.to_nested().unwrap(), None).unwrap();
        assert_eq!(b.dims(), &[3, 2]);
        assert_eq!(b.to_vec::<i64>().unwrap(), vec![1, 4, 2, 5, 3, 6]);
    }

    #[test]
    fn test_rank_zero_round_trip() {
        let a = Array::scalar(3.5f64);
        let n = a.to_nested().unwrap();
        assert_eq!(n, Nested::Leaf(Scalar::F64(3.5)));
        let b = Array::from_nested(&n, None).unwrap();
        assert_eq!(b.rank(), 0);
        assert_eq!(b.to_scalar().unwrap(), Scalar::F64(3.5));
    }
}

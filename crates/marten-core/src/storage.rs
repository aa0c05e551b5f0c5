use std::cmp::Ordering;

use num_complex::{Complex32, Complex64};
use num_traits::Zero;

use crate::dtype::{DType, Element, Scalar};
use crate::error::{Error, Result};

// Storage — The owned element buffer
//
// One flat `Vec` per element kind. A Storage is shared by any number of
// Array handles via `Arc<RwLock<Storage>>`; views differ only in their
// Layout, all addressing here is in element units against the flat buffer.
//
// Element reads produce a `Scalar`; element writes cast the incoming
// `Scalar` to the buffer's kind (C-style: truncate, wrap, drop imaginary,
// zero-test). Gather/scatter between buffers of the same kind goes through
// `copy_element_from`, which skips the Scalar round trip.

/// Owned flat buffer of elements of one kind.
#[derive(Debug, Clone)]
pub enum Storage {
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    C64(Vec<Complex32>),
    C128(Vec<Complex64>),
    Bool(Vec<bool>),
}

macro_rules! storage_from_vec {
    ($t:ty, $variant:ident) => {
        impl From<Vec<$t>> for Storage {
            fn from(data: Vec<$t>) -> Storage {
                Storage::$variant(data)
            }
        }
    };
}

storage_from_vec!(i8, I8);
storage_from_vec!(i16, I16);
storage_from_vec!(i32, I32);
storage_from_vec!(i64, I64);
storage_from_vec!(u8, U8);
storage_from_vec!(u16, U16);
storage_from_vec!(u32, U32);
storage_from_vec!(u64, U64);
storage_from_vec!(f32, F32);
storage_from_vec!(f64, F64);
storage_from_vec!(Complex32, C64);
storage_from_vec!(Complex64, C128);
storage_from_vec!(bool, Bool);

impl Storage {
    /// Allocate a zero-filled buffer of `len` elements.
    pub fn zeros(dtype: DType, len: usize) -> Storage {
        match dtype {
            DType::I8 => Storage::I8(vec![0; len]),
            DType::I16 => Storage::I16(vec![0; len]),
            DType::I32 => Storage::I32(vec![0; len]),
            DType::I64 => Storage::I64(vec![0; len]),
            DType::U8 => Storage::U8(vec![0; len]),
            DType::U16 => Storage::U16(vec![0; len]),
            DType::U32 => Storage::U32(vec![0; len]),
            DType::U64 => Storage::U64(vec![0; len]),
            DType::F32 => Storage::F32(vec![0.0; len]),
            DType::F64 => Storage::F64(vec![0.0; len]),
            DType::C64 => Storage::C64(vec![Complex32::zero(); len]),
            DType::C128 => Storage::C128(vec![Complex64::zero(); len]),
            DType::Bool => Storage::Bool(vec![false; len]),
        }
    }

    /// The element kind of this buffer.
    pub fn dtype(&self) -> DType {
        match self {
            Storage::I8(_) => DType::I8,
            Storage::I16(_) => DType::I16,
            Storage::I32(_) => DType::I32,
            Storage::I64(_) => DType::I64,
            Storage::U8(_) => DType::U8,
            Storage::U16(_) => DType::U16,
            Storage::U32(_) => DType::U32,
            Storage::U64(_) => DType::U64,
            Storage::F32(_) => DType::F32,
            Storage::F64(_) => DType::F64,
            Storage::C64(_) => DType::C64,
            Storage::C128(_) => DType::C128,
            Storage::Bool(_) => DType::Bool,
        }
    }

    /// Number of elements in the buffer.
    pub fn len(&self) -> usize {
        match self {
            Storage::I8(v) => v.len(),
            Storage::I16(v) => v.len(),
            Storage::I32(v) => v.len(),
            Storage::I64(v) => v.len(),
            Storage::U8(v) => v.len(),
            Storage::U16(v) => v.len(),
            Storage::U32(v) => v.len(),
            Storage::U64(v) => v.len(),
            Storage::F32(v) => v.len(),
            Storage::F64(v) => v.len(),
            Storage::C64(v) => v.len(),
            Storage::C128(v) => v.len(),
            Storage::Bool(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read the element at a storage position.
    pub fn get(&self, pos: usize) -> Scalar {
        match self {
            Storage::I8(v) => Scalar::I8(v[pos]),
            Storage::I16(v) => Scalar::I16(v[pos]),
            Storage::I32(v) => Scalar::I32(v[pos]),
            Storage::I64(v) => Scalar::I64(v[pos]),
            Storage::U8(v) => Scalar::U8(v[pos]),
            Storage::U16(v) => Scalar::U16(v[pos]),
            Storage::U32(v) => Scalar::U32(v[pos]),
            Storage::U64(v) => Scalar::U64(v[pos]),
            Storage::F32(v) => Scalar::F32(v[pos]),
            Storage::F64(v) => Scalar::F64(v[pos]),
            Storage::C64(v) => Scalar::C64(v[pos]),
            Storage::C128(v) => Scalar::C128(v[pos]),
            Storage::Bool(v) => Scalar::Bool(v[pos]),
        }
    }

    /// Write one element, casting the value to the buffer's kind.
    pub fn set(&mut self, pos: usize, value: Scalar) {
        match self {
            Storage::I8(v) => v[pos] = i8::from_scalar(value),
            Storage::I16(v) => v[pos] = i16::from_scalar(value),
            Storage::I32(v) => v[pos] = i32::from_scalar(value),
            Storage::I64(v) => v[pos] = i64::from_scalar(value),
            Storage::U8(v) => v[pos] = u8::from_scalar(value),
            Storage::U16(v) => v[pos] = u16::from_scalar(value),
            Storage::U32(v) => v[pos] = u32::from_scalar(value),
            Storage::U64(v) => v[pos] = u64::from_scalar(value),
            Storage::F32(v) => v[pos] = f32::from_scalar(value),
            Storage::F64(v) => v[pos] = f64::from_scalar(value),
            Storage::C64(v) => v[pos] = Complex32::from_scalar(value),
            Storage::C128(v) => v[pos] = Complex64::from_scalar(value),
            Storage::Bool(v) => v[pos] = bool::from_scalar(value),
        }
    }

    /// Copy one element from another buffer into this one.
    /// Same-kind buffers copy directly; mixed kinds cast through `Scalar`.
    pub fn copy_element_from(&mut self, dst: usize, src: &Storage, src_pos: usize) {
        match (&mut *self, src) {
            (Storage::I8(d), Storage::I8(s)) => d[dst] = s[src_pos],
            (Storage::I16(d), Storage::I16(s)) => d[dst] = s[src_pos],
            (Storage::I32(d), Storage::I32(s)) => d[dst] = s[src_pos],
            (Storage::I64(d), Storage::I64(s)) => d[dst] = s[src_pos],
            (Storage::U8(d), Storage::U8(s)) => d[dst] = s[src_pos],
            (Storage::U16(d), Storage::U16(s)) => d[dst] = s[src_pos],
            (Storage::U32(d), Storage::U32(s)) => d[dst] = s[src_pos],
            (Storage::U64(d), Storage::U64(s)) => d[dst] = s[src_pos],
            (Storage::F32(d), Storage::F32(s)) => d[dst] = s[src_pos],
            (Storage::F64(d), Storage::F64(s)) => d[dst] = s[src_pos],
            (Storage::C64(d), Storage::C64(s)) => d[dst] = s[src_pos],
            (Storage::C128(d), Storage::C128(s)) => d[dst] = s[src_pos],
            (Storage::Bool(d), Storage::Bool(s)) => d[dst] = s[src_pos],
            (d, s) => {
                let value = s.get(src_pos);
                d.set(dst, value);
            }
        }
    }

    /// Stable ascending sort of the elements at the given positions,
    /// written back to the same positions. Floats order by `total_cmp`
    /// (NaN sorts last); complex kinds have no ordering.
    pub fn sort_at(&mut self, positions: &[usize]) -> Result<()> {
        match self {
            Storage::I8(v) => sort_run(v, positions, Ord::cmp),
            Storage::I16(v) => sort_run(v, positions, Ord::cmp),
            Storage::I32(v) => sort_run(v, positions, Ord::cmp),
            Storage::I64(v) => sort_run(v, positions, Ord::cmp),
            Storage::U8(v) => sort_run(v, positions, Ord::cmp),
            Storage::U16(v) => sort_run(v, positions, Ord::cmp),
            Storage::U32(v) => sort_run(v, positions, Ord::cmp),
            Storage::U64(v) => sort_run(v, positions, Ord::cmp),
            Storage::F32(v) => sort_run(v, positions, f32::total_cmp),
            Storage::F64(v) => sort_run(v, positions, f64::total_cmp),
            Storage::Bool(v) => sort_run(v, positions, Ord::cmp),
            Storage::C64(_) | Storage::C128(_) => {
                return Err(Error::RealRequired {
                    op: "sort",
                    dtype: self.dtype(),
                })
            }
        }
        Ok(())
    }

    /// Stable ascending ordering of the elements at the given positions:
    /// result[k] is the index within `positions` of the k-th smallest.
    pub fn argsort_at(&self, positions: &[usize]) -> Result<Vec<i64>> {
        let order = match self {
            Storage::I8(v) => argsort_run(v, positions, Ord::cmp),
            Storage::I16(v) => argsort_run(v, positions, Ord::cmp),
            Storage::I32(v) => argsort_run(v, positions, Ord::cmp),
            Storage::I64(v) => argsort_run(v, positions, Ord::cmp),
            Storage::U8(v) => argsort_run(v, positions, Ord::cmp),
            Storage::U16(v) => argsort_run(v, positions, Ord::cmp),
            Storage::U32(v) => argsort_run(v, positions, Ord::cmp),
            Storage::U64(v) => argsort_run(v, positions, Ord::cmp),
            Storage::F32(v) => argsort_run(v, positions, f32::total_cmp),
            Storage::F64(v) => argsort_run(v, positions, f64::total_cmp),
            Storage::Bool(v) => argsort_run(v, positions, Ord::cmp),
            Storage::C64(_) | Storage::C128(_) => {
                return Err(Error::RealRequired {
                    op: "argsort",
                    dtype: self.dtype(),
                })
            }
        };
        Ok(order)
    }
}

fn sort_run<T: Copy>(data: &mut [T], positions: &[usize], cmp: impl Fn(&T, &T) -> Ordering) {
    let mut values: Vec<T> = positions.iter().map(|&p| data[p]).collect();
    values.sort_by(|a, b| cmp(a, b));
    for (&p, value) in positions.iter().zip(values) {
        data[p] = value;
    }
}

fn argsort_run<T: Copy>(data: &[T], positions: &[usize], cmp: impl Fn(&T, &T) -> Ordering) -> Vec<i64> {
    let mut order: Vec<usize> = (0..positions.len()).collect();
    order.sort_by(|&a, &b| cmp(&data[positions[a]], &data[positions[b]]));
    order.into_iter().map(|i| i as i64).collect()
}

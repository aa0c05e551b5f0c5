use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::dtype::{DType, Element, Scalar};
use crate::error::{Error, Result};
use crate::layout::Layout;
use crate::shape::Shape;
use crate::storage::Storage;

// Array — The fundamental data structure
//
// An Array is an n-dimensional array of elements of one kind. It pairs a
// shared storage buffer with a Layout and a DType:
//
//   1. Storage owns the flat element buffer
//   2. Layout maps the logical shape onto storage (shape, strides, offset)
//   3. DType names the element kind
//
// MEMORY MODEL:
//
//   Storage sits behind Arc<RwLock<Storage>>. Cloning an Array is cheap
//   (Arc clone + layout clone) and produces another handle onto the same
//   buffer. Views — slices, transposes, broadcasts — are new handles with
//   a derived layout over the same storage, so mutation through one handle
//   is visible through every handle aliasing it. Copies allocate fresh
//   storage and are isolated.
//
//   Arc::strong_count of the storage doubles as the alias count that gates
//   in-place resize: growing or shrinking the buffer under other live
//   handles would silently invalidate them, so resize demands sole
//   ownership unless explicitly overridden.
//
//   The RwLock provides interior mutability for shared buffers, not
//   isolation: concurrent mutation of aliasing handles is the caller's
//   responsibility. Every operation here is synchronous and local.

/// An n-dimensional array handle: shared storage + layout + element kind.
#[derive(Clone)]
pub struct Array {
    storage: Arc<RwLock<Storage>>,
    layout: Layout,
    dtype: DType,
}

impl std::fmt::Debug for Array {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Array(shape={}, dtype={})",
            self.layout.shape(),
            self.dtype
        )
    }
}

impl Array {
    // Internal constructors

    /// Create an array from freshly allocated storage and a layout.
    pub(crate) fn from_storage(storage: Storage, layout: Layout, dtype: DType) -> Self {
        Array {
            storage: Arc::new(RwLock::new(storage)),
            layout,
            dtype,
        }
    }

    /// Create a view sharing this array's storage under a different layout.
    pub(crate) fn view_with_layout(&self, layout: Layout) -> Self {
        Array {
            storage: Arc::clone(&self.storage),
            layout,
            dtype: self.dtype,
        }
    }

    pub(crate) fn read_storage(&self) -> Result<RwLockReadGuard<'_, Storage>> {
        self.storage
            .read()
            .map_err(|_| Error::msg("storage lock poisoned"))
    }

    pub(crate) fn write_storage(&self) -> Result<RwLockWriteGuard<'_, Storage>> {
        self.storage
            .write()
            .map_err(|_| Error::msg("storage lock poisoned"))
    }

    // Creation

    /// Create an array from a flat vector in row-major order.
    /// The element kind is taken from the vector's type.
    pub fn from_vec<T: Element>(data: Vec<T>, shape: impl Into<Shape>) -> Result<Self>
    where
        Storage: From<Vec<T>>,
    {
        let shape = shape.into();
        if data.len() != shape.elem_count() {
            return Err(Error::ElementCountMismatch {
                expected: shape.elem_count(),
                got: data.len(),
                shape,
            });
        }
        let layout = Layout::contiguous(shape);
        Ok(Self::from_storage(Storage::from(data), layout, T::DTYPE))
    }

    /// Create a zero-filled array.
    pub fn zeros(shape: impl Into<Shape>, dtype: DType) -> Self {
        let shape = shape.into();
        let storage = Storage::zeros(dtype, shape.elem_count());
        Self::from_storage(storage, Layout::contiguous(shape), dtype)
    }

    /// Create an array filled with one value; the element kind is the
    /// value's kind.
    pub fn full(shape: impl Into<Shape>, value: impl Into<Scalar>) -> Self {
        let shape = shape.into();
        let value = value.into();
        let mut storage = Storage::zeros(value.dtype(), shape.elem_count());
        for pos in 0..shape.elem_count() {
            storage.set(pos, value);
        }
        Self::from_storage(storage, Layout::contiguous(shape), value.dtype())
    }

    /// Create a rank-0 (scalar-shaped) array holding one value.
    pub fn scalar(value: impl Into<Scalar>) -> Self {
        let value = value.into();
        let mut storage = Storage::zeros(value.dtype(), 1);
        storage.set(0, value);
        Self::from_storage(storage, Layout::contiguous(Shape::from(())), value.dtype())
    }

    // Accessors

    /// The shape of this array.
    pub fn shape(&self) -> &Shape {
        self.layout.shape()
    }

    /// The axis extents as a slice.
    pub fn dims(&self) -> &[usize] {
        self.layout.dims()
    }

    /// Number of axes (rank).
    pub fn rank(&self) -> usize {
        self.layout.rank()
    }

    /// Total number of elements.
    pub fn elem_count(&self) -> usize {
        self.layout.elem_count()
    }

    /// Element kind.
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// The memory layout (shape + strides + offset).
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Whether this array is contiguous in storage.
    pub fn is_contiguous(&self) -> bool {
        self.layout.is_contiguous()
    }

    /// Whether two handles share the same storage buffer. Views of an
    /// array share its storage; copies never do.
    pub fn shares_storage(&self, other: &Array) -> bool {
        Arc::ptr_eq(&self.storage, &other.storage)
    }

    /// Number of handles referencing this array's storage.
    pub fn alias_count(&self) -> usize {
        Arc::strong_count(&self.storage)
    }

    // Element access

    /// Extract the single element of a one-element array.
    pub fn to_scalar(&self) -> Result<Scalar> {
        if self.elem_count() != 1 {
            return Err(Error::NotAScalar {
                shape: self.shape().clone(),
            });
        }
        let storage = self.read_storage()?;
        let pos = self.layout.positions().next().unwrap_or(0);
        Ok(storage.get(pos))
    }

    /// Read one element by position.
    ///
    /// With no indices the array must hold exactly one element. With one
    /// index it is a row-major flat position (negative counts from the
    /// end). Otherwise the index count must equal the rank and each index
    /// is bounds-checked per axis.
    pub fn item(&self, index: &[isize]) -> Result<Scalar> {
        let pos = match index.len() {
            0 => return self.to_scalar(),
            1 => {
                let n = self.elem_count() as isize;
                let mut flat = index[0];
                if flat < 0 {
                    flat += n;
                }
                if flat < 0 || flat >= n {
                    return Err(Error::FlatIndexOutOfRange {
                        index: index[0],
                        size: self.elem_count(),
                    });
                }
                self.layout.position_of_flat(flat as usize)
            }
            k if k == self.rank() => {
                let mut coords = Vec::with_capacity(k);
                for (axis, &i) in index.iter().enumerate() {
                    let extent = self.dims()[axis];
                    coords.push(normalize_index(i, extent).ok_or(Error::IndexOutOfRange {
                        index: i,
                        axis,
                        extent,
                    })?);
                }
                self.layout.position_of(&coords)
            }
            k => {
                return Err(Error::IndexCountMismatch {
                    got: k,
                    rank: self.rank(),
                })
            }
        };
        Ok(self.read_storage()?.get(pos))
    }

    /// Extract all elements as a typed vector in row-major order.
    /// The requested type must match the array's kind exactly.
    pub fn to_vec<T: Element>(&self) -> Result<Vec<T>> {
        if T::DTYPE != self.dtype {
            return Err(Error::DTypeMismatch {
                expected: self.dtype,
                got: T::DTYPE,
            });
        }
        let storage = self.read_storage()?;
        Ok(self
            .layout
            .positions()
            .map(|pos| T::from_scalar(storage.get(pos)))
            .collect())
    }

    // Views

    /// An explicit full-range aliasing view: same storage, same layout.
    pub fn view(&self) -> Array {
        self.view_with_layout(self.layout.clone())
    }

    /// Remove axes of extent 1. With no unit axes this is a no-op and the
    /// returned handle is an unchanged clone (same storage, same layout).
    pub fn squeeze(&self) -> Array {
        if self.dims().iter().all(|&d| d != 1) {
            return self.clone();
        }
        self.view_with_layout(self.layout.squeeze())
    }

    /// View with the axis order reversed.
    pub fn transpose(&self) -> Array {
        self.view_with_layout(self.layout.reverse_axes())
    }

    /// View with axes reordered by a permutation.
    pub fn permute(&self, perm: &[usize]) -> Result<Array> {
        Ok(self.view_with_layout(self.layout.permute(perm)?))
    }

    /// View with two axes swapped.
    pub fn swap_axes(&self, d0: usize, d1: usize) -> Result<Array> {
        Ok(self.view_with_layout(self.layout.swap_axes(d0, d1)?))
    }

    // Reshape family

    /// Reshape to new extents; at most one may be -1 (inferred). Returns a
    /// view when the current layout can express the new shape without
    /// moving data, otherwise a contiguous copy.
    pub fn reshape(&self, extents: &[isize]) -> Result<Array> {
        let shape = Shape::infer_reshape(extents, self.elem_count())?;
        if let Some(layout) = self.layout.reshape_view(&shape) {
            return Ok(self.view_with_layout(layout));
        }
        let copy = self.copy()?;
        Ok(copy.view_with_layout(Layout::contiguous(shape)))
    }

    /// Flatten to one axis (view when possible).
    pub fn ravel(&self) -> Result<Array> {
        self.reshape(&[-1])
    }

    /// The writable shape property: replace this handle's shape in place.
    ///
    /// Never moves data. Fails with a shape-mismatch error when element
    /// counts differ, and with a state error when the layout cannot
    /// express the new shape (e.g. a strided view whose runs cannot be
    /// regrouped).
    pub fn set_shape(&mut self, shape: impl Into<Shape>) -> Result<()> {
        let shape = shape.into();
        if shape.elem_count() != self.elem_count() {
            return Err(Error::ReshapeElementMismatch {
                src: self.elem_count(),
                dst: shape.elem_count(),
                dst_shape: shape,
            });
        }
        match self.layout.reshape_view(&shape) {
            Some(layout) => {
                self.layout = layout;
                Ok(())
            }
            None => Err(Error::IncompatibleShape {
                from: self.shape().clone(),
                to: shape,
            }),
        }
    }

    // Copies

    /// Copy into freshly allocated contiguous storage. The result never
    /// aliases the source.
    pub fn copy(&self) -> Result<Array> {
        let shape = self.shape().clone();
        let mut dst = Storage::zeros(self.dtype, shape.elem_count());
        let src = self.read_storage()?;
        for (i, pos) in self.layout.positions().enumerate() {
            dst.copy_element_from(i, &src, pos);
        }
        drop(src);
        Ok(Array::from_storage(
            dst,
            Layout::contiguous(shape),
            self.dtype,
        ))
    }

    /// Element-converting copy to another kind.
    pub fn cast(&self, dtype: DType) -> Result<Array> {
        let shape = self.shape().clone();
        let mut dst = Storage::zeros(dtype, shape.elem_count());
        let src = self.read_storage()?;
        for (i, pos) in self.layout.positions().enumerate() {
            dst.set(i, src.get(pos));
        }
        drop(src);
        Ok(Array::from_storage(dst, Layout::contiguous(shape), dtype))
    }

    /// Write one value to every element, through the layout. Works on
    /// views: filling a slice mutates the underlying storage.
    pub fn fill(&self, value: impl Into<Scalar>) -> Result<()> {
        let value = value.into();
        let mut storage = self.write_storage()?;
        for pos in self.layout.positions() {
            storage.set(pos, value);
        }
        Ok(())
    }

    // Resize

    /// In-place resize to a new element count.
    ///
    /// Keeps the leading `min(old, new)` elements of the row-major
    /// flattened sequence and zero-fills any growth. Requires sole
    /// ownership of the storage (alias count 1); with `refcheck` false the
    /// check is skipped and the shared buffer is replaced, leaving other
    /// aliasing handles stale — their continued use may observe the
    /// reallocated contents or panic on out-of-bounds positions.
    pub fn resize(&mut self, shape: impl Into<Shape>, refcheck: bool) -> Result<()> {
        let shape = shape.into();
        let aliases = self.alias_count();
        if refcheck && aliases > 1 {
            return Err(Error::StorageAliased { aliases });
        }
        let new_count = shape.elem_count();
        let mut dst = Storage::zeros(self.dtype, new_count);
        {
            let src = self.read_storage()?;
            for (i, pos) in self.layout.positions().take(new_count).enumerate() {
                dst.copy_element_from(i, &src, pos);
            }
        }
        *self.write_storage()? = dst;
        self.layout = Layout::contiguous(shape);
        Ok(())
    }

    /// Copy-producing resize. Growth repeats the flattened original
    /// sequence cyclically from its start; shrinking truncates.
    pub fn resized(&self, shape: impl Into<Shape>) -> Result<Array> {
        let shape = shape.into();
        let new_count = shape.elem_count();
        let mut dst = Storage::zeros(self.dtype, new_count);
        let old_count = self.elem_count();
        if old_count > 0 {
            let positions: Vec<usize> = self.layout.positions().collect();
            let src = self.read_storage()?;
            for i in 0..new_count {
                dst.copy_element_from(i, &src, positions[i % old_count]);
            }
        }
        Ok(Array::from_storage(
            dst,
            Layout::contiguous(shape),
            self.dtype,
        ))
    }

    // Ordering

    /// Stable ascending in-place sort. `None` sorts the row-major
    /// flattened sequence; `Some(axis)` sorts each lane along that axis
    /// independently. Complex kinds have no ordering and fail with a kind
    /// error before anything is written.
    pub fn sort(&self, axis: Option<usize>) -> Result<()> {
        if self.dtype.is_complex() {
            return Err(Error::RealRequired {
                op: "sort",
                dtype: self.dtype,
            });
        }
        match axis {
            None => {
                let positions: Vec<usize> = self.layout.positions().collect();
                self.write_storage()?.sort_at(&positions)
            }
            Some(axis) => {
                let (outer, stride, len) = self.lanes(axis)?;
                let mut storage = self.write_storage()?;
                for base in outer.positions() {
                    let positions: Vec<usize> = (0..len)
                        .map(|j| (base as isize + j as isize * stride) as usize)
                        .collect();
                    storage.sort_at(&positions)?;
                }
                Ok(())
            }
        }
    }

    /// Stable ascending argsort producing an `I64` array of indices.
    /// `None` flattens (rank-1 result); `Some(axis)` ranks each lane along
    /// that axis (result has this array's shape).
    pub fn argsort(&self, axis: Option<usize>) -> Result<Array> {
        if self.dtype.is_complex() {
            return Err(Error::RealRequired {
                op: "argsort",
                dtype: self.dtype,
            });
        }
        match axis {
            None => {
                let positions: Vec<usize> = self.layout.positions().collect();
                let order = self.read_storage()?.argsort_at(&positions)?;
                Array::from_vec(order, positions.len())
            }
            Some(axis) => {
                let (outer, stride, len) = self.lanes(axis)?;
                // Walk source lanes and result lanes in the same order; the
                // result is contiguous, so its lane bases come from the
                // contiguous strides of this shape with the axis removed.
                let contig = self.shape().stride_contiguous();
                let mut out_outer_strides = contig.clone();
                out_outer_strides.remove(axis);
                let out_outer = Layout::new(
                    outer.shape().clone(),
                    out_outer_strides,
                    0,
                );
                let mut order = vec![0i64; self.elem_count()];
                let storage = self.read_storage()?;
                for (base, out_base) in outer.positions().zip(out_outer.positions()) {
                    let positions: Vec<usize> = (0..len)
                        .map(|j| (base as isize + j as isize * stride) as usize)
                        .collect();
                    let ranks = storage.argsort_at(&positions)?;
                    for (j, r) in ranks.into_iter().enumerate() {
                        order[out_base + j * contig[axis] as usize] = r;
                    }
                }
                drop(storage);
                Array::from_vec(order, self.shape().clone())
            }
        }
    }

    /// Split this layout into lanes along one axis: the outer layout walks
    /// every lane base, and (stride, len) step within a lane.
    fn lanes(&self, axis: usize) -> Result<(Layout, isize, usize)> {
        if axis >= self.rank() {
            return Err(Error::DimOutOfRange {
                dim: axis,
                rank: self.rank(),
            });
        }
        let mut outer_dims = self.dims().to_vec();
        let mut outer_strides = self.layout.strides().to_vec();
        let stride = outer_strides.remove(axis);
        let len = outer_dims.remove(axis);
        let outer = Layout::new(
            Shape::new(outer_dims),
            outer_strides,
            self.layout.offset(),
        );
        Ok((outer, stride, len))
    }

    // Gather / repeat

    /// Gather elements by index. `None` gathers from the row-major
    /// flattened sequence into a rank-1 result; `Some(axis)` gathers along
    /// that axis (the equivalent of integer-array indexing restricted to
    /// one axis). Negative indices count from the end.
    pub fn take(&self, indices: &[isize], axis: Option<usize>) -> Result<Array> {
        match axis {
            None => {
                let n = self.elem_count();
                let positions: Vec<usize> = self.layout.positions().collect();
                let mut dst = Storage::zeros(self.dtype, indices.len());
                let src = self.read_storage()?;
                for (i, &raw) in indices.iter().enumerate() {
                    let idx = normalize_index(raw, n).ok_or(Error::TakeIndexOutOfRange {
                        index: raw,
                        extent: n,
                    })?;
                    dst.copy_element_from(i, &src, positions[idx]);
                }
                drop(src);
                Ok(Array::from_storage(
                    dst,
                    Layout::contiguous(Shape::from(indices.len())),
                    self.dtype,
                ))
            }
            Some(axis) => {
                if axis >= self.rank() {
                    return Err(Error::DimOutOfRange {
                        dim: axis,
                        rank: self.rank(),
                    });
                }
                let mut keys: Vec<crate::index::IndexKey> = Vec::with_capacity(axis + 1);
                for _ in 0..axis {
                    keys.push(crate::index::IndexKey::full());
                }
                keys.push(crate::index::IndexKey::Take(indices.to_vec()));
                self.get(&keys)
            }
        }
    }

    /// Duplicate each element `count` times along an axis. `None` flattens
    /// first (rank-1 result of `elem_count * count`); `Some(axis)` expands
    /// that axis, repeating each element consecutively.
    pub fn repeat(&self, count: usize, axis: Option<usize>) -> Result<Array> {
        match axis {
            None => {
                let n = self.elem_count();
                let mut dst = Storage::zeros(self.dtype, n * count);
                let src = self.read_storage()?;
                for (i, pos) in self.layout.positions().enumerate() {
                    for r in 0..count {
                        dst.copy_element_from(i * count + r, &src, pos);
                    }
                }
                drop(src);
                Ok(Array::from_storage(
                    dst,
                    Layout::contiguous(Shape::from(n * count)),
                    self.dtype,
                ))
            }
            Some(axis) => {
                if axis >= self.rank() {
                    return Err(Error::DimOutOfRange {
                        dim: axis,
                        rank: self.rank(),
                    });
                }
                let dims = self.dims().to_vec();
                let mut out_dims = dims.clone();
                out_dims[axis] *= count;
                let out_shape = Shape::new(out_dims);
                let out_contig = out_shape.stride_contiguous();
                let mut dst = Storage::zeros(self.dtype, out_shape.elem_count());
                let src = self.read_storage()?;
                let mut coord = vec![0usize; dims.len()];
                for pos in self.layout.positions() {
                    let mut base = 0usize;
                    for (i, &c) in coord.iter().enumerate() {
                        let c = if i == axis { c * count } else { c };
                        base += c * out_contig[i] as usize;
                    }
                    for r in 0..count {
                        dst.copy_element_from(base + r * out_contig[axis] as usize, &src, pos);
                    }
                    for i in (0..dims.len()).rev() {
                        coord[i] += 1;
                        if coord[i] < dims[i] {
                            break;
                        }
                        coord[i] = 0;
                    }
                }
                drop(src);
                Ok(Array::from_storage(
                    dst,
                    Layout::contiguous(out_shape),
                    self.dtype,
                ))
            }
        }
    }

    // Comparison

    /// Elementwise equality against another array under standard
    /// broadcasting, producing a `Bool` array. Integer kinds compare
    /// exactly; float and complex operands compare complex-lifted, so NaN
    /// never equals anything.
    pub fn eq(&self, other: &Array) -> Result<Array> {
        let out_shape = Shape::broadcast_shape(self.shape(), other.shape())?;
        let la = self.layout.broadcast_as(&out_shape)?;
        let lb = other.layout.broadcast_as(&out_shape)?;
        let a = self.read_storage()?;
        let b = other.read_storage()?;
        let mut dst = Storage::zeros(DType::Bool, out_shape.elem_count());
        for (i, (pa, pb)) in la.positions().zip(lb.positions()).enumerate() {
            dst.set(i, Scalar::Bool(a.get(pa).num_eq(b.get(pb))));
        }
        drop(a);
        drop(b);
        Ok(Array::from_storage(
            dst,
            Layout::contiguous(out_shape),
            DType::Bool,
        ))
    }

    /// Elementwise equality against one value, producing a `Bool` array of
    /// this array's shape.
    pub fn eq_scalar(&self, value: impl Into<Scalar>) -> Result<Array> {
        let value = value.into();
        let shape = self.shape().clone();
        let src = self.read_storage()?;
        let mut dst = Storage::zeros(DType::Bool, shape.elem_count());
        for (i, pos) in self.layout.positions().enumerate() {
            dst.set(i, Scalar::Bool(src.get(pos).num_eq(value)));
        }
        drop(src);
        Ok(Array::from_storage(
            dst,
            Layout::contiguous(shape),
            DType::Bool,
        ))
    }
}

/// Add the extent to a negative index; `None` when still out of range.
pub(crate) fn normalize_index(index: isize, extent: usize) -> Option<usize> {
    let n = extent as isize;
    let i = if index < 0 { index + n } else { index };
    (0..n).contains(&i).then_some(i as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arange(n: usize) -> Vec<f64> {
        (0..n).map(|v| v as f64).collect()
    }

    #[test]
    fn test_from_vec_and_to_vec() {
        let a = Array::from_vec(vec![1i32, 2, 3, 4, 5, 6], (2, 3)).unwrap();
        assert_eq!(a.dims(), &[2, 3]);
        assert_eq!(a.dtype(), DType::I32);
        assert_eq!(a.to_vec::<i32>().unwrap(), vec![1, 2, 3, 4, 5, 6]);
        assert!(a.to_vec::<f64>().is_err());
        assert!(Array::from_vec(vec![1i32, 2], (2, 3)).is_err());
    }

    #[test]
    fn test_scalar_array() {
        let a = Array::scalar(2.5f64);
        assert_eq!(a.rank(), 0);
        assert_eq!(a.elem_count(), 1);
        assert_eq!(a.to_scalar().unwrap(), Scalar::F64(2.5));
        let b = Array::from_vec(vec![1.0f64, 2.0], 2).unwrap();
        assert!(matches!(b.to_scalar(), Err(Error::NotAScalar { .. })));
    }

    #[test]
    fn test_view_aliases_copy_does_not() {
        let a = Array::from_vec(arange(6), (2, 3)).unwrap();
        let v = a.view();
        let c = a.copy().unwrap();
        assert!(a.shares_storage(&v));
        assert!(!a.shares_storage(&c));
        v.fill(9.0).unwrap();
        assert_eq!(a.to_vec::<f64>().unwrap(), vec![9.0; 6]);
        assert_eq!(c.to_vec::<f64>().unwrap(), arange(6));
    }

    #[test]
    fn test_squeeze_identity() {
        let a = Array::from_vec(arange(6), (2, 3)).unwrap();
        let s = a.squeeze();
        assert!(s.shares_storage(&a));
        assert_eq!(s.dims(), &[2, 3]);
        let b = Array::from_vec(arange(6), vec![1, 2, 1, 3]).unwrap();
        assert_eq!(b.squeeze().dims(), &[2, 3]);
    }

    #[test]
    fn test_transpose_is_a_view() {
        let a = Array::from_vec(arange(6), (2, 3)).unwrap();
        let t = a.transpose();
        assert_eq!(t.dims(), &[3, 2]);
        assert!(t.shares_storage(&a));
        assert_eq!(t.to_vec::<f64>().unwrap(), vec![0.0, 3.0, 1.0, 4.0, 2.0, 5.0]);
    }

    #[test]
    fn test_reshape_view_and_copy() {
        let a = Array::from_vec(arange(12), (3, 4)).unwrap();
        let r = a.reshape(&[2, 6]).unwrap();
        assert!(r.shares_storage(&a));
        assert_eq!(r.dims(), &[2, 6]);
        let inferred = a.reshape(&[6, -1]).unwrap();
        assert_eq!(inferred.dims(), &[6, 2]);
        assert!(a.reshape(&[5, 2]).is_err());
        // A transposed layout cannot be re-flattened in place.
        let t = a.transpose();
        let flat = t.ravel().unwrap();
        assert!(!flat.shares_storage(&a));
        assert_eq!(flat.to_vec::<f64>().unwrap()[..3], [0.0, 4.0, 8.0]);
    }

    #[test]
    fn test_cast() {
        let a = Array::from_vec(vec![1.9f64, -0.5, 0.0], 3).unwrap();
        let i = a.cast(DType::I32).unwrap();
        assert_eq!(i.to_vec::<i32>().unwrap(), vec![1, 0, 0]);
        let b = a.cast(DType::Bool).unwrap();
        assert_eq!(b.to_vec::<bool>().unwrap(), vec![true, true, false]);
    }

    #[test]
    fn test_eq_broadcast() {
        let a = Array::from_vec(vec![1i64, 2, 2, 4], (2, 2)).unwrap();
        let b = Array::from_vec(vec![1i64, 2], 2).unwrap();
        let e = a.eq(&b).unwrap();
        assert_eq!(e.dims(), &[2, 2]);
        assert_eq!(e.to_vec::<bool>().unwrap(), vec![true, true, false, false]);
        let s = a.eq_scalar(2i64).unwrap();
        assert_eq!(s.to_vec::<bool>().unwrap(), vec![false, true, true, false]);
    }
}

use crate::array::{normalize_index, Array};
use crate::dtype::{DType, Element, Scalar};
use crate::error::{Error, Result};
use crate::index::{expand_keys, IndexKey};
use crate::layout::Layout;
use crate::shape::Shape;
use crate::storage::Storage;

// CompoundArray — Structured elements over a numeric base array
//
// A compound array reinterprets the trailing axis of a base array (length
// K) as one structured element of K scalar fields. Its logical shape is
// the base's element axes only: a base of shape (3, 4, 2) is a compound
// array of 3x4 two-field elements.
//
// Indexing and assignment act on the element axes and always move whole
// elements; fields are never split across results. Internally every
// operation delegates to the base resolver with a full-range slice
// appended for the field axis, so views, gathers, and scatters inherit
// the exact enumeration semantics of plain indexing.

/// A view of a base array whose trailing axis is the field axis.
#[derive(Debug, Clone)]
pub struct CompoundArray {
    base: Array,
}

impl CompoundArray {
    /// Wrap a base array of rank >= 1; its trailing axis becomes the
    /// field axis.
    pub fn new(base: Array) -> Result<Self> {
        if base.rank() == 0 {
            return Err(Error::msg(
                "compound array requires a trailing field axis (base rank >= 1)",
            ));
        }
        Ok(CompoundArray { base })
    }

    /// Create from flat data in row-major element order, `fields` scalars
    /// per element.
    pub fn from_vec<T: Element>(
        data: Vec<T>,
        elem_shape: impl Into<Shape>,
        fields: usize,
    ) -> Result<Self>
    where
        Storage: From<Vec<T>>,
    {
        let elem_shape = elem_shape.into();
        let mut dims = elem_shape.dims().to_vec();
        dims.push(fields);
        Self::new(Array::from_vec(data, dims)?)
    }

    /// The underlying base array (element axes + trailing field axis).
    pub fn base(&self) -> &Array {
        &self.base
    }

    /// Number of scalar fields per element.
    pub fn fields(&self) -> usize {
        self.base.dims()[self.base.rank() - 1]
    }

    /// Shape of the element axes (the field axis is not part of it).
    pub fn shape(&self) -> Shape {
        Shape::new(self.base.dims()[..self.base.rank() - 1].to_vec())
    }

    /// Rank of the element axes.
    pub fn rank(&self) -> usize {
        self.base.rank() - 1
    }

    /// Number of structured elements.
    pub fn elem_count(&self) -> usize {
        self.shape().elem_count()
    }

    pub fn dtype(&self) -> DType {
        self.base.dtype()
    }

    /// Whether two compound handles share storage.
    pub fn shares_storage(&self, other: &CompoundArray) -> bool {
        self.base.shares_storage(&other.base)
    }

    /// Duplicate storage, preserving element grouping. Never aliases.
    pub fn copy(&self) -> Result<CompoundArray> {
        Ok(CompoundArray {
            base: self.base.copy()?,
        })
    }

    /// Index over the element axes; the result holds whole elements. Basic
    /// keys produce an aliasing view, `Take`/`Mask` keys a gathered copy
    /// (true mask cells enumerate in row-major order over the masked
    /// element axes).
    pub fn get(&self, keys: &[IndexKey]) -> Result<CompoundArray> {
        self.base.get(&self.with_field_axis(keys)?).map(|base| CompoundArray { base })
    }

    /// Read one element as its K field values. Index semantics follow
    /// `Array::item`: none (single element), one flat, or rank per-axis.
    pub fn item(&self, index: &[isize]) -> Result<Vec<Scalar>> {
        let coords = self.element_coords(index)?;
        let keys: Vec<IndexKey> = coords.iter().map(|&c| IndexKey::At(c as isize)).collect();
        let element = self.base.get(&keys)?;
        (0..self.fields() as isize)
            .map(|f| element.item(&[f]))
            .collect()
    }

    /// Assign another compound array to the selected elements. Element
    /// shapes broadcast right-aligned; field counts must match exactly.
    pub fn set(&self, keys: &[IndexKey], value: &CompoundArray) -> Result<()> {
        if value.fields() != self.fields() {
            return Err(Error::FieldCountMismatch {
                fields: self.fields(),
                got: value.fields(),
            });
        }
        self.base.set(&self.with_field_axis(keys)?, &value.base)
    }

    /// Assign one K-field tuple to every selected element.
    pub fn set_fields(&self, keys: &[IndexKey], fields: &[Scalar]) -> Result<()> {
        if fields.len() != self.fields() {
            return Err(Error::FieldCountMismatch {
                fields: self.fields(),
                got: fields.len(),
            });
        }
        let mut storage = Storage::zeros(self.dtype(), fields.len());
        for (i, &value) in fields.iter().enumerate() {
            storage.set(i, value);
        }
        let row = Array::from_storage(
            storage,
            Layout::contiguous(Shape::from(fields.len())),
            self.dtype(),
        );
        self.base.set(&self.with_field_axis(keys)?, &row)
    }

    /// Expand an element-axis expression and append the field axis slice.
    /// Expansion happens against the element rank first so an `Ellipsis`
    /// never swallows the field axis.
    fn with_field_axis(&self, keys: &[IndexKey]) -> Result<Vec<IndexKey>> {
        let mut expanded = expand_keys(keys, self.rank())?;
        expanded.push(IndexKey::full());
        Ok(expanded)
    }

    /// Resolve an `item`-style index to per-axis element coordinates.
    fn element_coords(&self, index: &[isize]) -> Result<Vec<usize>> {
        let shape = self.shape();
        let dims = shape.dims();
        match index.len() {
            0 => {
                if shape.elem_count() != 1 {
                    return Err(Error::NotAScalar { shape });
                }
                Ok(vec![0; dims.len()])
            }
            1 => {
                let n = shape.elem_count() as isize;
                let mut flat = index[0];
                if flat < 0 {
                    flat += n;
                }
                if flat < 0 || flat >= n {
                    return Err(Error::FlatIndexOutOfRange {
                        index: index[0],
                        size: shape.elem_count(),
                    });
                }
                let mut coords = vec![0usize; dims.len()];
                let mut rem = flat as usize;
                for i in (0..dims.len()).rev() {
                    coords[i] = rem % dims[i];
                    rem /= dims[i];
                }
                Ok(coords)
            }
            k if k == self.rank() => {
                let mut coords = Vec::with_capacity(k);
                for (axis, &i) in index.iter().enumerate() {
                    let extent = dims[axis];
                    coords.push(normalize_index(i, extent).ok_or(Error::IndexOutOfRange {
                        index: i,
                        axis,
                        extent,
                    })?);
                }
                Ok(coords)
            }
            k => Err(Error::IndexCountMismatch {
                got: k,
                rank: self.rank(),
            }),
        }
    }
}

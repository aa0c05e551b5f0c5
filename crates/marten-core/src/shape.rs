use std::fmt;

use crate::error::{Error, Result};

// Shape — N-dimensional extents
//
// A Shape lists the extent of each axis of an array:
//   - Scalar: Shape([])          — rank 0, 1 element
//   - Vector: Shape([5])         — rank 1, 5 elements
//   - Matrix: Shape([3, 4])      — rank 2, 12 elements
//
// The shape determines how many elements an array holds (product of the
// extents; the empty product is 1, so a rank-0 array holds one element,
// and any zero extent gives an empty array), the default row-major strides,
// and whether two arrays are broadcast-compatible.

/// N-dimensional shape of an array.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape(Vec<usize>);

impl Shape {
    /// Create a new shape from a vector of axis extents.
    pub fn new(dims: Vec<usize>) -> Self {
        Shape(dims)
    }

    /// The axis extents as a slice.
    pub fn dims(&self) -> &[usize] {
        &self.0
    }

    /// Number of axes (0 for scalar, 1 for vector, 2 for matrix, etc.).
    pub fn rank(&self) -> usize {
        self.0.len()
    }

    /// Total number of elements: the product of all extents.
    /// A rank-0 shape has 1 element; any zero extent gives 0.
    pub fn elem_count(&self) -> usize {
        self.0.iter().product()
    }

    /// Compute the contiguous (row-major / C-order) strides for this shape.
    ///
    /// For shape [2, 3, 4], strides are [12, 4, 1]: moving one step along
    /// axis 0 jumps 12 storage elements, along axis 2 just 1. Strides are
    /// signed because derived views may reverse or broadcast axes.
    pub fn stride_contiguous(&self) -> Vec<isize> {
        let mut strides = vec![0isize; self.rank()];
        if self.rank() > 0 {
            strides[self.rank() - 1] = 1;
            for i in (0..self.rank() - 1).rev() {
                strides[i] = strides[i + 1] * self.0[i + 1] as isize;
            }
        }
        strides
    }

    /// Extent of a specific axis.
    pub fn dim(&self, d: usize) -> Result<usize> {
        self.0.get(d).copied().ok_or(Error::DimOutOfRange {
            dim: d,
            rank: self.rank(),
        })
    }

    // Broadcasting

    /// Compute the broadcast output shape from two input shapes.
    ///
    /// Standard rules:
    ///   1. Align shapes from the right (trailing axes).
    ///   2. Extents are compatible if they are equal or one of them is 1.
    ///   3. Missing leading axes are treated as 1.
    ///
    /// Examples:
    ///   [3, 4] and [4]       → [3, 4]
    ///   [2, 1] and [1, 3]    → [2, 3]
    ///   [5, 3, 1] and [3, 4] → [5, 3, 4]
    ///   [3] and [4]          → Error
    pub fn broadcast_shape(lhs: &Shape, rhs: &Shape) -> Result<Shape> {
        let l = lhs.dims();
        let r = rhs.dims();
        let max_rank = l.len().max(r.len());
        let mut result = Vec::with_capacity(max_rank);

        for i in 0..max_rank {
            // Index from the right; axes beyond a shape's rank count as 1.
            let ld = if i < l.len() { l[l.len() - 1 - i] } else { 1 };
            let rd = if i < r.len() { r[r.len() - 1 - i] } else { 1 };

            if ld == rd {
                result.push(ld);
            } else if ld == 1 {
                result.push(rd);
            } else if rd == 1 {
                result.push(ld);
            } else {
                return Err(Error::BroadcastMismatch {
                    from: rhs.clone(),
                    to: lhs.clone(),
                });
            }
        }

        result.reverse(); // built from the right
        Ok(Shape::new(result))
    }

    /// Resolve a requested shape that may contain a single `-1` extent,
    /// inferred so that the total element count equals `elem_count`.
    ///
    /// Errors with a reshape mismatch when more than one extent is negative,
    /// when the known extents do not divide `elem_count`, or when the final
    /// product differs from `elem_count`.
    pub fn infer_reshape(extents: &[isize], elem_count: usize) -> Result<Shape> {
        let mut unknown = None;
        let mut known: usize = 1;
        let mut dims = Vec::with_capacity(extents.len());
        for (i, &e) in extents.iter().enumerate() {
            if e < 0 {
                if unknown.is_some() {
                    return Err(Error::msg(
                        "reshape shape can have at most one inferred (-1) extent",
                    ));
                }
                unknown = Some(i);
                dims.push(0);
            } else {
                known *= e as usize;
                dims.push(e as usize);
            }
        }
        if let Some(i) = unknown {
            if known == 0 || elem_count % known != 0 {
                return Err(Error::ReshapeElementMismatch {
                    src: elem_count,
                    dst: known,
                    dst_shape: Shape::new(dims),
                });
            }
            dims[i] = elem_count / known;
        }
        let shape = Shape::new(dims);
        if shape.elem_count() != elem_count {
            return Err(Error::ReshapeElementMismatch {
                src: elem_count,
                dst: shape.elem_count(),
                dst_shape: shape,
            });
        }
        Ok(shape)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", d)?;
        }
        write!(f, "]")
    }
}

// Convenient From implementations
// These let you write Shape::from((3, 4)) instead of Shape::new(vec![3, 4]).

impl From<()> for Shape {
    /// Scalar shape (rank 0).
    fn from(_: ()) -> Self {
        Shape(vec![])
    }
}

impl From<usize> for Shape {
    /// 1-D shape.
    fn from(d: usize) -> Self {
        Shape(vec![d])
    }
}

impl From<(usize,)> for Shape {
    fn from((d0,): (usize,)) -> Self {
        Shape(vec![d0])
    }
}

impl From<(usize, usize)> for Shape {
    fn from((d0, d1): (usize, usize)) -> Self {
        Shape(vec![d0, d1])
    }
}

impl From<(usize, usize, usize)> for Shape {
    fn from((d0, d1, d2): (usize, usize, usize)) -> Self {
        Shape(vec![d0, d1, d2])
    }
}

impl From<(usize, usize, usize, usize)> for Shape {
    fn from((d0, d1, d2, d3): (usize, usize, usize, usize)) -> Self {
        Shape(vec![d0, d1, d2, d3])
    }
}

impl From<Vec<usize>> for Shape {
    fn from(v: Vec<usize>) -> Self {
        Shape(v)
    }
}

impl From<&[usize]> for Shape {
    fn from(s: &[usize]) -> Self {
        Shape(s.to_vec())
    }
}

impl From<&Shape> for Shape {
    fn from(s: &Shape) -> Self {
        s.clone()
    }
}

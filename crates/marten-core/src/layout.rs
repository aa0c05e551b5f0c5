use crate::error::{Error, Result};
use crate::shape::Shape;

// Layout — Memory layout of an array (shape + strides + offset)
//
// The Layout decouples the *logical* shape of an array from how its
// elements are arranged in storage. This is what makes transpose, slicing,
// reversal, and broadcasting "free": no element moves, only the layout
// changes.
//
// Strides are signed and in element units:
//   - positive: the usual row-major step
//   - zero:     a broadcast axis (every index reads the same element)
//   - negative: a reversed axis (e.g. from a step -1 slice)
//
// The offset is the storage index of the first logical element. Slicing
// advances it; a negative-step slice points it at the last element of the
// range, so the offset stays a valid non-negative storage index whenever
// the layout holds any elements.

/// Layout describes how an array's logical shape maps to flat storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    shape: Shape,
    strides: Vec<isize>,
    offset: usize,
}

impl Layout {
    /// Create a new contiguous layout for the given shape.
    /// Strides are computed as row-major (C-order).
    pub fn contiguous(shape: Shape) -> Self {
        let strides = shape.stride_contiguous();
        Layout {
            shape,
            strides,
            offset: 0,
        }
    }

    /// Create a layout with explicit strides and offset (for views).
    pub fn new(shape: Shape, strides: Vec<isize>, offset: usize) -> Self {
        Layout {
            shape,
            strides,
            offset,
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    pub fn dims(&self) -> &[usize] {
        self.shape.dims()
    }

    pub fn elem_count(&self) -> usize {
        self.shape.elem_count()
    }

    /// Whether this layout is contiguous (row-major, offset 0, no gaps).
    pub fn is_contiguous(&self) -> bool {
        self.offset == 0 && self.strides == self.shape.stride_contiguous()
    }

    /// Storage position of one logical element.
    pub fn position_of(&self, index: &[usize]) -> usize {
        let mut pos = self.offset as isize;
        for (&i, &s) in index.iter().zip(&self.strides) {
            pos += i as isize * s;
        }
        pos as usize
    }

    /// Storage position of the element at a row-major flat index.
    /// The caller checks the flat index against `elem_count` first.
    pub fn position_of_flat(&self, flat: usize) -> usize {
        let dims = self.dims();
        let mut index = vec![0usize; dims.len()];
        let mut rem = flat;
        for i in (0..dims.len()).rev() {
            index[i] = rem % dims[i];
            rem /= dims[i];
        }
        self.position_of(&index)
    }

    /// Swap two axes. Returns a new layout with swapped extents/strides.
    /// This is a "free" operation, no element is copied.
    pub fn swap_axes(&self, d0: usize, d1: usize) -> Result<Layout> {
        let rank = self.rank();
        if d0 >= rank || d1 >= rank {
            return Err(Error::DimOutOfRange {
                dim: d0.max(d1),
                rank,
            });
        }
        let mut new_dims = self.dims().to_vec();
        let mut new_strides = self.strides.clone();
        new_dims.swap(d0, d1);
        new_strides.swap(d0, d1);
        Ok(Layout::new(Shape::new(new_dims), new_strides, self.offset))
    }

    /// Reorder the axes by a permutation. `perm[i]` names the source axis
    /// that becomes output axis `i`; extents and strides move in lockstep.
    pub fn permute(&self, perm: &[usize]) -> Result<Layout> {
        let rank = self.rank();
        if perm.len() != rank {
            return Err(Error::msg(format!(
                "permutation names {} axes, array has {}",
                perm.len(),
                rank
            )));
        }
        let mut seen = vec![false; rank];
        for &p in perm {
            if p >= rank {
                return Err(Error::DimOutOfRange { dim: p, rank });
            }
            if seen[p] {
                return Err(Error::msg(format!("permutation names axis {} twice", p)));
            }
            seen[p] = true;
        }
        let dims = self.dims();
        let new_dims: Vec<usize> = perm.iter().map(|&p| dims[p]).collect();
        let new_strides: Vec<isize> = perm.iter().map(|&p| self.strides[p]).collect();
        Ok(Layout::new(Shape::new(new_dims), new_strides, self.offset))
    }

    /// Reverse the axis order (the default transpose).
    pub fn reverse_axes(&self) -> Layout {
        let mut new_dims = self.dims().to_vec();
        let mut new_strides = self.strides.clone();
        new_dims.reverse();
        new_strides.reverse();
        Layout::new(Shape::new(new_dims), new_strides, self.offset)
    }

    /// Drop all axes of extent 1.
    pub fn squeeze(&self) -> Layout {
        let mut new_dims = Vec::new();
        let mut new_strides = Vec::new();
        for (&d, &s) in self.dims().iter().zip(&self.strides) {
            if d != 1 {
                new_dims.push(d);
                new_strides.push(s);
            }
        }
        Layout::new(Shape::new(new_dims), new_strides, self.offset)
    }

    /// Expand this layout to a broadcast target shape without copying.
    ///
    /// Shapes are aligned from the right. An axis of extent 1 (or a missing
    /// leading axis) becomes a stride-0 axis in the result, so every index
    /// along it reads the same element. Extra leading axes on this layout
    /// are tolerated when they have extent 1.
    pub fn broadcast_as(&self, target: &Shape) -> Result<Layout> {
        let sd = self.dims();
        let td = target.dims();
        let mismatch = || Error::BroadcastMismatch {
            from: self.shape.clone(),
            to: target.clone(),
        };
        if sd.len() > td.len() {
            for &d in &sd[..sd.len() - td.len()] {
                if d != 1 {
                    return Err(mismatch());
                }
            }
        }
        let mut strides = vec![0isize; td.len()];
        for i in 0..td.len() {
            // Align from the right; axes beyond this layout's rank count as 1.
            let t = td[td.len() - 1 - i];
            let (s_dim, s_stride) = if i < sd.len() {
                (sd[sd.len() - 1 - i], self.strides[sd.len() - 1 - i])
            } else {
                (1, 0)
            };
            let out = td.len() - 1 - i;
            if s_dim == t {
                strides[out] = s_stride;
            } else if s_dim == 1 {
                strides[out] = 0;
            } else {
                return Err(mismatch());
            }
        }
        Ok(Layout::new(target.clone(), strides, self.offset))
    }

    /// Try to express this layout under a new shape without moving data.
    ///
    /// Axes whose strides chain contiguously can be merged and then split
    /// into any factoring; a run broken by slicing (e.g. a step-2 column
    /// slice) cannot be regrouped and the reshape must copy instead. Unit
    /// axes are ignored on the old side and may appear anywhere on the new
    /// side. Returns `None` when the layout cannot express the shape.
    pub fn reshape_view(&self, shape: &Shape) -> Option<Layout> {
        if shape.elem_count() == 0 {
            return Some(Layout::new(
                shape.clone(),
                shape.stride_contiguous(),
                self.offset,
            ));
        }
        let mut old_dims = Vec::new();
        let mut old_strides = Vec::new();
        for (&d, &s) in self.dims().iter().zip(&self.strides) {
            if d != 1 {
                old_dims.push(d);
                old_strides.push(s);
            }
        }
        let new_dims = shape.dims();
        let mut new_strides = vec![0isize; new_dims.len()];

        // Match runs of old and new axes covering the same element count,
        // checking each old run chains contiguously before splitting it.
        let (mut oi, mut oj) = (0, 1);
        let (mut ni, mut nj) = (0, 1);
        while ni < new_dims.len() && oi < old_dims.len() {
            let mut np = new_dims[ni];
            let mut op = old_dims[oi];
            while np != op {
                if np < op {
                    np *= new_dims[nj];
                    nj += 1;
                } else {
                    op *= old_dims[oj];
                    oj += 1;
                }
            }
            for k in oi..oj - 1 {
                if old_strides[k] != old_dims[k + 1] as isize * old_strides[k + 1] {
                    return None;
                }
            }
            new_strides[nj - 1] = old_strides[oj - 1];
            for k in (ni..nj - 1).rev() {
                new_strides[k] = new_strides[k + 1] * new_dims[k + 1] as isize;
            }
            ni = nj;
            nj += 1;
            oi = oj;
            oj += 1;
        }
        // Any new axes left over are unit axes; give them the last stride.
        let last = if ni > 0 { new_strides[ni - 1] } else { 1 };
        for stride in new_strides.iter_mut().skip(ni) {
            *stride = last;
        }
        Some(Layout::new(shape.clone(), new_strides, self.offset))
    }

    /// Iterator over the storage positions of this layout, in logical
    /// (row-major) order.
    pub fn positions(&self) -> PositionIter {
        PositionIter::new(self)
    }
}

// PositionIter — Iterates over storage positions respecting strides
//
// When an array has been transposed, sliced, or broadcast, its elements are
// no longer sequential in storage. PositionIter walks the logical elements
// in row-major order and produces the storage position of each one.
//
// For a contiguous array this counts 0, 1, 2, ...; for a reversed axis it
// counts down; for a stride-0 broadcast axis it repeats.

/// Iterator that yields the storage position of each element of a Layout.
pub struct PositionIter {
    /// Current multi-dimensional index (e.g., [0, 0, 0]).
    current: Vec<usize>,
    dims: Vec<usize>,
    strides: Vec<isize>,
    offset: isize,
    remaining: usize,
    started: bool,
}

impl PositionIter {
    fn new(layout: &Layout) -> Self {
        let rank = layout.rank();
        PositionIter {
            current: vec![0; rank],
            dims: layout.dims().to_vec(),
            strides: layout.strides().to_vec(),
            offset: layout.offset() as isize,
            remaining: layout.elem_count(),
            started: false,
        }
    }

    fn position(&self) -> usize {
        let mut pos = self.offset;
        for i in 0..self.current.len() {
            pos += self.current[i] as isize * self.strides[i];
        }
        pos as usize
    }

    /// Advance the multi-dimensional index by one (rightmost axis first).
    fn advance(&mut self) {
        for i in (0..self.dims.len()).rev() {
            self.current[i] += 1;
            if self.current[i] < self.dims[i] {
                return;
            }
            self.current[i] = 0;
        }
    }
}

impl Iterator for PositionIter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        if self.started {
            self.advance();
        }
        self.started = true;
        self.remaining -= 1;
        Some(Self::position(self))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for PositionIter {}

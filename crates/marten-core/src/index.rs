use crate::array::{normalize_index, Array};
use crate::bail;
use crate::dtype::{DType, Scalar};
use crate::error::{Error, Result};
use crate::layout::Layout;
use crate::shape::Shape;
use crate::storage::Storage;

// Indexing — Resolving an index expression into a view or a gather plan
//
// An index expression is a sequence of IndexKey values. Resolution runs a
// single state machine over the keys (§ resolve below) and classifies the
// result:
//
//   VIEW  — only At / Slice / NewAxis / Ellipsis keys: the result is a new
//           Array sharing the source storage under a derived layout. No
//           element is copied; mutation through either handle is visible
//           through the other.
//
//   COPY  — any Take (integer-array) or Mask (boolean) key: the selected
//           elements are gathered into fresh storage. All advanced keys
//           broadcast together into a single block dimension, placed at
//           the position of the first advanced key when the advanced keys
//           are adjacent in the expression, otherwise at the front.
//
// Assignment resolves the same way: a view is written through its strides,
// an advanced selection is scattered to the same positions the gather
// would have read, in the same enumeration order. The right-hand side is
// broadcast right-aligned against the selected shape. All validation
// happens before the first write.

/// Half-open slice with optional bounds and a non-zero step, clipped to
/// the axis like a CPython slice: out-of-range bounds clamp rather than
/// error, and omitted bounds default to the full range in the direction
/// of the step.
#[derive(Debug, Clone, Default)]
pub struct Slice {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: Option<isize>,
}

impl Slice {
    /// Slice with explicit bounds and step 1.
    pub fn new(start: isize, stop: isize) -> Self {
        Slice {
            start: Some(start),
            stop: Some(stop),
            step: None,
        }
    }

    /// The full range (every element, step 1).
    pub fn full() -> Self {
        Slice::default()
    }

    /// The full range walked with the given step (e.g. `::2`, `::-1`).
    pub fn step_by(step: isize) -> Self {
        Slice {
            start: None,
            stop: None,
            step: Some(step),
        }
    }

    /// From `start` to the end of the axis.
    pub fn from_start(start: isize) -> Self {
        Slice {
            start: Some(start),
            stop: None,
            step: None,
        }
    }

    /// Set the step, keeping the bounds.
    pub fn with_step(mut self, step: isize) -> Self {
        self.step = Some(step);
        self
    }

    /// Resolve against an axis extent: (first index, step, length).
    pub fn indices(&self, extent: usize) -> Result<(isize, isize, usize)> {
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(Error::ZeroStep);
        }
        let n = extent as isize;
        let resolve = |bound: Option<isize>, default: isize| -> isize {
            let mut b = bound.unwrap_or(default);
            if bound.is_some() && b < 0 {
                b += n;
            }
            if step > 0 {
                b.clamp(0, n)
            } else {
                b.clamp(-1, n - 1)
            }
        };
        let start = resolve(self.start, if step > 0 { 0 } else { n - 1 });
        let stop = resolve(self.stop, if step > 0 { n } else { -1 });
        let len = if step > 0 {
            if stop > start {
                ((stop - start + step - 1) / step) as usize
            } else {
                0
            }
        } else if start > stop {
            ((start - stop - step - 1) / -step) as usize
        } else {
            0
        };
        Ok((start, step, len))
    }
}

/// One key of an index expression.
#[derive(Debug, Clone)]
pub enum IndexKey {
    /// Integer index: consumes one axis, contributes none. Negative counts
    /// from the end; out of range after normalization is an error.
    At(isize),
    /// Slice: consumes one axis, contributes one of the clipped length.
    Slice(Slice),
    /// Stands for as many full slices as needed to consume the remaining
    /// axes. At most one per expression.
    Ellipsis,
    /// Inserts an axis of extent 1 (stride 0); consumes nothing.
    NewAxis,
    /// Integer-array gather along one axis: marks the result as a copy.
    Take(Vec<isize>),
    /// Boolean mask over as many axes as its rank: marks the result as a
    /// copy, selecting true cells in row-major order.
    Mask(Array),
}

impl IndexKey {
    /// A full-range slice key.
    pub fn full() -> Self {
        IndexKey::Slice(Slice::full())
    }

    /// A slice key with explicit bounds and step 1.
    pub fn slice(start: isize, stop: isize) -> Self {
        IndexKey::Slice(Slice::new(start, stop))
    }

    fn consumed_rank(&self) -> usize {
        match self {
            IndexKey::At(_) | IndexKey::Slice(_) | IndexKey::Take(_) => 1,
            IndexKey::Mask(mask) => mask.rank(),
            IndexKey::NewAxis | IndexKey::Ellipsis => 0,
        }
    }

    fn is_advanced(&self) -> bool {
        matches!(self, IndexKey::Take(_) | IndexKey::Mask(_))
    }
}

/// Expand an index expression against an array rank: replace the single
/// permitted `Ellipsis` with full slices, or append trailing full slices,
/// so the consumed rank equals the array rank exactly.
pub(crate) fn expand_keys(keys: &[IndexKey], rank: usize) -> Result<Vec<IndexKey>> {
    let mut consumed = 0;
    let mut ellipsis = None;
    for (i, key) in keys.iter().enumerate() {
        if matches!(key, IndexKey::Ellipsis) {
            if ellipsis.is_some() {
                return Err(Error::MultipleEllipsis);
            }
            ellipsis = Some(i);
        }
        consumed += key.consumed_rank();
    }
    if consumed > rank {
        return Err(Error::TooManyIndices {
            got: consumed,
            rank,
        });
    }
    let fill = rank - consumed;
    let mut expanded = Vec::with_capacity(keys.len() + fill);
    match ellipsis {
        Some(at) => {
            expanded.extend_from_slice(&keys[..at]);
            expanded.extend((0..fill).map(|_| IndexKey::full()));
            expanded.extend_from_slice(&keys[at + 1..]);
        }
        None => {
            expanded.extend_from_slice(keys);
            expanded.extend((0..fill).map(|_| IndexKey::full()));
        }
    }
    Ok(expanded)
}

/// One advanced participant, normalized to storage deltas.
enum Participant {
    /// Integer-array key: per-index storage delta along one axis.
    Take(Vec<isize>),
    /// Boolean mask: per-true-cell storage delta over the consumed axes,
    /// in row-major cell order.
    Mask(Vec<isize>),
}

impl Participant {
    fn len(&self) -> usize {
        match self {
            Participant::Take(d) | Participant::Mask(d) => d.len(),
        }
    }

    fn delta(&self, i: usize) -> isize {
        match self {
            Participant::Take(d) | Participant::Mask(d) => d[i],
        }
    }
}

/// A resolved advanced selection: iterate the output shape in row-major
/// order; each position is `base + Σ kept-axis contributions + the block
/// delta` for that output coordinate.
struct GatherPlan {
    out_dims: Vec<usize>,
    /// (output axis, effective stride) for each basic output dimension.
    kept: Vec<(usize, isize)>,
    /// Output axis holding the broadcast advanced block.
    block_axis: usize,
    /// Storage delta per block index.
    deltas: Vec<isize>,
    base: isize,
}

enum Resolution {
    View(Layout),
    Gather(GatherPlan),
}

/// The resolver state machine. `keys` must already be expanded.
fn resolve(layout: &Layout, keys: &[IndexKey]) -> Result<Resolution> {
    let dims = layout.dims();
    let strides = layout.strides();

    // Advanced keys broadcast into one block; its output position depends
    // on whether they are adjacent in the expression.
    let advanced_at: Vec<usize> = keys
        .iter()
        .enumerate()
        .filter(|(_, k)| k.is_advanced())
        .map(|(i, _)| i)
        .collect();
    let adjacent = advanced_at.windows(2).all(|w| w[1] == w[0] + 1);
    let block_insert = if adjacent && !advanced_at.is_empty() {
        keys[..advanced_at[0]]
            .iter()
            .filter(|k| matches!(k, IndexKey::Slice(_) | IndexKey::NewAxis))
            .count()
    } else {
        0
    };

    let mut axis = 0usize;
    let mut base = layout.offset() as isize;
    let mut basic: Vec<(usize, isize)> = Vec::new();
    let mut participants: Vec<Participant> = Vec::new();

    for key in keys {
        match key {
            IndexKey::Ellipsis => bail!("ellipsis must be expanded before resolution"),
            IndexKey::At(i) => {
                let extent = dims[axis];
                let idx = normalize_index(*i, extent).ok_or(Error::IndexOutOfRange {
                    index: *i,
                    axis,
                    extent,
                })?;
                base += idx as isize * strides[axis];
                axis += 1;
            }
            IndexKey::Slice(slice) => {
                let (start, step, len) = slice.indices(dims[axis])?;
                if len > 0 {
                    base += start * strides[axis];
                }
                basic.push((len, strides[axis] * step));
                axis += 1;
            }
            IndexKey::NewAxis => basic.push((1, 0)),
            IndexKey::Take(indices) => {
                let extent = dims[axis];
                let mut deltas = Vec::with_capacity(indices.len());
                for &raw in indices {
                    let idx = normalize_index(raw, extent).ok_or(Error::TakeIndexOutOfRange {
                        index: raw,
                        extent,
                    })?;
                    deltas.push(idx as isize * strides[axis]);
                }
                participants.push(Participant::Take(deltas));
                axis += 1;
            }
            IndexKey::Mask(mask) => {
                let consumed = mask.rank();
                let covered = &dims[axis..axis + consumed];
                if mask.dims() != covered {
                    return Err(Error::ShapeMismatch {
                        expected: Shape::new(covered.to_vec()),
                        got: mask.shape().clone(),
                    });
                }
                if mask.dtype() != DType::Bool {
                    return Err(Error::DTypeMismatch {
                        expected: DType::Bool,
                        got: mask.dtype(),
                    });
                }
                let deltas = mask_deltas(mask, &strides[axis..axis + consumed])?;
                participants.push(Participant::Mask(deltas));
                axis += consumed;
            }
        }
    }

    if participants.is_empty() {
        let (out_dims, out_strides): (Vec<usize>, Vec<isize>) = basic.into_iter().unzip();
        return Ok(Resolution::View(Layout::new(
            Shape::new(out_dims),
            out_strides,
            base as usize,
        )));
    }

    // Broadcast the participants together: lengths must match or be 1.
    let block_len = participants.iter().map(Participant::len).max().unwrap_or(1);
    for p in &participants {
        if p.len() != block_len && p.len() != 1 {
            return Err(Error::BroadcastMismatch {
                from: Shape::from(p.len()),
                to: Shape::from(block_len),
            });
        }
    }
    let deltas: Vec<isize> = (0..block_len)
        .map(|b| {
            participants
                .iter()
                .map(|p| p.delta(if p.len() == 1 { 0 } else { b }))
                .sum()
        })
        .collect();

    let mut out_dims: Vec<usize> = basic.iter().map(|&(len, _)| len).collect();
    out_dims.insert(block_insert, block_len);
    let kept = basic
        .iter()
        .enumerate()
        .map(|(i, &(_, stride))| (if i < block_insert { i } else { i + 1 }, stride))
        .collect();

    Ok(Resolution::Gather(GatherPlan {
        out_dims,
        kept,
        block_axis: block_insert,
        deltas,
        base,
    }))
}

/// Storage delta of every true cell of a boolean mask, in row-major order
/// over the masked axes.
fn mask_deltas(mask: &Array, strides: &[isize]) -> Result<Vec<isize>> {
    let storage = mask.read_storage()?;
    let dims = mask.dims().to_vec();
    let mut coord = vec![0usize; dims.len()];
    let mut deltas = Vec::new();
    for pos in mask.layout().positions() {
        if storage.get(pos).to_bool() {
            deltas.push(
                coord
                    .iter()
                    .zip(strides)
                    .map(|(&c, &s)| c as isize * s)
                    .sum(),
            );
        }
        for i in (0..dims.len()).rev() {
            coord[i] += 1;
            if coord[i] < dims[i] {
                break;
            }
            coord[i] = 0;
        }
    }
    Ok(deltas)
}

fn advance(coord: &mut [usize], dims: &[usize]) {
    for i in (0..dims.len()).rev() {
        coord[i] += 1;
        if coord[i] < dims[i] {
            return;
        }
        coord[i] = 0;
    }
}

impl GatherPlan {
    fn position(&self, coord: &[usize]) -> usize {
        let mut pos = self.base;
        for &(out_axis, stride) in &self.kept {
            pos += coord[out_axis] as isize * stride;
        }
        pos += self.deltas[coord[self.block_axis]];
        pos as usize
    }
}

impl Array {
    /// Resolve an index expression into a view (basic keys only) or a
    /// gathered copy (any `Take`/`Mask` key). An empty expression, or one
    /// containing only `Ellipsis`, resolves to the array itself.
    pub fn get(&self, keys: &[IndexKey]) -> Result<Array> {
        if keys.iter().all(|k| matches!(k, IndexKey::Ellipsis)) {
            if keys.len() > 1 {
                return Err(Error::MultipleEllipsis);
            }
            return Ok(self.clone());
        }
        let expanded = expand_keys(keys, self.rank())?;
        match resolve(self.layout(), &expanded)? {
            Resolution::View(layout) => Ok(self.view_with_layout(layout)),
            Resolution::Gather(plan) => {
                let out_shape = Shape::new(plan.out_dims.clone());
                let mut dst = Storage::zeros(self.dtype(), out_shape.elem_count());
                let src = self.read_storage()?;
                let mut coord = vec![0usize; plan.out_dims.len()];
                for i in 0..out_shape.elem_count() {
                    dst.copy_element_from(i, &src, plan.position(&coord));
                    advance(&mut coord, &plan.out_dims);
                }
                drop(src);
                Ok(Array::from_storage(
                    dst,
                    Layout::contiguous(out_shape),
                    self.dtype(),
                ))
            }
        }
    }

    /// Assign through an index expression. The value is broadcast
    /// right-aligned to the selected shape and cast elementwise to this
    /// array's kind. Basic selections write through the derived view;
    /// advanced selections scatter to the positions the gather would read,
    /// in the same enumeration order.
    pub fn set(&self, keys: &[IndexKey], value: &Array) -> Result<()> {
        // A value aliasing the destination is materialized first so the
        // write never reads half-updated elements.
        let value = if self.shares_storage(value) {
            value.copy()?
        } else {
            value.clone()
        };
        let expanded = expand_keys(keys, self.rank())?;
        match resolve(self.layout(), &expanded)? {
            Resolution::View(layout) => {
                let vl = value.layout().broadcast_as(layout.shape())?;
                let src = value.read_storage()?;
                let mut dst = self.write_storage()?;
                for (dst_pos, src_pos) in layout.positions().zip(vl.positions()) {
                    dst.set(dst_pos, src.get(src_pos));
                }
                Ok(())
            }
            Resolution::Gather(plan) => {
                let out_shape = Shape::new(plan.out_dims.clone());
                let vl = value.layout().broadcast_as(&out_shape)?;
                let src = value.read_storage()?;
                let mut dst = self.write_storage()?;
                let mut coord = vec![0usize; plan.out_dims.len()];
                for src_pos in vl.positions() {
                    dst.set(plan.position(&coord), src.get(src_pos));
                    advance(&mut coord, &plan.out_dims);
                }
                Ok(())
            }
        }
    }

    /// Assign one value to every selected element.
    pub fn set_scalar(&self, keys: &[IndexKey], value: impl Into<Scalar>) -> Result<()> {
        self.set(keys, &Array::scalar(value))
    }
}

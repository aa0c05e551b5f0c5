use crate::shape::Shape;

/// All errors that can occur within marten.
///
/// This enum captures every failure mode: out-of-range indices, shape and
/// broadcast mismatches, malformed index expressions, aliasing violations,
/// and element-kind errors. Using a single error type across the library
/// simplifies error propagation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Integer index outside `[-extent, extent)` for one axis.
    #[error("index {index} out of range for axis {axis} with extent {extent}")]
    IndexOutOfRange {
        index: isize,
        axis: usize,
        extent: usize,
    },

    /// Flat (row-major) index outside the element count, e.g. from `item`.
    #[error("flat index {index} out of range for {size} elements")]
    FlatIndexOutOfRange { index: isize, size: usize },

    /// Gather index outside `[-extent, extent)`, from `Take` keys or `take`.
    #[error("take index {index} out of range for extent {extent}")]
    TakeIndexOutOfRange { index: isize, extent: usize },

    /// Axis number out of range for the array's rank.
    #[error("axis out of range: axis {dim} for array with {rank} dimensions")]
    DimOutOfRange { dim: usize, rank: usize },

    /// `item` called with a per-axis index count different from the rank.
    #[error("expected {rank} per-axis indices, got {got}")]
    IndexCountMismatch { got: usize, rank: usize },

    /// Shape mismatch between two arrays (e.g. a mask not matching the axes
    /// it overlays).
    #[error("shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: Shape, got: Shape },

    /// Cannot reshape because element counts differ.
    #[error(
        "cannot reshape: source has {src} elements, target shape {dst_shape} has {dst} elements"
    )]
    ReshapeElementMismatch {
        src: usize,
        dst: usize,
        dst_shape: Shape,
    },

    /// Element count mismatch when creating from a vec.
    #[error("element count mismatch: shape {shape} requires {expected} elements, got {got}")]
    ElementCountMismatch {
        shape: Shape,
        expected: usize,
        got: usize,
    },

    /// The right-hand side of an assignment (or an index-array combination)
    /// cannot be broadcast to the selected shape.
    #[error("cannot broadcast {from} to {to}")]
    BroadcastMismatch { from: Shape, to: Shape },

    /// Tried to extract a scalar from an array with more than one element.
    #[error("not a scalar: array has shape {shape}")]
    NotAScalar { shape: Shape },

    /// Field tuple length differs from the compound's field count.
    #[error("compound has {fields} fields per element, got {got}")]
    FieldCountMismatch { fields: usize, got: usize },

    /// More than one `Ellipsis` in an index expression.
    #[error("an index expression may use at most one ellipsis")]
    MultipleEllipsis,

    /// More dimension-consuming index keys than the array has axes.
    #[error("too many indices: {got} dimension-consuming keys for rank {rank}")]
    TooManyIndices { got: usize, rank: usize },

    /// Slice step of zero.
    #[error("slice step cannot be zero")]
    ZeroStep,

    /// In-place resize attempted while other handles alias the storage.
    #[error("cannot resize: storage is aliased by {aliases} handles (pass refcheck = false to override)")]
    StorageAliased { aliases: usize },

    /// In-place shape assignment on a layout that cannot express the new
    /// shape without copying.
    #[error("cannot assign shape {to} in place: layout of {from} is not stride-compatible")]
    IncompatibleShape { from: Shape, to: Shape },

    /// Operation requiring real-valued elements invoked on complex data.
    #[error("{op} requires real-valued elements, got {dtype}")]
    RealRequired {
        op: &'static str,
        dtype: crate::DType,
    },

    /// DType mismatch, e.g. a non-boolean mask or a typed extraction from
    /// storage of another kind.
    #[error("dtype mismatch: expected {expected}, got {got}")]
    DTypeMismatch {
        expected: crate::DType,
        got: crate::DType,
    },

    /// Generic message for cases not covered above.
    #[error("{0}")]
    Msg(String),
}

impl Error {
    /// Create an error from any string message.
    pub fn msg(s: impl Into<String>) -> Self {
        Error::Msg(s.into())
    }
}

/// Convenience Result type used throughout marten.
pub type Result<T> = std::result::Result<T, Error>;

/// Macro for early return with a formatted error message.
/// Usage: `bail!("something went wrong: {}", detail)`
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::Msg(format!($($arg)*)))
    };
}

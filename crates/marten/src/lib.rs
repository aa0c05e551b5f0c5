//! # marten
//!
//! numpy-style n-dimensional arrays for Rust: shape/stride views over
//! shared storage, the full basic + advanced indexing grammar, in-place
//! mutation with broadcasting, and structured (compound) elements.
//!
//! This is the top-level facade crate that re-exports everything you need.
//!
//! ## Usage
//!
//! ```rust
//! use marten::prelude::*;
//!
//! let a = Array::from_vec((0..12).collect::<Vec<i64>>(), (3, 4))?;
//! let v = a.get(&[IndexKey::full(), IndexKey::Slice(Slice::step_by(2))])?;
//! assert_eq!(v.dims(), &[3, 2]);
//! assert!(v.shares_storage(&a));
//! # Ok::<(), marten::Error>(())
//! ```
//!
//! ## Architecture
//!
//! | Crate | Purpose |
//! |-------|---------|
//! | `marten-core` | Array, Shape, Layout, DType, index resolver, compound arrays |
//! | `marten` | This facade: re-exports, prelude, random construction |

/// Re-export core types.
pub use marten_core::{
    Array, CompoundArray, DType, Element, Error, IndexKey, Layout, Nested, Result, Scalar, Shape,
    Slice, Storage,
};

/// Random array construction — uniform, normal, integer sampling.
pub mod random;

/// Common imports for working with marten.
pub mod prelude {
    pub use crate::random;
    pub use marten_core::{
        Array, CompoundArray, DType, Element, Error, IndexKey, Nested, Result, Scalar, Shape,
        Slice,
    };
}

//! # marten-core
//!
//! The n-dimensional array engine behind marten.
//!
//! This crate provides:
//! - [`Array`] — n-dimensional array handle over shared, ref-counted storage
//! - [`Shape`] / [`Layout`] — extents, signed strides, and base offset
//! - [`DType`] / [`Scalar`] — the closed element-kind set (integers, floats,
//!   complex, bool) and single-element values
//! - [`IndexKey`] / [`Slice`] — the index-expression grammar resolved into
//!   aliasing views or gathered copies
//! - [`CompoundArray`] — structured K-field elements over a base array
//! - [`Nested`] — lossless nested-sequence conversion

pub mod array;
pub mod compound;
pub mod dtype;
pub mod error;
pub mod index;
pub mod layout;
pub mod nested;
pub mod shape;
pub mod storage;

pub use array::Array;
pub use compound::CompoundArray;
pub use dtype::{DType, Element, Scalar};
pub use error::{Error, Result};
pub use index::{IndexKey, Slice};
pub use layout::Layout;
pub use nested::Nested;
pub use shape::Shape;
pub use storage::Storage;

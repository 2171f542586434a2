//! Loading operand arrays from disk.
//!
//! Operands are one-dimensional little-endian `f32` arrays stored in NumPy `.npy` format.

mod array_load;

pub use array_load::*;

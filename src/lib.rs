//! Three-vector and dense row-major matrix kernels in single and double
//! precision.
//!
//! Every operation is implemented once for any [`Float`] and is available for
//! both [`f32`] and [`f64`]. The [`vector3`] module works on plain `[F; 3]`
//! arrays, while [`Matrix`] wraps a row-major buffer whose storage may be
//! heap-allocated, a fixed-size array or a borrowed slice.

pub mod error;
#[cfg(feature = "fuzzing")]
pub mod fuzzing;
pub mod matrix;
pub mod num;
pub mod vector3;

pub use error::{LinalgError, Result, Shape};
pub use matrix::{Matrix, MatrixF32, MatrixF64};
pub use num::Float;
pub use vector3::{Vector3, Vector3F32, Vector3F64};

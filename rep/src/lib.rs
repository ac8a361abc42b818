//! Numeric representations: the primitive scalar kinds, complex values over
//! them, runtime-tagged values and the promotion rules that decide which type
//! arithmetic happens in.

mod error;
mod kind;
mod promotion;
mod scalar;
mod value;

pub use error::ParseRepError;
pub use kind::{RepKind, ScalarKind};
pub use num_complex::Complex;
pub use promotion::{common_kind, promoted};
pub use scalar::{Scalar, ScalarValue};
pub use value::{Rep, Value};

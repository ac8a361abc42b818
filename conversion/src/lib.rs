//! Safe conversions between numeric representations.
//!
//! [`synthesize`] turns a source type, a destination type and a
//! [`Magnitude`](magnitude::Magnitude) into an [`Operation`]: a short
//! sequence of casts, multiplications and integer divisions. Operations can
//! then be run on values, or asked which values would overflow or lose
//! precision along the way.

mod cache;
mod conversion;
mod error;
mod operation;
mod overflow;
mod synthesize;
mod truncation;

pub use cache::ConversionCache;
pub use conversion::Conversion;
pub use error::ConversionError;
pub use operation::{DivideTypeByInteger, MultiplyTypeBy, OpSequence, Operation, StaticCast};
pub use overflow::Limits;
pub use synthesize::{application_strategy, conversion_rep, synthesize};

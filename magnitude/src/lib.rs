//! Exact real-number magnitudes.
//!
//! A [`Magnitude`] is a product of prime powers with rational exponents,
//! optionally times a power of π and a sign. Products, quotients and rational
//! powers stay exact; [`Magnitude::get_value`] turns one into a concrete
//! numeric type only when asked, reporting why that fails if it does.

mod classify;
mod error;
pub mod factoring;
mod magnitude;
pub mod pack;
mod parse;
mod value;

pub use classify::{apply_magnitude, categorize_magnitude, ApplyAs};
pub use error::{ExponentOverflow, MagnitudeError, ParseMagnitudeError, RepresentationError};
pub use magnitude::{common_magnitude, mag, MagBase, Magnitude};
pub use pack::Exponent;
pub use value::{checked_int_pow, root, MagRepresentationOutcome};

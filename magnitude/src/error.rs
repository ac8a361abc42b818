use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a magnitude can not be represented in a given numeric type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepresentationError {
    #[error("value is not an integer but the type is integral")]
    NonIntegerInIntegerType,
    #[error("value is negative but the type is unsigned")]
    NegativeInUnsignedType,
    #[error("could not compute a root of a rational power")]
    InvalidRoot,
    #[error("value does not fit in the type")]
    CannotFit,
}

/// An exponent left the range of `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("magnitude exponent out of range")]
pub struct ExponentOverflow;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MagnitudeError {
    #[error("even root of a negative magnitude is not real")]
    EvenRootOfNegative,
    #[error("zeroth root is undefined")]
    ZerothRoot,
    #[error("{0} is not prime")]
    NotPrime(u64),
    #[error("irrational magnitude can not be applied to an integral type")]
    IrrationalOnIntegral,
    #[error(transparent)]
    ExponentOverflow(#[from] ExponentOverflow),
    #[error(transparent)]
    Representation(#[from] RepresentationError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseMagnitudeError {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unexpected `{found}` at offset {offset}")]
    Unexpected { found: char, offset: usize },
    #[error("zero has no magnitude")]
    Zero,
    #[error("`{0}` is out of range")]
    OutOfRange(String),
    #[error("exponent denominator can not be zero")]
    ZeroDenominator,
    #[error(transparent)]
    Magnitude(#[from] MagnitudeError),
}

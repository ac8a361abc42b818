use magnitude::{Magnitude, RepresentationError};
use rep::RepKind;
use thiserror::Error;

/// A conversion or operation that can not be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("can not cast complex {from} to real {to}")]
    ComplexToReal { from: RepKind, to: RepKind },
    #[error("can not multiply {rep} by {factor}: {reason}")]
    InvalidFactor {
        rep: RepKind,
        factor: Magnitude,
        reason: RepresentationError,
    },
    #[error("can not divide {rep} by {divisor}: {reason}")]
    InvalidDivisor {
        rep: RepKind,
        divisor: Magnitude,
        reason: RepresentationError,
    },
    #[error("sequence step produces {output} but the next step takes {input}")]
    SequenceMismatch { output: RepKind, input: RepKind },
    #[error("an operation sequence needs at least one step")]
    EmptySequence,
}

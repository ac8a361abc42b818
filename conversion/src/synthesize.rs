//! Picking the operations that convert a value between representations while
//! scaling it by a magnitude.

use magnitude::{categorize_magnitude, ApplyAs, Magnitude};
use rep::{common_kind, promoted, RepKind};
use tracing::{debug, trace};

use crate::{ConversionError, Operation};

/// The representation the arithmetic of an `old` to `new` conversion runs
/// in: the usual arithmetic conversions applied to the pair.
///
/// Going from a real to a complex type only looks at the real parts, so the
/// scaling happens on a single scalar before the value gains an imaginary
/// part. Complex values can not be converted to real ones.
pub fn conversion_rep(old: RepKind, new: RepKind) -> Result<RepKind, ConversionError> {
    let common = common_kind(old.real_part(), new.real_part());
    match (old, new) {
        (RepKind::Complex(_), RepKind::Real(_)) => {
            Err(ConversionError::ComplexToReal { from: old, to: new })
        }
        (RepKind::Real(_), RepKind::Complex(_)) => Ok(RepKind::Real(promoted(common))),
        (RepKind::Real(_), RepKind::Real(_)) => Ok(RepKind::Real(common)),
        (RepKind::Complex(_), RepKind::Complex(_)) => Ok(RepKind::Complex(common)),
    }
}

/// How to scale a value of type `rep` by `m` without leaving `rep`.
///
/// Dividing by an integer is exact where multiplying by its rounded inverse
/// is not, and integral types multiply by the numerator before dividing by
/// the denominator so nothing is truncated early.
pub fn application_strategy(rep: RepKind, m: &Magnitude) -> Result<Operation, ConversionError> {
    let category = categorize_magnitude(m);
    trace!("Applying {m} to {rep} as {category}");

    match category {
        ApplyAs::IntegerDivide => Operation::divide(rep, m.inverse()),
        ApplyAs::RationalMultiply if rep.real_part().is_integral() => Operation::sequence([
            Operation::multiply(rep, m.numerator())?,
            Operation::divide(rep, m.denominator())?,
        ]),
        _ => Operation::multiply(rep, m.clone()),
    }
}

/// A cast, split in two when a real value also changes scalar type on its
/// way into a complex one.
fn static_cast_sequence(from: RepKind, to: RepKind) -> Result<Operation, ConversionError> {
    match (from, to) {
        (RepKind::Real(real), RepKind::Complex(part)) if real != part => Operation::sequence([
            Operation::cast(from, RepKind::Real(part))?,
            Operation::cast(RepKind::Real(part), to)?,
        ]),
        _ => Operation::cast(from, to),
    }
}

/// Builds the operation converting a value of type `old` into one of type
/// `new`, multiplied by `m`.
///
/// The value is cast into the [`conversion_rep`], scaled there, then cast
/// into `new`. Casts are left out when either end already is the conversion
/// representation, so the result has between one and three steps (four
/// when a real value lands in a complex type of a different scalar).
pub fn synthesize(old: RepKind, new: RepKind, m: &Magnitude) -> Result<Operation, ConversionError> {
    let rep = conversion_rep(old, new)?;

    let mut ops = Vec::with_capacity(3);
    if old != rep {
        ops.push(static_cast_sequence(old, rep)?);
    }
    ops.push(application_strategy(rep, m)?);
    if new != rep {
        ops.push(static_cast_sequence(rep, new)?);
    }

    let op = Operation::sequence(ops)?;
    debug!("Synthesized {old} -> {new} by {m} as {op}");
    Ok(op)
}

//! Evaluating a magnitude into a concrete numeric type.

use std::f64::consts::PI;

use num_traits::{NumCast, Signed, ToPrimitive};
use rep::{with_scalar, Scalar, ScalarKind, ScalarValue};
use serde::{Deserialize, Serialize};

use crate::{pack::Exponent, MagBase, Magnitude, RepresentationError};

/// Result of trying to represent a magnitude in a numeric type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MagRepresentationOutcome {
    Ok,
    NonIntegerInIntegerType,
    NegativeInUnsignedType,
    InvalidRoot,
    CannotFit,
}

impl<T> From<&Result<T, RepresentationError>> for MagRepresentationOutcome {
    fn from(result: &Result<T, RepresentationError>) -> Self {
        match result {
            Ok(_) => Self::Ok,
            Err(RepresentationError::NonIntegerInIntegerType) => Self::NonIntegerInIntegerType,
            Err(RepresentationError::NegativeInUnsignedType) => Self::NegativeInUnsignedType,
            Err(RepresentationError::InvalidRoot) => Self::InvalidRoot,
            Err(RepresentationError::CannotFit) => Self::CannotFit,
        }
    }
}

impl Magnitude {
    /// The value of this magnitude in `T`.
    ///
    /// The computation runs in the widest type of `T`'s category and every
    /// step is overflow-checked, so a successful result is the exact value
    /// (integral types) or the closest value the float arithmetic reaches.
    pub fn get_value<T: Scalar>(&self) -> Result<T, RepresentationError> {
        if T::KIND.is_integral() && !self.is_integer() {
            return Err(RepresentationError::NonIntegerInIntegerType);
        }

        if !self.is_positive() {
            if T::KIND.is_unsigned() {
                return Err(RepresentationError::NegativeInUnsignedType);
            }
            let value = self.abs().get_value::<T>()?;
            return Ok(T::zero() - value);
        }

        let wide = self.wide_value::<T::Wide>()?;
        let (lowest, highest) = (T::lowest().cast::<T::Wide>(), T::highest().cast::<T::Wide>());
        if wide < lowest || wide > highest {
            return Err(RepresentationError::CannotFit);
        }
        Ok(wide.cast::<T>())
    }

    pub fn outcome<T: Scalar>(&self) -> MagRepresentationOutcome {
        (&self.get_value::<T>()).into()
    }

    pub fn representable_in<T: Scalar>(&self) -> bool {
        self.get_value::<T>().is_ok()
    }

    /// [`Magnitude::get_value`] for a type chosen at runtime.
    pub fn get_value_as(&self, kind: ScalarKind) -> Result<ScalarValue, RepresentationError> {
        with_scalar!(kind, |T| self.get_value::<T>().map(Scalar::into_value))
    }

    /// The value as wrapping arithmetic in `kind` sees it. Integers that do
    /// not fit are reduced modulo the type's width, negative integers wrap
    /// around in unsigned types, and floats too large for the type become
    /// infinite.
    ///
    /// Fails only where [`Magnitude::get_value_as`] fails for another reason
    /// than the range of the type.
    pub fn wrapping_value_as(&self, kind: ScalarKind) -> Result<ScalarValue, RepresentationError> {
        match self.get_value_as(kind) {
            Err(RepresentationError::CannotFit | RepresentationError::NegativeInUnsignedType) => {}
            result => return result,
        }

        if kind.is_float() {
            let abs = self.abs().get_value::<f64>().unwrap_or(f64::INFINITY);
            let value = if self.is_positive() { abs } else { -abs };
            return Ok(ScalarValue::F64(value).cast(kind));
        }

        // Integral past this point, so every exponent is a positive integer.
        let abs = self.abs().powers().iter().fold(1_u64, |acc, p| match p.base {
            MagBase::Prime(base) => acc.wrapping_mul(wrapping_int_pow(base, p.exp.to_integer() as u64)),
            _ => acc,
        });
        let value = if self.is_positive() {
            abs
        } else {
            abs.wrapping_neg()
        };
        Ok(ScalarValue::U64(value).cast(kind))
    }

    /// Product of all the (positive) terms, computed directly in `W`.
    fn wide_value<W: Scalar>(&self) -> Result<W, RepresentationError> {
        let mut result = W::one();
        for p in self.powers() {
            let factor = base_power_value::<W>(p.base, p.exp)?;
            if factor > W::one() && result > W::highest() / factor {
                return Err(RepresentationError::CannotFit);
            }
            result = result * factor;
        }
        Ok(result)
    }
}

fn base_power_value<W: Scalar>(base: MagBase, exp: Exponent) -> Result<W, RepresentationError> {
    let value: W = match base {
        MagBase::Prime(p) => NumCast::from(p),
        MagBase::Pi => NumCast::from(PI),
        MagBase::Negative => Some(W::one()),
    }
    .ok_or(RepresentationError::CannotFit)?;

    let numer = exp.numer().unsigned_abs();
    let power = checked_int_pow(value, numer)?;

    let denom = exp.denom().unsigned_abs();
    let power = if denom == 1 {
        power
    } else if W::KIND.is_integral() {
        return Err(RepresentationError::NonIntegerInIntegerType);
    } else {
        let power = power.to_f64().ok_or(RepresentationError::CannotFit)?;
        NumCast::from(root(power, denom)?).ok_or(RepresentationError::CannotFit)?
    };

    Ok(if exp.is_negative() { W::one() / power } else { power })
}

/// `base^exp`, failing instead of overflowing. `base` must be at least one.
pub fn checked_int_pow<W: Scalar>(mut base: W, mut exp: u64) -> Result<W, RepresentationError> {
    let mut result = W::one();
    while exp > 0 {
        if exp % 2 == 1 {
            if base > W::highest() / result {
                return Err(RepresentationError::CannotFit);
            }
            result = result * base;
        }

        exp /= 2;
        if exp == 0 {
            break;
        }

        if base > W::highest() / base {
            return Err(RepresentationError::CannotFit);
        }
        base = base * base;
    }
    Ok(result)
}

/// `base^exp` modulo `2^64`.
fn wrapping_int_pow(mut base: u64, mut exp: u64) -> u64 {
    let mut result = 1_u64;
    while exp > 0 {
        if exp % 2 == 1 {
            result = result.wrapping_mul(base);
        }
        base = base.wrapping_mul(base);
        exp /= 2;
    }
    result
}

/// The `n`th root of `x`, found by bisection.
///
/// Non-real roots (`n` zero, or even `n` with a negative `x`) fail with
/// [`RepresentationError::InvalidRoot`].
pub fn root(x: f64, n: u64) -> Result<f64, RepresentationError> {
    if n == 0 || (x < 0.0 && n % 2 == 0) {
        return Err(RepresentationError::InvalidRoot);
    }

    if n == 1 || x == 0.0 || x == 1.0 {
        return Ok(x);
    }

    if x < 0.0 {
        return root(-x, n).map(|r| -r);
    }

    if x < 1.0 {
        return root(1.0 / x, n).map(|r| 1.0 / r);
    }

    // Invariant: lo^n <= x < hi^n, where an overflowing power counts as too big.
    let (mut lo, mut hi) = (1.0_f64, x);
    loop {
        let mid = lo + (hi - lo) / 2.0;
        if mid <= lo || mid >= hi {
            break;
        }

        match checked_int_pow(mid, n) {
            Ok(power) if power == x => return Ok(mid),
            Ok(power) if power < x => lo = mid,
            _ => hi = mid,
        }
    }

    let lo_diff = checked_int_pow(lo, n).map_or(f64::INFINITY, |p| x - p);
    let hi_diff = checked_int_pow(hi, n).map_or(f64::INFINITY, |p| p - x);
    Ok(if lo_diff <= hi_diff { lo } else { hi })
}

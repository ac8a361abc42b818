//! Input ranges for which an [`Operation`] can not overflow.
//!
//! Every bound is expressed in the scalar part of the operation's input
//! type. The lower bound is never positive and the upper bound is never
//! negative; the helpers below rely on that.

use magnitude::{Magnitude, RepresentationError};
use rep::{with_scalar, Scalar, ScalarValue, Value};
use serde::{Deserialize, Serialize};

use crate::operation::{assert_input_kind, Operation};

/// An inclusive range of values in some scalar type.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Limits<T> {
    pub lower: T,
    pub upper: T,
}

impl<T: Scalar> Limits<T> {
    /// Everything the type can represent.
    pub fn full() -> Self {
        Self {
            lower: T::lowest(),
            upper: T::highest(),
        }
    }

    pub fn contains(&self, x: T) -> bool {
        self.lower <= x && x <= self.upper
    }

    pub fn into_value(self) -> Limits<ScalarValue> {
        Limits {
            lower: self.lower.into_value(),
            upper: self.upper.into_value(),
        }
    }

    fn from_value(limits: Limits<ScalarValue>) -> Self {
        Self {
            lower: T::cast_from(limits.lower),
            upper: T::cast_from(limits.upper),
        }
    }
}

impl Operation {
    /// The smallest input value that is guaranteed not to overflow.
    pub fn min_good(&self) -> ScalarValue {
        self.good_limits(None).lower
    }

    /// The largest input value that is guaranteed not to overflow.
    pub fn max_good(&self) -> ScalarValue {
        self.good_limits(None).upper
    }

    /// Both bounds at once. Passing `limits` (in the scalar part of the
    /// output type) narrows the acceptable outputs, so the result answers
    /// "which inputs stay inside `limits`".
    pub fn good_limits(&self, limits: Option<Limits<ScalarValue>>) -> Limits<ScalarValue> {
        match self {
            Operation::StaticCast(op) => {
                let (from, to) = (op.from().real_part(), op.to().real_part());
                with_scalar!(from, |T| with_scalar!(to, |U| {
                    let limits = limits.map_or_else(Limits::<U>::full, Limits::from_value);
                    Limits {
                        lower: cast_min_good::<T, U>(limits),
                        upper: cast_max_good::<T, U>(limits),
                    }
                    .into_value()
                }))
            }
            Operation::Multiply(op) => with_scalar!(op.rep().real_part(), |T| {
                let limits = limits.map_or_else(Limits::<T>::full, Limits::from_value);
                Limits {
                    lower: multiply_min_good(op.factor(), limits),
                    upper: multiply_max_good(op.factor(), limits),
                }
                .into_value()
            }),
            Operation::Divide(op) => with_scalar!(op.rep().real_part(), |T| {
                let limits = limits.map_or_else(Limits::<T>::full, Limits::from_value);
                Limits {
                    lower: divide_min_good(op.divisor(), limits),
                    upper: divide_max_good(op.divisor(), limits),
                }
                .into_value()
            }),
            Operation::Sequence(seq) => seq
                .ops()
                .iter()
                .rev()
                .fold(limits, |limits, op| Some(op.good_limits(limits)))
                .unwrap_or_else(|| unreachable!("sequences are never empty")),
        }
    }

    /// The lowest value of the input's scalar type.
    pub fn min_possible(&self) -> ScalarValue {
        with_scalar!(self.input().real_part(), |T| T::lowest().into_value())
    }

    /// The highest value of the input's scalar type.
    pub fn max_possible(&self) -> ScalarValue {
        with_scalar!(self.input().real_part(), |T| T::highest().into_value())
    }

    pub fn can_overflow_below(&self) -> bool {
        self.min_good() > self.min_possible()
    }

    pub fn can_overflow_above(&self) -> bool {
        self.max_good() < self.max_possible()
    }

    /// True if running the operation on `value` would exceed a type's
    /// bounds at any step. Complex values are checked per component.
    ///
    /// # Panics
    ///
    /// If `value` is not of the operation's input kind.
    pub fn would_overflow(&self, value: &Value) -> bool {
        assert_input_kind(self, value);
        let good = self.good_limits(None);
        value
            .components()
            .into_iter()
            .any(|x| x < good.lower || x > good.upper)
    }
}

fn cast_min_good<T: Scalar, U: Scalar>(limits: Limits<U>) -> T {
    let (t, u) = (T::KIND, U::KIND);
    if t.is_integral() {
        if t.is_unsigned() || u.is_float() {
            source_lowest_unless_dest_limit_is_higher::<T, U>(limits)
        } else if u.is_unsigned() {
            T::zero()
        } else if t.size() <= u.size() {
            source_lowest_unless_dest_limit_is_higher::<T, U>(limits)
        } else {
            limits.lower.cast()
        }
    } else if u.is_float() && t.size() <= u.size() {
        source_lowest_unless_dest_limit_is_higher::<T, U>(limits)
    } else {
        limits.lower.cast()
    }
}

fn cast_max_good<T: Scalar, U: Scalar>(limits: Limits<U>) -> T {
    let (t, u) = (T::KIND, U::KIND);
    if t.is_integral() {
        // Integer maxima are positive, so comparing them as `u64` is exact.
        if u.is_float() || T::highest().cast::<u64>() <= U::highest().cast::<u64>() {
            source_highest_unless_dest_limit_is_lower::<T, U>(limits)
        } else {
            limits.upper.cast()
        }
    } else if u.is_integral() {
        max_float_not_exceeding_max_int::<T, U>(limits)
    } else if t.size() <= u.size() {
        source_highest_unless_dest_limit_is_lower::<T, U>(limits)
    } else {
        limits.upper.cast()
    }
}

/// `T::lowest()`, or the lower limit if that is higher. `U` has to be able
/// to hold every value of `T`.
fn source_lowest_unless_dest_limit_is_higher<T: Scalar, U: Scalar>(limits: Limits<U>) -> T {
    if T::lowest().cast::<U>() <= limits.lower {
        limits.lower.cast()
    } else {
        T::lowest()
    }
}

fn source_highest_unless_dest_limit_is_lower<T: Scalar, U: Scalar>(limits: Limits<U>) -> T {
    if T::highest().cast::<U>() >= limits.upper {
        limits.upper.cast()
    } else {
        T::highest()
    }
}

/// The float with every mantissa bit set and a zero exponent.
fn max_mantissa<F: Scalar>() -> F {
    let mut x = F::one();
    let mut last = x;
    while x + F::one() > x {
        last = x;
        x = x + x + F::one();
    }
    last
}

/// The largest `F` that casts to `I` without exceeding the upper limit.
///
/// Integer maxima are rarely exact floats: `i32::MAX` rounds up to `2^31`
/// as an `f32`, which no longer fits. Instead take the largest value below
/// the limit that is the maximal mantissa times a power of two.
fn max_float_not_exceeding_max_int<F: Scalar, I: Scalar>(limits: Limits<I>) -> F {
    let limit = I::highest().cast::<F>();
    let mantissa = max_mantissa::<F>();

    let float_limit = if limit <= mantissa {
        limit
    } else {
        let mut x = mantissa;
        while x + x < limit {
            x = x + x;
        }
        x
    };

    let explicit = limits.upper.cast::<F>();
    if float_limit <= explicit {
        float_limit
    } else {
        explicit
    }
}

/// `x / m`, where a magnitude too large for `T` divides everything down to
/// zero.
fn divide_by_mag<T: Scalar>(x: T, m: &Magnitude) -> T {
    match m.get_value::<T>() {
        Ok(value) => x.wrapping_div(value),
        Err(_) => T::zero(),
    }
}

fn is_abs_bigger_than_one<T: Scalar>(m: &Magnitude) -> bool {
    match m.abs().get_value::<T>() {
        Ok(value) => value >= T::one(),
        Err(RepresentationError::CannotFit) => true,
        Err(_) => false,
    }
}

/// A magnitude that shrinks values can push the limits outside of the type,
/// so the bounds have to be clamped.
fn is_clamping_required<T: Scalar>(m: &Magnitude) -> bool {
    !is_abs_bigger_than_one::<T>(m)
}

/// Whichever limit ends up lowest after dividing by `m`. Only valid when
/// `|m| >= 1`.
fn lowest_of_limits_divided_by_value<T: Scalar>(m: &Magnitude, limits: Limits<T>) -> T {
    let limit = if m.is_positive() {
        limits.lower
    } else {
        limits.upper
    };
    divide_by_mag(limit, m)
}

/// Whichever limit ends up highest after dividing by `m`. Only valid when
/// `|m| >= 1`.
fn highest_of_limits_divided_by_value<T: Scalar>(m: &Magnitude, limits: Limits<T>) -> T {
    if m.get_value::<T>() == Ok(limits.lower) {
        return T::one();
    }

    if m.is_positive() {
        divide_by_mag(limits.upper, m)
    } else {
        divide_by_mag(limits.lower, &m.abs()).clamped_neg()
    }
}

/// Lowest input for a magnitude with `|m| < 1`. Multiplying the limit by
/// `1 / |m|` can overflow, in which case the type's own bound wins.
fn clamp_lowest_of_limits_times_inverse_value<T: Scalar>(m: &Magnitude, limits: Limits<T>) -> T {
    let abs_divisor = m.abs().inverse();
    let (limit, bound) = if m.is_positive() {
        (limits.lower, divide_by_mag(T::lowest(), &abs_divisor))
    } else {
        (
            limits.upper.clamped_neg(),
            divide_by_mag(T::highest(), &abs_divisor).clamped_neg(),
        )
    };

    match abs_divisor.get_value::<T>() {
        Ok(divisor) if bound < limit => limit.saturating_mul(divisor),
        _ => T::lowest(),
    }
}

fn clamp_highest_of_limits_times_inverse_value<T: Scalar>(m: &Magnitude, limits: Limits<T>) -> T {
    let abs_divisor = m.abs().inverse();
    let (limit, bound) = if m.is_positive() {
        (limits.upper, divide_by_mag(T::highest(), &abs_divisor))
    } else {
        (
            limits.lower.clamped_neg(),
            divide_by_mag(T::lowest(), &abs_divisor).clamped_neg(),
        )
    };

    match abs_divisor.get_value::<T>() {
        Ok(divisor) if bound > limit => limit.saturating_mul(divisor),
        _ => T::highest(),
    }
}

/// A factor too large for `T` leaves only zero: [`divide_by_mag`] sends
/// both limits there.
fn multiply_min_good<T: Scalar>(m: &Magnitude, limits: Limits<T>) -> T {
    if T::KIND.is_unsigned() {
        T::zero()
    } else if is_clamping_required::<T>(m) {
        clamp_lowest_of_limits_times_inverse_value(m, limits)
    } else {
        lowest_of_limits_divided_by_value(m, limits)
    }
}

fn multiply_max_good<T: Scalar>(m: &Magnitude, limits: Limits<T>) -> T {
    if T::KIND.is_unsigned() && !m.is_positive() {
        T::zero()
    } else if is_clamping_required::<T>(m) {
        clamp_highest_of_limits_times_inverse_value(m, limits)
    } else {
        highest_of_limits_divided_by_value(m, limits)
    }
}

fn divide_min_good<T: Scalar>(divisor: &Magnitude, limits: Limits<T>) -> T {
    if T::KIND.is_unsigned() {
        T::zero()
    } else {
        clamp_lowest_of_limits_times_inverse_value(&divisor.inverse(), limits)
    }
}

fn divide_max_good<T: Scalar>(divisor: &Magnitude, limits: Limits<T>) -> T {
    if T::KIND.is_unsigned() && !divisor.is_positive() {
        T::zero()
    } else {
        clamp_highest_of_limits_times_inverse_value(&divisor.inverse(), limits)
    }
}

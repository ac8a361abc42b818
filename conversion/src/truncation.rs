use rep::{with_scalar, Scalar, ScalarValue, Value};

use crate::operation::{assert_input_kind, Operation};

impl Operation {
    /// True if running the operation on `value` silently drops information,
    /// such as the remainder of an integer division or the fractional part
    /// of a float cast to an integer.
    ///
    /// Sequences are checked step by step on the running value.
    ///
    /// # Panics
    ///
    /// If `value` is not of the operation's input kind.
    pub fn would_truncate(&self, value: &Value) -> bool {
        assert_input_kind(self, value);
        match self {
            Operation::StaticCast(op) => {
                let (from, to) = (op.from().real_part(), op.to().real_part());
                from.is_float() && to.is_integral() && any_component(value, |x| !is_whole(x))
            }
            Operation::Multiply(_) => false,
            Operation::Divide(op) => {
                let kind = op.rep().real_part();
                if kind.is_float() {
                    return false;
                }

                match op.value() {
                    Some(divisor) => any_component(value, |x| has_remainder(x, divisor)),
                    None => any_component(value, |x| !x.is_zero()),
                }
            }
            Operation::Sequence(seq) => {
                let mut value = *value;
                for op in seq.ops() {
                    if op.would_truncate(&value) {
                        return true;
                    }
                    value = op.apply(value);
                }
                false
            }
        }
    }
}

fn any_component(value: &Value, f: impl Fn(ScalarValue) -> bool) -> bool {
    value.components().into_iter().any(f)
}

fn is_whole(x: ScalarValue) -> bool {
    with_scalar!(x.kind(), |T| T::cast_from(x).is_whole())
}

fn has_remainder(x: ScalarValue, divisor: ScalarValue) -> bool {
    with_scalar!(x.kind(), |T| remainder_is_nonzero(
        T::cast_from(x),
        T::cast_from(divisor)
    ))
}

fn remainder_is_nonzero<T: Scalar>(x: T, divisor: T) -> bool {
    x.checked_rem(divisor).is_some_and(|r| r != T::zero())
}

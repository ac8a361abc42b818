use std::{
    fmt::{self, Display},
    slice,
};

use itertools::Itertools;
use magnitude::{Magnitude, RepresentationError};
use rep::{with_scalar, RepKind, Scalar, ScalarKind, ScalarValue, Value};

use crate::ConversionError;

/// `as`-style conversion between two representations.
#[derive(Clone, Debug, PartialEq)]
pub struct StaticCast {
    from: RepKind,
    to: RepKind,
}

/// Multiplies a value by a magnitude without changing its type.
#[derive(Clone, Debug, PartialEq)]
pub struct MultiplyTypeBy {
    rep: RepKind,
    factor: Magnitude,
    value: ScalarValue,
}

/// Divides a value by an integer magnitude without changing its type.
#[derive(Clone, Debug, PartialEq)]
pub struct DivideTypeByInteger {
    rep: RepKind,
    divisor: Magnitude,
    /// `None` when the divisor is out of the type's range (too large, or
    /// negative for an unsigned type). Every quotient is then zero.
    value: Option<ScalarValue>,
}

/// Steps applied left to right. Never nested and never empty.
#[derive(Clone, Debug, PartialEq)]
pub struct OpSequence {
    ops: Vec<Operation>,
}

/// A primitive numeric operation, or a sequence of them.
#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    StaticCast(StaticCast),
    Multiply(MultiplyTypeBy),
    Divide(DivideTypeByInteger),
    Sequence(OpSequence),
}

impl StaticCast {
    pub fn new(from: RepKind, to: RepKind) -> Result<Self, ConversionError> {
        if from.is_complex() && !to.is_complex() {
            return Err(ConversionError::ComplexToReal { from, to });
        }
        Ok(Self { from, to })
    }

    pub fn from(&self) -> RepKind {
        self.from
    }

    pub fn to(&self) -> RepKind {
        self.to
    }
}

impl MultiplyTypeBy {
    /// Integral types need an integer factor. A factor outside the type's
    /// range (or a negative one for an unsigned type) is accepted and held
    /// as wrapping arithmetic sees it; only zero survives such a step
    /// without overflowing.
    pub fn new(rep: RepKind, factor: Magnitude) -> Result<Self, ConversionError> {
        match factor.wrapping_value_as(rep.real_part()) {
            Ok(value) => Ok(Self { rep, factor, value }),
            Err(reason) => Err(ConversionError::InvalidFactor {
                rep,
                factor,
                reason,
            }),
        }
    }

    pub fn rep(&self) -> RepKind {
        self.rep
    }

    pub fn factor(&self) -> &Magnitude {
        &self.factor
    }

    pub fn value(&self) -> ScalarValue {
        self.value
    }
}

impl DivideTypeByInteger {
    /// The divisor must be an integer. It may be out of the type's range.
    pub fn new(rep: RepKind, divisor: Magnitude) -> Result<Self, ConversionError> {
        let reason = if !divisor.is_integer() {
            RepresentationError::NonIntegerInIntegerType
        } else {
            match divisor.get_value_as(rep.real_part()) {
                Ok(value) => {
                    return Ok(Self {
                        rep,
                        divisor,
                        value: Some(value),
                    })
                }
                Err(
                    RepresentationError::CannotFit
                    | RepresentationError::NegativeInUnsignedType,
                ) => {
                    return Ok(Self {
                        rep,
                        divisor,
                        value: None,
                    })
                }
                Err(reason) => reason,
            }
        };

        Err(ConversionError::InvalidDivisor {
            rep,
            divisor,
            reason,
        })
    }

    pub fn rep(&self) -> RepKind {
        self.rep
    }

    pub fn divisor(&self) -> &Magnitude {
        &self.divisor
    }

    pub fn value(&self) -> Option<ScalarValue> {
        self.value
    }
}

impl OpSequence {
    /// Flattens nested sequences. Adjacent steps must agree on the type
    /// passed between them.
    pub fn new(ops: impl IntoIterator<Item = Operation>) -> Result<Self, ConversionError> {
        let mut flat = Vec::new();
        for op in ops {
            match op {
                Operation::Sequence(seq) => flat.extend(seq.ops),
                op => flat.push(op),
            }
        }

        if flat.is_empty() {
            return Err(ConversionError::EmptySequence);
        }

        for (a, b) in flat.iter().tuple_windows() {
            if a.output() != b.input() {
                return Err(ConversionError::SequenceMismatch {
                    output: a.output(),
                    input: b.input(),
                });
            }
        }

        Ok(Self { ops: flat })
    }

    pub fn ops(&self) -> &[Operation] {
        &self.ops
    }
}

impl Operation {
    pub fn cast(from: RepKind, to: RepKind) -> Result<Self, ConversionError> {
        StaticCast::new(from, to).map(Operation::StaticCast)
    }

    pub fn multiply(rep: RepKind, factor: Magnitude) -> Result<Self, ConversionError> {
        MultiplyTypeBy::new(rep, factor).map(Operation::Multiply)
    }

    pub fn divide(rep: RepKind, divisor: Magnitude) -> Result<Self, ConversionError> {
        DivideTypeByInteger::new(rep, divisor).map(Operation::Divide)
    }

    /// Builds a sequence, unwrapping it again if only one step remains.
    pub fn sequence(ops: impl IntoIterator<Item = Operation>) -> Result<Self, ConversionError> {
        let mut seq = OpSequence::new(ops)?;
        Ok(match seq.ops.len() {
            1 => seq.ops.remove(0),
            _ => Operation::Sequence(seq),
        })
    }

    pub fn input(&self) -> RepKind {
        match self {
            Operation::StaticCast(op) => op.from,
            Operation::Multiply(op) => op.rep,
            Operation::Divide(op) => op.rep,
            Operation::Sequence(seq) => seq.ops[0].input(),
        }
    }

    pub fn output(&self) -> RepKind {
        match self {
            Operation::StaticCast(op) => op.to,
            Operation::Multiply(op) => op.rep,
            Operation::Divide(op) => op.rep,
            Operation::Sequence(seq) => seq.ops[seq.ops.len() - 1].output(),
        }
    }

    /// The primitive steps, in order.
    pub fn ops(&self) -> &[Operation] {
        match self {
            Operation::Sequence(seq) => &seq.ops,
            op => slice::from_ref(op),
        }
    }

    pub fn len(&self) -> usize {
        self.ops().len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Runs the operation. Integer overflow wraps, so check
    /// [`Operation::would_overflow`] first when that matters.
    ///
    /// # Panics
    ///
    /// If `value` is not of the operation's input kind.
    pub fn apply(&self, value: Value) -> Value {
        assert_input_kind(self, &value);
        match self {
            Operation::StaticCast(op) => match value.cast(op.to) {
                Some(value) => value,
                None => unreachable!("complex to real casts are rejected on construction"),
            },
            Operation::Multiply(op) => {
                let kind = op.rep.real_part();
                value.map(|x| multiply(kind, x, op.value))
            }
            Operation::Divide(op) => {
                let kind = op.rep.real_part();
                match op.value {
                    Some(divisor) => value.map(|x| divide(kind, x, divisor)),
                    None => value.map(|_| ScalarValue::zero(kind)),
                }
            }
            Operation::Sequence(seq) => seq.ops.iter().fold(value, |value, op| op.apply(value)),
        }
    }
}

pub(crate) fn assert_input_kind(op: &Operation, value: &Value) {
    assert_eq!(
        value.kind(),
        op.input(),
        "`{op}` can not take a value of kind {}",
        value.kind()
    );
}

fn multiply(kind: ScalarKind, x: ScalarValue, by: ScalarValue) -> ScalarValue {
    with_scalar!(kind, |T| T::cast_from(x)
        .wrapping_mul(T::cast_from(by))
        .into_value())
}

fn divide(kind: ScalarKind, x: ScalarValue, by: ScalarValue) -> ScalarValue {
    with_scalar!(kind, |T| T::cast_from(x)
        .wrapping_div(T::cast_from(by))
        .into_value())
}

impl Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::StaticCast(op) => write!(f, "StaticCast<{}, {}>", op.from, op.to),
            Operation::Multiply(op) => write!(f, "MultiplyTypeBy<{}, {}>", op.rep, op.factor),
            Operation::Divide(op) => {
                write!(f, "DivideTypeByInteger<{}, {}>", op.rep, op.divisor)
            }
            Operation::Sequence(seq) => write!(f, "OpSequence<{}>", seq.ops.iter().format(", ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use magnitude::{mag, Magnitude, RepresentationError};
    use rep::{
        Complex, RepKind,
        ScalarKind::{self, *},
        ScalarValue, Value,
    };

    use super::{OpSequence, Operation};
    use crate::ConversionError;

    fn real(kind: ScalarKind) -> RepKind {
        RepKind::Real(kind)
    }

    #[test]
    fn construction_checks() {
        assert!(Operation::multiply(real(I32), mag(1000)).is_ok());
        assert!(Operation::multiply(real(I8), mag(1000)).is_ok());
        assert!(Operation::multiply(real(U32), -mag(2)).is_ok());
        assert!(Operation::multiply(real(F32), mag(10).pow(50)).is_ok());
        assert_eq!(
            Operation::multiply(real(I32), mag(1) / mag(2)),
            Err(ConversionError::InvalidFactor {
                rep: real(I32),
                factor: mag(1) / mag(2),
                reason: RepresentationError::NonIntegerInIntegerType
            })
        );
        assert!(Operation::multiply(real(I64), Magnitude::pi()).is_err());
        assert!(Operation::multiply(real(F32), Magnitude::pi()).is_ok());

        assert!(Operation::divide(real(I8), mag(1000)).is_ok());
        assert!(Operation::divide(real(U16), -mag(3)).is_ok());
        assert!(Operation::divide(real(F64), mag(1) / mag(3)).is_err());

        assert!(Operation::cast(RepKind::Complex(F32), real(F32)).is_err());
        assert!(Operation::cast(real(F32), RepKind::Complex(F64)).is_ok());
    }

    #[test]
    fn sequences_flatten_and_check_types() {
        let inner = Operation::sequence([
            Operation::cast(real(U8), real(I32)).unwrap(),
            Operation::multiply(real(I32), mag(3)).unwrap(),
        ])
        .unwrap();
        let outer = Operation::sequence([
            inner,
            Operation::divide(real(I32), mag(2)).unwrap(),
        ])
        .unwrap();
        assert_eq!(outer.len(), 3);
        assert!(outer.ops().iter().all(|op| !matches!(op, Operation::Sequence(_))));
        assert_eq!(outer.input(), real(U8));
        assert_eq!(outer.output(), real(I32));

        assert_eq!(
            Operation::sequence([
                Operation::cast(real(U8), real(I32)).unwrap(),
                Operation::multiply(real(I64), mag(3)).unwrap(),
            ]),
            Err(ConversionError::SequenceMismatch {
                output: real(I32),
                input: real(I64)
            })
        );
        assert_eq!(OpSequence::new([]), Err(ConversionError::EmptySequence));

        let single = Operation::sequence([Operation::multiply(real(I8), mag(2)).unwrap()]);
        assert!(matches!(single, Ok(Operation::Multiply(_))));
    }

    #[test]
    fn apply_runs_left_to_right() {
        let op = Operation::sequence([
            Operation::multiply(real(I32), mag(3)).unwrap(),
            Operation::divide(real(I32), mag(2)).unwrap(),
        ])
        .unwrap();
        assert_eq!(
            op.apply(Value::Real(ScalarValue::I32(5))),
            Value::Real(ScalarValue::I32(7))
        );
    }

    #[test]
    fn apply_to_complex_values() {
        let kind = RepKind::Complex(I32);
        let op = Operation::multiply(kind, -mag(2)).unwrap();
        let value = Value::Complex(Complex::new(ScalarValue::I32(3), ScalarValue::I32(-4)));
        assert_eq!(
            op.apply(value),
            Value::Complex(Complex::new(ScalarValue::I32(-6), ScalarValue::I32(8)))
        );
    }

    #[test]
    fn oversized_divisor_gives_zero() {
        let op = Operation::divide(real(I8), mag(1000)).unwrap();
        assert_eq!(
            op.apply(Value::Real(ScalarValue::I8(-128))),
            Value::Real(ScalarValue::I8(0))
        );
    }

    #[test]
    fn out_of_range_factors_wrap() {
        let op = Operation::multiply(real(U32), -mag(1)).unwrap();
        assert_eq!(
            op.apply(Value::Real(ScalarValue::U32(5))),
            Value::Real(ScalarValue::U32(u32::MAX - 4))
        );

        let op = Operation::multiply(real(I8), mag(1000)).unwrap();
        assert_eq!(
            op.apply(Value::Real(ScalarValue::I8(1))),
            Value::Real(ScalarValue::I8(1000_i32 as i8))
        );
        assert_eq!(
            op.apply(Value::Real(ScalarValue::I8(0))),
            Value::Real(ScalarValue::I8(0))
        );

        let op = Operation::multiply(real(F32), mag(10).pow(50)).unwrap();
        assert_eq!(
            op.apply(Value::Real(ScalarValue::F32(-2.0))),
            Value::Real(ScalarValue::F32(f32::NEG_INFINITY))
        );
    }

    #[test]
    fn negative_divisor_on_unsigned_gives_zero() {
        let op = Operation::divide(real(U16), -mag(3)).unwrap();
        assert!(matches!(&op, Operation::Divide(div) if div.value().is_none()));
        assert_eq!(
            op.apply(Value::Real(ScalarValue::U16(u16::MAX))),
            Value::Real(ScalarValue::U16(0))
        );
    }

    #[test]
    #[should_panic]
    fn apply_rejects_wrong_kind() {
        let op = Operation::multiply(real(I32), mag(3)).unwrap();
        op.apply(Value::Real(ScalarValue::I64(5)));
    }

    #[test]
    fn display() {
        let op = Operation::sequence([
            Operation::cast(real(U16), real(I32)).unwrap(),
            Operation::multiply(real(I32), mag(3)).unwrap(),
        ])
        .unwrap();
        assert_eq!(
            op.to_string(),
            "OpSequence<StaticCast<u16, i32>, MultiplyTypeBy<i32, 3>>"
        );
    }
}

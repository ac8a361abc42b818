use std::fmt::{self, Debug, Display};

use num_complex::Complex;
use serde::{Deserialize, Serialize};

use crate::{ParseRepError, RepKind, Scalar, ScalarKind, ScalarValue};

/// A value of any [`RepKind`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Value {
    Real(ScalarValue),
    Complex(Complex<ScalarValue>),
}

/// A typed value that can be fed through a conversion.
pub trait Rep: Copy + Debug + Send + Sync + 'static {
    const KIND: RepKind;

    /// The scalar type of the value, or of each component.
    type Real: Scalar;

    fn into_value(self) -> Value;
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! impl_rep {
    ($($t:ty),*) => {$(
        impl Rep for $t {
            const KIND: RepKind = RepKind::Real(<$t as Scalar>::KIND);
            type Real = $t;

            fn into_value(self) -> Value {
                Value::Real(Scalar::into_value(self))
            }

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::Real(x) => <$t as Scalar>::from_value(x),
                    Value::Complex(_) => None,
                }
            }
        }
    )*};
}

impl_rep!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

impl<T: Scalar> Rep for Complex<T> {
    const KIND: RepKind = RepKind::Complex(T::KIND);
    type Real = T;

    fn into_value(self) -> Value {
        Value::Complex(Complex::new(
            Scalar::into_value(self.re),
            Scalar::into_value(self.im),
        ))
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Complex(c) => Some(Complex::new(
                <T as Scalar>::from_value(c.re)?,
                <T as Scalar>::from_value(c.im)?,
            )),
            Value::Real(_) => None,
        }
    }
}

impl Value {
    pub fn kind(&self) -> RepKind {
        match self {
            Value::Real(x) => RepKind::Real(x.kind()),
            Value::Complex(c) => RepKind::Complex(c.re.kind()),
        }
    }

    /// Applies `f` to the value, or to each component of a complex value.
    pub fn map(self, mut f: impl FnMut(ScalarValue) -> ScalarValue) -> Value {
        match self {
            Value::Real(x) => Value::Real(f(x)),
            Value::Complex(c) => Value::Complex(Complex::new(f(c.re), f(c.im))),
        }
    }

    /// The scalar components: one for real values, two for complex ones.
    pub fn components(&self) -> Vec<ScalarValue> {
        match self {
            Value::Real(x) => vec![*x],
            Value::Complex(c) => vec![c.re, c.im],
        }
    }

    /// Converts between representations. Real values gain a zero imaginary
    /// part; complex values cannot become real.
    pub fn cast(self, kind: RepKind) -> Option<Value> {
        match (self, kind) {
            (Value::Real(x), RepKind::Real(k)) => Some(Value::Real(x.cast(k))),
            (Value::Real(x), RepKind::Complex(k)) => Some(Value::Complex(Complex::new(
                x.cast(k),
                ScalarValue::zero(k),
            ))),
            (Value::Complex(c), RepKind::Complex(k)) => {
                Some(Value::Complex(Complex::new(c.re.cast(k), c.im.cast(k))))
            }
            (Value::Complex(_), RepKind::Real(_)) => None,
        }
    }

    /// Parses a literal for `kind`. Complex literals are written `re,im`.
    pub fn parse(kind: RepKind, s: &str) -> Result<Value, ParseRepError> {
        match kind {
            RepKind::Real(k) => Ok(Value::Real(ScalarValue::parse(k, s)?)),
            RepKind::Complex(k) => {
                let (re, im) = s
                    .split_once(',')
                    .ok_or_else(|| ParseRepError::MissingImaginary(s.trim().to_owned()))?;
                Ok(Value::Complex(Complex::new(
                    ScalarValue::parse(k, re)?,
                    ScalarValue::parse(k, im)?,
                )))
            }
        }
    }

    pub fn real_kind(&self) -> ScalarKind {
        self.kind().real_part()
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Real(x) => write!(f, "{x}"),
            Value::Complex(c) => write!(f, "({}, {})", c.re, c.im),
        }
    }
}

impl From<ScalarValue> for Value {
    fn from(value: ScalarValue) -> Self {
        Value::Real(value)
    }
}

#[cfg(test)]
mod tests {
    use num_complex::Complex;

    use super::{Rep, Value};
    use crate::{RepKind, ScalarKind, ScalarValue};

    #[test]
    fn typed_round_trip() {
        let c = Complex::new(3_i16, -4);
        assert_eq!(Complex::<i16>::from_value(c.into_value()), Some(c));
        assert_eq!(<Complex<i16> as Rep>::KIND, RepKind::Complex(ScalarKind::I16));
        assert_eq!(u8::from_value(7_u16.into_value()), None);
    }

    #[test]
    fn cast_to_complex() {
        let value = Value::Real(ScalarValue::I32(5));
        let cast = value.cast(RepKind::Complex(ScalarKind::F64)).unwrap();
        assert_eq!(
            cast,
            Value::Complex(Complex::new(ScalarValue::F64(5.0), ScalarValue::F64(0.0)))
        );
        assert_eq!(cast.cast(RepKind::Real(ScalarKind::F64)), None);
    }

    #[test]
    fn parse_complex_literal() {
        let kind = RepKind::Complex(ScalarKind::I8);
        assert_eq!(
            Value::parse(kind, "1, -2").unwrap(),
            Value::Complex(Complex::new(ScalarValue::I8(1), ScalarValue::I8(-2)))
        );
        assert!(Value::parse(kind, "1").is_err());
    }
}

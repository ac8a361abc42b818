use std::fmt::{self, Debug, Display};

use num_traits::{Bounded, Num, NumCast};
use serde::{Deserialize, Serialize};

use crate::{ParseRepError, ScalarKind};

/// A primitive numeric type that can take part in a conversion.
pub trait Scalar:
    Copy + Debug + Display + PartialOrd + Num + Bounded + NumCast + Send + Sync + 'static
{
    const KIND: ScalarKind;

    /// Widest type of the same category, used for intermediate computations.
    type Wide: Scalar;

    fn into_value(self) -> ScalarValue;
    /// Exact extraction, `None` if the value holds another kind.
    fn from_value(value: ScalarValue) -> Option<Self>;
    /// Converts with the semantics of an `as` cast.
    fn cast_from(value: ScalarValue) -> Self;

    /// Negation that stays inside the type's range. Unsigned types clamp
    /// to zero and signed integers saturate.
    fn clamped_neg(self) -> Self;
    /// True if the value has no fractional part.
    fn is_whole(self) -> bool;

    fn wrapping_mul(self, rhs: Self) -> Self;
    fn wrapping_div(self, rhs: Self) -> Self;
    /// Remainder, `None` for a zero divisor or an overflowing integer
    /// division.
    fn checked_rem(self, rhs: Self) -> Option<Self>;
    /// Integer multiplication that clamps at the type's bounds. Floats
    /// multiply normally.
    fn saturating_mul(self, rhs: Self) -> Self;

    /// The most negative finite value.
    fn lowest() -> Self {
        Self::min_value()
    }

    fn highest() -> Self {
        Self::max_value()
    }

    fn cast<U: Scalar>(self) -> U {
        U::cast_from(self.into_value())
    }
}

/// A scalar of any kind, tagged at runtime.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ScalarValue {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
}

macro_rules! scalar_common {
    ($t:ty, $kind:ident, $wide:ty) => {
        const KIND: ScalarKind = ScalarKind::$kind;
        type Wide = $wide;

        fn into_value(self) -> ScalarValue {
            ScalarValue::$kind(self)
        }

        fn from_value(value: ScalarValue) -> Option<Self> {
            match value {
                ScalarValue::$kind(x) => Some(x),
                _ => None,
            }
        }

        fn cast_from(value: ScalarValue) -> Self {
            match value {
                ScalarValue::F32(x) => x as $t,
                ScalarValue::F64(x) => x as $t,
                other => other.as_i128() as $t,
            }
        }
    };
}

macro_rules! impl_signed {
    ($($t:ty => $kind:ident),*) => {$(
        impl Scalar for $t {
            scalar_common!($t, $kind, i64);

            fn clamped_neg(self) -> Self {
                self.saturating_neg()
            }

            fn is_whole(self) -> bool {
                true
            }

            fn wrapping_mul(self, rhs: Self) -> Self {
                <$t>::wrapping_mul(self, rhs)
            }

            fn wrapping_div(self, rhs: Self) -> Self {
                <$t>::wrapping_div(self, rhs)
            }

            fn checked_rem(self, rhs: Self) -> Option<Self> {
                <$t>::checked_rem(self, rhs)
            }

            fn saturating_mul(self, rhs: Self) -> Self {
                <$t>::saturating_mul(self, rhs)
            }
        }
    )*};
}

macro_rules! impl_unsigned {
    ($($t:ty => $kind:ident),*) => {$(
        impl Scalar for $t {
            scalar_common!($t, $kind, u64);

            fn clamped_neg(self) -> Self {
                0
            }

            fn is_whole(self) -> bool {
                true
            }

            fn wrapping_mul(self, rhs: Self) -> Self {
                <$t>::wrapping_mul(self, rhs)
            }

            fn wrapping_div(self, rhs: Self) -> Self {
                <$t>::wrapping_div(self, rhs)
            }

            fn checked_rem(self, rhs: Self) -> Option<Self> {
                <$t>::checked_rem(self, rhs)
            }

            fn saturating_mul(self, rhs: Self) -> Self {
                <$t>::saturating_mul(self, rhs)
            }
        }
    )*};
}

macro_rules! impl_float {
    ($($t:ty => $kind:ident),*) => {$(
        impl Scalar for $t {
            scalar_common!($t, $kind, f64);

            fn clamped_neg(self) -> Self {
                -self
            }

            fn is_whole(self) -> bool {
                self.trunc() == self
            }

            fn wrapping_mul(self, rhs: Self) -> Self {
                self * rhs
            }

            fn wrapping_div(self, rhs: Self) -> Self {
                self / rhs
            }

            fn checked_rem(self, rhs: Self) -> Option<Self> {
                (rhs != 0.0).then(|| self % rhs)
            }

            fn saturating_mul(self, rhs: Self) -> Self {
                self * rhs
            }
        }
    )*};
}

impl_signed!(i8 => I8, i16 => I16, i32 => I32, i64 => I64);
impl_unsigned!(u8 => U8, u16 => U16, u32 => U32, u64 => U64);
impl_float!(f32 => F32, f64 => F64);

/// Runs `$body` with `$t` bound as a type alias to the primitive matching a
/// runtime [`ScalarKind`].
#[macro_export]
macro_rules! with_scalar {
    ($kind:expr, |$t:ident| $body:expr) => {
        match $kind {
            $crate::ScalarKind::I8 => {
                type $t = i8;
                $body
            }
            $crate::ScalarKind::I16 => {
                type $t = i16;
                $body
            }
            $crate::ScalarKind::I32 => {
                type $t = i32;
                $body
            }
            $crate::ScalarKind::I64 => {
                type $t = i64;
                $body
            }
            $crate::ScalarKind::U8 => {
                type $t = u8;
                $body
            }
            $crate::ScalarKind::U16 => {
                type $t = u16;
                $body
            }
            $crate::ScalarKind::U32 => {
                type $t = u32;
                $body
            }
            $crate::ScalarKind::U64 => {
                type $t = u64;
                $body
            }
            $crate::ScalarKind::F32 => {
                type $t = f32;
                $body
            }
            $crate::ScalarKind::F64 => {
                type $t = f64;
                $body
            }
        }
    };
}

impl ScalarValue {
    pub fn kind(self) -> ScalarKind {
        match self {
            ScalarValue::I8(_) => ScalarKind::I8,
            ScalarValue::I16(_) => ScalarKind::I16,
            ScalarValue::I32(_) => ScalarKind::I32,
            ScalarValue::I64(_) => ScalarKind::I64,
            ScalarValue::U8(_) => ScalarKind::U8,
            ScalarValue::U16(_) => ScalarKind::U16,
            ScalarValue::U32(_) => ScalarKind::U32,
            ScalarValue::U64(_) => ScalarKind::U64,
            ScalarValue::F32(_) => ScalarKind::F32,
            ScalarValue::F64(_) => ScalarKind::F64,
        }
    }

    pub fn zero(kind: ScalarKind) -> Self {
        with_scalar!(kind, |T| <T as num_traits::Zero>::zero().into_value())
    }

    /// Converts to another kind with `as` semantics.
    pub fn cast(self, kind: ScalarKind) -> Self {
        with_scalar!(kind, |T| T::cast_from(self).into_value())
    }

    pub fn extract<T: Scalar>(self) -> Option<T> {
        T::from_value(self)
    }

    pub fn is_zero(self) -> bool {
        self.as_f64() == 0.0
    }

    /// Lossy view used for display and ordering checks.
    pub fn as_f64(self) -> f64 {
        match self {
            ScalarValue::F32(x) => x as f64,
            ScalarValue::F64(x) => x,
            other => other.as_i128() as f64,
        }
    }

    /// Parses `s` as a literal of the given kind.
    pub fn parse(kind: ScalarKind, s: &str) -> Result<Self, ParseRepError> {
        let s = s.trim();
        let invalid = || ParseRepError::InvalidLiteral {
            kind,
            literal: s.to_owned(),
        };
        with_scalar!(kind, |T| s
            .parse::<T>()
            .map(Scalar::into_value)
            .map_err(|_| invalid()))
    }

    pub(crate) fn as_i128(self) -> i128 {
        match self {
            ScalarValue::I8(x) => x as i128,
            ScalarValue::I16(x) => x as i128,
            ScalarValue::I32(x) => x as i128,
            ScalarValue::I64(x) => x as i128,
            ScalarValue::U8(x) => x as i128,
            ScalarValue::U16(x) => x as i128,
            ScalarValue::U32(x) => x as i128,
            ScalarValue::U64(x) => x as i128,
            ScalarValue::F32(x) => x as i128,
            ScalarValue::F64(x) => x as i128,
        }
    }
}

impl Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::I8(x) => Display::fmt(x, f),
            ScalarValue::I16(x) => Display::fmt(x, f),
            ScalarValue::I32(x) => Display::fmt(x, f),
            ScalarValue::I64(x) => Display::fmt(x, f),
            ScalarValue::U8(x) => Display::fmt(x, f),
            ScalarValue::U16(x) => Display::fmt(x, f),
            ScalarValue::U32(x) => Display::fmt(x, f),
            ScalarValue::U64(x) => Display::fmt(x, f),
            ScalarValue::F32(x) => Display::fmt(x, f),
            ScalarValue::F64(x) => Display::fmt(x, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{Scalar, ScalarValue};
    use crate::ScalarKind;

    #[test]
    fn cast_matches_as() {
        assert_eq!(300_i32.cast::<u8>(), 44);
        assert_eq!((-1_i8).cast::<u64>(), u64::MAX);
        assert_eq!(1e10_f64.cast::<i32>(), i32::MAX);
        assert_eq!((-3.9_f32).cast::<i16>(), -3);
        assert_eq!(u64::MAX.cast::<f32>(), u64::MAX as f32);
    }

    #[test]
    fn clamped_negation() {
        assert_eq!(5_u32.clamped_neg(), 0);
        assert_eq!(i8::MIN.clamped_neg(), i8::MAX);
        assert_eq!(2.5_f64.clamped_neg(), -2.5);
    }

    #[test]
    fn remainders() {
        assert_eq!(Scalar::checked_rem(701_i32, 700), Some(1));
        assert_eq!(Scalar::checked_rem(i8::MIN, -1), None);
        assert_eq!(Scalar::checked_rem(5_u8, 0), None);
        assert_eq!(Scalar::checked_rem(7.5_f64, 2.0), Some(1.5));
    }

    #[test]
    fn parse_literals() {
        assert_eq!(
            ScalarValue::parse(ScalarKind::U8, " 255 ").unwrap(),
            ScalarValue::U8(255)
        );
        assert!(ScalarValue::parse(ScalarKind::U8, "256").is_err());
        assert!(ScalarValue::parse(ScalarKind::I32, "1.5").is_err());
        assert_eq!(
            ScalarValue::parse(ScalarKind::F32, "1.5").unwrap(),
            ScalarValue::F32(1.5)
        );
    }

    #[test]
    fn lowest_and_highest() {
        assert_eq!(f32::lowest(), f32::MIN);
        assert_eq!(u16::lowest(), 0);
        assert_eq!(i16::highest(), i16::MAX);
    }

    proptest! {
        #[test]
        fn dynamic_cast_agrees_with_typed(x: i64) {
            for kind in ScalarKind::ALL {
                let dynamic = ScalarValue::I64(x).cast(kind);
                prop_assert_eq!(dynamic.kind(), kind);
            }
            prop_assert_eq!(ScalarValue::I64(x).cast(ScalarKind::I16), ScalarValue::I16(x as i16));
            prop_assert_eq!(ScalarValue::I64(x).cast(ScalarKind::U32), ScalarValue::U32(x as u32));
            prop_assert_eq!(ScalarValue::I64(x).cast(ScalarKind::F64), ScalarValue::F64(x as f64));
        }
    }
}

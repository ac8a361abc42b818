use std::{
    fmt::{self, Debug, Display},
    marker::PhantomData,
};

use magnitude::Magnitude;
use rep::{Rep, Scalar};

use crate::{synthesize, ConversionError, Operation};

/// A conversion from `Old` to `New` values, scaling by a magnitude.
pub struct Conversion<Old, New> {
    op: Operation,
    factor: Magnitude,
    _rep: PhantomData<fn(Old) -> New>,
}

impl<Old: Rep, New: Rep> Conversion<Old, New> {
    pub fn new(factor: Magnitude) -> Result<Self, ConversionError> {
        let op = synthesize(Old::KIND, New::KIND, &factor)?;
        Ok(Self {
            op,
            factor,
            _rep: PhantomData,
        })
    }

    pub fn operation(&self) -> &Operation {
        &self.op
    }

    pub fn factor(&self) -> &Magnitude {
        &self.factor
    }

    /// Converts `value`. Overflow wraps and integer division truncates; use
    /// [`Conversion::is_lossy`] to find out beforehand.
    pub fn apply(&self, value: Old) -> New {
        match New::from_value(self.op.apply(value.into_value())) {
            Some(value) => value,
            None => unreachable!("`{}` produced a value of the wrong kind", self.op),
        }
    }

    /// [`Conversion::apply`], unless the value would overflow or truncate.
    pub fn checked_apply(&self, value: Old) -> Option<New> {
        (!self.is_lossy(value)).then(|| self.apply(value))
    }

    pub fn would_overflow(&self, value: Old) -> bool {
        self.op.would_overflow(&value.into_value())
    }

    pub fn would_truncate(&self, value: Old) -> bool {
        self.op.would_truncate(&value.into_value())
    }

    pub fn is_lossy(&self, value: Old) -> bool {
        self.would_overflow(value) || self.would_truncate(value)
    }

    pub fn min_good(&self) -> Old::Real {
        <Old::Real as Scalar>::cast_from(self.op.min_good())
    }

    pub fn max_good(&self) -> Old::Real {
        <Old::Real as Scalar>::cast_from(self.op.max_good())
    }
}

impl<Old, New> Clone for Conversion<Old, New> {
    fn clone(&self) -> Self {
        Self {
            op: self.op.clone(),
            factor: self.factor.clone(),
            _rep: PhantomData,
        }
    }
}

impl<Old: Rep, New: Rep> Debug for Conversion<Old, New> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conversion")
            .field("from", &Old::KIND)
            .field("to", &New::KIND)
            .field("factor", &self.factor)
            .field("op", &self.op)
            .finish()
    }
}

impl<Old: Rep, New: Rep> Display for Conversion<Old, New> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.op, f)
    }
}

#[cfg(test)]
mod tests {
    use magnitude::{mag, Magnitude};
    use proptest::prelude::*;
    use rep::Complex;

    use super::Conversion;

    #[test]
    fn millimeters_to_meters() {
        let conversion = Conversion::<i32, i32>::new(mag(1) / mag(1000)).unwrap();
        assert_eq!(conversion.apply(5000), 5);
        assert!(!conversion.would_truncate(5000));
        assert!(conversion.would_truncate(5001));
        assert_eq!(conversion.checked_apply(5001), None);
        assert_eq!(conversion.checked_apply(-7000), Some(-7));
    }

    #[test]
    fn narrowing_output() {
        let conversion = Conversion::<u16, u8>::new(mag(2)).unwrap();
        assert_eq!(conversion.max_good(), 127);
        assert_eq!(conversion.min_good(), 0);
        assert_eq!(conversion.apply(100), 200);
        assert!(conversion.would_overflow(128));
    }

    #[test]
    fn degrees_to_radians() {
        let conversion = Conversion::<f64, f64>::new(Magnitude::pi() / mag(180)).unwrap();
        let radians = conversion.apply(180.0);
        assert!((radians - std::f64::consts::PI).abs() < 1e-12);
        assert!(Conversion::<i32, i32>::new(Magnitude::pi() / mag(180)).is_err());
    }

    #[test]
    fn into_complex() {
        let conversion = Conversion::<i16, Complex<f32>>::new(mag(3)).unwrap();
        assert_eq!(conversion.apply(-4), Complex::new(-12.0, 0.0));
        assert_eq!(conversion.to_string(), conversion.operation().to_string());
    }

    proptest! {
        #[test]
        fn checked_apply_is_exact(x: i16) {
            let conversion = Conversion::<i16, i8>::new(mag(1) / mag(4)).unwrap();
            match conversion.checked_apply(x) {
                Some(y) => prop_assert_eq!(y as i16 * 4, x),
                None => prop_assert!(x % 4 != 0 || !(-512..=511).contains(&x)),
            }
        }
    }
}

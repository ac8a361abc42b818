use std::fmt::{self, Display};

use rep::Scalar;
use serde::{Deserialize, Serialize};

use crate::{Magnitude, MagnitudeError};

/// How a magnitude has to be applied to a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyAs {
    /// Multiply by an integer.
    IntegerMultiply,
    /// Divide by an integer (the magnitude is the inverse of one).
    IntegerDivide,
    /// Multiply by the numerator, then divide by the denominator.
    RationalMultiply,
    /// Multiply by a floating point approximation.
    IrrationalMultiply,
}

pub fn categorize_magnitude(m: &Magnitude) -> ApplyAs {
    if m.is_integer() {
        ApplyAs::IntegerMultiply
    } else if m.inverse().is_integer() {
        ApplyAs::IntegerDivide
    } else if m.is_rational() {
        ApplyAs::RationalMultiply
    } else {
        ApplyAs::IrrationalMultiply
    }
}

/// Applies `m` to `x` entirely within `T`.
///
/// Integer overflow wraps; irrational magnitudes can only be applied to
/// floating point values.
pub fn apply_magnitude<T: Scalar>(x: T, m: &Magnitude) -> Result<T, MagnitudeError> {
    Ok(match categorize_magnitude(m) {
        ApplyAs::IntegerMultiply => x.wrapping_mul(m.get_value()?),
        ApplyAs::IntegerDivide => x.wrapping_div(m.inverse().get_value()?),
        ApplyAs::RationalMultiply if T::KIND.is_integral() => x
            .wrapping_mul(m.numerator().get_value()?)
            .wrapping_div(m.denominator().get_value()?),
        ApplyAs::RationalMultiply => x * m.get_value()?,
        ApplyAs::IrrationalMultiply if T::KIND.is_integral() => {
            return Err(MagnitudeError::IrrationalOnIntegral)
        }
        ApplyAs::IrrationalMultiply => x * m.get_value()?,
    })
}

impl Display for ApplyAs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ApplyAs::IntegerMultiply => "integer multiply",
            ApplyAs::IntegerDivide => "integer divide",
            ApplyAs::RationalMultiply => "rational multiply",
            ApplyAs::IrrationalMultiply => "irrational multiply",
        })
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{apply_magnitude, categorize_magnitude, ApplyAs};
    use crate::{mag, Magnitude, MagnitudeError, RepresentationError};

    #[test]
    fn categories() {
        assert_eq!(categorize_magnitude(&mag(1)), ApplyAs::IntegerMultiply);
        assert_eq!(categorize_magnitude(&-mag(12)), ApplyAs::IntegerMultiply);
        assert_eq!(categorize_magnitude(&(mag(1) / mag(13))), ApplyAs::IntegerDivide);
        assert_eq!(categorize_magnitude(&-(mag(1) / mag(13))), ApplyAs::IntegerDivide);
        assert_eq!(categorize_magnitude(&(mag(3) / mag(2))), ApplyAs::RationalMultiply);
        assert_eq!(categorize_magnitude(&Magnitude::pi()), ApplyAs::IrrationalMultiply);
        assert_eq!(
            categorize_magnitude(&mag(2).root(2).unwrap()),
            ApplyAs::IrrationalMultiply
        );
    }

    #[test]
    fn apply_to_integers() {
        assert_eq!(apply_magnitude(5_i32, &(mag(3) / mag(2))), Ok(7));
        assert_eq!(apply_magnitude(5_i32, &-(mag(3) / mag(2))), Ok(-7));
        assert_eq!(apply_magnitude(12_u8, &mag(10)), Ok(120));
        assert_eq!(apply_magnitude(125_u16, &(mag(1) / mag(25))), Ok(5));
        assert_eq!(apply_magnitude(126_u16, &(mag(1) / mag(25))), Ok(5));
        assert_eq!(
            apply_magnitude(3_i64, &Magnitude::pi()),
            Err(MagnitudeError::IrrationalOnIntegral)
        );
        assert_eq!(
            apply_magnitude(3_u8, &mag(1000)),
            Err(MagnitudeError::Representation(RepresentationError::CannotFit))
        );
    }

    #[test]
    fn apply_to_floats() {
        assert_eq!(apply_magnitude(2.0_f64, &(mag(1) / mag(8))), Ok(0.25));
        assert_eq!(apply_magnitude(1.0_f32, &(mag(3) / mag(2))), Ok(1.5));
        let circle = apply_magnitude(2.0_f64, &Magnitude::pi()).unwrap();
        assert_eq!(circle, 2.0 * std::f64::consts::PI);
    }

    /// Dividing by the exact integer inverse is what keeps `-1/13` exact:
    /// multiplying by the rounded reciprocal is not.
    #[test]
    fn division_preserves_exactness() {
        let m = -(mag(1) / mag(13));
        let reciprocal = m.get_value::<f32>().unwrap();
        let mut rounding_seen = false;
        for i in 1..=100 {
            let input = -13.0 * i as f32;
            assert_eq!(apply_magnitude(input, &m), Ok(i as f32));
            rounding_seen |= input * reciprocal != i as f32;
        }
        assert!(rounding_seen);
    }

    proptest! {
        #[test]
        fn categories_are_exhaustive(num in 1_u64..2000, den in 1_u64..2000, root in 1_i64..4) {
            let m = (mag(num) / mag(den)).root(root).unwrap();
            let category = categorize_magnitude(&m);
            match category {
                ApplyAs::IntegerMultiply => prop_assert!(m.is_integer()),
                ApplyAs::IntegerDivide => {
                    prop_assert!(!m.is_integer());
                    prop_assert!(m.inverse().is_integer());
                }
                ApplyAs::RationalMultiply => {
                    prop_assert!(!m.is_integer() && !m.inverse().is_integer());
                    prop_assert!(m.is_rational());
                }
                ApplyAs::IrrationalMultiply => prop_assert!(!m.is_rational()),
            }
        }

        #[test]
        fn integer_scaling_round_trips(x in -1000_i32..1000, n in 1_u64..1000) {
            let up = apply_magnitude(x, &mag(n)).unwrap();
            prop_assert_eq!(apply_magnitude(up, &mag(n).inverse()), Ok(x));
        }
    }
}

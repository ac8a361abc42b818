use std::{
    fmt::{self, Debug, Display},
    ops::{Div, Mul, Neg},
};

use itertools::Itertools;
use num_traits::{CheckedAdd, CheckedMul, Signed, Zero};

use crate::{
    factoring::{is_prime, prime_factorization},
    pack::{checked, BasePower, Exponent, Pack, PackBase},
    ExponentOverflow, MagnitudeError,
};

/// The bases a magnitude is built from. The derived ordering (sign marker,
/// then primes by value, then π) is the canonical term order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MagBase {
    /// Stands for `-1`. Only ever appears with exponent one.
    Negative,
    Prime(u64),
    Pi,
}

impl PackBase for MagBase {
    type Error = MagnitudeError;

    fn sum_exponents(&self, a: Exponent, b: Exponent) -> Result<Option<Exponent>, ExponentOverflow> {
        match self {
            // (-1) * (-1) = 1
            MagBase::Negative => Ok(None),
            _ => checked(a.checked_add(&b)),
        }
    }

    fn int_power(&self, exp: Exponent, n: i64) -> Result<Option<Exponent>, ExponentOverflow> {
        match self {
            MagBase::Negative => Ok((n % 2 != 0).then_some(exp)),
            _ => checked(exp.checked_mul(&Exponent::from_integer(n))),
        }
    }

    fn rational_power(&self, exp: Exponent, by: Exponent) -> Result<Option<Exponent>, Self::Error> {
        match self {
            MagBase::Negative if by.numer() % 2 == 0 => Ok(None),
            MagBase::Negative if by.denom() % 2 == 0 => Err(MagnitudeError::EvenRootOfNegative),
            MagBase::Negative => Ok(Some(exp)),
            _ => Ok(checked(exp.checked_mul(&by))?),
        }
    }

    fn invert(&self, exp: Exponent) -> Exponent {
        match self {
            MagBase::Negative => exp,
            _ => -exp,
        }
    }
}

/// A positive or negative real number, stored exactly as a product of
/// prime powers with rational exponents, π, and an optional sign.
///
/// Magnitudes are never zero. Equality is structural, which coincides with
/// numeric equality because the representation is canonical.
///
/// Exponents are `i64` ratios. The `*` and `/` operators and
/// [`Magnitude::pow`] panic if an exponent leaves that range; the `checked_`
/// methods report it instead.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Magnitude(Pack<MagBase>);

/// The magnitude of a positive integer.
///
/// # Panics
///
/// If `n` is zero, which has no magnitude.
pub fn mag(n: u64) -> Magnitude {
    match Magnitude::from_integer(n) {
        Some(m) => m,
        None => panic!("zero has no magnitude"),
    }
}

impl Magnitude {
    pub fn one() -> Self {
        Self(Pack::one())
    }

    pub fn negative_one() -> Self {
        Self(Pack::base_power(MagBase::Negative, Exponent::from_integer(1)))
    }

    pub fn pi() -> Self {
        Self(Pack::base_power(MagBase::Pi, Exponent::from_integer(1)))
    }

    /// `None` for zero.
    pub fn from_integer(n: u64) -> Option<Self> {
        if n == 0 {
            return None;
        }

        let powers = prime_factorization(n)
            .into_iter()
            .map(|(p, e)| (MagBase::Prime(p), Exponent::from_integer(e as i64)));
        Some(Self(or_overflow(Pack::from_powers(powers))))
    }

    pub fn prime_power(p: u64, exp: Exponent) -> Result<Self, MagnitudeError> {
        if !is_prime(p) {
            return Err(MagnitudeError::NotPrime(p));
        }
        checked(Some(exp))?;
        Ok(Self(Pack::base_power(MagBase::Prime(p), exp)))
    }

    pub fn powers(&self) -> &[BasePower<MagBase>] {
        self.0.powers()
    }

    pub fn exponent_of(&self, base: MagBase) -> Exponent {
        self.0.exponent_of(&base)
    }

    pub fn is_one(&self) -> bool {
        self.0.is_one()
    }

    pub fn is_positive(&self) -> bool {
        self.exponent_of(MagBase::Negative).is_zero()
    }

    pub fn abs(&self) -> Self {
        Self(self.0.filter(|p| p.base != MagBase::Negative))
    }

    /// `1` or `-1`.
    pub fn sign(&self) -> Self {
        if self.is_positive() {
            Self::one()
        } else {
            Self::negative_one()
        }
    }

    pub fn is_integer(&self) -> bool {
        self.powers().iter().all(|p| {
            p.base != MagBase::Pi && p.exp.is_integer() && p.exp.is_positive()
        })
    }

    /// True if every exponent is an integer and π is absent.
    pub fn is_rational(&self) -> bool {
        self.powers()
            .iter()
            .all(|p| p.base != MagBase::Pi && p.exp.is_integer())
    }

    /// The largest integer factor: the sign, plus every prime whose exponent
    /// is at least one, rounded down.
    pub fn integer_part(&self) -> Self {
        let powers = self.powers().iter().filter_map(|p| match p.base {
            MagBase::Negative => Some((p.base, p.exp)),
            MagBase::Prime(_) if p.exp >= Exponent::from_integer(1) => {
                Some((p.base, p.exp.floor()))
            }
            _ => None,
        });
        Self(or_overflow(Pack::from_powers(powers)))
    }

    /// Product of the positive powers, sign included.
    pub fn numerator(&self) -> Self {
        Self(self.0.numerator_part())
    }

    pub fn denominator(&self) -> Self {
        Self(self.0.denominator_part())
    }

    pub fn inverse(&self) -> Self {
        Self(self.0.inverse())
    }

    /// # Panics
    ///
    /// If an exponent overflows. See [`Magnitude::checked_pow`].
    pub fn pow(&self, n: i64) -> Self {
        Self(or_overflow(self.0.pow(n)))
    }

    pub fn checked_pow(&self, n: i64) -> Result<Self, MagnitudeError> {
        Ok(Self(self.0.pow(n)?))
    }

    pub fn checked_mul(&self, other: &Self) -> Result<Self, MagnitudeError> {
        Ok(Self(self.0.product(&other.0)?))
    }

    pub fn checked_div(&self, other: &Self) -> Result<Self, MagnitudeError> {
        Ok(Self(self.0.quotient(&other.0)?))
    }

    pub fn powr(&self, by: Exponent) -> Result<Self, MagnitudeError> {
        Ok(Self(self.0.powr(by)?))
    }

    pub fn root(&self, n: i64) -> Result<Self, MagnitudeError> {
        if n == 0 {
            return Err(MagnitudeError::ZerothRoot);
        }
        self.powr(Exponent::new(1, n))
    }

    /// The largest magnitude that divides both `self` and `other` an integer
    /// number of times.
    pub fn common_with(&self, other: &Self) -> Self {
        Self(self.0.elementwise_min(&other.0))
    }
}

/// Common magnitude of a set of magnitudes. `None` entries stand for zero,
/// which is a multiple of everything and so never constrains the result.
/// Returns `None` only if every entry is zero.
pub fn common_magnitude<'a>(
    mags: impl IntoIterator<Item = Option<&'a Magnitude>>,
) -> Option<Magnitude> {
    mags.into_iter().flatten().fold(None, |acc, m| {
        Some(match acc {
            Some(acc) => Magnitude::common_with(&acc, m),
            None => m.clone(),
        })
    })
}

fn or_overflow(pack: Result<Pack<MagBase>, ExponentOverflow>) -> Pack<MagBase> {
    match pack {
        Ok(pack) => pack,
        Err(err) => panic!("{err}"),
    }
}

macro_rules! impl_binop {
    ($trait:ident, $method:ident, $pack_method:ident) => {
        impl $trait<&Magnitude> for &Magnitude {
            type Output = Magnitude;

            fn $method(self, rhs: &Magnitude) -> Magnitude {
                Magnitude(or_overflow(self.0.$pack_method(&rhs.0)))
            }
        }

        impl $trait for Magnitude {
            type Output = Magnitude;

            fn $method(self, rhs: Magnitude) -> Magnitude {
                (&self).$method(&rhs)
            }
        }

        impl $trait<&Magnitude> for Magnitude {
            type Output = Magnitude;

            fn $method(self, rhs: &Magnitude) -> Magnitude {
                (&self).$method(rhs)
            }
        }
    };
}

impl_binop!(Mul, mul, product);
impl_binop!(Div, div, quotient);

impl Neg for &Magnitude {
    type Output = Magnitude;

    fn neg(self) -> Magnitude {
        self * &Magnitude::negative_one()
    }
}

impl Neg for Magnitude {
    type Output = Magnitude;

    fn neg(self) -> Magnitude {
        -&self
    }
}

impl Display for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_positive() {
            f.write_str("-")?;
        }

        let abs = self.abs();
        if abs.is_one() {
            return f.write_str("1");
        }

        let terms = abs.powers().iter().map(|p| {
            let base = match p.base {
                MagBase::Prime(n) => n.to_string(),
                _ => "π".to_owned(),
            };

            if p.exp == Exponent::from_integer(1) {
                base
            } else if p.exp.is_integer() {
                format!("{base}^{}", p.exp)
            } else {
                format!("{base}^({})", p.exp)
            }
        });
        write!(f, "{}", terms.format(" · "))
    }
}

impl Debug for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Magnitude({self})")
    }
}

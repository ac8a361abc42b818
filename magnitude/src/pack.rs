//! Sorted, deduplicated products of `base^exponent` terms.
//!
//! A [`Pack`] is kept in canonical form at all times: bases are strictly
//! increasing and no exponent is zero. Two packs describing the same product
//! are therefore structurally equal.

use std::{cmp::Ordering, convert::Infallible, fmt::Debug};

use num_rational::Ratio;
use num_traits::{CheckedAdd, CheckedMul, Signed, Zero};

use crate::ExponentOverflow;

/// Rational exponents, always kept in lowest terms with a positive denominator.
pub type Exponent = Ratio<i64>;

/// A base that can appear in a [`Pack`].
///
/// The defaults treat every base as an ordinary number. Bases with special
/// algebra (like a sign marker) override the exponent hooks. The hooks
/// return `Ok(None)` when the term cancels.
pub trait PackBase: Clone + Ord + Debug {
    type Error: From<ExponentOverflow>;

    /// Exponent of the product of two terms with this base. Both inputs are
    /// non-zero.
    fn sum_exponents(&self, a: Exponent, b: Exponent) -> Result<Option<Exponent>, ExponentOverflow> {
        checked(a.checked_add(&b))
    }

    /// Exponent after raising a term to an integer power.
    fn int_power(&self, exp: Exponent, n: i64) -> Result<Option<Exponent>, ExponentOverflow> {
        checked(exp.checked_mul(&Exponent::from_integer(n)))
    }

    /// Exponent after raising a term to a rational power.
    fn rational_power(&self, exp: Exponent, by: Exponent) -> Result<Option<Exponent>, Self::Error> {
        Ok(checked(exp.checked_mul(&by))?)
    }

    /// Exponent of the reciprocal of a term.
    fn invert(&self, exp: Exponent) -> Exponent {
        -exp
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BasePower<B> {
    pub base: B,
    pub exp: Exponent,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pack<B> {
    powers: Vec<BasePower<B>>,
}

fn non_zero(exp: Exponent) -> Option<Exponent> {
    (!exp.is_zero()).then_some(exp)
}

/// Numerators stay within `±i64::MAX`, so negating an exponent never
/// overflows.
pub(crate) fn checked(exp: Option<Exponent>) -> Result<Option<Exponent>, ExponentOverflow> {
    match exp {
        Some(exp) if *exp.numer() != i64::MIN => Ok(non_zero(exp)),
        _ => Err(ExponentOverflow),
    }
}

impl<B: PackBase> Pack<B> {
    /// The empty product.
    pub fn one() -> Self {
        Self { powers: Vec::new() }
    }

    pub fn base_power(base: B, exp: Exponent) -> Self {
        match non_zero(exp) {
            Some(exp) => Self {
                powers: vec![BasePower { base, exp }],
            },
            None => Self::one(),
        }
    }

    /// Builds a pack from terms in any order, merging repeated bases.
    pub fn from_powers(
        powers: impl IntoIterator<Item = (B, Exponent)>,
    ) -> Result<Self, ExponentOverflow> {
        powers.into_iter().try_fold(Self::one(), |acc, (base, exp)| {
            acc.product(&Self::base_power(base, exp))
        })
    }

    pub fn powers(&self) -> &[BasePower<B>] {
        &self.powers
    }

    pub fn is_one(&self) -> bool {
        self.powers.is_empty()
    }

    /// Exponent of `base`, zero if it is absent.
    pub fn exponent_of(&self, base: &B) -> Exponent {
        self.powers
            .binary_search_by(|p| p.base.cmp(base))
            .map(|idx| self.powers[idx].exp)
            .unwrap_or_else(|_| Exponent::zero())
    }

    pub fn product(&self, other: &Self) -> Result<Self, ExponentOverflow> {
        self.merge_with(other, |base, a, b| {
            if a.is_zero() {
                Ok(Some(b))
            } else if b.is_zero() {
                Ok(Some(a))
            } else {
                base.sum_exponents(a, b)
            }
        })
    }

    pub fn quotient(&self, other: &Self) -> Result<Self, ExponentOverflow> {
        self.product(&other.inverse())
    }

    pub fn inverse(&self) -> Self {
        let powers = self.powers.iter().map(|p| BasePower {
            base: p.base.clone(),
            exp: p.base.invert(p.exp),
        });
        Self {
            powers: powers.collect(),
        }
    }

    pub fn pow(&self, n: i64) -> Result<Self, ExponentOverflow> {
        self.map_exponents(|base, exp| base.int_power(exp, n))
    }

    pub fn powr(&self, by: Exponent) -> Result<Self, B::Error> {
        self.map_exponents(|base, exp| base.rational_power(exp, by))
    }

    /// Per-base minimum of the exponents, treating absent bases as zero.
    pub fn elementwise_min(&self, other: &Self) -> Self {
        let min = self.merge_with(other, |_, a, b| Ok::<_, Infallible>(non_zero(a.min(b))));
        match min {
            Ok(pack) => pack,
            Err(never) => match never {},
        }
    }

    /// The terms with positive exponents.
    pub fn numerator_part(&self) -> Self {
        self.filter(|p| p.exp.is_positive())
    }

    /// The terms with negative exponents, inverted.
    pub fn denominator_part(&self) -> Self {
        self.filter(|p| p.exp.is_negative()).inverse()
    }

    pub fn filter(&self, mut keep: impl FnMut(&BasePower<B>) -> bool) -> Self {
        Self {
            powers: self.powers.iter().filter(|p| keep(p)).cloned().collect(),
        }
    }

    fn map_exponents<E>(
        &self,
        mut f: impl FnMut(&B, Exponent) -> Result<Option<Exponent>, E>,
    ) -> Result<Self, E> {
        let mut powers = Vec::with_capacity(self.powers.len());
        for p in &self.powers {
            if let Some(exp) = f(&p.base, p.exp)? {
                powers.push(BasePower {
                    base: p.base.clone(),
                    exp,
                });
            }
        }
        Ok(Self { powers })
    }

    /// Walks both sorted term lists together. `combine` sees a zero exponent
    /// for bases missing on one side.
    fn merge_with<E>(
        &self,
        other: &Self,
        mut combine: impl FnMut(&B, Exponent, Exponent) -> Result<Option<Exponent>, E>,
    ) -> Result<Self, E> {
        let mut powers = Vec::with_capacity(self.powers.len() + other.powers.len());
        let (mut lhs, mut rhs) = (self.powers.iter().peekable(), other.powers.iter().peekable());
        let zero = Exponent::zero();

        loop {
            let (base, exp) = match (lhs.peek(), rhs.peek()) {
                (None, None) => break,
                (Some(a), None) => (a.base.clone(), combine(&a.base, a.exp, zero)?),
                (None, Some(b)) => (b.base.clone(), combine(&b.base, zero, b.exp)?),
                (Some(a), Some(b)) => match a.base.cmp(&b.base) {
                    Ordering::Less => (a.base.clone(), combine(&a.base, a.exp, zero)?),
                    Ordering::Greater => (b.base.clone(), combine(&b.base, zero, b.exp)?),
                    Ordering::Equal => (a.base.clone(), combine(&a.base, a.exp, b.exp)?),
                },
            };

            match (lhs.peek(), rhs.peek()) {
                (Some(a), Some(b)) if a.base == b.base => {
                    lhs.next();
                    rhs.next();
                }
                (Some(a), _) if a.base == base => {
                    lhs.next();
                }
                _ => {
                    rhs.next();
                }
            }

            if let Some(exp) = exp {
                powers.push(BasePower { base, exp });
            }
        }

        Ok(Self { powers })
    }
}

impl<B: PackBase> Default for Pack<B> {
    fn default() -> Self {
        Self::one()
    }
}

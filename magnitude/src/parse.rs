//! Text syntax for magnitudes, e.g. `-2^3 * 5 / pi` or `(3/2)^(1/2)`.
//!
//! ```text
//! expr     := '-'? factor (('*' | '·' | '/') factor)*
//! factor   := primary ('^' exponent)?
//! primary  := integer | 'pi' | 'π' | '(' expr ')'
//! exponent := int | '(' int ('/' int)? ')'
//! int      := '-'? digits
//! ```

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{pack::Exponent, Magnitude, ParseMagnitudeError};

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&mut self) -> Option<char> {
        let rest = &self.src[self.pos..];
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();
        trimmed.chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, c: char) -> bool {
        let found = self.peek() == Some(c);
        if found {
            self.pos += c.len_utf8();
        }
        found
    }

    fn expect(&mut self, c: char) -> Result<(), ParseMagnitudeError> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn unexpected(&mut self) -> ParseMagnitudeError {
        match self.peek() {
            Some(found) => ParseMagnitudeError::Unexpected {
                found,
                offset: self.pos,
            },
            None => ParseMagnitudeError::UnexpectedEnd,
        }
    }

    fn expr(&mut self) -> Result<Magnitude, ParseMagnitudeError> {
        let negative = self.eat('-');
        let mut value = self.factor()?;

        loop {
            if self.eat('*') || self.eat('·') {
                value = value.checked_mul(&self.factor()?)?;
            } else if self.eat('/') {
                value = value.checked_div(&self.factor()?)?;
            } else {
                break;
            }
        }

        Ok(if negative { -value } else { value })
    }

    fn factor(&mut self) -> Result<Magnitude, ParseMagnitudeError> {
        let base = self.primary()?;
        if !self.eat('^') {
            return Ok(base);
        }

        let exp = if self.eat('(') {
            let numer = self.int()?;
            let denom = if self.eat('/') { self.int()? } else { 1 };
            self.expect(')')?;
            if denom == 0 {
                return Err(ParseMagnitudeError::ZeroDenominator);
            }
            Exponent::new(numer, denom)
        } else {
            Exponent::from_integer(self.int()?)
        };

        if exp.is_integer() {
            Ok(base.checked_pow(exp.to_integer())?)
        } else {
            Ok(base.powr(exp)?)
        }
    }

    fn primary(&mut self) -> Result<Magnitude, ParseMagnitudeError> {
        match self.peek() {
            Some('(') => {
                self.bump();
                let inner = self.expr()?;
                self.expect(')')?;
                Ok(inner)
            }
            Some('π') => {
                self.bump();
                Ok(Magnitude::pi())
            }
            Some('p') => {
                self.bump();
                // No whitespace between the two letters.
                match self.src[self.pos..].chars().next() {
                    Some('i') => {
                        self.pos += 1;
                        Ok(Magnitude::pi())
                    }
                    Some(found) => Err(ParseMagnitudeError::Unexpected {
                        found,
                        offset: self.pos,
                    }),
                    None => Err(ParseMagnitudeError::UnexpectedEnd),
                }
            }
            Some(c) if c.is_ascii_digit() => {
                let n = self.digits()?;
                Magnitude::from_integer(n).ok_or(ParseMagnitudeError::Zero)
            }
            _ => Err(self.unexpected()),
        }
    }

    fn int(&mut self) -> Result<i64, ParseMagnitudeError> {
        let negative = self.eat('-');
        if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
            return Err(self.unexpected());
        }

        let start = self.pos;
        let digits = self.take_digits();
        let value = i64::try_from(digits)
            .map_err(|_| ParseMagnitudeError::OutOfRange(self.src[start..self.pos].to_owned()))?;
        Ok(if negative { -value } else { value })
    }

    fn digits(&mut self) -> Result<u64, ParseMagnitudeError> {
        let start = self.pos;
        let digits = self.take_digits();
        u64::try_from(digits)
            .map_err(|_| ParseMagnitudeError::OutOfRange(self.src[start..self.pos].to_owned()))
    }

    /// Consumes a run of digits. Values past `u64::MAX` saturate to `u128`
    /// territory so callers can report them.
    fn take_digits(&mut self) -> u128 {
        let mut value = 0_u128;
        for c in self.src[self.pos..].chars() {
            let Some(digit) = c.to_digit(10) else {
                break;
            };
            value = value.saturating_mul(10).saturating_add(digit as u128);
            self.pos += 1;
        }
        value
    }
}

impl FromStr for Magnitude {
    type Err = ParseMagnitudeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser::new(s);
        let value = parser.expr()?;
        match parser.peek() {
            None => Ok(value),
            Some(_) => Err(parser.unexpected()),
        }
    }
}

impl Serialize for Magnitude {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Magnitude {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::{mag, pack::Exponent, ExponentOverflow, Magnitude, MagnitudeError, ParseMagnitudeError};

    fn parse(s: &str) -> Result<Magnitude, ParseMagnitudeError> {
        s.parse()
    }

    #[test]
    fn integers_and_products() {
        assert_eq!(parse("360"), Ok(mag(360)));
        assert_eq!(parse(" 2 * 3 / 4 "), Ok(mag(3) / mag(2)));
        assert_eq!(parse("-12"), Ok(-mag(12)));
        assert_eq!(parse("2^3 · 5"), Ok(mag(40)));
        assert_eq!(parse("1"), Ok(Magnitude::one()));
    }

    #[test]
    fn exponents() {
        assert_eq!(parse("10^-3"), Ok(mag(1) / mag(1000)));
        assert_eq!(parse("8^(1/3)"), Ok(mag(2)));
        assert_eq!(parse("(3/2)^2"), Ok(mag(9) / mag(4)));
        assert_eq!(
            parse("2^(1/2)"),
            Ok(Magnitude::prime_power(2, Exponent::new(1, 2)).unwrap())
        );
        assert_eq!(parse("(-8)^(1/3)"), Ok(-mag(2)));
    }

    #[test]
    fn pi() {
        assert_eq!(parse("pi"), Ok(Magnitude::pi()));
        assert_eq!(parse("π / 180"), Ok(Magnitude::pi() / mag(180)));
        assert_eq!(parse(" pi^2"), Ok(Magnitude::pi().pow(2)));
        assert_eq!(
            parse("p i"),
            Err(ParseMagnitudeError::Unexpected {
                found: ' ',
                offset: 1
            })
        );
        assert_eq!(
            parse("2 * p"),
            Err(ParseMagnitudeError::UnexpectedEnd)
        );
        assert!(parse("px").is_err());
    }

    #[test]
    fn exponent_overflow_is_an_error() {
        let overflow = Err(ParseMagnitudeError::Magnitude(MagnitudeError::ExponentOverflow(
            ExponentOverflow,
        )));
        assert_eq!(parse("2^9223372036854775807 * 2"), overflow);
        assert_eq!(parse("2^-9223372036854775807 / 2"), overflow);
        assert_eq!(parse("(2^9223372036854775807)^2"), overflow);
        assert_eq!(parse("(3^9223372036854775807)^(3/2)"), overflow);
        assert_eq!(
            parse("2^9223372036854775807 / 2"),
            Ok(mag(2).pow(i64::MAX - 1))
        );
    }

    #[test]
    fn errors() {
        assert_eq!(parse("0"), Err(ParseMagnitudeError::Zero));
        assert_eq!(parse(""), Err(ParseMagnitudeError::UnexpectedEnd));
        assert_eq!(parse("2 *"), Err(ParseMagnitudeError::UnexpectedEnd));
        assert_eq!(
            parse("2 x"),
            Err(ParseMagnitudeError::Unexpected {
                found: 'x',
                offset: 2
            })
        );
        assert_eq!(parse("2^(1/0)"), Err(ParseMagnitudeError::ZeroDenominator));
        assert_eq!(
            parse("(-4)^(1/2)"),
            Err(ParseMagnitudeError::Magnitude(
                MagnitudeError::EvenRootOfNegative
            ))
        );
        assert!(matches!(
            parse("99999999999999999999999"),
            Err(ParseMagnitudeError::OutOfRange(_))
        ));
    }

    proptest! {
        #[test]
        fn display_parses_back(num in 1_u64..100_000, den in 1_u64..100_000, root in 1_i64..5, negative: bool) {
            let m = (mag(num) / mag(den)).root(root).unwrap() * Magnitude::pi().pow(root - 2);
            let m = if negative { -m } else { m };
            prop_assert_eq!(m.to_string().parse::<Magnitude>(), Ok(m));
        }
    }
}

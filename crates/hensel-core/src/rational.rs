// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Exact rationals over arbitrary-precision integers.

use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};
use core::str::FromStr;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use crate::{HenselError, Result};

/// A rational number `num/den` in lowest terms.
///
/// # Invariant
/// `den > 0`, `gcd(|num|, den) = 1`, and zero is stored as `0/1`. Fields are
/// private so every constructor goes through [`Rational::new`] or the
/// arithmetic operators, which normalize.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RationalRepr", into = "RationalRepr"))]
pub struct Rational {
    num: BigInt,
    den: BigInt,
}

impl Rational {
    /// Builds `num/den` in lowest terms.
    pub fn new(num: impl Into<BigInt>, den: impl Into<BigInt>) -> Result<Self> {
        let (num, den) = (num.into(), den.into());
        if den.is_zero() {
            return Err(HenselError::ZeroDenominator);
        }
        Ok(Self::normalized(num, den))
    }

    /// Reduces `num/den`; caller guarantees `den != 0`.
    fn normalized(num: BigInt, den: BigInt) -> Self {
        if num.is_zero() {
            return Self::zero();
        }
        let g = num.gcd(&den);
        let (mut num, mut den) = (num / &g, den / &g);
        if den.is_negative() {
            num = -num;
            den = -den;
        }
        Self { num, den }
    }

    /// The integer `n` as `n/1`.
    pub fn from_integer(n: impl Into<BigInt>) -> Self {
        Self {
            num: n.into(),
            den: BigInt::one(),
        }
    }

    /// `0/1`.
    pub fn zero() -> Self {
        Self::from_integer(0u32)
    }

    /// `1/1`.
    pub fn one() -> Self {
        Self::from_integer(1u32)
    }

    /// Numerator (carries the sign).
    pub fn numer(&self) -> &BigInt {
        &self.num
    }

    /// Denominator (always positive).
    pub fn denom(&self) -> &BigInt {
        &self.den
    }

    /// Returns `true` for `0/1`.
    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    /// Returns `true` when the value is strictly negative.
    pub fn is_negative(&self) -> bool {
        self.num.is_negative()
    }

    /// Returns `true` when the denominator is one.
    pub fn is_integer(&self) -> bool {
        self.den.is_one()
    }

    /// `max(|num|, den)`: the size measure rational reconstruction bounds.
    pub fn height(&self) -> BigInt {
        let abs = self.num.abs();
        if abs > self.den {
            abs
        } else {
            self.den.clone()
        }
    }

    /// `den/num`; fails for zero.
    pub fn recip(&self) -> Result<Self> {
        Self::new(self.den.clone(), self.num.clone())
    }

    /// `self / rhs`; fails when `rhs` is zero.
    pub fn checked_div(&self, rhs: &Self) -> Result<Self> {
        Ok(self * &rhs.recip()?)
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rational({self})")
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den.is_one() {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

impl FromStr for Rational {
    type Err = HenselError;

    /// Parses `n` or `n/d`, ignoring surrounding whitespace.
    ///
    /// Only the numerator may carry a sign, and only `-`. Parts are plain
    /// ASCII digits with nothing between them and the `/`.
    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        let parse_part = |part: &str, signed: bool| {
            let digits = if signed {
                part.strip_prefix('-').unwrap_or(part)
            } else {
                part
            };
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(HenselError::Parse(format!(
                    "invalid integer {part:?} in {s:?}"
                )));
            }
            part.parse::<BigInt>()
                .map_err(|_| HenselError::Parse(format!("invalid integer {part:?} in {s:?}")))
        };
        match text.split_once('/') {
            None => Ok(Self::from_integer(parse_part(text, true)?)),
            Some((n, d)) => Self::new(parse_part(n, true)?, parse_part(d, false)?),
        }
    }
}

impl From<BigInt> for Rational {
    fn from(n: BigInt) -> Self {
        Self::from_integer(n)
    }
}

impl From<i64> for Rational {
    fn from(n: i64) -> Self {
        Self::from_integer(n)
    }
}

impl<'b> Add<&'b Rational> for &Rational {
    type Output = Rational;
    fn add(self, rhs: &'b Rational) -> Rational {
        if self.den == rhs.den {
            return Rational::normalized(&self.num + &rhs.num, self.den.clone());
        }
        Rational::normalized(
            &self.num * &rhs.den + &rhs.num * &self.den,
            &self.den * &rhs.den,
        )
    }
}

impl<'b> Sub<&'b Rational> for &Rational {
    type Output = Rational;
    fn sub(self, rhs: &'b Rational) -> Rational {
        self + &(-rhs)
    }
}

impl<'b> Mul<&'b Rational> for &Rational {
    type Output = Rational;
    fn mul(self, rhs: &'b Rational) -> Rational {
        Rational::normalized(&self.num * &rhs.num, &self.den * &rhs.den)
    }
}

impl Neg for &Rational {
    type Output = Rational;
    fn neg(self) -> Rational {
        Rational {
            num: -&self.num,
            den: self.den.clone(),
        }
    }
}

impl Neg for Rational {
    type Output = Rational;
    fn neg(self) -> Rational {
        -&self
    }
}

macro_rules! forward_owned_binop {
    ($trait:ident, $method:ident) => {
        impl $trait<Rational> for Rational {
            type Output = Rational;
            fn $method(self, rhs: Rational) -> Rational {
                (&self).$method(&rhs)
            }
        }

        impl<'b> $trait<&'b Rational> for Rational {
            type Output = Rational;
            fn $method(self, rhs: &'b Rational) -> Rational {
                (&self).$method(rhs)
            }
        }

        impl $trait<Rational> for &Rational {
            type Output = Rational;
            fn $method(self, rhs: Rational) -> Rational {
                self.$method(&rhs)
            }
        }
    };
}

forward_owned_binop!(Add, add);
forward_owned_binop!(Sub, sub);
forward_owned_binop!(Mul, mul);

/// Wire form: numerator and denominator as decimal strings.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RationalRepr {
    #[serde(with = "crate::serde_dec")]
    num: BigInt,
    #[serde(with = "crate::serde_dec")]
    den: BigInt,
}

#[cfg(feature = "serde")]
impl TryFrom<RationalRepr> for Rational {
    type Error = HenselError;
    fn try_from(repr: RationalRepr) -> Result<Self> {
        Self::new(repr.num, repr.den)
    }
}

#[cfg(feature = "serde")]
impl From<Rational> for RationalRepr {
    fn from(r: Rational) -> Self {
        Self {
            num: r.num,
            den: r.den,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(n: i64, d: i64) -> Rational {
        Rational::new(n, d).expect("non-zero denominator")
    }

    #[test]
    fn new_reduces_and_fixes_sign() {
        let r = q(6, -8);
        assert_eq!(r.numer(), &BigInt::from(-3));
        assert_eq!(r.denom(), &BigInt::from(4));
        assert_eq!(q(0, -5), Rational::zero());
        assert_eq!(q(-4, -2), Rational::from_integer(2));
    }

    #[test]
    fn zero_denominator_is_rejected() {
        assert_eq!(Rational::new(1, 0), Err(HenselError::ZeroDenominator));
        assert_eq!(Rational::zero().recip(), Err(HenselError::ZeroDenominator));
        assert_eq!(
            q(1, 2).checked_div(&Rational::zero()),
            Err(HenselError::ZeroDenominator)
        );
    }

    #[test]
    fn arithmetic_stays_normalized() {
        assert_eq!(q(1, 6) + q(1, 3), q(1, 2));
        assert_eq!(q(1, 2) - q(3, 4), q(-1, 4));
        assert_eq!(q(2, 3) * q(9, 4), q(3, 2));
        assert_eq!(-q(5, 7), q(-5, 7));
        assert_eq!(&q(1, 4) + &q(1, 4), q(1, 2));
        assert_eq!(q(3, 4).checked_div(&q(3, 8)), Ok(Rational::from_integer(2)));
        assert_eq!(q(1, 3) - q(1, 3), Rational::zero());
    }

    #[test]
    fn height_is_max_of_parts() {
        assert_eq!(q(-7, 3).height(), BigInt::from(7));
        assert_eq!(q(2, 9).height(), BigInt::from(9));
        assert_eq!(Rational::zero().height(), BigInt::from(1));
    }

    #[test]
    fn display_and_parse_agree() {
        for (text, want) in [
            ("3/4", q(3, 4)),
            ("-1/8", q(-1, 8)),
            (" 6/8\n", q(3, 4)),
            ("42", Rational::from_integer(42)),
            ("-0/5", Rational::zero()),
        ] {
            let parsed: Rational = text.parse().expect("parse");
            assert_eq!(parsed, want);
        }
        assert_eq!(q(3, 4).to_string(), "3/4");
        assert_eq!(q(-6, 3).to_string(), "-2");
    }

    #[test]
    fn parse_rejects_garbage() {
        for bad in [
            "", "abc", "1/", "/2", "1/2/3", "1.5", "+3", "5/-10", "5/+10", "6 / 8", "- 3",
            "--3", "-", "1_000", "3/ 4",
        ] {
            assert!(
                matches!(bad.parse::<Rational>(), Err(HenselError::Parse(_))),
                "{bad:?}"
            );
        }
        assert_eq!("1/0".parse::<Rational>(), Err(HenselError::ZeroDenominator));
    }
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Hensel codes: residues of rationals modulo an odd modulus.
//!
//! A code `h = num · den⁻¹ (mod m)` loses the rational it came from, but as
//! long as `|num|, den ≤ ⌊√(m/2)⌋` that rational is the unique one of that
//! height congruent to `h`, and [`HenselCode::to_rational`] recovers it with
//! the half-extended Euclidean algorithm (Wang's rational reconstruction).
//!
//! Arithmetic between codes is only defined when the moduli agree, so every
//! binary operation is a `try_*` method returning `ModulusMismatch` instead of
//! an operator impl that would have to panic.

use core::fmt;
use core::ops::Neg;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use crate::bigint::{isqrt, mod_inverse, modulo};
use crate::{HenselError, Rational, Result};

/// A residue class `residue (mod modulus)` standing in for a rational.
///
/// # Invariant
/// `modulus` is odd and at least 3; `0 <= residue < modulus`.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "HenselCodeRepr", into = "HenselCodeRepr")
)]
pub struct HenselCode {
    modulus: BigInt,
    residue: BigInt,
}

fn check_modulus(modulus: &BigInt) -> Result<()> {
    if modulus < &BigInt::from(3u32) || modulus.is_even() {
        return Err(HenselError::InvalidModulus(modulus.clone()));
    }
    Ok(())
}

impl HenselCode {
    /// Encodes the integer `n` modulo `modulus`; negative values wrap.
    pub fn new(modulus: impl Into<BigInt>, n: impl Into<BigInt>) -> Result<Self> {
        let modulus = modulus.into();
        check_modulus(&modulus)?;
        let residue = modulo(&n.into(), &modulus);
        Ok(Self { modulus, residue })
    }

    /// The zero code modulo `modulus`.
    pub fn zero(modulus: impl Into<BigInt>) -> Result<Self> {
        Self::new(modulus, 0u32)
    }

    /// Encodes `r = num/den` as `num · den⁻¹ (mod modulus)`.
    ///
    /// Fails with `NotInvertible` when `den` shares a factor with the modulus.
    pub fn from_rational(modulus: impl Into<BigInt>, r: &Rational) -> Result<Self> {
        let modulus = modulus.into();
        check_modulus(&modulus)?;
        let inv_den = mod_inverse(r.denom(), &modulus)?;
        let residue = modulo(&(r.numer() * inv_den), &modulus);
        Ok(Self { modulus, residue })
    }

    /// The modulus `m`.
    pub fn modulus(&self) -> &BigInt {
        &self.modulus
    }

    /// The residue in `[0, m)`.
    pub fn residue(&self) -> &BigInt {
        &self.residue
    }

    /// Returns `true` for the zero residue.
    pub fn is_zero(&self) -> bool {
        self.residue.is_zero()
    }

    /// Largest `N` such that every rational with `|num|, den ≤ N` reconstructs
    /// uniquely from this modulus: `⌊√(m/2)⌋`.
    pub fn reconstruction_bound(&self) -> BigInt {
        isqrt(&(&self.modulus >> 1u32))
    }

    /// Recovers the unique rational `a/b` with `|a|, b ≤ ⌊√(m/2)⌋` that
    /// encodes to this residue.
    pub fn to_rational(&self) -> Result<Rational> {
        let bound = self.reconstruction_bound();
        let (mut r0, mut r1) = (self.modulus.clone(), self.residue.clone());
        let (mut t0, mut t1) = (BigInt::zero(), BigInt::one());
        while r1 > bound {
            let q = &r0 / &r1;
            let r2 = &r0 - &q * &r1;
            let t2 = &t0 - &q * &t1;
            r0 = core::mem::replace(&mut r1, r2);
            t0 = core::mem::replace(&mut t1, t2);
        }

        let fail = || HenselError::ReconstructionFailed {
            residue: self.residue.clone(),
            modulus: self.modulus.clone(),
        };
        if t1.is_zero() || t1.abs() > bound || !r1.gcd(&t1).is_one() {
            return Err(fail());
        }
        let (num, den) = if t1.is_negative() { (-r1, -t1) } else { (r1, t1) };
        Rational::new(num, den).map_err(|_| fail())
    }

    /// Multiplicative inverse modulo `m`.
    pub fn invert(&self) -> Result<Self> {
        Ok(Self {
            modulus: self.modulus.clone(),
            residue: mod_inverse(&self.residue, &self.modulus)?,
        })
    }

    fn same_modulus(&self, other: &Self) -> Result<()> {
        if self.modulus != other.modulus {
            return Err(HenselError::ModulusMismatch {
                left: self.modulus.clone(),
                right: other.modulus.clone(),
            });
        }
        Ok(())
    }

    fn with_residue(&self, value: &BigInt) -> Self {
        Self {
            modulus: self.modulus.clone(),
            residue: modulo(value, &self.modulus),
        }
    }

    /// `self + other (mod m)`.
    pub fn try_add(&self, other: &Self) -> Result<Self> {
        self.same_modulus(other)?;
        Ok(self.with_residue(&(&self.residue + &other.residue)))
    }

    /// `self - other (mod m)`.
    pub fn try_sub(&self, other: &Self) -> Result<Self> {
        self.same_modulus(other)?;
        Ok(self.with_residue(&(&self.residue - &other.residue)))
    }

    /// `self · other (mod m)`.
    pub fn try_mul(&self, other: &Self) -> Result<Self> {
        self.same_modulus(other)?;
        Ok(self.with_residue(&(&self.residue * &other.residue)))
    }

    /// Re-encodes the residue under `modulus`, which must divide `m`.
    ///
    /// This is the projection `Z/mZ → Z/dZ` used to peel one prime off a
    /// composite-modulus code.
    pub fn project(&self, modulus: &BigInt) -> Result<Self> {
        check_modulus(modulus)?;
        if !(&self.modulus % modulus).is_zero() {
            return Err(HenselError::ModulusMismatch {
                left: self.modulus.clone(),
                right: modulus.clone(),
            });
        }
        Self::new(modulus.clone(), self.residue.clone())
    }
}

impl Neg for &HenselCode {
    type Output = HenselCode;
    fn neg(self) -> HenselCode {
        self.with_residue(&-&self.residue)
    }
}

impl Neg for HenselCode {
    type Output = HenselCode;
    fn neg(self) -> HenselCode {
        -&self
    }
}

impl fmt::Debug for HenselCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HenselCode({self})")
    }
}

/// Pretty-prints as `residue (mod modulus)`.
impl fmt::Display for HenselCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (mod {})", self.residue, self.modulus)
    }
}

impl TryFrom<&HenselCode> for Rational {
    type Error = HenselError;
    fn try_from(code: &HenselCode) -> Result<Self> {
        code.to_rational()
    }
}

/// Returns the code modulo `m_a · m_b` congruent to both inputs.
pub fn chinese_remainder(a: &HenselCode, b: &HenselCode) -> Result<HenselCode> {
    let (ma, mb) = (&a.modulus, &b.modulus);
    // ma⁻¹ (mod mb) exists exactly when the moduli are coprime.
    let ma_inv = mod_inverse(ma, mb).map_err(|_| HenselError::ModuliNotCoprime {
        left: ma.clone(),
        right: mb.clone(),
    })?;
    let lift = modulo(&((&b.residue - &a.residue) * ma_inv), mb);
    let modulus = ma * mb;
    let residue = &a.residue + ma * lift;
    Ok(HenselCode { modulus, residue })
}

/// Left fold of [`chinese_remainder`] over `codes`.
pub fn chinese_remainder_all<'a, I>(codes: I) -> Result<HenselCode>
where
    I: IntoIterator<Item = &'a HenselCode>,
{
    let mut iter = codes.into_iter();
    let first = iter.next().ok_or(HenselError::EmptyInput)?.clone();
    iter.try_fold(first, |acc, code| chinese_remainder(&acc, code))
}

/// Wire form: modulus and residue as decimal strings.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct HenselCodeRepr {
    #[serde(with = "crate::serde_dec")]
    modulus: BigInt,
    #[serde(with = "crate::serde_dec")]
    residue: BigInt,
}

#[cfg(feature = "serde")]
impl TryFrom<HenselCodeRepr> for HenselCode {
    type Error = HenselError;
    fn try_from(repr: HenselCodeRepr) -> Result<Self> {
        check_modulus(&repr.modulus)?;
        if repr.residue.is_negative() || repr.residue >= repr.modulus {
            return Err(HenselError::Parse(format!(
                "residue {} out of range for modulus {}",
                repr.residue, repr.modulus
            )));
        }
        Ok(Self {
            modulus: repr.modulus,
            residue: repr.residue,
        })
    }
}

#[cfg(feature = "serde")]
impl From<HenselCode> for HenselCodeRepr {
    fn from(code: HenselCode) -> Self {
        Self {
            modulus: code.modulus,
            residue: code.residue,
        }
    }
}

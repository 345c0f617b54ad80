// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Helpers over `num_bigint::BigInt` used by the code and scheme layers.
//!
//! Everything here is variable-time. The scheme built on these helpers is
//! experimental and makes no side-channel claims.

use num_bigint::{BigInt, RandBigInt};
use num_integer::{Integer, Roots};
use num_traits::{One, Signed, Zero};
use rand::Rng;

use crate::{HenselError, Result};

/// Default number of random Miller–Rabin witnesses on top of the fixed bases.
pub const MR_ROUNDS: u32 = 32;

/// Small primes used for trial division and as fixed Miller–Rabin bases.
const SMALL_PRIMES: [u32; 46] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
    97, 101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191,
    193, 197, 199,
];

/// Number of leading `SMALL_PRIMES` used as deterministic witnesses.
///
/// The first 13 primes are a deterministic witness set for `n < 3.3·10^24`.
const FIXED_WITNESSES: usize = 13;

/// Least non-negative residue of `a` modulo `m` (`m > 0`).
pub fn modulo(a: &BigInt, m: &BigInt) -> BigInt {
    a.mod_floor(m)
}

/// Inverse of `a` modulo `m`, in `[0, m)`.
pub fn mod_inverse(a: &BigInt, m: &BigInt) -> Result<BigInt> {
    let reduced = modulo(a, m);
    let egcd = reduced.extended_gcd(m);
    if !egcd.gcd.is_one() {
        return Err(HenselError::NotInvertible {
            value: a.clone(),
            modulus: m.clone(),
        });
    }
    Ok(modulo(&egcd.x, m))
}

/// Floor square root; negative inputs map to zero.
pub fn isqrt(n: &BigInt) -> BigInt {
    if n.is_negative() {
        return BigInt::zero();
    }
    Roots::sqrt(n)
}

/// Uniform sample from `[0, bound)`.
///
/// Empty ranges (`bound <= 0`) collapse to zero.
pub fn random_below<R: Rng + ?Sized>(bound: &BigInt, rng: &mut R) -> BigInt {
    if !bound.is_positive() {
        return BigInt::zero();
    }
    rng.gen_bigint_range(&BigInt::zero(), bound)
}

/// Miller–Rabin probable-prime test with trial division.
///
/// Runs the fixed small-prime witnesses and then `rounds` random witnesses.
pub fn is_probable_prime<R: Rng + ?Sized>(n: &BigInt, rounds: u32, rng: &mut R) -> bool {
    let two = BigInt::from(2u32);
    if n < &two {
        return false;
    }
    for p in SMALL_PRIMES {
        let p = BigInt::from(p);
        if n == &p {
            return true;
        }
        if (n % &p).is_zero() {
            return false;
        }
    }

    let n_minus_one = n - 1u32;
    let mut d = n_minus_one.clone();
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1u32;
        s += 1;
    }

    let fixed = SMALL_PRIMES[..FIXED_WITNESSES]
        .iter()
        .map(|&p| BigInt::from(p))
        .collect::<Vec<_>>();
    if !fixed
        .iter()
        .all(|a| passes_witness(n, &n_minus_one, &d, s, a))
    {
        return false;
    }
    (0..rounds).all(|_| {
        let a = rng.gen_bigint_range(&two, &n_minus_one);
        passes_witness(n, &n_minus_one, &d, s, &a)
    })
}

/// One Miller–Rabin round: `n - 1 = d · 2^s` with `d` odd.
fn passes_witness(n: &BigInt, n_minus_one: &BigInt, d: &BigInt, s: u32, a: &BigInt) -> bool {
    let mut x = a.modpow(d, n);
    if x.is_one() || &x == n_minus_one {
        return true;
    }
    for _ in 1..s {
        x = (&x * &x) % n;
        if &x == n_minus_one {
            return true;
        }
    }
    false
}

/// A random probable prime with exactly `bits` bits.
pub fn random_prime<R: Rng + ?Sized>(bits: u32, rng: &mut R) -> Result<BigInt> {
    if bits < 2 {
        return Err(HenselError::InvalidKeyParams(format!(
            "cannot generate a {bits}-bit prime"
        )));
    }
    let low = BigInt::one() << (bits - 1);
    let high = BigInt::one() << bits;
    loop {
        let mut candidate = rng.gen_bigint_range(&low, &high);
        if candidate.is_even() {
            candidate += 1u32;
        }
        if candidate < high && is_probable_prime(&candidate, MR_ROUNDS, rng) {
            return Ok(candidate);
        }
    }
}

/// Bit length of a non-negative integer.
pub(crate) fn bit_len(n: &BigInt) -> u64 {
    n.bits()
}

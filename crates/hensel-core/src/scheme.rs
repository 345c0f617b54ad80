// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Noisy secret-key encryption of rationals over Hensel codes.
//!
//! A secret key is five distinct primes `p1..p5`; ciphertexts live modulo
//! `g = p1·p2·p3·p4·p5`. To encrypt `m`:
//!
//! 1. draw `s1 < p1`, `s2 < p2`, `s3 < p3` and `δ < p1·p2·p3·p5`;
//! 2. build `z = CRT(0 mod p1, s2 mod p2, s3 mod p3)`, an encoding of zero
//!    modulo `p1`;
//! 3. the noisy rational is `R = m + s1·z`, whose noise term is a multiple of
//!    `p1`;
//! 4. the ciphertext is `HenselCode(g, R) + δ·p4 (mod g)`.
//!
//! Decryption projects onto `p4` (killing `δ·p4`), reconstructs `R` exactly,
//! then projects `R` onto `p1` (killing the noise) and reconstructs `m`.
//!
//! Because projection and reconstruction commute with ring operations as long
//! as heights stay below `√(p4/2)`, ciphertexts can be added and multiplied
//! modulo `g`. Each ciphertext carries a weight (the number of fresh
//! ciphertexts folded into it); `p4` is sized so any result of weight up to
//! the key's capacity still reconstructs.
//!
//! The scheme is experimental and variable-time.

use core::fmt;

use num_bigint::BigInt;
use num_traits::{One, Signed};
use rand::Rng;

use crate::bigint::{bit_len, is_probable_prime, random_below, random_prime, MR_ROUNDS};
use crate::{chinese_remainder_all, HenselCode, HenselError, Rational, Result};

/// Smallest accepted `noise_bits`. There are 23 primes of 8 bits, so the
/// three noise primes and `p1` can always be drawn distinct.
pub const MIN_NOISE_BITS: u32 = 8;
/// Largest accepted `noise_bits`.
pub const MAX_NOISE_BITS: u32 = 4096;
/// Largest accepted `capacity`.
pub const MAX_CAPACITY: u32 = 64;
/// Largest `p4` that [`SecretKey::generate`] will search for.
pub const MAX_P4_BITS: u32 = 16_384;

/// Fresh candidates drawn per prime before giving up on distinctness.
const PRIME_ATTEMPTS: u32 = 64;

/// Sizing knobs for key generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyParams {
    /// Plaintext numerators and denominators must be below `2^message_bits`.
    pub message_bits: u32,
    /// Bit size of the noise primes `p2`, `p3`, `p5`.
    pub noise_bits: u32,
    /// Maximum ciphertext weight (fresh ciphertexts folded into one result).
    pub capacity: u32,
}

impl Default for KeyParams {
    fn default() -> Self {
        Self {
            message_bits: 32,
            noise_bits: 48,
            capacity: 2,
        }
    }
}

impl KeyParams {
    /// Checks ranges; every other method assumes a validated value.
    pub fn validate(&self) -> Result<()> {
        let bad = |msg: String| Err(HenselError::InvalidKeyParams(msg));
        if self.message_bits == 0 {
            return bad("message_bits must be at least 1".into());
        }
        let min_noise = MIN_NOISE_BITS.max(self.message_bits.saturating_add(1));
        if self.noise_bits < min_noise || self.noise_bits > MAX_NOISE_BITS {
            return bad(format!(
                "noise_bits must be in {min_noise}..={MAX_NOISE_BITS}, got {}",
                self.noise_bits
            ));
        }
        if self.capacity == 0 || self.capacity > MAX_CAPACITY {
            return bad(format!(
                "capacity must be in 1..={MAX_CAPACITY}, got {}",
                self.capacity
            ));
        }
        if self.p4_bits() > MAX_P4_BITS {
            return bad(format!(
                "p4 would need {} bits (limit {MAX_P4_BITS}); lower capacity or noise_bits",
                self.p4_bits()
            ));
        }
        Ok(())
    }

    /// Bits of `p1`: enough that every plaintext reconstructs modulo `p1`.
    pub fn p1_bits(&self) -> u32 {
        2 * self.message_bits + 2
    }

    /// Bits of `p4` for the derived `p1` and noise prime sizes.
    pub fn p4_bits(&self) -> u32 {
        self.p4_bits_for(u64::from(self.p1_bits()), u64::from(self.noise_bits))
    }

    /// Upper bound on the height bits of a fresh noisy rational `m + s1·z`.
    fn fresh_height_bits(&self, p1_bits: u64, noise_bits: u64) -> u64 {
        u64::from(self.message_bits) + 2 * p1_bits + 2 * noise_bits + 2
    }

    /// `p4` must exceed `2·H²` for the largest height `H` reachable at full
    /// capacity; each fold adds at most one bit beyond the product of heights.
    fn p4_bits_for(&self, p1_bits: u64, noise_bits: u64) -> u32 {
        let per_weight = self.fresh_height_bits(p1_bits, noise_bits) + 1;
        let bits = 2 * u64::from(self.capacity) * per_weight + 2;
        u32::try_from(bits).unwrap_or(u32::MAX)
    }
}

/// An encrypted rational together with its weight.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "CiphertextRepr", into = "CiphertextRepr")
)]
pub struct Ciphertext {
    code: HenselCode,
    weight: u32,
}

impl Ciphertext {
    /// The underlying code modulo the public modulus.
    pub fn code(&self) -> &HenselCode {
        &self.code
    }

    /// Number of fresh ciphertexts folded into this one.
    pub fn weight(&self) -> u32 {
        self.weight
    }
}

impl fmt::Debug for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ciphertext")
            .field("residue_bits", &bit_len(self.code.residue()))
            .field("weight", &self.weight)
            .finish()
    }
}

/// The public half of a key: the ciphertext modulus and its capacity.
///
/// Holders can add and multiply ciphertexts but cannot decrypt.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "PublicKeyRepr", into = "PublicKeyRepr")
)]
pub struct PublicKey {
    modulus: BigInt,
    capacity: u32,
}

impl PublicKey {
    /// The ciphertext modulus `g`.
    pub fn modulus(&self) -> &BigInt {
        &self.modulus
    }

    /// Maximum weight of an evaluated ciphertext.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Short hex id: first 8 bytes of `blake3(decimal modulus)`.
    pub fn fingerprint(&self) -> String {
        let digest = blake3::hash(self.modulus.to_string().as_bytes());
        hex::encode(&digest.as_bytes()[..8])
    }

    fn check(&self, c: &Ciphertext) -> Result<()> {
        if c.code.modulus() != &self.modulus {
            return Err(HenselError::ModulusMismatch {
                left: self.modulus.clone(),
                right: c.code.modulus().clone(),
            });
        }
        Ok(())
    }

    fn combined_weight(&self, a: &Ciphertext, b: &Ciphertext) -> Result<u32> {
        self.check(a)?;
        self.check(b)?;
        let weight = a.weight.saturating_add(b.weight);
        if weight > self.capacity {
            return Err(HenselError::CapacityExceeded {
                weight,
                capacity: self.capacity,
            });
        }
        Ok(weight)
    }

    /// Encrypted `m_a + m_b`.
    pub fn add(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        let weight = self.combined_weight(a, b)?;
        Ok(Ciphertext {
            code: a.code.try_add(&b.code)?,
            weight,
        })
    }

    /// Encrypted `m_a · m_b`.
    pub fn mul(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        let weight = self.combined_weight(a, b)?;
        Ok(Ciphertext {
            code: a.code.try_mul(&b.code)?,
            weight,
        })
    }
}

/// Five secret primes and the parameters they were sized for.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "SecretKeyRepr", into = "SecretKeyRepr")
)]
pub struct SecretKey {
    params: KeyParams,
    primes: [BigInt; 5],
    modulus: BigInt,
}

impl SecretKey {
    /// Generates five distinct primes sized by `params`.
    pub fn generate<R: Rng + ?Sized>(params: KeyParams, rng: &mut R) -> Result<Self> {
        params.validate()?;
        let mut primes: Vec<BigInt> = Vec::with_capacity(5);
        let sizes = [
            params.p1_bits(),
            params.noise_bits,
            params.noise_bits,
            params.p4_bits(),
            params.noise_bits,
        ];
        for bits in sizes {
            let mut fresh = None;
            for _ in 0..PRIME_ATTEMPTS {
                let candidate = random_prime(bits, rng)?;
                if !primes.contains(&candidate) {
                    fresh = Some(candidate);
                    break;
                }
            }
            let p = fresh.ok_or_else(|| {
                HenselError::InvalidKeyParams(format!(
                    "no distinct {bits}-bit prime after {PRIME_ATTEMPTS} draws"
                ))
            })?;
            primes.push(p);
        }
        let primes: [BigInt; 5] = primes
            .try_into()
            .map_err(|_| HenselError::InvalidKey("expected five primes".into()))?;
        Ok(Self::assemble(params, primes))
    }

    /// Builds a key from explicit primes, checking primality, distinctness
    /// and the sizes `params` requires.
    pub fn from_primes(params: KeyParams, primes: [BigInt; 5]) -> Result<Self> {
        params.validate()?;
        let mut rng = rand::thread_rng();
        for (i, p) in primes.iter().enumerate() {
            if !is_probable_prime(p, MR_ROUNDS, &mut rng) {
                return Err(HenselError::InvalidKey(format!("p{} = {p} is not prime", i + 1)));
            }
            if primes[..i].contains(p) {
                return Err(HenselError::InvalidKey(format!("p{} repeats an earlier prime", i + 1)));
            }
        }

        let [p1, p2, p3, p4, p5] = &primes;
        let too_small = |name: &str, have: u64, want: u64| {
            Err(HenselError::InvalidKey(format!(
                "{name} has {have} bits, needs at least {want}"
            )))
        };
        if bit_len(p1) < u64::from(params.p1_bits()) {
            return too_small("p1", bit_len(p1), u64::from(params.p1_bits()));
        }
        for (name, p) in [("p2", p2), ("p3", p3), ("p5", p5)] {
            if bit_len(p) < u64::from(params.noise_bits) {
                return too_small(name, bit_len(p), u64::from(params.noise_bits));
            }
        }
        let want_p4 = params.p4_bits_for(bit_len(p1), bit_len(p2).max(bit_len(p3)));
        if bit_len(p4) < u64::from(want_p4) {
            return too_small("p4", bit_len(p4), u64::from(want_p4));
        }
        Ok(Self::assemble(params, primes))
    }

    fn assemble(params: KeyParams, primes: [BigInt; 5]) -> Self {
        let modulus = primes.iter().product();
        Self {
            params,
            primes,
            modulus,
        }
    }

    /// Parameters the key was generated for.
    pub fn params(&self) -> &KeyParams {
        &self.params
    }

    /// Bit lengths of `p1..p5`.
    pub fn prime_bits(&self) -> [u64; 5] {
        self.primes.each_ref().map(bit_len)
    }

    /// The public modulus and capacity.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            modulus: self.modulus.clone(),
            capacity: self.params.capacity,
        }
    }

    /// The code modulo `p1·p2·p3` congruent to `n1`, `n2`, `n3` modulo `p1`,
    /// `p2`, `p3` respectively.
    pub fn chinese_remainder(
        &self,
        n1: impl Into<BigInt>,
        n2: impl Into<BigInt>,
        n3: impl Into<BigInt>,
    ) -> Result<HenselCode> {
        let [p1, p2, p3, _, _] = &self.primes;
        let codes = [
            HenselCode::new(p1.clone(), n1)?,
            HenselCode::new(p2.clone(), n2)?,
            HenselCode::new(p3.clone(), n3)?,
        ];
        chinese_remainder_all(&codes)
    }

    /// Encrypts `m`; its numerator and denominator must fit `message_bits`.
    pub fn encrypt<R: Rng + ?Sized>(&self, m: &Rational, rng: &mut R) -> Result<Ciphertext> {
        let limit = BigInt::one() << self.params.message_bits;
        if m.numer().abs() >= limit || m.denom() >= &limit {
            return Err(HenselError::PlaintextOutOfRange {
                value: m.to_string(),
                bits: self.params.message_bits,
            });
        }

        let [p1, p2, p3, p4, p5] = &self.primes;
        let s1 = random_below(p1, rng);
        let s2 = random_below(p2, rng);
        let s3 = random_below(p3, rng);
        let delta = random_below(&(p1 * p2 * p3 * p5), rng);

        let zero_mod_p1 = self.chinese_remainder(0u32, s2, s3)?;
        let noisy = m + Rational::from_integer(s1 * zero_mod_p1.residue());

        let code = HenselCode::from_rational(self.modulus.clone(), &noisy)?;
        let mask = HenselCode::new(self.modulus.clone(), delta * p4)?;
        Ok(Ciphertext {
            code: code.try_add(&mask)?,
            weight: 1,
        })
    }

    /// Recovers the plaintext of a ciphertext under this key.
    pub fn decrypt(&self, c: &Ciphertext) -> Result<Rational> {
        self.public_key().check(c)?;
        let [p1, _, _, p4, _] = &self.primes;
        let noisy = c.code.project(p4)?.to_rational()?;
        HenselCode::from_rational(p1.clone(), &noisy)?.to_rational()
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey")
            .field("params", &self.params)
            .field("fingerprint", &self.public_key().fingerprint())
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct CiphertextRepr {
    code: HenselCode,
    weight: u32,
}

#[cfg(feature = "serde")]
impl TryFrom<CiphertextRepr> for Ciphertext {
    type Error = HenselError;
    fn try_from(repr: CiphertextRepr) -> Result<Self> {
        if repr.weight == 0 {
            return Err(HenselError::Parse("ciphertext weight must be positive".into()));
        }
        Ok(Self {
            code: repr.code,
            weight: repr.weight,
        })
    }
}

#[cfg(feature = "serde")]
impl From<Ciphertext> for CiphertextRepr {
    fn from(c: Ciphertext) -> Self {
        Self {
            code: c.code,
            weight: c.weight,
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct PublicKeyRepr {
    #[serde(with = "crate::serde_dec")]
    modulus: BigInt,
    capacity: u32,
}

#[cfg(feature = "serde")]
impl TryFrom<PublicKeyRepr> for PublicKey {
    type Error = HenselError;
    fn try_from(repr: PublicKeyRepr) -> Result<Self> {
        // Reuses the code-modulus rules: odd and at least 3.
        HenselCode::zero(repr.modulus.clone())?;
        if repr.capacity == 0 {
            return Err(HenselError::InvalidKey("capacity must be positive".into()));
        }
        Ok(Self {
            modulus: repr.modulus,
            capacity: repr.capacity,
        })
    }
}

#[cfg(feature = "serde")]
impl From<PublicKey> for PublicKeyRepr {
    fn from(pk: PublicKey) -> Self {
        Self {
            modulus: pk.modulus,
            capacity: pk.capacity,
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct SecretKeyRepr {
    params: KeyParams,
    #[serde(with = "crate::serde_dec")]
    p1: BigInt,
    #[serde(with = "crate::serde_dec")]
    p2: BigInt,
    #[serde(with = "crate::serde_dec")]
    p3: BigInt,
    #[serde(with = "crate::serde_dec")]
    p4: BigInt,
    #[serde(with = "crate::serde_dec")]
    p5: BigInt,
}

#[cfg(feature = "serde")]
impl TryFrom<SecretKeyRepr> for SecretKey {
    type Error = HenselError;
    fn try_from(r: SecretKeyRepr) -> Result<Self> {
        Self::from_primes(r.params, [r.p1, r.p2, r.p3, r.p4, r.p5])
    }
}

#[cfg(feature = "serde")]
impl From<SecretKey> for SecretKeyRepr {
    fn from(sk: SecretKey) -> Self {
        let [p1, p2, p3, p4, p5] = sk.primes;
        Self {
            params: sk.params,
            p1,
            p2,
            p3,
            p4,
            p5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SMALL: KeyParams = KeyParams {
        message_bits: 8,
        noise_bits: 12,
        capacity: 2,
    };

    fn q(n: i64, d: i64) -> Rational {
        Rational::new(n, d).expect("non-zero denominator")
    }

    fn small_key(seed: u64) -> (SecretKey, StdRng) {
        let mut rng = StdRng::seed_from_u64(seed);
        let key = SecretKey::generate(SMALL, &mut rng).expect("keygen");
        (key, rng)
    }

    #[test]
    fn params_validation() {
        assert!(KeyParams::default().validate().is_ok());
        for bad in [
            KeyParams { message_bits: 0, ..SMALL },
            KeyParams { noise_bits: 8, ..SMALL },
            KeyParams { capacity: 0, ..SMALL },
            KeyParams { capacity: MAX_CAPACITY + 1, ..SMALL },
            KeyParams { noise_bits: MAX_NOISE_BITS + 1, ..SMALL },
            KeyParams { message_bits: 1, noise_bits: 2, capacity: 1 },
            KeyParams { message_bits: 1, noise_bits: 3, capacity: 1 },
            KeyParams { message_bits: 1, noise_bits: MIN_NOISE_BITS - 1, capacity: 1 },
            KeyParams { message_bits: 64, noise_bits: 4096, capacity: MAX_CAPACITY },
        ] {
            assert!(
                matches!(bad.validate(), Err(HenselError::InvalidKeyParams(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn message_width_is_limited_only_through_p4_size() {
        let wide = KeyParams {
            message_bits: 2000,
            noise_bits: 2001,
            capacity: 1,
        };
        assert!(matches!(wide.validate(), Err(HenselError::InvalidKeyParams(_))));
        let too_wide = KeyParams {
            message_bits: 1500,
            noise_bits: 1501,
            capacity: 1,
        };
        assert!(too_wide.p4_bits() > MAX_P4_BITS);
        let fits = KeyParams {
            message_bits: 1100,
            noise_bits: 1101,
            capacity: 1,
        };
        assert!(fits.validate().is_ok(), "{}", fits.p4_bits());
    }

    #[test]
    fn tiny_noise_is_rejected_before_any_prime_search() {
        let tiny = KeyParams {
            message_bits: 1,
            noise_bits: 2,
            capacity: 1,
        };
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            SecretKey::generate(tiny, &mut rng),
            Err(HenselError::InvalidKeyParams(_))
        ));
    }

    #[test]
    fn smallest_accepted_params_generate_distinct_primes() {
        let min = KeyParams {
            message_bits: 1,
            noise_bits: MIN_NOISE_BITS,
            capacity: 1,
        };
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let key = SecretKey::generate(min, &mut rng).expect("keygen terminates");
            assert_eq!(key.prime_bits()[1], u64::from(MIN_NOISE_BITS));
            let q = Rational::new(-1, 1).expect("q");
            let c = key.encrypt(&q, &mut rng).expect("encrypt");
            assert_eq!(key.decrypt(&c).expect("decrypt"), q);
        }
    }

    #[test]
    fn derived_prime_sizes() {
        assert_eq!(SMALL.p1_bits(), 18);
        // fresh height: 8 + 2·18 + 2·12 + 2 = 70; p4: 2·2·71 + 2
        assert_eq!(SMALL.p4_bits(), 286);
    }

    #[test]
    fn generated_key_has_the_derived_sizes() {
        let (key, _) = small_key(1);
        assert_eq!(key.prime_bits(), [18, 12, 12, 286, 12]);
        assert_eq!(key.params(), &SMALL);
    }

    #[test]
    fn encrypt_then_decrypt_recovers_the_plaintext() {
        let (key, mut rng) = small_key(2);
        for m in [q(0, 1), q(3, 4), q(-5, 6), q(255, 1), q(-1, 255), q(17, 23)] {
            let c = key.encrypt(&m, &mut rng).expect("encrypt");
            assert_eq!(c.weight(), 1);
            assert_eq!(c.code().modulus(), key.public_key().modulus());
            assert_eq!(key.decrypt(&c), Ok(m));
        }
    }

    #[test]
    fn encryption_is_randomized() {
        let (key, mut rng) = small_key(3);
        let m = q(3, 4);
        let a = key.encrypt(&m, &mut rng).expect("a");
        let b = key.encrypt(&m, &mut rng).expect("b");
        assert_ne!(a, b);
        assert_eq!(key.decrypt(&a), key.decrypt(&b));
    }

    #[test]
    fn plaintext_must_fit_the_message_space() {
        let (key, mut rng) = small_key(4);
        for m in [q(256, 1), q(1, 256), q(-300, 7)] {
            assert!(matches!(
                key.encrypt(&m, &mut rng),
                Err(HenselError::PlaintextOutOfRange { bits: 8, .. })
            ));
        }
    }

    #[test]
    fn sums_and_products_decrypt_correctly() {
        let (key, mut rng) = small_key(5);
        let pk = key.public_key();
        let (a, b) = (q(3, 4), q(-5, 6));
        let ca = key.encrypt(&a, &mut rng).expect("a");
        let cb = key.encrypt(&b, &mut rng).expect("b");

        let sum = pk.add(&ca, &cb).expect("add");
        assert_eq!(sum.weight(), 2);
        assert_eq!(key.decrypt(&sum), Ok(q(-1, 12)));

        let product = pk.mul(&ca, &cb).expect("mul");
        assert_eq!(key.decrypt(&product), Ok(q(-5, 8)));
    }

    #[test]
    fn evaluation_respects_capacity() {
        let (key, mut rng) = small_key(6);
        let pk = key.public_key();
        let c = key.encrypt(&q(1, 2), &mut rng).expect("c");
        let twice = pk.add(&c, &c).expect("within capacity");
        assert_eq!(
            pk.mul(&twice, &c),
            Err(HenselError::CapacityExceeded {
                weight: 3,
                capacity: 2
            })
        );
    }

    #[test]
    fn ciphertexts_are_bound_to_their_key() {
        let (k1, mut rng) = small_key(7);
        let (k2, _) = small_key(8);
        let c = k1.encrypt(&q(1, 3), &mut rng).expect("c");
        assert!(matches!(
            k2.decrypt(&c),
            Err(HenselError::ModulusMismatch { .. })
        ));
        let c2 = k2.encrypt(&q(1, 3), &mut rng).expect("c2");
        assert!(matches!(
            k1.public_key().add(&c, &c2),
            Err(HenselError::ModulusMismatch { .. })
        ));
    }

    #[test]
    fn chinese_remainder_hits_each_prime() {
        let (key, _) = small_key(9);
        let code = key.chinese_remainder(38u32, 2u32, 1u32).expect("crt");
        let [p1, p2, p3, _, _] = &key.primes;
        assert_eq!(code.modulus(), &(p1 * p2 * p3));
        assert_eq!(code.residue() % p1, BigInt::from(38));
        assert_eq!(code.residue() % p2, BigInt::from(2));
        assert_eq!(code.residue() % p3, BigInt::from(1));
    }

    #[test]
    fn from_primes_accepts_a_generated_key() {
        let (key, _) = small_key(10);
        let rebuilt = SecretKey::from_primes(SMALL, key.primes.clone()).expect("valid");
        assert_eq!(rebuilt, key);
    }

    #[test]
    fn from_primes_rejects_bad_primes() {
        let (key, _) = small_key(11);
        let [p1, p2, p3, p4, p5] = key.primes.clone();

        let composite = [p1.clone(), p2.clone(), &p3 * BigInt::from(3), p4.clone(), p5.clone()];
        assert!(matches!(
            SecretKey::from_primes(SMALL, composite),
            Err(HenselError::InvalidKey(_))
        ));

        let repeated = [p1.clone(), p2.clone(), p2.clone(), p4.clone(), p5.clone()];
        assert!(matches!(
            SecretKey::from_primes(SMALL, repeated),
            Err(HenselError::InvalidKey(_))
        ));

        let small_p4 = [p1, p2, p3, BigInt::from(7919), p5];
        assert!(matches!(
            SecretKey::from_primes(SMALL, small_p4),
            Err(HenselError::InvalidKey(_))
        ));
    }

    #[test]
    fn debug_output_hides_the_primes() {
        let (key, _) = small_key(12);
        let shown = format!("{key:?}");
        assert!(shown.contains(&key.public_key().fingerprint()));
        let [p1, _, _, p4, _] = &key.primes;
        assert!(!shown.contains(&p1.to_string()));
        assert!(!shown.contains(&p4.to_string()));
    }

    #[test]
    fn fingerprint_is_stable_and_short() {
        let (key, _) = small_key(13);
        let fp = key.public_key().fingerprint();
        assert_eq!(fp.len(), 16);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(fp, key.public_key().fingerprint());
    }
}

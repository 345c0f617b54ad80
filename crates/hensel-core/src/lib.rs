// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! hensel-core: exact rationals, Hensel codes, and a noisy rational encryption scheme.
//!
//! A Hensel code is the residue `num · den⁻¹ (mod m)` of a rational `num/den`
//! for an odd modulus `m` coprime to `den`. Codes over the same modulus form a
//! ring; codes over coprime moduli can be glued together with the Chinese
//! remainder theorem; and a code whose rational has small enough height can be
//! turned back into that rational by rational reconstruction.
//!
//! The [`scheme`] module layers an experimental secret-key encryption scheme
//! on top: ciphertexts are Hensel codes modulo a product of five secret
//! primes, and support a bounded number of additions and multiplications.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions,
    clippy::use_self
)]

/// Arbitrary-precision integer helpers (modular inverse, primality, sampling).
pub mod bigint;
mod error;
mod hensel_code;
mod rational;
/// Key generation, encryption, decryption and ciphertext evaluation.
pub mod scheme;
#[cfg(feature = "serde")]
mod serde_dec;

pub use error::HenselError;
pub use hensel_code::{chinese_remainder, chinese_remainder_all, HenselCode};
pub use num_bigint::BigInt;
pub use rational::Rational;
pub use scheme::{Ciphertext, KeyParams, PublicKey, SecretKey};

/// Convenience alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, HenselError>;

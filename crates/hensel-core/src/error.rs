// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use num_bigint::BigInt;
use thiserror::Error;

/// Errors produced by rational, Hensel-code and scheme operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HenselError {
    /// A rational was built or divided with a zero denominator.
    #[error("denominator is zero")]
    ZeroDenominator,

    /// Hensel codes require an odd modulus of at least 3.
    #[error("invalid modulus {0}: must be odd and at least 3")]
    InvalidModulus(BigInt),

    /// `value` shares a factor with `modulus` and has no inverse.
    #[error("{value} is not invertible modulo {modulus}")]
    NotInvertible {
        /// The value that was inverted.
        value: BigInt,
        /// The modulus it was inverted under.
        modulus: BigInt,
    },

    /// Two codes (or a code and a key) disagree on the modulus.
    #[error("modulus mismatch: {left} vs {right}")]
    ModulusMismatch {
        /// Modulus of the left operand.
        left: BigInt,
        /// Modulus of the right operand.
        right: BigInt,
    },

    /// CRT inputs must have coprime moduli.
    #[error("moduli {left} and {right} are not coprime")]
    ModuliNotCoprime {
        /// First modulus.
        left: BigInt,
        /// Second modulus.
        right: BigInt,
    },

    /// No rational of height at most `√(m/2)` maps to the residue.
    #[error("rational reconstruction failed for residue {residue} (mod {modulus})")]
    ReconstructionFailed {
        /// Residue that could not be reconstructed.
        residue: BigInt,
        /// Modulus of the code.
        modulus: BigInt,
    },

    /// An operation that folds over its input was given nothing.
    #[error("empty input")]
    EmptyInput,

    /// Text could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Key parameters are out of range.
    #[error("invalid key parameters: {0}")]
    InvalidKeyParams(String),

    /// A secret key failed validation.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Plaintext numerator or denominator does not fit in the message space.
    #[error("plaintext {value} exceeds the {bits}-bit message space")]
    PlaintextOutOfRange {
        /// Display form of the rejected plaintext.
        value: String,
        /// Configured message size in bits.
        bits: u32,
    },

    /// Evaluating the ciphertexts would exceed the key's capacity.
    #[error("ciphertext weight {weight} exceeds key capacity {capacity}")]
    CapacityExceeded {
        /// Weight the result would have.
        weight: u32,
        /// Capacity of the key.
        capacity: u32,
    },
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use hensel_core::{BigInt, HenselCode, Rational};

/// Parsed command line.
#[derive(Parser, Debug)]
#[command(
    name = "hensel",
    version,
    about = "Hensel-code arithmetic and noisy rational encryption",
    long_about = None,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding `cli.json` prefs (defaults to the platform config dir).
    #[arg(long, env = "HENSEL_CONFIG_DIR", global = true)]
    pub config_dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a secret key (and optionally its public half).
    Keygen(KeygenArgs),
    /// Encode a rational as a Hensel code.
    Encode {
        /// Odd modulus, at least 3.
        #[arg(long, short)]
        modulus: BigInt,
        /// Rational such as `3/4`, `-1/8` or `6`.
        #[arg(allow_hyphen_values = true)]
        value: Rational,
    },
    /// Reconstruct the rational behind a residue.
    Decode {
        /// Odd modulus, at least 3.
        #[arg(long, short)]
        modulus: BigInt,
        /// Residue (reduced modulo the modulus).
        #[arg(allow_hyphen_values = true)]
        residue: BigInt,
    },
    /// Combine codes over coprime moduli with the Chinese remainder theorem.
    Crt {
        /// Codes as `RESIDUE:MODULUS`; at least two.
        #[arg(required = true, num_args = 2.., value_parser = parse_code)]
        codes: Vec<HenselCode>,
    },
    /// Encrypt a rational under a secret key.
    Encrypt {
        /// Secret key file (falls back to `key_path` in prefs).
        #[arg(long, short)]
        key: Option<PathBuf>,
        /// Rational such as `3/4`.
        #[arg(allow_hyphen_values = true)]
        value: Rational,
        /// Write the ciphertext here instead of stdout.
        #[arg(long, short)]
        out: Option<PathBuf>,
        /// Seed the sampler (reproducible ciphertexts; testing only).
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Decrypt a ciphertext file.
    Decrypt {
        /// Secret key file (falls back to `key_path` in prefs).
        #[arg(long, short)]
        key: Option<PathBuf>,
        /// Ciphertext JSON file.
        ciphertext: PathBuf,
    },
    /// Add or multiply two ciphertexts without the secret key.
    Eval {
        /// Operation to apply.
        op: EvalOp,
        /// Public key file (a secret key file also works).
        #[arg(long)]
        public: PathBuf,
        /// Left ciphertext.
        left: PathBuf,
        /// Right ciphertext.
        right: PathBuf,
        /// Write the result here instead of stdout.
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
    /// Show key parameters, prime sizes and fingerprint.
    Inspect {
        /// Secret key file (falls back to `key_path` in prefs).
        #[arg(long, short)]
        key: Option<PathBuf>,
    },
    /// Show or initialize saved prefs.
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Flags for `keygen`; unset sizes fall back to prefs.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Plaintext numerator/denominator size in bits.
    #[arg(long)]
    pub message_bits: Option<u32>,
    /// Noise prime size in bits (must exceed message bits).
    #[arg(long)]
    pub noise_bits: Option<u32>,
    /// How many fresh ciphertexts one evaluated result may combine.
    #[arg(long)]
    pub capacity: Option<u32>,
    /// Secret key output path.
    #[arg(long, short)]
    pub out: PathBuf,
    /// Also write the public key here.
    #[arg(long)]
    pub public_out: Option<PathBuf>,
    /// Seed the prime search (reproducible keys; testing only).
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Homomorphic operation for `eval`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvalOp {
    /// Encrypted sum.
    Add,
    /// Encrypted product.
    Mul,
}

/// `config` subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective prefs as JSON.
    Show,
    /// Write default prefs if none are stored.
    Init,
}

fn parse_code(text: &str) -> Result<HenselCode, String> {
    let (residue, modulus) = text
        .split_once(':')
        .ok_or_else(|| format!("expected RESIDUE:MODULUS, got {text:?}"))?;
    let residue: BigInt = residue
        .trim()
        .parse()
        .map_err(|e| format!("bad residue in {text:?}: {e}"))?;
    let modulus: BigInt = modulus
        .trim()
        .parse()
        .map_err(|e| format!("bad modulus in {text:?}: {e}"))?;
    HenselCode::new(modulus, residue).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn codes_parse_from_residue_colon_modulus() {
        let hc = parse_code("38:4919").expect("code");
        assert_eq!(hc.to_string(), "38 (mod 4919)");
        assert!(parse_code("38").is_err());
        assert!(parse_code("x:7").is_err());
        assert!(parse_code("1:8").is_err());
    }

    #[test]
    fn negative_rationals_are_values_not_flags() {
        let cli = Cli::try_parse_from(["hensel", "encode", "-m", "7919", "-1/8"]).expect("parse");
        match cli.command {
            Commands::Encode { value, .. } => assert_eq!(value.to_string(), "-1/8"),
            other => panic!("unexpected command {other:?}"),
        }
    }
}

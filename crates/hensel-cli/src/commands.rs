// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use comfy_table::{presets::UTF8_FULL, Table};
use hensel_config::prefs::CLI_PREFS_KEY;
use hensel_config::{CliPrefs, ConfigService, FsConfigStore};
use hensel_core::{
    chinese_remainder_all, BigInt, Ciphertext, HenselCode, KeyParams, Rational, SecretKey,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::cli::{Cli, Commands, ConfigCommand, EvalOp, KeygenArgs};
use crate::files::{emit_json, read_json, read_public_key, write_json};

pub(crate) fn run(cli: Cli) -> Result<()> {
    let config = open_config(cli.config_dir.as_deref());
    let prefs = load_prefs(config.as_ref());

    match cli.command {
        Commands::Keygen(args) => keygen(&args, &prefs),
        Commands::Encode { modulus, value } => encode(modulus, &value),
        Commands::Decode { modulus, residue } => decode(modulus, residue),
        Commands::Crt { codes } => crt(&codes),
        Commands::Encrypt {
            key,
            value,
            out,
            seed,
        } => encrypt(&resolve_key(key, &prefs)?, &value, out.as_deref(), seed),
        Commands::Decrypt { key, ciphertext } => decrypt(&resolve_key(key, &prefs)?, &ciphertext),
        Commands::Eval {
            op,
            public,
            left,
            right,
            out,
        } => eval(op, &public, &left, &right, out.as_deref()),
        Commands::Inspect { key } => inspect(&resolve_key(key, &prefs)?),
        Commands::Config(cmd) => config_cmd(&cmd, config.as_ref(), &prefs),
    }
}

/// Config is best-effort: a missing or unwritable config dir only costs prefs.
fn open_config(dir: Option<&Path>) -> Option<ConfigService<FsConfigStore>> {
    let store = match dir {
        Some(dir) => FsConfigStore::at(dir),
        None => FsConfigStore::new(),
    };
    match store {
        Ok(store) => Some(ConfigService::new(store)),
        Err(err) => {
            warn!(%err, "config store unavailable; using defaults");
            None
        }
    }
}

fn load_prefs(config: Option<&ConfigService<FsConfigStore>>) -> CliPrefs {
    let Some(config) = config else {
        return CliPrefs::default();
    };
    match config.load::<CliPrefs>(CLI_PREFS_KEY) {
        Ok(prefs) => prefs.unwrap_or_default(),
        Err(err) => {
            warn!(%err, "ignoring unreadable prefs");
            CliPrefs::default()
        }
    }
}

fn resolve_key(flag: Option<PathBuf>, prefs: &CliPrefs) -> Result<PathBuf> {
    flag.or_else(|| prefs.key_path.as_ref().map(PathBuf::from))
        .context("no key given: pass --key or set key_path in prefs")
}

fn load_secret_key(path: &Path) -> Result<SecretKey> {
    let key: SecretKey = read_json(path)?;
    debug!(fingerprint = %key.public_key().fingerprint(), "loaded secret key");
    Ok(key)
}

fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            warn!("using a fixed seed; output is reproducible and not secret");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    }
}

fn keygen(args: &KeygenArgs, prefs: &CliPrefs) -> Result<()> {
    let params = KeyParams {
        message_bits: args.message_bits.unwrap_or(prefs.message_bits),
        noise_bits: args.noise_bits.unwrap_or(prefs.noise_bits),
        capacity: args.capacity.unwrap_or(prefs.capacity),
    };
    params.validate()?;
    info!(
        message_bits = params.message_bits,
        noise_bits = params.noise_bits,
        capacity = params.capacity,
        p1_bits = params.p1_bits(),
        p4_bits = params.p4_bits(),
        "generating key"
    );

    let started = Instant::now();
    let mut rng = rng_for(args.seed);
    let key = SecretKey::generate(params, &mut rng)?;
    info!(elapsed_ms = started.elapsed().as_millis(), "key generated");

    write_json(&args.out, &key, true)?;
    let public = key.public_key();
    if let Some(path) = &args.public_out {
        write_json(path, &public, false)?;
    }
    println!("fingerprint: {}", public.fingerprint());
    Ok(())
}

fn encode(modulus: BigInt, value: &Rational) -> Result<()> {
    let code = HenselCode::from_rational(modulus, value)?;
    println!("{code}");
    Ok(())
}

fn decode(modulus: BigInt, residue: BigInt) -> Result<()> {
    let code = HenselCode::new(modulus, residue)?;
    debug!(bound = %code.reconstruction_bound(), "reconstructing");
    println!("{}", code.to_rational()?);
    Ok(())
}

fn crt(codes: &[HenselCode]) -> Result<()> {
    println!("{}", chinese_remainder_all(codes)?);
    Ok(())
}

fn encrypt(key: &Path, value: &Rational, out: Option<&Path>, seed: Option<u64>) -> Result<()> {
    let key = load_secret_key(key)?;
    let mut rng = rng_for(seed);
    let ciphertext = key.encrypt(value, &mut rng)?;
    emit_json(out, &ciphertext)
}

fn decrypt(key: &Path, ciphertext: &Path) -> Result<()> {
    let key = load_secret_key(key)?;
    let ciphertext: Ciphertext = read_json(ciphertext)?;
    let plain = key
        .decrypt(&ciphertext)
        .context("decryption failed (wrong key, or result outside the message space)")?;
    println!("{plain}");
    Ok(())
}

fn eval(op: EvalOp, public: &Path, left: &Path, right: &Path, out: Option<&Path>) -> Result<()> {
    let pk = read_public_key(public)?;
    let a: Ciphertext = read_json(left)?;
    let b: Ciphertext = read_json(right)?;
    let result = match op {
        EvalOp::Add => pk.add(&a, &b)?,
        EvalOp::Mul => pk.mul(&a, &b)?,
    };
    debug!(weight = result.weight(), capacity = pk.capacity(), "evaluated");
    emit_json(out, &result)
}

fn inspect(key: &Path) -> Result<()> {
    let key = load_secret_key(key)?;
    let params = key.params();
    let public = key.public_key();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["field", "value"]);
    table.add_row(vec!["fingerprint".to_owned(), public.fingerprint()]);
    table.add_row(vec!["message_bits".to_owned(), params.message_bits.to_string()]);
    table.add_row(vec!["noise_bits".to_owned(), params.noise_bits.to_string()]);
    table.add_row(vec!["capacity".to_owned(), params.capacity.to_string()]);
    for (i, bits) in key.prime_bits().iter().enumerate() {
        table.add_row(vec![format!("p{} bits", i + 1), bits.to_string()]);
    }
    table.add_row(vec![
        "modulus bits".to_owned(),
        public.modulus().bits().to_string(),
    ]);
    println!("{table}");
    Ok(())
}

fn config_cmd(
    cmd: &ConfigCommand,
    config: Option<&ConfigService<FsConfigStore>>,
    prefs: &CliPrefs,
) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            println!("{}", serde_json::to_string_pretty(prefs)?);
        }
        ConfigCommand::Init => {
            let Some(config) = config else {
                bail!("no config directory available");
            };
            if config.load::<CliPrefs>(CLI_PREFS_KEY)?.is_some() {
                info!("prefs already present; leaving them untouched");
            } else {
                config.save(CLI_PREFS_KEY, &CliPrefs::default())?;
            }
            println!("{}", config.store().base().join("cli.json").display());
        }
    }
    Ok(())
}

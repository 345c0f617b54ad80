// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! JSON file helpers for keys and ciphertexts.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::Path;

use anyhow::{Context, Result};
use hensel_core::{PublicKey, SecretKey};
use serde::{de::DeserializeOwned, Serialize};

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse {}", path.display()))
}

/// Writes pretty JSON; `private` files end up owner-only on unix, even when
/// they already existed.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T, private: bool) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        if private {
            options.mode(0o600);
        }
    }
    #[cfg(not(unix))]
    let _ = private;

    let mut file = options
        .open(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    // `mode` only applies on creation; an overwritten file keeps its old bits.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if private {
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .with_context(|| format!("failed to restrict {}", path.display()))?;
        }
    }
    serde_json::to_writer_pretty(&mut file, value)
        .with_context(|| format!("failed to write {}", path.display()))?;
    file.write_all(b"\n")?;
    Ok(())
}

/// Pretty JSON on stdout, or into `out` when given.
pub(crate) fn emit_json<T: Serialize>(out: Option<&Path>, value: &T) -> Result<()> {
    match out {
        Some(path) => write_json(path, value, false),
        None => {
            println!("{}", serde_json::to_string_pretty(value)?);
            Ok(())
        }
    }
}

/// Loads a public key, accepting a secret key file in its place.
pub(crate) fn read_public_key(path: &Path) -> Result<PublicKey> {
    let raw: serde_json::Value = read_json(path)?;
    if raw.get("p1").is_some() {
        let sk: SecretKey = serde_json::from_value(raw)
            .with_context(|| format!("invalid secret key in {}", path.display()))?;
        return Ok(sk.public_key());
    }
    serde_json::from_value(raw).with_context(|| format!("invalid public key in {}", path.display()))
}

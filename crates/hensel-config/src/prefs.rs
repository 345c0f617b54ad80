// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Saved preferences for the `hensel` CLI.

use serde::{Deserialize, Serialize};

/// Config key the CLI stores its prefs under.
pub const CLI_PREFS_KEY: &str = "cli";

/// Defaults applied when a command does not pass the matching flag.
///
/// Missing fields in a stored file fall back to [`CliPrefs::default`], so old
/// files keep loading after new fields are added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliPrefs {
    /// Plaintext size in bits for `keygen`.
    pub message_bits: u32,
    /// Noise prime size in bits for `keygen`.
    pub noise_bits: u32,
    /// Ciphertext capacity for `keygen`.
    pub capacity: u32,
    /// Secret key used when `--key` is omitted.
    pub key_path: Option<String>,
}

impl Default for CliPrefs {
    fn default() -> Self {
        Self {
            message_bits: 32,
            noise_bits: 48,
            capacity: 2,
            key_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_files_fill_in_defaults() {
        let prefs: CliPrefs =
            serde_json::from_str(r#"{ "capacity": 4 }"#).expect("partial prefs");
        assert_eq!(
            prefs,
            CliPrefs {
                capacity: 4,
                ..CliPrefs::default()
            }
        );
    }
}

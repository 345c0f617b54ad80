// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Typed JSON prefs on top of a byte-blob store.
//!
//! A store only moves bytes under a key; [`ConfigService`] owns the JSON
//! encoding. A missing key and an empty blob both read as "no prefs yet".

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Where prefs blobs live. Keys are logical names such as `"cli"`.
pub trait ConfigStore {
    /// Reads the blob stored under `key`; [`ConfigError::NotFound`] when absent.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Replaces the blob stored under `key`.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Failures while reading or writing prefs.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Nothing stored under the key.
    #[error("not found")]
    NotFound,
    /// Keys become file names, so they are restricted to `[A-Za-z0-9_-]`.
    #[error("invalid config key {0:?}")]
    InvalidKey(String),
    /// The platform has no per-user config directory (no home dir).
    #[error("no per-user config directory on this platform")]
    NoConfigDir,
    /// Filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Stored bytes are not valid JSON for the requested type.
    #[error("malformed prefs: {0}")]
    Serde(#[from] serde_json::Error),
}

/// JSON (de)serialization over a [`ConfigStore`].
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Wraps `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The wrapped store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: ConfigStore> ConfigService<S> {
    /// Reads prefs stored under `key`; `Ok(None)` when nothing is stored yet.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        let bytes = match self.store.load_raw(key) {
            Err(ConfigError::NotFound) => return Ok(None),
            other => other?,
        };
        if bytes.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Writes `value` under `key` as pretty JSON.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ConfigError> {
        self.store.save_raw(key, &serde_json::to_vec_pretty(value)?)
    }
}

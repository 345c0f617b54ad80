// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Config service and storage port for hensel tools.
//! Keeps the CLI thin: it only picks a store and a key.

pub mod config;
pub mod fs;
pub mod prefs;

pub use config::{ConfigError, ConfigService, ConfigStore};
pub use fs::FsConfigStore;
pub use prefs::CliPrefs;

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! CLI entry point for `hensel`.

use anyhow::Result;
use hensel_cli::entrypoint;

fn main() -> Result<()> {
    entrypoint()
}

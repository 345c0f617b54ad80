// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Hensel repository maintenance tasks.
//!
//! This crate exists to provide a single, discoverable entrypoint for repo automation via
//! `cargo xtask …` (see `.cargo/config.toml`).
//!
//! Invariants:
//! - `ci` runs exactly the steps of `.github/workflows/ci.yml`, in the same order.
//! - `bench` runs exactly the step of `.github/workflows/bench.yml`.
//! - The first failing step stops the run; nothing after it executes.
#![allow(clippy::print_stdout)]

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::ffi::{OsStr, OsString};
use std::process::Command;

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Hensel repo maintenance tasks (cargo xtask …)",
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the CI workflow steps locally: fmt, clippy, check, test, release build.
    Ci(CiArgs),
    /// Run `cargo bench`, passing anything after `--` through.
    Bench(BenchArgs),
}

#[derive(Args)]
struct CiArgs {
    /// Print the steps without running them.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args)]
struct BenchArgs {
    /// Extra arguments for `cargo bench` (e.g. `-- -p hensel-benches --bench scheme`).
    #[arg(last = true)]
    args: Vec<String>,
}

/// One cargo invocation in a pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    name: &'static str,
    args: Vec<String>,
}

impl Step {
    fn new(name: &'static str, args: &[&str]) -> Self {
        Self {
            name,
            args: args.iter().map(|a| (*a).to_owned()).collect(),
        }
    }

    fn display(&self) -> String {
        format!("cargo {}", self.args.join(" "))
    }
}

/// Mirrors the `ci.yml` job after toolchain setup.
fn ci_plan() -> Vec<Step> {
    vec![
        Step::new("fmt", &["fmt", "--all", "--", "--check"]),
        Step::new("clippy", &["clippy", "--", "-D", "warnings"]),
        Step::new("check", &["check"]),
        Step::new("test", &["test", "--all"]),
        Step::new("build", &["build", "--release"]),
    ]
}

fn bench_plan(extra: &[String]) -> Vec<Step> {
    let mut step = Step::new("bench", &["bench"]);
    step.args.extend(extra.iter().cloned());
    vec![step]
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci(args) => {
            let plan = ci_plan();
            if args.dry_run {
                print_plan(&plan);
                return Ok(());
            }
            run_plan(&plan)
        }
        Commands::Bench(args) => run_plan(&bench_plan(&args.args)),
    }
}

fn print_plan(plan: &[Step]) {
    for (i, step) in plan.iter().enumerate() {
        println!("{}. {:<6} {}", i + 1, step.name, step.display());
    }
}

fn cargo() -> OsString {
    std::env::var_os("CARGO").unwrap_or_else(|| OsString::from("cargo"))
}

fn run_plan(plan: &[Step]) -> Result<()> {
    let cargo = cargo();
    print_versions(&cargo)?;
    run_steps(&cargo, plan)
}

/// Runs `program <step args>` for each step; the first failure ends the run.
fn run_steps(program: &OsStr, plan: &[Step]) -> Result<()> {
    for step in plan {
        println!("==> {}: {}", step.name, step.display());
        let status = Command::new(program)
            .args(&step.args)
            .status()
            .with_context(|| format!("failed to spawn cargo for step `{}`", step.name))?;
        if !status.success() {
            bail!("step `{}` failed (exit status: {status})", step.name);
        }
    }
    Ok(())
}

/// Same as the workflows' "show versions" step.
fn print_versions(cargo: &OsString) -> Result<()> {
    for (tool, program) in [("rustc", OsString::from("rustc")), ("cargo", cargo.clone())] {
        let status = Command::new(&program)
            .arg("--version")
            .status()
            .with_context(|| format!("failed to spawn `{tool}` (is a Rust toolchain installed?)"))?;
        if !status.success() {
            bail!("`{tool} --version` failed (exit status: {status})");
        }
    }
    Ok(())
}

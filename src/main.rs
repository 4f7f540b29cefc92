// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! jackc - compiles Jack classes to stack-machine VM code
//!
//! This is the main entry point for the jackc binary.
//!
//! ## Features
//!
//! - Compiles single files or whole directories of `.jack` sources
//! - Parallel compilation, one class per file
//! - Layered configuration from `jackc.toml`, the environment and flags

mod cli;
mod config;
mod driver;

use std::process::ExitCode;

use clap::Parser;
use owo_colors::OwoColorize;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use config::Config;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(summary) if summary.is_success() => ExitCode::SUCCESS,
        Ok(summary) => {
            eprintln!(
                "{}: {} of {} file(s) failed",
                "error".red().bold(),
                summary.failed,
                summary.compiled + summary.failed + summary.skipped
            );
            ExitCode::FAILURE
        }
        Err(err) => {
            driver::report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<driver::Summary> {
    let config = Config::load(cli)?;
    let files = driver::discover(&cli.inputs)?;
    if files.is_empty() {
        anyhow::bail!("no .{} files found", driver::SOURCE_EXTENSION);
    }
    driver::run(&files, &config, cli.stdout)
}

/// `RUST_LOG` takes precedence; otherwise warnings, or debug with `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

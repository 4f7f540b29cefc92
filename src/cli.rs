// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Command line arguments.

use std::path::PathBuf;

use clap::Parser;

/// jackc - compiles Jack classes to stack-machine VM code
#[derive(Parser, Debug, Default)]
#[command(name = "jackc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// `.jack` files, or directories whose `.jack` files are compiled
    #[arg(required = true, value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,

    /// Write `.vm` files here instead of next to their sources
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Stop at the first file that fails to compile
    #[arg(long)]
    pub fail_fast: bool,

    /// Prefix for generated labels
    #[arg(long, value_name = "PREFIX")]
    pub label_prefix: Option<String>,

    /// Restart label numbering in every subroutine
    #[arg(long)]
    pub reset_labels: bool,

    /// Configuration file (default: ./jackc.toml if present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print VM code to stdout instead of writing files
    #[arg(long)]
    pub stdout: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from([
            "jackc",
            "Main.jack",
            "lib",
            "--out-dir",
            "build",
            "--fail-fast",
            "--label-prefix",
            "X",
            "-v",
        ]);
        assert_eq!(cli.inputs, [PathBuf::from("Main.jack"), PathBuf::from("lib")]);
        assert_eq!(cli.out_dir, Some(PathBuf::from("build")));
        assert!(cli.fail_fast);
        assert_eq!(cli.label_prefix.as_deref(), Some("X"));
        assert!(cli.verbose);
        assert!(!cli.stdout);
    }

    #[test]
    fn test_inputs_required() {
        assert!(Cli::try_parse_from(["jackc"]).is_err());
    }
}

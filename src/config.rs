// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Driver configuration.
//!
//! Layers, later ones winning: built-in defaults, `jackc.toml` (or the file
//! given with `--config`), `JACKC_*` environment variables, command line
//! flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jackc_compiler::CompileOptions;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cli::Cli;

/// Config file looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "jackc.toml";

/// Configuration for a compiler run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output directory; `None` writes next to each source
    pub out_dir: Option<PathBuf>,

    /// Stop at the first failing file
    pub fail_fast: bool,

    /// Options passed to every compilation
    pub compile: CompileOptions,
}

impl Config {
    /// Loads every layer for the given command line.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)?
                } else {
                    Self::default()
                }
            }
        };

        config.load_from_env(|key| std::env::var(key).ok());
        config.apply_cli(cli);
        debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Parses a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Applies `JACKC_LABEL_PREFIX` and `JACKC_OUT_DIR`.
    fn load_from_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(prefix) = var("JACKC_LABEL_PREFIX") {
            self.compile.label_prefix = prefix;
        }
        if let Some(dir) = var("JACKC_OUT_DIR") {
            self.out_dir = Some(PathBuf::from(dir));
        }
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(dir) = &cli.out_dir {
            self.out_dir = Some(dir.clone());
        }
        if let Some(prefix) = &cli.label_prefix {
            self.compile.label_prefix = prefix.clone();
        }
        self.fail_fast |= cli.fail_fast;
        self.compile.reset_labels_per_subroutine |= cli.reset_labels;
    }
}

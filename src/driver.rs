// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Batch compilation of `.jack` sources.
//!
//! Every file is an independent compilation unit, so files are compiled in
//! parallel with rayon. Results are then reported and written in input
//! order, and a file's `.vm` output is only written once its whole class
//! compiled.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use jackc_compiler::{CompileOptions, compile_with};
use owo_colors::OwoColorize;
use rayon::prelude::*;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::Config;

/// Source file extension.
pub const SOURCE_EXTENSION: &str = "jack";

/// Output file extension.
pub const OUTPUT_EXTENSION: &str = "vm";

/// Outcome of a batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Files compiled and written
    pub compiled: usize,
    /// Files that failed
    pub failed: usize,
    /// Files never reported because an earlier one failed with `fail_fast`
    pub skipped: usize,
}

impl Summary {
    /// True if every file compiled.
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }
}

/// Expands the inputs into the list of source files to compile.
///
/// Files are taken as given. Directories contribute their top-level
/// `.jack` files in name order.
pub fn discover(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let mut found = Vec::new();
            for entry in WalkDir::new(input).min_depth(1).max_depth(1) {
                let entry =
                    entry.with_context(|| format!("failed to read {}", input.display()))?;
                let path = entry.path();
                if entry.file_type().is_file()
                    && path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION)
                {
                    found.push(path.to_path_buf());
                }
            }
            found.sort();
            debug!(dir = %input.display(), files = found.len(), "scanned directory");
            files.extend(found);
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            bail!("no such file or directory: {}", input.display());
        }
    }

    Ok(files)
}

/// Where the VM code for `source` goes.
pub fn output_path(source: &Path, out_dir: Option<&Path>) -> PathBuf {
    let file_name = source.with_extension(OUTPUT_EXTENSION);
    match (out_dir, file_name.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => file_name,
    }
}

/// Reads and compiles one source file.
pub fn compile_file(path: &Path, options: &CompileOptions) -> Result<String> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    debug!(file = %path.display(), "compiling");
    compile_with(&source, options).with_context(|| path.display().to_string())
}

/// Compiles `files`, writing `.vm` files or printing VM code to stdout.
pub fn run(files: &[PathBuf], config: &Config, to_stdout: bool) -> Result<Summary> {
    if let Some(dir) = &config.out_dir {
        if !to_stdout {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
    }

    let results: Vec<Result<String>> = files
        .par_iter()
        .map(|path| compile_file(path, &config.compile))
        .collect();

    let mut summary = Summary::default();
    for (index, (path, result)) in files.iter().zip(results).enumerate() {
        match result {
            Ok(vm) if to_stdout => {
                print!("{}", vm);
                summary.compiled += 1;
            }
            Ok(vm) => {
                let target = output_path(path, config.out_dir.as_deref());
                fs::write(&target, vm)
                    .with_context(|| format!("failed to write {}", target.display()))?;
                info!(source = %path.display(), output = %target.display(), "wrote");
                summary.compiled += 1;
            }
            Err(err) => {
                report_error(&err);
                summary.failed += 1;
                if config.fail_fast {
                    summary.skipped = files.len() - index - 1;
                    break;
                }
            }
        }
    }

    Ok(summary)
}

/// Prints an error and its context chain to stderr.
pub fn report_error(err: &anyhow::Error) {
    eprintln!("{}: {:#}", "error".red().bold(), err);
}

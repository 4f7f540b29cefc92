// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Compile options.

use serde::{Deserialize, Serialize};

/// Options controlling how a class is compiled.
///
/// Deserializable so a driver can read it straight out of a config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Prefix of every generated label; the label counter is appended
    pub label_prefix: String,

    /// Restart label numbering at every subroutine instead of once per class
    pub reset_labels_per_subroutine: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            label_prefix: "L".to_string(),
            reset_labels_per_subroutine: false,
        }
    }
}

impl CompileOptions {
    /// Formats the label for counter value `n`.
    pub fn label(&self, n: usize) -> String {
        format!("{}{}", self.label_prefix, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_label() {
        assert_eq!(CompileOptions::default().label(3), "L3");
    }

    #[test]
    fn test_custom_prefix() {
        let options = CompileOptions {
            label_prefix: "Main.loop".to_string(),
            ..Default::default()
        };
        assert_eq!(options.label(0), "Main.loop0");
    }
}

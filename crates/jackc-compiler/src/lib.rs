// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # jackc-compiler
//!
//! A single-pass compiler from the Jack language to stack-machine VM code.
//!
//! ## Overview
//!
//! There is no abstract syntax tree. Lexing, parsing, symbol resolution and
//! code generation happen in one recursive-descent pass:
//! - [`lexer`] turns source text into tokens on demand
//! - [`compiler::codegen::SymbolTable`] tracks class and subroutine scopes
//! - [`compiler::VmWriter`] appends one VM instruction per call
//! - [`compiler::CompilationEngine`] drives all of the above
//!
//! ## Quick Start
//!
//! ```rust
//! let vm = jackc_compiler::compile(
//!     "class Main { function void main() { do Output.printInt(1 + 2); return; } }",
//! )?;
//! assert!(vm.starts_with("function Main.main 0\n"));
//! # Ok::<(), jackc_compiler::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compiler;
pub mod error;
pub mod lexer;
pub mod options;

pub use compiler::CompilationEngine;
pub use error::{Error, Position, Result};
pub use options::CompileOptions;

/// Compiles one class with the default [`CompileOptions`] and returns the VM code.
pub fn compile(source: &str) -> Result<String> {
    compile_with(source, &CompileOptions::default())
}

/// Compiles one class and returns the VM code as text.
///
/// Every call starts from fresh state, so compiling the same source twice
/// yields byte-identical output.
pub fn compile_with(source: &str, options: &CompileOptions) -> Result<String> {
    let engine = CompilationEngine::new(source, Vec::new(), options.clone())?;
    let bytes = engine.compile_class()?;
    String::from_utf8(bytes).map_err(|e| Error::Io(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_minimal_class() {
        let vm = compile("class Main { }").unwrap();
        assert!(vm.is_empty());
    }

    #[test]
    fn test_compile_is_idempotent() {
        let src = "class Main { function void main() { var int i; \
                   while (i < 3) { let i = i + 1; } return; } }";
        assert_eq!(compile(src).unwrap(), compile(src).unwrap());
    }

    #[test]
    fn test_compile_with_label_prefix() {
        let options = CompileOptions {
            label_prefix: "Main$".to_string(),
            ..Default::default()
        };
        let vm = compile_with(
            "class Main { function void main() { while (true) { } return; } }",
            &options,
        )
        .unwrap();
        assert!(vm.contains("label Main$0\n"));
        assert!(vm.contains("if-goto Main$1\n"));
    }

    #[test]
    fn test_compile_reports_errors() {
        let err = compile("class { }").unwrap_err();
        assert!(matches!(err, Error::Syntax { .. }));
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Jack to VM code compiler.
//!
//! # Module Structure
//!
//! - `bytecode`: VM instruction definitions
//! - `writer`: append-only instruction emitter
//! - `codegen`: the single-pass compilation engine
//!   - `codegen::scope`: class and subroutine scopes

pub mod bytecode;
pub mod codegen;
pub mod writer;

pub use bytecode::{Command, Instruction, Segment};
pub use codegen::{CompilationEngine, SubroutineKind, Symbol, SymbolKind, SymbolTable};
pub use writer::VmWriter;

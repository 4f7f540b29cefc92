// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Lexical analysis (tokenization) for Jack source code.
//!
//! The lexer transforms Jack source text into a stream of tokens that the
//! compilation engine pulls one at a time.
//!
//! ## Structure
//!
//! - `scanner.rs` - Main `Scanner` struct that produces tokens
//! - `token.rs` - `Token`, `TokenKind` and `Keyword` definitions
//!
//! ## Usage
//!
//! ```rust
//! use jackc_compiler::lexer::Scanner;
//!
//! let mut scanner = Scanner::new("let x = 42;")?;
//!
//! while scanner.has_more() {
//!     let token = scanner.advance()?;
//!     println!("{}", token.kind);
//! }
//! # Ok::<(), jackc_compiler::Error>(())
//! ```

mod scanner;
mod token;

pub use scanner::{Scanner, strip_comments};
pub use token::{Keyword, MAX_INTEGER, SYMBOLS, Span, Token, TokenKind, is_symbol};

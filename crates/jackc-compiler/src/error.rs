// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error types for the compiler.

use std::fmt;
use thiserror::Error;

/// Result type for compiler operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A 1-based line/column location in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Line number, starting at 1
    pub line: usize,
    /// Column number in characters, starting at 1
    pub column: usize,
}

impl Position {
    /// Computes the position of a byte offset within `source`.
    pub fn at(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors that abort the compilation of a class.
///
/// All of them are fatal: the compiler never recovers, and any VM code
/// emitted before the error must be discarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed token: bad string constant, unknown character run, etc.
    #[error("{position}: LexicalError: {message}")]
    Lexical {
        /// What went wrong
        message: String,
        /// Where it went wrong
        position: Position,
    },

    /// The token sequence does not match the grammar.
    #[error("{position}: SyntaxError: expected {expected}, found {found}")]
    Syntax {
        /// The grammar expectation that was not met
        expected: String,
        /// The offending token
        found: String,
        /// Where the offending token starts
        position: Position,
    },

    /// Well-formed source that cannot be compiled: an unresolved or
    /// uncallable name, or a value that does not fit its 16-bit slot.
    #[error("{position}: SemanticError: {message}")]
    Semantic {
        /// What went wrong
        message: String,
        /// Where the identifier appears
        position: Position,
    },

    /// The output sink failed.
    #[error("IOError: {0}")]
    Io(String),
}

impl Error {
    /// Create a new lexical error
    pub fn lexical(message: impl Into<String>, position: Position) -> Self {
        Self::Lexical {
            message: message.into(),
            position,
        }
    }

    /// Create a new syntax error
    pub fn syntax(
        expected: impl Into<String>,
        found: impl Into<String>,
        position: Position,
    ) -> Self {
        Self::Syntax {
            expected: expected.into(),
            found: found.into(),
            position,
        }
    }

    /// Create a new semantic error
    pub fn semantic(message: impl Into<String>, position: Position) -> Self {
        Self::Semantic {
            message: message.into(),
            position,
        }
    }

    /// Returns the source position, if the error has one.
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::Lexical { position, .. }
            | Self::Syntax { position, .. }
            | Self::Semantic { position, .. } => Some(*position),
            Self::Io(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_at_start() {
        assert_eq!(Position::at("abc", 0), Position { line: 1, column: 1 });
    }

    #[test]
    fn test_position_after_newlines() {
        let src = "class Main {\n  field int x;\n}";
        let offset = src.find("x;").unwrap();
        assert_eq!(Position::at(src, offset), Position { line: 2, column: 13 });
    }

    #[test]
    fn test_position_clamps_past_end() {
        assert_eq!(Position::at("ab\nc", 99), Position { line: 2, column: 2 });
    }

    #[test]
    fn test_syntax_error_display() {
        let err = Error::syntax("';'", "'}'", Position { line: 3, column: 7 });
        assert_eq!(err.to_string(), "3:7: SyntaxError: expected ';', found '}'");
    }

    #[test]
    fn test_io_error_has_no_position() {
        let err: Error = std::io::Error::other("disk full").into();
        assert!(err.position().is_none());
        assert!(matches!(err, Error::Io(_)));
    }
}

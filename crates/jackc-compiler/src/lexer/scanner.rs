// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! The scanner that produces tokens from source text.

use super::token::{MAX_INTEGER, is_symbol};
use super::{Keyword, Span, Token, TokenKind};
use crate::{Error, Position, Result};

/// A scanner that tokenizes Jack source code.
///
/// Comments are removed up front, then tokens are produced one at a time.
/// The token sequence cannot be rewound.
pub struct Scanner {
    source: String,
    text: String,
    pos: usize,
}

impl Scanner {
    /// Creates a new scanner for the given source code.
    ///
    /// Fails only if a block comment is never closed.
    pub fn new(source: &str) -> Result<Self> {
        Ok(Self {
            source: source.to_string(),
            text: strip_comments(source)?,
            pos: 0,
        })
    }

    /// Returns true if at least one more token is available.
    pub fn has_more(&mut self) -> bool {
        self.skip_whitespace();
        self.pos < self.text.len()
    }

    /// Returns the next token from the source.
    pub fn advance(&mut self) -> Result<Token> {
        self.skip_whitespace();

        let start = self.pos;

        let Some(ch) = self.bump() else {
            return Err(Error::syntax("a token", "end of input", self.position_at(start)));
        };

        let kind = match ch {
            '"' => self.scan_string(start)?,
            _ if is_symbol(ch) => TokenKind::Symbol(ch),
            _ => self.scan_word(start)?,
        };

        Ok(Token::new(kind, Span::new(start, self.pos)))
    }

    /// Maps a byte offset to a line/column position.
    pub fn position_at(&self, offset: usize) -> Position {
        Position::at(&self.source, offset)
    }

    /// Position just past the last character, used for end-of-input errors.
    pub fn end_position(&self) -> Position {
        self.position_at(self.text.len())
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_whitespace()) {
            self.bump();
        }
    }

    fn scan_string(&mut self, start: usize) -> Result<TokenKind> {
        let mut value = String::new();

        loop {
            match self.bump() {
                None => {
                    return Err(Error::lexical(
                        "unterminated string constant",
                        self.position_at(start),
                    ));
                }
                Some('"') => break,
                Some('\n' | '\r') => {
                    return Err(Error::lexical(
                        "string constant contains a line break",
                        self.position_at(start),
                    ));
                }
                Some(ch) => value.push(ch),
            }
        }

        Ok(TokenKind::StringConstant(value))
    }

    fn scan_word(&mut self, start: usize) -> Result<TokenKind> {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() || is_symbol(ch) {
                break;
            }
            self.bump();
        }

        let word = &self.text[start..self.pos];

        if let Some(kw) = Keyword::from_word(word) {
            return Ok(TokenKind::Keyword(kw));
        }

        if word.bytes().all(|b| b.is_ascii_digit()) {
            return match word.parse::<u16>() {
                Ok(n) if n <= MAX_INTEGER => Ok(TokenKind::IntegerConstant(n)),
                _ => Err(Error::lexical(
                    format!("integer constant {} is out of range 0..={}", word, MAX_INTEGER),
                    self.position_at(start),
                )),
            };
        }

        if is_identifier(word) {
            return Ok(TokenKind::Identifier(word.to_string()));
        }

        Err(Error::lexical(
            format!("unknown token '{}'", word),
            self.position_at(start),
        ))
    }
}

impl Iterator for Scanner {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.has_more() {
            Some(self.advance())
        } else {
            None
        }
    }
}

/// Checks `[A-Za-z_][A-Za-z0-9_]*`.
fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum StripState {
    Code,
    String,
    LineComment,
    BlockComment,
}

/// Blanks out `//` and `/* */` comments, leaving string constants alone.
///
/// Comment bytes become spaces and newlines are kept, so offsets into the
/// result are valid offsets into `source`.
pub fn strip_comments(source: &str) -> Result<String> {
    let mut out = String::with_capacity(source.len());
    let mut state = StripState::Code;
    let mut block_start = 0;
    let mut chars = source.char_indices().peekable();

    let blank = |out: &mut String, ch: char| {
        if ch == '\n' {
            out.push('\n');
        } else {
            out.extend(std::iter::repeat_n(' ', ch.len_utf8()));
        }
    };

    while let Some((pos, ch)) = chars.next() {
        match state {
            StripState::Code => match ch {
                '"' => {
                    state = StripState::String;
                    out.push(ch);
                }
                '/' => match chars.peek().map(|(_, next)| *next) {
                    Some('/') => {
                        chars.next();
                        out.push_str("  ");
                        state = StripState::LineComment;
                    }
                    Some('*') => {
                        chars.next();
                        out.push_str("  ");
                        block_start = pos;
                        state = StripState::BlockComment;
                    }
                    _ => out.push(ch),
                },
                _ => out.push(ch),
            },
            StripState::String => {
                // A line break ends the string here; the scanner reports it.
                if ch == '"' || ch == '\n' {
                    state = StripState::Code;
                }
                out.push(ch);
            }
            StripState::LineComment => {
                if ch == '\n' {
                    state = StripState::Code;
                }
                blank(&mut out, ch);
            }
            StripState::BlockComment => {
                if ch == '*' && chars.peek().map(|(_, next)| *next) == Some('/') {
                    chars.next();
                    out.push_str("  ");
                    state = StripState::Code;
                } else {
                    blank(&mut out, ch);
                }
            }
        }
    }

    if state == StripState::BlockComment {
        return Err(Error::lexical(
            "unterminated block comment",
            Position::at(source, block_start),
        ));
    }

    Ok(out)
}

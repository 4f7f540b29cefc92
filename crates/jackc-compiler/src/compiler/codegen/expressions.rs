// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Expression compilation.
//!
//! `*` and `/` bind to the terms on either side of them; every other binary
//! operator is folded strictly left to right against the running left
//! operand. `a - b * c + d` is `(a - (b * c)) + d` and `a < b = c` is
//! `(a < b) = c`.
//!
//! | Operator | VM code |
//! |----------|---------|
//! | `+ - & \|` | `add sub and or` |
//! | `=` | `eq` |
//! | `<` | `lt` |
//! | `>` | `gt` |
//! | `*` | `call Math.multiply 2` |
//! | `/` | `call Math.divide 2` |
//! | unary `-` / `~` | `neg` / `not` |

use std::io::Write;

use super::CompilationEngine;
use crate::compiler::bytecode::{Command, Segment};
use crate::lexer::{Keyword, Span, Token, TokenKind};
use crate::{Error, Result};

/// Operators folded left to right between operands.
const ADDITIVE_OPS: &[char] = &['+', '-', '&', '|', '<', '>', '='];

/// Operators lowered to `Math` calls, binding to their neighbouring terms.
const MULTIPLICATIVE_OPS: &[char] = &['*', '/'];

impl<W: Write> CompilationEngine<W> {
    /// `operand (op operand)*`
    pub(super) fn compile_expression(&mut self) -> Result<()> {
        self.compile_operand()?;
        while let Some(op) = self.peek_op(ADDITIVE_OPS)? {
            self.lookahead.pop_front();
            self.compile_operand()?;
            self.compile_binary_op(op)?;
        }
        Ok(())
    }

    /// `term (('*' | '/') term)*`
    fn compile_operand(&mut self) -> Result<()> {
        self.compile_term()?;
        while let Some(op) = self.peek_op(MULTIPLICATIVE_OPS)? {
            self.lookahead.pop_front();
            self.compile_term()?;
            self.compile_binary_op(op)?;
        }
        Ok(())
    }

    fn peek_op(&mut self, ops: &[char]) -> Result<Option<char>> {
        Ok(match self.peek()?.map(|t| &t.kind) {
            Some(TokenKind::Symbol(op)) if ops.contains(op) => Some(*op),
            _ => None,
        })
    }

    fn compile_binary_op(&mut self, op: char) -> Result<()> {
        let command = match op {
            '*' => return self.writer.write_call("Math.multiply", 2),
            '/' => return self.writer.write_call("Math.divide", 2),
            '+' => Command::Add,
            '-' => Command::Sub,
            '&' => Command::And,
            '|' => Command::Or,
            '<' => Command::Lt,
            '>' => Command::Gt,
            '=' => Command::Eq,
            _ => unreachable!("not a binary operator: {op}"),
        };
        self.emit(command)
    }

    /// One operand of an expression.
    fn compile_term(&mut self) -> Result<()> {
        if self.at_subroutine_call()? {
            return self.compile_subroutine_call();
        }

        let token = self.expect("term")?;
        match &token.kind {
            TokenKind::IntegerConstant(n) => self.writer.write_push(Segment::Constant, *n),
            TokenKind::StringConstant(s) => self.compile_string(s, &token),
            TokenKind::Keyword(Keyword::True) => {
                self.writer.write_push(Segment::Constant, 1)?;
                self.emit(Command::Neg)
            }
            TokenKind::Keyword(Keyword::False | Keyword::Null) => {
                self.writer.write_push(Segment::Constant, 0)
            }
            TokenKind::Keyword(Keyword::This) => self.writer.write_push(Segment::Pointer, 0),
            TokenKind::Identifier(name) => self.compile_variable(name, token.span),
            TokenKind::Symbol('(') => {
                self.compile_expression()?;
                self.expect_symbol(')')
            }
            TokenKind::Symbol('-') => {
                self.compile_term()?;
                self.emit(Command::Neg)
            }
            TokenKind::Symbol('~') => {
                self.compile_term()?;
                self.emit(Command::Not)
            }
            _ => Err(self.unexpected("term", &token)),
        }
    }

    /// `name` or `name '[' expr ']'`
    fn compile_variable(&mut self, name: &str, span: Span) -> Result<()> {
        let (segment, index) = self.lookup(name, span)?;
        self.writer.write_push(segment, index)?;

        if self.eat_symbol('[')? {
            self.compile_expression()?;
            self.expect_symbol(']')?;
            self.emit(Command::Add)?;
            self.writer.write_pop(Segment::Pointer, 1)?;
            self.writer.write_push(Segment::That, 0)?;
        }
        Ok(())
    }

    /// Builds the string at run time, one `appendChar` per character.
    fn compile_string(&mut self, value: &str, token: &Token) -> Result<()> {
        let too_long = || {
            Error::semantic(
                "string constant is too long",
                self.scanner.position_at(token.span.start),
            )
        };
        let len = u16::try_from(value.chars().count()).map_err(|_| too_long())?;

        self.writer.write_push(Segment::Constant, len)?;
        self.writer.write_call("String.new", 1)?;
        for ch in value.chars() {
            let code = u16::try_from(u32::from(ch)).map_err(|_| {
                Error::semantic(
                    format!("character '{}' has no 16-bit code", ch),
                    self.scanner.position_at(token.span.start),
                )
            })?;
            self.writer.write_push(Segment::Constant, code)?;
            self.writer.write_call("String.appendChar", 2)?;
        }
        Ok(())
    }

    /// True if the next two tokens are `identifier (` or `identifier .`.
    fn at_subroutine_call(&mut self) -> Result<bool> {
        self.fill(2)?;
        let is_name = matches!(
            self.lookahead.front(),
            Some(Token {
                kind: TokenKind::Identifier(_),
                ..
            })
        );
        let opens_call = self
            .lookahead
            .get(1)
            .is_some_and(|t| t.is_symbol('(') || t.is_symbol('.'));
        Ok(is_name && opens_call)
    }

    /// `sub '(' args ')'` or `(Class | var) '.' sub '(' args ')'`
    ///
    /// - `var.sub(..)` pushes `var` and calls `<type of var>.sub`
    /// - `Class.sub(..)` calls `Class.sub` with no receiver
    /// - `sub(..)` pushes `pointer 0` and calls `<this class>.sub`
    pub(super) fn compile_subroutine_call(&mut self) -> Result<()> {
        let (name, span) = self.expect_identifier("subroutine, class or variable name")?;

        let (callee, receivers) = if self.eat_symbol('.')? {
            let (sub, _) = self.expect_identifier("subroutine name")?;
            let receiver = self
                .symbols
                .resolve(&name)
                .map(|s| (s.segment(), s.index, s.ty.clone()));
            match receiver {
                Some((segment, index, ty)) => {
                    self.writer.write_push(segment, index)?;
                    (format!("{}.{}", ty, sub), 1)
                }
                None => (format!("{}.{}", name, sub), 0),
            }
        } else {
            if self.symbols.resolve(&name).is_some() {
                return Err(Error::semantic(
                    format!("'{}' is a variable and cannot be called", name),
                    self.scanner.position_at(span.start),
                ));
            }
            self.writer.write_push(Segment::Pointer, 0)?;
            (format!("{}.{}", self.class_name, name), 1)
        };

        self.expect_symbol('(')?;
        let args = self.compile_expression_list()?;
        self.expect_symbol(')')?;

        self.writer.write_call(&callee, receivers + args)
    }

    /// `(expr (',' expr)*)?`, returning the number of expressions.
    fn compile_expression_list(&mut self) -> Result<u16> {
        if self.check_symbol(')')? {
            return Ok(0);
        }
        let mut count = 1;
        self.compile_expression()?;
        while self.eat_symbol(',')? {
            self.compile_expression()?;
            count += 1;
        }
        Ok(count)
    }
}

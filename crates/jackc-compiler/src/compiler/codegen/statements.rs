// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Statement compilation.
//!
//! | Statement | Emitted shape |
//! |-----------|---------------|
//! | `let x = e;` | `e`, `pop x` |
//! | `let a[i] = e;` | `push a`, `i`, `add`, `pop pointer 1`, `e`, `pop that 0` |
//! | `if` | `cond`, `not`, `if-goto ELSE`, then, `goto END`, `label ELSE`, else, `label END` |
//! | `while` | `label TOP`, `cond`, `not`, `if-goto END`, body, `goto TOP`, `label END` |
//! | `do call;` | call, `pop temp 0` |
//! | `return e?;` | `e` (non-void), `e?` then `push constant 0` (void), `return` |

use std::io::Write;

use super::CompilationEngine;
use crate::Result;
use crate::compiler::bytecode::{Command, Segment};
use crate::lexer::Keyword;

impl<W: Write> CompilationEngine<W> {
    /// Compiles statements while the next token starts one.
    pub(super) fn compile_statements(&mut self) -> Result<()> {
        loop {
            match self.peek_keyword()? {
                Some(Keyword::Let) => self.compile_let()?,
                Some(Keyword::If) => self.compile_if()?,
                Some(Keyword::While) => self.compile_while()?,
                Some(Keyword::Do) => self.compile_do()?,
                Some(Keyword::Return) => self.compile_return()?,
                _ => return Ok(()),
            }
        }
    }

    /// `let name ('[' expr ']')? '=' expr ';'`
    ///
    /// For an indexed target, `pointer 1` is set before the right-hand side
    /// is compiled.
    fn compile_let(&mut self) -> Result<()> {
        self.expect_keyword(Keyword::Let)?;
        let (name, span) = self.expect_identifier("variable name")?;
        let (segment, index) = self.lookup(&name, span)?;

        if self.eat_symbol('[')? {
            self.writer.write_push(segment, index)?;
            self.compile_expression()?;
            self.expect_symbol(']')?;
            self.emit(Command::Add)?;
            self.writer.write_pop(Segment::Pointer, 1)?;

            self.expect_symbol('=')?;
            self.compile_expression()?;
            self.expect_symbol(';')?;
            self.writer.write_pop(Segment::That, 0)
        } else {
            self.expect_symbol('=')?;
            self.compile_expression()?;
            self.expect_symbol(';')?;
            self.writer.write_pop(segment, index)
        }
    }

    /// `if '(' expr ')' '{' statements '}' (else '{' statements '}')?`
    fn compile_if(&mut self) -> Result<()> {
        self.expect_keyword(Keyword::If)?;
        let else_label = self.new_label();
        let end_label = self.new_label();

        self.expect_symbol('(')?;
        self.compile_expression()?;
        self.expect_symbol(')')?;
        self.emit(Command::Not)?;
        self.writer.write_if_goto(&else_label)?;

        self.compile_block()?;
        self.writer.write_goto(&end_label)?;
        self.writer.write_label(&else_label)?;

        if self.eat_keyword(Keyword::Else)? {
            self.compile_block()?;
        }
        self.writer.write_label(&end_label)
    }

    /// `while '(' expr ')' '{' statements '}'`
    fn compile_while(&mut self) -> Result<()> {
        self.expect_keyword(Keyword::While)?;
        let top_label = self.new_label();
        let end_label = self.new_label();

        self.writer.write_label(&top_label)?;
        self.expect_symbol('(')?;
        self.compile_expression()?;
        self.expect_symbol(')')?;
        self.emit(Command::Not)?;
        self.writer.write_if_goto(&end_label)?;

        self.compile_block()?;
        self.writer.write_goto(&top_label)?;
        self.writer.write_label(&end_label)
    }

    /// `do subroutineCall ';'`
    ///
    /// Every call leaves exactly one value behind, so it is always dropped.
    fn compile_do(&mut self) -> Result<()> {
        self.expect_keyword(Keyword::Do)?;
        self.compile_subroutine_call()?;
        self.expect_symbol(';')?;
        self.writer.write_pop(Segment::Temp, 0)
    }

    /// `return expr? ';'`
    ///
    /// A `void` subroutine always hands back 0 so callers can pop one value;
    /// any other subroutine must name the value it returns.
    fn compile_return(&mut self) -> Result<()> {
        self.expect_keyword(Keyword::Return)?;
        if !self.check_symbol(';')? {
            self.compile_expression()?;
        } else if !self.returns_void {
            let token = self.expect("expression")?;
            return Err(self.unexpected("expression", &token));
        }
        self.expect_symbol(';')?;
        if self.returns_void {
            self.writer.write_push(Segment::Constant, 0)?;
        }
        self.writer.write_return()
    }

    /// `'{' statements '}'`
    fn compile_block(&mut self) -> Result<()> {
        self.expect_symbol('{')?;
        self.compile_statements()?;
        self.expect_symbol('}')
    }
}

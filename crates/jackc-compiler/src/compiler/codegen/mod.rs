// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Single-pass code generation from Jack source to VM code.
//!
//! This module contains the `CompilationEngine`, a recursive descent parser
//! that emits VM instructions as it recognizes each production. No syntax
//! tree is built.
//!
//! - `mod.rs`: token handling, class and subroutine declarations
//! - `statements.rs`: `let`, `if`, `while`, `do`, `return`
//! - `expressions.rs`: expressions, terms and subroutine calls
//! - `scope.rs`: the two-level symbol table

mod expressions;
mod scope;
mod statements;


pub use scope::{Symbol, SymbolKind, SymbolTable};

use std::collections::VecDeque;
use std::io::Write;

use tracing::debug;

use crate::compiler::bytecode::{Command, Segment};
use crate::compiler::writer::VmWriter;
use crate::lexer::{Keyword, Scanner, Span, Token, TokenKind};
use crate::{CompileOptions, Error, Result};

/// The grammar never needs to see further ahead than `name . sub (`.
const MAX_LOOKAHEAD: usize = 2;

/// Which of the three subroutine flavours is being compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubroutineKind {
    /// Allocates and returns a new object
    Constructor,
    /// Static subroutine, no receiver
    Function,
    /// Receives the object as argument 0
    Method,
}

/// Compiles one class, writing VM code to `W` as it parses.
pub struct CompilationEngine<W: Write> {
    scanner: Scanner,
    lookahead: VecDeque<Token>,
    symbols: SymbolTable,
    writer: VmWriter<W>,
    options: CompileOptions,
    class_name: String,
    returns_void: bool,
    label_counter: usize,
}

impl<W: Write> CompilationEngine<W> {
    /// Creates an engine over `source` writing to `out`.
    pub fn new(source: &str, out: W, options: CompileOptions) -> Result<Self> {
        Ok(Self {
            scanner: Scanner::new(source)?,
            lookahead: VecDeque::with_capacity(MAX_LOOKAHEAD),
            symbols: SymbolTable::new(),
            writer: VmWriter::new(out),
            options,
            class_name: String::new(),
            returns_void: false,
            label_counter: 0,
        })
    }

    // ========================================================================
    // Class Level
    // ========================================================================

    /// Compiles `class Name { classVarDec* subroutineDec* }` and returns the
    /// sink once the whole class has been written.
    pub fn compile_class(mut self) -> Result<W> {
        self.symbols.start_class();
        self.label_counter = 0;

        self.expect_keyword(Keyword::Class)?;
        let (name, _) = self.expect_identifier("class name")?;
        debug!(class = %name, "compiling class");
        self.class_name = name;
        self.expect_symbol('{')?;

        while matches!(self.peek_keyword()?, Some(Keyword::Static | Keyword::Field)) {
            self.compile_class_var_dec()?;
        }

        while matches!(
            self.peek_keyword()?,
            Some(Keyword::Constructor | Keyword::Function | Keyword::Method)
        ) {
            self.compile_subroutine()?;
        }

        self.expect_symbol('}')?;

        if let Some(token) = self.peek()?.cloned() {
            return Err(self.unexpected("end of input", &token));
        }

        debug!(
            class = %self.class_name,
            instructions = self.writer.instructions_written(),
            "class compiled"
        );
        self.writer.into_inner()
    }

    /// `(static | field) type name (',' name)* ';'`
    fn compile_class_var_dec(&mut self) -> Result<()> {
        let token = self.expect("'static' or 'field'")?;
        let kind = match token.kind {
            TokenKind::Keyword(Keyword::Static) => SymbolKind::Static,
            TokenKind::Keyword(Keyword::Field) => SymbolKind::Field,
            _ => return Err(self.unexpected("'static' or 'field'", &token)),
        };
        self.compile_declarators(kind)
    }

    /// `type name (',' name)* ';'`, defining every name as `kind`.
    fn compile_declarators(&mut self, kind: SymbolKind) -> Result<()> {
        let ty = self.compile_type()?;
        loop {
            let (name, span) = self.expect_identifier("variable name")?;
            self.declare(&name, &ty, kind, span)?;
            if !self.eat_symbol(',')? {
                break;
            }
        }
        self.expect_symbol(';')
    }

    /// `int | char | boolean | ClassName`
    fn compile_type(&mut self) -> Result<String> {
        let token = self.expect("type")?;
        match token.kind {
            TokenKind::Keyword(kw @ (Keyword::Int | Keyword::Char | Keyword::Boolean)) => {
                Ok(kw.as_str().to_string())
            }
            TokenKind::Identifier(name) => Ok(name),
            _ => Err(self.unexpected("type", &token)),
        }
    }

    // ========================================================================
    // Subroutines
    // ========================================================================

    /// `(constructor | function | method) (void | type) name '(' params ')' body`
    fn compile_subroutine(&mut self) -> Result<()> {
        let token = self.expect("subroutine declaration")?;
        let kind = match token.kind {
            TokenKind::Keyword(Keyword::Constructor) => SubroutineKind::Constructor,
            TokenKind::Keyword(Keyword::Function) => SubroutineKind::Function,
            TokenKind::Keyword(Keyword::Method) => SubroutineKind::Method,
            _ => return Err(self.unexpected("subroutine declaration", &token)),
        };

        self.returns_void = self.eat_keyword(Keyword::Void)?;
        if !self.returns_void {
            self.compile_type()?;
        }
        let (name, span) = self.expect_identifier("subroutine name")?;

        self.symbols.start_subroutine();
        if self.options.reset_labels_per_subroutine {
            self.label_counter = 0;
        }
        if kind == SubroutineKind::Method {
            let class_name = self.class_name.clone();
            self.declare("this", &class_name, SymbolKind::Arg, span)?;
        }

        self.expect_symbol('(')?;
        self.compile_parameter_list()?;
        self.expect_symbol(')')?;

        self.compile_subroutine_body(kind, &name)
    }

    /// `((type name) (',' type name)*)?`
    fn compile_parameter_list(&mut self) -> Result<()> {
        if self.check_symbol(')')? {
            return Ok(());
        }
        loop {
            let ty = self.compile_type()?;
            let (name, span) = self.expect_identifier("parameter name")?;
            self.declare(&name, &ty, SymbolKind::Arg, span)?;
            if !self.eat_symbol(',')? {
                return Ok(());
            }
        }
    }

    /// `'{' varDec* statements '}'`
    ///
    /// `function` is written once all locals are known, followed by the
    /// prologue that sets up `pointer 0`.
    fn compile_subroutine_body(&mut self, kind: SubroutineKind, name: &str) -> Result<()> {
        self.expect_symbol('{')?;

        while self.check_keyword(Keyword::Var)? {
            self.expect_keyword(Keyword::Var)?;
            self.compile_declarators(SymbolKind::Var)?;
        }

        let qualified = format!("{}.{}", self.class_name, name);
        let locals = self.symbols.var_count(SymbolKind::Var);
        debug!(subroutine = %qualified, ?kind, locals, "compiling subroutine");
        self.writer.write_function(&qualified, locals)?;

        match kind {
            SubroutineKind::Constructor => {
                let fields = self.symbols.var_count(SymbolKind::Field);
                self.writer.write_push(Segment::Constant, fields)?;
                self.writer.write_call("Memory.alloc", 1)?;
                self.writer.write_pop(Segment::Pointer, 0)?;
            }
            SubroutineKind::Method => {
                self.writer.write_push(Segment::Argument, 0)?;
                self.writer.write_pop(Segment::Pointer, 0)?;
            }
            SubroutineKind::Function => {}
        }

        self.compile_statements()?;
        self.expect_symbol('}')
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Next label, unique within the current numbering range.
    fn new_label(&mut self) -> String {
        let label = self.options.label(self.label_counter);
        self.label_counter += 1;
        label
    }

    /// Writes an operand-less command.
    fn emit(&mut self, command: Command) -> Result<()> {
        self.writer.write_arithmetic(command)
    }

    /// Adds `name` to the symbol table, failing once its segment is full.
    fn declare(&mut self, name: &str, ty: &str, kind: SymbolKind, span: Span) -> Result<()> {
        match self.symbols.define(name, ty, kind) {
            Some(_) => Ok(()),
            None => Err(Error::semantic(
                format!("too many {} variables, '{}' has no free slot", kind, name),
                self.scanner.position_at(span.start),
            )),
        }
    }

    /// Resolves a variable to its storage location.
    fn lookup(&self, name: &str, span: Span) -> Result<(Segment, u16)> {
        match self.symbols.resolve(name) {
            Some(symbol) => Ok((symbol.segment(), symbol.index)),
            None => Err(Error::semantic(
                format!("undefined variable '{}'", name),
                self.scanner.position_at(span.start),
            )),
        }
    }

    // ========================================================================
    // Token Stream
    // ========================================================================

    /// Buffers up to `n` tokens; returns false if the input ran out first.
    fn fill(&mut self, n: usize) -> Result<bool> {
        debug_assert!(n <= MAX_LOOKAHEAD);
        while self.lookahead.len() < n && self.scanner.has_more() {
            let token = self.scanner.advance()?;
            self.lookahead.push_back(token);
        }
        Ok(self.lookahead.len() >= n)
    }

    fn peek(&mut self) -> Result<Option<&Token>> {
        self.fill(1)?;
        Ok(self.lookahead.front())
    }

    fn peek_keyword(&mut self) -> Result<Option<Keyword>> {
        Ok(match self.peek()? {
            Some(Token {
                kind: TokenKind::Keyword(kw),
                ..
            }) => Some(*kw),
            _ => None,
        })
    }

    fn check_symbol(&mut self, symbol: char) -> Result<bool> {
        Ok(self.peek()?.is_some_and(|t| t.is_symbol(symbol)))
    }

    fn check_keyword(&mut self, keyword: Keyword) -> Result<bool> {
        Ok(self.peek()?.is_some_and(|t| t.is_keyword(keyword)))
    }

    /// Consumes the next token, whatever it is.
    fn expect(&mut self, expected: &str) -> Result<Token> {
        self.fill(1)?;
        self.lookahead.pop_front().ok_or_else(|| {
            Error::syntax(expected, "end of input", self.scanner.end_position())
        })
    }

    fn expect_symbol(&mut self, symbol: char) -> Result<()> {
        let expected = format!("'{}'", symbol);
        let token = self.expect(&expected)?;
        if token.is_symbol(symbol) {
            Ok(())
        } else {
            Err(self.unexpected(expected, &token))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<()> {
        let expected = format!("'{}'", keyword);
        let token = self.expect(&expected)?;
        if token.is_keyword(keyword) {
            Ok(())
        } else {
            Err(self.unexpected(expected, &token))
        }
    }

    fn expect_identifier(&mut self, what: &str) -> Result<(String, Span)> {
        let token = self.expect(what)?;
        match token.kind {
            TokenKind::Identifier(name) => Ok((name, token.span)),
            _ => Err(self.unexpected(what, &token)),
        }
    }

    fn eat_symbol(&mut self, symbol: char) -> Result<bool> {
        if self.check_symbol(symbol)? {
            self.lookahead.pop_front();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn eat_keyword(&mut self, keyword: Keyword) -> Result<bool> {
        if self.check_keyword(keyword)? {
            self.lookahead.pop_front();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn unexpected(&self, expected: impl Into<String>, found: &Token) -> Error {
        Error::syntax(
            expected,
            found.kind.to_string(),
            self.scanner.position_at(found.span.start),
        )
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! VM instruction definitions.
//!
//! The `Display` output of [`Instruction`] is the exact line format consumed
//! by the downstream VM translator.

use std::fmt;

/// A named storage region addressed by push/pop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Read-only integer constants
    Constant,
    /// Arguments of the current function
    Argument,
    /// Locals of the current function
    Local,
    /// Class-level statics
    Static,
    /// Fields of the object at `pointer 0`
    This,
    /// Memory at `pointer 1` (array access)
    That,
    /// `pointer 0` is THIS, `pointer 1` is THAT
    Pointer,
    /// Scratch registers
    Temp,
}

impl Segment {
    /// The mnemonic used in VM code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::Constant => "constant",
            Segment::Argument => "argument",
            Segment::Local => "local",
            Segment::Static => "static",
            Segment::This => "this",
            Segment::That => "that",
            Segment::Pointer => "pointer",
            Segment::Temp => "temp",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arithmetic and logical commands. None of them take operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Integer addition
    Add,
    /// Integer subtraction
    Sub,
    /// Arithmetic negation
    Neg,
    /// Equality, true as -1
    Eq,
    /// Greater than
    Gt,
    /// Less than
    Lt,
    /// Bitwise and
    And,
    /// Bitwise or
    Or,
    /// Bitwise not
    Not,
}

impl Command {
    /// The mnemonic used in VM code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Add => "add",
            Command::Sub => "sub",
            Command::Neg => "neg",
            Command::Eq => "eq",
            Command::Gt => "gt",
            Command::Lt => "lt",
            Command::And => "and",
            Command::Or => "or",
            Command::Not => "not",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single VM instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// `push segment index`
    Push(Segment, u16),
    /// `pop segment index`
    Pop(Segment, u16),
    /// Operand-less arithmetic/logical command
    Arithmetic(Command),
    /// `label L`
    Label(String),
    /// `goto L`
    Goto(String),
    /// `if-goto L`
    IfGoto(String),
    /// `call Class.subroutine argCount`
    Call(String, u16),
    /// `function Class.subroutine localCount`
    Function(String, u16),
    /// `return`
    Return,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Push(segment, index) => write!(f, "push {} {}", segment, index),
            Instruction::Pop(segment, index) => write!(f, "pop {} {}", segment, index),
            Instruction::Arithmetic(command) => write!(f, "{}", command),
            Instruction::Label(label) => write!(f, "label {}", label),
            Instruction::Goto(label) => write!(f, "goto {}", label),
            Instruction::IfGoto(label) => write!(f, "if-goto {}", label),
            Instruction::Call(name, args) => write!(f, "call {} {}", name, args),
            Instruction::Function(name, locals) => write!(f, "function {} {}", name, locals),
            Instruction::Return => f.write_str("return"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_format() {
        assert_eq!(Instruction::Push(Segment::Constant, 7).to_string(), "push constant 7");
        assert_eq!(Instruction::Pop(Segment::Pointer, 1).to_string(), "pop pointer 1");
    }

    #[test]
    fn test_control_flow_format() {
        assert_eq!(Instruction::Label("L0".into()).to_string(), "label L0");
        assert_eq!(Instruction::Goto("L1".into()).to_string(), "goto L1");
        assert_eq!(Instruction::IfGoto("L2".into()).to_string(), "if-goto L2");
    }

    #[test]
    fn test_function_call_format() {
        assert_eq!(
            Instruction::Function("Main.main".into(), 2).to_string(),
            "function Main.main 2"
        );
        assert_eq!(
            Instruction::Call("Math.multiply".into(), 2).to_string(),
            "call Math.multiply 2"
        );
        assert_eq!(Instruction::Return.to_string(), "return");
    }

    #[test]
    fn test_arithmetic_mnemonics() {
        let all = [
            Command::Add,
            Command::Sub,
            Command::Neg,
            Command::Eq,
            Command::Gt,
            Command::Lt,
            Command::And,
            Command::Or,
            Command::Not,
        ];
        let text: Vec<String> = all
            .iter()
            .map(|c| Instruction::Arithmetic(*c).to_string())
            .collect();
        assert_eq!(text, ["add", "sub", "neg", "eq", "gt", "lt", "and", "or", "not"]);
    }
}
